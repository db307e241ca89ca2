//! OpenType table reader
//!
//! Unwraps the container (WOFF to sfnt) and exposes the tables the
//! extractors need through a thin view over `ttf_parser::Face`.

mod encoding;
mod stream;
pub mod sfnt;
pub mod woff;

use std::borrow::Cow;

use ttf_parser::name::{Name, PlatformId};
use ttf_parser::{Face, Language, Tag, cmap, fvar, name_id, opentype_layout, os2};

use crate::record::{DesignerInfo, FontMetrics};
use crate::signature::FontFormat;
use crate::{MetaError, Result};

pub use sfnt::SfntWriter;
pub use stream::FontStream;

/// Decoded sfnt bytes, borrowed for bare fonts and owned for web fonts
pub struct SfntData<'a> {
    bytes: Cow<'a, [u8]>,
    format: FontFormat,
}

impl<'a> SfntData<'a> {
    /// Decode the container of a signature-checked buffer
    pub fn decode(data: &'a [u8], format: FontFormat) -> Result<Self> {
        let bytes = match format {
            FontFormat::Ttf | FontFormat::Otf => Cow::Borrowed(data),
            FontFormat::Woff => Cow::Owned(woff::decode_woff(data)?),
            FontFormat::Woff2 => {
                return Err(MetaError::UnparsableFont(
                    "WOFF2 decoding is not supported".into(),
                ));
            }
        };
        Ok(Self { bytes, format })
    }

    /// Container the bytes were decoded from
    pub fn format(&self) -> FontFormat {
        self.format
    }

    /// Plain sfnt bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Parse the table directory and required tables
    pub fn open(&self) -> Result<FontHandle<'_>> {
        Face::parse(&self.bytes, 0)
            .map(|face| FontHandle { face })
            .map_err(|e| MetaError::UnparsableFont(e.to_string()))
    }
}

/// Read-only view over the parsed tables of one font
pub struct FontHandle<'a> {
    face: Face<'a>,
}

impl<'a> FontHandle<'a> {
    /// Best name record for an id: English first, then any decodable record
    pub fn name(&self, id: u16) -> Option<String> {
        let mut fallback = None;
        for record in self.face.names() {
            if record.name_id != id {
                continue;
            }
            let Some(text) = decode_name(&record) else {
                continue;
            };
            if is_english(&record) {
                return Some(text);
            }
            fallback.get_or_insert(text);
        }
        fallback
    }

    /// Whether the table directory lists a table, parsed or not
    pub fn has_raw_table(&self, tag: &[u8; 4]) -> bool {
        self.face.raw_face().table(Tag::from_bytes(tag)).is_some()
    }

    /// Parsed `OS/2` table
    pub fn os2(&self) -> Option<&os2::Table<'a>> {
        self.face.tables().os2.as_ref()
    }

    /// Parsed `fvar` table
    pub fn fvar(&self) -> Option<&fvar::Table<'a>> {
        self.face.tables().fvar.as_ref()
    }

    /// Parsed `GSUB` table
    pub fn gsub(&self) -> Option<&opentype_layout::LayoutTable<'a>> {
        self.face.tables().gsub.as_ref()
    }

    /// Parsed `GPOS` table
    pub fn gpos(&self) -> Option<&opentype_layout::LayoutTable<'a>> {
        self.face.tables().gpos.as_ref()
    }

    /// Parsed `cmap` table
    pub fn cmap(&self) -> Option<&cmap::Table<'a>> {
        self.face.tables().cmap.as_ref()
    }

    /// Glyph count from `maxp`
    pub fn glyph_count(&self) -> u16 {
        self.face.number_of_glyphs()
    }

    /// Vertical metrics in font units
    pub fn metrics(&self) -> FontMetrics {
        FontMetrics {
            units_per_em: self.face.units_per_em(),
            ascender: self.face.ascender(),
            descender: self.face.descender(),
            line_gap: self.face.line_gap(),
            x_height: self.face.x_height(),
            cap_height: self.face.capital_height(),
        }
    }

    /// Credits and licensing strings from the name table
    pub fn designer_info(&self) -> Option<DesignerInfo> {
        let info = DesignerInfo {
            designer: self.name(name_id::DESIGNER),
            manufacturer: self.name(name_id::MANUFACTURER),
            designer_url: self.name(name_id::DESIGNER_URL),
            vendor_url: self.name(name_id::VENDOR_URL),
            license: self.name(name_id::LICENSE),
            license_url: self.name(name_id::LICENSE_URL),
            copyright: self.name(name_id::COPYRIGHT_NOTICE),
            version: self.name(name_id::VERSION),
        };
        (!info.is_empty()).then_some(info)
    }

    /// Underlying ttf-parser face
    pub fn ttf_face(&self) -> &Face<'a> {
        &self.face
    }
}

fn is_english(record: &Name<'_>) -> bool {
    match record.platform_id {
        PlatformId::Macintosh => record.language_id == 0,
        _ => record.language() == Language::English_UnitedStates,
    }
}

fn decode_name(record: &Name<'_>) -> Option<String> {
    let text = match record.platform_id {
        // Roman script, the only Macintosh encoding decoded
        PlatformId::Macintosh if record.encoding_id == 0 => {
            encoding::decode_mac_roman(record.name)
        }
        _ => record.to_string()?,
    };
    let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    (!text.is_empty()).then(|| text.to_string())
}
