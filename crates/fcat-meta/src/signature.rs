//! Font signature sniffing
//!
//! The only fatal stage of the pipeline: a buffer that does not start with
//! one of the known sfnt/WOFF tags carries no salvageable metadata.

use serde::{Deserialize, Serialize};

use crate::{MetaError, Result};

/// Smallest buffer that can hold an sfnt header plus a few table records
pub const MIN_FONT_SIZE: usize = 100;

const TRUETYPE_SIGNATURE: u32 = 0x0001_0000;
const OPENTYPE_SIGNATURE: u32 = 0x4F54_544F; // 'OTTO'
const WOFF_SIGNATURE: u32 = 0x774F_4646; // 'wOFF'
const WOFF2_SIGNATURE: u32 = 0x774F_4632; // 'wOF2'

/// Container format detected from the first four bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    Ttf,
    Otf,
    Woff,
    Woff2,
}

impl FontFormat {
    /// Map a big-endian signature to a format
    pub fn from_signature(signature: u32) -> Option<Self> {
        match signature {
            TRUETYPE_SIGNATURE => Some(FontFormat::Ttf),
            OPENTYPE_SIGNATURE => Some(FontFormat::Otf),
            WOFF_SIGNATURE => Some(FontFormat::Woff),
            WOFF2_SIGNATURE => Some(FontFormat::Woff2),
            _ => None,
        }
    }

    /// Conventional file extension
    pub fn extension(self) -> &'static str {
        match self {
            FontFormat::Ttf => "ttf",
            FontFormat::Otf => "otf",
            FontFormat::Woff => "woff",
            FontFormat::Woff2 => "woff2",
        }
    }

    /// Whether the payload is a web font container rather than a bare sfnt
    pub fn is_web_font(self) -> bool {
        matches!(self, FontFormat::Woff | FontFormat::Woff2)
    }
}

/// Confirm the buffer is plausibly a font and report its container format
pub fn validate(data: &[u8]) -> Result<FontFormat> {
    if data.len() < MIN_FONT_SIZE {
        return Err(MetaError::BufferTooSmall { len: data.len() });
    }

    let tag = [data[0], data[1], data[2], data[3]];
    FontFormat::from_signature(u32::from_be_bytes(tag)).ok_or(MetaError::InvalidSignature(tag))
}
