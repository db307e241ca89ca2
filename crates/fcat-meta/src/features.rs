//! OpenType feature extraction
//!
//! Walks the GSUB and GPOS feature lists, keeps the first occurrence of
//! every tag and gives each one a display title.

use serde::{Deserialize, Serialize};
use ttf_parser::opentype_layout::LayoutTable;

use crate::reader::FontHandle;
use crate::record::OpenTypeFeatureDescriptor;

/// How the catalog groups a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Stylistic sets (`ss01`-`ss20`) and stylistic alternates (`salt`)
    Alternate,
    Other,
}

impl FeatureKind {
    /// Kind of a feature tag
    pub fn of(tag: &[u8; 4]) -> Self {
        if tag == b"salt" || stylistic_set_number(tag).is_some() {
            FeatureKind::Alternate
        } else {
            FeatureKind::Other
        }
    }
}

/// Result of reading the layout tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureExtraction {
    pub has_gsub: bool,
    pub has_gpos: bool,
    pub features: Vec<OpenTypeFeatureDescriptor>,
}

fn stylistic_set_number(tag: &[u8; 4]) -> Option<u8> {
    numbered(tag, b"ss").filter(|n| (1..=20).contains(n))
}

fn character_variant_number(tag: &[u8; 4]) -> Option<u8> {
    numbered(tag, b"cv").filter(|n| (1..=99).contains(n))
}

fn numbered(tag: &[u8; 4], prefix: &[u8; 2]) -> Option<u8> {
    if &tag[..2] != prefix || !tag[2].is_ascii_digit() || !tag[3].is_ascii_digit() {
        return None;
    }
    Some((tag[2] - b'0') * 10 + (tag[3] - b'0'))
}

/// Display title for a feature tag; unknown tags are returned as-is
pub fn feature_title(tag: &[u8; 4]) -> String {
    let title = match tag {
        b"liga" => "Standard Ligatures",
        b"dlig" => "Discretionary Ligatures",
        b"clig" => "Contextual Ligatures",
        b"hlig" => "Historical Ligatures",
        b"smcp" => "Small Capitals",
        b"c2sc" => "Small Capitals From Capitals",
        b"pcap" => "Petite Capitals",
        b"c2pc" => "Petite Capitals From Capitals",
        b"case" => "Case-Sensitive Forms",
        b"onum" => "Oldstyle Figures",
        b"lnum" => "Lining Figures",
        b"pnum" => "Proportional Figures",
        b"tnum" => "Tabular Figures",
        b"frac" => "Fractions",
        b"numr" => "Numerators",
        b"dnom" => "Denominators",
        b"ordn" => "Ordinals",
        b"sups" => "Superscript",
        b"subs" => "Subscript",
        b"sinf" => "Scientific Inferiors",
        b"zero" => "Slashed Zero",
        b"kern" => "Kerning",
        b"calt" => "Contextual Alternates",
        b"salt" => "Stylistic Alternates",
        b"swsh" => "Swash",
        b"cswh" => "Contextual Swash",
        b"locl" => "Localized Forms",
        b"ccmp" => "Glyph Composition/Decomposition",
        b"mark" => "Mark Positioning",
        b"mkmk" => "Mark to Mark Positioning",
        _ => {
            if let Some(n) = stylistic_set_number(tag) {
                return format!("Stylistic Set {n}");
            }
            if let Some(n) = character_variant_number(tag) {
                return format!("Character Variant {n}");
            }
            return String::from_utf8_lossy(tag).into_owned();
        }
    };
    title.to_string()
}

/// Deduplicate tags in first-seen order and describe them
pub fn describe<I>(tags: I) -> Vec<OpenTypeFeatureDescriptor>
where
    I: IntoIterator<Item = [u8; 4]>,
{
    let mut features: Vec<OpenTypeFeatureDescriptor> = Vec::new();
    for tag in tags {
        let tag_string = String::from_utf8_lossy(&tag).into_owned();
        if features.iter().any(|feature| feature.tag == tag_string) {
            continue;
        }
        features.push(OpenTypeFeatureDescriptor {
            tag: tag_string,
            human_title: feature_title(&tag),
            kind: FeatureKind::of(&tag),
        });
    }
    features
}

fn layout_tags<'a>(table: Option<&LayoutTable<'a>>) -> Vec<[u8; 4]> {
    let Some(table) = table else {
        return Vec::new();
    };
    (0..table.features.len())
        .filter_map(|index| table.features.get(index))
        .map(|feature| feature.tag.to_bytes())
        .collect()
}

/// Collect the features declared in GSUB then GPOS
pub fn extract(handle: &FontHandle<'_>) -> FeatureExtraction {
    let gsub = handle.gsub();
    let gpos = handle.gpos();
    let tags = layout_tags(gsub).into_iter().chain(layout_tags(gpos));
    let features = describe(tags);

    tracing::debug!("Extracted {} OpenType features", features.len());
    FeatureExtraction {
        has_gsub: gsub.is_some(),
        has_gpos: gpos.is_some(),
        features,
    }
}
