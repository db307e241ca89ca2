//! Family, style, weight and italic detection

use ttf_parser::{Style, name_id};

use crate::reader::FontHandle;

/// Default weight when nothing better is known
pub const DEFAULT_WEIGHT: u16 = 400;

/// Default style name
pub const DEFAULT_STYLE: &str = "Regular";

/// Style words and their weights
///
/// Compound names come before the words they end with so that
/// "ExtraBold" is not read as "Bold".
const WEIGHT_LADDER: &[(&str, u16)] = &[
    ("extralight", 200),
    ("ultralight", 200),
    ("semibold", 600),
    ("demibold", 600),
    ("extrabold", 800),
    ("ultrabold", 800),
    ("hairline", 100),
    ("thin", 100),
    ("light", 300),
    ("regular", 400),
    ("normal", 400),
    ("book", 400),
    ("medium", 500),
    ("bold", 700),
    ("black", 900),
    ("heavy", 900),
];

/// Identity fields of a font
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub family: String,
    pub style: String,
    pub weight: u16,
    pub is_italic: bool,
}

impl Identity {
    /// Identity derived from the filename alone
    pub fn from_filename(stem: &str) -> Self {
        Self {
            family: stem.to_string(),
            style: DEFAULT_STYLE.to_string(),
            weight: DEFAULT_WEIGHT,
            is_italic: false,
        }
    }
}

/// Read identity from the name and OS/2 tables
pub fn extract(handle: &FontHandle<'_>, stem: &str, warnings: &mut Vec<String>) -> Identity {
    let family = handle
        .name(name_id::FAMILY)
        .or_else(|| handle.name(name_id::FULL_NAME))
        .unwrap_or_else(|| {
            warnings.push("No family name record; family taken from filename".to_string());
            stem.to_string()
        });

    let style = handle
        .name(name_id::SUBFAMILY)
        .unwrap_or_else(|| DEFAULT_STYLE.to_string());

    let os2 = handle.os2();
    let weight = match os2.map(|table| table.weight().to_number()) {
        Some(class) if (1..=1000).contains(&class) => class,
        Some(class) => {
            warnings.push(format!(
                "OS/2 weight class {class} out of range; weight inferred from style name"
            ));
            weight_from_style(&style).unwrap_or(DEFAULT_WEIGHT)
        }
        None => {
            if handle.has_raw_table(b"OS/2") {
                warnings.push("OS/2 table unreadable; weight inferred from style name".to_string());
            } else {
                warnings.push("OS/2 table missing; weight inferred from style name".to_string());
            }
            weight_from_style(&style).unwrap_or(DEFAULT_WEIGHT)
        }
    };

    let italic_bit = os2.is_some_and(|table| table.style() == Style::Italic);
    let is_italic = italic_bit || style_is_italic(&style);

    tracing::debug!(
        "Identity: family={:?} style={:?} weight={} italic={}",
        family,
        style,
        weight,
        is_italic
    );

    Identity {
        family,
        style,
        weight,
        is_italic,
    }
}

/// Weight implied by a style name, if any word of the ladder appears in it
pub fn weight_from_style(style: &str) -> Option<u16> {
    let compact = compact(style);
    WEIGHT_LADDER
        .iter()
        .find(|(word, _)| compact.contains(word))
        .map(|&(_, weight)| weight)
}

/// Whether a style name describes an italic or oblique face
pub fn style_is_italic(style: &str) -> bool {
    let lower = style.to_lowercase();
    lower.contains("italic") || lower.contains("oblique")
}

fn compact(style: &str) -> String {
    style
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
