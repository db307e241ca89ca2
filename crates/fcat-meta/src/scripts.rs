//! Script coverage detection
//!
//! A script counts as supported when enough of a handful of sampled
//! code points from its block map to real glyphs. This is a catalog
//! filter, not a coverage guarantee.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use indexmap::IndexSet;

use crate::reader::FontHandle;

/// Script every font is assumed to cover
pub const BASELINE_SCRIPT: &str = "Latin";

/// Default number of sampled code points that must resolve
pub const DEFAULT_SAMPLE_THRESHOLD: usize = 3;

/// Candidate script with the block it lives in and the code points sampled
#[derive(Debug, Clone)]
pub struct ScriptSample {
    pub name: &'static str,
    pub block: RangeInclusive<u32>,
    pub samples: &'static [u32],
}

/// Scripts tested, in the order they are reported
pub const SCRIPT_SAMPLES: &[ScriptSample] = &[
    ScriptSample {
        name: "Cyrillic",
        block: 0x0400..=0x04FF,
        samples: &[0x0410, 0x0411, 0x0412, 0x0416, 0x0430, 0x0431, 0x0432],
    },
    ScriptSample {
        name: "Greek",
        block: 0x0370..=0x03FF,
        samples: &[0x0391, 0x0392, 0x0393, 0x0394, 0x03B1, 0x03B2, 0x03B3],
    },
    ScriptSample {
        name: "Hebrew",
        block: 0x0590..=0x05FF,
        samples: &[0x05D0, 0x05D1, 0x05D2, 0x05D3, 0x05D4],
    },
    ScriptSample {
        name: "Arabic",
        block: 0x0600..=0x06FF,
        samples: &[0x0627, 0x0628, 0x062A, 0x062B, 0x062C],
    },
    ScriptSample {
        name: "Chinese",
        block: 0x4E00..=0x9FFF,
        samples: &[0x4E00, 0x4E2D, 0x4EBA, 0x5927, 0x56FD],
    },
    ScriptSample {
        name: "Japanese",
        block: 0x3040..=0x309F,
        samples: &[0x3042, 0x3044, 0x3046, 0x3048, 0x304A],
    },
    ScriptSample {
        name: "Korean",
        block: 0xAC00..=0xD7AF,
        samples: &[0xAC00, 0xB098, 0xB2E4, 0xB77C, 0xD55C],
    },
];

/// Glyphs for the sampled code points, merged from the Unicode cmap subtables
///
/// Only the code points listed in [`SCRIPT_SAMPLES`] are looked up, so a
/// subtable declaring huge ranges costs no more than a small one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterMap {
    glyphs: BTreeMap<u32, u16>,
}

impl CharacterMap {
    /// Build from the font's `cmap`; `None` if the font has no usable one
    pub fn from_handle(handle: &FontHandle<'_>) -> Option<Self> {
        let cmap = handle.cmap()?;
        let subtables: Vec<_> = cmap.subtables.into_iter().filter(|s| s.is_unicode()).collect();

        let mut glyphs = BTreeMap::new();
        let sampled = SCRIPT_SAMPLES.iter().flat_map(|script| script.samples);
        for &code_point in sampled {
            let glyph = subtables
                .iter()
                .filter_map(|subtable| subtable.glyph_index(code_point))
                .find(|glyph| glyph.0 != 0);
            if let Some(glyph) = glyph {
                glyphs.insert(code_point, glyph.0);
            }
        }
        Some(Self { glyphs })
    }

    /// Glyph mapped to a code point, if any
    pub fn glyph(&self, code_point: u32) -> Option<u16> {
        self.glyphs.get(&code_point).copied()
    }

    /// Whether a code point maps to a real glyph
    pub fn contains(&self, code_point: u32) -> bool {
        self.glyphs.contains_key(&code_point)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl FromIterator<(u32, u16)> for CharacterMap {
    fn from_iter<I: IntoIterator<Item = (u32, u16)>>(iter: I) -> Self {
        Self {
            glyphs: iter.into_iter().filter(|&(_, glyph)| glyph != 0).collect(),
        }
    }
}

/// Scripts the character map covers, always starting with Latin
pub fn detect(map: Option<&CharacterMap>, threshold: usize) -> IndexSet<String> {
    let mut scripts = IndexSet::new();
    scripts.insert(BASELINE_SCRIPT.to_string());

    let Some(map) = map else {
        return scripts;
    };
    for script in SCRIPT_SAMPLES {
        let hits = script.samples.iter().filter(|&&cp| map.contains(cp)).count();
        if hits >= threshold {
            tracing::debug!(
                "{} detected: {}/{} samples",
                script.name,
                hits,
                script.samples.len()
            );
            scripts.insert(script.name.to_string());
        }
    }
    scripts
}
