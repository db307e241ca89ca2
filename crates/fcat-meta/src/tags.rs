//! Descriptive style tags and category inference
//!
//! Pure functions over already-extracted data.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::axes;
use crate::record::{OpenTypeFeatureDescriptor, VariableAxisDescriptor};

/// Weight axis span that earns the "Wide Weight Range" tag
pub const WIDE_WEIGHT_RANGE: f32 = 700.0;

/// Category used when nothing else applies
pub const DEFAULT_CATEGORY: &str = "Sans";

static MONOSPACE: Lazy<FamilyPattern> = Lazy::new(|| FamilyPattern::new("(?i)mono|code|terminal"));
static DISPLAY: Lazy<FamilyPattern> = Lazy::new(|| FamilyPattern::new("(?i)display|title|headline"));
static SCRIPT: Lazy<FamilyPattern> = Lazy::new(|| FamilyPattern::new("(?i)script|handwriting|brush"));
static SERIF: Lazy<FamilyPattern> = Lazy::new(|| FamilyPattern::new("(?i)serif"));
static SANS: Lazy<FamilyPattern> = Lazy::new(|| FamilyPattern::new("(?i)sans"));
static SLAB: Lazy<FamilyPattern> = Lazy::new(|| FamilyPattern::new("(?i)slab"));

/// Family name pattern; one that fails to compile matches nothing
struct FamilyPattern(Option<Regex>);

impl FamilyPattern {
    fn new(source: &str) -> Self {
        match Regex::new(source) {
            Ok(regex) => Self(Some(regex)),
            Err(e) => {
                tracing::error!("Family pattern {:?} failed to compile: {}", source, e);
                Self(None)
            }
        }
    }

    fn is_match(&self, family: &str) -> bool {
        self.0.as_ref().is_some_and(|regex| regex.is_match(family))
    }
}

/// Feature title fragments and the tag they imply
const FEATURE_TAGS: &[(&str, &str)] = &[
    ("ligature", "Ligatures"),
    ("stylistic", "Stylistic Sets"),
    ("swash", "Swashes"),
    ("small cap", "Small Caps"),
];

/// Style tags implied by the family name, features and axes
pub fn generate(
    family: &str,
    features: &[OpenTypeFeatureDescriptor],
    is_variable: bool,
    axes: &[VariableAxisDescriptor],
) -> IndexSet<String> {
    let mut tags = IndexSet::new();

    for (fragment, tag) in FEATURE_TAGS {
        if features
            .iter()
            .any(|feature| feature.human_title.to_lowercase().contains(fragment))
        {
            tags.insert(tag.to_string());
        }
    }

    if MONOSPACE.is_match(family) {
        tags.insert("Monospace".to_string());
    }
    if DISPLAY.is_match(family) {
        tags.insert("Display".to_string());
    }
    if SCRIPT.is_match(family) {
        tags.insert("Script".to_string());
    }
    let sans = SANS.is_match(family);
    if SERIF.is_match(family) && !sans {
        tags.insert("Serif".to_string());
    }
    if sans {
        tags.insert("Sans Serif".to_string());
    }
    if SLAB.is_match(family) {
        tags.insert("Slab Serif".to_string());
    }

    if is_variable {
        tags.insert("Variable".to_string());
    }
    if axes::weight_range(axes).is_some_and(|range| range >= WIDE_WEIGHT_RANGE) {
        tags.insert("Wide Weight Range".to_string());
    }

    tags
}

/// Catalog categories implied by style tags; may be empty
pub fn categorize(style_tags: &IndexSet<String>) -> IndexSet<String> {
    const CATEGORY_FOR_TAG: &[(&str, &str)] = &[
        ("Serif", "Serif"),
        ("Sans Serif", "Sans"),
        ("Slab Serif", "Slab"),
        ("Monospace", "Mono"),
        ("Display", "Display"),
        ("Script", "Script"),
    ];
    CATEGORY_FOR_TAG
        .iter()
        .filter(|(tag, _)| style_tags.contains(*tag))
        .map(|(_, category)| category.to_string())
        .collect()
}
