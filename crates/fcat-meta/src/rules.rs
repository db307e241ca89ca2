//! Filename correction rules
//!
//! Some families ship name tables that disagree with their filenames, and
//! for those the filename is the better source. Corrections are data: a
//! rule pairs a family pattern with a filename pattern and says how the
//! captured groups map onto style, weight and italic.
//!
//! Filename patterns may use these named groups:
//! - `style`: style word, used by [`StyleOverride::Capture`] and `weightMap`
//! - `weight`: numeric weight class
//! - `italic`: any non-empty match marks the face italic

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::identity::{self, DEFAULT_STYLE, Identity};
use crate::{MetaError, Result};

/// How a matching rule rewrites the style name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleOverride {
    /// Title-cased `style` group from the filename
    Capture,
    /// Fixed style name
    Fixed(String),
}

/// Serializable form of a rule, as found in configuration files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    pub family_match: String,
    pub filename_pattern: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub weight_map: BTreeMap<String, u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_override: Option<StyleOverride>,
}

/// Compiled rule
#[derive(Debug, Clone)]
pub struct FilenameRule {
    family_match: Regex,
    filename_pattern: Regex,
    weight_map: BTreeMap<String, u16>,
    style_override: Option<StyleOverride>,
}

impl FilenameRule {
    /// Compile the patterns of a rule definition
    pub fn compile(spec: &RuleSpec) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| MetaError::InvalidRule(format!("{pattern}: {e}")))
        };
        Ok(Self {
            family_match: compile(&spec.family_match)?,
            filename_pattern: compile(&spec.filename_pattern)?,
            weight_map: spec
                .weight_map
                .iter()
                .map(|(word, weight)| (word.to_lowercase(), *weight))
                .collect(),
            style_override: spec.style_override.clone(),
        })
    }

    /// Rewrite the identity if both the family and the filename match
    pub fn apply(&self, identity: &mut Identity, filename: &str) -> bool {
        if !self.family_match.is_match(&identity.family) {
            return false;
        }
        let basename = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
        let Some(caps) = self.filename_pattern.captures(basename) else {
            return false;
        };

        let word = caps
            .name("style")
            .map(|m| m.as_str())
            .filter(|word| !word.is_empty());
        let italic = caps.name("italic").is_some_and(|m| !m.as_str().is_empty());

        let weight = caps
            .name("weight")
            .and_then(|m| m.as_str().parse::<u16>().ok())
            .or_else(|| word.and_then(|word| self.weight_map.get(&word.to_lowercase()).copied()))
            .or_else(|| word.and_then(identity::weight_from_style));
        if let Some(weight) = weight {
            identity.weight = weight;
        }

        let base = match &self.style_override {
            Some(StyleOverride::Capture) => Some(word.map(title_case).unwrap_or_else(|| DEFAULT_STYLE.to_string())),
            Some(StyleOverride::Fixed(style)) => Some(style.clone()),
            None => None,
        };
        if let Some(base) = base {
            identity.style = base;
        }
        if italic {
            identity.is_italic = true;
            if !identity::style_is_italic(&identity.style) {
                identity.style = if identity.style == DEFAULT_STYLE {
                    "Italic".to_string()
                } else {
                    format!("{} Italic", identity.style)
                };
            }
        }
        true
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Ordered rule list; the first matching rule wins
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<FilenameRule>,
}

static BUILTIN: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::from_specs(&builtin_specs()).unwrap_or_else(|e| {
        tracing::error!("Built-in filename rules failed to compile: {}", e);
        RuleTable::default()
    })
});

impl RuleTable {
    /// Compile rule definitions, keeping their order
    pub fn from_specs(specs: &[RuleSpec]) -> Result<Self> {
        let rules = specs.iter().map(FilenameRule::compile).collect::<Result<_>>()?;
        Ok(Self { rules })
    }

    /// Corrections for the families known to need them
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Put `rules` ahead of the current ones
    pub fn prepend(&mut self, rules: RuleTable) {
        let mut merged = rules.rules;
        merged.append(&mut self.rules);
        self.rules = merged;
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply the first matching rule, returning its index
    pub fn apply(&self, identity: &mut Identity, filename: &str) -> Option<usize> {
        self.rules
            .iter()
            .position(|rule| rule.apply(identity, filename))
    }
}

/// Built-in rule definitions
pub fn builtin_specs() -> Vec<RuleSpec> {
    vec![
        RuleSpec {
            family_match: r"(?i)^jost\b".into(),
            filename_pattern: r"(?i)^jost\*?[-_ ]*(?P<weight>\d{3})?[-_ ]*(?P<style>hairline|thin|light|book|regular|medium|semibold|semi|bold|heavy|black)?[-_ ]*(?P<italic>italic)?\.".into(),
            weight_map: BTreeMap::from([
                ("hairline".to_string(), 100),
                ("thin".to_string(), 200),
                ("light".to_string(), 300),
                ("book".to_string(), 400),
                ("regular".to_string(), 400),
                ("medium".to_string(), 500),
                ("semi".to_string(), 600),
                ("semibold".to_string(), 600),
                ("bold".to_string(), 700),
                ("heavy".to_string(), 800),
                ("black".to_string(), 900),
            ]),
            style_override: Some(StyleOverride::Capture),
        },
        RuleSpec {
            family_match: r"(?i)^basteleur\b".into(),
            filename_pattern: r"(?i)^basteleur[-_ ]*(?P<style>moonlight|bold)".into(),
            weight_map: BTreeMap::from([
                ("moonlight".to_string(), 300),
                ("bold".to_string(), 700),
            ]),
            style_override: Some(StyleOverride::Capture),
        },
        RuleSpec {
            family_match: r"(?i)^outward\b".into(),
            filename_pattern: r"(?i)^outward[-_ ]*(?P<style>block|borders|round)".into(),
            weight_map: BTreeMap::new(),
            style_override: Some(StyleOverride::Capture),
        },
    ]
}
