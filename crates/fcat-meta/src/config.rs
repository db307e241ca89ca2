//! Pipeline configuration

use std::time::Duration;

use serde::Deserialize;

use crate::rules::{RuleSpec, RuleTable};
use crate::scripts::DEFAULT_SAMPLE_THRESHOLD;
use crate::{PROCESSING_VERSION, Result};

/// Pipeline configuration options
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Sampled code points that must map before a script counts as covered
    pub script_threshold: usize,

    /// Wall-clock limit for one font; `None` waits indefinitely
    pub timeout: Option<Duration>,

    /// Filename corrections, evaluated in order
    pub rules: RuleTable,

    /// Revision stamped on every record
    pub processing_version: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            script_threshold: DEFAULT_SAMPLE_THRESHOLD,
            timeout: None,
            rules: RuleTable::builtin(),
            processing_version: PROCESSING_VERSION.to_string(),
        }
    }
}

/// On-disk form of [`PipelineConfig`]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
struct ConfigFile {
    script_threshold: Option<usize>,
    timeout_ms: Option<u64>,
    processing_version: Option<String>,
    filename_rules: Vec<RuleSpec>,
    replace_builtin_rules: bool,
}

impl PipelineConfig {
    /// Parse a JSON configuration document; omitted keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(json)?;
        let defaults = Self::default();

        let user_rules = RuleTable::from_specs(&file.filename_rules)?;
        let rules = if file.replace_builtin_rules {
            user_rules
        } else {
            let mut rules = defaults.rules;
            rules.prepend(user_rules);
            rules
        };

        Ok(Self {
            script_threshold: file.script_threshold.unwrap_or(defaults.script_threshold).max(1),
            timeout: file.timeout_ms.map(Duration::from_millis),
            rules,
            processing_version: file.processing_version.unwrap_or(defaults.processing_version),
        })
    }

    /// Set the per-font time limit
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the filename rule table
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = rules;
        self
    }
}
