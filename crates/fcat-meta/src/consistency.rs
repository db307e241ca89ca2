//! Final consistency pass
//!
//! Never fails: every invariant violation is corrected in place and noted
//! in the record's warnings.

use crate::identity::{DEFAULT_STYLE, DEFAULT_WEIGHT};
use crate::record::ProcessedFontMetadata;
use crate::scripts::BASELINE_SCRIPT;
use crate::tags::DEFAULT_CATEGORY;

/// Family used when neither the font nor its filename provide one
pub const UNKNOWN_FAMILY: &str = "Unknown";

/// Correct the record so downstream consumers can rely on it
pub fn validate(mut record: ProcessedFontMetadata, stem: &str) -> ProcessedFontMetadata {
    let mut corrections = Vec::new();

    let family = record.family.trim();
    if family.is_empty() {
        let replacement = if stem.trim().is_empty() { UNKNOWN_FAMILY } else { stem.trim() };
        corrections.push(format!("Empty family name replaced with '{replacement}'"));
        record.family = replacement.to_string();
    } else if family.len() != record.family.len() {
        record.family = family.to_string();
    }

    if record.style.trim().is_empty() {
        corrections.push(format!("Empty style replaced with '{DEFAULT_STYLE}'"));
        record.style = DEFAULT_STYLE.to_string();
    }

    if !(1..=1000).contains(&record.weight) {
        corrections.push(format!(
            "Weight {} out of range; reset to {DEFAULT_WEIGHT}",
            record.weight
        ));
        record.weight = DEFAULT_WEIGHT;
    }

    if record.category.is_empty() {
        corrections.push(format!("No category inferred; defaulting to {DEFAULT_CATEGORY}"));
        record.category.insert(DEFAULT_CATEGORY.to_string());
    }

    if record.languages.is_empty() {
        corrections.push(format!("No languages detected; defaulting to {BASELINE_SCRIPT}"));
        record.languages.insert(BASELINE_SCRIPT.to_string());
    }

    for correction in &corrections {
        tracing::warn!("{}: {}", record.filename, correction);
    }
    record.warnings.extend(corrections);
    record
}
