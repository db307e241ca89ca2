//! Pipeline input and output records

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::features::FeatureKind;
use crate::signature::FontFormat;

/// Immutable upload: bytes plus the filename and size the client claimed
#[derive(Debug, Clone)]
pub struct RawFontBuffer {
    data: Arc<[u8]>,
    filename: String,
    declared_size: u64,
}

impl RawFontBuffer {
    /// Buffer with an explicit declared size
    pub fn new(data: impl Into<Arc<[u8]>>, filename: impl Into<String>, declared_size: u64) -> Self {
        Self {
            data: data.into(),
            filename: filename.into(),
            declared_size,
        }
    }

    /// Buffer whose declared size is its actual length
    pub fn from_bytes(data: impl Into<Arc<[u8]>>, filename: impl Into<String>) -> Self {
        let data = data.into();
        let declared_size = data.len() as u64;
        Self::new(data, filename, declared_size)
    }

    /// Raw bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Filename as uploaded
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Size the uploader claimed
    pub fn declared_size(&self) -> u64 {
        self.declared_size
    }

    /// Filename without directories or extension
    pub fn file_stem(&self) -> String {
        file_stem(&self.filename)
    }

    /// Shared handle to the bytes, without copying them
    pub fn shared_data(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }
}

/// Filename without directories or extension
pub fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().trim().to_string())
        .unwrap_or_default()
}

/// Variation axis exposed to the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableAxisDescriptor {
    pub human_name: String,
    pub tag: String,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

/// OpenType feature with its display title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTypeFeatureDescriptor {
    pub tag: String,
    pub human_title: String,
    pub kind: FeatureKind,
}

/// Vertical metrics in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontMetrics {
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_height: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_height: Option<i16>,
}

/// Credits and licensing strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignerInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl DesignerInfo {
    pub fn is_empty(&self) -> bool {
        self.designer.is_none()
            && self.manufacturer.is_none()
            && self.designer_url.is_none()
            && self.vendor_url.is_none()
            && self.license.is_none()
            && self.license_url.is_none()
            && self.copyright.is_none()
            && self.version.is_none()
    }
}

/// Normalized metadata for one uploaded font
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedFontMetadata {
    pub family: String,
    pub style: String,
    pub weight: u16,
    pub is_italic: bool,
    pub is_variable: bool,
    pub variable_axes: Vec<VariableAxisDescriptor>,
    pub open_type_features: Vec<OpenTypeFeatureDescriptor>,
    pub languages: IndexSet<String>,
    pub style_tags: IndexSet<String>,
    pub category: IndexSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_metrics: Option<FontMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designer_info: Option<DesignerInfo>,
    pub warnings: Vec<String>,
    pub processing_version: String,
    pub format: FontFormat,
    pub filename: String,
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph_count: Option<u16>,
}

impl ProcessedFontMetadata {
    /// Stylistic sets and alternates
    pub fn alternates(&self) -> impl Iterator<Item = &OpenTypeFeatureDescriptor> {
        self.open_type_features
            .iter()
            .filter(|feature| feature.kind == FeatureKind::Alternate)
    }

    /// Every feature that is not an alternate
    pub fn other_features(&self) -> impl Iterator<Item = &OpenTypeFeatureDescriptor> {
        self.open_type_features
            .iter()
            .filter(|feature| feature.kind == FeatureKind::Other)
    }

    /// Whether any stage degraded
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
