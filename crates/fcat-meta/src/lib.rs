//! fcat Meta - Font Metadata Pipeline
//!
//! Turns a raw font upload (TTF, OTF, WOFF, WOFF2) into a normalized
//! metadata record for the catalog:
//! - Signature sniffing and container decoding
//! - Family, style, weight and italic detection with filename rules
//! - Variable axes and OpenType feature extraction
//! - Script coverage sampling over the character map
//! - Descriptive style tags and category inference
//! - Final consistency pass that guarantees a usable record
//!
//! # Example
//! ```rust,ignore
//! let bytes = std::fs::read("Inter-Bold.ttf")?;
//! let len = bytes.len() as u64;
//! let meta = fcat_meta::process_font(bytes, "Inter-Bold.ttf", len)?;
//! println!("{} {} {}", meta.family, meta.style, meta.weight);
//! ```

pub mod signature;
pub mod reader;
pub mod identity;
pub mod rules;
pub mod axes;
pub mod features;
pub mod scripts;
pub mod tags;
pub mod consistency;
pub mod record;
pub mod config;
pub mod pipeline;

pub use signature::FontFormat;
pub use reader::{FontHandle, SfntData};
pub use rules::{FilenameRule, RuleSpec, RuleTable, StyleOverride};
pub use features::FeatureKind;
pub use record::{
    DesignerInfo, FontMetrics, OpenTypeFeatureDescriptor, ProcessedFontMetadata, RawFontBuffer,
    VariableAxisDescriptor,
};
pub use config::PipelineConfig;
pub use pipeline::{Pipeline, process_font};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pipeline revision stamped on every record produced with the default configuration
pub const PROCESSING_VERSION: &str = concat!("fcat-meta/", env!("CARGO_PKG_VERSION"));

/// Metadata pipeline error types
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    #[error("Buffer too small to be a font: {len} bytes")]
    BufferTooSmall { len: usize },

    #[error("Invalid font signature: {}", hex_signature(.0))]
    InvalidSignature([u8; 4]),

    #[error("Failed to parse font: {0}")]
    UnparsableFont(String),

    #[error("Invalid filename rule: {0}")]
    InvalidRule(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl MetaError {
    /// Whether this error aborts processing for the file
    pub fn is_fatal(&self) -> bool {
        matches!(self, MetaError::BufferTooSmall { .. } | MetaError::InvalidSignature(_))
    }
}

fn hex_signature(bytes: &[u8; 4]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub type Result<T> = std::result::Result<T, MetaError>;
