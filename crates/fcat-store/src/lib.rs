//! fcat Store - Font Binary and Metadata Storage
//!
//! Storage collaborators of the metadata pipeline:
//! - [`BinaryStore`] keeps the uploaded font files
//! - [`MetadataStore`] keeps the processed records
//! - [`UploadHandler`] runs the pipeline on upload and repairs stale records
//!
//! # Example
//! ```rust,ignore
//! let handler = UploadHandler::open_library("library", Pipeline::default())?;
//! let ingested = handler.ingest("Inter-Bold.ttf", std::fs::read("Inter-Bold.ttf")?)?;
//! let report = handler.sweep(SweepMode::NeedsRepair)?;
//! ```

pub mod store;
pub mod memory;
pub mod dir;
pub mod upload;

pub use store::{BinaryStore, MetadataStore, font_id};
pub use memory::MemoryStore;
pub use dir::{DirBinaryStore, JsonMetadataStore};
pub use upload::{Ingested, SweepMode, SweepReport, UploadHandler};

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid font id: {0:?}")]
    InvalidId(String),

    #[error("No stored binary for {0}")]
    MissingBinary(String),

    #[error("Store lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Meta(#[from] fcat_meta::MetaError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
