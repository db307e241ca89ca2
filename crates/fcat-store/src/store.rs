//! Store interfaces

use std::sync::Arc;

use fcat_meta::{ProcessedFontMetadata, RawFontBuffer};

use crate::{Result, StoreError};

/// Raw font files, keyed by font id
pub trait BinaryStore: Send + Sync {
    /// Store a binary, replacing any previous one with the same id
    fn put(&self, id: &str, buffer: &RawFontBuffer) -> Result<()>;

    /// Fetch a stored binary
    fn fetch(&self, id: &str) -> Result<Option<RawFontBuffer>>;

    /// Every stored id, sorted
    fn ids(&self) -> Result<Vec<String>>;
}

/// Processed metadata records, keyed by font id
pub trait MetadataStore: Send + Sync {
    fn put(&self, id: &str, record: &ProcessedFontMetadata) -> Result<()>;

    fn get(&self, id: &str) -> Result<Option<ProcessedFontMetadata>>;

    /// Every stored id, sorted
    fn ids(&self) -> Result<Vec<String>>;
}

impl<T: BinaryStore + ?Sized> BinaryStore for Arc<T> {
    fn put(&self, id: &str, buffer: &RawFontBuffer) -> Result<()> {
        (**self).put(id, buffer)
    }

    fn fetch(&self, id: &str) -> Result<Option<RawFontBuffer>> {
        (**self).fetch(id)
    }

    fn ids(&self) -> Result<Vec<String>> {
        (**self).ids()
    }
}

impl<T: MetadataStore + ?Sized> MetadataStore for Arc<T> {
    fn put(&self, id: &str, record: &ProcessedFontMetadata) -> Result<()> {
        (**self).put(id, record)
    }

    fn get(&self, id: &str) -> Result<Option<ProcessedFontMetadata>> {
        (**self).get(id)
    }

    fn ids(&self) -> Result<Vec<String>> {
        (**self).ids()
    }
}

/// Font id for an uploaded filename
///
/// The id is the basename with every character outside `[A-Za-z0-9._-]`
/// replaced by `_`, so it is safe to use as a file name.
pub fn font_id(filename: &str) -> Result<String> {
    let basename = filename.rsplit(['/', '\\']).next().unwrap_or(filename).trim();
    let id: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if id.is_empty() || id.starts_with('.') {
        return Err(StoreError::InvalidId(filename.to_string()));
    }
    Ok(id)
}

/// Reject ids that could escape a store directory
pub(crate) fn check_id(id: &str) -> Result<()> {
    match font_id(id) {
        Ok(normalized) if normalized == id => Ok(()),
        _ => Err(StoreError::InvalidId(id.to_string())),
    }
}
