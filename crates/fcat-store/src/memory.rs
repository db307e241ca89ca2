//! In-memory stores

use std::collections::BTreeMap;
use std::sync::RwLock;

use fcat_meta::{ProcessedFontMetadata, RawFontBuffer};

use crate::store::{BinaryStore, MetadataStore};
use crate::{Result, StoreError};

/// Both stores in memory; share it behind an `Arc` to use it for both roles
#[derive(Debug, Default)]
pub struct MemoryStore {
    binaries: RwLock<BTreeMap<String, RawFontBuffer>>,
    records: RwLock<BTreeMap<String, ProcessedFontMetadata>>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a record but keep its binary
    pub fn forget_record(&self, id: &str) -> Result<bool> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        Ok(records.remove(id).is_some())
    }
}

impl BinaryStore for MemoryStore {
    fn put(&self, id: &str, buffer: &RawFontBuffer) -> Result<()> {
        let mut binaries = self.binaries.write().map_err(|_| StoreError::Poisoned)?;
        binaries.insert(id.to_string(), buffer.clone());
        Ok(())
    }

    fn fetch(&self, id: &str) -> Result<Option<RawFontBuffer>> {
        let binaries = self.binaries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(binaries.get(id).cloned())
    }

    fn ids(&self) -> Result<Vec<String>> {
        let binaries = self.binaries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(binaries.keys().cloned().collect())
    }
}

impl MetadataStore for MemoryStore {
    fn put(&self, id: &str, record: &ProcessedFontMetadata) -> Result<()> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records.insert(id.to_string(), record.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<ProcessedFontMetadata>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(id).cloned())
    }

    fn ids(&self) -> Result<Vec<String>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.keys().cloned().collect())
    }
}
