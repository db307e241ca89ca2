//! Upload handling and repair sweeps

use std::path::Path;
use std::sync::Arc;

use fcat_meta::{Pipeline, ProcessedFontMetadata, RawFontBuffer};
use serde::Serialize;

use crate::dir::{DirBinaryStore, JsonMetadataStore};
use crate::store::{BinaryStore, MetadataStore, font_id};
use crate::{Result, StoreError};

/// Library subdirectory holding font binaries
pub const FONTS_DIR: &str = "fonts";

/// Library subdirectory holding metadata records
pub const METADATA_DIR: &str = "metadata";

/// Which stored fonts a sweep re-processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepMode {
    /// Records with warnings, a different processing version, or none at all
    #[default]
    NeedsRepair,
    /// Every stored binary
    All,
}

/// Outcome of a sweep, by font id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub reprocessed: Vec<String>,
    pub skipped: Vec<String>,
    /// Id and error message
    pub failed: Vec<(String, String)>,
}

impl SweepReport {
    /// Number of fonts the sweep looked at
    pub fn total(&self) -> usize {
        self.reprocessed.len() + self.skipped.len() + self.failed.len()
    }
}

/// A stored upload
#[derive(Debug, Clone)]
pub struct Ingested {
    pub id: String,
    pub record: ProcessedFontMetadata,
}

/// Runs the pipeline on uploads and keeps both stores in step
#[derive(Debug)]
pub struct UploadHandler<B, M> {
    pipeline: Pipeline,
    binaries: B,
    metadata: M,
}

impl UploadHandler<DirBinaryStore, JsonMetadataStore> {
    /// Handler over a library directory with `fonts/` and `metadata/` inside
    pub fn open_library(root: impl AsRef<Path>, pipeline: Pipeline) -> Result<Self> {
        let root = root.as_ref();
        Ok(Self::new(
            pipeline,
            DirBinaryStore::open(root.join(FONTS_DIR))?,
            JsonMetadataStore::open(root.join(METADATA_DIR))?,
        ))
    }
}

impl<B: BinaryStore, M: MetadataStore> UploadHandler<B, M> {
    /// Handler over explicit stores
    pub fn new(pipeline: Pipeline, binaries: B, metadata: M) -> Self {
        Self {
            pipeline,
            binaries,
            metadata,
        }
    }

    /// Pipeline used for uploads and sweeps
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Store holding font binaries
    pub fn binaries(&self) -> &B {
        &self.binaries
    }

    /// Store holding metadata records
    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    /// Process and store an upload
    ///
    /// Nothing is stored when the pipeline rejects the file. If the record
    /// cannot be written the binary stays stored without one, and the next
    /// [`SweepMode::NeedsRepair`] sweep rebuilds it.
    pub fn ingest(&self, filename: &str, data: impl Into<Arc<[u8]>>) -> Result<Ingested> {
        let id = font_id(filename)?;
        let buffer = RawFontBuffer::from_bytes(data, filename);
        let record = self.pipeline.process(&buffer)?;

        self.binaries.put(&id, &buffer)?;
        if let Err(e) = self.metadata.put(&id, &record) {
            tracing::warn!("Stored {} without a metadata record: {}", id, e);
            return Err(e);
        }

        tracing::info!(
            "Ingested {} as {}: {} {} ({} warnings)",
            filename,
            id,
            record.family,
            record.style,
            record.warnings.len()
        );
        Ok(Ingested { id, record })
    }

    /// Re-process stored binaries and rewrite their records
    pub fn sweep(&self, mode: SweepMode) -> Result<SweepReport> {
        let mut report = SweepReport::default();

        for id in self.binaries.ids()? {
            if !self.needs_repair(&id, mode) {
                report.skipped.push(id);
                continue;
            }
            match self.repair(&id) {
                Ok(record) => {
                    tracing::debug!("Re-processed {} ({} warnings)", id, record.warnings.len());
                    report.reprocessed.push(id);
                }
                Err(e) => {
                    tracing::warn!("Could not re-process {}: {}", id, e);
                    report.failed.push((id, e.to_string()));
                }
            }
        }

        tracing::info!(
            "Sweep finished: {} re-processed, {} skipped, {} failed",
            report.reprocessed.len(),
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }

    fn needs_repair(&self, id: &str, mode: SweepMode) -> bool {
        if mode == SweepMode::All {
            return true;
        }
        match self.metadata.get(id) {
            Ok(Some(record)) => {
                record.has_warnings()
                    || record.processing_version != self.pipeline.config().processing_version
            }
            Ok(None) => true,
            Err(e) => {
                tracing::warn!("Stored record for {} is unreadable: {}", id, e);
                true
            }
        }
    }

    fn repair(&self, id: &str) -> Result<ProcessedFontMetadata> {
        let stored = self
            .binaries
            .fetch(id)?
            .ok_or_else(|| StoreError::MissingBinary(id.to_string()))?;

        // keep the filename the record was first stored with
        let buffer = match self.metadata.get(id) {
            Ok(Some(previous)) => {
                RawFontBuffer::new(stored.shared_data(), previous.filename, stored.declared_size())
            }
            _ => stored,
        };

        let record = self.pipeline.reprocess(&buffer)?;
        self.metadata.put(id, &record)?;
        Ok(record)
    }
}
