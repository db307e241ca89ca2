//! Metadata pipeline
//!
//! Signature check, container decoding, then the extractors in order.
//! Only the signature check can fail the run; every later problem becomes
//! a warning on the record and a documented fallback value.

use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::identity::Identity;
use crate::reader::{FontHandle, SfntData};
use crate::record::{ProcessedFontMetadata, RawFontBuffer};
use crate::scripts::CharacterMap;
use crate::signature::{self, FontFormat};
use crate::{Result, axes, consistency, features, identity, scripts, tags};

/// Reusable, stateless pipeline; cheap to clone and share across threads
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: Arc<PipelineConfig>,
}

impl Pipeline {
    /// Pipeline over a configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one upload, honoring the configured timeout
    pub fn process(&self, buffer: &RawFontBuffer) -> Result<ProcessedFontMetadata> {
        match self.config.timeout {
            Some(timeout) => self.process_with_timeout(buffer, timeout),
            None => {
                let format = signature::validate(buffer.data())?;
                Ok(self.run(buffer, format))
            }
        }
    }

    /// Process one upload, giving up on table parsing after `timeout`
    ///
    /// A run that does not finish in time is reported like an unreadable
    /// font: the record falls back to filename-derived values.
    pub fn process_with_timeout(
        &self,
        buffer: &RawFontBuffer,
        timeout: Duration,
    ) -> Result<ProcessedFontMetadata> {
        let format = signature::validate(buffer.data())?;

        let (tx, rx) = mpsc::channel();
        let worker = self.clone();
        let job = buffer.clone();
        let spawned = thread::Builder::new()
            .name("fcat-meta-worker".into())
            .spawn(move || {
                let _ = tx.send(worker.run(&job, format));
            });
        if let Err(e) = spawned {
            tracing::warn!("Could not spawn parse worker ({}); processing inline", e);
            return Ok(self.run(buffer, format));
        }

        let reason = match rx.recv_timeout(timeout) {
            Ok(record) => return Ok(record),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                format!("parsing timed out after {} ms", timeout.as_millis())
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => "parse worker stopped unexpectedly".to_string(),
        };
        tracing::warn!("{}: {}", buffer.filename(), reason);

        let mut warnings = size_warnings(buffer);
        Ok(self.fallback(buffer, format, &reason, &mut warnings))
    }

    /// Process independent uploads in parallel; results keep input order
    pub fn process_batch(&self, buffers: &[RawFontBuffer]) -> Vec<Result<ProcessedFontMetadata>> {
        buffers.par_iter().map(|buffer| self.process(buffer)).collect()
    }

    /// Re-process a stored binary with the current configuration
    pub fn reprocess(&self, buffer: &RawFontBuffer) -> Result<ProcessedFontMetadata> {
        tracing::info!("Re-processing {}", buffer.filename());
        self.process(buffer)
    }

    fn run(&self, buffer: &RawFontBuffer, format: FontFormat) -> ProcessedFontMetadata {
        tracing::debug!(
            "Processing {} ({:?}, {} bytes)",
            buffer.filename(),
            format,
            buffer.data().len()
        );
        let mut warnings = size_warnings(buffer);

        let sfnt = match SfntData::decode(buffer.data(), format) {
            Ok(sfnt) => sfnt,
            Err(e) => return self.fallback(buffer, format, &e.to_string(), &mut warnings),
        };
        match sfnt.open() {
            Ok(handle) => self.extract(&handle, buffer, format, warnings),
            Err(e) => self.fallback(buffer, format, &e.to_string(), &mut warnings),
        }
    }

    fn extract(
        &self,
        handle: &FontHandle<'_>,
        buffer: &RawFontBuffer,
        format: FontFormat,
        mut warnings: Vec<String>,
    ) -> ProcessedFontMetadata {
        let stem = buffer.file_stem();

        let mut identity = identity::extract(handle, &stem, &mut warnings);
        self.apply_rules(&mut identity, buffer.filename());

        let axis_info = axes::extract(handle);
        if !axis_info.has_fvar && handle.has_raw_table(b"fvar") {
            warnings.push("fvar table unreadable; font treated as static".to_string());
        }
        for tag in &axis_info.dropped {
            warnings.push(format!("Dropped degenerate variation axis '{tag}'"));
        }

        let feature_info = features::extract(handle);
        if !feature_info.has_gsub && handle.has_raw_table(b"GSUB") {
            warnings.push("GSUB table unreadable; substitution features skipped".to_string());
        }
        if !feature_info.has_gpos && handle.has_raw_table(b"GPOS") {
            warnings.push("GPOS table unreadable; positioning features skipped".to_string());
        }
        if feature_info.features.is_empty() {
            warnings.push("No OpenType features found".to_string());
        }

        let char_map = CharacterMap::from_handle(handle);
        if char_map.is_none() {
            if handle.has_raw_table(b"cmap") {
                warnings.push("cmap table unreadable; languages default to Latin".to_string());
            } else {
                warnings.push("No character map; languages default to Latin".to_string());
            }
        }
        let languages = scripts::detect(char_map.as_ref(), self.config.script_threshold);

        let is_variable = axis_info.is_variable();
        let style_tags = tags::generate(
            &identity.family,
            &feature_info.features,
            is_variable,
            &axis_info.axes,
        );
        let category = tags::categorize(&style_tags);

        for warning in &warnings {
            tracing::warn!("{}: {}", buffer.filename(), warning);
        }

        let record = ProcessedFontMetadata {
            family: identity.family,
            style: identity.style,
            weight: identity.weight,
            is_italic: identity.is_italic,
            is_variable,
            variable_axes: axis_info.axes,
            open_type_features: feature_info.features,
            languages,
            style_tags,
            category,
            font_metrics: Some(handle.metrics()),
            designer_info: handle.designer_info(),
            warnings,
            processing_version: self.config.processing_version.clone(),
            format,
            filename: buffer.filename().to_string(),
            file_size: buffer.declared_size(),
            glyph_count: Some(handle.glyph_count()),
        };
        consistency::validate(record, &stem)
    }

    fn fallback(
        &self,
        buffer: &RawFontBuffer,
        format: FontFormat,
        reason: &str,
        warnings: &mut Vec<String>,
    ) -> ProcessedFontMetadata {
        let stem = buffer.file_stem();
        let warning = format!("Could not read font tables ({reason}); metadata derived from filename");
        tracing::warn!("{}: {}", buffer.filename(), warning);
        warnings.push(warning);

        let mut identity = Identity::from_filename(&stem);
        self.apply_rules(&mut identity, buffer.filename());

        let style_tags = tags::generate(&identity.family, &[], false, &[]);
        let category = tags::categorize(&style_tags);
        let record = ProcessedFontMetadata {
            family: identity.family,
            style: identity.style,
            weight: identity.weight,
            is_italic: identity.is_italic,
            is_variable: false,
            variable_axes: Vec::new(),
            open_type_features: Vec::new(),
            languages: scripts::detect(None, self.config.script_threshold),
            style_tags,
            category,
            font_metrics: None,
            designer_info: None,
            warnings: std::mem::take(warnings),
            processing_version: self.config.processing_version.clone(),
            format,
            filename: buffer.filename().to_string(),
            file_size: buffer.declared_size(),
            glyph_count: None,
        };
        consistency::validate(record, &stem)
    }

    fn apply_rules(&self, identity: &mut Identity, filename: &str) {
        if let Some(index) = self.config.rules.apply(identity, filename) {
            tracing::debug!(
                "Filename rule {} applied to {}: style={:?} weight={}",
                index,
                filename,
                identity.style,
                identity.weight
            );
        }
    }
}

fn size_warnings(buffer: &RawFontBuffer) -> Vec<String> {
    let actual = buffer.data().len() as u64;
    if buffer.declared_size() == actual {
        return Vec::new();
    }
    vec![format!(
        "Declared size {} does not match received {} bytes",
        buffer.declared_size(),
        actual
    )]
}

/// Process one font with the default configuration
pub fn process_font(
    data: impl Into<Arc<[u8]>>,
    filename: &str,
    declared_size: u64,
) -> Result<ProcessedFontMetadata> {
    Pipeline::default().process(&RawFontBuffer::new(data, filename, declared_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetaError;

    fn junk_font(filename: &str) -> RawFontBuffer {
        let mut data = vec![0x00, 0x01, 0x00, 0x00];
        data.extend(std::iter::repeat_n(0xAB, 196));
        RawFontBuffer::from_bytes(data, filename)
    }

    #[test]
    fn test_signature_gate() {
        let buffer = RawFontBuffer::from_bytes(vec![b'X'; 200], "fake.ttf");
        assert!(matches!(
            Pipeline::default().process(&buffer),
            Err(MetaError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_corrupt_tables_fall_back_to_filename() {
        let record = Pipeline::default().process(&junk_font("MyFont-Bold.ttf")).unwrap();
        assert_eq!(record.family, "MyFont-Bold");
        assert_eq!(record.style, "Regular");
        assert_eq!(record.weight, 400);
        assert!(!record.is_variable);
        assert!(record.warnings[0].starts_with("Could not read font tables"));
        assert!(record.languages.contains("Latin"));
        assert!(record.category.contains("Sans"));
        assert!(record.font_metrics.is_none());
    }

    #[test]
    fn test_woff2_falls_back() {
        let mut data = b"wOF2".to_vec();
        data.resize(128, 0);
        let record = process_font(data, "Inter-Regular.woff2", 128).unwrap();
        assert_eq!(record.format, FontFormat::Woff2);
        assert_eq!(record.family, "Inter-Regular");
        assert!(record.warnings[0].contains("WOFF2"));
    }

    #[test]
    fn test_declared_size_mismatch() {
        let buffer = junk_font("x.ttf");
        let buffer = RawFontBuffer::new(buffer.shared_data(), "x.ttf", 10);
        let record = Pipeline::default().process(&buffer).unwrap();
        assert!(record.warnings[0].starts_with("Declared size 10"));
        assert_eq!(record.file_size, 10);
    }

    #[test]
    fn test_rules_apply_to_fallback() {
        let record = Pipeline::default().process(&junk_font("Jost-Black.ttf")).unwrap();
        assert_eq!(record.family, "Jost-Black");
        assert_eq!(record.style, "Black");
        assert_eq!(record.weight, 900);
    }

    #[test]
    fn test_timeout_path_returns_record() {
        let pipeline = Pipeline::new(PipelineConfig::default().with_timeout(Duration::from_secs(10)));
        let record = pipeline.process(&junk_font("Slow.ttf")).unwrap();
        assert_eq!(record.family, "Slow");
    }

    #[test]
    fn test_batch_keeps_order() {
        let buffers = vec![
            junk_font("A.ttf"),
            RawFontBuffer::from_bytes(vec![0; 10], "tiny.ttf"),
            junk_font("C.ttf"),
        ];
        let results = Pipeline::default().process_batch(&buffers);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().family, "A");
        assert!(matches!(results[1], Err(MetaError::BufferTooSmall { len: 10 })));
        assert_eq!(results[2].as_ref().unwrap().family, "C");
    }
}
