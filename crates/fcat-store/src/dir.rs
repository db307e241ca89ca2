//! Directory-backed stores
//!
//! Binaries are kept as plain font files named by id; metadata records
//! as one pretty-printed JSON document per id. Writes go to a temporary
//! file first and are renamed into place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use fcat_meta::{ProcessedFontMetadata, RawFontBuffer};

use crate::Result;
use crate::store::{BinaryStore, MetadataStore, check_id};

const JSON_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = ".partial";

fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(TEMP_SUFFIX);
    let temp = PathBuf::from(temp);
    fs::write(&temp, data)?;
    fs::rename(&temp, path)
}

fn read_optional(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// File names in a directory, skipping hidden and partial files
fn list_files(root: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.starts_with('.') || name.ends_with(TEMP_SUFFIX) {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// Font files in a directory
#[derive(Debug, Clone)]
pub struct DirBinaryStore {
    root: PathBuf,
}

impl DirBinaryStore {
    /// Open the store, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BinaryStore for DirBinaryStore {
    fn put(&self, id: &str, buffer: &RawFontBuffer) -> Result<()> {
        check_id(id)?;
        write_atomic(&self.root.join(id), buffer.data())?;
        tracing::debug!("Stored {} bytes as {}", buffer.data().len(), id);
        Ok(())
    }

    fn fetch(&self, id: &str) -> Result<Option<RawFontBuffer>> {
        check_id(id)?;
        Ok(read_optional(&self.root.join(id))?.map(|data| RawFontBuffer::from_bytes(data, id)))
    }

    fn ids(&self) -> Result<Vec<String>> {
        Ok(list_files(&self.root)?)
    }
}

/// Metadata records as JSON files in a directory
#[derive(Debug, Clone)]
pub struct JsonMetadataStore {
    root: PathBuf,
}

impl JsonMetadataStore {
    /// Open the store, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, id: &str) -> Result<PathBuf> {
        check_id(id)?;
        Ok(self.root.join(format!("{id}.{JSON_EXTENSION}")))
    }
}

impl MetadataStore for JsonMetadataStore {
    fn put(&self, id: &str, record: &ProcessedFontMetadata) -> Result<()> {
        let json = serde_json::to_vec_pretty(record)?;
        write_atomic(&self.path(id)?, &json)?;
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<ProcessedFontMetadata>> {
        match read_optional(&self.path(id)?)? {
            Some(json) => Ok(Some(serde_json::from_slice(&json)?)),
            None => Ok(None),
        }
    }

    fn ids(&self) -> Result<Vec<String>> {
        let suffix = format!(".{JSON_EXTENSION}");
        Ok(list_files(&self.root)?
            .into_iter()
            .filter_map(|name| name.strip_suffix(&suffix).map(str::to_string))
            .collect())
    }
}
