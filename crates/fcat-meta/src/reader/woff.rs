//! WOFF (Web Open Font Format 1.0) decoder
//!
//! Each table is stored either verbatim or zlib compressed; decoding
//! inflates every table and rebuilds a plain sfnt around them.

use std::io::Read;

use flate2::read::ZlibDecoder;

use super::sfnt::SfntWriter;
use super::stream::FontStream;
use crate::{MetaError, Result};

const WOFF_SIGNATURE: u32 = 0x774F_4646; // 'wOFF'

/// Refuse to inflate tables beyond this size
const MAX_TABLE_SIZE: u32 = 64 * 1024 * 1024;

/// Refuse fonts whose tables add up to more than this once decoded
pub const MAX_SFNT_SIZE: u64 = 128 * 1024 * 1024;

/// WOFF table directory entry
#[derive(Debug)]
struct WoffTableEntry {
    tag: [u8; 4],
    offset: u32,
    comp_length: u32,
    orig_length: u32,
}

/// Decode WOFF1 to raw OpenType/TrueType data
pub fn decode_woff(data: &[u8]) -> Result<Vec<u8>> {
    let mut stream = FontStream::new(data);

    let signature = stream.read_u32()?;
    if signature != WOFF_SIGNATURE {
        return Err(MetaError::UnparsableFont("not a WOFF container".into()));
    }

    let flavor = stream.read_u32()?;
    let _length = stream.read_u32()?;
    let num_tables = stream.read_u16()?;
    let _reserved = stream.read_u16()?;
    let total_sfnt_size = stream.read_u32()?;
    // version, metadata and private block offsets
    stream.skip(2 + 2 + 4 * 5)?;
    check_total(u64::from(total_sfnt_size))?;

    let mut entries = Vec::with_capacity(num_tables as usize);
    for _ in 0..num_tables {
        let tag = stream.read_tag()?;
        let offset = stream.read_u32()?;
        let comp_length = stream.read_u32()?;
        let orig_length = stream.read_u32()?;
        let _orig_checksum = stream.read_u32()?;
        entries.push(WoffTableEntry {
            tag,
            offset,
            comp_length,
            orig_length,
        });
    }
    check_total(entries.iter().map(|entry| u64::from(entry.orig_length)).sum())?;

    let mut writer = SfntWriter::new(flavor);
    for entry in &entries {
        writer.add_table(entry.tag, table_data(data, entry)?);
    }

    tracing::debug!("Decoded WOFF with {} tables", writer.len());
    Ok(writer.finish())
}

fn check_total(size: u64) -> Result<()> {
    if size > MAX_SFNT_SIZE {
        return Err(MetaError::UnparsableFont(format!(
            "WOFF decodes to {size} bytes, over the {MAX_SFNT_SIZE} byte limit"
        )));
    }
    Ok(())
}

fn table_data(data: &[u8], entry: &WoffTableEntry) -> Result<Vec<u8>> {
    let tag = String::from_utf8_lossy(&entry.tag).into_owned();
    let start = entry.offset as usize;
    let stored = start
        .checked_add(entry.comp_length as usize)
        .and_then(|end| data.get(start..end))
        .ok_or_else(|| MetaError::UnparsableFont(format!("WOFF table '{tag}' is out of bounds")))?;

    if entry.comp_length > entry.orig_length {
        return Err(MetaError::UnparsableFont(format!(
            "WOFF table '{tag}' is larger compressed than uncompressed"
        )));
    }
    if entry.comp_length == entry.orig_length {
        return Ok(stored.to_vec());
    }
    if entry.orig_length > MAX_TABLE_SIZE {
        return Err(MetaError::UnparsableFont(format!("WOFF table '{tag}' is too large")));
    }

    let mut inflated = Vec::with_capacity(entry.orig_length as usize);
    ZlibDecoder::new(stored)
        .take(entry.orig_length as u64 + 1)
        .read_to_end(&mut inflated)
        .map_err(|e| MetaError::UnparsableFont(format!("WOFF table '{tag}': {e}")))?;

    if inflated.len() != entry.orig_length as usize {
        return Err(MetaError::UnparsableFont(format!(
            "WOFF table '{tag}' inflated to {} bytes, expected {}",
            inflated.len(),
            entry.orig_length
        )));
    }
    Ok(inflated)
}
