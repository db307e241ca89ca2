//! Minimal fonts for store tests

#![allow(dead_code)]

use fcat_meta::reader::SfntWriter;

fn head() -> Vec<u8> {
    let mut t = Vec::with_capacity(54);
    t.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    t.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    t.extend_from_slice(&0u32.to_be_bytes());
    t.extend_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
    t.extend_from_slice(&0u16.to_be_bytes());
    t.extend_from_slice(&1000u16.to_be_bytes());
    t.extend_from_slice(&[0; 16]);
    t.extend_from_slice(&[0; 8]); // bbox
    t.extend_from_slice(&0u16.to_be_bytes());
    t.extend_from_slice(&8u16.to_be_bytes());
    t.extend_from_slice(&2i16.to_be_bytes());
    t.extend_from_slice(&0i16.to_be_bytes());
    t.extend_from_slice(&0i16.to_be_bytes());
    t
}

fn hhea() -> Vec<u8> {
    let mut t = vec![0u8; 36];
    t[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    t[4..6].copy_from_slice(&800i16.to_be_bytes());
    t[6..8].copy_from_slice(&(-200i16).to_be_bytes());
    t[34..36].copy_from_slice(&1u16.to_be_bytes());
    t
}

fn maxp() -> Vec<u8> {
    let mut t = 0x0000_5000u32.to_be_bytes().to_vec();
    t.extend_from_slice(&10u16.to_be_bytes());
    t
}

fn name(records: &[(u16, &str)]) -> Vec<u8> {
    let count = records.len() as u16;
    let mut t = Vec::new();
    t.extend_from_slice(&0u16.to_be_bytes());
    t.extend_from_slice(&count.to_be_bytes());
    t.extend_from_slice(&(6 + 12 * count).to_be_bytes());
    let mut storage = Vec::new();
    for (id, text) in records {
        let encoded: Vec<u8> = text.encode_utf16().flat_map(|unit| unit.to_be_bytes()).collect();
        for v in [3u16, 1, 0x0409, *id, encoded.len() as u16, storage.len() as u16] {
            t.extend_from_slice(&v.to_be_bytes());
        }
        storage.extend_from_slice(&encoded);
    }
    t.extend_from_slice(&storage);
    t
}

/// TrueType font with only a family and subfamily name
pub fn font(family: &str, style: &str) -> Vec<u8> {
    let mut writer = SfntWriter::new(0x0001_0000);
    writer.add_table(*b"head", head());
    writer.add_table(*b"hhea", hhea());
    writer.add_table(*b"maxp", maxp());
    writer.add_table(*b"name", name(&[(1, family), (2, style)]));
    writer.finish()
}
