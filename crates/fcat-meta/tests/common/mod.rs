//! Synthetic font builder for integration tests
//!
//! Emits just enough of each table for ttf-parser to accept it.

#![allow(dead_code)]

use std::io::Write;

use fcat_meta::reader::SfntWriter;
use flate2::Compression;
use flate2::write::ZlibEncoder;

pub const TRUETYPE: u32 = 0x0001_0000;
pub const WINDOWS_ENGLISH: u16 = 0x0409;
pub const WINDOWS_FRENCH: u16 = 0x040C;
pub const MACINTOSH_ENGLISH: u16 = 0;
pub const MACINTOSH_FRENCH: u16 = 1;

const PLATFORM_MACINTOSH: u16 = 1;
const PLATFORM_WINDOWS: u16 = 3;

pub const FS_SELECTION_ITALIC: u16 = 1;

#[derive(Debug, Clone)]
struct NameRecord {
    platform: u16,
    language: u16,
    id: u16,
    text: String,
}

/// Font assembled table by table
#[derive(Debug, Clone)]
pub struct TestFont {
    names: Vec<NameRecord>,
    tables: Vec<([u8; 4], Vec<u8>)>,
}

impl Default for TestFont {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFont {
    /// Font with only `head`, `hhea` and `maxp`
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            tables: vec![(*b"head", head()), (*b"hhea", hhea()), (*b"maxp", maxp())],
        }
    }

    /// Font with a name table holding family and subfamily
    pub fn named(family: &str, subfamily: &str) -> Self {
        Self::new().name(1, family).name(2, subfamily)
    }

    /// English (US) Windows name record
    pub fn name(self, id: u16, text: &str) -> Self {
        self.localized_name(id, text, WINDOWS_ENGLISH)
    }

    pub fn localized_name(self, id: u16, text: &str, language_id: u16) -> Self {
        self.name_record(PLATFORM_WINDOWS, language_id, id, text)
    }

    /// Macintosh Roman name record; `text` must be ASCII
    pub fn mac_name(self, id: u16, text: &str, language_id: u16) -> Self {
        assert!(text.is_ascii(), "Mac Roman test text must be ASCII");
        self.name_record(PLATFORM_MACINTOSH, language_id, id, text)
    }

    fn name_record(mut self, platform: u16, language: u16, id: u16, text: &str) -> Self {
        self.names.push(NameRecord {
            platform,
            language,
            id,
            text: text.to_string(),
        });
        self
    }

    pub fn os2(self, weight_class: u16, fs_selection: u16) -> Self {
        self.table(*b"OS/2", os2(weight_class, fs_selection))
    }

    /// Axes as `(tag, min, default, max)`
    pub fn fvar(self, axes: &[(&[u8; 4], f32, f32, f32)]) -> Self {
        self.table(*b"fvar", fvar(axes))
    }

    pub fn gsub(self, features: &[&[u8; 4]]) -> Self {
        self.table(*b"GSUB", layout(features))
    }

    pub fn gpos(self, features: &[&[u8; 4]]) -> Self {
        self.table(*b"GPOS", layout(features))
    }

    /// Map each code point to the glyph with the same number
    pub fn cmap(self, code_points: impl IntoIterator<Item = u32>) -> Self {
        self.table(*b"cmap", cmap(code_points))
    }

    /// Format 12 cmap of `(start, end, start_glyph)` groups
    pub fn cmap_groups(self, groups: &[(u32, u32, u32)]) -> Self {
        self.table(*b"cmap", cmap_format12(groups))
    }

    /// Raw table bytes, replacing any previous table with the tag
    pub fn table(mut self, tag: [u8; 4], data: Vec<u8>) -> Self {
        self.tables.retain(|(existing, _)| *existing != tag);
        self.tables.push((tag, data));
        self
    }

    fn all_tables(&self) -> Vec<([u8; 4], Vec<u8>)> {
        let mut tables = self.tables.clone();
        if !self.names.is_empty() && !tables.iter().any(|(tag, _)| tag == b"name") {
            tables.push((*b"name", name_table(&self.names)));
        }
        tables
    }

    /// Plain TrueType binary
    pub fn build(&self) -> Vec<u8> {
        let mut writer = SfntWriter::new(TRUETYPE);
        for (tag, data) in self.all_tables() {
            writer.add_table(tag, data);
        }
        writer.finish()
    }

    /// WOFF 1.0 wrapper around the same tables
    pub fn build_woff(&self) -> Vec<u8> {
        let mut tables = self.all_tables();
        tables.sort_by(|a, b| a.0.cmp(&b.0));

        let header_size = 44 + 20 * tables.len();
        let mut directory = Vec::new();
        let mut payload = Vec::new();
        let mut sfnt_size = 12 + 16 * tables.len();
        for (tag, data) in &tables {
            let compressed = zlib(data);
            let stored = if compressed.len() < data.len() { compressed } else { data.clone() };
            directory.extend_from_slice(tag);
            directory.extend_from_slice(&((header_size + payload.len()) as u32).to_be_bytes());
            directory.extend_from_slice(&(stored.len() as u32).to_be_bytes());
            directory.extend_from_slice(&(data.len() as u32).to_be_bytes());
            directory.extend_from_slice(&0u32.to_be_bytes());
            payload.extend_from_slice(&stored);
            payload.resize((payload.len() + 3) & !3, 0);
            sfnt_size += (data.len() + 3) & !3;
        }

        let mut woff = Vec::new();
        woff.extend_from_slice(b"wOFF");
        woff.extend_from_slice(&TRUETYPE.to_be_bytes());
        woff.extend_from_slice(&((header_size + payload.len()) as u32).to_be_bytes());
        woff.extend_from_slice(&(tables.len() as u16).to_be_bytes());
        woff.extend_from_slice(&0u16.to_be_bytes());
        woff.extend_from_slice(&(sfnt_size as u32).to_be_bytes());
        woff.extend_from_slice(&1u16.to_be_bytes());
        woff.extend_from_slice(&0u16.to_be_bytes());
        woff.extend_from_slice(&[0; 20]);
        woff.extend_from_slice(&directory);
        woff.extend_from_slice(&payload);
        woff
    }
}

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("in-memory write");
    encoder.finish().expect("in-memory write")
}

fn head() -> Vec<u8> {
    let mut t = Vec::with_capacity(54);
    t.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
    t.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // fontRevision
    t.extend_from_slice(&0u32.to_be_bytes()); // checksumAdjustment
    t.extend_from_slice(&0x5F0F_3CF5u32.to_be_bytes()); // magicNumber
    t.extend_from_slice(&0u16.to_be_bytes()); // flags
    t.extend_from_slice(&1000u16.to_be_bytes()); // unitsPerEm
    t.extend_from_slice(&[0; 16]); // created, modified
    for v in [-50i16, -200, 1000, 800] {
        t.extend_from_slice(&v.to_be_bytes()); // bbox
    }
    t.extend_from_slice(&0u16.to_be_bytes()); // macStyle
    t.extend_from_slice(&8u16.to_be_bytes()); // lowestRecPPEM
    t.extend_from_slice(&2i16.to_be_bytes()); // fontDirectionHint
    t.extend_from_slice(&0i16.to_be_bytes()); // indexToLocFormat
    t.extend_from_slice(&0i16.to_be_bytes()); // glyphDataFormat
    assert_eq!(t.len(), 54);
    t
}

fn hhea() -> Vec<u8> {
    let mut t = Vec::with_capacity(36);
    t.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    for v in [800i16, -200, 90] {
        t.extend_from_slice(&v.to_be_bytes()); // ascender, descender, lineGap
    }
    t.extend_from_slice(&1000u16.to_be_bytes()); // advanceWidthMax
    for v in [0i16, 0, 1000, 1, 0, 0, 0, 0, 0, 0, 0] {
        t.extend_from_slice(&v.to_be_bytes());
    }
    t.extend_from_slice(&1u16.to_be_bytes()); // numberOfHMetrics
    assert_eq!(t.len(), 36);
    t
}

fn maxp() -> Vec<u8> {
    let mut t = Vec::with_capacity(6);
    t.extend_from_slice(&0x0000_5000u32.to_be_bytes());
    t.extend_from_slice(&u16::MAX.to_be_bytes());
    t
}

fn name_table(names: &[NameRecord]) -> Vec<u8> {
    let count = names.len() as u16;
    let mut records = Vec::new();
    let mut storage = Vec::new();
    for record in names {
        // Windows Unicode BMP or Macintosh Roman
        let (encoding, encoded): (u16, Vec<u8>) = match record.platform {
            PLATFORM_MACINTOSH => (0, record.text.as_bytes().to_vec()),
            _ => (
                1,
                record.text.encode_utf16().flat_map(|unit| unit.to_be_bytes()).collect(),
            ),
        };
        for v in [
            record.platform,
            encoding,
            record.language,
            record.id,
            encoded.len() as u16,
            storage.len() as u16,
        ] {
            records.extend_from_slice(&v.to_be_bytes());
        }
        storage.extend_from_slice(&encoded);
    }
    let mut t = Vec::new();
    t.extend_from_slice(&0u16.to_be_bytes());
    t.extend_from_slice(&count.to_be_bytes());
    t.extend_from_slice(&(6 + 12 * count).to_be_bytes());
    t.extend_from_slice(&records);
    t.extend_from_slice(&storage);
    t
}

fn os2(weight_class: u16, fs_selection: u16) -> Vec<u8> {
    let mut t = vec![0u8; 96];
    t[0..2].copy_from_slice(&4u16.to_be_bytes()); // version
    t[2..4].copy_from_slice(&500i16.to_be_bytes()); // xAvgCharWidth
    t[4..6].copy_from_slice(&weight_class.to_be_bytes());
    t[6..8].copy_from_slice(&5u16.to_be_bytes()); // usWidthClass
    t[58..62].copy_from_slice(b"TEST"); // achVendID
    t[62..64].copy_from_slice(&fs_selection.to_be_bytes());
    t[64..66].copy_from_slice(&0x20u16.to_be_bytes()); // usFirstCharIndex
    t[66..68].copy_from_slice(&0xFFFFu16.to_be_bytes()); // usLastCharIndex
    t[68..70].copy_from_slice(&800i16.to_be_bytes()); // sTypoAscender
    t[70..72].copy_from_slice(&(-200i16).to_be_bytes()); // sTypoDescender
    t[72..74].copy_from_slice(&90i16.to_be_bytes()); // sTypoLineGap
    t[74..76].copy_from_slice(&800u16.to_be_bytes()); // usWinAscent
    t[76..78].copy_from_slice(&200u16.to_be_bytes()); // usWinDescent
    t[86..88].copy_from_slice(&500i16.to_be_bytes()); // sxHeight
    t[88..90].copy_from_slice(&700i16.to_be_bytes()); // sCapHeight
    t
}

fn fixed(value: f32) -> [u8; 4] {
    ((value * 65536.0).round() as i32).to_be_bytes()
}

fn fvar(axes: &[(&[u8; 4], f32, f32, f32)]) -> Vec<u8> {
    let count = axes.len() as u16;
    let mut t = Vec::new();
    t.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    t.extend_from_slice(&16u16.to_be_bytes()); // axesArrayOffset
    t.extend_from_slice(&2u16.to_be_bytes()); // reserved
    t.extend_from_slice(&count.to_be_bytes());
    t.extend_from_slice(&20u16.to_be_bytes()); // axisSize
    t.extend_from_slice(&0u16.to_be_bytes()); // instanceCount
    t.extend_from_slice(&(4 + 4 * count).to_be_bytes()); // instanceSize
    for (i, (tag, min, default, max)) in axes.iter().enumerate() {
        t.extend_from_slice(*tag);
        t.extend_from_slice(&fixed(*min));
        t.extend_from_slice(&fixed(*default));
        t.extend_from_slice(&fixed(*max));
        t.extend_from_slice(&0u16.to_be_bytes()); // flags
        t.extend_from_slice(&(256 + i as u16).to_be_bytes()); // axisNameID
    }
    t
}

fn layout(features: &[&[u8; 4]]) -> Vec<u8> {
    let count = features.len() as u16;
    let script_list = 10u16;
    let feature_list = 12u16;
    let lookup_list = feature_list + 2 + 10 * count;

    let mut t = Vec::new();
    t.extend_from_slice(&1u16.to_be_bytes());
    t.extend_from_slice(&0u16.to_be_bytes());
    t.extend_from_slice(&script_list.to_be_bytes());
    t.extend_from_slice(&feature_list.to_be_bytes());
    t.extend_from_slice(&lookup_list.to_be_bytes());
    t.extend_from_slice(&0u16.to_be_bytes()); // scriptCount

    t.extend_from_slice(&count.to_be_bytes());
    for (i, tag) in features.iter().enumerate() {
        t.extend_from_slice(*tag);
        let offset = 2 + 6 * count + 4 * i as u16;
        t.extend_from_slice(&offset.to_be_bytes());
    }
    for _ in features {
        t.extend_from_slice(&0u16.to_be_bytes()); // featureParams
        t.extend_from_slice(&0u16.to_be_bytes()); // lookupIndexCount
    }

    t.extend_from_slice(&0u16.to_be_bytes()); // lookupCount
    t
}

fn cmap(code_points: impl IntoIterator<Item = u32>) -> Vec<u8> {
    let mut points: Vec<u16> = code_points
        .into_iter()
        .filter_map(|cp| u16::try_from(cp).ok())
        .filter(|&cp| cp != 0 && cp != 0xFFFF)
        .collect();
    points.sort_unstable();
    points.dedup();

    // Consecutive runs, each mapping to glyphs with the same numbers
    let mut segments: Vec<(u16, u16)> = Vec::new();
    for cp in points {
        match segments.last_mut() {
            Some((_, end)) if *end + 1 == cp => *end = cp,
            _ => segments.push((cp, cp)),
        }
    }
    segments.push((0xFFFF, 0xFFFF));

    let seg_count = segments.len() as u16;
    let entry_selector = 15 - seg_count.leading_zeros() as u16;
    let search_range = 2 * (1u16 << entry_selector);
    let range_shift = 2 * seg_count - search_range;

    let mut sub = Vec::new();
    sub.extend_from_slice(&4u16.to_be_bytes());
    sub.extend_from_slice(&(16 + 8 * seg_count).to_be_bytes());
    sub.extend_from_slice(&0u16.to_be_bytes()); // language
    sub.extend_from_slice(&(2 * seg_count).to_be_bytes());
    sub.extend_from_slice(&search_range.to_be_bytes());
    sub.extend_from_slice(&entry_selector.to_be_bytes());
    sub.extend_from_slice(&range_shift.to_be_bytes());
    for (_, end) in &segments {
        sub.extend_from_slice(&end.to_be_bytes());
    }
    sub.extend_from_slice(&0u16.to_be_bytes()); // reservedPad
    for (start, _) in &segments {
        sub.extend_from_slice(&start.to_be_bytes());
    }
    for (start, _) in &segments {
        let delta: i16 = if *start == 0xFFFF { 1 } else { 0 };
        sub.extend_from_slice(&delta.to_be_bytes());
    }
    for _ in &segments {
        sub.extend_from_slice(&0u16.to_be_bytes()); // idRangeOffset
    }

    let mut t = Vec::new();
    t.extend_from_slice(&0u16.to_be_bytes()); // version
    t.extend_from_slice(&1u16.to_be_bytes()); // numTables
    t.extend_from_slice(&3u16.to_be_bytes()); // Windows
    t.extend_from_slice(&1u16.to_be_bytes()); // Unicode BMP
    t.extend_from_slice(&12u32.to_be_bytes());
    t.extend_from_slice(&sub);
    t
}

fn cmap_format12(groups: &[(u32, u32, u32)]) -> Vec<u8> {
    let mut sub = Vec::new();
    sub.extend_from_slice(&12u16.to_be_bytes());
    sub.extend_from_slice(&0u16.to_be_bytes()); // reserved
    sub.extend_from_slice(&(16 + 12 * groups.len() as u32).to_be_bytes());
    sub.extend_from_slice(&0u32.to_be_bytes()); // language
    sub.extend_from_slice(&(groups.len() as u32).to_be_bytes());
    for (start, end, glyph) in groups {
        for v in [start, end, glyph] {
            sub.extend_from_slice(&v.to_be_bytes());
        }
    }

    let mut t = Vec::new();
    t.extend_from_slice(&0u16.to_be_bytes()); // version
    t.extend_from_slice(&1u16.to_be_bytes()); // numTables
    t.extend_from_slice(&3u16.to_be_bytes()); // Windows
    t.extend_from_slice(&10u16.to_be_bytes()); // Unicode full repertoire
    t.extend_from_slice(&12u32.to_be_bytes());
    t.extend_from_slice(&sub);
    t
}

/// Sampled Cyrillic code points
pub const CYRILLIC: [u32; 3] = [0x0410, 0x0411, 0x0430];

/// Basic Latin letters
pub fn latin() -> impl Iterator<Item = u32> {
    (0x41..=0x5A).chain(0x61..=0x7A)
}
