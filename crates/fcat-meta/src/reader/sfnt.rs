//! sfnt container assembly
//!
//! Used to rebuild a plain OpenType binary from a WOFF table directory.

/// Accumulates tables and writes an sfnt with a sorted table directory
#[derive(Debug, Clone)]
pub struct SfntWriter {
    flavor: u32,
    tables: Vec<([u8; 4], Vec<u8>)>,
}

impl SfntWriter {
    /// Create a writer for the given sfnt version (`0x00010000` or `OTTO`)
    pub fn new(flavor: u32) -> Self {
        Self {
            flavor,
            tables: Vec::new(),
        }
    }

    /// Add a table, replacing any previous table with the same tag
    pub fn add_table(&mut self, tag: [u8; 4], data: Vec<u8>) -> &mut Self {
        self.tables.retain(|(existing, _)| *existing != tag);
        self.tables.push((tag, data));
        self
    }

    /// Number of tables added
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Serialize the font
    ///
    /// Records are sorted by tag since parsers binary-search the directory.
    pub fn finish(mut self) -> Vec<u8> {
        self.tables.sort_by(|a, b| a.0.cmp(&b.0));

        let num_tables = self.tables.len() as u16;
        let header_size = 12 + self.tables.len() * 16;
        let data_size: usize = self.tables.iter().map(|(_, data)| padded_len(data.len())).sum();
        let mut output = Vec::with_capacity(header_size + data_size);

        let entry_selector = if num_tables == 0 { 0 } else { 15 - num_tables.leading_zeros() as u16 };
        let search_range = (1u16 << entry_selector).saturating_mul(16);
        let range_shift = num_tables.saturating_mul(16).saturating_sub(search_range);

        output.extend_from_slice(&self.flavor.to_be_bytes());
        output.extend_from_slice(&num_tables.to_be_bytes());
        output.extend_from_slice(&search_range.to_be_bytes());
        output.extend_from_slice(&entry_selector.to_be_bytes());
        output.extend_from_slice(&range_shift.to_be_bytes());

        let mut offset = header_size;
        for (tag, data) in &self.tables {
            output.extend_from_slice(tag);
            output.extend_from_slice(&checksum(data).to_be_bytes());
            output.extend_from_slice(&(offset as u32).to_be_bytes());
            output.extend_from_slice(&(data.len() as u32).to_be_bytes());
            offset += padded_len(data.len());
        }

        for (_, data) in &self.tables {
            output.extend_from_slice(data);
            output.resize(padded_len(output.len()), 0);
        }

        output
    }
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

/// OpenType table checksum (sum of big-endian u32 words, zero padded)
pub fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}
