use crate::perf_data::{ENTRY_HEADER_SIZE, MAGIC, PROLOGUE_SIZE, TYPE_BYTE, TYPE_LONG};

/// Builds synthetic hsperfdata buffers, laid out the way HotSpot lays them
/// out: name right after the entry header, NUL terminated and padded to
/// eight bytes, followed by the data.
///
/// Used for testing the decoder and for fixtures.
#[derive(Debug, Clone)]
pub struct PerfDataWriter {
    magic: u32,
    used_length: Option<u32>,
    entries: Vec<Vec<u8>>,
}

impl Default for PerfDataWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PerfDataWriter {
    pub fn new() -> Self {
        PerfDataWriter {
            magic: MAGIC,
            used_length: None,
            entries: Vec::new(),
        }
    }

    /// Overrides the magic number.
    pub fn magic(mut self, magic: u32) -> Self {
        self.magic = magic;
        self
    }

    /// Overrides the declared used length, which defaults to the size of
    /// the whole buffer.
    pub fn used_length(mut self, used: u32) -> Self {
        self.used_length = Some(used);
        self
    }

    pub fn long(self, name: &str, value: i64) -> Self {
        self.raw_entry(TYPE_LONG, name, &value.to_le_bytes())
    }

    /// Adds a string counter stored in a NUL padded slot of `slot_len` bytes.
    pub fn text(self, name: &str, value: &str, slot_len: usize) -> Self {
        let mut payload = value.as_bytes().to_vec();
        payload.resize(slot_len.max(payload.len()), 0);
        self.raw_entry(TYPE_BYTE, name, &payload)
    }

    /// Adds an entry with an arbitrary type byte. `vector_length` is set to
    /// the payload length.
    pub fn raw_entry(mut self, data_type: u8, name: &str, payload: &[u8]) -> Self {
        let name_offset = ENTRY_HEADER_SIZE;
        let data_offset = align8(name_offset + name.len() + 1);
        let entry_length = align8(data_offset + payload.len());

        let mut entry = Vec::with_capacity(entry_length);
        write_u32(&mut entry, entry_length);
        write_u32(&mut entry, name_offset);
        write_u32(&mut entry, payload.len());
        // data_type, flags, data_units, data_variability
        entry.extend_from_slice(&[data_type, 0, 1, 3]);
        write_u32(&mut entry, data_offset);
        entry.extend_from_slice(name.as_bytes());
        entry.resize(data_offset, 0);
        entry.extend_from_slice(payload);
        entry.resize(entry_length, 0);

        self.entries.push(entry);
        self
    }

    pub fn finish(&self) -> Vec<u8> {
        let table_len: usize = self.entries.iter().map(Vec::len).sum();
        let total = PROLOGUE_SIZE + table_len;

        let mut data = Vec::with_capacity(total);
        write_u32(&mut data, self.magic as usize);
        // byte_order (1 = little endian), major_version, minor_version, accessible
        data.extend_from_slice(&[1, 2, 0, 1]);
        write_u32(&mut data, self.used_length.map_or(total, |used| used as usize));
        // overflow
        write_u32(&mut data, 0);
        // mod_time_stamp
        data.extend_from_slice(&[0; 8]);
        write_u32(&mut data, PROLOGUE_SIZE);
        write_u32(&mut data, self.entries.len());
        for entry in &self.entries {
            data.extend_from_slice(entry);
        }
        data
    }
}

fn align8(n: usize) -> usize {
    (n + 7) & !7
}

fn write_u32(out: &mut Vec<u8>, value: usize) {
    out.extend_from_slice(&(value as u32).to_le_bytes());
}
