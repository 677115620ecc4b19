use std::fmt;

use crate::cursor::{ByteCursor, ReadError};

/// The hsperfdata magic number, `CA FE C0 C0` on disk, read as a
/// little-endian `u32`.
pub const MAGIC: u32 = 0xC0C0_FECA;

/// `T_LONG`: the payload is a single little-endian `i64`.
pub const TYPE_LONG: u8 = b'J';

/// `T_BYTE`: the payload is a NUL padded byte string of `vector_length` bytes.
pub const TYPE_BYTE: u8 = b'B';

/// Size of the prologue in front of the entry table.
pub const PROLOGUE_SIZE: usize = 32;

/// Size of the fixed part of each entry.
pub const ENTRY_HEADER_SIZE: usize = 20;

/// `PerfDataPrologue`
///
/// ```text
/// offset  field
///  0      magic (0xcafec0c0 in memory order)
///  4      byte_order, major_version, minor_version, accessible
///  8      used: number of bytes of the buffer in use
/// 12      overflow
/// 16      mod_time_stamp (8 bytes)
/// 24      entry_offset
/// 28      num_entries
/// ```
///
/// Only the fields we need are kept. The entry table is read right after
/// the prologue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfDataPrologue {
    pub magic: u32,
    pub used: u32,
    pub num_entries: u32,
}

/// `PerfDataEntry`
///
/// ```text
/// offset  field
///  0      entry_length, including name, padding and data
///  4      name_offset, relative to the start of the entry
///  8      vector_length, byte length of the data for strings
/// 12      data_type, flags, data_units, data_variability
/// 16      data_offset, relative to the start of the entry
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfDataEntry {
    pub entry_length: u32,
    pub name_offset: u32,
    pub vector_length: u32,
    pub kind: u32,
    pub data_offset: u32,
}

impl PerfDataEntry {
    /// The type character, stored in the low byte of `kind`.
    pub fn data_type(&self) -> u8 {
        (self.kind & 0xff) as u8
    }
}

/// One decoded performance counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    pub name: String,
    pub value: CounterValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterValue {
    Long(i64),
    Text(String),
    /// A type we don't decode. Carries the type byte.
    Unsupported(u8),
}

impl fmt::Display for CounterValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CounterValue::Long(val) => write!(f, "{}", val),
            CounterValue::Text(val) => f.write_str(val),
            CounterValue::Unsupported(_) => f.write_str("0"),
        }
    }
}

/// A validated hsperfdata buffer.
///
/// Parsing only checks the prologue. The entries are decoded lazily by
/// [`PerfData::counters`], which stops at the first malformed entry.
pub struct PerfData<'a> {
    /// The buffer up to the declared used length.
    data: &'a [u8],
    prologue: PerfDataPrologue,
}

impl<'a> PerfData<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self, Error> {
        let mut cursor = ByteCursor::new(data);
        let magic = cursor.read_u32()?;
        if magic != MAGIC {
            return Err(Error::UnrecognizedMagic(magic));
        }
        let _version = cursor.read_u32()?;
        let used = cursor.read_u32()?;
        if used as usize > data.len() {
            return Err(Error::UsedLengthTooLarge {
                used,
                size: data.len(),
            });
        }
        // overflow, mod_time_stamp, entry_offset
        for _ in 0..4 {
            cursor.read_u32()?;
        }
        let num_entries = cursor.read_u32()?;

        log::trace!(
            "hsperfdata prologue: used {} of {} bytes, {} entries",
            used,
            data.len(),
            num_entries
        );

        Ok(PerfData {
            data: &data[..used as usize],
            prologue: PerfDataPrologue {
                magic,
                used,
                num_entries,
            },
        })
    }

    pub fn prologue(&self) -> &PerfDataPrologue {
        &self.prologue
    }

    pub fn counters(&self) -> CounterIter<'a> {
        // The prologue was read from the full buffer; if `used` is smaller
        // than the prologue the first entry read fails instead.
        let cursor = ByteCursor::starting_at(self.data, PROLOGUE_SIZE);
        let bad_start = cursor.position() != PROLOGUE_SIZE && self.prologue.num_entries > 0;
        CounterIter {
            cursor,
            index: 0,
            num_entries: self.prologue.num_entries,
            failed: false,
            bad_start,
        }
    }
}

/// Decodes every counter in `data`, failing on the first malformed entry.
pub fn decode(data: &[u8]) -> Result<Vec<Counter>, Error> {
    PerfData::parse(data)?.counters().collect()
}

/// Iterates over the entry table. Fused after the first error: once one
/// entry's geometry is wrong, the offsets of all later entries are suspect.
pub struct CounterIter<'a> {
    cursor: ByteCursor<'a>,
    index: u32,
    num_entries: u32,
    failed: bool,
    bad_start: bool,
}

impl<'a> CounterIter<'a> {
    fn read_counter(&mut self) -> Result<Counter, Error> {
        if self.bad_start {
            return Err(Error::EntryOutOfBounds {
                index: self.index,
                offset: PROLOGUE_SIZE,
                used: self.cursor.len(),
            });
        }

        let start = self.cursor.position();
        let entry = PerfDataEntry {
            entry_length: self.cursor.read_u32()?,
            name_offset: self.cursor.read_u32()?,
            vector_length: self.cursor.read_u32()?,
            kind: self.cursor.read_u32()?,
            data_offset: self.cursor.read_u32()?,
        };
        log::trace!("entry {} at offset {}: {:?}", self.index, start, entry);
        self.check_geometry(start, &entry)?;

        let name_start = start + entry.name_offset as usize;
        let data_start = start + entry.data_offset as usize;
        self.cursor.seek(name_start)?;
        let name = self.cursor.read_text(data_start - name_start)?;

        let value = match entry.data_type() {
            TYPE_LONG => CounterValue::Long(self.cursor.read_i64()?),
            TYPE_BYTE => CounterValue::Text(self.cursor.read_text(entry.vector_length as usize)?),
            other => CounterValue::Unsupported(other),
        };

        self.cursor.seek(start + entry.entry_length as usize)?;
        Ok(Counter { name, value })
    }

    fn check_geometry(&self, start: usize, entry: &PerfDataEntry) -> Result<(), Error> {
        let used = self.cursor.len() as u64;
        let start_u64 = start as u64;
        let end = start_u64 + u64::from(entry.entry_length);
        let name_start = start_u64 + u64::from(entry.name_offset);
        let data_start = start_u64 + u64::from(entry.data_offset);
        if entry.entry_length < ENTRY_HEADER_SIZE as u32
            || end > used
            || name_start > used
            || data_start > used
            || entry.data_offset < entry.name_offset
        {
            return Err(Error::EntryOutOfBounds {
                index: self.index,
                offset: start,
                used: self.cursor.len(),
            });
        }
        Ok(())
    }
}

impl<'a> Iterator for CounterIter<'a> {
    type Item = Result<Counter, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.index >= self.num_entries {
            return None;
        }
        let result = self.read_counter();
        self.index += 1;
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = (self.num_entries - self.index) as usize;
        (0, Some(remaining))
    }
}

/// The error type for decoding an hsperfdata buffer.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// We were about to read outside of the buffer (or outside of the
    /// declared used length, for entries).
    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    #[error("Did not recognize magic value {0:#010x}")]
    UnrecognizedMagic(u32),

    #[error("The declared used length {used} exceeds the buffer size {size}")]
    UsedLengthTooLarge { used: u32, size: usize },

    #[error("Entry {index} at offset {offset} points outside of the used length {used}")]
    EntryOutOfBounds {
        index: u32,
        offset: usize,
        used: usize,
    },
}

impl Error {
    /// Whether the buffer is not hsperfdata at all, as opposed to corrupt.
    pub fn is_bad_magic(&self) -> bool {
        matches!(self, Error::UnrecognizedMagic(_))
    }
}
