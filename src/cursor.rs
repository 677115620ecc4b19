use byteorder::{ByteOrder, LittleEndian};

/// A bounded, sequential reader over a byte slice.
///
/// All multi-byte reads are little-endian and advance the position by the
/// width of the field. Nothing is ever read past the end of the slice; such
/// reads fail with [`ReadError::OutOfRange`] and leave the position untouched.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, pos: 0 }
    }

    /// A cursor positioned at `offset`, or at the end if `offset` is past it.
    pub fn starting_at(data: &'a [u8], offset: usize) -> Self {
        ByteCursor {
            data,
            pos: offset.min(data.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    /// Moves to an absolute offset. Seeking to exactly the end is allowed.
    pub fn seek(&mut self, offset: usize) -> Result<(), ReadError> {
        if offset > self.data.len() {
            return Err(ReadError::OutOfRange {
                offset,
                len: 0,
                size: self.data.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        self.take(4).map(LittleEndian::read_u32)
    }

    pub fn read_u64(&mut self) -> Result<u64, ReadError> {
        self.take(8).map(LittleEndian::read_u64)
    }

    pub fn read_i64(&mut self) -> Result<i64, ReadError> {
        self.take(8).map(LittleEndian::read_i64)
    }

    /// Consumes exactly `len` bytes as single-byte characters, dropping
    /// NUL bytes. Fixed-width slots in the buffer are NUL padded.
    pub fn read_text(&mut self, len: usize) -> Result<String, ReadError> {
        let bytes = self.take(len)?;
        Ok(bytes
            .iter()
            .filter(|&&b| b != 0)
            .map(|&b| char::from(b))
            .collect())
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        let out_of_range = ReadError::OutOfRange {
            offset: self.pos,
            len,
            size: self.data.len(),
        };
        let end = self.pos.checked_add(len).ok_or(out_of_range)?;
        let bytes = self.data.get(self.pos..end).ok_or(out_of_range)?;
        self.pos = end;
        Ok(bytes)
    }
}

/// The cursor was asked to read or seek outside of its data.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    #[error("Could not read {len} bytes at offset {offset}, buffer is {size} bytes")]
    OutOfRange {
        offset: usize,
        len: usize,
        size: usize,
    },
}
