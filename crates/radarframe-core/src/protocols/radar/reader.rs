use super::error::Truncation;

/// Bounds-checked big-endian reader over an immutable frame buffer.
///
/// Offsets are absolute buffer positions; a read that would cross the end of
/// the buffer fails instead of touching adjacent memory.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    buffer: &'a [u8],
}

impl<'a> ByteCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Checks that `width` bytes starting at `offset` lie inside the buffer.
    pub fn require(&self, offset: usize, width: usize) -> Result<(), Truncation> {
        match offset.checked_add(width) {
            Some(end) if end <= self.buffer.len() => Ok(()),
            _ => Err(Truncation::ReadPastEnd {
                offset,
                width,
                len: self.buffer.len(),
            }),
        }
    }

    pub fn read_slice(&self, offset: usize, width: usize) -> Result<&'a [u8], Truncation> {
        self.require(offset, width)?;
        Ok(&self.buffer[offset..offset + width])
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, Truncation> {
        self.buffer
            .get(offset)
            .copied()
            .ok_or(Truncation::ReadPastEnd {
                offset,
                width: 1,
                len: self.buffer.len(),
            })
    }

    pub fn read_u16_be(&self, offset: usize) -> Result<u16, Truncation> {
        let bytes = self.read_slice(offset, 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_be(&self, offset: usize) -> Result<u32, Truncation> {
        let bytes = self.read_slice(offset, 4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
