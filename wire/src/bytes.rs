//! Big-endian byte cursor and sink with length validation.

use crate::error::{DecodeError, EncodeError, LimitKind, WireResult};

/// Growable big-endian output buffer.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuses `buf`'s allocation. Existing contents are discarded.
    #[must_use]
    pub fn with_buffer(mut buf: Vec<u8>) -> Self {
        buf.clear();
        Self { buf }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes `count` as a `u16` field.
    pub fn put_count_u16(&mut self, field: &'static str, count: usize) -> Result<(), EncodeError> {
        let value = u16::try_from(count).map_err(|_| EncodeError::LengthOverflow {
            field,
            length: count,
            max: u16::MAX as usize,
        })?;
        self.put_u16(value);
        Ok(())
    }

    /// Writes `count` as a `u32` field.
    pub fn put_count_u32(&mut self, field: &'static str, count: usize) -> Result<(), EncodeError> {
        let value = u32::try_from(count).map_err(|_| EncodeError::LengthOverflow {
            field,
            length: count,
            max: u32::MAX as usize,
        })?;
        self.put_u32(value);
        Ok(())
    }

    /// Writes a `u32` length followed by `bytes`.
    pub fn put_len_prefixed(
        &mut self,
        field: &'static str,
        bytes: &[u8],
    ) -> Result<(), EncodeError> {
        self.put_count_u32(field, bytes.len())?;
        self.put_slice(bytes);
        Ok(())
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Bounds-checked big-endian reader over a byte slice.
///
/// Every read validates against the remaining length and fails with
/// [`DecodeError::Truncated`] instead of over-reading.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Current byte offset from the start of the buffer.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Fails unless at least `needed` bytes remain.
    pub const fn ensure_remaining(&self, field: &'static str, needed: usize) -> WireResult<()> {
        if needed > self.remaining() {
            return Err(DecodeError::Truncated {
                field,
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u16(&mut self, field: &'static str) -> WireResult<u16> {
        let bytes = self.read_array::<2>(field)?;
        Ok(u16::from_be_bytes(bytes))
    }

    pub fn read_u32(&mut self, field: &'static str) -> WireResult<u32> {
        let bytes = self.read_array::<4>(field)?;
        Ok(u32::from_be_bytes(bytes))
    }

    /// Borrows the next `len` bytes.
    pub fn read_slice(&mut self, field: &'static str, len: usize) -> WireResult<&'a [u8]> {
        self.ensure_remaining(field, len)?;
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Reads a `u32` count and checks it against `limit`.
    pub fn read_count(
        &mut self,
        field: &'static str,
        kind: LimitKind,
        limit: usize,
    ) -> WireResult<usize> {
        let count = self.read_u32(field)? as usize;
        if count > limit {
            return Err(DecodeError::LimitsExceeded {
                kind,
                limit,
                actual: count,
            });
        }
        Ok(count)
    }

    /// Reads a `u32` length and borrows that many bytes.
    pub fn read_len_prefixed(
        &mut self,
        field: &'static str,
        max_len: usize,
    ) -> WireResult<&'a [u8]> {
        let len = self.read_count(field, LimitKind::BlobBytes, max_len)?;
        self.read_slice(field, len)
    }

    /// Fails if any bytes remain.
    pub const fn expect_end(&self) -> WireResult<()> {
        if self.remaining() != 0 {
            return Err(DecodeError::TrailingBytes {
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self, field: &'static str) -> WireResult<[u8; N]> {
        let slice = self.read_slice(field, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_are_big_endian() {
        let mut out = ByteWriter::new();
        out.put_u16(0x0102);
        out.put_u32(0x0304_0506);
        assert_eq!(out.into_inner(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn count_u16_overflow_is_rejected() {
        let mut out = ByteWriter::new();
        let err = out.put_count_u16("section count", 70_000).unwrap_err();
        assert_eq!(
            err,
            EncodeError::LengthOverflow {
                field: "section count",
                length: 70_000,
                max: 65_535
            }
        );
        assert!(out.is_empty());
    }

    #[test]
    fn len_prefixed_roundtrip() {
        let mut out = ByteWriter::new();
        out.put_len_prefixed("blob", b"hello").unwrap();
        let bytes = out.into_inner();
        assert_eq!(bytes.len(), 9);

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_len_prefixed("blob", 64).unwrap(), b"hello");
        assert!(reader.expect_end().is_ok());
    }

    #[test]
    fn len_prefixed_rejects_length_past_end() {
        let bytes = [0, 0, 0, 10, 1, 2, 3];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(
            reader.read_len_prefixed("blob", 64),
            Err(DecodeError::Truncated {
                field: "blob",
                needed: 10,
                available: 3
            })
        );
    }

    #[test]
    fn len_prefixed_rejects_length_over_limit() {
        let bytes = [0, 0, 1, 0];
        let mut reader = ByteReader::new(&bytes);
        assert!(matches!(
            reader.read_len_prefixed("blob", 16),
            Err(DecodeError::LimitsExceeded {
                kind: LimitKind::BlobBytes,
                limit: 16,
                actual: 256
            })
        ));
    }

    #[test]
    fn read_u32_truncated() {
        let mut reader = ByteReader::new(&[1, 2]);
        assert_eq!(
            reader.read_u32("count"),
            Err(DecodeError::Truncated {
                field: "count",
                needed: 4,
                available: 2
            })
        );
        assert_eq!(reader.position(), 0, "failed read must not advance");
    }

    #[test]
    fn expect_end_reports_trailing_bytes() {
        let mut reader = ByteReader::new(&[0, 1, 2]);
        reader.read_u16("x").unwrap();
        assert_eq!(
            reader.expect_end(),
            Err(DecodeError::TrailingBytes { remaining: 1 })
        );
    }
}
