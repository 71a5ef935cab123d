//! Bit-level writer for encoding packed binary data.

use crate::error::{BitError, BitResult};
use crate::zigzag::zigzag_encode;

/// A bit-level writer that packs values MSB-first into a growable buffer.
///
/// Call [`finish`](Self::finish) to flush the partial byte and take the bytes.
#[derive(Debug, Default)]
pub struct BitWriter {
    /// The accumulated bytes.
    bytes: Vec<u8>,
    /// Current byte being written (not yet pushed to bytes).
    current_byte: u8,
    /// Number of bits written to `current_byte` (0-7).
    bit_count: u8,
}

impl BitWriter {
    /// Creates a new empty `BitWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `BitWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self::with_buffer(Vec::with_capacity(bytes))
    }

    /// Creates a writer that reuses `buf`'s allocation. Existing contents are discarded.
    #[must_use]
    pub fn with_buffer(mut buf: Vec<u8>) -> Self {
        buf.clear();
        Self {
            bytes: buf,
            current_byte: 0,
            bit_count: 0,
        }
    }

    /// Returns the number of bits written so far.
    #[must_use]
    pub fn bits_written(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }

    /// Writes a single bit.
    pub fn write_bool(&mut self, value: bool) {
        self.current_byte = (self.current_byte << 1) | u8::from(value);
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.push_current();
        }
    }

    /// Writes the low `bits` bits of `value`, most significant first.
    ///
    /// Writing zero bits is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBitCount`] if `bits > 64`.
    /// Returns [`BitError::ValueOutOfRange`] if `value` doesn't fit in `bits`.
    pub fn write_bits(&mut self, value: u64, bits: usize) -> BitResult<()> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        if bits == 0 {
            return Ok(());
        }
        if bits < 64 && value >> bits != 0 {
            return Err(BitError::ValueOutOfRange { value, bits });
        }

        let mut remaining = bits;
        while remaining > 0 {
            let free = 8 - self.bit_count as usize;
            let take = free.min(remaining);
            remaining -= take;
            let chunk = ((value >> remaining) & ((1u64 << take) - 1)) as u8;
            self.current_byte = if take == 8 {
                chunk
            } else {
                (self.current_byte << take) | chunk
            };
            self.bit_count += take as u8;
            if self.bit_count == 8 {
                self.push_current();
            }
        }
        Ok(())
    }

    /// Writes a signed value zig-zag mapped into a `bits`-wide field.
    ///
    /// # Errors
    ///
    /// Same as [`write_bits`](Self::write_bits) for the mapped value.
    pub fn write_zigzag(&mut self, value: i32, bits: usize) -> BitResult<()> {
        self.write_bits(u64::from(zigzag_encode(value)), bits)
    }

    /// Finishes writing and returns the byte buffer.
    ///
    /// If the last byte is incomplete, it is padded with zeros on the right.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.flush_partial();
        self.bytes
    }

    /// Finishes writing and appends to the provided buffer.
    ///
    /// If the last byte is incomplete, it is padded with zeros on the right.
    pub fn finish_into(mut self, buf: &mut Vec<u8>) {
        self.flush_partial();
        buf.append(&mut self.bytes);
    }

    fn push_current(&mut self) {
        self.bytes.push(self.current_byte);
        self.current_byte = 0;
        self.bit_count = 0;
    }

    fn flush_partial(&mut self) {
        if self.bit_count > 0 {
            self.current_byte <<= 8 - self.bit_count;
            self.push_current();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_writer() {
        let writer = BitWriter::new();
        assert_eq!(writer.bits_written(), 0);
        assert!(writer.finish().is_empty());
    }

    #[test]
    fn write_single_bit_true() {
        let mut writer = BitWriter::new();
        writer.write_bool(true);
        assert_eq!(writer.bits_written(), 1);
        assert_eq!(writer.finish(), vec![0b1000_0000]);
    }

    #[test]
    fn write_partial_byte_with_padding() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b11010, 5).unwrap();
        // 11010 + 000 padding
        assert_eq!(writer.finish(), vec![0b1101_0000]);
    }

    #[test]
    fn write_bits_zero_is_noop() {
        let mut writer = BitWriter::new();
        writer.write_bits(0, 0).unwrap();
        assert_eq!(writer.bits_written(), 0);
        assert!(writer.finish().is_empty());
    }

    #[test]
    fn write_bits_multiple_bytes() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xABCD, 16).unwrap();
        assert_eq!(writer.finish(), vec![0xAB, 0xCD]);
    }

    #[test]
    fn write_bits_across_byte_boundary() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b1111, 4).unwrap();
        writer.write_bits(0b1010_1010, 8).unwrap();
        assert_eq!(writer.finish(), vec![0b1111_1010, 0b1010_0000]);
    }

    #[test]
    fn write_bits_unaligned_wide_value() {
        let mut writer = BitWriter::new();
        writer.write_bool(true);
        writer.write_bits(u64::MAX, 64).unwrap();
        let bytes = writer.finish();
        assert_eq!(bytes.len(), 9);
        assert!(bytes[..8].iter().all(|b| *b == 0xFF));
        assert_eq!(bytes[8], 0b1000_0000);
    }

    #[test]
    fn write_bits_rejects_too_many_bits() {
        let mut writer = BitWriter::new();
        let err = writer.write_bits(0, 65).unwrap_err();
        assert_eq!(
            err,
            BitError::InvalidBitCount {
                bits: 65,
                max_bits: 64
            }
        );
    }

    #[test]
    fn write_bits_rejects_value_too_wide() {
        let mut writer = BitWriter::new();
        let err = writer.write_bits(16, 4).unwrap_err();
        assert_eq!(err, BitError::ValueOutOfRange { value: 16, bits: 4 });
        assert_eq!(writer.bits_written(), 0, "failed write must not emit bits");
    }

    #[test]
    fn write_zigzag_small_negative() {
        let mut writer = BitWriter::new();
        // -1 maps to 1, -4 maps to 7
        writer.write_zigzag(-1, 6).unwrap();
        writer.write_zigzag(-4, 6).unwrap();
        assert_eq!(writer.finish(), vec![0b0000_0100, 0b0111_0000]);
    }

    #[test]
    fn write_zigzag_rejects_overflowing_field() {
        let mut writer = BitWriter::new();
        assert!(writer.write_zigzag(32, 6).is_err());
        assert!(writer.write_zigzag(31, 6).is_ok());
        assert!(writer.write_zigzag(-32, 6).is_ok());
    }

    #[test]
    fn with_buffer_discards_previous_contents() {
        let mut writer = BitWriter::with_buffer(vec![1, 2, 3]);
        writer.write_bits(0xFE, 8).unwrap();
        assert_eq!(writer.finish(), vec![0xFE]);
    }

    #[test]
    fn finish_into_appends() {
        let mut out = vec![0xAA];
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3).unwrap();
        writer.finish_into(&mut out);
        assert_eq!(out, vec![0xAA, 0b1010_0000]);
    }
}
