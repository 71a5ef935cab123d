//! Bit-level reader.

use crate::error::{BitError, BitResult};
use crate::zigzag::zigzag_decode;

/// A bit-level reader for MSB-first packed data.
///
/// Reads past the end of the buffer do not fail: the missing bits read as
/// zero and the overrun is remembered. Callers that need an exact stream
/// check [`ensure_in_bounds`](Self::ensure_in_bounds) once parsing is done.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new `BitReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Returns the total number of bits in the buffer.
    #[must_use]
    pub const fn bits_total(&self) -> usize {
        self.data.len().saturating_mul(8)
    }

    /// Returns the number of bits remaining to read.
    #[must_use]
    pub const fn bits_remaining(&self) -> usize {
        self.bits_total().saturating_sub(self.bit_pos)
    }

    /// Returns `true` if there are no more bits to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }

    /// Returns the current bit position. May exceed [`bits_total`](Self::bits_total)
    /// after an overrun.
    #[must_use]
    pub const fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Returns `true` if any read went past the end of the buffer.
    #[must_use]
    pub const fn is_overrun(&self) -> bool {
        self.bit_pos > self.bits_total()
    }

    /// Reports an overrun as an error.
    pub const fn ensure_in_bounds(&self) -> BitResult<()> {
        if self.is_overrun() {
            return Err(BitError::EndOfBuffer {
                requested: self.bit_pos,
                available: self.bits_total(),
            });
        }
        Ok(())
    }

    /// Reads a single bit as a boolean.
    pub fn read_bool(&mut self) -> bool {
        let byte_idx = self.bit_pos / 8;
        let bit = self
            .data
            .get(byte_idx)
            .map_or(0, |byte| (byte >> (7 - self.bit_pos % 8)) & 1);
        self.bit_pos += 1;
        bit == 1
    }

    /// Reads up to 64 bits as an unsigned integer.
    ///
    /// Bits beyond the end of the buffer read as zero, so a truncated stream
    /// yields the available prefix shifted left.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBitCount`] if `bits > 64`.
    pub fn read_bits(&mut self, bits: usize) -> BitResult<u64> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }

        let mut value = 0u64;
        let mut remaining = bits;
        while remaining > 0 {
            let byte_idx = self.bit_pos / 8;
            let Some(&byte) = self.data.get(byte_idx) else {
                self.bit_pos += remaining;
                return Ok(if remaining == 64 { 0 } else { value << remaining });
            };
            let offset = self.bit_pos % 8;
            let available = 8 - offset;
            let take = available.min(remaining);
            let chunk = (byte >> (available - take)) & (((1u16 << take) - 1) as u8);
            value = (value << take) | u64::from(chunk);
            self.bit_pos += take;
            remaining -= take;
        }
        Ok(value)
    }

    /// Reads a zig-zag mapped signed value from a `bits`-wide field.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBitCount`] if `bits > 32`.
    pub fn read_zigzag(&mut self, bits: usize) -> BitResult<i32> {
        if bits > 32 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 32 });
        }
        let raw = self.read_bits(bits)?;
        Ok(zigzag_decode(raw as u32))
    }
}
