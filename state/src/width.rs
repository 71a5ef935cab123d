//! Bit-width rule shared by every packed field.

/// Number of bits needed to store an index into a table of `n` entries.
///
/// Never returns 0: a table of one entry (or none) still reserves one bit.
/// Encoder, decoder and property packer must all use this function.
#[must_use]
pub const fn bits_for(n: usize) -> usize {
    if n <= 2 {
        return 1;
    }
    (usize::BITS - (n - 1).leading_zeros()) as usize
}
