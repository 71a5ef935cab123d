//! Zig-zag mapping between signed and unsigned integers.

/// Maps a signed value so that small magnitudes become small unsigned values:
/// `0, -1, 1, -2, 2, ...` become `0, 1, 2, 3, 4, ...`.
#[must_use]
pub const fn zigzag_encode(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`zigzag_encode`].
#[must_use]
pub const fn zigzag_decode(raw: u32) -> i32 {
    ((raw >> 1) as i32) ^ -((raw & 1) as i32)
}
