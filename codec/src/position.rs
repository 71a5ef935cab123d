//! Packing of chunk-local positions into integer keys.
//!
//! A position key is 32 bits:
//!
//! ```text
//! 31            12 11    8 7     4 3     0
//! +---------------+-------+-------+-------+
//! | y (20, signed)|   x   |   z   |  0000 |
//! +---------------+-------+-------+-------+
//! ```
//!
//! A [`PackedInstruction`] puts a 32-bit palette id above the key.

use crate::error::{Axis, PositionError};

/// Lowest legal `y`.
pub const MIN_Y: i32 = -(1 << 19);
/// Highest legal `y`.
pub const MAX_Y: i32 = (1 << 19) - 1;

const Y_MASK: u32 = 0xF_FFFF;
const Y_SHIFT: u32 = 12;
const X_SHIFT: u32 = 8;
const Z_SHIFT: u32 = 4;

/// Packs a position. `x` and `z` are masked to 4 bits, `y` to 20 bits.
#[must_use]
pub const fn pack_position(x: u8, y: i32, z: u8) -> u32 {
    ((y as u32 & Y_MASK) << Y_SHIFT)
        | (((x & 0xF) as u32) << X_SHIFT)
        | (((z & 0xF) as u32) << Z_SHIFT)
}

#[must_use]
pub const fn unpack_x(key: u32) -> u8 {
    ((key >> X_SHIFT) & 0xF) as u8
}

/// Sign-extends the 20-bit field.
#[must_use]
pub const fn unpack_y(key: u32) -> i32 {
    (key as i32) >> Y_SHIFT
}

#[must_use]
pub const fn unpack_z(key: u32) -> u8 {
    ((key >> Z_SHIFT) & 0xF) as u8
}

/// A validated chunk-local position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalPos {
    y: i32,
    z: u8,
    x: u8,
}

impl LocalPos {
    /// Validates `x, z ∈ 0..=15` and `y ∈ MIN_Y..=MAX_Y`.
    pub const fn new(x: i32, y: i32, z: i32) -> Result<Self, PositionError> {
        if x < 0 || x > 15 {
            return Err(PositionError {
                axis: Axis::X,
                value: x,
                min: 0,
                max: 15,
            });
        }
        if z < 0 || z > 15 {
            return Err(PositionError {
                axis: Axis::Z,
                value: z,
                min: 0,
                max: 15,
            });
        }
        if y < MIN_Y || y > MAX_Y {
            return Err(PositionError {
                axis: Axis::Y,
                value: y,
                min: MIN_Y,
                max: MAX_Y,
            });
        }
        Ok(Self {
            x: x as u8,
            y,
            z: z as u8,
        })
    }

    /// Decodes a key. Every key is a valid position; reserved bits are ignored.
    #[must_use]
    pub const fn from_key(key: u32) -> Self {
        Self {
            x: unpack_x(key),
            y: unpack_y(key),
            z: unpack_z(key),
        }
    }

    /// Position of cell `index` (`(y << 8) | (z << 4) | x`) in section `section_y`.
    #[must_use]
    pub const fn from_section_index(section_y: i32, index: u16) -> Self {
        Self {
            x: (index & 0xF) as u8,
            y: section_y * 16 + ((index >> 8) & 0xF) as i32,
            z: ((index >> 4) & 0xF) as u8,
        }
    }

    #[must_use]
    pub const fn x(self) -> u8 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn z(self) -> u8 {
        self.z
    }

    #[must_use]
    pub const fn key(self) -> u32 {
        pack_position(self.x, self.y, self.z)
    }

    /// Index of the 16-tall section containing this position.
    #[must_use]
    pub const fn section_y(self) -> i32 {
        self.y >> 4
    }

    /// Cell index within the section, `(y << 8) | (z << 4) | x`.
    #[must_use]
    pub const fn section_index(self) -> u16 {
        (((self.y & 0xF) as u16) << 8) | ((self.z as u16) << 4) | self.x as u16
    }
}

/// One recorded change: a palette id and a position key in a single `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedInstruction(u64);

impl PackedInstruction {
    #[must_use]
    pub const fn new(pos: LocalPos, palette_id: u32) -> Self {
        Self(((palette_id as u64) << 32) | pos.key() as u64)
    }

    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn palette_id(self) -> u32 {
        (self.0 >> 32) as u32
    }

    #[must_use]
    pub const fn key(self) -> u32 {
        self.0 as u32
    }

    #[must_use]
    pub const fn pos(self) -> LocalPos {
        LocalPos::from_key(self.key())
    }
}
