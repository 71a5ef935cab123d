//! File header constants and framing.

use crate::bytes::{ByteReader, ByteWriter};
use crate::error::{DecodeError, WireResult};

/// Magic number identifying CIS files.
///
/// This value is fixed and must never change across versions.
pub const MAGIC: u32 = 0x4349_5334; // "CIS4" in ASCII

/// Current format version. Any other value is rejected on read.
pub const VERSION: u32 = 7;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 4 + 4;

/// Writes the magic number and current version.
pub fn write_header(out: &mut ByteWriter) {
    out.put_u32(MAGIC);
    out.put_u32(VERSION);
}

/// Reads and validates the header, leaving `reader` positioned at the palette.
pub fn read_header(reader: &mut ByteReader<'_>) -> WireResult<()> {
    if reader.remaining() < HEADER_SIZE {
        return Err(DecodeError::FileTooSmall {
            actual: reader.remaining(),
            required: HEADER_SIZE,
        });
    }
    let magic = reader.read_u32("magic")?;
    if magic != MAGIC {
        return Err(DecodeError::InvalidMagic { found: magic });
    }
    let version = reader.read_u32("version")?;
    if version != VERSION {
        return Err(DecodeError::UnsupportedVersion {
            found: version,
            expected: VERSION,
        });
    }
    Ok(())
}
