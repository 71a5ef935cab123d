//! Error types for codec operations.

use std::fmt;

use crate::blob::BlobError;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while tracking, encoding or decoding a chunk delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Byte-level format error (magic, version, truncation, limits).
    Wire(wire::DecodeError),

    /// A count or length does not fit its field while encoding.
    Encode(wire::EncodeError),

    /// Bitstream error.
    Bitstream(bitstream::BitError),

    /// Value mapping or property packing error.
    State(state::StateError),

    /// Coordinates outside the representable range.
    Position(PositionError),

    /// A section index does not fit the 6-bit zig-zag field.
    SectionOutOfRange { section_y: i32 },

    /// A palette reached the 32-bit id limit.
    PaletteFull { len: usize },

    /// The blob adapter failed.
    Blob(BlobError),

    /// A sparse section claims more cells than a section holds.
    InvalidSectionCount { section_y: i32, count: usize },

    /// A dense section has an empty local palette.
    InvalidLocalPalette { section_y: i32, size: usize },

    /// Two encoded sections share an index.
    DuplicateSection { section_y: i32 },

    /// The section blob has whole bytes left after the last section.
    TrailingSectionData { remaining_bits: usize },

    /// A decoded quantity exceeds a configured codec limit.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Codec-level limits that can be exceeded while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    TotalCells,
    LocalPalette,
}

/// Axis of an out-of-range coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A coordinate outside its legal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionError {
    pub axis: Axis,
    pub value: i32,
    pub min: i32,
    pub max: i32,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(err) => write!(f, "format error: {err}"),
            Self::Encode(err) => write!(f, "encode error: {err}"),
            Self::Bitstream(err) => write!(f, "bitstream error: {err}"),
            Self::State(err) => write!(f, "state error: {err}"),
            Self::Position(err) => write!(f, "invalid position: {err}"),
            Self::SectionOutOfRange { section_y } => {
                write!(f, "section {section_y} cannot be encoded (outside -32..=31)")
            }
            Self::PaletteFull { len } => write!(f, "palette full at {len} entries"),
            Self::Blob(err) => write!(f, "blob error: {err}"),
            Self::InvalidSectionCount { section_y, count } => {
                write!(f, "section {section_y} claims {count} cells")
            }
            Self::InvalidLocalPalette { section_y, size } => {
                write!(f, "section {section_y} has invalid local palette size {size}")
            }
            Self::DuplicateSection { section_y } => {
                write!(f, "section {section_y} encoded twice")
            }
            Self::TrailingSectionData { remaining_bits } => {
                write!(f, "{remaining_bits} unread bits after last section")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => write!(f, "{kind} limit exceeded: {actual} > {limit}"),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TotalCells => "total cells",
            Self::LocalPalette => "local palette",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} outside {}..={}",
            self.axis, self.value, self.min, self.max
        )
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Bitstream(err) => Some(err),
            Self::State(err) => Some(err),
            Self::Position(err) => Some(err),
            Self::Blob(err) => Some(err),
            _ => None,
        }
    }
}

impl std::error::Error for PositionError {}

impl From<wire::DecodeError> for CodecError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Wire(err)
    }
}

impl From<wire::EncodeError> for CodecError {
    fn from(err: wire::EncodeError) -> Self {
        Self::Encode(err)
    }
}

impl From<bitstream::BitError> for CodecError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}

impl From<state::StateError> for CodecError {
    fn from(err: state::StateError) -> Self {
        Self::State(err)
    }
}

impl From<PositionError> for CodecError {
    fn from(err: PositionError) -> Self {
        Self::Position(err)
    }
}

impl From<BlobError> for CodecError {
    fn from(err: BlobError) -> Self {
        Self::Blob(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn position_error_display() {
        let err = PositionError {
            axis: Axis::X,
            value: 16,
            min: 0,
            max: 15,
        };
        assert_eq!(err.to_string(), "x = 16 outside 0..=15");
    }

    #[test]
    fn wrapped_errors_expose_source() {
        let err = CodecError::from(wire::DecodeError::InvalidMagic { found: 0 });
        assert!(err.source().is_some());
        assert!(err.to_string().contains("format error"));

        let err = CodecError::SectionOutOfRange { section_y: 40 };
        assert!(err.source().is_none());
        assert!(err.to_string().contains("40"));
    }

    #[test]
    fn limits_exceeded_display() {
        let err = CodecError::LimitsExceeded {
            kind: LimitKind::TotalCells,
            limit: 10,
            actual: 11,
        };
        assert_eq!(err.to_string(), "total cells limit exceeded: 11 > 10");
    }

    #[test]
    fn version_mismatch_is_explicit() {
        let err = CodecError::from(wire::DecodeError::UnsupportedVersion {
            found: 6,
            expected: 7,
        });
        assert!(err.to_string().contains("unsupported format version 6"));
    }
}
