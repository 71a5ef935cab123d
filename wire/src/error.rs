//! Error types for wire format operations.

use std::fmt;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// Decode errors for the byte-level file layout.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// File is too small to contain the header.
    FileTooSmall { actual: usize, required: usize },

    /// Invalid magic number in the file header.
    InvalidMagic { found: u32 },

    /// File was written by a different format version.
    UnsupportedVersion { found: u32, expected: u32 },

    /// A fixed-size field or length-prefixed body runs past the end of the buffer.
    Truncated {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// Bytes remain after the last field.
    TrailingBytes { remaining: usize },
}

/// Specific wire limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    FileBytes,
    PaletteEntries,
    SectionCount,
    MetadataEntries,
    FreeRecords,
    BlobBytes,
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A count or length does not fit its fixed-width field.
    LengthOverflow {
        field: &'static str,
        length: usize,
        max: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileTooSmall { actual, required } => {
                write!(f, "file too small: {actual} bytes, need at least {required}")
            }
            Self::InvalidMagic { found } => {
                write!(f, "invalid magic number: 0x{found:08X}")
            }
            Self::UnsupportedVersion { found, expected } => {
                write!(f, "unsupported format version {found} (expected {expected})")
            }
            Self::Truncated {
                field,
                needed,
                available,
            } => {
                write!(
                    f,
                    "truncated {field}: need {needed} bytes, have {available}"
                )
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::TrailingBytes { remaining } => {
                write!(f, "{remaining} trailing bytes after free records")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FileBytes => "file bytes",
            Self::PaletteEntries => "palette entries",
            Self::SectionCount => "section count",
            Self::MetadataEntries => "metadata entries",
            Self::FreeRecords => "free records",
            Self::BlobBytes => "blob bytes",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthOverflow { field, length, max } => {
                write!(f, "{field} length {length} exceeds maximum {max}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl std::error::Error for EncodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display_invalid_magic() {
        let err = DecodeError::InvalidMagic { found: 0xDEAD_BEEF };
        assert!(err.to_string().contains("DEADBEEF"));
    }

    #[test]
    fn decode_error_display_version_mismatch() {
        let err = DecodeError::UnsupportedVersion {
            found: 6,
            expected: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains('6'));
        assert!(msg.contains("expected 7"));
    }

    #[test]
    fn decode_error_display_truncated() {
        let err = DecodeError::Truncated {
            field: "section blob",
            needed: 10,
            available: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("section blob"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn decode_error_display_limits_exceeded() {
        let err = DecodeError::LimitsExceeded {
            kind: LimitKind::PaletteEntries,
            limit: 10_000,
            actual: 70_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("palette entries"));
        assert!(msg.contains("70000"));
    }

    #[test]
    fn encode_error_display() {
        let err = EncodeError::LengthOverflow {
            field: "section count",
            length: 70_000,
            max: 65_535,
        };
        let msg = err.to_string();
        assert!(msg.contains("section count"));
        assert!(msg.contains("65535"));
    }
}
