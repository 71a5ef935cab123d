//! Error types for bitstream operations.

use std::fmt;

/// Result type for bitstream operations.
pub type BitResult<T> = Result<T, BitError>;

/// Errors that can occur during bit-level encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitError {
    /// The reader consumed more bits than the buffer holds.
    ///
    /// Reads themselves are lenient; this is reported by
    /// [`BitReader::ensure_in_bounds`](crate::BitReader::ensure_in_bounds).
    EndOfBuffer {
        /// Number of bits consumed.
        requested: usize,
        /// Number of bits available.
        available: usize,
    },

    /// Invalid bit count for the operation.
    InvalidBitCount {
        /// The invalid bit count provided.
        bits: usize,
        /// Maximum allowed bits for this operation.
        max_bits: usize,
    },

    /// Value exceeds the range representable by the specified number of bits.
    ValueOutOfRange {
        /// The value that was out of range.
        value: u64,
        /// Number of bits available.
        bits: usize,
    },
}

impl fmt::Display for BitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfBuffer {
                requested,
                available,
            } => {
                write!(
                    f,
                    "read {requested} bits but only {available} bits available"
                )
            }
            Self::InvalidBitCount { bits, max_bits } => {
                write!(f, "invalid bit count {bits}, maximum allowed is {max_bits}")
            }
            Self::ValueOutOfRange { value, bits } => {
                write!(f, "value {value} cannot be represented in {bits} bits")
            }
        }
    }
}

impl std::error::Error for BitError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_end_of_buffer() {
        let err = BitError::EndOfBuffer {
            requested: 12,
            available: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains("12 bits"), "should mention consumed bits");
        assert!(msg.contains("8 bits"), "should mention available bits");
    }

    #[test]
    fn error_display_invalid_bit_count() {
        let err = BitError::InvalidBitCount {
            bits: 65,
            max_bits: 64,
        };
        let msg = err.to_string();
        assert!(msg.contains("65"));
        assert!(msg.contains("64"));
    }

    #[test]
    fn error_display_value_out_of_range() {
        let err = BitError::ValueOutOfRange { value: 64, bits: 6 };
        let msg = err.to_string();
        assert!(msg.contains("64"));
        assert!(msg.contains("6 bits"));
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<BitError>();
    }
}
