//! Errors for value mapping and property packing.

use std::fmt;

/// Result type for state operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur when mapping or packing values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Every `u16` short id is already assigned.
    IdSpaceExhausted { registered: usize },

    /// A short id read from a file has no registered shape.
    UnknownShapeId { id: u16 },

    /// Two names in an imported table claim the same id.
    DuplicateId { id: u16 },

    /// The adapter reported a property index outside the property's value count.
    PropertyIndexOutOfRange {
        property: String,
        index: u32,
        value_count: u32,
    },

    /// Bitstream error while packing or unpacking properties.
    Bitstream(bitstream::BitError),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdSpaceExhausted { registered } => {
                write!(f, "short id space exhausted after {registered} shapes")
            }
            Self::UnknownShapeId { id } => write!(f, "unknown shape id {id}"),
            Self::DuplicateId { id } => write!(f, "id {id} assigned to more than one name"),
            Self::PropertyIndexOutOfRange {
                property,
                index,
                value_count,
            } => {
                write!(
                    f,
                    "property {property} index {index} out of range (value count {value_count})"
                )
            }
            Self::Bitstream(err) => write!(f, "bitstream error: {err}"),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(err) => Some(err),
            _ => None,
        }
    }
}

impl From<bitstream::BitError> for StateError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}
