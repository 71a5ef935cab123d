//! File header, byte framing and decode limits for the CIS chunk delta format.
//!
//! This crate handles the byte-level layer of a CIS file: the magic/version
//! header, big-endian scalars, counts, and `u32` length-prefixed bodies. It
//! does not know about palettes, sections or values; the bit-packed bodies are
//! parsed by the codec crate.
//!
//! # Design Principles
//!
//! - **Stable format** - Magic and version are fixed; a version bump is a format bump.
//! - **Bounded decoding** - Every count and length is validated against [`Limits`]
//!   and against the remaining buffer before use.
//! - **No domain knowledge** - This crate handles framing, not chunk semantics.

mod bytes;
mod error;
mod header;
mod limits;

pub use bytes::{ByteReader, ByteWriter};
pub use error::{DecodeError, EncodeError, LimitKind, WireResult};
pub use header::{read_header, write_header, HEADER_SIZE, MAGIC, VERSION};
pub use limits::Limits;
