//! MSB-first bit packing primitives for the CIS chunk delta format.
//!
//! This crate provides [`BitWriter`] and [`BitReader`] for variable-width
//! bit fields (1 to 64 bits) plus zig-zag helpers for small signed values.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Lenient reads** - Reading past the end yields zero bits; the overrun is
//!   tracked and surfaced through [`BitReader::ensure_in_bounds`].
//! - **No domain knowledge** - This crate knows nothing about chunks, sections, or palettes.
//! - **Explicit errors** - Invalid widths and oversized values return structured errors.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bool(true);
//! writer.write_bits(42, 7).unwrap();
//! writer.write_zigzag(-3, 6).unwrap();
//!
//! let bytes = writer.finish();
//!
//! let mut reader = BitReader::new(&bytes);
//! assert!(reader.read_bool());
//! assert_eq!(reader.read_bits(7).unwrap(), 42);
//! assert_eq!(reader.read_zigzag(6).unwrap(), -3);
//! assert!(reader.ensure_in_bounds().is_ok());
//! ```

mod error;
mod reader;
mod writer;
mod zigzag;

pub use error::{BitError, BitResult};
pub use reader::BitReader;
pub use writer::BitWriter;
pub use zigzag::{zigzag_decode, zigzag_encode};
