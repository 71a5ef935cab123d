//! Value adapter, property packing and stable id registry for the CIS format.
//!
//! The codec never interprets chunk values itself. This crate defines the
//! boundary it talks through:
//! - [`StateAdapter`], implemented by the host for its value type
//! - [`PropertyPacker`], which packs a value's properties at minimal width
//! - [`IdMapping`], the persistent shape ↔ short id registry
//! - [`StateMapping`], the three bundled for the codec
//!
//! # Design Principles
//!
//! - **Deterministic layout** - Properties are packed in name order, so encoder
//!   and decoder agree without transmitting the layout.
//! - **One width rule** - [`bits_for`] is the only place bit widths are computed.
//! - **Shared, not global** - Caches live in values the host shares explicitly.

mod adapter;
mod error;
mod mapping;
mod packer;
mod registry;
mod width;

pub use adapter::{PropertyDef, StateAdapter};
pub use error::{StateError, StateResult};
pub use mapping::{IdMapping, MappingTable};
pub use packer::{PackedField, PropertyPacker};
pub use registry::StateMapping;
pub use width::bits_for;
