//! Adapter, property packer and id registry bundled for the codec.

use std::fmt;

use bitstream::{BitReader, BitWriter};

use crate::adapter::StateAdapter;
use crate::error::{StateError, StateResult};
use crate::mapping::IdMapping;
use crate::packer::PropertyPacker;

/// Everything the codec needs to turn a state into `(short id, property bits)`
/// and back.
///
/// One instance is meant to be shared (e.g. behind an `Arc`) by every chunk of
/// a world; the packer cache and id registry are internally synchronized.
pub struct StateMapping<A: StateAdapter> {
    adapter: A,
    packer: PropertyPacker<A>,
    ids: IdMapping<A::Shape>,
}

impl<A: StateAdapter> fmt::Debug for StateMapping<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMapping")
            .field("packer", &self.packer)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl<A: StateAdapter> StateMapping<A> {
    /// Creates a mapping with a fresh id registry.
    pub fn new(adapter: A) -> Self {
        let ids = IdMapping::new(adapter.shape_of(&adapter.empty_state()));
        Self::with_ids(adapter, ids)
    }

    /// Creates a mapping around an existing (e.g. imported) id registry.
    pub fn with_ids(adapter: A, ids: IdMapping<A::Shape>) -> Self {
        Self {
            adapter,
            packer: PropertyPacker::new(),
            ids,
        }
    }

    pub const fn adapter(&self) -> &A {
        &self.adapter
    }

    pub const fn packer(&self) -> &PropertyPacker<A> {
        &self.packer
    }

    pub const fn ids(&self) -> &IdMapping<A::Shape> {
        &self.ids
    }

    /// Short id of `state`'s shape, registering the shape if unseen.
    pub fn short_id(&self, state: &A::State) -> StateResult<u16> {
        self.ids.id_for(&self.adapter.shape_of(state))
    }

    /// Writes `state`'s property indices.
    pub fn write_state(&self, writer: &mut BitWriter, state: &A::State) -> StateResult<()> {
        self.packer.write_properties(&self.adapter, writer, state)
    }

    /// Reads the properties of a state whose shape has short id `id`.
    pub fn read_state(&self, reader: &mut BitReader<'_>, id: u16) -> StateResult<A::State> {
        let shape = self
            .ids
            .shape_for(id)
            .ok_or(StateError::UnknownShapeId { id })?;
        self.packer.read_properties(&self.adapter, reader, &shape)
    }
}
