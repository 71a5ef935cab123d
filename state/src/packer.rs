//! Minimal-width packing of a state's properties.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use bitstream::{BitReader, BitWriter};
use tracing::trace;

use crate::adapter::StateAdapter;
use crate::error::{StateError, StateResult};
use crate::width::bits_for;

/// A property with its packed width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedField<P> {
    pub property: P,
    pub name: String,
    pub value_count: u32,
    pub bits: usize,
}

/// Packs and unpacks states as one fixed-width index per property.
///
/// The field layout of each shape is computed once and cached. The cache is
/// safe to share between threads; lookups take a read lock and only the first
/// use of a shape takes the write lock.
pub struct PropertyPacker<A: StateAdapter> {
    cache: RwLock<HashMap<A::Shape, Arc<[PackedField<A::Property>]>>>,
}

impl<A: StateAdapter> Default for PropertyPacker<A> {
    fn default() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }
}

impl<A: StateAdapter> fmt::Debug for PropertyPacker<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyPacker")
            .field("cached_shapes", &self.cached_shapes())
            .finish()
    }
}

impl<A: StateAdapter> PropertyPacker<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of shapes with a cached layout.
    pub fn cached_shapes(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Field layout for `shape`, sorted by property name.
    pub fn fields(&self, adapter: &A, shape: &A::Shape) -> Arc<[PackedField<A::Property>]> {
        if let Some(fields) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(shape)
        {
            return Arc::clone(fields);
        }

        let mut defs = adapter.properties(shape);
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        let fields: Arc<[PackedField<A::Property>]> = defs
            .into_iter()
            .map(|def| PackedField {
                bits: bits_for(def.value_count as usize),
                property: def.property,
                name: def.name,
                value_count: def.value_count,
            })
            .collect();
        trace!(fields = fields.len(), "cached property layout");

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(shape.clone()).or_insert(fields))
    }

    /// Total bits [`write_properties`](Self::write_properties) emits for `shape`.
    pub fn packed_bits(&self, adapter: &A, shape: &A::Shape) -> usize {
        self.fields(adapter, shape).iter().map(|f| f.bits).sum()
    }

    /// Writes one index per property of `state`'s shape.
    pub fn write_properties(
        &self,
        adapter: &A,
        writer: &mut BitWriter,
        state: &A::State,
    ) -> StateResult<()> {
        let fields = self.fields(adapter, &adapter.shape_of(state));
        for field in fields.iter() {
            let index = adapter.property_index(state, &field.property);
            if index >= field.value_count.max(1) {
                return Err(StateError::PropertyIndexOutOfRange {
                    property: field.name.clone(),
                    index,
                    value_count: field.value_count,
                });
            }
            writer.write_bits(u64::from(index), field.bits)?;
        }
        Ok(())
    }

    /// Rebuilds a state of `shape` from packed indices.
    ///
    /// Starts from the shape's default state and applies each property in
    /// layout order. An index beyond a property's value count leaves that
    /// property at its default.
    pub fn read_properties(
        &self,
        adapter: &A,
        reader: &mut BitReader<'_>,
        shape: &A::Shape,
    ) -> StateResult<A::State> {
        let fields = self.fields(adapter, shape);
        let mut state = adapter.default_state(shape);
        for field in fields.iter() {
            let index = reader.read_bits(field.bits)? as u32;
            if index < field.value_count {
                state = adapter.with_property(&state, &field.property, index);
            }
        }
        Ok(state)
    }
}
