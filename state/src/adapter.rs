//! The boundary between the codec and the host's value type.

use std::hash::Hash;

/// One independently packable sub-field of a value shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDef<P> {
    /// Handle passed back to the adapter.
    pub property: P,
    /// Stable name; fields are packed in ascending name order.
    pub name: String,
    /// Number of legal indices, `0..value_count`.
    pub value_count: u32,
}

impl<P> PropertyDef<P> {
    pub fn new(property: P, name: impl Into<String>, value_count: u32) -> Self {
        Self {
            property,
            name: name.into(),
            value_count,
        }
    }
}

/// Host-supplied semantics for the values stored in a chunk.
///
/// A *state* is a complete value. Every state has a *shape* (its type key);
/// all states of a shape differ only in their property indices, so a state is
/// fully described by its shape plus one index per property.
///
/// Implementations must be pure: the same inputs always give the same
/// outputs, and [`properties`](Self::properties) returns the same set for a
/// shape every time it is asked.
pub trait StateAdapter: Send + Sync {
    type State: Clone + Eq + Hash;
    type Shape: Clone + Eq + Hash;
    type Property: Clone;

    /// The canonical state of `shape`, the starting point for unpacking.
    fn default_state(&self, shape: &Self::Shape) -> Self::State;

    fn shape_of(&self, state: &Self::State) -> Self::Shape;

    /// Properties of `shape`, in any order.
    fn properties(&self, shape: &Self::Shape) -> Vec<PropertyDef<Self::Property>>;

    /// Index of `state`'s current value for `property`.
    fn property_index(&self, state: &Self::State, property: &Self::Property) -> u32;

    /// `state` with `property` set to the value at `index`.
    fn with_property(
        &self,
        state: &Self::State,
        property: &Self::Property,
        index: u32,
    ) -> Self::State;

    /// Whether `state` is the empty value (air).
    fn is_empty(&self, state: &Self::State) -> bool;

    /// The empty value. Always id 0 of an encoded global palette.
    fn empty_state(&self) -> Self::State;
}
