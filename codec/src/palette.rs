//! Append-only value ↔ dense id table.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{CodecError, CodecResult};

/// Insertion-ordered table of unique values.
///
/// A value's id is its index in [`all`](Self::all). Ids are never reused or
/// reassigned; there is no removal.
#[derive(Debug, Clone)]
pub struct Palette<T> {
    values: Vec<T>,
    ids: HashMap<T, u32>,
}

impl<T> Default for Palette<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            ids: HashMap::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> Palette<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `value`, appending it if absent.
    pub fn get_or_add(&mut self, value: &T) -> CodecResult<u32> {
        if let Some(id) = self.ids.get(value) {
            return Ok(*id);
        }
        let id = u32::try_from(self.values.len()).map_err(|_| CodecError::PaletteFull {
            len: self.values.len(),
        })?;
        self.values.push(value.clone());
        self.ids.insert(value.clone(), id);
        Ok(id)
    }

    /// Id of `value` if present.
    pub fn id_of(&self, value: &T) -> Option<u32> {
        self.ids.get(value).copied()
    }
}

impl<T> Palette<T> {
    /// Value with `id`, or `None` outside `0..len`.
    pub fn get(&self, id: u32) -> Option<&T> {
        self.values.get(id as usize)
    }

    /// All values in id order.
    pub fn all(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_insertion_order() {
        let mut palette = Palette::new();
        assert_eq!(palette.get_or_add(&"stone").unwrap(), 0);
        assert_eq!(palette.get_or_add(&"dirt").unwrap(), 1);
        assert_eq!(palette.get_or_add(&"stone").unwrap(), 0);
        assert_eq!(palette.all(), &["stone", "dirt"]);
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn get_is_bounds_checked() {
        let mut palette = Palette::new();
        palette.get_or_add(&7u8).unwrap();
        assert_eq!(palette.get(0), Some(&7));
        assert_eq!(palette.get(1), None);
        assert_eq!(palette.get(u32::MAX), None);
    }

    #[test]
    fn empty_palette() {
        let palette: Palette<u8> = Palette::new();
        assert!(palette.is_empty());
        assert_eq!(palette.get(0), None);
        assert_eq!(palette.id_of(&0), None);
    }
}
