//! Stable shape ↔ short id registry.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};

use blake3::Hasher;
use tracing::{debug, warn};

use crate::error::{StateError, StateResult};

/// Assigns every shape a `u16` id that stays fixed for the life of a world.
///
/// Ids are handed out in first-use order and never reused. The empty shape
/// is registered on construction so it always has the lowest id of a fresh
/// registry. Safe to share between threads.
pub struct IdMapping<K> {
    inner: RwLock<MappingInner<K>>,
}

struct MappingInner<K> {
    to_id: HashMap<K, u16>,
    from_id: HashMap<u16, K>,
    next_id: u32,
}

impl<K: Clone + Eq + Hash> MappingInner<K> {
    fn insert(&mut self, key: K, id: u16) {
        self.to_id.insert(key.clone(), id);
        self.from_id.insert(id, key);
        self.next_id = self.next_id.max(u32::from(id) + 1);
    }
}

impl<K> fmt::Debug for IdMapping<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("IdMapping")
            .field("len", &inner.to_id.len())
            .field("next_id", &inner.next_id)
            .finish()
    }
}

impl<K: Clone + Eq + Hash> IdMapping<K> {
    /// Creates a registry with `empty` mapped to id 0.
    pub fn new(empty: K) -> Self {
        let mut inner = MappingInner {
            to_id: HashMap::new(),
            from_id: HashMap::new(),
            next_id: 0,
        };
        inner.insert(empty, 0);
        Self {
            inner: RwLock::new(inner),
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .to_id
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Id of an already registered shape.
    pub fn get(&self, key: &K) -> Option<u16> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .to_id
            .get(key)
            .copied()
    }

    /// Id of `key`, registering it if unseen.
    pub fn id_for(&self, key: &K) -> StateResult<u16> {
        if let Some(id) = self.get(key) {
            return Ok(id);
        }
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = inner.to_id.get(key) {
            return Ok(*id);
        }
        let id = u16::try_from(inner.next_id).map_err(|_| StateError::IdSpaceExhausted {
            registered: inner.to_id.len(),
        })?;
        inner.insert(key.clone(), id);
        debug!(id, "registered new shape id");
        Ok(id)
    }

    /// Shape registered under `id`.
    pub fn shape_for(&self, id: u16) -> Option<K> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .from_id
            .get(&id)
            .cloned()
    }

    /// Snapshot of the registry keyed by `name_of(shape)`.
    pub fn export(&self, mut name_of: impl FnMut(&K) -> String) -> MappingTable {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let ids = inner
            .to_id
            .iter()
            .map(|(key, id)| (name_of(key), *id))
            .collect();
        MappingTable { ids }
    }

    /// Rebuilds a registry from a table, resolving names with `shape_of`.
    ///
    /// Names that no longer resolve are skipped with a warning; their ids stay
    /// reserved so later registrations cannot reuse them. `empty` is mapped to
    /// id 0 unless the table already maps it.
    pub fn import(
        table: &MappingTable,
        empty: K,
        mut shape_of: impl FnMut(&str) -> Option<K>,
    ) -> StateResult<Self> {
        let mut inner = MappingInner {
            to_id: HashMap::new(),
            from_id: HashMap::new(),
            next_id: 0,
        };
        for (name, &id) in &table.ids {
            inner.next_id = inner.next_id.max(u32::from(id) + 1);
            let Some(key) = shape_of(name) else {
                warn!(name = %name, id, "unknown shape in mapping table");
                continue;
            };
            if inner.from_id.contains_key(&id) {
                return Err(StateError::DuplicateId { id });
            }
            inner.insert(key, id);
        }
        if !inner.to_id.contains_key(&empty) {
            if inner.from_id.contains_key(&0) {
                let id = u16::try_from(inner.next_id).map_err(|_| {
                    StateError::IdSpaceExhausted {
                        registered: inner.to_id.len(),
                    }
                })?;
                inner.insert(empty, id);
            } else {
                inner.insert(empty, 0);
            }
        }
        debug!(entries = inner.to_id.len(), "imported shape mapping");
        Ok(Self {
            inner: RwLock::new(inner),
        })
    }
}

/// Persistable form of an [`IdMapping`]: shape name → short id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MappingTable {
    pub ids: BTreeMap<String, u16>,
}

impl MappingTable {
    /// Name registered under `id`.
    pub fn name_of(&self, id: u16) -> Option<&str> {
        self.ids
            .iter()
            .find_map(|(name, &value)| (value == id).then_some(name.as_str()))
    }

    /// Inverse view, id → name.
    pub fn by_id(&self) -> BTreeMap<u16, &str> {
        self.ids
            .iter()
            .map(|(name, &id)| (id, name.as_str()))
            .collect()
    }

    /// Order-independent digest of the table.
    ///
    /// Two worlds can exchange chunk deltas only if their tables agree.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Hasher::new();
        hasher.update(&(self.ids.len() as u64).to_le_bytes());
        for (name, id) in &self.ids {
            hasher.update(&(name.len() as u64).to_le_bytes());
            hasher.update(name.as_bytes());
            hasher.update(&id.to_le_bytes());
        }
        let hash = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }
}
