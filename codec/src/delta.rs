//! The mutable record of one chunk's modifications.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use state::StateAdapter;
use tracing::warn;

use crate::error::CodecResult;
use crate::palette::Palette;
use crate::position::{LocalPos, PackedInstruction};

const INITIAL_CAPACITY: usize = 64;

/// Whether a mutation counts as a new modification.
///
/// Replay and restoration use [`Tracking::Silent`] so that loading a chunk
/// does not make it look modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tracking {
    #[default]
    MarkDirty,
    Silent,
}

impl Tracking {
    const fn marks_dirty(self) -> bool {
        matches!(self, Self::MarkDirty)
    }
}

/// Receives the contents of a [`Delta`] from [`Delta::traverse`].
///
/// Every method defaults to doing nothing.
pub trait DeltaVisitor<S, B> {
    fn visit_change(&mut self, _pos: LocalPos, _state: &S) -> CodecResult<()> {
        Ok(())
    }

    fn visit_metadata(&mut self, _pos: LocalPos, _blob: &B) -> CodecResult<()> {
        Ok(())
    }

    fn visit_free_record(&mut self, _blob: &B) -> CodecResult<()> {
        Ok(())
    }
}

/// Counts from one [`Delta::traverse`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraverseStats {
    pub changes: usize,
    pub metadata: usize,
    pub free_records: usize,
    /// Instructions whose palette id did not resolve.
    pub skipped: usize,
}

type EmptyPredicate<S> = Arc<dyn Fn(&S) -> bool + Send + Sync>;

/// Changes to one chunk relative to its generated baseline.
///
/// Holds one [`PackedInstruction`] per modified position, a position index
/// kept in lockstep with the instruction array, optional per-position
/// metadata blobs, free-standing records, and a dirty flag.
///
/// Not internally synchronized; one owner mutates a delta at a time.
pub struct Delta<S, B> {
    instructions: Vec<PackedInstruction>,
    /// position key → index into `instructions`
    index: HashMap<u32, usize>,
    palette: Palette<S>,
    metadata: Option<BTreeMap<u32, B>>,
    free_records: Vec<B>,
    dirty: bool,
    empty: Option<EmptyPredicate<S>>,
}

impl<S, B> Default for Delta<S, B> {
    fn default() -> Self {
        Self {
            instructions: Vec::with_capacity(INITIAL_CAPACITY),
            index: HashMap::new(),
            palette: Palette::default(),
            metadata: None,
            free_records: Vec::new(),
            dirty: false,
            empty: None,
        }
    }
}

impl<S: Clone, B: Clone> Clone for Delta<S, B> {
    fn clone(&self) -> Self {
        Self {
            instructions: self.instructions.clone(),
            index: self.index.clone(),
            palette: self.palette.clone(),
            metadata: self.metadata.clone(),
            free_records: self.free_records.clone(),
            dirty: self.dirty,
            empty: self.empty.clone(),
        }
    }
}

impl<S, B> fmt::Debug for Delta<S, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delta")
            .field("changes", &self.instructions.len())
            .field("palette", &self.palette.len())
            .field("metadata", &self.metadata.as_ref().map_or(0, BTreeMap::len))
            .field("free_records", &self.free_records.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl<S, B> Delta<S, B>
where
    S: Clone + Eq + Hash,
    B: Clone + PartialEq,
{
    /// Creates an empty delta. No value is treated as empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty delta that drops metadata at positions set to a value
    /// for which `is_empty` holds.
    pub fn with_empty_predicate(is_empty: impl Fn(&S) -> bool + Send + Sync + 'static) -> Self {
        Self {
            empty: Some(Arc::new(is_empty)),
            ..Self::default()
        }
    }

    /// Creates an empty delta using `adapter`'s notion of the empty value.
    pub fn for_adapter<A>(adapter: &A) -> Self
    where
        A: StateAdapter<State = S> + Clone + 'static,
    {
        let adapter = adapter.clone();
        Self::with_empty_predicate(move |state| adapter.is_empty(state))
    }

    /// A fresh delta sharing this one's empty predicate.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self {
            empty: self.empty.clone(),
            ..Self::default()
        }
    }

    /// Records `state` at `pos`.
    pub fn add_or_update(&mut self, pos: LocalPos, state: &S) -> CodecResult<()> {
        self.add_or_update_with(pos, state, Tracking::MarkDirty)
    }

    /// Records `state` at `pos`. Rewriting the value already held is a no-op.
    pub fn add_or_update_with(
        &mut self,
        pos: LocalPos,
        state: &S,
        tracking: Tracking,
    ) -> CodecResult<()> {
        let id = self.palette.get_or_add(state)?;
        let instruction = PackedInstruction::new(pos, id);
        let key = pos.key();

        if let Some(&slot) = self.index.get(&key) {
            if self.instructions[slot] != instruction {
                self.instructions[slot] = instruction;
                if tracking.marks_dirty() {
                    self.dirty = true;
                }
            }
        } else {
            self.index.insert(key, self.instructions.len());
            self.instructions.push(instruction);
            if tracking.marks_dirty() {
                self.dirty = true;
            }
        }

        if self.is_empty_value(state) {
            self.drop_metadata(key, tracking);
        }
        Ok(())
    }

    /// Forgets the change at `pos`, and any metadata there. No-op if absent.
    ///
    /// The last instruction moves into the freed slot; removal is O(1).
    pub fn remove(&mut self, pos: LocalPos) {
        let key = pos.key();
        let Some(slot) = self.index.remove(&key) else {
            return;
        };
        if let Some(metadata) = &mut self.metadata {
            metadata.remove(&key);
        }
        self.swap_remove_at(slot);
        self.dirty = true;
    }

    pub fn has_change_at(&self, pos: LocalPos) -> bool {
        self.index.contains_key(&pos.key())
    }

    /// Value recorded at `pos`.
    pub fn value_at(&self, pos: LocalPos) -> Option<&S> {
        let slot = *self.index.get(&pos.key())?;
        self.palette.get(self.instructions[slot].palette_id())
    }

    /// Attaches `blob` to `pos`.
    pub fn set_metadata(&mut self, pos: LocalPos, blob: B) {
        self.set_metadata_with(pos, blob, Tracking::MarkDirty);
    }

    /// Attaches `blob` to `pos`. Storing an equal blob is a no-op.
    pub fn set_metadata_with(&mut self, pos: LocalPos, blob: B, tracking: Tracking) {
        let metadata = self.metadata.get_or_insert_with(BTreeMap::new);
        let key = pos.key();
        if metadata.get(&key) == Some(&blob) {
            return;
        }
        metadata.insert(key, blob);
        if tracking.marks_dirty() {
            self.dirty = true;
        }
    }

    pub fn metadata_at(&self, pos: LocalPos) -> Option<&B> {
        self.metadata.as_ref()?.get(&pos.key())
    }

    /// Replaces the free-standing records.
    pub fn set_free_records(&mut self, records: &[B]) {
        self.set_free_records_with(records, Tracking::MarkDirty);
    }

    /// Replaces the free-standing records.
    ///
    /// With [`Tracking::Silent`] the list is always replaced. Otherwise it is
    /// replaced, and the delta dirtied, only if the contents differ.
    pub fn set_free_records_with(&mut self, records: &[B], tracking: Tracking) {
        match tracking {
            Tracking::Silent => {
                self.free_records = records.to_vec();
            }
            Tracking::MarkDirty => {
                if self.free_records.as_slice() != records {
                    self.free_records = records.to_vec();
                    self.dirty = true;
                }
            }
        }
    }

    /// Visits every change in array order, then metadata in key order, then
    /// free records in list order.
    ///
    /// Instructions whose palette id does not resolve are skipped and
    /// counted in [`TraverseStats::skipped`].
    pub fn traverse<V>(&self, visitor: &mut V) -> CodecResult<TraverseStats>
    where
        V: DeltaVisitor<S, B> + ?Sized,
    {
        let mut stats = TraverseStats::default();
        for instruction in &self.instructions {
            match self.palette.get(instruction.palette_id()) {
                Some(state) => {
                    visitor.visit_change(instruction.pos(), state)?;
                    stats.changes += 1;
                }
                None => stats.skipped += 1,
            }
        }
        if let Some(metadata) = &self.metadata {
            for (&key, blob) in metadata {
                visitor.visit_metadata(LocalPos::from_key(key), blob)?;
                stats.metadata += 1;
            }
        }
        for record in &self.free_records {
            visitor.visit_free_record(record)?;
            stats.free_records += 1;
        }
        if stats.skipped > 0 {
            warn!(skipped = stats.skipped, "skipped unresolved delta instructions");
        }
        Ok(stats)
    }
}

impl<S, B> Delta<S, B> {
    /// Number of recorded changes.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// No changes, no metadata and no free records.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
            && self.metadata.as_ref().map_or(true, BTreeMap::is_empty)
            && self.free_records.is_empty()
    }

    pub fn instructions(&self) -> &[PackedInstruction] {
        &self.instructions
    }

    /// Read-only view of the palette, including values no longer referenced.
    pub const fn palette(&self) -> &Palette<S> {
        &self.palette
    }

    pub fn metadata_len(&self) -> usize {
        self.metadata.as_ref().map_or(0, BTreeMap::len)
    }

    pub fn free_records(&self) -> &[B] {
        &self.free_records
    }

    /// Metadata entries in position-key order.
    pub fn metadata(&self) -> impl Iterator<Item = (LocalPos, &B)> + '_ {
        self.metadata
            .iter()
            .flat_map(BTreeMap::iter)
            .map(|(&key, blob)| (LocalPos::from_key(key), blob))
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clears the dirty flag, e.g. after the delta was persisted.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn is_empty_value(&self, state: &S) -> bool {
        self.empty.as_ref().is_some_and(|is_empty| is_empty(state))
    }

    fn drop_metadata(&mut self, key: u32, tracking: Tracking) {
        let removed = self
            .metadata
            .as_mut()
            .and_then(|metadata| metadata.remove(&key))
            .is_some();
        if removed && tracking.marks_dirty() {
            self.dirty = true;
        }
    }

    /// Moves the last instruction into `slot` and repoints its index entry.
    /// The caller has already removed `slot`'s own index entry.
    fn swap_remove_at(&mut self, slot: usize) {
        self.instructions.swap_remove(slot);
        if let Some(moved) = self.instructions.get(slot) {
            self.index.insert(moved.key(), slot);
        }
    }
}
