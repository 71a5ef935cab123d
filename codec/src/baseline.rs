//! Frozen pre-modification chunk contents.

use std::hash::Hash;
use std::ops::Range;

use tracing::debug;

use crate::palette::Palette;
use crate::position::LocalPos;
use crate::sections::SECTION_VOLUME;

/// O(1) lookup of a chunk's generated value at a position.
pub trait Baseline<S> {
    fn value_at(&self, pos: LocalPos) -> S;
}

impl<S, F> Baseline<S> for F
where
    F: Fn(LocalPos) -> S,
{
    fn value_at(&self, pos: LocalPos) -> S {
        self(pos)
    }
}

/// Largest per-block palette stored with one-byte indices.
const MAX_BLOCK_PALETTE: usize = 256;

/// Storage for one 16³ section.
#[derive(Debug, Clone)]
enum Block<S> {
    /// Every cell holds the empty value.
    Absent,
    Uniform(S),
    Paletted {
        values: Vec<S>,
        indices: Box<[u8]>,
    },
    Full(Box<[S]>),
}

impl<S: Clone + Eq + Hash> Block<S> {
    fn build(cells: Vec<S>, empty: &S) -> Self {
        let Some(first) = cells.first() else {
            return Self::Absent;
        };
        if cells.iter().all(|cell| cell == first) {
            return if first == empty {
                Self::Absent
            } else {
                Self::Uniform(first.clone())
            };
        }

        let mut palette = Palette::new();
        let mut indices = Vec::with_capacity(cells.len());
        for cell in &cells {
            match palette.get_or_add(cell) {
                Ok(id) if (id as usize) < MAX_BLOCK_PALETTE => indices.push(id as u8),
                _ => break,
            }
        }
        if indices.len() < cells.len() {
            return Self::Full(cells.into_boxed_slice());
        }
        Self::Paletted {
            values: palette.all().to_vec(),
            indices: indices.into_boxed_slice(),
        }
    }
}

impl<S> Block<S> {
    fn get(&self, index: usize) -> Option<&S> {
        match self {
            Self::Absent => None,
            Self::Uniform(value) => Some(value),
            Self::Paletted { values, indices } => {
                values.get(usize::from(*indices.get(index)?))
            }
            Self::Full(values) => values.get(index),
        }
    }
}

/// How the blocks of a [`BaselineSnapshot`] are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaselineStats {
    pub absent: usize,
    pub uniform: usize,
    pub paletted: usize,
    pub full: usize,
}

/// An immutable copy of a chunk's generated contents.
///
/// Each 16³ section is stored as absent (all empty), uniform, paletted (at
/// most 256 distinct values, one byte per cell) or full. Lookups outside the
/// captured sections return the empty value.
#[derive(Debug, Clone)]
pub struct BaselineSnapshot<S> {
    min_section: i32,
    blocks: Vec<Block<S>>,
    empty: S,
}

impl<S: Clone + Eq + Hash> BaselineSnapshot<S> {
    /// Captures `sections.len()` sections starting at `min_section`, reading
    /// each cell from `value_at`.
    pub fn from_fn(
        min_section: i32,
        sections: usize,
        empty: S,
        mut value_at: impl FnMut(LocalPos) -> S,
    ) -> Self {
        let columns = (0..sections).map(|offset| {
            let section_y = min_section + offset as i32;
            (0..SECTION_VOLUME as u16)
                .map(|index| value_at(LocalPos::from_section_index(section_y, index)))
                .collect::<Vec<_>>()
        });
        Self::from_sections(min_section, empty, columns)
    }

    /// Captures sections given as cell lists in section index order
    /// (`(y << 8) | (z << 4) | x`), starting at `min_section`.
    ///
    /// Lists shorter than a section are padded with the empty value; extra
    /// cells are ignored.
    pub fn from_sections<I, C>(min_section: i32, empty: S, sections: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
    {
        let blocks: Vec<Block<S>> = sections
            .into_iter()
            .map(|cells| {
                let mut cells: Vec<S> = cells.into_iter().take(SECTION_VOLUME).collect();
                cells.resize(SECTION_VOLUME, empty.clone());
                Block::build(cells, &empty)
            })
            .collect();
        let snapshot = Self {
            min_section,
            blocks,
            empty,
        };
        let stats = snapshot.stats();
        debug!(
            min_section,
            sections = snapshot.blocks.len(),
            absent = stats.absent,
            uniform = stats.uniform,
            paletted = stats.paletted,
            full = stats.full,
            "built baseline snapshot"
        );
        snapshot
    }
}

impl<S> BaselineSnapshot<S> {
    /// Value at `pos` without cloning.
    pub fn value_ref(&self, pos: LocalPos) -> &S {
        let Some(block) = self.block(pos.section_y()) else {
            return &self.empty;
        };
        block
            .get(usize::from(pos.section_index()))
            .unwrap_or(&self.empty)
    }

    /// Section indices covered by this snapshot.
    pub fn sections(&self) -> Range<i32> {
        self.min_section..self.min_section + self.blocks.len() as i32
    }

    pub fn stats(&self) -> BaselineStats {
        let mut stats = BaselineStats::default();
        for block in &self.blocks {
            match block {
                Block::Absent => stats.absent += 1,
                Block::Uniform(_) => stats.uniform += 1,
                Block::Paletted { .. } => stats.paletted += 1,
                Block::Full(_) => stats.full += 1,
            }
        }
        stats
    }

    fn block(&self, section_y: i32) -> Option<&Block<S>> {
        let offset = usize::try_from(section_y.checked_sub(self.min_section)?).ok()?;
        self.blocks.get(offset)
    }
}

impl<S: Clone> Baseline<S> for BaselineSnapshot<S> {
    fn value_at(&self, pos: LocalPos) -> S {
        self.value_ref(pos).clone()
    }
}
