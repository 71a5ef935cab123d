//! Per-section bit layout: constants, the sparse/dense choice, and the
//! section reader shared by the decoder and the inspector.
//!
//! Each section in the section blob is:
//!
//! ```text
//! section_y : zig-zag, SECTION_Y_BITS
//! dense     : 1 bit
//! sparse    : count (BLOCK_COUNT_BITS), count × (local pos 12, global index)
//! dense     : size (PALETTE_SIZE_BITS), size × global index,
//!             SECTION_VOLUME × local index (bits_for(size))
//! ```
//!
//! Global indices are `bits_for(global palette count)` wide.

use bitstream::{zigzag_encode, BitReader, BitWriter};
use state::bits_for;
use tracing::trace;

use crate::error::{CodecError, CodecResult, LimitKind};
use crate::options::SectionPolicy;
use crate::scratch::Cell;

/// Width of the zig-zag section index.
pub const SECTION_Y_BITS: usize = 6;
/// Width of a sparse section's cell count.
pub const BLOCK_COUNT_BITS: usize = 13;
/// Width of a dense section's local palette size.
pub const PALETTE_SIZE_BITS: usize = 8;
/// Cells in a 16×16×16 section.
pub const SECTION_VOLUME: usize = 4096;
/// Width of a cell index within a section.
pub const LOCAL_POS_BITS: usize = 12;
/// Largest local palette a dense section can declare.
pub const MAX_LOCAL_PALETTE: usize = (1 << PALETTE_SIZE_BITS) - 1;

/// Lowest section index the zig-zag field holds.
pub const MIN_SECTION_Y: i32 = -(1 << (SECTION_Y_BITS - 1));
/// Highest section index the zig-zag field holds.
pub const MAX_SECTION_Y: i32 = (1 << (SECTION_Y_BITS - 1)) - 1;

/// How one section's cells are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionMode {
    /// Explicit `(position, value)` pairs.
    Sparse,
    /// Local palette plus one index per cell.
    Dense,
}

impl SectionMode {
    const fn from_flag(dense: bool) -> Self {
        if dense {
            Self::Dense
        } else {
            Self::Sparse
        }
    }

    const fn flag(self) -> bool {
        matches!(self, Self::Dense)
    }
}

/// Fails unless `section_y` fits the section index field.
pub(crate) const fn check_section_y(section_y: i32) -> CodecResult<()> {
    if section_y < MIN_SECTION_Y || section_y > MAX_SECTION_Y {
        return Err(CodecError::SectionOutOfRange { section_y });
    }
    Ok(())
}

/// Body bits of a sparse section holding `count` cells.
pub(crate) const fn sparse_cost(count: usize, global_bits: usize) -> usize {
    BLOCK_COUNT_BITS + count * (LOCAL_POS_BITS + global_bits)
}

/// Body bits of a dense section with `local_len` local palette entries.
pub(crate) const fn dense_cost(local_len: usize, global_bits: usize) -> usize {
    PALETTE_SIZE_BITS + local_len * global_bits + SECTION_VOLUME * bits_for(local_len)
}

/// Picks the layout for a section of `count` cells.
///
/// Dense sections read empty cells as unmodified, so a section holding an
/// explicit empty value, or more local values than the size field holds,
/// is always sparse.
pub(crate) fn choose_mode(
    policy: SectionPolicy,
    count: usize,
    local_len: usize,
    has_empty: bool,
    global_bits: usize,
) -> SectionMode {
    if has_empty || local_len > MAX_LOCAL_PALETTE {
        return SectionMode::Sparse;
    }
    match policy {
        SectionPolicy::PreferSparse => SectionMode::Sparse,
        SectionPolicy::PreferDense => SectionMode::Dense,
        SectionPolicy::Auto => {
            if dense_cost(local_len, global_bits) < sparse_cost(count, global_bits) {
                SectionMode::Dense
            } else {
                SectionMode::Sparse
            }
        }
    }
}

pub(crate) fn write_section_header(
    writer: &mut BitWriter,
    section_y: i32,
    mode: SectionMode,
) -> CodecResult<()> {
    check_section_y(section_y)?;
    writer.write_zigzag(section_y, SECTION_Y_BITS)?;
    writer.write_bool(mode.flag());
    Ok(())
}

/// Writes a sparse body. `cells` carry global ids.
pub(crate) fn write_sparse(
    writer: &mut BitWriter,
    cells: &[Cell],
    global_bits: usize,
) -> CodecResult<()> {
    writer.write_bits(cells.len() as u64, BLOCK_COUNT_BITS)?;
    for cell in cells {
        writer.write_bits(u64::from(cell.index), LOCAL_POS_BITS)?;
        writer.write_bits(u64::from(cell.id), global_bits)?;
    }
    Ok(())
}

/// Writes a dense body from a local palette and per-cell local indices.
pub(crate) fn write_dense(
    writer: &mut BitWriter,
    local: &[u32],
    dense: &[u16],
    global_bits: usize,
) -> CodecResult<()> {
    writer.write_bits(local.len() as u64, PALETTE_SIZE_BITS)?;
    for &id in local {
        writer.write_bits(u64::from(id), global_bits)?;
    }
    let local_bits = bits_for(local.len());
    for &index in dense {
        writer.write_bits(u64::from(index), local_bits)?;
    }
    Ok(())
}

/// Receives parsed sections from [`read_sections`].
pub(crate) trait SectionVisitor {
    fn begin_section(&mut self, section_y: i32, mode: SectionMode) -> CodecResult<()>;

    /// A cell holding global palette index `global`, already bounds-checked.
    fn cell(&mut self, section_y: i32, index: u16, global: u32) -> CodecResult<()>;
}

/// Counts from one [`read_sections`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SectionReadStats {
    pub sparse: usize,
    pub dense: usize,
    pub cells: usize,
    pub skipped: usize,
}

/// Parses `section_count` sections from `reader`.
///
/// Sparse cells are all reported, including empty ones. Dense cells holding
/// the empty value (global index 0) are unmodified and not reported. Cells
/// whose local or global index is out of range are skipped and counted.
pub(crate) fn read_sections<V: SectionVisitor>(
    reader: &mut BitReader<'_>,
    section_count: usize,
    global_len: usize,
    max_local_palette: usize,
    local: &mut Vec<u32>,
    visitor: &mut V,
) -> CodecResult<SectionReadStats> {
    let global_bits = bits_for(global_len);
    let mut seen = 0u64;
    let mut stats = SectionReadStats::default();

    for _ in 0..section_count {
        let section_y = reader.read_zigzag(SECTION_Y_BITS)?;
        let bit = 1u64 << zigzag_encode(section_y);
        if seen & bit != 0 {
            return Err(CodecError::DuplicateSection { section_y });
        }
        seen |= bit;

        let mode = SectionMode::from_flag(reader.read_bool());
        visitor.begin_section(section_y, mode)?;
        let before = stats;
        match mode {
            SectionMode::Sparse => {
                stats.sparse += 1;
                let count = reader.read_bits(BLOCK_COUNT_BITS)? as usize;
                if count > SECTION_VOLUME {
                    return Err(CodecError::InvalidSectionCount { section_y, count });
                }
                for _ in 0..count {
                    let index = reader.read_bits(LOCAL_POS_BITS)? as u16;
                    let global = reader.read_bits(global_bits)?;
                    if global >= global_len as u64 {
                        stats.skipped += 1;
                        continue;
                    }
                    visitor.cell(section_y, index, global as u32)?;
                    stats.cells += 1;
                }
            }
            SectionMode::Dense => {
                stats.dense += 1;
                let size = reader.read_bits(PALETTE_SIZE_BITS)? as usize;
                if size == 0 {
                    return Err(CodecError::InvalidLocalPalette { section_y, size });
                }
                if size > max_local_palette {
                    return Err(CodecError::LimitsExceeded {
                        kind: LimitKind::LocalPalette,
                        limit: max_local_palette,
                        actual: size,
                    });
                }
                local.clear();
                for _ in 0..size {
                    local.push(reader.read_bits(global_bits)? as u32);
                }
                let local_bits = bits_for(size);
                for index in 0..SECTION_VOLUME as u16 {
                    let slot = reader.read_bits(local_bits)? as usize;
                    let Some(&global) = local.get(slot) else {
                        stats.skipped += 1;
                        continue;
                    };
                    if global as usize >= global_len {
                        stats.skipped += 1;
                        continue;
                    }
                    if global == 0 {
                        continue;
                    }
                    visitor.cell(section_y, index, global)?;
                    stats.cells += 1;
                }
            }
        }
        reader.ensure_in_bounds()?;
        trace!(
            section_y,
            ?mode,
            cells = stats.cells - before.cells,
            skipped = stats.skipped - before.skipped,
            "read section"
        );
    }
    Ok(stats)
}
