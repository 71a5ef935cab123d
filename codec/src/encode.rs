//! Delta → CIS bytes.

use bitstream::BitWriter;
use state::{bits_for, StateAdapter, StateMapping};
use tracing::{debug, trace, warn};
use wire::{write_header, ByteWriter};

use crate::blob::BlobAdapter;
use crate::delta::Delta;
use crate::error::CodecResult;
use crate::options::EncodeOptions;
use crate::scratch::{Cell, CodecContext};
use crate::sections::{
    check_section_y, choose_mode, write_dense, write_section_header, write_sparse, SectionMode,
};

/// Counts from one [`encode_with`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub sections: usize,
    pub sparse_sections: usize,
    pub dense_sections: usize,
    /// Global palette entries written, including the empty value.
    pub palette_len: usize,
    pub cells: usize,
    /// Instructions whose palette id did not resolve.
    pub skipped: usize,
    pub metadata: usize,
    pub free_records: usize,
    pub bytes: usize,
}

/// Encodes `delta` with default options and a fresh context.
///
/// # Errors
///
/// See [`encode_with`].
pub fn encode<A, Bl>(
    delta: &Delta<A::State, Bl::Blob>,
    mapping: &StateMapping<A>,
    blobs: &Bl,
) -> CodecResult<Vec<u8>>
where
    A: StateAdapter,
    Bl: BlobAdapter,
{
    let mut ctx = CodecContext::new();
    encode_with(delta, mapping, blobs, &EncodeOptions::default(), &mut ctx).map(|(bytes, _)| bytes)
}

/// Encodes `delta` as a CIS file.
///
/// The global palette holds exactly the values placed in the delta, in scan
/// order (section, then cell index), with the empty value at id 0; values the
/// delta's palette still holds but no instruction uses are not written. The
/// same delta contents always produce the same bytes.
///
/// # Errors
///
/// Returns [`CodecError::SectionOutOfRange`](crate::CodecError::SectionOutOfRange)
/// if a change lies outside the encodable sections, a state error if a value
/// cannot be mapped or packed, and a blob error if the blob adapter fails.
pub fn encode_with<A, Bl>(
    delta: &Delta<A::State, Bl::Blob>,
    mapping: &StateMapping<A>,
    blobs: &Bl,
    options: &EncodeOptions,
    ctx: &mut CodecContext,
) -> CodecResult<(Vec<u8>, EncodeStats)>
where
    A: StateAdapter,
    Bl: BlobAdapter,
{
    let empty = mapping.adapter().empty_state();
    let palette = delta.palette();
    let mut stats = EncodeStats::default();

    let cells = ctx.cells_mut();
    cells.clear();
    for instruction in delta.instructions() {
        let id = instruction.palette_id();
        if palette.get(id).is_none() {
            stats.skipped += 1;
            continue;
        }
        let pos = instruction.pos();
        check_section_y(pos.section_y())?;
        cells.push(Cell {
            section_y: pos.section_y(),
            index: pos.section_index(),
            id,
        });
    }
    if stats.skipped > 0 {
        warn!(skipped = stats.skipped, "skipped unresolved instructions while encoding");
    }
    ctx.sort_cells();
    ctx.assign_global_ids(palette.len(), palette.id_of(&empty));

    // Entry 0 has no delta palette id and resolves to the empty value.
    let states: Vec<&A::State> = ctx
        .global_ids()
        .iter()
        .map(|&id| palette.get(id).unwrap_or(&empty))
        .collect();
    let global_len = states.len();
    let global_bits = bits_for(global_len);

    let mut out = ByteWriter::new();
    write_header(&mut out);
    out.put_count_u32("palette count", global_len)?;
    let mut props = BitWriter::with_buffer(ctx.take_bits());
    for &state in &states {
        out.put_u16(mapping.short_id(state)?);
        mapping.write_state(&mut props, state)?;
    }
    let prop_bytes = props.finish();
    out.put_len_prefixed("property blob", &prop_bytes)?;
    ctx.restore_bits(prop_bytes);

    let mut sections = BitWriter::with_buffer(ctx.take_bytes());
    let total = ctx.cells().len();
    let mut start = 0;
    while start < total {
        let section_y = ctx.cells()[start].section_y;
        let end = start
            + ctx.cells()[start..]
                .iter()
                .take_while(|cell| cell.section_y == section_y)
                .count();
        let range = start..end;
        let has_empty = ctx.cells()[range.clone()].iter().any(|cell| cell.id == 0);
        let local_len = ctx.build_local_palette(range.clone(), global_len).len();
        let mode = choose_mode(
            options.section_policy,
            range.len(),
            local_len,
            has_empty,
            global_bits,
        );

        write_section_header(&mut sections, section_y, mode)?;
        match mode {
            SectionMode::Sparse => {
                write_sparse(&mut sections, &ctx.cells()[range.clone()], global_bits)?;
                stats.sparse_sections += 1;
            }
            SectionMode::Dense => {
                ctx.fill_dense(range.clone());
                let (local, dense) = ctx.dense_parts();
                write_dense(&mut sections, local, dense, global_bits)?;
                stats.dense_sections += 1;
            }
        }
        trace!(section_y, ?mode, cells = range.len(), local_len, "wrote section");
        stats.sections += 1;
        stats.cells += range.len();
        start = end;
    }
    out.put_count_u16("section count", stats.sections)?;
    let section_bytes = sections.finish();
    out.put_len_prefixed("section blob", &section_bytes)?;
    ctx.restore_bytes(section_bytes);

    let mut scratch = ctx.take_bits();
    out.put_count_u32("metadata count", delta.metadata_len())?;
    for (pos, blob) in delta.metadata() {
        out.put_u32(pos.key());
        scratch.clear();
        blobs.serialize(blob, &mut scratch)?;
        out.put_len_prefixed("metadata blob", &scratch)?;
        stats.metadata += 1;
    }
    out.put_count_u32("free record count", delta.free_records().len())?;
    for record in delta.free_records() {
        scratch.clear();
        blobs.serialize(record, &mut scratch)?;
        out.put_len_prefixed("free record", &scratch)?;
        stats.free_records += 1;
    }
    ctx.restore_bits(scratch);

    let bytes = out.into_inner();
    stats.palette_len = global_len;
    stats.bytes = bytes.len();
    debug!(
        sections = stats.sections,
        sparse = stats.sparse_sections,
        dense = stats.dense_sections,
        palette = stats.palette_len,
        cells = stats.cells,
        bytes = stats.bytes,
        "encoded delta"
    );
    Ok((bytes, stats))
}
