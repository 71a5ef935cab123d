//! CIS bytes → Delta.

use bitstream::BitReader;
use state::{StateAdapter, StateMapping};
use tracing::{debug, warn};
use wire::{read_header, ByteReader, DecodeError};

use crate::blob::BlobAdapter;
use crate::delta::{Delta, Tracking};
use crate::error::{CodecError, CodecResult, LimitKind};
use crate::limits::CodecLimits;
use crate::position::LocalPos;
use crate::scratch::CodecContext;
use crate::sections::{read_sections, SectionMode, SectionVisitor};

/// Counts from one [`decode_with`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub sections: usize,
    pub sparse_sections: usize,
    pub dense_sections: usize,
    pub palette_len: usize,
    /// Cells replayed into the delta.
    pub cells: usize,
    /// Cells dropped because their local or global index did not resolve.
    pub skipped_cells: usize,
    pub metadata: usize,
    pub free_records: usize,
}

/// The byte-level framing of a CIS file, validated but not interpreted.
#[derive(Debug, Clone)]
pub(crate) struct RawFile<'a> {
    pub short_ids: Vec<u16>,
    pub property_blob: &'a [u8],
    pub section_count: usize,
    pub section_blob: &'a [u8],
    pub metadata: Vec<(u32, &'a [u8])>,
    pub free_records: Vec<&'a [u8]>,
}

impl<'a> RawFile<'a> {
    /// Splits `bytes` into its fields, checking every count and length
    /// against `limits` and the remaining input.
    pub(crate) fn parse(bytes: &'a [u8], limits: &wire::Limits) -> CodecResult<Self> {
        if bytes.len() > limits.max_file_bytes {
            return Err(DecodeError::LimitsExceeded {
                kind: wire::LimitKind::FileBytes,
                limit: limits.max_file_bytes,
                actual: bytes.len(),
            }
            .into());
        }
        let mut reader = ByteReader::new(bytes);
        read_header(&mut reader)?;

        let palette_len = reader.read_count(
            "palette count",
            wire::LimitKind::PaletteEntries,
            limits.max_palette_entries,
        )?;
        reader.ensure_remaining("short ids", palette_len * 2)?;
        let mut short_ids = Vec::with_capacity(palette_len);
        for _ in 0..palette_len {
            short_ids.push(reader.read_u16("short id")?);
        }
        let property_blob = reader.read_len_prefixed("property blob", limits.max_blob_bytes)?;

        let section_count = usize::from(reader.read_u16("section count")?);
        if section_count > limits.max_sections {
            return Err(DecodeError::LimitsExceeded {
                kind: wire::LimitKind::SectionCount,
                limit: limits.max_sections,
                actual: section_count,
            }
            .into());
        }
        let section_blob = reader.read_len_prefixed("section blob", limits.max_blob_bytes)?;

        let metadata_len = reader.read_count(
            "metadata count",
            wire::LimitKind::MetadataEntries,
            limits.max_metadata_entries,
        )?;
        // position + blob length per entry
        reader.ensure_remaining("metadata", metadata_len * 8)?;
        let mut metadata = Vec::with_capacity(metadata_len);
        for _ in 0..metadata_len {
            let key = reader.read_u32("metadata position")?;
            let blob = reader.read_len_prefixed("metadata blob", limits.max_blob_bytes)?;
            metadata.push((key, blob));
        }

        let record_len = reader.read_count(
            "free record count",
            wire::LimitKind::FreeRecords,
            limits.max_free_records,
        )?;
        reader.ensure_remaining("free records", record_len * 4)?;
        let mut free_records = Vec::with_capacity(record_len);
        for _ in 0..record_len {
            free_records.push(reader.read_len_prefixed("free record", limits.max_blob_bytes)?);
        }
        reader.expect_end()?;

        Ok(Self {
            short_ids,
            property_blob,
            section_count,
            section_blob,
            metadata,
            free_records,
        })
    }
}

/// Fails if a fully parsed section blob still has a whole byte unread.
pub(crate) const fn check_section_tail(reader: &BitReader<'_>) -> CodecResult<()> {
    let remaining_bits = reader.bits_remaining();
    if remaining_bits >= 8 {
        return Err(CodecError::TrailingSectionData { remaining_bits });
    }
    Ok(())
}

/// Decodes a CIS file with a fresh context.
///
/// # Errors
///
/// See [`decode_with`].
pub fn decode<A, Bl>(
    bytes: &[u8],
    mapping: &StateMapping<A>,
    blobs: &Bl,
    limits: &CodecLimits,
) -> CodecResult<Delta<A::State, Bl::Blob>>
where
    A: StateAdapter + Clone + 'static,
    Bl: BlobAdapter,
    Bl::Blob: Clone + PartialEq,
{
    let mut ctx = CodecContext::new();
    decode_with(bytes, mapping, blobs, limits, &mut ctx).map(|(delta, _)| delta)
}

/// Decodes a CIS file into a clean delta.
///
/// Every entry is applied silently, so the result reports no modifications
/// until the caller changes it. The delta drops metadata at positions set to
/// the adapter's empty value.
///
/// # Errors
///
/// Fails on a bad header, any count or length exceeding `limits` or the
/// remaining input, an unknown short id, malformed sections, trailing data,
/// or a blob the adapter rejects. Cells whose palette index does not resolve
/// are skipped, not rejected; see [`DecodeStats::skipped_cells`].
pub fn decode_with<A, Bl>(
    bytes: &[u8],
    mapping: &StateMapping<A>,
    blobs: &Bl,
    limits: &CodecLimits,
    ctx: &mut CodecContext,
) -> CodecResult<(Delta<A::State, Bl::Blob>, DecodeStats)>
where
    A: StateAdapter + Clone + 'static,
    Bl: BlobAdapter,
    Bl::Blob: Clone + PartialEq,
{
    let raw = RawFile::parse(bytes, &limits.wire)?;

    let mut props = BitReader::new(raw.property_blob);
    let mut states = Vec::with_capacity(raw.short_ids.len());
    for &id in &raw.short_ids {
        states.push(mapping.read_state(&mut props, id)?);
    }
    props.ensure_in_bounds()?;

    let mut delta = Delta::for_adapter(mapping.adapter());
    let mut replay = Replay {
        delta: &mut delta,
        states: &states,
        max_cells: limits.max_total_cells,
        cells: 0,
    };
    let mut reader = BitReader::new(raw.section_blob);
    let section_stats = read_sections(
        &mut reader,
        raw.section_count,
        states.len(),
        limits.max_local_palette,
        ctx.decode_local_mut(),
        &mut replay,
    )?;
    check_section_tail(&reader)?;
    if section_stats.skipped > 0 {
        warn!(
            skipped = section_stats.skipped,
            "skipped cells with unresolved palette indices"
        );
    }

    for &(key, blob) in &raw.metadata {
        let blob = blobs.deserialize(blob)?;
        delta.set_metadata_with(LocalPos::from_key(key), blob, Tracking::Silent);
    }
    let records = raw
        .free_records
        .iter()
        .map(|record| blobs.deserialize(record))
        .collect::<Result<Vec<_>, _>>()?;
    delta.set_free_records_with(&records, Tracking::Silent);
    delta.mark_clean();

    let stats = DecodeStats {
        sections: raw.section_count,
        sparse_sections: section_stats.sparse,
        dense_sections: section_stats.dense,
        palette_len: states.len(),
        cells: section_stats.cells,
        skipped_cells: section_stats.skipped,
        metadata: raw.metadata.len(),
        free_records: records.len(),
    };
    debug!(
        sections = stats.sections,
        palette = stats.palette_len,
        cells = stats.cells,
        skipped = stats.skipped_cells,
        bytes = bytes.len(),
        "decoded delta"
    );
    Ok((delta, stats))
}

/// Applies decoded cells to a delta without dirtying it.
struct Replay<'a, S, B> {
    delta: &'a mut Delta<S, B>,
    states: &'a [S],
    max_cells: usize,
    cells: usize,
}

impl<S, B> SectionVisitor for Replay<'_, S, B>
where
    S: Clone + Eq + std::hash::Hash,
    B: Clone + PartialEq,
{
    fn begin_section(&mut self, _section_y: i32, _mode: SectionMode) -> CodecResult<()> {
        Ok(())
    }

    fn cell(&mut self, section_y: i32, index: u16, global: u32) -> CodecResult<()> {
        self.cells += 1;
        if self.cells > self.max_cells {
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::TotalCells,
                limit: self.max_cells,
                actual: self.cells,
            });
        }
        let pos = LocalPos::from_section_index(section_y, index);
        self.delta
            .add_or_update_with(pos, &self.states[global as usize], Tracking::Silent)
    }
}
