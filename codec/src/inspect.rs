//! Structural view of a CIS file, without a value adapter.

use bitstream::BitReader;

use crate::decode::{check_section_tail, RawFile};
use crate::error::CodecResult;
use crate::limits::CodecLimits;
use crate::position::LocalPos;
use crate::sections::{read_sections, SectionMode, SectionVisitor};

/// What a CIS file contains, with values left as short ids and global
/// palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub total_bytes: usize,
    /// Short id of each global palette entry, in global index order.
    pub short_ids: Vec<u16>,
    pub property_bytes: usize,
    pub section_bytes: usize,
    pub sections: Vec<SectionSummary>,
    pub skipped_cells: usize,
    /// Position and serialized length of each metadata entry.
    pub metadata: Vec<(LocalPos, usize)>,
    /// Serialized length of each free record.
    pub free_records: Vec<usize>,
}

impl FileSummary {
    /// Cells across all sections.
    pub fn cell_count(&self) -> usize {
        self.sections.iter().map(|section| section.cells.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub section_y: i32,
    pub mode: SectionMode,
    pub cells: Vec<CellSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSummary {
    pub pos: LocalPos,
    /// Index into [`FileSummary::short_ids`].
    pub global: u32,
}

/// Parses `bytes` and reports its structure.
///
/// Applies the same validation as [`decode`](crate::decode) except for the
/// property blob, which cannot be interpreted without the value adapter.
///
/// # Errors
///
/// Fails on any framing or section error that would fail decoding.
pub fn inspect(bytes: &[u8], limits: &CodecLimits) -> CodecResult<FileSummary> {
    let raw = RawFile::parse(bytes, &limits.wire)?;
    let mut collect = Collect::default();
    let mut local = Vec::new();
    let mut reader = BitReader::new(raw.section_blob);
    let stats = read_sections(
        &mut reader,
        raw.section_count,
        raw.short_ids.len(),
        limits.max_local_palette,
        &mut local,
        &mut collect,
    )?;
    check_section_tail(&reader)?;

    Ok(FileSummary {
        total_bytes: bytes.len(),
        property_bytes: raw.property_blob.len(),
        section_bytes: raw.section_blob.len(),
        sections: collect.sections,
        skipped_cells: stats.skipped,
        metadata: raw
            .metadata
            .iter()
            .map(|&(key, blob)| (LocalPos::from_key(key), blob.len()))
            .collect(),
        free_records: raw.free_records.iter().map(|record| record.len()).collect(),
        short_ids: raw.short_ids,
    })
}

#[derive(Default)]
struct Collect {
    sections: Vec<SectionSummary>,
}

impl SectionVisitor for Collect {
    fn begin_section(&mut self, section_y: i32, mode: SectionMode) -> CodecResult<()> {
        self.sections.push(SectionSummary {
            section_y,
            mode,
            cells: Vec::new(),
        });
        Ok(())
    }

    fn cell(&mut self, section_y: i32, index: u16, global: u32) -> CodecResult<()> {
        if let Some(section) = self.sections.last_mut() {
            section.cells.push(CellSummary {
                pos: LocalPos::from_section_index(section_y, index),
                global,
            });
        }
        Ok(())
    }
}
