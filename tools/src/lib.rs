//! Introspection and debugging tools for CIS chunk delta files.
//!
//! This crate turns the codec's structural view of a file into reports:
//!
//! - Per-file size and section summaries
//! - Cell-level dumps with shape names resolved through a mapping table
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to understand what the codec is doing.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use codec::{CodecLimits, FileSummary, SectionMode};
use serde::Serialize;
use state::MappingTable;
use tracing::debug;

/// Loads a shape name → short id table from JSON.
pub fn load_mapping(path: &Path) -> Result<MappingTable> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read mapping {}", path.display()))?;
    let table: MappingTable = serde_json::from_str(&contents).context("parse mapping json")?;
    debug!(path = %path.display(), fingerprint = table.fingerprint(), "loaded mapping");
    Ok(table)
}

/// Sizes and section layout of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub total_bytes: usize,
    pub palette_entries: usize,
    pub property_bytes: usize,
    pub section_bytes: usize,
    pub sparse_sections: usize,
    pub dense_sections: usize,
    pub cells: usize,
    pub skipped_cells: usize,
    pub metadata_entries: usize,
    pub metadata_bytes: usize,
    pub free_records: usize,
    pub free_record_bytes: usize,
}

impl From<&FileSummary> for InspectReport {
    fn from(summary: &FileSummary) -> Self {
        let count_mode = |mode| {
            summary
                .sections
                .iter()
                .filter(|section| section.mode == mode)
                .count()
        };
        Self {
            total_bytes: summary.total_bytes,
            palette_entries: summary.short_ids.len(),
            property_bytes: summary.property_bytes,
            section_bytes: summary.section_bytes,
            sparse_sections: count_mode(SectionMode::Sparse),
            dense_sections: count_mode(SectionMode::Dense),
            cells: summary.cell_count(),
            skipped_cells: summary.skipped_cells,
            metadata_entries: summary.metadata.len(),
            metadata_bytes: summary.metadata.iter().map(|(_, len)| len).sum(),
            free_records: summary.free_records.len(),
            free_record_bytes: summary.free_records.iter().sum(),
        }
    }
}

/// Parses `bytes` and summarizes it.
pub fn inspect_file(bytes: &[u8], limits: &CodecLimits) -> Result<InspectReport> {
    let summary = codec::inspect(bytes, limits).context("inspect file")?;
    Ok(InspectReport::from(&summary))
}

pub fn format_inspect_report(report: &InspectReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "format: CIS v{} total: {} bytes",
        wire::VERSION,
        report.total_bytes
    );
    let _ = writeln!(
        out,
        "palette: {} entries, {} property bytes",
        report.palette_entries, report.property_bytes
    );
    let _ = writeln!(
        out,
        "sections: {} sparse, {} dense, {} bytes",
        report.sparse_sections, report.dense_sections, report.section_bytes
    );
    let _ = writeln!(out, "cells: {}", report.cells);
    if report.skipped_cells > 0 {
        let _ = writeln!(out, "skipped cells: {}", report.skipped_cells);
    }
    let _ = writeln!(
        out,
        "metadata: {} entries, {} bytes",
        report.metadata_entries, report.metadata_bytes
    );
    let _ = write!(
        out,
        "free records: {} records, {} bytes",
        report.free_records, report.free_record_bytes
    );
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpOutput {
    pub version: u32,
    /// Fingerprint of the mapping table used to resolve names, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping_fingerprint: Option<String>,
    pub palette: Vec<DumpPaletteEntry>,
    pub sections: Vec<DumpSection>,
    pub metadata: Vec<DumpMetadata>,
    pub free_records: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpPaletteEntry {
    pub index: usize,
    pub short_id: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpSection {
    pub section_y: i32,
    pub mode: &'static str,
    pub cells: Vec<DumpCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpCell {
    pub x: u8,
    pub y: i32,
    pub z: u8,
    pub palette_index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpMetadata {
    pub x: u8,
    pub y: i32,
    pub z: u8,
    pub bytes: usize,
}

/// Lists every cell of a file, resolving shape names through `mapping`.
pub fn dump_file(
    bytes: &[u8],
    mapping: Option<&MappingTable>,
    limits: &CodecLimits,
) -> Result<DumpOutput> {
    let summary = codec::inspect(bytes, limits).context("inspect file")?;
    let names = mapping.map(MappingTable::by_id);

    let palette = summary
        .short_ids
        .iter()
        .enumerate()
        .map(|(index, &short_id)| DumpPaletteEntry {
            index,
            short_id,
            name: names
                .as_ref()
                .and_then(|names| names.get(&short_id))
                .map(|name| (*name).to_string()),
        })
        .collect();
    let sections = summary
        .sections
        .iter()
        .map(|section| DumpSection {
            section_y: section.section_y,
            mode: mode_name(section.mode),
            cells: section
                .cells
                .iter()
                .map(|cell| DumpCell {
                    x: cell.pos.x(),
                    y: cell.pos.y(),
                    z: cell.pos.z(),
                    palette_index: cell.global,
                })
                .collect(),
        })
        .collect();
    let metadata = summary
        .metadata
        .iter()
        .map(|&(pos, bytes)| DumpMetadata {
            x: pos.x(),
            y: pos.y(),
            z: pos.z(),
            bytes,
        })
        .collect();

    Ok(DumpOutput {
        version: wire::VERSION,
        mapping_fingerprint: mapping.map(|table| format!("{:016x}", table.fingerprint())),
        palette,
        sections,
        metadata,
        free_records: summary.free_records,
    })
}

pub fn format_dump_pretty(output: &DumpOutput) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "CIS v{}", output.version);
    if let Some(fingerprint) = &output.mapping_fingerprint {
        let _ = writeln!(out, "mapping: {fingerprint}");
    }
    let _ = writeln!(out, "palette:");
    for entry in &output.palette {
        let name = entry.name.as_deref().unwrap_or("?");
        let _ = writeln!(out, "  [{}] id {} {name}", entry.index, entry.short_id);
    }
    let _ = writeln!(out, "sections:");
    for section in &output.sections {
        let _ = writeln!(
            out,
            "  section {} ({}, {} cells)",
            section.section_y,
            section.mode,
            section.cells.len()
        );
        for cell in &section.cells {
            let name = output
                .palette
                .get(cell.palette_index as usize)
                .and_then(|entry| entry.name.as_deref())
                .unwrap_or("?");
            let _ = writeln!(
                out,
                "    ({}, {}, {}) -> [{}] {name}",
                cell.x, cell.y, cell.z, cell.palette_index
            );
        }
    }
    let _ = writeln!(out, "metadata:");
    for entry in &output.metadata {
        let _ = writeln!(
            out,
            "  ({}, {}, {}) {} bytes",
            entry.x, entry.y, entry.z, entry.bytes
        );
    }
    let _ = write!(out, "free records: {}", output.free_records.len());
    out
}

const fn mode_name(mode: SectionMode) -> &'static str {
    match mode {
        SectionMode::Sparse => "sparse",
        SectionMode::Dense => "dense",
    }
}
