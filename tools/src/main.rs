use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cis_tools::{dump_file, format_dump_pretty, format_inspect_report, inspect_file, load_mapping};
use clap::{Parser, Subcommand, ValueEnum};
use codec::CodecLimits;
use glob::Pattern;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cis-tools",
    version,
    about = "CIS chunk delta inspection and dump tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect file structure and sizes.
    Inspect {
        /// Path to a delta file or a directory of them.
        path: PathBuf,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Sort inspected files.
        #[arg(long, value_enum)]
        sort: Option<InspectSort>,
        /// Limit the number of inspected files (after sorting).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Dump every section and cell of a file.
    Dump {
        /// Path to the delta file.
        file: PathBuf,
        /// Mapping table JSON used to resolve shape names.
        #[arg(long)]
        mapping: Option<PathBuf>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DumpFormat::Json)]
        format: DumpFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectSort {
    Size,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DumpFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let limits = CodecLimits::default();
    match cli.command {
        Command::Inspect {
            path,
            glob,
            sort,
            limit,
        } => {
            if path.is_dir() {
                let entries = collect_entries(&path, glob.as_deref())?;
                debug!(dir = %path.display(), files = entries.len(), "collected files");
                let mut entries = maybe_sort_entries(entries, sort);
                let limit = limit.or(sort.map(|InspectSort::Size| 10));
                if let Some(limit) = limit {
                    entries.truncate(limit);
                }
                for entry in entries {
                    let bytes = fs::read(&entry.path)
                        .with_context(|| format!("read file {}", entry.path.display()))?;
                    debug!(file = %entry.path.display(), "inspecting");
                    let report = inspect_file(&bytes, &limits)
                        .with_context(|| entry.path.display().to_string())?;
                    println!("== {} ({} bytes) ==", entry.path.display(), entry.size);
                    println!("{}", format_inspect_report(&report));
                }
            } else {
                let bytes =
                    fs::read(&path).with_context(|| format!("read file {}", path.display()))?;
                let report = inspect_file(&bytes, &limits)?;
                println!("{}", format_inspect_report(&report));
            }
        }
        Command::Dump {
            file,
            mapping,
            format,
        } => {
            let bytes = fs::read(&file).with_context(|| format!("read file {}", file.display()))?;
            let mapping = mapping
                .as_deref()
                .map(load_mapping)
                .transpose()
                .context("load mapping")?;
            let output = dump_file(&bytes, mapping.as_ref(), &limits)?;
            match format {
                DumpFormat::Json => {
                    let json = serde_json::to_string_pretty(&output).context("serialize json")?;
                    println!("{json}");
                }
                DumpFormat::Pretty => {
                    println!("{}", format_dump_pretty(&output));
                }
            }
        }
    }
    Ok(())
}

struct FileEntry {
    path: PathBuf,
    size: u64,
}

fn collect_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::new();
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        let size = entry.metadata()?.len();
        entries.push(FileEntry { path, size });
    }
    // read_dir order is platform dependent
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

fn maybe_sort_entries(mut entries: Vec<FileEntry>, sort: Option<InspectSort>) -> Vec<FileEntry> {
    match sort {
        Some(InspectSort::Size) => {
            entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        }
        None => {}
    }
    entries
}
