//! High-level pipeline API for cleaning the campaign extracts.
//!
//! Combines every step: archive discovery, extraction, parsing, schema
//! validation, transformation and output.
//!
//! # Example
//!
//! ```rust,ignore
//! use campaign_cleaner::{clean_campaign_data, CleanOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = clean_campaign_data(&CleanOptions::default())?;
//!     println!("Cleaned {} rows from {} archives", summary.rows, summary.archives.len());
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::transformer::RecordTransformer;
use crate::config::CleanOptions;
use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_info, log_success, log_warning};
use crate::models::RawRecord;
use crate::output::write_tables;
use crate::parser::{parse_bytes_auto, ParseResult};
use crate::source::{by_file_name, discover_archives, read_tabular_member, ArchiveOrdering};
use crate::validation::{validate_headers, RawRecordValidator};

/// Result of a complete cleaning run
#[derive(Debug, Clone, Serialize)]
pub struct CleanSummary {
    /// Archives read, in concatenation order
    pub archives: Vec<PathBuf>,

    /// Rows in each of the three tables
    pub rows: usize,

    pub client_path: PathBuf,
    pub campaign_path: PathBuf,
    pub economics_path: PathBuf,
}

/// Parsed contents of one archive
#[derive(Debug, Clone)]
pub struct ArchiveContents {
    /// Archive file name
    pub source_name: String,

    /// Name of the CSV member inside the archive
    pub member: String,

    pub parsed: ParseResult,
}

/// Clean the configured extracts, archives sorted by file name.
pub fn clean_campaign_data(options: &CleanOptions) -> PipelineResult<CleanSummary> {
    clean_with_ordering(options, by_file_name)
}

/// Clean the configured extracts with an explicit archive ordering.
///
/// Nothing is written unless every archive parses, validates and
/// transforms without error.
pub fn clean_with_ordering(
    options: &CleanOptions,
    ordering: ArchiveOrdering,
) -> PipelineResult<CleanSummary> {
    let rules = options.load_rules()?;
    if let Some(ref path) = options.rules_path {
        log_info(format!("Using rules file: {}", path.display()));
    }
    let transformer = RecordTransformer::new(&rules)?;

    log_info(format!(
        "Looking for '{}' in {}",
        options.pattern,
        options.input_dir.display()
    ));
    let archives = discover_archives(&options.input_dir, &options.pattern, ordering)?;
    if archives.is_empty() {
        log_warning("No archives matched; writing empty tables");
    } else {
        log_success(format!("Found {} archive(s)", archives.len()));
    }

    let records = load_raw_records(&archives)?;
    log_success(format!("Loaded {} raw records", records.len()));

    log_info("Transforming records...");
    let tables = transformer.transform(&records)?;

    let written = write_tables(&tables, &options.output_dir)?;
    log_success(format!(
        "Wrote {} rows to {}",
        tables.len(),
        options.output_dir.display()
    ));

    Ok(CleanSummary {
        archives,
        rows: tables.len(),
        client_path: written.client,
        campaign_path: written.campaign,
        economics_path: written.economics,
    })
}

/// Extract and parse one archive.
pub fn read_archive(path: &Path) -> PipelineResult<ArchiveContents> {
    let source_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let (member, bytes) = read_tabular_member(path)?;
    let parsed = parse_bytes_auto(&bytes).map_err(|error| PipelineError::Csv {
        source_name: source_name.clone(),
        error,
    })?;

    Ok(ArchiveContents {
        source_name,
        member,
        parsed,
    })
}

/// Validate and coerce the rows of one parsed archive.
pub fn archive_records(
    contents: &ArchiveContents,
    validator: &RawRecordValidator,
) -> PipelineResult<Vec<RawRecord>> {
    let source_name = contents.source_name.as_str();
    let parsed = &contents.parsed;

    validate_headers(source_name, &parsed.headers)?;

    let mut records = Vec::with_capacity(parsed.records.len());
    for (row, &line) in parsed.records.iter().zip(&parsed.lines) {
        validator.check(source_name, line, row)?;
        if let Some(obj) = row.as_object() {
            records.push(RawRecord::from_row(obj, source_name, line)?);
        }
    }
    Ok(records)
}

/// Read every archive in order and concatenate their records.
pub fn load_raw_records(archives: &[PathBuf]) -> PipelineResult<Vec<RawRecord>> {
    let validator = RawRecordValidator::new()?;
    let mut records = Vec::new();

    for path in archives {
        let contents = read_archive(path)?;
        log_info(format!(
            "{} ({}): {} rows, encoding {}, delimiter '{}'",
            contents.source_name,
            contents.member,
            contents.parsed.records.len(),
            contents.parsed.encoding,
            format_delimiter(contents.parsed.delimiter),
        ));
        records.extend(archive_records(&contents, &validator)?);
    }

    Ok(records)
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}
