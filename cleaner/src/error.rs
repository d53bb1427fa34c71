//! Error types for the campaign cleaning pipeline.
//!
//! Errors are grouped by the stage that raises them:
//!
//! - [`ArchiveError`] - Archive discovery and extraction (malformed archives)
//! - [`SchemaError`] - Raw columns or values that don't match the expected schema
//! - [`TransformError`] - Record transformation (unknown month, bad rules)
//! - [`OutputError`] - Writing the cleaned tables
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::ClientId;
use crate::parser::CsvError;

// =============================================================================
// Archive Errors
// =============================================================================

/// Errors while locating or opening the zipped extracts.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The glob pattern could not be compiled.
    #[error("Invalid archive pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A directory entry could not be read while scanning.
    #[error("Cannot scan input directory: {0}")]
    Discovery(#[from] glob::GlobError),

    /// Failed to read the archive file.
    #[error("Failed to read archive '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a readable zip archive.
    #[error("Malformed archive '{}': {source}", .path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// The archive holds no file at all.
    #[error("Archive '{}' contains no tabular member", .path.display())]
    NoTabularMember { path: PathBuf },

    /// The archive holds more than one file.
    #[error(
        "Archive '{}' contains {} members, expected exactly one: {}",
        .path.display(),
        .members.len(),
        .members.join(", ")
    )]
    MultipleTabularMembers { path: PathBuf, members: Vec<String> },
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Raw data that doesn't match the campaign record schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// One or more expected raw columns are absent.
    #[error("Missing raw columns in '{source_name}': {}", .columns.join(", "))]
    MissingColumns {
        source_name: String,
        columns: Vec<String>,
    },

    /// A row failed schema validation.
    #[error("Invalid row in '{source_name}' at line {line}: {}", .errors.join("; "))]
    InvalidRow {
        source_name: String,
        line: usize,
        errors: Vec<String>,
    },

    /// A value could not be coerced to its column type.
    #[error("Invalid value for '{column}' in '{source_name}' at line {line}: '{value}' ({expected})")]
    InvalidValue {
        source_name: String,
        line: usize,
        column: String,
        value: String,
        expected: &'static str,
    },

    /// The embedded raw record schema failed to compile.
    #[error("Invalid embedded schema: {0}")]
    InvalidSchema(String),
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors while turning raw records into the cleaned tables.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Month abbreviation outside the twelve known values.
    #[error("Unknown month abbreviation '{month}' for client {client_id}")]
    UnknownMonth { client_id: ClientId, month: String },

    /// A cleaning rule can't be applied.
    #[error("Invalid rule for field '{field}': {message}")]
    InvalidRule { field: String, message: String },

    /// Rules file JSON error.
    #[error("Rules JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while writing the cleaned tables.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Filesystem failure.
    #[error("Failed to write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failure.
    #[error("Failed to serialize '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by
/// [`crate::transform::pipeline::clean_campaign_data`]. It wraps all
/// lower-level errors; any of them aborts the whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Archive error.
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// CSV parsing error.
    #[error("CSV error in '{source_name}': {error}")]
    Csv { source_name: String, error: CsvError },

    /// Schema error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Transformation error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Output error.
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Rules file could not be read.
    #[error("Cannot read rules file '{}': {source}", .path.display())]
    Rules {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Result type for schema checks.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
