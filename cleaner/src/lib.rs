//! # Campaign Cleaner - bank marketing extract cleanup
//!
//! Campaign Cleaner reads the zipped CSV extracts of a bank marketing
//! campaign and splits them into three clean tables keyed by `client_id`:
//! client attributes, campaign interactions and economic indicators.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  *.csv.zip  │────▶│   Parser    │────▶│  Transform  │────▶│  3 × CSV    │
//! │  (sorted)   │     │ (auto-enc)  │     │  (rules)    │     │ (client_id) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use campaign_cleaner::{clean_campaign_data, CleanOptions};
//!
//! fn main() {
//!     let summary = clean_campaign_data(&CleanOptions::default()).unwrap();
//!     println!("Cleaned {} rows", summary.rows);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Run options from defaults, environment and CLI
//! - [`logs`] - Progress logging
//! - [`models`] - Raw and cleaned row types
//! - [`source`] - Archive discovery and extraction
//! - [`parser`] - CSV parsing with auto-detection
//! - [`validation`] - Raw schema checks
//! - [`transform`] - Cleaning rules, transformer and pipeline
//! - [`output`] - Table writers

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Input
pub mod parser;
pub mod source;

// Validation
pub mod validation;

// Transformation
pub mod transform;

// Output
pub mod output;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ArchiveError, OutputError, PipelineError, SchemaError, TransformError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{CampaignRow, CleanedTables, ClientId, ClientRow, EconomicsRow, RawRecord};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::CleanOptions;

// =============================================================================
// Re-exports - Source
// =============================================================================

pub use source::{by_file_name, discover_archives, read_tabular_member, ArchiveOrdering};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    csv_to_json,
    parse_csv,
    parse_bytes_auto,
    detect_encoding,
    detect_delimiter,
    decode_content,
    CsvError,
    ParseResult,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{validate_headers, RawRecordValidator};

// =============================================================================
// Re-exports - Rules & Transformer
// =============================================================================

pub use transform::rules::{
    apply_all,
    operations_description,
    BinaryRule,
    CleaningRules,
    CompiledOperation,
    CompiledRules,
    Operation,
};

pub use transform::{assign_client_ids, last_contact_date, month_number, RecordTransformer};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    archive_records,
    clean_campaign_data,
    clean_with_ordering,
    load_raw_records,
    read_archive,
    ArchiveContents,
    CleanSummary,
};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use output::{table_to_string, write_table, write_tables, TableRow, WrittenTables};
