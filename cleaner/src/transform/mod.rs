//! Transformation module.
//!
//! This module turns raw campaign records into the cleaned tables:
//! - Rules: declarative per-field cleanup and binary recoding
//! - Date: contact date synthesis
//! - Transformer: the record-by-record table builders
//! - Pipeline: discovery, extraction, validation and output around it

pub mod date;
pub mod pipeline;
pub mod rules;
pub mod transformer;

pub use date::{last_contact_date, month_number};
pub use pipeline::*;
pub use rules::*;
pub use transformer::{assign_client_ids, RecordTransformer};
