//! Declarative cleaning rules
//!
//! - `operations`: string cleanup steps and binary recoding
//! - `matrix`: the per-field rule set applied by the transformer
//!
//! ## Example
//!
//! ```rust,ignore
//! use campaign_cleaner::transform::rules::{apply_all, CleaningRules};
//!
//! let rules = CleaningRules::default().compile()?;
//! assert_eq!(apply_all(&rules.job, Some("blue-collar")).as_deref(), Some("blue_collar"));
//! assert_eq!(apply_all(&rules.education, Some("unknown")), None);
//! ```

pub mod matrix;
pub mod operations;

pub use matrix::{CleaningRules, CompiledRules, DEFAULT_CONTACT_YEAR};
pub use operations::{apply_all, operations_description, BinaryRule, CompiledOperation, Operation};
