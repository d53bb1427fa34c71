//! Cleaning rule set
//!
//! The rule set defines how raw categorical columns become clean values.
//! [`CleaningRules::default`] is the canonical cleanup of the bank-marketing
//! extracts; a JSON rules file may replace it.

use serde::{Deserialize, Serialize};

use super::operations::{BinaryRule, CompiledOperation, Operation};
use crate::error::{TransformError, TransformResult};

/// Year stamped on every synthesized contact date.
pub const DEFAULT_CONTACT_YEAR: i32 = 2022;

/// Per-field cleanup rules for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningRules {
    /// Version of the rules format
    #[serde(default = "default_version")]
    pub version: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Ordered operations for `job`
    #[serde(default)]
    pub job: Vec<Operation>,

    /// Ordered operations for `marital`
    #[serde(default)]
    pub marital: Vec<Operation>,

    /// Ordered operations for `education`
    #[serde(default)]
    pub education: Vec<Operation>,

    pub credit_default: BinaryRule,
    pub mortgage: BinaryRule,
    pub previous_outcome: BinaryRule,
    pub campaign_outcome: BinaryRule,

    /// Year used for `last_contact_date`
    #[serde(default = "default_contact_year")]
    pub contact_year: i32,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_contact_year() -> i32 {
    DEFAULT_CONTACT_YEAR
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self {
            version: default_version(),
            description: "Bank marketing campaign cleanup".to_string(),
            job: vec![Operation::remove("."), Operation::replace("-", "_")],
            marital: Vec::new(),
            education: vec![Operation::replace(".", "_"), Operation::null_if("unknown")],
            credit_default: BinaryRule::new("yes"),
            mortgage: BinaryRule::new("yes"),
            previous_outcome: BinaryRule::new("success"),
            campaign_outcome: BinaryRule::new("yes"),
            contact_year: DEFAULT_CONTACT_YEAR,
        }
    }
}

impl CleaningRules {
    /// Parse rules from JSON string
    pub fn from_json(json: &str) -> TransformResult<Self> {
        let rules: Self = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> TransformResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every operation can be applied.
    pub fn validate(&self) -> TransformResult<()> {
        self.compile().map(|_| ())
    }

    /// Compile every pattern once for use over many rows.
    pub fn compile(&self) -> TransformResult<CompiledRules> {
        if !(0..=9999).contains(&self.contact_year) {
            return Err(TransformError::InvalidRule {
                field: "contact_year".to_string(),
                message: format!("{} is not a four-digit year", self.contact_year),
            });
        }

        Ok(CompiledRules {
            job: compile_field("job", &self.job)?,
            marital: compile_field("marital", &self.marital)?,
            education: compile_field("education", &self.education)?,
            credit_default: self.credit_default.clone(),
            mortgage: self.mortgage.clone(),
            previous_outcome: self.previous_outcome.clone(),
            campaign_outcome: self.campaign_outcome.clone(),
            contact_year: self.contact_year,
        })
    }
}

fn compile_field(field: &str, operations: &[Operation]) -> TransformResult<Vec<CompiledOperation>> {
    operations
        .iter()
        .map(|op| {
            op.compile().map_err(|message| TransformError::InvalidRule {
                field: field.to_string(),
                message,
            })
        })
        .collect()
}

/// A validated [`CleaningRules`] set with its patterns compiled
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub job: Vec<CompiledOperation>,
    pub marital: Vec<CompiledOperation>,
    pub education: Vec<CompiledOperation>,
    pub credit_default: BinaryRule,
    pub mortgage: BinaryRule,
    pub previous_outcome: BinaryRule,
    pub campaign_outcome: BinaryRule,
    pub contact_year: i32,
}
