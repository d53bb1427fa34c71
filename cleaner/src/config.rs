//! Run configuration.
//!
//! Values come from, in increasing priority: built-in defaults, environment
//! variables (a `.env` file is loaded by the binary), command-line flags.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `CAMPAIGN_INPUT_DIR` | `files/input` |
//! | `CAMPAIGN_OUTPUT_DIR` | `files/output` |
//! | `CAMPAIGN_ARCHIVE_PATTERN` | `bank-marketing-campaing-*.csv.zip` |
//! | `CAMPAIGN_RULES` | (built-in rules) |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{PipelineError, PipelineResult};
use crate::source::DEFAULT_ARCHIVE_PATTERN;
use crate::transform::rules::CleaningRules;

pub const ENV_INPUT_DIR: &str = "CAMPAIGN_INPUT_DIR";
pub const ENV_OUTPUT_DIR: &str = "CAMPAIGN_OUTPUT_DIR";
pub const ENV_ARCHIVE_PATTERN: &str = "CAMPAIGN_ARCHIVE_PATTERN";
pub const ENV_RULES: &str = "CAMPAIGN_RULES";

/// Options for one cleaning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanOptions {
    /// Directory holding the zipped extracts
    pub input_dir: PathBuf,

    /// Directory receiving `client.csv`, `campaign.csv`, `economics.csv`
    pub output_dir: PathBuf,

    /// Glob pattern of the archives, relative to `input_dir`
    pub pattern: String,

    /// JSON rules file replacing the built-in cleaning rules
    pub rules_path: Option<PathBuf>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("files/input"),
            output_dir: PathBuf::from("files/output"),
            pattern: DEFAULT_ARCHIVE_PATTERN.to_string(),
            rules_path: None,
        }
    }
}

impl CleanOptions {
    /// Defaults overridden by `CAMPAIGN_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            input_dir: var(ENV_INPUT_DIR).map(PathBuf::from).unwrap_or(defaults.input_dir),
            output_dir: var(ENV_OUTPUT_DIR).map(PathBuf::from).unwrap_or(defaults.output_dir),
            pattern: var(ENV_ARCHIVE_PATTERN).unwrap_or(defaults.pattern),
            rules_path: var(ENV_RULES).map(PathBuf::from),
        }
    }

    /// Load the configured rules file, or the built-in rules.
    pub fn load_rules(&self) -> PipelineResult<CleaningRules> {
        match &self.rules_path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| PipelineError::Rules {
                    path: path.clone(),
                    source,
                })?;
                Ok(CleaningRules::from_json(&content)?)
            }
            None => Ok(CleaningRules::default()),
        }
    }
}
