//! Rule operations for field cleanup
//!
//! String rules are applied in order over an optional value; a missing value
//! passes through every rule untouched. Binary recoding is a separate total
//! function so that missing values always map to 0.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single string cleanup step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Replace every occurrence of `pattern` with `value`
    Replace {
        pattern: String,
        #[serde(default)]
        value: String,
        /// Treat `pattern` as a regular expression instead of literal text
        #[serde(default)]
        regex: bool,
    },

    /// Turn the value into the missing-value marker when it equals `value`
    NullIf {
        value: String,
    },
}

impl Operation {
    /// Literal replacement.
    pub fn replace(pattern: impl Into<String>, value: impl Into<String>) -> Self {
        Operation::Replace {
            pattern: pattern.into(),
            value: value.into(),
            regex: false,
        }
    }

    /// Literal removal.
    pub fn remove(pattern: impl Into<String>) -> Self {
        Self::replace(pattern, "")
    }

    pub fn null_if(value: impl Into<String>) -> Self {
        Operation::NullIf { value: value.into() }
    }

    /// Compile this operation, rejecting an empty or invalid pattern.
    pub fn compile(&self) -> Result<CompiledOperation, String> {
        match self {
            Operation::Replace { pattern, .. } if pattern.is_empty() => {
                Err("replace pattern must not be empty".to_string())
            }
            Operation::Replace { pattern, value, regex: true } => Regex::new(pattern)
                .map(|regex| CompiledOperation::Regex {
                    regex,
                    value: value.clone(),
                })
                .map_err(|e| e.to_string()),
            Operation::Replace { pattern, value, regex: false } => Ok(CompiledOperation::Literal {
                pattern: pattern.clone(),
                value: value.clone(),
            }),
            Operation::NullIf { value } => Ok(CompiledOperation::NullIf {
                value: value.clone(),
            }),
        }
    }
}

/// An [`Operation`] ready to run, regex patterns already compiled
#[derive(Debug, Clone)]
pub enum CompiledOperation {
    Literal { pattern: String, value: String },
    Regex { regex: Regex, value: String },
    NullIf { value: String },
}

impl CompiledOperation {
    /// Apply this operation to a value
    pub fn apply(&self, value: Option<String>) -> Option<String> {
        let s = value?;
        match self {
            CompiledOperation::Literal { pattern, value } => Some(s.replace(pattern.as_str(), value)),
            CompiledOperation::Regex { regex, value } => {
                Some(regex.replace_all(&s, value.as_str()).into_owned())
            }
            CompiledOperation::NullIf { value: marker } => {
                if &s == marker {
                    None
                } else {
                    Some(s)
                }
            }
        }
    }
}

/// Apply an ordered list of operations, left to right.
pub fn apply_all(operations: &[CompiledOperation], value: Option<&str>) -> Option<String> {
    operations
        .iter()
        .fold(value.map(str::to_string), |acc, op| op.apply(acc))
}

/// Binary recoding: the `positive` literal maps to 1, anything else to 0.
///
/// Exact, case-sensitive match. Missing values map to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryRule {
    pub positive: String,
}

impl BinaryRule {
    pub fn new(positive: impl Into<String>) -> Self {
        Self { positive: positive.into() }
    }

    pub fn apply(&self, value: Option<&str>) -> u8 {
        match value {
            Some(v) if v == self.positive => 1,
            _ => 0,
        }
    }
}

/// Get a description of all available operations
pub fn operations_description() -> String {
    r#"Available cleaning operations:

| Operation | Description | Parameters |
|-----------|-------------|------------|
| replace | Replace every occurrence | pattern: text (or regex), value: replacement (default ""), regex: bool |
| null_if | Missing value when equal | value: text that means "no value" |

Binary fields use {"positive": "<literal>"}: the literal maps to 1,
every other value (including an empty cell) maps to 0.

Example operations in JSON:
[
  {"type": "replace", "pattern": ".", "value": "_"},
  {"type": "null_if", "value": "unknown"}
]"#
    .to_string()
}
