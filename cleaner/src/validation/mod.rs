//! Schema checks for raw campaign extracts.
//!
//! Two layers, both fail-fast:
//!
//! - [`validate_headers`] - every expected raw column is present
//!   (case-sensitive; `mortgage` may be spelled `mortage`)
//! - [`RawRecordValidator`] - each row matches the embedded JSON Schema
//!   (Draft 7) in `schemas/raw-campaign-record.json`
//!
//! # Example
//!
//! ```rust,ignore
//! use campaign_cleaner::validation::{validate_headers, RawRecordValidator};
//!
//! validate_headers("part-1.csv", &parsed.headers)?;
//!
//! let validator = RawRecordValidator::new()?;
//! for (row, line) in parsed.records.iter().zip(&parsed.lines) {
//!     validator.check("part-1.csv", *line, row)?;
//! }
//! ```

use jsonschema::Validator;
use serde_json::Value;

use crate::error::{SchemaError, SchemaResult};
use crate::models::{MORTGAGE_ALIAS, RAW_COLUMNS};

const RAW_RECORD_SCHEMA: &str = include_str!("../../schemas/raw-campaign-record.json");

/// Check that a header row carries every raw column.
///
/// Extra columns are ignored.
pub fn validate_headers(source_name: &str, headers: &[String]) -> SchemaResult<()> {
    let has = |name: &str| headers.iter().any(|h| h == name);

    let missing: Vec<String> = RAW_COLUMNS
        .iter()
        .copied()
        .filter(|column| match *column {
            "mortgage" => !has("mortgage") && !has(MORTGAGE_ALIAS),
            other => !has(other),
        })
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns {
            source_name: source_name.to_string(),
            columns: missing,
        })
    }
}

/// Compiled raw record schema, built once per run.
pub struct RawRecordValidator {
    validator: Validator,
}

impl RawRecordValidator {
    pub fn new() -> SchemaResult<Self> {
        let schema: Value = serde_json::from_str(RAW_RECORD_SCHEMA)
            .map_err(|e| SchemaError::InvalidSchema(e.to_string()))?;
        let validator = jsonschema::draft7::new(&schema)
            .map_err(|e| SchemaError::InvalidSchema(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Validate one parsed row; `source_name` and `line` locate it in errors.
    pub fn check(&self, source_name: &str, line: usize, row: &Value) -> SchemaResult<()> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(row)
            .map(|e| e.to_string())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::InvalidRow {
                source_name: source_name.to_string(),
                line,
                errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row() -> Value {
        json!({
            "client_id": "17",
            "age": "41",
            "job": "blue-collar",
            "marital": "married",
            "education": "unknown",
            "credit_default": "unknown",
            "mortgage": "no",
            "month": "may",
            "day": "5",
            "number_contacts": "1",
            "contact_duration": "1575",
            "previous_campaign_contacts": "0",
            "previous_outcome": "nonexistent",
            "cons_price_idx": "93.994",
            "euribor_three_months": "4.857",
            "campaign_outcome": "yes"
        })
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_headers_complete() {
        assert!(validate_headers("a.csv", &headers(RAW_COLUMNS)).is_ok());
    }

    #[test]
    fn test_headers_accept_mortage_spelling() {
        let names: Vec<&str> = RAW_COLUMNS
            .iter()
            .map(|&c| if c == "mortgage" { "mortage" } else { c })
            .collect();
        assert!(validate_headers("a.csv", &headers(&names)).is_ok());
    }

    #[test]
    fn test_headers_report_all_missing() {
        let names: Vec<&str> = RAW_COLUMNS
            .iter()
            .copied()
            .filter(|&c| c != "job" && c != "mortgage")
            .collect();

        match validate_headers("a.csv", &headers(&names)) {
            Err(SchemaError::MissingColumns { columns, .. }) => {
                assert_eq!(columns, vec!["job".to_string(), "mortgage".to_string()]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_headers_are_case_sensitive() {
        let names: Vec<&str> = RAW_COLUMNS
            .iter()
            .map(|&c| if c == "age" { "Age" } else { c })
            .collect();
        assert!(validate_headers("a.csv", &headers(&names)).is_err());
    }

    #[test]
    fn test_valid_row() {
        let validator = RawRecordValidator::new().unwrap();
        assert!(validator.check("a.csv", 2, &row()).is_ok());
    }

    #[test]
    fn test_non_numeric_integer_rejected() {
        let validator = RawRecordValidator::new().unwrap();
        let mut data = row();
        data["contact_duration"] = json!("long");

        let err = validator.check("a.csv", 12, &data).unwrap_err();
        match err {
            SchemaError::InvalidRow { line, errors, .. } => {
                assert_eq!(line, 12);
                assert!(!errors.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_decimal_rejected() {
        let validator = RawRecordValidator::new().unwrap();
        let mut data = row();
        data["euribor_three_months"] = json!("");
        assert!(validator.check("a.csv", 2, &data).is_err());
    }

    #[test]
    fn test_scientific_decimal_accepted() {
        let validator = RawRecordValidator::new().unwrap();
        let mut data = row();
        data["euribor_three_months"] = json!("4.857e0");
        assert!(validator.check("a.csv", 2, &data).is_ok());
    }
}
