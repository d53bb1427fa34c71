//! Domain models for the campaign cleaning pipeline.
//!
//! - [`RawRecord`] - One typed row of the raw campaign extract
//! - [`ClientRow`] - Client attributes (`client.csv`)
//! - [`CampaignRow`] - Campaign interaction attributes (`campaign.csv`)
//! - [`EconomicsRow`] - Economic indicators (`economics.csv`)
//! - [`CleanedTables`] - The three output tables of one run

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{SchemaError, SchemaResult};

/// Synthetic row-position identifier shared by all three output tables.
pub type ClientId = u64;

/// Raw column names, in the order they appear in the extracts.
pub const RAW_COLUMNS: &[&str] = &[
    "age",
    "job",
    "marital",
    "education",
    "credit_default",
    "mortgage",
    "month",
    "day",
    "number_contacts",
    "contact_duration",
    "previous_campaign_contacts",
    "previous_outcome",
    "cons_price_idx",
    "euribor_three_months",
    "campaign_outcome",
];

/// Alternative spelling some extracts use for the `mortgage` column.
pub const MORTGAGE_ALIAS: &str = "mortage";

// =============================================================================
// Raw Record
// =============================================================================

/// One raw campaign row after type coercion.
///
/// Categorical fields are `None` when the cell is empty. Numeric
/// fields are mandatory.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub age: i64,
    pub job: Option<String>,
    pub marital: Option<String>,
    pub education: Option<String>,
    pub credit_default: Option<String>,
    pub mortgage: Option<String>,
    pub number_contacts: i64,
    pub contact_duration: i64,
    pub previous_campaign_contacts: i64,
    pub previous_outcome: Option<String>,
    pub campaign_outcome: Option<String>,
    pub month: String,
    pub day: i64,
    pub cons_price_idx: f64,
    pub euribor_three_months: f64,
}

impl RawRecord {
    /// Coerce one parsed row (header -> text) into a typed record.
    ///
    /// `source_name` and `line` only feed error messages.
    pub fn from_row(row: &Map<String, Value>, source_name: &str, line: usize) -> SchemaResult<Self> {
        let cell = RowCells { row, source_name, line };
        // Row keys are the file's headers, so this picks one column per file.
        let mortgage_column = if row.contains_key("mortgage") {
            "mortgage"
        } else {
            MORTGAGE_ALIAS
        };

        Ok(Self {
            age: cell.integer("age")?,
            job: cell.text("job"),
            marital: cell.text("marital"),
            education: cell.text("education"),
            credit_default: cell.text("credit_default"),
            mortgage: cell.text(mortgage_column),
            number_contacts: cell.integer("number_contacts")?,
            contact_duration: cell.integer("contact_duration")?,
            previous_campaign_contacts: cell.integer("previous_campaign_contacts")?,
            previous_outcome: cell.text("previous_outcome"),
            campaign_outcome: cell.text("campaign_outcome"),
            month: cell.raw("month").unwrap_or_default().to_string(),
            day: cell.integer("day")?,
            cons_price_idx: cell.decimal("cons_price_idx")?,
            euribor_three_months: cell.decimal("euribor_three_months")?,
        })
    }
}

/// Typed accessors over one parsed row.
struct RowCells<'a> {
    row: &'a Map<String, Value>,
    source_name: &'a str,
    line: usize,
}

impl<'a> RowCells<'a> {
    fn raw(&self, column: &str) -> Option<&'a str> {
        self.row.get(column).and_then(Value::as_str)
    }

    fn text(&self, column: &str) -> Option<String> {
        self.raw(column)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn integer(&self, column: &str) -> SchemaResult<i64> {
        let raw = self.raw(column).unwrap_or("");
        raw.trim()
            .parse::<i64>()
            .map_err(|_| self.invalid(column, raw, "integer"))
    }

    fn decimal(&self, column: &str) -> SchemaResult<f64> {
        let raw = self.raw(column).unwrap_or("");
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.invalid(column, raw, "decimal"))
    }

    fn invalid(&self, column: &str, value: &str, expected: &'static str) -> SchemaError {
        SchemaError::InvalidValue {
            source_name: self.source_name.to_string(),
            line: self.line,
            column: column.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}

// =============================================================================
// Output Rows
// =============================================================================

/// A row of `client.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRow {
    pub client_id: ClientId,
    pub age: i64,
    pub job: Option<String>,
    pub marital: Option<String>,
    /// `None` is the missing-value marker (rendered as an empty field).
    pub education: Option<String>,
    pub credit_default: u8,
    pub mortgage: u8,
}

/// A row of `campaign.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRow {
    pub client_id: ClientId,
    pub number_contacts: i64,
    pub contact_duration: i64,
    pub previous_campaign_contacts: i64,
    pub previous_outcome: u8,
    pub campaign_outcome: u8,
    /// `YYYY-MM-DD`, never calendar-checked.
    pub last_contact_date: String,
}

/// A row of `economics.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicsRow {
    pub client_id: ClientId,
    pub cons_price_idx: f64,
    pub euribor_three_months: f64,
}

/// The three tables derived from one run, joined on `client_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedTables {
    pub client: Vec<ClientRow>,
    pub campaign: Vec<CampaignRow>,
    pub economics: Vec<EconomicsRow>,
}

impl CleanedTables {
    /// Number of rows (identical across the three tables).
    pub fn len(&self) -> usize {
        self.client.len()
    }

    pub fn is_empty(&self) -> bool {
        self.client.is_empty()
    }
}
