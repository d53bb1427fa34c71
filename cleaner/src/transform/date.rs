//! Contact date synthesis.
//!
//! Raw extracts carry only a month abbreviation and a day of month; the
//! cleaned campaign table wants a `YYYY-MM-DD` string. No calendar check is
//! done, so `feb` / `31` yields `2022-02-31`.

use crate::error::{TransformError, TransformResult};
use crate::models::ClientId;

/// Recognized month abbreviations and their two-digit numbers.
const MONTHS: [(&str, &str); 12] = [
    ("jan", "01"),
    ("feb", "02"),
    ("mar", "03"),
    ("apr", "04"),
    ("may", "05"),
    ("jun", "06"),
    ("jul", "07"),
    ("aug", "08"),
    ("sep", "09"),
    ("oct", "10"),
    ("nov", "11"),
    ("dec", "12"),
];

/// Two-digit month number for a lowercase three-letter abbreviation.
pub fn month_number(abbr: &str) -> Option<&'static str> {
    MONTHS
        .iter()
        .find(|(name, _)| *name == abbr)
        .map(|(_, number)| *number)
}

/// Build `YYYY-MM-DD` from a year, month abbreviation and day.
///
/// Fails with [`TransformError::UnknownMonth`] when `month` isn't one of
/// the twelve abbreviations; `client_id` only locates the failing row.
pub fn last_contact_date(
    client_id: ClientId,
    year: i32,
    month: &str,
    day: i64,
) -> TransformResult<String> {
    let number = month_number(month).ok_or_else(|| TransformError::UnknownMonth {
        client_id,
        month: month.to_string(),
    })?;
    Ok(format!("{:04}-{}-{:02}", year, number, day))
}
