//! CSV decoding with encoding and delimiter auto-detection.
//!
//! Converts CSV rows into JSON objects keyed by header. No campaign-specific
//! logic here.

use encoding_rs::{Encoding, UTF_8};
use serde_json::{Map, Value};
use std::io::Read;
use tracing::debug;

/// CSV parsing error with context
#[derive(Debug, Clone)]
pub struct CsvError {
    /// 1-based source line, 0 when unknown
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for CsvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.message)
        } else {
            write!(f, "Line {}: {}", self.line, self.message)
        }
    }
}

impl std::error::Error for CsvError {}

impl CsvError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }

    fn from_csv(err: csv::Error) -> Self {
        let line = err
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(0);
        Self::new(line, err.to_string())
    }
}

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed records as JSON objects
    pub records: Vec<Value>,
    /// Source line of each record (1-based, header is line 1)
    pub lines: Vec<usize>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is taken as is; anything else goes through chardet and the
/// WHATWG label table of `encoding_rs` (so `iso-8859-1` decodes as
/// windows-1252). An unknown label is an error.
pub fn detect_encoding(bytes: &[u8]) -> Result<&'static Encoding, CsvError> {
    if std::str::from_utf8(bytes).is_ok() {
        return Ok(UTF_8);
    }

    let (charset, confidence, _) = chardet::detect(bytes);
    debug!("chardet guessed '{}' (confidence {:.2})", charset, confidence);

    Encoding::for_label(chardet::charset2encoding(&charset).as_bytes())
        .ok_or_else(|| CsvError::new(0, format!("Unsupported encoding '{}'", charset)))
}

/// Decode bytes with the given encoding, rejecting malformed input.
pub fn decode_content(bytes: &[u8], encoding: &'static Encoding) -> Result<String, CsvError> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        let line = if encoding == UTF_8 {
            first_invalid_line(bytes)
        } else {
            0
        };
        return Err(CsvError::new(
            line,
            format!("Content is not valid {}", encoding.name()),
        ));
    }
    Ok(text.into_owned())
}

fn first_invalid_line(bytes: &[u8]) -> usize {
    let valid = match std::str::from_utf8(bytes) {
        Ok(s) => s.len(),
        Err(e) => e.valid_up_to(),
    };
    bytes[..valid].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Falls back to `,` when the header holds none of the candidates.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV into JSON objects with explicit delimiter.
///
/// Each row becomes a JSON object where keys are column headers.
///
/// # Example
/// ```ignore
/// use campaign_cleaner::csv_to_json;
///
/// let csv = "job,age\nadmin.,30\nretired,65";
/// let rows = csv_to_json(csv, ',').unwrap();
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0]["job"], "admin.");
/// assert_eq!(rows[0]["age"], "30");
/// ```
pub fn csv_to_json(csv: &str, delimiter: char) -> Result<Vec<Value>, CsvError> {
    parse_csv(csv.as_bytes(), delimiter).map(|(_, records, _)| records)
}

/// Parse CSV from a reader into headers, JSON objects and their source lines.
pub fn parse_csv<R: Read>(
    reader: R,
    delimiter: char,
) -> Result<(Vec<String>, Vec<Value>, Vec<usize>), CsvError> {
    let delimiter = u8::try_from(delimiter)
        .map_err(|_| CsvError::new(0, format!("Unsupported delimiter '{}'", delimiter)))?;

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(CsvError::from_csv)?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::new(1, "Empty CSV file"));
    }

    let mut records = Vec::new();
    let mut lines = Vec::new();

    for result in rdr.records() {
        let row = result.map_err(CsvError::from_csv)?;
        let line = row.position().map(|p| p.line() as usize).unwrap_or(0);

        let obj: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .map(|(header, raw)| (header.clone(), Value::String(raw.to_string())))
            .collect();

        records.push(Value::Object(obj));
        lines.push(line);
    }

    Ok((headers, records, lines))
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> Result<ParseResult, CsvError> {
    // Detect encoding
    let encoding = detect_encoding(bytes)?;

    // Decode content
    let content = decode_content(bytes, encoding)?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    // Detect delimiter
    let delimiter = detect_delimiter(content);

    let (headers, records, lines) = parse_csv(content.as_bytes(), delimiter)?;

    Ok(ParseResult {
        records,
        lines,
        encoding: encoding.name().to_string(),
        delimiter,
        headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let csv = "job,age\nadmin.,30\nretired,65";
        let rows = csv_to_json(csv, ',').unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["job"], "admin.");
        assert_eq!(rows[0]["age"], "30");
        assert_eq!(rows[1]["job"], "retired");
        assert_eq!(rows[1]["age"], "65");
    }

    #[test]
    fn test_semicolon_delimiter() {
        let csv = "a;b;c\n1;2;3";
        let rows = csv_to_json(csv, ';').unwrap();

        assert_eq!(rows[0]["a"], "1");
        assert_eq!(rows[0]["b"], "2");
        assert_eq!(rows[0]["c"], "3");
    }

    #[test]
    fn test_quoted_values() {
        let csv = "job,note\n\"blue-collar\",\"a, b\"";
        let rows = csv_to_json(csv, ',').unwrap();

        assert_eq!(rows[0]["job"], "blue-collar");
        assert_eq!(rows[0]["note"], "a, b");
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let csv = "job\n admin. ";
        let rows = csv_to_json(csv, ',').unwrap();

        assert_eq!(rows[0]["job"], " admin. ");
    }

    #[test]
    fn test_empty_lines_skipped() {
        let csv = "a,b\n1,2\n\n3,4\n";
        let rows = csv_to_json(csv, ',').unwrap();

        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_missing_values() {
        let csv = "a,b,c\n1,,3";
        let rows = csv_to_json(csv, ',').unwrap();

        assert_eq!(rows[0]["a"], "1");
        assert_eq!(rows[0]["b"], "");
        assert_eq!(rows[0]["c"], "3");
    }

    #[test]
    fn test_ragged_row_rejected() {
        let csv = "a,b\n1,2,3";
        let err = csv_to_json(csv, ',').unwrap_err();

        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_record_lines_tracked() {
        let (_, records, lines) = parse_csv("a\n1\n\n2\n".as_bytes(), ',').unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn test_error_message_format() {
        assert_eq!(CsvError::new(5, "Invalid value").to_string(), "Line 5: Invalid value");
        assert_eq!(CsvError::new(0, "Unsupported").to_string(), "Unsupported");
    }

    #[test]
    fn test_empty_csv_error() {
        let result = csv_to_json("", ',');
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.message.contains("Empty"));
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_detect_delimiter_single_column() {
        assert_eq!(detect_delimiter("age\n30"), ',');
    }

    #[test]
    fn test_auto_parse() {
        let csv = "age,job\n30,admin.\n25,services";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.delimiter, ',');
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.headers, vec!["age", "job"]);
        assert_eq!(result.lines, vec![2, 3]);
    }

    #[test]
    fn test_auto_parse_strips_bom() {
        let result = parse_bytes_auto("\u{feff}age,job\n30,admin.\n".as_bytes()).unwrap();
        assert_eq!(result.headers, vec!["age", "job"]);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société ¤" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9, 0x20, 0xA4];
        let latin1 = Encoding::for_label(b"iso-8859-1").unwrap();
        assert_eq!(decode_content(bytes, latin1).unwrap(), "Société ¤");
    }

    #[test]
    fn test_utf8_is_detected_without_guessing() {
        assert_eq!(detect_encoding("job\nsociété\n".as_bytes()).unwrap(), UTF_8);
        assert_eq!(detect_encoding(b"age\n30\n").unwrap(), UTF_8);
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let bytes: &[u8] = b"age,job\n30,admin.\n41,adm\xFFin\n";
        let err = decode_content(bytes, UTF_8).unwrap_err();

        assert_eq!(err.line, 3);
        assert!(err.message.contains("UTF-8"));
    }
}
