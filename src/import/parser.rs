//! CSV text to header-keyed rows.

use std::collections::{HashMap, HashSet};

use csv::{ReaderBuilder, Trim};

use crate::error::ParseError;

/// One data row, keyed by header label.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based position among the data rows.
    pub row: usize,
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields.get(label).map(String::as_str)
    }
}

/// Parses comma-separated text with a header row into one `RawRow` per data row, in input order.
///
/// Any malformed row fails the whole parse; rows are never skipped.
#[tracing::instrument(skip(input), fields(bytes = input.len()))]
pub fn parse_csv(input: &str) -> Result<Vec<RawRow>, ParseError> {
    // The csv reader treats an unterminated quote as running to end of input.
    if let Some(row) = unterminated_quote_row(input) {
        return Err(ParseError::MalformedRow {
            row,
            reason: "unterminated quoted field".to_string(),
        });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(Trim::Headers)
        .from_reader(input.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ParseError::MalformedRow { row: 0, reason: e.to_string() })?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::MissingHeader);
    }

    let mut seen = HashSet::new();
    for label in &headers {
        if !seen.insert(label.as_str()) {
            return Err(ParseError::DuplicateHeader(label.clone()));
        }
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let record = result.map_err(|e| ParseError::MalformedRow {
            row,
            reason: describe_csv_error(&e),
        })?;

        let fields = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(RawRow { row, fields });
    }

    tracing::debug!("Parsed {} data rows", rows.len());
    Ok(rows)
}

fn describe_csv_error(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
            format!("expected {} columns, found {}", expected_len, len)
        }
        _ => err.to_string(),
    }
}

/// Returns the data row (1-based, header is 0) in which a quoted field opens but never closes.
///
/// Numbering follows the csv reader: `\n`, `\r` and `\r\n` all end a record and empty lines are
/// not records.
fn unterminated_quote_row(input: &str) -> Option<usize> {
    let mut record = 0usize;
    let mut line_has_content = false;
    let mut at_field_start = true;
    let mut in_quotes = false;
    let mut quote_opened_in = 0usize;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        match c {
            '\n' | '\r' => {
                if line_has_content {
                    record += 1;
                }
                line_has_content = false;
                at_field_start = true;
            }
            '"' if at_field_start => {
                in_quotes = true;
                quote_opened_in = record;
                line_has_content = true;
                at_field_start = false;
            }
            ',' => {
                line_has_content = true;
                at_field_start = true;
            }
            _ => {
                line_has_content = true;
                at_field_start = false;
            }
        }
    }

    in_quotes.then_some(quote_opened_in)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Company Name,Total Funding,Current Revenue,Investor List,Market Segment,Stage";

    #[test]
    fn test_parses_rows_in_order_with_quoted_delimiters() {
        let input = format!(
            "{}\nCompany A,25000000,5000000,\"Draper, Sequoia\",SaaS,Series B\nCompany B,12000000,2500000,\"Draper, a16z\",Fintech,Series A\n",
            HEADER
        );
        let rows = parse_csv(&input).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 1);
        assert_eq!(rows[0].get("Company Name"), Some("Company A"));
        assert_eq!(rows[0].get("Investor List"), Some("Draper, Sequoia"));
        assert_eq!(rows[1].row, 2);
        assert_eq!(rows[1].get("Stage"), Some("Series A"));
    }

    #[test]
    fn test_header_labels_are_trimmed() {
        let input = "Company Name, Total Funding\nAcme,100\n";
        let rows = parse_csv(input).unwrap();
        assert_eq!(rows[0].get("Total Funding"), Some("100"));
    }

    #[test]
    fn test_column_count_mismatch_reports_row() {
        let input = format!("{}\nA,1,1,X,SaaS,Seed\nB,2,2,SaaS,Seed\n", HEADER);
        let err = parse_csv(&input).unwrap_err();
        match err {
            ParseError::MalformedRow { row, reason } => {
                assert_eq!(row, 2);
                assert!(reason.contains("expected 6 columns"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_quote_reports_row() {
        let input = format!("{}\nA,1,1,X,SaaS,Seed\nB,2,2,\"Draper, Sequoia,SaaS,Seed\n", HEADER);
        assert_eq!(
            parse_csv(&input).unwrap_err(),
            ParseError::MalformedRow {
                row: 2,
                reason: "unterminated quoted field".to_string()
            }
        );
    }

    #[test]
    fn test_blank_lines_do_not_shift_row_numbers() {
        let unterminated = format!("{}\n\nA,1,1,X,SaaS,Seed\nB,1,1,\"X,SaaS,Seed\n", HEADER);
        assert_eq!(
            parse_csv(&unterminated).unwrap_err(),
            ParseError::MalformedRow {
                row: 2,
                reason: "unterminated quoted field".to_string()
            }
        );

        let short = format!("{}\n\nA,1,1,X,SaaS,Seed\nB,1,1,X\n", HEADER);
        assert!(matches!(
            parse_csv(&short).unwrap_err(),
            ParseError::MalformedRow { row: 2, .. }
        ));
    }

    #[test]
    fn test_carriage_return_line_endings_count_rows() {
        let input = format!("{}\rA,1,1,X,SaaS,Seed\r\nB,1,1,\"X,SaaS,Seed\r", HEADER);
        assert_eq!(
            parse_csv(&input).unwrap_err(),
            ParseError::MalformedRow {
                row: 2,
                reason: "unterminated quoted field".to_string()
            }
        );

        let rows = parse_csv(&format!("{}\rA,1,1,X,SaaS,Seed\r", HEADER)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Stage"), Some("Seed"));
    }

    #[test]
    fn test_escaped_quotes_are_not_unterminated() {
        let input = "Company Name,Stage\n\"The \"\"Best\"\" Co\",Seed\n";
        let rows = parse_csv(input).unwrap();
        assert_eq!(rows[0].get("Company Name"), Some("The \"Best\" Co"));
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let input = "Stage,Stage\nSeed,Seed\n";
        assert_eq!(
            parse_csv(input).unwrap_err(),
            ParseError::DuplicateHeader("Stage".to_string())
        );
    }

    #[test]
    fn test_empty_input_has_no_header() {
        assert_eq!(parse_csv("").unwrap_err(), ParseError::MissingHeader);
    }

    #[test]
    fn test_header_only_yields_no_rows() {
        let rows = parse_csv(HEADER).unwrap();
        assert!(rows.is_empty());
    }
}
