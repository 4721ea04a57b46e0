//! CSV parsing for the published sheet.
//!
//! This is deliberately not a general RFC 4180 reader. The sheet export is
//! parsed with a single quote-toggling scan per line:
//!
//! - lines are split on `\n`; blank and whitespace-only lines vanish wherever
//!   they appear
//! - the first remaining line is the header row (trimmed, quotes removed)
//! - a `"` flips the in-quotes flag and is consumed; a `,` ends a field only
//!   outside quotes; every field is trimmed
//! - fields map onto headers by position, short rows pad with `""`, surplus
//!   fields are dropped
//!
//! Consequences worth knowing: a quoted cell cannot span lines, and a doubled
//! quote (`""`) disappears instead of becoming a literal `"`.

use crate::types::{Record, RecordSequence};
use std::collections::HashMap;

/// Parse a CSV export into row-ordered records.
///
/// Never fails: malformed rows degrade to empty fields. Input without any
/// non-blank line yields an empty sequence.
pub fn parse(text: &str) -> RecordSequence {
    let mut lines = text.split('\n').filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return RecordSequence::default();
    };
    let headers = parse_headers(header_line);

    let records = lines
        .map(|line| {
            let mut values = split_fields(line).into_iter();
            let fields: HashMap<String, String> = headers
                .iter()
                .map(|h| (h.clone(), values.next().unwrap_or_default()))
                .collect();
            Record::new(fields)
        })
        .collect();

    RecordSequence { headers, records }
}

fn parse_headers(line: &str) -> Vec<String> {
    line.split(',')
        .map(|h| h.trim().replace('"', ""))
        .collect()
}

/// Split one data line into trimmed field values.
fn split_fields(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                values.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    values.push(current.trim().to_string());
    values
}
