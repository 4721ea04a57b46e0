//! Record types shared by every stage.
//!
//! A [`Record`] is one spreadsheet row exactly as published: every column from
//! the header row maps to a string, empty cells included. Nothing here knows
//! what `show` or `prob` mean; interpretation lives in [`crate::select`] and
//! [`crate::content`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One spreadsheet row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Value of `column`, or `""` when the sheet has no such column.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    /// First non-empty value among several spellings of the same column.
    ///
    /// Sheets drift on capitalization (`embed` vs `Embed`), so callers list
    /// every variant they accept.
    pub fn get_any(&self, columns: &[&str]) -> &str {
        columns
            .iter()
            .map(|c| self.get(c))
            .find(|v| !v.is_empty())
            .unwrap_or("")
    }

    /// Whether the header row contained `column`.
    pub fn has_column(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn id(&self) -> &str {
        self.get("id")
    }

    pub fn title(&self) -> &str {
        self.get("title")
    }

    pub fn collection(&self) -> &str {
        self.get("collection")
    }
}

/// All rows of one fetch, in sheet order.
///
/// Row order is the canonical order for prev/next navigation and is never
/// re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSequence {
    /// Column names as published in the header row.
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl RecordSequence {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a RecordSequence {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
