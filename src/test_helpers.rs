//! Shared test utilities for the sheetfolio test suite.
//!
//! Provides a small inline sheet, a call-counting [`Transport`] double, and
//! record builders so unit tests never touch the network.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let loader = Loader::new(CountingTransport::ok(SAMPLE_CSV));
//! let records = loader.load().unwrap();
//! let post = find_record(records, "alpha");
//! assert_eq!(post.title(), "Alpha");
//! assert_eq!(loader.transport().calls(), 1);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::loader::{LoadError, Transport};
use crate::parse::parse;
use crate::types::{Record, RecordSequence};

// =========================================================================
// Fixtures
// =========================================================================

/// Five rows across two collections; `hidden` is not shown, `gamma` is in
/// `fashion`, and `delta` has a lowercase `y`.
pub const SAMPLE_CSV: &str = "\
id,collection,show,prob,title,description,preview,category,embed,links,pic1,cap1,pic2,image_main
alpha,art,Y,1,Alpha,First piece,Teaser,Painting,https://youtu.be/abc123,\"Site__https://a.example, https://b.example\",a1.jpg,Cap one,a2.jpg,alpha.jpg
hidden,art,n,5,Hidden,,,,,,,,,
beta,art,y,3,Beta,\"Second, with comma\",,,,,,,,beta.jpg
gamma,fashion,y,,Gamma,,,,,,,,,
delta,art,y,2,Delta,,,,,,,,,
";

pub fn sample_records() -> RecordSequence {
    parse(SAMPLE_CSV)
}

/// Build a record from `(column, value)` pairs.
pub fn record(pairs: &[(&str, &str)]) -> Record {
    Record::new(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

/// Find a record by id. Panics with the available ids if missing.
pub fn find_record<'a>(records: &'a RecordSequence, id: &str) -> &'a Record {
    records.iter().find(|r| r.id() == id).unwrap_or_else(|| {
        let ids: Vec<&str> = records.iter().map(|r| r.id()).collect();
        panic!("record '{id}' not found. Available: {ids:?}")
    })
}

/// Ids of a slice of records, in order.
pub fn ids<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<&'a str> {
    records.into_iter().map(|r| r.id()).collect()
}

// =========================================================================
// Transport double
// =========================================================================

/// Transport that serves a fixed body (or fails) and counts every fetch.
pub struct CountingTransport {
    body: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl CountingTransport {
    pub fn ok(body: &str) -> Self {
        Self {
            body: Some(body.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            body: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Hold each fetch open for `delay`, widening the window for racing callers.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for CountingTransport {
    fn fetch(&self) -> Result<String, LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.body.clone().ok_or_else(|| LoadError::NetworkFailure {
            source_name: self.describe(),
            reason: "HTTP 503 Service Unavailable".to_string(),
        })
    }

    fn describe(&self) -> String {
        "test://sheet.csv".to_string()
    }
}
