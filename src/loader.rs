//! Fetch-once record loading.
//!
//! A [`Loader`] owns the memoized [`RecordSequence`] for one run. The first
//! successful [`Loader::load`] fetches the CSV through its [`Transport`],
//! parses it, and stores the result; every later call returns the stored
//! sequence without touching the transport again.
//!
//! ## Single flight
//!
//! The memo is a `once_cell::sync::OnceCell`. Callers that arrive while the
//! first fetch is still in flight block on that fetch instead of starting
//! their own, so a loader issues at most one successful request no matter how
//! many threads ask.
//!
//! ## Failures
//!
//! A failed fetch is reported to the caller that triggered it and is not
//! memoized. There is no retry or backoff inside the loader; a later explicit
//! `load()` simply tries again.

use crate::config::SourceConfig;
use crate::parse;
use crate::types::RecordSequence;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to fetch {source_name}: {reason}")]
    NetworkFailure { source_name: String, reason: String },
    #[error("Failed to read {path}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

impl LoadError {
    fn network(source_name: &str, reason: impl ToString) -> Self {
        LoadError::NetworkFailure {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Where the CSV text comes from. One `fetch` is one request.
pub trait Transport: Send + Sync {
    fn fetch(&self) -> Result<String, LoadError>;

    /// Human-readable origin for logs and error messages.
    fn describe(&self) -> String;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn fetch(&self) -> Result<String, LoadError> {
        (**self).fetch()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Unauthenticated GET against the published sheet URL.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, LoadError> {
        let url = url.into();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::network(&url, e))?;
        Ok(Self { client, url })
    }

    pub fn from_config(source: &SourceConfig) -> Result<Self, LoadError> {
        Self::new(
            source.url.clone(),
            source.timeout_secs.map(Duration::from_secs),
        )
    }
}

impl Transport for HttpTransport {
    fn fetch(&self) -> Result<String, LoadError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| LoadError::network(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::network(&self.url, format!("HTTP {status}")));
        }

        response.text().map_err(|e| LoadError::network(&self.url, e))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads a CSV export from disk instead of the network.
pub struct FileTransport {
    path: PathBuf,
}

impl FileTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Transport for FileTransport {
    fn fetch(&self) -> Result<String, LoadError> {
        std::fs::read_to_string(&self.path).map_err(|error| LoadError::Io {
            path: self.path.clone(),
            error,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Owns the per-run record cache. Construct one per run and pass it by
/// reference to everything that needs records.
pub struct Loader<T> {
    transport: T,
    records: OnceCell<RecordSequence>,
}

impl<T: Transport> Loader<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            records: OnceCell::new(),
        }
    }

    /// Records for this run, fetching and parsing on first use.
    pub fn load(&self) -> Result<&RecordSequence, LoadError> {
        self.records.get_or_try_init(|| {
            let origin = self.transport.describe();
            debug!(%origin, "fetching sheet");
            let text = self.transport.fetch().inspect_err(|e| {
                warn!(%origin, error = %e, "sheet fetch failed");
            })?;
            let records = parse::parse(&text);
            info!(
                %origin,
                rows = records.len(),
                columns = records.headers.len(),
                "loaded sheet"
            );
            Ok(records)
        })
    }

    /// Whether a successful fetch has already been memoized.
    pub fn is_loaded(&self) -> bool {
        self.records.get().is_some()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
