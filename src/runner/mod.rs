//! The load runner port and its HTTP implementation.
//!
//! The engine hands one entry at a time to a [`LoadRunner`] and waits for the
//! resulting metrics. Concurrency only exists inside a single invocation.
mod execution;
mod http;
mod limits;
mod request;


use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::metrics::{EntryMetrics, PartialMetrics};
use crate::scenario::{Entry, HttpMethod, QueryParam};

pub use http::HttpLoadRunner;

/// The request submitted for one entry, after token injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub query_string: Vec<QueryParam>,
    pub body: Option<String>,
}

impl From<&Entry> for LoadRequest {
    fn from(entry: &Entry) -> Self {
        Self {
            method: entry.method,
            url: entry.url.clone(),
            headers: entry.headers.clone(),
            query_string: entry.query_string.clone(),
            body: entry.body.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadParams {
    pub concurrency: u64,
    pub max_requests: u64,
    pub timeout: Duration,
    pub requests_per_second: Option<u64>,
    pub insecure: bool,
}

/// A failed invocation. Carries whatever metrics were gathered before failing.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LoadFailure {
    pub message: String,
    pub partial: PartialMetrics,
}

impl LoadFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            partial: PartialMetrics::default(),
        }
    }

    #[must_use]
    pub fn with_partial(message: impl Into<String>, partial: PartialMetrics) -> Self {
        Self {
            message: message.into(),
            partial,
        }
    }
}

#[async_trait]
pub trait LoadRunner: Send + Sync {
    /// Runs the load for one entry and waits until every request finished.
    ///
    /// # Errors
    ///
    /// Returns a `LoadFailure` when the entry could not be exercised; the
    /// engine records it in place of the metrics.
    async fn run(
        &self,
        request: &LoadRequest,
        params: &LoadParams,
    ) -> Result<EntryMetrics, LoadFailure>;
}
