use std::collections::BTreeMap;

use serde::Serialize;

/// Metrics for one entry invocation at one concurrency level.
///
/// Fractional values are fixed point: `rps_x100` and `mean_latency_ms_x100`
/// hold hundredths, `total_time_ms` the invocation wall time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetrics {
    pub url: String,
    pub total_requests: u64,
    pub total_errors: u64,
    pub total_time_ms: u64,
    pub rps_x100: u64,
    pub mean_latency_ms_x100: u64,
    pub max_latency_ms: u64,
    pub min_latency_ms: u64,
    pub percentiles: BTreeMap<String, u64>,
    pub error_codes: BTreeMap<String, u64>,
    pub status_code: Option<u16>,
    pub request_elapsed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Whatever a failed invocation still managed to measure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialMetrics {
    pub total_requests: Option<u64>,
    pub total_errors: Option<u64>,
    pub total_time_ms: Option<u64>,
    pub rps_x100: Option<u64>,
    pub mean_latency_ms_x100: Option<u64>,
    pub max_latency_ms: Option<u64>,
    pub min_latency_ms: Option<u64>,
    pub percentiles: Option<BTreeMap<String, u64>>,
    pub error_codes: Option<BTreeMap<String, u64>>,
    pub status_code: Option<u16>,
    pub request_elapsed: Option<u64>,
}

impl EntryMetrics {
    /// Builds the error-shaped record for a failed invocation, keeping every
    /// partial field the runner returned and defaulting the rest.
    #[must_use]
    pub fn from_failure(url: &str, partial: PartialMetrics, message: String) -> Self {
        Self {
            url: url.to_owned(),
            total_requests: partial.total_requests.unwrap_or_default(),
            total_errors: partial.total_errors.unwrap_or_default(),
            total_time_ms: partial.total_time_ms.unwrap_or_default(),
            rps_x100: partial.rps_x100.unwrap_or_default(),
            mean_latency_ms_x100: partial.mean_latency_ms_x100.unwrap_or_default(),
            max_latency_ms: partial.max_latency_ms.unwrap_or_default(),
            min_latency_ms: partial.min_latency_ms.unwrap_or_default(),
            percentiles: partial.percentiles.unwrap_or_default(),
            error_codes: partial.error_codes.unwrap_or_default(),
            status_code: partial.status_code,
            request_elapsed: partial.request_elapsed.unwrap_or_default(),
            error: Some(message),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl From<EntryMetrics> for PartialMetrics {
    fn from(metrics: EntryMetrics) -> Self {
        Self {
            total_requests: Some(metrics.total_requests),
            total_errors: Some(metrics.total_errors),
            total_time_ms: Some(metrics.total_time_ms),
            rps_x100: Some(metrics.rps_x100),
            mean_latency_ms_x100: Some(metrics.mean_latency_ms_x100),
            max_latency_ms: Some(metrics.max_latency_ms),
            min_latency_ms: Some(metrics.min_latency_ms),
            percentiles: Some(metrics.percentiles),
            error_codes: Some(metrics.error_codes),
            status_code: metrics.status_code,
            request_elapsed: Some(metrics.request_elapsed),
        }
    }
}

/// One full traversal of the scenario at a fixed concurrency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
    pub index: usize,
    pub title: String,
    pub users: u64,
    pub last: bool,
    pub entries: Vec<EntryMetrics>,
}

impl PassReport {
    #[must_use]
    pub fn new(index: usize, users: u64) -> Self {
        Self {
            index,
            title: pass_title(users),
            users,
            last: false,
            entries: Vec::new(),
        }
    }
}

fn pass_title(users: u64) -> String {
    if users == 1 {
        "Load report for 1 simultaneous user".to_owned()
    } else {
        format!("Load report for {} simultaneous users", users)
    }
}
