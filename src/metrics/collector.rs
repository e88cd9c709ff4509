use std::collections::BTreeMap;
use std::time::Duration;

use tracing::warn;

use super::{EntryMetrics, LatencyHistogram, PartialMetrics};

const TIMEOUT_CODE: &str = "timeout";
const TRANSPORT_CODE: &str = "transport";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    Status(u16),
    Timeout,
    Transport,
}

#[derive(Debug, Clone, Copy)]
pub struct RequestSample {
    pub latency_ms: u64,
    pub outcome: SampleOutcome,
}

/// Folds the request samples of one entry invocation into an `EntryMetrics`.
#[derive(Debug)]
pub struct EntryCollector {
    url: String,
    histogram: Option<LatencyHistogram>,
    total_requests: u64,
    total_errors: u64,
    latency_sum_ms: u128,
    min_latency_ms: Option<u64>,
    max_latency_ms: u64,
    error_codes: BTreeMap<String, u64>,
    last_status: Option<u16>,
    last_elapsed_ms: u64,
}

impl EntryCollector {
    #[must_use]
    pub fn new(url: &str) -> Self {
        let histogram = LatencyHistogram::new()
            .inspect_err(|err| warn!("{}; percentiles disabled for {}", err, url))
            .ok();
        Self {
            url: url.to_owned(),
            histogram,
            total_requests: 0,
            total_errors: 0,
            latency_sum_ms: 0,
            min_latency_ms: None,
            max_latency_ms: 0,
            error_codes: BTreeMap::new(),
            last_status: None,
            last_elapsed_ms: 0,
        }
    }

    pub fn record(&mut self, sample: RequestSample) {
        self.total_requests = self.total_requests.saturating_add(1);
        self.latency_sum_ms = self
            .latency_sum_ms
            .saturating_add(u128::from(sample.latency_ms));
        self.min_latency_ms = Some(
            self.min_latency_ms
                .map_or(sample.latency_ms, |min| min.min(sample.latency_ms)),
        );
        self.max_latency_ms = self.max_latency_ms.max(sample.latency_ms);
        self.last_elapsed_ms = sample.latency_ms;
        if let Some(histogram) = self.histogram.as_mut()
            && let Err(err) = histogram.record(sample.latency_ms)
        {
            warn!("{}", err);
        }

        let error_code = match sample.outcome {
            SampleOutcome::Status(status) => {
                self.last_status = Some(status);
                (status >= 400).then(|| status.to_string())
            }
            SampleOutcome::Timeout => Some(TIMEOUT_CODE.to_owned()),
            SampleOutcome::Transport => Some(TRANSPORT_CODE.to_owned()),
        };
        if let Some(code) = error_code {
            self.total_errors = self.total_errors.saturating_add(1);
            let count = self.error_codes.entry(code).or_insert(0);
            *count = count.saturating_add(1);
        }
    }

    #[must_use]
    pub const fn total_requests(&self) -> u64 {
        self.total_requests
    }

    /// True when requests were attempted and none of them got a response.
    #[must_use]
    pub const fn all_unanswered(&self) -> bool {
        self.total_requests > 0 && self.last_status.is_none()
    }

    #[must_use]
    pub fn finish(self, elapsed: Duration) -> EntryMetrics {
        let total_time_ms = u64::try_from(elapsed.as_millis()).map_or(u64::MAX, |value| value);
        let rps_x100 = rate_x100(self.total_requests, elapsed);
        let mean_latency_ms_x100 = mean_x100(self.latency_sum_ms, self.total_requests);
        EntryMetrics {
            url: self.url,
            total_requests: self.total_requests,
            total_errors: self.total_errors,
            total_time_ms,
            rps_x100,
            mean_latency_ms_x100,
            max_latency_ms: self.max_latency_ms,
            min_latency_ms: self.min_latency_ms.unwrap_or(0),
            percentiles: self
                .histogram
                .as_ref()
                .map(LatencyHistogram::percentiles)
                .unwrap_or_default(),
            error_codes: self.error_codes,
            status_code: self.last_status,
            request_elapsed: self.last_elapsed_ms,
            error: None,
        }
    }

    #[must_use]
    pub fn finish_partial(self, elapsed: Duration) -> PartialMetrics {
        PartialMetrics::from(self.finish(elapsed))
    }
}

fn rate_x100(total: u64, elapsed: Duration) -> u64 {
    if total == 0 {
        return 0;
    }
    let scaled = u128::from(total)
        .saturating_mul(100_000)
        .checked_div(elapsed.as_millis().max(1))
        .unwrap_or(0);
    u64::try_from(scaled).map_or(u64::MAX, |value| value)
}

fn mean_x100(sum_ms: u128, total: u64) -> u64 {
    let scaled = sum_ms
        .saturating_mul(100)
        .checked_div(u128::from(total))
        .unwrap_or(0);
    u64::try_from(scaled).map_or(u64::MAX, |value| value)
}
