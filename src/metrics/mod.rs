//! Per-entry metrics records, pass reports, and latency aggregation.
mod collector;
mod histogram;
mod types;

#[cfg(test)]
mod tests;

pub use collector::{EntryCollector, RequestSample, SampleOutcome};
pub use histogram::LatencyHistogram;
pub use types::{EntryMetrics, PartialMetrics, PassReport};
