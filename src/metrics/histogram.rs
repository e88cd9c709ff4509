use std::collections::BTreeMap;

use hdrhistogram::Histogram;

/// Percentiles reported for every entry, in ascending order.
pub const REPORTED_PERCENTILES: [u8; 4] = [50, 90, 95, 99];

#[derive(Debug)]
pub struct LatencyHistogram {
    hist: Histogram<u64>,
}

impl LatencyHistogram {
    /// Create a new latency histogram.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new() -> Result<Self, String> {
        let hist = Histogram::<u64>::new(3)
            .map_err(|err| format!("Failed to create histogram: {}", err))?;
        Ok(Self { hist })
    }

    /// Record a latency value in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be recorded.
    pub fn record(&mut self, latency_ms: u64) -> Result<(), String> {
        let value = latency_ms.max(1);
        self.hist
            .record(value)
            .map_err(|err| format!("Failed to record latency: {}", err))
    }

    /// Reported percentiles keyed by their label (`"50"`, `"90"`, ...).
    #[must_use]
    pub fn percentiles(&self) -> BTreeMap<String, u64> {
        if self.count() == 0 {
            return BTreeMap::new();
        }
        REPORTED_PERCENTILES
            .iter()
            .map(|percentile| {
                (
                    percentile.to_string(),
                    self.hist.value_at_percentile(f64::from(*percentile)),
                )
            })
            .collect()
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }
}
