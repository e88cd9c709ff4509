use async_trait::async_trait;
use tracing::debug;

use crate::config::OutputTarget;
use crate::error::ReportError;
use crate::metrics::PassReport;

use super::export::export_report;
use super::render::render_report;

/// Receives every finished pass from the engine.
#[async_trait]
pub trait ReportSink: Send {
    /// # Errors
    ///
    /// Returns a `ReportError` when the final export fails.
    async fn handle_pass(
        &mut self,
        pass: &PassReport,
        last: bool,
        target: &OutputTarget,
    ) -> Result<(), ReportError>;
}

/// Keeps every pass of the run and produces the report once the last one
/// arrives.
#[derive(Debug, Default)]
pub struct ReportAggregator {
    passes: Vec<PassReport>,
    colored: bool,
}

impl ReportAggregator {
    #[must_use]
    pub const fn new(colored: bool) -> Self {
        Self {
            passes: Vec::new(),
            colored,
        }
    }

    pub fn accumulate(&mut self, pass: PassReport) {
        self.passes.push(pass);
    }

    #[must_use]
    pub fn passes(&self) -> &[PassReport] {
        &self.passes
    }

    /// # Errors
    ///
    /// Returns a `ReportError` when rendering or exporting fails.
    pub async fn finalize(&self, target: &OutputTarget) -> Result<(), ReportError> {
        let colored = self.colored && matches!(target, OutputTarget::Terminal);
        let content = if target.is_json() {
            String::new()
        } else {
            render_report(&self.passes, colored)?
        };
        export_report(&content, &self.passes, target).await
    }
}

#[async_trait]
impl ReportSink for ReportAggregator {
    async fn handle_pass(
        &mut self,
        pass: &PassReport,
        last: bool,
        target: &OutputTarget,
    ) -> Result<(), ReportError> {
        debug!(
            "Accumulating pass {} ({} entr(y/ies), last: {})",
            pass.index,
            pass.entries.len(),
            last
        );
        self.accumulate(pass.clone());
        if last {
            self.finalize(target).await?;
        }
        Ok(())
    }
}
