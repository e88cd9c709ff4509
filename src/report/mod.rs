//! Accumulates pass reports and renders or exports them at the end of a run.
mod aggregator;
mod export;
mod format;
mod render;
pub(crate) mod table;


pub use aggregator::{ReportAggregator, ReportSink};
pub use export::export_report;
pub use format::strip_ansi;
pub use render::render_report;
