use std::collections::BTreeMap;
use std::fmt::Write;

use crossterm::style::{Color, Stylize};

use crate::error::ReportError;
use crate::metrics::{EntryMetrics, PassReport};

use super::table::Table;

const REPORT_TITLE: &str = "HARSTRESS LOAD REPORT";
const HEADER_WIDTH: usize = 100;
const EMPTY_CELL: &str = "-";

const COLUMNS: [&str; 11] = [
    "Total Requests",
    "Total Errors",
    "Total Time (s)",
    "RPS",
    "Mean Latency (ms)",
    "Max Latency (ms)",
    "Min Latency (ms)",
    "Percentiles",
    "Error Codes",
    "Status Code",
    "Elapsed (ms)",
];

/// Renders every accumulated pass, in order, as text tables.
///
/// # Errors
///
/// Returns `ReportError::Format` when writing into the buffer fails.
pub fn render_report(passes: &[PassReport], colored: bool) -> Result<String, ReportError> {
    let mut out = header_block(REPORT_TITLE, colored);
    for pass in passes {
        write_pass(&mut out, pass, colored).map_err(|source| ReportError::Format { source })?;
    }
    Ok(out)
}

pub(crate) fn header_block(title: &str, colored: bool) -> String {
    let title = if colored {
        title.with(Color::Cyan).to_string()
    } else {
        title.to_owned()
    };
    format!(
        "\n {}\n╚{}\n",
        title,
        "═".repeat(HEADER_WIDTH.saturating_sub(1))
    )
}

fn write_pass(out: &mut String, pass: &PassReport, colored: bool) -> std::fmt::Result {
    let marker = if colored {
        ">".with(Color::Green).to_string()
    } else {
        ">".to_owned()
    };
    writeln!(out, "\n{} {}", marker, pass.title)?;
    for entry in &pass.entries {
        writeln!(out, "\n  {}", entry.url)?;
        if let Some(error) = entry.error.as_deref() {
            let label = if colored {
                "error".with(Color::Red).to_string()
            } else {
                "error".to_owned()
            };
            writeln!(out, "  {}: {}", label, error)?;
        }
        let mut table = Table::new(COLUMNS);
        table.push_row(entry_row(entry));
        out.push_str(&table.render(colored)?);
    }
    Ok(())
}

fn entry_row(entry: &EntryMetrics) -> Vec<String> {
    vec![
        entry.total_requests.to_string(),
        entry.total_errors.to_string(),
        format_millis_as_secs(entry.total_time_ms),
        format_x100(entry.rps_x100),
        format_x100(entry.mean_latency_ms_x100),
        entry.max_latency_ms.to_string(),
        entry.min_latency_ms.to_string(),
        map_cell(&entry.percentiles),
        map_cell(&entry.error_codes),
        entry
            .status_code
            .map_or_else(|| EMPTY_CELL.to_owned(), |status| status.to_string()),
        entry.request_elapsed.to_string(),
    ]
}

fn format_x100(value: u64) -> String {
    format!("{}.{:02}", value / 100, value % 100)
}

fn format_millis_as_secs(value: u64) -> String {
    format!("{}.{:03}", value / 1_000, value % 1_000)
}

fn map_cell(values: &BTreeMap<String, u64>) -> String {
    if values.is_empty() {
        return EMPTY_CELL.to_owned();
    }
    values
        .iter()
        .map(|(key, value)| format!("{} : {}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}
