use std::io::{BufRead, IsTerminal, Write};

use tracing::debug;

use crate::config::RunConfig;
use crate::error::{AppError, AppResult, ReportError, ValidationError};
use crate::report::table::Table;

const PROMPT: &str = "Really want to start load process? [y/N] ";

pub(crate) fn summary_rows(config: &RunConfig) -> Vec<(&'static str, String)> {
    let users = if config.progressive {
        format!("{} -> {}", config.users, config.user_limit)
    } else {
        config.users.to_string()
    };
    let token = config.token.as_ref().map_or_else(
        || "Disabled".to_owned(),
        |token| {
            format!(
                "{} on urls containing '{}'",
                token.header_name, token.url_substring
            )
        },
    );
    vec![
        ("Scenario path", config.scenario.display().to_string()),
        ("Verbosity mode", enabled(config.verbose).to_owned()),
        ("Simultaneous users", users),
        ("Request wait delay", format!("{} Ms", config.wait.as_millis())),
        ("Request timeout", format!("{} Ms", config.timeout.as_millis())),
        (
            "Request per second",
            config
                .requests_per_second
                .map_or_else(|| "Unlimited".to_owned(), |rps| rps.to_string()),
        ),
        ("Report output", config.output.to_string()),
        ("Progressive mode", enabled(config.progressive).to_owned()),
        (
            "Insecure mode",
            if config.insecure { "Yes" } else { "No" }.to_owned(),
        ),
        ("Token injection", token),
    ]
}

pub(crate) fn summary_table(config: &RunConfig, colored: bool) -> AppResult<String> {
    let mut table = Table::new(["Parameters", "Value"]);
    for (name, value) in summary_rows(config) {
        table.push_row(vec![name.to_owned(), value]);
    }
    table
        .render(colored)
        .map_err(|source| AppError::report(ReportError::Format { source }))
}

/// Asks for confirmation on an interactive terminal. `--yes` and a
/// non-interactive stdin skip the question.
pub(crate) fn confirm_start(yes: bool) -> AppResult<bool> {
    if yes {
        return Ok(true);
    }
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        debug!("stdin is not a terminal; starting without confirmation");
        return Ok(true);
    }
    let mut stdout = std::io::stdout();
    ask(&mut stdin.lock(), &mut stdout)
        .map_err(|source| AppError::validation(ValidationError::ConfirmationRead { source }))
}

pub(crate) fn ask<R, W>(reader: &mut R, writer: &mut W) -> std::io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    writer.write_all(PROMPT.as_bytes())?;
    writer.flush()?;
    let mut answer = String::new();
    reader.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

const fn enabled(flag: bool) -> &'static str {
    if flag { "Enabled" } else { "Disabled" }
}
