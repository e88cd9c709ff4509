use std::io::{IsTerminal, Write};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tracing::debug;

use crate::metrics::{EntryMetrics, PassReport};
use crate::scenario::{Entry, Page};

/// Observer of engine progress. Calls arrive in execution order.
pub trait ProgressSink: Send {
    fn entry_started(&mut self, page: &Page, entry: &Entry, users: u64);
    fn entry_finished(&mut self, entry_url: &str, metrics: &EntryMetrics);
    fn pass_finished(&mut self, pass: &PassReport);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn entry_started(&mut self, _page: &Page, _entry: &Entry, _users: u64) {}
    fn entry_finished(&mut self, _entry_url: &str, _metrics: &EntryMetrics) {}
    fn pass_finished(&mut self, _pass: &PassReport) {}
}

/// Status line on stderr, drawn only when stderr is a terminal.
#[derive(Debug)]
pub struct ConsoleProgress {
    enabled: bool,
    no_color: bool,
    style: ProgressStyle,
    entries_per_pass: usize,
    done: usize,
}

impl ConsoleProgress {
    #[must_use]
    pub fn new(entries_per_pass: usize, no_color: bool) -> Self {
        Self {
            enabled: std::io::stderr().is_terminal(),
            no_color,
            style: ProgressStyle::new(30),
            entries_per_pass: entries_per_pass.max(1),
            done: 0,
        }
    }

    fn draw(&self, label: &str) {
        if !self.enabled {
            return;
        }
        let line = build_progress_line(
            &self.style,
            self.done,
            self.entries_per_pass,
            label,
            self.no_color,
        );
        if let Err(err) = render_progress_line(&line, self.no_color) {
            debug!("Progress line failed: {}", err);
        }
    }
}

impl ProgressSink for ConsoleProgress {
    fn entry_started(&mut self, page: &Page, entry: &Entry, users: u64) {
        let label = format!(
            "{} | {} user(s) | {} {}",
            page.title, users, entry.method, entry.url
        );
        self.draw(&label);
    }

    fn entry_finished(&mut self, entry_url: &str, _metrics: &EntryMetrics) {
        self.done = self.done.saturating_add(1).min(self.entries_per_pass);
        self.draw(entry_url);
    }

    fn pass_finished(&mut self, pass: &PassReport) {
        self.done = self.entries_per_pass;
        self.draw(&pass.title);
        if self.enabled
            && let Err(err) = finish_progress_line()
        {
            debug!("Progress line failed: {}", err);
        }
        self.done = 0;
    }
}

fn render_progress_line(line: &[ProgressSegment], no_color: bool) -> Result<(), std::io::Error> {
    let mut out = std::io::stderr();
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    for segment in line {
        match segment.color {
            Some(color) if !no_color => queue!(
                out,
                SetForegroundColor(color),
                Print(&segment.text),
                ResetColor
            )?,
            Some(_) | None => queue!(out, Print(&segment.text))?,
        }
    }
    out.flush()?;
    Ok(())
}

fn finish_progress_line() -> Result<(), std::io::Error> {
    let mut out = std::io::stderr();
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

pub(super) fn build_progress_line(
    style: &ProgressStyle,
    current: usize,
    goal: usize,
    label: &str,
    no_color: bool,
) -> Vec<ProgressSegment> {
    let size = style.size.max(1);
    let goal = goal.max(1);
    let current = current.min(goal);

    let complete_size = current
        .saturating_mul(size)
        .checked_div(goal)
        .unwrap_or(0)
        .min(size);
    let incomplete_size = size.saturating_sub(complete_size);

    let progress_bar = format!(
        "{}{}{}{}",
        style.begin,
        style.fill.repeat(complete_size),
        style.empty.repeat(incomplete_size),
        style.end
    );
    let count_text = format!(" {}/{}", current, goal);
    let label_text = format!(" | {}", label);

    if no_color {
        vec![
            ProgressSegment::plain(progress_bar),
            ProgressSegment::plain(count_text),
            ProgressSegment::plain(label_text),
        ]
    } else {
        vec![
            ProgressSegment::plain(progress_bar),
            ProgressSegment::colored(count_text, Color::Cyan),
            ProgressSegment::colored(label_text, Color::Yellow),
        ]
    }
}

#[derive(Debug)]
pub(super) struct ProgressStyle {
    size: usize,
    begin: String,
    end: String,
    fill: String,
    empty: String,
}

impl ProgressStyle {
    pub(super) fn new(size: usize) -> Self {
        Self {
            size,
            begin: "[".to_owned(),
            end: "]".to_owned(),
            fill: "#".to_owned(),
            empty: "-".to_owned(),
        }
    }
}

#[derive(Debug)]
pub(super) struct ProgressSegment {
    pub(super) text: String,
    color: Option<Color>,
}

impl ProgressSegment {
    const fn plain(text: String) -> Self {
        Self { text, color: None }
    }

    const fn colored(text: String, color: Color) -> Self {
        Self {
            text,
            color: Some(color),
        }
    }
}
