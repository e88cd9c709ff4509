use std::fmt::Write;

use crossterm::style::{Color, Stylize};

/// A box-drawn table whose cells may span several lines.
#[derive(Debug, Clone, Default)]
pub(crate) struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub(crate) fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub(crate) fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub(crate) fn render(&self, colored: bool) -> Result<String, std::fmt::Error> {
        let widths = self.column_widths();
        let mut out = String::new();
        out.push_str(&border(&widths, '┌', '┬', '┐'));
        write_row(&mut out, &self.headers, &widths, colored.then_some(Color::Cyan))?;
        out.push_str(&border(&widths, '├', '┼', '┤'));
        for (idx, row) in self.rows.iter().enumerate() {
            if idx > 0 {
                out.push_str(&border(&widths, '├', '┼', '┤'));
            }
            write_row(&mut out, row, &widths, None)?;
        }
        out.push_str(&border(&widths, '└', '┴', '┘'));
        Ok(out)
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|header| cell_width(header)).collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                let width = cell_width(cell);
                if let Some(current) = widths.get_mut(idx) {
                    *current = (*current).max(width);
                    continue;
                }
                widths.push(width);
            }
        }
        widths
    }
}

fn cell_width(cell: &str) -> usize {
    cell.lines().map(|line| line.chars().count()).max().unwrap_or(0)
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    for (idx, width) in widths.iter().enumerate() {
        if idx > 0 {
            line.push(mid);
        }
        line.push_str(&"─".repeat(width.saturating_add(2)));
    }
    line.push(right);
    line.push('\n');
    line
}

fn write_row(
    out: &mut String,
    cells: &[String],
    widths: &[usize],
    color: Option<Color>,
) -> std::fmt::Result {
    let height = cells
        .iter()
        .map(|cell| cell.lines().count())
        .max()
        .unwrap_or(0)
        .max(1);
    for line_idx in 0..height {
        out.push('│');
        for (col, width) in widths.iter().enumerate() {
            let text = cells
                .get(col)
                .and_then(|cell| cell.lines().nth(line_idx))
                .unwrap_or_default();
            let padding = width.saturating_sub(text.chars().count());
            match color {
                Some(color) => write!(out, " {}{} │", text.with(color), " ".repeat(padding))?,
                None => write!(out, " {}{} │", text, " ".repeat(padding))?,
            }
        }
        out.push('\n');
    }
    Ok(())
}
