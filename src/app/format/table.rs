//! Aligned text tables.

use crate::domain::AppError;

const COLUMN_SEPARATOR: &str = "  ";
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

pub use Alignment::{Left as L, Right as R};

/// Column-aligned table rendered as plain text.
///
/// Alignment is honored only when its length equals the header length.
/// A max length truncates every cell wider than it, but only in columns
/// whose natural width exceeds it.
#[derive(Debug, Clone, Default)]
pub struct FormattedTable {
    header: Vec<String>,
    alignment: Vec<Alignment>,
    rows: Vec<Vec<String>>,
    max_length: Option<usize>,
}

impl FormattedTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alignment(mut self, alignment: &[Alignment]) -> Self {
        self.alignment = alignment.to_vec();
        self
    }

    pub fn with_header(mut self, header: &[&str]) -> Self {
        self.header = header.iter().map(|h| h.to_string()).collect();
        self
    }

    /// Lengths shorter than the ellipsis are raised to its length.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length.max(ELLIPSIS.len()));
        self
    }

    pub fn add_row(&mut self, cells: Vec<String>) -> Result<(), AppError> {
        if cells.len() != self.header.len() {
            return Err(AppError::invalid(format!(
                "table row has {} cells but the header has {}",
                cells.len(),
                self.header.len()
            )));
        }
        self.rows.push(cells);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let columns = self.header.len();
        let mut widths: Vec<usize> = self.header.iter().map(|h| width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(width(cell));
            }
        }

        let mut truncate = vec![false; columns];
        if let Some(max) = self.max_length {
            for (i, w) in widths.iter_mut().enumerate() {
                if *w > max {
                    truncate[i] = true;
                    *w = max;
                }
            }
        }

        let alignment = if self.alignment.len() == columns {
            self.alignment.clone()
        } else {
            vec![Alignment::Left; columns]
        };

        let mut out = String::new();
        for row in std::iter::once(&self.header).chain(&self.rows) {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let cell = match self.max_length {
                        Some(max) if truncate[i] => truncate_cell(cell, max),
                        _ => cell.clone(),
                    };
                    match alignment[i] {
                        Alignment::Left => format!("{cell:<w$}", w = widths[i]),
                        Alignment::Right => format!("{cell:>w$}", w = widths[i]),
                    }
                })
                .collect();
            out.push_str(&line.join(COLUMN_SEPARATOR));
            out.push('\n');
        }
        out
    }
}

fn width(value: &str) -> usize {
    value.chars().count()
}

fn truncate_cell(cell: &str, max: usize) -> String {
    if width(cell) <= max {
        return cell.to_string();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = cell.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
