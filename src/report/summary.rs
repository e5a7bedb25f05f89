//! Console summary table.

use std::fmt::Write as _;

use owo_colors::OwoColorize;

use super::Reporter;
use super::format::{group_thousands, pad, table_title};
use crate::error::Result;
use crate::profile::Grade;
use crate::profiler::ProfileSet;

const TITLE: &str = "Data Quality Profile Summary";
const HEADERS: [&str; 6] = ["Table", "Rows", "Columns", "Null %", "Duplicates", "Quality Score"];
/// Index of the quality score column. Every column after the first is right aligned.
const SCORE_COLUMN: usize = 5;

/// Renders one row per dataset plus the list of failed datasets.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryReporter {
    color: bool,
}

impl SummaryReporter {
    /// Create a reporter; `color` enables ANSI colouring of scores.
    pub const fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint_score(&self, cell: String, score: f64) -> String {
        if !self.color {
            return cell;
        }
        match Grade::from_score(score) {
            Grade::Good => cell.green().to_string(),
            Grade::Fair => cell.yellow().to_string(),
            Grade::Poor => cell.red().to_string(),
        }
    }
}

impl Reporter for SummaryReporter {
    fn render(&self, set: &ProfileSet) -> Result<String> {
        let rows: Vec<([String; 6], f64)> = set
            .profiles
            .iter()
            .map(|p| {
                let score = p.quality_score();
                let cells = [
                    table_title(&p.filename),
                    group_thousands(p.rows),
                    p.columns.to_string(),
                    format!("{:.1}%", p.avg_null_percentage()),
                    group_thousands(p.duplicates.total),
                    format!("{score:.1}%"),
                ];
                (cells, score)
            })
            .collect();

        let mut widths = HEADERS.map(str::len);
        for (cells, _) in &rows {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        let _ = writeln!(out, "{TITLE}");

        let header: Vec<String> = HEADERS
            .iter()
            .enumerate()
            .map(|(i, h)| pad(h, widths[i], i > 0))
            .collect();
        let _ = writeln!(out, "{}", header.join("  ").trim_end());
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let _ = writeln!(out, "{}", rule.join("  "));

        for (cells, score) in rows {
            let line: Vec<String> = cells
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let padded = pad(cell, widths[i], i > 0);
                    if i == SCORE_COLUMN {
                        self.paint_score(padded, score)
                    } else {
                        padded
                    }
                })
                .collect();
            let _ = writeln!(out, "{}", line.join("  "));
        }

        if !set.failures.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Not profiled:");
            for failure in &set.failures {
                let mark = if self.color {
                    "x".red().to_string()
                } else {
                    "x".to_string()
                };
                let _ = writeln!(out, "  {mark} {}: {}", failure.filename, failure.reason);
            }
        }

        Ok(out)
    }
}
