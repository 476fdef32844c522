//! Terminal output helpers shared by both CLI modes

use anyhow::Result;
use console::{measure_text_width, pad_str, style, truncate_str, Alignment};
use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::types::records::SearchRecord;
use crate::types::table::Table;

/// Widest a rendered cell may get before it is truncated.
const MAX_CELL_WIDTH: usize = 48;

/// Output context passed to every command
#[derive(Debug, Clone, Copy, Default)]
pub struct Ui {
    pub quiet: bool,
}

impl Ui {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn theme(&self) -> ColorfulTheme {
        ColorfulTheme::default()
    }

    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.quiet {
            return Ok(default);
        }
        Ok(Confirm::with_theme(&self.theme())
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    pub fn print_header(&self, msg: &str) {
        if !self.quiet {
            println!();
            println!("{}", style(msg).bold());
        }
    }

    pub fn print_success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).green());
        }
    }

    /// Warnings are shown even in quiet mode.
    pub fn print_warning(&self, msg: &str) {
        eprintln!("{}", style(msg).yellow());
    }

    pub fn print_error(&self, msg: &str) {
        eprintln!("{}", style(msg).red().bold());
    }

    pub fn print_info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).cyan());
        }
    }

    pub fn print_table(&self, table: &Table) {
        if !self.quiet {
            println!("{}", render_table(table));
        }
    }
}

/// Fixed-width text rendering with a rule under the header.
pub fn render_table(table: &Table) -> String {
    let cells = |row: &[String]| -> Vec<String> { row.iter().map(|c| flatten(c)).collect() };

    let header = cells(table.headers());
    let rows: Vec<Vec<String>> = table.rows().iter().map(|r| cells(r.as_slice())).collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            rows.iter()
                .map(|r| measure_text_width(&r[i]))
                .chain(std::iter::once(measure_text_width(&header[i])))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let line = |row: &[String]| -> String {
        row.iter()
            .zip(&widths)
            .map(|(cell, width)| {
                pad_str(&truncate_str(cell, *width, "…"), *width, Alignment::Left, None)
                    .into_owned()
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![
        style(line(&header[..])).bold().to_string(),
        widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    ];
    out.extend(rows.iter().map(|r| line(r.as_slice())));
    out.join("\n")
}

/// One line per searched entity: hit count and the top result's title.
pub fn search_summary(records: &[SearchRecord]) -> Table {
    let headers = ["entity", "results", "top_result"].map(String::from).to_vec();
    let rows = records
        .iter()
        .map(|record| {
            vec![
                record.entity.clone(),
                record.results.len().to_string(),
                record
                    .results
                    .first()
                    .map(|hit| hit.title.clone())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    Table::new(headers, rows).unwrap_or_default()
}

/// Collapse line breaks so each record stays on one line.
fn flatten(cell: &str) -> String {
    cell.split_whitespace().collect::<Vec<_>>().join(" ")
}
