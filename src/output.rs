//! Rendering fetched records for the terminal or a file.

use crate::error::CliError;
use serde::Deserialize;
use sheetrow_core::store::render_csv;
use sheetrow_core::{CellRef, Header, Record};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    #[default]
    Markdown,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(CliError::UnknownFormat(s.to_string())),
        }
    }
}

/// Labeled columns only; unlabeled columns never appear in records.
fn labeled(header: &Header) -> Vec<&str> {
    header
        .labels()
        .iter()
        .map(String::as_str)
        .filter(|label| !label.is_empty())
        .collect()
}

pub(crate) fn render_records(format: OutputFormat, header: &Header, records: &[&Record]) -> String {
    match format {
        OutputFormat::Markdown => render_markdown(header, records),
        OutputFormat::Csv => {
            let labels = labeled(header);
            let mut rows: Vec<Vec<String>> =
                vec![labels.iter().map(|label| label.to_string()).collect()];
            rows.extend(records.iter().map(|record| {
                labels
                    .iter()
                    .map(|label| record.get(label).unwrap_or_default().to_string())
                    .collect()
            }));
            render_csv(&rows)
        }
    }
}

fn render_markdown(header: &Header, records: &[&Record]) -> String {
    let labels = labeled(header);
    let mut out = String::new();

    out.push('|');
    for label in &labels {
        out.push_str(&format!(" {} |", escape_markdown(label)));
    }
    out.push('\n');

    out.push('|');
    for _ in &labels {
        out.push_str("---|");
    }
    out.push('\n');

    for record in records {
        out.push('|');
        for label in &labels {
            let value = record.get(label).unwrap_or_default();
            out.push_str(&format!(" {} |", escape_markdown(value)));
        }
        out.push('\n');
    }
    out
}

/// One line per column: letter, then label (blank labels print as `-`).
pub(crate) fn render_header(header: &Header) -> String {
    let mut out = String::new();
    for (col, label) in header.columns() {
        let label = if label.is_empty() { "-" } else { label };
        out.push_str(&format!("{}\t{}\n", CellRef::col_to_letters(col), label));
    }
    out
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}
