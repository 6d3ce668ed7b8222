//! Export module for turning accumulated records into files
//!
//! This module handles:
//! - Flattening records into a fixed-column table
//! - Rendering tables as CSV or markdown
//! - Naming export files deterministically from the query and date
//! - Generating the markdown run report

mod csv;
mod markdown;
mod summary;
mod table;

pub use self::csv::render_csv;
pub use markdown::{format_run_report, render_markdown_table, write_run_report};
pub use summary::RunSummary;
pub use table::{Table, Tabular};

use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Byte order mark written at the start of CSV files so spreadsheet tools
/// read them as UTF-8
const UTF8_BOM: &str = "\u{FEFF}";

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// File format of an export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Markdown => "md",
        }
    }

    /// Renders the table in this format
    pub fn render(&self, table: &Table) -> String {
        match self {
            Self::Csv => render_csv(table),
            Self::Markdown => render_markdown_table(table),
        }
    }
}

/// Builds the export file name for a run
///
/// Format: `<prefix>_<subject-slug>_<YYYY-MM-DD>.<ext>`
///
/// # Example
///
/// ```
/// use catalog_sweep::export::{export_file_name, ExportFormat};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
/// let name = export_file_name("search", "Fone Bluetooth", date, ExportFormat::Csv);
/// assert_eq!(name, "search_fone-bluetooth_2024-05-17.csv");
/// ```
pub fn export_file_name(
    prefix: &str,
    subject: &str,
    date: NaiveDate,
    format: ExportFormat,
) -> String {
    format!(
        "{}_{}_{}.{}",
        prefix,
        slugify(subject),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Lower-cases and joins alphanumeric runs with single hyphens
fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        "export".to_string()
    } else {
        slug
    }
}

/// Writes a table to `directory/file_name` in the given format
///
/// Creates the directory if needed and returns the full path written.
pub fn write_export(
    table: &Table,
    format: ExportFormat,
    directory: &Path,
    file_name: &str,
) -> OutputResult<PathBuf> {
    if file_name.is_empty() || file_name.contains(['/', '\\']) {
        return Err(OutputError::Write(format!(
            "Invalid export file name '{}'",
            file_name
        )));
    }

    fs::create_dir_all(directory)?;
    let path = directory.join(file_name);

    let mut content = String::new();
    if format == ExportFormat::Csv {
        content.push_str(UTF8_BOM);
    }
    content.push_str(&format.render(table));

    fs::write(&path, content)?;
    tracing::debug!("Wrote {} rows to {}", table.row_count(), path.display());

    Ok(path)
}
