//! Markdown rendering
//!
//! This module renders record tables as markdown and generates the
//! human-readable run report (statistics, page errors, results preview).

use crate::export::summary::RunSummary;
use crate::export::table::Table;
use crate::export::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Rows shown in the report's results preview
const PREVIEW_ROWS: usize = 20;

/// Renders a full table as a markdown table
pub fn render_markdown_table(table: &Table) -> String {
    render_rows(table, table.row_count())
}

fn render_rows(table: &Table, limit: usize) -> String {
    let mut md = String::new();

    md.push_str(&format_row(table.headers()));
    md.push('|');
    for _ in table.headers() {
        md.push_str("---|");
    }
    md.push('\n');

    for row in table.rows().iter().take(limit) {
        md.push_str(&format_row(row));
    }

    md
}

fn format_row(cells: &[String]) -> String {
    let escaped: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
    format!("| {} |\n", escaped.join(" | "))
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Writes a markdown run report to a file
///
/// # Arguments
///
/// * `summary` - The run summary
/// * `preview` - Records table to preview (first rows only)
/// * `output_path` - Path where the markdown file should be written
pub fn write_run_report(
    summary: &RunSummary,
    preview: Option<&Table>,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_run_report(summary, preview);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run summary as markdown
pub fn format_run_report(summary: &RunSummary, preview: Option<&Table>) -> String {
    let mut md = String::new();

    md.push_str("# Catalog-Sweep Run Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Run**: {}\n", summary.title));
    md.push_str(&format!("- **Status**: {}\n", summary.phase));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        summary.duration_seconds()
    ));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    if let Some(path) = &summary.export_path {
        md.push_str(&format!("- **Export**: {}\n", path.display()));
    }
    md.push('\n');

    // Statistics
    md.push_str("## Statistics\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Planned Pages | {} |\n", summary.total_pages));
    md.push_str(&format!("| Pages Completed | {} |\n", summary.pages_completed));
    md.push_str(&format!("| Pages Succeeded | {} |\n", summary.pages_succeeded()));
    md.push_str(&format!("| Page Errors | {} |\n", summary.errors.len()));
    md.push_str(&format!("| Progress | {:.0}% |\n", summary.percent));
    md.push_str(&format!("| Records | {} |\n\n", summary.record_count));

    // Page errors
    if !summary.errors.is_empty() {
        md.push_str("## Page Errors\n\n");
        for error in &summary.errors {
            md.push_str(&format!("- {}\n", error));
        }
        md.push('\n');
    }

    // Results
    if summary.is_empty() {
        md.push_str("## Results\n\nNo results found.\n");
    } else if let Some(table) = preview {
        md.push_str("## Results Preview\n\n");
        md.push_str(&render_rows(table, PREVIEW_ROWS));
        if table.row_count() > PREVIEW_ROWS {
            md.push_str(&format!(
                "\n... and {} more\n",
                table.row_count() - PREVIEW_ROWS
            ));
        }
    }

    md
}
