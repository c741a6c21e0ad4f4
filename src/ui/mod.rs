//! Pure formatting for version reports.
//!
//! Rendering is separated from computation so the same rows can go to a
//! terminal, a JSON consumer, or a spreadsheet, and so the output shapes are
//! testable without a repository.

use crate::error::Result;
use serde::Serialize;

/// One row of a version report
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub project: String,
    pub version: String,
    pub changed: bool,
    pub rationale: String,
}

/// Output shape for report rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Render report rows in the requested format
pub fn render_report(rows: &[ReportRow], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(rows)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => Ok(render_csv(rows)),
    }
}

fn render_text(rows: &[ReportRow]) -> String {
    let name_width = rows
        .iter()
        .map(|r| r.project.len())
        .chain(std::iter::once("Project".len()))
        .max()
        .unwrap_or(0);
    let version_width = rows
        .iter()
        .map(|r| r.version.len())
        .chain(std::iter::once("Version".len()))
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "{:<name_width$}  {:<version_width$}  {:<7}  Rationale\n",
        "Project", "Version", "Changed"
    );
    for row in rows {
        out.push_str(&format!(
            "{:<name_width$}  {:<version_width$}  {:<7}  {}\n",
            row.project,
            row.version,
            if row.changed { "yes" } else { "no" },
            row.rationale
        ));
    }
    out
}

fn render_csv(rows: &[ReportRow]) -> String {
    let mut out = String::from("project,version,changed,rationale\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{}\n",
            csv_escape(&row.project),
            csv_escape(&row.version),
            row.changed,
            csv_escape(&row.rationale)
        ));
    }
    out
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}
