//! Report export functions for JSON and plain text.
//!
//! The JSON export carries the full breakdown for further processing; the
//! text export stores an already rendered terminal report.

use crate::types::CostBreakdown;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export a cost breakdown as pretty-printed JSON.
///
/// # Arguments
/// * `breakdown` - The breakdown to export
/// * `output_path` - Path to write the JSON file
/// * `generated_at` - Timestamp recorded in the report
pub fn export_json_report(
    breakdown: &CostBreakdown,
    output_path: &Path,
    generated_at: chrono::NaiveDateTime,
) -> std::io::Result<()> {
    use serde_json::json;

    let report = json!({
        "generated_at": generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        "input": breakdown.input,
        "pricing": breakdown.pricing,
        "detail": breakdown.detail,
    });

    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, &report)?;

    Ok(())
}

/// Write a rendered text report, with a trailing newline
pub fn export_text_report(report: &str, output_path: &Path) -> std::io::Result<()> {
    let mut file = File::create(output_path)?;
    writeln!(file, "{}", report)?;
    Ok(())
}
