//! Report generation module - Rendering a cost breakdown for people.
//!
//! This module handles:
//! - Building labeled report sections with explicit row categories
//! - Fixed-width terminal report with East-Asian-aware alignment
//! - Styled spreadsheet report with exclusive-open output
//! - Export to JSON and plain text
//!
//! Low-level width and number formatting lives in the console_format module.
//!
//! # Module Organization
//!
//! - `types` - Row categories, cell values and section builders
//! - `terminal` - Monospace text report
//! - `spreadsheet` - XLSX report
//! - `export` - JSON and text file export

mod export;
mod spreadsheet;
mod terminal;
mod types;

// Re-export types
pub use types::{CellValue, RowStyle, Section, SectionRow, cost_section, input_section, pricing_section};

// Re-export terminal functions
pub use terminal::{
    LedgerWidths, REPORT_TITLE, format_terminal_lines, format_terminal_report, print_terminal_report,
    write_terminal_report,
};

// Re-export spreadsheet renderer
pub use spreadsheet::{SHEET_NAME, SPREADSHEET_TITLE, SpreadsheetReport, write_exclusive};

// Re-export export functions
pub use export::{export_json_report, export_text_report};
