//! Spreadsheet (XLSX) budget report.
//!
//! Produces a single sheet with a merged title row, a merged timestamp row and
//! three labeled sections (input parameters, pricing standard, cost detail).
//! Each row is styled by its `RowStyle`.
//!
//! The destination is opened without truncation and locked exclusively before
//! anything is written, so a file held by another process is reported as
//! `RenderError::FileBusy` and left untouched.

use super::types::{CellValue, RowStyle, Section, cost_section, input_section, pricing_section};
use crate::error::RenderError;
use crate::types::CostBreakdown;
use chrono::{Datelike, NaiveDateTime, Timelike};
use fs2::FileExt;
use log::debug;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub const SHEET_NAME: &str = "预算总览";
pub const SPREADSHEET_TITLE: &str = "金属3D打印预算报告";

/// First row used by the sections (rows 0-1 hold title and timestamp)
const FIRST_SECTION_ROW: u32 = 3;
const DEFAULT_COLUMN_WIDTH: f64 = 25.0;

/// Reusable cell formats, one per row category plus headers
struct ReportFormats {
    title: Format,
    header: Format,
    part_name: Format,
    volume: Format,
    currency: Format,
    numeric: Format,
    plain: Format,
}

impl ReportFormats {
    fn new() -> Self {
        let cell = || Format::new().set_border(FormatBorder::Thin).set_align(FormatAlign::Center);

        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_background_color(0x4F81BD)
                .set_font_color(0xFFFFFF)
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),
            header: cell()
                .set_bold()
                .set_background_color(0x4F81BD)
                .set_font_color(0xFFFFFF)
                .set_align(FormatAlign::VerticalCenter),
            part_name: cell().set_bold().set_background_color(0xD9E1F2).set_align(FormatAlign::VerticalCenter),
            volume: cell().set_background_color(0xFCE4D6).set_align(FormatAlign::VerticalCenter),
            currency: cell()
                .set_num_format("¥##0.00")
                .set_background_color(0xE2EFDA)
                .set_align(FormatAlign::VerticalCenter),
            numeric: cell()
                .set_num_format("0.00")
                .set_background_color(0xFFF2CC)
                .set_align(FormatAlign::VerticalCenter),
            plain: cell().set_background_color(0xFFFFFF).set_align(FormatAlign::VerticalCenter),
        }
    }

    fn for_style(&self, style: RowStyle) -> &Format {
        match style {
            RowStyle::PartName => &self.part_name,
            RowStyle::VolumeDetail => &self.volume,
            RowStyle::Currency => &self.currency,
            RowStyle::Numeric => &self.numeric,
            RowStyle::Plain => &self.plain,
        }
    }
}

/// Spreadsheet report renderer
#[derive(Clone, Debug)]
pub struct SpreadsheetReport {
    /// Time shown in the timestamp row and stored as the document creation time
    pub generated_at: NaiveDateTime,
    /// Width of the label and value columns
    pub column_width: f64,
}

impl SpreadsheetReport {
    pub fn new(generated_at: NaiveDateTime) -> Self {
        Self { generated_at, column_width: DEFAULT_COLUMN_WIDTH }
    }

    /// Report stamped with the current local time
    pub fn now() -> Self {
        Self::new(chrono::Local::now().naive_local())
    }

    pub fn column_width(mut self, width: f64) -> Self {
        self.column_width = width;
        self
    }

    /// The three report sections, in order
    pub fn sections(breakdown: &CostBreakdown) -> [Section; 3] {
        [input_section(breakdown), pricing_section(breakdown), cost_section(breakdown)]
    }

    /// Assemble the workbook in memory
    pub fn render_to_buffer(&self, breakdown: &CostBreakdown) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let created = ExcelDateTime::from_ymd(
            self.generated_at.year() as u16,
            self.generated_at.month() as u8,
            self.generated_at.day() as u8,
        )?
        .and_hms(
            self.generated_at.hour() as u16,
            self.generated_at.minute() as u8,
            self.generated_at.second(),
        )?;
        workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

        let formats = ReportFormats::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        sheet.merge_range(0, 0, 0, 1, SPREADSHEET_TITLE, &formats.title)?;
        let stamp = format!("生成时间：{}", self.generated_at.format("%Y-%m-%d %H:%M"));
        sheet.merge_range(1, 0, 1, 1, &stamp, &formats.plain)?;

        let mut row = FIRST_SECTION_ROW;
        for section in Self::sections(breakdown) {
            row = write_section(sheet, &formats, &section, row)?;
        }

        sheet.set_column_width(0, self.column_width)?;
        sheet.set_column_width(1, self.column_width)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// Render and write to `path`.
    ///
    /// Returns `FileBusy` when another process holds the file; the file is not
    /// modified in that case and the call can be repeated as is.
    pub fn render(&self, breakdown: &CostBreakdown, path: &Path) -> Result<(), RenderError> {
        let buffer = self.render_to_buffer(breakdown)?;
        debug!("Writing {} byte spreadsheet to {:?}", buffer.len(), path);
        write_exclusive(path, &buffer)
    }
}

/// Write a merged section header and its rows; returns the next section's start row
fn write_section(
    sheet: &mut Worksheet,
    formats: &ReportFormats,
    section: &Section,
    start_row: u32,
) -> Result<u32, RenderError> {
    sheet.merge_range(start_row, 0, start_row, 1, &section.title, &formats.header)?;

    for (offset, row) in section.rows.iter().enumerate() {
        let row_idx = start_row + 1 + offset as u32;
        let format = formats.for_style(row.style);
        sheet.write_with_format(row_idx, 0, row.label.as_str(), format)?;
        match &row.value {
            CellValue::Text(text) => sheet.write_with_format(row_idx, 1, text.as_str(), format)?,
            CellValue::Number(n) => sheet.write_with_format(row_idx, 1, *n, format)?,
        };
    }

    Ok(start_row + section.rows.len() as u32 + 2)
}

/// Replace the contents of `path` while holding an exclusive lock on it
pub fn write_exclusive(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| classify_io_error(path, e))?;

    file.try_lock_exclusive().map_err(|e| classify_io_error(path, e))?;

    file.set_len(0)?;
    let mut writer = BufWriter::new(&file);
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

fn classify_io_error(path: &Path, e: io::Error) -> RenderError {
    if e.kind() == fs2::lock_contended_error().kind() || is_sharing_violation(&e) {
        RenderError::FileBusy(path.to_path_buf())
    } else {
        RenderError::Io(e)
    }
}

/// Windows reports a file held open by another program as a sharing or lock violation
#[cfg(windows)]
fn is_sharing_violation(e: &io::Error) -> bool {
    matches!(e.raw_os_error(), Some(32) | Some(33)) || e.kind() == io::ErrorKind::PermissionDenied
}

#[cfg(not(windows))]
fn is_sharing_violation(_e: &io::Error) -> bool {
    false
}

#[cfg(test)]
#[path = "spreadsheet_test.rs"]
mod spreadsheet_test;
