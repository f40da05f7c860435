//! Report type definitions for the rendering model.
//!
//! Sections are built from a cost breakdown as labeled rows, each tagged with
//! the category that decides its spreadsheet style. The category is chosen
//! when the row is built, never inferred from the label text.

use crate::console_format::format_number;
use crate::types::{CostBreakdown, PricingKey};
use serde::{Deserialize, Serialize};

/// Row category - picks the cell style in the spreadsheet report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowStyle {
    /// A part's name row
    PartName,
    /// A part's solid or support volume row
    VolumeDetail,
    /// A monetary figure
    Currency,
    /// Any other number
    Numeric,
    /// Text
    Plain,
}

/// Value of a report cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// One labeled row of a report section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRow {
    pub label: String,
    pub value: CellValue,
    pub style: RowStyle,
}

impl SectionRow {
    pub fn new(label: impl Into<String>, value: impl Into<CellValue>, style: RowStyle) -> Self {
        Self { label: label.into(), value: value.into(), style }
    }
}

/// A titled group of rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub rows: Vec<SectionRow>,
}

pub const INPUT_SECTION_TITLE: &str = "输入参数";
pub const PRICING_SECTION_TITLE: &str = "定价标准";
pub const COST_SECTION_TITLE: &str = "费用明细";

/// Input parameters: duration, part count, then name and volumes per part
pub fn input_section(breakdown: &CostBreakdown) -> Section {
    let mut rows = vec![
        SectionRow::new("总打印时长", breakdown.input.duration_text.as_str(), RowStyle::Plain),
        SectionRow::new("零件数量", format!("{}件", breakdown.input.part_count), RowStyle::Plain),
    ];

    for (i, part) in breakdown.input.parts.iter().enumerate() {
        let n = i + 1;
        rows.push(SectionRow::new(format!("零件{}名称", n), part.name.as_str(), RowStyle::PartName));
        rows.push(SectionRow::new(format!("零件{}体积", n), format!("{:.3}mm³", part.volume), RowStyle::VolumeDetail));
        rows.push(SectionRow::new(
            format!("零件{}支撑体积", n),
            format!("{:.3}mm³", part.support_volume),
            RowStyle::VolumeDetail,
        ));
    }

    Section { title: INPUT_SECTION_TITLE.to_string(), rows }
}

/// Pricing standard with unit suffixes
pub fn pricing_section(breakdown: &CostBreakdown) -> Section {
    let rows = breakdown
        .pricing
        .entries()
        .map(|(key, value)| SectionRow::new(key.label(), with_unit(key, value), RowStyle::Plain))
        .collect();

    Section { title: PRICING_SECTION_TITLE.to_string(), rows }
}

/// Monetary figures followed by machine hours and material weight
pub fn cost_section(breakdown: &CostBreakdown) -> Section {
    let d = &breakdown.detail;
    let rows = vec![
        SectionRow::new("材料费用", d.material_cost, RowStyle::Currency),
        SectionRow::new("机时费用", d.machine_cost, RowStyle::Currency),
        SectionRow::new("氩气费用", d.argon_cost, RowStyle::Currency),
        SectionRow::new("后处理费", d.post_processing_cost, RowStyle::Currency),
        SectionRow::new("总费用", d.total_cost, RowStyle::Currency),
        SectionRow::new("实际费用", d.actual_cost, RowStyle::Currency),
        SectionRow::new("打印机时（小时）", d.machine_hours, RowStyle::Numeric),
        SectionRow::new("材料重量（克）", d.material_weight_g, RowStyle::Numeric),
    ];

    Section { title: COST_SECTION_TITLE.to_string(), rows }
}

fn with_unit(key: PricingKey, value: f64) -> String {
    format!("{} {}", format_number(value), key.unit()).trim().to_string()
}
