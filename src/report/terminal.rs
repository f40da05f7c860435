//! Fixed-width text report for monospace terminals.
//!
//! Layout is computed from a total width: a `=` border, a title centered by
//! display width, parameter and part listings, and a two-column cost ledger
//! with a fixed label column and a right-aligned value column.

use crate::console_format::{self, ReportWriter, center_text, format_money, format_number, pad_left, pad_right};
use crate::types::CostBreakdown;
use std::io;

pub const REPORT_TITLE: &str = " 预算计算结果 ";

/// Label column width, in characters
const LABEL_WIDTH: usize = 20;
/// Columns reserved to the right of the label column that the value column does not use
const LEDGER_MARGIN: usize = 7;

/// Column layout derived from the total report width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerWidths {
    pub total: usize,
    pub label: usize,
    pub value: usize,
}

impl LedgerWidths {
    pub fn new(total_width: usize) -> Self {
        Self {
            total: total_width,
            label: LABEL_WIDTH,
            value: total_width.saturating_sub(LABEL_WIDTH + LEDGER_MARGIN),
        }
    }

    fn border(&self) -> String {
        "=".repeat(self.total)
    }

    fn dash_line(&self) -> String {
        format!("  {}  ", "-".repeat(self.total.saturating_sub(4)))
    }

    fn ledger_line(&self, label: &str, value: &str) -> String {
        format!("{}{}", pad_right(label, self.label), pad_left(value, self.value))
    }
}

/// Render a breakdown as lines of text, without trailing newlines
pub fn format_terminal_lines(breakdown: &CostBreakdown, total_width: usize) -> Vec<String> {
    let w = LedgerWidths::new(total_width);
    let detail = &breakdown.detail;
    let border = w.border();
    let dash_line = w.dash_line();

    let mut lines = vec![
        border.clone(),
        center_text(REPORT_TITLE, total_width),
        border.clone(),
        "[打印参数]".to_string(),
        format!("  零件数量：{}件", breakdown.input.part_count),
        format!("  打印时长：{}", breakdown.input.duration_text),
        String::new(),
        "[零件清单]".to_string(),
    ];

    if breakdown.input.parts.is_empty() {
        lines.push(String::new());
    }
    for (i, part) in breakdown.input.parts.iter().enumerate() {
        lines.push(format!("  零件{}: {}（总体积：{:.3}mm³）", i + 1, part.name, part.total_volume()));
    }

    lines.push(String::new());
    lines.push("[费用明细]".to_string());
    lines.push(format!(
        "{}{}",
        pad_right("  项目名称", w.label),
        pad_left("金额", w.value.saturating_sub(1))
    ));
    lines.push(dash_line.clone());
    lines.push(w.ledger_line("  材料成本：", &format_money(detail.material_cost)));
    lines.push(w.ledger_line("  机时费用：", &format_money(detail.machine_cost)));
    lines.push(w.ledger_line("  氩气消耗：", &format_money(detail.argon_cost)));
    lines.push(w.ledger_line("  后处理费：", &format_money(detail.post_processing_cost)));
    lines.push(dash_line);
    lines.push(w.ledger_line("  合计金额：", &format_money(detail.total_cost)));
    lines.push(w.ledger_line("  折扣优惠：", &format_number(breakdown.pricing.discount)));
    lines.push(w.ledger_line("  实付金额：", &format_money(detail.actual_cost)));
    lines.push(border);

    lines
}

/// Render a breakdown as a single text block
pub fn format_terminal_report(breakdown: &CostBreakdown, total_width: usize) -> String {
    format_terminal_lines(breakdown, total_width).join("\n")
}

/// Write the report through a `ReportWriter`, highlighting the amount due
pub fn write_terminal_report<W: io::Write>(
    writer: &mut ReportWriter<W>,
    breakdown: &CostBreakdown,
    total_width: usize,
) -> io::Result<()> {
    let lines = format_terminal_lines(breakdown, total_width);
    let due_line = lines.len().saturating_sub(2);
    for (i, line) in lines.iter().enumerate() {
        if i == due_line {
            writer.write_line_colored(line, term::color::BRIGHT_GREEN)?;
        } else {
            writer.write_line(line)?;
        }
    }
    writer.flush()
}

/// Print the report to stdout, fitted to the console width
pub fn print_terminal_report(breakdown: &CostBreakdown, requested_width: usize, use_colors: bool) -> io::Result<()> {
    let width = console_format::fit_to_console(requested_width);
    let mut writer = ReportWriter::new(io::stdout().lock(), use_colors);
    write_terminal_report(&mut writer, breakdown, width)
}
