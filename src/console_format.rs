/// Console formatting module - Pure rendering concerns
///
/// This module handles the low-level pieces of monospace output:
/// - Display width of East-Asian text
/// - Width-aware centering and character-count padding
/// - Money and number formatting
/// - Console width detection
/// - Color terminal output
///
/// It knows nothing about cost breakdowns; the report module builds on it.
///
/// ## Output Flexibility
///
/// `ReportWriter` writes to any `std::io::Write` destination, so the same
/// lines can go to the console (optionally colored), a file, or a buffer.

use std::io::{self, Write};
use std::sync::OnceLock;
use term::color::Color;
use terminal_size::{Width, terminal_size};
use unicode_width::UnicodeWidthChar;

/// Writer for report lines - configurable for color/plain text
pub struct ReportWriter<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Write one line without color
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", text)
    }

    /// Write one line in bold color when enabled.
    ///
    /// The escape sequence goes to the same destination as the text, so a
    /// colored report can be captured in a buffer or file intact.
    pub fn write_line_colored(&mut self, text: &str, color: Color) -> io::Result<()> {
        if self.use_colors {
            writeln!(self.writer, "\x1b[1;{}m{}\x1b[0m", ansi_foreground(color), text)
        } else {
            self.write_line(text)
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// SGR foreground code for one of the 16 terminal colors
fn ansi_foreground(color: Color) -> u32 {
    if color < 8 { 30 + color } else { 90 + (color - 8) % 8 }
}

//
// Console Width
//

/// Fallback when the terminal size cannot be detected
const DEFAULT_CONSOLE_WIDTH: usize = 120;

static CONSOLE_WIDTH_OVERRIDE: OnceLock<usize> = OnceLock::new();

/// Force a console width (for testing or non-interactive output)
pub fn set_console_width(width: usize) {
    let _ = CONSOLE_WIDTH_OVERRIDE.set(width); // Ignore error if already set
}

/// Current console width: override, detected terminal width, or 120
pub fn console_width() -> usize {
    if let Some(width) = CONSOLE_WIDTH_OVERRIDE.get() {
        return *width;
    }
    if let Some((Width(w), _)) = terminal_size() { w as usize } else { DEFAULT_CONSOLE_WIDTH }
}

/// Clamp a requested report width so it fits on the console
pub fn fit_to_console(requested: usize) -> usize {
    requested.min(console_width())
}

//
// Text Width and Alignment
//

/// Wide (East Asian Width W) combining marks, which `unicode-width` renders as zero columns
const WIDE_COMBINING: [(char, char); 3] = [('\u{302A}', '\u{302D}'), ('\u{3099}', '\u{309A}'), ('\u{16FE4}', '\u{16FE4}')];

/// Fullwidth or Wide by East Asian Width
fn is_east_asian_wide(c: char) -> bool {
    UnicodeWidthChar::width(c) == Some(2) || WIDE_COMBINING.iter().any(|&(lo, hi)| (lo..=hi).contains(&c))
}

/// Count the display columns of a string.
///
/// Fullwidth and Wide characters (East Asian Width F/W) take two columns,
/// everything else, including most combining and control characters, takes one.
pub fn display_width(s: &str) -> usize {
    s.chars().map(|c| if is_east_asian_wide(c) { 2 } else { 1 }).sum()
}

/// Center text by display width, padding both sides equally.
///
/// When the free space is odd the extra column is dropped, so the result
/// can be one column narrower than `total_width`.
pub fn center_text(text: &str, total_width: usize) -> String {
    let padding = total_width.saturating_sub(display_width(text)) / 2;
    format!("{}{}{}", " ".repeat(padding), text, " ".repeat(padding))
}

/// Left-justify to a character count (not display width)
pub fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Right-justify to a character count (not display width)
pub fn pad_left(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", " ".repeat(width.saturating_sub(len)), text)
}

//
// Number Formatting
//

/// Format with thousands separators and a fixed number of decimals
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value.is_sign_negative() && formatted.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Currency cell: yuan sign followed by a 10-wide, right-aligned amount
pub fn format_money(value: f64) -> String {
    format!("¥{:>10}", format_thousands(value, 2))
}

/// Shortest round-trip form, always with a decimal point (`1.0`, `0.85`)
pub fn format_number(value: f64) -> String {
    format!("{:?}", value)
}

#[cfg(test)]
#[path = "console_format_test.rs"]
mod console_format_test;
