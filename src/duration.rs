/// Print duration parsing
///
/// Durations are entered as free text such as `2天3小时` or `1天 2小时 30分 45秒`.
/// Each unit is looked up independently; text between the units is ignored.
use log::debug;
use serde::{Deserialize, Serialize};

const DAY: &str = "天";
const HOUR: &str = "小时";
const MINUTE: &str = "分";
const SECOND: &str = "秒";

/// The four counts found in a duration string. Absent units are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationParts {
    pub days: f64,
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl DurationParts {
    /// Extract the first `<digits><unit>` occurrence for each unit
    pub fn parse(text: &str) -> Self {
        DurationParts {
            days: first_count(text, DAY).unwrap_or(0.0),
            hours: first_count(text, HOUR).unwrap_or(0.0),
            minutes: first_count(text, MINUTE).unwrap_or(0.0),
            seconds: first_count(text, SECOND).unwrap_or(0.0),
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.days * 24.0 + self.hours + self.minutes / 60.0 + self.seconds / 3600.0
    }
}

/// Convert a duration expression to fractional hours.
///
/// Never fails: text with none of the recognized units yields `0.0`.
pub fn parse_hours(text: &str) -> f64 {
    let parts = DurationParts::parse(text);
    let hours = parts.total_hours();
    debug!(
        "Parsed duration {:?}: {}d {}h {}m {}s = {} h",
        text, parts.days, parts.hours, parts.minutes, parts.seconds, hours
    );
    hours
}

/// Find the first occurrence of `unit` immediately preceded by decimal digits
fn first_count(text: &str, unit: &str) -> Option<f64> {
    for (idx, _) in text.match_indices(unit) {
        let mut digits: Vec<char> = text[..idx]
            .chars()
            .rev()
            .map_while(decimal_digit)
            .map(|d| char::from(b'0' + d))
            .collect();
        if !digits.is_empty() {
            digits.reverse();
            return digits.into_iter().collect::<String>().parse().ok();
        }
    }
    None
}

/// First code point of every block of ten decimal digits (general category Nd)
const DIGIT_ZEROS: [u32; 68] = [
    0x30, 0x660, 0x6F0, 0x7C0, 0x966, 0x9E6, 0xA66, 0xAE6, 0xB66, 0xBE6, 0xC66, 0xCE6, 0xD66, 0xDE6, 0xE50, 0xED0,
    0xF20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946, 0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620,
    0xA8D0, 0xA900, 0xA9D0, 0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50, 0x11DA0, 0x11F50,
    0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6, 0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950,
    0x1FBF0,
];

/// Value of a decimal digit in any script, e.g. `7`, `７` (fullwidth) or `٧`
fn decimal_digit(c: char) -> Option<u8> {
    let cp = c as u32;
    DIGIT_ZEROS.iter().find(|&&zero| (zero..zero + 10).contains(&cp)).map(|zero| (cp - zero) as u8)
}
