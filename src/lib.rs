//! Cost estimation for multi-part metal 3D printing jobs.
//!
//! A job is a list of parts (printed and support volume in mm³), a free-text
//! print duration such as `"2天3小时"`, and a pricing standard. The [`cost`]
//! module turns those into a rounded [`types::CostBreakdown`]; the [`report`]
//! module renders it as a fixed-width terminal report or an XLSX workbook.

pub mod cli;
pub mod config;
pub mod console_format;
pub mod cost;
pub mod duration;
pub mod error;
pub mod report;
pub mod retry;
pub mod types;
pub mod ui;

pub use cost::{compute, compute_from_entries, evaluate};
pub use duration::parse_hours;
pub use error::{BudgetError, EmptyInput, RenderError};
pub use types::{CostBreakdown, CostDetail, Part, PricingKey, PricingStandard};
