//! Error types for cost calculation and report rendering.
//!
//! Calculation and input problems are `BudgetError`; output problems are
//! `RenderError`. Callers match on `RenderError::FileBusy` to decide whether
//! a retry makes sense.

use crate::types::PricingKey;
use std::fmt;
use std::path::PathBuf;

/// Why a job was rejected before calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyInput {
    NoParts,
    NoDuration,
}

impl fmt::Display for EmptyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyInput::NoParts => write!(f, "no parts supplied"),
            EmptyInput::NoDuration => write!(f, "print duration is empty"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    #[error("missing pricing parameter: {0}")]
    MissingParameter(PricingKey),

    #[error("invalid value for pricing parameter {key}: {value:?} is not a number")]
    InvalidParameter { key: PricingKey, value: String },

    #[error("unknown pricing parameter: {0:?}")]
    UnknownParameter(String),

    #[error("empty input: {0}")]
    EmptyInput(EmptyInput),

    #[error("invalid part: {0}")]
    InvalidPart(String),

    #[error("failed to load job {}: {message}", path.display())]
    Job { path: PathBuf, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Destination is open or locked by another process
    #[error("file is in use by another process: {}", .0.display())]
    FileBusy(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),
}

impl RenderError {
    /// Only a busy destination is worth retrying with the same arguments
    pub fn is_retriable(&self) -> bool {
        matches!(self, RenderError::FileBusy(_))
    }
}

impl From<rust_xlsxwriter::XlsxError> for RenderError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        RenderError::Spreadsheet(e.to_string())
    }
}
