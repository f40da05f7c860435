use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

#[derive(Parser, Debug, Clone)]
#[command(name = "am-budget")]
#[command(about = "Estimate the cost of a multi-part metal 3D printing job")]
#[command(version)]
pub struct CliArgs {
    /// TOML job file with duration, [[parts]] and optional [pricing]
    #[arg(long, short = 'j', value_name = "PATH")]
    pub job: Option<PathBuf>,

    /// Part to price, volumes in mm³ (replaces the job file's parts)
    /// Can specify multiple: --part bracket:1000:200 --part housing:2500.5:120.25
    #[arg(long = "part", short = 'p', value_name = "NAME:VOLUME[:SUPPORT]")]
    pub parts: Vec<String>,

    /// Total print duration, e.g. "2天3小时" or "1天 2小时 30分"
    #[arg(long, short = 'd', value_name = "TEXT")]
    pub duration: Option<String>,

    /// Pricing file overriding the built-in standard (flat TOML table)
    /// Default: ~/.config/am-budget/pricing.toml when it exists
    #[arg(long, value_name = "PATH")]
    pub pricing: Option<PathBuf>,

    /// Ignore the per-user pricing file
    #[arg(long)]
    pub no_user_pricing: bool,

    /// Override one pricing parameter, by name or label (e.g. discount=0.9)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Report width in columns (clamped to the console width)
    #[arg(long, default_value = "60", value_name = "COLUMNS")]
    pub width: usize,

    /// Write a spreadsheet report to this path
    #[arg(long, value_name = "PATH")]
    pub xlsx: Option<PathBuf>,

    /// Write the cost breakdown as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Write the text report to this path
    #[arg(long, value_name = "PATH")]
    pub text: Option<PathBuf>,

    /// Attempts when the spreadsheet destination is in use (default: 3)
    #[arg(long, default_value = "3")]
    pub retries: u32,

    /// Delay between attempts in milliseconds (default: 500)
    #[arg(long, default_value = "500")]
    pub retry_delay_ms: u64,

    /// Do not print the report to the console
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Override detected console width (for testing)
    #[arg(long, value_name = "COLUMNS", hide = true)]
    pub console_width: Option<usize>,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        // Need somewhere to get parts from
        if self.job.is_none() && self.parts.is_empty() {
            return Err("Must specify --job <PATH> or at least one --part NAME:VOLUME[:SUPPORT]".to_string());
        }

        if self.retries == 0 {
            return Err("--retries must be at least 1".to_string());
        }

        // Nothing to show and nowhere to write
        if self.quiet && self.xlsx.is_none() && self.json.is_none() && self.text.is_none() {
            return Err("--quiet needs at least one of --xlsx, --json or --text".to_string());
        }

        Ok(())
    }

    /// Retry policy for the spreadsheet output
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, Duration::from_millis(self.retry_delay_ms))
    }

    /// Should console output be colored?
    pub fn use_colors(&self) -> bool {
        !self.no_color
    }
}
