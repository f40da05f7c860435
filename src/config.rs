/// Configuration resolution module
///
/// This module handles:
/// - Loading job files (parts, duration, pricing overrides)
/// - Resolving the pricing standard from defaults, files and `--set` flags
/// - Parsing part and override arguments
/// - Rejecting empty jobs before any calculation
use crate::cli::CliArgs;
use crate::error::{BudgetError, EmptyInput};
use crate::types::{Part, PricingStandard};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A job as written in a TOML file
///
/// ```toml
/// duration = "2天3小时"
///
/// [[parts]]
/// name = "bracket"
/// volume = 1000.0
/// support_volume = 200.0
///
/// [pricing]
/// discount = 0.9
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFile {
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub pricing: Option<toml::Table>,
}

/// A fully resolved job, ready for the cost model
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetJob {
    pub parts: Vec<Part>,
    pub duration_text: String,
    pub pricing: PricingStandard,
}

/// Built-in pricing standard used when nothing overrides it
pub fn default_pricing() -> PricingStandard {
    PricingStandard {
        density: 4.5,
        packing_coefficient: 0.9995,
        usage_ratio: 1.5,
        material_price: 1800.0,
        machine_rate: 250.0,
        argon_price: 1800.0,
        argon_rate: 27.5,
        post_processing_fee: 1500.0,
        discount: 1.0,
    }
}

/// Per-user pricing file:
/// - Linux: ~/.config/am-budget/pricing.toml
/// - macOS: ~/Library/Application Support/am-budget/pricing.toml
/// - Windows: %APPDATA%/am-budget/pricing.toml
pub fn user_pricing_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("am-budget").join("pricing.toml"))
}

/// Build a complete BudgetJob from CLI arguments
///
/// Later sources win: defaults, pricing file, job file `[pricing]`, `--set`.
/// Parts and duration on the command line replace those from the job file.
pub fn build_job(args: &CliArgs) -> Result<BudgetJob, BudgetError> {
    debug!("Building job from CLI args");

    let job_file = match &args.job {
        Some(path) => load_job_file(path)?,
        None => JobFile::default(),
    };

    let parts = if args.parts.is_empty() {
        job_file.parts.clone()
    } else {
        args.parts.iter().map(|s| parse_part_arg(s)).collect::<Result<Vec<_>, _>>()?
    };
    debug!("Resolved {} parts", parts.len());

    let duration_text = args.duration.clone().or(job_file.duration.clone()).unwrap_or_default();
    debug!("Duration text: {:?}", duration_text);

    let pricing = resolve_pricing(args, &job_file)?;
    debug!("Pricing standard: {:?}", pricing);

    validate_job(&parts, &duration_text)?;

    Ok(BudgetJob { parts, duration_text, pricing })
}

/// Resolve the pricing standard for a job
pub fn resolve_pricing(args: &CliArgs, job_file: &JobFile) -> Result<PricingStandard, BudgetError> {
    let mut pricing = default_pricing();

    let pricing_file = match &args.pricing {
        Some(path) => Some(path.clone()),
        None if args.no_user_pricing => None,
        None => user_pricing_path().filter(|p| p.exists()),
    };
    if let Some(path) = pricing_file {
        debug!("Applying pricing file {:?}", path);
        pricing = pricing.with_table_overrides(&load_pricing_file(&path)?)?;
    }

    if let Some(ref table) = job_file.pricing {
        debug!("Applying job pricing overrides ({} keys)", table.len());
        pricing = pricing.with_table_overrides(table)?;
    }

    if !args.set.is_empty() {
        let overrides = args.set.iter().map(|s| parse_set_arg(s)).collect::<Result<Vec<_>, _>>()?;
        pricing = pricing.with_overrides(overrides)?;
    }

    Ok(pricing)
}

/// Reject jobs the cost model would silently price as zero
pub fn validate_job(parts: &[Part], duration_text: &str) -> Result<(), BudgetError> {
    if parts.is_empty() {
        return Err(BudgetError::EmptyInput(EmptyInput::NoParts));
    }
    if duration_text.trim().is_empty() {
        return Err(BudgetError::EmptyInput(EmptyInput::NoDuration));
    }
    Ok(())
}

/// Read and parse a TOML job file
pub fn load_job_file(path: &Path) -> Result<JobFile, BudgetError> {
    debug!("Loading job file {:?}", path);
    let content = read_file(path)?;
    toml::from_str(&content).map_err(|e| BudgetError::Job { path: path.to_path_buf(), message: e.to_string() })
}

/// Read a pricing file: a flat TOML table of pricing entries
pub fn load_pricing_file(path: &Path) -> Result<toml::Table, BudgetError> {
    let content = read_file(path)?;
    content.parse::<toml::Table>().map_err(|e| BudgetError::Job { path: path.to_path_buf(), message: e.to_string() })
}

fn read_file(path: &Path) -> Result<String, BudgetError> {
    fs::read_to_string(path).map_err(|e| BudgetError::Job { path: path.to_path_buf(), message: e.to_string() })
}

/// Parse `NAME:VOLUME[:SUPPORT]`. The name may itself contain colons.
pub fn parse_part_arg(arg: &str) -> Result<Part, BudgetError> {
    let segments: Vec<&str> = arg.split(':').collect();
    let number = |s: &str| s.trim().parse::<f64>().ok();

    let (name, volume, support_volume) = match segments.as_slice() {
        [head @ .., v, s] if !head.is_empty() && number(*v).is_some() && number(*s).is_some() => {
            (head.join(":"), number(*v), number(*s))
        }
        [head @ .., v] if !head.is_empty() && number(*v).is_some() => (head.join(":"), number(*v), Some(0.0)),
        _ => (String::new(), None, None),
    };

    match (volume, support_volume) {
        (Some(volume), Some(support_volume)) if !name.trim().is_empty() => {
            Ok(Part::new(name.trim(), volume, support_volume))
        }
        _ => Err(BudgetError::InvalidPart(format!("expected NAME:VOLUME[:SUPPORT], got {:?}", arg))),
    }
}

/// Parse `KEY=VALUE` for pricing overrides
pub fn parse_set_arg(arg: &str) -> Result<(String, String), BudgetError> {
    match arg.split_once('=') {
        Some((key, value)) => Ok((key.trim().to_string(), value.trim().to_string())),
        None => Err(BudgetError::UnknownParameter(arg.to_string())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
