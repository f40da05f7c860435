//! Cost model for multi-part print jobs.
//!
//! Pure functions from (parts, duration text, pricing standard) to a cost breakdown.
//! Nothing is rounded until [`CostFigures::rounded`] produces the reported detail.

use crate::duration;
use crate::error::BudgetError;
use crate::types::{ARGON_CANISTER_LITERS, CostBreakdown, CostFigures, InputSummary, Part, PricingStandard, RawValue};
use log::debug;

/// Evaluate the cost formulas at full precision
pub fn evaluate(parts: &[Part], duration_text: &str, pricing: &PricingStandard) -> CostFigures {
    let total_volume: f64 = parts.iter().map(Part::total_volume).sum();

    // mm³ -> cm³
    let material_weight_g =
        total_volume * 1e-3 * pricing.density * pricing.usage_ratio * pricing.packing_coefficient;
    // g -> kg
    let material_cost = material_weight_g * pricing.material_price * 1e-3;

    let machine_hours = duration::parse_hours(duration_text);
    let machine_cost = machine_hours * pricing.machine_rate;

    let argon_cost = (pricing.argon_price / ARGON_CANISTER_LITERS) * (pricing.argon_rate * machine_hours);
    let post_processing_cost = pricing.post_processing_fee;

    let total_cost = material_cost + machine_cost + argon_cost + post_processing_cost;
    let actual_cost = total_cost * pricing.discount;

    debug!(
        "Cost figures: volume={}mm³ weight={}g hours={} material={} machine={} argon={} post={} total={} actual={}",
        total_volume,
        material_weight_g,
        machine_hours,
        material_cost,
        machine_cost,
        argon_cost,
        post_processing_cost,
        total_cost,
        actual_cost
    );

    CostFigures {
        total_volume,
        material_weight_g,
        machine_hours,
        material_cost,
        machine_cost,
        argon_cost,
        post_processing_cost,
        total_cost,
        actual_cost,
    }
}

/// Compute the cost breakdown for a job.
///
/// Empty part lists and durations are accepted and simply yield zero terms;
/// rejecting them is up to the caller (see `config::validate_job`).
pub fn compute(parts: &[Part], duration_text: &str, pricing: &PricingStandard) -> CostBreakdown {
    let figures = evaluate(parts, duration_text, pricing);

    CostBreakdown {
        input: InputSummary {
            parts: parts.to_vec(),
            duration_text: duration_text.to_string(),
            part_count: parts.len(),
        },
        pricing: *pricing,
        detail: figures.rounded(),
    }
}

/// Compute from an untyped pricing mapping.
///
/// Fails with `MissingParameter`, `InvalidParameter` or `UnknownParameter` before any
/// arithmetic happens; no partial breakdown is produced.
pub fn compute_from_entries<I, K, V>(
    parts: &[Part],
    duration_text: &str,
    pricing: I,
) -> Result<CostBreakdown, BudgetError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<RawValue>,
{
    let pricing = PricingStandard::from_entries(pricing)?;
    Ok(compute(parts, duration_text, &pricing))
}

#[cfg(test)]
#[path = "cost_test.rs"]
mod cost_test;
