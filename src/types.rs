/// Core data structures for cost estimation
///
/// This module defines the values that flow between the cost model and the
/// report renderers: part records, the pricing standard, and the cost breakdown.
use crate::error::BudgetError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Volume of one argon canister in liters. Argon is priced per canister.
pub const ARGON_CANISTER_LITERS: f64 = 165.0;

/// One printable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    /// Solid model volume in mm³
    pub volume: f64,
    /// Sacrificial support volume in mm³
    #[serde(default)]
    pub support_volume: f64,
}

impl Part {
    pub fn new(name: impl Into<String>, volume: f64, support_volume: f64) -> Self {
        Self { name: name.into(), volume, support_volume }
    }

    /// Solid plus support volume in mm³
    pub fn total_volume(&self) -> f64 {
        self.volume + self.support_volume
    }
}

/// The nine pricing parameters, in report order.
///
/// Each key has a machine name used in job files and on the command line,
/// a display label used in reports, and a unit suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingKey {
    /// g/cm³
    Density,
    /// Dimensionless, ≤ 1
    PackingCoefficient,
    /// Dimensionless multiplier ≥ 1 covering waste and reuse losses
    UsageRatio,
    /// Currency per kg
    MaterialPrice,
    /// Currency per hour
    MachineRate,
    /// Currency per canister
    ArgonPrice,
    /// Liters per hour
    ArgonRate,
    /// Fixed currency amount
    PostProcessingFee,
    /// Multiplier applied to the total
    Discount,
}

impl PricingKey {
    pub const ALL: [PricingKey; 9] = [
        PricingKey::Density,
        PricingKey::PackingCoefficient,
        PricingKey::UsageRatio,
        PricingKey::MaterialPrice,
        PricingKey::MachineRate,
        PricingKey::ArgonPrice,
        PricingKey::ArgonRate,
        PricingKey::PostProcessingFee,
        PricingKey::Discount,
    ];

    /// Name used in TOML job files and `--set key=value`
    pub fn name(&self) -> &'static str {
        match self {
            PricingKey::Density => "density",
            PricingKey::PackingCoefficient => "packing_coefficient",
            PricingKey::UsageRatio => "usage_ratio",
            PricingKey::MaterialPrice => "material_price",
            PricingKey::MachineRate => "machine_rate",
            PricingKey::ArgonPrice => "argon_price",
            PricingKey::ArgonRate => "argon_rate",
            PricingKey::PostProcessingFee => "post_processing_fee",
            PricingKey::Discount => "discount",
        }
    }

    /// Label shown in reports
    pub fn label(&self) -> &'static str {
        match self {
            PricingKey::Density => "钛粉密度",
            PricingKey::PackingCoefficient => "致密系数",
            PricingKey::UsageRatio => "用量比例",
            PricingKey::MaterialPrice => "材料单价",
            PricingKey::MachineRate => "机时费率",
            PricingKey::ArgonPrice => "氩气单价",
            PricingKey::ArgonRate => "氩气耗率",
            PricingKey::PostProcessingFee => "后处理费",
            PricingKey::Discount => "折扣优惠",
        }
    }

    /// Unit suffix for the spreadsheet pricing section (empty when dimensionless)
    pub fn unit(&self) -> &'static str {
        match self {
            PricingKey::Density => "g/cm³",
            PricingKey::PackingCoefficient => "",
            PricingKey::UsageRatio => "",
            PricingKey::MaterialPrice => "元/公斤",
            PricingKey::MachineRate => "元/小时",
            PricingKey::ArgonPrice => "元",
            PricingKey::ArgonRate => "升/小时",
            PricingKey::PostProcessingFee => "元",
            PricingKey::Discount => "",
        }
    }

    /// Look up a key by machine name or display label
    pub fn lookup(name: &str) -> Option<PricingKey> {
        let name = name.trim();
        PricingKey::ALL.into_iter().find(|k| k.name() == name || k.label() == name)
    }
}

impl fmt::Display for PricingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.label())
    }
}

/// Complete set of pricing parameters used to turn volumes and time into currency.
///
/// There are no defaults here. Callers build one from their own configuration via
/// [`PricingStandard::from_entries`], [`PricingStandard::from_table`], or the struct literal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingStandard {
    pub density: f64,
    pub packing_coefficient: f64,
    pub usage_ratio: f64,
    pub material_price: f64,
    pub machine_rate: f64,
    pub argon_price: f64,
    pub argon_rate: f64,
    pub post_processing_fee: f64,
    pub discount: f64,
}

/// A pricing value before validation
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    fn to_number(&self, key: PricingKey) -> Result<f64, BudgetError> {
        match self {
            RawValue::Number(n) => Ok(*n),
            RawValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| BudgetError::InvalidParameter { key, value: s.clone() }),
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl TryFrom<&toml::Value> for RawValue {
    type Error = String;

    fn try_from(value: &toml::Value) -> Result<Self, Self::Error> {
        match value {
            toml::Value::Float(f) => Ok(RawValue::Number(*f)),
            toml::Value::Integer(i) => Ok(RawValue::Number(*i as f64)),
            toml::Value::String(s) => Ok(RawValue::Text(s.clone())),
            other => Err(other.to_string()),
        }
    }
}

impl PricingStandard {
    /// Build a standard from named entries. All nine keys are required.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, BudgetError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawValue>,
    {
        let mut values: [Option<f64>; 9] = [None; 9];
        for (name, value) in entries {
            let key = PricingKey::lookup(name.as_ref())
                .ok_or_else(|| BudgetError::UnknownParameter(name.as_ref().to_string()))?;
            values[key as usize] = Some(value.into().to_number(key)?);
        }

        let get = |key: PricingKey| values[key as usize].ok_or(BudgetError::MissingParameter(key));
        Ok(PricingStandard {
            density: get(PricingKey::Density)?,
            packing_coefficient: get(PricingKey::PackingCoefficient)?,
            usage_ratio: get(PricingKey::UsageRatio)?,
            material_price: get(PricingKey::MaterialPrice)?,
            machine_rate: get(PricingKey::MachineRate)?,
            argon_price: get(PricingKey::ArgonPrice)?,
            argon_rate: get(PricingKey::ArgonRate)?,
            post_processing_fee: get(PricingKey::PostProcessingFee)?,
            discount: get(PricingKey::Discount)?,
        })
    }

    /// Build a standard from a TOML table such as a job file's `[pricing]` section
    pub fn from_table(table: &toml::Table) -> Result<Self, BudgetError> {
        Self::from_entries(table_entries(table)?)
    }

    /// Apply a partial set of entries on top of this standard
    pub fn with_overrides<I, K, V>(&self, entries: I) -> Result<Self, BudgetError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawValue>,
    {
        let mut updated = *self;
        for (name, value) in entries {
            let key = PricingKey::lookup(name.as_ref())
                .ok_or_else(|| BudgetError::UnknownParameter(name.as_ref().to_string()))?;
            updated.set(key, value.into().to_number(key)?);
        }
        Ok(updated)
    }

    /// Apply a TOML table of overrides
    pub fn with_table_overrides(&self, table: &toml::Table) -> Result<Self, BudgetError> {
        self.with_overrides(table_entries(table)?)
    }

    pub fn get(&self, key: PricingKey) -> f64 {
        match key {
            PricingKey::Density => self.density,
            PricingKey::PackingCoefficient => self.packing_coefficient,
            PricingKey::UsageRatio => self.usage_ratio,
            PricingKey::MaterialPrice => self.material_price,
            PricingKey::MachineRate => self.machine_rate,
            PricingKey::ArgonPrice => self.argon_price,
            PricingKey::ArgonRate => self.argon_rate,
            PricingKey::PostProcessingFee => self.post_processing_fee,
            PricingKey::Discount => self.discount,
        }
    }

    pub fn set(&mut self, key: PricingKey, value: f64) {
        match key {
            PricingKey::Density => self.density = value,
            PricingKey::PackingCoefficient => self.packing_coefficient = value,
            PricingKey::UsageRatio => self.usage_ratio = value,
            PricingKey::MaterialPrice => self.material_price = value,
            PricingKey::MachineRate => self.machine_rate = value,
            PricingKey::ArgonPrice => self.argon_price = value,
            PricingKey::ArgonRate => self.argon_rate = value,
            PricingKey::PostProcessingFee => self.post_processing_fee = value,
            PricingKey::Discount => self.discount = value,
        }
    }

    /// All parameters in report order
    pub fn entries(&self) -> impl Iterator<Item = (PricingKey, f64)> + '_ {
        PricingKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

fn table_entries(table: &toml::Table) -> Result<Vec<(String, RawValue)>, BudgetError> {
    table
        .iter()
        .map(|(name, value)| {
            let raw = RawValue::try_from(value).map_err(|shown| match PricingKey::lookup(name) {
                Some(key) => BudgetError::InvalidParameter { key, value: shown },
                None => BudgetError::UnknownParameter(name.clone()),
            })?;
            Ok((name.clone(), raw))
        })
        .collect()
}

/// Echo of the job inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSummary {
    pub parts: Vec<Part>,
    /// Duration text exactly as entered
    pub duration_text: String,
    pub part_count: usize,
}

/// Full-precision results of the cost formulas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostFigures {
    /// mm³, solid plus support over all parts
    pub total_volume: f64,
    pub material_weight_g: f64,
    pub machine_hours: f64,
    pub material_cost: f64,
    pub machine_cost: f64,
    pub argon_cost: f64,
    pub post_processing_cost: f64,
    pub total_cost: f64,
    pub actual_cost: f64,
}

impl CostFigures {
    /// Round every figure independently from its own full-precision value
    pub fn rounded(&self) -> CostDetail {
        CostDetail {
            material_weight_g: round2(self.material_weight_g),
            machine_hours: round2(self.machine_hours),
            material_cost: round2(self.material_cost),
            machine_cost: round2(self.machine_cost),
            argon_cost: round2(self.argon_cost),
            post_processing_cost: round2(self.post_processing_cost),
            total_cost: round2(self.total_cost),
            actual_cost: round2(self.actual_cost),
        }
    }
}

/// Derived figures as reported, rounded to 2 decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostDetail {
    pub material_weight_g: f64,
    pub machine_hours: f64,
    pub material_cost: f64,
    pub machine_cost: f64,
    pub argon_cost: f64,
    pub post_processing_cost: f64,
    pub total_cost: f64,
    pub actual_cost: f64,
}

/// Result of one cost calculation: echoed inputs, echoed pricing, and derived figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub input: InputSummary,
    pub pricing: PricingStandard,
    pub detail: CostDetail,
}

impl CostBreakdown {
    pub fn part_count(&self) -> usize {
        self.input.part_count
    }
}

/// Round to 2 decimal places.
///
/// Goes through exact decimal formatting so the result is the correctly rounded
/// value of the binary input (ties to even), not `(x * 100).round() / 100`.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
