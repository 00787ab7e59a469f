//! Engine configuration: operational defaults and aggregation switches.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::{
    DEFAULT_EFFICIENCY, DEFAULT_FUEL_RESERVE, DEFAULT_HOURS_PER_DAY,
    DEFAULT_TRAVEL_DAYS_PER_MONTH,
};
use crate::convoy::ConvoySize;

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be at least {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// Per-convoy operating assumptions used for range and cost projections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalParams {
    #[serde(default = "OperationalParams::default_hours_per_day")]
    pub hours_per_day: f64,
    #[serde(default = "OperationalParams::default_efficiency")]
    pub efficiency: f64,
    #[serde(default = "OperationalParams::default_travel_days_per_month")]
    pub travel_days_per_month: u32,
    #[serde(default = "OperationalParams::default_fuel_reserve_fraction")]
    pub fuel_reserve_fraction: f64,
}

impl Default for OperationalParams {
    fn default() -> Self {
        Self {
            hours_per_day: Self::default_hours_per_day(),
            efficiency: Self::default_efficiency(),
            travel_days_per_month: Self::default_travel_days_per_month(),
            fuel_reserve_fraction: Self::default_fuel_reserve_fraction(),
        }
    }
}

impl OperationalParams {
    const fn default_hours_per_day() -> f64 {
        DEFAULT_HOURS_PER_DAY
    }

    const fn default_efficiency() -> f64 {
        DEFAULT_EFFICIENCY
    }

    const fn default_travel_days_per_month() -> u32 {
        DEFAULT_TRAVEL_DAYS_PER_MONTH
    }

    const fn default_fuel_reserve_fraction() -> f64 {
        DEFAULT_FUEL_RESERVE
    }

    /// Validate the documented bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for the first field out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.hours_per_day > 0.0 && self.hours_per_day <= 24.0) {
            return Err(ConfigError::RangeViolation {
                field: "operational.hours_per_day",
                min: 0.0,
                max: 24.0,
                value: self.hours_per_day,
            });
        }
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(ConfigError::RangeViolation {
                field: "operational.efficiency",
                min: 0.0,
                max: 1.0,
                value: self.efficiency,
            });
        }
        if self.travel_days_per_month == 0 {
            return Err(ConfigError::MinViolation {
                field: "operational.travel_days_per_month",
                min: 1.0,
                value: 0.0,
            });
        }
        if self.travel_days_per_month > 31 {
            return Err(ConfigError::RangeViolation {
                field: "operational.travel_days_per_month",
                min: 1.0,
                max: 31.0,
                value: f64::from(self.travel_days_per_month),
            });
        }
        if !(0.0..1.0).contains(&self.fuel_reserve_fraction) {
            return Err(ConfigError::RangeViolation {
                field: "operational.fuel_reserve_fraction",
                min: 0.0,
                max: 1.0,
                value: self.fuel_reserve_fraction,
            });
        }
        Ok(())
    }
}

/// How convoy size turns into a speed modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeModifierScheme {
    /// Small 1.0, Medium 0.9, Large 0.8, Huge 0.5.
    #[default]
    Tiered,
    /// 1: 1.0, 2-3: 0.95, 4-6: 0.9, 7-10: 0.85, more: 0.8.
    Graduated,
}

impl SizeModifierScheme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tiered => "tiered",
            Self::Graduated => "graduated",
        }
    }

    #[must_use]
    pub const fn modifier(self, vehicle_count: usize) -> f64 {
        match self {
            Self::Tiered => match ConvoySize::from_count(vehicle_count) {
                ConvoySize::Empty | ConvoySize::Small => 1.0,
                ConvoySize::Medium => 0.9,
                ConvoySize::Large => 0.8,
                ConvoySize::Huge => 0.5,
            },
            Self::Graduated => match vehicle_count {
                0 | 1 => 1.0,
                2..=3 => 0.95,
                4..=6 => 0.9,
                7..=10 => 0.85,
                _ => 0.8,
            },
        }
    }
}

impl fmt::Display for SizeModifierScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default)]
    pub operational: OperationalParams,
    #[serde(default)]
    pub size_modifier_scheme: SizeModifierScheme,
    /// Apply the stored weather modifier to convoy speed at aggregation time.
    /// Weather is otherwise only applied by the travel planner.
    #[serde(default)]
    pub weather_affects_convoy_speed: bool,
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and a bounds error for
    /// out-of-range values.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(source)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.operational.validate()
    }
}
