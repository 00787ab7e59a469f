//! Convoy aggregation and operational projections.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::categorize::ComplexityLevel;
use crate::config::{EngineConfig, OperationalParams};
use crate::constants::{
    FUEL_CONSUMPTION_DISTANCE_KM, MODIFIER_MAX, MODIFIER_MIN, PARTS_COST_PER_MAINTENANCE,
    SUSTAINABLE_SPEED_FACTOR,
};
use crate::fleet::VehicleId;
use crate::formulas::Statistics;
use crate::numbers::{round_f64_to_u32, usize_to_f64};
use crate::vehicle::{ValidationError, Vehicle};

/// Raised when a terrain or weather modifier is not a finite number.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("modifier must be a finite number, got {0}")]
pub struct InvalidModifier(pub f64);

/// Clamp a speed modifier into `[0.1, 1.0]`.
///
/// # Errors
///
/// Returns `InvalidModifier` for NaN or infinite input.
pub fn clamp_modifier(value: f64) -> Result<f64, InvalidModifier> {
    if value.is_finite() {
        Ok(value.clamp(MODIFIER_MIN, MODIFIER_MAX))
    } else {
        Err(InvalidModifier(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ConvoySize {
    #[default]
    Empty,
    Small,
    Medium,
    Large,
    Huge,
}

impl ConvoySize {
    #[must_use]
    pub const fn from_count(count: usize) -> Self {
        match count {
            0 => Self::Empty,
            1..=2 => Self::Small,
            3..=5 => Self::Medium,
            6..=10 => Self::Large,
            _ => Self::Huge,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
            Self::Huge => "Huge",
        }
    }
}

impl fmt::Display for ConvoySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvoyModifiers {
    /// Derived from the member count on every recompute.
    pub size_modifier: f64,
    pub terrain_modifier: f64,
    pub weather_modifier: f64,
}

impl Default for ConvoyModifiers {
    fn default() -> Self {
        Self {
            size_modifier: 1.0,
            terrain_modifier: 1.0,
            weather_modifier: 1.0,
        }
    }
}

/// Spec skipped while building a convoy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedVehicle {
    pub name: String,
    pub errors: Vec<ValidationError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvoyStatistics {
    pub vehicle_count: usize,
    pub convoy_size: ConvoySize,
    pub convoy_complexity: ComplexityLevel,
    pub size_modifier: f64,
    /// Slowest member speed rating times ten times the size modifier, before
    /// terrain and weather.
    pub base_speed: f64,
    pub convoy_speed: u32,
    pub sustainable_speed: u32,
    pub total_fuel_consumption: u32,
    pub total_cargo_capacity: u32,
    pub total_durability: u32,
    pub total_power_rating: u32,
    pub total_maintenance_cost: u32,
    pub average_maneuverability: u32,
    /// Sum of per-type tank estimates in liters.
    pub total_fuel_capacity: u32,
    pub daily_travel_distance: u32,
    pub monthly_travel_distance: u32,
    pub fuel_limited_range: u32,
    pub monthly_fuel_consumption: u32,
    pub monthly_maintenance_hours: u32,
    pub monthly_parts_cost: u32,
}

impl ConvoyStatistics {
    /// Aggregate the live statistics of the given members. Members without
    /// statistics are ignored.
    #[must_use]
    pub fn aggregate(
        members: &[&Vehicle],
        modifiers: &ConvoyModifiers,
        params: &OperationalParams,
        config: &EngineConfig,
    ) -> Self {
        let live: Vec<_> = members
            .iter()
            .filter_map(|vehicle| {
                let profile = vehicle.profile()?;
                Some((profile.live_statistics, profile.categories))
            })
            .collect();
        let count = live.len();
        let size_modifier = config.size_modifier_scheme.modifier(count);
        let mut stats = Self {
            vehicle_count: count,
            convoy_size: ConvoySize::from_count(count),
            convoy_complexity: ComplexityLevel::Simple,
            size_modifier,
            ..Self::default()
        };
        if count == 0 {
            return stats;
        }

        let min_speed = live.iter().map(|(s, _)| s.speed_rating).min().unwrap_or(0);
        stats.convoy_complexity = live
            .iter()
            .map(|(_, c)| c.complexity_level)
            .max()
            .unwrap_or(ComplexityLevel::Simple);
        stats.base_speed =
            f64::from(min_speed.saturating_mul(SUSTAINABLE_SPEED_FACTOR)) * size_modifier;
        let mut speed = stats.base_speed * modifiers.terrain_modifier;
        if config.weather_affects_convoy_speed {
            speed *= modifiers.weather_modifier;
        }
        stats.convoy_speed = round_f64_to_u32(speed);
        stats.sustainable_speed = stats.convoy_speed;

        let total = |pick: fn(&Statistics) -> u32| {
            live.iter().map(|(s, _)| pick(s)).fold(0u32, u32::saturating_add)
        };
        stats.total_fuel_consumption = total(|s| s.fuel_consumption);
        stats.total_cargo_capacity = total(|s| s.cargo_capacity);
        stats.total_durability = total(|s| s.durability);
        stats.total_power_rating = total(|s| s.power_rating);
        stats.total_maintenance_cost = total(|s| s.maintenance_cost);
        let total_maneuver = total(|s| s.maneuverability);
        let count_f = usize_to_f64(count);
        stats.average_maneuverability = round_f64_to_u32(f64::from(total_maneuver) / count_f);

        stats.total_fuel_capacity = live
            .iter()
            .map(|(_, c)| c.type_category.fuel_capacity())
            .fold(0u32, u32::saturating_add);

        stats.daily_travel_distance = round_f64_to_u32(
            f64::from(stats.sustainable_speed) * params.hours_per_day * params.efficiency,
        );
        stats.monthly_travel_distance = stats
            .daily_travel_distance
            .saturating_mul(params.travel_days_per_month);

        let consumption_per_km =
            f64::from(stats.total_fuel_consumption) / FUEL_CONSUMPTION_DISTANCE_KM;
        stats.fuel_limited_range = if stats.total_fuel_consumption == 0 {
            0
        } else {
            let average_capacity =
                f64::from(round_f64_to_u32(f64::from(stats.total_fuel_capacity) / count_f));
            round_f64_to_u32(
                count_f * average_capacity * (1.0 - params.fuel_reserve_fraction)
                    / consumption_per_km,
            )
        };
        stats.monthly_fuel_consumption = round_f64_to_u32(
            f64::from(stats.monthly_travel_distance) / FUEL_CONSUMPTION_DISTANCE_KM
                * f64::from(stats.total_fuel_consumption),
        );
        stats.monthly_maintenance_hours = stats.total_maintenance_cost;
        stats.monthly_parts_cost = round_f64_to_u32(
            f64::from(stats.total_maintenance_cost) * PARTS_COST_PER_MAINTENANCE,
        );
        stats
    }
}

/// A named group of fleet vehicles travelling together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Convoy {
    name: String,
    #[serde(default)]
    vehicle_ids: Vec<VehicleId>,
    #[serde(default)]
    modifiers: ConvoyModifiers,
    #[serde(default)]
    operational_params: OperationalParams,
    #[serde(default)]
    statistics: ConvoyStatistics,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<RejectedVehicle>,
}

impl Convoy {
    #[must_use]
    pub fn new(name: impl Into<String>, operational_params: OperationalParams) -> Self {
        Self {
            name: name.into(),
            vehicle_ids: Vec::new(),
            modifiers: ConvoyModifiers::default(),
            operational_params,
            statistics: ConvoyStatistics::default(),
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member ids in insertion order.
    #[must_use]
    pub fn vehicle_ids(&self) -> &[VehicleId] {
        &self.vehicle_ids
    }

    #[must_use]
    pub fn contains(&self, id: VehicleId) -> bool {
        self.vehicle_ids.contains(&id)
    }

    #[must_use]
    pub const fn modifiers(&self) -> &ConvoyModifiers {
        &self.modifiers
    }

    #[must_use]
    pub const fn operational_params(&self) -> &OperationalParams {
        &self.operational_params
    }

    #[must_use]
    pub const fn statistics(&self) -> &ConvoyStatistics {
        &self.statistics
    }

    #[must_use]
    pub fn errors(&self) -> &[RejectedVehicle] {
        &self.errors
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.vehicle_ids.is_empty()
    }

    pub(crate) fn push_vehicle(&mut self, id: VehicleId) {
        if !self.vehicle_ids.contains(&id) {
            self.vehicle_ids.push(id);
        }
    }

    pub(crate) fn remove_vehicle(&mut self, id: VehicleId) -> bool {
        let before = self.vehicle_ids.len();
        self.vehicle_ids.retain(|member| *member != id);
        self.vehicle_ids.len() != before
    }

    pub(crate) fn record_rejection(&mut self, rejected: RejectedVehicle) {
        self.errors.push(rejected);
    }

    pub(crate) fn set_terrain_modifier(&mut self, value: f64) -> Result<f64, InvalidModifier> {
        self.modifiers.terrain_modifier = clamp_modifier(value)?;
        Ok(self.modifiers.terrain_modifier)
    }

    pub(crate) fn set_weather_modifier(&mut self, value: f64) -> Result<f64, InvalidModifier> {
        self.modifiers.weather_modifier = clamp_modifier(value)?;
        Ok(self.modifiers.weather_modifier)
    }

    /// Clamp stored modifiers back into range after loading a snapshot.
    pub(crate) fn restore_modifiers(&mut self) -> Result<(), InvalidModifier> {
        let loaded = self.modifiers;
        self.set_terrain_modifier(loaded.terrain_modifier)?;
        self.set_weather_modifier(loaded.weather_modifier)?;
        if self.modifiers != loaded {
            log::warn!(
                "convoy '{}' modifiers clamped: terrain {} -> {}, weather {} -> {}",
                self.name,
                loaded.terrain_modifier,
                self.modifiers.terrain_modifier,
                loaded.weather_modifier,
                self.modifiers.weather_modifier
            );
        }
        Ok(())
    }

    pub(crate) const fn set_operational_params(&mut self, params: OperationalParams) {
        self.operational_params = params;
    }

    /// Recompute every statistic from the given members.
    pub(crate) fn recompute(&mut self, members: &[&Vehicle], config: &EngineConfig) {
        let stats =
            ConvoyStatistics::aggregate(members, &self.modifiers, &self.operational_params, config);
        self.modifiers.size_modifier = stats.size_modifier;
        log::debug!(
            "convoy '{}' recomputed: {} vehicles, speed {}, range {}",
            self.name,
            stats.vehicle_count,
            stats.convoy_speed,
            stats.fuel_limited_range
        );
        self.statistics = stats;
    }
}
