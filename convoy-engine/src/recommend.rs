//! Mission-driven convoy recommendations from a pool of available specs.
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

use crate::compare::fuel_efficiency;
use crate::config::EngineConfig;
use crate::constants::{
    BALANCED_FUEL_BASELINE, BALANCED_WEIGHT_CARGO, BALANCED_WEIGHT_FUEL,
    BALANCED_WEIGHT_MANEUVER, BALANCED_WEIGHT_POWER, BALANCED_WEIGHT_SPEED,
    DEFAULT_MAX_VEHICLES, RANGE_FOCUS_CAP, SPEED_FOCUS_CAP,
};
use crate::convoy::{ConvoyModifiers, ConvoyStatistics};
use crate::formulas::Statistics;
use crate::numbers::round_to_places;
use crate::spec::VehicleSpec;
use crate::vehicle::Vehicle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionRequirements {
    #[serde(default)]
    pub min_speed: u32,
    #[serde(default)]
    pub min_range: u32,
    #[serde(default)]
    pub min_cargo: u32,
    #[serde(default)]
    pub min_power: u32,
    /// Zero is treated as the default of ten.
    #[serde(default = "MissionRequirements::default_max_vehicles")]
    pub max_vehicles: usize,
}

impl Default for MissionRequirements {
    fn default() -> Self {
        Self {
            min_speed: 0,
            min_range: 0,
            min_cargo: 0,
            min_power: 0,
            max_vehicles: Self::default_max_vehicles(),
        }
    }
}

impl MissionRequirements {
    const fn default_max_vehicles() -> usize {
        DEFAULT_MAX_VEHICLES
    }

    const fn vehicle_cap(&self) -> usize {
        if self.max_vehicles == 0 {
            DEFAULT_MAX_VEHICLES
        } else {
            self.max_vehicles
        }
    }

    fn met_by(&self, stats: &ConvoyStatistics) -> bool {
        stats.sustainable_speed >= self.min_speed
            && stats.fuel_limited_range >= self.min_range
            && stats.total_cargo_capacity >= self.min_cargo
            && stats.total_power_rating >= self.min_power
    }
}

/// Selection strategy behind one recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Focus {
    #[serde(rename = "Speed Focused")]
    Speed,
    #[serde(rename = "Range Focused")]
    Range,
    #[serde(rename = "Cargo Focused")]
    Cargo,
    Balanced,
}

impl Focus {
    pub const ALL: [Self; 4] = [Self::Speed, Self::Range, Self::Cargo, Self::Balanced];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Speed => "Speed Focused",
            Self::Range => "Range Focused",
            Self::Cargo => "Cargo Focused",
            Self::Balanced => "Balanced",
        }
    }

    fn select<'a>(self, pool: &[(&'a Vehicle, Statistics)], cap: usize) -> Vec<&'a Vehicle> {
        let mut ranked = pool.to_vec();
        let limit = match self {
            Self::Speed => {
                ranked.sort_by_key(|(_, s)| Reverse(s.speed_rating));
                cap.min(SPEED_FOCUS_CAP)
            }
            Self::Range => {
                ranked.sort_by_key(|(_, s)| s.fuel_consumption);
                cap.min(RANGE_FOCUS_CAP)
            }
            Self::Cargo => {
                ranked.sort_by_key(|(_, s)| Reverse(s.cargo_capacity));
                cap
            }
            Self::Balanced => {
                ranked.sort_by(|(_, a), (_, b)| balanced_score(b).total_cmp(&balanced_score(a)));
                cap
            }
        };
        ranked.truncate(limit);
        ranked.into_iter().map(|(vehicle, _)| vehicle).collect()
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationStats {
    pub speed: u32,
    pub range: u32,
    pub cargo: u32,
    pub power: u32,
    /// Monthly fuel per monthly km, rounded to two decimals.
    pub efficiency: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub name: Focus,
    pub meets_requirements: bool,
    pub vehicles: Vec<String>,
    pub statistics: RecommendationStats,
}

/// Weighted score favouring fast, frugal, roomy, strong and nimble vehicles.
#[must_use]
pub fn balanced_score(stats: &Statistics) -> f64 {
    f64::from(stats.speed_rating) * BALANCED_WEIGHT_SPEED
        + (BALANCED_FUEL_BASELINE - f64::from(stats.fuel_consumption)) * BALANCED_WEIGHT_FUEL
        + f64::from(stats.cargo_capacity) * BALANCED_WEIGHT_CARGO
        + f64::from(stats.power_rating) * BALANCED_WEIGHT_POWER
        + f64::from(stats.maneuverability) * BALANCED_WEIGHT_MANEUVER
}

/// Recommend convoys using the default engine configuration.
#[must_use]
pub fn recommend(requirements: &MissionRequirements, specs: &[VehicleSpec]) -> Vec<Recommendation> {
    recommend_with_config(requirements, specs, &EngineConfig::default())
}

/// Build every valid spec, then assemble one candidate convoy per focus.
/// Candidates without members are omitted.
#[must_use]
pub fn recommend_with_config(
    requirements: &MissionRequirements,
    specs: &[VehicleSpec],
    config: &EngineConfig,
) -> Vec<Recommendation> {
    let built: Vec<Vehicle> = specs
        .iter()
        .cloned()
        .map(Vehicle::build)
        .filter(|vehicle| {
            if !vehicle.is_valid() {
                log::warn!("ignoring invalid vehicle '{}'", vehicle.display_name());
            }
            vehicle.is_valid()
        })
        .collect();
    if built.is_empty() {
        log::warn!("no valid vehicles available for recommendation");
        return Vec::new();
    }
    let pool: Vec<(&Vehicle, Statistics)> = built
        .iter()
        .filter_map(|vehicle| Some((vehicle, *vehicle.live_statistics()?)))
        .collect();
    let cap = requirements.vehicle_cap();

    Focus::ALL
        .into_iter()
        .filter_map(|focus| {
            let members = focus.select(&pool, cap);
            if members.is_empty() {
                return None;
            }
            let convoy = ConvoyStatistics::aggregate(
                &members,
                &ConvoyModifiers::default(),
                &config.operational,
                config,
            );
            Some(Recommendation {
                name: focus,
                meets_requirements: requirements.met_by(&convoy),
                vehicles: members.iter().map(|v| v.display_name()).collect(),
                statistics: RecommendationStats {
                    speed: convoy.sustainable_speed,
                    range: convoy.fuel_limited_range,
                    cargo: convoy.total_cargo_capacity,
                    power: convoy.total_power_rating,
                    efficiency: fuel_efficiency(&convoy).map(|e| round_to_places(e, 2)),
                },
            })
        })
        .collect()
}
