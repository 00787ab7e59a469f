//! Trip planning for a convoy: duration with rest days and refuel stops.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    FUEL_CONSUMPTION_DISTANCE_KM, REFUEL_USABLE_FRACTION, REST_DAY_OVERHEAD, TRAVEL_HOURS_PER_DAY,
};
use crate::convoy::Convoy;
use crate::numbers::{ceil_f64_to_u32, round_f64_to_u32, round_to_places};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TravelError {
    #[error("no vehicles in convoy")]
    EmptyConvoy,
    #[error("distance must be a positive number of km, got {0}")]
    InvalidDistance(f64),
    #[error("modifier must be a finite number, got {0}")]
    InvalidModifier(f64),
    #[error("effective speed must be positive, got {0}")]
    NonPositiveSpeed(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelTime {
    /// Driving hours, rounded to one decimal.
    pub hours: f64,
    pub travel_days: u32,
    /// Travel days plus rest days.
    pub total_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelPlan {
    pub required: u32,
    pub capacity: u32,
    pub stops_needed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedModifiers {
    pub terrain: f64,
    pub weather: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPlan {
    pub distance: f64,
    pub effective_speed: u32,
    pub travel_time: TravelTime,
    pub fuel: FuelPlan,
    pub modifiers: AppliedModifiers,
}

/// Plan a trip. Terrain and weather default to the convoy's stored modifiers.
///
/// # Errors
///
/// Returns `TravelError` for an empty convoy, a non-positive distance, a
/// non-finite modifier or an effective speed of zero or less.
pub fn plan_travel(
    convoy: &Convoy,
    distance_km: f64,
    terrain: Option<f64>,
    weather: Option<f64>,
) -> Result<TravelPlan, TravelError> {
    let stats = convoy.statistics();
    if stats.vehicle_count == 0 {
        return Err(TravelError::EmptyConvoy);
    }
    if !(distance_km.is_finite() && distance_km > 0.0) {
        return Err(TravelError::InvalidDistance(distance_km));
    }
    let terrain = terrain.unwrap_or(convoy.modifiers().terrain_modifier);
    let weather = weather.unwrap_or(convoy.modifiers().weather_modifier);
    for modifier in [terrain, weather] {
        if !modifier.is_finite() {
            return Err(TravelError::InvalidModifier(modifier));
        }
    }

    let effective_speed = stats.base_speed * terrain * weather;
    if effective_speed <= 0.0 {
        return Err(TravelError::NonPositiveSpeed(effective_speed));
    }

    let hours = distance_km / effective_speed;
    let travel_days = ceil_f64_to_u32(hours / TRAVEL_HOURS_PER_DAY);
    let total_days = if travel_days <= 1 {
        1
    } else {
        ceil_f64_to_u32(f64::from(travel_days) * REST_DAY_OVERHEAD)
    };

    let fuel_required =
        distance_km / FUEL_CONSUMPTION_DISTANCE_KM * f64::from(stats.total_fuel_consumption);
    let usable_per_fill = f64::from(stats.total_fuel_capacity) * REFUEL_USABLE_FRACTION;
    let fills = if usable_per_fill > 0.0 {
        ceil_f64_to_u32(fuel_required / usable_per_fill)
    } else {
        0
    };

    log::debug!(
        "plan for '{}': {distance_km} km at {effective_speed:.1} km/h over {total_days} days",
        convoy.name()
    );
    Ok(TravelPlan {
        distance: distance_km,
        effective_speed: round_f64_to_u32(effective_speed),
        travel_time: TravelTime {
            hours: round_to_places(hours, 1),
            travel_days,
            total_days,
        },
        fuel: FuelPlan {
            required: round_f64_to_u32(fuel_required),
            capacity: stats.total_fuel_capacity,
            stops_needed: fills.saturating_sub(1),
        },
        modifiers: AppliedModifiers { terrain, weather },
    })
}
