//! The seven vehicle statistic formulas.
//!
//! Each formula is a pure function of the spec and its categories. Products are
//! computed in f64 and rounded exactly once, at the end, half away from zero.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::categorize::{Categories, ComplexityLevel, MilitaryCategory, SizeCategory};
use crate::constants::{
    DEFAULT_POWER_RATING, HORSEPOWER_PER_POWER_POINT, MAINTENANCE_DIVISOR, MANEUVER_BASE,
    MANEUVER_SIZE_PENALTY_SCALE, MILITARY_DURABILITY_BONUS, MILITARY_FUEL_PENALTY,
    MILITARY_MANEUVER_BONUS, MIN_DURABILITY, MIN_FUEL_CONSUMPTION, MIN_MAINTENANCE_COST,
    MIN_MANEUVERABILITY, MIN_POWER_RATING, MIN_SPEED_RATING, SPEED_DIVISOR,
    SUSTAINABLE_SPEED_FACTOR,
};
use crate::numbers::round_f64_to_u32;
use crate::spec::{DriveType, VehicleSpec, VehicleType};
use crate::tables::{displacement_multiplier, displacement_power_midpoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CargoCategory {
    #[serde(rename = "Very Small")]
    VerySmall,
    Small,
    Medium,
    Large,
    #[serde(rename = "Very Large")]
    VeryLarge,
}

impl CargoCategory {
    #[must_use]
    pub const fn from_capacity(capacity: u32) -> Self {
        match capacity {
            0..=3 => Self::VerySmall,
            4..=6 => Self::Small,
            7..=12 => Self::Medium,
            13..=20 => Self::Large,
            _ => Self::VeryLarge,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VerySmall => "Very Small",
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
            Self::VeryLarge => "Very Large",
        }
    }
}

impl fmt::Display for CargoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One full set of vehicle statistics.
///
/// The same shape serves as the immutable base reference and as the live view
/// that condition penalties are applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub speed_rating: u32,
    pub fuel_consumption: u32,
    pub cargo_capacity: u32,
    pub cargo_category: CargoCategory,
    pub maneuverability: u32,
    pub durability: u32,
    pub power_rating: u32,
    pub maintenance_cost: u32,
    pub sustainable_speed: u32,
}

impl Statistics {
    /// Re-derive `sustainable_speed` after `speed_rating` changed.
    pub const fn sync_sustainable_speed(&mut self) {
        self.sustainable_speed = self.speed_rating.saturating_mul(SUSTAINABLE_SPEED_FACTOR);
    }
}

/// Evaluate every formula for a validated spec.
#[must_use]
pub fn compute_statistics(
    spec: &VehicleSpec,
    top_speed: f64,
    drive_type: DriveType,
    categories: &Categories,
) -> Statistics {
    let vehicle_type = categories.type_category;
    let military = spec.is_military();
    let speed = speed_rating(top_speed);
    let fuel = fuel_consumption(spec.cylinders, spec.displacement, vehicle_type, military);
    let cargo = cargo_capacity(categories.size_category, vehicle_type);
    let mut stats = Statistics {
        speed_rating: speed,
        fuel_consumption: fuel,
        cargo_capacity: cargo,
        cargo_category: CargoCategory::from_capacity(cargo),
        maneuverability: maneuverability(categories.size_category, drive_type, military),
        durability: durability(vehicle_type, categories.size_category, military),
        power_rating: power_rating(spec.horsepower, spec.displacement),
        maintenance_cost: maintenance_cost(
            fuel,
            speed,
            categories.complexity_level,
            categories.military_class,
        ),
        sustainable_speed: 0,
    };
    stats.sync_sustainable_speed();
    stats
}

#[must_use]
pub fn speed_rating(top_speed: f64) -> u32 {
    round_f64_to_u32(top_speed / SPEED_DIVISOR).max(MIN_SPEED_RATING)
}

#[must_use]
pub fn fuel_consumption(
    cylinders: Option<i32>,
    displacement: Option<f64>,
    vehicle_type: VehicleType,
    military: bool,
) -> u32 {
    let base = match (cylinders, displacement) {
        (Some(cyl), Some(disp)) if cyl > 0 && disp > 0.0 => {
            f64::from(cyl) * displacement_multiplier(disp)
        }
        _ => vehicle_type.fallback_fuel_consumption(),
    };
    let adjusted = if military {
        base * MILITARY_FUEL_PENALTY
    } else {
        base
    };
    round_f64_to_u32(adjusted).max(MIN_FUEL_CONSUMPTION)
}

/// Horsepower of 0 counts as unknown and falls back to displacement.
#[must_use]
pub fn power_rating(horsepower: Option<i32>, displacement: Option<f64>) -> u32 {
    let rating = match (horsepower, displacement) {
        (Some(hp), _) if hp > 0 => round_f64_to_u32(f64::from(hp) / HORSEPOWER_PER_POWER_POINT),
        (None, Some(disp)) if disp > 0.0 => displacement_power_midpoint(disp),
        _ => DEFAULT_POWER_RATING,
    };
    rating.max(MIN_POWER_RATING)
}

#[must_use]
pub fn cargo_capacity(size: SizeCategory, vehicle_type: VehicleType) -> u32 {
    let (low, high) = size.cargo_range();
    let midpoint = (f64::from(low) + f64::from(high)) / 2.0;
    round_f64_to_u32(midpoint * vehicle_type.cargo_multiplier())
}

#[must_use]
pub fn maneuverability(size: SizeCategory, drive_type: DriveType, military: bool) -> u32 {
    let mut score = MANEUVER_BASE - size.maneuver_penalty() * MANEUVER_SIZE_PENALTY_SCALE
        + drive_type.maneuver_bonus();
    if military {
        score += MILITARY_MANEUVER_BONUS;
    }
    u32::try_from(score.max(MIN_MANEUVERABILITY)).unwrap_or(1)
}

#[must_use]
pub fn durability(vehicle_type: VehicleType, size: SizeCategory, military: bool) -> u32 {
    let base = f64::from(vehicle_type.base_durability() + size.durability_modifier());
    let adjusted = if military {
        base * MILITARY_DURABILITY_BONUS
    } else {
        base
    };
    round_f64_to_u32(adjusted).max(MIN_DURABILITY)
}

#[must_use]
pub fn maintenance_cost(
    fuel_consumption: u32,
    speed_rating: u32,
    complexity: ComplexityLevel,
    military: MilitaryCategory,
) -> u32 {
    let wear = (f64::from(fuel_consumption) + f64::from(speed_rating)) / MAINTENANCE_DIVISOR;
    let cost = wear * complexity.maintenance_multiplier() * military.maintenance_multiplier();
    round_f64_to_u32(cost).max(MIN_MAINTENANCE_COST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::MilitaryClass;

    #[test]
    fn speed_rating_rounds_and_floors() {
        assert_eq!(speed_rating(200.0), 13);
        assert_eq!(speed_rating(67.0), 4);
        assert_eq!(speed_rating(10.0), 1);
        assert_eq!(speed_rating(150.0), 9);
        assert_eq!(speed_rating(0.1), 1);
    }

    #[test]
    fn fuel_uses_engine_when_known() {
        assert_eq!(fuel_consumption(Some(4), Some(2.0), VehicleType::Car, false), 6);
        assert_eq!(fuel_consumption(Some(8), Some(6.2), VehicleType::Truck, false), 24);
        assert_eq!(fuel_consumption(Some(6), Some(15.0), VehicleType::Commercial, false), 18);
        assert_eq!(fuel_consumption(Some(8), Some(6.2), VehicleType::Truck, true), 30);
        assert_eq!(fuel_consumption(Some(5), Some(3.0), VehicleType::Car, false), 8);
    }

    #[test]
    fn fuel_falls_back_to_type_table() {
        assert_eq!(fuel_consumption(None, Some(2.0), VehicleType::Suv, false), 12);
        assert_eq!(fuel_consumption(Some(4), None, VehicleType::Motorcycle, false), 3);
        assert_eq!(fuel_consumption(None, None, VehicleType::Military, true), 38);
    }

    #[test]
    fn power_prefers_horsepower() {
        assert_eq!(power_rating(Some(152), None), 3);
        assert_eq!(power_rating(Some(385), Some(6.2)), 8);
        assert_eq!(power_rating(Some(1500), None), 30);
        assert_eq!(power_rating(Some(67), None), 1);
        assert_eq!(power_rating(Some(25), None), 1);
        assert_eq!(power_rating(Some(0), None), 3);
        assert_eq!(power_rating(Some(0), Some(3.5)), 6);
        assert_eq!(power_rating(None, None), 3);
        assert_eq!(power_rating(None, Some(3.5)), 6);
        assert_eq!(power_rating(None, Some(12.0)), 14);
    }

    #[test]
    fn cargo_scales_with_size_and_type() {
        assert_eq!(cargo_capacity(SizeCategory::Compact, VehicleType::Car), 2);
        assert_eq!(cargo_capacity(SizeCategory::Large, VehicleType::Truck), 24);
        assert_eq!(cargo_capacity(SizeCategory::Oversized, VehicleType::Military), 36);
        assert_eq!(cargo_capacity(SizeCategory::Compact, VehicleType::Motorcycle), 1);
        assert_eq!(CargoCategory::from_capacity(3), CargoCategory::VerySmall);
        assert_eq!(CargoCategory::from_capacity(12), CargoCategory::Medium);
        assert_eq!(CargoCategory::from_capacity(24), CargoCategory::VeryLarge);
    }

    #[test]
    fn maneuverability_never_drops_below_one() {
        assert_eq!(maneuverability(SizeCategory::Compact, DriveType::Awd, false), 12);
        assert_eq!(maneuverability(SizeCategory::Oversized, DriveType::Tracks, true), 3);
        assert_eq!(maneuverability(SizeCategory::Oversized, DriveType::Tracks, false), 1);
    }

    #[test]
    fn durability_applies_size_and_military_bonus() {
        assert_eq!(durability(VehicleType::Car, SizeCategory::Midsize, false), 40);
        assert_eq!(durability(VehicleType::Military, SizeCategory::Oversized, true), 225);
        assert_eq!(durability(VehicleType::Motorcycle, SizeCategory::Compact, false), 10);
    }

    #[test]
    fn maintenance_multiplies_complexity_and_class() {
        let civ = maintenance_cost(4, 13, ComplexityLevel::Simple, MilitaryCategory::NotApplicable);
        assert_eq!(civ, 2);
        let heavy = maintenance_cost(
            38,
            4,
            ComplexityLevel::Specialized,
            MilitaryCategory::Class(MilitaryClass::Heavy),
        );
        assert_eq!(heavy, 38);
        assert_eq!(
            maintenance_cost(1, 1, ComplexityLevel::Simple, MilitaryCategory::NotApplicable),
            1
        );
    }
}
