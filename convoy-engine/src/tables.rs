//! Static per-category lookup tables.
//!
//! Tables are expressed as exhaustive matches on the category enums so that a
//! new variant cannot be added without giving it a value in every table.

use crate::categorize::{ComplexityLevel, MilitaryCategory, SizeCategory};
use crate::spec::{DriveType, MilitaryClass, VehicleType};

impl VehicleType {
    /// Durability before size and military adjustments.
    #[must_use]
    pub const fn base_durability(self) -> i32 {
        match self {
            Self::Motorcycle => 20,
            Self::Car => 40,
            Self::Suv => 50,
            Self::Truck => 60,
            Self::Commercial => 80,
            Self::Military => 120,
            Self::Specialty => 100,
        }
    }

    /// Fuel consumption used when cylinders or displacement are unknown.
    #[must_use]
    pub const fn fallback_fuel_consumption(self) -> f64 {
        match self {
            Self::Motorcycle => 3.0,
            Self::Car => 8.0,
            Self::Suv => 12.0,
            Self::Truck => 15.0,
            Self::Commercial => 25.0,
            Self::Military => 30.0,
            Self::Specialty => 20.0,
        }
    }

    #[must_use]
    pub const fn cargo_multiplier(self) -> f64 {
        match self {
            Self::Motorcycle => 0.2,
            Self::Car => 0.8,
            Self::Suv => 1.0,
            Self::Truck => 1.5,
            Self::Commercial => 2.0,
            Self::Military => 1.2,
            Self::Specialty => 1.3,
        }
    }

    /// Estimated tank size in liters.
    #[must_use]
    pub const fn fuel_capacity(self) -> u32 {
        match self {
            Self::Motorcycle => 15,
            Self::Car => 50,
            Self::Suv => 70,
            Self::Truck => 100,
            Self::Commercial => 200,
            Self::Military => 500,
            Self::Specialty => 300,
        }
    }
}

impl DriveType {
    #[must_use]
    pub const fn maneuver_bonus(self) -> i32 {
        match self {
            Self::Fwd => 0,
            Self::Rwd => 1,
            Self::Awd => 2,
            Self::FourWheel => 3,
            Self::Tracks => -1,
        }
    }
}

impl SizeCategory {
    #[must_use]
    pub const fn maneuver_penalty(self) -> i32 {
        match self {
            Self::Compact => 0,
            Self::Midsize => 1,
            Self::Fullsize => 2,
            Self::Large => 3,
            Self::Oversized => 4,
        }
    }

    #[must_use]
    pub const fn durability_modifier(self) -> i32 {
        match self {
            Self::Compact => -10,
            Self::Midsize => 0,
            Self::Fullsize => 10,
            Self::Large => 20,
            Self::Oversized => 30,
        }
    }

    /// Inclusive cargo range in abstract cargo units.
    #[must_use]
    pub const fn cargo_range(self) -> (u32, u32) {
        match self {
            Self::Compact => (2, 4),
            Self::Midsize => (4, 8),
            Self::Fullsize => (8, 12),
            Self::Large => (12, 20),
            Self::Oversized => (20, 40),
        }
    }
}

impl ComplexityLevel {
    #[must_use]
    pub const fn maintenance_multiplier(self) -> f64 {
        match self {
            Self::Simple => 1.0,
            Self::Standard => 1.5,
            Self::Complex => 2.0,
            Self::Specialized => 3.0,
        }
    }
}

impl MilitaryCategory {
    #[must_use]
    pub const fn maintenance_multiplier(self) -> f64 {
        match self {
            Self::NotApplicable => 1.0,
            Self::Class(MilitaryClass::Light) => 2.0,
            Self::Class(MilitaryClass::Medium) => 2.5,
            Self::Class(MilitaryClass::Heavy) => 3.0,
            Self::Class(MilitaryClass::Specialized) => 4.0,
        }
    }
}

/// Fuel multiplier per cylinder for an engine of the given displacement.
#[must_use]
pub fn displacement_multiplier(displacement: f64) -> f64 {
    if displacement < 2.0 {
        1.0
    } else if displacement <= 4.0 {
        1.5
    } else if displacement <= 6.0 {
        2.0
    } else {
        3.0
    }
}

/// Power rating midpoint for an engine bracket when horsepower is unknown.
#[must_use]
pub fn displacement_power_midpoint(displacement: f64) -> u32 {
    if displacement < 2.0 {
        3
    } else if displacement <= 4.0 {
        6
    } else if displacement <= 6.0 {
        9
    } else {
        14
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_edges_are_inclusive_on_the_upper_bound() {
        assert!((displacement_multiplier(1.99) - 1.0).abs() < f64::EPSILON);
        assert!((displacement_multiplier(2.0) - 1.5).abs() < f64::EPSILON);
        assert!((displacement_multiplier(4.0) - 1.5).abs() < f64::EPSILON);
        assert!((displacement_multiplier(6.0) - 2.0).abs() < f64::EPSILON);
        assert!((displacement_multiplier(6.2) - 3.0).abs() < f64::EPSILON);
        assert_eq!(displacement_power_midpoint(1.5), 3);
        assert_eq!(displacement_power_midpoint(4.0), 6);
        assert_eq!(displacement_power_midpoint(5.7), 9);
        assert_eq!(displacement_power_midpoint(27.0), 14);
    }

    #[test]
    fn drive_bonus_and_size_penalty() {
        assert_eq!(DriveType::Tracks.maneuver_bonus(), -1);
        assert_eq!(DriveType::FourWheel.maneuver_bonus(), 3);
        assert_eq!(SizeCategory::Oversized.maneuver_penalty(), 4);
        assert_eq!(SizeCategory::Compact.durability_modifier(), -10);
        assert_eq!(SizeCategory::Large.cargo_range(), (12, 20));
    }

    #[test]
    fn military_multipliers_scale_with_class() {
        assert!((MilitaryCategory::NotApplicable.maintenance_multiplier() - 1.0).abs() < f64::EPSILON);
        assert!(
            (MilitaryCategory::Class(MilitaryClass::Specialized).maintenance_multiplier() - 4.0).abs()
                < f64::EPSILON
        );
        assert_eq!(VehicleType::Military.fuel_capacity(), 500);
        assert_eq!(VehicleType::Specialty.base_durability(), 100);
    }
}
