//! Centralized formula and tuning constants for the convoy engine.
//!
//! These values define the deterministic math for every statistic. Keeping
//! them together ensures the numbers can only be adjusted via code changes
//! reviewed in version control, rather than through external JSON assets.
//! Per-category tables live on the category enums in [`crate::tables`].

// Vehicle formulas ---------------------------------------------------------
pub(crate) const SPEED_DIVISOR: f64 = 16.0;
pub(crate) const SUSTAINABLE_SPEED_FACTOR: u32 = 10;
pub(crate) const HORSEPOWER_PER_POWER_POINT: f64 = 50.0;
pub(crate) const MILITARY_FUEL_PENALTY: f64 = 1.25;
pub(crate) const MILITARY_DURABILITY_BONUS: f64 = 1.5;
pub(crate) const MILITARY_MANEUVER_BONUS: i32 = 2;
pub(crate) const MANEUVER_BASE: i32 = 10;
pub(crate) const MANEUVER_SIZE_PENALTY_SCALE: i32 = 2;
pub(crate) const MAINTENANCE_DIVISOR: f64 = 10.0;
pub(crate) const DEFAULT_POWER_RATING: u32 = 3;

// Statistic floors ---------------------------------------------------------
pub(crate) const MIN_SPEED_RATING: u32 = 1;
pub(crate) const MIN_FUEL_CONSUMPTION: u32 = 1;
pub(crate) const MIN_POWER_RATING: u32 = 1;
pub(crate) const MIN_MANEUVERABILITY: i32 = 1;
pub(crate) const MIN_DURABILITY: u32 = 10;
pub(crate) const MIN_MAINTENANCE_COST: u32 = 1;

// Condition bands (durability ratio) ---------------------------------------
pub(crate) const CONDITION_DAMAGED_RATIO: f64 = 0.5;
pub(crate) const CONDITION_HEAVY_RATIO: f64 = 0.25;

pub(crate) const DEFAULT_DAMAGE_TYPE: &str = "Physical";
pub(crate) const DEFAULT_DAMAGE_SOURCE: &str = "Unknown";
pub(crate) const DEFAULT_CARGO_CATEGORY: &str = "General";
pub(crate) const CARGO_ID_PREFIX: &str = "cargo-";

// Convoy operations --------------------------------------------------------
pub(crate) const DEFAULT_HOURS_PER_DAY: f64 = 8.0;
pub(crate) const DEFAULT_EFFICIENCY: f64 = 0.85;
pub(crate) const DEFAULT_TRAVEL_DAYS_PER_MONTH: u32 = 20;
pub(crate) const DEFAULT_FUEL_RESERVE: f64 = 0.1;
pub(crate) const MODIFIER_MIN: f64 = 0.1;
pub(crate) const MODIFIER_MAX: f64 = 1.0;
pub(crate) const PARTS_COST_PER_MAINTENANCE: f64 = 0.2;
pub(crate) const FUEL_CONSUMPTION_DISTANCE_KM: f64 = 100.0;

// Travel planning ----------------------------------------------------------
pub(crate) const TRAVEL_HOURS_PER_DAY: f64 = 8.0;
pub(crate) const REST_DAY_OVERHEAD: f64 = 1.4;
pub(crate) const REFUEL_USABLE_FRACTION: f64 = 0.9;

// Recommendation heuristics ------------------------------------------------
pub(crate) const DEFAULT_MAX_VEHICLES: usize = 10;
pub(crate) const SPEED_FOCUS_CAP: usize = 3;
pub(crate) const RANGE_FOCUS_CAP: usize = 4;
pub(crate) const BALANCED_FUEL_BASELINE: f64 = 20.0;
pub(crate) const BALANCED_WEIGHT_SPEED: f64 = 0.3;
pub(crate) const BALANCED_WEIGHT_FUEL: f64 = 0.2;
pub(crate) const BALANCED_WEIGHT_CARGO: f64 = 0.2;
pub(crate) const BALANCED_WEIGHT_POWER: f64 = 0.15;
pub(crate) const BALANCED_WEIGHT_MANEUVER: f64 = 0.15;

#[cfg(test)]
pub(crate) const FLOAT_EPSILON: f64 = 1e-9;
