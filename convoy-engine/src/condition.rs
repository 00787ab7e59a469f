//! Vehicle condition: durability depletion, repair and live stat penalties.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    CONDITION_DAMAGED_RATIO, CONDITION_HEAVY_RATIO, DEFAULT_DAMAGE_SOURCE, DEFAULT_DAMAGE_TYPE,
    MIN_SPEED_RATING,
};
use crate::formulas::Statistics;

/// Condition tier derived from the durability ratio. Never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ConditionState {
    #[default]
    Pristine,
    Damaged,
    #[serde(rename = "Heavily Damaged")]
    HeavilyDamaged,
    Critical,
    Destroyed,
}

/// Statistic checks that a damaged vehicle may roll with disadvantage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatCheck {
    Speed,
    Fuel,
    Cargo,
    Maneuverability,
    Durability,
    Power,
    Maintenance,
}

impl ConditionState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pristine => "Pristine",
            Self::Damaged => "Damaged",
            Self::HeavilyDamaged => "Heavily Damaged",
            Self::Critical => "Critical",
            Self::Destroyed => "Destroyed",
        }
    }

    /// Tier for a durability pair. A zero maximum counts as destroyed.
    #[must_use]
    pub fn from_durability(current: u32, max: u32) -> Self {
        if max == 0 || current == 0 {
            return Self::Destroyed;
        }
        let ratio = f64::from(current) / f64::from(max);
        if ratio >= 1.0 {
            Self::Pristine
        } else if ratio >= CONDITION_DAMAGED_RATIO {
            Self::Damaged
        } else if ratio >= CONDITION_HEAVY_RATIO {
            Self::HeavilyDamaged
        } else {
            Self::Critical
        }
    }

    /// Live statistics for this tier, always derived from the base reference.
    #[must_use]
    pub const fn penalize(self, base: &Statistics) -> Statistics {
        let mut live = *base;
        match self {
            Self::Pristine => {}
            Self::Damaged => {
                live.fuel_consumption = live.fuel_consumption.saturating_add(1);
            }
            Self::HeavilyDamaged => {
                let halved = live.speed_rating / 2;
                live.speed_rating = if halved > MIN_SPEED_RATING {
                    halved
                } else {
                    MIN_SPEED_RATING
                };
                live.fuel_consumption = live.fuel_consumption.saturating_add(2);
                live.maintenance_cost = live.maintenance_cost.saturating_mul(2);
            }
            Self::Critical => {
                live.speed_rating = 0;
                live.fuel_consumption = live.fuel_consumption.saturating_add(3);
                live.maintenance_cost = live.maintenance_cost.saturating_mul(3);
            }
            Self::Destroyed => {
                live.speed_rating = 0;
                live.fuel_consumption = 0;
                live.power_rating = 0;
            }
        }
        live.sync_sustainable_speed();
        live
    }

    /// Advisory only; never alters a statistic.
    #[must_use]
    pub const fn has_disadvantage(self, check: StatCheck) -> bool {
        match self {
            Self::Pristine | Self::Destroyed => false,
            Self::Damaged => matches!(check, StatCheck::Power),
            Self::HeavilyDamaged => matches!(check, StatCheck::Maneuverability | StatCheck::Power),
            Self::Critical => true,
        }
    }

    #[must_use]
    pub const fn is_operational(self) -> bool {
        !matches!(self, Self::Destroyed)
    }
}

impl fmt::Display for ConditionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A damage event to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Damage {
    /// Requested amount; clamped into `[0, current durability]` when applied.
    pub amount: i64,
    #[serde(rename = "type", alias = "damageType", default = "Damage::default_type")]
    pub damage_type: String,
    #[serde(default = "Damage::default_source")]
    pub source: String,
}

impl Damage {
    #[must_use]
    pub fn new(amount: i64) -> Self {
        Self {
            amount,
            damage_type: Self::default_type(),
            source: Self::default_source(),
        }
    }

    #[must_use]
    pub fn with_type(mut self, damage_type: impl Into<String>) -> Self {
        self.damage_type = damage_type.into();
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    fn default_type() -> String {
        DEFAULT_DAMAGE_TYPE.to_string()
    }

    fn default_source() -> String {
        DEFAULT_DAMAGE_SOURCE.to_string()
    }
}

/// A maintenance action to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repair {
    /// Requested amount; clamped into `[0, missing durability]` when applied.
    pub amount: i64,
    #[serde(default)]
    pub parts_cost: u32,
    /// Hours spent on the repair.
    #[serde(default)]
    pub time_spent: f64,
    #[serde(default)]
    pub notes: String,
}

impl Repair {
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self {
            amount,
            parts_cost: 0,
            time_spent: 0.0,
            notes: String::new(),
        }
    }

    #[must_use]
    pub const fn with_costs(mut self, parts_cost: u32, time_spent: f64) -> Self {
        self.parts_cost = parts_cost;
        self.time_spent = time_spent;
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageRecord {
    pub amount: u32,
    #[serde(rename = "type", alias = "damageType")]
    pub damage_type: String,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub durability_after: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub repair_amount: u32,
    pub parts_cost: u32,
    pub time_spent: f64,
    pub notes: String,
    pub timestamp: DateTime<Utc>,
    pub durability_after: u32,
}

/// Outcome of a damage or repair call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionChange {
    /// Amount actually applied after clamping.
    pub actual_amount: u32,
    pub new_durability: u32,
    pub condition_state: ConditionState,
    pub previous_state: ConditionState,
}

impl ConditionChange {
    #[must_use]
    pub fn state_changed(&self) -> bool {
        self.condition_state != self.previous_state
    }
}

/// Mutable durability ledger for one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    current_durability: u32,
    max_durability: u32,
    condition_state: ConditionState,
    #[serde(default)]
    damage_history: Vec<DamageRecord>,
    #[serde(default)]
    maintenance_history: Vec<MaintenanceRecord>,
}

impl Condition {
    /// Fresh condition at full durability.
    #[must_use]
    pub fn new(max_durability: u32) -> Self {
        Self {
            current_durability: max_durability,
            max_durability,
            condition_state: ConditionState::from_durability(max_durability, max_durability),
            damage_history: Vec::new(),
            maintenance_history: Vec::new(),
        }
    }

    #[must_use]
    pub const fn current_durability(&self) -> u32 {
        self.current_durability
    }

    #[must_use]
    pub const fn max_durability(&self) -> u32 {
        self.max_durability
    }

    #[must_use]
    pub const fn state(&self) -> ConditionState {
        self.condition_state
    }

    #[must_use]
    pub fn damage_history(&self) -> &[DamageRecord] {
        &self.damage_history
    }

    #[must_use]
    pub fn maintenance_history(&self) -> &[MaintenanceRecord] {
        &self.maintenance_history
    }

    /// Durability as a fraction of maximum; 0 when the maximum is 0.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.max_durability == 0 {
            0.0
        } else {
            f64::from(self.current_durability) / f64::from(self.max_durability)
        }
    }

    pub fn apply_damage(&mut self, damage: &Damage) -> ConditionChange {
        self.apply_damage_at(damage, Utc::now())
    }

    pub fn apply_damage_at(&mut self, damage: &Damage, at: DateTime<Utc>) -> ConditionChange {
        self.normalize();
        let actual = clamp_amount(damage.amount, self.current_durability);
        self.current_durability -= actual;
        self.damage_history.push(DamageRecord {
            amount: actual,
            damage_type: damage.damage_type.clone(),
            source: damage.source.clone(),
            timestamp: at,
            durability_after: self.current_durability,
        });
        self.transition(actual)
    }

    pub fn repair(&mut self, repair: &Repair) -> ConditionChange {
        self.repair_at(repair, Utc::now())
    }

    pub fn repair_at(&mut self, repair: &Repair, at: DateTime<Utc>) -> ConditionChange {
        self.normalize();
        let missing = self.max_durability.saturating_sub(self.current_durability);
        let actual = clamp_amount(repair.amount, missing);
        self.current_durability += actual;
        self.maintenance_history.push(MaintenanceRecord {
            repair_amount: actual,
            parts_cost: repair.parts_cost,
            time_spent: repair.time_spent,
            notes: repair.notes.clone(),
            timestamp: at,
            durability_after: self.current_durability,
        });
        self.transition(actual)
    }

    /// Shift both durability values by the change in base durability.
    pub fn rebase(&mut self, new_max: u32) {
        let delta = i64::from(new_max) - i64::from(self.max_durability);
        let shifted = (i64::from(self.current_durability) + delta).clamp(0, i64::from(new_max));
        self.max_durability = new_max;
        self.current_durability = u32::try_from(shifted).unwrap_or(new_max);
        self.transition(0);
    }

    /// Restore the durability invariant on records loaded from outside.
    pub(crate) fn normalize(&mut self) {
        self.current_durability = self.current_durability.min(self.max_durability);
        self.condition_state =
            ConditionState::from_durability(self.current_durability, self.max_durability);
    }

    fn transition(&mut self, actual: u32) -> ConditionChange {
        let previous = self.condition_state;
        self.condition_state =
            ConditionState::from_durability(self.current_durability, self.max_durability);
        if previous != self.condition_state {
            log::debug!(
                "condition {previous} -> {} at {}/{}",
                self.condition_state,
                self.current_durability,
                self.max_durability
            );
        }
        ConditionChange {
            actual_amount: actual,
            new_durability: self.current_durability,
            condition_state: self.condition_state,
            previous_state: previous,
        }
    }
}

fn clamp_amount(requested: i64, limit: u32) -> u32 {
    u32::try_from(requested.clamp(0, i64::from(limit))).unwrap_or(0)
}
