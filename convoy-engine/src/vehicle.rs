//! Vehicle aggregate: validated spec, categories, base and live statistics,
//! plus the condition and cargo state owned by the vehicle.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::cargo::{CargoError, CargoHold, CargoReceipt, NewCargo};
use crate::categorize::{Categories, ComplexityLevel, SizeCategory, categorize};
use crate::condition::{Condition, ConditionChange, ConditionState, Damage, Repair, StatCheck};
use crate::formulas::{Statistics, compute_statistics};
use crate::spec::{VehicleSpec, VehicleType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequiredField {
    TopSpeed,
    VehicleType,
    DriveType,
}

impl RequiredField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopSpeed => "topSpeed",
            Self::VehicleType => "vehicleType",
            Self::DriveType => "driveType",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One violated validation rule.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    MissingField { field: RequiredField },
    #[error("Top speed must be greater than 0 (got {value})")]
    NonPositiveTopSpeed { value: f64 },
    #[error("Cylinders must be greater than 0 if specified (got {value})")]
    NonPositiveCylinders { value: i32 },
    #[error("Displacement must be greater than 0 if specified (got {value})")]
    NonPositiveDisplacement { value: f64 },
    #[error("Horsepower cannot be negative (got {value})")]
    NegativeHorsepower { value: i32 },
}

/// Every violation found in a spec, in rule order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VehicleError {
    #[error("vehicle is invalid: {0}")]
    Invalid(ValidationErrors),
    #[error("vehicle has no computed statistics")]
    NotOperational,
    #[error("current load {load} exceeds new cargo capacity {capacity}")]
    CargoOverCapacity { load: f64, capacity: u32 },
    #[error(transparent)]
    Cargo(#[from] CargoError),
}

/// Collect every rule the spec violates.
#[must_use]
pub fn validate(spec: &VehicleSpec) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if spec.top_speed.is_none() {
        errors.push(ValidationError::MissingField {
            field: RequiredField::TopSpeed,
        });
    }
    if spec.vehicle_type.is_none() {
        errors.push(ValidationError::MissingField {
            field: RequiredField::VehicleType,
        });
    }
    if spec.drive_type.is_none() {
        errors.push(ValidationError::MissingField {
            field: RequiredField::DriveType,
        });
    }
    if let Some(value) = spec.top_speed
        && !(value > 0.0 && value.is_finite())
    {
        errors.push(ValidationError::NonPositiveTopSpeed { value });
    }
    if let Some(value) = spec.cylinders
        && value <= 0
    {
        errors.push(ValidationError::NonPositiveCylinders { value });
    }
    if let Some(value) = spec.displacement
        && !(value > 0.0 && value.is_finite())
    {
        errors.push(ValidationError::NonPositiveDisplacement { value });
    }
    if let Some(value) = spec.horsepower
        && value < 0
    {
        errors.push(ValidationError::NegativeHorsepower { value });
    }
    errors
}

/// Categories and statistics of a valid vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleProfile {
    pub categories: Categories,
    /// Unmodified reference statistics.
    pub base_statistics: Statistics,
    /// Base statistics with the current condition penalties applied.
    pub live_statistics: Statistics,
}

impl VehicleProfile {
    fn from_spec(spec: &VehicleSpec) -> Result<Self, ValidationErrors> {
        let errors = validate(spec);
        let (Some(top_speed), Some(vehicle_type), Some(drive_type), true) = (
            spec.top_speed,
            spec.vehicle_type,
            spec.drive_type,
            errors.is_empty(),
        ) else {
            return Err(ValidationErrors(errors));
        };
        let categories = categorize(spec, vehicle_type);
        let base = compute_statistics(spec, top_speed, drive_type, &categories);
        Ok(Self {
            categories,
            base_statistics: base,
            live_statistics: base,
        })
    }
}

/// Key figures used by convoy listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub name: String,
    pub speed_rating: u32,
    pub fuel_consumption: u32,
    pub cargo_capacity: u32,
    pub maneuverability: u32,
    pub durability: u32,
    pub power_rating: u32,
    pub maintenance_cost: u32,
    pub is_military: bool,
    pub size_category: SizeCategory,
    pub type_category: VehicleType,
    pub condition_state: ConditionState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    spec: VehicleSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile: Option<VehicleProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cargo: Option<CargoHold>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ValidationError>,
}

impl Vehicle {
    /// Build a vehicle. Invalid specs yield a vehicle carrying its errors and
    /// no statistics.
    #[must_use]
    pub fn build(spec: VehicleSpec) -> Self {
        match VehicleProfile::from_spec(&spec) {
            Ok(profile) => Self {
                spec,
                condition: Some(Condition::new(profile.base_statistics.durability)),
                cargo: Some(CargoHold::new(profile.base_statistics.cargo_capacity)),
                profile: Some(profile),
                errors: Vec::new(),
            },
            Err(errors) => Self {
                spec,
                profile: None,
                condition: None,
                cargo: None,
                errors: errors.0,
            },
        }
    }

    /// Build a vehicle, or return its validation errors.
    ///
    /// # Errors
    ///
    /// Returns every validation error when the spec is invalid.
    pub fn try_build(spec: VehicleSpec) -> Result<Self, ValidationErrors> {
        let vehicle = Self::build(spec);
        if vehicle.errors.is_empty() {
            Ok(vehicle)
        } else {
            Err(ValidationErrors(vehicle.errors))
        }
    }

    #[must_use]
    pub const fn spec(&self) -> &VehicleSpec {
        &self.spec
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.profile.is_some()
    }

    #[must_use]
    pub const fn profile(&self) -> Option<&VehicleProfile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub fn categories(&self) -> Option<&Categories> {
        self.profile.as_ref().map(|p| &p.categories)
    }

    #[must_use]
    pub fn base_statistics(&self) -> Option<&Statistics> {
        self.profile.as_ref().map(|p| &p.base_statistics)
    }

    /// Statistics after condition penalties.
    #[must_use]
    pub fn live_statistics(&self) -> Option<&Statistics> {
        self.profile.as_ref().map(|p| &p.live_statistics)
    }

    #[must_use]
    pub const fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    #[must_use]
    pub fn condition_state(&self) -> Option<ConditionState> {
        self.condition.as_ref().map(Condition::state)
    }

    #[must_use]
    pub const fn cargo(&self) -> Option<&CargoHold> {
        self.cargo.as_ref()
    }

    #[must_use]
    pub fn is_military(&self) -> bool {
        self.spec.is_military()
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        self.spec.display_name()
    }

    #[must_use]
    pub fn full_identifier(&self) -> String {
        self.spec.full_identifier()
    }

    #[must_use]
    pub fn complexity(&self) -> Option<ComplexityLevel> {
        self.categories().map(|c| c.complexity_level)
    }

    /// Whether the current condition imposes disadvantage on a check.
    #[must_use]
    pub fn has_disadvantage(&self, check: StatCheck) -> bool {
        self.condition_state()
            .is_some_and(|state| state.has_disadvantage(check))
    }

    #[must_use]
    pub fn summary(&self) -> Option<VehicleSummary> {
        let profile = self.profile.as_ref()?;
        let live = &profile.live_statistics;
        Some(VehicleSummary {
            name: self.display_name(),
            speed_rating: live.speed_rating,
            fuel_consumption: live.fuel_consumption,
            cargo_capacity: live.cargo_capacity,
            maneuverability: live.maneuverability,
            durability: live.durability,
            power_rating: live.power_rating,
            maintenance_cost: live.maintenance_cost,
            is_military: self.is_military(),
            size_category: profile.categories.size_category,
            type_category: profile.categories.type_category,
            condition_state: self.condition_state().unwrap_or_default(),
        })
    }

    /// Apply damage now.
    ///
    /// # Errors
    ///
    /// Fails when the vehicle has no statistics.
    pub fn apply_damage(&mut self, damage: &Damage) -> Result<ConditionChange, VehicleError> {
        self.apply_damage_at(damage, Utc::now())
    }

    /// Apply damage with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Fails when the vehicle has no statistics.
    pub fn apply_damage_at(
        &mut self,
        damage: &Damage,
        at: DateTime<Utc>,
    ) -> Result<ConditionChange, VehicleError> {
        let condition = self.operational_condition()?;
        let change = condition.apply_damage_at(damage, at);
        self.refresh_live_statistics();
        Ok(change)
    }

    /// Repair now.
    ///
    /// # Errors
    ///
    /// Fails when the vehicle has no statistics.
    pub fn repair(&mut self, repair: &Repair) -> Result<ConditionChange, VehicleError> {
        self.repair_at(repair, Utc::now())
    }

    /// Repair with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Fails when the vehicle has no statistics.
    pub fn repair_at(
        &mut self,
        repair: &Repair,
        at: DateTime<Utc>,
    ) -> Result<ConditionChange, VehicleError> {
        let condition = self.operational_condition()?;
        let change = condition.repair_at(repair, at);
        self.refresh_live_statistics();
        Ok(change)
    }

    /// Load an item. A vehicle without statistics has no capacity.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` or `NotOperational` for a vehicle without statistics,
    /// otherwise the ledger's rejection; nothing changes on error.
    pub fn add_cargo(&mut self, cargo: NewCargo) -> Result<CargoReceipt, VehicleError> {
        self.add_cargo_at(cargo, Utc::now())
    }

    /// [`Vehicle::add_cargo`] with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Same rejections as [`Vehicle::add_cargo`].
    pub fn add_cargo_at(
        &mut self,
        cargo: NewCargo,
        at: DateTime<Utc>,
    ) -> Result<CargoReceipt, VehicleError> {
        Ok(self.operational_cargo()?.add_item_at(cargo, at)?)
    }

    /// Unload an item by id.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` or `NotOperational` for a vehicle without statistics
    /// and `NotFound` for an unknown id.
    pub fn remove_cargo(&mut self, item_id: &str) -> Result<CargoReceipt, VehicleError> {
        Ok(self.operational_cargo()?.remove_item(item_id)?)
    }

    /// Recompute categories and statistics from a new spec while keeping the
    /// condition history and loaded cargo.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for an invalid spec and `CargoOverCapacity` when the
    /// loaded cargo would not fit the new capacity. The vehicle is unchanged
    /// on error.
    pub fn respec(&mut self, spec: VehicleSpec) -> Result<(), VehicleError> {
        let profile = VehicleProfile::from_spec(&spec).map_err(VehicleError::Invalid)?;
        let base = profile.base_statistics;
        if self.profile.is_none() {
            *self = Self::build(spec);
            return Ok(());
        }
        self.ensure_state();
        if let Some(hold) = self.cargo.as_mut() {
            let load = hold.current_load();
            hold.resync_capacity(base.cargo_capacity)
                .map_err(|_| VehicleError::CargoOverCapacity {
                    load,
                    capacity: base.cargo_capacity,
                })?;
        }
        if let Some(condition) = self.condition.as_mut() {
            condition.rebase(base.durability);
        }
        log::debug!("respec {} -> {}", self.spec.full_identifier(), spec.full_identifier());
        self.spec = spec;
        self.profile = Some(profile);
        self.refresh_live_statistics();
        Ok(())
    }

    /// Create missing condition and cargo state for records loaded without
    /// them, restore their invariants and re-derive live statistics.
    pub fn ensure_state(&mut self) {
        let Some(profile) = self.profile.as_mut() else {
            return;
        };
        let base = profile.base_statistics;
        let condition = self
            .condition
            .get_or_insert_with(|| Condition::new(base.durability));
        condition.normalize();
        self.cargo
            .get_or_insert_with(|| CargoHold::new(base.cargo_capacity))
            .normalize();
        profile.live_statistics = condition.state().penalize(&base);
    }

    fn ensure_operational(&mut self) -> Result<(), VehicleError> {
        if !self.errors.is_empty() {
            return Err(VehicleError::Invalid(ValidationErrors(self.errors.clone())));
        }
        if self.profile.is_none() {
            return Err(VehicleError::NotOperational);
        }
        self.ensure_state();
        Ok(())
    }

    fn operational_condition(&mut self) -> Result<&mut Condition, VehicleError> {
        self.ensure_operational()?;
        self.condition.as_mut().ok_or(VehicleError::NotOperational)
    }

    fn operational_cargo(&mut self) -> Result<&mut CargoHold, VehicleError> {
        self.ensure_operational()?;
        self.cargo.as_mut().ok_or(VehicleError::NotOperational)
    }

    fn refresh_live_statistics(&mut self) {
        if let (Some(profile), Some(condition)) = (self.profile.as_mut(), self.condition.as_ref()) {
            profile.live_statistics = condition.state().penalize(&profile.base_statistics);
        }
    }
}
