//! Fleet registry: the single owner of vehicles and convoys.
//!
//! Convoys refer to vehicles by id. Every vehicle mutation goes through the
//! fleet so that each convoy containing the vehicle is recomputed before the
//! call returns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

use crate::cargo::{CargoError, CargoReceipt, NewCargo};
use crate::condition::{ConditionChange, Damage, Repair};
use crate::config::{ConfigError, EngineConfig, OperationalParams};
use crate::convoy::{Convoy, InvalidModifier, RejectedVehicle};
use crate::spec::VehicleSpec;
use crate::vehicle::{ValidationErrors, Vehicle, VehicleError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConvoyId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VehicleId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for ConvoyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConvoyId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("vehicle {0} not found")]
    VehicleNotFound(VehicleId),
    #[error("convoy {0} not found")]
    ConvoyNotFound(ConvoyId),
    #[error(transparent)]
    Vehicle(VehicleError),
    #[error(transparent)]
    Cargo(#[from] CargoError),
    #[error(transparent)]
    InvalidModifier(#[from] InvalidModifier),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid fleet snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl From<VehicleError> for FleetError {
    fn from(err: VehicleError) -> Self {
        match err {
            VehicleError::Cargo(err) => Self::Cargo(err),
            other => Self::Vehicle(other),
        }
    }
}

/// Optional settings applied when building a convoy from specs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvoyOptions {
    #[serde(default)]
    pub terrain_modifier: Option<f64>,
    #[serde(default)]
    pub weather_modifier: Option<f64>,
    #[serde(default)]
    pub operational_params: Option<OperationalParams>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fleet {
    #[serde(default)]
    config: EngineConfig,
    #[serde(default)]
    vehicles: BTreeMap<VehicleId, Vehicle>,
    #[serde(default)]
    convoys: BTreeMap<ConvoyId, Convoy>,
    #[serde(default)]
    next_vehicle_id: u64,
    #[serde(default)]
    next_convoy_id: u64,
}

impl Fleet {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Parse a fleet snapshot and restore its derived state.
    ///
    /// # Errors
    ///
    /// Returns `Snapshot` for malformed input and `Config` when the stored
    /// configuration is out of bounds.
    pub fn from_json(source: &str) -> Result<Self, FleetError> {
        let mut fleet: Self = serde_json::from_str(source)?;
        fleet.rehydrate()?;
        Ok(fleet)
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the configuration and recompute every convoy.
    ///
    /// # Errors
    ///
    /// Returns `Config` when the configuration is out of bounds.
    pub fn set_config(&mut self, config: EngineConfig) -> Result<(), FleetError> {
        config.validate()?;
        self.config = config;
        self.refresh_all();
        Ok(())
    }

    #[must_use]
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    pub fn vehicles(&self) -> impl Iterator<Item = (VehicleId, &Vehicle)> {
        self.vehicles.iter().map(|(id, vehicle)| (*id, vehicle))
    }

    #[must_use]
    pub fn convoy(&self, id: ConvoyId) -> Option<&Convoy> {
        self.convoys.get(&id)
    }

    pub fn convoys(&self) -> impl Iterator<Item = (ConvoyId, &Convoy)> {
        self.convoys.iter().map(|(id, convoy)| (*id, convoy))
    }

    /// Members of a convoy in insertion order.
    #[must_use]
    pub fn convoy_members(&self, id: ConvoyId) -> Vec<&Vehicle> {
        self.convoys
            .get(&id)
            .map(|convoy| members_of(convoy, &self.vehicles))
            .unwrap_or_default()
    }

    /// Build a vehicle from a spec and register it.
    ///
    /// # Errors
    ///
    /// Returns `Vehicle(Invalid)` when the spec fails validation.
    pub fn add_vehicle(&mut self, spec: VehicleSpec) -> Result<VehicleId, FleetError> {
        let vehicle = Vehicle::try_build(spec).map_err(VehicleError::Invalid)?;
        Ok(self.register(vehicle))
    }

    /// Register an already built vehicle.
    ///
    /// # Errors
    ///
    /// Returns `Vehicle` when the vehicle is invalid or has no statistics.
    pub fn insert_vehicle(&mut self, mut vehicle: Vehicle) -> Result<VehicleId, FleetError> {
        if !vehicle.errors().is_empty() {
            return Err(VehicleError::Invalid(ValidationErrors(vehicle.errors().to_vec())).into());
        }
        if !vehicle.is_valid() {
            return Err(VehicleError::NotOperational.into());
        }
        vehicle.ensure_state();
        Ok(self.register(vehicle))
    }

    /// Remove a vehicle from the fleet and from every convoy.
    ///
    /// # Errors
    ///
    /// Returns `VehicleNotFound` for an unknown id.
    pub fn remove_vehicle(&mut self, id: VehicleId) -> Result<Vehicle, FleetError> {
        let vehicle = self
            .vehicles
            .remove(&id)
            .ok_or(FleetError::VehicleNotFound(id))?;
        for convoy in self.convoys.values_mut() {
            if convoy.remove_vehicle(id) {
                let members = members_of(convoy, &self.vehicles);
                convoy.recompute(&members, &self.config);
            }
        }
        Ok(vehicle)
    }

    /// Create an empty convoy using the configured operational defaults.
    pub fn create_convoy(&mut self, name: impl Into<String>) -> ConvoyId {
        self.next_convoy_id += 1;
        let id = ConvoyId(self.next_convoy_id);
        let mut convoy = Convoy::new(name, self.config.operational);
        convoy.recompute(&[], &self.config);
        self.convoys.insert(id, convoy);
        id
    }

    /// Build a convoy from specs. Invalid specs are skipped and recorded on
    /// the convoy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidModifier` for a non-finite modifier and `Config` for
    /// out-of-range operational params. Nothing is registered on error.
    pub fn build_convoy(
        &mut self,
        name: impl Into<String>,
        specs: Vec<VehicleSpec>,
        options: ConvoyOptions,
    ) -> Result<ConvoyId, FleetError> {
        let mut convoy = Convoy::new(name, self.config.operational);
        if let Some(terrain) = options.terrain_modifier {
            convoy.set_terrain_modifier(terrain)?;
        }
        if let Some(weather) = options.weather_modifier {
            convoy.set_weather_modifier(weather)?;
        }
        if let Some(params) = options.operational_params {
            params.validate()?;
            convoy.set_operational_params(params);
        }

        for spec in specs {
            match Vehicle::try_build(spec.clone()) {
                Ok(vehicle) => {
                    let id = self.register(vehicle);
                    convoy.push_vehicle(id);
                }
                Err(errors) => {
                    log::warn!(
                        "skipping '{}' in convoy '{}': {errors}",
                        spec.display_name(),
                        convoy.name()
                    );
                    convoy.record_rejection(RejectedVehicle {
                        name: spec.display_name(),
                        errors: errors.0,
                    });
                }
            }
        }

        let members = members_of(&convoy, &self.vehicles);
        convoy.recompute(&members, &self.config);
        self.next_convoy_id += 1;
        let id = ConvoyId(self.next_convoy_id);
        self.convoys.insert(id, convoy);
        Ok(id)
    }

    /// Remove a convoy; its vehicles stay in the fleet.
    ///
    /// # Errors
    ///
    /// Returns `ConvoyNotFound` for an unknown id.
    pub fn remove_convoy(&mut self, id: ConvoyId) -> Result<Convoy, FleetError> {
        self.convoys.remove(&id).ok_or(FleetError::ConvoyNotFound(id))
    }

    /// Add a fleet vehicle to a convoy. Adding a member twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ConvoyNotFound` or `VehicleNotFound` for unknown ids.
    pub fn add_to_convoy(&mut self, convoy_id: ConvoyId, vehicle_id: VehicleId) -> Result<(), FleetError> {
        if !self.vehicles.contains_key(&vehicle_id) {
            return Err(FleetError::VehicleNotFound(vehicle_id));
        }
        self.with_convoy_mut(convoy_id, |convoy| {
            convoy.push_vehicle(vehicle_id);
            Ok(())
        })
    }

    /// Detach a vehicle from a convoy. Returns whether it was a member.
    ///
    /// # Errors
    ///
    /// Returns `ConvoyNotFound` for an unknown convoy.
    pub fn remove_from_convoy(
        &mut self,
        convoy_id: ConvoyId,
        vehicle_id: VehicleId,
    ) -> Result<bool, FleetError> {
        self.with_convoy_mut(convoy_id, |convoy| Ok(convoy.remove_vehicle(vehicle_id)))
    }

    /// Set the terrain modifier, clamped into `[0.1, 1.0]`. Returns the stored value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidModifier` for non-finite input, `ConvoyNotFound` for an unknown convoy.
    pub fn set_terrain_modifier(&mut self, convoy_id: ConvoyId, value: f64) -> Result<f64, FleetError> {
        self.with_convoy_mut(convoy_id, |convoy| Ok(convoy.set_terrain_modifier(value)?))
    }

    /// Set the weather modifier, clamped into `[0.1, 1.0]`. Returns the stored value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidModifier` for non-finite input, `ConvoyNotFound` for an unknown convoy.
    pub fn set_weather_modifier(&mut self, convoy_id: ConvoyId, value: f64) -> Result<f64, FleetError> {
        self.with_convoy_mut(convoy_id, |convoy| Ok(convoy.set_weather_modifier(value)?))
    }

    /// # Errors
    ///
    /// Returns `Config` when the params are out of bounds.
    pub fn set_operational_params(
        &mut self,
        convoy_id: ConvoyId,
        params: OperationalParams,
    ) -> Result<(), FleetError> {
        params.validate()?;
        self.with_convoy_mut(convoy_id, |convoy| {
            convoy.set_operational_params(params);
            Ok(())
        })
    }

    /// # Errors
    ///
    /// Returns `VehicleNotFound` or the vehicle's rejection.
    pub fn apply_damage(&mut self, id: VehicleId, damage: &Damage) -> Result<ConditionChange, FleetError> {
        self.with_vehicle_mut(id, |vehicle| Ok(vehicle.apply_damage(damage)?))
    }

    /// # Errors
    ///
    /// Returns `VehicleNotFound` or the vehicle's rejection.
    pub fn repair(&mut self, id: VehicleId, repair: &Repair) -> Result<ConditionChange, FleetError> {
        self.with_vehicle_mut(id, |vehicle| Ok(vehicle.repair(repair)?))
    }

    /// # Errors
    ///
    /// Returns `VehicleNotFound` or the ledger's rejection.
    pub fn add_cargo(&mut self, id: VehicleId, cargo: NewCargo) -> Result<CargoReceipt, FleetError> {
        self.with_vehicle_mut(id, |vehicle| Ok(vehicle.add_cargo(cargo)?))
    }

    /// # Errors
    ///
    /// Returns `VehicleNotFound` or the ledger's rejection.
    pub fn remove_cargo(&mut self, id: VehicleId, item_id: &str) -> Result<CargoReceipt, FleetError> {
        self.with_vehicle_mut(id, |vehicle| Ok(vehicle.remove_cargo(item_id)?))
    }

    /// # Errors
    ///
    /// Returns `VehicleNotFound` or the respec rejection; the vehicle is
    /// unchanged on error.
    pub fn respec(&mut self, id: VehicleId, spec: VehicleSpec) -> Result<(), FleetError> {
        self.with_vehicle_mut(id, |vehicle| Ok(vehicle.respec(spec)?))
    }

    /// Restore derived state after deserialization: lazily created vehicle
    /// state, dangling convoy members, modifier bounds, id sequences and
    /// convoy statistics.
    ///
    /// # Errors
    ///
    /// Returns `Config` when the fleet or a convoy carries out-of-bounds
    /// params.
    pub fn rehydrate(&mut self) -> Result<(), FleetError> {
        self.config.validate()?;
        for convoy in self.convoys.values_mut() {
            convoy.operational_params().validate()?;
            convoy.restore_modifiers()?;
        }
        for vehicle in self.vehicles.values_mut() {
            vehicle.ensure_state();
        }
        let known: Vec<VehicleId> = self.vehicles.keys().copied().collect();
        for convoy in self.convoys.values_mut() {
            for id in convoy.vehicle_ids().to_vec() {
                if !known.contains(&id) {
                    log::warn!("dropping unknown vehicle {id} from convoy '{}'", convoy.name());
                    convoy.remove_vehicle(id);
                }
            }
        }
        let highest_vehicle = self.vehicles.keys().map(|id| id.0).max().unwrap_or(0);
        self.next_vehicle_id = self.next_vehicle_id.max(highest_vehicle);
        let highest_convoy = self.convoys.keys().map(|id| id.0).max().unwrap_or(0);
        self.next_convoy_id = self.next_convoy_id.max(highest_convoy);
        self.refresh_all();
        Ok(())
    }

    fn register(&mut self, vehicle: Vehicle) -> VehicleId {
        self.next_vehicle_id += 1;
        let id = VehicleId(self.next_vehicle_id);
        log::debug!("registered vehicle {id}: {}", vehicle.full_identifier());
        self.vehicles.insert(id, vehicle);
        id
    }

    /// Run a mutation against one vehicle, then refresh every convoy that
    /// contains it.
    fn with_vehicle_mut<T, F>(&mut self, id: VehicleId, mutate: F) -> Result<T, FleetError>
    where
        F: FnOnce(&mut Vehicle) -> Result<T, FleetError>,
    {
        let vehicle = self
            .vehicles
            .get_mut(&id)
            .ok_or(FleetError::VehicleNotFound(id))?;
        let outcome = mutate(vehicle)?;
        for convoy in self.convoys.values_mut() {
            if convoy.contains(id) {
                let members = members_of(convoy, &self.vehicles);
                convoy.recompute(&members, &self.config);
            }
        }
        Ok(outcome)
    }

    fn with_convoy_mut<T, F>(&mut self, id: ConvoyId, mutate: F) -> Result<T, FleetError>
    where
        F: FnOnce(&mut Convoy) -> Result<T, FleetError>,
    {
        let convoy = self
            .convoys
            .get_mut(&id)
            .ok_or(FleetError::ConvoyNotFound(id))?;
        let outcome = mutate(convoy)?;
        let members = members_of(convoy, &self.vehicles);
        convoy.recompute(&members, &self.config);
        Ok(outcome)
    }

    fn refresh_all(&mut self) {
        for convoy in self.convoys.values_mut() {
            let members = members_of(convoy, &self.vehicles);
            convoy.recompute(&members, &self.config);
        }
    }
}

fn members_of<'a>(convoy: &Convoy, vehicles: &'a BTreeMap<VehicleId, Vehicle>) -> Vec<&'a Vehicle> {
    convoy
        .vehicle_ids()
        .iter()
        .filter_map(|id| vehicles.get(id))
        .collect()
}
