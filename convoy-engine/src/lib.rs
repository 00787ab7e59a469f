//! Convoy Statistics Engine
//!
//! Platform-agnostic calculation and state library for vehicles and convoys.
//! Derives vehicle statistics from specifications, tracks condition and cargo
//! per vehicle, and aggregates convoys into operational projections. This
//! crate performs no I/O; callers supply specs and own storage.

pub mod cargo;
pub mod categorize;
pub mod compare;
pub mod condition;
pub mod config;
pub mod constants;
pub mod convoy;
pub mod fleet;
pub mod formulas;
pub mod numbers;
pub mod recommend;
pub mod spec;
pub mod tables;
pub mod travel;
pub mod vehicle;

// Re-export commonly used types
pub use cargo::{CargoError, CargoHold, CargoItem, CargoReceipt, NewCargo};
pub use categorize::{Categories, ComplexityLevel, MilitaryCategory, SizeCategory, categorize};
pub use compare::{Comparison, ConvoyComparison, compare_convoys};
pub use condition::{
    Condition, ConditionChange, ConditionState, Damage, DamageRecord, MaintenanceRecord, Repair,
    StatCheck,
};
pub use config::{ConfigError, EngineConfig, OperationalParams, SizeModifierScheme};
pub use convoy::{
    Convoy, ConvoyModifiers, ConvoySize, ConvoyStatistics, InvalidModifier, RejectedVehicle,
};
pub use fleet::{ConvoyId, ConvoyOptions, Fleet, FleetError, VehicleId};
pub use formulas::{CargoCategory, Statistics};
pub use recommend::{Focus, MissionRequirements, Recommendation, RecommendationStats, recommend};
pub use spec::{DriveType, MilitaryClass, UnknownVariant, VehicleSpec, VehicleType};
pub use travel::{FuelPlan, TravelError, TravelPlan, TravelTime, plan_travel};
pub use vehicle::{
    RequiredField, ValidationError, ValidationErrors, Vehicle, VehicleError, VehicleProfile,
    VehicleSummary,
};

/// Build a vehicle from a spec. Invalid specs yield a vehicle that carries
/// its validation errors and no statistics.
#[must_use]
pub fn build_vehicle(spec: VehicleSpec) -> Vehicle {
    Vehicle::build(spec)
}

/// Apply damage to a standalone vehicle.
///
/// # Errors
///
/// Fails when the vehicle has no statistics.
pub fn apply_damage(vehicle: &mut Vehicle, damage: &Damage) -> Result<ConditionChange, VehicleError> {
    vehicle.apply_damage(damage)
}

/// Repair a standalone vehicle.
///
/// # Errors
///
/// Fails when the vehicle has no statistics.
pub fn repair(vehicle: &mut Vehicle, repair: &Repair) -> Result<ConditionChange, VehicleError> {
    vehicle.repair(repair)
}

/// Load cargo onto a standalone vehicle.
///
/// # Errors
///
/// Fails when the vehicle has no statistics, otherwise returns the ledger's
/// rejection; nothing changes on error.
pub fn add_cargo(vehicle: &mut Vehicle, cargo: NewCargo) -> Result<CargoReceipt, VehicleError> {
    vehicle.add_cargo(cargo)
}

/// Unload cargo from a standalone vehicle.
///
/// # Errors
///
/// Fails when the vehicle has no statistics or the id is unknown.
pub fn remove_cargo(vehicle: &mut Vehicle, item_id: &str) -> Result<CargoReceipt, VehicleError> {
    vehicle.remove_cargo(item_id)
}

/// Trait for abstracting spec catalog loading
/// Platform-specific implementations should provide this
pub trait SpecCatalog {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load a named list of vehicle specs
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or parsed.
    fn load_specs(&self, catalog_name: &str) -> Result<Vec<VehicleSpec>, Self::Error>;
}

/// Trait for abstracting fleet save/load operations
/// Platform-specific implementations should provide this
pub trait FleetStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save a fleet snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the fleet cannot be saved.
    fn save_fleet(&self, fleet_name: &str, fleet: &Fleet) -> Result<(), Self::Error>;

    /// Load a fleet snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the fleet cannot be loaded.
    fn load_fleet(&self, fleet_name: &str) -> Result<Option<Fleet>, Self::Error>;

    /// Delete a saved fleet
    ///
    /// # Errors
    ///
    /// Returns an error if the fleet cannot be deleted.
    fn delete_fleet(&self, fleet_name: &str) -> Result<(), Self::Error>;
}

/// Binds a spec catalog and fleet storage to one engine configuration.
pub struct ConvoyEngine<L, S>
where
    L: SpecCatalog,
    S: FleetStorage,
{
    catalog: L,
    storage: S,
    config: EngineConfig,
}

impl<L, S> ConvoyEngine<L, S>
where
    L: SpecCatalog,
    S: FleetStorage,
{
    /// Create an engine with the default configuration
    #[must_use]
    pub fn new(catalog: L, storage: S) -> Self {
        Self::with_config(catalog, storage, EngineConfig::default())
    }

    #[must_use]
    pub const fn with_config(catalog: L, storage: S, config: EngineConfig) -> Self {
        Self {
            catalog,
            storage,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a fresh fleet holding one convoy made from a catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn fleet_from_catalog(
        &self,
        catalog_name: &str,
        convoy_name: &str,
    ) -> Result<(Fleet, ConvoyId), anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let specs = self
            .catalog
            .load_specs(catalog_name)
            .map_err(Into::<anyhow::Error>::into)?;
        let mut fleet = Fleet::new(self.config);
        let id = fleet.build_convoy(convoy_name, specs, ConvoyOptions::default())?;
        Ok((fleet, id))
    }

    /// Recommend convoys from a catalog of available vehicles.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn recommend(
        &self,
        requirements: &MissionRequirements,
        catalog_name: &str,
    ) -> Result<Vec<Recommendation>, L::Error> {
        let specs = self.catalog.load_specs(catalog_name)?;
        Ok(recommend::recommend_with_config(
            requirements,
            &specs,
            &self.config,
        ))
    }

    /// Save a fleet snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the fleet cannot be saved.
    pub fn save_fleet(&self, fleet_name: &str, fleet: &Fleet) -> Result<(), S::Error> {
        self.storage.save_fleet(fleet_name, fleet)
    }

    /// Load a fleet snapshot and restore its derived state
    ///
    /// # Errors
    ///
    /// Returns an error if the fleet cannot be loaded or carries
    /// out-of-bounds configuration.
    pub fn load_fleet(&self, fleet_name: &str) -> Result<Option<Fleet>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let loaded = self
            .storage
            .load_fleet(fleet_name)
            .map_err(Into::<anyhow::Error>::into)?;
        let Some(mut fleet) = loaded else {
            return Ok(None);
        };
        fleet.rehydrate()?;
        Ok(Some(fleet))
    }

    /// Delete a saved fleet
    ///
    /// # Errors
    ///
    /// Returns an error if the fleet cannot be deleted.
    pub fn delete_fleet(&self, fleet_name: &str) -> Result<(), S::Error> {
        self.storage.delete_fleet(fleet_name)
    }
}
