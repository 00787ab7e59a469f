//! Cargo ledger: items loaded against a vehicle's capacity.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{CARGO_ID_PREFIX, DEFAULT_CARGO_CATEGORY};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CargoError {
    #[error("not enough cargo space: requested {requested}, available {available}")]
    CapacityExceeded { requested: f64, available: f64 },
    #[error("cargo item '{0}' not found")]
    NotFound(String),
    #[error("cargo weight must be a positive number, got {0}")]
    InvalidWeight(f64),
}

/// Item to be loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCargo {
    pub name: String,
    pub weight: f64,
    #[serde(default = "NewCargo::default_category")]
    pub category: String,
    #[serde(default)]
    pub notes: String,
}

impl NewCargo {
    #[must_use]
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            category: Self::default_category(),
            notes: String::new(),
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    fn default_category() -> String {
        DEFAULT_CARGO_CATEGORY.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoItem {
    pub id: String,
    pub name: String,
    pub weight: f64,
    pub category: String,
    pub notes: String,
    pub added_timestamp: DateTime<Utc>,
}

/// Result of loading or unloading one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoReceipt {
    pub item: CargoItem,
    pub new_load: f64,
    pub remaining_capacity: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoHold {
    max_capacity: f64,
    current_load: f64,
    #[serde(default)]
    items: Vec<CargoItem>,
    #[serde(default)]
    next_item_seq: u64,
}

impl CargoHold {
    #[must_use]
    pub fn new(max_capacity: u32) -> Self {
        Self {
            max_capacity: f64::from(max_capacity),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn max_capacity(&self) -> f64 {
        self.max_capacity
    }

    #[must_use]
    pub const fn current_load(&self) -> f64 {
        self.current_load
    }

    #[must_use]
    pub fn items(&self) -> &[CargoItem] {
        &self.items
    }

    #[must_use]
    pub fn find_item(&self, item_id: &str) -> Option<&CargoItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    #[must_use]
    pub fn remaining_capacity(&self) -> f64 {
        (self.max_capacity - self.current_load).max(0.0)
    }

    /// Load as a percentage of capacity; 0 for a hold with no capacity.
    #[must_use]
    pub fn load_percentage(&self) -> f64 {
        if self.max_capacity <= 0.0 {
            0.0
        } else {
            self.current_load / self.max_capacity * 100.0
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWeight` for a non-positive or non-finite weight and
    /// `CapacityExceeded` when the item does not fit. The hold is unchanged
    /// on error.
    pub fn add_item(&mut self, cargo: NewCargo) -> Result<CargoReceipt, CargoError> {
        self.add_item_at(cargo, Utc::now())
    }

    /// [`CargoHold::add_item`] with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Same as [`CargoHold::add_item`].
    pub fn add_item_at(
        &mut self,
        cargo: NewCargo,
        at: DateTime<Utc>,
    ) -> Result<CargoReceipt, CargoError> {
        if !cargo.weight.is_finite() || cargo.weight <= 0.0 {
            return Err(CargoError::InvalidWeight(cargo.weight));
        }
        if self.current_load + cargo.weight > self.max_capacity {
            return Err(CargoError::CapacityExceeded {
                requested: cargo.weight,
                available: self.remaining_capacity(),
            });
        }

        self.next_item_seq += 1;
        let item = CargoItem {
            id: format!("{CARGO_ID_PREFIX}{}", self.next_item_seq),
            name: cargo.name,
            weight: cargo.weight,
            category: cargo.category,
            notes: cargo.notes,
            added_timestamp: at,
        };
        self.items.push(item.clone());
        self.recompute_load();
        log::debug!(
            "loaded {} ({}) -> {}/{}",
            item.id,
            item.weight,
            self.current_load,
            self.max_capacity
        );
        Ok(self.receipt(item))
    }

    /// Remove an item by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no item has this id.
    pub fn remove_item(&mut self, item_id: &str) -> Result<CargoReceipt, CargoError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| CargoError::NotFound(item_id.to_string()))?;
        let item = self.items.remove(index);
        self.recompute_load();
        log::debug!("unloaded {} -> {}/{}", item.id, self.current_load, self.max_capacity);
        Ok(self.receipt(item))
    }

    /// Set a new capacity, keeping every loaded item.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` when the current load would no longer fit.
    pub fn resync_capacity(&mut self, max_capacity: u32) -> Result<(), CargoError> {
        let capacity = f64::from(max_capacity);
        if self.current_load > capacity {
            return Err(CargoError::CapacityExceeded {
                requested: self.current_load,
                available: capacity,
            });
        }
        self.max_capacity = capacity;
        Ok(())
    }

    /// Restore the ledger invariants on records loaded from outside.
    pub(crate) fn normalize(&mut self) {
        self.recompute_load();
        let highest = self
            .items
            .iter()
            .filter_map(|item| item.id.strip_prefix(CARGO_ID_PREFIX))
            .filter_map(|seq| seq.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        self.next_item_seq = self.next_item_seq.max(highest);
    }

    fn recompute_load(&mut self) {
        self.current_load = self.items.iter().map(|item| item.weight).sum();
    }

    fn receipt(&self, item: CargoItem) -> CargoReceipt {
        CargoReceipt {
            item,
            new_load: self.current_load,
            remaining_capacity: self.remaining_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FLOAT_EPSILON;

    #[test]
    fn add_and_remove_keep_load_in_sync() {
        let mut hold = CargoHold::new(24);
        let first = hold
            .add_item(NewCargo::new("Water", 10.0).with_category("Supplies"))
            .unwrap();
        assert_eq!(first.item.id, "cargo-1");
        assert_eq!(first.item.category, "Supplies");
        assert!((first.remaining_capacity - 14.0).abs() < FLOAT_EPSILON);

        let second = hold.add_item(NewCargo::new("Ammo", 12.5)).unwrap();
        assert_eq!(second.item.id, "cargo-2");
        assert_eq!(second.item.category, "General");
        assert!((hold.current_load() - 22.5).abs() < FLOAT_EPSILON);

        let removed = hold.remove_item("cargo-1").unwrap();
        assert_eq!(removed.item.name, "Water");
        assert!((removed.new_load - 12.5).abs() < FLOAT_EPSILON);
        assert_eq!(hold.items().len(), 1);
    }

    #[test]
    fn capacity_exceeded_changes_nothing() {
        let mut hold = CargoHold::new(2);
        hold.add_item(NewCargo::new("Kit", 1.5)).unwrap();
        let err = hold.add_item(NewCargo::new("Crate", 1.0)).unwrap_err();
        assert_eq!(
            err,
            CargoError::CapacityExceeded {
                requested: 1.0,
                available: 0.5
            }
        );
        assert_eq!(hold.items().len(), 1);
        assert!((hold.current_load() - 1.5).abs() < FLOAT_EPSILON);
    }

    #[test]
    fn exact_fit_is_accepted() {
        let mut hold = CargoHold::new(4);
        hold.add_item(NewCargo::new("Fuel can", 4.0)).unwrap();
        assert!(hold.remaining_capacity().abs() < FLOAT_EPSILON);
        assert!((hold.load_percentage() - 100.0).abs() < FLOAT_EPSILON);
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let mut hold = CargoHold::new(10);
        for weight in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                hold.add_item(NewCargo::new("Bad", weight)),
                Err(CargoError::InvalidWeight(_))
            ));
        }
        assert!(hold.is_empty());
    }

    #[test]
    fn unknown_item_is_not_found() {
        let mut hold = CargoHold::new(10);
        assert_eq!(
            hold.remove_item("cargo-9").unwrap_err(),
            CargoError::NotFound("cargo-9".into())
        );
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut hold = CargoHold::new(10);
        hold.add_item(NewCargo::new("A", 1.0)).unwrap();
        hold.remove_item("cargo-1").unwrap();
        let next = hold.add_item(NewCargo::new("B", 1.0)).unwrap();
        assert_eq!(next.item.id, "cargo-2");
    }

    #[test]
    fn resync_rejects_capacity_below_load() {
        let mut hold = CargoHold::new(10);
        hold.add_item(NewCargo::new("A", 6.0)).unwrap();
        assert!(hold.resync_capacity(5).is_err());
        assert!((hold.max_capacity() - 10.0).abs() < FLOAT_EPSILON);
        hold.resync_capacity(6).unwrap();
        assert!((hold.max_capacity() - 6.0).abs() < FLOAT_EPSILON);
    }

    #[test]
    fn zero_capacity_reports_zero_percent() {
        let hold = CargoHold::new(0);
        assert!(hold.load_percentage().abs() < FLOAT_EPSILON);
    }
}
