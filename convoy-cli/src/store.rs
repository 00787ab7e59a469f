use std::fs;
use std::io;
use std::path::Path;

use convoy_engine::{Fleet, FleetStorage, SpecCatalog, VehicleSpec};

/// Catalogs are JSON files holding an array of vehicle specs; the catalog
/// name is the file path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCatalog;

impl SpecCatalog for FileCatalog {
    type Error = io::Error;

    fn load_specs(&self, catalog_name: &str) -> Result<Vec<VehicleSpec>, Self::Error> {
        let raw = fs::read_to_string(catalog_name)?;
        serde_json::from_str(&raw).map_err(io::Error::other)
    }
}

/// Fleet snapshots stored as pretty JSON; the fleet name is the file path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

impl FleetStorage for FileStore {
    type Error = io::Error;

    fn save_fleet(&self, fleet_name: &str, fleet: &Fleet) -> Result<(), Self::Error> {
        let json = serde_json::to_string_pretty(fleet).map_err(io::Error::other)?;
        if let Some(parent) = Path::new(fleet_name).parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(fleet_name, json)
    }

    fn load_fleet(&self, fleet_name: &str) -> Result<Option<Fleet>, Self::Error> {
        match fs::read_to_string(fleet_name) {
            Ok(raw) => serde_json::from_str(&raw).map(Some).map_err(io::Error::other),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn delete_fleet(&self, fleet_name: &str) -> Result<(), Self::Error> {
        match fs::remove_file(fleet_name) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}
