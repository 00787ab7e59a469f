use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;

use convoy_engine::{ConvoyOptions, MissionRequirements, VehicleSpec};

/// Resolve an argument that is either inline JSON or `@path` to a JSON file.
pub fn read_source(raw: &str) -> Result<String> {
    match raw.strip_prefix('@') {
        Some(path) => read_file(Path::new(path)),
        None => Ok(raw.to_string()),
    }
}

pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

pub fn parse_input<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let source = read_source(raw)?;
    serde_json::from_str(&source).context("input is not valid JSON for this command")
}

fn default_convoy_name() -> String {
    "Convoy".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvoyInput {
    #[serde(default = "default_convoy_name")]
    pub convoy_name: String,
    pub vehicles: Vec<VehicleSpec>,
    #[serde(flatten)]
    pub options: ConvoyOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompareInput {
    pub convoys: Vec<ConvoyInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendInput {
    #[serde(default)]
    pub requirements: MissionRequirements,
    pub available_vehicles: Vec<VehicleSpec>,
}

/// `fleet add` takes a whole convoy when `vehicles` is present, otherwise a
/// single vehicle spec.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FleetAddInput {
    Convoy(ConvoyInput),
    Vehicle(VehicleSpec),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_json_passes_through() {
        assert_eq!(read_source(r#"{"a":1}"#).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_source("@/definitely/not/here.json").unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }

    #[test]
    fn convoy_input_flattens_options() {
        let input: ConvoyInput = parse_input(
            r#"{"convoyName":"Alpha","vehicles":[],"terrainModifier":0.7,"operationalParams":{"hoursPerDay":10}}"#,
        )
        .unwrap();
        assert_eq!(input.convoy_name, "Alpha");
        assert_eq!(input.options.terrain_modifier, Some(0.7));
        assert!(input.options.weather_modifier.is_none());
        let params = input.options.operational_params.unwrap();
        assert!((params.hours_per_day - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fleet_add_distinguishes_convoys_from_vehicles() {
        let convoy: FleetAddInput = parse_input(r#"{"vehicles":[{"topSpeed":100}]}"#).unwrap();
        assert!(matches!(convoy, FleetAddInput::Convoy(ref c) if c.convoy_name == "Convoy"));
        let vehicle: FleetAddInput =
            parse_input(r#"{"vehicleName":"Solo","topSpeed":100}"#).unwrap();
        assert!(matches!(vehicle, FleetAddInput::Vehicle(ref v) if v.name == "Solo"));
    }

    #[test]
    fn recommend_input_defaults_requirements() {
        let input: RecommendInput = parse_input(r#"{"availableVehicles":[]}"#).unwrap();
        assert_eq!(input.requirements, MissionRequirements::default());
    }
}
