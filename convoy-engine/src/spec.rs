//! Vehicle input specifications
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a category string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Broad vehicle family. Drives most lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum VehicleType {
    Motorcycle,
    Car,
    Suv,
    Truck,
    Commercial,
    Military,
    Specialty,
}

impl VehicleType {
    pub const ALL: [Self; 7] = [
        Self::Motorcycle,
        Self::Car,
        Self::Suv,
        Self::Truck,
        Self::Commercial,
        Self::Military,
        Self::Specialty,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Motorcycle => "motorcycle",
            Self::Car => "car",
            Self::Suv => "suv",
            Self::Truck => "truck",
            Self::Commercial => "commercial",
            Self::Military => "military",
            Self::Specialty => "specialty",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| UnknownVariant::new("vehicle type", s))
    }
}

impl TryFrom<String> for VehicleType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VehicleType> for String {
    fn from(value: VehicleType) -> Self {
        value.as_str().to_string()
    }
}

/// Drivetrain layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DriveType {
    Fwd,
    Rwd,
    Awd,
    FourWheel,
    Tracks,
}

impl DriveType {
    pub const ALL: [Self; 5] = [
        Self::Fwd,
        Self::Rwd,
        Self::Awd,
        Self::FourWheel,
        Self::Tracks,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fwd => "fwd",
            Self::Rwd => "rwd",
            Self::Awd => "awd",
            Self::FourWheel => "4wd",
            Self::Tracks => "tracks",
        }
    }
}

impl fmt::Display for DriveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriveType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| UnknownVariant::new("drive type", s))
    }
}

impl TryFrom<String> for DriveType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DriveType> for String {
    fn from(value: DriveType) -> Self {
        value.as_str().to_string()
    }
}

/// Military weight class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MilitaryClass {
    Light,
    Medium,
    Heavy,
    Specialized,
}

impl MilitaryClass {
    pub const ALL: [Self; 4] = [Self::Light, Self::Medium, Self::Heavy, Self::Specialized];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
            Self::Specialized => "specialized",
        }
    }
}

impl fmt::Display for MilitaryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MilitaryClass {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == lowered)
            .ok_or_else(|| UnknownVariant::new("military class", s))
    }
}

impl TryFrom<String> for MilitaryClass {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MilitaryClass> for String {
    fn from(value: MilitaryClass) -> Self {
        value.as_str().to_string()
    }
}

/// Raw vehicle specification as supplied by the caller.
///
/// Required fields are optional here so that validation can report every
/// missing one instead of failing at deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSpec {
    #[serde(rename = "vehicleName", alias = "name", default = "VehicleSpec::default_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    /// Maximum speed in km/h
    #[serde(default)]
    pub top_speed: Option<f64>,
    #[serde(default)]
    pub vehicle_type: Option<VehicleType>,
    #[serde(default)]
    pub drive_type: Option<DriveType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cylinders: Option<i32>,
    /// Engine displacement in liters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displacement: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horsepower: Option<i32>,
    /// Curb weight in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub military_class: Option<MilitaryClass>,
    #[serde(default = "VehicleSpec::default_fuel_type")]
    pub fuel_type: String,
}

impl Default for VehicleSpec {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            make: None,
            model: None,
            year: None,
            top_speed: None,
            vehicle_type: None,
            drive_type: None,
            cylinders: None,
            displacement: None,
            horsepower: None,
            weight: None,
            military_class: None,
            fuel_type: Self::default_fuel_type(),
        }
    }
}

impl VehicleSpec {
    fn default_name() -> String {
        String::from("Unnamed Vehicle")
    }

    fn default_fuel_type() -> String {
        String::from("gasoline")
    }

    /// Spec with the three required fields populated.
    #[must_use]
    pub fn new(top_speed: f64, vehicle_type: VehicleType, drive_type: DriveType) -> Self {
        Self {
            top_speed: Some(top_speed),
            vehicle_type: Some(vehicle_type),
            drive_type: Some(drive_type),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_make_model(
        mut self,
        make: impl Into<String>,
        model: impl Into<String>,
        year: Option<u16>,
    ) -> Self {
        self.make = Some(make.into());
        self.model = Some(model.into());
        self.year = year;
        self
    }

    #[must_use]
    pub const fn with_engine(mut self, cylinders: i32, displacement: f64) -> Self {
        self.cylinders = Some(cylinders);
        self.displacement = Some(displacement);
        self
    }

    #[must_use]
    pub const fn with_displacement(mut self, displacement: f64) -> Self {
        self.displacement = Some(displacement);
        self
    }

    #[must_use]
    pub const fn with_horsepower(mut self, horsepower: i32) -> Self {
        self.horsepower = Some(horsepower);
        self
    }

    #[must_use]
    pub const fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub const fn with_military_class(mut self, class: MilitaryClass) -> Self {
        self.military_class = Some(class);
        self
    }

    /// True for military vehicles or any vehicle carrying a military class.
    #[must_use]
    pub fn is_military(&self) -> bool {
        self.vehicle_type == Some(VehicleType::Military) || self.military_class.is_some()
    }

    /// Weight in kilograms when present and positive.
    #[must_use]
    pub fn known_weight(&self) -> Option<f64> {
        self.weight.filter(|w| *w > 0.0)
    }

    /// Display name: "Make Model Year" when make and model are known, else the name.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (non_empty(self.make.as_deref()), non_empty(self.model.as_deref())) {
            (Some(make), Some(model)) => match self.year {
                Some(year) => format!("{make} {model} {year}"),
                None => format!("{make} {model}"),
            },
            _ => self.name.clone(),
        }
    }

    /// Name plus make/model when they differ, e.g. `"Lead (Toyota Hilux 2019)"`.
    #[must_use]
    pub fn full_identifier(&self) -> String {
        let display = self.display_name();
        if display == self.name {
            display
        } else {
            format!("{} ({display})", self.name)
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("AWD".parse::<DriveType>(), Ok(DriveType::Awd));
        assert_eq!("4WD".parse::<DriveType>(), Ok(DriveType::FourWheel));
        assert_eq!(" Truck ".parse::<VehicleType>(), Ok(VehicleType::Truck));
        let err = "hover".parse::<DriveType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown drive type 'hover'");
    }

    #[test]
    fn spec_deserializes_from_camel_case_json() {
        let spec: VehicleSpec = serde_json::from_str(
            r#"{"vehicleName":"Lead","topSpeed":200,"vehicleType":"car","driveType":"AWD","horsepower":174}"#,
        )
        .unwrap();
        assert_eq!(spec.name, "Lead");
        assert_eq!(spec.top_speed, Some(200.0));
        assert_eq!(spec.drive_type, Some(DriveType::Awd));
        assert_eq!(spec.fuel_type, "gasoline");
        let back = serde_json::to_value(&spec).unwrap();
        assert_eq!(back["driveType"], "awd");
    }

    #[test]
    fn missing_fields_stay_unset() {
        let spec: VehicleSpec = serde_json::from_str(r#"{"vehicleName":"Invalid Car"}"#).unwrap();
        assert!(spec.top_speed.is_none());
        assert!(spec.vehicle_type.is_none());
        assert_eq!(spec.name, "Invalid Car");
    }

    #[test]
    fn display_name_prefers_make_and_model() {
        let spec = VehicleSpec::new(150.0, VehicleType::Truck, DriveType::FourWheel)
            .named("Support")
            .with_make_model("Ford", "F-150", Some(2020));
        assert_eq!(spec.display_name(), "Ford F-150 2020");
        assert_eq!(spec.full_identifier(), "Support (Ford F-150 2020)");

        let plain = VehicleSpec::new(150.0, VehicleType::Truck, DriveType::FourWheel);
        assert_eq!(plain.display_name(), "Unnamed Vehicle");
        assert_eq!(plain.full_identifier(), "Unnamed Vehicle");
    }

    #[test]
    fn military_flag_follows_type_or_class() {
        let car = VehicleSpec::new(120.0, VehicleType::Car, DriveType::Fwd);
        assert!(!car.is_military());
        assert!(car.clone().with_military_class(MilitaryClass::Medium).is_military());
        assert!(VehicleSpec::new(60.0, VehicleType::Military, DriveType::Tracks).is_military());
    }
}
