//! Vehicle categorization: size, type, complexity and military class.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::spec::{MilitaryClass, UnknownVariant, VehicleSpec, VehicleType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeCategory {
    Compact,
    Midsize,
    Fullsize,
    Large,
    Oversized,
}

impl SizeCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "Compact",
            Self::Midsize => "Midsize",
            Self::Fullsize => "Fullsize",
            Self::Large => "Large",
            Self::Oversized => "Oversized",
        }
    }

    /// Weight bands in kilograms.
    #[must_use]
    pub fn from_weight(weight: f64) -> Self {
        if weight < 1500.0 {
            Self::Compact
        } else if weight < 2500.0 {
            Self::Midsize
        } else if weight < 4000.0 {
            Self::Fullsize
        } else if weight < 10_000.0 {
            Self::Large
        } else {
            Self::Oversized
        }
    }
}

impl fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered from least to most demanding to maintain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum ComplexityLevel {
    #[default]
    Simple,
    Standard,
    Complex,
    Specialized,
}

impl ComplexityLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Standard => "Standard",
            Self::Complex => "Complex",
            Self::Specialized => "Specialized",
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Military class of a categorized vehicle; `"N/A"` for civilian vehicles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MilitaryCategory {
    #[default]
    NotApplicable,
    Class(MilitaryClass),
}

impl MilitaryCategory {
    pub const NOT_APPLICABLE: &'static str = "N/A";

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotApplicable => Self::NOT_APPLICABLE,
            Self::Class(class) => class.as_str(),
        }
    }

    #[must_use]
    pub const fn class(self) -> Option<MilitaryClass> {
        match self {
            Self::NotApplicable => None,
            Self::Class(class) => Some(class),
        }
    }
}

impl fmt::Display for MilitaryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MilitaryCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(Self::NOT_APPLICABLE) {
            return Ok(Self::NotApplicable);
        }
        s.parse::<MilitaryClass>().map(Self::Class)
    }
}

impl TryFrom<String> for MilitaryCategory {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MilitaryCategory> for String {
    fn from(value: MilitaryCategory) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Categories {
    pub size_category: SizeCategory,
    pub type_category: VehicleType,
    pub complexity_level: ComplexityLevel,
    pub military_class: MilitaryCategory,
}

/// Derive the categories of a validated spec.
///
/// Only called once `vehicle_type` is known to be present.
#[must_use]
pub fn categorize(spec: &VehicleSpec, vehicle_type: VehicleType) -> Categories {
    Categories {
        size_category: size_category(spec, vehicle_type),
        type_category: vehicle_type,
        complexity_level: complexity_level(spec, vehicle_type),
        military_class: military_category(spec),
    }
}

fn size_category(spec: &VehicleSpec, vehicle_type: VehicleType) -> SizeCategory {
    if let Some(weight) = spec.known_weight() {
        return SizeCategory::from_weight(weight);
    }
    let displacement = spec.displacement.unwrap_or(0.0);
    match vehicle_type {
        VehicleType::Motorcycle => SizeCategory::Compact,
        VehicleType::Military if displacement > 10.0 => SizeCategory::Oversized,
        VehicleType::Commercial | VehicleType::Specialty => SizeCategory::Large,
        VehicleType::Truck if displacement > 5.0 => SizeCategory::Large,
        _ if displacement > 4.0 => SizeCategory::Fullsize,
        _ if displacement > 2.0 => SizeCategory::Midsize,
        _ => SizeCategory::Compact,
    }
}

fn complexity_level(spec: &VehicleSpec, vehicle_type: VehicleType) -> ComplexityLevel {
    if spec.is_military() {
        return ComplexityLevel::Specialized;
    }
    if matches!(vehicle_type, VehicleType::Specialty | VehicleType::Commercial) {
        return ComplexityLevel::Complex;
    }
    let displacement = spec.displacement.unwrap_or(0.0);
    let cylinders = spec.cylinders.unwrap_or(0);
    if displacement > 6.0 || cylinders > 8 {
        ComplexityLevel::Complex
    } else if displacement > 3.0 || cylinders > 4 {
        ComplexityLevel::Standard
    } else {
        ComplexityLevel::Simple
    }
}

fn military_category(spec: &VehicleSpec) -> MilitaryCategory {
    if spec.is_military() {
        MilitaryCategory::Class(spec.military_class.unwrap_or(MilitaryClass::Light))
    } else {
        MilitaryCategory::NotApplicable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::DriveType;

    fn categories(spec: &VehicleSpec) -> Categories {
        categorize(spec, spec.vehicle_type.unwrap())
    }

    #[test]
    fn weight_bands_take_precedence() {
        let spec = VehicleSpec::new(120.0, VehicleType::Motorcycle, DriveType::Rwd).with_weight(2600.0);
        assert_eq!(categories(&spec).size_category, SizeCategory::Fullsize);
        assert_eq!(SizeCategory::from_weight(1499.9), SizeCategory::Compact);
        assert_eq!(SizeCategory::from_weight(9_999.0), SizeCategory::Large);
        assert_eq!(SizeCategory::from_weight(62_000.0), SizeCategory::Oversized);
    }

    #[test]
    fn zero_weight_falls_back_to_type_rules() {
        let spec = VehicleSpec::new(150.0, VehicleType::Truck, DriveType::FourWheel)
            .with_engine(8, 6.2)
            .with_weight(0.0);
        assert_eq!(categories(&spec).size_category, SizeCategory::Large);
    }

    #[test]
    fn displacement_rules_without_weight() {
        let car = VehicleSpec::new(200.0, VehicleType::Car, DriveType::Awd);
        assert_eq!(categories(&car).size_category, SizeCategory::Compact);
        let midsize = car.clone().with_displacement(3.5);
        assert_eq!(categories(&midsize).size_category, SizeCategory::Midsize);
        let fullsize = car.with_displacement(4.5);
        assert_eq!(categories(&fullsize).size_category, SizeCategory::Fullsize);
        let tank = VehicleSpec::new(60.0, VehicleType::Military, DriveType::Tracks)
            .with_displacement(27.0);
        assert_eq!(categories(&tank).size_category, SizeCategory::Oversized);
        let van = VehicleSpec::new(110.0, VehicleType::Commercial, DriveType::Rwd);
        assert_eq!(categories(&van).size_category, SizeCategory::Large);
    }

    #[test]
    fn complexity_levels() {
        let simple = VehicleSpec::new(180.0, VehicleType::Car, DriveType::Fwd).with_engine(4, 2.0);
        assert_eq!(categories(&simple).complexity_level, ComplexityLevel::Simple);
        let standard = VehicleSpec::new(180.0, VehicleType::Car, DriveType::Fwd).with_engine(6, 3.0);
        assert_eq!(categories(&standard).complexity_level, ComplexityLevel::Standard);
        let complex = VehicleSpec::new(180.0, VehicleType::Car, DriveType::Rwd).with_engine(12, 6.0);
        assert_eq!(categories(&complex).complexity_level, ComplexityLevel::Complex);
        let armed = simple.with_military_class(MilitaryClass::Medium);
        let cats = categories(&armed);
        assert_eq!(cats.complexity_level, ComplexityLevel::Specialized);
        assert_eq!(cats.military_class, MilitaryCategory::Class(MilitaryClass::Medium));
    }

    #[test]
    fn military_class_defaults_to_light() {
        let spec = VehicleSpec::new(90.0, VehicleType::Military, DriveType::FourWheel);
        assert_eq!(
            categories(&spec).military_class,
            MilitaryCategory::Class(MilitaryClass::Light)
        );
        let civ = VehicleSpec::new(90.0, VehicleType::Suv, DriveType::FourWheel);
        assert_eq!(categories(&civ).military_class.to_string(), "N/A");
    }

    #[test]
    fn categories_serialize_like_the_wire_format() {
        let spec = VehicleSpec::new(200.0, VehicleType::Car, DriveType::Awd);
        let json = serde_json::to_value(categories(&spec)).unwrap();
        assert_eq!(json["sizeCategory"], "Compact");
        assert_eq!(json["typeCategory"], "car");
        assert_eq!(json["complexityLevel"], "Simple");
        assert_eq!(json["militaryClass"], "N/A");
        let back: Categories = serde_json::from_value(json).unwrap();
        assert_eq!(back, categories(&spec));
    }
}
