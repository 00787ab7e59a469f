//! Side-by-side comparison of convoys.
use serde::{Deserialize, Serialize};

use crate::convoy::{Convoy, ConvoyStatistics};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvoyComparison {
    pub name: String,
    pub vehicle_count: usize,
    pub speed: u32,
    pub daily_range: u32,
    pub monthly_range: u32,
    /// Fuel-limited range in km.
    pub range: u32,
    pub cargo: u32,
    pub power: u32,
    pub monthly_fuel: u32,
    pub monthly_maintenance: u32,
    /// Liters per km travelled in a month; absent when the convoy cannot move.
    pub efficiency: Option<f64>,
}

impl ConvoyComparison {
    #[must_use]
    pub fn from_statistics(name: &str, stats: &ConvoyStatistics) -> Self {
        Self {
            name: name.to_string(),
            vehicle_count: stats.vehicle_count,
            speed: stats.sustainable_speed,
            daily_range: stats.daily_travel_distance,
            monthly_range: stats.monthly_travel_distance,
            range: stats.fuel_limited_range,
            cargo: stats.total_cargo_capacity,
            power: stats.total_power_rating,
            monthly_fuel: stats.monthly_fuel_consumption,
            monthly_maintenance: stats.monthly_maintenance_hours,
            efficiency: fuel_efficiency(stats),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub convoys: Vec<ConvoyComparison>,
    pub fastest: Option<String>,
    pub longest_range: Option<String>,
    pub most_cargo: Option<String>,
    pub most_powerful: Option<String>,
    pub most_efficient: Option<String>,
}

/// Monthly fuel per monthly km, `None` when the convoy covers no distance.
#[must_use]
pub fn fuel_efficiency(stats: &ConvoyStatistics) -> Option<f64> {
    (stats.monthly_travel_distance > 0).then(|| {
        f64::from(stats.monthly_fuel_consumption) / f64::from(stats.monthly_travel_distance)
    })
}

/// Compare convoys and name a winner per category. Ties go to the convoy
/// listed first; a category where every convoy scores 0 has no winner.
#[must_use]
pub fn compare_convoys(convoys: &[&Convoy]) -> Comparison {
    let entries: Vec<ConvoyComparison> = convoys
        .iter()
        .map(|convoy| ConvoyComparison::from_statistics(convoy.name(), convoy.statistics()))
        .collect();

    Comparison {
        fastest: first_max(&entries, |e| e.speed),
        longest_range: first_max(&entries, |e| e.range),
        most_cargo: first_max(&entries, |e| e.cargo),
        most_powerful: first_max(&entries, |e| e.power),
        most_efficient: most_efficient(&entries),
        convoys: entries,
    }
}

fn first_max(entries: &[ConvoyComparison], key: impl Fn(&ConvoyComparison) -> u32) -> Option<String> {
    let mut best: Option<&ConvoyComparison> = None;
    for entry in entries {
        if key(entry) > best.map_or(0, &key) {
            best = Some(entry);
        }
    }
    best.map(|entry| entry.name.clone())
}

fn most_efficient(entries: &[ConvoyComparison]) -> Option<String> {
    let mut best: Option<(f64, &ConvoyComparison)> = None;
    for entry in entries {
        let Some(efficiency) = entry.efficiency else {
            continue;
        };
        if best.is_none_or(|(current, _)| efficiency < current) {
            best = Some((efficiency, entry));
        }
    }
    best.map(|(_, entry)| entry.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Damage;
    use crate::fleet::{ConvoyOptions, Fleet};
    use crate::spec::{DriveType, VehicleSpec, VehicleType};

    fn car() -> VehicleSpec {
        VehicleSpec::new(200.0, VehicleType::Car, DriveType::Awd)
            .with_engine(4, 1.5)
            .with_horsepower(174)
    }

    fn truck() -> VehicleSpec {
        VehicleSpec::new(150.0, VehicleType::Truck, DriveType::FourWheel)
            .with_engine(6, 3.5)
            .with_horsepower(285)
    }

    #[test]
    fn winners_per_category() {
        let mut fleet = Fleet::default();
        let scouts = fleet
            .build_convoy("Scouts", vec![car()], ConvoyOptions::default())
            .unwrap();
        let haulers = fleet
            .build_convoy("Haulers", vec![truck(), truck()], ConvoyOptions::default())
            .unwrap();
        let convoys = [fleet.convoy(scouts).unwrap(), fleet.convoy(haulers).unwrap()];
        let comparison = compare_convoys(&convoys);

        assert_eq!(comparison.convoys.len(), 2);
        assert_eq!(comparison.fastest.as_deref(), Some("Scouts"));
        assert_eq!(comparison.most_cargo.as_deref(), Some("Haulers"));
        assert_eq!(comparison.most_powerful.as_deref(), Some("Haulers"));
        assert_eq!(comparison.most_efficient.as_deref(), Some("Scouts"));
        let scouts_entry = &comparison.convoys[0];
        assert_eq!(scouts_entry.speed, 130);
        assert!(scouts_entry.efficiency.is_some());
    }

    #[test]
    fn ties_go_to_the_first_convoy() {
        let mut fleet = Fleet::default();
        let a = fleet.build_convoy("A", vec![car()], ConvoyOptions::default()).unwrap();
        let b = fleet.build_convoy("B", vec![car()], ConvoyOptions::default()).unwrap();
        let comparison = compare_convoys(&[fleet.convoy(a).unwrap(), fleet.convoy(b).unwrap()]);
        assert_eq!(comparison.fastest.as_deref(), Some("A"));
        assert_eq!(comparison.longest_range.as_deref(), Some("A"));
        assert_eq!(comparison.most_efficient.as_deref(), Some("A"));
    }

    #[test]
    fn stationary_convoys_have_no_efficiency() {
        let mut fleet = Fleet::default();
        let wrecked = fleet
            .build_convoy("Wrecked", vec![car()], ConvoyOptions::default())
            .unwrap();
        let id = fleet.convoy(wrecked).unwrap().vehicle_ids()[0];
        fleet.apply_damage(id, &Damage::new(1_000)).unwrap();
        let comparison = compare_convoys(&[fleet.convoy(wrecked).unwrap()]);
        assert!(comparison.convoys[0].efficiency.is_none());
        assert!(comparison.most_efficient.is_none());
        assert!(comparison.fastest.is_none());
        assert!(comparison.longest_range.is_none());
        // Destroyed members still count towards cargo and power.
        assert_eq!(comparison.most_cargo.as_deref(), Some("Wrecked"));
    }

    #[test]
    fn empty_input_has_no_winners() {
        let comparison = compare_convoys(&[]);
        assert_eq!(comparison, Comparison::default());
    }
}
