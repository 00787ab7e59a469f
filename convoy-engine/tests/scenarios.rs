use convoy_engine::{
    CargoError, ConditionState, ConvoyOptions, ConvoySize, Damage, DriveType, Fleet, NewCargo,
    RequiredField, Repair, SizeCategory, StatCheck, TravelError, ValidationError, Vehicle,
    VehicleError, VehicleSpec, VehicleType, build_vehicle, compare_convoys, plan_travel,
};

fn catalog() -> Vec<VehicleSpec> {
    serde_json::from_str(include_str!("fixtures/catalog.json")).expect("catalog parses")
}

fn spec_named(name: &str) -> VehicleSpec {
    catalog()
        .into_iter()
        .find(|spec| spec.name == name)
        .expect("spec present in catalog")
}

#[test]
fn catalog_vehicles_derive_reference_statistics() {
    let car = build_vehicle(spec_named("Sports Car"));
    let stats = car.base_statistics().unwrap();
    assert_eq!(stats.speed_rating, 13);
    assert_eq!(stats.power_rating, 3);
    assert_eq!(stats.sustainable_speed, 130);
    assert_eq!(car.full_identifier(), "Sports Car (Subaru WRX 2022)");

    let tank = build_vehicle(spec_named("Abrams"));
    let stats = tank.base_statistics().unwrap();
    assert_eq!(stats.speed_rating, 4);
    assert_eq!(stats.power_rating, 30);
    assert_eq!(stats.durability, 225);
    assert_eq!(tank.categories().unwrap().size_category, SizeCategory::Oversized);
    assert_eq!(tank.spec().fuel_type, "diesel");
}

#[test]
fn catalog_invalid_entry_reports_missing_fields() {
    let van = build_vehicle(spec_named("Broken Van"));
    assert!(!van.is_valid());
    assert_eq!(
        van.errors(),
        &[
            ValidationError::MissingField {
                field: RequiredField::TopSpeed
            },
            ValidationError::MissingField {
                field: RequiredField::DriveType
            },
        ]
    );
    assert_eq!(van.errors()[0].to_string(), "Required field missing: topSpeed");
}

#[test]
fn catalog_convoy_skips_invalid_and_moves_at_slowest_pace() {
    let mut fleet = Fleet::default();
    let id = fleet
        .build_convoy("Mixed", catalog(), ConvoyOptions::default())
        .unwrap();
    let convoy = fleet.convoy(id).unwrap();
    assert_eq!(convoy.vehicle_ids().len(), 3);
    assert_eq!(convoy.errors().len(), 1);
    assert_eq!(convoy.errors()[0].name, "Broken Van");

    let stats = convoy.statistics();
    assert_eq!(stats.convoy_size, ConvoySize::Medium);
    // slowest member is the tank at SPD 4, medium convoy 0.9
    assert_eq!(stats.convoy_speed, 36);
    assert_eq!(stats.sustainable_speed, 36);
}

#[test]
fn six_identical_vehicles_form_a_large_convoy() {
    let spec = VehicleSpec::new(96.0, VehicleType::Car, DriveType::Rwd);
    let mut fleet = Fleet::default();
    let id = fleet
        .build_convoy("Six", vec![spec; 6], ConvoyOptions::default())
        .unwrap();
    let stats = fleet.convoy(id).unwrap().statistics();
    assert_eq!(stats.convoy_size, ConvoySize::Large);
    assert_eq!(stats.convoy_speed, 48);
}

#[test]
fn damage_then_full_repair_restores_base_statistics() {
    let mut tank = build_vehicle(spec_named("Abrams"));
    let max = tank.condition().unwrap().max_durability();

    let change = tank.apply_damage(&Damage::new(i64::from(max / 2))).unwrap();
    assert_eq!(change.condition_state, ConditionState::Damaged);
    assert_ne!(tank.live_statistics(), tank.base_statistics());
    assert!(tank.has_disadvantage(StatCheck::Power));
    assert!(!tank.has_disadvantage(StatCheck::Speed));

    let change = tank.repair(&Repair::new(i64::from(max))).unwrap();
    assert_eq!(change.actual_amount, max - max / 2);
    assert_eq!(change.condition_state, ConditionState::Pristine);
    assert_eq!(tank.live_statistics(), tank.base_statistics());
    assert_eq!(tank.condition().unwrap().damage_history().len(), 1);
    assert_eq!(tank.condition().unwrap().maintenance_history().len(), 1);
}

#[test]
fn overloading_leaves_the_hold_untouched() {
    let mut pickup = build_vehicle(spec_named("Pickup"));
    let capacity = pickup.cargo().unwrap().max_capacity();
    pickup.add_cargo(NewCargo::new("Water", capacity - 1.0)).unwrap();
    let err = pickup.add_cargo(NewCargo::new("Fuel drum", 2.0)).unwrap_err();
    assert!(matches!(err, VehicleError::Cargo(CargoError::CapacityExceeded { .. })));
    assert_eq!(pickup.cargo().unwrap().items().len(), 1);
    assert!((pickup.cargo().unwrap().current_load() - (capacity - 1.0)).abs() < 1e-9);
}

#[test]
fn destroyed_member_stops_the_convoy_and_planning_fails() {
    let mut fleet = Fleet::default();
    let id = fleet
        .build_convoy(
            "Pair",
            vec![spec_named("Sports Car"), spec_named("Pickup")],
            ConvoyOptions::default(),
        )
        .unwrap();
    let pickup = fleet.convoy(id).unwrap().vehicle_ids()[1];
    fleet.apply_damage(pickup, &Damage::new(i64::MAX)).unwrap();
    let status = fleet.vehicle(pickup).and_then(Vehicle::condition_state);
    assert_eq!(status, Some(ConditionState::Destroyed));

    let convoy = fleet.convoy(id).unwrap();
    assert_eq!(convoy.statistics().convoy_speed, 0);
    assert!(matches!(
        plan_travel(convoy, 100.0, None, None),
        Err(TravelError::NonPositiveSpeed(_))
    ));
}

#[test]
fn comparison_over_catalog_convoys() {
    let mut fleet = Fleet::default();
    let fast = fleet
        .build_convoy("Fast", vec![spec_named("Sports Car")], ConvoyOptions::default())
        .unwrap();
    let armored = fleet
        .build_convoy("Armored", vec![spec_named("Abrams")], ConvoyOptions::default())
        .unwrap();
    let comparison = compare_convoys(&[fleet.convoy(fast).unwrap(), fleet.convoy(armored).unwrap()]);
    assert_eq!(comparison.fastest.as_deref(), Some("Fast"));
    assert_eq!(comparison.most_powerful.as_deref(), Some("Armored"));
    assert_eq!(comparison.most_cargo.as_deref(), Some("Armored"));
    assert_eq!(comparison.most_efficient.as_deref(), Some("Fast"));
}

#[test]
fn fleet_snapshot_survives_json_with_history() {
    let mut fleet = Fleet::default();
    let id = fleet
        .build_convoy("Alpha", catalog(), ConvoyOptions::default())
        .unwrap();
    let tank = fleet.convoy(id).unwrap().vehicle_ids()[2];
    fleet
        .apply_damage(tank, &Damage::new(30).with_type("ballistic").with_source("Ambush"))
        .unwrap();
    fleet
        .repair(tank, &Repair::new(10).with_costs(250, 1.5).with_notes("Field patch"))
        .unwrap();
    fleet.add_cargo(tank, NewCargo::new("Ammo", 4.0).with_category("Munitions")).unwrap();

    let json = serde_json::to_string_pretty(&fleet).unwrap();
    let restored = Fleet::from_json(&json).unwrap();
    assert_eq!(restored, fleet);

    let vehicle = restored.vehicle(tank).unwrap();
    let condition = vehicle.condition().unwrap();
    assert_eq!(condition.damage_history()[0].damage_type, "ballistic");
    assert_eq!(condition.maintenance_history()[0].notes, "Field patch");
    assert_eq!(condition.current_durability(), 205);
    assert_eq!(vehicle.cargo().unwrap().items()[0].category, "Munitions");
    assert_eq!(
        restored.convoy(id).unwrap().statistics(),
        fleet.convoy(id).unwrap().statistics()
    );
}
