use serde_json::Value;
use std::process::{Command, Output};

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "convoy-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn convoy(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_convoy"))
        .args(args)
        .output()
        .expect("run cli")
}

fn json_stdout(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "cli failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

const ALPHA: &str = r#"{
    "convoyName": "Alpha Team",
    "vehicles": [
        {"vehicleName": "Lead", "topSpeed": 200, "vehicleType": "car", "driveType": "awd",
         "cylinders": 4, "displacement": 1.5, "horsepower": 174},
        {"vehicleName": "Support", "topSpeed": 150, "vehicleType": "truck", "driveType": "4wd",
         "cylinders": 6, "displacement": 3.5, "horsepower": 285}
    ]
}"#;

#[test]
fn cli_vehicle_reports_statistics() {
    let output = convoy(&[
        "vehicle",
        r#"{"vehicleName":"Lead","topSpeed":200,"vehicleType":"car","driveType":"awd","horsepower":174}"#,
    ]);
    let value = json_stdout(&output);
    let base = &value["profile"]["baseStatistics"];
    assert_eq!(base["speedRating"], 13);
    assert_eq!(base["powerRating"], 3);
    assert_eq!(base["sustainableSpeed"], 130);
    assert_eq!(value["condition"]["conditionState"], "Pristine");
}

#[test]
fn cli_invalid_vehicle_exits_with_error() {
    let output = convoy(&["vehicle", r#"{"vehicleName":"Broken"}"#]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Required field missing: topSpeed"));
}

#[test]
fn cli_convoy_aggregates_members() {
    let value = json_stdout(&convoy(&["convoy", ALPHA]));
    assert_eq!(value["convoy"]["name"], "Alpha Team");
    assert_eq!(value["convoy"]["statistics"]["convoySpeed"], 90);
    assert_eq!(value["vehicles"].as_array().map(Vec::len), Some(2));
}

#[test]
fn cli_plan_reads_input_from_file() {
    let input_path = temp_path("plan-input");
    std::fs::write(&input_path, ALPHA).unwrap();
    let arg = format!("@{}", input_path.display());
    let value = json_stdout(&convoy(&["plan", &arg, "--distance", "500"]));
    assert_eq!(value["convoyName"], "Alpha Team");
    assert_eq!(value["effectiveSpeed"], 90);
    assert_eq!(value["travelTime"]["totalDays"], 1);
    assert_eq!(value["fuel"]["stopsNeeded"], 0);
}

#[test]
fn cli_plan_rejects_zero_speed() {
    let output = convoy(&["plan", ALPHA, "--distance", "100", "--terrain", "0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("effective speed"));
}

#[test]
fn cli_compare_and_recommend() {
    let compare = format!(
        r#"{{"convoys":[{ALPHA},{{"convoyName":"Solo","vehicles":[{{"topSpeed":120,"vehicleType":"motorcycle","driveType":"rwd"}}]}}]}}"#
    );
    let value = json_stdout(&convoy(&["compare", &compare]));
    assert_eq!(value["convoys"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["mostCargo"], "Alpha Team");

    let recommend = r#"{"requirements":{"minSpeed":50},"availableVehicles":[
        {"vehicleName":"Lead","topSpeed":200,"vehicleType":"car","driveType":"awd"},
        {"vehicleName":"Bike","topSpeed":120,"vehicleType":"motorcycle","driveType":"rwd"}
    ]}"#;
    let value = json_stdout(&convoy(&["recommend", recommend]));
    let names: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|rec| rec["name"].as_str())
        .collect();
    assert_eq!(names, ["Speed Focused", "Range Focused", "Cargo Focused", "Balanced"]);

    let output = convoy(&["recommend", r#"{"availableVehicles":[]}"#]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn cli_fleet_persists_condition_and_cargo() {
    let fleet_path = temp_path("fleet");
    let fleet = fleet_path.to_string_lossy().to_string();

    let added = json_stdout(&convoy(&["fleet", "--fleet", &fleet, "add", ALPHA]));
    assert_eq!(added["outcome"], "convoyAdded");
    let truck = added["vehicleIds"][1].to_string();

    let damaged = json_stdout(&convoy(&[
        "fleet", "--fleet", &fleet, "damage", &truck, "40", "--source", "Ambush",
    ]));
    assert_eq!(damaged["change"]["actualAmount"], 40);

    let loaded = json_stdout(&convoy(&[
        "fleet", "--fleet", &fleet, "load-cargo", &truck, "Water", "3.5",
    ]));
    let item_id = loaded["receipt"]["item"]["id"].as_str().unwrap().to_string();
    assert_eq!(item_id, "cargo-1");

    let unloaded = json_stdout(&convoy(&[
        "fleet", "--fleet", &fleet, "unload-cargo", &truck, &item_id,
    ]));
    assert_eq!(unloaded["receipt"]["newLoad"], 0.0);

    let shown = json_stdout(&convoy(&["fleet", "--fleet", &fleet, "show"]));
    let vehicle = &shown["vehicles"][truck.as_str()];
    assert_eq!(vehicle["condition"]["damageHistory"][0]["source"], "Ambush");

    let output = convoy(&["fleet", "--fleet", &fleet, "damage", "99", "1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("vehicle 99 not found"));
}

#[test]
fn cli_console_output_written_to_file() {
    let output_path = temp_path("console");
    let status = Command::new(env!("CARGO_BIN_EXE_convoy"))
        .args(["convoy", ALPHA, "--format", "console", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Alpha Team"));
    assert!(content.contains("km/h"));
}

#[test]
fn cli_config_file_changes_size_scheme() {
    let config_path = temp_path("config");
    std::fs::write(&config_path, r#"{"sizeModifierScheme":"graduated"}"#).unwrap();
    let config = config_path.to_string_lossy().to_string();
    let value = json_stdout(&convoy(&["convoy", ALPHA, "--config", &config]));
    assert_eq!(value["convoy"]["statistics"]["convoySpeed"], 86);

    std::fs::write(&config_path, r#"{"operational":{"hoursPerDay":40}}"#).unwrap();
    let output = convoy(&["convoy", ALPHA, "--config", &config]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn cli_fleet_rejects_edited_snapshot() {
    let fleet_path = temp_path("fleet-edited");
    let fleet = fleet_path.to_string_lossy().to_string();
    json_stdout(&convoy(&["fleet", "--fleet", &fleet, "add", ALPHA]));

    let mut snapshot: Value =
        serde_json::from_str(&std::fs::read_to_string(&fleet_path).unwrap()).unwrap();
    snapshot["convoys"]["1"]["modifiers"]["terrainModifier"] = serde_json::json!(5.0);
    std::fs::write(&fleet_path, snapshot.to_string()).unwrap();
    let shown = json_stdout(&convoy(&["fleet", "--fleet", &fleet, "show"]));
    assert_eq!(shown["convoys"]["1"]["modifiers"]["terrainModifier"], 1.0);
    assert_eq!(shown["convoys"]["1"]["statistics"]["convoySpeed"], 90);

    snapshot["config"]["operational"]["hoursPerDay"] = serde_json::json!(40.0);
    std::fs::write(&fleet_path, snapshot.to_string()).unwrap();
    let output = convoy(&["fleet", "--fleet", &fleet, "show"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("hours_per_day"));
}
