use colored::Colorize;
use std::io::{self, Write};

use convoy_engine::{
    CargoReceipt, Comparison, ConditionChange, ConditionState, Convoy, Fleet, Recommendation,
    RejectedVehicle, TravelPlan, Vehicle,
};

fn heading(w: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(w, "{}", title.bright_cyan().bold())?;
    writeln!(w, "{}", "=".repeat(title.chars().count()).cyan())
}

fn state_label(state: ConditionState) -> colored::ColoredString {
    match state {
        ConditionState::Pristine => state.as_str().green(),
        ConditionState::Damaged => state.as_str().yellow(),
        ConditionState::HeavilyDamaged => state.as_str().bright_red(),
        ConditionState::Critical | ConditionState::Destroyed => state.as_str().red().bold(),
    }
}

pub fn vehicle(w: &mut dyn Write, vehicle: &Vehicle) -> io::Result<()> {
    heading(w, &vehicle.full_identifier())?;
    let (Some(profile), Some(state)) = (vehicle.profile(), vehicle.condition_state()) else {
        for err in vehicle.errors() {
            writeln!(w, "  • {}", err.to_string().red())?;
        }
        return Ok(());
    };
    let cats = &profile.categories;
    let stats = &profile.live_statistics;
    writeln!(
        w,
        "Type: {}  Size: {}  Complexity: {}  Military: {}",
        cats.type_category, cats.size_category, cats.complexity_level, cats.military_class
    )?;
    writeln!(w, "Condition: {}", state_label(state))?;
    writeln!(
        w,
        "SPD {:>3}  FC {:>3}  CC {:>3} ({})  MAN {:>3}",
        stats.speed_rating,
        stats.fuel_consumption,
        stats.cargo_capacity,
        stats.cargo_category,
        stats.maneuverability
    )?;
    writeln!(
        w,
        "DUR {:>3}  PWR {:>3}  MC {:>3}  Sustainable {} km/h",
        stats.durability, stats.power_rating, stats.maintenance_cost, stats.sustainable_speed
    )?;
    if let Some(condition) = vehicle.condition() {
        writeln!(
            w,
            "Durability: {}/{}",
            condition.current_durability(),
            condition.max_durability()
        )?;
    }
    if let Some(hold) = vehicle.cargo() {
        writeln!(
            w,
            "Cargo: {:.1}/{:.1} ({:.0}%)",
            hold.current_load(),
            hold.max_capacity(),
            hold.load_percentage()
        )?;
        for item in hold.items() {
            writeln!(w, "  {} {} [{}] {:.1}", item.id.dimmed(), item.name, item.category, item.weight)?;
        }
    }
    Ok(())
}

pub fn convoy(w: &mut dyn Write, convoy: &Convoy, members: &[&Vehicle]) -> io::Result<()> {
    heading(w, &format!("Convoy: {}", convoy.name()))?;
    let stats = convoy.statistics();
    writeln!(
        w,
        "{} vehicles ({}), complexity {}",
        stats.vehicle_count, stats.convoy_size, stats.convoy_complexity
    )?;
    writeln!(
        w,
        "Speed: {} km/h  Daily: {} km  Monthly: {} km  Range: {} km",
        stats.convoy_speed.to_string().bold(),
        stats.daily_travel_distance,
        stats.monthly_travel_distance,
        stats.fuel_limited_range
    )?;
    writeln!(
        w,
        "Cargo: {}  Power: {}  Durability: {}  Maneuverability: {}",
        stats.total_cargo_capacity,
        stats.total_power_rating,
        stats.total_durability,
        stats.average_maneuverability
    )?;
    writeln!(
        w,
        "Monthly fuel: {} L  Maintenance: {} h  Parts: ${}",
        stats.monthly_fuel_consumption, stats.monthly_maintenance_hours, stats.monthly_parts_cost
    )?;
    for member in members {
        if let Some(summary) = member.summary() {
            writeln!(
                w,
                "  • {} SPD {} FC {} CC {} [{}]",
                summary.name,
                summary.speed_rating,
                summary.fuel_consumption,
                summary.cargo_capacity,
                state_label(summary.condition_state)
            )?;
        }
    }
    for rejected in convoy.errors() {
        writeln!(w, "  {} {}: {}", "skipped".yellow(), rejected.name, join_errors(rejected))?;
    }
    Ok(())
}

fn join_errors(rejected: &RejectedVehicle) -> String {
    rejected
        .errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn comparison(w: &mut dyn Write, comparison: &Comparison) -> io::Result<()> {
    heading(w, "Convoy Comparison")?;
    for entry in &comparison.convoys {
        let efficiency = entry
            .efficiency
            .map_or_else(|| "n/a".to_string(), |e| format!("{e:.2} L/km"));
        writeln!(
            w,
            "{:<20} speed {:>4}  range {:>6}  cargo {:>4}  power {:>4}  {}",
            entry.name.bold(),
            entry.speed,
            entry.range,
            entry.cargo,
            entry.power,
            efficiency
        )?;
    }
    let winners = [
        ("Fastest", &comparison.fastest),
        ("Longest range", &comparison.longest_range),
        ("Most cargo", &comparison.most_cargo),
        ("Most powerful", &comparison.most_powerful),
        ("Most efficient", &comparison.most_efficient),
    ];
    for (label, winner) in winners {
        if let Some(name) = winner {
            writeln!(w, "{label}: {}", name.green())?;
        }
    }
    Ok(())
}

pub fn recommendations(w: &mut dyn Write, recommendations: &[Recommendation]) -> io::Result<()> {
    heading(w, "Recommendations")?;
    if recommendations.is_empty() {
        writeln!(w, "No valid vehicles available.")?;
    }
    for rec in recommendations {
        let status = if rec.meets_requirements {
            "✅ meets requirements".green()
        } else {
            "❌ falls short".red()
        };
        writeln!(w, "{} {}", rec.name.to_string().bold(), status)?;
        writeln!(w, "   Vehicles: {}", rec.vehicles.join(", "))?;
        writeln!(
            w,
            "   Speed {} km/h  Range {} km  Cargo {}  Power {}",
            rec.statistics.speed, rec.statistics.range, rec.statistics.cargo, rec.statistics.power
        )?;
    }
    Ok(())
}

pub fn plan(w: &mut dyn Write, convoy_name: &str, plan: &TravelPlan) -> io::Result<()> {
    heading(w, &format!("Travel Plan: {convoy_name}"))?;
    writeln!(
        w,
        "{} km at {} km/h (terrain {:.2}, weather {:.2})",
        plan.distance, plan.effective_speed, plan.modifiers.terrain, plan.modifiers.weather
    )?;
    writeln!(
        w,
        "Driving: {:.1} h over {} days, {} days with rest",
        plan.travel_time.hours, plan.travel_time.travel_days, plan.travel_time.total_days
    )?;
    writeln!(
        w,
        "Fuel: {} L needed, {} L capacity, {} refuel stops",
        plan.fuel.required, plan.fuel.capacity, plan.fuel.stops_needed
    )
}

pub fn fleet(w: &mut dyn Write, fleet: &Fleet) -> io::Result<()> {
    heading(w, "Fleet")?;
    for (id, vehicle) in fleet.vehicles() {
        let state = vehicle.condition_state().unwrap_or_default();
        writeln!(w, "#{id} {} [{}]", vehicle.full_identifier(), state_label(state))?;
    }
    for (id, convoy) in fleet.convoys() {
        let ids: Vec<String> = convoy.vehicle_ids().iter().map(ToString::to_string).collect();
        writeln!(
            w,
            "Convoy #{id} {}: {} km/h, vehicles [{}]",
            convoy.name().bold(),
            convoy.statistics().convoy_speed,
            ids.join(", ")
        )?;
    }
    Ok(())
}

pub fn condition_change(w: &mut dyn Write, change: &ConditionChange) -> io::Result<()> {
    writeln!(
        w,
        "Applied {} → durability {} ({})",
        change.actual_amount,
        change.new_durability,
        state_label(change.condition_state)
    )?;
    if change.state_changed() {
        writeln!(w, "Condition changed from {}", state_label(change.previous_state))?;
    }
    Ok(())
}

pub fn receipt(w: &mut dyn Write, receipt: &CargoReceipt) -> io::Result<()> {
    writeln!(
        w,
        "{} {} ({:.1}) → load {:.1}, {:.1} remaining",
        receipt.item.id.dimmed(),
        receipt.item.name,
        receipt.item.weight,
        receipt.new_load,
        receipt.remaining_capacity
    )
}
