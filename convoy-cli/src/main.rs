mod input;
mod report;
mod store;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use convoy_engine::{
    CargoReceipt, ConditionChange, ConvoyEngine, ConvoyId, Damage, EngineConfig, Fleet, NewCargo,
    Repair, TravelPlan, Vehicle, VehicleId, compare_convoys, plan_travel,
};
use convoy_engine::recommend::recommend_with_config;
use input::{CompareInput, ConvoyInput, FleetAddInput, RecommendInput, parse_input};
use store::{FileCatalog, FileStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Colored human-readable summary
    Console,
}

#[derive(Debug, Parser)]
#[command(name = "convoy", version)]
#[command(about = "Compute vehicle and convoy statistics, plan trips and track fleet condition")]
struct Args {
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Engine configuration JSON file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Optional path to write the output instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build one vehicle from a spec (inline JSON or @file)
    Vehicle { input: String },
    /// Build a convoy: {convoyName, vehicles, terrainModifier?, weatherModifier?, operationalParams?}
    Convoy { input: String },
    /// Compare convoys: {convoys: [...]}
    Compare { input: String },
    /// Recommend convoys: {requirements, availableVehicles}
    Recommend { input: String },
    /// Plan a trip for a convoy input
    Plan {
        input: String,
        /// Distance in km
        #[arg(long)]
        distance: f64,
        /// Terrain modifier override
        #[arg(long)]
        terrain: Option<f64>,
        /// Weather modifier override
        #[arg(long)]
        weather: Option<f64>,
    },
    /// Operate on a fleet snapshot file
    Fleet {
        /// Fleet snapshot path; created on first write
        #[arg(long)]
        fleet: PathBuf,
        #[command(subcommand)]
        action: FleetAction,
    },
}

#[derive(Debug, Subcommand)]
enum FleetAction {
    /// Start a fresh fleet with one convoy built from a catalog file
    Init {
        catalog: PathBuf,
        #[arg(long, default_value = "Convoy")]
        name: String,
    },
    /// Add a vehicle spec, or a whole convoy when the input has `vehicles`
    Add {
        input: String,
        /// Attach an added vehicle to this convoy
        #[arg(long)]
        convoy: Option<ConvoyId>,
    },
    /// Damage a vehicle
    Damage {
        vehicle: VehicleId,
        amount: i64,
        #[arg(long = "type")]
        damage_type: Option<String>,
        #[arg(long)]
        source: Option<String>,
    },
    /// Repair a vehicle
    Repair {
        vehicle: VehicleId,
        amount: i64,
        #[arg(long, default_value_t = 0)]
        parts_cost: u32,
        #[arg(long, default_value_t = 0.0)]
        hours: f64,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Load a cargo item onto a vehicle
    LoadCargo {
        vehicle: VehicleId,
        name: String,
        weight: f64,
        #[arg(long, default_value = "General")]
        category: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Unload a cargo item by id
    UnloadCargo { vehicle: VehicleId, item: String },
    /// Show the fleet
    Show,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    if let Err(err) = run(&args) {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut out = OutputTarget::new(args.output.clone())?;
    let format = args.format;

    match &args.command {
        Command::Vehicle { input } => {
            let spec = parse_input(input)?;
            let vehicle = Vehicle::try_build(spec).map_err(|errors| anyhow!("invalid vehicle: {errors}"))?;
            emit(&mut out, format, &vehicle, |w| report::vehicle(w, &vehicle))?;
        }
        Command::Convoy { input } => {
            let input: ConvoyInput = parse_input(input)?;
            let (fleet, id) = build_convoy(config, input)?;
            let view = ConvoyView::new(&fleet, id)?;
            emit(&mut out, format, &view, |w| {
                report::convoy(w, view.convoy, &fleet.convoy_members(id))
            })?;
        }
        Command::Compare { input } => {
            let input: CompareInput = parse_input(input)?;
            let mut fleet = Fleet::new(config);
            let mut ids = Vec::with_capacity(input.convoys.len());
            for convoy in input.convoys {
                ids.push(fleet.build_convoy(convoy.convoy_name, convoy.vehicles, convoy.options)?);
            }
            let convoys: Vec<_> = ids.iter().filter_map(|id| fleet.convoy(*id)).collect();
            let comparison = compare_convoys(&convoys);
            emit(&mut out, format, &comparison, |w| report::comparison(w, &comparison))?;
        }
        Command::Recommend { input } => {
            let input: RecommendInput = parse_input(input)?;
            if input.available_vehicles.is_empty() {
                bail!("availableVehicles must list at least one vehicle");
            }
            let recs =
                recommend_with_config(&input.requirements, &input.available_vehicles, &config);
            emit(&mut out, format, &recs, |w| report::recommendations(w, &recs))?;
        }
        Command::Plan {
            input,
            distance,
            terrain,
            weather,
        } => {
            let input: ConvoyInput = parse_input(input)?;
            let (fleet, id) = build_convoy(config, input)?;
            let convoy = fleet.convoy(id).context("convoy missing after build")?;
            let plan = plan_travel(convoy, *distance, *terrain, *weather)
                .with_context(|| format!("cannot plan travel for '{}'", convoy.name()))?;
            let view = PlanView {
                convoy_name: convoy.name(),
                plan,
            };
            emit(&mut out, format, &view, |w| report::plan(w, convoy.name(), &plan))?;
        }
        Command::Fleet { fleet, action } => run_fleet(&mut out, format, config, fleet, action)?,
    }

    out.flush_inner()?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = input::read_file(path)?;
    EngineConfig::from_json(&raw).with_context(|| format!("invalid engine config {}", path.display()))
}

fn build_convoy(config: EngineConfig, input: ConvoyInput) -> Result<(Fleet, ConvoyId)> {
    let mut fleet = Fleet::new(config);
    let id = fleet
        .build_convoy(input.convoy_name, input.vehicles, input.options)
        .context("failed to build convoy")?;
    Ok((fleet, id))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConvoyView<'a> {
    convoy: &'a convoy_engine::Convoy,
    vehicles: Vec<convoy_engine::VehicleSummary>,
}

impl<'a> ConvoyView<'a> {
    fn new(fleet: &'a Fleet, id: ConvoyId) -> Result<Self> {
        let convoy = fleet.convoy(id).context("convoy missing after build")?;
        Ok(Self {
            convoy,
            vehicles: fleet
                .convoy_members(id)
                .into_iter()
                .filter_map(Vehicle::summary)
                .collect(),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanView<'a> {
    convoy_name: &'a str,
    #[serde(flatten)]
    plan: TravelPlan,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "outcome")]
enum FleetOutcome {
    VehicleAdded {
        vehicle_id: VehicleId,
        convoy_id: Option<ConvoyId>,
    },
    ConvoyAdded {
        convoy_id: ConvoyId,
        vehicle_ids: Vec<VehicleId>,
    },
    Condition {
        vehicle_id: VehicleId,
        change: ConditionChange,
    },
    Cargo {
        vehicle_id: VehicleId,
        receipt: CargoReceipt,
    },
}

fn run_fleet(
    out: &mut OutputTarget,
    format: OutputFormat,
    config: EngineConfig,
    path: &Path,
    action: &FleetAction,
) -> Result<()> {
    let engine = ConvoyEngine::with_config(FileCatalog, FileStore, config);
    let name = path.to_string_lossy();

    let mut fleet = if let FleetAction::Init { catalog, name: convoy_name } = action {
        let (fleet, _) = engine.fleet_from_catalog(&catalog.to_string_lossy(), convoy_name)?;
        fleet
    } else {
        engine
            .load_fleet(&name)
            .with_context(|| format!("failed to read fleet {}", path.display()))?
            .unwrap_or_else(|| Fleet::new(config))
    };

    let outcome = match action {
        FleetAction::Init { .. } => None,
        FleetAction::Show => return emit(out, format, &fleet, |w| report::fleet(w, &fleet)),
        FleetAction::Add { input, convoy } => Some(match parse_input::<FleetAddInput>(input)? {
            FleetAddInput::Convoy(input) => {
                let convoy_id = fleet.build_convoy(input.convoy_name, input.vehicles, input.options)?;
                let vehicle_ids = fleet
                    .convoy(convoy_id)
                    .map(|c| c.vehicle_ids().to_vec())
                    .unwrap_or_default();
                FleetOutcome::ConvoyAdded {
                    convoy_id,
                    vehicle_ids,
                }
            }
            FleetAddInput::Vehicle(spec) => {
                let vehicle_id = fleet.add_vehicle(spec)?;
                if let Some(convoy_id) = convoy {
                    fleet.add_to_convoy(*convoy_id, vehicle_id)?;
                }
                FleetOutcome::VehicleAdded {
                    vehicle_id,
                    convoy_id: *convoy,
                }
            }
        }),
        FleetAction::Damage {
            vehicle,
            amount,
            damage_type,
            source,
        } => {
            let mut damage = Damage::new(*amount);
            if let Some(damage_type) = damage_type {
                damage = damage.with_type(damage_type.as_str());
            }
            if let Some(source) = source {
                damage = damage.with_source(source.as_str());
            }
            Some(FleetOutcome::Condition {
                vehicle_id: *vehicle,
                change: fleet.apply_damage(*vehicle, &damage)?,
            })
        }
        FleetAction::Repair {
            vehicle,
            amount,
            parts_cost,
            hours,
            notes,
        } => {
            let repair = Repair::new(*amount)
                .with_costs(*parts_cost, *hours)
                .with_notes(notes.as_str());
            Some(FleetOutcome::Condition {
                vehicle_id: *vehicle,
                change: fleet.repair(*vehicle, &repair)?,
            })
        }
        FleetAction::LoadCargo {
            vehicle,
            name,
            weight,
            category,
            notes,
        } => {
            let cargo = NewCargo::new(name.as_str(), *weight)
                .with_category(category.as_str())
                .with_notes(notes.as_str());
            Some(FleetOutcome::Cargo {
                vehicle_id: *vehicle,
                receipt: fleet.add_cargo(*vehicle, cargo)?,
            })
        }
        FleetAction::UnloadCargo { vehicle, item } => Some(FleetOutcome::Cargo {
            vehicle_id: *vehicle,
            receipt: fleet.remove_cargo(*vehicle, item)?,
        }),
    };

    engine
        .save_fleet(&name, &fleet)
        .with_context(|| format!("failed to write fleet {}", path.display()))?;
    match outcome {
        Some(outcome) => emit(out, format, &outcome, |w| render_outcome(w, &outcome)),
        None => emit(out, format, &fleet, |w| report::fleet(w, &fleet)),
    }
}

fn render_outcome(w: &mut dyn Write, outcome: &FleetOutcome) -> std::io::Result<()> {
    match outcome {
        FleetOutcome::VehicleAdded {
            vehicle_id,
            convoy_id,
        } => match convoy_id {
            Some(convoy_id) => writeln!(w, "Added vehicle #{vehicle_id} to convoy #{convoy_id}"),
            None => writeln!(w, "Added vehicle #{vehicle_id}"),
        },
        FleetOutcome::ConvoyAdded {
            convoy_id,
            vehicle_ids,
        } => writeln!(
            w,
            "Added convoy #{convoy_id} with {} vehicles",
            vehicle_ids.len()
        ),
        FleetOutcome::Condition { vehicle_id, change } => {
            write!(w, "Vehicle #{vehicle_id}: ")?;
            report::condition_change(w, change)
        }
        FleetOutcome::Cargo {
            vehicle_id,
            receipt,
        } => {
            write!(w, "Vehicle #{vehicle_id}: ")?;
            report::receipt(w, receipt)
        }
    }
}

fn emit<T, F>(out: &mut OutputTarget, format: OutputFormat, value: &T, console: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(out.writer(), value)?;
            writeln!(out.writer())?;
        }
        OutputFormat::Console => console(out.writer())?,
    }
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}
