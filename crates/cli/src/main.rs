#![deny(unsafe_code)]
//! CLI binary for the swell ocean simulation.
//!
//! Subcommands:
//! - `simulate`: run a cascade set for N ticks, report field ranges, optionally write a PNG
//! - `probe`: water height at world positions at a given time
//! - `list`: print exportable fields and the parameter schema

mod error;
mod height;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use serde_json::{json, Value};
use swell_core::{Seed, Simulation};
use swell_export::pixel::value_range;
use swell_export::FieldKind;
use swell_waves::{CascadeSet, OceanConfig};

#[derive(Parser)]
#[command(name = "swell", about = "Spectral ocean simulation CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Options that describe the ocean to build.
#[derive(Args)]
struct OceanArgs {
    /// Read size, seed, length scales, params, ticks and dt from a seed JSON file.
    #[arg(long)]
    seed_file: Option<PathBuf>,

    /// FFT grid size (power of two).
    #[arg(short = 'n', long, default_value_t = 256)]
    size: usize,

    /// Noise seed for deterministic output.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Cascade length scales in metres, largest first.
    #[arg(long, value_delimiter = ',', default_values_t = [250.0, 17.0, 5.0])]
    length_scales: Vec<f32>,

    /// Wave parameters as a JSON string (see `swell list`).
    #[arg(long, default_value = "{}")]
    params: String,

    /// Spectrum component the wind overrides apply to ("local" or "swell").
    #[arg(long, default_value = "local")]
    component: String,

    /// Override the component's wind speed in m/s.
    #[arg(long)]
    wind_speed: Option<f32>,

    /// Override the component's wave direction in degrees.
    #[arg(long)]
    wind_direction: Option<f32>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the simulation for N ticks and report every cascade's field ranges.
    Simulate {
        #[command(flatten)]
        ocean: OceanArgs,

        /// Number of ticks to run.
        #[arg(short, long, default_value_t = 60)]
        ticks: usize,

        /// Seconds per tick.
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,

        /// Field to report and export (see `swell list`).
        #[arg(short, long, default_value = "height")]
        field: String,

        /// Cascade whose field is written to `--output`.
        #[arg(short, long, default_value_t = 0)]
        cascade: usize,

        /// Write the selected field of the selected cascade as a grayscale PNG.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the water height at world positions.
    Probe {
        #[command(flatten)]
        ocean: OceanArgs,

        /// Simulation time in seconds.
        #[arg(long, default_value_t = 0.0)]
        time: f32,

        /// World x coordinates.
        #[arg(short, long, value_delimiter = ',', required = true)]
        x: Vec<f32>,

        /// World z coordinates, one per x.
        #[arg(short, long, value_delimiter = ',', required = true)]
        z: Vec<f32>,
    },
    /// List exportable fields and the parameter schema.
    List,
}

/// Everything a run needs, from the command line or a seed file.
struct Run {
    config: OceanConfig,
    ticks: Option<usize>,
    dt: Option<f32>,
}

fn read_seed_file(path: &Path) -> Result<Seed, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    log::debug!("loading seed file {}", path.display());
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid seed file {}: {e}", path.display())))
}

fn build_run(args: &OceanArgs) -> Result<Run, CliError> {
    let (seed, from_file) = match &args.seed_file {
        Some(path) => (read_seed_file(path)?, true),
        None => {
            let params: Value = serde_json::from_str(&args.params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let mut seed = Seed::new(args.size, args.seed);
            seed.length_scales = args.length_scales.clone();
            seed.params = params;
            (seed, false)
        }
    };

    let mut config = OceanConfig::from_seed(&seed)?;
    let component = config.settings.component_mut(&args.component)?;
    if let Some(speed) = args.wind_speed {
        component.wind_speed = speed;
    }
    if let Some(direction) = args.wind_direction {
        component.wind_direction = direction;
    }

    Ok(Run {
        config,
        ticks: from_file.then_some(seed.ticks),
        dt: from_file.then_some(seed.dt),
    })
}

fn field_summary(set: &CascadeSet, kind: FieldKind) -> Vec<Value> {
    (0..set.cascade_count())
        .filter_map(|i| {
            let cascade = set.cascade(i)?;
            let field = kind.extract(set, i)?;
            let (min, max) = value_range(&field).unwrap_or((0.0, 0.0));
            Some(json!({
                "cascade": i,
                "length_scale": cascade.length_scale(),
                "band": [cascade.cutoff_low(), cascade.cutoff_high()],
                "min": min,
                "max": max,
            }))
        })
        .collect()
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let fields = FieldKind::list_fields();
            let schema = CascadeSet::schema();
            if cli.json {
                let info = json!({
                    "fields": fields,
                    "params": schema,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Fields:");
                for name in fields {
                    println!("  {name}");
                }
                println!("Parameters:");
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
        }
        Command::Simulate {
            ocean,
            ticks,
            dt,
            field,
            cascade,
            output,
        } => {
            let kind = FieldKind::from_name(&field)?;
            let run = build_run(&ocean)?;
            let ticks = run.ticks.unwrap_or(ticks);
            let dt = run.dt.unwrap_or(dt);
            if !(dt.is_finite() && dt >= 0.0) {
                return Err(CliError::Input(format!("--dt must be non-negative, got {dt}")));
            }

            let mut set = CascadeSet::new(run.config)?;
            if cascade >= set.cascade_count() {
                return Err(CliError::Input(format!(
                    "cascade {cascade} out of range (have {})",
                    set.cascade_count()
                )));
            }

            // Tick 0 sits at t = 0, so `ticks` frames end at (ticks - 1) · dt.
            for tick in 0..ticks.max(1) {
                set.try_advance(tick as f32 * dt, dt)?;
            }
            let end_time = ticks.saturating_sub(1) as f32 * dt;

            if let Some(path) = &output {
                let grid = kind
                    .extract(&set, cascade)
                    .ok_or_else(|| CliError::Input(format!("cascade {cascade} out of range")))?;
                swell_export::snapshot::write_png(&grid, path)?;
            }

            let summary = field_summary(&set, kind);
            if cli.json {
                let info = json!({
                    "size": set.size(),
                    "ticks": ticks,
                    "dt": dt,
                    "time": end_time,
                    "field": kind.name(),
                    "cascades": summary,
                    "output": output.as_ref().map(|p| p.display().to_string()),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "simulated {}x{} ocean, {ticks} ticks to t = {end_time:.3}s",
                    set.size(),
                    set.size()
                );
                for entry in &summary {
                    println!(
                        "cascade {} (L = {} m): {} in [{:.4}, {:.4}]",
                        entry["cascade"],
                        entry["length_scale"],
                        kind.name(),
                        entry["min"].as_f64().unwrap_or(0.0),
                        entry["max"].as_f64().unwrap_or(0.0)
                    );
                }
                if let Some(path) = &output {
                    eprintln!("wrote {} of cascade {cascade} -> {}", kind.name(), path.display());
                }
            }
        }
        Command::Probe { ocean, time, x, z } => {
            if x.len() != z.len() {
                return Err(CliError::Input(format!(
                    "got {} x coordinates and {} z coordinates",
                    x.len(),
                    z.len()
                )));
            }
            let run = build_run(&ocean)?;
            let mut set = CascadeSet::new(run.config)?;
            set.try_advance(time, 0.0)?;

            let heights: Vec<Value> = x
                .iter()
                .zip(&z)
                .map(|(&px, &pz)| {
                    json!({
                        "x": px,
                        "z": pz,
                        "height": height::try_get_height(&set, px, pz),
                    })
                })
                .collect();

            if cli.json {
                let info = json!({"time": time, "heights": heights});
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                for entry in &heights {
                    println!(
                        "({}, {}) -> {}",
                        entry["x"], entry["z"], entry["height"]
                    );
                }
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
