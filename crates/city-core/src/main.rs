//! City Pulse Simulation
//!
//! Runs the weather front simulator and city dynamics aggregator over a
//! synthetic calendar and writes one JSON cycle report per line.

use clap::Parser;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use city_core::config::default_config_toml;
use city_core::{ConfigError, SimConfig, Simulation, SyntheticCalendar, WorldState};
use city_events::CycleInputs;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "city_sim")]
#[command(about = "Weather fronts and neighborhood dynamics for a simulated city")]
struct Args {
    /// Random seed for reproducibility (overrides the config file)
    #[arg(long)]
    seed: Option<u32>,

    /// Number of cycles to simulate
    #[arg(long, default_value_t = 48)]
    cycles: u64,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Month the synthetic calendar starts in (1-12)
    #[arg(long, default_value_t = 1)]
    start_month: u8,

    /// Write JSONL cycle reports here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// World state file; resumed from if present and saved after the run
    #[arg(long)]
    state: Option<PathBuf>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn load_state(path: &Path) -> Result<WorldState, CliError> {
    if !path.exists() {
        tracing::info!("No state at {}, starting fresh", path.display());
        return Ok(WorldState::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn save_state(path: &Path, state: &WorldState) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json)?;
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    if args.print_default_config {
        print!("{}", default_config_toml());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.rng.seed = Some(seed);
    }

    let state = match &args.state {
        Some(path) => load_state(path)?,
        None => WorldState::new(),
    };
    // Resume numbering after the last cycle the state saw.
    let first_cycle = state.current_cycle().map_or(1, |c| c + 1);

    tracing::info!(
        "Running {} cycles from cycle {} (seed {:?})",
        args.cycles,
        first_cycle,
        config.rng.seed
    );

    let calendar = SyntheticCalendar::new(args.start_month);
    let mut sim = Simulation::with_state(config, state);

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(fs::File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::new(sink);

    for cycle in first_cycle..first_cycle + args.cycles {
        let inputs = CycleInputs::new(calendar.calendar_for(cycle));
        if let Some(report) = sim.run_cycle(&inputs) {
            writeln!(out, "{}", report.to_json_line()?)?;
        }
    }
    out.flush()?;

    if let Some(path) = &args.state {
        save_state(path, sim.state())?;
        tracing::info!("Saved world state to {}", path.display());
    }
    Ok(())
}

fn main() {
    init_tracing();
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
