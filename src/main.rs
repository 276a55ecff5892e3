use anyhow::{Context, Result};
use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use creature_evo::simulation::exit_when_extinct;
use creature_evo::{EvolutionConfig, EvolutionPlugin};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "creature-evo",
    version,
    about = "Run the creature evolution simulation headless"
)]
struct Cli {
    /// JSON configuration file; omitted fields keep their defaults.
    config: Option<PathBuf>,

    /// Seed for the simulation's random stream.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of founders.
    #[arg(long)]
    initial_population: Option<usize>,

    /// Breeding stops at this population size.
    #[arg(long)]
    max_population: Option<usize>,

    /// Simulation steps per second.
    #[arg(long, default_value_t = 60.0)]
    tick_rate: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EvolutionConfig::from_json_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => EvolutionConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(initial) = cli.initial_population {
        config.initial_population = initial;
    }
    if let Some(max) = cli.max_population {
        config.max_population = max;
    }
    let plugin = EvolutionPlugin::new(config).context("invalid configuration")?;

    let step = Duration::from_secs_f64(1.0 / cli.tick_rate.max(1.0));
    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(step)))
        .add_plugins(LogPlugin::default())
        .add_plugins(plugin)
        .add_systems(Update, exit_when_extinct)
        .run();

    Ok(())
}
