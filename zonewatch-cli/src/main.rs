//! Zonewatch CLI - Command-line interface
//!
//! This binary provides a command-line interface to the zonewatch library:
//! inspect regions and their geometry, classify points, generate fleets, and
//! simulate valve openings.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::check::CheckArgs;
use commands::classify::ClassifyArgs;
use commands::config::ConfigCommands;
use commands::generate::GenerateArgs;
use commands::simulate::SimulateArgs;
use error::CliError;
use runner::{CliRunner, RunnerOptions};

#[derive(Parser)]
#[command(name = "zonewatch")]
#[command(version, about = "Coastal restricted-zone monitoring", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.zonewatch/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Mirror log output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List enabled regions with center, zoom, and sampling boxes
    Regions,

    /// Load every region geometry and print per-slot status
    Check(CheckArgs),

    /// Classify a point as in-zone and/or on-land
    #[command(allow_negative_numbers = true)]
    Classify(ClassifyArgs),

    /// Generate a fleet for a region and print the placement report
    Generate(GenerateArgs),

    /// Generate a fleet, toggle random valves, and print the history
    Simulate(SimulateArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let options = RunnerOptions {
        config_path: cli.config.as_deref(),
        debug: cli.debug,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Config { command } => commands::config::run(command, options.config_path),
        Commands::Regions => {
            let runner = start(options, "regions")?;
            commands::regions::run(&runner)
        }
        Commands::Check(args) => {
            let runner = start(options, "check")?;
            commands::check::run(&runner, args)
        }
        Commands::Classify(args) => {
            let runner = start(options, "classify")?;
            commands::classify::run(&runner, args)
        }
        Commands::Generate(args) => {
            let mut runner = start(options, "generate")?;
            commands::generate::run(&mut runner, args)
        }
        Commands::Simulate(args) => {
            let mut runner = start(options, "simulate")?;
            commands::simulate::run(&mut runner, args)
        }
    }
}

fn start(options: RunnerOptions<'_>, command: &str) -> Result<CliRunner, CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup(command);
    Ok(runner)
}
