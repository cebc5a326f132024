//! `zonewatch simulate` - toggle random valves and print the history.

use clap::Args;

use crate::error::CliError;
use crate::runner::CliRunner;

use super::common::{print_json, valve_label};

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Region code (e.g. uk)
    pub region: String,

    /// Number of valve toggles
    #[arg(long, short = 't', default_value = "10")]
    pub toggles: usize,

    /// RNG seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the history as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(runner: &mut CliRunner, args: SimulateArgs) -> Result<(), CliError> {
    if let Some(seed) = args.seed {
        runner.config_mut().placement.seed = Some(seed);
    }

    let service = runner.create_service()?;
    let data = service.map_data(&args.region)?;
    for error in data.errors() {
        eprintln!("{}", error);
    }

    let responses = service.simulate(&args.region, args.toggles)?;
    let history = service.history();

    if args.json {
        return print_json(&history);
    }

    println!(
        "Toggled {} valve(s) across {} vessel(s) in '{}'",
        responses.len(),
        data.boats.len(),
        args.region
    );
    for response in &responses {
        println!(
            "  boat {:>5} -> {}",
            response.boat_id,
            valve_label(response.valve_open)
        );
    }

    println!();
    println!("History ({} event(s), newest first)", history.len());
    for record in &history {
        println!(
            "  {}  {:>5} {:<20} {}  {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            record.vessel_id,
            record.vessel_name,
            record.position,
            record.status
        );
    }
    Ok(())
}
