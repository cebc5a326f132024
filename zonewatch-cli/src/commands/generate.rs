//! `zonewatch generate` - run the placement generator for a region.

use clap::Args;

use crate::error::CliError;
use crate::runner::CliRunner;

use super::common::{print_json, valve_label, yes_no, PolicyArg};

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Region code (e.g. uk)
    pub region: String,

    /// Number of vessels (defaults to placement.vessels_per_region)
    #[arg(long, short = 'n')]
    pub count: Option<usize>,

    /// RNG seed for a reproducible fleet
    #[arg(long)]
    pub seed: Option<u64>,

    /// Initial valve state policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Print the placement report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(runner: &mut CliRunner, args: GenerateArgs) -> Result<(), CliError> {
    let placement = &mut runner.config_mut().placement;
    if let Some(seed) = args.seed {
        placement.seed = Some(seed);
    }
    if let Some(policy) = args.policy {
        placement.valve_policy = policy.into();
    }

    let service = runner.create_service()?;
    let count = args
        .count
        .unwrap_or(service.placement().vessels_per_region);
    let report = service.generate(&args.region, count)?;

    if args.json {
        return print_json(&report);
    }

    println!(
        "{:>6}  {:<20} {:>11} {:>12}  {:<6}  {}",
        "ID", "NAME", "LAT", "LNG", "VALVE", "IN ZONE"
    );
    for vessel in &report.vessels {
        let in_zone = service.classify(&report.region, &vessel.position)?.in_zone;
        println!(
            "{:>6}  {:<20} {:>11.6} {:>12.6}  {:<6}  {}",
            vessel.id,
            vessel.name,
            vessel.position.lat,
            vessel.position.lng,
            valve_label(vessel.valve_open),
            yes_no(in_zone)
        );
    }

    println!();
    println!(
        "Placed {} of {} vessel(s) in '{}' ({} attempts)",
        report.vessels.len(),
        count,
        report.region,
        report.attempts
    );
    println!(
        "  inside zone:  {} / {}",
        report.inside_placed, report.inside_target
    );
    println!(
        "  outside zone: {} / {}",
        report.outside_placed, report.outside_target
    );
    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }
    Ok(())
}
