//! `zonewatch classify` - zone and land membership of one point.

use clap::Args;

use crate::error::CliError;
use crate::runner::CliRunner;

use super::common::{parse_point, print_json, yes_no};

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Region code (e.g. uk)
    pub region: String,

    /// Latitude in decimal degrees
    #[arg(allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(allow_hyphen_values = true)]
    pub lng: f64,

    /// Print the classification as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(runner: &CliRunner, args: ClassifyArgs) -> Result<(), CliError> {
    let point = parse_point(args.lat, args.lng)?;
    let service = runner.create_service()?;
    let classification = service.classify(&args.region, &point)?;

    if args.json {
        return print_json(&classification);
    }

    let verdict = if classification.on_land {
        "on land"
    } else if classification.in_zone {
        "restricted water (disposal here is illegal)"
    } else {
        "open water"
    };

    println!("Point {} in '{}'", point, args.region);
    println!("  in zone: {}", yes_no(classification.in_zone));
    println!("  on land: {}", yes_no(classification.on_land));
    println!("  => {}", verdict);
    if !service.classifier().engine_available() {
        println!("  (containment engine disabled; every point reads as open water)");
    }
    Ok(())
}
