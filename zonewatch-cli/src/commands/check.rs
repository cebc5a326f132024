//! `zonewatch check` - preload every geometry and report per-slot status.

use clap::Args;

use crate::error::CliError;
use crate::runner::CliRunner;

use super::common::print_json;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Exit with an error if any geometry is unavailable
    #[arg(long)]
    pub strict: bool,

    /// Print the statuses as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(runner: &CliRunner, args: CheckArgs) -> Result<(), CliError> {
    let service = runner.create_service()?;
    let statuses = service.preload();
    let unavailable = statuses
        .iter()
        .filter(|s| !s.outcome.is_available())
        .count();

    if args.json {
        let rows: Vec<_> = statuses
            .iter()
            .map(|s| {
                serde_json::json!({
                    "region": s.region,
                    "kind": s.kind.name(),
                    "status": s.outcome.status(),
                    "detail": s.outcome.to_string(),
                })
            })
            .collect();
        print_json(&rows)?;
    } else {
        println!("Geometry status");
        println!("===============");
        for status in &statuses {
            let marker = if status.outcome.is_available() {
                "ok"
            } else {
                "!!"
            };
            println!(
                "[{}] {:<10} {:<7} {:<15} {}",
                marker,
                status.region,
                status.kind.name(),
                status.outcome.status(),
                status.outcome
            );
        }
        println!();
        println!(
            "{} of {} slot(s) available",
            statuses.len() - unavailable,
            statuses.len()
        );
    }

    if args.strict && unavailable > 0 {
        return Err(CliError::GeometryCheck { unavailable });
    }
    Ok(())
}
