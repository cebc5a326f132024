//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;
use serde::Serialize;
use zonewatch::coord::LatLng;
use zonewatch::placement::ValvePolicy;

use crate::error::CliError;

/// Valve policy selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PolicyArg {
    /// Every vessel gets a random valve state
    Random,
    /// Vessels inside the zone start closed
    ClosedInZone,
}

impl From<PolicyArg> for ValvePolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Random => ValvePolicy::Random,
            PolicyArg::ClosedInZone => ValvePolicy::ClosedInZone,
        }
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Validate a point given on the command line.
pub fn parse_point(lat: f64, lng: f64) -> Result<LatLng, CliError> {
    LatLng::new(lat, lng).map_err(|e| CliError::InvalidArgument(e.to_string()))
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub fn valve_label(open: bool) -> &'static str {
    if open {
        "OPEN"
    } else {
        "closed"
    }
}
