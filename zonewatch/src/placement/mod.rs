//! Constrained vessel placement.
//!
//! Rejection sampling over a region's candidate boxes fills two disjoint
//! quotas: water inside the restricted zone and water outside it. Each quota
//! has a hard attempt budget; running out yields a short fleet and a report
//! warning rather than an error.

mod generator;
mod names;

use std::fmt;
use std::str::FromStr;

pub use generator::{PlacementGenerator, PlacementReport};
pub use names::{random_name, NAME_POOL};

/// Default number of vessels generated per region.
pub const DEFAULT_VESSELS_PER_REGION: usize = 50;

/// Default share of vessels placed inside the restricted zone.
pub const DEFAULT_INSIDE_FRACTION: f64 = 0.20;

/// Default attempts allowed per requested vessel.
pub const DEFAULT_ATTEMPT_MULTIPLIER: usize = 500;

/// Initial valve state of newly placed vessels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValvePolicy {
    /// Every vessel gets a uniformly random valve state.
    #[default]
    Random,
    /// Vessels inside the zone start closed; others are random.
    ClosedInZone,
}

impl ValvePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValvePolicy::Random => "random",
            ValvePolicy::ClosedInZone => "closed_in_zone",
        }
    }
}

impl fmt::Display for ValvePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValvePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "random" => Ok(ValvePolicy::Random),
            "closed_in_zone" | "closed" => Ok(ValvePolicy::ClosedInZone),
            other => Err(format!("unknown valve policy '{}'", other)),
        }
    }
}

/// Tunables for the placement generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementConfig {
    /// Fleet size used when a region is first requested.
    pub vessels_per_region: usize,
    /// Share of each fleet placed inside the zone, in (0, 1].
    pub inside_fraction: f64,
    /// Attempts allowed per requested vessel in each quota.
    pub attempt_multiplier: usize,
    pub valve_policy: ValvePolicy,
}

impl PlacementConfig {
    /// Split `n` into (inside, outside) targets.
    pub fn quota(&self, n: usize) -> (usize, usize) {
        let inside = ((n as f64) * self.inside_fraction).round() as usize;
        let inside = inside.min(n);
        (inside, n - inside)
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            vessels_per_region: DEFAULT_VESSELS_PER_REGION,
            inside_fraction: DEFAULT_INSIDE_FRACTION,
            attempt_multiplier: DEFAULT_ATTEMPT_MULTIPLIER,
            valve_policy: ValvePolicy::default(),
        }
    }
}
