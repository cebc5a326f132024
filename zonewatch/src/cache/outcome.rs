//! Per-slot load diagnostics.

use std::fmt;
use std::path::PathBuf;

use crate::crs::Crs;
use crate::geometry::GeometryKind;

/// Result of the most recent load attempt for one (region, kind) slot.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Geometry loaded and unioned.
    Loaded {
        parts: usize,
        discarded: usize,
        crs: Crs,
        crs_assumed: bool,
    },
    /// Buffer grown from the region's land geometry.
    Derived {
        parts: usize,
        distance_m: f64,
        crs: Crs,
    },
    /// The region has no source for this slot.
    NotConfigured,
    /// The geometry file does not exist.
    Missing { path: PathBuf },
    /// The file names a reference system that cannot be reprojected.
    InvalidCrs { reason: String },
    /// Reading, parsing, or overlay failed.
    Failed { reason: String },
    /// The region code is not configured.
    UnknownRegion,
}

impl LoadOutcome {
    /// True when the slot holds a real geometry.
    pub fn is_available(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. } | LoadOutcome::Derived { .. })
    }

    /// Short status word for tables and log fields.
    pub fn status(&self) -> &'static str {
        match self {
            LoadOutcome::Loaded { .. } => "loaded",
            LoadOutcome::Derived { .. } => "derived",
            LoadOutcome::NotConfigured => "not-configured",
            LoadOutcome::Missing { .. } => "missing",
            LoadOutcome::InvalidCrs { .. } => "invalid-crs",
            LoadOutcome::Failed { .. } => "load-error",
            LoadOutcome::UnknownRegion => "unknown-region",
        }
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadOutcome::Loaded {
                parts,
                discarded,
                crs,
                crs_assumed,
            } => {
                write!(f, "{} part(s) from {}", parts, crs)?;
                if *crs_assumed {
                    f.write_str(" (assumed)")?;
                }
                if *discarded > 0 {
                    write!(f, ", {} invalid polygon(s) discarded", discarded)?;
                }
                Ok(())
            }
            LoadOutcome::Derived {
                parts,
                distance_m,
                crs,
            } => write!(
                f,
                "{} part(s) buffered {} m from land in {}",
                parts, distance_m, crs
            ),
            LoadOutcome::NotConfigured => f.write_str("no geometry source configured"),
            LoadOutcome::Missing { path } => write!(f, "file not found: {}", path.display()),
            LoadOutcome::InvalidCrs { reason } => write!(f, "invalid CRS: {}", reason),
            LoadOutcome::Failed { reason } => write!(f, "load error: {}", reason),
            LoadOutcome::UnknownRegion => f.write_str("unknown region"),
        }
    }
}

/// Load outcome for one slot, as reported by preload and map data.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotStatus {
    pub region: String,
    pub kind: GeometryKind,
    pub outcome: LoadOutcome,
}

impl SlotStatus {
    /// Advisory message for an unavailable slot, `None` when loaded.
    pub fn unavailable_message(&self) -> Option<String> {
        if self.outcome.is_available() {
            return None;
        }
        Some(format!(
            "ERROR: {} geometry unavailable for '{}' ({})",
            self.kind.label(),
            self.region,
            self.outcome
        ))
    }
}
