//! Containment engines.
//!
//! The classifier never touches `geo` directly; it asks a
//! [`ContainmentEngine`]. The planar engine is the real implementation. The
//! null engine stands in when containment is switched off in configuration
//! and reports itself unavailable, which classification treats as "not
//! contained".

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use geo::{Contains, Point};
use thiserror::Error;

use super::types::RegionGeometry;
use crate::coord::LatLng;

/// Errors raised by a containment query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassificationError {
    /// The query point has a NaN or infinite coordinate.
    #[error("Cannot classify non-finite point ({lat}, {lng})")]
    NonFinite { lat: f64, lng: f64 },

    /// No containment engine is configured.
    #[error("Containment engine unavailable")]
    EngineUnavailable,
}

/// Point-in-geometry capability.
pub trait ContainmentEngine: Send + Sync {
    /// Boundary-exclusive containment of `point` in `geometry`.
    fn contains(&self, geometry: &RegionGeometry, point: &LatLng)
        -> Result<bool, ClassificationError>;

    /// Whether this engine can answer queries at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Planar point-in-polygon on WGS84 lon/lat.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarEngine;

impl ContainmentEngine for PlanarEngine {
    fn contains(
        &self,
        geometry: &RegionGeometry,
        point: &LatLng,
    ) -> Result<bool, ClassificationError> {
        if !point.is_finite() {
            return Err(ClassificationError::NonFinite {
                lat: point.lat,
                lng: point.lng,
            });
        }

        let Some(bounds) = geometry.bounds() else {
            return Ok(false);
        };
        if point.lng < bounds.min().x
            || point.lng > bounds.max().x
            || point.lat < bounds.min().y
            || point.lat > bounds.max().y
        {
            return Ok(false);
        }

        Ok(geometry.shape().contains(&Point::new(point.lng, point.lat)))
    }

    fn name(&self) -> &'static str {
        "planar"
    }
}

/// Engine used when containment is disabled. Every query fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEngine;

impl ContainmentEngine for NullEngine {
    fn contains(
        &self,
        _geometry: &RegionGeometry,
        _point: &LatLng,
    ) -> Result<bool, ClassificationError> {
        Err(ClassificationError::EngineUnavailable)
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Engine selection from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineKind {
    #[default]
    Planar,
    None,
}

impl EngineKind {
    /// Instantiate the selected engine.
    pub fn build(self) -> Arc<dyn ContainmentEngine> {
        match self {
            EngineKind::Planar => Arc::new(PlanarEngine),
            EngineKind::None => Arc::new(NullEngine),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Planar => "planar",
            EngineKind::None => "none",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planar" => Ok(EngineKind::Planar),
            "none" | "off" | "disabled" => Ok(EngineKind::None),
            other => Err(format!("unknown geometry engine '{}'", other)),
        }
    }
}
