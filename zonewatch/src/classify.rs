//! Point classification against region geometries.
//!
//! Both predicates are fail-closed toward "open water": the empty sentinel,
//! an unavailable engine, or an engine error all answer `false`.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::coord::LatLng;
use crate::geometry::{ClassificationError, ContainmentEngine, RegionGeometry};

/// Zone and land membership of a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub in_zone: bool,
    pub on_land: bool,
}

impl Classification {
    /// Open water inside the restricted zone.
    pub fn is_restricted_water(&self) -> bool {
        self.in_zone && !self.on_land
    }

    /// Open water outside the restricted zone.
    pub fn is_open_water(&self) -> bool {
        !self.in_zone && !self.on_land
    }
}

/// Stateless zone/land predicates over a containment engine.
#[derive(Clone)]
pub struct Classifier {
    engine: Arc<dyn ContainmentEngine>,
}

impl Classifier {
    pub fn new(engine: Arc<dyn ContainmentEngine>) -> Self {
        Self { engine }
    }

    /// Whether the point lies strictly inside the restricted-zone buffer.
    pub fn in_zone(&self, point: &LatLng, buffer: &RegionGeometry) -> bool {
        self.test(point, buffer, "buffer")
    }

    /// Whether the point lies strictly inside the land mask.
    pub fn on_land(&self, point: &LatLng, land: &RegionGeometry) -> bool {
        self.test(point, land, "land")
    }

    /// Both predicates at once.
    pub fn classify(
        &self,
        point: &LatLng,
        buffer: &RegionGeometry,
        land: &RegionGeometry,
    ) -> Classification {
        Classification {
            in_zone: self.in_zone(point, buffer),
            on_land: self.on_land(point, land),
        }
    }

    /// Whether the configured engine can answer queries.
    pub fn engine_available(&self) -> bool {
        self.engine.is_available()
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    fn test(&self, point: &LatLng, geometry: &RegionGeometry, slot: &'static str) -> bool {
        if geometry.is_empty() || !self.engine.is_available() {
            return false;
        }

        match self.engine.contains(geometry, point) {
            Ok(contained) => contained,
            Err(e @ ClassificationError::NonFinite { .. }) => {
                tracing::warn!(slot, point = %point, error = %e, "Classification failed");
                false
            }
            Err(e) => {
                debug!(slot, error = %e, "Classification skipped");
                false
            }
        }
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("engine", &self.engine.name())
            .finish()
    }
}
