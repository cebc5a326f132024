//! The vessel entity.

use serde::Serialize;

use super::id::VesselId;
use crate::coord::LatLng;

/// A synthetic vessel placed by the generator.
///
/// Serializes with the map-data field names: `id`, `name`, `lat`, `lng`,
/// `valveOpen`, `country`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vessel {
    pub id: VesselId,
    pub name: String,
    #[serde(flatten)]
    pub position: LatLng,
    pub valve_open: bool,
    #[serde(rename = "country")]
    pub region: String,
}

impl Vessel {
    /// Create a vessel, rounding its position to storage precision.
    pub fn new(
        id: VesselId,
        name: impl Into<String>,
        position: LatLng,
        valve_open: bool,
        region: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position: position.rounded(),
            valve_open,
            region: region.into(),
        }
    }
}
