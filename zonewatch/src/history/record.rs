//! History records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::coord::LatLng;
use crate::store::VesselId;

/// Classification-derived status of an open event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisposalStatus {
    /// Valve opened while inside the restricted zone.
    IllegalDisposal,
    /// Valve opened in open water outside the zone.
    OpenedOutsideZone,
}

impl DisposalStatus {
    pub fn from_in_zone(in_zone: bool) -> Self {
        if in_zone {
            DisposalStatus::IllegalDisposal
        } else {
            DisposalStatus::OpenedOutsideZone
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisposalStatus::IllegalDisposal => "Illegal Disposal (Opened in Zone)",
            DisposalStatus::OpenedOutsideZone => "Opened Outside Zone",
        }
    }
}

impl fmt::Display for DisposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DisposalStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One valve-open event, frozen at the moment it happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    #[serde(rename = "boatId")]
    pub vessel_id: VesselId,
    #[serde(rename = "boatName")]
    pub vessel_name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub position: LatLng,
    pub in_zone: bool,
    pub status: DisposalStatus,
    #[serde(rename = "country")]
    pub region: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_text() {
        assert_eq!(
            DisposalStatus::from_in_zone(true).to_string(),
            "Illegal Disposal (Opened in Zone)"
        );
        assert_eq!(
            DisposalStatus::from_in_zone(false).to_string(),
            "Opened Outside Zone"
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let record = HistoryRecord {
            vessel_id: 305,
            vessel_name: "Blue Fin 404".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
            position: LatLng::new(43.2, 16.1).unwrap(),
            in_zone: true,
            status: DisposalStatus::IllegalDisposal,
            region: "croatia".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["boatId"], 305);
        assert_eq!(json["boatName"], "Blue Fin 404");
        assert_eq!(json["timestamp"], "2025-03-14T09:26:53Z");
        assert_eq!(json["lat"], 43.2);
        assert_eq!(json["lng"], 16.1);
        assert_eq!(json["inZone"], true);
        assert_eq!(json["status"], "Illegal Disposal (Opened in Zone)");
        assert_eq!(json["country"], "croatia");
    }
}
