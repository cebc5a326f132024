//! Response payloads returned by the service facade.

use serde::Serialize;
use serde_json::Value;

use crate::history::HistoryRecord;
use crate::store::{Vessel, VesselId};

/// Confirmation text returned with every successful toggle.
pub const VALVE_UPDATED_MESSAGE: &str = "Valve status updated successfully.";

/// Everything a map view needs to render one region.
///
/// `land` and `buffer` are GeoJSON FeatureCollections, or `null` when the
/// geometry is unavailable. `errors` carries advisory messages about
/// degraded geometry and placement, and is `null` when there are none; it
/// never makes the request fail.
#[derive(Debug, Clone, Serialize)]
pub struct MapData {
    pub land: Option<Value>,
    pub buffer: Option<Value>,
    pub boats: Vec<Vessel>,
    /// `[lat, lng]`
    pub center: [f64; 2],
    pub zoom: u8,
    pub errors: Option<Vec<String>>,
}

impl MapData {
    /// Advisory messages, empty when there are none.
    pub fn errors(&self) -> &[String] {
        self.errors.as_deref().unwrap_or_default()
    }

    pub fn is_degraded(&self) -> bool {
        !self.errors().is_empty()
    }
}

/// Result of a valve toggle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub boat_id: VesselId,
    pub valve_open: bool,
    pub message: String,
    /// History record written when the valve opened.
    #[serde(skip)]
    pub event: Option<HistoryRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_toggle_response_field_names() {
        let response = ToggleResponse {
            boat_id: 301,
            valve_open: true,
            message: VALVE_UPDATED_MESSAGE.to_string(),
            event: None,
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "boatId": 301,
                "valveOpen": true,
                "message": "Valve status updated successfully."
            })
        );
    }

    #[test]
    fn test_map_data_null_geometry() {
        let data = MapData {
            land: None,
            buffer: None,
            boats: Vec::new(),
            center: [54.5, -2.0],
            zoom: 6,
            errors: Some(vec!["ERROR: Buffer geometry unavailable".to_string()]),
        };
        let value = serde_json::to_value(&data).unwrap();
        assert!(value["land"].is_null());
        assert!(value["buffer"].is_null());
        assert_eq!(value["center"], json!([54.5, -2.0]));
        assert_eq!(value["errors"], json!(["ERROR: Buffer geometry unavailable"]));
        assert!(data.is_degraded());
    }

    #[test]
    fn test_map_data_clean_errors_are_null() {
        let data = MapData {
            land: Some(json!({ "type": "FeatureCollection", "features": [] })),
            buffer: None,
            boats: Vec::new(),
            center: [13.2, -61.2],
            zoom: 10,
            errors: None,
        };
        let value = serde_json::to_value(&data).unwrap();
        assert!(value["errors"].is_null());
        assert!(value.as_object().unwrap().contains_key("errors"));
        assert!(data.errors().is_empty());
        assert!(!data.is_degraded());
    }
}
