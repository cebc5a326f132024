//! Integration tests for the zone service.
//!
//! These tests drive the service the way the map API does, from a config
//! file and GeoJSON fixtures on disk:
//! - Map data with both layers, and with a missing buffer
//! - Valve toggles and the history they produce
//! - Fleet randomisation, id uniqueness, and failed reloads
//! - Buffers grown from land
//! - Lookup misses for unknown regions and vessels

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use tempfile::TempDir;
use zonewatch::cache::LoadOutcome;
use zonewatch::config::ConfigFile;
use zonewatch::coord::LatLng;
use zonewatch::geometry::GeometryKind;
use zonewatch::placement::ValvePolicy;
use zonewatch::service::{ServiceError, ZoneService};

// =============================================================================
// Test Helpers
// =============================================================================

fn square_feature(lo: f64, hi: f64) -> Value {
    json!({
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[lo, lo], [hi, lo], [hi, hi], [lo, hi], [lo, lo]]]
        }
    })
}

fn write_geojson(path: &Path, feature: Value) {
    let doc = json!({
        "type": "FeatureCollection",
        "crs": { "type": "name", "properties": { "name": "EPSG:4326" } },
        "features": [feature]
    });
    fs::write(path, serde_json::to_vec(&doc).unwrap()).unwrap();
}

/// Lays out one region, `testland`, whose land is the unit square and whose
/// buffer pads it by half a degree, and returns the loaded config.
fn fixture(temp: &TempDir, seed: u64) -> ConfigFile {
    let data_dir = temp.path().join("data");
    let region_dir = data_dir.join("testland_shapefiles");
    fs::create_dir_all(&region_dir).unwrap();
    write_geojson(&region_dir.join("land.geojson"), square_feature(0.0, 1.0));
    write_geojson(&region_dir.join("buffer.geojson"), square_feature(-0.5, 1.5));

    let ini = format!(
        "[data]\n\
         directory = {}\n\
         \n\
         [placement]\n\
         vessels_per_region = 20\n\
         seed = {}\n\
         first_vessel_id = 1000\n\
         \n\
         [regions]\n\
         enabled = testland\n\
         \n\
         [region.testland]\n\
         land = land.geojson\n\
         buffer = buffer.geojson\n\
         center = 0.5, 0.5\n\
         zoom = 8\n\
         box.All = -2, 3, -2, 3\n",
        data_dir.display(),
        seed
    );
    let config_path = temp.path().join("config.ini");
    fs::write(&config_path, ini).unwrap();
    ConfigFile::load_from(&config_path).unwrap()
}

fn service(temp: &TempDir) -> ZoneService {
    ZoneService::from_config(&fixture(temp, 17)).unwrap()
}

fn buffer_path(temp: &TempDir) -> std::path::PathBuf {
    temp.path()
        .join("data")
        .join("testland_shapefiles")
        .join("buffer.geojson")
}

// =============================================================================
// Map data
// =============================================================================

#[test]
fn test_map_data_payload() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);

    let data = service.map_data("testland").unwrap();
    assert!(data.errors.is_none(), "{:?}", data.errors);
    assert_eq!(data.boats.len(), 20);
    assert!(data.boats.iter().all(|b| b.id >= 1000));

    let value = serde_json::to_value(&data).unwrap();
    assert_eq!(value["land"]["type"], "FeatureCollection");
    assert_eq!(value["buffer"]["type"], "FeatureCollection");
    assert_eq!(value["center"], json!([0.5, 0.5]));
    assert_eq!(value["zoom"], 8);
    assert!(value["errors"].is_null());

    let boat = &value["boats"][0];
    for key in ["id", "name", "lat", "lng", "valveOpen", "country"] {
        assert!(boat.get(key).is_some(), "boat is missing '{}'", key);
    }
    assert_eq!(boat["country"], "testland");
}

#[test]
fn test_map_data_quota_split() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);

    let data = service.map_data("testland").unwrap();
    let mut inside = 0;
    for boat in &data.boats {
        let c = service.classify("testland", &boat.position).unwrap();
        assert!(!c.on_land, "boat {} placed on land", boat.id);
        if c.in_zone {
            inside += 1;
        }
    }
    assert_eq!(inside, 4);
}

#[test]
fn test_map_data_missing_buffer() {
    let temp = TempDir::new().unwrap();
    let config = fixture(&temp, 17);
    fs::remove_file(buffer_path(&temp)).unwrap();
    let service = ZoneService::from_config(&config).unwrap();

    let data = service.map_data("testland").unwrap();
    assert!(data.buffer.is_none());
    assert!(data.land.is_some());
    assert!(!data.boats.is_empty());
    assert!(data
        .errors()
        .iter()
        .any(|e| e.contains("Buffer geometry unavailable for 'testland'")));
}

#[test]
fn test_unknown_region_leaves_state_unchanged() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);

    assert!(matches!(
        service.map_data("xx"),
        Err(ServiceError::RegionNotFound(_))
    ));
    assert!(matches!(
        service.randomise("xx"),
        Err(ServiceError::RegionNotFound(_))
    ));
    assert!(service.history().is_empty());
    assert_eq!(service.cache_stats().loads, 0);
}

#[test]
fn test_seed_reproduces_fleet() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();

    let first = service(&a).map_data("testland").unwrap().boats;
    let second = service(&b).map_data("testland").unwrap().boats;
    assert_eq!(first, second);
}

// =============================================================================
// Valve toggles and history
// =============================================================================

#[test]
fn test_toggle_twice_restores_state() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);
    let boat = service.map_data("testland").unwrap().boats[3].clone();

    service.toggle_valve(boat.id).unwrap();
    let second = service.toggle_valve(boat.id).unwrap();

    assert_eq!(second.valve_open, boat.valve_open);
    assert_eq!(service.history().len(), 1);
    assert_eq!(service.history()[0].vessel_id, boat.id);
}

#[test]
fn test_history_record_fields() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);
    let data = service.map_data("testland").unwrap();
    let closed = data.boats.iter().find(|b| !b.valve_open).unwrap();

    let response = service.toggle_valve(closed.id).unwrap();
    assert!(response.valve_open);

    let history = serde_json::to_value(service.history()).unwrap();
    let record = &history[0];
    assert_eq!(record["boatId"], closed.id);
    assert_eq!(record["boatName"], closed.name.as_str());
    assert_eq!(record["country"], "testland");
    assert_eq!(record["lat"], closed.position.lat);
    assert!(record["timestamp"].as_str().unwrap().ends_with('Z'));

    let in_zone = record["inZone"].as_bool().unwrap();
    let expected = if in_zone {
        "Illegal Disposal (Opened in Zone)"
    } else {
        "Opened Outside Zone"
    };
    assert_eq!(record["status"], expected);
}

#[test]
fn test_inside_vessel_is_illegal_disposal() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);
    let data = service.map_data("testland").unwrap();

    let inside = data
        .boats
        .iter()
        .find(|b| service.classify("testland", &b.position).unwrap().in_zone)
        .unwrap();
    if inside.valve_open {
        service.toggle_valve(inside.id).unwrap();
    }
    service.toggle_valve(inside.id).unwrap();

    let record = &service.history()[0];
    assert!(record.in_zone);
    assert_eq!(record.status.as_str(), "Illegal Disposal (Opened in Zone)");
}

#[test]
fn test_toggle_unknown_vessel() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);
    service.map_data("testland").unwrap();

    let err = service.toggle_valve(42).unwrap_err();
    assert_eq!(err.to_string(), "Boat 42 not found");
    assert!(service.history().is_empty());
}

// =============================================================================
// Randomise
// =============================================================================

#[test]
fn test_randomise_issues_fresh_ids() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);

    let mut seen: HashSet<u64> = HashSet::new();
    for boat in service.map_data("testland").unwrap().boats {
        assert!(seen.insert(boat.id));
    }
    for _ in 0..3 {
        for boat in service.randomise("testland").unwrap() {
            assert!(seen.insert(boat.id), "id {} reused", boat.id);
        }
    }
    assert_eq!(seen.len(), 80);
}

#[test]
fn test_failed_randomise_keeps_cached_geometry() {
    let temp = TempDir::new().unwrap();
    let mut config = fixture(&temp, 17);
    config.placement.valve_policy = ValvePolicy::ClosedInZone;
    let service = ZoneService::from_config(&config).unwrap();

    let before = service.map_data("testland").unwrap().boats;
    let inside = before
        .iter()
        .find(|b| service.classify("testland", &b.position).unwrap().in_zone)
        .cloned()
        .unwrap();
    assert!(!inside.valve_open);

    fs::remove_file(buffer_path(&temp)).unwrap();
    let err = service.randomise("testland").unwrap_err();
    match err {
        ServiceError::GeometryUnavailable { kind, outcome, .. } => {
            assert_eq!(kind, GeometryKind::Buffer);
            assert!(matches!(outcome, LoadOutcome::Missing { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.fleet("testland").unwrap(), before);

    // The kept fleet is still classified against the buffer it was placed in.
    let data = service.map_data("testland").unwrap();
    assert!(data.buffer.is_some());
    assert!(data.errors.is_none(), "{:?}", data.errors);
    assert!(service.classify("testland", &inside.position).unwrap().in_zone);

    let response = service.toggle_valve(inside.id).unwrap();
    let record = response.event.unwrap();
    assert!(record.in_zone);
    assert_eq!(record.status.as_str(), "Illegal Disposal (Opened in Zone)");
}

#[test]
fn test_randomise_rereads_geometry() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);
    service.map_data("testland").unwrap();

    let edge = LatLng::new(1.4, 0.5).unwrap();
    assert!(service.classify("testland", &edge).unwrap().in_zone);

    write_geojson(&buffer_path(&temp), square_feature(-0.25, 1.25));
    assert_eq!(service.randomise("testland").unwrap().len(), 20);
    assert!(!service.classify("testland", &edge).unwrap().in_zone);
}

#[test]
fn test_buffer_grown_from_land() {
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("data");
    let region_dir = data_dir.join("islet_shapefiles");
    fs::create_dir_all(&region_dir).unwrap();
    write_geojson(&region_dir.join("land.geojson"), square_feature(0.0, 0.1));

    let ini = format!(
        "[data]\n\
         directory = {}\n\
         \n\
         [placement]\n\
         vessels_per_region = 10\n\
         seed = 5\n\
         \n\
         [regions]\n\
         enabled = islet\n\
         \n\
         [region.islet]\n\
         land = land.geojson\n\
         buffer_distance_m = 5556\n\
         center = 0.05, 0.05\n\
         box.All = -0.2, 0.3, -0.2, 0.3\n",
        data_dir.display()
    );
    let config_path = temp.path().join("config.ini");
    fs::write(&config_path, ini).unwrap();
    let config = ConfigFile::load_from(&config_path).unwrap();
    let service = ZoneService::from_config(&config).unwrap();

    let data = service.map_data("islet").unwrap();
    assert!(data.buffer.is_some());
    assert!(data.errors.is_none(), "{:?}", data.errors);

    // 0.1° is ~11 km at the equator; the buffer reaches ~5.6 km out.
    let near = LatLng::new(0.05, 0.13).unwrap();
    let far = LatLng::new(0.05, 0.2).unwrap();
    assert!(service.classify("islet", &near).unwrap().in_zone);
    assert!(!service.classify("islet", &near).unwrap().on_land);
    assert!(!service.classify("islet", &far).unwrap().in_zone);

    let statuses = service.preload();
    assert!(statuses.iter().any(|s| {
        s.kind == GeometryKind::Buffer && matches!(s.outcome, LoadOutcome::Derived { .. })
    }));
}

#[test]
fn test_classify_point() {
    let temp = TempDir::new().unwrap();
    let service = service(&temp);

    let water = service
        .classify("testland", &LatLng::new(1.25, 0.5).unwrap())
        .unwrap();
    assert!(water.in_zone && !water.on_land);

    let land = service
        .classify("testland", &LatLng::new(0.5, 0.5).unwrap())
        .unwrap();
    assert!(land.in_zone && land.on_land);

    let far = service
        .classify("testland", &LatLng::new(10.0, 10.0).unwrap())
        .unwrap();
    assert!(!far.in_zone && !far.on_land);
}
