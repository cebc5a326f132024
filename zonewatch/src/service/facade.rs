//! Service facade.
//!
//! `ZoneService` owns every piece of mutable state (geometry cache, RNG, id
//! allocator, entity store, event log) and exposes the operations of the map
//! API. It is `Send + Sync`; share it behind an `Arc`.

use dashmap::DashMap;
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::builder::ZoneServiceBuilder;
use super::error::ServiceError;
use super::types::{MapData, ToggleResponse, VALVE_UPDATED_MESSAGE};
use crate::cache::{CacheStats, CachedGeometry, GeometryCache, SlotStatus};
use crate::classify::{Classification, Classifier};
use crate::config::ConfigFile;
use crate::coord::LatLng;
use crate::geometry::{to_feature_collection, GeometryKind, RegionGeometry};
use crate::history::{EventLog, HistoryRecord};
use crate::placement::{PlacementConfig, PlacementGenerator, PlacementReport};
use crate::region::{RegionConfig, RegionRegistry};
use crate::store::{EntityStore, IdAllocator, Vessel, VesselId};

/// Components handed over by the builder.
pub(super) struct ServiceParts {
    pub registry: Arc<RegionRegistry>,
    pub cache: GeometryCache,
    pub classifier: Classifier,
    pub generator: PlacementGenerator,
    pub rng: ChaCha8Rng,
    pub ids: IdAllocator,
    pub store: EntityStore,
    pub log: EventLog,
}

/// Coastal zone monitoring service.
pub struct ZoneService {
    registry: Arc<RegionRegistry>,
    cache: GeometryCache,
    classifier: Classifier,
    generator: PlacementGenerator,
    rng: Mutex<ChaCha8Rng>,
    ids: IdAllocator,
    store: EntityStore,
    log: EventLog,
    /// Placement warnings from the generation that produced each fleet.
    fleet_warnings: DashMap<String, Vec<String>>,
}

impl ZoneService {
    pub fn builder() -> ZoneServiceBuilder {
        ZoneServiceBuilder::new()
    }

    /// Build a service from a loaded configuration file.
    ///
    /// Fails if an enabled region has no definition.
    pub fn from_config(config: &ConfigFile) -> Result<Self, ServiceError> {
        let registry = config.region_registry()?;
        let mut builder = Self::builder()
            .registry(registry)
            .engine_kind(config.geometry.engine)
            .placement(config.placement_config())
            .first_vessel_id(config.placement.first_vessel_id);
        if let Some(seed) = config.placement.seed {
            builder = builder.seed(seed);
        }

        let service = builder.build();
        info!(
            regions = service.registry.len(),
            engine = service.classifier.engine_name(),
            seeded = config.placement.seed.is_some(),
            "Zone service created"
        );
        Ok(service)
    }

    pub(super) fn from_parts(parts: ServiceParts) -> Self {
        Self {
            registry: parts.registry,
            cache: parts.cache,
            classifier: parts.classifier,
            generator: parts.generator,
            rng: Mutex::new(parts.rng),
            ids: parts.ids,
            store: parts.store,
            log: parts.log,
            fleet_warnings: DashMap::new(),
        }
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn placement(&self) -> &PlacementConfig {
        self.generator.config()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Map payload for a region.
    ///
    /// The region's fleet is generated on first request. Unavailable
    /// geometry degrades the result (null layer, relaxed placement checks)
    /// and is reported in `errors` rather than failing the call. Placement
    /// shortfalls of the current fleet are repeated on every call.
    pub fn map_data(&self, region: &str) -> Result<MapData, ServiceError> {
        let config = self.region(region)?;
        let code = config.code.as_str();
        let land = self.cache.get_entry(code, GeometryKind::Land);
        let buffer = self.cache.get_entry(code, GeometryKind::Buffer);

        let mut errors = self.slot_errors(code, &land, &buffer);
        let (boats, warnings) = self.ensure_fleet(config, &buffer.geometry, &land.geometry);
        errors.extend(warnings);

        if !errors.is_empty() {
            debug!(region = code, errors = errors.len(), "Map data degraded");
        }

        Ok(MapData {
            land: to_feature_collection(&land.geometry, json!({ "region": code, "kind": "land" })),
            buffer: to_feature_collection(
                &buffer.geometry,
                json!({ "region": code, "kind": "buffer" }),
            ),
            boats,
            center: [config.center.lat, config.center.lng],
            zoom: config.zoom,
            errors: (!errors.is_empty()).then_some(errors),
        })
    }

    /// Flip a vessel's valve.
    ///
    /// A closed → open transition appends a history record classified
    /// against the region's cached buffer.
    pub fn toggle_valve(&self, id: VesselId) -> Result<ToggleResponse, ServiceError> {
        let toggled = self.store.toggle_valve(id)?;

        let event = if toggled.opened {
            let buffer = self
                .cache
                .get_geometry(&toggled.vessel.region, GeometryKind::Buffer);
            Some(
                self.log
                    .record_open_event(&toggled.vessel, &buffer, &self.classifier),
            )
        } else {
            debug!(boat_id = id, "Valve closed");
            None
        };

        Ok(ToggleResponse {
            boat_id: id,
            valve_open: toggled.vessel.valve_open,
            message: VALVE_UPDATED_MESSAGE.to_string(),
            event,
        })
    }

    /// All open events, newest first.
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.log.history()
    }

    /// Reload both geometries from disk and regenerate the region's fleet.
    ///
    /// Unlike [`map_data`](Self::map_data) this refuses to run on degraded
    /// geometry. On error both the existing fleet and the cached geometry
    /// are kept.
    pub fn randomise(&self, region: &str) -> Result<Vec<Vessel>, ServiceError> {
        let config = self.region(region)?;
        let code = config.code.as_str();
        let (land, buffer) = self.cache.reload_region(code);

        for (kind, entry) in [(GeometryKind::Land, &land), (GeometryKind::Buffer, &buffer)] {
            if !entry.is_available() {
                warn!(region = code, kind = %kind, outcome = %entry.outcome, "Randomise refused");
                return Err(ServiceError::GeometryUnavailable {
                    region: code.to_string(),
                    kind,
                    outcome: entry.outcome.clone(),
                });
            }
        }

        self.cache.install(code, GeometryKind::Land, land.clone());
        self.cache.install(code, GeometryKind::Buffer, buffer.clone());

        let n = self.generator.config().vessels_per_region;
        let report = self.run_generator(config, n, &buffer.geometry, &land.geometry);
        self.replace_fleet(code, &report);
        info!(region = code, vessels = report.vessels.len(), "Fleet randomised");
        Ok(report.vessels)
    }

    /// Generate `n` vessels for a region and make them its current fleet.
    ///
    /// Degrades like [`map_data`](Self::map_data); the returned report
    /// carries any warnings.
    pub fn generate(&self, region: &str, n: usize) -> Result<PlacementReport, ServiceError> {
        let config = self.region(region)?;
        let code = config.code.as_str();
        let land = self.cache.get_geometry(code, GeometryKind::Land);
        let buffer = self.cache.get_geometry(code, GeometryKind::Buffer);

        let report = self.run_generator(config, n, &buffer, &land);
        self.replace_fleet(code, &report);
        Ok(report)
    }

    /// Zone and land membership of a point in a region.
    pub fn classify(&self, region: &str, point: &LatLng) -> Result<Classification, ServiceError> {
        let config = self.region(region)?;
        let land = self.cache.get_geometry(&config.code, GeometryKind::Land);
        let buffer = self.cache.get_geometry(&config.code, GeometryKind::Buffer);
        Ok(self.classifier.classify(point, &buffer, &land))
    }

    /// Load every slot of every registered region and report how it went.
    pub fn preload(&self) -> Vec<SlotStatus> {
        let statuses = self.cache.preload();
        let unavailable = statuses
            .iter()
            .filter(|s| !s.outcome.is_available())
            .count();
        info!(
            slots = statuses.len(),
            unavailable,
            "Geometry preload complete"
        );
        statuses
    }

    /// Current fleet of a region, without generating one.
    pub fn fleet(&self, region: &str) -> Result<Vec<Vessel>, ServiceError> {
        let config = self.region(region)?;
        Ok(self.store.fleet(&config.code).unwrap_or_default())
    }

    pub fn vessel(&self, id: VesselId) -> Option<Vessel> {
        self.store.get(id)
    }

    /// Toggle `toggles` randomly chosen vessels of a region.
    ///
    /// The fleet is generated first if needed. Picks use the service RNG, so
    /// a seeded service replays the same sequence.
    pub fn simulate(
        &self,
        region: &str,
        toggles: usize,
    ) -> Result<Vec<ToggleResponse>, ServiceError> {
        let config = self.region(region)?;
        let land = self.cache.get_geometry(&config.code, GeometryKind::Land);
        let buffer = self.cache.get_geometry(&config.code, GeometryKind::Buffer);
        let (fleet, _) = self.ensure_fleet(config, &buffer, &land);
        if fleet.is_empty() {
            warn!(region = %config.code, "No vessels to toggle");
            return Ok(Vec::new());
        }

        let mut responses = Vec::with_capacity(toggles);
        for _ in 0..toggles {
            let picked = fleet.choose(&mut *self.rng.lock()).map(|v| v.id);
            if let Some(id) = picked {
                responses.push(self.toggle_valve(id)?);
            }
        }
        Ok(responses)
    }

    fn region(&self, code: &str) -> Result<&RegionConfig, ServiceError> {
        self.registry
            .get(code)
            .ok_or_else(|| ServiceError::RegionNotFound(code.to_string()))
    }

    fn slot_errors(&self, code: &str, land: &CachedGeometry, buffer: &CachedGeometry) -> Vec<String> {
        let mut errors: Vec<String> = [(GeometryKind::Land, land), (GeometryKind::Buffer, buffer)]
            .into_iter()
            .filter_map(|(kind, entry)| {
                SlotStatus {
                    region: code.to_string(),
                    kind,
                    outcome: entry.outcome.clone(),
                }
                .unavailable_message()
            })
            .collect();

        if !self.classifier.engine_available() {
            errors.push(format!(
                "ERROR: Containment engine '{}' unavailable; zone and land checks skipped",
                self.classifier.engine_name()
            ));
        }
        errors
    }

    /// The region's fleet, generating it if absent, plus the placement
    /// warnings recorded when that fleet was generated.
    fn ensure_fleet(
        &self,
        config: &RegionConfig,
        buffer: &RegionGeometry,
        land: &RegionGeometry,
    ) -> (Vec<Vessel>, Vec<String>) {
        let n = self.generator.config().vessels_per_region;
        let fleet = self.store.fleet_or_insert_with(&config.code, || {
            let report = self.run_generator(config, n, buffer, land);
            self.fleet_warnings
                .insert(config.code.clone(), report.warnings);
            report.vessels
        });
        let warnings = self
            .fleet_warnings
            .get(&config.code)
            .map(|w| w.clone())
            .unwrap_or_default();
        (fleet, warnings)
    }

    fn replace_fleet(&self, code: &str, report: &PlacementReport) {
        self.fleet_warnings
            .insert(code.to_string(), report.warnings.clone());
        self.store.replace(code, report.vessels.clone());
    }

    fn run_generator(
        &self,
        config: &RegionConfig,
        n: usize,
        buffer: &RegionGeometry,
        land: &RegionGeometry,
    ) -> PlacementReport {
        let mut rng = self.rng.lock();
        self.generator
            .generate(config, n, buffer, land, &self.ids, &mut *rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::SamplingBox;
    use crate::geometry::{GeometrySource, NullEngine, RawPolygonCollection, SourceError};
    use crate::history::DisposalStatus;
    use crate::placement::ValvePolicy;
    use geo::polygon;
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};

    /// Land is the unit square, the buffer pads it by half a degree, and
    /// any other file name is missing.
    struct SquareSource;

    impl GeometrySource for SquareSource {
        fn load(&self, path: &Path) -> Result<RawPolygonCollection, SourceError> {
            let square = |lo: f64, hi: f64| {
                polygon![
                    (x: lo, y: lo),
                    (x: hi, y: lo),
                    (x: hi, y: hi),
                    (x: lo, y: hi),
                ]
            };
            let polygon = match path.file_name().and_then(|n| n.to_str()) {
                Some("land.geojson") => square(0.0, 1.0),
                Some("buffer.geojson") => square(-0.5, 1.5),
                _ => return Err(SourceError::NotFound(path.to_path_buf())),
            };
            Ok(RawPolygonCollection {
                crs_code: Some("EPSG:4326".to_string()),
                polygons: vec![polygon],
                skipped_features: 0,
            })
        }

        fn name(&self) -> &str {
            "squares"
        }
    }

    fn region(code: &str, buffer_file: &str) -> RegionConfig {
        RegionConfig {
            code: code.to_string(),
            center: LatLng::new(0.5, 0.5).unwrap(),
            zoom: 8,
            boxes: vec![SamplingBox::new("all", -2.0, 3.0, -2.0, 3.0).unwrap()],
            land_file: "land.geojson".to_string(),
            buffer_file: Some(buffer_file.to_string()),
            buffer_spec: None,
        }
    }

    fn service() -> ZoneService {
        ZoneService::builder()
            .registry(RegionRegistry::new(
                PathBuf::from("fixtures"),
                vec![
                    region("alpha", "buffer.geojson"),
                    region("beta", "buffer.geojson"),
                    region("gamma", "missing.geojson"),
                ],
            ))
            .source(Arc::new(SquareSource))
            .vessels_per_region(10)
            .seed(7)
            .build()
    }

    #[test]
    fn test_map_data_generates_once() {
        let service = service();
        let first = service.map_data("alpha").unwrap();
        let second = service.map_data("ALPHA").unwrap();

        assert_eq!(first.boats.len(), 10);
        assert_eq!(first.boats, second.boats);
        assert!(first.errors.is_none(), "{:?}", first.errors);
        assert!(first.land.is_some());
        assert!(first.buffer.is_some());
        assert_eq!(first.center, [0.5, 0.5]);
        assert_eq!(first.zoom, 8);
    }

    #[test]
    fn test_map_data_inside_quota() {
        let service = service();
        let data = service.map_data("alpha").unwrap();
        let inside = data
            .boats
            .iter()
            .filter(|b| {
                service
                    .classify("alpha", &b.position)
                    .map(|c| c.in_zone)
                    .unwrap()
            })
            .count();
        assert_eq!(inside, 2);
    }

    #[test]
    fn test_map_data_unknown_region() {
        let service = service();
        let err = service.map_data("xx").unwrap_err();
        assert!(matches!(err, ServiceError::RegionNotFound(ref code) if code == "xx"));
        assert!(service.history().is_empty());
    }

    #[test]
    fn test_map_data_missing_buffer_degrades() {
        let service = service();
        let data = service.map_data("gamma").unwrap();

        assert!(data.buffer.is_none());
        assert!(data.land.is_some());
        // The inside quota cannot be met without a buffer.
        assert_eq!(data.boats.len(), 8);
        assert!(data.errors().iter().any(|e| e.contains("Buffer geometry unavailable")));
        assert!(data.errors().iter().any(|e| e.contains("Only placed 0 of 2")));
        for boat in &data.boats {
            assert!(!service.classify("gamma", &boat.position).unwrap().on_land);
        }
    }

    #[test]
    fn test_shortfall_warning_repeats_with_fleet() {
        let service = service();
        let first = service.map_data("gamma").unwrap();
        let second = service.map_data("gamma").unwrap();

        assert_eq!(first.boats, second.boats);
        assert!(second.errors().iter().any(|e| e.contains("Only placed 0 of 2")));
        assert_eq!(first.errors, second.errors);
    }

    #[test]
    fn test_generate_replaces_fleet_warnings() {
        let service = service();
        service.map_data("gamma").unwrap();
        service.generate("gamma", 0).unwrap();

        let data = service.map_data("gamma").unwrap();
        assert!(data.boats.is_empty());
        assert!(!data.errors().iter().any(|e| e.contains("Only placed")));
        assert!(data.errors().iter().any(|e| e.contains("Buffer geometry unavailable")));
    }

    #[test]
    fn test_null_engine_reports_error() {
        let service = ZoneService::builder()
            .registry(RegionRegistry::new("fixtures", vec![region("alpha", "buffer.geojson")]))
            .source(Arc::new(SquareSource))
            .engine(Arc::new(NullEngine))
            .vessels_per_region(5)
            .seed(1)
            .build();

        let data = service.map_data("alpha").unwrap();
        assert!(data.errors().iter().any(|e| e.contains("Containment engine")));
    }

    #[test]
    fn test_toggle_twice_records_once() {
        let service = service();
        let boat = service.map_data("alpha").unwrap().boats[0].clone();

        let first = service.toggle_valve(boat.id).unwrap();
        let second = service.toggle_valve(boat.id).unwrap();

        assert_eq!(first.valve_open, !boat.valve_open);
        assert_eq!(second.valve_open, boat.valve_open);
        assert_eq!(first.message, VALVE_UPDATED_MESSAGE);
        assert_eq!(service.history().len(), 1);
        assert_eq!(service.vessel(boat.id).unwrap().valve_open, boat.valve_open);
    }

    #[test]
    fn test_toggle_in_zone_is_illegal() {
        let service = ZoneService::builder()
            .registry(RegionRegistry::new("fixtures", vec![region("alpha", "buffer.geojson")]))
            .source(Arc::new(SquareSource))
            .vessels_per_region(10)
            .valve_policy(ValvePolicy::ClosedInZone)
            .seed(3)
            .build();

        let data = service.map_data("alpha").unwrap();
        let inside = data
            .boats
            .iter()
            .find(|b| service.classify("alpha", &b.position).unwrap().in_zone)
            .unwrap();
        assert!(!inside.valve_open);

        let response = service.toggle_valve(inside.id).unwrap();
        let event = response.event.unwrap();
        assert!(event.in_zone);
        assert_eq!(event.status, DisposalStatus::IllegalDisposal);
        assert_eq!(event.region, "alpha");
    }

    #[test]
    fn test_toggle_unknown_vessel() {
        let service = service();
        let err = service.toggle_valve(1).unwrap_err();
        assert!(matches!(err, ServiceError::VesselNotFound(1)));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_ids_unique_across_regions_and_generations() {
        let service = service();
        let mut seen = HashSet::new();
        for boat in service.map_data("alpha").unwrap().boats {
            assert!(seen.insert(boat.id));
        }
        for boat in service.map_data("beta").unwrap().boats {
            assert!(seen.insert(boat.id));
        }
        for boat in service.randomise("alpha").unwrap() {
            assert!(seen.insert(boat.id));
        }
        assert_eq!(seen.len(), 30);
    }

    #[test]
    fn test_randomise_replaces_fleet() {
        let service = service();
        let old = service.map_data("alpha").unwrap().boats;
        let new = service.randomise("alpha").unwrap();

        assert_eq!(new.len(), 10);
        assert_eq!(service.fleet("alpha").unwrap(), new);
        assert!(service.vessel(old[0].id).is_none());
        assert!(matches!(
            service.toggle_valve(old[0].id),
            Err(ServiceError::VesselNotFound(_))
        ));
    }

    #[test]
    fn test_randomise_requires_both_geometries() {
        let service = service();
        let before = service.map_data("gamma").unwrap().boats;

        let err = service.randomise("gamma").unwrap_err();
        assert!(matches!(
            err,
            ServiceError::GeometryUnavailable {
                kind: GeometryKind::Buffer,
                ..
            }
        ));
        assert_eq!(service.fleet("gamma").unwrap(), before);
    }

    #[test]
    fn test_randomise_unknown_region() {
        let service = service();
        assert!(service.randomise("xx").unwrap_err().is_not_found());
    }

    #[test]
    fn test_seeded_services_agree() {
        let a = service().map_data("alpha").unwrap().boats;
        let b = service().map_data("alpha").unwrap().boats;
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_reports_quota() {
        let service = service();
        let report = service.generate("alpha", 20).unwrap();
        assert_eq!(report.vessels.len(), 20);
        assert_eq!(report.inside_placed, 4);
        assert_eq!(report.outside_placed, 16);
        assert!(report.is_complete());
        assert_eq!(service.fleet("alpha").unwrap().len(), 20);
    }

    #[test]
    fn test_simulate_records_opens() {
        let service = service();
        let responses = service.simulate("alpha", 12).unwrap();
        assert_eq!(responses.len(), 12);

        let opened = responses.iter().filter(|r| r.event.is_some()).count();
        assert_eq!(service.history().len(), opened);
    }

    #[test]
    fn test_preload_statuses() {
        let service = service();
        let statuses = service.preload();
        assert_eq!(statuses.len(), 6);

        let failed: Vec<_> = statuses
            .iter()
            .filter(|s| !s.outcome.is_available())
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].region, "gamma");
        assert_eq!(failed[0].kind, GeometryKind::Buffer);
    }

    #[test]
    fn test_fleet_without_generation() {
        let service = service();
        assert!(service.fleet("alpha").unwrap().is_empty());
        assert!(service.fleet("xx").is_err());
    }
}
