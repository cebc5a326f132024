//! Builder for [`ZoneService`].
//!
//! Every component has a production default, so `ZoneService::builder().build()`
//! gives a service over the built-in regions, reading GeoJSON from
//! `shapefiles/` with the planar engine and an entropy-seeded RNG. Tests swap
//! in fakes for the source, engine, and clock.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::facade::{ServiceParts, ZoneService};
use crate::cache::GeometryCache;
use crate::classify::Classifier;
use crate::config::DEFAULT_DATA_DIRECTORY;
use crate::geometry::{ContainmentEngine, EngineKind, GeoJsonSource, GeometrySource};
use crate::history::EventLog;
use crate::placement::{PlacementConfig, PlacementGenerator, ValvePolicy};
use crate::region::RegionRegistry;
use crate::store::{EntityStore, IdAllocator, VesselId, DEFAULT_FIRST_ID};
use crate::time::{Clock, SystemClock};

/// Assembles a [`ZoneService`] from optional overrides.
pub struct ZoneServiceBuilder {
    registry: Option<RegionRegistry>,
    source: Option<Arc<dyn GeometrySource>>,
    engine: Option<Arc<dyn ContainmentEngine>>,
    placement: PlacementConfig,
    seed: Option<u64>,
    first_vessel_id: VesselId,
    clock: Option<Arc<dyn Clock>>,
}

impl ZoneServiceBuilder {
    pub fn new() -> Self {
        Self {
            registry: None,
            source: None,
            engine: None,
            placement: PlacementConfig::default(),
            seed: None,
            first_vessel_id: DEFAULT_FIRST_ID,
            clock: None,
        }
    }

    pub fn registry(mut self, registry: RegionRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn source(mut self, source: Arc<dyn GeometrySource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn engine(mut self, engine: Arc<dyn ContainmentEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn engine_kind(self, kind: EngineKind) -> Self {
        self.engine(kind.build())
    }

    pub fn placement(mut self, placement: PlacementConfig) -> Self {
        self.placement = placement;
        self
    }

    pub fn vessels_per_region(mut self, n: usize) -> Self {
        self.placement.vessels_per_region = n;
        self
    }

    pub fn valve_policy(mut self, policy: ValvePolicy) -> Self {
        self.placement.valve_policy = policy;
        self
    }

    /// Fix the RNG seed so fleets are reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn first_vessel_id(mut self, id: VesselId) -> Self {
        self.first_vessel_id = id;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> ZoneService {
        let registry = Arc::new(
            self.registry
                .unwrap_or_else(|| RegionRegistry::builtin(DEFAULT_DATA_DIRECTORY)),
        );
        let source = self
            .source
            .unwrap_or_else(|| Arc::new(GeoJsonSource::new()));
        let engine = self.engine.unwrap_or_else(|| EngineKind::default().build());
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let classifier = Classifier::new(engine);
        ZoneService::from_parts(ServiceParts {
            cache: GeometryCache::new(Arc::clone(&registry), source),
            registry,
            generator: PlacementGenerator::new(classifier.clone(), self.placement),
            classifier,
            rng,
            ids: IdAllocator::starting_from(self.first_vessel_id),
            store: EntityStore::new(),
            log: EventLog::with_clock(clock),
        })
    }
}

impl Default for ZoneServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
