//! Memoized geometry loading.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tracing::{error, info, warn};

use super::outcome::{LoadOutcome, SlotStatus};
use super::stats::{CacheCounters, CacheStats};
use crate::geometry::{
    buffer_geometry, normalize, GeometryKind, GeometrySource, NormalizeError, RegionGeometry,
    SourceError,
};
use crate::region::{BufferSpec, RegionRegistry};

/// A cached slot: the geometry plus how it was obtained.
#[derive(Debug, Clone)]
pub struct CachedGeometry {
    pub geometry: Arc<RegionGeometry>,
    pub outcome: LoadOutcome,
}

impl CachedGeometry {
    fn unavailable(outcome: LoadOutcome) -> Self {
        Self {
            geometry: Arc::new(RegionGeometry::empty()),
            outcome,
        }
    }

    pub fn is_available(&self) -> bool {
        self.outcome.is_available()
    }
}

type SlotKey = (String, GeometryKind);

/// Process-wide cache of canonical geometries, keyed by (region, kind).
///
/// Slots are populated lazily on first request and never invalidated except
/// through [`refresh`](Self::refresh). Each slot is a `OnceLock`, so
/// concurrent first requests for the same key run the loader once and every
/// other caller blocks on and shares that result.
///
/// Loading never fails from the caller's point of view: any error becomes
/// the empty sentinel, with the reason kept in the slot's [`LoadOutcome`].
///
/// A region without a buffer file gets its buffer grown from the land slot
/// according to its [`BufferSpec`].
pub struct GeometryCache {
    registry: Arc<RegionRegistry>,
    source: Arc<dyn GeometrySource>,
    slots: DashMap<SlotKey, Arc<OnceLock<CachedGeometry>>>,
    counters: CacheCounters,
}

impl GeometryCache {
    pub fn new(registry: Arc<RegionRegistry>, source: Arc<dyn GeometrySource>) -> Self {
        Self {
            registry,
            source,
            slots: DashMap::new(),
            counters: CacheCounters::default(),
        }
    }

    /// The geometry for a slot, loading it on first use.
    pub fn get_geometry(&self, region: &str, kind: GeometryKind) -> Arc<RegionGeometry> {
        self.get_entry(region, kind).geometry
    }

    /// The full cached entry (geometry plus outcome) for a slot.
    pub fn get_entry(&self, region: &str, kind: GeometryKind) -> CachedGeometry {
        let key = slot_key(region, kind);
        let cell = self
            .slots
            .entry(key)
            .or_insert_with(|| Arc::new(OnceLock::new()))
            .clone();

        if let Some(entry) = cell.get() {
            self.counters.record_hit();
            return entry.clone();
        }

        cell.get_or_init(|| self.load(region, kind, None)).clone()
    }

    /// Reload a slot unconditionally and overwrite the cached entry.
    pub fn refresh(&self, region: &str, kind: GeometryKind) -> CachedGeometry {
        let entry = self.load(region, kind, None);
        self.install(region, kind, entry.clone());
        entry
    }

    /// Load both slots of a region from source without touching the cache.
    ///
    /// A derived buffer is grown from the freshly loaded land. Pass the
    /// results to [`install`](Self::install) to make them current.
    pub fn reload_region(&self, region: &str) -> (CachedGeometry, CachedGeometry) {
        let land = self.load(region, GeometryKind::Land, None);
        let buffer = self.load(region, GeometryKind::Buffer, Some(&land));
        (land, buffer)
    }

    /// Overwrite a slot with an already loaded entry.
    pub fn install(&self, region: &str, kind: GeometryKind, entry: CachedGeometry) {
        self.slots
            .insert(slot_key(region, kind), Arc::new(OnceLock::from(entry)));
    }

    /// Outcome of a slot if it has been loaded, without triggering a load.
    pub fn status(&self, region: &str, kind: GeometryKind) -> Option<LoadOutcome> {
        let cell = self.slots.get(&slot_key(region, kind))?.clone();
        cell.get().map(|entry| entry.outcome.clone())
    }

    /// Load every slot of every registered region.
    pub fn preload(&self) -> Vec<SlotStatus> {
        let codes: Vec<String> = self
            .registry
            .iter()
            .map(|region| region.code.clone())
            .collect();

        codes
            .into_iter()
            .flat_map(|code| {
                GeometryKind::ALL.into_iter().map(move |kind| (code.clone(), kind))
            })
            .map(|(region, kind)| {
                let outcome = self.get_entry(&region, kind).outcome;
                SlotStatus {
                    region,
                    kind,
                    outcome,
                }
            })
            .collect()
    }

    /// Number of populated slots.
    pub fn cached_slots(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    pub fn registry(&self) -> &Arc<RegionRegistry> {
        &self.registry
    }

    /// Run the loader for one slot. Emits one diagnostic line for the slot.
    ///
    /// A derived buffer grows from `land` when given, otherwise from the
    /// cached land slot.
    fn load(
        &self,
        region: &str,
        kind: GeometryKind,
        land: Option<&CachedGeometry>,
    ) -> CachedGeometry {
        let entry = self.load_inner(region, kind, land);
        self.counters.record_load(entry.is_available());
        entry
    }

    fn load_inner(
        &self,
        region: &str,
        kind: GeometryKind,
        land: Option<&CachedGeometry>,
    ) -> CachedGeometry {
        let Some(config) = self.registry.get(region) else {
            warn!(region = %region, kind = %kind, "Geometry requested for unknown region");
            return CachedGeometry::unavailable(LoadOutcome::UnknownRegion);
        };

        if let Some(path) = config.geometry_path(self.registry.data_dir(), kind) {
            return self.load_file(region, kind, &path);
        }

        match (kind, config.derived_buffer()) {
            (GeometryKind::Buffer, Some(spec)) => {
                let land = match land {
                    Some(land) => land.clone(),
                    None => self.get_entry(region, GeometryKind::Land),
                };
                derive_buffer(region, spec, &land)
            }
            _ => {
                warn!(region = %region, kind = %kind, "No geometry source configured");
                CachedGeometry::unavailable(LoadOutcome::NotConfigured)
            }
        }
    }

    fn load_file(&self, region: &str, kind: GeometryKind, path: &Path) -> CachedGeometry {
        let raw = match self.source.load(path) {
            Ok(raw) => raw,
            Err(SourceError::NotFound(path)) => {
                warn!(
                    region = %region,
                    kind = %kind,
                    path = %path.display(),
                    "Geometry file not found"
                );
                return CachedGeometry::unavailable(LoadOutcome::Missing { path });
            }
            Err(e @ SourceError::Invalid { .. }) => {
                error!(region = %region, kind = %kind, error = %e, "Geometry load error");
                return CachedGeometry::unavailable(LoadOutcome::Failed {
                    reason: e.to_string(),
                });
            }
        };

        match normalize(raw) {
            Ok((geometry, report)) => {
                let outcome = LoadOutcome::Loaded {
                    parts: report.parts,
                    discarded: report.discarded,
                    crs: report.source_crs,
                    crs_assumed: report.crs_assumed,
                };
                if report.crs_assumed {
                    warn!(
                        region = %region,
                        kind = %kind,
                        parts = report.parts,
                        discarded = report.discarded,
                        "Geometry loaded; CRS undefined, assumed WGS84"
                    );
                } else {
                    info!(
                        region = %region,
                        kind = %kind,
                        crs = %report.source_crs,
                        parts = report.parts,
                        discarded = report.discarded,
                        source = self.source.name(),
                        "Geometry loaded"
                    );
                }
                CachedGeometry {
                    geometry: Arc::new(geometry),
                    outcome,
                }
            }
            Err(NormalizeError::Crs(e)) => {
                error!(region = %region, kind = %kind, error = %e, "Geometry has invalid CRS");
                CachedGeometry::unavailable(LoadOutcome::InvalidCrs {
                    reason: e.to_string(),
                })
            }
            Err(e) => {
                error!(region = %region, kind = %kind, error = %e, "Geometry load error");
                CachedGeometry::unavailable(LoadOutcome::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }
}

fn derive_buffer(region: &str, spec: BufferSpec, land: &CachedGeometry) -> CachedGeometry {
    if !land.is_available() {
        warn!(
            region = %region,
            land = %land.outcome,
            "Cannot derive buffer without land geometry"
        );
        return CachedGeometry::unavailable(LoadOutcome::Failed {
            reason: format!("land geometry unavailable ({})", land.outcome),
        });
    }

    match buffer_geometry(&land.geometry, spec.distance_m, spec.crs) {
        Ok(geometry) => {
            info!(
                region = %region,
                distance_m = spec.distance_m,
                crs = %spec.crs,
                parts = geometry.part_count(),
                "Buffer derived from land"
            );
            CachedGeometry {
                outcome: LoadOutcome::Derived {
                    parts: geometry.part_count(),
                    distance_m: spec.distance_m,
                    crs: spec.crs,
                },
                geometry: Arc::new(geometry),
            }
        }
        Err(e) => {
            error!(region = %region, error = %e, "Buffer derivation failed");
            CachedGeometry::unavailable(LoadOutcome::Failed {
                reason: e.to_string(),
            })
        }
    }
}

fn slot_key(region: &str, kind: GeometryKind) -> SlotKey {
    (region.trim().to_lowercase(), kind)
}
