//! Region definitions and the region registry.
//!
//! A region is a configuration key (`uk`, `croatia`, `svg`, ...) carrying a
//! display center and zoom, an ordered list of sampling boxes, and the names
//! of its geometry files. The buffer may instead be grown from the land
//! geometry by a [`BufferSpec`]. Regions are fixed at startup.

mod builtin;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::coord::{LatLng, SamplingBox};
use crate::crs::Crs;
use crate::geometry::GeometryKind;

pub use builtin::{builtin_region, builtin_regions, BUILTIN_CODES};

/// Three nautical miles, the usual coastal restricted-zone width.
pub const THREE_NAUTICAL_MILES_M: f64 = 5556.0;

/// How to grow a buffer from the land geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferSpec {
    /// Buffer distance in metres.
    pub distance_m: f64,
    /// Metric reference system the distance is measured in.
    pub crs: Crs,
}

/// Static definition of one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionConfig {
    /// Lowercase region code.
    pub code: String,
    /// Map center for display.
    pub center: LatLng,
    /// Map zoom hint for display.
    pub zoom: u8,
    /// Candidate sampling boxes, in configuration order.
    pub boxes: Vec<SamplingBox>,
    /// Land mask file name, relative to the region folder.
    pub land_file: String,
    /// Buffer zone file name, relative to the region folder. `None` when
    /// the buffer is derived from land.
    pub buffer_file: Option<String>,
    /// Derivation used when there is no buffer file.
    pub buffer_spec: Option<BufferSpec>,
}

impl RegionConfig {
    /// File name for the given geometry slot, if it is read from disk.
    pub fn geometry_file(&self, kind: GeometryKind) -> Option<&str> {
        match kind {
            GeometryKind::Land => Some(&self.land_file),
            GeometryKind::Buffer => self.buffer_file.as_deref(),
        }
    }

    /// The derivation the buffer slot uses, `None` when it has a file.
    pub fn derived_buffer(&self) -> Option<BufferSpec> {
        match self.buffer_file {
            Some(_) => None,
            None => self.buffer_spec,
        }
    }

    /// Folder holding this region's geometry files under `data_dir`.
    pub fn folder(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{}_shapefiles", self.code))
    }

    /// Full path of the given geometry slot under `data_dir`.
    pub fn geometry_path(&self, data_dir: &Path, kind: GeometryKind) -> Option<PathBuf> {
        self.geometry_file(kind)
            .map(|file| self.folder(data_dir).join(file))
    }
}

/// The set of regions served by one service instance.
#[derive(Debug, Clone)]
pub struct RegionRegistry {
    data_dir: PathBuf,
    regions: Vec<RegionConfig>,
}

impl RegionRegistry {
    /// Create a registry over the given data directory.
    ///
    /// Region order is preserved; codes are stored lowercase. A later region
    /// with the same code replaces an earlier one.
    pub fn new(data_dir: impl Into<PathBuf>, regions: impl IntoIterator<Item = RegionConfig>) -> Self {
        let mut ordered: Vec<RegionConfig> = Vec::new();
        for mut region in regions {
            region.code = region.code.to_lowercase();
            match ordered.iter_mut().find(|r| r.code == region.code) {
                Some(existing) => *existing = region,
                None => ordered.push(region),
            }
        }

        Self {
            data_dir: data_dir.into(),
            regions: ordered,
        }
    }

    /// Registry of every built-in region.
    pub fn builtin(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(data_dir, builtin_regions())
    }

    /// Look up a region by code (case-insensitive).
    pub fn get(&self, code: &str) -> Option<&RegionConfig> {
        let code = code.trim();
        self.regions
            .iter()
            .find(|r| r.code.eq_ignore_ascii_case(code))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Region codes in configuration order.
    pub fn codes(&self) -> Vec<&str> {
        self.regions.iter().map(|r| r.code.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionConfig> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Base data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of a region's geometry file, `None` for an unknown region or a
    /// derived buffer.
    pub fn geometry_path(&self, code: &str, kind: GeometryKind) -> Option<PathBuf> {
        self.get(code)
            .and_then(|region| region.geometry_path(&self.data_dir, kind))
    }
}
