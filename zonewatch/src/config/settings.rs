//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::geometry::EngineKind;
use crate::placement::ValvePolicy;
use crate::region::RegionConfig;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Geometry data location
    pub data: DataSettings,
    /// Containment engine selection
    pub geometry: GeometrySettings,
    /// Fleet generation settings
    pub placement: PlacementSettings,
    /// Enabled regions and region definitions
    pub regions: RegionSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Geometry data configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSettings {
    /// Base folder; each region reads from `<directory>/<code>_shapefiles/`
    pub directory: PathBuf,
}

/// Geometry engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometrySettings {
    /// Containment engine: planar or none
    pub engine: EngineKind,
}

/// Placement configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSettings {
    /// Vessels generated the first time a region is requested
    pub vessels_per_region: usize,
    /// Share of vessels placed inside the restricted zone, in (0, 1]
    pub inside_fraction: f64,
    /// Attempts allowed per requested vessel
    pub attempt_multiplier: usize,
    /// Initial valve state policy
    pub valve_policy: ValvePolicy,
    /// Fixed RNG seed; random when unset
    pub seed: Option<u64>,
    /// First vessel id handed out
    pub first_vessel_id: u64,
}

/// Region configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSettings {
    /// Region codes served, in display order
    pub enabled: Vec<String>,
    /// Regions defined or overridden by `[region.<code>]` sections
    pub definitions: Vec<RegionConfig>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
