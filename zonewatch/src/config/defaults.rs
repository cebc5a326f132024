//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::geometry::EngineKind;
use crate::placement::{
    ValvePolicy, DEFAULT_ATTEMPT_MULTIPLIER, DEFAULT_INSIDE_FRACTION, DEFAULT_VESSELS_PER_REGION,
};
use crate::region::BUILTIN_CODES;
use crate::store::DEFAULT_FIRST_ID;

/// Default geometry data folder, relative to the working directory.
pub const DEFAULT_DATA_DIRECTORY: &str = "shapefiles";

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "zonewatch.log";

/// Largest map zoom accepted for a region.
pub const MAX_ZOOM: u8 = 22;

/// Zoom used for a new region that does not set one.
pub const DEFAULT_REGION_ZOOM: u8 = 6;

/// Default log file path (~/.zonewatch/zonewatch.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join(DEFAULT_LOG_FILE_NAME)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            data: DataSettings {
                directory: PathBuf::from(DEFAULT_DATA_DIRECTORY),
            },
            geometry: GeometrySettings {
                engine: EngineKind::Planar,
            },
            placement: PlacementSettings {
                vessels_per_region: DEFAULT_VESSELS_PER_REGION,
                inside_fraction: DEFAULT_INSIDE_FRACTION,
                attempt_multiplier: DEFAULT_ATTEMPT_MULTIPLIER,
                valve_policy: ValvePolicy::Random,
                seed: None,
                first_vessel_id: DEFAULT_FIRST_ID,
            },
            regions: RegionSettings {
                enabled: BUILTIN_CODES.iter().map(|c| c.to_string()).collect(),
                definitions: Vec::new(),
            },
            logging: LoggingSettings {
                file: default_log_file(),
            },
        }
    }
}
