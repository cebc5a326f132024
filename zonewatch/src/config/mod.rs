//! Configuration for zonewatch.
//!
//! The INI file at `~/.zonewatch/config.ini` is overlaid on built-in
//! defaults and validated while parsing, so a service is only ever built
//! from a consistent configuration.
//!
//! # Example
//!
//! ```
//! use zonewatch::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! let registry = config.region_registry().unwrap();
//! assert_eq!(registry.codes(), vec!["uk", "croatia", "svg"]);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    default_log_file, DEFAULT_DATA_DIRECTORY, DEFAULT_LOG_FILE_NAME, DEFAULT_REGION_ZOOM, MAX_ZOOM,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, DataSettings, GeometrySettings, LoggingSettings, PlacementSettings, RegionSettings,
};
