//! Configuration file handling for ~/.zonewatch/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;
use crate::placement::PlacementConfig;
use crate::region::{builtin_region, RegionRegistry};

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// An enabled region has no definition
    #[error("Unknown region '{0}': no built-in definition and no [region.{0}] section")]
    UnknownRegion(String),

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.zonewatch/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.zonewatch/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path();
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        std::fs::write(path, self.to_ini_string())
            .map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Render the configuration as the commented INI text `save` writes.
    pub fn to_ini_string(&self) -> String {
        super::writer::to_config_string(self)
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    /// Generator tunables from the `[placement]` section.
    pub fn placement_config(&self) -> PlacementConfig {
        PlacementConfig {
            vessels_per_region: self.placement.vessels_per_region,
            inside_fraction: self.placement.inside_fraction,
            attempt_multiplier: self.placement.attempt_multiplier,
            valve_policy: self.placement.valve_policy,
        }
    }

    /// Build the registry of enabled regions, in `enabled` order.
    ///
    /// `[region.<code>]` definitions win over built-ins.
    pub fn region_registry(&self) -> Result<RegionRegistry, ConfigFileError> {
        let regions = self
            .regions
            .enabled
            .iter()
            .map(|code| {
                self.regions
                    .definitions
                    .iter()
                    .find(|r| r.code.eq_ignore_ascii_case(code))
                    .cloned()
                    .or_else(|| builtin_region(code))
                    .ok_or_else(|| ConfigFileError::UnknownRegion(code.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RegionRegistry::new(self.data.directory.clone(), regions))
    }
}

/// Get the path to the config directory (~/.zonewatch).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".zonewatch")
}

/// Get the path to the config file (~/.zonewatch/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
