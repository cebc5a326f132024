//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, and service creation
//! to reduce duplication across command handlers.

use crate::error::CliError;
use std::path::Path;
use tracing::info;
use zonewatch::config::ConfigFile;
use zonewatch::logging::{init_logging, split_log_path, LoggingGuard};
use zonewatch::service::ZoneService;

/// Options shared by every command that builds a service.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunnerOptions<'a> {
    /// Config file to load instead of ~/.zonewatch/config.ini
    pub config_path: Option<&'a Path>,
    /// Debug-level logging when RUST_LOG is unset
    pub debug: bool,
    /// Mirror log events to stderr
    pub verbose: bool,
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    pub fn new(options: RunnerOptions<'_>) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = match options.config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging(&log_dir, &log_file, options.verbose, options.debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Mutable access for command-line overrides applied before
    /// [`create_service`](Self::create_service).
    pub fn config_mut(&mut self) -> &mut ConfigFile {
        &mut self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Zonewatch v{}", zonewatch::VERSION);
        info!(
            command,
            data_dir = %self.config.data.directory.display(),
            "Zonewatch CLI command started"
        );
    }

    /// Create a service from the loaded configuration.
    pub fn create_service(&self) -> Result<ZoneService, CliError> {
        ZoneService::from_config(&self.config)
            .map_err(CliError::ServiceCreation)
            .inspect(|_| info!("Service created successfully"))
    }
}
