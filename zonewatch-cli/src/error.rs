//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use zonewatch::config::ConfigFileError;
use zonewatch::service::ServiceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be read or written
    Config(ConfigFileError),
    /// Failed to create service
    ServiceCreation(ServiceError),
    /// A service operation failed
    Service(ServiceError),
    /// Bad command-line argument
    InvalidArgument(String),
    /// Failed to render output
    Output(serde_json::Error),
    /// `check --strict` found unavailable geometry
    GeometryCheck { unavailable: usize },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Service(ServiceError::RegionNotFound(_)) => {
                eprintln!();
                eprintln!("Run 'zonewatch regions' to list the enabled regions.");
            }
            CliError::Service(ServiceError::GeometryUnavailable { .. }) => {
                eprintln!();
                eprintln!("Run 'zonewatch check' to see which geometry files failed to load.");
            }
            CliError::ServiceCreation(ServiceError::Config(_)) | CliError::Config(_) => {
                eprintln!();
                eprintln!("Check the configuration file with 'zonewatch config show'.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::ServiceCreation(e) => write!(f, "Failed to create service: {}", e),
            CliError::Service(e) => write!(f, "{}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Output(e) => write!(f, "Failed to render output: {}", e),
            CliError::GeometryCheck { unavailable } => {
                write!(f, "{} geometry slot(s) unavailable", unavailable)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::ServiceCreation(e) => Some(e),
            CliError::Service(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Service(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}
