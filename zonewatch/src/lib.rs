//! Zonewatch - Coastal restricted-zone monitoring
//!
//! This library classifies vessel positions against per-region land masks
//! and restricted-zone buffers, places simulated fleets by rejection
//! sampling, and records valve-opening events as legal or illegal disposal.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use zonewatch::config::ConfigFile;
//! use zonewatch::service::ZoneService;
//!
//! let config = ConfigFile::load()?;
//! let service = ZoneService::from_config(&config)?;
//!
//! let data = service.map_data("uk")?;
//! let response = service.toggle_valve(data.boats[0].id)?;
//! for record in service.history() {
//!     println!("{} {}", record.vessel_name, record.status);
//! }
//! ```

pub mod cache;
pub mod classify;
pub mod config;
pub mod coord;
pub mod crs;
pub mod geometry;
pub mod history;
pub mod logging;
pub mod placement;
pub mod region;
pub mod service;
pub mod store;
pub mod time;

/// Version of the Zonewatch library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
