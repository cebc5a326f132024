//! Service facade for the zone monitoring API.
//!
//! [`ZoneService`] wires the region registry, geometry cache, classifier,
//! placement generator, entity store, and event log together and exposes the
//! map operations: map data, valve toggles, history, and fleet
//! randomisation.
//!
//! # Example
//!
//! ```ignore
//! use zonewatch::config::ConfigFile;
//! use zonewatch::service::ZoneService;
//!
//! let config = ConfigFile::load()?;
//! let service = ZoneService::from_config(&config)?;
//! let data = service.map_data("uk")?;
//! println!("{} boats, {} warnings", data.boats.len(), data.errors().len());
//! ```

mod builder;
mod error;
mod facade;
mod types;

pub use builder::ZoneServiceBuilder;
pub use error::ServiceError;
pub use facade::ZoneService;
pub use types::{MapData, ToggleResponse, VALVE_UPDATED_MESSAGE};
