//! Service error types.

use thiserror::Error;

use crate::cache::LoadOutcome;
use crate::config::ConfigFileError;
use crate::geometry::GeometryKind;
use crate::store::{StoreError, VesselId};

/// Errors that can occur during service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Region code is not registered
    #[error("Region '{0}' not found")]
    RegionNotFound(String),

    /// No current vessel has this id
    #[error("Boat {0} not found")]
    VesselNotFound(VesselId),

    /// A geometry required by the operation could not be loaded
    #[error("{} geometry unavailable for '{region}': {outcome}", .kind.label())]
    GeometryUnavailable {
        region: String,
        kind: GeometryKind,
        outcome: LoadOutcome,
    },

    /// Configuration could not be turned into a service
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigFileError),
}

impl ServiceError {
    /// Whether this is a client-side lookup miss (unknown region or vessel).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RegionNotFound(_) | Self::VesselNotFound(_))
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => Self::VesselNotFound(id),
        }
    }
}
