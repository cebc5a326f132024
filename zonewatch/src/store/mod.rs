//! Entity store: the current fleet of every region.
//!
//! Fleets are sharded per region in a `DashMap`, with a second map from
//! vessel id to owning region so toggles resolve in one lookup. The valve
//! toggle is the only mutation a stored vessel ever sees; everything else
//! replaces a whole fleet.

mod id;
mod vessel;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;

pub use id::{IdAllocator, VesselId, DEFAULT_FIRST_ID};
pub use vessel::Vessel;

/// Errors raised by the entity store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No current vessel has this id.
    #[error("Boat {0} not found")]
    NotFound(VesselId),
}

/// Result of a successful valve toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct Toggled {
    /// Snapshot of the vessel after the toggle.
    pub vessel: Vessel,
    /// True when the valve went from closed to open.
    pub opened: bool,
}

/// Region → fleet mapping plus an id → region index.
#[derive(Debug, Default)]
pub struct EntityStore {
    fleets: DashMap<String, Vec<Vessel>>,
    index: DashMap<VesselId, String>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a region's current fleet.
    pub fn fleet(&self, region: &str) -> Option<Vec<Vessel>> {
        self.fleets.get(region).map(|fleet| fleet.clone())
    }

    /// Return the region's fleet, generating it with `generate` if absent.
    ///
    /// `generate` runs while the region's shard is locked, so concurrent
    /// first requests produce a single fleet.
    pub fn fleet_or_insert_with<F>(&self, region: &str, generate: F) -> Vec<Vessel>
    where
        F: FnOnce() -> Vec<Vessel>,
    {
        match self.fleets.entry(region.to_string()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let fleet = generate();
                for vessel in &fleet {
                    self.index.insert(vessel.id, region.to_string());
                }
                entry.insert(fleet.clone());
                fleet
            }
        }
    }

    /// Replace a region's fleet, returning the previous one.
    ///
    /// Ids of the previous fleet stop resolving.
    pub fn replace(&self, region: &str, fleet: Vec<Vessel>) -> Vec<Vessel> {
        let mut slot = self.fleets.entry(region.to_string()).or_default();
        for old in slot.iter() {
            self.index.remove(&old.id);
        }
        for vessel in &fleet {
            self.index.insert(vessel.id, region.to_string());
        }
        std::mem::replace(slot.value_mut(), fleet)
    }

    /// Look up a current vessel by id.
    pub fn get(&self, id: VesselId) -> Option<Vessel> {
        let region = self.index.get(&id)?.clone();
        let fleet = self.fleets.get(&region)?;
        fleet.iter().find(|v| v.id == id).cloned()
    }

    /// Flip a vessel's valve.
    pub fn toggle_valve(&self, id: VesselId) -> Result<Toggled, StoreError> {
        let region = self
            .index
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound(id))?;

        let mut fleet = self
            .fleets
            .get_mut(&region)
            .ok_or(StoreError::NotFound(id))?;
        let vessel = fleet
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(StoreError::NotFound(id))?;

        vessel.valve_open = !vessel.valve_open;
        Ok(Toggled {
            vessel: vessel.clone(),
            opened: vessel.valve_open,
        })
    }

    /// Total number of stored vessels.
    pub fn vessel_count(&self) -> usize {
        self.index.len()
    }

    /// Regions that currently have a fleet.
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = self.fleets.iter().map(|e| e.key().clone()).collect();
        regions.sort();
        regions
    }
}
