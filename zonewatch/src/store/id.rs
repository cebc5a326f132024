//! Vessel id allocation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of a vessel. Unique for the life of the process.
pub type VesselId = u64;

/// First id handed out by a default allocator.
pub const DEFAULT_FIRST_ID: VesselId = 301;

/// Monotonic, thread-safe id allocator.
///
/// Ids are never reused: regenerating a fleet draws fresh ids and the old
/// ones simply stop resolving.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::starting_from(DEFAULT_FIRST_ID)
    }

    pub fn starting_from(start: VesselId) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    pub fn next_id(&self) -> VesselId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    pub fn peek(&self) -> VesselId {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
