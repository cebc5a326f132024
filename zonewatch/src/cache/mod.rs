//! Geometry cache.
//!
//! Memoizes the normalized land and buffer geometry of every region, loading
//! each (region, kind) slot at most once unless explicitly refreshed, and
//! records how each load went for diagnostics.

mod geometry;
mod outcome;
mod stats;

pub use geometry::{CachedGeometry, GeometryCache};
pub use outcome::{LoadOutcome, SlotStatus};
pub use stats::CacheStats;
