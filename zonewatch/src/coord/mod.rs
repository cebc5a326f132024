//! Geographic coordinate types.
//!
//! Provides validated WGS84 positions and the named lat/lng rectangles
//! that the placement generator samples candidate positions from.

mod types;

pub use types::{
    round_to, CoordError, LatLng, SamplingBox, MAX_LAT, MAX_LNG, MIN_LAT, MIN_LNG,
    POSITION_DECIMALS,
};

#[cfg(test)]
mod tests;
