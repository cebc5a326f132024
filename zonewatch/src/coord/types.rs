//! Coordinate type definitions

use std::fmt;

use rand::Rng;
use serde::Serialize;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LNG: f64 = -180.0;
pub const MAX_LNG: f64 = 180.0;

/// Decimal places kept for stored vessel positions (~0.1 m).
pub const POSITION_DECIMALS: i32 = 6;

/// A WGS84 position in decimal degrees.
///
/// Constructed through [`LatLng::new`], which rejects out-of-range and
/// non-finite values. Fields are public for reading; the planar geometry
/// engine consumes them as `(x = lng, y = lat)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Create a validated position.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordError> {
        if !lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !lng.is_finite() || !(MIN_LNG..=MAX_LNG).contains(&lng) {
            return Err(CoordError::InvalidLongitude(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Create a position without range validation.
    ///
    /// Used for classification queries, where the containment engine is
    /// responsible for rejecting unusable coordinates.
    pub(crate) fn unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns this position rounded to [`POSITION_DECIMALS`] places.
    pub fn rounded(&self) -> Self {
        Self {
            lat: round_to(self.lat, POSITION_DECIMALS),
            lng: round_to(self.lng, POSITION_DECIMALS),
        }
    }

    /// Returns true if both components are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Round a value to the given number of decimal places.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// A named lat/lng rectangle that candidate positions are drawn from.
///
/// Bounds are inclusive and always satisfy `min < max` on both axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingBox {
    pub name: String,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl SamplingBox {
    /// Create a validated sampling box.
    pub fn new(
        name: impl Into<String>,
        min_lat: f64,
        max_lat: f64,
        min_lng: f64,
        max_lng: f64,
    ) -> Result<Self, CoordError> {
        let name = name.into();
        // Both corners must be valid positions.
        LatLng::new(min_lat, min_lng)?;
        LatLng::new(max_lat, max_lng)?;

        if min_lat >= max_lat || min_lng >= max_lng {
            return Err(CoordError::EmptyBox { name });
        }

        Ok(Self {
            name,
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Draw a uniformly distributed position inside the box.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> LatLng {
        let lat = rng.gen_range(self.min_lat..=self.max_lat);
        let lng = rng.gen_range(self.min_lng..=self.max_lng);
        LatLng { lat, lng }
    }

    /// Check whether a position lies inside the box (inclusive).
    pub fn contains(&self, point: &LatLng) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }
}

/// Errors that can occur when constructing coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside valid range (-90.0 to 90.0) or not finite
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0) or not finite
    InvalidLongitude(f64),
    /// Sampling box has zero or negative extent on an axis
    EmptyBox { name: String },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lng) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lng, MIN_LNG, MAX_LNG
                )
            }
            CoordError::EmptyBox { name } => {
                write!(
                    f,
                    "Sampling box '{}' is empty (min must be below max on both axes)",
                    name
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
