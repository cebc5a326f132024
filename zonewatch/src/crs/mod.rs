//! Coordinate reference systems and reprojection to WGS84.
//!
//! Raw polygon collections arrive in whatever projected system their
//! authors worked in (UTM zones for the Adriatic and the Caribbean, British
//! National Grid for the UK). Everything downstream of the geometry cache
//! works in WGS84 lon/lat, so each source is reprojected once at load time.
//!
//! # Supported codes
//!
//! | Code | System |
//! |------|--------|
//! | `EPSG:4326`, `CRS84` | WGS84 geographic (no-op) |
//! | `EPSG:3857` | Web Mercator |
//! | `EPSG:32601`–`32660` | UTM north zones, WGS84 |
//! | `EPSG:32701`–`32760` | UTM south zones, WGS84 |
//! | `EPSG:27700` | British National Grid (OSGB36) |
//!
//! Codes are accepted in the common spellings: `EPSG:27700`, `epsg:27700`,
//! `urn:ogc:def:crs:EPSG::27700`, and `urn:ogc:def:crs:OGC:1.3:CRS84`.

mod helmert;
mod transverse_mercator;

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use helmert::HelmertTransform;
use transverse_mercator::{Ellipsoid, TransverseMercator};

/// The canonical reference frame for all cached geometries.
pub const CANONICAL_CRS: Crs = Crs::Wgs84;

/// Web Mercator sphere radius (metres).
const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

/// Errors raised while parsing a CRS code or reprojecting a position.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CrsError {
    /// The code is not one of the supported reference systems.
    #[error("Unsupported coordinate reference system '{0}'")]
    Unsupported(String),

    /// A UTM zone outside 1..=60.
    #[error("Invalid UTM zone {0} (must be between 1 and 60)")]
    InvalidUtmZone(u16),

    /// The input position is not a finite number pair.
    #[error("Cannot reproject non-finite position ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
}

/// A supported coordinate reference system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crs {
    /// WGS84 geographic lon/lat (EPSG:4326).
    Wgs84,
    /// Spherical Web Mercator (EPSG:3857).
    WebMercator,
    /// UTM on WGS84 (EPSG:326zz north, EPSG:327zz south).
    Utm { zone: u8, north: bool },
    /// British National Grid on OSGB36 (EPSG:27700).
    BritishNationalGrid,
}

impl Crs {
    /// Create a UTM reference system, validating the zone number.
    pub fn utm(zone: u16, north: bool) -> Result<Self, CrsError> {
        if !(1..=60).contains(&zone) {
            return Err(CrsError::InvalidUtmZone(zone));
        }
        Ok(Crs::Utm {
            zone: zone as u8,
            north,
        })
    }

    /// The WGS84 UTM zone containing a lon/lat position.
    ///
    /// Longitudes outside ±180 clamp to the edge zones; the equator counts
    /// as north.
    pub fn utm_for(lng: f64, lat: f64) -> Self {
        let zone = (((lng + 180.0) / 6.0).floor() as i64).clamp(0, 59) + 1;
        Crs::Utm {
            zone: zone as u8,
            north: lat >= 0.0,
        }
    }

    /// The EPSG code for this system.
    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::WebMercator => 3857,
            Crs::Utm { zone, north: true } => 32600 + *zone as u32,
            Crs::Utm { zone, north: false } => 32700 + *zone as u32,
            Crs::BritishNationalGrid => 27700,
        }
    }

    /// Returns true for the canonical frame (no reprojection needed).
    #[inline]
    pub fn is_canonical(&self) -> bool {
        *self == CANONICAL_CRS
    }

    /// Reproject an `(x, y)` position in this system to WGS84 `(lng, lat)`.
    pub fn to_wgs84(&self, x: f64, y: f64) -> Result<(f64, f64), CrsError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(CrsError::NonFinite { x, y });
        }

        match self {
            Crs::Wgs84 => Ok((x, y)),
            Crs::WebMercator => {
                let lng = (x / WEB_MERCATOR_RADIUS).to_degrees();
                let lat = (2.0 * (y / WEB_MERCATOR_RADIUS).exp().atan() - PI / 2.0).to_degrees();
                Ok((lng, lat))
            }
            Crs::Utm { zone, north } => {
                let (lat, lng) = TransverseMercator::utm(*zone, *north).inverse(x, y);
                Ok((lng, lat))
            }
            Crs::BritishNationalGrid => {
                let (lat, lng) = TransverseMercator::british_national_grid().inverse(x, y);
                let (lat, lng) = HelmertTransform::osgb36_to_wgs84().apply(
                    lat,
                    lng,
                    &Ellipsoid::AIRY_1830,
                    &Ellipsoid::WGS84,
                );
                Ok((lng, lat))
            }
        }
    }

    /// Project a WGS84 `(lng, lat)` position into this system as `(x, y)`.
    pub fn from_wgs84(&self, lng: f64, lat: f64) -> Result<(f64, f64), CrsError> {
        if !lng.is_finite() || !lat.is_finite() {
            return Err(CrsError::NonFinite { x: lng, y: lat });
        }

        match self {
            Crs::Wgs84 => Ok((lng, lat)),
            Crs::WebMercator => {
                let x = WEB_MERCATOR_RADIUS * lng.to_radians();
                let y = WEB_MERCATOR_RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
                Ok((x, y))
            }
            Crs::Utm { zone, north } => {
                Ok(TransverseMercator::utm(*zone, *north).forward(lat, lng))
            }
            Crs::BritishNationalGrid => {
                let (lat, lng) = HelmertTransform::osgb36_to_wgs84().inverse().apply(
                    lat,
                    lng,
                    &Ellipsoid::WGS84,
                    &Ellipsoid::AIRY_1830,
                );
                Ok(TransverseMercator::british_national_grid().forward(lat, lng))
            }
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl Serialize for Crs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for Crs {
    type Err = CrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();

        if upper == "CRS84" || upper.ends_with(":CRS84") {
            return Ok(Crs::Wgs84);
        }

        // "EPSG:27700", "urn:ogc:def:crs:EPSG::27700", "urn:ogc:def:crs:EPSG:6.6:27700"
        let code = upper
            .find("EPSG:")
            .map(|idx| &upper[idx + "EPSG:".len()..])
            .and_then(|rest| rest.rsplit(':').next())
            .and_then(|digits| digits.parse::<u32>().ok())
            .ok_or_else(|| CrsError::Unsupported(trimmed.to_string()))?;

        match code {
            4326 => Ok(Crs::Wgs84),
            3857 | 900913 => Ok(Crs::WebMercator),
            27700 => Ok(Crs::BritishNationalGrid),
            32601..=32660 => Crs::utm((code - 32600) as u16, true),
            32701..=32760 => Crs::utm((code - 32700) as u16, false),
            _ => Err(CrsError::Unsupported(trimmed.to_string())),
        }
    }
}
