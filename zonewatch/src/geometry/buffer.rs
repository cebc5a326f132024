//! Restricted-zone buffers derived from a land geometry.
//!
//! The land is projected into a metric reference system, every ring edge is
//! swept into a round-capped capsule of the buffer radius, and the capsules
//! are unioned with the land itself. The result is projected back to WGS84.

use std::f64::consts::{FRAC_PI_2, PI};

use geo::{Coord, LineString, MultiPolygon, Polygon};
use thiserror::Error;

use super::normalize::{cascaded_union, NormalizeError};
use super::types::RegionGeometry;
use crate::crs::{Crs, CrsError};

/// Arc vertices per quarter circle on each capsule end.
const QUADRANT_SEGMENTS: usize = 16;

/// Errors raised while deriving a buffer.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("Buffer distance must be a positive number of metres, got {0}")]
    InvalidDistance(f64),

    #[error("Buffer reference system {0} is not metric")]
    NotMetric(Crs),

    #[error("Buffer reprojection failed: {0}")]
    Crs(#[from] CrsError),

    #[error(transparent)]
    Overlay(#[from] NormalizeError),
}

/// Grow `land` by `distance_m` metres, measured in `crs`.
///
/// The buffer contains the land. An empty land yields the empty sentinel.
pub fn buffer_geometry(
    land: &RegionGeometry,
    distance_m: f64,
    crs: Crs,
) -> Result<RegionGeometry, BufferError> {
    if !distance_m.is_finite() || distance_m <= 0.0 {
        return Err(BufferError::InvalidDistance(distance_m));
    }
    if crs.is_canonical() {
        return Err(BufferError::NotMetric(crs));
    }
    if land.is_empty() {
        return Ok(RegionGeometry::empty());
    }

    let mut pieces = Vec::new();
    for polygon in land.shape().iter() {
        let projected = map_polygon(polygon, |x, y| crs.from_wgs84(x, y))?;
        for ring in std::iter::once(projected.exterior()).chain(projected.interiors()) {
            pieces.extend(
                ring.lines()
                    .map(|edge| MultiPolygon::new(vec![capsule(edge.start, edge.end, distance_m)])),
            );
        }
        pieces.push(MultiPolygon::new(vec![projected]));
    }

    let union = cascaded_union(pieces)?;
    let polygons = union
        .iter()
        .map(|polygon| map_polygon(polygon, |x, y| crs.to_wgs84(x, y)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RegionGeometry::new(MultiPolygon::new(polygons)))
}

/// Apply a fallible coordinate mapping to every ring of a polygon.
fn map_polygon<F>(polygon: &Polygon<f64>, f: F) -> Result<Polygon<f64>, CrsError>
where
    F: Fn(f64, f64) -> Result<(f64, f64), CrsError>,
{
    let map_ring = |ring: &LineString<f64>| {
        ring.coords()
            .map(|c| f(c.x, c.y).map(|(x, y)| Coord { x, y }))
            .collect::<Result<Vec<_>, _>>()
            .map(LineString::new)
    };

    let exterior = map_ring(polygon.exterior())?;
    let interiors = polygon
        .interiors()
        .iter()
        .map(&map_ring)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Every point within `radius` of the segment `a`→`b`.
///
/// A zero-length segment gives a circle.
fn capsule(a: Coord<f64>, b: Coord<f64>, radius: f64) -> Polygon<f64> {
    let heading = (b.y - a.y).atan2(b.x - a.x);
    let steps = 2 * QUADRANT_SEGMENTS;
    let mut coords = Vec::with_capacity(2 * (steps + 1) + 1);

    for (center, start) in [(b, heading - FRAC_PI_2), (a, heading + FRAC_PI_2)] {
        for i in 0..=steps {
            let angle = start + PI * i as f64 / steps as f64;
            coords.push(Coord {
                x: center.x + radius * angle.cos(),
                y: center.y + radius * angle.sin(),
            });
        }
    }

    Polygon::new(LineString::new(coords), Vec::new())
}
