//! Raw collection → canonical query geometry.
//!
//! The pipeline is: resolve the reference system, reproject every vertex to
//! WGS84, drop polygons that fail validity checks, rebuild each survivor
//! through the overlay engine, then union everything into one multipolygon.

use std::panic::{self, AssertUnwindSafe};

use geo::line_intersection::line_intersection;
use geo::{Area, BooleanOps, Coord, Line, LineString, MultiPolygon, Polygon};
use thiserror::Error;

use super::source::RawPolygonCollection;
use super::types::RegionGeometry;
use crate::coord::{MAX_LAT, MAX_LNG, MIN_LAT, MIN_LNG};
use crate::crs::{Crs, CrsError, CANONICAL_CRS};

/// Errors raised while normalizing a raw polygon collection.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The collection names a reference system we cannot reproject from.
    #[error("Invalid CRS: {0}")]
    Crs(#[from] CrsError),

    /// Nothing survived the validity filter.
    #[error("No valid polygons ({discarded} of {total} discarded)")]
    NoValidPolygons { total: usize, discarded: usize },

    /// The overlay engine rejected the input.
    #[error("Polygon overlay failed: {0}")]
    Overlay(String),
}

/// What normalization did to a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Reference system the input was interpreted in.
    pub source_crs: Crs,
    /// True when the input declared no reference system and WGS84 was assumed.
    pub crs_assumed: bool,
    /// Polygons read from the source.
    pub input_polygons: usize,
    /// Polygons dropped by the validity filter or collapsed by repair.
    pub discarded: usize,
    /// Parts in the final union.
    pub parts: usize,
}

/// Resolve the reference system named by a source, if any.
///
/// Returns the system plus whether it was assumed.
pub fn resolve_crs(code: Option<&str>) -> Result<(Crs, bool), CrsError> {
    match code {
        Some(code) => Ok((code.parse::<Crs>()?, false)),
        None => Ok((CANONICAL_CRS, true)),
    }
}

/// Normalize a raw collection into a unioned WGS84 geometry.
pub fn normalize(
    raw: RawPolygonCollection,
) -> Result<(RegionGeometry, NormalizeReport), NormalizeError> {
    let (source_crs, crs_assumed) = resolve_crs(raw.crs_code.as_deref())?;
    let total = raw.polygons.len();

    let valid: Vec<Polygon<f64>> = raw
        .polygons
        .into_iter()
        .filter_map(|polygon| reproject_polygon(&polygon, source_crs))
        .filter(is_valid_polygon)
        .collect();

    let mut repaired = Vec::with_capacity(valid.len());
    for polygon in valid {
        let fixed = repair(polygon)?;
        if !fixed.0.is_empty() {
            repaired.push(fixed);
        }
    }

    if repaired.is_empty() {
        return Err(NormalizeError::NoValidPolygons {
            total,
            discarded: total,
        });
    }

    let kept = repaired.len();
    let union = cascaded_union(repaired)?;
    let report = NormalizeReport {
        source_crs,
        crs_assumed,
        input_polygons: total,
        discarded: total - kept,
        parts: union.0.len(),
    };

    Ok((RegionGeometry::new(union), report))
}

/// Reproject every ring of a polygon. `None` if any vertex fails.
fn reproject_polygon(polygon: &Polygon<f64>, crs: Crs) -> Option<Polygon<f64>> {
    if crs.is_canonical() {
        return Some(polygon.clone());
    }

    let exterior = reproject_ring(polygon.exterior(), crs)?;
    let interiors = polygon
        .interiors()
        .iter()
        .map(|ring| reproject_ring(ring, crs))
        .collect::<Option<Vec<_>>>()?;
    Some(Polygon::new(exterior, interiors))
}

fn reproject_ring(ring: &LineString<f64>, crs: Crs) -> Option<LineString<f64>> {
    ring.coords()
        .map(|c| {
            crs.to_wgs84(c.x, c.y)
                .ok()
                .map(|(lng, lat)| Coord { x: lng, y: lat })
        })
        .collect::<Option<Vec<_>>>()
        .map(LineString::new)
}

/// Validity filter applied after reprojection.
pub(crate) fn is_valid_polygon(polygon: &Polygon<f64>) -> bool {
    let rings_ok = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .all(is_valid_ring);

    rings_ok && polygon.unsigned_area() > 0.0
}

fn is_valid_ring(ring: &LineString<f64>) -> bool {
    ring.0.len() >= 4
        && ring.is_closed()
        && ring.coords().all(|c| {
            c.x.is_finite()
                && c.y.is_finite()
                && (MIN_LNG..=MAX_LNG).contains(&c.x)
                && (MIN_LAT..=MAX_LAT).contains(&c.y)
        })
        && !ring_self_intersects(ring)
}

/// True when two non-adjacent edges of a closed ring cross or touch.
///
/// Repeated vertices are ignored. Edges are swept in order of their
/// leftmost x so only horizontally overlapping pairs are tested.
fn ring_self_intersects(ring: &LineString<f64>) -> bool {
    let mut edges: Vec<(usize, Line<f64>)> = ring
        .lines()
        .filter(|edge| edge.start != edge.end)
        .enumerate()
        .collect();
    let count = edges.len();
    if count < 4 {
        return false;
    }

    let min_x = |edge: &Line<f64>| edge.start.x.min(edge.end.x);
    let max_x = |edge: &Line<f64>| edge.start.x.max(edge.end.x);
    edges.sort_by(|a, b| min_x(&a.1).total_cmp(&min_x(&b.1)));

    for (i, (a_index, a)) in edges.iter().enumerate() {
        let reach = max_x(a);
        for (b_index, b) in &edges[i + 1..] {
            if min_x(b) > reach {
                break;
            }
            let gap = a_index.abs_diff(*b_index);
            if gap == 1 || gap == count - 1 {
                continue;
            }
            if line_intersection(*a, *b).is_some() {
                return true;
            }
        }
    }
    false
}

/// Rebuild a polygon through the overlay engine.
///
/// A self-union fixes ring orientation and holes that overlap or escape
/// the exterior; a fully degenerate input comes back empty.
pub(crate) fn repair(polygon: Polygon<f64>) -> Result<MultiPolygon<f64>, NormalizeError> {
    let shape = MultiPolygon::new(vec![polygon]);
    let empty = MultiPolygon::new(Vec::new());
    overlay(|| shape.union(&empty))
}

/// Union a list of multipolygons pairwise until one remains.
pub(crate) fn cascaded_union(
    mut parts: Vec<MultiPolygon<f64>>,
) -> Result<MultiPolygon<f64>, NormalizeError> {
    if parts.is_empty() {
        return Ok(MultiPolygon::new(Vec::new()));
    }

    while parts.len() > 1 {
        let mut next = Vec::with_capacity(parts.len().div_ceil(2));
        let mut iter = parts.into_iter();
        while let Some(left) = iter.next() {
            match iter.next() {
                Some(right) => next.push(overlay(|| left.union(&right))?),
                None => next.push(left),
            }
        }
        parts = next;
    }

    Ok(parts.pop().unwrap_or_else(|| MultiPolygon::new(Vec::new())))
}

/// Run an overlay operation, converting an engine panic into an error.
fn overlay<F>(op: F) -> Result<MultiPolygon<f64>, NormalizeError>
where
    F: FnOnce() -> MultiPolygon<f64>,
{
    panic::catch_unwind(AssertUnwindSafe(op)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown overlay panic".to_string());
        NormalizeError::Overlay(message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Contains, Point};

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
        ]
    }

    fn raw(crs: Option<&str>, polygons: Vec<Polygon<f64>>) -> RawPolygonCollection {
        RawPolygonCollection {
            crs_code: crs.map(str::to_string),
            polygons,
            skipped_features: 0,
        }
    }

    #[test]
    fn test_undefined_crs_assumes_wgs84() {
        let (geometry, report) = normalize(raw(None, vec![square(0.0, 0.0, 1.0)])).unwrap();
        assert!(report.crs_assumed);
        assert_eq!(report.source_crs, Crs::Wgs84);
        assert!(!geometry.is_empty());
    }

    #[test]
    fn test_unsupported_crs_fails() {
        let result = normalize(raw(Some("EPSG:2154"), vec![square(0.0, 0.0, 1.0)]));
        assert!(matches!(result, Err(NormalizeError::Crs(_))));
    }

    #[test]
    fn test_overlapping_squares_union_to_one_part() {
        let (geometry, report) = normalize(raw(
            Some("EPSG:4326"),
            vec![square(0.0, 0.0, 2.0), square(1.0, 1.0, 2.0)],
        ))
        .unwrap();

        assert_eq!(report.parts, 1);
        assert_eq!(report.discarded, 0);
        assert!((geometry.shape().unsigned_area() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_squares_stay_separate() {
        let (geometry, _) = normalize(raw(
            None,
            vec![
                square(0.0, 0.0, 1.0),
                square(5.0, 5.0, 1.0),
                square(10.0, 0.0, 1.0),
            ],
        ))
        .unwrap();
        assert_eq!(geometry.part_count(), 3);
    }

    #[test]
    fn test_invalid_polygons_are_discarded() {
        let degenerate = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0), (x: 2.0, y: 2.0)];
        let out_of_range = square(200.0, 0.0, 1.0);
        let (_, report) = normalize(raw(
            None,
            vec![square(0.0, 0.0, 1.0), degenerate, out_of_range],
        ))
        .unwrap();

        assert_eq!(report.input_polygons, 3);
        assert_eq!(report.discarded, 2);
    }

    #[test]
    fn test_nothing_valid_is_an_error() {
        let result = normalize(raw(None, vec![square(200.0, 0.0, 1.0)]));
        assert!(matches!(
            result,
            Err(NormalizeError::NoValidPolygons { total: 1, discarded: 1 })
        ));

        let result = normalize(raw(None, Vec::new()));
        assert!(matches!(result, Err(NormalizeError::NoValidPolygons { .. })));
    }

    #[test]
    fn test_bow_tie_is_discarded() {
        // Edges (0,0)-(2,2) and (2,0)-(0,3) cross at (1.2, 1.2); the signed
        // area is non-zero, so only the crossing check rejects it.
        let bow_tie: Polygon<f64> = polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 2.0, y: 0.0),
            (x: 0.0, y: 3.0),
        ];
        assert!(bow_tie.signed_area().abs() > 0.0);
        assert!(!is_valid_polygon(&bow_tie));

        let (geometry, report) =
            normalize(raw(None, vec![bow_tie, square(5.0, 5.0, 1.0)])).unwrap();
        assert_eq!(report.discarded, 1);
        assert_eq!(report.parts, 1);
        assert!(!geometry.shape().contains(&Point::new(1.5, 1.0)));
    }

    #[test]
    fn test_ring_touching_itself_is_invalid() {
        // Two squares sharing the corner (1, 1), traced as one ring.
        let figure_eight = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 2.0, y: 1.0),
            (x: 2.0, y: 2.0),
            (x: 1.0, y: 2.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ];
        assert!(!is_valid_polygon(&figure_eight));
    }

    #[test]
    fn test_repeated_vertex_is_still_valid() {
        let stutter = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ];
        assert!(is_valid_polygon(&stutter));
        assert!(is_valid_polygon(&square(3.0, 3.0, 2.0)));
    }

    #[test]
    fn test_repair_keeps_a_simple_polygon() {
        let repaired = repair(square(0.0, 0.0, 2.0)).unwrap();
        assert_eq!(repaired.0.len(), 1);
        assert!((repaired.unsigned_area() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_utm_source_lands_near_central_meridian() {
        // 10 km square straddling the zone 33 central meridian at ~43.5°N.
        let utm = polygon![
            (x: 495_000.0, y: 4_815_000.0),
            (x: 505_000.0, y: 4_815_000.0),
            (x: 505_000.0, y: 4_825_000.0),
            (x: 495_000.0, y: 4_825_000.0),
        ];
        let (geometry, report) = normalize(raw(Some("EPSG:32633"), vec![utm])).unwrap();
        let bounds = geometry.bounds().unwrap();

        assert_eq!(report.source_crs, Crs::utm(33, true).unwrap());
        assert!(bounds.min().x < 15.0 && bounds.max().x > 15.0);
        assert!(bounds.min().y > 43.0 && bounds.max().y < 44.0);
    }

    #[test]
    fn test_cascaded_union_of_many() {
        let parts: Vec<_> = (0..9)
            .map(|i| MultiPolygon::new(vec![square(i as f64 * 0.5, 0.0, 1.0)]))
            .collect();
        let union = cascaded_union(parts).unwrap();

        assert_eq!(union.0.len(), 1);
        assert!((union.unsigned_area() - 5.0).abs() < 1e-9);
    }
}
