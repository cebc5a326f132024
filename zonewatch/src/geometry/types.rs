//! Canonical query geometry types.

use std::fmt;
use std::str::FromStr;

use geo::{BoundingRect, MultiPolygon, Rect};

/// The two geometry slots every region carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeometryKind {
    /// Land mask; vessels must never be placed inside it.
    Land,
    /// Coastal restricted-zone buffer.
    Buffer,
}

impl GeometryKind {
    /// Both kinds, in load order.
    pub const ALL: [GeometryKind; 2] = [GeometryKind::Land, GeometryKind::Buffer];

    /// Lowercase name used in logs, config keys, and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Land => "land",
            GeometryKind::Buffer => "buffer",
        }
    }

    /// Capitalized name for user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            GeometryKind::Land => "Land",
            GeometryKind::Buffer => "Buffer",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "land" => Ok(GeometryKind::Land),
            "buffer" | "zone" => Ok(GeometryKind::Buffer),
            other => Err(format!("unknown geometry kind '{}'", other)),
        }
    }
}

/// A unioned, WGS84 lon/lat (multi)polygon ready for containment queries.
///
/// The empty value is the "no data" sentinel: it contains nothing and
/// reports `is_empty() == true`. A cached geometry is always either a
/// complete union or this sentinel, never a partial result.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionGeometry {
    shape: MultiPolygon<f64>,
    bounds: Option<Rect<f64>>,
}

impl RegionGeometry {
    /// The empty sentinel.
    pub fn empty() -> Self {
        Self {
            shape: MultiPolygon::new(Vec::new()),
            bounds: None,
        }
    }

    /// Wrap a unioned multipolygon. An input without polygons is the sentinel.
    pub fn new(shape: MultiPolygon<f64>) -> Self {
        let bounds = shape.bounding_rect();
        Self { shape, bounds }
    }

    /// Returns true for the empty sentinel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shape.0.is_empty()
    }

    /// Number of polygon parts in the union.
    pub fn part_count(&self) -> usize {
        self.shape.0.len()
    }

    /// Bounding rectangle in lon/lat, `None` for the sentinel.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.bounds
    }

    /// Borrow the underlying multipolygon.
    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }
}

impl Default for RegionGeometry {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn test_kind_names() {
        assert_eq!(GeometryKind::Land.to_string(), "land");
        assert_eq!(GeometryKind::Buffer.to_string(), "buffer");
        assert_eq!("Buffer".parse::<GeometryKind>(), Ok(GeometryKind::Buffer));
        assert!("sea".parse::<GeometryKind>().is_err());
    }

    #[test]
    fn test_empty_sentinel() {
        let geometry = RegionGeometry::empty();
        assert!(geometry.is_empty());
        assert_eq!(geometry.part_count(), 0);
        assert!(geometry.bounds().is_none());
        assert_eq!(geometry, RegionGeometry::default());
    }

    #[test]
    fn test_bounds_follow_shape() {
        let square = polygon![
            (x: 1.0, y: 2.0),
            (x: 3.0, y: 2.0),
            (x: 3.0, y: 5.0),
            (x: 1.0, y: 5.0),
        ];
        let geometry = RegionGeometry::new(MultiPolygon::new(vec![square]));
        let bounds = geometry.bounds().unwrap();

        assert!(!geometry.is_empty());
        assert_eq!(bounds.min().x, 1.0);
        assert_eq!(bounds.max().y, 5.0);
    }
}
