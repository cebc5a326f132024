//! GeoJSON geometry source and display export.
//!
//! Reads `FeatureCollection`, single `Feature`, or bare `Polygon` /
//! `MultiPolygon` documents. The pre-RFC 7946 `crs` member is honoured so
//! projected exports (UTM, British National Grid) can be loaded directly;
//! documents without one are reported with an undefined reference system.

use std::path::Path;

use geo::{Coord, LineString, Polygon};
use serde::Deserialize;
use serde_json::{json, Value};

use super::source::{GeometrySource, RawPolygonCollection, SourceError};
use super::types::RegionGeometry;

type Position = Vec<f64>;
type Ring = Vec<Position>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Document {
    FeatureCollection {
        #[serde(default)]
        features: Vec<Feature>,
        #[serde(default)]
        crs: Option<NamedCrs>,
    },
    Feature {
        #[serde(default)]
        geometry: Option<Geometry>,
        #[serde(default)]
        crs: Option<NamedCrs>,
    },
    Polygon {
        coordinates: Vec<Ring>,
        #[serde(default)]
        crs: Option<NamedCrs>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Ring>>,
        #[serde(default)]
        crs: Option<NamedCrs>,
    },
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    GeometryCollection { geometries: Vec<Geometry> },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct NamedCrs {
    properties: NamedCrsProperties,
}

#[derive(Debug, Deserialize)]
struct NamedCrsProperties {
    name: String,
}

/// Reads polygon collections from GeoJSON files.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonSource;

impl GeoJsonSource {
    pub fn new() -> Self {
        Self
    }

    /// Parse a GeoJSON document from bytes.
    ///
    /// `path` is only used for error reporting.
    pub fn parse(bytes: &[u8], path: &Path) -> Result<RawPolygonCollection, SourceError> {
        let invalid = |reason: String| SourceError::Invalid {
            path: path.to_path_buf(),
            reason,
        };

        let document: Document =
            serde_json::from_slice(bytes).map_err(|e| invalid(e.to_string()))?;

        let mut collection = RawPolygonCollection::default();
        let crs = match document {
            Document::FeatureCollection { features, crs } => {
                for feature in features {
                    match feature.geometry {
                        Some(geometry) => collect_geometry(geometry, &mut collection)
                            .map_err(&invalid)?,
                        None => collection.skipped_features += 1,
                    }
                }
                crs
            }
            Document::Feature { geometry, crs } => {
                match geometry {
                    Some(geometry) => {
                        collect_geometry(geometry, &mut collection).map_err(&invalid)?
                    }
                    None => collection.skipped_features += 1,
                }
                crs
            }
            Document::Polygon { coordinates, crs } => {
                collection
                    .polygons
                    .push(build_polygon(coordinates).map_err(&invalid)?);
                crs
            }
            Document::MultiPolygon { coordinates, crs } => {
                for rings in coordinates {
                    collection
                        .polygons
                        .push(build_polygon(rings).map_err(&invalid)?);
                }
                crs
            }
        };

        collection.crs_code = crs.map(|c| c.properties.name);
        Ok(collection)
    }
}

impl GeometrySource for GeoJsonSource {
    fn load(&self, path: &Path) -> Result<RawPolygonCollection, SourceError> {
        if !path.exists() {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path).map_err(|e| SourceError::Invalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let collection = Self::parse(&bytes, path)?;
        tracing::debug!(
            path = %path.display(),
            polygons = collection.polygons.len(),
            skipped = collection.skipped_features,
            crs = collection.crs_code.as_deref().unwrap_or("undefined"),
            "Read GeoJSON geometry"
        );
        Ok(collection)
    }

    fn name(&self) -> &str {
        "geojson"
    }
}

fn collect_geometry(
    geometry: Geometry,
    collection: &mut RawPolygonCollection,
) -> Result<(), String> {
    match geometry {
        Geometry::Polygon { coordinates } => {
            collection.polygons.push(build_polygon(coordinates)?);
        }
        Geometry::MultiPolygon { coordinates } => {
            for rings in coordinates {
                collection.polygons.push(build_polygon(rings)?);
            }
        }
        Geometry::GeometryCollection { geometries } => {
            for child in geometries {
                collect_geometry(child, collection)?;
            }
        }
        Geometry::Other => collection.skipped_features += 1,
    }
    Ok(())
}

fn build_polygon(rings: Vec<Ring>) -> Result<Polygon<f64>, String> {
    let mut rings = rings.into_iter().map(build_ring);
    let exterior = match rings.next() {
        Some(ring) => ring?,
        None => LineString::new(Vec::new()),
    };
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn build_ring(ring: Ring) -> Result<LineString<f64>, String> {
    ring.into_iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(format!(
                "position needs at least two coordinates, got {}",
                position.len()
            )),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

/// Export a cached geometry as a single-feature GeoJSON `FeatureCollection`.
///
/// Returns `None` for the empty sentinel so callers can emit `null`.
pub fn to_feature_collection(geometry: &RegionGeometry, properties: Value) -> Option<Value> {
    if geometry.is_empty() {
        return None;
    }

    let polygons: Vec<Vec<Vec<[f64; 2]>>> = geometry
        .shape()
        .iter()
        .map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
                .collect()
        })
        .collect();

    Some(json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": properties,
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": polygons,
            },
        }],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::MultiPolygon;

    fn parse(text: &str) -> Result<RawPolygonCollection, SourceError> {
        GeoJsonSource::parse(text.as_bytes(), Path::new("test.geojson"))
    }

    #[test]
    fn test_feature_collection_with_named_crs() {
        let collection = parse(
            r#"{
                "type": "FeatureCollection",
                "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::32633" } },
                "features": [
                    { "type": "Feature", "properties": { "name": "Brac" },
                      "geometry": { "type": "Polygon",
                        "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]]] } },
                    { "type": "Feature", "properties": {},
                      "geometry": { "type": "LineString", "coordinates": [[0,0],[1,1]] } },
                    { "type": "Feature", "properties": {}, "geometry": null }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            collection.crs_code.as_deref(),
            Some("urn:ogc:def:crs:EPSG::32633")
        );
        assert_eq!(collection.polygons.len(), 1);
        assert_eq!(collection.skipped_features, 2);
    }

    #[test]
    fn test_multipolygon_is_flattened() {
        let collection = parse(
            r#"{ "type": "MultiPolygon", "coordinates": [
                [[[0,0],[1,0],[1,1],[0,0]]],
                [[[5,5],[6,5],[6,6],[5,5]]]
            ] }"#,
        )
        .unwrap();

        assert!(collection.crs_code.is_none());
        assert_eq!(collection.polygons.len(), 2);
    }

    #[test]
    fn test_holes_become_interiors() {
        let collection = parse(
            r#"{ "type": "Feature", "properties": {}, "geometry": { "type": "Polygon", "coordinates": [
                [[0,0],[10,0],[10,10],[0,10],[0,0]],
                [[4,4],[6,4],[6,6],[4,6],[4,4]]
            ] } }"#,
        )
        .unwrap();

        assert_eq!(collection.polygons[0].interiors().len(), 1);
    }

    #[test]
    fn test_third_coordinate_ignored() {
        let collection = parse(
            r#"{ "type": "Polygon", "coordinates": [[[0,0,12],[1,0,12],[1,1,12],[0,0,12]]] }"#,
        )
        .unwrap();
        assert_eq!(collection.polygons[0].exterior().0[1], Coord { x: 1.0, y: 0.0 });
    }

    #[test]
    fn test_short_position_is_invalid() {
        let result = parse(r#"{ "type": "Polygon", "coordinates": [[[0],[1,0],[1,1],[0,0]]] }"#);
        assert!(matches!(result, Err(SourceError::Invalid { .. })));
    }

    #[test]
    fn test_malformed_json_is_invalid() {
        let result = parse("{ not json");
        assert!(matches!(result, Err(SourceError::Invalid { .. })));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.geojson");

        let result = GeoJsonSource::new().load(&path);
        assert!(matches!(result, Err(SourceError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_load_from_disk() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("land.geojson");
        std::fs::write(
            &path,
            r#"{ "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]] }"#,
        )
        .unwrap();

        let collection = GeoJsonSource::new().load(&path).unwrap();
        assert_eq!(collection.polygons.len(), 1);
    }

    #[test]
    fn test_export_empty_is_none() {
        assert!(to_feature_collection(&RegionGeometry::empty(), json!({})).is_none());
    }

    #[test]
    fn test_export_feature_collection() {
        let collection = parse(
            r#"{ "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]] }"#,
        )
        .unwrap();
        let geometry = RegionGeometry::new(MultiPolygon::new(collection.polygons));

        let value = to_feature_collection(&geometry, json!({ "kind": "land" })).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["properties"]["kind"], "land");
        assert_eq!(value["features"][0]["geometry"]["type"], "MultiPolygon");
        assert_eq!(
            value["features"][0]["geometry"]["coordinates"][0][0]
                .as_array()
                .unwrap()
                .len(),
            5
        );
    }
}
