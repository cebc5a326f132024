//! Region geometries: loading, normalization, and containment.
//!
//! Raw polygon collections come from a [`GeometrySource`], pass through
//! [`normalize`] (reproject, filter, repair, union), and end up as a
//! [`RegionGeometry`] in WGS84 lon/lat. Containment queries go through a
//! [`ContainmentEngine`]. A region without a buffer file can have its buffer
//! grown from land with [`buffer_geometry`].

mod buffer;
mod engine;
mod geojson;
mod normalize;
mod source;
mod types;

pub use buffer::{buffer_geometry, BufferError};
pub use engine::{ClassificationError, ContainmentEngine, EngineKind, NullEngine, PlanarEngine};
pub use geojson::{to_feature_collection, GeoJsonSource};
pub use normalize::{normalize, resolve_crs, NormalizeError, NormalizeReport};
pub use source::{GeometrySource, RawPolygonCollection, SourceError};
pub use types::{GeometryKind, RegionGeometry};
