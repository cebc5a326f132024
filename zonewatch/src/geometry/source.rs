//! Geometry source abstraction.
//!
//! A [`GeometrySource`] turns a file path into a raw polygon collection plus
//! the name of the reference system it was authored in. Normalization
//! (reprojection, repair, union) happens afterwards, in the cache layer, so
//! sources stay dumb readers.

use std::path::{Path, PathBuf};

use geo::Polygon;
use thiserror::Error;

/// Errors a geometry source can report.
///
/// The cache distinguishes these to log the right diagnostic; both end up as
/// the empty sentinel.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No file at the given path.
    #[error("Geometry file not found: {0}")]
    NotFound(PathBuf),

    /// The file exists but could not be read or parsed.
    #[error("Invalid geometry file {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Polygons exactly as read from a source, before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawPolygonCollection {
    /// Reference system code as written in the file, if any.
    pub crs_code: Option<String>,
    /// Polygon parts in source coordinates (multi-parts already flattened).
    pub polygons: Vec<Polygon<f64>>,
    /// Features skipped because they carried no polygonal geometry.
    pub skipped_features: usize,
}

/// Reads raw polygon collections from storage.
///
/// Implementations must be `Send + Sync`; a single source instance is
/// shared by every cache lookup.
pub trait GeometrySource: Send + Sync {
    /// Load the polygon collection stored at `path`.
    fn load(&self, path: &Path) -> Result<RawPolygonCollection, SourceError>;

    /// Short name used in diagnostics.
    fn name(&self) -> &str;
}
