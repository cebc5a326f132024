//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::fmt::Write;
use std::path::Path;

use super::parser::{BOX_KEY_PREFIX, REGION_SECTION_PREFIX};
use super::settings::ConfigFile;
use crate::region::RegionConfig;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let seed = config
        .placement
        .seed
        .map(|s| s.to_string())
        .unwrap_or_default();

    let mut out = format!(
        r#"[data]
; Base folder for region geometry. Each region reads its land and buffer
; GeoJSON files from <directory>/<code>_shapefiles/
directory = {}

[geometry]
; Containment engine:
;   planar - point-in-polygon on WGS84 lon/lat (default)
;   none   - disable containment; every point classifies as open water
engine = {}

[placement]
; Vessels generated the first time a region's map data is requested
vessels_per_region = {}
; Share of each fleet placed inside the restricted zone (0 < x <= 1)
inside_fraction = {}
; Candidate points drawn per requested vessel before giving up
attempt_multiplier = {}
; Initial valve state:
;   random         - every vessel random
;   closed_in_zone - vessels inside the zone start closed
valve_policy = {}
; Fixed RNG seed for reproducible fleets (empty = random)
seed = {}
; First vessel id handed out
first_vessel_id = {}

[regions]
; Comma-separated region codes to serve. Built-in: uk, croatia, svg
enabled = {}
; Add or override a region with a [region.<code>] section:
;   [region.malta]
;   land = malta_land.geojson
;   buffer = malta_buffer.geojson
;   center = 35.9, 14.4
; Leave buffer empty and set buffer_distance_m to grow the buffer from land,
; measured in buffer_crs (default: the UTM zone of the center):
;   buffer_distance_m = 5556
;   buffer_crs = EPSG:32633
;   zoom = 10
;   box.North = 36.0, 36.2, 14.1, 14.5

[logging]
; Log file path (truncated at the start of every session)
file = {}
"#,
        path_to_string(&config.data.directory),
        config.geometry.engine,
        config.placement.vessels_per_region,
        config.placement.inside_fraction,
        config.placement.attempt_multiplier,
        config.placement.valve_policy,
        seed,
        config.placement.first_vessel_id,
        config.regions.enabled.join(", "),
        path_to_string(&config.logging.file),
    );

    for region in &config.regions.definitions {
        out.push('\n');
        write_region(&mut out, region);
    }

    out
}

fn write_region(out: &mut String, region: &RegionConfig) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "[{}{}]", REGION_SECTION_PREFIX, region.code);
    let _ = writeln!(out, "land = {}", region.land_file);
    let _ = writeln!(
        out,
        "buffer = {}",
        region.buffer_file.as_deref().unwrap_or_default()
    );
    if let Some(spec) = region.buffer_spec {
        let _ = writeln!(out, "buffer_distance_m = {}", spec.distance_m);
        let _ = writeln!(out, "buffer_crs = {}", spec.crs);
    }
    let _ = writeln!(out, "center = {}, {}", region.center.lat, region.center.lng);
    let _ = writeln!(out, "zoom = {}", region.zoom);
    for b in &region.boxes {
        let _ = writeln!(
            out,
            "{}{} = {}, {}, {}, {}",
            BOX_KEY_PREFIX, b.name, b.min_lat, b.max_lat, b.min_lng, b.max_lng
        );
    }
}

fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
