//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};
use std::path::PathBuf;

use super::defaults::{DEFAULT_REGION_ZOOM, MAX_ZOOM};
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::{LatLng, SamplingBox};
use crate::crs::Crs;
use crate::region::{builtin_region, BufferSpec, RegionConfig};

/// Prefix of per-region section names.
pub(super) const REGION_SECTION_PREFIX: &str = "region.";

/// Prefix of sampling box keys inside a region section.
pub(super) const BOX_KEY_PREFIX: &str = "box.";

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [data] section
    if let Some(section) = ini.section(Some("data")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.data.directory = expand_tilde(v);
            }
        }
    }

    // [geometry] section
    if let Some(section) = ini.section(Some("geometry")) {
        if let Some(v) = section.get("engine") {
            config.geometry.engine = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "geometry".to_string(),
                key: "engine".to_string(),
                value: v.to_string(),
                reason: "must be 'planar' or 'none'".to_string(),
            })?;
        }
    }

    // [placement] section
    if let Some(section) = ini.section(Some("placement")) {
        if let Some(v) = section.get("vessels_per_region") {
            config.placement.vessels_per_region =
                v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "placement".to_string(),
                    key: "vessels_per_region".to_string(),
                    value: v.to_string(),
                    reason: "must be a non-negative integer".to_string(),
                })?;
        }
        if let Some(v) = section.get("inside_fraction") {
            let invalid = || ConfigFileError::InvalidValue {
                section: "placement".to_string(),
                key: "inside_fraction".to_string(),
                value: v.to_string(),
                reason: "must be a number greater than 0 and at most 1".to_string(),
            };
            let fraction: f64 = v.trim().parse().map_err(|_| invalid())?;
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(invalid());
            }
            config.placement.inside_fraction = fraction;
        }
        if let Some(v) = section.get("attempt_multiplier") {
            let invalid = || ConfigFileError::InvalidValue {
                section: "placement".to_string(),
                key: "attempt_multiplier".to_string(),
                value: v.to_string(),
                reason: "must be a positive integer".to_string(),
            };
            let multiplier: usize = v.trim().parse().map_err(|_| invalid())?;
            if multiplier == 0 {
                return Err(invalid());
            }
            config.placement.attempt_multiplier = multiplier;
        }
        if let Some(v) = section.get("valve_policy") {
            config.placement.valve_policy =
                v.parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "placement".to_string(),
                    key: "valve_policy".to_string(),
                    value: v.to_string(),
                    reason: "must be 'random' or 'closed_in_zone'".to_string(),
                })?;
        }
        if let Some(v) = section.get("seed") {
            let v = v.trim();
            config.placement.seed = if v.is_empty() {
                None
            } else {
                Some(v.parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "placement".to_string(),
                    key: "seed".to_string(),
                    value: v.to_string(),
                    reason: "must be an unsigned integer or empty".to_string(),
                })?)
            };
        }
        if let Some(v) = section.get("first_vessel_id") {
            config.placement.first_vessel_id =
                v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "placement".to_string(),
                    key: "first_vessel_id".to_string(),
                    value: v.to_string(),
                    reason: "must be an unsigned integer".to_string(),
                })?;
        }
    }

    // [regions] section
    if let Some(section) = ini.section(Some("regions")) {
        if let Some(v) = section.get("enabled") {
            let codes: Vec<String> = v
                .split(',')
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect();
            if codes.is_empty() {
                return Err(ConfigFileError::InvalidValue {
                    section: "regions".to_string(),
                    key: "enabled".to_string(),
                    value: v.to_string(),
                    reason: "at least one region must be enabled".to_string(),
                });
            }
            config.regions.enabled = codes;
        }
    }

    // [region.<code>] sections
    for (name, section) in ini.iter() {
        let Some(code) = name.and_then(|n| n.strip_prefix(REGION_SECTION_PREFIX)) else {
            continue;
        };
        let region = parse_region(code.trim().to_lowercase(), section)?;
        config.regions.definitions.retain(|r| r.code != region.code);
        config.regions.definitions.push(region);
    }

    // Every enabled region must resolve.
    for code in &config.regions.enabled {
        let defined = config.regions.definitions.iter().any(|r| &r.code == code);
        if !defined && builtin_region(code).is_none() {
            return Err(ConfigFileError::UnknownRegion(code.clone()));
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Parse one `[region.<code>]` section.
///
/// A section for a built-in code overlays the built-in definition; any
/// `box.*` key replaces the built-in boxes as a whole. A section for a new
/// code must name a land file, a center, at least one box, and either a
/// buffer file or `buffer_distance_m`. An empty `buffer =` clears the
/// built-in buffer file so the buffer is grown from land instead.
///
/// `buffer_crs` defaults to the built-in one, then to the UTM zone of the
/// center.
fn parse_region(code: String, section: &Properties) -> Result<RegionConfig, ConfigFileError> {
    let section_name = format!("{}{}", REGION_SECTION_PREFIX, code);
    let invalid = |key: &str, value: &str, reason: &str| ConfigFileError::InvalidValue {
        section: section_name.clone(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let base = builtin_region(&code);
    let mut land = base.as_ref().map(|b| b.land_file.clone());
    let mut buffer = base.as_ref().and_then(|b| b.buffer_file.clone());
    let mut center = base.as_ref().map(|b| b.center);
    let mut zoom = base.as_ref().map(|b| b.zoom).unwrap_or(DEFAULT_REGION_ZOOM);
    let mut boxes: Vec<SamplingBox> = Vec::new();
    let mut buffer_distance: Option<f64> = None;
    let mut buffer_crs: Option<Crs> = None;

    for (key, value) in section.iter() {
        let key = key.trim();
        match key {
            "land" => land = non_empty(value),
            "buffer" => buffer = non_empty(value),
            "buffer_distance_m" => {
                let reason = "must be a positive number of metres";
                let d: f64 = value.trim().parse().map_err(|_| invalid(key, value, reason))?;
                if !d.is_finite() || d <= 0.0 {
                    return Err(invalid(key, value, reason));
                }
                buffer_distance = Some(d);
            }
            "buffer_crs" => {
                let crs: Crs = value
                    .parse()
                    .map_err(|e: crate::crs::CrsError| invalid(key, value, &e.to_string()))?;
                if crs.is_canonical() {
                    return Err(invalid(key, value, "must be a metric reference system"));
                }
                buffer_crs = Some(crs);
            }
            "center" => {
                let reason = "expected 'lat, lng' in valid ranges";
                let [lat, lng] = parse_numbers::<2>(value).ok_or_else(|| invalid(key, value, reason))?;
                center = Some(LatLng::new(lat, lng).map_err(|_| invalid(key, value, reason))?);
            }
            "zoom" => {
                let reason = "must be an integer between 0 and 22";
                let z: u8 = value.trim().parse().map_err(|_| invalid(key, value, reason))?;
                if z > MAX_ZOOM {
                    return Err(invalid(key, value, reason));
                }
                zoom = z;
            }
            _ => {
                let Some(box_name) = key.strip_prefix(BOX_KEY_PREFIX) else {
                    return Err(invalid(key, value, "unknown region key"));
                };
                let reason = "expected 'min_lat, max_lat, min_lng, max_lng' with min below max";
                let [min_lat, max_lat, min_lng, max_lng] =
                    parse_numbers::<4>(value).ok_or_else(|| invalid(key, value, reason))?;
                let sampling_box =
                    SamplingBox::new(box_name.trim(), min_lat, max_lat, min_lng, max_lng)
                        .map_err(|e| invalid(key, value, &e.to_string()))?;
                boxes.push(sampling_box);
            }
        }
    }

    if boxes.is_empty() {
        boxes = base.as_ref().map(|b| b.boxes.clone()).unwrap_or_default();
    }

    let land = land.ok_or_else(|| invalid("land", "", "land geometry file is required"))?;
    let center = center.ok_or_else(|| invalid("center", "", "center is required"))?;
    if boxes.is_empty() {
        return Err(invalid("box.<name>", "", "at least one sampling box is required"));
    }

    let base_spec = base.as_ref().and_then(|b| b.buffer_spec);
    let buffer_spec = match (buffer_distance, base_spec) {
        (Some(distance_m), _) => Some(BufferSpec {
            distance_m,
            crs: buffer_crs
                .or(base_spec.map(|s| s.crs))
                .unwrap_or_else(|| Crs::utm_for(center.lng, center.lat)),
        }),
        (None, Some(spec)) => Some(BufferSpec {
            crs: buffer_crs.unwrap_or(spec.crs),
            ..spec
        }),
        (None, None) if buffer_crs.is_some() => {
            return Err(invalid("buffer_crs", "", "requires buffer_distance_m"));
        }
        (None, None) => None,
    };
    if buffer.is_none() && buffer_spec.is_none() {
        return Err(invalid(
            "buffer",
            "",
            "a buffer geometry file or buffer_distance_m is required",
        ));
    }

    Ok(RegionConfig {
        code,
        center,
        zoom,
        boxes,
        land_file: land,
        buffer_file: buffer,
        buffer_spec,
    })
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse exactly `N` comma-separated numbers.
fn parse_numbers<const N: usize>(value: &str) -> Option<[f64; N]> {
    let parsed: Vec<f64> = value
        .split(',')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;
    parsed.try_into().ok()
}

pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
