//! Built-in regions shipped with the default data set.

use crate::coord::{LatLng, SamplingBox};
use crate::crs::Crs;

use super::{BufferSpec, RegionConfig, THREE_NAUTICAL_MILES_M};

/// Codes of the built-in regions, in display order.
pub const BUILTIN_CODES: [&str; 3] = ["uk", "croatia", "svg"];

type BoxSpec = (&'static str, f64, f64, f64, f64);

struct Builtin {
    code: &'static str,
    center: (f64, f64),
    zoom: u8,
    land: &'static str,
    buffer: &'static str,
    buffer_distance_m: f64,
    buffer_crs: Crs,
    boxes: &'static [BoxSpec],
}

const BUILTINS: [Builtin; 3] = [
    Builtin {
        code: "uk",
        center: (54.5, -2.0),
        zoom: 5,
        land: "CTRY_DEC_2024_UK_BFC_simplified_100m.geojson",
        buffer: "CTRY_DEC_2024_UK_BFC_buffer_3nm_simplified_100m.geojson",
        buffer_distance_m: THREE_NAUTICAL_MILES_M,
        buffer_crs: Crs::BritishNationalGrid,
        boxes: &[
            ("North Sea", 53.0, 58.0, 1.0, 3.0),
            ("English Channel E", 49.5, 50.5, -1.0, 1.0),
            ("English Channel W", 49.0, 50.0, -6.0, -4.0),
            ("Irish Sea", 52.5, 54.5, -5.5, -3.5),
        ],
    },
    Builtin {
        code: "croatia",
        center: (44.5, 16.5),
        zoom: 7,
        land: "Croatia coastline CSR meters_simplified_1m.geojson",
        buffer: "croatiacoast5556mbuffer.geojson",
        buffer_distance_m: THREE_NAUTICAL_MILES_M,
        buffer_crs: Crs::Utm {
            zone: 33,
            north: true,
        },
        boxes: &[
            ("Adriatic N", 44.5, 45.5, 13.5, 14.5),
            ("Adriatic Mid", 43.0, 44.0, 15.0, 16.0),
            ("Adriatic S", 42.0, 43.0, 16.5, 17.5),
        ],
    },
    Builtin {
        code: "svg",
        center: (13.2, -61.2),
        zoom: 10,
        land: "SVGcoast+.geojson",
        buffer: "SVGcoast+1000mbuffer.geojson",
        buffer_distance_m: 1000.0,
        buffer_crs: Crs::Utm {
            zone: 20,
            north: true,
        },
        boxes: &[
            ("SVG Main", 13.05, 13.4, -61.3, -61.0),
            ("Grenadines N", 12.8, 13.05, -61.35, -61.1),
            ("Grenadines S", 12.5, 12.8, -61.5, -61.2),
        ],
    },
];

impl Builtin {
    fn to_config(&self) -> RegionConfig {
        let (lat, lng) = self.center;
        RegionConfig {
            code: self.code.to_string(),
            center: LatLng::unchecked(lat, lng),
            zoom: self.zoom,
            boxes: self
                .boxes
                .iter()
                .map(|&(name, min_lat, max_lat, min_lng, max_lng)| SamplingBox {
                    name: name.to_string(),
                    min_lat,
                    max_lat,
                    min_lng,
                    max_lng,
                })
                .collect(),
            land_file: self.land.to_string(),
            buffer_file: Some(self.buffer.to_string()),
            buffer_spec: Some(BufferSpec {
                distance_m: self.buffer_distance_m,
                crs: self.buffer_crs,
            }),
        }
    }
}

/// Every built-in region.
pub fn builtin_regions() -> Vec<RegionConfig> {
    BUILTINS.iter().map(Builtin::to_config).collect()
}

/// The built-in region with the given code, if any.
pub fn builtin_region(code: &str) -> Option<RegionConfig> {
    BUILTINS
        .iter()
        .find(|b| b.code.eq_ignore_ascii_case(code.trim()))
        .map(Builtin::to_config)
}
