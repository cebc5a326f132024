//! `zonewatch regions` - list enabled regions.

use zonewatch::geometry::GeometryKind;

use crate::error::CliError;
use crate::runner::CliRunner;

/// List every enabled region with its map view, geometry files, and
/// sampling boxes.
pub fn run(runner: &CliRunner) -> Result<(), CliError> {
    let registry = runner.config().region_registry()?;

    println!("Enabled regions ({})", registry.len());
    println!("Data directory: {}", registry.data_dir().display());

    for region in registry.iter() {
        println!();
        println!(
            "{}  center {:.4}, {:.4}  zoom {}",
            region.code, region.center.lat, region.center.lng, region.zoom
        );
        for kind in GeometryKind::ALL {
            let source = match (
                region.geometry_path(registry.data_dir(), kind),
                region.derived_buffer(),
            ) {
                (Some(path), _) => path.display().to_string(),
                (None, Some(spec)) => {
                    format!("grown {} m from land in {}", spec.distance_m, spec.crs)
                }
                (None, None) => "not configured".to_string(),
            };
            println!("  {:<7} {}", format!("{}:", kind), source);
        }
        for sampling_box in &region.boxes {
            println!(
                "  box {:<24} lat {:>9.4} .. {:<9.4} lng {:>9.4} .. {:.4}",
                sampling_box.name,
                sampling_box.min_lat,
                sampling_box.max_lat,
                sampling_box.min_lng,
                sampling_box.max_lng
            );
        }
    }

    Ok(())
}
