//! Tests for coordinate types

use super::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn test_valid_position() {
    let point = LatLng::new(54.5, -2.0).unwrap();
    assert_eq!(point.lat, 54.5);
    assert_eq!(point.lng, -2.0);
}

#[test]
fn test_latitude_out_of_range() {
    let result = LatLng::new(91.0, 0.0);
    assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
}

#[test]
fn test_longitude_out_of_range() {
    let result = LatLng::new(0.0, -180.5);
    assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
}

#[test]
fn test_nan_rejected() {
    assert!(LatLng::new(f64::NAN, 0.0).is_err());
    assert!(LatLng::new(0.0, f64::INFINITY).is_err());
}

#[test]
fn test_range_edges_accepted() {
    assert!(LatLng::new(MIN_LAT, MIN_LNG).is_ok());
    assert!(LatLng::new(MAX_LAT, MAX_LNG).is_ok());
}

#[test]
fn test_rounded_to_six_places() {
    let point = LatLng::new(43.123456789, 16.987654321).unwrap().rounded();
    assert_eq!(point.lat, 43.123457);
    assert_eq!(point.lng, 16.987654);
}

#[test]
fn test_display_format() {
    let point = LatLng::new(1.5, -2.25).unwrap();
    assert_eq!(point.to_string(), "(1.500000, -2.250000)");
}

#[test]
fn test_box_rejects_inverted_bounds() {
    let result = SamplingBox::new("Bad", 50.0, 49.0, 0.0, 1.0);
    assert!(matches!(result, Err(CoordError::EmptyBox { .. })));

    let result = SamplingBox::new("Flat", 49.0, 50.0, 1.0, 1.0);
    assert!(matches!(result, Err(CoordError::EmptyBox { .. })));
}

#[test]
fn test_box_rejects_invalid_corner() {
    let result = SamplingBox::new("Pole", 80.0, 95.0, 0.0, 1.0);
    assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
}

#[test]
fn test_box_samples_stay_inside() {
    let sea = SamplingBox::new("Irish Sea", 52.5, 54.5, -5.5, -3.5).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..1000 {
        let point = sea.sample(&mut rng);
        assert!(sea.contains(&point), "{} escaped {:?}", point, sea);
    }
}

#[test]
fn test_box_sampling_is_deterministic_under_seed() {
    let sea = SamplingBox::new("North Sea", 53.0, 58.0, 1.0, 3.0).unwrap();
    let mut a = ChaCha8Rng::seed_from_u64(42);
    let mut b = ChaCha8Rng::seed_from_u64(42);

    let first: Vec<LatLng> = (0..10).map(|_| sea.sample(&mut a)).collect();
    let second: Vec<LatLng> = (0..10).map(|_| sea.sample(&mut b)).collect();
    assert_eq!(first, second);
}

#[test]
fn test_error_messages() {
    let err = LatLng::new(100.0, 0.0).unwrap_err();
    assert!(err.to_string().contains("Invalid latitude"));

    let err = SamplingBox::new("Empty", 1.0, 1.0, 1.0, 2.0).unwrap_err();
    assert!(err.to_string().contains("'Empty'"));
}
