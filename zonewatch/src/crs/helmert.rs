//! Seven-parameter Helmert datum transformation.

use super::transverse_mercator::Ellipsoid;

/// Seven-parameter Helmert transform between two geodetic datums.
///
/// Translations are in metres, scale in parts per million, rotations in
/// arc-seconds (position vector convention).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HelmertTransform {
    pub(crate) tx: f64,
    pub(crate) ty: f64,
    pub(crate) tz: f64,
    pub(crate) scale_ppm: f64,
    pub(crate) rx: f64,
    pub(crate) ry: f64,
    pub(crate) rz: f64,
}

impl HelmertTransform {
    /// OSGB36 → WGS84 (Ordnance Survey published parameters, ~5 m accuracy).
    pub(crate) fn osgb36_to_wgs84() -> Self {
        Self {
            tx: 446.448,
            ty: -125.157,
            tz: 542.060,
            scale_ppm: -20.4894,
            rx: 0.1502,
            ry: 0.2470,
            rz: 0.8421,
        }
    }

    /// Approximate inverse (all parameters negated; exact to millimetres for
    /// parameters this small).
    pub(crate) fn inverse(&self) -> Self {
        Self {
            tx: -self.tx,
            ty: -self.ty,
            tz: -self.tz,
            scale_ppm: -self.scale_ppm,
            rx: -self.rx,
            ry: -self.ry,
            rz: -self.rz,
        }
    }

    /// Shift a `(lat, lng)` on `from` to the corresponding `(lat, lng)` on `to`.
    ///
    /// Heights are taken as zero on the source ellipsoid and discarded on the
    /// target.
    pub(crate) fn apply(&self, lat: f64, lng: f64, from: &Ellipsoid, to: &Ellipsoid) -> (f64, f64) {
        let (x, y, z) = to_cartesian(lat, lng, from);

        let s = self.scale_ppm * 1e-6;
        let rx = (self.rx / 3600.0).to_radians();
        let ry = (self.ry / 3600.0).to_radians();
        let rz = (self.rz / 3600.0).to_radians();

        let x2 = self.tx + (1.0 + s) * x - rz * y + ry * z;
        let y2 = self.ty + rz * x + (1.0 + s) * y - rx * z;
        let z2 = self.tz - ry * x + rx * y + (1.0 + s) * z;

        from_cartesian(x2, y2, z2, to)
    }
}

fn to_cartesian(lat: f64, lng: f64, ellipsoid: &Ellipsoid) -> (f64, f64, f64) {
    let phi = lat.to_radians();
    let lambda = lng.to_radians();
    let e2 = ellipsoid.e2();
    let nu = ellipsoid.a / (1.0 - e2 * phi.sin().powi(2)).sqrt();

    (
        nu * phi.cos() * lambda.cos(),
        nu * phi.cos() * lambda.sin(),
        (1.0 - e2) * nu * phi.sin(),
    )
}

fn from_cartesian(x: f64, y: f64, z: f64, ellipsoid: &Ellipsoid) -> (f64, f64) {
    let e2 = ellipsoid.e2();
    let p = x.hypot(y);
    let mut phi = z.atan2(p * (1.0 - e2));

    // Converges to sub-millimetre in a handful of iterations.
    for _ in 0..10 {
        let nu = ellipsoid.a / (1.0 - e2 * phi.sin().powi(2)).sqrt();
        phi = (z + e2 * nu * phi.sin()).atan2(p);
    }

    (phi.to_degrees(), y.atan2(x).to_degrees())
}
