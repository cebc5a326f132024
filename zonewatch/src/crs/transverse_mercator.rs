//! Ellipsoidal Transverse Mercator projection.
//!
//! Series expansions from the Ordnance Survey "A guide to coordinate systems
//! in Great Britain", Annex C. Accurate to well under a millimetre within a
//! few degrees of the central meridian, which covers both UTM zones and the
//! British National Grid.

/// A reference ellipsoid defined by its semi-major and semi-minor axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Ellipsoid {
    /// Semi-major axis (metres)
    pub(crate) a: f64,
    /// Semi-minor axis (metres)
    pub(crate) b: f64,
}

impl Ellipsoid {
    pub(crate) const WGS84: Self = Self {
        a: 6_378_137.0,
        b: 6_356_752.314_245,
    };

    pub(crate) const AIRY_1830: Self = Self {
        a: 6_377_563.396,
        b: 6_356_256.909,
    };

    /// First eccentricity squared.
    #[inline]
    pub(crate) fn e2(&self) -> f64 {
        1.0 - (self.b * self.b) / (self.a * self.a)
    }
}

/// Transverse Mercator projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TransverseMercator {
    pub(crate) ellipsoid: Ellipsoid,
    /// Scale factor on the central meridian
    pub(crate) scale: f64,
    /// Latitude of true origin (degrees)
    pub(crate) origin_lat: f64,
    /// Longitude of true origin / central meridian (degrees)
    pub(crate) origin_lng: f64,
    /// False easting (metres)
    pub(crate) false_easting: f64,
    /// False northing (metres)
    pub(crate) false_northing: f64,
}

impl TransverseMercator {
    /// UTM zone on WGS84.
    pub(crate) fn utm(zone: u8, north: bool) -> Self {
        Self {
            ellipsoid: Ellipsoid::WGS84,
            scale: 0.9996,
            origin_lat: 0.0,
            origin_lng: zone as f64 * 6.0 - 183.0,
            false_easting: 500_000.0,
            false_northing: if north { 0.0 } else { 10_000_000.0 },
        }
    }

    /// British National Grid on Airy 1830 (OSGB36 datum).
    pub(crate) fn british_national_grid() -> Self {
        Self {
            ellipsoid: Ellipsoid::AIRY_1830,
            scale: 0.999_601_271_7,
            origin_lat: 49.0,
            origin_lng: -2.0,
            false_easting: 400_000.0,
            false_northing: -100_000.0,
        }
    }

    /// Meridional arc length from the origin latitude to `phi` (radians).
    fn meridional_arc(&self, phi: f64) -> f64 {
        let Ellipsoid { a, b } = self.ellipsoid;
        let n = (a - b) / (a + b);
        let (n2, n3) = (n * n, n * n * n);
        let phi0 = self.origin_lat.to_radians();
        let d = phi - phi0;
        let s = phi + phi0;

        b * self.scale
            * ((1.0 + n + 1.25 * n2 + 1.25 * n3) * d
                - (3.0 * n + 3.0 * n2 + 21.0 / 8.0 * n3) * d.sin() * s.cos()
                + (15.0 / 8.0 * n2 + 15.0 / 8.0 * n3) * (2.0 * d).sin() * (2.0 * s).cos()
                - 35.0 / 24.0 * n3 * (3.0 * d).sin() * (3.0 * s).cos())
    }

    /// Radii of curvature (nu, rho) at latitude `phi`, scaled by F0.
    fn curvature(&self, phi: f64) -> (f64, f64) {
        let a = self.ellipsoid.a;
        let e2 = self.ellipsoid.e2();
        let sin2 = phi.sin() * phi.sin();
        let nu = a * self.scale / (1.0 - e2 * sin2).sqrt();
        let rho = a * self.scale * (1.0 - e2) / (1.0 - e2 * sin2).powf(1.5);
        (nu, rho)
    }

    /// Project `(lat, lng)` in degrees to `(easting, northing)` in metres.
    pub(crate) fn forward(&self, lat: f64, lng: f64) -> (f64, f64) {
        let phi = lat.to_radians();
        let dl = (lng - self.origin_lng).to_radians();

        let (nu, rho) = self.curvature(phi);
        let eta2 = nu / rho - 1.0;
        let m = self.meridional_arc(phi);

        let (sin, cos) = (phi.sin(), phi.cos());
        let tan2 = phi.tan() * phi.tan();
        let tan4 = tan2 * tan2;

        let i = m + self.false_northing;
        let ii = nu / 2.0 * sin * cos;
        let iii = nu / 24.0 * sin * cos.powi(3) * (5.0 - tan2 + 9.0 * eta2);
        let iiia = nu / 720.0 * sin * cos.powi(5) * (61.0 - 58.0 * tan2 + tan4);
        let iv = nu * cos;
        let v = nu / 6.0 * cos.powi(3) * (nu / rho - tan2);
        let vi = nu / 120.0
            * cos.powi(5)
            * (5.0 - 18.0 * tan2 + tan4 + 14.0 * eta2 - 58.0 * tan2 * eta2);

        let northing = i + ii * dl.powi(2) + iii * dl.powi(4) + iiia * dl.powi(6);
        let easting = self.false_easting + iv * dl + v * dl.powi(3) + vi * dl.powi(5);
        (easting, northing)
    }

    /// Unproject `(easting, northing)` in metres to `(lat, lng)` in degrees.
    pub(crate) fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let a = self.ellipsoid.a;
        let phi0 = self.origin_lat.to_radians();

        // Iterate the footpoint latitude until the arc matches to 0.01 mm.
        let mut phi = (northing - self.false_northing) / (a * self.scale) + phi0;
        let mut m = self.meridional_arc(phi);
        let mut guard = 0;
        while (northing - self.false_northing - m).abs() >= 1e-5 && guard < 100 {
            phi += (northing - self.false_northing - m) / (a * self.scale);
            m = self.meridional_arc(phi);
            guard += 1;
        }

        let (nu, rho) = self.curvature(phi);
        let eta2 = nu / rho - 1.0;
        let tan = phi.tan();
        let (tan2, tan4, tan6) = (tan * tan, tan.powi(4), tan.powi(6));
        let sec = 1.0 / phi.cos();

        let vii = tan / (2.0 * rho * nu);
        let viii = tan / (24.0 * rho * nu.powi(3)) * (5.0 + 3.0 * tan2 + eta2 - 9.0 * tan2 * eta2);
        let ix = tan / (720.0 * rho * nu.powi(5)) * (61.0 + 90.0 * tan2 + 45.0 * tan4);
        let x = sec / nu;
        let xi = sec / (6.0 * nu.powi(3)) * (nu / rho + 2.0 * tan2);
        let xii = sec / (120.0 * nu.powi(5)) * (5.0 + 28.0 * tan2 + 24.0 * tan4);
        let xiia = sec / (5040.0 * nu.powi(7)) * (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * tan6);

        let de = easting - self.false_easting;
        let lat = phi - vii * de.powi(2) + viii * de.powi(4) - ix * de.powi(6);
        let lng = self.origin_lng.to_radians() + x * de - xi * de.powi(3) + xii * de.powi(5)
            - xiia * de.powi(7);

        (lat.to_degrees(), lng.to_degrees())
    }
}
