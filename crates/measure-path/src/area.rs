//! Area of rings and circles on a spherical Earth.
//!
//! Ring area uses the Chamberlain-Duquette approximation: the shoelace
//! formula applied to `(longitude, sin(latitude))`. Longitude differences
//! are taken as-is, so rings crossing the antimeridian are not split and
//! come out wrong. Callers that need that case must split the ring first.

use std::f64::consts::PI;

use crate::types::GeoPoint;

/// Equatorial radius of the WGS84 ellipsoid in meters.
pub const WGS84_EQUATORIAL_RADIUS: f64 = 6_378_137.0;

/// A spherical Earth model.
///
/// The default uses [`WGS84_EQUATORIAL_RADIUS`]. Other radii can be
/// substituted, e.g. in tests against closed-form results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalEarth {
    /// Sphere radius in meters.
    pub radius: f64,
}

impl Default for SphericalEarth {
    fn default() -> Self {
        Self::WGS84
    }
}

impl SphericalEarth {
    /// Sphere with the WGS84 equatorial radius.
    pub const WGS84: Self = Self {
        radius: WGS84_EQUATORIAL_RADIUS,
    };

    /// Create a sphere with the given radius in meters.
    #[must_use]
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Unsigned area enclosed by `ring`, in square meters.
    ///
    /// The ring is closed implicitly; do not repeat the first point.
    /// Winding order does not matter. Fewer than three points enclose
    /// nothing and return `0.0`.
    #[must_use]
    pub fn ring_area(&self, ring: &[GeoPoint]) -> f64 {
        let n = ring.len();
        if n < 3 {
            return 0.0;
        }

        let sum: f64 = (0..n)
            .map(|i| {
                let prev = ring[i];
                let middle = ring[(i + 1) % n];
                let next = ring[(i + 2) % n];
                (next.lng.to_radians() - prev.lng.to_radians()) * middle.lat.to_radians().sin()
            })
            .sum();

        (sum * self.radius * self.radius / 2.0).abs()
    }

    /// Area of a spherical cap with the given ground radius, in square
    /// meters.
    ///
    /// Approaches `πr²` for radii much smaller than the sphere.
    #[must_use]
    pub fn circle_area(&self, radius: f64) -> f64 {
        let rho = radius / self.radius;
        2.0 * PI * self.radius * self.radius * (1.0 - rho.cos())
    }
}

/// [`SphericalEarth::ring_area`] on the WGS84 sphere.
#[must_use]
pub fn ring_area(ring: &[GeoPoint]) -> f64 {
    SphericalEarth::WGS84.ring_area(ring)
}

/// [`SphericalEarth::circle_area`] on the WGS84 sphere.
#[must_use]
pub fn circle_area(radius: f64) -> f64 {
    SphericalEarth::WGS84.circle_area(radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relative_error(actual: f64, expected: f64) -> f64 {
        ((actual - expected) / expected).abs()
    }

    /// Area of a spherical triangle from its corner positions using
    /// L'Huilier's theorem.
    fn lhuilier_area(radius: f64, a: GeoPoint, b: GeoPoint, c: GeoPoint) -> f64 {
        let central = |p: GeoPoint, q: GeoPoint| {
            let (phi1, phi2) = (p.lat.to_radians(), q.lat.to_radians());
            let dphi = phi2 - phi1;
            let dlambda = (q.lng - p.lng).to_radians();
            let h = (dphi / 2.0).sin().powi(2)
                + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
            2.0 * h.sqrt().asin()
        };
        let (sa, sb, sc) = (central(b, c), central(a, c), central(a, b));
        let s = (sa + sb + sc) / 2.0;
        let t = (s / 2.0).tan()
            * ((s - sa) / 2.0).tan()
            * ((s - sb) / 2.0).tan()
            * ((s - sc) / 2.0).tan();
        let excess = 4.0 * t.sqrt().atan();
        excess * radius * radius
    }

    #[test]
    fn fewer_than_three_points_is_zero() {
        assert!(ring_area(&[]).abs() < f64::EPSILON);
        assert!(ring_area(&[GeoPoint::new(1.0, 1.0), GeoPoint::new(2.0, 2.0)]).abs() < f64::EPSILON);
    }

    #[test]
    fn triangle_matches_spherical_excess() {
        let a = GeoPoint::new(57.69, 11.89);
        let b = GeoPoint::new(57.697, 11.88);
        let c = GeoPoint::new(57.71, 11.89);
        let expected = lhuilier_area(WGS84_EQUATORIAL_RADIUS, a, b, c);
        let actual = ring_area(&[a, b, c]);
        assert!(
            relative_error(actual, expected) < 1e-3,
            "ring_area={actual}, spherical excess={expected}",
        );
    }

    #[test]
    fn latitude_band_rectangle_is_exact() {
        // A lat/lng rectangle on a sphere has area R²·Δλ·(sin φ2 − sin φ1),
        // which the approximation reproduces exactly.
        let earth = SphericalEarth::new(1.0);
        let ring = [
            GeoPoint::new(10.0, 20.0),
            GeoPoint::new(10.0, 30.0),
            GeoPoint::new(40.0, 30.0),
            GeoPoint::new(40.0, 20.0),
        ];
        let expected = 10_f64.to_radians() * (40_f64.to_radians().sin() - 10_f64.to_radians().sin());
        assert!(relative_error(earth.ring_area(&ring), expected) < 1e-12);
    }

    #[test]
    fn winding_order_does_not_matter() {
        let ring = vec![
            GeoPoint::new(57.69, 11.89),
            GeoPoint::new(57.697, 11.88),
            GeoPoint::new(57.71, 11.89),
            GeoPoint::new(57.71, 11.91),
            GeoPoint::new(57.69, 11.91),
        ];
        let reversed: Vec<GeoPoint> = ring.iter().rev().copied().collect();
        let forward = ring_area(&ring);
        assert!(forward > 0.0);
        assert!(relative_error(ring_area(&reversed), forward) < 1e-12);
    }

    #[test]
    fn close_to_ellipsoidal_geodesic_area() {
        use geo::{GeodesicArea, LineString, Polygon};

        // At mid latitudes the sphere and the ellipsoid agree within a
        // fraction of a percent.
        let ring = [
            GeoPoint::new(45.0, 7.0),
            GeoPoint::new(45.0, 7.1),
            GeoPoint::new(45.1, 7.1),
            GeoPoint::new(45.1, 7.0),
        ];
        let exterior: LineString<f64> = ring.iter().map(|p| geo::Coord::from(*p)).collect();
        let reference = Polygon::new(exterior, vec![]).geodesic_area_unsigned();
        assert!(relative_error(ring_area(&ring), reference) < 1e-2);
    }

    #[test]
    fn scaled_radius_scales_area_quadratically() {
        let ring = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 1.0),
        ];
        let unit = SphericalEarth::new(1.0).ring_area(&ring);
        let double = SphericalEarth::new(2.0).ring_area(&ring);
        assert!(relative_error(double, 4.0 * unit) < 1e-12);
    }

    #[test]
    fn circle_of_zero_radius_has_no_area() {
        assert!(circle_area(0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn small_circle_is_nearly_planar() {
        let r = 200.0;
        assert!(relative_error(circle_area(r), PI * r * r) < 1e-6);
    }

    #[test]
    fn circle_area_increases_with_radius() {
        let areas: Vec<f64> = [0.0, 1.0, 10.0, 100.0, 1_000.0, 100_000.0, 1_000_000.0]
            .iter()
            .map(|&r| circle_area(r))
            .collect();
        assert!(areas.windows(2).all(|w| w[1] > w[0]), "{areas:?}");
    }

    #[test]
    fn hemisphere_cap() {
        // A cap reaching a quarter of the way round is a hemisphere.
        let earth = SphericalEarth::new(1.0);
        let area = earth.circle_area(PI / 2.0);
        assert!(relative_error(area, 2.0 * PI) < 1e-12);
    }
}
