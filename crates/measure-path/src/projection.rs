//! Collaborator interfaces supplied by the host map, plus a reference
//! Web-Mercator view.
//!
//! The planner never caches projections: every call re-projects through
//! whatever view the host passes in, so a changed center or zoom is picked
//! up by simply planning again.

use std::f64::consts::PI;

use geo::Haversine;
use geo::line_measures::Distance;
use serde::{Deserialize, Serialize};

use crate::area::WGS84_EQUATORIAL_RADIUS;
use crate::types::{GeoPoint, ScreenPoint};

/// Converts between geographic and screen positions for the current view.
pub trait Projector {
    /// Screen position of a geographic point.
    fn project(&self, point: GeoPoint) -> ScreenPoint;

    /// Geographic position of a screen point.
    fn unproject(&self, point: ScreenPoint) -> GeoPoint;
}

/// Great-circle ground distance between two points, in meters.
pub trait DistanceMetric {
    /// Distance from `a` to `b` in meters.
    fn distance(&self, a: GeoPoint, b: GeoPoint) -> f64;
}

impl<F> DistanceMetric for F
where
    F: Fn(GeoPoint, GeoPoint) -> f64,
{
    fn distance(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        self(a, b)
    }
}

/// Anything that can both project and measure.
pub trait MapView: Projector + DistanceMetric {}

impl<T: Projector + DistanceMetric + ?Sized> MapView for T {}

/// Haversine distance on a sphere, backed by the `geo` crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HaversineDistance;

impl DistanceMetric for HaversineDistance {
    fn distance(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        Haversine.distance(geo::Point::from(a), geo::Point::from(b))
    }
}

/// Width and height of the map container in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

/// A spherical Web-Mercator (EPSG:3857) view with 256-pixel tiles.
///
/// `project` returns container pixels: `(0, 0)` is the top-left corner of
/// a `size` container centered on `center` at `zoom`. Ground distances use
/// [`HaversineDistance`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Geographic center of the container.
    pub center: GeoPoint,
    /// Zoom level; fractional values are allowed.
    pub zoom: f64,
    /// Container size in pixels.
    pub size: ViewSize,
}

impl Viewport {
    /// Latitude limit of the square Web-Mercator world.
    pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

    /// Tile edge length in pixels at zoom 0.
    pub const TILE_SIZE: f64 = 256.0;

    /// Create a view.
    #[must_use]
    pub const fn new(center: GeoPoint, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            size: ViewSize { width, height },
        }
    }

    /// The same container at a different center and zoom, as used while a
    /// zoom animation interpolates between views.
    #[must_use]
    pub const fn with_view(self, center: GeoPoint, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            size: self.size,
        }
    }

    /// World size in pixels at the current zoom.
    fn scale(&self) -> f64 {
        Self::TILE_SIZE * self.zoom.exp2()
    }

    /// Absolute world pixel position at the current zoom.
    fn world_pixel(&self, point: GeoPoint) -> ScreenPoint {
        let lat = point
            .lat
            .clamp(-Self::MAX_LATITUDE, Self::MAX_LATITUDE)
            .to_radians();
        let x = WGS84_EQUATORIAL_RADIUS * point.lng.to_radians();
        let y = WGS84_EQUATORIAL_RADIUS * (PI / 4.0 + lat / 2.0).tan().ln();
        let k = 0.5 / (PI * WGS84_EQUATORIAL_RADIUS);
        let scale = self.scale();
        ScreenPoint::new(scale * k.mul_add(x, 0.5), scale * (-k).mul_add(y, 0.5))
    }

    /// Inverse of [`Self::world_pixel`].
    fn unproject_world(&self, pixel: ScreenPoint) -> GeoPoint {
        let k = 0.5 / (PI * WGS84_EQUATORIAL_RADIUS);
        let scale = self.scale();
        let x = (pixel.x / scale - 0.5) / k;
        let y = (pixel.y / scale - 0.5) / -k;
        let lat = 2.0f64.mul_add((y / WGS84_EQUATORIAL_RADIUS).exp().atan(), -PI / 2.0);
        GeoPoint::new(
            lat.to_degrees(),
            (x / WGS84_EQUATORIAL_RADIUS).to_degrees(),
        )
    }

    /// World pixel position of the container's top-left corner.
    fn origin(&self) -> ScreenPoint {
        let c = self.world_pixel(self.center);
        ScreenPoint::new(
            c.x - self.size.width / 2.0,
            c.y - self.size.height / 2.0,
        )
    }
}

impl Projector for Viewport {
    fn project(&self, point: GeoPoint) -> ScreenPoint {
        let world = self.world_pixel(point);
        let origin = self.origin();
        ScreenPoint::new(world.x - origin.x, world.y - origin.y)
    }

    fn unproject(&self, point: ScreenPoint) -> GeoPoint {
        let origin = self.origin();
        self.unproject_world(ScreenPoint::new(point.x + origin.x, point.y + origin.y))
    }
}

impl DistanceMetric for Viewport {
    fn distance(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        HaversineDistance.distance(a, b)
    }
}
