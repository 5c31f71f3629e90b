//! Raw segments between consecutive vertices.

use crate::projection::DistanceMetric;
use crate::types::GeoPoint;

/// One or more consecutive path segments treated as a single display
/// segment.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSegment {
    /// First vertex.
    pub start: GeoPoint,
    /// Last vertex.
    pub end: GeoPoint,
    /// Ground distance in meters (sum over merged pieces).
    pub distance: f64,
    /// Label position: the arithmetic midpoint for a single piece, a
    /// distance-weighted mean of piece midpoints after merging.
    pub midpoint: GeoPoint,
    /// Planar direction `atan2(Δlat, Δlng)` in degrees, in `(-180, 180]`.
    ///
    /// Only meaningful for collinearity tests. `None` when the endpoints
    /// coincide; such segments never merge.
    pub bearing: Option<f64>,
    /// How many original segments this one represents.
    pub merged: usize,
}

impl RawSegment {
    /// Build the segment from `start` to `end`.
    #[must_use]
    pub fn new<D: DistanceMetric + ?Sized>(start: GeoPoint, end: GeoPoint, metric: &D) -> Self {
        Self {
            start,
            end,
            distance: metric.distance(start, end),
            midpoint: start.midpoint(end),
            bearing: bearing(start, end),
            merged: 1,
        }
    }

    /// Absorb the following segment `next`.
    ///
    /// The endpoint moves to `next.end`, distances add up, the midpoint
    /// becomes the distance-weighted mean and the bearing is taken from
    /// `next`, so later comparisons chain from the newest piece.
    pub fn absorb(&mut self, next: Self) {
        let total = self.distance + next.distance;
        self.midpoint = if total > 0.0 {
            GeoPoint::new(
                self.midpoint
                    .lat
                    .mul_add(self.distance, next.midpoint.lat * next.distance)
                    / total,
                self.midpoint
                    .lng
                    .mul_add(self.distance, next.midpoint.lng * next.distance)
                    / total,
            )
        } else {
            self.midpoint.midpoint(next.midpoint)
        };
        self.end = next.end;
        self.distance = total;
        self.bearing = next.bearing;
        self.merged += next.merged;
    }
}

/// Planar direction from `start` to `end` in degrees, or `None` for a
/// zero-length segment.
///
/// No latitude scaling is applied; the value only serves to compare
/// neighbouring segments.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn bearing(start: GeoPoint, end: GeoPoint) -> Option<f64> {
    let dlat = end.lat - start.lat;
    let dlng = end.lng - start.lng;
    if dlat == 0.0 && dlng == 0.0 {
        return None;
    }
    Some(dlat.atan2(dlng).to_degrees())
}

/// Build one segment per consecutive vertex pair.
///
/// An open path of N vertices yields N−1 segments. A closed ring yields
/// N, the last joining vertex N−1 back to vertex 0. Fewer than two
/// vertices yield nothing.
#[must_use]
pub fn build_segments<D: DistanceMetric + ?Sized>(
    vertices: &[GeoPoint],
    closed: bool,
    metric: &D,
) -> Vec<RawSegment> {
    let n = vertices.len();
    if n < 2 {
        return Vec::new();
    }
    let count = if closed { n } else { n - 1 };
    (0..count)
        .map(|i| RawSegment::new(vertices[i], vertices[(i + 1) % n], metric))
        .collect()
}
