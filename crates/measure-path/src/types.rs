//! Shared types for the measurement planner.

use serde::{Deserialize, Serialize};

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lng: f64,
}

impl GeoPoint {
    /// Create a new point.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Arithmetic mean of two positions.
    ///
    /// Not a geodesic midpoint; good enough for placing a label between
    /// two nearby vertices.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new(
            f64::midpoint(self.lat, other.lat),
            f64::midpoint(self.lng, other.lng),
        )
    }
}

impl From<GeoPoint> for geo::Coord<f64> {
    fn from(p: GeoPoint) -> Self {
        Self { x: p.lng, y: p.lat }
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Self::new(p.lng, p.lat)
    }
}

impl From<geo::Coord<f64>> for GeoPoint {
    fn from(c: geo::Coord<f64>) -> Self {
        Self::new(c.y, c.x)
    }
}

/// A position on screen in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl ScreenPoint {
    /// Create a new screen point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point in pixels.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }

    /// Round both coordinates to whole pixels.
    #[must_use]
    pub fn round(self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }
}

/// Geometry the planner knows how to measure.
///
/// Polygon vertices describe the outer ring only and must not repeat the
/// first vertex at the end; the ring is closed implicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// An open polyline.
    Path {
        /// Vertices in drawing order.
        vertices: Vec<GeoPoint>,
    },
    /// A closed ring.
    Polygon {
        /// Ring vertices in drawing order.
        vertices: Vec<GeoPoint>,
    },
    /// A circle on the ground.
    Circle {
        /// Center of the circle.
        center: GeoPoint,
        /// Radius in meters.
        radius: f64,
    },
}

impl Shape {
    /// Vertices of a path or polygon, or an empty slice for a circle.
    #[must_use]
    pub fn vertices(&self) -> &[GeoPoint] {
        match self {
            Self::Path { vertices } | Self::Polygon { vertices } => vertices,
            Self::Circle { .. } => &[],
        }
    }

    /// Whether the vertices form a closed ring.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Polygon { .. })
    }

    /// Short lowercase name used in logs and reports.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Path { .. } => "path",
            Self::Polygon { .. } => "polygon",
            Self::Circle { .. } => "circle",
        }
    }
}

/// What a measurement label reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    /// Length of one (possibly merged) segment.
    Segment,
    /// Running total length at the end of an open path.
    TotalLength,
    /// Enclosed area of a polygon or circle.
    TotalArea,
}

/// A positioned, rotated text label.
///
/// Labels carry no identity across updates; a new plan replaces the
/// previous one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementLabel {
    /// Geographic anchor of the label's center.
    pub anchor: GeoPoint,
    /// Formatted measurement, e.g. `"1.2 km"`.
    pub text: String,
    /// Tooltip text, e.g. `"Segment length"`.
    pub title: String,
    /// Clockwise screen rotation in radians.
    pub rotation: f64,
    /// What the label reports.
    pub kind: LabelKind,
    /// The segment is shorter on screen than the configured minimum pixel
    /// distance but was shown anyway. Hosts typically offset such labels.
    pub below_min_distance: bool,
}

/// Output of one planning pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPlan {
    /// Labels in segment order, then the total length, then the area.
    pub labels: Vec<MeasurementLabel>,
    /// Plain vertex markers (position only), two per shown segment.
    pub vertices: Vec<GeoPoint>,
}

impl MeasurementPlan {
    /// Returns `true` if there is nothing to render.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.vertices.is_empty()
    }

    /// Screen positions of every label, then every vertex marker, under
    /// `projector`, rounded to whole pixels.
    ///
    /// Used to reposition existing markers while a zoom animation runs,
    /// without planning again.
    #[must_use]
    pub fn screen_positions<P: crate::Projector + ?Sized>(
        &self,
        projector: &P,
    ) -> Vec<ScreenPoint> {
        self.labels
            .iter()
            .map(|label| label.anchor)
            .chain(self.vertices.iter().copied())
            .map(|point| projector.project(point).round())
            .collect()
    }
}

/// Errors raised by configuration parsing and shape editing.
///
/// Planning itself never fails; degenerate geometry yields fewer labels.
#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    /// A configuration document could not be parsed.
    #[error("invalid measurement configuration: {0}")]
    InvalidConfig(String),

    /// A vertex edit was applied to a circle, or a circle edit to a
    /// path or polygon.
    #[error("cannot apply {operation} to a {shape}")]
    ShapeMismatch {
        /// The attempted edit.
        operation: &'static str,
        /// The kind of shape it was applied to.
        shape: &'static str,
    },

    /// A splice range does not fit the current vertex list.
    #[error("splice at {start} removing {remove} exceeds {len} vertices")]
    SpliceOutOfRange {
        /// First index to replace.
        start: usize,
        /// Number of vertices to remove.
        remove: usize,
        /// Current vertex count.
        len: usize,
    },

    /// A scene document could not be parsed.
    #[error("invalid scene: {0}")]
    InvalidScene(String),
}
