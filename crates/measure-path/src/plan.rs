//! Turn a shape into the labels a host should draw.
//!
//! The planner is the single entry point for rendering layers. It is a
//! pure function of the shape, the configuration and the current view:
//!
//! 1. Build raw segments (closed ring for polygons).
//! 2. Merge nearly-collinear neighbours.
//! 3. Label each merged segment that is long enough on screen.
//! 4. Append the total length (paths) or the area (polygons, circles).

use std::f64::consts::FRAC_PI_2;
use std::fmt;

use geo::{BoundingRect, LineString};

use crate::area::SphericalEarth;
use crate::config::MeasurementConfig;
use crate::format::{LabelFormatter, UnitFormatter};
use crate::merge::merge_segments;
use crate::projection::{DistanceMetric, Projector};
use crate::segment::{RawSegment, build_segments};
use crate::types::{GeoPoint, LabelKind, MeasurementLabel, MeasurementPlan, Shape};

/// Counts gathered while planning, reported through
/// [`crate::diagnostics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanCounts {
    /// Vertices in the input shape.
    pub vertices: usize,
    /// Segments before merging.
    pub raw_segments: usize,
    /// Segments after merging.
    pub merged_segments: usize,
    /// Whether the first segment of a ring was folded into the last.
    pub seam_merged: bool,
    /// Segment labels suppressed for being too short on screen.
    pub hidden_labels: usize,
    /// Segment labels shown despite being too short on screen.
    pub flagged_labels: usize,
}

/// Produces [`MeasurementPlan`]s.
///
/// Holds the pieces that rarely change between sessions: the formatter and
/// the Earth model. The default uses [`UnitFormatter`] on the WGS84 sphere.
pub struct MeasurementPlanner {
    formatter: Box<dyn LabelFormatter + Send + Sync>,
    earth: SphericalEarth,
}

impl fmt::Debug for MeasurementPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementPlanner")
            .field("earth", &self.earth)
            .finish_non_exhaustive()
    }
}

impl Default for MeasurementPlanner {
    fn default() -> Self {
        Self::new(UnitFormatter, SphericalEarth::default())
    }
}

impl MeasurementPlanner {
    /// Create a planner with a custom formatter and Earth model.
    #[must_use]
    pub fn new<F>(formatter: F, earth: SphericalEarth) -> Self
    where
        F: LabelFormatter + Send + Sync + 'static,
    {
        Self {
            formatter: Box::new(formatter),
            earth,
        }
    }

    /// Replace the formatter.
    #[must_use]
    pub fn with_formatter<F>(self, formatter: F) -> Self
    where
        F: LabelFormatter + Send + Sync + 'static,
    {
        Self {
            formatter: Box::new(formatter),
            ..self
        }
    }

    /// Replace the Earth model used for areas.
    #[must_use]
    pub fn with_earth(mut self, earth: SphericalEarth) -> Self {
        self.earth = earth;
        self
    }

    /// The Earth model used for areas.
    #[must_use]
    pub const fn earth(&self) -> SphericalEarth {
        self.earth
    }

    /// Plan the labels for `shape` under the current view.
    ///
    /// Output order is fixed: segment labels in path order, then the total
    /// length label, then the area label. Identical inputs give identical
    /// output.
    #[must_use]
    pub fn plan<P, D>(
        &self,
        shape: &Shape,
        config: &MeasurementConfig,
        projector: &P,
        metric: &D,
    ) -> MeasurementPlan
    where
        P: Projector + ?Sized,
        D: DistanceMetric + ?Sized,
    {
        self.plan_counted(shape, config, projector, metric).0
    }

    /// [`Self::plan`], also returning the counts gathered on the way.
    pub(crate) fn plan_counted<P, D>(
        &self,
        shape: &Shape,
        config: &MeasurementConfig,
        projector: &P,
        metric: &D,
    ) -> (MeasurementPlan, PlanCounts)
    where
        P: Projector + ?Sized,
        D: DistanceMetric + ?Sized,
    {
        let config = config.sanitized();
        let mut plan = MeasurementPlan::default();
        let mut counts = PlanCounts::default();

        match shape {
            Shape::Circle { center, radius } => {
                if config.show_area {
                    let area = self.earth.circle_area(*radius);
                    plan.labels.push(MeasurementLabel {
                        anchor: *center,
                        text: self.formatter.format_area(area, config.units),
                        title: config.lang.total_area.clone(),
                        rotation: 0.0,
                        kind: LabelKind::TotalArea,
                        below_min_distance: false,
                    });
                }
            }
            Shape::Path { vertices } | Shape::Polygon { vertices } => {
                let closed = shape.is_closed();
                counts.vertices = vertices.len();

                let raw = build_segments(vertices, closed, metric);
                counts.raw_segments = raw.len();
                let (merged, seam_merged) = merge_segments(raw, config.angle_tolerance, closed);
                counts.seam_merged = seam_merged;
                counts.merged_segments = merged.len();

                if config.show_distances && vertices.len() > 1 {
                    self.label_segments(&merged, &config, projector, &mut plan, &mut counts);

                    if !closed && let Some(&last) = vertices.last() {
                        let total: f64 = merged.iter().map(|s| s.distance).sum();
                        plan.labels.push(MeasurementLabel {
                            anchor: last,
                            text: self.formatter.format_distance(total, config.units),
                            title: config.lang.total_length.clone(),
                            rotation: 0.0,
                            kind: LabelKind::TotalLength,
                            below_min_distance: false,
                        });
                    }
                }

                if closed
                    && config.show_area
                    && vertices.len() > 2
                    && let Some(center) = bounds_center(vertices)
                {
                    let area = self.earth.ring_area(vertices);
                    plan.labels.push(MeasurementLabel {
                        anchor: center,
                        text: self.formatter.format_area(area, config.units),
                        title: config.lang.total_area.clone(),
                        rotation: 0.0,
                        kind: LabelKind::TotalArea,
                        below_min_distance: false,
                    });
                }
            }
        }

        log::debug!(
            "planned {} labels and {} vertex markers for {} ({} raw, {} merged segments)",
            plan.labels.len(),
            plan.vertices.len(),
            shape.kind_name(),
            counts.raw_segments,
            counts.merged_segments,
        );

        (plan, counts)
    }

    /// Push one label (and optional vertex markers) per merged segment
    /// that passes the pixel-distance filter.
    fn label_segments<P: Projector + ?Sized>(
        &self,
        segments: &[RawSegment],
        config: &MeasurementConfig,
        projector: &P,
        plan: &mut MeasurementPlan,
        counts: &mut PlanCounts,
    ) {
        for segment in segments {
            let p1 = projector.project(segment.start);
            let p2 = projector.project(segment.end);
            // Hosts place labels on whole pixels; the filter and the anchor
            // see the same snapped points. Rotation keeps the exact ones.
            let pixel_distance = p1.round().distance(p2.round());
            let below_min = pixel_distance < config.min_pixel_distance;

            if below_min && !config.show_on_min_pixel_distance {
                counts.hidden_labels += 1;
                continue;
            }
            if below_min {
                counts.flagged_labels += 1;
            }

            let anchor = projector.unproject(projector.project(segment.midpoint).round());
            plan.labels.push(MeasurementLabel {
                anchor,
                text: self.formatter.format_distance(segment.distance, config.units),
                title: config.lang.segment_length.clone(),
                rotation: screen_rotation(p2.x - p1.x, p2.y - p1.y),
                kind: LabelKind::Segment,
                below_min_distance: below_min,
            });

            if config.show_vertices {
                plan.vertices.push(segment.start);
                plan.vertices.push(segment.end);
            }
        }
    }
}

/// Rotation in radians that aligns text with a screen-space direction.
///
/// Text is never upside down: the result lies in `[-π/2, π/2]`. A
/// vertical segment gives `π/2`; a zero-length one gives `0`.
#[must_use]
pub fn screen_rotation(dx: f64, dy: f64) -> f64 {
    if dx.abs() < f64::EPSILON {
        if dy.abs() < f64::EPSILON { 0.0 } else { FRAC_PI_2 }
    } else {
        (dy / dx).atan()
    }
}

/// Center of the bounding box of `vertices`, computed fresh each time.
fn bounds_center(vertices: &[GeoPoint]) -> Option<GeoPoint> {
    let line: LineString<f64> = vertices.iter().map(|p| geo::Coord::from(*p)).collect();
    line.bounding_rect().map(|rect| GeoPoint::from(rect.center()))
}

/// Plan with the default planner.
///
/// See [`MeasurementPlanner::plan`].
#[must_use]
pub fn plan<P, D>(
    shape: &Shape,
    config: &MeasurementConfig,
    projector: &P,
    metric: &D,
) -> MeasurementPlan
where
    P: Projector + ?Sized,
    D: DistanceMetric + ?Sized,
{
    MeasurementPlanner::default().plan(shape, config, projector, metric)
}
