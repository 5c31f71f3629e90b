//! Planning diagnostics: counts and timing for a single plan.
//!
//! Duration measurements use [`std::time::Duration`]. Timestamps come from
//! a caller-supplied [`Clock`], so the library itself never touches
//! platform time.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::MeasurementConfig;
use crate::plan::{MeasurementPlanner, PlanCounts};
use crate::projection::MapView;
use crate::types::{LabelKind, MeasurementPlan, Shape};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// A monotonic time source.
pub trait Clock {
    /// Opaque point in time.
    type Instant;

    /// The current instant.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Diagnostics collected from a single plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDiagnostics {
    /// `"path"`, `"polygon"` or `"circle"`.
    pub shape: String,
    /// Vertices in the input shape (0 for circles).
    pub vertex_count: usize,
    /// Segments before merging.
    pub raw_segment_count: usize,
    /// Segments after merging.
    pub merged_segment_count: usize,
    /// Whether the first ring segment was folded into the last.
    pub seam_merged: bool,
    /// Labels of every kind in the plan.
    pub labels_emitted: usize,
    /// Segment labels in the plan.
    pub segment_labels: usize,
    /// Segment labels suppressed under the minimum pixel distance.
    pub labels_hidden: usize,
    /// Segment labels shown but flagged as below the minimum distance.
    pub labels_flagged: usize,
    /// Plain vertex markers in the plan.
    pub vertex_markers: usize,
    /// Wall-clock planning time (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

impl PlanDiagnostics {
    fn new(shape: &Shape, plan: &MeasurementPlan, counts: PlanCounts, duration: Duration) -> Self {
        Self {
            shape: shape.kind_name().to_owned(),
            vertex_count: counts.vertices,
            raw_segment_count: counts.raw_segments,
            merged_segment_count: counts.merged_segments,
            seam_merged: counts.seam_merged,
            labels_emitted: plan.labels.len(),
            segment_labels: plan
                .labels
                .iter()
                .filter(|l| l.kind == LabelKind::Segment)
                .count(),
            labels_hidden: counts.hidden_labels,
            labels_flagged: counts.flagged_labels,
            vertex_markers: plan.vertices.len(),
            duration,
        }
    }

    /// Segments absorbed by merging.
    #[must_use]
    pub const fn segments_absorbed(&self) -> usize {
        self.raw_segment_count.saturating_sub(self.merged_segment_count)
    }

    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Plan Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Shape: {} ({} vertices)",
            self.shape, self.vertex_count,
        ));
        lines.push(format!("Duration: {:.3}ms", duration_ms(self.duration)));
        lines.push(String::new());

        lines.push(format!(
            "Segments: {} raw -> {} merged ({} absorbed{})",
            self.raw_segment_count,
            self.merged_segment_count,
            self.segments_absorbed(),
            if self.seam_merged { ", seam folded" } else { "" },
        ));
        lines.push(format!(
            "Labels: {} emitted ({} segment), {} hidden, {} flagged",
            self.labels_emitted, self.segment_labels, self.labels_hidden, self.labels_flagged,
        ));
        if self.vertex_markers > 0 {
            lines.push(format!("Vertex markers: {}", self.vertex_markers));
        }

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Plan `shape` and collect diagnostics on the way.
///
/// The plan is identical to [`MeasurementPlanner::plan`] with `view` as
/// both projector and distance metric.
pub fn plan_with_diagnostics<V, C>(
    planner: &MeasurementPlanner,
    shape: &Shape,
    config: &MeasurementConfig,
    view: &V,
    clock: &C,
) -> (MeasurementPlan, PlanDiagnostics)
where
    V: MapView + ?Sized,
    C: Clock + ?Sized,
{
    let start = clock.now();
    let (plan, counts) = planner.plan_counted(shape, config, view, view);
    let duration = clock.elapsed(&start);
    let diagnostics = PlanDiagnostics::new(shape, &plan, counts, duration);
    (plan, diagnostics)
}
