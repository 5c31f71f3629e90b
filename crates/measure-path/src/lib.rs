//! measure-path: Pure measurement-label planner for map shapes (sans-IO).
//!
//! Turns paths, polygons and circles into the length and area labels a
//! map should draw on top of them:
//! segments -> collinear merging -> pixel-distance filtering ->
//! formatting -> totals and area.
//!
//! This crate has **no I/O dependencies** -- projection and distance come
//! from the host through the [`Projector`] and [`DistanceMetric`] traits,
//! and the output is plain data. Rendering, event wiring and timing live
//! with the caller.

pub mod area;
pub mod config;
pub mod diagnostics;
pub mod format;
pub mod merge;
pub mod plan;
pub mod projection;
pub mod scene;
pub mod segment;
pub mod session;
pub mod types;

pub use area::SphericalEarth;
pub use config::{LabelText, MeasurementConfig, UnitSystem};
pub use diagnostics::{Clock, PlanDiagnostics, plan_with_diagnostics};
pub use format::{LabelFormatter, UnitFormatter};
pub use plan::{MeasurementPlanner, plan};
pub use projection::{DistanceMetric, HaversineDistance, MapView, Projector, ViewSize, Viewport};
pub use scene::Scene;
pub use segment::RawSegment;
pub use session::{LabelChange, Measurable, MeasuredShape, MeasurementSession};
pub use types::{
    GeoPoint, LabelKind, MeasureError, MeasurementLabel, MeasurementPlan, ScreenPoint, Shape,
};
