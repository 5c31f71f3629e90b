//! Measurement sessions and the [`Measurable`] capability.
//!
//! A [`MeasurementSession`] tracks whether its shape is attached to a map
//! and whether labels are currently shown, and holds the last
//! [`MeasurementPlan`]. Every state-changing call returns a
//! [`LabelChange`] telling the host what to do with the labels it drew
//! last time.
//!
//! Geometry wrappers implement [`Measurable`] and get the lifecycle
//! callbacks for free; [`MeasuredShape`] is the stock wrapper.

use crate::config::MeasurementConfig;
use crate::plan::MeasurementPlanner;
use crate::projection::{MapView, Projector};
use crate::types::{GeoPoint, MeasureError, MeasurementPlan, ScreenPoint, Shape};

/// What the host must do with its previously drawn labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelChange {
    /// Nothing changed; keep the current labels.
    Unchanged,
    /// Remove every label; nothing replaces them.
    Cleared,
    /// Remove every label, then draw the session's current plan.
    Replaced,
}

/// Label state for one shape.
#[derive(Debug)]
pub struct MeasurementSession {
    config: MeasurementConfig,
    planner: MeasurementPlanner,
    auto_show: bool,
    attached: bool,
    visible: bool,
    plan: MeasurementPlan,
}

impl Default for MeasurementSession {
    fn default() -> Self {
        Self::new(MeasurementConfig::default())
    }
}

impl MeasurementSession {
    /// Create a detached, hidden session that shows its labels as soon as
    /// it is attached (unless `show_on_hover` is set).
    #[must_use]
    pub fn new(config: MeasurementConfig) -> Self {
        Self {
            config: config.sanitized(),
            planner: MeasurementPlanner::default(),
            auto_show: true,
            attached: false,
            visible: false,
            plan: MeasurementPlan::default(),
        }
    }

    /// Use a custom planner.
    #[must_use]
    pub fn with_planner(mut self, planner: MeasurementPlanner) -> Self {
        self.planner = planner;
        self
    }

    /// Whether attaching (or hovering, with `show_on_hover`) shows labels
    /// automatically. When off, only explicit [`Self::show`] calls do.
    #[must_use]
    pub const fn with_auto_show(mut self, auto_show: bool) -> Self {
        self.auto_show = auto_show;
        self
    }

    /// The session's configuration, already sanitized.
    #[must_use]
    pub const fn config(&self) -> &MeasurementConfig {
        &self.config
    }

    /// The labels the host should currently display. Empty while hidden.
    #[must_use]
    pub const fn current_plan(&self) -> &MeasurementPlan {
        &self.plan
    }

    /// Whether the shape is on a map.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether labels are shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show labels for `shape`.
    ///
    /// Does nothing unless the session is attached and currently hidden.
    pub fn show<V: MapView + ?Sized>(&mut self, shape: &Shape, view: &V) -> LabelChange {
        if !self.attached || self.visible {
            return LabelChange::Unchanged;
        }
        self.visible = true;
        self.replan(shape, view)
    }

    /// Release all labels.
    pub fn hide(&mut self) -> LabelChange {
        if !self.attached || !self.visible {
            return LabelChange::Unchanged;
        }
        self.visible = false;
        self.plan = MeasurementPlan::default();
        log::debug!("measurement labels hidden");
        LabelChange::Cleared
    }

    /// The shape was added to a map.
    pub fn on_attached<V: MapView + ?Sized>(&mut self, shape: &Shape, view: &V) -> LabelChange {
        self.attached = true;
        if self.auto_show && !self.config.show_on_hover {
            self.show(shape, view)
        } else {
            LabelChange::Unchanged
        }
    }

    /// The shape was removed from its map.
    pub fn on_detached(&mut self) -> LabelChange {
        let change = self.hide();
        self.attached = false;
        change
    }

    /// The shape's geometry was replaced or edited.
    pub fn on_geometry_changed<V: MapView + ?Sized>(
        &mut self,
        shape: &Shape,
        view: &V,
    ) -> LabelChange {
        self.refresh(shape, view)
    }

    /// A zoom finished; pixel distances and anchors must be recomputed.
    pub fn on_zoom_end<V: MapView + ?Sized>(&mut self, shape: &Shape, view: &V) -> LabelChange {
        self.refresh(shape, view)
    }

    /// The pointer moved onto the shape.
    pub fn on_pointer_enter<V: MapView + ?Sized>(
        &mut self,
        shape: &Shape,
        view: &V,
    ) -> LabelChange {
        if self.hover_driven() {
            self.show(shape, view)
        } else {
            LabelChange::Unchanged
        }
    }

    /// The pointer left the shape.
    pub fn on_pointer_leave(&mut self) -> LabelChange {
        if self.hover_driven() {
            self.hide()
        } else {
            LabelChange::Unchanged
        }
    }

    /// Screen positions of the current labels, then vertex markers, under
    /// an intermediate view of a running zoom animation.
    ///
    /// Only positions move during the animation; the labels themselves
    /// are recomputed on [`Self::on_zoom_end`].
    #[must_use]
    pub fn on_zoom_animation<P: Projector + ?Sized>(&self, view: &P) -> Vec<ScreenPoint> {
        self.plan.screen_positions(view)
    }

    /// Start over with a new configuration.
    ///
    /// Labels are hidden, the configuration swapped and, if they were
    /// visible before, shown again.
    pub fn replace_config<V: MapView + ?Sized>(
        &mut self,
        config: MeasurementConfig,
        shape: &Shape,
        view: &V,
    ) -> LabelChange {
        let was_visible = self.visible;
        let hidden = self.hide();
        self.config = config.sanitized();
        if was_visible {
            self.show(shape, view)
        } else {
            hidden
        }
    }

    const fn hover_driven(&self) -> bool {
        self.auto_show && self.config.show_on_hover
    }

    fn refresh<V: MapView + ?Sized>(&mut self, shape: &Shape, view: &V) -> LabelChange {
        if self.visible {
            self.replan(shape, view)
        } else {
            LabelChange::Unchanged
        }
    }

    fn replan<V: MapView + ?Sized>(&mut self, shape: &Shape, view: &V) -> LabelChange {
        self.plan = self.planner.plan(shape, &self.config, view, view);
        LabelChange::Replaced
    }
}

/// A geometry that carries measurement labels.
///
/// Implementors expose their shape and session; the lifecycle callbacks
/// are provided.
pub trait Measurable {
    /// Current geometry.
    fn geometry(&self) -> &Shape;

    /// The measurement session.
    fn session(&self) -> &MeasurementSession;

    /// Geometry and session borrowed together, so callbacks can plan the
    /// shape while updating the session.
    fn parts_mut(&mut self) -> (&Shape, &mut MeasurementSession);

    /// The measurement session, mutably.
    fn session_mut(&mut self) -> &mut MeasurementSession {
        self.parts_mut().1
    }

    /// Labels the host should currently display.
    fn measurements(&self) -> &MeasurementPlan {
        self.session().current_plan()
    }

    /// See [`MeasurementSession::show`].
    fn show_measurements<V: MapView + ?Sized>(&mut self, view: &V) -> LabelChange {
        let (shape, session) = self.parts_mut();
        session.show(shape, view)
    }

    /// See [`MeasurementSession::hide`].
    fn hide_measurements(&mut self) -> LabelChange {
        self.session_mut().hide()
    }

    /// See [`MeasurementSession::on_attached`].
    fn on_attached<V: MapView + ?Sized>(&mut self, view: &V) -> LabelChange {
        let (shape, session) = self.parts_mut();
        session.on_attached(shape, view)
    }

    /// See [`MeasurementSession::on_detached`].
    fn on_detached(&mut self) -> LabelChange {
        self.session_mut().on_detached()
    }

    /// See [`MeasurementSession::on_geometry_changed`].
    fn on_geometry_changed<V: MapView + ?Sized>(&mut self, view: &V) -> LabelChange {
        let (shape, session) = self.parts_mut();
        session.on_geometry_changed(shape, view)
    }

    /// See [`MeasurementSession::on_zoom_end`].
    fn on_zoom_end<V: MapView + ?Sized>(&mut self, view: &V) -> LabelChange {
        let (shape, session) = self.parts_mut();
        session.on_zoom_end(shape, view)
    }

    /// See [`MeasurementSession::on_pointer_enter`].
    fn on_pointer_enter<V: MapView + ?Sized>(&mut self, view: &V) -> LabelChange {
        let (shape, session) = self.parts_mut();
        session.on_pointer_enter(shape, view)
    }

    /// See [`MeasurementSession::on_pointer_leave`].
    fn on_pointer_leave(&mut self) -> LabelChange {
        self.session_mut().on_pointer_leave()
    }

    /// See [`MeasurementSession::on_zoom_animation`].
    fn on_zoom_animation<P: Projector + ?Sized>(&self, view: &P) -> Vec<ScreenPoint> {
        self.session().on_zoom_animation(view)
    }

    /// See [`MeasurementSession::replace_config`].
    fn replace_config<V: MapView + ?Sized>(
        &mut self,
        config: MeasurementConfig,
        view: &V,
    ) -> LabelChange {
        let (shape, session) = self.parts_mut();
        session.replace_config(config, shape, view)
    }
}

/// A [`Shape`] together with its measurement session.
#[derive(Debug)]
pub struct MeasuredShape {
    shape: Shape,
    session: MeasurementSession,
}

impl MeasuredShape {
    /// Wrap `shape` in a fresh, detached session.
    #[must_use]
    pub fn new(shape: Shape, config: MeasurementConfig) -> Self {
        Self::with_session(shape, MeasurementSession::new(config))
    }

    /// Wrap `shape` with an existing session.
    #[must_use]
    pub const fn with_session(shape: Shape, session: MeasurementSession) -> Self {
        Self { shape, session }
    }

    /// Replace all vertices of a path or polygon.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::ShapeMismatch`] for circles.
    pub fn set_vertices<V: MapView + ?Sized>(
        &mut self,
        vertices: Vec<GeoPoint>,
        view: &V,
    ) -> Result<LabelChange, MeasureError> {
        *self.vertices_mut("set_vertices")? = vertices;
        Ok(self.on_geometry_changed(view))
    }

    /// Remove `remove` vertices starting at `start` and insert `insert` in
    /// their place.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::ShapeMismatch`] for circles and
    /// [`MeasureError::SpliceOutOfRange`] when the removed range does not
    /// fit inside the current vertices.
    pub fn splice_vertices<V, I>(
        &mut self,
        start: usize,
        remove: usize,
        insert: I,
        view: &V,
    ) -> Result<LabelChange, MeasureError>
    where
        V: MapView + ?Sized,
        I: IntoIterator<Item = GeoPoint>,
    {
        let vertices = self.vertices_mut("splice_vertices")?;
        let len = vertices.len();
        let end = start
            .checked_add(remove)
            .filter(|&end| end <= len)
            .ok_or(MeasureError::SpliceOutOfRange { start, remove, len })?;
        drop(vertices.splice(start..end, insert));
        Ok(self.on_geometry_changed(view))
    }

    /// Move a circle's center.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::ShapeMismatch`] for paths and polygons.
    pub fn set_center<V: MapView + ?Sized>(
        &mut self,
        center: GeoPoint,
        view: &V,
    ) -> Result<LabelChange, MeasureError> {
        match &mut self.shape {
            Shape::Circle { center: c, .. } => *c = center,
            other => return Err(mismatch("set_center", other)),
        }
        Ok(self.on_geometry_changed(view))
    }

    /// Change a circle's radius in meters.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::ShapeMismatch`] for paths and polygons.
    pub fn set_radius<V: MapView + ?Sized>(
        &mut self,
        radius: f64,
        view: &V,
    ) -> Result<LabelChange, MeasureError> {
        match &mut self.shape {
            Shape::Circle { radius: r, .. } => *r = radius,
            other => return Err(mismatch("set_radius", other)),
        }
        Ok(self.on_geometry_changed(view))
    }

    /// Unwrap into the shape and its session.
    #[must_use]
    pub fn into_parts(self) -> (Shape, MeasurementSession) {
        (self.shape, self.session)
    }

    fn vertices_mut(&mut self, operation: &'static str) -> Result<&mut Vec<GeoPoint>, MeasureError> {
        match &mut self.shape {
            Shape::Path { vertices } | Shape::Polygon { vertices } => Ok(vertices),
            other @ Shape::Circle { .. } => Err(mismatch(operation, other)),
        }
    }
}

fn mismatch(operation: &'static str, shape: &Shape) -> MeasureError {
    MeasureError::ShapeMismatch {
        operation,
        shape: shape.kind_name(),
    }
}

impl Measurable for MeasuredShape {
    fn geometry(&self) -> &Shape {
        &self.shape
    }

    fn session(&self) -> &MeasurementSession {
        &self.session
    }

    fn parts_mut(&mut self) -> (&Shape, &mut MeasurementSession) {
        (&self.shape, &mut self.session)
    }
}
