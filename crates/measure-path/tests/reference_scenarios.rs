//! End-to-end scenarios on a Web-Mercator view of Gothenburg at zoom 12,
//! driven through the session layer the way a map host would.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use measure_path::{
    GeoPoint, LabelChange, LabelKind, Measurable, MeasuredShape, MeasurementConfig,
    MeasurementSession, ScreenPoint, Shape, Viewport,
};

/// 100 px tall like the reference map container. The width puts the
/// container center at x = 721.
fn view() -> Viewport {
    Viewport::new(GeoPoint::new(57.7, 11.9), 12.0, 1442.0, 100.0)
}

fn triangle() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(57.69, 11.89),
        GeoPoint::new(57.697, 11.88),
        GeoPoint::new(57.71, 11.89),
    ]
}

fn pentagon() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(57.69, 11.89),
        GeoPoint::new(57.697, 11.88),
        GeoPoint::new(57.71, 11.89),
        GeoPoint::new(57.71, 11.91),
        GeoPoint::new(57.69, 11.91),
    ]
}

fn every_label() -> MeasurementConfig {
    MeasurementConfig {
        min_pixel_distance: 0.0,
        ..MeasurementConfig::default()
    }
}

fn attached(shape: Shape, config: MeasurementConfig) -> MeasuredShape {
    let mut measured = MeasuredShape::new(shape, config);
    measured.on_attached(&view());
    measured
}

fn label_count(shape: &MeasuredShape) -> usize {
    shape.measurements().labels.len()
}

// --- Polygons ---

#[test]
fn polygon_gets_segment_and_area_labels() {
    let polygon = attached(Shape::Polygon { vertices: triangle() }, every_label());
    let kinds: Vec<LabelKind> = polygon.measurements().labels.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LabelKind::Segment,
            LabelKind::Segment,
            LabelKind::Segment,
            LabelKind::TotalArea,
        ]
    );
}

#[test]
fn detaching_removes_labels() {
    let mut polygon = attached(Shape::Polygon { vertices: triangle() }, every_label());
    assert_eq!(label_count(&polygon), 4);
    assert_eq!(polygon.on_detached(), LabelChange::Cleared);
    assert_eq!(label_count(&polygon), 0);
}

#[test]
fn hover_mode_waits_for_pointer() {
    let config = MeasurementConfig {
        show_on_hover: true,
        ..every_label()
    };
    let mut polygon = attached(Shape::Polygon { vertices: triangle() }, config);
    assert_eq!(label_count(&polygon), 0);

    polygon.on_pointer_enter(&view());
    assert_eq!(label_count(&polygon), 4);

    polygon.on_pointer_leave();
    assert_eq!(label_count(&polygon), 0);
}

#[test]
fn short_segments_are_flagged_when_forced() {
    let config = MeasurementConfig {
        min_pixel_distance: 100.0,
        show_on_min_pixel_distance: true,
        ..MeasurementConfig::default()
    };
    let polygon = attached(Shape::Polygon { vertices: triangle() }, config);
    let labels = &polygon.measurements().labels;
    assert_eq!(labels.len(), 4);
    assert_eq!(labels.iter().filter(|l| l.below_min_distance).count(), 2);
}

#[test]
fn short_segments_are_hidden_by_default() {
    let config = MeasurementConfig {
        min_pixel_distance: 100.0,
        ..MeasurementConfig::default()
    };
    let polygon = attached(Shape::Polygon { vertices: triangle() }, config);
    let labels = &polygon.measurements().labels;
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0].kind, LabelKind::Segment);
    assert_eq!(labels[0].text, "2.2 km");
}

#[test]
fn vertex_markers_for_each_segment_end() {
    let config = MeasurementConfig {
        show_vertices: true,
        ..every_label()
    };
    let polygon = attached(Shape::Polygon { vertices: triangle() }, config);
    assert_eq!(polygon.measurements().vertices.len(), 6);
}

#[test]
fn angle_tolerance_merges_bends() {
    let config = MeasurementConfig {
        angle_tolerance: 60.0,
        ..every_label()
    };
    let polygon = attached(Shape::Polygon { vertices: pentagon() }, config);
    assert_eq!(label_count(&polygon), 4);
}

#[test]
fn replaced_geometry_is_measured_from_current_vertices() {
    let mut polygon = attached(Shape::Polygon { vertices: triangle() }, every_label());
    let change = polygon.set_vertices(pentagon(), &view()).unwrap();
    assert_eq!(change, LabelChange::Replaced);

    let plan = polygon.measurements();
    assert_eq!(plan.labels.len(), 6);
    let area = plan.labels.last().unwrap();
    assert_eq!(area.kind, LabelKind::TotalArea);
    assert!(area.rotation.abs() < f64::EPSILON);

    let positions = plan.screen_positions(&view());
    assert_eq!(positions[5], ScreenPoint::new(706.0, 50.0));
}

#[test]
fn area_label_sits_at_bounds_center() {
    let polygon = attached(Shape::Polygon { vertices: pentagon() }, every_label());
    let area = polygon.measurements().labels.last().unwrap();
    assert!((area.anchor.lat - 57.70).abs() < 1e-12);
    assert!((area.anchor.lng - 11.895).abs() < 1e-12);
}

// --- Paths ---

#[test]
fn path_gets_segment_and_total_labels() {
    let path = attached(Shape::Path { vertices: triangle() }, every_label());
    let labels = &path.measurements().labels;
    assert_eq!(labels.len(), 3);
    let total = labels.last().unwrap();
    assert_eq!(total.kind, LabelKind::TotalLength);
    assert_eq!(total.title, "Total length");
    assert_eq!(total.anchor, GeoPoint::new(57.71, 11.89));
}

#[test]
fn segment_labels_follow_screen_direction() {
    let path = attached(
        Shape::Path {
            vertices: vec![GeoPoint::new(57.70, 11.88), GeoPoint::new(57.70, 11.92)],
        },
        every_label(),
    );
    let segment = &path.measurements().labels[0];
    assert!(segment.rotation.abs() < 1e-9);

    let path = attached(
        Shape::Path {
            vertices: vec![GeoPoint::new(57.69, 11.9), GeoPoint::new(57.71, 11.9)],
        },
        every_label(),
    );
    let segment = &path.measurements().labels[0];
    assert!((segment.rotation - std::f64::consts::FRAC_PI_2).abs() < f64::EPSILON);
}

#[test]
fn zooming_in_reveals_short_segments() {
    let config = MeasurementConfig {
        min_pixel_distance: 100.0,
        ..MeasurementConfig::default()
    };
    let mut polygon = attached(Shape::Polygon { vertices: triangle() }, config);
    assert_eq!(label_count(&polygon), 2);

    let zoomed = view().with_view(GeoPoint::new(57.7, 11.9), 14.0);
    assert_eq!(polygon.on_zoom_end(&zoomed), LabelChange::Replaced);
    assert_eq!(label_count(&polygon), 4);
}

#[test]
fn zoom_animation_scales_positions_about_the_center() {
    let polygon = attached(Shape::Polygon { vertices: triangle() }, every_label());
    let at_12 = polygon.on_zoom_animation(&view());
    let at_13 = polygon.on_zoom_animation(&view().with_view(GeoPoint::new(57.7, 11.9), 13.0));
    assert_eq!(at_12.len(), at_13.len());

    // Offsets from the container center double, up to rounding.
    for (a, b) in at_12.iter().zip(&at_13) {
        let (ax, ay) = (a.x - 721.0, a.y - 50.0);
        let (bx, by) = (b.x - 721.0, b.y - 50.0);
        assert!((bx - 2.0 * ax).abs() <= 2.0, "{a:?} -> {b:?}");
        assert!((by - 2.0 * ay).abs() <= 2.0, "{a:?} -> {b:?}");
    }
}

// --- Circles ---

#[test]
fn circle_gets_area_label() {
    let circle = attached(
        Shape::Circle {
            center: GeoPoint::new(57.69, 11.89),
            radius: 200.0,
        },
        every_label(),
    );
    let labels = &circle.measurements().labels;
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].kind, LabelKind::TotalArea);
    assert_eq!(labels[0].anchor, GeoPoint::new(57.69, 11.89));
}

#[test]
fn circle_hover_mode() {
    let config = MeasurementConfig {
        show_on_hover: true,
        ..every_label()
    };
    let mut circle = attached(
        Shape::Circle {
            center: GeoPoint::new(57.69, 11.89),
            radius: 200.0,
        },
        config,
    );
    assert_eq!(label_count(&circle), 0);
    circle.on_pointer_enter(&view());
    assert_eq!(label_count(&circle), 1);
    circle.on_pointer_leave();
    assert_eq!(label_count(&circle), 0);
}

#[test]
fn circle_edits_without_measurements() {
    let session = MeasurementSession::new(every_label()).with_auto_show(false);
    let mut circle = MeasuredShape::with_session(
        Shape::Circle {
            center: GeoPoint::new(57.69, 11.89),
            radius: 200.0,
        },
        session,
    );
    circle.on_attached(&view());
    circle.set_center(GeoPoint::new(57.69, 11.91), &view()).unwrap();
    circle.set_radius(300.0, &view()).unwrap();
    assert_eq!(
        circle.geometry(),
        &Shape::Circle {
            center: GeoPoint::new(57.69, 11.91),
            radius: 300.0,
        }
    );
    assert_eq!(label_count(&circle), 0);
}

// --- Configuration ---

#[test]
fn configuration_from_json() {
    let config = MeasurementConfig::from_json(
        r#"{ "min_pixel_distance": 0, "units": "imperial",
             "lang": { "total_area": "Area" } }"#,
    )
    .unwrap();
    let polygon = attached(Shape::Polygon { vertices: triangle() }, config);
    let area = polygon.measurements().labels.last().unwrap();
    assert_eq!(area.title, "Area");
    assert!(area.text.ends_with(" ac"), "{}", area.text);
    assert_eq!(polygon.measurements().labels[0].title, "Segment length");
}

#[test]
fn scene_shapes_deserialize() {
    let shape: Shape = serde_json::from_str(
        r#"{ "type": "polygon", "vertices": [
               { "lat": 57.69, "lng": 11.89 },
               { "lat": 57.697, "lng": 11.88 },
               { "lat": 57.71, "lng": 11.89 } ] }"#,
    )
    .unwrap();
    assert_eq!(shape, Shape::Polygon { vertices: triangle() });
}
