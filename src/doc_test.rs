#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn id(s: &str) -> ShapeId {
    ShapeId::from(s)
}

// =============================================================
// ShapeId
// =============================================================

#[test]
fn shape_id_accepts_strings_and_numbers() {
    let ids: Vec<ShapeId> = serde_json::from_value(json!(["a", 7, 7.5])).unwrap();
    assert_eq!(ids, vec![id("a"), id("7"), id("7.5")]);
}

#[test]
fn shape_id_serializes_as_string() {
    assert_eq!(serde_json::to_value(id("x1")).unwrap(), json!("x1"));
}

// =============================================================
// Shape decoding
// =============================================================

#[test]
fn decode_full_circle() {
    let shape: Shape = serde_json::from_value(json!({
        "id": "A", "type": "circle", "x": 1, "y": 2, "r": 3,
        "label": "Silo 1", "fill": "#fff", "strokeWidth": 2, "className": "Silo",
    }))
    .unwrap();
    assert_eq!(shape.kind, ShapeKind::Circle);
    assert_eq!(shape.r, Some(3.0));
    assert_eq!(shape.label.as_deref(), Some("Silo 1"));
    assert_eq!(shape.stroke_width, Some(2.0));
    assert_eq!(shape.class_name, ShapeClass::Silo);
    assert!(!shape.selected);
    assert!(shape.show_label);
}

#[test]
fn decode_rectangle_alias() {
    let shape: Shape =
        serde_json::from_value(json!({"id": 1, "type": "rectangle", "x": 0, "y": 0, "w": 4, "h": 5})).unwrap();
    assert_eq!(shape.kind, ShapeKind::Rect);
    assert_eq!(shape.id, id("1"));
}

#[test]
fn decode_unknown_class_is_generic() {
    let shape: Shape =
        serde_json::from_value(json!({"id": "a", "type": "circle", "x": 0, "y": 0, "r": 1, "className": "Bin"}))
            .unwrap();
    assert_eq!(shape.class_name, ShapeClass::Generic);
}

#[test]
fn decode_unknown_type_fails() {
    let res: Result<Shape, _> = serde_json::from_value(json!({"id": "a", "type": "hexagon", "x": 0, "y": 0}));
    assert!(res.is_err());
}

// =============================================================
// Validation
// =============================================================

#[test]
fn validate_requires_radius_for_circle() {
    let mut c = Shape::circle("c", 0.0, 0.0, 1.0);
    c.r = None;
    assert!(matches!(c.validate(), Err(CanvasError::MissingGeometry { field: "r", .. })));
}

#[test]
fn validate_requires_width_then_height_for_rect() {
    let mut r = Shape::rect("r", 0.0, 0.0, 1.0, 1.0);
    r.h = None;
    assert!(matches!(r.validate(), Err(CanvasError::MissingGeometry { field: "h", .. })));
    r.w = None;
    assert!(matches!(r.validate(), Err(CanvasError::MissingGeometry { field: "w", .. })));
}

#[test]
fn validate_allows_triangle_without_radius() {
    let mut t = Shape::triangle("t", 0.0, 0.0, 1.0);
    t.r = None;
    assert!(t.validate().is_ok());
    assert_eq!(t.radius(), DEFAULT_SHAPE_RADIUS);
}

#[test]
fn validate_rejects_non_finite() {
    let c = Shape::circle("c", f64::NAN, 0.0, 1.0);
    assert!(matches!(c.validate(), Err(CanvasError::InvalidArgument(_))));
}

// =============================================================
// Geometry
// =============================================================

#[test]
fn rect_center_round_trip() {
    let mut r = Shape::rect("r", 10.0, 20.0, 30.0, 40.0);
    assert_eq!(r.center(), Point::new(25.0, 40.0));
    r.set_center(Point::new(0.0, 0.0));
    assert_eq!((r.x, r.y), (-15.0, -20.0));
}

#[test]
fn circle_center_is_position() {
    let mut c = Shape::circle("c", 5.0, 6.0, 1.0);
    c.set_center(Point::new(7.0, 8.0));
    assert_eq!(c.position(), Point::new(7.0, 8.0));
}

#[test]
fn bounds_per_kind() {
    assert_eq!(Shape::circle("c", 10.0, 10.0, 5.0).bounds(), Bounds::new(5.0, 5.0, 15.0, 15.0));
    assert_eq!(Shape::rect("r", 1.0, 2.0, 3.0, 4.0).bounds(), Bounds::new(1.0, 2.0, 4.0, 6.0));
    let b = Shape::triangle("t", 0.0, 0.0, 10.0).bounds();
    assert_eq!(b.min_y, -10.0);
    assert_eq!(b.max_y, 5.0);
    assert!((b.max_x - 10.0 * COS_30).abs() < 1e-12);
}

#[test]
fn bounds_union_and_center() {
    let u = Bounds::new(0.0, 0.0, 1.0, 1.0).union(Bounds::new(-1.0, 2.0, 0.5, 3.0));
    assert_eq!(u, Bounds::new(-1.0, 0.0, 1.0, 3.0));
    assert_eq!(u.width(), 2.0);
    assert_eq!(u.height(), 3.0);
    assert_eq!(u.center(), Point::new(0.0, 1.5));
}

// =============================================================
// SceneStore
// =============================================================

#[test]
fn load_keeps_draw_order() {
    let mut doc = SceneStore::new();
    let errors = doc.load(vec![Shape::circle("a", 0.0, 0.0, 1.0), Shape::circle("b", 0.0, 0.0, 1.0)]);
    assert!(errors.is_empty());
    let order: Vec<_> = doc.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(order, ["a", "b"]);
}

#[test]
fn load_drops_invalid_and_duplicates() {
    let mut bad = Shape::circle("bad", 0.0, 0.0, 1.0);
    bad.r = None;
    let mut doc = SceneStore::new();
    let errors = doc.load(vec![Shape::circle("a", 0.0, 0.0, 1.0), bad, Shape::circle("a", 9.0, 9.0, 1.0)]);
    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[1], CanvasError::DuplicateShapeId(_)));
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.get(&id("a")).map(|s| s.x), Some(0.0));
}

#[test]
fn load_keeps_only_first_selected() {
    let mut a = Shape::circle("a", 0.0, 0.0, 1.0);
    let mut b = Shape::circle("b", 0.0, 0.0, 1.0);
    a.selected = true;
    b.selected = true;
    let mut doc = SceneStore::new();
    doc.load(vec![a, b]);
    assert_eq!(doc.selected_id(), Some(&id("a")));
    assert!(!doc.get(&id("b")).is_some_and(|s| s.selected));
}

#[test]
fn load_replaces_previous_scene() {
    let mut doc = SceneStore::new();
    doc.load(vec![Shape::circle("a", 0.0, 0.0, 1.0)]);
    doc.load(vec![Shape::circle("b", 0.0, 0.0, 1.0)]);
    assert!(doc.get(&id("a")).is_none());
    assert_eq!(doc.len(), 1);
}

#[test]
fn replace_preserves_selection_and_position() {
    let mut doc = SceneStore::new();
    doc.load(vec![Shape::circle("a", 0.0, 0.0, 1.0), Shape::circle("b", 0.0, 0.0, 1.0)]);
    doc.select(Some(&id("a"))).unwrap();
    doc.replace(Shape::rect("a", 5.0, 5.0, 2.0, 2.0)).unwrap();
    let first = doc.iter().next().unwrap();
    assert_eq!(first.id, id("a"));
    assert_eq!(first.kind, ShapeKind::Rect);
    assert!(first.selected);
}

#[test]
fn replace_unknown_is_error() {
    let mut doc = SceneStore::new();
    let err = doc.replace(Shape::circle("ghost", 0.0, 0.0, 1.0)).unwrap_err();
    assert!(matches!(err, CanvasError::UnknownShape(_)));
}

#[test]
fn select_reports_changes() {
    let mut doc = SceneStore::new();
    doc.load(vec![Shape::circle("a", 0.0, 0.0, 1.0), Shape::circle("b", 0.0, 0.0, 1.0)]);
    assert!(doc.select(Some(&id("a"))).unwrap());
    assert!(!doc.select(Some(&id("a"))).unwrap());
    assert!(doc.select(Some(&id("b"))).unwrap());
    assert_eq!(doc.iter().filter(|s| s.selected).count(), 1);
    assert!(doc.select(None).unwrap());
    assert_eq!(doc.selected_id(), None);
}

#[test]
fn select_unknown_keeps_selection() {
    let mut doc = SceneStore::new();
    doc.load(vec![Shape::circle("a", 0.0, 0.0, 1.0)]);
    doc.select(Some(&id("a"))).unwrap();
    assert!(doc.select(Some(&id("zzz"))).is_err());
    assert_eq!(doc.selected_id(), Some(&id("a")));
}

#[test]
fn scene_bounds() {
    let mut doc = SceneStore::new();
    assert!(doc.bounds().is_none());
    doc.load(vec![Shape::circle("a", 0.0, 0.0, 10.0), Shape::rect("b", 50.0, 50.0, 10.0, 20.0)]);
    assert_eq!(doc.bounds(), Some(Bounds::new(-10.0, -10.0, 60.0, 70.0)));
}
