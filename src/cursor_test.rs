#![allow(clippy::float_cmp)]

use base64::Engine as _;
use serde_json::json;

use super::*;

fn template(value: serde_json::Value) -> ShapeTemplate {
    serde_json::from_value(value).unwrap()
}

#[test]
fn template_decodes_host_shape_names() {
    let t = template(json!({"templateId": 4, "shapeType": "CIRCLE", "radius": 12}));
    assert_eq!(t.shape_type, TemplateShape::Circle);
    assert_eq!(t.template_id, json!(4));
    assert_eq!(t.radius, Some(12.0));
    assert_eq!(template(json!({"shapeType": "rect"})).shape_type, TemplateShape::Rectangle);
    assert_eq!(template(json!({"shapeType": "HEXAGON"})).shape_type, TemplateShape::Other);
}

#[test]
fn circle_cursor_matches_on_screen_size() {
    let t = template(json!({"shapeType": "CIRCLE", "radius": 10}));
    let c = TemplateCursor::build(&t, 2.0).unwrap();
    // 2 * 10 * 2 + 4
    assert_eq!(c.size, 44.0);
    assert_eq!((c.hotspot_x, c.hotspot_y), (22.0, 22.0));
    assert!(c.svg.contains(r#"r="20.00""#));
}

#[test]
fn large_cursor_is_clamped_proportionally() {
    let t = template(json!({"shapeType": "CIRCLE", "radius": 100}));
    let c = TemplateCursor::build(&t, 1.0).unwrap();
    assert_eq!(c.size, MAX_CURSOR_PX);
    // needed = 204, factor = 120/204, r = 100 * factor
    assert!(c.svg.contains(&format!(r#"r="{:.2}""#, 100.0 * MAX_CURSOR_PX / 204.0)));
}

#[test]
fn cursor_never_exceeds_max() {
    for zoom in [0.1, 1.0, 5.0] {
        for t in [
            template(json!({"shapeType": "CIRCLE", "radius": 500})),
            template(json!({"shapeType": "TRIANGLE", "radius": 80})),
            template(json!({"shapeType": "RECTANGLE", "width": 300, "height": 20})),
        ] {
            let c = TemplateCursor::build(&t, zoom).unwrap();
            assert!(c.size <= MAX_CURSOR_PX, "{t:?} at {zoom}");
        }
    }
}

#[test]
fn rectangle_uses_longer_side() {
    let t = template(json!({"shapeType": "RECTANGLE", "width": 30, "height": 10}));
    let c = TemplateCursor::build(&t, 1.0).unwrap();
    assert_eq!(c.size, 34.0);
    assert!(c.svg.contains("<rect"));
}

#[test]
fn defaults_fill_missing_dimensions() {
    let tri = TemplateCursor::build(&template(json!({"shapeType": "TRIANGLE"})), 1.0).unwrap();
    assert_eq!(tri.size, 44.0);
    assert!(tri.svg.contains("<polygon"));
    let rect = TemplateCursor::build(&template(json!({"shapeType": "RECTANGLE"})), 1.0).unwrap();
    assert_eq!(rect.size, 44.0);
}

#[test]
fn circle_without_radius_uses_default_shape_radius() {
    let c = TemplateCursor::build(&template(json!({"shapeType": "CIRCLE"})), 1.0).unwrap();
    assert_eq!(c.size, DEFAULT_SHAPE_RADIUS * 2.0 + CURSOR_PAD_PX);
    assert!(c.svg.contains(r#"r="20.00""#));
}

#[test]
fn unknown_shape_has_no_cursor() {
    assert!(TemplateCursor::build(&template(json!({"shapeType": "STAR"})), 1.0).is_none());
}

#[test]
fn css_is_base64_data_url_with_fallback() {
    let t = template(json!({"shapeType": "CIRCLE", "radius": 5}));
    let c = TemplateCursor::build(&t, 1.0).unwrap();
    let css = c.css();
    assert!(css.starts_with("url('data:image/svg+xml;base64,"));
    assert!(css.ends_with("') 7 7, crosshair"));
    let encoded = css.trim_start_matches("url('data:image/svg+xml;base64,").split('\'').next().unwrap();
    let decoded = general_purpose::STANDARD.decode(encoded).unwrap();
    assert_eq!(String::from_utf8(decoded).unwrap(), c.svg);
}

#[test]
fn cursor_style_css_names() {
    assert_eq!(CursorStyle::Grab.css(), "grab");
    assert_eq!(CursorStyle::Grabbing.css(), "grabbing");
    assert_eq!(CursorStyle::Move.css(), "move");
    assert_eq!(CursorStyle::Template("x".into()).css(), "x");
}
