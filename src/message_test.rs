#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::cursor::TemplateShape;

fn cmd(value: serde_json::Value) -> Command {
    Command::parse(&value.to_string()).unwrap()
}

// =============================================================
// Commands
// =============================================================

#[test]
fn set_data_full() {
    let c = cmd(json!({
        "type": "setData",
        "data": [{"id": "A", "type": "circle", "x": 100, "y": 100, "r": 20}],
        "selectedId": "A",
        "autoFit": true,
    }));
    let Command::SetData { data, selected_id, auto_fit } = c else {
        panic!("wrong variant: {c:?}");
    };
    assert_eq!(data.len(), 1);
    assert_eq!(selected_id, Some(Some(ShapeId::from("A"))));
    assert!(auto_fit);
}

#[test]
fn set_data_distinguishes_absent_and_null_selection() {
    let absent = cmd(json!({"type": "setData", "data": []}));
    assert!(matches!(absent, Command::SetData { selected_id: None, auto_fit: false, .. }));
    let null = cmd(json!({"type": "setData", "data": [], "selectedId": null}));
    assert!(matches!(null, Command::SetData { selected_id: Some(None), .. }));
}

#[test]
fn simple_commands() {
    assert_eq!(cmd(json!({"type": "setEditMode", "on": true})), Command::SetEditMode { on: true });
    assert_eq!(cmd(json!({"type": "setSnap", "units": 10})), Command::SetSnap { units: 10.0 });
    assert_eq!(cmd(json!({"type": "fitView"})), Command::FitView);
    assert_eq!(cmd(json!({"type": "setRotation", "deg": 45})), Command::SetRotation { deg: 45.0 });
    assert_eq!(cmd(json!({"type": "setBackgroundScale", "scale": 2})), Command::SetBackgroundScale { scale: 2.0 });
    assert_eq!(
        cmd(json!({"type": "setBackgroundOffset", "x": 1, "y": -2})),
        Command::SetBackgroundOffset { x: 1.0, y: -2.0 }
    );
    assert_eq!(cmd(json!({"type": "clearTempShape"})), Command::ClearTempShape);
    assert_eq!(cmd(json!({"type": "panBy", "dx": 3, "dy": 4})), Command::PanBy { dx: 3.0, dy: 4.0 });
    assert_eq!(cmd(json!({"type": "zoomTo", "zoom": 1.5})), Command::ZoomTo { zoom: 1.5 });
}

#[test]
fn grid_and_move_mode_commands() {
    assert_eq!(cmd(json!({"type": "setGrid", "on": true})), Command::SetGrid { on: true });
    assert_eq!(cmd(json!({"type": "setGrid"})), Command::SetGrid { on: false });
    assert_eq!(
        cmd(json!({"type": "setMoveMode", "shapeId": "A", "enabled": true})),
        Command::SetMoveMode { id: ShapeId::from("A"), enabled: true }
    );
    assert_eq!(
        cmd(json!({"type": "setMoveMode", "id": 3})),
        Command::SetMoveMode { id: ShapeId::from("3"), enabled: false }
    );
    assert!(Command::parse(r#"{"type": "setMoveMode", "enabled": true}"#).is_err());
}

#[test]
fn legacy_field_names() {
    assert_eq!(cmd(json!({"type": "setRotation", "angle": 90})), Command::SetRotation { deg: 90.0 });
    assert_eq!(cmd(json!({"type": "setBackgroundPanMode", "enabled": true})), Command::SetBackgroundPanMode { on: true });
    assert!(matches!(
        cmd(json!({"type": "setBackground", "image": "a.png"})),
        Command::SetBackground { url: Some(u), .. } if u == "a.png"
    ));
    assert!(matches!(
        cmd(json!({"type": "updateMovePosition", "shapeId": 5, "x": 1, "y": 2})),
        Command::UpdateMovePosition { id, .. } if id.as_str() == "5"
    ));
}

#[test]
fn set_background_with_options_and_null() {
    let c = cmd(json!({"type": "setBackground", "url": "bg.jpg", "opts": {"scale": 0.5, "x": 10}}));
    let Command::SetBackground { url, opts } = c else {
        panic!("wrong variant");
    };
    assert_eq!(url.as_deref(), Some("bg.jpg"));
    assert_eq!(opts, BackgroundOptions { scale: Some(0.5), x: Some(10.0), y: None });
    assert!(matches!(cmd(json!({"type": "setBackground", "url": null})), Command::SetBackground { url: None, .. }));
}

#[test]
fn set_background_visible_defaults_true() {
    assert_eq!(cmd(json!({"type": "setBackgroundVisible"})), Command::SetBackgroundVisible { visible: true });
    assert_eq!(
        cmd(json!({"type": "setBackgroundVisible", "visible": false})),
        Command::SetBackgroundVisible { visible: false }
    );
}

#[test]
fn set_zoom_direction() {
    assert_eq!(cmd(json!({"type": "setZoom", "direction": "in"})), Command::SetZoom { direction: ZoomDirection::In });
    assert_eq!(cmd(json!({"type": "setZoom", "direction": "out"})), Command::SetZoom { direction: ZoomDirection::Out });
    assert!(Command::parse(r#"{"type": "setZoom", "direction": "sideways"}"#).is_err());
}

#[test]
fn set_shape_cursor_template_and_clear() {
    let c = cmd(json!({"type": "setShapeCursor", "template": {"templateId": "t1", "shapeType": "TRIANGLE", "radius": 15}}));
    let Command::SetShapeCursor { template: Some(t) } = c else {
        panic!("wrong variant");
    };
    assert_eq!(t.shape_type, TemplateShape::Triangle);
    assert_eq!(t.template_id, json!("t1"));
    assert_eq!(cmd(json!({"type": "setShapeCursor", "template": null})), Command::SetShapeCursor { template: None });
}

#[test]
fn call_with_args() {
    let c = cmd(json!({"type": "call", "id": "s1", "method": "setColor", "args": ["#0f0"]}));
    assert_eq!(
        c,
        Command::Call { id: ShapeId::from("s1"), method: "setColor".into(), args: vec![json!("#0f0")] }
    );
    assert!(matches!(cmd(json!({"type": "call", "id": 1, "method": "click"})), Command::Call { args, .. } if args.is_empty()));
}

#[test]
fn unknown_or_malformed_commands_fail() {
    assert!(matches!(Command::parse(r#"{"type": "selfDestruct"}"#), Err(CanvasError::Decode(_))));
    assert!(Command::parse("not json").is_err());
    assert!(Command::parse(r#"{"type": "updateShape"}"#).is_err());
}

// =============================================================
// Events
// =============================================================

#[test]
fn events_serialize_tagged_camel_case() {
    let moved = Event::ShapeMoved { id: ShapeId::from("A"), x: 150.0, y: 120.0 };
    assert_eq!(serde_json::to_value(&moved).unwrap(), json!({"type": "shapeMoved", "id": "A", "x": 150.0, "y": 120.0}));

    let placed = Event::PlacementRequested { x: 1.0, y: 2.0, template_id: json!(9) };
    assert_eq!(
        serde_json::to_value(&placed).unwrap(),
        json!({"type": "placementRequested", "x": 1.0, "y": 2.0, "templateId": 9})
    );

    let bg = Event::BackgroundOffsetUpdated { x: -1.5, y: 0.0 };
    assert_eq!(serde_json::to_value(&bg).unwrap(), json!({"type": "backgroundOffsetUpdated", "x": -1.5, "y": 0.0}));
}

#[test]
fn selection_event_carries_null() {
    let json = Event::ShapeSelected { id: None }.to_json().unwrap();
    assert_eq!(json, r#"{"type":"shapeSelected","id":null}"#);
    assert_eq!(Event::TemplateCleared.to_json().unwrap(), r#"{"type":"templateCleared"}"#);
}
