#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn snap_rounds_to_nearest_multiple() {
    assert_eq!(snap(14.0, 10.0), 10.0);
    assert_eq!(snap(15.0, 10.0), 20.0);
    assert_eq!(snap(-14.0, 10.0), -10.0);
    assert_eq!(snap(7.3, 0.5), 7.5);
}

#[test]
fn snap_disabled_for_non_positive_grid() {
    assert_eq!(snap(14.3, 0.0), 14.3);
    assert_eq!(snap(14.3, -5.0), 14.3);
}

#[test]
fn snapped_values_are_exact_multiples() {
    for v in [0.1, 33.3, -71.9, 1234.56] {
        let s = snap(v, 25.0);
        assert_eq!(s % 25.0, 0.0, "{v} -> {s}");
    }
}

#[test]
fn visible_span_at_identity() {
    let span = GridSpan::visible(&Camera::default(), 100.0, 50.0, 10.0).unwrap();
    assert_eq!((span.start_x, span.start_y), (0.0, 0.0));
    assert_eq!((span.end_x, span.end_y), (110.0, 60.0));
    assert_eq!(span.xs().count(), 12);
    assert_eq!(span.ys().count(), 7);
}

#[test]
fn visible_span_starts_on_grid_line_before_viewport() {
    let cam = Camera { pan_x: 25.0, pan_y: -35.0, zoom: 1.0, ..Camera::default() };
    let span = GridSpan::visible(&cam, 100.0, 100.0, 10.0).unwrap();
    // World x at the left edge is -25, world y at the top edge is 35.
    assert_eq!(span.start_x, -30.0);
    assert_eq!(span.start_y, 30.0);
    assert!(span.xs().all(|x| x % 10.0 == 0.0));
}

#[test]
fn visible_span_scales_with_zoom() {
    let cam = Camera { zoom: 2.0, ..Camera::default() };
    let span = GridSpan::visible(&cam, 100.0, 100.0, 10.0).unwrap();
    assert_eq!(span.end_x, 60.0);
}

#[test]
fn visible_span_none_when_disabled() {
    assert!(GridSpan::visible(&Camera::default(), 100.0, 100.0, 0.0).is_none());
    assert!(GridSpan::visible(&Camera::default(), 100.0, 100.0, f64::NAN).is_none());
}

#[test]
fn visible_span_none_when_too_dense() {
    let cam = Camera { zoom: 0.1, ..Camera::default() };
    assert!(GridSpan::visible(&cam, 2000.0, 2000.0, 1.0).is_none());
}
