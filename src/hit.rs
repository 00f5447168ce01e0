//! Hit-testing: which shape, if any, lies under a world-space point.
//!
//! Shapes are tested from last to first so the shape drawn on top wins when
//! several overlap. `padding` grows every shape by a few world units so small
//! shapes stay easy to grab with a pointer.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::doc::{SceneStore, Shape, ShapeId, ShapeKind, triangle_vertices};

/// Id of the top-most shape containing `world_pt`, or `None`.
#[must_use]
pub fn hit_test<'a>(doc: &'a SceneStore, world_pt: Point, padding: f64) -> Option<&'a ShapeId> {
    doc.iter()
        .rev()
        .find(|shape| contains(shape, world_pt, padding))
        .map(|shape| &shape.id)
}

/// Whether `pt` lies inside `shape` grown by `padding`.
#[must_use]
pub fn contains(shape: &Shape, pt: Point, padding: f64) -> bool {
    let padding = padding.max(0.0);
    match shape.kind {
        ShapeKind::Circle => {
            let dx = pt.x - shape.x;
            let dy = pt.y - shape.y;
            let r = shape.radius() + padding;
            dx * dx + dy * dy <= r * r
        }
        ShapeKind::Rect => {
            pt.x >= shape.x - padding
                && pt.x <= shape.x + shape.width() + padding
                && pt.y >= shape.y - padding
                && pt.y <= shape.y + shape.height() + padding
        }
        // The inradius of an equilateral triangle is half its circumradius,
        // so growing r by 2·padding pushes each edge out by `padding`.
        ShapeKind::Triangle => point_in_triangle(pt, triangle_vertices(shape.position(), shape.radius() + 2.0 * padding)),
    }
}

/// Barycentric point-in-triangle test; edges count as inside.
#[must_use]
pub fn point_in_triangle(pt: Point, [p1, p2, p3]: [Point; 3]) -> bool {
    let denom = (p2.y - p3.y) * (p1.x - p3.x) + (p3.x - p2.x) * (p1.y - p3.y);
    if denom == 0.0 {
        return false;
    }
    let a = ((p2.y - p3.y) * (pt.x - p3.x) + (p3.x - p2.x) * (pt.y - p3.y)) / denom;
    let b = ((p3.y - p1.y) * (pt.x - p3.x) + (p1.x - p3.x) * (pt.y - p3.y)) / denom;
    let c = 1.0 - a - b;
    [a, b, c].iter().all(|w| (0.0..=1.0).contains(w))
}
