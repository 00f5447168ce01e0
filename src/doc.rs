//! Scene model: shape records and the ordered in-memory store.
//!
//! Shapes arrive from the host as JSON (`setData`, `updateShape`,
//! `setTempShape`). The store keeps them in draw order: the last shape is drawn
//! on top and wins hit-tests. Selection lives on the shapes themselves as a
//! `selected` flag, with at most one shape selected at a time.
//!
//! Circles and triangles are positioned by their center; rectangles by their
//! top-left corner. Everything that leaves the crate uses center coordinates,
//! so conversions go through [`Shape::center`] and [`Shape::set_center`].

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::behavior::ShapeClass;
use crate::camera::Point;
use crate::consts::{COS_30, DEFAULT_SHAPE_RADIUS};
use crate::error::CanvasError;

/// Unique identifier for a shape.
///
/// The host sends ids as either strings or numbers; both are normalized to a
/// string so that `7` and `"7"` name the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ShapeId(pub String);

impl ShapeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl<'de> Deserialize<'de> for ShapeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Int(n) => Self(n.to_string()),
            RawId::Float(f) => Self(f.to_string()),
        })
    }
}

/// Geometric type of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Circle centered on `(x, y)` with radius `r`.
    Circle,
    /// Axis-aligned rectangle with top-left `(x, y)` and size `w × h`.
    #[serde(alias = "rectangle")]
    Rect,
    /// Equilateral triangle, apex up, centered on `(x, y)` with circumradius `r`.
    Triangle,
}

/// A shape as stored in the scene and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub selected: bool,
    /// Behavior tag used by the `call` command.
    #[serde(default)]
    pub class_name: ShapeClass,
    /// Whether the label is drawn.
    #[serde(default = "default_true")]
    pub show_label: bool,
}

fn default_true() -> bool {
    true
}

impl Shape {
    /// Minimal circle; mostly useful for tests and host-side construction.
    #[must_use]
    pub fn circle(id: impl Into<String>, x: f64, y: f64, r: f64) -> Self {
        Self::bare(id, ShapeKind::Circle, x, y).with_radius(r)
    }

    /// Minimal rectangle with top-left `(x, y)`.
    #[must_use]
    pub fn rect(id: impl Into<String>, x: f64, y: f64, w: f64, h: f64) -> Self {
        let mut shape = Self::bare(id, ShapeKind::Rect, x, y);
        shape.w = Some(w);
        shape.h = Some(h);
        shape
    }

    /// Minimal triangle centered on `(x, y)`.
    #[must_use]
    pub fn triangle(id: impl Into<String>, x: f64, y: f64, r: f64) -> Self {
        Self::bare(id, ShapeKind::Triangle, x, y).with_radius(r)
    }

    fn bare(id: impl Into<String>, kind: ShapeKind, x: f64, y: f64) -> Self {
        Self {
            id: ShapeId(id.into()),
            kind,
            x,
            y,
            w: None,
            h: None,
            r: None,
            label: None,
            fill: None,
            stroke: None,
            stroke_width: None,
            selected: false,
            class_name: ShapeClass::default(),
            show_label: true,
        }
    }

    fn with_radius(mut self, r: f64) -> Self {
        self.r = Some(r);
        self
    }

    /// Check that the geometry fields required by `kind` are present and finite.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::MissingGeometry`] for an absent field and
    /// [`CanvasError::InvalidArgument`] for a non-finite coordinate.
    pub fn validate(&self) -> Result<(), CanvasError> {
        let missing = match self.kind {
            ShapeKind::Circle => self.r.is_none().then_some("r"),
            ShapeKind::Rect if self.w.is_none() => Some("w"),
            ShapeKind::Rect => self.h.is_none().then_some("h"),
            ShapeKind::Triangle => None,
        };
        if let Some(field) = missing {
            return Err(CanvasError::MissingGeometry { id: self.id.clone(), field });
        }
        let finite = [Some(self.x), Some(self.y), self.w, self.h, self.r]
            .into_iter()
            .flatten()
            .all(f64::is_finite);
        if !finite {
            return Err(CanvasError::InvalidArgument(format!("shape {} has non-finite geometry", self.id)));
        }
        Ok(())
    }

    /// Radius for circles and triangles. Triangles fall back to a default circumradius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        match self.kind {
            ShapeKind::Triangle => self.r.unwrap_or(DEFAULT_SHAPE_RADIUS),
            _ => self.r.unwrap_or(0.0),
        }
    }

    /// Rectangle width (zero when absent).
    #[must_use]
    pub fn width(&self) -> f64 {
        self.w.unwrap_or(0.0)
    }

    /// Rectangle height (zero when absent).
    #[must_use]
    pub fn height(&self) -> f64 {
        self.h.unwrap_or(0.0)
    }

    /// Stored anchor: center for circle/triangle, top-left for rect.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }

    /// Canonical center coordinates.
    #[must_use]
    pub fn center(&self) -> Point {
        match self.kind {
            ShapeKind::Rect => Point::new(self.x + self.width() / 2.0, self.y + self.height() / 2.0),
            ShapeKind::Circle | ShapeKind::Triangle => self.position(),
        }
    }

    /// Move the shape so that its center lands on `c`.
    pub fn set_center(&mut self, c: Point) {
        match self.kind {
            ShapeKind::Rect => {
                self.x = c.x - self.width() / 2.0;
                self.y = c.y - self.height() / 2.0;
            }
            ShapeKind::Circle | ShapeKind::Triangle => self.set_position(c),
        }
    }

    /// Axis-aligned world bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        match self.kind {
            ShapeKind::Circle => {
                let r = self.radius();
                Bounds::new(self.x - r, self.y - r, self.x + r, self.y + r)
            }
            ShapeKind::Rect => Bounds::new(self.x, self.y, self.x + self.width(), self.y + self.height()),
            ShapeKind::Triangle => {
                let [apex, left, right] = triangle_vertices(self.position(), self.radius());
                Bounds::new(left.x, apex.y, right.x, left.y)
            }
        }
    }
}

/// Vertices of an apex-up equilateral triangle: apex, bottom-left, bottom-right.
#[must_use]
pub fn triangle_vertices(center: Point, r: f64) -> [Point; 3] {
    [
        Point::new(center.x, center.y - r),
        Point::new(center.x - r * COS_30, center.y + r * 0.5),
        Point::new(center.x + r * COS_30, center.y + r * 0.5),
    ]
}

/// Axis-aligned bounding box in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }
}

/// Ordered in-memory store of shapes. Index order is draw order.
#[derive(Debug, Default)]
pub struct SceneStore {
    shapes: Vec<Shape>,
}

impl SceneStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Replace the whole scene.
    ///
    /// Shapes that fail validation or repeat an earlier id are dropped; the
    /// returned errors describe each rejection. At most one incoming
    /// `selected` flag survives (the first one).
    pub fn load(&mut self, shapes: Vec<Shape>) -> Vec<CanvasError> {
        let mut rejected = Vec::new();
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(shapes.len());
        let mut has_selection = false;

        for mut shape in shapes {
            if let Err(e) = shape.validate() {
                rejected.push(e);
                continue;
            }
            if !seen.insert(shape.id.clone()) {
                rejected.push(CanvasError::DuplicateShapeId(shape.id));
                continue;
            }
            if shape.selected {
                shape.selected = !has_selection;
                has_selection = true;
            }
            kept.push(shape);
        }

        self.shapes = kept;
        rejected
    }

    /// Replace an existing shape (matched by id) in place, keeping its draw
    /// position and selection state.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::UnknownShape`] when no shape has that id, or the
    /// validation error when the replacement is malformed.
    pub fn replace(&mut self, mut shape: Shape) -> Result<(), CanvasError> {
        shape.validate()?;
        let slot = self
            .shapes
            .iter_mut()
            .find(|s| s.id == shape.id)
            .ok_or_else(|| CanvasError::UnknownShape(shape.id.clone()))?;
        shape.selected = slot.selected;
        *slot = shape;
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| &s.id == id)
    }

    pub fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| &s.id == id)
    }

    /// Shapes in draw order (bottom first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Id of the selected shape, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<&ShapeId> {
        self.shapes.iter().find(|s| s.selected).map(|s| &s.id)
    }

    /// Select `id` (or clear with `None`). Returns whether the selection changed.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::UnknownShape`] and leaves the selection untouched
    /// when `id` is not in the scene.
    pub fn select(&mut self, id: Option<&ShapeId>) -> Result<bool, CanvasError> {
        if let Some(id) = id {
            if self.get(id).is_none() {
                return Err(CanvasError::UnknownShape(id.clone()));
            }
        }
        let before = self.selected_id().cloned();
        for shape in &mut self.shapes {
            shape.selected = Some(&shape.id) == id;
        }
        Ok(before.as_ref() != id)
    }

    /// Union bounds of every shape, or `None` for an empty scene.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.shapes.iter().map(Shape::bounds).reduce(Bounds::union)
    }

    /// Number of shapes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the store contains no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
