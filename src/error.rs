//! Error taxonomy for the canvas core.
//!
//! None of these are fatal. The engine logs them and degrades to "no visual
//! effect"; they surface as values only so callers and tests can see why a
//! command was ignored.

use crate::doc::ShapeId;

/// Errors produced while applying commands or mounting an instance.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// The DOM target for a mount (canvas element or 2D context) is missing.
    #[error("canvas target not found: {0}")]
    MissingTarget(String),
    /// A scene snapshot contained the same id twice.
    #[error("duplicate shape id: {0}")]
    DuplicateShapeId(ShapeId),
    /// A shape lacks a geometry field required by its type.
    #[error("shape {id} is missing required field `{field}`")]
    MissingGeometry { id: ShapeId, field: &'static str },
    /// A command referenced a shape id that is not in the scene.
    #[error("unknown shape id: {0}")]
    UnknownShape(ShapeId),
    /// `call` named a method outside the fixed behavior interface.
    #[error("unknown shape method: {0}")]
    UnknownMethod(String),
    /// A command argument was present but unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// An inbound message could not be decoded.
    #[error("failed to decode message: {0}")]
    Decode(#[from] serde_json::Error),
}
