//! Placement canvas for the silo admin tool.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It draws
//! storage-unit shapes (circles, rectangles, triangles) over an optional
//! background image and turns pointer input into pan/zoom, shape drags,
//! background alignment and selection. The host application drives it with
//! JSON commands and receives JSON events back; persistence and transport
//! stay with the host.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`mount`] | `wasm-bindgen` handle, DOM listeners, frame scheduling |
//! | [`engine`] | Browser-bound [`engine::Engine`] and testable [`engine::EngineCore`] |
//! | [`message`] | Inbound commands and outbound events |
//! | [`doc`] | Shape records and the ordered scene store |
//! | [`camera`] | Pan/zoom/rotation camera and coordinate conversions |
//! | [`hit`] | Top-most-wins hit-testing |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`grid`] | Snap rounding and visible grid span |
//! | [`background`] | Background image layer and stale-load guard |
//! | [`cursor`] | Mode cursors and the template preview cursor |
//! | [`behavior`] | Per-class shape behaviors for `call` |
//! | [`render`] | Scene rendering to a 2D context |
//! | [`config`] | Per-instance options |
//! | [`error`] | Crate error type |
//! | [`consts`] | Shared numeric constants (zoom limits, padding, etc.) |

pub mod background;
pub mod behavior;
pub mod camera;
pub mod config;
pub mod consts;
pub mod cursor;
pub mod doc;
pub mod engine;
pub mod error;
pub mod grid;
pub mod hit;
pub mod input;
pub mod message;
pub mod mount;
pub mod render;

pub use mount::SiloCanvas;
