//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read a pose snapshot; they never mutate it or keep it.
//! - The camera reaches the backend as one 4×4 matrix with columns
//!   right, up, forward, position.

mod renderer;
mod uniform;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use uniform::CameraUniform;
