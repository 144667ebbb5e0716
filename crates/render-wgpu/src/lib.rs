//! wgpu render backend for the sphere/cylinder space.
//!
//! Draws a single full-screen quad; the fragment shader traces a geodesic
//! per pixel starting from the camera pose.
//!
//! # Invariants
//! - Renderer never mutates the pose.
//! - One uniform write and one draw per frame.

mod gpu;
mod shaders;
mod surface;

pub use gpu::WgpuRenderer;
pub use surface::{GpuContext, RenderError};
