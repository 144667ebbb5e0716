//! Camera pose integrator: moves an observer along geodesics of a unit
//! 3-sphere glued to the cylinder `S² × ℝ` along `w = 0`.
//!
//! # Invariants
//! - After every public operation right/up/forward are orthonormal and the
//!   position (axial coordinate removed) is a unit vector orthogonal to
//!   all three.
//! - A step that meets the boundary is split there; `position.w` changes
//!   sign only at such a split.
//! - Nothing here allocates or fails at runtime. A degenerate frame vector
//!   is a bug upstream, not an input.

pub mod config;
pub mod controller;
pub mod flight;
pub mod geodesic;
pub mod repair;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, FlightConfig, RAW_MOUSE_SENSITIVITY};
pub use flight::Flight;
pub use geodesic::{DEFAULT_MAX_CROSSINGS, StepReport, advance};
pub use repair::fix_frame;
