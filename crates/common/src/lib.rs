//! Shared types for the non-Euclidean viewer: linear-algebra helpers and the
//! camera pose.
//!
//! # Invariants
//! - A `Pose` is plain data; every transformation lives in the kernel.
//! - `Sheet::of` is the single definition of which sheet a pose is on.

pub mod linalg;
pub mod pose;

pub use pose::{Pose, Sheet};
