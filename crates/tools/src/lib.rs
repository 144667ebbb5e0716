//! Developer tooling: pose inspection and drift monitoring.
//!
//! # Invariants
//! - Tools only read poses; repair stays in the kernel.

mod inspector;

pub use inspector::{OrthoResiduals, PoseInspector, PoseSummary};
