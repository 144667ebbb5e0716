//! Input mapping: windowing-system events reduced to the two motion signals
//! the integrator needs plus a quit request.
//!
//! # Invariants
//! - The kernel consumes actions and move intents, never raw events.
//! - A move intent is either zero or a unit vector.

pub mod action;
pub mod keys;

pub use action::Action;
pub use keys::{MoveKey, MoveKeys};
