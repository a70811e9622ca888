//! Page rotation: activate a page, let it dwell, drain it, move on.

/// Rotation state machine.
pub mod controller;

pub use controller::{Rotation, RotationState};
