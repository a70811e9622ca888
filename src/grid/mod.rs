//! Page activation: geometry and cell preparation.

/// Grid geometry.
pub mod geometry;
/// Cell preparer.
pub mod prepare;
