//! Shared primitives: geometry, colors and the error taxonomy.

/// Geometry and color primitives.
pub mod core;
/// Error taxonomy.
pub mod error;
