//! Output side of the engine: surfaces, the compositor and the HTTP mirror.

/// Serialized writes into the shared output surface.
pub mod compositor;
/// Linux framebuffer surface.
#[cfg(unix)]
pub mod framebuffer;
/// Mirror frame and its HTTP server.
pub mod mirror;
/// Output surface trait and the in-memory surface.
pub mod surface;
