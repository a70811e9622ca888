//! External inputs of the renderers: fonts and image sources.

/// Font loading.
pub mod font;
/// Local and remote image sources.
pub mod source;
