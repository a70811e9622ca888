//! Configuration model: pages, raw cell declarations and their validated variants.

/// Cell type tags and validated cell variants.
pub mod kind;
/// JSON-facing configuration structures and loading.
pub mod model;
