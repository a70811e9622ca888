//! Cell renderers and the drawing helpers they share.

/// Per-kind cell rendering.
pub mod cells;
/// TCP reachability probe.
pub mod probe;
/// Image scaling policies.
pub mod scale;
/// Centered single-line text.
pub mod text;

pub use cells::{CellRenderer, format_clock};
