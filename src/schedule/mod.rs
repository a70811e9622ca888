//! Per-cell refresh scheduling.
//!
//! A page activation renders every cell once, then keeps one task per recurring cell ticking on
//! its own interval until the page is drained. All tasks of an activation live in a single
//! [`std::thread::scope`], so draining a page is joining its scope.

/// Page-scoped task runner.
pub mod scheduler;
/// Cooperative stop signal shared by the tasks of one page.
pub mod stop;

pub use scheduler::{CellRender, Dwell, PagePhase, PageReport, TaskGroup, TaskHandle, run_page};
pub use stop::StopSignal;
