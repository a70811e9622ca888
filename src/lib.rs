//! `infogrid` draws a grid of independently refreshing information cells (clocks, text, images,
//! image carousels, liveness indicators) onto a Linux framebuffer, optionally mirroring the
//! result over HTTP.
//!
//! A configuration is a list of pages. Activating a page lays its cells out on the surface,
//! renders each once and starts one task per cell that has a refresh interval. Every render is
//! published through the [`Compositor`], the single writer in front of the output surface. With
//! more than one page the [`Rotation`] drains a page after its duration and moves on.
//!
//! ```no_run
//! use infogrid::{Compositor, FsFontProvider, MemorySurface, Canvas, CellRenderer, Config, Rotation};
//! use std::sync::Arc;
//!
//! # fn main() -> infogrid::GridResult<()> {
//! let config = Config::from_path("infogrid.json")?;
//! config.validate()?;
//!
//! let canvas = Canvas::new(800, 480)?;
//! let compositor = Arc::new(Compositor::new(Box::new(MemorySurface::new(canvas))));
//! let renderer = CellRenderer::new(Arc::clone(&compositor));
//! Rotation::new(&config, canvas, &FsFontProvider, &renderer).run()?;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod app;
pub mod assets;
pub mod config;
pub mod foundation;
pub mod grid;
pub mod output;
pub mod render;
pub mod rotation;
pub mod schedule;

pub use assets::font::{FontHandle, FontProvider, FsFontProvider};
pub use config::kind::{CellKind, CellTag, ClockFormat, Scaling};
pub use config::model::{CellDef, Config, ConfigDef, PageDef};
pub use foundation::core::{Canvas, PixelRect, Rgba8};
pub use foundation::error::{GridError, GridResult};
pub use grid::prepare::{CellContent, PreparedCell, PreparedPage, prepare_page};
pub use output::compositor::Compositor;
#[cfg(unix)]
pub use output::framebuffer::FramebufferSurface;
pub use output::mirror::{MirrorFrame, MirrorServer};
pub use output::surface::{MemorySurface, OutputSurface};
pub use render::cells::CellRenderer;
pub use rotation::{Rotation, RotationState};
pub use schedule::{CellRender, Dwell, PagePhase, PageReport, StopSignal, TaskGroup, TaskHandle, run_page};
