//! Wiring of one `infogrid` run: configuration, output device, mirror and rotation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::assets::font::FsFontProvider;
use crate::assets::source::FetchOpts;
use crate::config::model::Config;
use crate::foundation::core::BLACK;
use crate::foundation::error::GridResult;
use crate::output::compositor::Compositor;
use crate::output::mirror::{MirrorFrame, MirrorServer};
use crate::output::surface::OutputSurface;
use crate::render::cells::CellRenderer;
use crate::rotation::Rotation;

/// Default configuration file name.
pub const DEFAULT_CONFIG: &str = "infogrid.json";
/// Default framebuffer device.
pub const DEFAULT_FBDEV: &str = "/dev/fb0";

/// Options for one run.
#[derive(Clone, Debug)]
pub struct AppOpts {
    /// Configuration file.
    pub config_path: PathBuf,
    /// Framebuffer device node.
    pub fbdev: PathBuf,
    /// Serve the HTTP mirror on this port (all interfaces).
    pub mirror_port: Option<u16>,
    /// Stop after this many page activations.
    pub cycles: Option<usize>,
    /// Overall timeout for remote image downloads.
    pub fetch_timeout: Option<Duration>,
}

impl Default for AppOpts {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG),
            fbdev: PathBuf::from(DEFAULT_FBDEV),
            mirror_port: None,
            cycles: None,
            fetch_timeout: None,
        }
    }
}

/// Read and validate the configuration file at `path`.
pub fn load_config(path: &Path) -> GridResult<Config> {
    let config = Config::from_path(path)?;
    config.validate()?;
    Ok(config)
}

/// Open `opts.fbdev` and rotate `config`'s pages on it until done or failed.
///
/// Returns the number of page activations performed.
pub fn run_on_device(config: &Config, opts: &AppOpts) -> GridResult<usize> {
    let surface = open_device(&opts.fbdev)?;
    run_on_surface(config, surface, opts)
}

/// Rotate `config`'s pages on an already open surface.
///
/// `opts.config_path` and `opts.fbdev` are not used.
pub fn run_on_surface(config: &Config, surface: Box<dyn OutputSurface>, opts: &AppOpts) -> GridResult<usize> {
    let canvas = surface.canvas();
    let mut compositor = Compositor::new(surface);

    let mut mirror_server = None;
    if let Some(port) = opts.mirror_port {
        let frame = Arc::new(MirrorFrame::new(canvas));
        compositor = compositor.with_mirror(Arc::clone(&frame))?;
        mirror_server = Some(MirrorServer::start(("0.0.0.0", port), frame)?);
    }

    let compositor = Arc::new(compositor);
    compositor.clear(BLACK)?;

    let renderer = CellRenderer::new(Arc::clone(&compositor)).with_fetch_opts(FetchOpts {
        timeout: opts.fetch_timeout,
    });
    let fonts = FsFontProvider;
    let mut rotation = Rotation::new(config, canvas, &fonts, &renderer).clear_between_pages(&compositor);
    let activations = rotation.run_activations(opts.cycles)?;

    drop(mirror_server);
    tracing::info!(activations, "rotation finished");
    Ok(activations)
}

#[cfg(unix)]
fn open_device(path: &Path) -> GridResult<Box<dyn OutputSurface>> {
    let fb = crate::output::framebuffer::FramebufferSurface::open(path)?;
    Ok(Box::new(fb))
}

#[cfg(not(unix))]
fn open_device(path: &Path) -> GridResult<Box<dyn OutputSurface>> {
    Err(crate::foundation::error::GridError::device(format!(
        "cannot open '{}': framebuffer output needs a Unix system",
        path.display()
    )))
}
