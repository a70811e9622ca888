use std::path::{Path, PathBuf};
use std::time::Duration;

use image::{Rgba, RgbaImage};

use crate::assets::font::{FontHandle, FontProvider};
use crate::config::kind::{CellKind, CellTag, ClockFormat, Scaling};
use crate::config::model::{CellDef, PageDef, page_label};
use crate::foundation::core::{BLACK, Canvas, PixelRect};
use crate::foundation::error::{GridError, GridResult};
use crate::grid::geometry::PageGeometry;

/// What a prepared cell draws on each render.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContent {
    /// Current local time in a fixed pattern.
    Clock {
        /// Display pattern.
        format: ClockFormat,
    },
    /// Fixed text (literal text, or the host name resolved during preparation).
    Text {
        /// Text to draw.
        text: String,
    },
    /// Local image file; failing to load it is fatal.
    LocalImage {
        /// Image path.
        path: PathBuf,
        /// Scaling policy.
        scaling: Scaling,
    },
    /// Remote image; failing to fetch it skips the tick.
    UrlImage {
        /// Image URL.
        url: String,
        /// Scaling policy.
        scaling: Scaling,
    },
    /// Local image files cycled one per render.
    Carousel {
        /// Image paths (non-empty).
        paths: Vec<PathBuf>,
        /// Scaling policy.
        scaling: Scaling,
        /// Index shown last; `None` before the first render.
        cursor: Option<usize>,
    },
    /// TCP reachability indicator.
    IsAlive {
        /// `host:port` probe target.
        addr: String,
        /// Text drawn over the indicator.
        label: String,
        /// Connect timeout (the cell's refresh interval).
        timeout: Duration,
    },
}

/// Advance a carousel cursor one step and return the new index.
///
/// `None` ("before first") advances to 0; the last index wraps to 0.
pub fn advance_cursor(cursor: &mut Option<usize>, len: usize) -> usize {
    let next = match *cursor {
        Some(i) if len > 0 => (i + 1) % len,
        _ => 0,
    };
    *cursor = Some(next);
    next
}

/// A cell ready to be scheduled: geometry, private buffer and bound content.
#[derive(Clone, Debug)]
pub struct PreparedCell {
    /// Position of the cell in its page's arena.
    pub index: usize,
    /// Declared type tag, kept for logging.
    pub tag: CellTag,
    /// Absolute rectangle on the output surface.
    pub rect: PixelRect,
    /// Private pixel buffer, exactly `rect` sized.
    pub buffer: RgbaImage,
    /// What to draw.
    pub content: CellContent,
    /// Interval between renders; zero renders once.
    pub refresh: Duration,
    /// Page font, present for text-bearing cells.
    pub font: Option<FontHandle>,
    /// Font size in pixels (1pt = 1px).
    pub font_px: f32,
}

impl PreparedCell {
    /// Return `true` when the cell re-renders on an interval.
    pub fn recurs(&self) -> bool {
        !self.refresh.is_zero()
    }
}

/// A page with every cell prepared, in declaration order.
#[derive(Debug)]
pub struct PreparedPage {
    /// Position of the page in the rotation.
    pub index: usize,
    /// Page label.
    pub name: String,
    /// Derived cell size.
    pub geometry: PageGeometry,
    /// Rotation dwell time, if declared.
    pub duration: Option<Duration>,
    /// Cell arena.
    pub cells: Vec<PreparedCell>,
}

/// Resolve a page for activation: geometry, font and every cell.
///
/// Nothing is cached between activations; a page coming back around in the rotation is prepared
/// from scratch.
#[tracing::instrument(skip(page, fonts, base_dir), fields(name = %page.name))]
pub fn prepare_page(
    page: &PageDef,
    index: usize,
    canvas: Canvas,
    fonts: &dyn FontProvider,
    base_dir: &Path,
) -> GridResult<PreparedPage> {
    let label = page_label(page, index);
    let geometry = PageGeometry::new(canvas, page.rows, page.cols)
        .map_err(|e| prefix_config(&label, None, e))?;

    let kinds = page
        .cells
        .iter()
        .enumerate()
        .map(|(ci, def)| CellKind::from_def(def, base_dir).map_err(|e| prefix_config(&label, Some(ci), e)))
        .collect::<GridResult<Vec<_>>>()?;

    let font = if kinds.iter().any(CellKind::needs_font) {
        let file = page.font_file.as_deref().ok_or_else(|| {
            GridError::config(format!("{label}: text-bearing cells need a FontFile"))
        })?;
        let path = if file.is_absolute() {
            file.to_path_buf()
        } else {
            base_dir.join(file)
        };
        Some(fonts.load(&path)?)
    } else {
        None
    };

    let cells = page
        .cells
        .iter()
        .zip(kinds)
        .enumerate()
        .map(|(ci, (def, kind))| {
            prepare_cell(def, kind, ci, &geometry, font.as_ref())
                .map_err(|e| prefix_config(&label, Some(ci), e))
        })
        .collect::<GridResult<Vec<_>>>()?;

    tracing::debug!(
        cells = cells.len(),
        cell_width = geometry.cell_width,
        cell_height = geometry.cell_height,
        "prepared page"
    );
    Ok(PreparedPage {
        index,
        name: label,
        geometry,
        duration: page.duration_secs.map(Duration::from_secs),
        cells,
    })
}

/// Bind one validated cell declaration to its geometry, buffer and content.
pub fn prepare_cell(
    def: &CellDef,
    kind: CellKind,
    index: usize,
    geometry: &PageGeometry,
    font: Option<&FontHandle>,
) -> GridResult<PreparedCell> {
    let rect = geometry.cell_rect(def.row, def.col, def.rowspan(), def.colspan())?;
    let refresh = Duration::from_secs(def.refresh_secs);

    let font_px = match kind.default_font_pts() {
        Some(default) => {
            let pts = def.font_pts.unwrap_or(default);
            if !pts.is_finite() || pts <= 0.0 {
                return Err(GridError::config(format!("FontPts must be > 0 (got {pts})")));
            }
            pts
        }
        None => 0.0,
    };
    let font = if kind.needs_font() {
        Some(
            font.cloned()
                .ok_or_else(|| GridError::config(format!("'{}' cells need a page font", def.cell_type)))?,
        )
    } else {
        None
    };

    let content = match kind {
        CellKind::Clock(format) => CellContent::Clock { format },
        CellKind::Text { text } => CellContent::Text { text },
        CellKind::Hostname => CellContent::Text { text: host_name()? },
        CellKind::LocalImage { path, scaling } => CellContent::LocalImage { path, scaling },
        CellKind::UrlImage { url, scaling } => CellContent::UrlImage { url, scaling },
        CellKind::Carousel { paths, scaling } => CellContent::Carousel {
            paths,
            scaling,
            cursor: None,
        },
        CellKind::IsAlive { addr, label } => CellContent::IsAlive {
            addr,
            label,
            timeout: refresh,
        },
    };

    Ok(PreparedCell {
        index,
        tag: def.cell_type,
        rect,
        buffer: RgbaImage::from_pixel(rect.width, rect.height, Rgba(BLACK)),
        content,
        refresh,
        font,
        font_px,
    })
}

/// The machine's host name.
pub fn host_name() -> GridResult<String> {
    for path in ["/proc/sys/kernel/hostname", "/etc/hostname"] {
        if let Ok(s) = std::fs::read_to_string(path) {
            let name = s.trim();
            if !name.is_empty() {
                return Ok(name.to_string());
            }
        }
    }
    std::env::var("HOSTNAME")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GridError::config("could not determine the host name"))
}

fn prefix_config(label: &str, cell: Option<usize>, err: GridError) -> GridError {
    match (err, cell) {
        (GridError::Config(msg), Some(ci)) => GridError::config(format!("{label} cell {ci}: {msg}")),
        (GridError::Config(msg), None) => GridError::config(format!("{label}: {msg}")),
        (other, _) => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/prepare.rs"]
mod tests;
