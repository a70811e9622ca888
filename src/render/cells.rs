use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use image::{Rgba, RgbaImage};

use crate::assets::font::FontHandle;
use crate::assets::source::{FetchOpts, fetch_remote, load_local};
use crate::config::kind::ClockFormat;
use crate::foundation::core::{BLACK, GREEN, RED, Rgba8, WHITE};
use crate::foundation::error::{GridError, GridResult};
use crate::grid::prepare::{CellContent, PreparedCell, advance_cursor};
use crate::output::compositor::Compositor;
use crate::render::probe::probe_tcp;
use crate::render::scale::scale_into;
use crate::render::text::draw_centered;
use crate::schedule::CellRender;

/// Production renderer: draws each cell kind into its buffer and publishes it.
#[derive(Clone)]
pub struct CellRenderer {
    compositor: Arc<Compositor>,
    agent: ureq::Agent,
}

impl CellRenderer {
    /// Renderer publishing through `compositor`.
    pub fn new(compositor: Arc<Compositor>) -> Self {
        Self {
            compositor,
            agent: FetchOpts::default().agent(),
        }
    }

    /// Use `fetch` for remote image downloads. Every cell shares the resulting agent.
    pub fn with_fetch_opts(mut self, fetch: FetchOpts) -> Self {
        self.agent = fetch.agent();
        self
    }
}

impl CellRender for CellRenderer {
    fn render(&self, cell: &mut PreparedCell) -> GridResult<()> {
        let PreparedCell {
            index,
            rect,
            buffer,
            content,
            font,
            font_px,
            ..
        } = cell;

        match content {
            CellContent::Clock { format } => {
                let text = format_clock(*format, &Local::now());
                fill(buffer, BLACK);
                draw_centered(buffer, need_font(font.as_ref(), *index)?, *font_px, &text, WHITE);
            }
            CellContent::Text { text } => {
                fill(buffer, BLACK);
                draw_centered(buffer, need_font(font.as_ref(), *index)?, *font_px, text, WHITE);
            }
            CellContent::LocalImage { path, scaling } => {
                let image = load_local(path)?;
                *buffer = scale_into(&image, rect.width, rect.height, *scaling);
            }
            CellContent::UrlImage { url, scaling } => {
                let image = fetch_remote(&self.agent, url)?;
                *buffer = scale_into(&image, rect.width, rect.height, *scaling);
            }
            CellContent::Carousel {
                paths,
                scaling,
                cursor,
            } => {
                let at = advance_cursor(cursor, paths.len());
                let path = paths
                    .get(at)
                    .ok_or_else(|| GridError::render(format!("cell {index}: carousel has no images")))?;
                let image = load_local(path)?;
                *buffer = scale_into(&image, rect.width, rect.height, *scaling);
            }
            CellContent::IsAlive {
                addr,
                label,
                timeout,
            } => {
                let color = match probe_tcp(addr, *timeout) {
                    Ok(()) => GREEN,
                    Err(e) => {
                        tracing::debug!(cell = *index, error = %e, "probe failed");
                        RED
                    }
                };
                fill(buffer, color);
                draw_centered(buffer, need_font(font.as_ref(), *index)?, *font_px, label, WHITE);
            }
        }

        self.compositor.publish(*rect, buffer)
    }
}

/// Format `now` the way a clock cell of `format` shows it.
pub fn format_clock<Tz>(format: ClockFormat, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format(format.pattern()).to_string()
}

fn need_font(font: Option<&FontHandle>, index: usize) -> GridResult<&FontHandle> {
    font.ok_or_else(|| GridError::render(format!("cell {index} draws text but has no font")))
}

fn fill(buffer: &mut RgbaImage, color: Rgba8) {
    for px in buffer.pixels_mut() {
        *px = Rgba(color);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cells.rs"]
mod tests;
