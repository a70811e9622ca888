use std::sync::{Arc, Mutex};

use image::{Rgba, RgbaImage};

use crate::foundation::core::{Canvas, PixelRect, Rgba8};
use crate::foundation::error::{GridError, GridResult};
use crate::output::mirror::MirrorFrame;
use crate::output::surface::OutputSurface;

/// Single writer gate in front of the output surface and the optional mirror.
///
/// Every [`Compositor::publish`] holds the surface lock for its entire copy, so two publishes
/// never interleave at the pixel level. The mirror copy happens inside the same critical section
/// under the mirror's own lock; lock order is always surface, then mirror.
pub struct Compositor {
    canvas: Canvas,
    surface: Mutex<Box<dyn OutputSurface>>,
    mirror: Option<Arc<MirrorFrame>>,
}

impl Compositor {
    /// Take ownership of an output surface.
    pub fn new(surface: Box<dyn OutputSurface>) -> Self {
        Self {
            canvas: surface.canvas(),
            surface: Mutex::new(surface),
            mirror: None,
        }
    }

    /// Also copy every publish into `mirror`, which must match the surface size.
    pub fn with_mirror(mut self, mirror: Arc<MirrorFrame>) -> GridResult<Self> {
        if mirror.canvas() != self.canvas {
            return Err(GridError::device(format!(
                "mirror is {}x{} but the output surface is {}x{}",
                mirror.canvas().width,
                mirror.canvas().height,
                self.canvas.width,
                self.canvas.height
            )));
        }
        self.mirror = Some(mirror);
        Ok(self)
    }

    /// Output surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Copy a fully rendered block to `rect` on the surface (and the mirror).
    ///
    /// The part of `rect` outside the surface, or beyond the size of `pixels`, is dropped.
    pub fn publish(&self, rect: PixelRect, pixels: &RgbaImage) -> GridResult<()> {
        let clipped = rect
            .intersect(self.canvas.bounds())
            .intersect(PixelRect::new(rect.x, rect.y, pixels.width(), pixels.height()));
        if clipped.is_empty() {
            return Ok(());
        }

        let mut surface = self
            .surface
            .lock()
            .map_err(|_| GridError::render("output surface lock poisoned"))?;
        surface.write_rect(clipped, pixels)?;
        if let Some(mirror) = &self.mirror {
            mirror.write_rect(clipped, pixels)?;
        }
        drop(surface);

        tracing::trace!(x = clipped.x, y = clipped.y, w = clipped.width, h = clipped.height, "published");
        Ok(())
    }

    /// Fill the whole surface (and mirror) with `color`.
    pub fn clear(&self, color: Rgba8) -> GridResult<()> {
        let mut surface = self
            .surface
            .lock()
            .map_err(|_| GridError::render("output surface lock poisoned"))?;
        surface.fill(color)?;
        if let Some(mirror) = &self.mirror {
            let solid = RgbaImage::from_pixel(self.canvas.width, self.canvas.height, Rgba(color));
            mirror.write_rect(self.canvas.bounds(), &solid)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/compositor.rs"]
mod tests;
