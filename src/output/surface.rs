use std::sync::{Arc, Mutex};

use image::{Rgba, RgbaImage};

use crate::foundation::core::{Canvas, PixelRect, Rgba8};
use crate::foundation::error::{GridError, GridResult};

/// A raster output with fixed pixel dimensions.
///
/// Implementations are owned by the [`crate::Compositor`], which serializes every call; they do
/// not need their own locking.
pub trait OutputSurface: Send {
    /// Pixel dimensions, fixed for the surface lifetime.
    fn canvas(&self) -> Canvas;

    /// Copy the top-left `rect.width x rect.height` block of `pixels` to `rect`.
    ///
    /// Callers guarantee `rect` lies inside [`OutputSurface::canvas`] and `pixels` is at least as
    /// large as `rect`.
    fn write_rect(&mut self, rect: PixelRect, pixels: &RgbaImage) -> GridResult<()>;

    /// Fill the whole surface with one color.
    fn fill(&mut self, color: Rgba8) -> GridResult<()> {
        let canvas = self.canvas();
        let solid = RgbaImage::from_pixel(canvas.width, canvas.height, Rgba(color));
        self.write_rect(canvas.bounds(), &solid)
    }
}

/// In-memory RGBA surface.
///
/// Clones share the same pixels, so a test can keep one clone for [`MemorySurface::snapshot`]
/// after handing the other to a compositor.
#[derive(Clone)]
pub struct MemorySurface {
    canvas: Canvas,
    pixels: Arc<Mutex<RgbaImage>>,
}

impl MemorySurface {
    /// Create a black surface.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            pixels: Arc::new(Mutex::new(RgbaImage::from_pixel(
                canvas.width,
                canvas.height,
                Rgba([0, 0, 0, 255]),
            ))),
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> GridResult<RgbaImage> {
        let guard = self
            .pixels
            .lock()
            .map_err(|_| GridError::render("memory surface lock poisoned"))?;
        Ok(guard.clone())
    }
}

impl OutputSurface for MemorySurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn write_rect(&mut self, rect: PixelRect, pixels: &RgbaImage) -> GridResult<()> {
        let mut guard = self
            .pixels
            .lock()
            .map_err(|_| GridError::render("memory surface lock poisoned"))?;
        copy_block(&mut guard, rect, pixels);
        Ok(())
    }
}

/// Row-wise copy of the top-left block of `src` into `dst` at `rect`, clipped to both images.
pub(crate) fn copy_block(dst: &mut RgbaImage, rect: PixelRect, src: &RgbaImage) {
    let rect = rect
        .intersect(PixelRect::new(0, 0, dst.width(), dst.height()))
        .intersect(PixelRect::new(rect.x, rect.y, src.width(), src.height()));
    if rect.is_empty() {
        return;
    }

    let dst_stride = dst.width() as usize * 4;
    let src_stride = src.width() as usize * 4;
    let row_bytes = rect.width as usize * 4;
    let x_off = rect.x as usize * 4;
    let src_raw = src.as_raw();
    let dst_raw: &mut [u8] = dst;
    for row in 0..rect.height as usize {
        let d = (rect.y as usize + row) * dst_stride + x_off;
        let s = row * src_stride;
        dst_raw[d..d + row_bytes].copy_from_slice(&src_raw[s..s + row_bytes]);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/surface.rs"]
mod tests;
