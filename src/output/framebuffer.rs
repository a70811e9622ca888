use std::fs::{File, OpenOptions};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::foundation::core::{Canvas, PixelRect};
use crate::foundation::error::{GridError, GridResult};
use crate::output::surface::OutputSurface;

/// In-memory byte layout of one framebuffer pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// 16 bpp, `RRRRRGGG GGGBBBBB`, little endian.
    Rgb565,
    /// 24 bpp, bytes `B G R`.
    Bgr888,
    /// 32 bpp, bytes `B G R X`.
    Bgrx8888,
}

impl PixelLayout {
    /// Layout for a `bits_per_pixel` value as reported by the kernel.
    pub fn from_bits_per_pixel(bpp: u32) -> GridResult<Self> {
        match bpp {
            16 => Ok(Self::Rgb565),
            24 => Ok(Self::Bgr888),
            32 => Ok(Self::Bgrx8888),
            other => Err(GridError::device(format!(
                "unsupported framebuffer depth {other} bpp (expected 16, 24 or 32)"
            ))),
        }
    }

    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb565 => 2,
            Self::Bgr888 => 3,
            Self::Bgrx8888 => 4,
        }
    }

    /// Encode RGBA8 pixels into `out` (cleared first).
    pub fn encode_row(self, rgba: &[u8], out: &mut Vec<u8>) {
        out.clear();
        out.reserve(rgba.len() / 4 * self.bytes_per_pixel());
        for px in rgba.chunks_exact(4) {
            let (r, g, b) = (px[0], px[1], px[2]);
            match self {
                Self::Rgb565 => {
                    let v = (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3);
                    out.extend_from_slice(&v.to_le_bytes());
                }
                Self::Bgr888 => out.extend_from_slice(&[b, g, r]),
                Self::Bgrx8888 => out.extend_from_slice(&[b, g, r, 0xff]),
            }
        }
    }
}

/// Linux framebuffer device (`/dev/fbN`).
///
/// Geometry comes from `/sys/class/graphics/fbN/{virtual_size,bits_per_pixel,stride}`; pixels are
/// written with positioned writes, one row per syscall. Set the depth beforehand if needed
/// (`fbset -depth 16`).
#[derive(Debug)]
pub struct FramebufferSurface {
    file: File,
    canvas: Canvas,
    stride: usize,
    layout: PixelLayout,
    row: Vec<u8>,
}

impl FramebufferSurface {
    /// Open a framebuffer device and read its geometry from sysfs.
    pub fn open(device: &Path) -> GridResult<Self> {
        let name = device
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| GridError::device(format!("bad device path '{}'", device.display())))?;
        let sysfs = PathBuf::from("/sys/class/graphics").join(name);

        let size = read_sysfs(&sysfs, "virtual_size")?;
        let (w, h) = parse_virtual_size(&size)?;
        let bpp: u32 = read_sysfs(&sysfs, "bits_per_pixel")?
            .parse()
            .map_err(|e| GridError::device(format!("parse bits_per_pixel: {e}")))?;
        let layout = PixelLayout::from_bits_per_pixel(bpp)?;
        let stride = match read_sysfs(&sysfs, "stride") {
            Ok(s) => s
                .parse()
                .map_err(|e| GridError::device(format!("parse stride: {e}")))?,
            Err(_) => w as usize * layout.bytes_per_pixel(),
        };

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(device)
            .map_err(|e| GridError::device(format!("open '{}': {e}", device.display())))?;

        tracing::info!(
            device = %device.display(),
            width = w,
            height = h,
            bpp,
            stride,
            "opened framebuffer"
        );
        Self::from_parts(file, Canvas::new(w, h)?, stride, layout)
    }

    /// Wrap an already-open file with known geometry.
    pub fn from_parts(file: File, canvas: Canvas, stride: usize, layout: PixelLayout) -> GridResult<Self> {
        if stride < canvas.width as usize * layout.bytes_per_pixel() {
            return Err(GridError::device(format!(
                "stride {stride} is too small for {} pixels of {} bytes",
                canvas.width,
                layout.bytes_per_pixel()
            )));
        }
        Ok(Self {
            file,
            canvas,
            stride,
            layout,
            row: Vec::new(),
        })
    }
}

impl OutputSurface for FramebufferSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn write_rect(&mut self, rect: PixelRect, pixels: &RgbaImage) -> GridResult<()> {
        let src_stride = pixels.width() as usize * 4;
        let row_bytes = rect.width as usize * 4;
        let bpp = self.layout.bytes_per_pixel();
        let raw = pixels.as_raw();

        for row in 0..rect.height as usize {
            let s = row * src_stride;
            self.layout.encode_row(&raw[s..s + row_bytes], &mut self.row);
            let offset = (rect.y as usize + row) * self.stride + rect.x as usize * bpp;
            self.file
                .write_all_at(&self.row, offset as u64)
                .map_err(|e| GridError::device(format!("write framebuffer row: {e}")))?;
        }
        Ok(())
    }
}

fn read_sysfs(dir: &Path, attr: &str) -> GridResult<String> {
    let path = dir.join(attr);
    std::fs::read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| GridError::device(format!("read '{}': {e}", path.display())))
}

fn parse_virtual_size(s: &str) -> GridResult<(u32, u32)> {
    let bad = || GridError::device(format!("malformed virtual_size '{s}'"));
    let (w, h) = s.split_once(',').ok_or_else(bad)?;
    let w = w.trim().parse().map_err(|_| bad())?;
    let h = h.trim().parse().map_err(|_| bad())?;
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/output/framebuffer.rs"]
mod tests;
