use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

pub use crate::config::kind::Scaling;
use crate::foundation::core::BLACK;

/// Size `(w, h)` a source of `src_w x src_h` is resized to before placement in a
/// `dst_w x dst_h` cell.
///
/// `Fill` never undershoots the target on either axis and `Fit` never overshoots it.
pub fn scaled_size(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32, scaling: Scaling) -> (u32, u32) {
    if src_w == 0 || src_h == 0 {
        return (dst_w, dst_h);
    }
    let sx = f64::from(dst_w) / f64::from(src_w);
    let sy = f64::from(dst_h) / f64::from(src_h);
    match scaling {
        Scaling::Resize => (dst_w, dst_h),
        Scaling::Fit => {
            let s = sx.min(sy);
            let w = ((f64::from(src_w) * s).round() as u32).clamp(1, dst_w.max(1));
            let h = ((f64::from(src_h) * s).round() as u32).clamp(1, dst_h.max(1));
            (w, h)
        }
        Scaling::Fill => {
            let s = sx.max(sy);
            let w = ((f64::from(src_w) * s).ceil() as u32).max(dst_w);
            let h = ((f64::from(src_h) * s).ceil() as u32).max(dst_h);
            (w, h)
        }
    }
}

/// Scale `src` into a new `dst_w x dst_h` buffer according to `scaling`.
///
/// Uncovered area (only possible with `Fit`) is black.
pub fn scale_into(src: &DynamicImage, dst_w: u32, dst_h: u32, scaling: Scaling) -> RgbaImage {
    let rgba = src.to_rgba8();
    let (w, h) = scaled_size(rgba.width(), rgba.height(), dst_w, dst_h, scaling);
    let resized = if (w, h) == rgba.dimensions() {
        rgba
    } else {
        imageops::resize(&rgba, w, h, FilterType::Triangle)
    };

    match scaling {
        Scaling::Resize => resized,
        Scaling::Fill => {
            let x = (w - dst_w) / 2;
            let y = (h - dst_h) / 2;
            imageops::crop_imm(&resized, x, y, dst_w, dst_h).to_image()
        }
        Scaling::Fit => {
            let mut out = RgbaImage::from_pixel(dst_w, dst_h, Rgba(BLACK));
            let x = (dst_w - w) / 2;
            let y = (dst_h - h) / 2;
            imageops::replace(&mut out, &resized, i64::from(x), i64::from(y));
            out
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scale.rs"]
mod tests;
