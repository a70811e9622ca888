use image::RgbaImage;

use crate::assets::font::FontHandle;
use crate::foundation::core::Rgba8;

/// Horizontal extent of `text` at `px`, including kerning.
pub fn measure(font: &FontHandle, px: f32, text: &str) -> f32 {
    let font = font.font();
    let mut width = 0.0f32;
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        if let Some(p) = prev {
            width += font.horizontal_kern(p, ch, px).unwrap_or(0.0);
        }
        width += font.metrics(ch, px).advance_width;
        prev = Some(ch);
    }
    width
}

/// Draw a single line of text centered both ways in `buf`.
///
/// Glyph coverage is blended over whatever the buffer already holds. Text wider than the buffer is
/// clipped on both sides.
pub fn draw_centered(buf: &mut RgbaImage, font: &FontHandle, px: f32, text: &str, color: Rgba8) {
    if text.is_empty() || !px.is_finite() || px <= 0.0 {
        return;
    }

    let (ascent, descent) = match font.font().horizontal_line_metrics(px) {
        Some(m) => (m.ascent, m.descent),
        None => (px * 0.8, -px * 0.2),
    };
    let width = measure(font, px, text);
    let baseline = ((buf.height() as f32 + ascent + descent) / 2.0).round() as i32;
    let mut pen = (buf.width() as f32 - width) / 2.0;

    let mut prev: Option<char> = None;
    for ch in text.chars() {
        if let Some(p) = prev {
            pen += font.font().horizontal_kern(p, ch, px).unwrap_or(0.0);
        }
        let (metrics, coverage) = font.font().rasterize(ch, px);
        let gx = pen.round() as i32 + metrics.xmin;
        let gy = baseline - (metrics.ymin + metrics.height as i32);
        blit_coverage(buf, gx, gy, metrics.width, &coverage, color);
        pen += metrics.advance_width;
        prev = Some(ch);
    }
}

fn blit_coverage(buf: &mut RgbaImage, x0: i32, y0: i32, w: usize, coverage: &[u8], color: Rgba8) {
    if w == 0 {
        return;
    }
    let (bw, bh) = (buf.width() as i32, buf.height() as i32);
    for (row, line) in coverage.chunks_exact(w).enumerate() {
        let y = y0 + row as i32;
        if y < 0 || y >= bh {
            continue;
        }
        for (col, &cov) in line.iter().enumerate() {
            let x = x0 + col as i32;
            if cov == 0 || x < 0 || x >= bw {
                continue;
            }
            let px = buf.get_pixel_mut(x as u32, y as u32);
            let a = u16::from(cov);
            for i in 0..3 {
                let d = u16::from(px.0[i]);
                let s = u16::from(color[i]);
                px.0[i] = ((s * a + d * (255 - a) + 127) / 255) as u8;
            }
            px.0[3] = px.0[3].max(cov);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
