use super::*;

fn solid(w: u32, h: u32, color: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba(color)))
}

const RED: [u8; 4] = [255, 0, 0, 255];

#[test]
fn scaled_sizes_per_policy() {
    assert_eq!(scaled_size(200, 100, 100, 100, Scaling::Fit), (100, 50));
    assert_eq!(scaled_size(200, 100, 100, 100, Scaling::Fill), (200, 100));
    assert_eq!(scaled_size(200, 100, 100, 100, Scaling::Resize), (100, 100));
    assert_eq!(scaled_size(0, 100, 30, 40, Scaling::Fit), (30, 40));
}

#[test]
fn fit_letterboxes_with_symmetric_black_borders() {
    let out = scale_into(&solid(100, 50, RED), 100, 100, Scaling::Fit);
    assert_eq!(out.dimensions(), (100, 100));
    for y in 0..25 {
        assert_eq!(out.get_pixel(50, y).0, BLACK, "top border row {y}");
        assert_eq!(out.get_pixel(50, 99 - y).0, BLACK, "bottom border row {}", 99 - y);
    }
    for y in 26..74 {
        assert_eq!(out.get_pixel(50, y).0, RED, "content row {y}");
    }
}

#[test]
fn fill_covers_the_cell_completely() {
    let out = scale_into(&solid(100, 50, RED), 80, 80, Scaling::Fill);
    assert_eq!(out.dimensions(), (80, 80));
    assert!(out.pixels().all(|px| px.0 == RED));
}

#[test]
fn fill_crops_around_the_center() {
    let mut src = RgbaImage::from_pixel(30, 10, Rgba(BLACK));
    for y in 0..10 {
        for x in 10..20 {
            src.put_pixel(x, y, Rgba(RED));
        }
    }
    let out = scale_into(&DynamicImage::ImageRgba8(src), 10, 10, Scaling::Fill);
    assert_eq!(out.dimensions(), (10, 10));
    assert_eq!(out.get_pixel(5, 5).0, RED);
}

#[test]
fn resize_stretches_to_exact_dimensions() {
    let out = scale_into(&solid(7, 3, RED), 64, 48, Scaling::Resize);
    assert_eq!(out.dimensions(), (64, 48));
    assert!(out.pixels().all(|px| px.0 == RED));
}
