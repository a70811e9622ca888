use super::*;
use crate::config::kind::{CellTag, Scaling};
use crate::foundation::core::{Canvas, PixelRect};
use crate::output::surface::MemorySurface;
use crate::assets::font::{FontProvider, FsFontProvider};
use chrono::FixedOffset;
use std::path::{Path, PathBuf};

const FIXTURE_FONT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/DejaVuSans.ttf");

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "infogrid_cells_{tag}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &Path, color: Rgba8) {
    RgbaImage::from_pixel(8, 8, Rgba(color)).save(path).unwrap();
}

fn setup() -> (MemorySurface, CellRenderer) {
    let surface = MemorySurface::new(Canvas::new(40, 20).unwrap());
    let compositor = Arc::new(Compositor::new(Box::new(surface.clone())));
    (surface, CellRenderer::new(compositor))
}

fn image_cell(content: CellContent) -> PreparedCell {
    let rect = PixelRect::new(20, 0, 20, 20);
    PreparedCell {
        index: 0,
        tag: CellTag::Carousel,
        rect,
        buffer: RgbaImage::from_pixel(rect.width, rect.height, Rgba(BLACK)),
        content,
        refresh: std::time::Duration::from_secs(1),
        font: None,
        font_px: 0.0,
    }
}

#[test]
fn clock_patterns() {
    let at = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 3, 5, 9, 7, 0)
        .single()
        .unwrap();
    assert_eq!(format_clock(ClockFormat::Time, &at), "09:07");
    assert_eq!(format_clock(ClockFormat::Day, &at), "Tue");
    assert_eq!(format_clock(ClockFormat::DateMonth, &at), "5 Mar");
    assert_eq!(format_clock(ClockFormat::DayDate, &at), "Tue 5 Mar");
}

#[test]
fn carousel_cycles_and_publishes_each_image() {
    let dir = temp_dir("carousel");
    let colors = [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]];
    let paths: Vec<PathBuf> = colors
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let p = dir.join(format!("{i}.png"));
            write_png(&p, *c);
            p
        })
        .collect();

    let (surface, renderer) = setup();
    let mut cell = image_cell(CellContent::Carousel {
        paths,
        scaling: Scaling::Resize,
        cursor: None,
    });

    let mut shown = Vec::new();
    for _ in 0..4 {
        renderer.render(&mut cell).unwrap();
        let snap = surface.snapshot().unwrap();
        shown.push(snap.get_pixel(30, 10).0);
        assert_eq!(snap.get_pixel(5, 5).0, BLACK, "left half untouched");
    }
    assert_eq!(shown, vec![colors[0], colors[1], colors[2], colors[0]]);
}

#[test]
fn missing_local_image_is_fatal_and_publishes_nothing() {
    let (surface, renderer) = setup();
    let mut cell = image_cell(CellContent::LocalImage {
        path: PathBuf::from("/nonexistent/infogrid/photo.png"),
        scaling: Scaling::Fit,
    });

    let err = renderer.render(&mut cell).unwrap_err();
    assert!(matches!(err, GridError::Asset(_)));
    assert!(surface.snapshot().unwrap().pixels().all(|p| p.0 == BLACK));
}

#[test]
fn unreachable_remote_image_keeps_stale_content() {
    let dir = temp_dir("stale");
    let path = dir.join("first.png");
    write_png(&path, [9, 99, 199, 255]);

    let (surface, renderer) = setup();
    let mut cell = image_cell(CellContent::LocalImage {
        path,
        scaling: Scaling::Resize,
    });
    renderer.render(&mut cell).unwrap();

    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    cell.content = CellContent::UrlImage {
        url: format!("http://127.0.0.1:{port}/img.png"),
        scaling: Scaling::Resize,
    };
    let err = renderer.render(&mut cell).unwrap_err();
    assert!(err.is_transient());
    assert_eq!(cell.buffer.get_pixel(0, 0).0, [9, 99, 199, 255]);
    assert_eq!(surface.snapshot().unwrap().get_pixel(30, 10).0, [9, 99, 199, 255]);
}

#[test]
fn text_without_font_is_a_render_error() {
    let (_surface, renderer) = setup();
    let mut cell = image_cell(CellContent::Text {
        text: "hello".to_string(),
    });
    let err = renderer.render(&mut cell).unwrap_err();
    assert!(matches!(err, GridError::Render(_)));
}

#[test]
fn text_and_clock_cells_draw_white_glyphs_in_their_rect() {
    let font = FsFontProvider.load(Path::new(FIXTURE_FONT)).unwrap();
    for content in [
        CellContent::Text {
            text: "88".to_string(),
        },
        CellContent::Clock {
            format: ClockFormat::Time,
        },
    ] {
        let (surface, renderer) = setup();
        let mut cell = image_cell(content);
        cell.font = Some(font.clone());
        cell.font_px = 14.0;
        renderer.render(&mut cell).unwrap();

        let snap = surface.snapshot().unwrap();
        let lit: Vec<u32> = snap
            .enumerate_pixels()
            .filter(|(_, _, px)| px.0[0] > 128)
            .map(|(x, _, _)| x)
            .collect();
        assert!(!lit.is_empty(), "{:?} drew nothing", cell.content);
        assert!(lit.iter().all(|x| *x >= 20), "glyphs stay inside the cell");
    }
}
