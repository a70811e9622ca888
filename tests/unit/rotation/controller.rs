use super::*;
use crate::assets::font::FontHandle;
use crate::foundation::core::WHITE;
use crate::grid::prepare::{CellContent, PreparedCell};
use crate::output::surface::MemorySurface;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct NoFonts;

impl FontProvider for NoFonts {
    fn load(&self, path: &Path) -> GridResult<FontHandle> {
        Err(GridError::font(format!("no font at '{}'", path.display())))
    }
}

/// Records the file name of every image cell it is asked to render.
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl CellRender for Recorder {
    fn render(&self, cell: &mut PreparedCell) -> GridResult<()> {
        let CellContent::LocalImage { path, .. } = &cell.content else {
            return Err(GridError::render("unexpected cell"));
        };
        let name = path.file_stem().unwrap().to_string_lossy().into_owned();
        if self.fail_on == Some(name.as_str()) {
            return Err(GridError::asset(format!("open image '{name}'")));
        }
        self.events.lock().unwrap().push(name);
        Ok(())
    }
}

fn config(json: &str) -> Config {
    Config::from_reader(json.as_bytes(), "/srv/grid").unwrap()
}

fn canvas() -> Canvas {
    Canvas::new(64, 32).unwrap()
}

#[test]
fn single_one_shot_page_returns_after_initial_draw() {
    let cfg = config(
        r#"{ "Pages": [ { "Rows": 1, "Cols": 2, "DurationSecs": 5, "Cells": [
            { "Row": 1, "Col": 1, "CellType": "localimage", "Source": "left.png" },
            { "Row": 1, "Col": 2, "CellType": "localimage", "Source": "right.png" }
        ] } ] }"#,
    );
    let recorder = Recorder::default();
    let mut rotation = Rotation::new(&cfg, canvas(), &NoFonts, &recorder);

    let started = Instant::now();
    rotation.run().unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(recorder.events(), vec!["left", "right"]);
    assert_eq!(rotation.state(), RotationState::Idle);
    assert_eq!(rotation.next_page(), 0);
}

#[test]
fn pages_drain_completely_before_the_next_one_starts() {
    let cfg = config(
        r#"{ "Pages": [
            { "Name": "first", "Rows": 1, "Cols": 2, "DurationSecs": 1, "Cells": [
                { "Row": 1, "Col": 1, "CellType": "localimage", "Source": "a-fast.png", "RefreshSecs": 1 },
                { "Row": 1, "Col": 2, "CellType": "localimage", "Source": "a-once.png" }
            ] },
            { "Name": "second", "Rows": 1, "Cols": 1, "DurationSecs": 1, "Cells": [
                { "Row": 1, "Col": 1, "CellType": "localimage", "Source": "b.png" }
            ] }
        ] }"#,
    );
    let surface = MemorySurface::new(canvas());
    let compositor = Compositor::new(Box::new(surface.clone()));
    compositor.clear(WHITE).unwrap();

    let recorder = Recorder::default();
    let mut rotation = Rotation::new(&cfg, canvas(), &NoFonts, &recorder).clear_between_pages(&compositor);

    let activations = rotation.run_activations(Some(2)).unwrap();
    assert_eq!(activations, 2);
    assert_eq!(rotation.next_page(), 0);
    assert_eq!(rotation.state(), RotationState::Idle);

    let events = recorder.events();
    let first_b = events.iter().position(|e| e == "b").expect("second page rendered");
    assert!(events[..first_b].iter().all(|e| e.starts_with("a-")));
    assert!(events[first_b..].iter().all(|e| e == "b"), "{events:?}");
    let mut opening = events[..2].to_vec();
    opening.sort();
    assert_eq!(opening, ["a-fast", "a-once"]);

    assert!(surface.snapshot().unwrap().pixels().all(|p| p.0 == BLACK));
}

#[test]
fn rotation_wraps_to_the_first_page() {
    let cfg = config(
        r#"{ "Pages": [
            { "Rows": 1, "Cols": 1, "DurationSecs": 1, "Cells": [
                { "Row": 1, "Col": 1, "CellType": "localimage", "Source": "one.png" } ] },
            { "Rows": 1, "Cols": 1, "DurationSecs": 1, "Cells": [
                { "Row": 1, "Col": 1, "CellType": "localimage", "Source": "two.png" } ] }
        ] }"#,
    );
    let recorder = Recorder::default();
    let mut rotation = Rotation::new(&cfg, canvas(), &NoFonts, &recorder);

    assert_eq!(rotation.run_activations(Some(3)).unwrap(), 3);
    assert_eq!(recorder.events(), vec!["one", "two", "one"]);
    assert_eq!(rotation.next_page(), 1);
}

#[test]
fn fatal_render_error_ends_the_rotation() {
    let cfg = config(
        r#"{ "Pages": [ { "Rows": 1, "Cols": 1, "Cells": [
            { "Row": 1, "Col": 1, "CellType": "localimage", "Source": "gone.png" }
        ] } ] }"#,
    );
    let recorder = Recorder {
        fail_on: Some("gone"),
        ..Recorder::default()
    };
    let mut rotation = Rotation::new(&cfg, canvas(), &NoFonts, &recorder);

    let err = rotation.run().unwrap_err();
    assert!(matches!(err, GridError::Asset(_)));
    assert_eq!(rotation.state(), RotationState::Idle);
}

#[test]
fn page_preparation_errors_surface_before_any_render() {
    let cfg = config(
        r#"{ "Pages": [ { "Rows": 1, "Cols": 1, "FontFile": "missing.ttf", "Cells": [
            { "Row": 1, "Col": 1, "CellType": "time", "RefreshSecs": 1 }
        ] } ] }"#,
    );
    let recorder = Recorder::default();
    let err = Rotation::new(&cfg, canvas(), &NoFonts, &recorder).run().unwrap_err();
    assert!(matches!(err, GridError::Font(_)));
    assert!(recorder.events().is_empty());
}

#[test]
fn states_display_their_page() {
    assert_eq!(RotationState::Draining { page: 3 }.to_string(), "draining page 3");
    assert_eq!(RotationState::Idle.to_string(), "idle");
}
