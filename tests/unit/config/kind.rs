use super::*;

fn cell(tag: CellTag) -> CellDef {
    CellDef {
        row: 1,
        col: 1,
        rowspan: 1,
        colspan: 1,
        cell_type: tag,
        refresh_secs: 0,
        font_pts: None,
        text: None,
        source: None,
        sources: Vec::new(),
        scaling: None,
    }
}

#[test]
fn clock_tags_bind_to_patterns() {
    let base = Path::new(".");
    assert_eq!(
        CellKind::from_def(&cell(CellTag::Time), base).unwrap(),
        CellKind::Clock(ClockFormat::Time)
    );
    assert_eq!(ClockFormat::Time.pattern(), "%H:%M");
    assert_eq!(ClockFormat::Day.pattern(), "%a");
    assert_eq!(ClockFormat::DateMonth.pattern(), "%-d %b");
    assert_eq!(ClockFormat::DayDate.pattern(), "%a %-d %b");
}

#[test]
fn required_fields_are_enforced() {
    let base = Path::new(".");
    assert!(CellKind::from_def(&cell(CellTag::Text), base).is_err());
    assert!(CellKind::from_def(&cell(CellTag::Localimage), base).is_err());
    assert!(CellKind::from_def(&cell(CellTag::Urlimage), base).is_err());
    assert!(CellKind::from_def(&cell(CellTag::Carousel), base).is_err());

    let mut blank = cell(CellTag::Text);
    blank.text = Some("   ".to_string());
    assert!(CellKind::from_def(&blank, base).is_err());
}

#[test]
fn isalive_needs_refresh_interval_and_defaults_label_to_address() {
    let base = Path::new(".");
    let mut def = cell(CellTag::Isalive);
    def.source = Some("192.0.2.1:80".to_string());
    let err = CellKind::from_def(&def, base).unwrap_err();
    assert!(matches!(err, GridError::Config(_)));

    def.refresh_secs = 5;
    assert_eq!(
        CellKind::from_def(&def, base).unwrap(),
        CellKind::IsAlive {
            addr: "192.0.2.1:80".to_string(),
            label: "192.0.2.1:80".to_string(),
        }
    );

    def.text = Some("router".to_string());
    let CellKind::IsAlive { label, .. } = CellKind::from_def(&def, base).unwrap() else {
        panic!("expected isalive");
    };
    assert_eq!(label, "router");
}

#[test]
fn local_paths_resolve_against_base_dir() {
    let base = Path::new("/etc/infogrid");
    let mut def = cell(CellTag::Carousel);
    def.sources = vec!["a.png".to_string(), "/abs/b.png".to_string()];
    def.scaling = Some(Scaling::Fit);
    assert_eq!(
        CellKind::from_def(&def, base).unwrap(),
        CellKind::Carousel {
            paths: vec![
                PathBuf::from("/etc/infogrid/a.png"),
                PathBuf::from("/abs/b.png"),
            ],
            scaling: Scaling::Fit,
        }
    );

    let mut def = cell(CellTag::Urlimage);
    def.source = Some("http://example.com/x.png".to_string());
    let CellKind::UrlImage { url, scaling } = CellKind::from_def(&def, base).unwrap() else {
        panic!("expected urlimage");
    };
    assert_eq!(url, "http://example.com/x.png");
    assert_eq!(scaling, Scaling::Resize);
}

#[test]
fn default_font_sizes_rank_clock_over_dates_over_text() {
    let time = CellKind::Clock(ClockFormat::Time).default_font_pts().unwrap();
    let day = CellKind::Clock(ClockFormat::Day).default_font_pts().unwrap();
    let text = CellKind::Hostname.default_font_pts().unwrap();
    assert!(time > day);
    assert!(day > text);
    assert_eq!(
        CellKind::LocalImage {
            path: PathBuf::from("x.png"),
            scaling: Scaling::Fill,
        }
        .default_font_pts(),
        None
    );
}

#[test]
fn tag_display_matches_json_spelling() {
    let tag: CellTag = serde_json::from_str("\"daydate\"").unwrap();
    assert_eq!(tag, CellTag::Daydate);
    assert_eq!(tag.to_string(), "daydate");
    let scaling: Scaling = serde_json::from_str("\"fill\"").unwrap();
    assert_eq!(scaling, Scaling::Fill);
}
