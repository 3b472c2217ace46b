use super::*;

#[test]
fn setters_clamp_into_range() {
    let mut cfg = Config::default();
    cfg.set_density(9.0);
    assert_eq!(cfg.density, 2.0);
    cfg.set_density(0.0);
    assert_eq!(cfg.density, 0.2);
    cfg.set_speed(f32::NAN);
    assert_eq!(cfg.speed, 1.0);
    cfg.set_glow(-1.0);
    assert_eq!(cfg.glow, 0.0);
    cfg.set_max_columns(2);
    assert_eq!(cfg.max_columns, MIN_COLUMNS);
}

#[test]
fn partial_json_loads_with_defaults() {
    let cfg: Config =
        serde_json::from_str(r#"{"density": 5.0, "theme": "cyan", "encoding": "kv"}"#).unwrap();
    let cfg = cfg.normalized();
    assert_eq!(cfg.density, 2.0);
    assert_eq!(cfg.theme, Theme::Cyan);
    assert_eq!(cfg.encoding, EncodingStyle::Kv);
    assert_eq!(cfg.mode, RenderMode::Columns);
    assert_eq!(cfg.panel_layout, PanelLayout::default());
}

#[test]
fn panel_speed_is_reordered() {
    let mut cfg = Config::default();
    cfg.set_panel_speed(SpeedRange {
        min: 120.0,
        max: 40.0,
    });
    assert_eq!(cfg.panel_speed.min, 40.0);
    assert_eq!(cfg.panel_speed.max, 120.0);
}

#[test]
fn panel_target_follows_density() {
    let mut cfg = Config::default();
    cfg.set_density(0.2);
    assert_eq!(cfg.panel_target(), 10);
    cfg.set_density(1.0);
    assert_eq!(cfg.panel_target(), 40);
    cfg.set_density(2.0);
    assert_eq!(cfg.panel_target(), 80);
}

#[test]
fn blank_area_filters_are_cleared() {
    let mut cfg = Config::default();
    cfg.set_area_filter(Some("  ".to_string()), Some(" MN17 ".to_string()));
    assert_eq!(cfg.area_group, None);
    assert_eq!(cfg.area_code.as_deref(), Some("MN17"));
}
