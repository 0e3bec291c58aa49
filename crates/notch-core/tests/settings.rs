use notch_core::{DisplayId, NotchPaths, NotchSettings, Rect, ScreenDescriptor};

#[test]
fn settings_survive_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let paths = NotchPaths::in_dir(dir.path());

    let settings = NotchSettings {
        opening_animation: Some("spring".into()),
        max_panel_width: Some(520.0),
        hover_collapse_ms: Some(750),
        selected_display: Some(DisplayId(7)),
        displays: vec![ScreenDescriptor {
            safe_area_top: 32.0,
            ..ScreenDescriptor::plain(7, Rect::new(0.0, 0.0, 2560.0, 1600.0))
        }],
        ..Default::default()
    };
    settings.save_to(&paths.settings).unwrap();

    let loaded = NotchSettings::try_load(&paths.settings).unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.opening_animation(), "spring");
    assert_eq!(loaded.hover_collapse_delay().as_millis(), 750);
}

#[test]
fn unset_keys_are_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    NotchSettings {
        pull_distance: Some(120.0),
        ..Default::default()
    }
    .save_to(&path)
    .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert_eq!(object["pull_distance"], 120.0);
}

#[test]
fn broken_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ \"pull_distance\": ").unwrap();

    assert!(NotchSettings::try_load(&path).is_err());
    assert_eq!(NotchSettings::load(&path), NotchSettings::default());
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = NotchSettings::load(&dir.path().join("absent.json"));
    assert_eq!(settings.scroll_open_threshold(), 250.0);
    assert_eq!(settings.proximity_distance(), 300.0);
}
