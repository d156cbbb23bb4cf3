#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn empty_environment_yields_defaults() {
    let config = WhiteboardConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, WhiteboardConfig::default());
    assert_eq!(config.storage_key, "whiteboard_data");
    assert_eq!(config.channel, "whiteboard_sync");
    assert_eq!(config.data_dir, PathBuf::from(".whiteboard"));
    assert_eq!(config.channel_capacity, 64);
}

// =============================================================================
// Overrides
// =============================================================================

#[test]
fn present_values_override_defaults() {
    let config = WhiteboardConfig::from_lookup(lookup(&[
        ("WHITEBOARD_DATA_DIR", "/tmp/boards"),
        ("WHITEBOARD_STORAGE_KEY", "team_board"),
        ("WHITEBOARD_CHANNEL", "team_sync"),
        ("WHITEBOARD_VIEWPORT", "1920x1080"),
        ("WHITEBOARD_CHANNEL_CAPACITY", "8"),
    ]))
    .unwrap();
    assert_eq!(config.data_dir, PathBuf::from("/tmp/boards"));
    assert_eq!(config.storage_key, "team_board");
    assert_eq!(config.channel, "team_sync");
    assert_eq!(config.viewport, Viewport { width: 1920.0, height: 1080.0 });
    assert_eq!(config.channel_capacity, 8);
}

#[test]
fn viewport_accepts_spaces_and_uppercase_separator() {
    let vp: Viewport = " 800 X 600 ".parse().unwrap();
    assert_eq!(vp, Viewport { width: 800.0, height: 600.0 });
    assert_eq!(vp.to_string(), "800x600");
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn malformed_capacity_is_an_error() {
    let err = WhiteboardConfig::from_lookup(lookup(&[("WHITEBOARD_CHANNEL_CAPACITY", "lots")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "WHITEBOARD_CHANNEL_CAPACITY", .. }));
}

#[test]
fn zero_capacity_is_an_error() {
    let err = WhiteboardConfig::from_lookup(lookup(&[("WHITEBOARD_CHANNEL_CAPACITY", "0")])).unwrap_err();
    assert!(err.to_string().contains("at least 1"));
}

#[test]
fn malformed_viewport_is_an_error() {
    for raw in ["1280", "0x800", "-5x10", "wide x tall"] {
        let result = WhiteboardConfig::from_lookup(lookup(&[("WHITEBOARD_VIEWPORT", raw)]));
        assert!(result.is_err(), "{raw} should be rejected");
    }
}

#[test]
fn blank_storage_key_is_an_error() {
    let err = WhiteboardConfig::from_lookup(lookup(&[("WHITEBOARD_STORAGE_KEY", "  ")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "WHITEBOARD_STORAGE_KEY", .. }));
}
