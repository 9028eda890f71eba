//! Integration tests for loading and saving layout files.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use track_planner::{
    layout_to_json, load_layout, parse_layout, Layout, LoadError, Placement, Planner,
};

const SAVED_PLAN: &str = r#"{
  "placements": [
    {"id": "placement-0", "code": "R600", "x": 400, "y": 300, "rotation": 0, "flipped": false},
    {"id": "placement-1", "code": "R606", "x": "650.5", "y": 300, "rotation": 370},
    {"id": "placement-1", "code": "R607", "x": 900, "y": 500, "flipped": "yes"},
    {"code": ""},
    "junk"
  ],
  "circles": [{"id": "circle-0", "radius": 438, "x": 1200, "y": 600, "label": "Radius 438 mm"}],
  "board": {
    "description": "L-shaped shelf",
    "polygon": [[0, 0], [2400, 0], [2400, 600], [600, 600], [600, 1200], [0, 1200]],
    "orientation": 0
  },
  "zoom": 1.5,
  "pan": {"x": -20, "y": 35}
}"#;

fn scratch_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "track-planner-{}-{}.json",
        std::process::id(),
        name
    ));
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_repairs_saved_plan() {
    let path = scratch_file("repairs", SAVED_PLAN);
    let layout = load_layout(&path).unwrap();
    fs::remove_file(&path).ok();

    let ids: Vec<&str> = layout.placements.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["placement-0", "placement-1", "placement-2"]);
    assert_eq!(layout.placements[1].x, 650.5);
    assert_eq!(layout.placements[1].rotation, 10.0);
    assert!(!layout.placements[2].flipped);
    assert_eq!(layout.board.description, "L-shaped shelf");
    assert_eq!(layout.board.polygon.len(), 6);
    assert_eq!(layout.circles[0].radius, 438.0);
    assert_eq!(layout.zoom, Some(1.5));
}

#[test]
fn test_edit_save_reload() {
    let path = scratch_file("edit", SAVED_PLAN);
    let mut planner = Planner::with_hornby(load_layout(&path).unwrap());
    planner.rotate_board(90.0);
    planner.add_piece("R601");

    fs::write(&path, layout_to_json(planner.layout()).unwrap()).unwrap();
    let reloaded = load_layout(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(&reloaded, planner.layout());
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("track-planner-does-not-exist.json");
    let err = load_layout(&path).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn test_placements_object_is_rejected() {
    let path = scratch_file("object", r#"{"placements": {"a": 1}}"#);
    let err = load_layout(&path).unwrap_err();
    fs::remove_file(&path).ok();
    insta::assert_snapshot!(err.to_string(), @"Layout JSON must contain a list of placements");
}

#[test]
fn test_reload_after_odd_rotation_is_exact() {
    for i in 0..200 {
        let mut layout = Layout::default();
        layout.placements.push(Placement::new("a", "R600", 300.0, 200.0));
        let mut planner = Planner::with_hornby(layout);
        planner.rotate_board(37.0 + 0.731 * f64::from(i));

        let saved = layout_to_json(planner.layout()).unwrap();
        let reloaded = parse_layout(&saved).unwrap();
        assert_eq!(&reloaded, planner.layout(), "drift after turn {}", i);
    }
}
