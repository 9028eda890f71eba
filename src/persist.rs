//! JSON layout documents
//!
//! Loading is lenient: only a missing placements list, or a non-empty list
//! with nothing usable in it, is rejected. Everything else is repaired with
//! defaults so a hand-edited or older file still opens.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::LoadError;
use crate::track::angle::normalize_rotation;
use crate::track::{Board, GuideCircle, Layout, Pan, Placement, Point};

/// Read and parse a layout file
pub fn load_layout(path: &Path) -> Result<Layout, LoadError> {
    let content = std::fs::read_to_string(path)?;
    parse_layout(&content)
}

/// Parse a layout from JSON text
pub fn parse_layout(source: &str) -> Result<Layout, LoadError> {
    let value: Value = serde_json::from_str(source)?;
    layout_from_value(&value)
}

/// Build a layout from an already-parsed JSON value.
///
/// A bare array is accepted as the placements list.
pub fn layout_from_value(value: &Value) -> Result<Layout, LoadError> {
    let (placements_value, document) = match value {
        Value::Object(map) => (map.get("placements"), Some(map)),
        Value::Array(_) => (Some(value), None),
        _ => (None, None),
    };
    let Some(Value::Array(items)) = placements_value else {
        return Err(LoadError::PlacementsNotAList);
    };

    let placements = parse_placements(items);
    if !items.is_empty() && placements.is_empty() {
        return Err(LoadError::NoValidPlacements);
    }

    let mut layout = Layout {
        placements,
        ..Layout::default()
    };
    if let Some(map) = document {
        if let Some(Value::Array(circles)) = map.get("circles") {
            layout.circles = parse_circles(circles);
        }
        if let Some(Value::Object(board)) = map.get("board") {
            layout.board = parse_board(board);
        }
        layout.zoom = map.get("zoom").and_then(Value::as_f64);
        layout.pan = map.get("pan").and_then(parse_pan);
    }
    Ok(layout)
}

/// Numbers and numeric strings become floats; anything else is rejected
fn lenient_f64(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Pick `preferred` unless it is already taken, else a free synthesized id
fn unique_id(preferred: Option<&str>, fallback: String, used: &mut HashSet<String>) -> String {
    if let Some(id) = preferred {
        if used.insert(id.to_string()) {
            return id.to_string();
        }
        log::warn!("duplicate placement id '{}' renamed", id);
    }
    let mut candidate = fallback.clone();
    let mut suffix = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}-{}", fallback, suffix);
        suffix += 1;
    }
    candidate
}

fn parse_placements(items: &[Value]) -> Vec<Placement> {
    let mut used = HashSet::new();
    let mut placements = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let Value::Object(raw) = item else {
            log::warn!("placement {} is not an object; dropped", index);
            continue;
        };
        let Some(code) = non_empty_str(raw.get("code")) else {
            log::warn!("placement {} has no piece code; dropped", index);
            continue;
        };
        let id = unique_id(
            non_empty_str(raw.get("id")),
            format!("placement-{}", index),
            &mut used,
        );
        let flipped = match raw.get("flipped") {
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                log::debug!("placement '{}' has non-boolean flipped {}", id, other);
                false
            }
            None => false,
        };

        placements.push(Placement {
            x: lenient_f64(raw.get("x")).unwrap_or(0.0),
            y: lenient_f64(raw.get("y")).unwrap_or(0.0),
            rotation: normalize_rotation(lenient_f64(raw.get("rotation")).unwrap_or(0.0)),
            flipped,
            code: code.to_string(),
            id,
        });
    }
    placements
}

fn parse_circles(items: &[Value]) -> Vec<GuideCircle> {
    let mut circles = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let Value::Object(raw) = item else {
            continue;
        };
        let radius = lenient_f64(raw.get("radius")).unwrap_or(0.0);
        if radius <= 0.0 {
            log::warn!("guide circle {} has no positive radius; dropped", index);
            continue;
        }
        circles.push(GuideCircle {
            id: non_empty_str(raw.get("id"))
                .map(str::to_string)
                .unwrap_or_else(|| format!("circle-{}", index)),
            radius,
            x: lenient_f64(raw.get("x")).unwrap_or(0.0),
            y: lenient_f64(raw.get("y")).unwrap_or(0.0),
            color: non_empty_str(raw.get("color")).map(str::to_string),
            label: non_empty_str(raw.get("label")).map(str::to_string),
        });
    }
    circles
}

/// Accepts `[x, y]` or `{"x": .., "y": ..}`; anything else is the origin
fn parse_point(value: &Value) -> Point {
    match value {
        Value::Array(items) if items.len() >= 2 => Point::new(
            lenient_f64(items.first()).unwrap_or(0.0),
            lenient_f64(items.get(1)).unwrap_or(0.0),
        ),
        Value::Object(map) => Point::new(
            lenient_f64(map.get("x")).unwrap_or(0.0),
            lenient_f64(map.get("y")).unwrap_or(0.0),
        ),
        _ => Point::default(),
    }
}

fn parse_board(raw: &Map<String, Value>) -> Board {
    let polygon = match raw.get("polygon") {
        Some(Value::Array(points)) => points.iter().map(parse_point).collect(),
        _ => Vec::new(),
    };
    Board::new(
        raw.get("description")
            .and_then(Value::as_str)
            .unwrap_or_default(),
        polygon,
        raw.get("orientation").and_then(Value::as_f64).unwrap_or(0.0),
    )
}

fn parse_pan(value: &Value) -> Option<Pan> {
    let map = value.as_object()?;
    Some(Pan {
        x: lenient_f64(map.get("x")).unwrap_or(0.0),
        y: lenient_f64(map.get("y")).unwrap_or(0.0),
    })
}

#[derive(Serialize)]
struct BoardDocument<'a> {
    description: &'a str,
    polygon: Vec<[f64; 2]>,
    orientation: f64,
}

#[derive(Serialize)]
struct LayoutDocument<'a> {
    placements: &'a [Placement],
    circles: &'a [GuideCircle],
    board: BoardDocument<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    zoom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pan: Option<Pan>,
}

impl<'a> From<&'a Layout> for LayoutDocument<'a> {
    fn from(layout: &'a Layout) -> Self {
        Self {
            placements: &layout.placements,
            circles: &layout.circles,
            board: BoardDocument {
                description: &layout.board.description,
                polygon: layout.board.polygon.iter().map(|p| [p.x, p.y]).collect(),
                orientation: layout.board.orientation,
            },
            zoom: layout.zoom,
            pan: layout.pan,
        }
    }
}

/// Serialize a layout to pretty-printed JSON
pub fn layout_to_json(layout: &Layout) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&LayoutDocument::from(layout))
}
