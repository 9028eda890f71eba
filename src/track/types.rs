//! Core types for the track plan

use serde::Serialize;

use super::angle::normalize_rotation;

/// A 2D point in the board frame (millimetres)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle of the vector from the origin to this point
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Rotate around the origin by `radians`
    pub fn rotated(&self, radians: f64) -> Point {
        let (sin_a, cos_a) = radians.sin_cos();
        Point {
            x: self.x * cos_a - self.y * sin_a,
            y: self.x * sin_a + self.y * cos_a,
        }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box containing every point, or `None` for an empty slice
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }
}

/// One placed instance of a catalogue piece
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub id: String,
    pub code: String,
    pub x: f64,
    pub y: f64,
    /// Degrees, always in `[0, 360)`
    pub rotation: f64,
    pub flipped: bool,
}

impl Placement {
    pub fn new(id: impl Into<String>, code: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            x,
            y,
            rotation: 0.0,
            flipped: false,
        }
    }

    /// Set the rotation, normalized into `[0, 360)`
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = normalize_rotation(degrees);
        self
    }

    pub fn with_flipped(mut self, flipped: bool) -> Self {
        self.flipped = flipped;
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }
}

/// A decorative planning circle drawn over the board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideCircle {
    pub id: String,
    pub radius: f64,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GuideCircle {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }
}

/// The baseboard outline
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub description: String,
    pub polygon: Vec<Point>,
    /// Degrees, always in `[0, 360)`
    pub orientation: f64,
}

impl Board {
    /// Build a board, substituting the default outline for an empty polygon
    pub fn new(description: impl Into<String>, polygon: Vec<Point>, orientation: f64) -> Self {
        let polygon = if polygon.is_empty() {
            default_polygon()
        } else {
            polygon
        };
        Self {
            description: description.into(),
            polygon,
            orientation: normalize_rotation(orientation),
        }
    }

    /// Bounding box of the outline
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(&self.polygon)
            .unwrap_or_else(|| BoundingBox::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Center of the outline's bounding box
    pub fn center(&self) -> Point {
        self.bounds().center()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new("2400 x 1200 mm rectangle", default_polygon(), 0.0)
    }
}

/// 2400 x 1200 mm rectangle
pub fn default_polygon() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(2400.0, 0.0),
        Point::new(2400.0, 1200.0),
        Point::new(0.0, 1200.0),
    ]
}

/// View pan offset carried through load/save untouched
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Pan {
    pub x: f64,
    pub y: f64,
}

/// The persisted plan document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub placements: Vec<Placement>,
    pub circles: Vec<GuideCircle>,
    pub board: Board,
    pub zoom: Option<f64>,
    pub pan: Option<Pan>,
}

impl Layout {
    pub fn placement(&self, id: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id == id)
    }

    pub fn placement_mut(&mut self, id: &str) -> Option<&mut Placement> {
        self.placements.iter_mut().find(|p| p.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.placements.iter().any(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_polygon_falls_back_to_default() {
        let board = Board::new("", vec![], 0.0);
        assert_eq!(board.polygon, default_polygon());
        assert_eq!(board.center(), Point::new(1200.0, 600.0));
    }

    #[test]
    fn test_board_center_uses_bounding_box() {
        let l_shape = vec![
            Point::new(0.0, 0.0),
            Point::new(2000.0, 0.0),
            Point::new(2000.0, 600.0),
            Point::new(600.0, 600.0),
            Point::new(600.0, 1400.0),
            Point::new(0.0, 1400.0),
        ];
        let board = Board::new("L", l_shape, -90.0);
        assert_eq!(board.center(), Point::new(1000.0, 700.0));
        assert_eq!(board.orientation, 270.0);
    }

    #[test]
    fn test_placement_rotation_is_normalized() {
        let p = Placement::new("a", "R600", 0.0, 0.0).with_rotation(-45.0);
        assert_eq!(p.rotation, 315.0);
    }

    #[test]
    fn test_point_rotation_quarter_turn() {
        let p = Point::new(1.0, 0.0).rotated(std::f64::consts::FRAC_PI_2);
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
    }
}
