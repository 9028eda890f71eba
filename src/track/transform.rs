//! Rigid transforms in the board frame.
//!
//! ## Rotation Convention
//!
//! Angles are in degrees and positive angles rotate from +x towards +y. With
//! the board drawn Y-down this is clockwise on screen.
//!
//! ```text
//! x' = cx + (x - cx) * cos(θ) - (y - cy) * sin(θ)
//! y' = cy + (x - cx) * sin(θ) + (y - cy) * cos(θ)
//! ```
//!
//! ## Composition
//!
//! A [`RigidTransform`] rotates about its pivot first and then adds a single
//! translation vector. Every member of a moved section receives the same
//! translation, regardless of where the rotation put it.

use super::types::Point;

/// A 2D rotation around a center point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTransform {
    /// Rotation angle in degrees
    pub angle_degrees: f64,
    /// Center point of rotation
    pub center: Point,
}

impl RotationTransform {
    pub fn new(angle_degrees: f64, center: Point) -> Self {
        Self {
            angle_degrees,
            center,
        }
    }

    /// True for an exact zero angle; identity rotations leave points bit-for-bit unchanged.
    pub fn is_identity(&self) -> bool {
        self.angle_degrees == 0.0
    }

    /// Rotate a point around the center
    pub fn transform_point(&self, point: Point) -> Point {
        if self.is_identity() {
            return point;
        }
        self.center + (point - self.center).rotated(self.angle_degrees.to_radians())
    }
}

/// Rotation about a pivot followed by a translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub rotation: RotationTransform,
    pub dx: f64,
    pub dy: f64,
}

impl RigidTransform {
    pub fn new(pivot: Point, d_rotation_deg: f64, dx: f64, dy: f64) -> Self {
        Self {
            rotation: RotationTransform::new(d_rotation_deg, pivot),
            dx,
            dy,
        }
    }

    /// Rotate about the pivot, then translate
    pub fn transform_point(&self, point: Point) -> Point {
        let rotated = self.rotation.transform_point(point);
        Point::new(rotated.x + self.dx, rotated.y + self.dy)
    }
}
