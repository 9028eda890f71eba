//! Connection endpoints of placed pieces
//!
//! Every resolvable placement has exactly two endpoints. Index 0 is the
//! "start" and index 1 the "end"; the order never depends on rotation so
//! solver results are reproducible.
//!
//! Straights are centred on the placement origin. Curves are laid out around
//! the placement origin as the centre of their circle, symmetric about the
//! local +x axis.

use std::f64::consts::PI;

use crate::catalog::{Catalog, CatalogEntry, PieceShape};

use super::angle::normalize_radians;
use super::types::{Placement, Point};

/// A connection point in world and local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    /// World position (board frame, mm)
    pub position: Point,
    /// World tangent angle in `(-π, π]`
    pub tangent: f64,
    /// World angle of the local position vector in `(-π, π]`
    pub radial: f64,
    /// Position relative to the placement origin, before rotation
    pub local_position: Point,
    /// Tangent angle before rotation
    pub local_tangent: f64,
}

impl Endpoint {
    /// Place a local endpoint into the world
    fn from_local(local_position: Point, local_tangent: f64, origin: Point, rotation: f64) -> Self {
        let rotated = local_position.rotated(rotation);
        Self {
            position: origin + rotated,
            tangent: normalize_radians(local_tangent + rotation),
            radial: normalize_radians(local_position.angle() + rotation),
            local_position,
            local_tangent,
        }
    }
}

/// Compute the two world-space endpoints of a placement.
///
/// Returns `None` when the shape has no usable geometry (non-positive
/// length, radius or angle).
pub fn compute_endpoints(placement: &Placement, entry: &CatalogEntry) -> Option<[Endpoint; 2]> {
    let origin = placement.position();
    let rotation = placement.rotation.to_radians();

    match entry.shape {
        PieceShape::Straight { length } => {
            if !(length > 0.0) {
                return None;
            }
            let half = length / 2.0;
            Some([
                Endpoint::from_local(Point::new(half, 0.0), 0.0, origin, rotation),
                Endpoint::from_local(Point::new(-half, 0.0), PI, origin, rotation),
            ])
        }
        PieceShape::Curve { radius, angle } => {
            if !(radius > 0.0 && angle > 0.0) {
                return None;
            }
            let half_theta = angle.to_radians() / 2.0;
            let orientation = if placement.flipped { -1.0 } else { 1.0 };
            let curve_end = |base: f64| {
                let local_angle = base * orientation;
                let (sin_a, cos_a) = local_angle.sin_cos();
                let local_position = Point::new(radius * cos_a, radius * sin_a);
                let tangent = (cos_a * orientation).atan2(-sin_a * orientation);
                Endpoint::from_local(local_position, tangent, origin, rotation)
            };
            Some([curve_end(half_theta), curve_end(-half_theta)])
        }
    }
}

/// Endpoints of a placement resolved through a catalogue.
///
/// Unknown codes are inert and yield `None`.
pub fn placement_endpoints(placement: &Placement, catalog: &dyn Catalog) -> Option<[Endpoint; 2]> {
    let entry = catalog.lookup(&placement.code)?;
    compute_endpoints(placement, entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TrackLibrary;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn assert_point(actual: Point, x: f64, y: f64) {
        assert!(
            approx_eq(actual.x, x) && approx_eq(actual.y, y),
            "expected ({}, {}), got ({}, {})",
            x,
            y,
            actual.x,
            actual.y
        );
    }

    #[test]
    fn test_straight_endpoints_at_origin() {
        let library = TrackLibrary::hornby_oo();
        let p = Placement::new("a", "R600", 0.0, 0.0);
        let [start, end] = placement_endpoints(&p, &library).unwrap();

        assert_point(start.position, 84.0, 0.0);
        assert!(approx_eq(start.tangent, 0.0));
        assert_point(end.position, -84.0, 0.0);
        assert!(approx_eq(end.tangent, PI));
    }

    #[test]
    fn test_straight_rotated_half_turn() {
        let library = TrackLibrary::hornby_oo();
        let p = Placement::new("b", "R600", 168.0, 0.0).with_rotation(180.0);
        let [start, end] = placement_endpoints(&p, &library).unwrap();

        assert_point(start.position, 84.0, 0.0);
        assert!(approx_eq(start.tangent, PI));
        assert_point(end.position, 252.0, 0.0);
        assert!(approx_eq(end.tangent, 0.0));
    }

    #[test]
    fn test_curve_endpoints_unflipped() {
        let entry = CatalogEntry::curve("C90", "Quarter", 90.0, 100.0);
        let p = Placement::new("c", "C90", 0.0, 0.0);
        let [start, end] = compute_endpoints(&p, &entry).unwrap();

        let h = 100.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert_point(start.position, h, h);
        assert_point(end.position, h, -h);
        // Counter-clockwise travel direction at both ends
        assert!(approx_eq(start.tangent, 3.0 * PI / 4.0));
        assert!(approx_eq(end.tangent, PI / 4.0));
        assert!(approx_eq(start.radial, PI / 4.0));
        assert!(approx_eq(end.radial, -PI / 4.0));
    }

    #[test]
    fn test_curve_flip_mirrors_endpoints() {
        let entry = CatalogEntry::curve("C90", "Quarter", 90.0, 100.0);
        let p = Placement::new("c", "C90", 0.0, 0.0).with_flipped(true);
        let [start, end] = compute_endpoints(&p, &entry).unwrap();

        let h = 100.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert_point(start.position, h, -h);
        assert_point(end.position, h, h);
        assert!(approx_eq(start.tangent, -3.0 * PI / 4.0));
    }

    #[test]
    fn test_degenerate_shapes_have_no_endpoints() {
        let p = Placement::new("d", "X", 0.0, 0.0);
        let zero_radius = CatalogEntry::curve("X", "bad", 45.0, 0.0);
        let zero_angle = CatalogEntry::curve("X", "bad", 0.0, 371.0);
        let zero_length = CatalogEntry::straight("X", "bad", 0.0);
        let nan_length = CatalogEntry::straight("X", "bad", f64::NAN);

        assert!(compute_endpoints(&p, &zero_radius).is_none());
        assert!(compute_endpoints(&p, &zero_angle).is_none());
        assert!(compute_endpoints(&p, &zero_length).is_none());
        assert!(compute_endpoints(&p, &nan_length).is_none());
    }

    #[test]
    fn test_unknown_code_is_inert() {
        let library = TrackLibrary::hornby_oo();
        let p = Placement::new("e", "NOPE", 0.0, 0.0);
        assert!(placement_endpoints(&p, &library).is_none());
    }

    #[test]
    fn test_straight_ignores_flip() {
        let library = TrackLibrary::hornby_oo();
        let plain = Placement::new("f", "R601", 10.0, 20.0).with_rotation(30.0);
        let flipped = plain.clone().with_flipped(true);
        assert_eq!(
            placement_endpoints(&plain, &library),
            placement_endpoints(&flipped, &library)
        );
    }
}
