//! Mutating transforms over placement collections
//!
//! These are the only functions that move placements. They keep every
//! rotation in `[0, 360)`.

use super::angle::{normalize_degrees, normalize_rotation};
use super::transform::{RigidTransform, RotationTransform};
use super::types::{Layout, Placement, Point};

/// Rotate the listed placements about `pivot`, then shift each by `(dx, dy)`.
///
/// Ids missing from the collection are ignored. The translation is the same
/// vector for every member; it is not recomputed from rotated positions.
/// Non-finite deltas leave every placement untouched.
pub fn apply_rigid_transform(
    placements: &mut [Placement],
    ids: &[String],
    pivot: Point,
    d_rotation_deg: f64,
    dx: f64,
    dy: f64,
) {
    if !(d_rotation_deg.is_finite() && dx.is_finite() && dy.is_finite()) {
        log::debug!("ignoring non-finite transform ({}, {}, {})", d_rotation_deg, dx, dy);
        return;
    }
    let transform = RigidTransform::new(pivot, d_rotation_deg, dx, dy);
    for placement in placements.iter_mut().filter(|p| ids.contains(&p.id)) {
        placement.set_position(transform.transform_point(placement.position()));
        if d_rotation_deg != 0.0 {
            placement.rotation = normalize_rotation(placement.rotation + d_rotation_deg);
        }
    }
}

/// Deltas produced by a grid snap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSnap {
    pub target: Point,
    pub target_rotation: f64,
    pub dx: f64,
    pub dy: f64,
    /// In `(-180, 180]`
    pub d_rotation_deg: f64,
}

/// Nearest multiple of `step`; a non-positive step leaves the value alone
fn round_to_step(value: f64, step: f64) -> f64 {
    if step > 0.0 {
        (value / step).round() * step
    } else {
        value
    }
}

/// Compute the grid-snap deltas for a single placement
pub fn grid_snap_for(placement: &Placement, grid_mm: f64, angle_step_deg: f64) -> GridSnap {
    let target = Point::new(
        round_to_step(placement.x, grid_mm),
        round_to_step(placement.y, grid_mm),
    );
    let target_rotation = normalize_rotation(round_to_step(placement.rotation, angle_step_deg));
    GridSnap {
        target,
        target_rotation,
        dx: target.x - placement.x,
        dy: target.y - placement.y,
        d_rotation_deg: normalize_degrees(target_rotation - placement.rotation),
    }
}

/// Snap `pivot_id` onto the grid, carrying the rest of `ids` along rigidly.
///
/// The pivot's pre-snap position is the rotation centre. Afterwards the
/// pivot's rotation is set to the exact rounded value.
pub fn snap_to_grid(
    placements: &mut [Placement],
    pivot_id: &str,
    ids: &[String],
    grid_mm: f64,
    angle_step_deg: f64,
) -> Option<GridSnap> {
    let pivot = placements.iter().find(|p| p.id == pivot_id)?;
    let snap = grid_snap_for(pivot, grid_mm, angle_step_deg);
    let pivot_point = pivot.position();

    apply_rigid_transform(
        placements,
        ids,
        pivot_point,
        snap.d_rotation_deg,
        snap.dx,
        snap.dy,
    );
    if let Some(p) = placements.iter_mut().find(|p| p.id == pivot_id) {
        p.rotation = snap.target_rotation;
    }
    Some(snap)
}

/// Rotate the whole scene about the board centre.
///
/// Polygon, placements and guide circles turn together; placement
/// rotations and the board orientation advance by the same angle.
/// Non-finite angles are ignored.
pub fn rotate_board(layout: &mut Layout, delta_degrees: f64) {
    if !delta_degrees.is_finite() {
        return;
    }
    let rotation = RotationTransform::new(delta_degrees, layout.board.center());

    for vertex in layout.board.polygon.iter_mut() {
        *vertex = rotation.transform_point(*vertex);
    }
    for placement in layout.placements.iter_mut() {
        placement.set_position(rotation.transform_point(placement.position()));
        placement.rotation = normalize_rotation(placement.rotation + delta_degrees);
    }
    for circle in layout.circles.iter_mut() {
        circle.set_position(rotation.transform_point(circle.position()));
    }
    layout.board.orientation = normalize_rotation(layout.board.orientation + delta_degrees);
}
