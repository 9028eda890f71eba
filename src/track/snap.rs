//! Snap solver
//!
//! Searches every endpoint pair between a placement and its neighbours for
//! the rigid transform that lands one of the placement's endpoints exactly
//! on a neighbouring endpoint. The search only reads placement state.

use std::f64::consts::PI;

use crate::catalog::Catalog;

use super::angle::{normalize_degrees, normalize_radians, normalize_rotation};
use super::config::PlannerConfig;
use super::connectivity::connected;
use super::endpoints::{placement_endpoints, Endpoint};
use super::types::{Placement, Point};

/// Ties closer than this are treated as equal
const TIE_EPSILON: f64 = 1e-6;

/// Rigid transform that snaps a placement onto a neighbour.
///
/// Apply it by rotating about the placement's own position, then translating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTransform {
    /// Rotation in degrees, in `(-180, 180]`
    pub d_rotation_deg: f64,
    pub dx: f64,
    pub dy: f64,
}

/// A validated candidate with the metrics used to rank it
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    transform: SnapTransform,
}

impl Candidate {
    fn beats(&self, best: &Candidate) -> bool {
        if self.distance < best.distance - TIE_EPSILON {
            return true;
        }
        (self.distance - best.distance).abs() < TIE_EPSILON
            && self.transform.d_rotation_deg.abs()
                < best.transform.d_rotation_deg.abs() - TIE_EPSILON
    }
}

/// Build the transform that moves `endpoint` onto `target` with the given
/// tangent, or `None` if the result would not count as a join.
fn candidate_for(
    placement: &Placement,
    endpoint: &Endpoint,
    target: &Endpoint,
    desired_tangent: f64,
    config: &PlannerConfig,
) -> Option<SnapTransform> {
    let d_rotation_rad = normalize_radians(desired_tangent - endpoint.tangent);
    let d_rotation_deg = normalize_degrees(d_rotation_rad.to_degrees());
    let new_rotation = normalize_rotation(placement.rotation + d_rotation_deg).to_radians();

    let rotated_local = endpoint.local_position.rotated(new_rotation);
    let new_origin = target.position - rotated_local;

    let moved = Endpoint {
        position: target.position,
        tangent: normalize_radians(endpoint.local_tangent + new_rotation),
        radial: normalize_radians(rotated_local.angle()),
        local_position: endpoint.local_position,
        local_tangent: endpoint.local_tangent,
    };
    if !connected(&moved, target, &config.tolerance) {
        return None;
    }

    Some(SnapTransform {
        d_rotation_deg,
        dx: new_origin.x - placement.x,
        dy: new_origin.y - placement.y,
    })
}

/// Find the best transform joining `placement` to one of `others`.
///
/// Entries of `others` sharing the placement's id are skipped, as are inert
/// placements. Candidates are ranked by the current distance between the
/// endpoint pair, then by the smallest rotation. Returns `None` when no
/// endpoint pair within the snap distance yields a valid join.
pub fn find_best_snap_transform(
    placement: &Placement,
    others: &[Placement],
    catalog: &dyn Catalog,
    config: &PlannerConfig,
) -> Option<SnapTransform> {
    let endpoints = placement_endpoints(placement, catalog)?;
    let neighbours: Vec<[Endpoint; 2]> = others
        .iter()
        .filter(|other| other.id != placement.id)
        .filter_map(|other| placement_endpoints(other, catalog))
        .collect();

    let mut best: Option<Candidate> = None;
    for endpoint in &endpoints {
        for target in neighbours.iter().flatten() {
            let distance = endpoint.position.distance_to(target.position);
            if distance > config.snap_distance_mm {
                continue;
            }
            let desired = [
                normalize_radians(target.tangent + PI),
                normalize_radians(target.tangent),
            ];
            for desired_tangent in desired {
                let Some(transform) =
                    candidate_for(placement, endpoint, target, desired_tangent, config)
                else {
                    continue;
                };
                let candidate = Candidate {
                    distance,
                    transform,
                };
                if best.as_ref().map_or(true, |b| candidate.beats(b)) {
                    best = Some(candidate);
                }
            }
        }
    }

    match &best {
        Some(b) => log::debug!(
            "snap for '{}': rotate {:.3}°, move ({:.3}, {:.3}) over {:.3} mm",
            placement.id,
            b.transform.d_rotation_deg,
            b.transform.dx,
            b.transform.dy,
            b.distance
        ),
        None => log::debug!("snap for '{}': no candidate in range", placement.id),
    }
    best.map(|b| b.transform)
}

/// World position of the endpoint nearest to `point`
pub fn nearest_endpoint(endpoints: &[Endpoint; 2], point: Point) -> Endpoint {
    if endpoints[1].position.distance_to(point) < endpoints[0].position.distance_to(point) {
        endpoints[1]
    } else {
        endpoints[0]
    }
}
