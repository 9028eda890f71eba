//! Endpoint joins and connected sections
//!
//! Connectivity is never cached. Each query recomputes endpoints from the
//! current placement state, which is O(n² · 4) endpoint comparisons per
//! traversal and fine at tens of pieces.

use std::collections::{HashSet, VecDeque};
use std::f64::consts::PI;

use crate::catalog::Catalog;

use super::angle::normalize_radians;
use super::config::Tolerance;
use super::endpoints::{placement_endpoints, Endpoint};
use super::types::Placement;

/// Decide whether two endpoints are joined.
///
/// The positions must lie within the distance tolerance, and either the
/// tangents must be anti-parallel or the radial angles aligned. The radial
/// test catches curve ends sharing a circle whose tangents are not opposed.
pub fn connected(a: &Endpoint, b: &Endpoint, tolerance: &Tolerance) -> bool {
    if a.position.distance_to(b.position) > tolerance.distance_mm {
        return false;
    }
    let tangent_diff = normalize_radians(a.tangent - b.tangent).abs();
    let radial_diff = normalize_radians(a.radial - b.radial).abs();
    let tangents_opposed = (tangent_diff - PI).abs() < tolerance.angle_rad;
    let radials_aligned = radial_diff < tolerance.angle_rad;
    tangents_opposed || radials_aligned
}

/// True if any endpoint pair of the two sets is connected
fn any_joined(a: &[Endpoint; 2], b: &[Endpoint; 2], tolerance: &Tolerance) -> bool {
    a.iter()
        .any(|ea| b.iter().any(|eb| connected(ea, eb, tolerance)))
}

/// Placements transitively connected to an origin placement
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    /// Member ids in breadth-first visit order, origin first
    pub ids: Vec<String>,
}

impl Section {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|member| member == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Breadth-first search for every placement reachable from `origin_id`.
///
/// An origin missing from `placements` yields an empty section. An inert
/// origin (unknown code or degenerate shape) yields a section of itself.
pub fn connected_component(
    origin_id: &str,
    placements: &[Placement],
    catalog: &dyn Catalog,
    tolerance: &Tolerance,
) -> Section {
    let Some(origin) = placements.iter().position(|p| p.id == origin_id) else {
        return Section::default();
    };

    let endpoints: Vec<Option<[Endpoint; 2]>> = placements
        .iter()
        .map(|p| placement_endpoints(p, catalog))
        .collect();

    let mut visited = vec![false; placements.len()];
    let mut queue = VecDeque::from([origin]);
    visited[origin] = true;
    let mut section = Section::default();

    while let Some(current) = queue.pop_front() {
        section.ids.push(placements[current].id.clone());
        let Some(current_ends) = &endpoints[current] else {
            continue;
        };
        for (index, other) in endpoints.iter().enumerate() {
            if visited[index] {
                continue;
            }
            if let Some(other_ends) = other {
                if any_joined(current_ends, other_ends, tolerance) {
                    visited[index] = true;
                    queue.push_back(index);
                }
            }
        }
    }

    log::debug!(
        "section from '{}' has {} member(s)",
        origin_id,
        section.len()
    );
    section
}

/// Partition every placement into sections, in collection order
pub fn sections(
    placements: &[Placement],
    catalog: &dyn Catalog,
    tolerance: &Tolerance,
) -> Vec<Section> {
    let mut assigned: HashSet<String> = HashSet::new();
    let mut result = Vec::new();
    for placement in placements {
        if assigned.contains(&placement.id) {
            continue;
        }
        let section = connected_component(&placement.id, placements, catalog, tolerance);
        assigned.extend(section.ids.iter().cloned());
        result.push(section);
    }
    result
}
