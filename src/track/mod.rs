//! Geometric core of the track planner
//!
//! This module computes endpoints of placed pieces, decides which pieces are
//! joined, solves snap transforms and applies rigid motions to placements.

pub mod angle;
pub mod apply;
pub mod config;
pub mod connectivity;
pub mod endpoints;
pub mod snap;
pub mod transform;
pub mod types;

pub use apply::{apply_rigid_transform, rotate_board, snap_to_grid, GridSnap};
pub use config::{ConfigError, PlannerConfig, Tolerance};
pub use connectivity::{connected, connected_component, sections, Section};
pub use endpoints::{compute_endpoints, placement_endpoints, Endpoint};
pub use snap::{find_best_snap_transform, SnapTransform};
pub use types::*;
