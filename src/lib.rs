//! Track Planner - geometry core for 2D model-railway track plans
//!
//! This library resolves catalogue pieces into endpoint geometry, finds the
//! connected sections of a plan, solves snap transforms between pieces and
//! applies rigid motions to placements. A [`Planner`] owns a plan and
//! exposes the editing operations an interactive front end needs.
//!
//! # Example
//!
//! ```rust
//! use track_planner::{Layout, Placement, Planner};
//!
//! let mut layout = Layout::default();
//! layout.placements.push(Placement::new("a", "R600", 0.0, 0.0));
//! layout.placements.push(Placement::new("b", "R600", 170.0, 2.0));
//!
//! let mut planner = Planner::with_hornby(layout);
//! planner.select("b");
//! assert!(planner.snap_selected().is_some());
//! assert_eq!(planner.section_of("a").len(), 2);
//! ```

pub mod catalog;
pub mod error;
pub mod persist;
pub mod planner;
pub mod track;

pub use catalog::{Catalog, CatalogEntry, CatalogError, PieceKind, PieceShape, TrackLibrary};
pub use error::LoadError;
pub use persist::{layout_to_json, load_layout, parse_layout};
pub use planner::{Inventory, Planner};
pub use track::{
    Board, Endpoint, GridSnap, GuideCircle, Layout, Placement, PlannerConfig, Point, Section,
    SnapTransform, Tolerance,
};
