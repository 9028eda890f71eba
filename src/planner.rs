//! The planner owns the plan and is the only thing that mutates it.
//!
//! Input handlers (pointer events, buttons, CLI commands) call methods here
//! instead of touching placements directly. Each call runs to completion;
//! the only state carried between calls is the selection, the section-move
//! flag and an in-progress drag.

use std::collections::{BTreeMap, HashMap};

use crate::catalog::{Catalog, TrackLibrary};
use crate::track::{
    apply_rigid_transform, connected_component, find_best_snap_transform, rotate_board,
    sections, snap_to_grid, GridSnap, GuideCircle, Layout, Placement, PlannerConfig, Point,
    Section, SnapTransform,
};

/// Start-of-drag snapshot
#[derive(Debug, Clone)]
struct DragGesture {
    /// Piece under the pointer
    anchor_id: String,
    /// Pointer position minus the anchor's position at pointer-down
    offset: Point,
    /// Positions of every moving piece at pointer-down, in move order
    start: Vec<(String, Point)>,
}

/// Per-code piece counts
pub type Inventory = BTreeMap<String, usize>;

/// Owner of a layout, its catalogue and the interaction state
pub struct Planner<C: Catalog = TrackLibrary> {
    layout: Layout,
    catalog: C,
    config: PlannerConfig,
    selected: Option<String>,
    section_mode: bool,
    drag: Option<DragGesture>,
    next_piece: usize,
    next_circle: usize,
}

impl Planner<TrackLibrary> {
    /// Planner over the built-in Hornby OO library
    pub fn with_hornby(layout: Layout) -> Self {
        Self::new(layout, TrackLibrary::hornby_oo(), PlannerConfig::default())
    }
}

impl<C: Catalog> Planner<C> {
    /// Wrap a loaded layout. The last placement becomes the selection.
    pub fn new(layout: Layout, catalog: C, config: PlannerConfig) -> Self {
        let selected = layout.placements.last().map(|p| p.id.clone());
        let next_piece = layout.placements.len();
        let next_circle = layout.circles.len();
        Self {
            layout,
            catalog,
            config,
            selected,
            section_mode: false,
            drag: None,
            next_piece,
            next_circle,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn placements(&self) -> &[Placement] {
        &self.layout.placements
    }

    pub fn placement(&self, id: &str) -> Option<&Placement> {
        self.layout.placement(id)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a placement; unknown ids clear the selection
    pub fn select(&mut self, id: &str) -> bool {
        if self.layout.contains_id(id) {
            self.selected = Some(id.to_string());
            true
        } else {
            self.selected = None;
            false
        }
    }

    pub fn section_mode(&self) -> bool {
        self.section_mode
    }

    pub fn set_section_mode(&mut self, enabled: bool) {
        self.section_mode = enabled;
        if !enabled {
            self.drag = None;
        }
    }

    pub fn toggle_section_mode(&mut self) -> bool {
        self.set_section_mode(!self.section_mode);
        self.section_mode
    }

    /// Add a piece at the board centre and select it.
    ///
    /// Returns the new id, or `None` if the code is not in the catalogue.
    pub fn add_piece(&mut self, code: &str) -> Option<String> {
        self.catalog.lookup(code)?;
        let id = loop {
            let candidate = format!("placement-{}", self.next_piece);
            self.next_piece += 1;
            if !self.layout.contains_id(&candidate) {
                break candidate;
            }
        };
        let centre = self.layout.board.center();
        self.layout
            .placements
            .push(Placement::new(id.clone(), code, centre.x, centre.y));
        self.selected = Some(id.clone());
        self.drag = None;
        log::debug!("added '{}' as '{}'", code, id);
        Some(id)
    }

    /// Remove a piece; the selection moves to the last remaining placement
    pub fn remove_piece(&mut self, id: &str) -> Option<Placement> {
        let index = self.layout.placements.iter().position(|p| p.id == id)?;
        let removed = self.layout.placements.remove(index);
        self.selected = self.layout.placements.last().map(|p| p.id.clone());
        self.drag = None;
        Some(removed)
    }

    /// The section containing `id`, recomputed from current positions
    pub fn section_of(&self, id: &str) -> Section {
        connected_component(
            id,
            &self.layout.placements,
            &self.catalog,
            &self.config.tolerance,
        )
    }

    /// Every section of the plan
    pub fn sections(&self) -> Vec<Section> {
        sections(&self.layout.placements, &self.catalog, &self.config.tolerance)
    }

    /// Ids moved by an operation on `id`: itself, or its whole section
    pub fn active_ids(&self, id: &str) -> Vec<String> {
        if !self.layout.contains_id(id) {
            return Vec::new();
        }
        if self.section_mode {
            self.section_of(id).ids
        } else {
            vec![id.to_string()]
        }
    }

    /// Selected placement's id and position
    fn selection_pivot(&self) -> Option<(String, Point)> {
        let id = self.selected.as_deref()?;
        let placement = self.layout.placement(id)?;
        Some((placement.id.clone(), placement.position()))
    }

    /// Rotate and/or shift the active set about the selected piece
    pub fn adjust_selected(&mut self, d_rotation_deg: f64, dx: f64, dy: f64) -> bool {
        let Some((id, pivot)) = self.selection_pivot() else {
            return false;
        };
        let ids = self.active_ids(&id);
        apply_rigid_transform(
            &mut self.layout.placements,
            &ids,
            pivot,
            d_rotation_deg,
            dx,
            dy,
        );
        true
    }

    pub fn rotate_selected(&mut self, d_rotation_deg: f64) -> bool {
        self.adjust_selected(d_rotation_deg, 0.0, 0.0)
    }

    pub fn nudge_selected(&mut self, dx: f64, dy: f64) -> bool {
        self.adjust_selected(0.0, dx, dy)
    }

    /// One configured rotation step; negative `steps` turn the other way
    pub fn rotate_selected_steps(&mut self, steps: i32) -> bool {
        self.rotate_selected(self.config.rotate_step_deg * f64::from(steps))
    }

    /// Nudge by whole configured steps along each axis
    pub fn nudge_selected_steps(&mut self, x_steps: i32, y_steps: i32) -> bool {
        let step = self.config.nudge_mm;
        self.nudge_selected(step * f64::from(x_steps), step * f64::from(y_steps))
    }

    /// Toggle the mirror flag of the selected piece only
    pub fn flip_selected(&mut self) -> bool {
        let Some(id) = self.selected.clone() else {
            return false;
        };
        match self.layout.placement_mut(&id) {
            Some(p) => {
                p.flipped = !p.flipped;
                true
            }
            None => false,
        }
    }

    /// Snap the selection onto the nearest compatible neighbour.
    ///
    /// Pieces moving with the selection are not snap targets.
    pub fn snap_selected(&mut self) -> Option<SnapTransform> {
        let (id, pivot) = self.selection_pivot()?;
        let ids = self.active_ids(&id);
        let others: Vec<Placement> = self
            .layout
            .placements
            .iter()
            .filter(|p| !ids.contains(&p.id))
            .cloned()
            .collect();
        let placement = self.layout.placement(&id)?;
        let snap = find_best_snap_transform(placement, &others, &self.catalog, &self.config)?;
        apply_rigid_transform(
            &mut self.layout.placements,
            &ids,
            pivot,
            snap.d_rotation_deg,
            snap.dx,
            snap.dy,
        );
        Some(snap)
    }

    /// Grid-snap the selection using the configured pitch and angle step
    pub fn snap_selected_to_grid(&mut self) -> Option<GridSnap> {
        let (id, _) = self.selection_pivot()?;
        let ids = self.active_ids(&id);
        snap_to_grid(
            &mut self.layout.placements,
            &id,
            &ids,
            self.config.grid_mm,
            self.config.angle_step_deg,
        )
    }

    /// Pointer-down on a piece: select it and capture the moving set
    pub fn begin_drag(&mut self, id: &str, pointer: Point) -> bool {
        let Some(anchor) = self.layout.placement(id) else {
            return false;
        };
        let offset = pointer - anchor.position();
        let ids = self.active_ids(id);
        let positions: HashMap<&str, Point> = self
            .layout
            .placements
            .iter()
            .map(|p| (p.id.as_str(), p.position()))
            .collect();
        let start = ids
            .iter()
            .filter_map(|member| positions.get(member.as_str()).map(|pos| (member.clone(), *pos)))
            .collect();
        self.selected = Some(id.to_string());
        self.drag = Some(DragGesture {
            anchor_id: id.to_string(),
            offset,
            start,
        });
        true
    }

    /// Pointer-move: every captured piece follows the anchor's displacement
    pub fn drag_to(&mut self, pointer: Point) -> bool {
        let Some(drag) = &self.drag else {
            return false;
        };
        let Some((_, anchor_start)) = drag.start.iter().find(|(id, _)| *id == drag.anchor_id)
        else {
            return false;
        };
        let target = pointer - drag.offset;
        let delta = target - *anchor_start;
        for (id, start) in &drag.start {
            if let Some(p) = self.layout.placements.iter_mut().find(|p| &p.id == id) {
                p.set_position(*start + delta);
            }
        }
        true
    }

    /// Pointer-up: keep the positions and drop the snapshot
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Pointer-cancel: same as pointer-up; there is no rollback
    pub fn cancel_drag(&mut self) -> bool {
        self.end_drag()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Turn the whole board and everything on it about the board centre
    pub fn rotate_board(&mut self, delta_degrees: f64) {
        rotate_board(&mut self.layout, delta_degrees);
    }

    /// Add a planning circle. Non-positive radii are refused.
    pub fn add_guide_circle(&mut self, x: f64, y: f64, radius: f64) -> Option<String> {
        if radius.is_nan() || radius <= 0.0 {
            return None;
        }
        let id = loop {
            let candidate = format!("circle-{}", self.next_circle);
            self.next_circle += 1;
            if !self.layout.circles.iter().any(|c| c.id == candidate) {
                break candidate;
            }
        };
        self.layout.circles.push(GuideCircle {
            id: id.clone(),
            radius,
            x,
            y,
            color: None,
            label: Some(format!("Radius {:.0} mm", radius)),
        });
        Some(id)
    }

    pub fn remove_guide_circle(&mut self, id: &str) -> Option<GuideCircle> {
        let index = self.layout.circles.iter().position(|c| c.id == id)?;
        Some(self.layout.circles.remove(index))
    }

    /// How many of each piece code are placed
    pub fn inventory(&self) -> Inventory {
        let mut counts = Inventory::new();
        for placement in &self.layout.placements {
            *counts.entry(placement.code.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Total centre-line length of every resolvable piece
    pub fn total_run_length_mm(&self) -> f64 {
        self.layout
            .placements
            .iter()
            .filter_map(|p| self.catalog.lookup(&p.code))
            .map(|entry| entry.display_length())
            .sum()
    }

    /// Placements whose code is not in the catalogue
    pub fn unresolved(&self) -> Vec<&Placement> {
        self.layout
            .placements
            .iter()
            .filter(|p| self.catalog.lookup(&p.code).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn straight_run() -> Planner {
        let mut layout = Layout::default();
        layout.placements = vec![
            Placement::new("a", "R600", 0.0, 0.0),
            Placement::new("b", "R600", 168.0, 0.0),
            Placement::new("c", "R600", 900.0, 0.0),
        ];
        Planner::with_hornby(layout)
    }

    #[test]
    fn test_add_piece_defaults() {
        let mut planner = Planner::with_hornby(Layout::default());
        let id = planner.add_piece("R600").unwrap();
        assert_eq!(id, "placement-0");
        let p = planner.placement(&id).unwrap();
        assert_eq!(p.position(), Point::new(1200.0, 600.0));
        assert_eq!(p.rotation, 0.0);
        assert!(!p.flipped);
        assert_eq!(planner.selected(), Some("placement-0"));
    }

    #[test]
    fn test_add_piece_unknown_code() {
        let mut planner = Planner::with_hornby(Layout::default());
        assert!(planner.add_piece("NOPE").is_none());
        assert!(planner.placements().is_empty());
    }

    #[test]
    fn test_add_piece_skips_taken_ids() {
        let mut layout = Layout::default();
        layout.placements = vec![Placement::new("placement-1", "R600", 0.0, 0.0)];
        let mut planner = Planner::with_hornby(layout);
        assert_eq!(planner.add_piece("R600").as_deref(), Some("placement-2"));
    }

    #[test]
    fn test_remove_piece_moves_selection() {
        let mut planner = straight_run();
        planner.select("a");
        let removed = planner.remove_piece("c").unwrap();
        assert_eq!(removed.id, "c");
        assert_eq!(planner.selected(), Some("b"));
        assert!(planner.remove_piece("c").is_none());
    }

    #[test]
    fn test_active_ids_follow_section_mode() {
        let mut planner = straight_run();
        assert_eq!(planner.active_ids("a"), vec!["a"]);
        planner.set_section_mode(true);
        assert_eq!(planner.active_ids("a"), vec!["a", "b"]);
        assert!(planner.active_ids("missing").is_empty());
    }

    #[test]
    fn test_rotate_section_about_selection() {
        let mut planner = straight_run();
        planner.set_section_mode(true);
        planner.select("a");
        assert!(planner.rotate_selected(90.0));

        let a = planner.placement("a").unwrap();
        let b = planner.placement("b").unwrap();
        assert_eq!(a.position(), Point::new(0.0, 0.0));
        assert_eq!(a.rotation, 90.0);
        assert!(approx_eq(b.x, 0.0));
        assert!(approx_eq(b.y, 168.0));
        // Still joined after a rigid rotation
        assert_eq!(planner.section_of("a").ids, vec!["a", "b"]);
        // c was not part of the section
        assert_eq!(planner.placement("c").unwrap().rotation, 0.0);
    }

    #[test]
    fn test_nudge_and_flip_single_piece() {
        let mut planner = straight_run();
        planner.select("b");
        assert!(planner.nudge_selected(10.0, -10.0));
        assert!(planner.flip_selected());
        let b = planner.placement("b").unwrap();
        assert_eq!(b.position(), Point::new(178.0, -10.0));
        assert!(b.flipped);
        assert_eq!(planner.placement("a").unwrap().position(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_rotate_steps_use_config() {
        let mut planner = straight_run();
        planner.select("c");
        planner.rotate_selected_steps(-1);
        assert_eq!(planner.placement("c").unwrap().rotation, 345.0);
        planner.nudge_selected_steps(0, 2);
        assert_eq!(planner.placement("c").unwrap().position(), Point::new(900.0, 20.0));
    }

    #[test]
    fn test_non_finite_adjustments_leave_plan_alone() {
        let mut planner = straight_run();
        planner.select("b");
        let before = planner.layout().clone();
        planner.rotate_selected(f64::NAN);
        planner.nudge_selected(f64::INFINITY, 0.0);
        assert_eq!(planner.layout(), &before);
    }

    #[test]
    fn test_operations_without_selection() {
        let mut planner = straight_run();
        planner.select("nobody");
        assert!(!planner.rotate_selected(15.0));
        assert!(!planner.flip_selected());
        assert!(planner.snap_selected().is_none());
        assert!(planner.snap_selected_to_grid().is_none());
    }

    #[test]
    fn test_snap_selected_joins_neighbour() {
        let mut layout = Layout::default();
        layout.placements = vec![
            Placement::new("a", "R600", 0.0, 0.0),
            Placement::new("b", "R600", 175.0, 4.0).with_rotation(3.0),
        ];
        let mut planner = Planner::with_hornby(layout);
        planner.select("b");
        let snap = planner.snap_selected().unwrap();
        assert!(approx_eq(snap.d_rotation_deg, -3.0));

        let b = planner.placement("b").unwrap();
        assert!(approx_eq(b.x, 168.0));
        assert!(approx_eq(b.y, 0.0));
        assert!(approx_eq(b.rotation, 0.0));
        assert_eq!(planner.section_of("a").len(), 2);
    }

    #[test]
    fn test_snap_in_section_mode_skips_own_section() {
        let mut layout = Layout::default();
        layout.placements = vec![
            Placement::new("a", "R600", 0.0, 0.0),
            Placement::new("b", "R600", 168.0, 0.0),
            Placement::new("c", "R600", 350.0, 0.0),
        ];
        let mut planner = Planner::with_hornby(layout);
        planner.set_section_mode(true);
        planner.select("c");
        // c is alone; it snaps onto b's free end
        let snap = planner.snap_selected().unwrap();
        assert!(approx_eq(snap.dx, -14.0));
        assert_eq!(planner.section_of("a").len(), 3);

        // Now the whole run is one section and has nothing else to snap to
        planner.select("b");
        assert!(planner.snap_selected().is_none());
    }

    #[test]
    fn test_grid_snap_selected() {
        let mut layout = Layout::default();
        layout.placements = vec![Placement::new("a", "R600", 103.0, 57.0).with_rotation(7.0)];
        let mut planner = Planner::with_hornby(layout);
        let snap = planner.snap_selected_to_grid().unwrap();
        assert!(approx_eq(snap.d_rotation_deg, -7.0));
        let a = planner.placement("a").unwrap();
        assert!(approx_eq(a.x, 100.0));
        assert!(approx_eq(a.y, 60.0));
        assert_eq!(a.rotation, 0.0);
    }

    #[test]
    fn test_drag_moves_section_together() {
        let mut planner = straight_run();
        planner.set_section_mode(true);
        assert!(planner.begin_drag("b", Point::new(170.0, 5.0)));
        assert!(planner.drag_to(Point::new(200.0, 55.0)));
        assert!(planner.drag_to(Point::new(180.0, 25.0)));

        assert_eq!(planner.placement("b").unwrap().position(), Point::new(178.0, 20.0));
        assert_eq!(planner.placement("a").unwrap().position(), Point::new(10.0, 20.0));
        assert_eq!(planner.placement("c").unwrap().position(), Point::new(900.0, 0.0));

        // No rollback on cancel
        assert!(planner.cancel_drag());
        assert!(!planner.is_dragging());
        assert!(!planner.drag_to(Point::new(0.0, 0.0)));
        assert_eq!(planner.placement("b").unwrap().position(), Point::new(178.0, 20.0));
    }

    #[test]
    fn test_disabling_section_mode_drops_drag() {
        let mut planner = straight_run();
        planner.set_section_mode(true);
        planner.begin_drag("a", Point::new(0.0, 0.0));
        assert!(!planner.toggle_section_mode());
        assert!(!planner.is_dragging());
    }

    #[test]
    fn test_guide_circles() {
        let mut planner = Planner::with_hornby(Layout::default());
        assert!(planner.add_guide_circle(0.0, 0.0, 0.0).is_none());
        let id = planner.add_guide_circle(100.0, 50.0, 371.0).unwrap();
        assert_eq!(id, "circle-0");
        assert_eq!(
            planner.layout().circles[0].label.as_deref(),
            Some("Radius 371 mm")
        );
        assert!(planner.remove_guide_circle(&id).is_some());
        assert!(planner.layout().circles.is_empty());
    }

    #[test]
    fn test_inventory_and_run_length() {
        let mut layout = Layout::default();
        layout.placements = vec![
            Placement::new("a", "R600", 0.0, 0.0),
            Placement::new("b", "R600", 0.0, 0.0),
            Placement::new("c", "R606", 0.0, 0.0),
            Placement::new("d", "MYSTERY", 0.0, 0.0),
        ];
        let planner = Planner::with_hornby(layout);

        let inventory = planner.inventory();
        assert_eq!(inventory.get("R600"), Some(&2));
        assert_eq!(inventory.get("R606"), Some(&1));
        assert_eq!(inventory.get("MYSTERY"), Some(&1));

        let expected = 2.0 * 168.0 + 371.0 * std::f64::consts::FRAC_PI_4;
        assert!(approx_eq(planner.total_run_length_mm(), expected));
        assert_eq!(planner.unresolved().len(), 1);
    }
}
