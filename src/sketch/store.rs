//! The solver-facing sketch store.
//!
//! Owns the primitive sketch (points, lines, constraints), the active
//! declarative building constraints keyed by canonical key, and the
//! per-perimeter registry of generated ids. All collections are mutated
//! exclusively through this type's methods; readers go through the same
//! accessor surface and the `revision` counter tells them when anything
//! changed.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::constraint::translate::{translate, TranslateContext};
use crate::constraint::{key, BuildingConstraint};
use crate::domain::{CornerId, PerimeterId, PlanQuery, Side, WallId};
use crate::error::{Result, SketchError};

use super::ids::{self, EntityPart};
use super::{geometry, SketchLine, SketchPoint, SolverConstraint, SolverSketch};

/// Post-solve status of one building constraint, as reported back by the
/// external solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintStatus {
    pub conflicting: bool,
    pub redundant: bool,
}

/// The generated id sets of one perimeter, enabling atomic teardown.
#[derive(Debug, Clone, Default)]
pub struct PerimeterRegistry {
    pub points: Vec<String>,
    pub lines: Vec<String>,
    pub constraints: Vec<String>,
}

/// Stateful core holding the solver sketch and the active building
/// constraints.
#[derive(Debug, Default)]
pub struct SketchStore {
    points: BTreeMap<String, SketchPoint>,
    lines: BTreeMap<String, SketchLine>,
    constraints: BTreeMap<String, SolverConstraint>,
    building: BTreeMap<String, BuildingConstraint>,
    registry: BTreeMap<PerimeterId, PerimeterRegistry>,
    statuses: BTreeMap<String, ConstraintStatus>,
    revision: u64,
}

impl SketchStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Read surface ---

    /// All sketch points, ordered by id.
    #[must_use]
    pub fn points(&self) -> &BTreeMap<String, SketchPoint> {
        &self.points
    }

    /// All sketch lines, ordered by id.
    #[must_use]
    pub fn lines(&self) -> &BTreeMap<String, SketchLine> {
        &self.lines
    }

    /// All primitive constraints, ordered by id.
    #[must_use]
    pub fn constraints(&self) -> &BTreeMap<String, SolverConstraint> {
        &self.constraints
    }

    /// Active building constraints, ordered by canonical key.
    #[must_use]
    pub fn building_constraints(&self) -> &BTreeMap<String, BuildingConstraint> {
        &self.building
    }

    /// Tracked perimeters and their generated id sets.
    #[must_use]
    pub fn registry(&self) -> &BTreeMap<PerimeterId, PerimeterRegistry> {
        &self.registry
    }

    /// Post-solve status of one building constraint.
    #[must_use]
    pub fn status(&self, key: &str) -> ConstraintStatus {
        self.statuses.get(key).copied().unwrap_or_default()
    }

    /// Monotonic change counter; bumps on every effective mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The primitive sketch in the solver's data shape.
    #[must_use]
    pub fn solver_sketch(&self) -> SolverSketch {
        SolverSketch {
            points: self.points.values().cloned().collect(),
            lines: self.lines.values().cloned().collect(),
            constraints: self.constraints.values().cloned().collect(),
        }
    }

    // --- Raw sketch mutation (no validation; callers keep the sketch
    // referentially intact) ---

    /// Inserts or replaces a point.
    pub fn add_point(&mut self, point: SketchPoint) {
        self.points.insert(point.id.clone(), point);
        self.revision += 1;
    }

    /// Inserts or replaces a line.
    pub fn add_line(&mut self, line: SketchLine) {
        self.lines.insert(line.id.clone(), line);
        self.revision += 1;
    }

    /// Inserts or replaces a primitive constraint.
    pub fn add_constraint(&mut self, constraint: SolverConstraint) {
        self.constraints.insert(constraint.id.clone(), constraint);
        self.revision += 1;
    }

    /// Removes a batch of points. No-op on an empty set, so callers can
    /// pass through without producing a spurious revision bump.
    pub fn remove_points(&mut self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        for id in ids {
            self.points.remove(id);
        }
        self.revision += 1;
    }

    /// Removes a batch of lines. No-op on an empty set.
    pub fn remove_lines(&mut self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        for id in ids {
            self.lines.remove(id);
        }
        self.revision += 1;
    }

    /// Removes a batch of primitive constraints. No-op on an empty set.
    pub fn remove_constraints(&mut self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        for id in ids {
            self.constraints.remove(id);
        }
        self.revision += 1;
    }

    // --- Building constraints ---

    /// Adds a declarative building constraint.
    ///
    /// Computes the canonical key; a duplicate (or deliberately colliding
    /// contradictory) key keeps the stored constraint, logs, and returns
    /// the existing key — first writer wins. Otherwise every referenced
    /// corner, wall and entity must already resolve to sketch geometry;
    /// the constraint is then translated and both the declarative entry
    /// and its primitives are recorded together.
    ///
    /// # Errors
    ///
    /// Returns a [`SketchError`] naming the first referenced entity with
    /// no sketch counterpart. The store is unchanged on error.
    pub fn add_building_constraint(
        &mut self,
        query: &dyn PlanQuery,
        constraint: BuildingConstraint,
    ) -> Result<String> {
        let key = key::key(&constraint);
        if self.building.contains_key(&key) {
            warn!(
                %key,
                kind = constraint.kind_name(),
                "building constraint already present; keeping the existing one"
            );
            return Ok(key);
        }

        self.check_references(&constraint)?;

        let primitives = {
            let ctx = StoreContext {
                query,
                lines: &self.lines,
            };
            translate(&constraint, &key, &ctx)?
        };

        for primitive in primitives {
            self.constraints.insert(primitive.id.clone(), primitive);
        }
        self.building.insert(key.clone(), constraint);
        self.revision += 1;
        Ok(key)
    }

    /// Removes a building constraint by key.
    ///
    /// Unknown keys log a warning and change nothing.
    pub fn remove_building_constraint(&mut self, key: &str) {
        if !self.building.contains_key(key) {
            warn!(key, "building constraint not found; nothing removed");
            return;
        }
        self.purge_building_constraint(key);
        self.revision += 1;
    }

    /// Drops a known building constraint and its translated primitives.
    /// The translated id set is re-derived from the key alone.
    fn purge_building_constraint(&mut self, key: &str) {
        for id in ids::building_constraint_ids(key) {
            self.constraints.remove(&id);
        }
        self.statuses.remove(key);
        self.building.remove(key);
    }

    fn check_references(&self, constraint: &BuildingConstraint) -> Result<()> {
        for corner in constraint.corners() {
            if !self.points.contains_key(&ids::corner_ref_point(corner)) {
                return Err(SketchError::CornerNotInSketch(corner.to_string()).into());
            }
        }
        for wall in constraint.walls() {
            if !self.lines.contains_key(&ids::wall_ref_line(wall)) {
                return Err(SketchError::WallNotInSketch(wall.to_string()).into());
            }
        }
        for entity in constraint.entities() {
            let center = ids::entity_point(entity, EntityPart::Center);
            if !self.points.contains_key(&center) {
                return Err(SketchError::EntityNotInSketch(entity.to_string()).into());
            }
        }
        Ok(())
    }

    // --- Perimeter geometry ---

    /// Generates (or regenerates) the sketch scaffold of a perimeter.
    ///
    /// Upsert semantics: an already-tracked perimeter is fully torn down
    /// first — including the orphan sweep over building constraints that
    /// referenced its old geometry — and then rebuilt from the domain
    /// model's current state.
    ///
    /// # Errors
    ///
    /// Propagates geometry-generation failures (unknown or malformed
    /// perimeter, degenerate wall). A failed rebuild leaves the perimeter
    /// untracked.
    pub fn add_perimeter_geometry(
        &mut self,
        query: &dyn PlanQuery,
        perimeter: &PerimeterId,
    ) -> Result<()> {
        if self.registry.contains_key(perimeter) {
            debug!(%perimeter, "regenerating tracked perimeter");
            self.teardown_perimeter(perimeter);
        }

        let geo = geometry::build(query, perimeter)?;
        let mut entry = PerimeterRegistry::default();
        for point in geo.points {
            entry.points.push(point.id.clone());
            self.points.insert(point.id.clone(), point);
        }
        for line in geo.lines {
            entry.lines.push(line.id.clone());
            self.lines.insert(line.id.clone(), line);
        }
        for constraint in geo.constraints {
            entry.constraints.push(constraint.id.clone());
            self.constraints.insert(constraint.id.clone(), constraint);
        }
        self.registry.insert(perimeter.clone(), entry);
        self.revision += 1;
        Ok(())
    }

    /// Removes a perimeter's scaffold and every building constraint left
    /// referencing it.
    ///
    /// Untracked perimeters log a warning and change nothing.
    pub fn remove_perimeter_geometry(&mut self, perimeter: &PerimeterId) {
        if !self.registry.contains_key(perimeter) {
            warn!(%perimeter, "perimeter not tracked; nothing removed");
            return;
        }
        self.teardown_perimeter(perimeter);
        self.revision += 1;
    }

    fn teardown_perimeter(&mut self, perimeter: &PerimeterId) {
        let Some(entry) = self.registry.remove(perimeter) else {
            return;
        };
        for id in &entry.constraints {
            self.constraints.remove(id);
        }
        for id in &entry.lines {
            self.lines.remove(id);
        }
        for id in &entry.points {
            self.points.remove(id);
        }

        // Orphan sweep: building constraints whose referenced geometry
        // just disappeared are invalid and go with it.
        let orphaned: Vec<String> = self
            .building
            .iter()
            .filter(|(_, c)| self.check_references(c).is_err())
            .map(|(key, _)| key.clone())
            .collect();
        if !orphaned.is_empty() {
            debug!(%perimeter, count = orphaned.len(), "sweeping orphaned building constraints");
        }
        for key in orphaned {
            self.purge_building_constraint(&key);
        }
    }

    // --- Solver feedback ---

    /// Ingests the external solver's post-solve report.
    ///
    /// The report arrives as opaque sets of primitive-constraint ids;
    /// anything matching the `bc_<key>` convention is mapped back to its
    /// building constraint and flagged. Previous statuses are replaced.
    pub fn apply_solve_report(&mut self, conflicting: &[String], redundant: &[String]) {
        self.statuses.clear();
        for (report, conflict) in [(conflicting, true), (redundant, false)] {
            for id in report {
                let Some(key) = ids::key_of_primitive(id) else {
                    continue;
                };
                if !self.building.contains_key(key) {
                    continue;
                }
                let status = self.statuses.entry(key.to_owned()).or_default();
                if conflict {
                    status.conflicting = true;
                } else {
                    status.redundant = true;
                }
            }
        }
        self.revision += 1;
    }
}

/// Translation context backed by the store's lines and the domain model.
struct StoreContext<'a> {
    query: &'a dyn PlanQuery,
    lines: &'a BTreeMap<String, SketchLine>,
}

impl TranslateContext for StoreContext<'_> {
    fn wall_corners(&self, wall: &WallId) -> Option<(CornerId, CornerId)> {
        let wall = self.query.wall(wall)?;
        Some((wall.start_corner, wall.end_corner))
    }

    fn corner_walls(&self, corner: &CornerId) -> Option<(WallId, WallId)> {
        self.query.corner_walls(corner)
    }

    fn corner_reference_side(&self, corner: &CornerId) -> Option<Side> {
        let corner = self.query.corner(corner)?;
        self.query.reference_side(&corner.perimeter)
    }

    fn line_first_point(&self, line: &str) -> Option<String> {
        self.lines.get(line).map(|l| l.p1.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::fixture::PlanModel;

    fn rect_store() -> (PlanModel, SketchStore, PerimeterId) {
        let model = PlanModel::new();
        let storey = model.add_storey("s1");
        let perimeter = model.polygon_perimeter(
            "p1",
            &storey,
            &[(0.0, 0.0), (6000.0, 0.0), (6000.0, 4000.0), (0.0, 4000.0)],
            300.0,
        );
        let mut store = SketchStore::new();
        store.add_perimeter_geometry(&model, &perimeter).unwrap();
        (model, store, perimeter)
    }

    fn horizontal(wall: &str) -> BuildingConstraint {
        BuildingConstraint::HorizontalWall { wall: wall.into() }
    }

    fn vertical(wall: &str) -> BuildingConstraint {
        BuildingConstraint::VerticalWall { wall: wall.into() }
    }

    #[test]
    fn add_records_constraint_and_primitives() {
        let (model, mut store, _) = rect_store();
        let key = store
            .add_building_constraint(&model, horizontal("p1_w0"))
            .unwrap();
        assert_eq!(key, "axis:p1_w0");
        assert!(store.building_constraints().contains_key(&key));
        assert!(store.constraints().contains_key("bc_axis:p1_w0"));
    }

    #[test]
    fn duplicate_key_keeps_first_writer() {
        let (model, mut store, _) = rect_store();
        store
            .add_building_constraint(&model, horizontal("p1_w0"))
            .unwrap();
        let before = store.revision();

        // Same key, contradictory kind: rejected, original retained.
        let key = store
            .add_building_constraint(&model, vertical("p1_w0"))
            .unwrap();
        assert_eq!(key, "axis:p1_w0");
        assert_eq!(
            store.building_constraints()["axis:p1_w0"],
            horizontal("p1_w0")
        );
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn removed_key_frees_the_slot_for_the_other_kind() {
        let (model, mut store, _) = rect_store();
        store
            .add_building_constraint(&model, horizontal("p1_w0"))
            .unwrap();
        store.remove_building_constraint("axis:p1_w0");
        assert!(!store.constraints().contains_key("bc_axis:p1_w0"));

        store
            .add_building_constraint(&model, vertical("p1_w0"))
            .unwrap();
        assert_eq!(
            store.building_constraints()["axis:p1_w0"],
            vertical("p1_w0")
        );
    }

    #[test]
    fn unknown_wall_is_fatal_and_leaves_store_unchanged() {
        let (model, mut store, _) = rect_store();
        let before = store.revision();
        let err = store
            .add_building_constraint(&model, horizontal("p9_w9"))
            .unwrap_err();
        assert!(err.to_string().contains("p9_w9"));
        assert!(store.building_constraints().is_empty());
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn remove_unknown_key_is_a_logged_no_op() {
        let (_, mut store, _) = rect_store();
        let before = store.revision();
        store.remove_building_constraint("axis:nope");
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn parallel_removal_drops_both_halves() {
        let (model, mut store, _) = rect_store();
        let key = store
            .add_building_constraint(
                &model,
                BuildingConstraint::Parallel {
                    walls: ["p1_w0".into(), "p1_w2".into()],
                    distance: Some(4000.0),
                },
            )
            .unwrap();
        assert!(store.constraints().contains_key("bc_dir:p1_w0:p1_w2_par"));
        assert!(store.constraints().contains_key("bc_dir:p1_w0:p1_w2_dist"));

        store.remove_building_constraint(&key);
        assert!(!store.constraints().contains_key("bc_dir:p1_w0:p1_w2_par"));
        assert!(!store.constraints().contains_key("bc_dir:p1_w0:p1_w2_dist"));
    }

    #[test]
    fn upsert_keeps_counts_and_sweeps_constraints() {
        let (model, mut store, perimeter) = rect_store();
        store
            .add_building_constraint(&model, horizontal("p1_w0"))
            .unwrap();

        let points = store.points().len();
        let lines = store.lines().len();

        store.add_perimeter_geometry(&model, &perimeter).unwrap();

        assert_eq!(store.points().len(), points);
        assert_eq!(store.lines().len(), lines);
        // Regeneration invalidates every constraint that referenced the
        // perimeter's walls, even though the new ids coincide.
        assert!(store.building_constraints().is_empty());
        assert!(!store.constraints().contains_key("bc_axis:p1_w0"));
    }

    #[test]
    fn removal_leaves_other_perimeters_untouched() {
        let (model, mut store, perimeter) = rect_store();
        let storey = model.add_storey("s1");
        let other = model.polygon_perimeter(
            "p2",
            &storey,
            &[(10000.0, 0.0), (16000.0, 0.0), (16000.0, 4000.0), (10000.0, 4000.0)],
            300.0,
        );
        store.add_perimeter_geometry(&model, &other).unwrap();
        store
            .add_building_constraint(&model, horizontal("p2_w0"))
            .unwrap();

        store.remove_perimeter_geometry(&perimeter);

        assert!(store.registry().contains_key(&other));
        assert!(!store.registry().contains_key(&perimeter));
        assert!(store.points().keys().all(|id| id.contains("p2")));
        assert!(store.building_constraints().contains_key("axis:p2_w0"));
    }

    #[test]
    fn teardown_sweeps_only_orphaned_constraints() {
        let (model, mut store, perimeter) = rect_store();
        let storey = model.add_storey("s1");
        let other = model.polygon_perimeter(
            "p2",
            &storey,
            &[(10000.0, 0.0), (16000.0, 0.0), (16000.0, 4000.0), (10000.0, 4000.0)],
            300.0,
        );
        store.add_perimeter_geometry(&model, &other).unwrap();
        store
            .add_building_constraint(&model, horizontal("p1_w0"))
            .unwrap();
        store
            .add_building_constraint(&model, vertical("p2_w1"))
            .unwrap();

        store.remove_perimeter_geometry(&perimeter);

        assert!(!store.building_constraints().contains_key("axis:p1_w0"));
        assert!(store.building_constraints().contains_key("axis:p2_w1"));
    }

    #[test]
    fn empty_batch_removals_do_not_bump_revision() {
        let (_, mut store, _) = rect_store();
        let before = store.revision();
        store.remove_points(&[]);
        store.remove_lines(&[]);
        store.remove_constraints(&[]);
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn solve_report_maps_suffixed_ids_back_to_keys() {
        let (model, mut store, _) = rect_store();
        store
            .add_building_constraint(
                &model,
                BuildingConstraint::Parallel {
                    walls: ["p1_w0".into(), "p1_w2".into()],
                    distance: Some(4000.0),
                },
            )
            .unwrap();
        store
            .add_building_constraint(&model, horizontal("p1_w1"))
            .unwrap();

        store.apply_solve_report(
            &["bc_dir:p1_w0:p1_w2_dist".to_owned()],
            &["bc_axis:p1_w1".to_owned(), "pc_par_p1_w0".to_owned()],
        );

        assert!(store.status("dir:p1_w0:p1_w2").conflicting);
        assert!(!store.status("dir:p1_w0:p1_w2").redundant);
        assert!(store.status("axis:p1_w1").redundant);
        // Structural ids and unknown keys never produce a status.
        assert_eq!(store.status("nope"), ConstraintStatus::default());
    }

    #[test]
    fn entity_constraint_requires_entity_scaffold() {
        let (model, mut store, perimeter) = rect_store();
        let relative = BuildingConstraint::WallEntityRelative {
            entities: ["e1".into(), "e2".into()],
            distance: 1200.0,
        };
        // Entities not mounted yet: fatal referential failure.
        assert!(store
            .add_building_constraint(&model, relative.clone())
            .is_err());

        model.add_entity("p1_w0", "e1", crate::domain::EntityKind::Opening, 500.0, 900.0);
        model.add_entity("p1_w0", "e2", crate::domain::EntityKind::Post, 2500.0, 300.0);
        store.add_perimeter_geometry(&model, &perimeter).unwrap();

        store.add_building_constraint(&model, relative).unwrap();
        assert!(store.building_constraints().contains_key("rel:e1:e2"));
    }
}
