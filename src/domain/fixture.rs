//! In-memory domain model used by tests.
//!
//! Stands in for the external building model: owns perimeter/corner/wall
//! ids, answers [`PlanQuery`], and emits change notifications through a
//! [`PlanNotifier`] the way the real model would. Corner loops are given
//! counter-clockwise with the outside face as reference side; the inside
//! face is derived by thickness offset toward the interior.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::constraint::BuildingConstraint;
use crate::math::offset_2d::{left_normal, line_line_intersect, point_at, segment_direction};
use crate::math::Point2;

use super::event::{Change, PerimeterInfo, PlanNotifier};
use super::{
    Corner, CornerId, EntityKind, PerimeterId, PlanQuery, Side, StoreyId, Wall, WallEntity,
    WallEntityId, WallId,
};

#[derive(Debug, Clone)]
struct PerimeterData {
    storey: StoreyId,
    side: Side,
    corners: Vec<Corner>,
    walls: Vec<Wall>,
    entities: Vec<WallEntity>,
}

#[derive(Default)]
pub struct PlanModel {
    notifier: PlanNotifier,
    active: RefCell<Option<StoreyId>>,
    perimeters: RefCell<BTreeMap<PerimeterId, PerimeterData>>,
}

impl PlanModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifier(&self) -> &PlanNotifier {
        &self.notifier
    }

    pub fn add_storey(&self, id: &str) -> StoreyId {
        StoreyId::new(id)
    }

    pub fn set_active_storey(&self, storey: Option<&StoreyId>) {
        let previous = self.active.replace(storey.cloned());
        let change = Change {
            current: storey.cloned(),
            previous,
        };
        self.notifier.active_storey.emit(&change);
    }

    /// Inserts a CCW polygon perimeter (outside reference side) and emits
    /// its added event. Corner ids are `<id>_c<i>`, wall ids `<id>_w<i>`.
    pub fn polygon_perimeter(
        &self,
        id: &str,
        storey: &StoreyId,
        points: &[(f64, f64)],
        thickness: f64,
    ) -> PerimeterId {
        let perimeter = PerimeterId::new(id);
        let data = polygon_data(&perimeter, storey, points, thickness);
        self.perimeters
            .borrow_mut()
            .insert(perimeter.clone(), data);
        self.notifier.perimeters.emit(&Change::added(PerimeterInfo {
            id: perimeter.clone(),
            storey: storey.clone(),
        }));
        perimeter
    }

    /// Replaces a perimeter's corner loop in place and emits an update.
    pub fn reshape_perimeter(&self, id: &PerimeterId, points: &[(f64, f64)], thickness: f64) {
        let info = {
            let mut perimeters = self.perimeters.borrow_mut();
            let Some(data) = perimeters.get_mut(id) else {
                return;
            };
            let storey = data.storey.clone();
            *data = polygon_data(id, &storey, points, thickness);
            PerimeterInfo {
                id: id.clone(),
                storey,
            }
        };
        self.notifier
            .perimeters
            .emit(&Change::updated(info.clone(), info));
    }

    pub fn remove_perimeter(&self, id: &PerimeterId) {
        let Some(data) = self.perimeters.borrow_mut().remove(id) else {
            return;
        };
        self.notifier
            .perimeters
            .emit(&Change::removed(PerimeterInfo {
                id: id.clone(),
                storey: data.storey,
            }));
    }

    /// Moves a perimeter to another storey and emits the update pair.
    pub fn move_perimeter(&self, id: &PerimeterId, storey: &StoreyId) {
        let previous = {
            let mut perimeters = self.perimeters.borrow_mut();
            let Some(data) = perimeters.get_mut(id) else {
                return;
            };
            let previous = data.storey.clone();
            data.storey = storey.clone();
            previous
        };
        self.notifier.perimeters.emit(&Change::updated(
            PerimeterInfo {
                id: id.clone(),
                storey: previous,
            },
            PerimeterInfo {
                id: id.clone(),
                storey: storey.clone(),
            },
        ));
    }

    /// Mounts an entity on a wall. Emits nothing — the real model batches
    /// entity edits into a perimeter update; use [`reshape_perimeter`] or a
    /// manual upsert to pick it up.
    ///
    /// [`reshape_perimeter`]: Self::reshape_perimeter
    pub fn add_entity(&self, wall: &str, id: &str, kind: EntityKind, offset: f64, width: f64) {
        let wall_id = WallId::new(wall);
        let mut perimeters = self.perimeters.borrow_mut();
        for data in perimeters.values_mut() {
            if data.walls.iter().any(|w| w.id == wall_id) {
                data.entities.push(WallEntity {
                    id: WallEntityId::new(id),
                    wall: wall_id,
                    kind,
                    offset,
                    width,
                });
                return;
            }
        }
    }

    pub fn add_constraint(&self, constraint: &BuildingConstraint) {
        self.notifier
            .constraints
            .emit(&Change::added(constraint.clone()));
    }

    pub fn remove_constraint(&self, constraint: &BuildingConstraint) {
        self.notifier
            .constraints
            .emit(&Change::removed(constraint.clone()));
    }

    pub fn update_constraint(&self, previous: &BuildingConstraint, current: &BuildingConstraint) {
        self.notifier
            .constraints
            .emit(&Change::updated(previous.clone(), current.clone()));
    }
}

/// Builds corner/wall data for a CCW outside loop with derived inside face.
fn polygon_data(
    perimeter: &PerimeterId,
    storey: &StoreyId,
    points: &[(f64, f64)],
    thickness: f64,
) -> PerimeterData {
    let n = points.len();
    let outside: Vec<Point2> = points.iter().map(|&(x, y)| Point2::new(x, y)).collect();

    // Interior lies to the left of each CCW edge; offset every edge line
    // and reconnect at intersections, falling back to a plain projection
    // where adjacent edges are parallel.
    let dirs: Vec<_> = (0..n)
        .map(|i| {
            segment_direction(&outside[i], &outside[(i + 1) % n])
                .unwrap_or_else(|| crate::math::Vector2::new(1.0, 0.0))
        })
        .collect();
    let inside: Vec<Point2> = (0..n)
        .map(|j| {
            let i = (j + n - 1) % n;
            let origin_in = outside[i] + left_normal(&dirs[i]) * thickness;
            let origin_out = outside[j] + left_normal(&dirs[j]) * thickness;
            match line_line_intersect(&origin_in, &dirs[i], &origin_out, &dirs[j]) {
                Some((t, _)) => point_at(&origin_in, &dirs[i], t),
                None => origin_out,
            }
        })
        .collect();

    let corners: Vec<Corner> = (0..n)
        .map(|i| Corner {
            id: CornerId::new(format!("{perimeter}_c{i}")),
            perimeter: perimeter.clone(),
            outside: outside[i],
            inside: inside[i],
        })
        .collect();
    let walls: Vec<Wall> = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            Wall {
                id: WallId::new(format!("{perimeter}_w{i}")),
                perimeter: perimeter.clone(),
                start_corner: corners[i].id.clone(),
                end_corner: corners[j].id.clone(),
                thickness,
                direction: dirs[i],
                length_outside: (outside[j] - outside[i]).norm(),
                length_inside: (inside[j] - inside[i]).norm(),
                length_override: None,
            }
        })
        .collect();

    PerimeterData {
        storey: storey.clone(),
        side: Side::Outside,
        corners,
        walls,
        entities: Vec::new(),
    }
}

impl PlanQuery for PlanModel {
    fn reference_side(&self, perimeter: &PerimeterId) -> Option<Side> {
        self.perimeters.borrow().get(perimeter).map(|d| d.side)
    }

    fn corners(&self, perimeter: &PerimeterId) -> Vec<Corner> {
        self.perimeters
            .borrow()
            .get(perimeter)
            .map(|d| d.corners.clone())
            .unwrap_or_default()
    }

    fn walls(&self, perimeter: &PerimeterId) -> Vec<Wall> {
        self.perimeters
            .borrow()
            .get(perimeter)
            .map(|d| d.walls.clone())
            .unwrap_or_default()
    }

    fn corner(&self, id: &CornerId) -> Option<Corner> {
        self.perimeters
            .borrow()
            .values()
            .flat_map(|d| &d.corners)
            .find(|c| c.id == *id)
            .cloned()
    }

    fn wall(&self, id: &WallId) -> Option<Wall> {
        self.perimeters
            .borrow()
            .values()
            .flat_map(|d| &d.walls)
            .find(|w| w.id == *id)
            .cloned()
    }

    fn corner_walls(&self, corner: &CornerId) -> Option<(WallId, WallId)> {
        let perimeters = self.perimeters.borrow();
        for data in perimeters.values() {
            let n = data.walls.len();
            for (j, c) in data.corners.iter().enumerate() {
                if c.id == *corner {
                    let incoming = data.walls[(j + n - 1) % n].id.clone();
                    let outgoing = data.walls[j].id.clone();
                    return Some((incoming, outgoing));
                }
            }
        }
        None
    }

    fn wall_entities(&self, wall: &WallId) -> Vec<WallEntity> {
        self.perimeters
            .borrow()
            .values()
            .flat_map(|d| &d.entities)
            .filter(|e| e.wall == *wall)
            .cloned()
            .collect()
    }

    fn entity(&self, id: &WallEntityId) -> Option<WallEntity> {
        self.perimeters
            .borrow()
            .values()
            .flat_map(|d| &d.entities)
            .find(|e| e.id == *id)
            .cloned()
    }

    fn active_storey(&self) -> Option<StoreyId> {
        self.active.borrow().clone()
    }

    fn storey_perimeters(&self, storey: &StoreyId) -> Vec<PerimeterId> {
        self.perimeters
            .borrow()
            .iter()
            .filter(|(_, d)| d.storey == *storey)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn perimeter_storey(&self, perimeter: &PerimeterId) -> Option<StoreyId> {
        self.perimeters
            .borrow()
            .get(perimeter)
            .map(|d| d.storey.clone())
    }
}
