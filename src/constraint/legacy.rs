//! Deprecated constructors for the older node-tuple constraint taxonomy.
//!
//! Earlier authoring surfaces expressed constraints as two/three-node tuples
//! (`distance`, `colinear`, `angle`, `horizontal`, `vertical`) or as
//! corner-flavored variants (`perpendicularCorner`). The engine stores only
//! the canonical adjacency-aware taxonomy; these constructors resolve the
//! old shapes onto it and return `None` when the referenced topology does
//! not exist.

use crate::domain::{CornerId, PlanQuery, Side, WallId};

use super::BuildingConstraint;

/// Finds the wall connecting two corners, in either orientation.
fn wall_between(query: &dyn PlanQuery, a: &CornerId, b: &CornerId) -> Option<WallId> {
    let (w_in, w_out) = query.corner_walls(a)?;
    [w_in, w_out].into_iter().find(|id| {
        query.wall(id).is_some_and(|w| {
            (w.start_corner == *a && w.end_corner == *b)
                || (w.start_corner == *b && w.end_corner == *a)
        })
    })
}

/// Two-node distance constraint.
#[deprecated(note = "use `BuildingConstraint::WallLength` on the connecting wall")]
pub fn distance(
    query: &dyn PlanQuery,
    a: &CornerId,
    b: &CornerId,
    side: Side,
    length: f64,
) -> Option<BuildingConstraint> {
    let wall = wall_between(query, a, b)?;
    Some(BuildingConstraint::WallLength { wall, side, length })
}

/// Two-node horizontal constraint.
#[deprecated(note = "use `BuildingConstraint::HorizontalWall` on the connecting wall")]
pub fn horizontal(query: &dyn PlanQuery, a: &CornerId, b: &CornerId) -> Option<BuildingConstraint> {
    let wall = wall_between(query, a, b)?;
    Some(BuildingConstraint::HorizontalWall { wall })
}

/// Two-node vertical constraint.
#[deprecated(note = "use `BuildingConstraint::VerticalWall` on the connecting wall")]
pub fn vertical(query: &dyn PlanQuery, a: &CornerId, b: &CornerId) -> Option<BuildingConstraint> {
    let wall = wall_between(query, a, b)?;
    Some(BuildingConstraint::VerticalWall { wall })
}

/// Three-node colinearity; the middle node names the corner.
#[deprecated(note = "use `BuildingConstraint::ColinearCorner` on the middle corner")]
#[must_use]
pub fn colinear(_first: &CornerId, middle: &CornerId, _last: &CornerId) -> BuildingConstraint {
    BuildingConstraint::ColinearCorner {
        corner: middle.clone(),
    }
}

/// Pivot-plus-two-nodes angle; the pivot names the corner.
#[deprecated(note = "use `BuildingConstraint::CornerAngle` on the pivot corner")]
#[must_use]
pub fn angle(
    pivot: &CornerId,
    _a: &CornerId,
    _b: &CornerId,
    radians: f64,
) -> BuildingConstraint {
    BuildingConstraint::CornerAngle {
        corner: pivot.clone(),
        radians,
    }
}

/// Corner-flavored perpendicularity, resolved to the adjacent wall pair.
#[deprecated(note = "use `BuildingConstraint::Perpendicular` on the adjacent wall pair")]
pub fn perpendicular_corner(
    query: &dyn PlanQuery,
    corner: &CornerId,
) -> Option<BuildingConstraint> {
    let (w_in, w_out) = query.corner_walls(corner)?;
    Some(BuildingConstraint::Perpendicular {
        walls: [w_in, w_out],
    })
}
