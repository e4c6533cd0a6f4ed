//! Baseline constraint inference from raw perimeter geometry.
//!
//! Two authoring modes produce different baselines: the axis-aligned
//! "preset" mode pins every wall length and relies on exact coordinate
//! equality, while the freehand "freeform" mode only pins what the user
//! asked for and infers axis/perpendicular/colinear relationships within
//! tolerances.

use crate::domain::{Corner, Side, Wall};

use super::BuildingConstraint;

/// Freeform axis alignment: corners within this distance on one axis get a
/// horizontal/vertical constraint.
pub const AXIS_ALIGN_TOLERANCE: f64 = 1.0;

/// Freeform perpendicularity: adjacent walls whose unit-direction dot
/// magnitude is below this are treated as perpendicular.
pub const PERPENDICULAR_DOT: f64 = 1e-3;

/// Freeform colinearity: consecutive walls whose unit-direction dot is at
/// or above this form an interior angle indistinguishable from 180°.
pub const COLINEAR_DOT: f64 = 0.9999;

/// Baseline constraints for a preset (axis-aligned) perimeter.
///
/// One `WallLength` per wall on the reference side, and one axis constraint
/// per wall whose corner points are exactly equal on one axis. Preset
/// authoring guarantees exact equality, so no tolerance is involved. No
/// perpendicular constraints are emitted — the axis constraints already
/// determine every right angle.
#[must_use]
#[allow(clippy::float_cmp)] // preset authoring guarantees exact equality
pub fn preset(corners: &[Corner], walls: &[Wall], side: Side) -> Vec<BuildingConstraint> {
    let n = walls.len();
    debug_assert_eq!(corners.len(), n, "closed loop: one wall per corner");

    let mut out = Vec::with_capacity(2 * n);

    for wall in walls {
        out.push(BuildingConstraint::WallLength {
            wall: wall.id.clone(),
            side,
            length: wall.length(side),
        });
    }

    for (i, wall) in walls.iter().enumerate() {
        let a = corners[i].position(side);
        let b = corners[(i + 1) % n].position(side);
        if a.y == b.y {
            out.push(BuildingConstraint::HorizontalWall {
                wall: wall.id.clone(),
            });
        } else if a.x == b.x {
            out.push(BuildingConstraint::VerticalWall {
                wall: wall.id.clone(),
            });
        }
    }

    out
}

/// Baseline constraints for a freeform perimeter.
///
/// Lengths only where the user overrode them; axis constraints within
/// [`AXIS_ALIGN_TOLERANCE`]; perpendicular constraints for near-orthogonal
/// adjacent pairs unless both walls already carry an axis constraint (the
/// perpendicularity would then be redundant at best and contradictory at
/// worst); one `ColinearCorner` per interior angle indistinguishable from
/// 180°.
#[must_use]
pub fn freeform(corners: &[Corner], walls: &[Wall], side: Side) -> Vec<BuildingConstraint> {
    let n = walls.len();
    debug_assert_eq!(corners.len(), n, "closed loop: one wall per corner");

    let mut out = Vec::new();

    for wall in walls {
        if let Some(length) = wall.length_override {
            out.push(BuildingConstraint::WallLength {
                wall: wall.id.clone(),
                side,
                length,
            });
        }
    }

    // Track which walls picked up an axis constraint; the perpendicular
    // pass must not over-constrain a pair that is already fully determined.
    let mut axis_constrained = vec![false; n];
    for (i, wall) in walls.iter().enumerate() {
        let a = corners[i].position(side);
        let b = corners[(i + 1) % n].position(side);
        if (a.y - b.y).abs() <= AXIS_ALIGN_TOLERANCE {
            out.push(BuildingConstraint::HorizontalWall {
                wall: wall.id.clone(),
            });
            axis_constrained[i] = true;
        } else if (a.x - b.x).abs() <= AXIS_ALIGN_TOLERANCE {
            out.push(BuildingConstraint::VerticalWall {
                wall: wall.id.clone(),
            });
            axis_constrained[i] = true;
        }
    }

    for i in 0..n {
        let j = (i + 1) % n;
        let dot = walls[i].direction.dot(&walls[j].direction);

        if dot.abs() < PERPENDICULAR_DOT && !(axis_constrained[i] && axis_constrained[j]) {
            out.push(BuildingConstraint::Perpendicular {
                walls: [walls[i].id.clone(), walls[j].id.clone()],
            });
        }

        if dot >= COLINEAR_DOT {
            // Corner j sits between walls i and j.
            out.push(BuildingConstraint::ColinearCorner {
                corner: corners[j].id.clone(),
            });
        }
    }

    out
}
