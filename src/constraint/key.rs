//! Canonical building-constraint identity keys.
//!
//! A key names the *topology* a constraint occupies, never its values:
//! participant ids are sorted so argument order cannot change the key, and
//! lengths, sides and angles do not participate. Kinds that are mutually
//! exclusive on the same geometry (horizontal vs. vertical on a wall,
//! parallel vs. perpendicular on a wall pair) share one prefix on purpose so
//! that the contradictory pair collides and the second insert is rejected.
//! All other prefixes are disjoint.

use super::BuildingConstraint;

/// Derives the canonical key of a building constraint.
#[must_use]
pub fn key(constraint: &BuildingConstraint) -> String {
    match constraint {
        BuildingConstraint::WallLength { wall, .. } => format!("len:{wall}"),
        BuildingConstraint::ColinearCorner { corner } => format!("col:{corner}"),
        BuildingConstraint::CornerAngle { corner, .. } => format!("ang:{corner}"),
        // Shared prefix: a horizontal and a vertical wall constraint cannot
        // both hold, so they must map to the same key.
        BuildingConstraint::HorizontalWall { wall } | BuildingConstraint::VerticalWall { wall } => {
            format!("axis:{wall}")
        }
        // Shared prefix: parallel and perpendicular on one wall pair collide.
        BuildingConstraint::Parallel { walls, .. }
        | BuildingConstraint::Perpendicular { walls } => {
            let (a, b) = sorted(walls[0].as_str(), walls[1].as_str());
            format!("dir:{a}:{b}")
        }
        BuildingConstraint::WallEntityAbsolute { entity, corner, .. } => {
            let (a, b) = sorted(entity.as_str(), corner.as_str());
            format!("ent:{a}:{b}")
        }
        BuildingConstraint::WallEntityRelative { entities, .. } => {
            let (a, b) = sorted(entities[0].as_str(), entities[1].as_str());
            format!("rel:{a}:{b}")
        }
    }
}

fn sorted<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
