pub mod generate;
pub mod key;
pub mod legacy;
pub mod translate;

use serde::{Deserialize, Serialize};

use crate::domain::{CornerId, Side, WallEntityId, WallId};

/// A declarative, domain-level geometric constraint.
///
/// This is the canonical, adjacency-aware taxonomy: constraints reference
/// walls, corners and wall-mounted entities directly, and anything that
/// depends on "which adjacent wall" or "which side" is resolved from
/// context at translation time. The older node-tuple taxonomy survives only
/// as deprecated constructors in [`legacy`].
///
/// Both [`key::key`] and [`translate::translate`] match exhaustively over
/// every variant; adding a kind without updating both is a compile error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BuildingConstraint {
    /// Fixes a wall's length, measured on the given face.
    WallLength {
        wall: WallId,
        side: Side,
        length: f64,
    },
    /// Keeps a corner flat: its neighbors and itself stay on one line.
    ColinearCorner { corner: CornerId },
    /// Fixes the interior angle at a corner, in radians.
    CornerAngle { corner: CornerId, radians: f64 },
    /// Keeps a wall horizontal.
    HorizontalWall { wall: WallId },
    /// Keeps a wall vertical.
    VerticalWall { wall: WallId },
    /// Keeps two walls parallel, optionally at a fixed distance.
    Parallel {
        walls: [WallId; 2],
        #[serde(default, skip_serializing_if = "Option::is_none")]
        distance: Option<f64>,
    },
    /// Keeps two walls perpendicular.
    Perpendicular { walls: [WallId; 2] },
    /// Anchors a wall entity's center at a distance from a corner.
    WallEntityAbsolute {
        entity: WallEntityId,
        corner: CornerId,
        distance: f64,
    },
    /// Ties two wall entities' centers together at a distance.
    WallEntityRelative {
        entities: [WallEntityId; 2],
        distance: f64,
    },
}

impl BuildingConstraint {
    /// Corner ids this constraint references.
    #[must_use]
    pub fn corners(&self) -> Vec<&CornerId> {
        match self {
            Self::ColinearCorner { corner } | Self::CornerAngle { corner, .. } => vec![corner],
            Self::WallEntityAbsolute { corner, .. } => vec![corner],
            Self::WallLength { .. }
            | Self::HorizontalWall { .. }
            | Self::VerticalWall { .. }
            | Self::Parallel { .. }
            | Self::Perpendicular { .. }
            | Self::WallEntityRelative { .. } => Vec::new(),
        }
    }

    /// Wall ids this constraint references.
    #[must_use]
    pub fn walls(&self) -> Vec<&WallId> {
        match self {
            Self::WallLength { wall, .. }
            | Self::HorizontalWall { wall }
            | Self::VerticalWall { wall } => vec![wall],
            Self::Parallel { walls, .. } | Self::Perpendicular { walls } => {
                walls.iter().collect()
            }
            Self::ColinearCorner { .. }
            | Self::CornerAngle { .. }
            | Self::WallEntityAbsolute { .. }
            | Self::WallEntityRelative { .. } => Vec::new(),
        }
    }

    /// Wall-entity ids this constraint references.
    #[must_use]
    pub fn entities(&self) -> Vec<&WallEntityId> {
        match self {
            Self::WallEntityAbsolute { entity, .. } => vec![entity],
            Self::WallEntityRelative { entities, .. } => entities.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Short kind name for log messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::WallLength { .. } => "wallLength",
            Self::ColinearCorner { .. } => "colinearCorner",
            Self::CornerAngle { .. } => "cornerAngle",
            Self::HorizontalWall { .. } => "horizontalWall",
            Self::VerticalWall { .. } => "verticalWall",
            Self::Parallel { .. } => "parallel",
            Self::Perpendicular { .. } => "perpendicular",
            Self::WallEntityAbsolute { .. } => "wallEntityAbsolute",
            Self::WallEntityRelative { .. } => "wallEntityRelative",
        }
    }
}
