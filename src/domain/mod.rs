pub mod event;

#[cfg(test)]
pub(crate) mod fixture;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::{Point2, Vector2};

macro_rules! domain_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        ///
        /// Opaque and owned by the external domain model; the engine never
        /// mints one of these.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw domain identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the raw identifier string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

domain_id!(
    /// Unique identifier for a perimeter corner.
    CornerId
);
domain_id!(
    /// Unique identifier for a wall.
    WallId
);
domain_id!(
    /// Unique identifier for a wall-mounted entity (opening or post).
    WallEntityId
);
domain_id!(
    /// Unique identifier for a perimeter.
    PerimeterId
);
domain_id!(
    /// Unique identifier for a storey.
    StoreyId
);

/// A face of the perimeter. One side per perimeter is declared the
/// *reference* side; the opposite face is derived via thickness offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Outside,
    Inside,
}

impl Side {
    /// Returns the opposite face.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Outside => Self::Inside,
            Self::Inside => Self::Outside,
        }
    }
}

/// Snapshot of a perimeter corner as read from the domain model.
#[derive(Debug, Clone)]
pub struct Corner {
    pub id: CornerId,
    pub perimeter: PerimeterId,
    /// Position on the outside face.
    pub outside: Point2,
    /// Position on the inside face.
    pub inside: Point2,
}

impl Corner {
    /// Returns the corner position on the given face.
    #[must_use]
    pub fn position(&self, side: Side) -> Point2 {
        match side {
            Side::Outside => self.outside,
            Side::Inside => self.inside,
        }
    }
}

/// Snapshot of a wall as read from the domain model.
///
/// A wall connects `start_corner` to `end_corner`; `direction` is the unit
/// start→end direction measured on the reference side.
#[derive(Debug, Clone)]
pub struct Wall {
    pub id: WallId,
    pub perimeter: PerimeterId,
    pub start_corner: CornerId,
    pub end_corner: CornerId,
    pub thickness: f64,
    pub direction: Vector2,
    pub length_outside: f64,
    pub length_inside: f64,
    /// Explicit user length override (freeform authoring only).
    pub length_override: Option<f64>,
}

impl Wall {
    /// Returns the wall length on the given face.
    #[must_use]
    pub fn length(&self, side: Side) -> f64 {
        match side {
            Side::Outside => self.length_outside,
            Side::Inside => self.length_inside,
        }
    }
}

/// Kind of a wall-mounted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Opening,
    Post,
}

/// Snapshot of a wall-mounted entity (opening or post).
#[derive(Debug, Clone)]
pub struct WallEntity {
    pub id: WallEntityId,
    pub wall: WallId,
    pub kind: EntityKind,
    /// Distance from the wall's start corner along the reference line.
    pub offset: f64,
    pub width: f64,
}

/// Narrow read-only query interface into the building domain model.
///
/// The engine reads the domain exclusively through this trait and never
/// writes back. Lookups return `None`/empty rather than erroring; callers
/// decide whether a miss is fatal.
pub trait PlanQuery {
    /// Declared reference side of a perimeter.
    fn reference_side(&self, perimeter: &PerimeterId) -> Option<Side>;

    /// Ordered closed corner loop of a perimeter.
    fn corners(&self, perimeter: &PerimeterId) -> Vec<Corner>;

    /// Ordered wall loop of a perimeter; wall `i` connects corner `i` to
    /// corner `i + 1` (wrapping).
    fn walls(&self, perimeter: &PerimeterId) -> Vec<Wall>;

    /// Single corner lookup.
    fn corner(&self, id: &CornerId) -> Option<Corner>;

    /// Single wall lookup.
    fn wall(&self, id: &WallId) -> Option<Wall>;

    /// The pair of walls adjacent to a corner, as (incoming, outgoing).
    fn corner_walls(&self, corner: &CornerId) -> Option<(WallId, WallId)>;

    /// Entities mounted on a wall, ordered by offset.
    fn wall_entities(&self, wall: &WallId) -> Vec<WallEntity>;

    /// Single entity lookup.
    fn entity(&self, id: &WallEntityId) -> Option<WallEntity>;

    /// The currently active storey, if any.
    fn active_storey(&self) -> Option<StoreyId>;

    /// All perimeters belonging to a storey.
    fn storey_perimeters(&self, storey: &StoreyId) -> Vec<PerimeterId>;

    /// The storey a perimeter belongs to.
    fn perimeter_storey(&self, perimeter: &PerimeterId) -> Option<StoreyId>;
}
