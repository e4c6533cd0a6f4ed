//! Deterministic sketch-entity id derivation.
//!
//! Every id generated for the solver sketch is a pure function of the
//! domain ids (or of a building-constraint key), so removal never requires
//! remembering what a translation produced — the id set can always be
//! re-derived.

use crate::domain::{CornerId, WallEntityId, WallId};

/// Suffix of the parallel half of a translated `Parallel` constraint.
pub const PARALLEL_SUFFIX: &str = "_par";

/// Suffix of the optional distance half of a translated `Parallel`.
pub const DISTANCE_SUFFIX: &str = "_dist";

/// Reference-side point of a corner.
#[must_use]
pub fn corner_ref_point(corner: &CornerId) -> String {
    format!("pt_ref_{corner}")
}

/// Non-reference-side point of a corner, as projected by one adjacent wall.
#[must_use]
pub fn corner_offset_point(corner: &CornerId, wall: &WallId) -> String {
    format!("pt_off_{corner}_{wall}")
}

/// Reference-side line of a wall.
#[must_use]
pub fn wall_ref_line(wall: &WallId) -> String {
    format!("ln_ref_{wall}")
}

/// Thickness-offset line of a wall.
#[must_use]
pub fn wall_offset_line(wall: &WallId) -> String {
    format!("ln_off_{wall}")
}

/// Projection foot of a wall's offset line onto its reference line.
#[must_use]
pub fn wall_projection_point(wall: &WallId) -> String {
    format!("pt_prj_{wall}")
}

/// Line across a wall's thickness, from projection foot to offset start.
#[must_use]
pub fn wall_projection_line(wall: &WallId) -> String {
    format!("ln_prj_{wall}")
}

/// Thickness line at a flat (180°) corner, one per adjacent wall.
#[must_use]
pub fn corner_projection_line(corner: &CornerId, wall: &WallId) -> String {
    format!("ln_cnr_{corner}_{wall}")
}

/// The three points scaffolding a wall entity on its reference line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityPart {
    Start,
    Center,
    End,
}

impl EntityPart {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        }
    }
}

/// One of an entity's three scaffold points.
#[must_use]
pub fn entity_point(entity: &WallEntityId, part: EntityPart) -> String {
    format!("pt_ent_{entity}_{}", part.as_str())
}

/// Primary primitive id of a translated building constraint.
#[must_use]
pub fn building_constraint_id(key: &str) -> String {
    format!("bc_{key}")
}

/// The complete primitive-id set a key can have produced.
///
/// Removal deletes all three unconditionally; absent ids are no-ops.
#[must_use]
pub fn building_constraint_ids(key: &str) -> [String; 3] {
    let base = building_constraint_id(key);
    [
        format!("{base}{PARALLEL_SUFFIX}"),
        format!("{base}{DISTANCE_SUFFIX}"),
        base,
    ]
}

/// Maps a primitive id back to its building-constraint key, if it is one.
///
/// Used to match the solver's post-solve conflict/redundancy report (opaque
/// primitive-id sets) back onto declarative constraints.
#[must_use]
pub fn key_of_primitive(id: &str) -> Option<&str> {
    let key = id.strip_prefix("bc_")?;
    let key = key
        .strip_suffix(PARALLEL_SUFFIX)
        .or_else(|| key.strip_suffix(DISTANCE_SUFFIX))
        .unwrap_or(key);
    Some(key)
}
