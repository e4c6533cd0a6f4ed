//! Translation of declarative building constraints into solver primitives.
//!
//! `translate` is pure: the same constraint, key and context always produce
//! the same primitive set with the same ids, so the store can remove a
//! translation later purely from its key (see [`crate::sketch::ids`]).

use crate::domain::{CornerId, Side, WallId};
use crate::error::{DomainError, Result};
use crate::sketch::ids;
use crate::sketch::{ConstraintData, SolverConstraint};

use super::BuildingConstraint;

/// Read-only context a translation runs against.
///
/// This is an always-required capability interface: every method may report
/// "not found". For the lookups that feed side and adjacency resolution a
/// miss is an error at the call site; for [`line_first_point`] a miss is a
/// documented non-error (the optional distance half of a parallel
/// constraint is silently omitted).
///
/// [`line_first_point`]: TranslateContext::line_first_point
pub trait TranslateContext {
    /// Start and end corner of a wall.
    fn wall_corners(&self, wall: &WallId) -> Option<(CornerId, CornerId)>;

    /// The (incoming, outgoing) wall pair adjacent to a corner.
    fn corner_walls(&self, corner: &CornerId) -> Option<(WallId, WallId)>;

    /// Reference side of the perimeter owning a corner.
    fn corner_reference_side(&self, corner: &CornerId) -> Option<Side>;

    /// A representative point on a sketch line — its first endpoint.
    ///
    /// May return `None` (line not in the sketch); callers must treat that
    /// as "capability unavailable", not as a failure.
    fn line_first_point(&self, line: &str) -> Option<String>;
}

/// Translates one building constraint into its solver primitives.
///
/// Every kind maps to exactly one primitive with id `bc_<key>`, except
/// `Parallel`: that always emits `bc_<key>_par` and additionally emits
/// `bc_<key>_dist` when a target distance was given *and* the context can
/// resolve a representative point on the first wall's reference line.
///
/// # Errors
///
/// Returns a [`DomainError`] when adjacency or reference-side resolution
/// fails for a referenced corner or wall.
pub fn translate(
    constraint: &BuildingConstraint,
    key: &str,
    ctx: &dyn TranslateContext,
) -> Result<Vec<SolverConstraint>> {
    let primary_id = ids::building_constraint_id(key);

    let primitives = match constraint {
        BuildingConstraint::WallLength { wall, side, length } => {
            let (start, end) = wall_corners(ctx, wall)?;
            let reference = reference_side(ctx, &start)?;
            // Side resolution: the reference side owns one point per
            // corner; the other side owns one point per adjacent wall, and
            // here the measuring wall is the one doing the projection.
            let (p1, p2) = if *side == reference {
                (ids::corner_ref_point(&start), ids::corner_ref_point(&end))
            } else {
                (
                    ids::corner_offset_point(&start, wall),
                    ids::corner_offset_point(&end, wall),
                )
            };
            vec![SolverConstraint::new(
                primary_id,
                ConstraintData::P2pDistance {
                    p1,
                    p2,
                    distance: *length,
                },
            )]
        }

        BuildingConstraint::ColinearCorner { corner } => {
            // Flatness at B between walls A→B and B→C: constrain A onto the
            // line through B→C. B itself is an endpoint of both reference
            // lines, so constraining B would be vacuous.
            let (w_in, w_out) = corner_walls(ctx, corner)?;
            let (first, _) = wall_corners(ctx, &w_in)?;
            vec![SolverConstraint::new(
                primary_id,
                ConstraintData::PointOnLine {
                    p: ids::corner_ref_point(&first),
                    l: ids::wall_ref_line(&w_out),
                },
            )]
        }

        BuildingConstraint::CornerAngle { corner, radians } => {
            let (w_in, w_out) = corner_walls(ctx, corner)?;
            vec![SolverConstraint::new(
                primary_id,
                ConstraintData::AngleBetweenLines {
                    l1: ids::wall_ref_line(&w_in),
                    l2: ids::wall_ref_line(&w_out),
                    angle: *radians,
                },
            )]
        }

        BuildingConstraint::HorizontalWall { wall } => vec![SolverConstraint::new(
            primary_id,
            ConstraintData::Horizontal {
                l: ids::wall_ref_line(wall),
            },
        )],

        BuildingConstraint::VerticalWall { wall } => vec![SolverConstraint::new(
            primary_id,
            ConstraintData::Vertical {
                l: ids::wall_ref_line(wall),
            },
        )],

        BuildingConstraint::Parallel { walls, distance } => {
            let l1 = ids::wall_ref_line(&walls[0]);
            let l2 = ids::wall_ref_line(&walls[1]);
            let mut out = vec![SolverConstraint::new(
                format!("{primary_id}{}", ids::PARALLEL_SUFFIX),
                ConstraintData::Parallel {
                    l1: l1.clone(),
                    l2: l2.clone(),
                },
            )];
            // The distance half needs both a target value and a
            // representative point; missing either omits it silently.
            if let Some(d) = distance {
                if let Some(p) = ctx.line_first_point(&l1) {
                    out.push(SolverConstraint::new(
                        format!("{primary_id}{}", ids::DISTANCE_SUFFIX),
                        ConstraintData::P2lDistance {
                            p,
                            l: l2,
                            distance: *d,
                        },
                    ));
                }
            }
            out
        }

        BuildingConstraint::Perpendicular { walls } => vec![SolverConstraint::new(
            primary_id,
            ConstraintData::Perpendicular {
                l1: ids::wall_ref_line(&walls[0]),
                l2: ids::wall_ref_line(&walls[1]),
            },
        )],

        BuildingConstraint::WallEntityAbsolute {
            entity,
            corner,
            distance,
        } => vec![SolverConstraint::new(
            primary_id,
            ConstraintData::P2pDistance {
                p1: ids::entity_point(entity, ids::EntityPart::Center),
                p2: ids::corner_ref_point(corner),
                distance: *distance,
            },
        )],

        BuildingConstraint::WallEntityRelative { entities, distance } => {
            vec![SolverConstraint::new(
                primary_id,
                ConstraintData::P2pDistance {
                    p1: ids::entity_point(&entities[0], ids::EntityPart::Center),
                    p2: ids::entity_point(&entities[1], ids::EntityPart::Center),
                    distance: *distance,
                },
            )]
        }
    };

    Ok(primitives)
}

fn wall_corners(ctx: &dyn TranslateContext, wall: &WallId) -> Result<(CornerId, CornerId)> {
    ctx.wall_corners(wall)
        .ok_or_else(|| DomainError::WallNotFound(wall.to_string()).into())
}

fn corner_walls(ctx: &dyn TranslateContext, corner: &CornerId) -> Result<(WallId, WallId)> {
    ctx.corner_walls(corner).ok_or_else(|| {
        DomainError::BrokenAdjacency {
            corner: corner.to_string(),
        }
        .into()
    })
}

fn reference_side(ctx: &dyn TranslateContext, corner: &CornerId) -> Result<Side> {
    ctx.corner_reference_side(corner)
        .ok_or_else(|| DomainError::CornerNotFound(corner.to_string()).into())
}
