//! Perimeter geometry generation.
//!
//! Builds the solver-facing scaffold for one perimeter: reference points
//! and lines on the declared reference side, thickness-offset counterparts
//! on the other side, and the structural constraints tying the two
//! together. The builder is pure — it reads the domain through
//! [`PlanQuery`] and returns everything it would create; the store decides
//! what to do with it.

use crate::domain::{Corner, PerimeterId, PlanQuery, Side, Wall};
use crate::error::{DomainError, Result, SketchError};
use crate::math::offset_2d::{
    line_line_intersect, normal_toward, point_at, project_onto_line, segment_direction,
};
use crate::math::{Point2, Vector2};

use super::ids::{self, EntityPart};
use super::{ConstraintData, SketchLine, SketchPoint, SolverConstraint};

/// Everything generated for one perimeter, in creation order.
#[derive(Debug, Default)]
pub struct PerimeterGeometry {
    pub points: Vec<SketchPoint>,
    pub lines: Vec<SketchLine>,
    pub constraints: Vec<SolverConstraint>,
}

/// One wall's reference geometry plus its thickness-offset line.
struct WallFrame {
    wall: Wall,
    start: Corner,
    end: Corner,
    /// Unit direction of the reference line, start → end.
    dir: Vector2,
    /// Unit normal pointing from the reference side toward the other face.
    normal: Vector2,
    /// A point on the offset line.
    offset_origin: Point2,
}

/// Builds the full sketch scaffold for a perimeter.
///
/// # Errors
///
/// Returns [`DomainError::PerimeterNotFound`] when the perimeter has no
/// reference side, [`DomainError::MalformedPerimeter`] when its corner and
/// wall loops do not pair up, and [`SketchError::DegenerateWall`] for a
/// zero-length wall.
pub fn build(query: &dyn PlanQuery, perimeter: &PerimeterId) -> Result<PerimeterGeometry> {
    let side = query
        .reference_side(perimeter)
        .ok_or_else(|| DomainError::PerimeterNotFound(perimeter.to_string()))?;
    let corners = query.corners(perimeter);
    let walls = query.walls(perimeter);

    let n = corners.len();
    if n < 3 || walls.len() != n {
        return Err(DomainError::MalformedPerimeter(perimeter.to_string()).into());
    }

    let frames = wall_frames(&corners, &walls, side)?;
    let mut geo = PerimeterGeometry::default();

    build_corners(&mut geo, &frames, side);
    build_walls(&mut geo, &frames);
    build_entities(&mut geo, query, &frames, side);

    Ok(geo)
}

fn wall_frames(corners: &[Corner], walls: &[Wall], side: Side) -> Result<Vec<WallFrame>> {
    let n = corners.len();
    walls
        .iter()
        .enumerate()
        .map(|(i, wall)| {
            let start = corners[i].clone();
            let end = corners[(i + 1) % n].clone();
            let a = start.position(side);
            let b = end.position(side);
            let dir = segment_direction(&a, &b)
                .ok_or_else(|| SketchError::DegenerateWall(wall.id.to_string()))?;
            // The corner's own other-side position tells us which way the
            // thickness offset faces.
            let normal = normal_toward(&dir, &a, &start.position(side.opposite()));
            let offset_origin = a + normal * wall.thickness;
            Ok(WallFrame {
                wall: wall.clone(),
                start,
                end,
                dir,
                normal,
                offset_origin,
            })
        })
        .collect()
}

/// Reference point plus the two wall-projected offset points per corner.
///
/// At an ordinary corner the adjacent offset lines intersect; both offset
/// points sit on that miter intersection and are forced coincident. At a
/// flat (180°) corner the offset lines are parallel — each wall projects
/// its own thickness-offset point, tied perpendicular to that wall's
/// reference line.
fn build_corners(geo: &mut PerimeterGeometry, frames: &[WallFrame], side: Side) {
    let n = frames.len();
    for j in 0..n {
        let incoming = &frames[(j + n - 1) % n];
        let outgoing = &frames[j];
        let corner = &outgoing.start;
        let ref_pos = corner.position(side);

        let mut ref_point = SketchPoint::new(ids::corner_ref_point(&corner.id), ref_pos.x, ref_pos.y);
        // The first corner anchors the sketch; everything else floats.
        ref_point.fixed = j == 0;
        geo.points.push(ref_point);

        let in_id = ids::corner_offset_point(&corner.id, &incoming.wall.id);
        let out_id = ids::corner_offset_point(&corner.id, &outgoing.wall.id);

        match line_line_intersect(
            &incoming.offset_origin,
            &incoming.dir,
            &outgoing.offset_origin,
            &outgoing.dir,
        ) {
            Some((t, _)) => {
                let miter = point_at(&incoming.offset_origin, &incoming.dir, t);
                geo.points.push(SketchPoint::new(in_id.clone(), miter.x, miter.y));
                geo.points.push(SketchPoint::new(out_id.clone(), miter.x, miter.y));
                geo.constraints.push(SolverConstraint::new(
                    format!("pc_cnr_{}", corner.id),
                    ConstraintData::P2pDistance {
                        p1: in_id,
                        p2: out_id,
                        distance: 0.0,
                    },
                ));
            }
            None => {
                // Flat corner: per-wall thickness projections.
                for (frame, off_id) in [(incoming, &in_id), (outgoing, &out_id)] {
                    let pos = ref_pos + frame.normal * frame.wall.thickness;
                    geo.points.push(SketchPoint::new(off_id.clone(), pos.x, pos.y));
                    let line_id = ids::corner_projection_line(&corner.id, &frame.wall.id);
                    geo.lines.push(SketchLine::new(
                        line_id.clone(),
                        ids::corner_ref_point(&corner.id),
                        off_id.clone(),
                    ));
                    geo.constraints.push(SolverConstraint::new(
                        format!("pc_cnr_perp_{}_{}", corner.id, frame.wall.id),
                        ConstraintData::Perpendicular {
                            l1: line_id,
                            l2: ids::wall_ref_line(&frame.wall.id),
                        },
                    ));
                }
            }
        }
    }
}

/// Reference and offset lines per wall, tied together at a fixed thickness
/// offset: a projected point on the reference line, a projection line kept
/// perpendicular, a thickness distance across it, and a parallel constraint
/// between the two wall lines.
fn build_walls(geo: &mut PerimeterGeometry, frames: &[WallFrame]) {
    for frame in frames {
        let wall_id = &frame.wall.id;
        let ref_line = ids::wall_ref_line(wall_id);
        let off_line = ids::wall_offset_line(wall_id);
        let off_start = ids::corner_offset_point(&frame.start.id, wall_id);
        let off_end = ids::corner_offset_point(&frame.end.id, wall_id);

        geo.lines.push(SketchLine::new(
            ref_line.clone(),
            ids::corner_ref_point(&frame.start.id),
            ids::corner_ref_point(&frame.end.id),
        ));
        geo.lines
            .push(SketchLine::new(off_line.clone(), off_start.clone(), off_end));

        // The offset start may have been mitered away from the plain
        // thickness projection; project it back for the foot position.
        let off_start_pos = offset_start_position(geo, &off_start, frame);
        let ref_origin = frame.start_position();
        let foot = project_onto_line(&off_start_pos, &ref_origin, &frame.dir);

        let prj_point = ids::wall_projection_point(wall_id);
        let prj_line = ids::wall_projection_line(wall_id);
        geo.points
            .push(SketchPoint::new(prj_point.clone(), foot.x, foot.y));
        geo.lines.push(SketchLine::new(
            prj_line.clone(),
            prj_point.clone(),
            off_start.clone(),
        ));

        geo.constraints.push(SolverConstraint::new(
            format!("pc_prj_on_{wall_id}"),
            ConstraintData::PointOnLine {
                p: prj_point.clone(),
                l: ref_line.clone(),
            },
        ));
        geo.constraints.push(SolverConstraint::new(
            format!("pc_prj_perp_{wall_id}"),
            ConstraintData::Perpendicular {
                l1: prj_line,
                l2: ref_line.clone(),
            },
        ));
        geo.constraints.push(SolverConstraint::new(
            format!("pc_prj_thk_{wall_id}"),
            ConstraintData::P2pDistance {
                p1: prj_point,
                p2: off_start,
                distance: frame.wall.thickness,
            },
        ));
        geo.constraints.push(SolverConstraint::new(
            format!("pc_par_{wall_id}"),
            ConstraintData::Parallel {
                l1: ref_line,
                l2: off_line,
            },
        ));
    }
}

/// Start/center/end scaffold per wall-mounted entity, constrained onto the
/// wall's reference line with the center on the start/end perpendicular
/// bisector and a fixed width between start and end.
fn build_entities(
    geo: &mut PerimeterGeometry,
    query: &dyn PlanQuery,
    frames: &[WallFrame],
    side: Side,
) {
    for frame in frames {
        let ref_line = ids::wall_ref_line(&frame.wall.id);
        let base = frame.start.position(side);

        for entity in query.wall_entities(&frame.wall.id) {
            let start_id = ids::entity_point(&entity.id, EntityPart::Start);
            let center_id = ids::entity_point(&entity.id, EntityPart::Center);
            let end_id = ids::entity_point(&entity.id, EntityPart::End);

            for (id, along) in [
                (&start_id, entity.offset),
                (&center_id, entity.offset + entity.width / 2.0),
                (&end_id, entity.offset + entity.width),
            ] {
                let pos = point_at(&base, &frame.dir, along);
                geo.points.push(SketchPoint::new(id.clone(), pos.x, pos.y));
            }

            for (id, part) in [(&start_id, "start"), (&center_id, "center"), (&end_id, "end")] {
                geo.constraints.push(SolverConstraint::new(
                    format!("pc_ent_on_{}_{part}", entity.id),
                    ConstraintData::PointOnLine {
                        p: id.clone(),
                        l: ref_line.clone(),
                    },
                ));
            }

            geo.constraints.push(SolverConstraint::new(
                format!("pc_ent_mid_{}", entity.id),
                ConstraintData::PointOnPerpBisector {
                    p: center_id,
                    p1: start_id.clone(),
                    p2: end_id.clone(),
                },
            ));
            geo.constraints.push(SolverConstraint::new(
                format!("pc_ent_w_{}", entity.id),
                ConstraintData::P2pDistance {
                    p1: start_id,
                    p2: end_id,
                    distance: entity.width,
                },
            ));
        }
    }
}

impl WallFrame {
    fn start_position(&self) -> Point2 {
        // offset_origin is the start position displaced by the normal.
        self.offset_origin - self.normal * self.wall.thickness
    }
}

fn offset_start_position(geo: &PerimeterGeometry, off_start: &str, frame: &WallFrame) -> Point2 {
    geo.points
        .iter()
        .find(|p| p.id == off_start)
        .map_or(frame.offset_origin, |p| Point2::new(p.x, p.y))
}
