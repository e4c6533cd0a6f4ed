use super::{Point2, Vector2, TOLERANCE};

/// Computes the normalized direction from point `a` to point `b`.
///
/// Returns `None` if the segment has zero length.
#[must_use]
pub fn segment_direction(a: &Point2, b: &Point2) -> Option<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return None;
    }
    Some(d / len)
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: &Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

/// Returns the normal of `dir` pointing toward `target` as seen from `from`.
///
/// Used to orient a wall's thickness offset toward its non-reference side:
/// `from` is a point on the reference line, `target` a point known to lie on
/// the other side. Falls back to the left normal when `target` is on the
/// line itself.
#[must_use]
pub fn normal_toward(dir: &Vector2, from: &Point2, target: &Point2) -> Vector2 {
    let left = left_normal(dir);
    let side = (target - from).dot(&left);
    if side < -TOLERANCE {
        -left
    } else {
        left
    }
}

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not
/// parallel.
#[must_use]
pub fn line_line_intersect(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() < TOLERANCE {
        return None;
    }
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let t = (dx * d2.y - dy * d2.x) / cross;
    let u = (dx * d1.y - dy * d1.x) / cross;
    Some((t, u))
}

/// Linear interpolation: `origin + dir * t`.
#[must_use]
pub fn point_at(origin: &Point2, dir: &Vector2, t: f64) -> Point2 {
    origin + dir * t
}

/// Projects `p` onto the line through `origin` with unit direction `dir`,
/// returning the foot of the perpendicular.
#[must_use]
pub fn project_onto_line(p: &Point2, origin: &Point2, dir: &Vector2) -> Point2 {
    let t = (p - origin).dot(dir);
    origin + dir * t
}
