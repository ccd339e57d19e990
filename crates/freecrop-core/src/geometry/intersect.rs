//! Segment intersection and path crossing tests.
//!
//! Touching endpoints never count as an intersection. Consecutive segments
//! of a contour always share a vertex, so a looser policy would reject every
//! path after its second edge.

use super::{PathContour, Point};

/// Test whether segment `p1`-`p2` crosses segment `p3`-`p4`.
///
/// Uses the orientation determinant
/// `d = (p4.y - p3.y)(p2.x - p1.x) - (p4.x - p3.x)(p2.y - p1.y)`
/// and the two cross-product numerators `ua`, `ub`. After normalising so
/// that `d >= 0`, the segments intersect when `0 < ua <= d` and
/// `0 < ub <= d`. Parallel and collinear segments (`d == 0`) never
/// intersect.
///
/// The result is symmetric: swapping the two segments gives the same answer.
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let mut d = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    let mut ua = (p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x);
    let mut ub = (p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x);

    if d < 0.0 {
        d = -d;
        ua = -ua;
        ub = -ub;
    }

    ua > 0.0 && ua <= d && ub > 0.0 && ub <= d
}

/// Rough collinearity check comparing the rounded x and y ratios of
/// `p1`->`p3` against `p1`->`p2`.
///
/// This is a heuristic; axis-aligned input produces non-finite ratios and
/// the comparison follows IEEE rules for them.
pub fn are_collinear(p1: Point, p2: Point, p3: Point) -> bool {
    let x_side = (p3.x - p1.x) / (p2.x - p1.x);
    let y_side = (p3.y - p1.y) / (p2.y - p1.y);
    x_side.round() == y_side.round()
}

/// Find the first window where a new candidate point crosses the path.
///
/// Walks `points` from newest to oldest in overlapping windows of three
/// `(a, b, c)` and tests the segment `candidate`-`a` against `b`-`c`.
/// Returns the four points of the first crossing, or `None`. Fewer than
/// three points never intersect.
pub fn find_path_self_intersection(points: &[Point], candidate: Point) -> Option<[Point; 4]> {
    if points.len() < 3 {
        return None;
    }

    (3..=points.len()).rev().find_map(|end| {
        let a = points[end - 1];
        let b = points[end - 2];
        let c = points[end - 3];
        segments_intersect(candidate, a, b, c).then_some([candidate, a, b, c])
    })
}

/// True when adding `candidate` makes the path cross itself.
///
/// See [`find_path_self_intersection`].
pub fn path_self_intersects_new_point(points: &[Point], candidate: Point) -> bool {
    find_path_self_intersection(points, candidate).is_some()
}

/// Find the first consecutive pair of `path` crossed by segment `p1`-`p2`.
///
/// Pairs are tested most recent first. A zero-length segment or a path
/// with fewer than two points never intersects.
pub fn find_segment_path_intersection(p1: Point, p2: Point, path: &[Point]) -> Option<[Point; 4]> {
    if p1 == p2 || path.len() < 2 {
        return None;
    }

    path.windows(2).rev().find_map(|pair| {
        let (older, newer) = (pair[0], pair[1]);
        segments_intersect(p1, p2, newer, older).then_some([p1, p2, newer, older])
    })
}

/// True when segment `p1`-`p2` crosses any edge of `path`.
pub fn segment_intersects_path(p1: Point, p2: Point, path: &[Point]) -> bool {
    find_segment_path_intersection(p1, p2, path).is_some()
}

/// True when `point` lies strictly inside the bounding box of `contour`.
///
/// Cheaper and looser than [`PathContour::contains`]; an empty contour
/// contains nothing.
pub fn bounding_box_contains(contour: &PathContour, point: Point) -> bool {
    match contour.bounding_box() {
        Some(bbox) => {
            bbox.min_x() < point.x
                && bbox.max_x() > point.x
                && bbox.min_y() < point.y
                && bbox.max_y() > point.y
        }
        None => false,
    }
}
