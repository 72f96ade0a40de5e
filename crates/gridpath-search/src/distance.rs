use gridpath_core::Point;

/// Manhattan distance: `|dx| + |dy|`. The metric of 4-directional
/// movement, so an unobstructed shortest path visits exactly
/// `manhattan(a, b) + 1` points.
#[inline]
pub fn manhattan(p: Point, q: Point) -> i32 {
    (p.x - q.x).abs() + (p.y - q.y).abs()
}
