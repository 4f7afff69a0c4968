use super::{Point, NULL_DISTANCE};

/// Returns the minimum distance from `p` to the segment `a`-`b`.
///
/// The projection of `p` onto the segment direction is compared against
/// `[0, |ab|²]`; outside that range the nearer endpoint is used.
#[must_use]
pub fn point_to_segment_dist(p: &Point, a: &Point, b: &Point) -> f64 {
    let ab = b - a;
    let len = ab.norm();
    if len < NULL_DISTANCE {
        return nalgebra::distance(p, a);
    }
    let s = (p - a).dot(&ab);
    if s <= 0.0 {
        nalgebra::distance(p, a)
    } else if s >= len * len {
        nalgebra::distance(p, b)
    } else {
        ab.perp(&(p - a)).abs() / len
    }
}

/// Returns the perpendicular distance from `p` to the infinite line through
/// `a` and `b`, or `None` if `a` and `b` coincide.
#[must_use]
pub fn point_to_line_dist(p: &Point, a: &Point, b: &Point) -> Option<f64> {
    let ab = b - a;
    let len = ab.norm();
    if len < NULL_DISTANCE {
        return None;
    }
    Some(ab.perp(&(p - a)).abs() / len)
}
