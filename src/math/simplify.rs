use super::distance_2d::point_to_segment_dist;
use super::Point;

/// Distances closer than this are a tie, won by the lowest index.
const TIE_TOLERANCE: f64 = 1e-12;

/// Douglas-Peucker simplification of an ordered point list.
///
/// Points closer than `tolerance` to the chord between the surviving
/// endpoints of their range are dropped. The first and last points are always
/// kept; lists of fewer than three points are returned unchanged.
#[must_use]
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut kept = Vec::with_capacity(points.len());
    kept.push(points[0]);
    simplify_range(points, tolerance, 0, points.len() - 1, &mut kept);
    kept
}

/// Pushes the survivors of `points[first+1..=last]` onto `kept`.
fn simplify_range(points: &[Point], tolerance: f64, first: usize, last: usize, kept: &mut Vec<Point>) {
    let mut d_max = 0.0;
    let mut i_max = first;
    for i in first + 1..last {
        let d = point_to_segment_dist(&points[i], &points[first], &points[last]);
        if d > d_max + TIE_TOLERANCE {
            d_max = d;
            i_max = i;
        }
    }
    if i_max != first && d_max > tolerance {
        simplify_range(points, tolerance, first, i_max, kept);
        simplify_range(points, tolerance, i_max, last, kept);
    } else {
        kept.push(points[last]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn keeps_vertex_beyond_tolerance() {
        let p = pts(&[(4.0, 3.0), (4.0, 1.0), (3.0, -2.0)]);
        assert_eq!(simplify(&p, 0.2), p);
    }

    #[test]
    fn drops_vertex_within_tolerance() {
        let p = pts(&[(4.0, 3.0), (4.0, 1.0), (3.0, -2.0)]);
        assert_eq!(simplify(&p, 0.5), pts(&[(4.0, 3.0), (3.0, -2.0)]));
    }

    #[test]
    fn short_lists_unchanged() {
        let p = pts(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(simplify(&p, 10.0), p);
        assert!(simplify(&[], 1.0).is_empty());
    }

    #[test]
    fn recursion_shares_pivot_once() {
        let p = pts(&[(0.0, 0.0), (1.0, 1.01), (2.0, 2.0), (3.0, 1.01), (4.0, 0.0)]);
        assert_eq!(simplify(&p, 0.1), pts(&[(0.0, 0.0), (2.0, 2.0), (4.0, 0.0)]));
    }

    #[test]
    fn ties_keep_first_index() {
        let p = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0), (4.0, 0.0)]);
        let s = simplify(&p, 0.5);
        assert_eq!(s[1], Point::new(1.0, 1.0));
    }

    #[test]
    fn rounding_noise_does_not_break_ties() {
        let p = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 1.0 + 1e-15), (3.0, 0.0)]);
        assert_eq!(simplify(&p, 0.5), pts(&[(0.0, 0.0), (1.0, 1.0), (3.0, 0.0)]));
    }

    #[test]
    fn negative_tolerance_keeps_collinear_points() {
        let p = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        assert_eq!(simplify(&p, -1.0), pts(&[(0.0, 0.0), (2.0, 0.0)]));
    }

    #[test]
    fn idempotent() {
        let p = pts(&[
            (0.0, 0.0),
            (0.5, 0.3),
            (1.0, -0.2),
            (1.5, 1.4),
            (2.0, 0.1),
            (3.0, 0.0),
            (3.2, 2.0),
        ]);
        let once = simplify(&p, 0.25);
        assert_eq!(simplify(&once, 0.25), once);
    }
}
