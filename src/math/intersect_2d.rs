use super::{Point, Vector, NULL_DISTANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` unless the
/// directions are parallel (`|d1 x d2| < 1e-5`).
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point,
    d1: &Vector,
    p2: &Point,
    d2: &Vector,
) -> Option<(f64, f64)> {
    let cross = d1.perp(d2);
    if cross.abs() < NULL_DISTANCE {
        return None;
    }
    let dp = p2 - p1;
    let t = dp.perp(d2) / cross;
    let u = dp.perp(d1) / cross;
    Some((t, u))
}

/// Returns `true` if `p` lies on the infinite line through `origin` with
/// direction `dir` (unnormalized cross-product test).
#[must_use]
pub fn is_collinear(origin: &Point, dir: &Vector, p: &Point) -> bool {
    dir.perp(&(p - origin)).abs() < NULL_DISTANCE
}

/// Overlap of two collinear segments `a0-a1` and `b0-b1`.
///
/// Both segments are projected onto the direction of `a0-a1`, `b` is ordered
/// by projection and the two intervals are intersected. The result keeps the
/// orientation of `a`. Returns `None` if the intervals are disjoint.
#[must_use]
pub fn collinear_overlap(a0: &Point, a1: &Point, b0: &Point, b1: &Point) -> Option<(Point, Point)> {
    let da = a1 - a0;
    let ext = da.norm_squared();
    let mut ext_b0 = da.dot(&(b0 - a0));
    let mut ext_b1 = da.dot(&(b1 - a0));
    let (mut lo, mut hi) = (*b0, *b1);
    if ext_b0 >= ext_b1 {
        std::mem::swap(&mut lo, &mut hi);
        std::mem::swap(&mut ext_b0, &mut ext_b1);
    }
    if ext_b1 < 0.0 || ext_b0 > ext {
        return None;
    }
    let start = if ext_b0 < 0.0 { *a0 } else { lo };
    let end = if ext_b1 > ext { *a1 } else { hi };
    Some((start, end))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn crossing_lines() {
        let (t, u) = line_line_intersect_2d(
            &pt(0.0, 0.0),
            &Vector::new(1.0, 0.0),
            &pt(0.5, -1.0),
            &Vector::new(0.0, 1.0),
        )
        .unwrap();
        assert!((t - 0.5).abs() < TOL, "t={t}");
        assert!((u - 1.0).abs() < TOL, "u={u}");
    }

    #[test]
    fn parallel_lines() {
        let r = line_line_intersect_2d(
            &pt(0.0, 0.0),
            &Vector::new(1.0, 0.0),
            &pt(0.0, 1.0),
            &Vector::new(2.0, 0.0),
        );
        assert!(r.is_none());
    }

    #[test]
    fn collinearity() {
        assert!(is_collinear(&pt(0.0, 0.0), &Vector::new(1.0, 1.0), &pt(3.0, 3.0)));
        assert!(!is_collinear(&pt(0.0, 0.0), &Vector::new(1.0, 1.0), &pt(3.0, 2.0)));
    }

    #[test]
    fn overlap_partial() {
        let (s, e) = collinear_overlap(&pt(0.0, 0.0), &pt(4.0, 0.0), &pt(6.0, 0.0), &pt(2.0, 0.0)).unwrap();
        assert!((s - pt(2.0, 0.0)).norm() < TOL);
        assert!((e - pt(4.0, 0.0)).norm() < TOL);
    }

    #[test]
    fn overlap_contained() {
        let (s, e) = collinear_overlap(&pt(0.0, 0.0), &pt(4.0, 0.0), &pt(1.0, 0.0), &pt(3.0, 0.0)).unwrap();
        assert!((s - pt(1.0, 0.0)).norm() < TOL);
        assert!((e - pt(3.0, 0.0)).norm() < TOL);
    }

    #[test]
    fn overlap_covering() {
        let (s, e) = collinear_overlap(&pt(0.0, 0.0), &pt(4.0, 0.0), &pt(5.0, 0.0), &pt(-1.0, 0.0)).unwrap();
        assert!((s - pt(0.0, 0.0)).norm() < TOL);
        assert!((e - pt(4.0, 0.0)).norm() < TOL);
    }

    #[test]
    fn overlap_disjoint() {
        assert!(collinear_overlap(&pt(0.0, 0.0), &pt(4.0, 0.0), &pt(5.0, 0.0), &pt(7.0, 0.0)).is_none());
    }
}
