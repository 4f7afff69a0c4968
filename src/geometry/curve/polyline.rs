use crate::geometry::{BoundingBox, Transformable};
use crate::math::simplify::simplify;
use crate::math::{coincident, Point, Transform, Vector};

use super::{direction, CurveOps};

/// A chain of straight segments through its nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    nodes: Vec<Point>,
}

impl Polyline {
    /// Creates a polyline through `nodes`.
    #[must_use]
    pub fn new(nodes: Vec<Point>) -> Self {
        Self { nodes }
    }

    /// Appends a vertex.
    pub fn add_node(&mut self, p: Point) -> &mut Self {
        self.nodes.push(p);
        self
    }

    /// Appends several vertices.
    pub fn add_nodes(&mut self, points: impl IntoIterator<Item = Point>) -> &mut Self {
        self.nodes.extend(points);
        self
    }

    #[must_use]
    pub fn nodes(&self) -> &[Point] {
        &self.nodes
    }

    #[must_use]
    pub fn node(&self, index: usize) -> Option<&Point> {
        self.nodes.get(index)
    }

    /// Concatenates `other` if it starts where `self` ends.
    ///
    /// An empty polyline accepts anything. Returns `false` and leaves `self`
    /// untouched when the endpoints are more than `1e-5` apart.
    pub fn append(&mut self, other: &Polyline) -> bool {
        match (self.nodes.last(), other.nodes.first()) {
            (None, _) => {
                self.nodes.extend_from_slice(&other.nodes);
                true
            }
            (Some(_), None) => true,
            (Some(end), Some(start)) if coincident(end, start) => {
                self.nodes.extend_from_slice(&other.nodes[1..]);
                true
            }
            _ => false,
        }
    }
}

impl CurveOps for Polyline {
    fn start(&self) -> Option<Point> {
        self.nodes.first().copied()
    }

    fn end(&self) -> Option<Point> {
        self.nodes.last().copied()
    }

    fn start_tangent(&self) -> Option<Vector> {
        match self.nodes.as_slice() {
            [a, b, ..] => direction(a, b),
            _ => None,
        }
    }

    fn end_tangent(&self) -> Option<Vector> {
        match self.nodes.as_slice() {
            [.., a, b] => direction(a, b),
            _ => None,
        }
    }

    /// Exact length; `samples` is ignored.
    fn length(&self, _samples: usize) -> f64 {
        self.nodes
            .windows(2)
            .map(|w| nalgebra::distance(&w[0], &w[1]))
            .sum()
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.nodes)
    }

    /// Douglas-Peucker simplification; a non-positive tolerance returns a copy.
    fn to_polyline(&self, tolerance: f64) -> Polyline {
        if tolerance > 0.0 {
            Polyline::new(simplify(&self.nodes, tolerance))
        } else {
            self.clone()
        }
    }

    fn reverse(&mut self) {
        self.nodes.reverse();
    }
}

impl Transformable for Polyline {
    fn transform(&mut self, transform: &Transform) -> &mut Self {
        for p in &mut self.nodes {
            *p = transform.apply(p);
        }
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Mirror;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn sample() -> Polyline {
        Polyline::new(vec![pt(4.0, 3.0), pt(6.0, 1.0), pt(3.0, -2.0)])
    }

    #[test]
    fn add_nodes_in_order() {
        let mut p = Polyline::default();
        p.add_node(pt(3.0, -2.0))
            .add_nodes([pt(4.0, 5.0), pt(7.0, -3.0), pt(8.0, 2.0)]);
        assert_eq!(p.nodes().len(), 4);
        assert_eq!(p.node(2), Some(&pt(7.0, -3.0)));
        assert!(p.node(5).is_none());
    }

    #[test]
    fn append_requires_continuity() {
        let mut p = Polyline::new(vec![pt(3.0, -2.0), pt(7.0, 4.0)]);
        let mut q = Polyline::new(vec![pt(4.0, 3.0), pt(6.0, 1.0), pt(3.0, -2.0)]);
        assert!(!p.append(&q));
        assert_eq!(p.nodes().len(), 2);
        assert!(q.append(&p));
        assert_eq!(
            q.nodes(),
            &[pt(4.0, 3.0), pt(6.0, 1.0), pt(3.0, -2.0), pt(7.0, 4.0)]
        );
    }

    #[test]
    fn append_to_empty() {
        let mut p = Polyline::default();
        assert!(p.append(&sample()));
        assert_eq!(p, sample());
    }

    #[test]
    fn endpoints_and_tangents() {
        let p = sample();
        assert_eq!(p.start(), Some(pt(4.0, 3.0)));
        assert_eq!(p.end(), Some(pt(3.0, -2.0)));
        let s = p.start_tangent().unwrap();
        assert_abs_diff_eq!(s, Vector::new(0.707, -0.707), epsilon = 1e-3);
        let e = p.end_tangent().unwrap();
        assert_abs_diff_eq!(e, Vector::new(-0.707, -0.707), epsilon = 1e-3);
        assert!(Polyline::new(vec![pt(1.0, 1.0)]).start_tangent().is_none());
        assert!(Polyline::new(vec![pt(1.0, 1.0), pt(1.0, 1.0)]).end_tangent().is_none());
    }

    #[test]
    fn exact_length() {
        assert!((sample().length(0) - 7.071).abs() < 1e-3);
    }

    #[test]
    fn bounding_box_over_nodes() {
        let b = sample().bounding_box();
        assert_eq!(b.min().unwrap(), pt(3.0, -2.0));
        assert_eq!(b.max().unwrap(), pt(6.0, 3.0));
    }

    #[test]
    fn to_polyline_simplifies() {
        let p = Polyline::new(vec![pt(4.0, 3.0), pt(4.0, 1.0), pt(3.0, -2.0)]);
        assert_eq!(p.to_polyline(0.2).nodes().len(), 3);
        assert_eq!(p.to_polyline(0.5).nodes(), &[pt(4.0, 3.0), pt(3.0, -2.0)]);
        assert_eq!(p.to_polyline(0.0), p);
    }

    #[test]
    fn geometric_operations() {
        let mut p = sample();
        p.translate(&Vector::new(1.0, 2.0));
        assert_eq!(p.nodes(), &[pt(5.0, 5.0), pt(7.0, 3.0), pt(4.0, 0.0)]);

        let mut p = sample();
        p.rotate(&pt(0.0, 1.0), PI / 2.0);
        assert_abs_diff_eq!(p.nodes()[0], pt(-2.0, 5.0), epsilon = 1e-9);
        assert_abs_diff_eq!(p.nodes()[2], pt(3.0, 4.0), epsilon = 1e-9);

        let mut p = sample();
        p.scale(&pt(0.0, 1.0), -2.0);
        assert_abs_diff_eq!(p.nodes()[1], pt(-12.0, 1.0), epsilon = 1e-12);

        let mut p = sample();
        p.reflect(&Mirror::Center(pt(0.0, 1.0)));
        assert_abs_diff_eq!(p.nodes()[0], pt(-4.0, -1.0), epsilon = 1e-12);

        let mut p = sample();
        p.transform(&Transform::new(1.0, 0.0, 0.0, -1.0, 0.0, 2.0));
        assert_abs_diff_eq!(p.nodes()[2], pt(3.0, 4.0), epsilon = 1e-12);
    }

    #[test]
    fn reverse_nodes() {
        let mut p = sample();
        p.reverse();
        assert_eq!(p.start(), Some(pt(3.0, -2.0)));
    }
}
