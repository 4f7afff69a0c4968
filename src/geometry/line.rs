use crate::math::distance_2d::{point_to_line_dist, point_to_segment_dist};
use crate::math::intersect_2d::{collinear_overlap, is_collinear, line_line_intersect_2d};
use crate::math::{self, Point, Transform, Vector, NULL_DISTANCE};

use super::Transformable;

/// A segment between two points, or the infinite line through them.
///
/// The defining points are kept for infinite lines too, so the orientation
/// from `a` to `b` is always available.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    a: Point,
    b: Point,
    infinite: bool,
}

/// Result of intersecting two lines.
#[derive(Debug, Clone, PartialEq)]
pub enum Intersection {
    /// The lines cross at a single point.
    Point(Point),
    /// The lines are collinear and share a segment (or a whole line).
    Line(Line),
}

impl Line {
    /// Creates a line; `infinite` selects an unbounded line instead of a segment.
    #[must_use]
    pub fn new(a: Point, b: Point, infinite: bool) -> Self {
        Self { a, b, infinite }
    }

    /// Creates the segment `a`-`b`.
    #[must_use]
    pub fn segment(a: Point, b: Point) -> Self {
        Self::new(a, b, false)
    }

    /// Creates the infinite line through `a` and `b`.
    #[must_use]
    pub fn infinite(a: Point, b: Point) -> Self {
        Self::new(a, b, true)
    }

    /// First defining point.
    #[must_use]
    pub fn start(&self) -> &Point {
        &self.a
    }

    /// Second defining point.
    #[must_use]
    pub fn end(&self) -> &Point {
        &self.b
    }

    #[must_use]
    pub fn is_infinite(&self) -> bool {
        self.infinite
    }

    /// Turns a segment into the infinite line through its endpoints.
    pub fn to_infinite(&mut self) -> &mut Self {
        self.infinite = true;
        self
    }

    /// Bounds the line to the segment between its defining points.
    pub fn to_segment(&mut self) -> &mut Self {
        self.infinite = false;
        self
    }

    /// Swaps the defining points.
    pub fn reverse(&mut self) -> &mut Self {
        std::mem::swap(&mut self.a, &mut self.b);
        self
    }

    /// Returns `true` if the defining points coincide.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        nalgebra::distance(&self.a, &self.b) < NULL_DISTANCE
    }

    /// Segment length, or `None` for an infinite line.
    #[must_use]
    pub fn length(&self) -> Option<f64> {
        (!self.infinite).then(|| nalgebra::distance(&self.a, &self.b))
    }

    /// Angle of the direction from `a` to `b`, in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        math::angle(&(self.b - self.a))
    }

    /// Unit direction from `a` to `b`, or `None` if the line is degenerate.
    #[must_use]
    pub fn vector(&self) -> Option<Vector> {
        if self.is_degenerate() {
            return None;
        }
        Some((self.b - self.a).normalize())
    }

    /// Distance from `p` to the segment or line.
    ///
    /// Returns `None` for a degenerate infinite line.
    #[must_use]
    pub fn distance(&self, p: &Point) -> Option<f64> {
        if self.infinite {
            point_to_line_dist(p, &self.a, &self.b)
        } else {
            Some(point_to_segment_dist(p, &self.a, &self.b))
        }
    }

    /// Infinite line through `p` parallel to `self`.
    #[must_use]
    pub fn parallel(&self, p: &Point) -> Option<Line> {
        let v = self.vector()?;
        Some(Line::infinite(*p, *p + v))
    }

    /// Infinite line through `p` perpendicular to `self`.
    #[must_use]
    pub fn perpendicular(&self, p: &Point) -> Option<Line> {
        let v = self.vector()?;
        Some(Line::infinite(*p, *p + Vector::new(-v.y, v.x)))
    }

    /// Midpoint of a segment, `None` for an infinite line.
    #[must_use]
    pub fn midpoint(&self) -> Option<Point> {
        (!self.infinite).then(|| nalgebra::center(&self.a, &self.b))
    }

    /// Perpendicular bisector of a segment.
    #[must_use]
    pub fn midperpendicular(&self) -> Option<Line> {
        let m = self.midpoint()?;
        self.perpendicular(&m)
    }

    /// Infinite line through the intersection point of `self` and `other`
    /// whose direction is the mean of both line angles.
    ///
    /// Returns `None` unless the lines meet at a single point.
    #[must_use]
    pub fn bisector(&self, other: &Line) -> Option<Line> {
        let Some(Intersection::Point(i)) = self.intersect(other) else {
            return None;
        };
        let angle = (self.angle() + other.angle()) / 2.0;
        Some(Line::infinite(i, i + math::polar(1.0, angle)))
    }

    /// Intersection of two lines or segments.
    ///
    /// Parallel distinct lines and degenerate lines give `None`. Collinear
    /// inputs give the overlapping part: if either operand is infinite the
    /// other one is returned whole; two segments give their common
    /// sub-segment, or a point when they only touch.
    #[must_use]
    pub fn intersect(&self, other: &Line) -> Option<Intersection> {
        if self.is_degenerate() || other.is_degenerate() {
            return None;
        }
        let d1 = self.b - self.a;
        let d2 = other.b - other.a;
        if let Some((t, u)) = line_line_intersect_2d(&self.a, &d1, &other.a, &d2) {
            if !self.infinite && !(0.0..=1.0).contains(&t) {
                return None;
            }
            if !other.infinite && !(0.0..=1.0).contains(&u) {
                return None;
            }
            return Some(Intersection::Point(self.a + d1 * t));
        }
        if !is_collinear(&self.a, &d1, &other.a) {
            return None;
        }
        if self.infinite {
            return Some(Intersection::Line(other.clone()));
        }
        if other.infinite {
            return Some(Intersection::Line(self.clone()));
        }
        let (s, e) = collinear_overlap(&self.a, &self.b, &other.a, &other.b)?;
        if nalgebra::distance(&s, &e) < NULL_DISTANCE {
            Some(Intersection::Point(s))
        } else {
            Some(Intersection::Line(Line::segment(s, e)))
        }
    }
}

impl Transformable for Line {
    fn transform(&mut self, transform: &Transform) -> &mut Self {
        self.a = transform.apply(&self.a);
        self.b = transform.apply(&self.b);
        self
    }
}
