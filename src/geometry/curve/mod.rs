mod bezier;
mod ellipse;
mod polyline;

pub use bezier::BezierCurve;
pub use ellipse::EllipticalArc;
pub use polyline::Polyline;

use crate::geometry::{BoundingBox, Line, Transformable};
use crate::math::{Point, Transform, Vector};

/// Number of chord subdivisions used when a caller has no preference.
pub const DEFAULT_LENGTH_SAMPLES: usize = 5;

/// Upper bound on the number of samples taken while flattening.
pub(crate) const MAX_SAMPLES: usize = 100_000;

/// Operations shared by every curve variant.
pub trait CurveOps {
    /// First point of the curve, `None` for a curve without nodes.
    fn start(&self) -> Option<Point>;

    /// Last point of the curve, `None` for a curve without nodes.
    fn end(&self) -> Option<Point>;

    /// Unit tangent leaving the start point.
    ///
    /// Returns `None` when the direction is undefined (too few nodes or a
    /// zero-length first segment).
    fn start_tangent(&self) -> Option<Vector>;

    /// Unit tangent arriving at the end point.
    fn end_tangent(&self) -> Option<Vector>;

    /// Chord-sum length using `samples` subdivisions per segment.
    ///
    /// Exact for polylines.
    fn length(&self, samples: usize) -> f64;

    /// Axis-aligned box enclosing the curve.
    fn bounding_box(&self) -> BoundingBox;

    /// Flattens the curve to a polyline deviating by at most `tolerance`.
    fn to_polyline(&self, tolerance: f64) -> Polyline;

    /// Reverses the direction of travel.
    fn reverse(&mut self);
}

/// Unit direction from `a` to `b`.
pub(crate) fn direction(a: &Point, b: &Point) -> Option<Vector> {
    Line::segment(*a, *b).vector()
}

/// A path element.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    Polyline(Polyline),
    Bezier(BezierCurve),
    Arc(EllipticalArc),
}

impl Curve {
    /// Fuses `other` onto the end of `self`.
    ///
    /// Only curves of the same variant fuse (Bezier curves must also share
    /// their order), and only when `other` starts where `self` ends.
    pub fn append(&mut self, other: &Curve) -> bool {
        match (self, other) {
            (Curve::Polyline(a), Curve::Polyline(b)) => a.append(b),
            (Curve::Bezier(a), Curve::Bezier(b)) => a.append(b),
            (Curve::Arc(a), Curve::Arc(b)) => a.append(b),
            _ => false,
        }
    }

    fn ops(&self) -> &dyn CurveOps {
        match self {
            Curve::Polyline(c) => c,
            Curve::Bezier(c) => c,
            Curve::Arc(c) => c,
        }
    }
}

impl CurveOps for Curve {
    fn start(&self) -> Option<Point> {
        self.ops().start()
    }

    fn end(&self) -> Option<Point> {
        self.ops().end()
    }

    fn start_tangent(&self) -> Option<Vector> {
        self.ops().start_tangent()
    }

    fn end_tangent(&self) -> Option<Vector> {
        self.ops().end_tangent()
    }

    fn length(&self, samples: usize) -> f64 {
        self.ops().length(samples)
    }

    fn bounding_box(&self) -> BoundingBox {
        self.ops().bounding_box()
    }

    fn to_polyline(&self, tolerance: f64) -> Polyline {
        self.ops().to_polyline(tolerance)
    }

    fn reverse(&mut self) {
        match self {
            Curve::Polyline(c) => c.reverse(),
            Curve::Bezier(c) => c.reverse(),
            Curve::Arc(c) => c.reverse(),
        }
    }
}

impl Transformable for Curve {
    fn transform(&mut self, transform: &Transform) -> &mut Self {
        match self {
            Curve::Polyline(c) => {
                c.transform(transform);
            }
            Curve::Bezier(c) => {
                c.transform(transform);
            }
            Curve::Arc(c) => {
                c.transform(transform);
            }
        }
        self
    }
}

impl From<Polyline> for Curve {
    fn from(c: Polyline) -> Self {
        Curve::Polyline(c)
    }
}

impl From<BezierCurve> for Curve {
    fn from(c: BezierCurve) -> Self {
        Curve::Bezier(c)
    }
}

impl From<EllipticalArc> for Curve {
    fn from(c: EllipticalArc) -> Self {
        Curve::Arc(c)
    }
}
