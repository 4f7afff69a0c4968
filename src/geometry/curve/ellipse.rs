use std::f64::consts::{PI, TAU};

use tracing::warn;

use crate::geometry::{BoundingBox, Transformable};
use crate::math::simplify::simplify;
use crate::math::{angle, coincident, normalized, Point, Transform, Vector, NULL_DISTANCE};

use super::{CurveOps, Polyline, MAX_SAMPLES};

/// Sampling density over a full turn when flattening without a tolerance
/// or for a flat ellipse.
const SAMPLES_PER_TURN: f64 = 64.0;

/// An arc of ellipse.
///
/// `P(a) = center + R(axis_angle) * (rx * cos(a), ry * sin(a))` for the
/// parameter `a` running from `a1` to `a2`. Travel is counter-clockwise in
/// the ellipse frame when `a2 > a1`.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipticalArc {
    center: Point,
    rx: f64,
    ry: f64,
    axis_angle: f64,
    a1: f64,
    a2: f64,
}

impl EllipticalArc {
    /// Creates an arc.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the ellipse
    /// * `rx`, `ry` - Radii along the ellipse's own axes
    /// * `axis_angle` - Angle of the first axis with the x axis, in radians
    /// * `a1`, `a2` - Start and end parameters, in radians
    #[must_use]
    pub fn new(center: Point, rx: f64, ry: f64, axis_angle: f64, a1: f64, a2: f64) -> Self {
        Self {
            center,
            rx,
            ry,
            axis_angle,
            a1,
            a2,
        }
    }

    /// Builds the arc joining `start` to `end` from its endpoint description.
    ///
    /// Among the (up to) four arcs of the given radii and axis angle through
    /// both points, `large_arc` selects the one spanning more than half a
    /// turn and `sweep` the one travelled with increasing angle. Radii too
    /// small to reach `end` are scaled up uniformly until a single solution
    /// exists.
    ///
    /// Returns `None` when the endpoints coincide or a radius is null.
    #[must_use]
    pub fn from_endpoints(
        start: &Point,
        end: &Point,
        rx: f64,
        ry: f64,
        axis_angle: f64,
        large_arc: bool,
        sweep: bool,
    ) -> Option<Self> {
        let (mut rx, mut ry) = (rx.abs(), ry.abs());
        if coincident(start, end) || rx < NULL_DISTANCE || ry < NULL_DISTANCE {
            return None;
        }
        let (s, c) = axis_angle.sin_cos();
        let half = (start - end) / 2.0;
        let x1 = c * half.x + s * half.y;
        let y1 = -s * half.x + c * half.y;

        let lambda = (x1 * x1) / (rx * rx) + (y1 * y1) / (ry * ry);
        if lambda > 1.0 {
            rx *= lambda.sqrt();
            ry *= lambda.sqrt();
        }
        let num = rx * rx * ry * ry - rx * rx * y1 * y1 - ry * ry * x1 * x1;
        let den = rx * rx * y1 * y1 + ry * ry * x1 * x1;
        let mut coef = (num / den).max(0.0).sqrt();
        if large_arc == sweep {
            coef = -coef;
        }
        let cx1 = coef * rx * y1 / ry;
        let cy1 = -coef * ry * x1 / rx;
        let mid = nalgebra::center(start, end);
        let center = Point::new(c * cx1 - s * cy1 + mid.x, s * cx1 + c * cy1 + mid.y);

        let u = Vector::new((x1 - cx1) / rx, (y1 - cy1) / ry);
        let v = Vector::new((-x1 - cx1) / rx, (-y1 - cy1) / ry);
        let a1 = angle(&u);
        let mut delta = (angle(&v) - a1).rem_euclid(TAU);
        if !sweep && delta > 0.0 {
            delta -= TAU;
        }
        Some(Self::new(center, rx, ry, axis_angle, a1, a1 + delta))
    }

    #[must_use]
    pub fn center(&self) -> &Point {
        &self.center
    }

    #[must_use]
    pub fn rx(&self) -> f64 {
        self.rx
    }

    #[must_use]
    pub fn ry(&self) -> f64 {
        self.ry
    }

    #[must_use]
    pub fn axis_angle(&self) -> f64 {
        self.axis_angle
    }

    #[must_use]
    pub fn a1(&self) -> f64 {
        self.a1
    }

    #[must_use]
    pub fn a2(&self) -> f64 {
        self.a2
    }

    /// Signed parameter span `a2 - a1`.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.a2 - self.a1
    }

    /// The map from the unit circle onto this ellipse.
    fn frame(&self) -> Transform {
        let (s, c) = self.axis_angle.sin_cos();
        Transform::new(
            self.rx * c,
            self.rx * s,
            -self.ry * s,
            self.ry * c,
            self.center.x,
            self.center.y,
        )
    }

    /// Point of the ellipse at parameter `a`. Any angle is accepted.
    #[must_use]
    pub fn evaluate(&self, a: f64) -> Point {
        let (s, c) = a.sin_cos();
        self.frame().apply(&Point::new(c, s))
    }

    /// Derivative `dP/da`.
    #[must_use]
    pub fn derivative(&self, a: f64) -> Vector {
        let (s, c) = a.sin_cos();
        self.frame().apply_vector(&Vector::new(-s, c))
    }

    /// Unit tangent at `a`, oriented along the direction of travel.
    fn tangent(&self, a: f64) -> Option<Vector> {
        let d = self.derivative(a);
        if d.norm() < NULL_DISTANCE {
            return None;
        }
        let u = normalized(&d);
        Some(if self.a2 < self.a1 { -u } else { u })
    }

    /// Whether `other` lies on the same ellipse.
    fn same_ellipse(&self, other: &EllipticalArc) -> bool {
        nalgebra::distance(&self.center, &other.center) < NULL_DISTANCE
            && (self.rx - other.rx).abs() < NULL_DISTANCE
            && (self.ry - other.ry).abs() < NULL_DISTANCE
            && (self.axis_angle - other.axis_angle).abs() < NULL_DISTANCE
    }

    /// Extends the arc by `other` when both lie on the same ellipse, travel
    /// the same way and `other` starts at the parameter where `self` ends.
    ///
    /// An arc that turns back over its own path is never fused.
    pub fn append(&mut self, other: &EllipticalArc) -> bool {
        let same_way = self.sweep() * other.sweep() >= 0.0;
        if same_way && self.same_ellipse(other) && (other.a1 - self.a2).abs() < NULL_DISTANCE {
            self.a2 = other.a2;
            true
        } else {
            false
        }
    }

    /// Parameters where the arc reaches an axis extremum, endpoints excluded.
    fn critical_parameters(&self) -> Vec<f64> {
        let (s, c) = self.axis_angle.sin_cos();
        let ex = (-s * self.ry).atan2(c * self.rx);
        let ey = (c * self.ry).atan2(s * self.rx);
        let (lo, hi) = if self.a1 < self.a2 {
            (self.a1, self.a2)
        } else {
            (self.a2, self.a1)
        };
        let mut ts = Vec::new();
        for e in [ex, ey] {
            let mut t = e + ((lo - e) / PI).ceil() * PI;
            while t < hi {
                ts.push(t);
                t += PI;
            }
        }
        ts
    }

    /// Number of flattening samples for `tolerance`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn sample_count(&self, tolerance: f64) -> usize {
        let sweep = self.sweep().abs();
        let rho = (self.rx * self.rx / self.ry).min(self.ry * self.ry / self.rx);
        let segments = if tolerance <= 0.0 || !rho.is_finite() || rho < NULL_DISTANCE {
            sweep / TAU * SAMPLES_PER_TURN
        } else {
            let max_angle = if tolerance >= rho {
                PI
            } else {
                2.0 * (1.0 - tolerance / rho).acos()
            };
            sweep * self.rx.max(self.ry) / max_angle
        };
        let n = 2.0 * segments.ceil();
        (n.min(MAX_SAMPLES as f64) as usize).max(2)
    }

    fn rotate_axis(&mut self, angle: f64) {
        self.axis_angle = wrap_angle(self.axis_angle + angle);
    }
}

/// Brings an angle back into `(-PI, PI]`.
fn wrap_angle(a: f64) -> f64 {
    let r = a.rem_euclid(TAU);
    if r > PI {
        r - TAU
    } else {
        r
    }
}

impl CurveOps for EllipticalArc {
    fn start(&self) -> Option<Point> {
        Some(self.evaluate(self.a1))
    }

    fn end(&self) -> Option<Point> {
        Some(self.evaluate(self.a2))
    }

    fn start_tangent(&self) -> Option<Vector> {
        self.tangent(self.a1)
    }

    fn end_tangent(&self) -> Option<Vector> {
        self.tangent(self.a2)
    }

    #[allow(clippy::cast_precision_loss)]
    fn length(&self, samples: usize) -> f64 {
        let n = samples.max(1);
        let step = self.sweep() / n as f64;
        let mut previous = self.evaluate(self.a1);
        let mut total = 0.0;
        for i in 1..=n {
            let p = self.evaluate(self.a1 + step * i as f64);
            total += nalgebra::distance(&previous, &p);
            previous = p;
        }
        total
    }

    fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::new();
        bbox.add_point(&self.evaluate(self.a1));
        bbox.add_point(&self.evaluate(self.a2));
        for t in self.critical_parameters() {
            bbox.add_point(&self.evaluate(t));
        }
        bbox
    }

    /// Samples the arc with a step bounded by the chord sagitta on the
    /// tightest curvature radius, then simplifies.
    #[allow(clippy::cast_precision_loss)]
    fn to_polyline(&self, tolerance: f64) -> Polyline {
        let n = self.sample_count(tolerance);
        let step = self.sweep() / n as f64;
        let mut points: Vec<Point> = (0..n)
            .map(|i| self.evaluate(self.a1 + step * i as f64))
            .collect();
        points.push(self.evaluate(self.a2));
        if tolerance > 0.0 {
            points = simplify(&points, tolerance);
        }
        Polyline::new(points)
    }

    fn reverse(&mut self) {
        std::mem::swap(&mut self.a1, &mut self.a2);
    }
}

impl Transformable for EllipticalArc {
    /// Re-expresses the arc in the frame of the transformed ellipse.
    ///
    /// The new axes are the stationary directions of the image of the unit
    /// circle. The start parameter is recovered from the mapped start point;
    /// the sweep keeps its magnitude and is reversed when the reversed
    /// candidate lands on the mapped end point. If both candidates land there
    /// (a half ellipse) the sign of the determinant decides.
    fn transform(&mut self, transform: &Transform) -> &mut Self {
        let start = self.evaluate(self.a1);
        let end = self.evaluate(self.a2);
        let m = transform.compose(&self.frame());
        let [a, b, c, d, _, _] = m.coefficients();
        let t = 0.5 * (2.0 * (a * c + b * d)).atan2(a * a + b * b - c * c - d * d);

        let center = m.apply(&Point::origin());
        let (s, co) = t.sin_cos();
        let px = m.apply(&Point::new(co, s)) - center;
        let py = m.apply(&Point::new(-s, co)) - center;

        let mut image = EllipticalArc::new(center, px.norm(), py.norm(), angle(&px), self.a1, self.a2);
        let frame = image.frame();
        let Some(inverse) = frame.invert() else {
            warn!(?transform, "arc collapsed by transform, parameters left unchanged");
            *self = image;
            return self;
        };

        let p1 = inverse.apply(&transform.apply(&start));
        let mut a1 = p1.x.clamp(-1.0, 1.0).acos();
        if p1.y < 0.0 {
            a1 = -a1;
        }
        let p2 = transform.apply(&end);
        let reversed = a1 - self.sweep();
        let direct = a1 + self.sweep();
        let lands = |a: f64| nalgebra::distance(&image.evaluate(a), &p2) < NULL_DISTANCE;
        let a2 = match (lands(reversed), lands(direct)) {
            (true, false) => reversed,
            (false, true) => direct,
            _ if transform.determinant() < 0.0 => reversed,
            _ => direct,
        };
        image.a1 = a1;
        image.a2 = a2;
        *self = image;
        self
    }

    fn translate(&mut self, v: &Vector) -> &mut Self {
        self.center += v;
        self
    }

    fn rotate(&mut self, center: &Point, angle: f64) -> &mut Self {
        self.center = Transform::rotation(center, angle).apply(&self.center);
        self.rotate_axis(angle);
        self
    }

    fn scale(&mut self, center: &Point, ratio: f64) -> &mut Self {
        self.center = Transform::homothety(center, ratio).apply(&self.center);
        self.rx *= ratio.abs();
        self.ry *= ratio.abs();
        if ratio < 0.0 {
            self.rotate_axis(PI);
        }
        self
    }
}
