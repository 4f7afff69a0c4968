use crate::error::{CurveError, Result};
use crate::geometry::{BoundingBox, Transformable};
use crate::math::simplify::simplify;
use crate::math::weighted::blend;
use crate::math::{coincident, Point, Transform, Vector, EXTREMUM_TOLERANCE, NULL_DISTANCE};

use super::{direction, CurveOps, Polyline, DEFAULT_LENGTH_SAMPLES, MAX_SAMPLES};

/// Sampling density per segment when flattening without a tolerance.
const UNBOUNDED_SAMPLES_PER_SEGMENT: usize = 32;

/// A chain of Bezier segments of a common order sharing their end nodes.
///
/// A curve of order `n` made of `k` segments holds `k * n + 1` nodes; segment
/// `i` uses nodes `i * n ..= (i + 1) * n`. The curve parameter runs over
/// `[0, k]`, segment `i` covering `[i, i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierCurve {
    order: u32,
    nodes: Vec<Point>,
}

impl BezierCurve {
    /// Creates a Bezier curve of the given order.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::UnsupportedOrder`] for order 0 and
    /// [`CurveError::InvalidNodeCount`] if `nodes` cannot be split into whole
    /// segments.
    pub fn new(order: u32, nodes: Vec<Point>) -> Result<Self> {
        let mut curve = Self::with_order(order)?;
        curve.nodes = nodes;
        if !curve.is_valid() {
            return Err(CurveError::InvalidNodeCount {
                order,
                count: curve.nodes.len(),
            }
            .into());
        }
        Ok(curve)
    }

    /// Creates an empty curve to be filled with [`BezierCurve::add_node`].
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::UnsupportedOrder`] for order 0.
    pub fn with_order(order: u32) -> Result<Self> {
        if order == 0 {
            return Err(CurveError::UnsupportedOrder(order).into());
        }
        Ok(Self {
            order,
            nodes: Vec::new(),
        })
    }

    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    #[must_use]
    pub fn nodes(&self) -> &[Point] {
        &self.nodes
    }

    #[must_use]
    pub fn node(&self, index: usize) -> Option<&Point> {
        self.nodes.get(index)
    }

    pub fn add_node(&mut self, p: Point) -> &mut Self {
        self.nodes.push(p);
        self
    }

    pub fn add_nodes(&mut self, points: impl IntoIterator<Item = Point>) -> &mut Self {
        self.nodes.extend(points);
        self
    }

    fn step(&self) -> usize {
        self.order as usize
    }

    /// Number of complete segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.nodes.len().saturating_sub(1) / self.step()
    }

    /// Whether the nodes split into at least one whole segment.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.nodes.len() > self.step() && (self.nodes.len() - 1) % self.step() == 0
    }

    fn segment(&self, index: usize) -> &[Point] {
        let first = index * self.step();
        &self.nodes[first..=first + self.step()]
    }

    /// Evaluates the point at parameter `t` in `[0, segment_count]`.
    ///
    /// The integer part of `t` selects the segment; `t == segment_count`
    /// evaluates the end of the last one.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::ParameterOutOfRange`] outside that range or if
    /// the curve has no complete segment.
    pub fn evaluate(&self, t: f64) -> Result<Point> {
        let count = self.segment_count();
        #[allow(clippy::cast_precision_loss)]
        let max = count as f64;
        if count == 0 || !(0.0..=max).contains(&t) {
            return Err(CurveError::ParameterOutOfRange {
                parameter: "t",
                value: t,
                min: 0.0,
                max,
            }
            .into());
        }
        Ok(self.point_at(t))
    }

    /// Evaluates an in-range parameter.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn point_at(&self, t: f64) -> Point {
        let count = self.segment_count();
        let mut index = t.floor().max(0.0) as usize;
        if index >= count {
            index = count - 1;
        }
        bernstein(self.segment(index), t - index as f64)
    }

    /// Replaces the curve by an equivalent cubic one.
    ///
    /// Linear and quadratic segments are raised exactly; cubic curves are
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::UnsupportedOrder`] for orders above 3.
    pub fn degree_elevate_to_cubic(&mut self) -> Result<&mut Self> {
        *self = self.to_cubic()?;
        Ok(self)
    }

    /// Returns the cubic equivalent of this curve.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::UnsupportedOrder`] for orders above 3.
    pub fn to_cubic(&self) -> Result<BezierCurve> {
        let count = self.segment_count();
        let mut nodes = Vec::with_capacity(3 * count + 1);
        match self.order {
            1 => {
                for s in 0..count {
                    let [a, b] = [self.nodes[s], self.nodes[s + 1]];
                    nodes.push(a);
                    nodes.push(blend(&a, 2.0, &b, 1.0));
                    nodes.push(blend(&a, 1.0, &b, 2.0));
                }
            }
            2 => {
                for s in 0..count {
                    let seg = self.segment(s);
                    nodes.push(seg[0]);
                    nodes.push(blend(&seg[0], 1.0, &seg[1], 2.0));
                    nodes.push(blend(&seg[1], 2.0, &seg[2], 1.0));
                }
            }
            3 => return Ok(self.clone()),
            order => return Err(CurveError::UnsupportedOrder(order).into()),
        }
        if count > 0 {
            nodes.extend(self.nodes.last().copied());
        }
        Ok(BezierCurve { order: 3, nodes })
    }

    /// Fuses `other` if it has the same order and starts where `self` ends.
    pub fn append(&mut self, other: &BezierCurve) -> bool {
        if self.order != other.order {
            return false;
        }
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

    /// Parameters in `(0, 1)` where a segment reaches an axis extremum.
    fn critical_parameters(&self, seg: &[Point]) -> Vec<f64> {
        let mut ts = Vec::new();
        match self.order {
            2 => {
                for axis in 0..2 {
                    let d = seg[0][axis] + seg[2][axis] - 2.0 * seg[1][axis];
                    if d.abs() > NULL_DISTANCE {
                        ts.push((seg[0][axis] - seg[1][axis]) / d);
                    }
                }
            }
            3 => {
                for axis in 0..2 {
                    let a = seg[3][axis] - 3.0 * seg[2][axis] + 3.0 * seg[1][axis] - seg[0][axis];
                    let b = 2.0 * seg[2][axis] - 4.0 * seg[1][axis] + 2.0 * seg[0][axis];
                    let c = seg[1][axis] - seg[0][axis];
                    if a.abs() > EXTREMUM_TOLERANCE {
                        let delta = b * b - 4.0 * a * c;
                        if delta >= 0.0 {
                            let root = delta.sqrt();
                            ts.push((-b - root) / (2.0 * a));
                            ts.push((-b + root) / (2.0 * a));
                        }
                    } else if b.abs() > EXTREMUM_TOLERANCE {
                        ts.push(-c / b);
                    }
                }
            }
            _ => {}
        }
        ts.retain(|t| *t > 0.0 && *t < 1.0);
        ts
    }
}

/// De Casteljau evaluation of a single segment at local parameter `t`.
fn bernstein(controls: &[Point], t: f64) -> Point {
    let mut work: Vec<Vector> = controls.iter().map(|p| p.coords).collect();
    for level in (1..work.len()).rev() {
        for i in 0..level {
            work[i] = work[i] * (1.0 - t) + work[i + 1] * t;
        }
    }
    work.first().map_or_else(Point::origin, |v| Point::from(*v))
}

impl CurveOps for BezierCurve {
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

    #[allow(clippy::cast_precision_loss)]
    fn length(&self, samples: usize) -> f64 {
        let samples = samples.max(1);
        let mut total = 0.0;
        for s in 0..self.segment_count() {
            let seg = self.segment(s);
            let mut previous = seg[0];
            for i in 1..=samples {
                let p = bernstein(seg, i as f64 / samples as f64);
                total += nalgebra::distance(&previous, &p);
                previous = p;
            }
        }
        total
    }

    /// Exact box for orders up to 3; higher orders fall back to the control
    /// polygon, which encloses the curve.
    fn bounding_box(&self) -> BoundingBox {
        if self.order > 3 {
            return BoundingBox::from_points(&self.nodes);
        }
        let mut bbox = BoundingBox::new();
        for s in 0..self.segment_count() {
            let seg = self.segment(s);
            bbox.add_point(&seg[0]);
            for t in self.critical_parameters(seg) {
                bbox.add_point(&bernstein(seg, t));
            }
        }
        if let Some(last) = self.nodes.last() {
            bbox.add_point(last);
        }
        bbox
    }

    /// Samples the curve uniformly in parameter, then simplifies.
    ///
    /// The sample count is `max(floor(length / (2 * tolerance)), 5)`. A
    /// non-positive tolerance samples a fixed density and skips the
    /// simplification.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn to_polyline(&self, tolerance: f64) -> Polyline {
        let count = self.segment_count();
        if count == 0 {
            return Polyline::new(self.nodes.clone());
        }
        let n = if tolerance > 0.0 {
            let wanted = (self.length(DEFAULT_LENGTH_SAMPLES) / (2.0 * tolerance)).floor();
            (wanted.min(MAX_SAMPLES as f64) as usize).max(5)
        } else {
            (UNBOUNDED_SAMPLES_PER_SEGMENT * count).min(MAX_SAMPLES)
        };
        let step = count as f64 / n as f64;
        let mut points: Vec<Point> = (0..n).map(|i| self.point_at(i as f64 * step)).collect();
        points.extend(self.nodes.last().copied());
        if tolerance > 0.0 {
            points = simplify(&points, tolerance);
        }
        Polyline::new(points)
    }

    fn reverse(&mut self) {
        self.nodes.reverse();
    }
}

impl Transformable for BezierCurve {
    fn transform(&mut self, transform: &Transform) -> &mut Self {
        for p in &mut self.nodes {
            *p = transform.apply(p);
        }
        self
    }
}
