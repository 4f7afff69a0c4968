use tracing::debug;

use crate::geometry::{BoundingBox, BezierCurve, Curve, CurveOps, Polyline, Transformable};
use crate::math::{coincident, Point, Transform};

/// Shape of the curve inserted between two disjoint curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connector {
    /// A cubic Bezier tangent to both neighbours.
    #[default]
    Bezier,
    /// A straight segment.
    Straight,
}

/// Parameters controlling how gaps in a subpath are bridged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkParams {
    /// Shape of the inserted curve.
    pub connector: Connector,
    /// Control arm length of Bezier connectors, as a fraction of the gap.
    pub smoothing: f64,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            connector: Connector::Bezier,
            smoothing: 0.6,
        }
    }
}

impl LinkParams {
    /// Straight connectors.
    #[must_use]
    pub fn straight() -> Self {
        Self {
            connector: Connector::Straight,
            ..Self::default()
        }
    }
}

/// Parameters controlling flattening and number output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlattenParams {
    /// Maximum distance between a curve and its polyline.
    pub tolerance: f64,
    /// Decimal digits kept when writing coordinates.
    pub digits: usize,
}

impl Default for FlattenParams {
    fn default() -> Self {
        Self {
            tolerance: 0.05,
            digits: 3,
        }
    }
}

/// Builds the curve bridging the end of `from` to the start of `to`.
///
/// Returns `None` when the curves already touch or either has no node. A
/// Bezier connector leaves `from` along its end tangent and reaches `to`
/// along its start tangent, with arms of `smoothing` times the gap; it falls
/// back to a straight segment when a tangent is undefined.
#[must_use]
pub fn connector(from: &Curve, to: &Curve, params: &LinkParams) -> Option<Curve> {
    let a = from.end()?;
    let b = to.start()?;
    let gap = nalgebra::distance(&a, &b);
    if coincident(&a, &b) {
        return None;
    }
    if params.connector == Connector::Bezier {
        if let (Some(ta), Some(tb)) = (from.end_tangent(), to.start_tangent()) {
            let arm = gap * params.smoothing;
            let nodes = vec![a, a + ta * arm, b - tb * arm, b];
            if let Ok(curve) = BezierCurve::new(3, nodes) {
                return Some(curve.into());
            }
        }
    }
    Some(Polyline::new(vec![a, b]).into())
}

/// An ordered collection of subpaths, each an ordered list of curves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    subpaths: Vec<Vec<Curve>>,
}

impl Path {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new, empty subpath which becomes the active one.
    ///
    /// Returns its index.
    pub fn new_subpath(&mut self) -> usize {
        self.subpaths.push(Vec::new());
        self.subpaths.len() - 1
    }

    #[must_use]
    pub fn subpath_count(&self) -> usize {
        self.subpaths.len()
    }

    #[must_use]
    pub fn subpaths(&self) -> &[Vec<Curve>] {
        &self.subpaths
    }

    #[must_use]
    pub fn subpath(&self, index: usize) -> Option<&[Curve]> {
        self.subpaths.get(index).map(Vec::as_slice)
    }

    /// Whether the path holds no curve at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(Vec::is_empty)
    }

    /// Adds a curve to the active subpath, creating one if needed.
    ///
    /// The curve is fused into the last curve of the subpath when they are of
    /// the same kind and touch; otherwise it is pushed after it.
    pub fn add(&mut self, curve: impl Into<Curve>) -> &mut Self {
        if self.subpaths.is_empty() {
            self.new_subpath();
        }
        let index = self.subpaths.len() - 1;
        self.add_to(index, curve);
        self
    }

    /// Adds a curve to subpath `index` with the same fusion rule as
    /// [`Path::add`]. Returns `false` if there is no such subpath.
    pub fn add_to(&mut self, index: usize, curve: impl Into<Curve>) -> bool {
        let Some(subpath) = self.subpaths.get_mut(index) else {
            return false;
        };
        let curve = curve.into();
        if let Some(last) = subpath.last_mut() {
            if last.append(&curve) {
                return true;
            }
        }
        subpath.push(curve);
        true
    }

    /// Whether every curve of subpath `index` starts where the previous ends.
    ///
    /// An empty or missing subpath is not linked.
    #[must_use]
    pub fn is_linked(&self, index: usize) -> bool {
        match self.subpaths.get(index) {
            Some(curves) if !curves.is_empty() => curves
                .windows(2)
                .all(|w| touches(w[0].end(), w[1].start())),
            _ => false,
        }
    }

    /// Whether subpath `index` is linked and ends where it starts.
    #[must_use]
    pub fn is_closed(&self, index: usize) -> bool {
        self.is_linked(index)
            && self.subpaths[index]
                .first()
                .zip(self.subpaths[index].last())
                .is_some_and(|(first, last)| touches(last.end(), first.start()))
    }

    /// Bridges every gap between consecutive curves of subpath `index`.
    pub fn link(&mut self, index: usize, params: &LinkParams) -> &mut Self {
        let Some(subpath) = self.subpaths.get_mut(index) else {
            return self;
        };
        let mut linked: Vec<Curve> = Vec::with_capacity(subpath.len());
        let mut inserted = 0_usize;
        for curve in subpath.drain(..) {
            if let Some(previous) = linked.last() {
                if let Some(bridge) = connector(previous, &curve, params) {
                    linked.push(bridge);
                    inserted += 1;
                }
            }
            linked.push(curve);
        }
        *subpath = linked;
        debug!(index, inserted, "linked subpath");
        self
    }

    /// Links subpath `index` and bridges its end back to its start.
    ///
    /// The closing connector goes through [`Path::add_to`], so a straight
    /// connector after a polyline is fused into it.
    pub fn close(&mut self, index: usize, params: &LinkParams) -> &mut Self {
        self.link(index, params);
        let bridge = self
            .subpaths
            .get(index)
            .and_then(|curves| connector(curves.last()?, curves.first()?, params));
        if let Some(bridge) = bridge {
            debug!(index, "closing subpath");
            self.add_to(index, bridge);
        }
        self
    }

    /// Closes every subpath.
    pub fn close_all(&mut self, params: &LinkParams) -> &mut Self {
        for index in 0..self.subpaths.len() {
            self.close(index, params);
        }
        self
    }

    /// Flattens every curve, giving a path made only of polylines.
    ///
    /// Consecutive flattened curves of a subpath fuse into one polyline
    /// whenever they touch.
    #[must_use]
    pub fn to_polyline(&self, tolerance: f64) -> Path {
        let mut flat = Path::new();
        for curves in &self.subpaths {
            flat.new_subpath();
            for curve in curves {
                flat.add(curve.to_polyline(tolerance));
            }
        }
        flat
    }

    /// Box enclosing every curve.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::new();
        for curve in self.subpaths.iter().flatten() {
            bbox.add_box(&curve.bounding_box());
        }
        bbox
    }

    /// Sum of the curve lengths.
    #[must_use]
    pub fn length(&self, samples: usize) -> f64 {
        self.subpaths
            .iter()
            .flatten()
            .map(|c| c.length(samples))
            .sum()
    }
}

fn touches(a: Option<Point>, b: Option<Point>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if coincident(&a, &b))
}

impl Transformable for Path {
    fn transform(&mut self, transform: &Transform) -> &mut Self {
        for curve in self.subpaths.iter_mut().flatten() {
            curve.transform(transform);
        }
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::EllipticalArc;
    use crate::math::Vector;
    use approx::assert_abs_diff_eq;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn poly(points: &[(f64, f64)]) -> Polyline {
        Polyline::new(points.iter().map(|&(x, y)| pt(x, y)).collect())
    }

    fn cubic(points: &[(f64, f64)]) -> BezierCurve {
        BezierCurve::new(3, points.iter().map(|&(x, y)| pt(x, y)).collect()).unwrap()
    }

    fn nodes_of(curve: &Curve) -> Vec<Point> {
        match curve {
            Curve::Polyline(p) => p.nodes().to_vec(),
            Curve::Bezier(b) => b.nodes().to_vec(),
            Curve::Arc(_) => Vec::new(),
        }
    }

    fn assert_nodes(curve: &Curve, expected: &[(f64, f64)], epsilon: f64) {
        let nodes = nodes_of(curve);
        assert_eq!(nodes.len(), expected.len());
        for (a, &(x, y)) in nodes.iter().zip(expected) {
            assert_abs_diff_eq!(*a, pt(x, y), epsilon = epsilon);
        }
    }

    #[test]
    fn bezier_connector_follows_tangents() {
        let a = Curve::from(poly(&[(2.0, 3.0), (3.0, 5.0)]));
        let b = Curve::from(cubic(&[(5.0, 3.0), (6.0, 3.0), (7.0, 2.0), (8.0, 1.0)]));
        let c = connector(&a, &b, &LinkParams::default()).unwrap();
        assert!(matches!(c, Curve::Bezier(_)));
        assert_nodes(&c, &[(3.0, 5.0), (3.76, 6.52), (3.3, 3.0), (5.0, 3.0)], 1e-2);
    }

    #[test]
    fn straight_connector() {
        let a = Curve::from(poly(&[(2.0, 3.0), (3.0, 5.0)]));
        let b = Curve::from(poly(&[(5.0, 3.0), (6.0, 3.0)]));
        let c = connector(&a, &b, &LinkParams::straight()).unwrap();
        assert_nodes(&c, &[(3.0, 5.0), (5.0, 3.0)], 1e-12);
    }

    #[test]
    fn no_connector_when_touching() {
        let a = Curve::from(poly(&[(2.0, 3.0), (3.0, 5.0)]));
        let b = Curve::from(poly(&[(3.0, 5.0), (6.0, 3.0)]));
        assert!(connector(&a, &b, &LinkParams::default()).is_none());
    }

    #[test]
    fn add_fuses_touching_curves() {
        let mut p = Path::new();
        p.new_subpath();
        p.add(poly(&[(0.0, 0.0), (1.0, 0.0)]));
        p.add(poly(&[(1.0, 0.0), (1.0, 1.0)]));
        p.add(poly(&[(5.0, 5.0), (6.0, 5.0)]));
        let sp = p.subpath(0).unwrap();
        assert_eq!(sp.len(), 2);
        assert_nodes(&sp[0], &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], 1e-12);
    }

    #[test]
    fn add_creates_first_subpath() {
        let mut p = Path::new();
        assert!(p.is_empty());
        p.add(poly(&[(0.0, 0.0), (1.0, 0.0)]));
        assert_eq!(p.subpath_count(), 1);
        assert!(!p.is_empty());
        assert!(!p.add_to(3, poly(&[(0.0, 0.0), (1.0, 0.0)])));
    }

    #[test]
    fn add_to_earlier_subpath() {
        let mut p = Path::new();
        p.add(poly(&[(0.0, 0.0), (1.0, 0.0)]));
        p.new_subpath();
        p.add(poly(&[(5.0, 5.0), (6.0, 5.0)]));
        assert!(p.add_to(0, poly(&[(1.0, 0.0), (1.0, 1.0)])));
        assert!(p.add_to(0, poly(&[(3.0, 3.0), (4.0, 3.0)])));
        let first = p.subpath(0).unwrap();
        assert_eq!(first.len(), 2);
        assert_nodes(&first[0], &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], 1e-12);
        assert_eq!(p.subpath(1).unwrap().len(), 1);
    }

    #[test]
    fn linked_and_closed() {
        let mut p = Path::new();
        assert!(!p.is_linked(0));
        p.new_subpath();
        assert!(!p.is_linked(0));
        assert!(!p.is_closed(0));
        p.add(poly(&[(0.0, 0.0), (1.0, 0.0)]));
        p.add(cubic(&[(1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 0.0)]));
        assert!(p.is_linked(0));
        assert!(p.is_closed(0));
    }

    #[test]
    fn link_inserts_bezier() {
        let mut p = Path::new();
        p.new_subpath();
        p.add(poly(&[(0.0, 1.0), (2.0, 1.0)]));
        p.add(poly(&[(3.0, 4.0), (5.0, 3.0)]));
        assert!(!p.is_linked(0));
        p.link(0, &LinkParams::default());
        assert!(p.is_linked(0));
        let sp = p.subpath(0).unwrap();
        assert_eq!(sp.len(), 3);
        assert_nodes(&sp[1], &[(2.0, 1.0), (3.9, 1.0), (1.3, 4.85), (3.0, 4.0)], 1e-2);
    }

    #[test]
    fn close_with_straight_connector_fuses() {
        let mut p = Path::new();
        p.new_subpath();
        p.add(poly(&[(10.0, 0.0), (20.0, 30.0), (40.0, 15.0)]));
        p.close(0, &LinkParams::straight());
        assert!(p.is_closed(0));
        let sp = p.subpath(0).unwrap();
        assert_eq!(sp.len(), 1);
        assert_nodes(
            &sp[0],
            &[(10.0, 0.0), (20.0, 30.0), (40.0, 15.0), (10.0, 0.0)],
            1e-12,
        );
    }

    #[test]
    fn close_with_bezier_connector() {
        let mut p = Path::new();
        p.add(poly(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]));
        p.close_all(&LinkParams::default());
        assert!(p.is_closed(0));
        assert_eq!(p.subpath(0).unwrap().len(), 2);
    }

    #[test]
    fn flatten_bezier_subpath() {
        let mut p = Path::new();
        p.new_subpath();
        p.add(cubic(&[(3.0, 1.0), (5.0, 1.0), (7.0, 3.0), (7.0, 5.0)]));
        let flat = p.to_polyline(0.1);
        let sp = flat.subpath(0).unwrap();
        assert_eq!(sp.len(), 1);
        assert_nodes(
            &sp[0],
            &[(3.0, 1.0), (4.37, 1.3), (5.75, 2.25), (6.7, 3.63), (7.0, 5.0)],
            5e-3,
        );
    }

    #[test]
    fn flatten_fuses_mixed_curves() {
        let mut p = Path::new();
        p.add(poly(&[(0.0, 0.0), (4.0, 0.0)]));
        p.add(EllipticalArc::new(pt(4.0, 2.0), 2.0, 2.0, 0.0, -std::f64::consts::FRAC_PI_2, std::f64::consts::FRAC_PI_2));
        let flat = p.to_polyline(0.05);
        assert_eq!(flat.subpath(0).unwrap().len(), 1);
        assert!(flat.is_linked(0));
    }

    #[test]
    fn bounding_box_spans_subpaths() {
        let mut p = Path::new();
        p.add(poly(&[(0.0, 0.0), (1.0, 2.0)]));
        p.new_subpath();
        p.add(poly(&[(-3.0, 5.0), (1.0, 1.0)]));
        let b = p.bounding_box();
        assert_eq!(b.min().unwrap(), pt(-3.0, 0.0));
        assert_eq!(b.max().unwrap(), pt(1.0, 5.0));
        assert!(Path::new().bounding_box().is_empty());
    }

    #[test]
    fn transform_moves_every_curve() {
        let mut p = Path::new();
        p.add(poly(&[(0.0, 0.0), (1.0, 2.0)]));
        p.new_subpath();
        p.add(cubic(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]));
        p.translate(&Vector::new(1.0, 1.0));
        assert_eq!(p.subpath(1).unwrap()[0].start(), Some(pt(1.0, 1.0)));
        assert_eq!(p.subpath(0).unwrap()[0].end(), Some(pt(2.0, 3.0)));
    }

    #[test]
    fn length_sums_curves() {
        let mut p = Path::new();
        p.add(poly(&[(0.0, 0.0), (3.0, 4.0)]));
        p.new_subpath();
        p.add(poly(&[(0.0, 0.0), (0.0, 2.0)]));
        assert!((p.length(5) - 7.0).abs() < 1e-12);
    }
}
