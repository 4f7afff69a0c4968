//! OpenSCAD polygon output.

use tracing::debug;

use super::format_point;
use crate::geometry::{Curve, CurveOps, FlattenParams, LinkParams, Path};
use crate::math::{coincident, Point};

impl Path {
    /// Writes the path as an OpenSCAD `polygon` statement.
    ///
    /// Every subpath is closed with a straight segment and flattened within
    /// `tolerance`. Each subpath becomes one index list over the shared point
    /// list, without repeating its closing point.
    #[must_use]
    pub fn to_polygon_text(&self, tolerance: f64, digits: usize) -> String {
        let mut closed = self.clone();
        closed.close_all(&LinkParams::straight());
        let flat = closed.to_polyline(tolerance);

        let mut points: Vec<String> = Vec::new();
        let mut paths: Vec<String> = Vec::new();
        for curves in flat.subpaths() {
            let ring = ring_points(curves);
            if ring.is_empty() {
                continue;
            }
            let first = points.len();
            points.extend(ring.iter().map(|p| format!("[{}]", format_point(p, digits))));
            let indices: Vec<String> = (first..points.len()).map(|i| i.to_string()).collect();
            paths.push(format!("[{}]", indices.join(",")));
        }
        debug!(points = points.len(), rings = paths.len(), "wrote polygon");
        format!(
            "polygon(points=[{}],paths=[{}]);",
            points.join(","),
            paths.join(",")
        )
    }

    /// Same as [`Path::to_polygon_text`] with bundled parameters.
    #[must_use]
    pub fn to_polygon_text_with(&self, params: &FlattenParams) -> String {
        self.to_polygon_text(params.tolerance, params.digits)
    }
}

/// Vertices of a flattened closed subpath, closing vertex excluded.
///
/// Polylines are chained without repeating their shared junction node; any
/// other repeated vertex is written as is.
fn ring_points(curves: &[Curve]) -> Vec<Point> {
    let mut ring: Vec<Point> = Vec::new();
    for curve in curves {
        let Curve::Polyline(poly) = curve else {
            continue;
        };
        let skip = usize::from(
            !ring.is_empty() && poly.start().is_some_and(|s| ring.last().is_some_and(|l| coincident(l, &s))),
        );
        ring.extend(poly.nodes().iter().skip(skip));
    }
    ring.pop();
    ring
}
