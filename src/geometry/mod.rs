pub mod bounding_box;
pub mod curve;
mod line;
pub mod path;

pub use bounding_box::{Anchor, BoundingBox, Side};
pub use curve::{BezierCurve, Curve, CurveOps, EllipticalArc, Polyline};
pub use line::{Intersection, Line};
pub use path::{Connector, FlattenParams, LinkParams, Path};

use tracing::warn;

use crate::math::{Mirror, Point, Transform, Vector};

/// Geometry that can be moved in place by an affine map.
///
/// Only [`Transformable::transform`] is required; the other operations are
/// expressed as particular transforms. Every method returns `self` so calls
/// can be chained.
pub trait Transformable {
    /// Applies an arbitrary affine map.
    fn transform(&mut self, transform: &Transform) -> &mut Self;

    /// Translates by `v`.
    fn translate(&mut self, v: &Vector) -> &mut Self {
        self.transform(&Transform::translation(v))
    }

    /// Rotates by `angle` radians about `center`.
    fn rotate(&mut self, center: &Point, angle: f64) -> &mut Self {
        self.transform(&Transform::rotation(center, angle))
    }

    /// Applies a homothety of factor `ratio` about `center`.
    fn scale(&mut self, center: &Point, ratio: f64) -> &mut Self {
        self.transform(&Transform::homothety(center, ratio))
    }

    /// Applies a central or axial symmetry.
    ///
    /// A degenerate axis leaves the geometry unchanged.
    fn reflect(&mut self, mirror: &Mirror) -> &mut Self {
        match Transform::reflection(mirror) {
            Some(t) => self.transform(&t),
            None => {
                warn!(?mirror, "reflection axis is degenerate, geometry left unchanged");
                self
            }
        }
    }
}

impl Transformable for Point {
    fn transform(&mut self, transform: &Transform) -> &mut Self {
        *self = transform.apply(self);
        self
    }
}
