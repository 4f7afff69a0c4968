pub mod codec;
pub mod error;
pub mod geometry;
pub mod math;

pub use error::{GeopathError, Result};
pub use geometry::{
    BezierCurve, BoundingBox, Curve, CurveOps, EllipticalArc, Path, Polyline, Transformable,
};
pub use math::{Point, Transform, Vector};
