pub mod distance_2d;
pub mod intersect_2d;
pub mod simplify;
pub mod transform;
pub mod weighted;

pub use transform::{Mirror, Transform};
pub use weighted::WeightedPoints;

/// 2D point type (a location).
pub type Point = nalgebra::Point2<f64>;

/// 2D vector type (a displacement).
pub type Vector = nalgebra::Vector2<f64>;

/// 3x3 homogeneous matrix backing [`Transform`].
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Distance under which two points coincide, a line is degenerate or a
/// determinant is considered null.
pub const NULL_DISTANCE: f64 = 1e-5;

/// Tolerance used when points tie at a bounding-box extremum.
pub const EXTREMUM_TOLERANCE: f64 = 1e-6;

/// Builds a vector from polar coordinates.
#[must_use]
pub fn polar(radius: f64, angle: f64) -> Vector {
    Vector::new(radius * angle.cos(), radius * angle.sin())
}

/// Returns the radial coordinate (Euclidean norm) of `v`.
#[must_use]
pub fn radius(v: &Vector) -> f64 {
    v.norm()
}

/// Returns the angular coordinate of `v` in radians, or `0` for a zero vector.
#[must_use]
pub fn angle(v: &Vector) -> f64 {
    if radius(v) == 0.0 {
        0.0
    } else {
        v.y.atan2(v.x)
    }
}

/// Returns `v` scaled to unit length. A zero vector is returned unchanged.
#[must_use]
pub fn normalized(v: &Vector) -> Vector {
    let r = radius(v);
    if r == 0.0 {
        *v
    } else {
        v / r
    }
}

/// Returns `true` if `p` is strictly closer to `a` than to `b`.
#[must_use]
pub fn closer(p: &Point, a: &Point, b: &Point) -> bool {
    nalgebra::distance(p, a) < nalgebra::distance(p, b)
}

/// Returns `true` if `a` and `b` are within [`NULL_DISTANCE`] of each other.
#[must_use]
pub fn coincident(a: &Point, b: &Point) -> bool {
    nalgebra::distance(a, b) < NULL_DISTANCE
}
