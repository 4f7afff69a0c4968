use tracing::{debug, warn};

use super::{Matrix3, Point, Vector, NULL_DISTANCE};
use crate::codec::format_number;
use crate::error::{GeometryError, Result};
use crate::geometry::Line;

/// The fixed element of a reflection.
#[derive(Debug, Clone, PartialEq)]
pub enum Mirror {
    /// Central symmetry through a point.
    Center(Point),
    /// Axial symmetry across a line.
    Axis(Line),
}

/// A 2D affine map `(x, y) -> (a*x + c*y + e, b*x + d*y + f)`.
///
/// Stored as the homogeneous matrix
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Creates a transform from its six coefficients.
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self {
            matrix: Matrix3::new(a, c, e, b, d, f, 0.0, 0.0, 1.0),
        }
    }

    /// The identity map.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Translation by `v`.
    #[must_use]
    pub fn translation(v: &Vector) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, v.x, v.y)
    }

    /// Axis-aligned scaling about the origin.
    #[must_use]
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Uniform dilation of factor `ratio` about `center`.
    #[must_use]
    pub fn homothety(center: &Point, ratio: f64) -> Self {
        Self::new(
            ratio,
            0.0,
            0.0,
            ratio,
            (1.0 - ratio) * center.x,
            (1.0 - ratio) * center.y,
        )
    }

    /// Counter-clockwise rotation of `angle` radians about `center`.
    #[must_use]
    pub fn rotation(center: &Point, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(
            cos,
            sin,
            -sin,
            cos,
            center.x * (1.0 - cos) + center.y * sin,
            center.y * (1.0 - cos) - center.x * sin,
        )
    }

    /// Central or axial symmetry.
    ///
    /// Returns `None` when the axis is a degenerate line.
    #[must_use]
    pub fn reflection(mirror: &Mirror) -> Option<Self> {
        match mirror {
            Mirror::Center(o) => Some(Self::new(-1.0, 0.0, 0.0, -1.0, 2.0 * o.x, 2.0 * o.y)),
            Mirror::Axis(line) => {
                let a = line.start();
                let u = line.vector()?;
                Some(Self::new(
                    2.0 * u.x * u.x - 1.0,
                    2.0 * u.x * u.y,
                    2.0 * u.x * u.y,
                    2.0 * u.y * u.y - 1.0,
                    2.0 * a.x * (1.0 - u.x * u.x) - 2.0 * a.y * u.x * u.y,
                    2.0 * a.y * (1.0 - u.y * u.y) - 2.0 * a.x * u.x * u.y,
                ))
            }
        }
    }

    /// Returns `[a, b, c, d, e, f]`.
    #[must_use]
    pub fn coefficients(&self) -> [f64; 6] {
        let m = &self.matrix;
        [m[(0, 0)], m[(1, 0)], m[(0, 1)], m[(1, 1)], m[(0, 2)], m[(1, 2)]]
    }

    /// Returns the homogeneous matrix.
    #[must_use]
    pub fn matrix(&self) -> &Matrix3 {
        &self.matrix
    }

    /// Matrix product: the result applies `other` first, then `self`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Determinant `a*d - b*c` of the linear part.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        let [a, b, c, d, _, _] = self.coefficients();
        a * d - b * c
    }

    /// Returns the inverse map, or `None` when `|det| < 1e-5`.
    #[must_use]
    pub fn invert(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < NULL_DISTANCE {
            return None;
        }
        let [a, b, c, d, e, f] = self.coefficients();
        Some(Self::new(
            d / det,
            -b / det,
            -c / det,
            a / det,
            (c * f - d * e) / det,
            (b * e - a * f) / det,
        ))
    }

    /// Like [`Transform::invert`], but reports a singular matrix as an error.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::SingularTransform` when `|det| < 1e-5`.
    pub fn try_invert(&self) -> Result<Self> {
        self.invert().ok_or_else(|| {
            GeometryError::SingularTransform {
                determinant: self.determinant(),
            }
            .into()
        })
    }

    /// Maps a point.
    #[must_use]
    pub fn apply(&self, p: &Point) -> Point {
        self.matrix.transform_point(p)
    }

    /// Maps a displacement (the translation part is ignored).
    #[must_use]
    pub fn apply_vector(&self, v: &Vector) -> Vector {
        self.matrix.transform_vector(v)
    }

    /// Reads a transform attribute such as `translate(12,5) matrix(2,0,0,2,0,0)`.
    ///
    /// Tokens are separated by whitespace and composed right to left, so the
    /// rightmost token is applied first. Only `translate(x,y)` and
    /// `matrix(a,b,c,d,e,f)` are understood; anything else is skipped with a
    /// warning and the accumulated transform is left as it was.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut result = Self::identity();
        let mut rest = text;
        loop {
            rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
            if rest.is_empty() {
                break;
            }
            let Some(open) = rest.find('(') else {
                warn!(token = rest, "ignoring trailing text in transform");
                break;
            };
            let Some(close) = rest[open..].find(')').map(|i| open + i) else {
                warn!(token = rest, "ignoring unterminated transform token");
                break;
            };
            let name = rest[..open].trim();
            let args: Option<Vec<f64>> = rest[open + 1..close]
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(|s| s.parse().ok())
                .collect();
            match (name, args.as_deref()) {
                ("translate", Some(&[tx, ty])) => {
                    result = result.compose(&Self::translation(&Vector::new(tx, ty)));
                }
                ("matrix", Some(&[a, b, c, d, e, f])) => {
                    result = result.compose(&Self::new(a, b, c, d, e, f));
                }
                _ => warn!(token = &rest[..=close], "skipping unsupported transform token"),
            }
            rest = &rest[close + 1..];
        }
        debug!(?result, text, "parsed transform");
        result
    }

    /// Writes the transform as a `matrix(a,b,c,d,e,f)` attribute value.
    #[must_use]
    pub fn to_text(&self, digits: usize) -> String {
        let parts: Vec<String> = self
            .coefficients()
            .iter()
            .map(|&v| format_number(v, digits))
            .collect();
        format!("matrix({})", parts.join(","))
    }
}
