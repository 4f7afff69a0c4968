use super::{Point, Vector};

/// A set of weighted points.
#[derive(Debug, Clone, Default)]
pub struct WeightedPoints {
    points: Vec<(Point, f64)>,
}

impl WeightedPoints {
    /// Creates a set from `(point, weight)` pairs.
    #[must_use]
    pub fn new(points: Vec<(Point, f64)>) -> Self {
        Self { points }
    }

    /// Adds a point with the given weight.
    pub fn add(&mut self, p: Point, weight: f64) -> &mut Self {
        self.points.push((p, weight));
        self
    }

    /// Removes every point.
    pub fn clear(&mut self) -> &mut Self {
        self.points.clear();
        self
    }

    /// Returns the weighted barycenter, or `None` if the total weight is zero.
    #[must_use]
    pub fn barycenter(&self) -> Option<Point> {
        let total: f64 = self.points.iter().map(|(_, w)| w).sum();
        if total == 0.0 {
            return None;
        }
        let sum = self
            .points
            .iter()
            .fold(Vector::zeros(), |acc, (p, w)| acc + p.coords * *w);
        Some(Point::from(sum / total))
    }
}

/// Barycenter of two points: `(wa*a + wb*b) / (wa + wb)`.
///
/// The weights must not sum to zero.
#[must_use]
pub(crate) fn blend(a: &Point, wa: f64, b: &Point, wb: f64) -> Point {
    Point::from((a.coords * wa + b.coords * wb) / (wa + wb))
}
