use crate::error::{BoundingBoxError, Result};
use crate::math::{Point, EXTREMUM_TOLERANCE};

use super::curve::{Curve, Polyline};
use super::path::Path;

/// One side of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    MinX,
    MaxX,
    MinY,
    MaxY,
}

impl Side {
    const ALL: [Side; 4] = [Side::MinX, Side::MaxX, Side::MinY, Side::MaxY];

    fn index(self) -> usize {
        self as usize
    }

    /// Coordinate compared against the extremum.
    fn key(self, p: &Point) -> f64 {
        match self {
            Side::MinX | Side::MaxX => p.x,
            Side::MinY | Side::MaxY => p.y,
        }
    }

    /// Coordinate used to order tied points.
    fn other(self, p: &Point) -> f64 {
        match self {
            Side::MinX | Side::MaxX => p.y,
            Side::MinY | Side::MaxY => p.x,
        }
    }

    fn beyond(self, value: f64, extremum: f64) -> bool {
        match self {
            Side::MinX | Side::MinY => value < extremum,
            Side::MaxX | Side::MaxY => value > extremum,
        }
    }
}

/// A named position in a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    Point(Point),
    Length(f64),
}

impl Anchor {
    #[must_use]
    pub fn as_point(&self) -> Option<Point> {
        match self {
            Anchor::Point(p) => Some(*p),
            Anchor::Length(_) => None,
        }
    }

    #[must_use]
    pub fn as_length(&self) -> Option<f64> {
        match self {
            Anchor::Length(l) => Some(*l),
            Anchor::Point(_) => None,
        }
    }
}

/// Running extrema of a set of points.
///
/// Besides the axis-aligned frame, the box remembers the first point added
/// (`origin`) and, for each side, every point tied at that extremum within
/// `1e-6`, ordered by the other coordinate.
#[derive(Debug, Clone)]
pub struct BoundingBox {
    origin: Option<Point>,
    min: Point,
    max: Point,
    sides: [Vec<Point>; 4],
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingBox {
    /// Creates an empty bounding box.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: None,
            min: Point::origin(),
            max: Point::origin(),
            sides: Default::default(),
        }
    }

    /// Creates the bounding box of `points`.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut bbox = Self::new();
        for p in points {
            bbox.add_point(p);
        }
        bbox
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.origin.is_none()
    }

    /// Adds a point to the box.
    pub fn add_point(&mut self, p: &Point) -> &mut Self {
        if self.origin.is_none() {
            self.origin = Some(*p);
            self.min = *p;
            self.max = *p;
            for side in &mut self.sides {
                *side = vec![*p];
            }
            return self;
        }
        for side in Side::ALL {
            let extremum = side.key(self.extremum_point(side));
            let value = side.key(p);
            let ties = &mut self.sides[side.index()];
            if (value - extremum).abs() < EXTREMUM_TOLERANCE {
                let other = side.other(p);
                if ties
                    .iter()
                    .all(|q| (side.other(q) - other).abs() >= EXTREMUM_TOLERANCE)
                {
                    let at = ties.partition_point(|q| side.other(q) < other);
                    ties.insert(at, *p);
                }
            } else if side.beyond(value, extremum) {
                *ties = vec![*p];
                match side {
                    Side::MinX => self.min.x = value,
                    Side::MaxX => self.max.x = value,
                    Side::MinY => self.min.y = value,
                    Side::MaxY => self.max.y = value,
                }
            }
        }
        self
    }

    /// Merges another box into this one.
    pub fn add_box(&mut self, other: &BoundingBox) -> &mut Self {
        if let Some(origin) = &other.origin {
            self.add_point(origin);
            for side in &other.sides {
                for p in side {
                    self.add_point(p);
                }
            }
        }
        self
    }

    fn extremum_point(&self, side: Side) -> &Point {
        match side {
            Side::MinX | Side::MinY => &self.min,
            Side::MaxX | Side::MaxY => &self.max,
        }
    }

    /// First point that was added.
    #[must_use]
    pub fn origin(&self) -> Option<Point> {
        self.origin
    }

    /// Bottom-left corner, `None` if empty.
    #[must_use]
    pub fn min(&self) -> Option<Point> {
        self.origin.map(|_| self.min)
    }

    /// Top-right corner, `None` if empty.
    #[must_use]
    pub fn max(&self) -> Option<Point> {
        self.origin.map(|_| self.max)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Every point tied at the extremum of `side`.
    #[must_use]
    pub fn extremes(&self, side: Side) -> &[Point] {
        &self.sides[side.index()]
    }

    /// Returns `true` if `p` lies inside the frame grown by `slack`.
    #[must_use]
    pub fn contains(&self, p: &Point, slack: f64) -> bool {
        !self.is_empty()
            && p.x >= self.min.x - slack
            && p.x <= self.max.x + slack
            && p.y >= self.min.y - slack
            && p.y <= self.max.y + slack
    }

    /// Closed rectangular path around the box, `None` if empty.
    #[must_use]
    pub fn frame(&self) -> Option<Path> {
        let min = self.min()?;
        let max = self.max;
        let rectangle = Polyline::new(vec![
            min,
            Point::new(max.x, min.y),
            max,
            Point::new(min.x, max.y),
            min,
        ]);
        let mut path = Path::new();
        path.new_subpath();
        path.add(Curve::Polyline(rectangle));
        Some(path)
    }

    /// Looks up a named anchor.
    ///
    /// Recognised names (case-insensitive): `origin`, `top-left`, `top`,
    /// `top-right`, `left`, `center`, `right`, `bottom-left`, `bottom`,
    /// `bottom-right`, `width`, `height`, and the tied extremal points
    /// `minxinf`, `minxsup`, `minyinf`, `minysup`, `maxxinf`, `maxxsup`,
    /// `maxyinf`, `maxysup` (lowest/highest along the other coordinate).
    ///
    /// # Errors
    ///
    /// Returns `BoundingBoxError::UnknownAnchor` for any other name, then
    /// `BoundingBoxError::Empty` if no point was added.
    pub fn anchor(&self, name: &str) -> Result<Anchor> {
        let key = name.trim().to_lowercase();
        if !ANCHOR_NAMES.contains(&key.as_str()) {
            return Err(BoundingBoxError::UnknownAnchor(name.to_owned()).into());
        }
        let Some(origin) = self.origin else {
            return Err(BoundingBoxError::Empty.into());
        };
        let (min, max) = (self.min, self.max);
        let mid_x = (min.x + max.x) / 2.0;
        let mid_y = (min.y + max.y) / 2.0;
        let p = match key.as_str() {
            "origin" => origin,
            "top-left" => Point::new(min.x, max.y),
            "top" => Point::new(mid_x, max.y),
            "top-right" => max,
            "left" => Point::new(min.x, mid_y),
            "center" => Point::new(mid_x, mid_y),
            "right" => Point::new(max.x, mid_y),
            "bottom-left" => min,
            "bottom" => Point::new(mid_x, min.y),
            "bottom-right" => Point::new(max.x, min.y),
            "width" => return Ok(Anchor::Length(self.width())),
            "height" => return Ok(Anchor::Length(self.height())),
            "minxinf" => self.tie(Side::MinX, false),
            "minxsup" => self.tie(Side::MinX, true),
            "minyinf" => self.tie(Side::MinY, false),
            "minysup" => self.tie(Side::MinY, true),
            "maxxinf" => self.tie(Side::MaxX, false),
            "maxxsup" => self.tie(Side::MaxX, true),
            "maxyinf" => self.tie(Side::MaxY, false),
            "maxysup" => self.tie(Side::MaxY, true),
            _ => return Err(BoundingBoxError::UnknownAnchor(name.to_owned()).into()),
        };
        Ok(Anchor::Point(p))
    }

    fn tie(&self, side: Side, highest: bool) -> Point {
        let ties = self.extremes(side);
        let p = if highest { ties.last() } else { ties.first() };
        p.copied().unwrap_or(self.min)
    }
}

const ANCHOR_NAMES: [&str; 20] = [
    "origin",
    "top-left",
    "top",
    "top-right",
    "left",
    "center",
    "right",
    "bottom-left",
    "bottom",
    "bottom-right",
    "width",
    "height",
    "minxinf",
    "minxsup",
    "minyinf",
    "minysup",
    "maxxinf",
    "maxxsup",
    "maxyinf",
    "maxysup",
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::GeopathError;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn sample() -> BoundingBox {
        BoundingBox::from_points(&[pt(1.0, 2.0), pt(5.0, -1.0), pt(3.0, 4.0), pt(-2.0, 0.0)])
    }

    #[test]
    fn empty_box() {
        let b = BoundingBox::new();
        assert!(b.is_empty());
        assert!(b.min().is_none());
        assert!(b.frame().is_none());
        assert!(matches!(
            b.anchor("center"),
            Err(GeopathError::BoundingBox(BoundingBoxError::Empty))
        ));
    }

    #[test]
    fn unknown_name_on_empty_box() {
        let err = BoundingBox::new().anchor("middle").unwrap_err();
        assert!(matches!(
            err,
            GeopathError::BoundingBox(BoundingBoxError::UnknownAnchor(ref n)) if n == "middle"
        ));
    }

    #[test]
    fn corners_and_sizes() {
        let b = sample();
        assert_eq!(b.min().unwrap(), pt(-2.0, -1.0));
        assert_eq!(b.max().unwrap(), pt(5.0, 4.0));
        assert_eq!(b.anchor("top-left").unwrap(), Anchor::Point(pt(-2.0, 4.0)));
        assert_eq!(b.anchor("bottom-right").unwrap(), Anchor::Point(pt(5.0, -1.0)));
        assert_eq!(b.anchor(" Center ").unwrap(), Anchor::Point(pt(1.5, 1.5)));
        assert_eq!(b.anchor("top").unwrap(), Anchor::Point(pt(1.5, 4.0)));
        assert_eq!(b.anchor("left").unwrap(), Anchor::Point(pt(-2.0, 1.5)));
        assert_eq!(b.anchor("origin").unwrap(), Anchor::Point(pt(1.0, 2.0)));
        assert_eq!(b.anchor("width").unwrap().as_length(), Some(7.0));
        assert_eq!(b.anchor("height").unwrap().as_length(), Some(5.0));
    }

    #[test]
    fn unknown_anchor() {
        let err = sample().anchor("middle").unwrap_err();
        assert!(matches!(
            err,
            GeopathError::BoundingBox(BoundingBoxError::UnknownAnchor(ref n)) if n == "middle"
        ));
    }

    #[test]
    fn ties_at_extremum_are_kept() {
        let b = BoundingBox::from_points(&[pt(0.0, 0.0), pt(4.0, 0.0), pt(2.0, 3.0), pt(1.0, 0.0)]);
        assert_eq!(b.extremes(Side::MinY), &[pt(0.0, 0.0), pt(1.0, 0.0), pt(4.0, 0.0)]);
        assert_eq!(b.anchor("minyinf").unwrap(), Anchor::Point(pt(0.0, 0.0)));
        assert_eq!(b.anchor("minysup").unwrap(), Anchor::Point(pt(4.0, 0.0)));
        assert_eq!(b.extremes(Side::MaxY), &[pt(2.0, 3.0)]);
    }

    #[test]
    fn new_extremum_resets_ties() {
        let mut b = BoundingBox::from_points(&[pt(0.0, 0.0), pt(0.0, 2.0)]);
        assert_eq!(b.extremes(Side::MinX).len(), 2);
        b.add_point(&pt(-1.0, 1.0));
        assert_eq!(b.extremes(Side::MinX), &[pt(-1.0, 1.0)]);
    }

    #[test]
    fn duplicate_points_are_not_repeated() {
        let b = BoundingBox::from_points(&[pt(0.0, 0.0), pt(0.0, 0.0)]);
        assert_eq!(b.extremes(Side::MinX).len(), 1);
    }

    #[test]
    fn merge_boxes() {
        let mut a = BoundingBox::from_points(&[pt(0.0, 0.0), pt(1.0, 1.0)]);
        let b = BoundingBox::from_points(&[pt(3.0, -2.0), pt(2.0, 5.0)]);
        a.add_box(&b);
        assert_eq!(a.min().unwrap(), pt(0.0, -2.0));
        assert_eq!(a.max().unwrap(), pt(3.0, 5.0));
        assert_eq!(a.origin(), Some(pt(0.0, 0.0)));
        let mut empty = BoundingBox::new();
        empty.add_box(&b);
        assert_eq!(empty.origin(), Some(pt(3.0, -2.0)));
    }

    #[test]
    fn frame_is_closed_rectangle() {
        let path = sample().frame().unwrap();
        assert_eq!(path.subpath_count(), 1);
        assert!(path.is_closed(0));
        let b = path.bounding_box();
        assert_eq!(b.min(), sample().min());
        assert_eq!(b.max(), sample().max());
    }

    #[test]
    fn contains_with_slack() {
        let b = sample();
        assert!(b.contains(&pt(5.0, 4.0), 0.0));
        assert!(!b.contains(&pt(5.1, 4.0), 0.0));
        assert!(b.contains(&pt(5.1, 4.0), 0.2));
    }
}
