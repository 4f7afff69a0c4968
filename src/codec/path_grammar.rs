//! Reading and writing the SVG path grammar.
//!
//! Supported commands, absolute and relative: `M L H V C S Q T A Z`. Numbers
//! may be separated by whitespace, commas, or nothing at all when the next
//! one starts with a sign or a second decimal point. Repeated argument
//! groups after a command repeat that command; after `M` they are line-tos.

use std::f64::consts::PI;

use tracing::{debug, warn};

use super::{format_number, format_point};
use crate::error::{ParseError, Result};
use crate::geometry::{
    BezierCurve, Curve, CurveOps, EllipticalArc, FlattenParams, LinkParams, Path, Polyline,
    Transformable,
};
use crate::math::{coincident, Point, Transform, Vector};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char),
    Number(f64),
}

/// Splits path data into commands and numbers.
fn tokenize(text: &str) -> std::result::Result<Vec<Token>, ParseError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_whitespace() || c == b',' {
            i += 1;
        } else if c.is_ascii_alphabetic() {
            tokens.push(Token::Command(char::from(c)));
            i += 1;
        } else if c.is_ascii_digit() || matches!(c, b'.' | b'+' | b'-') {
            let end = scan_number(bytes, i);
            let literal = &text[i..end];
            let value = literal.parse().map_err(|_| ParseError::InvalidNumber {
                token: literal.to_owned(),
                position: tokens.len(),
            })?;
            tokens.push(Token::Number(value));
            i = end;
        } else {
            let token: String = text[i..].chars().take(1).collect();
            return Err(ParseError::InvalidNumber {
                token,
                position: tokens.len(),
            });
        }
    }
    Ok(tokens)
}

/// Returns the end of the number literal starting at `start`.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let digits = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };
    let mut i = start;
    if matches!(bytes[i], b'+' | b'-') {
        i += 1;
    }
    i = digits(i);
    if i < bytes.len() && bytes[i] == b'.' {
        i = digits(i + 1);
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            i = digits(j);
        }
    }
    i.max(start + 1)
}

/// Last control point, kept for the smooth `S` and `T` commands.
#[derive(Debug, Clone, Copy)]
enum Control {
    Cubic(Point),
    Quadratic(Point),
}

struct Reader {
    tokens: Vec<Token>,
    pos: usize,
    path: Path,
    current: Point,
    subpath_start: Point,
    control: Option<Control>,
    started: bool,
    closed: bool,
}

impl Reader {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            path: Path::new(),
            current: Point::origin(),
            subpath_start: Point::origin(),
            control: None,
            started: false,
            closed: false,
        }
    }

    fn read(mut self) -> Result<Path> {
        while let Some(&token) = self.tokens.get(self.pos) {
            let command = match token {
                Token::Command(c) => c,
                Token::Number(_) if self.pos == 0 => return Err(ParseError::MissingMoveTo.into()),
                Token::Number(value) => {
                    return Err(ParseError::UnknownCommand {
                        command: value.to_string(),
                        position: self.pos,
                    }
                    .into())
                }
            };
            let position = self.pos;
            self.pos += 1;
            self.command(command, position)?;
        }
        Ok(self.path)
    }

    /// Consumes the numbers following a command, in groups of `size`.
    fn groups(&mut self, command: char, size: usize) -> std::result::Result<Vec<Vec<f64>>, ParseError> {
        let mut values = Vec::new();
        while let Some(Token::Number(v)) = self.tokens.get(self.pos) {
            values.push(*v);
            self.pos += 1;
        }
        if values.is_empty() || values.len() % size != 0 {
            return Err(ParseError::MissingArguments {
                command,
                expected: values.len().div_ceil(size).max(1) * size,
                found: values.len(),
            });
        }
        Ok(values.chunks(size).map(<[f64]>::to_vec).collect())
    }

    fn command(&mut self, command: char, position: usize) -> Result<()> {
        let relative = command.is_ascii_lowercase();
        let upper = command.to_ascii_uppercase();
        if !matches!(upper, 'M' | 'Z' | 'L' | 'H' | 'V' | 'C' | 'S' | 'Q' | 'T' | 'A') {
            return Err(ParseError::UnknownCommand {
                command: command.to_string(),
                position,
            }
            .into());
        }
        if upper == 'Z' {
            self.close_subpath();
            return Ok(());
        }
        let size = match upper {
            'M' | 'L' | 'T' => 2,
            'H' | 'V' => 1,
            'S' | 'Q' => 4,
            'C' => 6,
            _ => 7,
        };
        let groups = self.groups(command, size)?;
        for (index, g) in groups.iter().enumerate() {
            let origin = if relative { self.current.coords } else { Vector::zeros() };
            let at = |x: f64, y: f64| Point::new(x, y) + origin;
            match upper {
                'M' if index == 0 => self.move_to(at(g[0], g[1])),
                'M' | 'L' => self.line_to(at(g[0], g[1]))?,
                'H' => {
                    let x = if relative { self.current.x + g[0] } else { g[0] };
                    self.line_to(Point::new(x, self.current.y))?;
                }
                'V' => {
                    let y = if relative { self.current.y + g[0] } else { g[0] };
                    self.line_to(Point::new(self.current.x, y))?;
                }
                'C' => self.cubic_to(at(g[0], g[1]), at(g[2], g[3]), at(g[4], g[5]))?,
                'S' => {
                    let c1 = match self.control {
                        Some(Control::Cubic(c)) => self.current + (self.current - c),
                        _ => self.current,
                    };
                    self.cubic_to(c1, at(g[0], g[1]), at(g[2], g[3]))?;
                }
                'Q' => self.quadratic_to(at(g[0], g[1]), at(g[2], g[3]))?,
                'T' => {
                    let c = match self.control {
                        Some(Control::Quadratic(c)) => self.current + (self.current - c),
                        _ => self.current,
                    };
                    self.quadratic_to(c, at(g[0], g[1]))?;
                }
                _ => {
                    let large = flag(g[3])?;
                    let sweep = flag(g[4])?;
                    self.arc_to(g[0], g[1], g[2].to_radians(), large, sweep, at(g[5], g[6]))?;
                }
            }
        }
        Ok(())
    }

    fn move_to(&mut self, p: Point) {
        self.path.new_subpath();
        self.started = true;
        self.closed = false;
        self.current = p;
        self.subpath_start = p;
        self.control = None;
    }

    /// Adds a drawing curve, reopening a subpath after a close.
    fn draw(&mut self, curve: impl Into<Curve>, end: Point, control: Option<Control>) -> Result<()> {
        if !self.started {
            return Err(ParseError::MissingMoveTo.into());
        }
        if self.closed {
            self.path.new_subpath();
            self.closed = false;
        }
        self.path.add(curve);
        self.current = end;
        self.control = control;
        Ok(())
    }

    fn line_to(&mut self, p: Point) -> Result<()> {
        let segment = Polyline::new(vec![self.current, p]);
        self.draw(segment, p, None)
    }

    fn cubic_to(&mut self, c1: Point, c2: Point, p: Point) -> Result<()> {
        let curve = BezierCurve::new(3, vec![self.current, c1, c2, p])?;
        self.draw(curve, p, Some(Control::Cubic(c2)))
    }

    fn quadratic_to(&mut self, c: Point, p: Point) -> Result<()> {
        let curve = BezierCurve::new(2, vec![self.current, c, p])?;
        self.draw(curve, p, Some(Control::Quadratic(c)))
    }

    fn arc_to(&mut self, rx: f64, ry: f64, axis_angle: f64, large: bool, sweep: bool, p: Point) -> Result<()> {
        if coincident(&self.current, &p) {
            return self.draw(Polyline::new(vec![self.current, p]), p, None);
        }
        match EllipticalArc::from_endpoints(&self.current, &p, rx, ry, axis_angle, large, sweep) {
            Some(arc) => self.draw(arc, p, None),
            None => {
                warn!(rx, ry, "arc with a null radius drawn as a straight line");
                self.line_to(p)
            }
        }
    }

    fn close_subpath(&mut self) {
        if !self.started || self.closed {
            return;
        }
        let index = self.path.subpath_count() - 1;
        self.path.close(index, &LinkParams::straight());
        self.closed = true;
        self.current = self.subpath_start;
        self.control = None;
    }
}

fn flag(value: f64) -> std::result::Result<bool, ParseError> {
    if value == 0.0 {
        Ok(false)
    } else if value == 1.0 {
        Ok(true)
    } else {
        Err(ParseError::InvalidFlag {
            token: value.to_string(),
        })
    }
}

impl Path {
    /// Reads SVG path data.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for an unknown command, a malformed number,
    /// a missing argument, an arc flag other than `0` or `1`, or drawing
    /// before the first move.
    pub fn from_path_grammar(text: &str) -> Result<Path> {
        Self::from_path_grammar_with(text, None)
    }

    /// Reads SVG path data, then applies `transform` to the result.
    ///
    /// # Errors
    ///
    /// See [`Path::from_path_grammar`].
    pub fn from_path_grammar_with(text: &str, transform: Option<&Transform>) -> Result<Path> {
        let tokens = tokenize(text)?;
        let token_count = tokens.len();
        let mut path = Reader::new(tokens).read()?;
        if let Some(t) = transform {
            path.transform(t);
        }
        debug!(token_count, subpaths = path.subpath_count(), "read path data");
        Ok(path)
    }

    /// Writes the path as SVG path data with `digits` decimals.
    ///
    /// Polylines become `L`, Bezier curves are raised to cubic `C`, and arcs
    /// become `A`. Closed subpaths end with `z`.
    #[must_use]
    pub fn to_path_grammar(&self, digits: usize) -> String {
        self.to_path_grammar_with(digits, None)
    }

    /// Writes the path after applying `transform` to a copy of it.
    #[must_use]
    pub fn to_path_grammar_with(&self, digits: usize, transform: Option<&Transform>) -> String {
        let mut moved;
        let path = match transform {
            Some(t) => {
                moved = self.clone();
                moved.transform(t);
                &moved
            }
            None => self,
        };
        let mut out: Vec<String> = Vec::new();
        for (index, curves) in path.subpaths().iter().enumerate() {
            let mut current: Option<Point> = None;
            for curve in curves {
                let Some(start) = curve.start() else {
                    continue;
                };
                if !current.is_some_and(|c| coincident(&c, &start)) {
                    out.push(format!("M {}", format_point(&start, digits)));
                }
                write_curve(curve, digits, &mut out);
                current = curve.end();
            }
            if current.is_some() && path.is_closed(index) {
                out.push("z".to_owned());
            }
        }
        out.join(" ")
    }
}

fn write_curve(curve: &Curve, digits: usize, out: &mut Vec<String>) {
    match curve {
        Curve::Polyline(p) => write_nodes("L", p.nodes(), digits, out),
        Curve::Bezier(b) => match b.to_cubic() {
            Ok(cubic) => write_nodes("C", cubic.nodes(), digits, out),
            Err(error) => {
                warn!(%error, "writing Bezier curve as a polyline");
                let flat = b.to_polyline(FlattenParams::default().tolerance);
                write_nodes("L", flat.nodes(), digits, out);
            }
        },
        Curve::Arc(a) => write_arc(a, digits, out),
    }
}

fn write_nodes(command: &str, nodes: &[Point], digits: usize, out: &mut Vec<String>) {
    if nodes.len() < 2 {
        return;
    }
    let mut parts = vec![command.to_owned()];
    parts.extend(nodes[1..].iter().map(|p| format_point(p, digits)));
    out.push(parts.join(" "));
}

/// Writes an arc, split in pieces of at most half a turn when it closes on
/// itself.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn write_arc(arc: &EllipticalArc, digits: usize, out: &mut Vec<String>) {
    let sweep = arc.sweep();
    let pieces = if sweep.abs() < 2.0 * PI - 1e-9 {
        1
    } else {
        (sweep.abs() / PI).ceil() as usize
    };
    let step = sweep / pieces as f64;
    let radii = format!(
        "{},{}",
        format_number(arc.rx(), digits),
        format_number(arc.ry(), digits)
    );
    let rotation = format_number(arc.axis_angle().to_degrees(), digits);
    let large = u8::from(step.abs() > PI);
    let positive = u8::from(step > 0.0);
    for i in 1..=pieces {
        let end = arc.evaluate(arc.a1() + step * i as f64);
        out.push(format!(
            "A {radii} {rotation} {large} {positive} {}",
            format_point(&end, digits)
        ));
    }
}
