//! Text encodings of paths.
//!
//! - [`path_grammar`]: the SVG `d` attribute grammar, read and written.
//! - [`polygon`]: an OpenSCAD `polygon(points=..., paths=...)` statement.

pub mod path_grammar;
pub mod polygon;

use crate::math::Point;

/// Largest number of decimal digits honoured by [`format_number`].
const MAX_DIGITS: usize = 15;

/// Rounds `value` to `digits` decimals and writes it compactly.
///
/// Integral results carry no decimal point and trailing zeros are dropped:
/// `12.0` gives `"12"` and `5.25` gives `"5.25"`.
#[must_use]
pub fn format_number(value: f64, digits: usize) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let scale = 10_f64.powi(digits.min(MAX_DIGITS) as i32);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        "0".to_owned()
    } else {
        format!("{rounded}")
    }
}

/// Writes a point as `x,y`.
#[must_use]
pub fn format_point(p: &Point, digits: usize) -> String {
    format!("{},{}", format_number(p.x, digits), format_number(p.y, digits))
}
