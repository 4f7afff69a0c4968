use thiserror::Error;

/// Top-level error type for the geopath engine.
#[derive(Debug, Error)]
pub enum GeopathError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    BoundingBox(#[from] BoundingBoxError),
}

/// Errors raised while reading the path grammar.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unknown path command '{command}' at token {position}")]
    UnknownCommand { command: String, position: usize },

    #[error("invalid number '{token}' at token {position}")]
    InvalidNumber { token: String, position: usize },

    #[error("command '{command}' expects {expected} arguments, found {found}")]
    MissingArguments {
        command: char,
        expected: usize,
        found: usize,
    },

    #[error("invalid arc flag '{token}', expected 0 or 1")]
    InvalidFlag { token: String },

    #[error("path data must start with a move command")]
    MissingMoveTo,
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("singular transform (determinant {determinant})")]
    SingularTransform { determinant: f64 },
}

/// Errors related to curve construction and evaluation.
#[derive(Debug, Error)]
pub enum CurveError {
    #[error("Bezier order {0} is not supported")]
    UnsupportedOrder(u32),

    #[error("a Bezier curve of order {order} cannot have {count} nodes")]
    InvalidNodeCount { order: u32, count: usize },

    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Errors related to bounding box queries.
#[derive(Debug, Error)]
pub enum BoundingBoxError {
    #[error("unknown anchor: {0}")]
    UnknownAnchor(String),

    #[error("bounding box is empty")]
    Empty,
}

/// Convenience type alias for results using [`GeopathError`].
pub type Result<T> = std::result::Result<T, GeopathError>;
