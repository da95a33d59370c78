//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid geometry and configuration (structural misuse, fail-fast), samples that fall outside
//! a fixed grid (fatal to a binning run), and [`MalformedSample`], which the rasterizer recovers
//! from locally by skipping and counting the offending row.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "sample ({x}, {y}) maps to cell (row {row}, col {col}) outside a {rows}x{cols} grid"
    )]
    OutOfGridBounds {
        x: f64,
        y: f64,
        row: i64,
        col: i64,
        rows: usize,
        cols: usize,
    },

    #[error(transparent)]
    Malformed(#[from] MalformedSample),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

/// Reasons a single sample row is rejected.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedSample {
    #[error("expected {expected} fields, found {found}")]
    WrongArity { expected: usize, found: usize },

    #[error("field {column} is not numeric: '{field}'")]
    NonNumeric { column: usize, field: String },

    #[error("coordinate field {column} is empty")]
    MissingCoordinate { column: usize },

    #[error("coordinate is not finite")]
    NonFiniteCoordinate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        matches!(err, Error::Other(_))
            .then_some(())
            .expect("expected Other variant");
    }

    #[test]
    fn from_str_allocates_owned_message() {
        let err: Error = "issue".into();
        assert!(matches!(err, Error::Other(ref msg) if msg == "issue"));
    }

    #[test]
    fn malformed_sample_converts_transparently() {
        let err: Error = MalformedSample::WrongArity {
            expected: 3,
            found: 2,
        }
        .into();
        assert_eq!(err.to_string(), "expected 3 fields, found 2");
    }

    #[test]
    fn out_of_bounds_message_names_cell() {
        let err = Error::OutOfGridBounds {
            x: 1.5,
            y: -2.0,
            row: -1,
            col: 3,
            rows: 4,
            cols: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("row -1"));
        assert!(msg.contains("4x4"));
    }
}
