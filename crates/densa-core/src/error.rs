use core::fmt;

use thiserror::Error;

/// Which axis of a matrix an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row => f.write_str("row"),
            Self::Column => f.write_str("column"),
        }
    }
}

/// All errors returned by `densa-core`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Declared dimensions do not match the supplied data.
    #[error("invalid shape {rows}x{cols}: {reason}")]
    InvalidShape {
        rows: usize,
        cols: usize,
        reason: &'static str,
    },

    /// A row of a nested input array has the wrong length.
    #[error("row {row} has {got} elements, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// A `(row, col)` element index is out of bounds.
    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// An entry of a row or column selection is out of bounds.
    #[error("{axis} index {index} out of bounds for extent {extent}")]
    AxisOutOfBounds {
        axis: Axis,
        index: usize,
        extent: usize,
    },

    /// A range selection whose end precedes its start.
    #[error("range {start}..{end} has negative length")]
    ReversedRange { start: usize, end: usize },

    /// Operand shapes do not conform for the requested operation.
    #[error("matrix dimensions must agree: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// The operation is only defined for square matrices.
    #[error("{op} requires a square matrix, got {rows}x{cols}")]
    NotSquare {
        op: &'static str,
        rows: usize,
        cols: usize,
    },

    /// Matrix is singular and the system cannot be solved.
    #[error("matrix is singular")]
    SingularMatrix,

    /// Matrix does not have full column rank.
    #[error("matrix is rank deficient")]
    RankDeficient,

    /// Cholesky factor of a matrix that is not symmetric positive definite.
    #[error("matrix is not symmetric positive definite")]
    NotPositiveDefinite,

    /// The operation is not supported for the given input.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },
}

/// Convenience alias used throughout `densa-core`.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = CoreError::AxisOutOfBounds {
            axis: Axis::Column,
            index: 4,
            extent: 4,
        };
        assert_eq!(e.to_string(), "column index 4 out of bounds for extent 4");

        let e = CoreError::DimensionMismatch {
            expected: (3, 4),
            got: (4, 3),
        };
        assert_eq!(
            e.to_string(),
            "matrix dimensions must agree: expected (3, 4), got (4, 3)"
        );

        let e = CoreError::NotSquare {
            op: "det",
            rows: 2,
            cols: 3,
        };
        assert_eq!(e.to_string(), "det requires a square matrix, got 2x3");
    }
}
