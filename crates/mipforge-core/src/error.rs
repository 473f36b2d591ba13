//! Error types for LP model manipulation

use thiserror::Error;

/// Error raised when a model is built or mutated inconsistently.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LpError {
    /// A column index past the end of the model.
    #[error("column {index} out of range (model has {len} columns)")]
    ColumnOutOfRange { index: usize, len: usize },

    /// A row index past the end of the model.
    #[error("row {index} out of range (model has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    /// Lower bound above upper bound, NaN, or an infinite bound on the wrong side.
    #[error("invalid bounds [{lower}, {upper}] for {target}")]
    InvalidBounds {
        target: String,
        lower: f64,
        upper: f64,
    },

    /// NaN or infinite coefficient.
    #[error("coefficient {value} for {target} is not finite")]
    NonFiniteCoefficient { target: String, value: f64 },
}

/// Result type alias for LP model operations
pub type Result<T> = std::result::Result<T, LpError>;
