//! Error types for subset selection.

use thiserror::Error;

/// Errors reported by the selection engine.
///
/// Every validation error is raised before any selection work starts.
/// Numeric underflow inside the objective is not an error: it is absorbed
/// by [`LOG_FLOOR`](crate::objective::LOG_FLOOR).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntrofyError {
    /// A vector or matrix row does not have the expected length.
    #[error("{what} has length {actual}, expected {expected}")]
    ShapeMismatch {
        /// Which input disagreed with the attribute count.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// The requested subset size is not in `1..=n`.
    #[error("selection size k must be in 1..={n}, got {k}")]
    SelectionSizeOutOfRange {
        /// Requested subset size.
        k: usize,
        /// Number of candidate rows.
        n: usize,
    },

    /// A weight is negative or not finite.
    #[error("weight {index} must be finite and non-negative, got {value}")]
    InvalidWeight {
        /// Attribute index.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// A target probability lies outside `[0, 1]`.
    #[error("target {index} must lie in [0, 1], got {value}")]
    TargetOutOfRange {
        /// Attribute index.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// A pre-selected row does not exist.
    #[error("pre-selected row {row} is out of range for {n} rows")]
    PreSelectOutOfRange {
        /// Offending row identifier.
        row: usize,
        /// Number of candidate rows.
        n: usize,
    },

    /// More distinct rows were pre-selected than the subset can hold.
    #[error("{count} pre-selected rows exceed the selection size {k}")]
    TooManyPreSelects {
        /// Number of distinct pre-selected rows.
        count: usize,
        /// Requested subset size.
        k: usize,
    },

    /// `n_samples` was zero.
    #[error("n_samples must be at least 1")]
    InvalidSampleCount,

    /// The search was cancelled before any trial completed.
    #[error("selection was cancelled before any trial completed")]
    Cancelled,
}

/// Result type alias for selection operations.
pub type Result<T> = std::result::Result<T, EntrofyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EntrofyError::SelectionSizeOutOfRange { k: 0, n: 10 };
        assert_eq!(err.to_string(), "selection size k must be in 1..=10, got 0");

        let err = EntrofyError::ShapeMismatch {
            what: "weights",
            expected: 5,
            actual: 3,
        };
        assert_eq!(err.to_string(), "weights has length 3, expected 5");

        let err = EntrofyError::TargetOutOfRange {
            index: 2,
            value: 1.5,
        };
        assert_eq!(err.to_string(), "target 2 must lie in [0, 1], got 1.5");
    }
}
