//! Error types for the solver crate.
//!
//! Input problems are reported as [`ValidationError`] before any arithmetic
//! happens. Failures that can only be observed while iterating (non-SPD
//! curvature, exhausted iteration cap, NaN/Inf) are reported as
//! [`SolverError`]. All errors implement `std::error::Error` via `thiserror`.

/// Primary error type for solver operations.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// The caller supplied invalid input (dimensions, parameters, etc.).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// A search direction with non-positive curvature `p^T A p <= 0` was
    /// found, so `A` is not positive-definite.
    #[error("matrix is not positive-definite: p^T A p = {curvature:.6e} at iteration {iteration}")]
    NotPositiveDefinite {
        /// Iteration at which the curvature was measured.
        iteration: usize,
        /// The offending value of `p^T A p`.
        curvature: f64,
    },

    /// The iteration cap was reached before the residual dropped below the
    /// tolerance.
    #[error(
        "solver did not converge after {iterations} iterations (residual={residual:.2e}, tol={tolerance:.2e})"
    )]
    NotConverged {
        /// Number of iterations completed before the cap was hit.
        iterations: usize,
        /// Residual norm at termination.
        residual: f64,
        /// Target tolerance that was not reached.
        tolerance: f64,
    },

    /// A NaN or infinity appeared in the recurrence.
    #[error("numerical instability at iteration {iteration}: {detail}")]
    NumericalInstability {
        /// Iteration at which the instability was detected.
        iteration: usize,
        /// Human-readable explanation.
        detail: String,
    },
}

/// Validation errors for solver inputs.
///
/// These are raised eagerly before any computation begins so that callers get
/// clear diagnostics rather than out-of-bounds reads or NaN propagation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Vector or matrix sizes are inconsistent.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The coefficient matrix is not square.
    #[error("matrix must be square but is {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// The system has dimension zero.
    #[error("system is empty (dimension 0)")]
    EmptySystem,

    /// A value is NaN or infinite where a finite number is required.
    #[error("non-finite value detected: {0}")]
    NonFiniteValue(String),

    /// `A[row][col]` and `A[col][row]` differ by more than the configured
    /// symmetry tolerance.
    #[error("matrix is not symmetric: A[{row}][{col}] = {upper} but A[{col}][{row}] = {lower}")]
    NotSymmetric {
        /// Row of the upper-triangle entry.
        row: usize,
        /// Column of the upper-triangle entry.
        col: usize,
        /// Value of `A[row][col]`.
        upper: f64,
        /// Value of `A[col][row]`.
        lower: f64,
    },

    /// A parameter is outside its valid range.
    #[error("parameter out of range: {name} = {value} (expected {expected})")]
    ParameterOutOfRange {
        /// Name of the parameter.
        name: String,
        /// The invalid value (as a string for flexibility).
        value: String,
        /// Human-readable description of the valid range.
        expected: String,
    },

    /// Matrix size exceeds the implementation limit.
    #[error("matrix size {rows}x{cols} exceeds maximum supported {max_dim}x{max_dim}")]
    MatrixTooLarge {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
        /// Maximum supported dimension.
        max_dim: usize,
    },
}

impl ValidationError {
    /// Shorthand for a length mismatch between two named operands.
    pub(crate) fn length_mismatch(what: &str, expected: usize, actual: usize) -> Self {
        ValidationError::DimensionMismatch(format!(
            "{what} has length {actual} but {expected} was expected"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_converts_into_solver_error() {
        let err: SolverError = ValidationError::EmptySystem.into();
        assert!(matches!(
            err,
            SolverError::InvalidInput(ValidationError::EmptySystem)
        ));
    }

    #[test]
    fn messages_name_the_problem() {
        let err = ValidationError::length_mismatch("rhs", 2, 3);
        assert_eq!(
            err.to_string(),
            "dimension mismatch: rhs has length 3 but 2 was expected"
        );

        let err = SolverError::NotConverged {
            iterations: 10,
            residual: 1.5e-3,
            tolerance: 1e-10,
        };
        assert!(err.to_string().contains("after 10 iterations"));
    }
}
