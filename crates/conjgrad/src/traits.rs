//! Solver trait.

use crate::error::SolverError;
use crate::types::{DenseMatrix, SolveReport};

/// Core trait for in-place linear solvers.
///
/// A `SolverEngine` solves `A x = b`, starting from the caller's initial
/// guess in `x` and overwriting it with the solution. The solver holds only
/// configuration, so one instance can serve many solves and be shared across
/// threads.
pub trait SolverEngine: Send + Sync {
    /// Solve the linear system `A x = b` in place.
    ///
    /// # Arguments
    ///
    /// * `matrix` - the dense coefficient matrix `A`.
    /// * `rhs` - the right-hand side vector `b`.
    /// * `x` - initial guess on entry, solution on success. On error it holds
    ///   the last iterate reached (or is untouched if validation failed).
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] on invalid input, a non-SPD matrix,
    /// non-convergence, or numerical breakdown.
    fn solve(
        &self,
        matrix: &DenseMatrix,
        rhs: &[f64],
        x: &mut [f64],
    ) -> Result<SolveReport, SolverError>;

    /// Short identifier for logs and reports.
    fn name(&self) -> &'static str;
}
