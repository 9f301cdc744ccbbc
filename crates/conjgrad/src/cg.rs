//! Conjugate Gradient solver for symmetric positive-definite systems.
//!
//! Solves `Ax = b` where `A` is a dense symmetric positive-definite (SPD)
//! matrix, refining the caller's initial guess in place. In exact arithmetic
//! the method terminates in at most `n` iterations for an `n x n` system.
//!
//! # Algorithm
//!
//! Unpreconditioned Hestenes-Stiefel CG with an absolute residual tolerance:
//!
//! ```text
//! r = b - A*x
//! p = r
//! rho = ||r||
//!
//! while rho > tolerance:
//!     q     = A * p
//!     alpha = rho^2 / (p . q)
//!     x     = x + alpha * p
//!     r     = r - alpha * q
//!     rho'  = ||r||
//!     beta  = (rho' / rho)^2
//!     p     = r + beta * p
//!     rho   = rho'
//! ```
//!
//! `r . r` is computed once per iteration and `rho` is its square root, so
//! `alpha` and `beta` use the exact squared norms.
//! When `||r0||` is far outside the unit range, `r` and `p` are carried in
//! units of `||r0||` so the squared norms cannot overflow or underflow.
//! The residual is updated incrementally rather than recomputed from `b - A*x`,
//! so it can drift from the true residual by a few ulps over many iterations.
//!
//! # Termination
//!
//! The loop is bounded by [`CgConfig::iteration_cap`]. A search direction with
//! non-positive curvature `p . Ap <= 0` proves `A` is not positive-definite and
//! aborts the solve with [`SolverError::NotPositiveDefinite`].

use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::config::CgConfig;
use crate::error::SolverError;
use crate::linalg::{dot_unchecked, norm, update_unchecked, xpby_unchecked};
use crate::traits::SolverEngine;
use crate::types::{ConvergenceInfo, DenseMatrix, Direction, SolveReport};
use crate::validation::validate_system;

/// Initial residual norms outside `[1 / RESCALE_THRESHOLD, RESCALE_THRESHOLD]`
/// run the recurrence on `r / ||r0||`, keeping `||r||^2` inside the `f64` range.
const RESCALE_THRESHOLD: f64 = 1e100;

/// Solve `a * x = b` in place with the given absolute tolerance.
///
/// All other settings take their [`CgConfig`] defaults: the iteration cap is
/// `max(n, DEFAULT_ITERATION_FLOOR)` and the matrix must be symmetric.
///
/// # Errors
///
/// See [`ConjugateGradientSolver::solve`].
///
/// # Examples
///
/// ```
/// use conjgrad::cg::solve;
/// use conjgrad::config::DEFAULT_TOLERANCE;
/// use conjgrad::types::DenseMatrix;
///
/// let a = DenseMatrix::from_rows(vec![vec![4.0, 1.0], vec![1.0, 3.0]]).unwrap();
/// let b = [1.0, 2.0];
/// let mut x = [0.0, 0.0];
///
/// let report = solve(&a, &b, &mut x, DEFAULT_TOLERANCE).unwrap();
/// assert!(report.residual_norm <= DEFAULT_TOLERANCE);
/// assert!((x[0] - 1.0 / 11.0).abs() < 1e-9);
/// assert!((x[1] - 7.0 / 11.0).abs() < 1e-9);
/// ```
pub fn solve(
    a: &DenseMatrix,
    b: &[f64],
    x: &mut [f64],
    tolerance: f64,
) -> Result<SolveReport, SolverError> {
    ConjugateGradientSolver::new(CgConfig::default().with_tolerance(tolerance)).solve(a, b, x)
}

// ═══════════════════════════════════════════════════════════════════════════
// ConjugateGradientSolver
// ═══════════════════════════════════════════════════════════════════════════

/// Conjugate Gradient solver for dense SPD systems.
///
/// Stores only the configuration. Each solve allocates its own residual,
/// search-direction and scratch buffers, so one solver may be used
/// concurrently from multiple threads.
#[derive(Debug, Clone, Default)]
pub struct ConjugateGradientSolver {
    config: CgConfig,
}

impl ConjugateGradientSolver {
    /// Create a solver with the given configuration.
    ///
    /// The configuration is checked on every [`solve`](Self::solve), not here.
    pub fn new(config: CgConfig) -> Self {
        Self { config }
    }

    /// Return the configuration.
    #[inline]
    pub fn config(&self) -> &CgConfig {
        &self.config
    }

    /// Return the configured tolerance.
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.config.tolerance
    }

    /// Solve `Ax = b`, refining the initial guess held in `x`.
    ///
    /// Inputs are validated before `x` is touched; after that `x` is updated
    /// every iteration and holds the last iterate if the solve fails.
    ///
    /// # Errors
    ///
    /// * [`SolverError::InvalidInput`] -- empty system, non-square or
    ///   asymmetric matrix, length mismatch, non-finite input, bad config.
    /// * [`SolverError::NotPositiveDefinite`] -- non-positive curvature found.
    /// * [`SolverError::NotConverged`] -- iteration cap reached.
    /// * [`SolverError::NumericalInstability`] -- NaN or Inf in the recurrence.
    pub fn solve(
        &self,
        matrix: &DenseMatrix,
        rhs: &[f64],
        x: &mut [f64],
    ) -> Result<SolveReport, SolverError> {
        validate_system(matrix, rhs, x, &self.config)?;
        self.solve_inner(matrix, rhs, x)
    }

    /// Core CG loop. Inputs must already be validated.
    fn solve_inner(
        &self,
        matrix: &DenseMatrix,
        rhs: &[f64],
        x: &mut [f64],
    ) -> Result<SolveReport, SolverError> {
        let start_time = Instant::now();
        let n = matrix.rows();
        let tolerance = self.config.tolerance;
        let max_iterations = self.config.iteration_cap(n);

        // --- Initialize: r = b - A*x, p = r ---
        let mut r = vec![0.0f64; n];
        matrix.residual_unchecked(x, rhs, &mut r);
        let initial_residual_norm = norm(&r);

        if !initial_residual_norm.is_finite() {
            return Err(SolverError::NumericalInstability {
                iteration: 0,
                detail: format!("initial residual norm is {initial_residual_norm}"),
            });
        }

        // r, p and the residual norms below are in units of `scale`; x is not.
        let scale = if initial_residual_norm > RESCALE_THRESHOLD
            || (initial_residual_norm > 0.0 && initial_residual_norm < RESCALE_THRESHOLD.recip())
        {
            initial_residual_norm
        } else {
            1.0
        };
        if scale != 1.0 {
            debug!("CG: rescaling residual by 1/{scale:.3e}");
            r.iter_mut().for_each(|ri| *ri /= scale);
        }
        let mut old_rr = dot_unchecked(&r, &r);
        let mut old_norm = old_rr.sqrt();
        let scaled_tolerance = tolerance / scale;
        let mut p = r.clone();
        let mut q = vec![0.0f64; n];

        let mut convergence_history = if self.config.record_history {
            Vec::with_capacity(max_iterations.min(256))
        } else {
            Vec::new()
        };

        debug!(
            "CG: n={n}, tol={tolerance:.2e}, max_iter={max_iterations}, ||r0||={initial_residual_norm:.6e}"
        );

        // ===============================================================
        // Iterate
        // ===============================================================
        let mut iterations = 0usize;
        while old_norm > scaled_tolerance {
            if iterations == max_iterations {
                let residual = old_norm * scale;
                warn!(
                    "CG: no convergence after {iterations} iterations, ||r|| = {residual:.6e}"
                );
                return Err(SolverError::NotConverged {
                    iterations,
                    residual,
                    tolerance,
                });
            }
            let k = iterations;

            // --- q = A * p ---
            matrix.matvec_unchecked(&p, &mut q);

            // --- alpha = ||r||^2 / (p . q) ---
            let curvature = dot_unchecked(&p, &q);
            if !curvature.is_finite() {
                warn!("CG: non-finite p.Ap at iteration {k}");
                return Err(SolverError::NumericalInstability {
                    iteration: k,
                    detail: format!("p.Ap = {curvature}"),
                });
            }
            if curvature <= 0.0 {
                warn!("CG: non-positive p.Ap = {curvature:.4e} at iteration {k}");
                return Err(SolverError::NotPositiveDefinite {
                    iteration: k,
                    curvature,
                });
            }
            let alpha = old_rr / curvature;

            // --- x = x + alpha * p ---
            update_unchecked(x, &p, alpha * scale, Direction::Add);

            // --- r = r - alpha * q ---
            update_unchecked(&mut r, &q, alpha, Direction::Subtract);

            let new_rr = dot_unchecked(&r, &r);
            let new_norm = new_rr.sqrt();
            if !new_norm.is_finite() {
                warn!("CG: residual norm became {new_norm} at iteration {k}");
                return Err(SolverError::NumericalInstability {
                    iteration: k,
                    detail: format!("||r|| = {new_norm}"),
                });
            }

            iterations += 1;
            if self.config.record_history {
                convergence_history.push(ConvergenceInfo {
                    iteration: k,
                    residual_norm: new_norm * scale,
                });
            }
            trace!(
                "CG iter {k}: ||r|| = {:.6e}, alpha = {alpha:.6e}",
                new_norm * scale
            );

            // --- p = r + beta * p, beta = (||r'|| / ||r||)^2 ---
            let beta = new_rr / old_rr;
            xpby_unchecked(&r, beta, &mut p);

            old_rr = new_rr;
            old_norm = new_norm;
        }

        let residual_norm = old_norm * scale;
        debug!(
            "CG converged after {iterations} iterations: ||r|| = {residual_norm:.6e}"
        );

        Ok(SolveReport {
            iterations,
            initial_residual_norm,
            residual_norm,
            wall_time: start_time.elapsed(),
            convergence_history,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SolverEngine trait implementation
// ═══════════════════════════════════════════════════════════════════════════

impl SolverEngine for ConjugateGradientSolver {
    fn solve(
        &self,
        matrix: &DenseMatrix,
        rhs: &[f64],
        x: &mut [f64],
    ) -> Result<SolveReport, SolverError> {
        ConjugateGradientSolver::solve(self, matrix, rhs, x)
    }

    fn name(&self) -> &'static str {
        "cg"
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
