//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default absolute residual tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Lower bound on the default iteration cap.
///
/// In exact arithmetic CG on an `n x n` SPD system finishes in `n` steps.
/// Rounding can stretch that, so when no explicit cap is configured the loop
/// runs for at most `max(n, DEFAULT_ITERATION_FLOOR)` iterations.
pub const DEFAULT_ITERATION_FLOOR: usize = 1000;

/// Default relative tolerance for the symmetry precheck.
pub const DEFAULT_SYMMETRY_TOLERANCE: f64 = 1e-12;

/// Configuration for [`ConjugateGradientSolver`](crate::cg::ConjugateGradientSolver).
///
/// Deserializes with every field optional, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CgConfig {
    /// Absolute tolerance on `||b - A x||_2`. Iteration stops once the
    /// residual norm is `<= tolerance`.
    pub tolerance: f64,

    /// Explicit iteration cap. `None` means `max(n, DEFAULT_ITERATION_FLOOR)`.
    pub max_iterations: Option<usize>,

    /// Reject matrices that are not symmetric before iterating.
    pub check_symmetry: bool,

    /// Relative tolerance used by the symmetry precheck:
    /// `|a_ij - a_ji| <= symmetry_tolerance * max(|a_ij|, |a_ji|, 1)`.
    pub symmetry_tolerance: f64,

    /// Record the residual norm after each iteration in
    /// [`SolveReport::convergence_history`](crate::types::SolveReport::convergence_history).
    pub record_history: bool,
}

impl Default for CgConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: None,
            check_symmetry: true,
            symmetry_tolerance: DEFAULT_SYMMETRY_TOLERANCE,
            record_history: false,
        }
    }
}

impl CgConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn with_symmetry_check(mut self, enabled: bool) -> Self {
        self.check_symmetry = enabled;
        self
    }

    pub fn with_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    /// Iteration cap for an `n x n` system.
    #[inline]
    pub fn iteration_cap(&self, n: usize) -> usize {
        self.max_iterations
            .unwrap_or_else(|| n.max(DEFAULT_ITERATION_FLOOR))
    }

    /// Check that every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ParameterOutOfRange`] for the first bad
    /// parameter.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ValidationError::ParameterOutOfRange {
                name: "tolerance".into(),
                value: self.tolerance.to_string(),
                expected: "positive finite value".into(),
            });
        }

        if self.max_iterations == Some(0) {
            return Err(ValidationError::ParameterOutOfRange {
                name: "max_iterations".into(),
                value: "0".into(),
                expected: ">= 1".into(),
            });
        }

        if !self.symmetry_tolerance.is_finite() || self.symmetry_tolerance < 0.0 {
            return Err(ValidationError::ParameterOutOfRange {
                name: "symmetry_tolerance".into(),
                value: self.symmetry_tolerance.to_string(),
                expected: "non-negative finite value".into(),
            });
        }

        Ok(())
    }
}
