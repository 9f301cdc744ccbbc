//! Core types for the dense Conjugate Gradient solver.
//!
//! Provides [`DenseMatrix`] for row-major dense storage, the [`Direction`]
//! flag used by the vector update, and the [`SolveReport`] returned by a
//! successful solve.

use std::ops::Index;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::linalg::dot_unchecked;

// ---------------------------------------------------------------------------
// DenseMatrix
// ---------------------------------------------------------------------------

/// Dense real matrix stored in row-major order.
///
/// # Layout
///
/// For a matrix with `m` rows and `n` columns, `data` has length `m * n` and
/// row `i` occupies `data[i * n..(i + 1) * n]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl DenseMatrix {
    /// Build a matrix from a sequence of rows.
    ///
    /// An empty sequence yields the `0 x 0` matrix.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DimensionMismatch`] if the rows are ragged.
    ///
    /// # Examples
    ///
    /// ```
    /// use conjgrad::types::DenseMatrix;
    ///
    /// let a = DenseMatrix::from_rows(vec![vec![4.0, 1.0], vec![1.0, 3.0]]).unwrap();
    /// assert_eq!((a.rows(), a.cols()), (2, 2));
    /// assert_eq!(a[(0, 1)], 1.0);
    /// ```
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ValidationError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);

        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(ValidationError::DimensionMismatch(format!(
                    "row {i} has {} columns but row 0 has {n_cols}",
                    row.len(),
                )));
            }
            data.extend(row);
        }

        Ok(Self {
            data,
            rows: n_rows,
            cols: n_cols,
        })
    }

    /// Build a matrix from a flat row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DimensionMismatch`] if
    /// `data.len() != rows * cols`.
    pub fn from_row_major(
        rows: usize,
        cols: usize,
        data: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            ValidationError::DimensionMismatch(format!("{rows}x{cols} overflows usize"))
        })?;
        if data.len() != expected {
            return Err(ValidationError::DimensionMismatch(format!(
                "buffer of length {} cannot hold a {rows}x{cols} matrix",
                data.len(),
            )));
        }
        Ok(Self { data, rows, cols })
    }

    /// Square identity matrix of dimension `n`.
    pub fn identity(n: usize) -> Self {
        let mut data = vec![0.0f64; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self {
            data,
            rows: n,
            cols: n,
        }
    }

    /// Square diagonal matrix with the given diagonal.
    pub fn from_diagonal(diag: &[f64]) -> Self {
        let n = diag.len();
        let mut data = vec![0.0f64; n * n];
        for (i, &d) in diag.iter().enumerate() {
            data[i * n + i] = d;
        }
        Self {
            data,
            rows: n,
            cols: n,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `true` if `rows == cols`. The empty `0 x 0` matrix counts as square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// `true` if the matrix has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Row-major backing buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Dense matrix-vector multiply: `y = A * x`.
    ///
    /// Writes into the caller-supplied `y` so the buffer can be reused across
    /// iterations.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DimensionMismatch`] if `x.len() != cols` or
    /// `y.len() != rows`.
    pub fn matvec(&self, x: &[f64], y: &mut [f64]) -> Result<(), ValidationError> {
        if x.len() != self.cols {
            return Err(ValidationError::length_mismatch("input vector", self.cols, x.len()));
        }
        if y.len() != self.rows {
            return Err(ValidationError::length_mismatch("output vector", self.rows, y.len()));
        }
        self.matvec_unchecked(x, y);
        Ok(())
    }

    /// Allocating variant of [`matvec`](Self::matvec).
    pub fn mul_vec(&self, x: &[f64]) -> Result<Vec<f64>, ValidationError> {
        let mut y = vec![0.0f64; self.rows];
        self.matvec(x, &mut y)?;
        Ok(y)
    }

    /// Matrix-vector multiply without length checks.
    ///
    /// This is the hottest path of the solver. The caller must have
    /// validated that `x.len() == cols` and `y.len() == rows`.
    #[inline]
    pub fn matvec_unchecked(&self, x: &[f64], y: &mut [f64]) {
        debug_assert_eq!(x.len(), self.cols, "matvec: x.len() != cols");
        debug_assert_eq!(y.len(), self.rows, "matvec: y.len() != rows");

        if self.cols == 0 {
            y.fill(0.0);
            return;
        }
        for (row, yi) in self.data.chunks_exact(self.cols).zip(y.iter_mut()) {
            *yi = dot_unchecked(row, x);
        }
    }

    /// Fused residual computation: writes `r = b - A*x` and returns
    /// `||r||^2` in a single pass, avoiding a separate buffer for `A*x`.
    ///
    /// Same preconditions as [`matvec_unchecked`](Self::matvec_unchecked),
    /// plus `b.len() == r.len() == rows`. The returned sum is unscaled and
    /// reaches `inf` once `||r||` passes about `1e154`; [`norm`] of `r` does
    /// not.
    ///
    /// [`norm`]: crate::linalg::norm
    #[inline]
    pub fn residual_unchecked(&self, x: &[f64], b: &[f64], r: &mut [f64]) -> f64 {
        debug_assert_eq!(x.len(), self.cols);
        debug_assert_eq!(b.len(), self.rows);
        debug_assert_eq!(r.len(), self.rows);

        let mut norm_sq = 0.0f64;
        for i in 0..self.rows {
            let r_i = b[i] - dot_unchecked(self.row(i), x);
            r[i] = r_i;
            norm_sq += r_i * r_i;
        }
        norm_sq
    }

    /// Residual `b - A*x` as a fresh vector.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DimensionMismatch`] on inconsistent lengths.
    pub fn residual(&self, x: &[f64], b: &[f64]) -> Result<Vec<f64>, ValidationError> {
        if x.len() != self.cols {
            return Err(ValidationError::length_mismatch("solution vector", self.cols, x.len()));
        }
        if b.len() != self.rows {
            return Err(ValidationError::length_mismatch("rhs", self.rows, b.len()));
        }
        let mut r = vec![0.0f64; self.rows];
        self.residual_unchecked(x, b, &mut r);
        Ok(r)
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols,
        );
        &self.data[i * self.cols + j]
    }
}

// ---------------------------------------------------------------------------
// Vector update direction
// ---------------------------------------------------------------------------

/// Sign selector for [`update`](crate::linalg::update).
///
/// Lets callers subtract a scaled vector without negating the scalar first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// `y += alpha * x`
    #[default]
    Add,
    /// `y -= alpha * x`
    Subtract,
}

impl Direction {
    /// `+1.0` for [`Add`](Direction::Add), `-1.0` for
    /// [`Subtract`](Direction::Subtract).
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Add => 1.0,
            Direction::Subtract => -1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Solve results
// ---------------------------------------------------------------------------

/// Per-iteration convergence snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvergenceInfo {
    /// Iteration index (0-based).
    pub iteration: usize,
    /// Residual L2 norm after this iteration.
    pub residual_norm: f64,
}

/// Diagnostics returned by a successful solve.
///
/// The solution itself lives in the caller's `x` buffer.
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    /// Number of CG iterations performed.
    pub iterations: usize,
    /// Norm of the initial residual `b - A*x0`.
    pub initial_residual_norm: f64,
    /// Norm of the incrementally maintained residual at termination.
    pub residual_norm: f64,
    /// Wall-clock time taken.
    pub wall_time: Duration,
    /// Per-iteration residual norms; empty unless history recording is
    /// enabled in the config.
    pub convergence_history: Vec<ConvergenceInfo>,
}
