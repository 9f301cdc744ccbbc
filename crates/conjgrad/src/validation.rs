//! Input validation for the solver boundary.
//!
//! All validation functions run eagerly before any computation begins, so
//! callers receive a clear diagnostic instead of an out-of-bounds panic or a
//! solution full of NaN. Every public function returns [`ValidationError`],
//! which converts into [`SolverError::InvalidInput`](crate::error::SolverError::InvalidInput)
//! via `From`.
//!
//! The linear-algebra primitives used inside the CG loop do not repeat these
//! checks.

use crate::config::CgConfig;
use crate::error::ValidationError;
use crate::types::DenseMatrix;

// ---------------------------------------------------------------------------
// Resource limits
// ---------------------------------------------------------------------------

/// Maximum dimension of a dense system (`n * n` entries must fit in memory).
pub const MAX_DIM: usize = 65_536;

// ---------------------------------------------------------------------------
// Matrix validation
// ---------------------------------------------------------------------------

/// Validate the coefficient matrix.
///
/// Checks, in order:
///
/// 1. The system is not empty.
/// 2. Both dimensions are within [`MAX_DIM`].
/// 3. The matrix is square.
/// 4. No `NaN` or `Inf` entries.
///
/// # Errors
///
/// Returns [`ValidationError`] describing the first violation found.
///
/// # Examples
///
/// ```
/// use conjgrad::types::DenseMatrix;
/// use conjgrad::validation::validate_matrix;
///
/// assert!(validate_matrix(&DenseMatrix::identity(3)).is_ok());
/// assert!(validate_matrix(&DenseMatrix::identity(0)).is_err());
/// ```
pub fn validate_matrix(matrix: &DenseMatrix) -> Result<(), ValidationError> {
    if matrix.rows() == 0 || matrix.cols() == 0 {
        return Err(ValidationError::EmptySystem);
    }

    if matrix.rows() > MAX_DIM || matrix.cols() > MAX_DIM {
        return Err(ValidationError::MatrixTooLarge {
            rows: matrix.rows(),
            cols: matrix.cols(),
            max_dim: MAX_DIM,
        });
    }

    if !matrix.is_square() {
        return Err(ValidationError::NotSquare {
            rows: matrix.rows(),
            cols: matrix.cols(),
        });
    }

    let n = matrix.cols();
    if let Some(idx) = matrix.as_slice().iter().position(|v| !v.is_finite()) {
        return Err(ValidationError::NonFiniteValue(format!(
            "matrix[{}][{}] = {}",
            idx / n,
            idx % n,
            matrix.as_slice()[idx],
        )));
    }

    Ok(())
}

/// Check that `A[i][j]` and `A[j][i]` agree for every pair.
///
/// Two entries agree when `|a_ij - a_ji| <= rel_tol * max(|a_ij|, |a_ji|, 1)`.
/// The matrix is assumed square (see [`validate_matrix`]).
///
/// # Errors
///
/// Returns [`ValidationError::NotSymmetric`] naming the first offending pair
/// in row-major order of the upper triangle.
pub fn validate_symmetric(matrix: &DenseMatrix, rel_tol: f64) -> Result<(), ValidationError> {
    let n = matrix.rows();
    for i in 0..n {
        for j in (i + 1)..n {
            let upper = matrix[(i, j)];
            let lower = matrix[(j, i)];
            let scale = upper.abs().max(lower.abs()).max(1.0);
            if (upper - lower).abs() > rel_tol * scale {
                return Err(ValidationError::NotSymmetric {
                    row: i,
                    col: j,
                    upper,
                    lower,
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Vector validation
// ---------------------------------------------------------------------------

/// Validate a vector operand by name: length and finiteness.
fn validate_vector(name: &str, v: &[f64], expected_len: usize) -> Result<(), ValidationError> {
    if v.len() != expected_len {
        return Err(ValidationError::DimensionMismatch(format!(
            "{name} length {} does not match matrix dimension {expected_len}",
            v.len(),
        )));
    }

    if let Some((i, &val)) = v.iter().enumerate().find(|(_, val)| !val.is_finite()) {
        return Err(ValidationError::NonFiniteValue(format!("{name}[{i}] = {val}")));
    }

    Ok(())
}

/// Validate the right-hand side `b`.
///
/// An all-zero `b` is valid (the solution is zero) but emits a
/// [`tracing::warn`] since it usually indicates a caller bug.
///
/// # Errors
///
/// Returns [`ValidationError`] on length mismatch or non-finite entries.
pub fn validate_rhs(rhs: &[f64], expected_len: usize) -> Result<(), ValidationError> {
    validate_vector("rhs", rhs, expected_len)?;

    if !rhs.is_empty() && rhs.iter().all(|&v| v == 0.0) {
        tracing::warn!("rhs vector is all zeros; solution will be trivially zero");
    }

    Ok(())
}

/// Validate the caller-supplied initial guess `x`.
///
/// # Errors
///
/// Returns [`ValidationError`] on length mismatch or non-finite entries.
pub fn validate_initial_guess(x: &[f64], expected_len: usize) -> Result<(), ValidationError> {
    validate_vector("initial guess", x, expected_len)
}

// ---------------------------------------------------------------------------
// Combined solver input validation
// ---------------------------------------------------------------------------

/// Validate the complete solver input (config + matrix + `b` + `x`).
///
/// Runs [`CgConfig::validate`], [`validate_matrix`], [`validate_rhs`],
/// [`validate_initial_guess`] and, if enabled in the config,
/// [`validate_symmetric`].
///
/// # Errors
///
/// Returns [`ValidationError`] on the first failing check.
pub fn validate_system(
    matrix: &DenseMatrix,
    rhs: &[f64],
    x: &[f64],
    config: &CgConfig,
) -> Result<(), ValidationError> {
    config.validate()?;
    validate_matrix(matrix)?;
    validate_rhs(rhs, matrix.rows())?;
    validate_initial_guess(x, matrix.cols())?;

    if config.check_symmetry {
        validate_symmetric(matrix, config.symmetry_tolerance)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
