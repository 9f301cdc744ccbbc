//! Dense vector primitives used by the CG recurrence.
//!
//! Each operation comes in two flavours. The checked functions ([`dot`],
//! [`update`], [`matvec`]) verify operand lengths and return
//! [`ValidationError::DimensionMismatch`]; they are the public entry points.
//! The `_unchecked` functions assume lengths were validated once at the solver
//! boundary and only carry debug assertions, keeping the inner loop free of
//! redundant checks.

use crate::error::ValidationError;
use crate::types::{DenseMatrix, Direction};

// ═══════════════════════════════════════════════════════════════════════════
// Dot product
// ═══════════════════════════════════════════════════════════════════════════

/// Dot product of two equal-length vectors.
///
/// # Errors
///
/// Returns [`ValidationError::DimensionMismatch`] if `a.len() != b.len()`.
///
/// # Examples
///
/// ```
/// use conjgrad::linalg::dot;
///
/// assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap(), 32.0);
/// assert!(dot(&[1.0], &[1.0, 2.0]).is_err());
/// ```
pub fn dot(a: &[f64], b: &[f64]) -> Result<f64, ValidationError> {
    if a.len() != b.len() {
        return Err(ValidationError::length_mismatch("second operand", a.len(), b.len()));
    }
    Ok(dot_unchecked(a, b))
}

/// Dot product with 4-wide accumulation.
///
/// Splitting the sum over four accumulators shortens the dependency chain so
/// the loop pipelines well.
#[inline]
pub fn dot_unchecked(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "dot: length mismatch");

    let n = a.len().min(b.len());
    let chunks = n / 4;
    let remainder = n % 4;

    let mut acc0: f64 = 0.0;
    let mut acc1: f64 = 0.0;
    let mut acc2: f64 = 0.0;
    let mut acc3: f64 = 0.0;

    for i in 0..chunks {
        let j = i * 4;
        acc0 += a[j] * b[j];
        acc1 += a[j + 1] * b[j + 1];
        acc2 += a[j + 2] * b[j + 2];
        acc3 += a[j + 3] * b[j + 3];
    }

    let base = chunks * 4;
    for i in 0..remainder {
        acc0 += a[base + i] * b[base + i];
    }

    (acc0 + acc1) + (acc2 + acc3)
}

// ═══════════════════════════════════════════════════════════════════════════
// Norm
// ═══════════════════════════════════════════════════════════════════════════

/// Smallest sum of squares taken on the unscaled path of [`norm`].
const NORM_SQ_UNDERFLOW: f64 = 1e-280;

/// Euclidean norm `sqrt(v . v)`.
///
/// The zero vector (and the empty vector) yields exactly `0.0`. When the sum
/// of squares would overflow or underflow, the vector is rescaled by its
/// largest magnitude first, so every finite input has a finite norm.
#[inline]
pub fn norm(v: &[f64]) -> f64 {
    let sum_sq = dot_unchecked(v, v);
    if sum_sq.is_finite() && sum_sq >= NORM_SQ_UNDERFLOW {
        return sum_sq.sqrt();
    }
    if sum_sq.is_nan() {
        return sum_sq;
    }
    scaled_norm(v)
}

#[cold]
fn scaled_norm(v: &[f64]) -> f64 {
    let scale = v.iter().fold(0.0f64, |m, &x| m.max(x.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let inv = 1.0 / scale;
    let sum_sq: f64 = v.iter().map(|&x| (x * inv) * (x * inv)).sum();
    scale * sum_sq.sqrt()
}

// ═══════════════════════════════════════════════════════════════════════════
// Vector update (AXPY)
// ═══════════════════════════════════════════════════════════════════════════

/// In-place update `y[i] <- y[i] +/- alpha * x[i]`.
///
/// `direction` picks the sign so subtraction does not need a negated copy of
/// `alpha`.
///
/// # Errors
///
/// Returns [`ValidationError::DimensionMismatch`] if `y.len() != x.len()`.
///
/// # Examples
///
/// ```
/// use conjgrad::linalg::update;
/// use conjgrad::types::Direction;
///
/// let mut y = vec![5.0, 5.0];
/// update(&mut y, &[1.0, 2.0], 2.0, Direction::Subtract).unwrap();
/// assert_eq!(y, vec![3.0, 1.0]);
/// ```
pub fn update(
    y: &mut [f64],
    x: &[f64],
    alpha: f64,
    direction: Direction,
) -> Result<(), ValidationError> {
    if y.len() != x.len() {
        return Err(ValidationError::length_mismatch("update operand", y.len(), x.len()));
    }
    update_unchecked(y, x, alpha, direction);
    Ok(())
}

/// Unchecked variant of [`update`].
#[inline]
pub fn update_unchecked(y: &mut [f64], x: &[f64], alpha: f64, direction: Direction) {
    debug_assert_eq!(x.len(), y.len(), "update: length mismatch");

    let scaled = direction.sign() * alpha;
    let n = x.len().min(y.len());
    let chunks = n / 4;
    let base = chunks * 4;

    for i in 0..chunks {
        let j = i * 4;
        y[j] += scaled * x[j];
        y[j + 1] += scaled * x[j + 1];
        y[j + 2] += scaled * x[j + 2];
        y[j + 3] += scaled * x[j + 3];
    }
    for i in base..n {
        y[i] += scaled * x[i];
    }
}

/// `p[i] <- r[i] + beta * p[i]`, the CG search-direction refresh.
///
/// Each element of `p` is read before it is overwritten and `r` is never
/// written, so no temporary buffer is needed.
#[inline]
pub(crate) fn xpby_unchecked(r: &[f64], beta: f64, p: &mut [f64]) {
    debug_assert_eq!(r.len(), p.len());

    for (pi, &ri) in p.iter_mut().zip(r) {
        *pi = ri + beta * *pi;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Matrix-vector multiply
// ═══════════════════════════════════════════════════════════════════════════

/// `out = a * v`. Free-function form of [`DenseMatrix::matvec`].
///
/// # Errors
///
/// Returns [`ValidationError::DimensionMismatch`] if `v.len() != a.cols()` or
/// `out.len() != a.rows()`.
#[inline]
pub fn matvec(a: &DenseMatrix, v: &[f64], out: &mut [f64]) -> Result<(), ValidationError> {
    a.matvec(v, out)
}
