//! Shared test helpers for the conjgrad integration test suite.
//!
//! Provides deterministic random matrix generators, a dense reference solver,
//! and floating-point comparison utilities used across all test modules.

#![allow(dead_code)]

use conjgrad::types::DenseMatrix;

// ---------------------------------------------------------------------------
// Random number generator (simple LCG for deterministic reproducibility)
// ---------------------------------------------------------------------------

/// A minimal linear congruential generator for deterministic test data.
///
/// Uses the Knuth MMIX LCG parameters. Not cryptographically secure, but
/// adequate for generating reproducible test matrices.
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Uniform f64 in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 in [lo, hi).
    pub fn next_f64_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

// ---------------------------------------------------------------------------
// Matrix generators
// ---------------------------------------------------------------------------

/// Random SPD matrix `A = M^T M + shift * I` with `M` uniform in [-1, 1).
///
/// `M^T M` is positive semi-definite and the diagonal shift makes every
/// eigenvalue at least `shift`.
pub fn random_spd(n: usize, shift: f64, seed: u64) -> DenseMatrix {
    let mut rng = Lcg::new(seed);
    let m: Vec<f64> = (0..n * n).map(|_| rng.next_f64_range(-1.0, 1.0)).collect();

    let mut a = vec![0.0f64; n * n];
    for i in 0..n {
        for j in i..n {
            let mut sum = 0.0;
            for k in 0..n {
                sum += m[k * n + i] * m[k * n + j];
            }
            a[i * n + j] = sum;
            a[j * n + i] = sum;
        }
        a[i * n + i] += shift;
    }

    DenseMatrix::from_row_major(n, n, a).unwrap()
}

/// Symmetric tridiagonal SPD matrix with `diag` on the diagonal and `off` on
/// the first sub- and super-diagonal. SPD whenever `diag > 2 * |off|`.
pub fn tridiagonal(n: usize, diag: f64, off: f64) -> DenseMatrix {
    let rows = (0..n)
        .map(|i| {
            let mut row = vec![0.0f64; n];
            row[i] = diag;
            if i > 0 {
                row[i - 1] = off;
            }
            if i + 1 < n {
                row[i + 1] = off;
            }
            row
        })
        .collect();
    DenseMatrix::from_rows(rows).unwrap()
}

/// Deterministic random vector of length `n` with entries in [-1, 1).
pub fn random_vector(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = Lcg::new(seed);
    (0..n).map(|_| rng.next_f64_range(-1.0, 1.0)).collect()
}

// ---------------------------------------------------------------------------
// Dense reference solver
// ---------------------------------------------------------------------------

/// Solve `Ax = b` using Gaussian elimination with partial pivoting.
///
/// O(n^3) reference solver used only for small test problems.
///
/// # Panics
///
/// Panics if the matrix is singular or dimensions are inconsistent.
pub fn dense_solve(matrix: &DenseMatrix, rhs: &[f64]) -> Vec<f64> {
    let n = matrix.rows();
    assert_eq!(n, matrix.cols(), "dense_solve requires a square matrix");
    assert_eq!(rhs.len(), n, "rhs length must match matrix dimension");

    // Augmented matrix [A | b].
    let mut aug: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let mut row = matrix.row(i).to_vec();
            row.push(rhs[i]);
            row
        })
        .collect();

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = aug[col][col].abs();
        for row in (col + 1)..n {
            if aug[row][col].abs() > max_val {
                max_val = aug[row][col].abs();
                max_row = row;
            }
        }
        assert!(max_val > 1e-15, "matrix is singular or near-singular");
        aug.swap(col, max_row);

        let pivot = aug[col][col];
        for row in (col + 1)..n {
            let factor = aug[row][col] / pivot;
            for j in col..=n {
                aug[row][j] -= factor * aug[col][j];
            }
        }
    }

    let mut x = vec![0.0f64; n];
    for i in (0..n).rev() {
        let mut sum = aug[i][n];
        for j in (i + 1)..n {
            sum -= aug[i][j] * x[j];
        }
        x[i] = sum / aug[i][i];
    }

    x
}

// ---------------------------------------------------------------------------
// Floating-point comparison utilities
// ---------------------------------------------------------------------------

/// L2 norm, computed independently of the crate's own `norm`.
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|&x| x * x).sum::<f64>().sqrt()
}

/// L2 distance between two vectors.
pub fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "vectors must have same length");
    a.iter()
        .zip(b.iter())
        .map(|(&ai, &bi)| (ai - bi) * (ai - bi))
        .sum::<f64>()
        .sqrt()
}

/// Relative error `||approx - exact|| / ||exact||`, or the absolute error
/// when `exact` is zero.
pub fn relative_error(approx: &[f64], exact: &[f64]) -> f64 {
    let exact_norm = l2_norm(exact);
    let error = l2_distance(approx, exact);
    if exact_norm > 1e-15 {
        error / exact_norm
    } else {
        error
    }
}

/// True residual `b - A*x`, recomputed from scratch with a naive loop.
pub fn compute_residual(matrix: &DenseMatrix, x: &[f64], rhs: &[f64]) -> Vec<f64> {
    (0..matrix.rows())
        .map(|i| {
            let ax_i: f64 = matrix.row(i).iter().zip(x).map(|(a, x)| a * x).sum();
            rhs[i] - ax_i
        })
        .collect()
}
