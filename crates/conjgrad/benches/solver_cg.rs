//! Benchmarks for the dense Conjugate Gradient solver.
//!
//! Measures end-to-end solve scaling with dimension and the cost of the
//! matrix-vector product that dominates each iteration.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use conjgrad::cg::ConjugateGradientSolver;
use conjgrad::config::CgConfig;
use conjgrad::types::DenseMatrix;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a dense symmetric positive-definite matrix.
///
/// Off-diagonal entries are random in [-0.3, 0.3) and mirrored; the diagonal
/// is set to `sum_j |a_ij| + 1`, so the matrix is strictly diagonally
/// dominant and therefore SPD.
fn spd_dense_matrix(n: usize, seed: u64) -> DenseMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0.0f64; n * n];

    for i in 0..n {
        for j in (i + 1)..n {
            let val: f64 = rng.gen_range(-0.3..0.3);
            data[i * n + j] = val;
            data[j * n + i] = val;
        }
    }
    for i in 0..n {
        let off: f64 = (0..n)
            .filter(|&j| j != i)
            .map(|j| data[i * n + j].abs())
            .sum();
        data[i * n + i] = off + 1.0;
    }

    DenseMatrix::from_row_major(n, n, data).expect("n * n buffer")
}

/// Random vector with deterministic seed.
fn random_vector(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

// ---------------------------------------------------------------------------
// Benchmark: CG scaling with problem size
// ---------------------------------------------------------------------------

fn cg_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("cg_scaling");
    group.warm_up_time(Duration::from_secs(3));

    let solver = ConjugateGradientSolver::new(CgConfig::default().with_tolerance(1e-8));

    for &n in &[16, 128, 512, 1024] {
        let matrix = spd_dense_matrix(n, 42);
        let rhs = random_vector(n, 43);

        group.sample_size(if n >= 1024 { 20 } else { 100 });
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_with_input(BenchmarkId::new("n", n), &n, |b, _| {
            b.iter(|| {
                let mut x = vec![0.0f64; n];
                solver
                    .solve(
                        criterion::black_box(&matrix),
                        criterion::black_box(&rhs),
                        &mut x,
                    )
                    .expect("SPD system converges");
                x
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: matrix-vector product
// ---------------------------------------------------------------------------

fn matvec(c: &mut Criterion) {
    let mut group = c.benchmark_group("matvec");

    for &n in &[128, 512, 2048] {
        let matrix = spd_dense_matrix(n, 7);
        let v = random_vector(n, 8);
        let mut out = vec![0.0f64; n];

        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_with_input(BenchmarkId::new("n", n), &n, |b, _| {
            b.iter(|| {
                matrix.matvec_unchecked(criterion::black_box(&v), &mut out);
            });
        });
    }
    group.finish();
}

criterion_group!(cg, cg_scaling, matvec);
criterion_main!(cg);
