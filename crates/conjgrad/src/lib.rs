//! Dense Conjugate Gradient solver.
//!
//! This crate solves `Ax = b` for a dense symmetric positive-definite matrix
//! `A` with the unpreconditioned Conjugate Gradient method. The caller owns
//! the solution buffer: it supplies the initial guess and receives the
//! solution in place.
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`linalg`] | dot product, norm, axpy update, matrix-vector multiply |
//! | [`types`] | [`DenseMatrix`](types::DenseMatrix), [`Direction`](types::Direction), [`SolveReport`](types::SolveReport) |
//! | [`config`] | [`CgConfig`](config::CgConfig) |
//! | [`validation`] | boundary checks run before iterating |
//! | [`cg`] | [`ConjugateGradientSolver`](cg::ConjugateGradientSolver) |
//!
//! # Example
//!
//! ```rust
//! use conjgrad::cg::ConjugateGradientSolver;
//! use conjgrad::config::CgConfig;
//! use conjgrad::types::DenseMatrix;
//!
//! let a = DenseMatrix::from_rows(vec![
//!     vec![4.0, 1.0],
//!     vec![1.0, 3.0],
//! ]).unwrap();
//! let b = [1.0, 2.0];
//! let mut x = [0.0, 0.0];
//!
//! let solver = ConjugateGradientSolver::new(CgConfig::default());
//! let report = solver.solve(&a, &b, &mut x).unwrap();
//! assert!(report.residual_norm <= 1e-10);
//! ```

pub mod cg;
pub mod config;
pub mod error;
pub mod linalg;
pub mod traits;
pub mod types;
pub mod validation;

pub use cg::{solve, ConjugateGradientSolver};
pub use config::CgConfig;
pub use error::{SolverError, ValidationError};
pub use traits::SolverEngine;
pub use types::{DenseMatrix, Direction, SolveReport};
