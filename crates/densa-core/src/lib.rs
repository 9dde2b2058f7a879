//! `densa-core`: dense real matrices and their decompositions.
//!
//! Provides the [`Matrix`] type and the classic factorizations of
//! numerical linear algebra: LU, QR, Cholesky, singular value and
//! eigenvalue decompositions, plus the operations derived from them
//! (solve, inverse, determinant, rank, condition number).
//!
//! # Design
//!
//! - **No native dependencies** for math. Everything is written from scratch in
//!   safe Rust.
//! - `f64` only; storage is a single row-major `Vec<f64>`.
//! - Shape and index errors are reported as [`CoreError`] immediately;
//!   numerical degeneracy (a singular or rank-deficient matrix) only when
//!   a solve needs to divide by it. The iterative decompositions always
//!   return a result.
//! - Diagnostics go through the [`log`] facade; no logger is installed.
//!
//! ```
//! use densa_core::prelude::*;
//!
//! let a = Matrix::from_rows(&[[4.0, 1.0, 1.0], [1.0, 2.0, 3.0], [1.0, 3.0, 6.0]])?;
//! let chol = a.chol();
//! assert!(chol.is_spd());
//!
//! let b = Matrix::identity(3, 3);
//! let x = chol.solve(&b)?;
//! let residual = a.times(&x)?.minus(&b)?;
//! assert!(residual.norm1() < 1e-12);
//! # Ok::<(), CoreError>(())
//! ```

pub mod config;
pub mod error;
pub mod linalg;
pub mod matrix;

// Re-export key types at crate root for convenience.
pub use config::DecompositionConfig;
pub use error::{Axis, CoreError, Result};
pub use linalg::{
    CholeskyDecomposition, EigenvalueDecomposition, LuDecomposition, QrDecomposition,
    SingularValueDecomposition,
};
pub use matrix::{IndexSet, Matrix};

/// Items intended for glob-import: `use densa_core::prelude::*;`
pub mod prelude {
    pub use crate::config::DecompositionConfig;
    pub use crate::error::{CoreError, Result};
    pub use crate::linalg::{
        CholeskyDecomposition, EigenvalueDecomposition, LuDecomposition, QrDecomposition,
        SingularValueDecomposition,
    };
    pub use crate::matrix::{IndexSet, Matrix};
}
