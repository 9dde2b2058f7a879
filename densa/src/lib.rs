//! # Densa
//!
//! Dense real-matrix linear algebra in pure Rust.
//!
//! One `use densa::prelude::*;` gives you the [`Matrix`](densa_core::Matrix)
//! type together with the LU, QR, Cholesky, singular value and eigenvalue
//! decompositions.
//!
//! ## Feature Flags
//!
//! | Feature | Enables |
//! |---------|---------|
//! | `core` *(default)* | Matrices, decompositions, derived operations |
//!
//! ```
//! use densa::prelude::*;
//!
//! let a = Matrix::from_rows(&[[2.0, 1.0], [1.0, 4.0]]).unwrap();
//! assert!((a.det().unwrap() - 7.0).abs() < 1e-12);
//! ```

pub use densa_core as core;

/// Glob-import convenience: `use densa::prelude::*;`
pub mod prelude {
    pub use densa_core::prelude::*;
}
