//! Cholesky decomposition for symmetric positive-definite matrices.
//!
//! Decomposes a symmetric positive-definite matrix `A` into `A = L L^T`
//! where `L` is lower triangular with positive diagonal entries.
//!
//! Only the lower triangle of `A` is read; symmetry is assumed. A matrix
//! that is not positive definite still produces a factor, but
//! [`CholeskyDecomposition::is_spd`] reports `false` and
//! [`CholeskyDecomposition::solve`] refuses to use it.

use crate::error::{CoreError, Result};
use crate::matrix::Matrix;

/// Result of a Cholesky decomposition.
///
/// Stores the factorization `A = L L^T` where `L` is lower triangular.
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition {
    /// Lower triangular factor stored as a flat n x n array.
    l_data: Vec<f64>,
    /// Matrix dimension.
    n: usize,
    spd: bool,
}

#[allow(clippy::many_single_char_names)]
impl CholeskyDecomposition {
    /// Compute the Cholesky decomposition of a symmetric matrix.
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// # use densa_core::linalg::decomp::CholeskyDecomposition;
    /// let a = Matrix::from_rows(&[[4.0, 2.0], [2.0, 3.0]]).unwrap();
    /// let chol = CholeskyDecomposition::new(&a);
    /// assert!(chol.is_spd());
    /// let l = chol.l();
    /// // Verify L L^T = A
    /// let prod = l.times(&l.transpose()).unwrap();
    /// assert!((prod[(0, 0)] - 4.0).abs() < 1e-10);
    /// ```
    pub fn new(a: &Matrix) -> Self {
        let n = a.rows();
        log::debug!("Cholesky decomposition of {}x{} matrix", n, a.cols());

        if !a.is_square() {
            return Self {
                l_data: vec![0.0; n * n],
                n,
                spd: false,
            };
        }

        let a_data = a.as_slice();
        let mut l = vec![0.0; n * n];
        let mut spd = true;

        for j in 0..n {
            // Row j of L, left of the diagonal
            let mut d = 0.0;
            for k in 0..j {
                let mut s = a_data[j * n + k];
                for i in 0..k {
                    s -= l[k * n + i] * l[j * n + i];
                }
                s /= l[k * n + k];
                l[j * n + k] = s;
                d += s * s;
            }

            // Diagonal element
            d = a_data[j * n + j] - d;
            spd &= d > 0.0;
            l[j * n + j] = d.max(0.0).sqrt();
        }

        if !spd {
            log::debug!("Cholesky: matrix is not positive definite");
        }

        Self { l_data: l, n, spd }
    }

    /// Whether the matrix is symmetric positive definite (as far as the
    /// lower triangle shows).
    pub fn is_spd(&self) -> bool {
        self.spd
    }

    /// Extract the lower triangular factor `L`.
    pub fn l(&self) -> Matrix {
        Matrix::from_raw_parts(self.l_data.clone(), self.n, self.n)
    }

    /// Solve `A X = B` using the Cholesky factorization.
    ///
    /// Since `A = L L^T`, solves `L Y = B` (forward) then `L^T X = Y`
    /// (backward).
    pub fn solve(&self, b: &Matrix) -> Result<Matrix> {
        if b.rows() != self.n {
            return Err(CoreError::DimensionMismatch {
                expected: (self.n, b.cols()),
                got: b.shape(),
            });
        }
        if !self.spd {
            return Err(CoreError::NotPositiveDefinite);
        }

        let n = self.n;
        let nx = b.cols();
        let mut x = b.clone();
        let xs = x.as_mut_slice();
        let l = &self.l_data;

        // Forward substitution: L Y = B
        for k in 0..n {
            for j in 0..nx {
                for i in 0..k {
                    xs[k * nx + j] -= xs[i * nx + j] * l[k * n + i];
                }
                xs[k * nx + j] /= l[k * n + k];
            }
        }

        // Back substitution: L^T X = Y
        for k in (0..n).rev() {
            for j in 0..nx {
                for i in (k + 1)..n {
                    xs[k * nx + j] -= xs[i * nx + j] * l[i * n + k];
                }
                xs[k * nx + j] /= l[k * n + k];
            }
        }

        Ok(x)
    }

    /// Compute the inverse using the Cholesky factorization.
    pub fn inverse(&self) -> Result<Matrix> {
        self.solve(&Matrix::identity(self.n, self.n))
    }

    /// Compute the log-determinant (useful for avoiding overflow).
    ///
    /// `log(det(A)) = 2 * sum(log(diag(L)))`
    pub fn log_det(&self) -> f64 {
        let n = self.n;
        let sum: f64 = (0..n).map(|i| self.l_data[i * n + i].ln()).sum();
        2.0 * sum
    }
}
