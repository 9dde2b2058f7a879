//! Linear algebra on [`Matrix`].
//!
//! All routines are implemented from scratch, with no external BLAS/LAPACK
//! bindings. The decompositions live in [`decomp`]; this module adds the
//! operations derived from them as methods on [`Matrix`], plus free
//! function forms of the most common ones.
//!
//! | Operation           | Computed with                      |
//! |---------------------|------------------------------------|
//! | `det`               | [`LuDecomposition`]                |
//! | `solve`, `inverse`  | LU if square, [`QrDecomposition`] otherwise |
//! | `rank`, `cond`, `norm2` | [`SingularValueDecomposition`] |

pub mod decomp;

pub use decomp::CholeskyDecomposition;
pub use decomp::EigenvalueDecomposition;
pub use decomp::LuDecomposition;
pub use decomp::QrDecomposition;
pub use decomp::SingularValueDecomposition;
pub use decomp::lstsq;

use crate::error::Result;
use crate::matrix::Matrix;

impl Matrix {
    /// LU decomposition with partial pivoting.
    pub fn lu(&self) -> LuDecomposition {
        LuDecomposition::new(self)
    }

    /// Householder QR decomposition. Fails for wide matrices.
    pub fn qr(&self) -> Result<QrDecomposition> {
        QrDecomposition::new(self)
    }

    /// Cholesky decomposition.
    pub fn chol(&self) -> CholeskyDecomposition {
        CholeskyDecomposition::new(self)
    }

    /// Singular value decomposition.
    pub fn svd(&self) -> SingularValueDecomposition {
        SingularValueDecomposition::new(self)
    }

    /// Eigenvalue decomposition. Fails for non-square matrices.
    pub fn eig(&self) -> Result<EigenvalueDecomposition> {
        EigenvalueDecomposition::new(self)
    }

    /// Determinant, via LU.
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// let a = Matrix::from_rows(&[[2.0, 1.0], [1.0, 4.0]]).unwrap();
    /// assert!((a.det().unwrap() - 7.0).abs() < 1e-10);
    /// ```
    pub fn det(&self) -> Result<f64> {
        self.lu().det()
    }

    /// Effective numerical rank, via SVD.
    pub fn rank(&self) -> usize {
        self.svd().rank()
    }

    /// Two-norm condition number: ratio of the largest to the smallest
    /// singular value.
    pub fn cond(&self) -> f64 {
        self.svd().cond()
    }

    /// Two-norm: the largest singular value.
    pub fn norm2(&self) -> f64 {
        self.svd().norm2()
    }

    /// Solve `A X = B`: the exact solution when `A` is square, the least
    /// squares solution otherwise.
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// let a = Matrix::from_rows(&[[5.0, 8.0], [6.0, 9.0]]).unwrap();
    /// let b = Matrix::from_rows(&[[13.0], [15.0]]).unwrap();
    /// let x = a.solve(&b).unwrap();
    /// assert!((x[(0, 0)] - 1.0).abs() < 1e-12);
    /// assert!((x[(1, 0)] - 1.0).abs() < 1e-12);
    /// ```
    pub fn solve(&self, b: &Matrix) -> Result<Matrix> {
        if self.is_square() {
            self.lu().solve(b)
        } else {
            self.qr()?.solve(b)
        }
    }

    /// Solve `X A = B`, which is also `A^T X^T = B^T`.
    pub fn solve_transpose(&self, b: &Matrix) -> Result<Matrix> {
        self.transpose().solve(&b.transpose())
    }

    /// Inverse, or pseudo-inverse for a tall matrix of full column rank.
    pub fn inverse(&self) -> Result<Matrix> {
        self.solve(&Matrix::identity(self.rows(), self.rows()))
    }
}

/// Solve `AX = B`; see [`Matrix::solve`].
///
/// ```
/// # use densa_core::{linalg, Matrix};
/// let a = Matrix::from_rows(&[[2.0, 1.0], [1.0, 4.0]]).unwrap();
/// let b = Matrix::from_slice(&[5.0, 6.0], 2, 1).unwrap();
/// let x = linalg::solve(&a, &b).unwrap();
/// assert!((x[(0, 0)] - 2.0).abs() < 1e-10);
/// assert!((x[(1, 0)] - 1.0).abs() < 1e-10);
/// ```
pub fn solve(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    a.solve(b)
}

/// Compute the inverse of a matrix; see [`Matrix::inverse`].
///
/// Returns [`CoreError::SingularMatrix`](crate::CoreError::SingularMatrix)
/// if a square matrix is singular.
///
/// ```
/// # use densa_core::{linalg, Matrix};
/// let a = Matrix::from_rows(&[[2.0, 1.0], [1.0, 4.0]]).unwrap();
/// let inv = linalg::inv(&a).unwrap();
/// // A * A^-1 ≈ I
/// let eye = a.times(&inv).unwrap();
/// assert!((eye[(0, 0)] - 1.0).abs() < 1e-10);
/// ```
pub fn inv(a: &Matrix) -> Result<Matrix> {
    a.inverse()
}

/// Compute the determinant of a square matrix; see [`Matrix::det`].
pub fn det(a: &Matrix) -> Result<f64> {
    a.det()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn approx_eq(a: &[f64], b: &[f64], tol: f64) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| (x - y).abs() < tol)
    }

    fn columnwise() -> Vec<f64> {
        (1..=12).map(f64::from).collect()
    }

    #[test]
    fn test_det_singular() {
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]).unwrap();
        assert!(a.det().unwrap().abs() < 1e-12);
        assert!(det(&a).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_rank_and_norm2() {
        let b = Matrix::from_column_packed(&columnwise(), 3).unwrap();
        assert_eq!(b.rank(), 2);
        let s = b.svd().singular_values().to_vec();
        assert_eq!(b.norm2(), s[0]);
    }

    #[test]
    fn test_cond() {
        let a = Matrix::from_rows(&[[1.0, 3.0], [7.0, 9.0]]).unwrap();
        let s = a.svd().singular_values().to_vec();
        assert!((a.cond() - s[0] / s[1]).abs() < 1e-12);
    }

    #[test]
    fn test_solve_square_and_tall() {
        let a = Matrix::from_rows(&[[5.0, 8.0], [6.0, 9.0]]).unwrap();
        let b = Matrix::from_rows(&[[13.0], [15.0]]).unwrap();
        let x = solve(&a, &b).unwrap();
        assert!(approx_eq(x.as_slice(), &[1.0, 1.0], 1e-12));

        let tall = Matrix::from_rows(&[[1.0, 1.0], [1.0, 2.0], [1.0, 3.0]]).unwrap();
        let rhs = Matrix::from_slice(&[6.0, 5.0, 7.0], 3, 1).unwrap();
        let x = tall.solve(&rhs).unwrap();
        assert!(approx_eq(x.as_slice(), &[5.0, 0.5], 1e-10));
    }

    #[test]
    fn test_solve_wide_rejected() {
        let wide = Matrix::zeros(2, 3);
        assert!(matches!(
            wide.solve(&Matrix::zeros(2, 1)),
            Err(CoreError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_solve_transpose() {
        let sq = Matrix::from_rows(&[[2.0, 1.0], [1.0, 4.0]]).unwrap();
        let y_true = Matrix::from_rows(&[[1.0, -1.0]]).unwrap();
        let b = y_true.times(&sq).unwrap();
        let y = sq.solve_transpose(&b).unwrap();
        assert!(approx_eq(y.as_slice(), y_true.as_slice(), 1e-12));

        // Wide A: A^T is tall and the system X A = B is consistent
        let wide = Matrix::from_rows(&[[2.0, 1.0, 0.0], [1.0, 4.0, 1.0]]).unwrap();
        let b = y_true.times(&wide).unwrap();
        let y = wide.solve_transpose(&b).unwrap();
        assert!(approx_eq(y.as_slice(), y_true.as_slice(), 1e-12));
    }

    #[test]
    fn test_inverse() {
        let mut a = Matrix::from_column_packed(&columnwise(), 4)
            .unwrap()
            .submatrix(0..3, 0..3)
            .unwrap();
        a.set(0, 0, 0.0).unwrap();
        let inv = inv(&a).unwrap();
        let eye = a.times(&inv).unwrap();
        assert!(approx_eq(eye.as_slice(), Matrix::identity(3, 3).as_slice(), 1e-10));
    }

    #[test]
    fn test_inverse_singular() {
        let a = Matrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]]).unwrap();
        assert_eq!(a.inverse(), Err(CoreError::SingularMatrix));
    }

    #[test]
    fn test_pseudo_inverse_of_tall() {
        let a = Matrix::from_rows(&[[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]).unwrap();
        let pinv = a.inverse().unwrap();
        assert_eq!(pinv.shape(), (2, 3));
        let eye = pinv.times(&a).unwrap();
        assert!(approx_eq(eye.as_slice(), Matrix::identity(2, 2).as_slice(), 1e-12));
    }
}
