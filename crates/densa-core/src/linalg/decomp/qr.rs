//! QR decomposition via Householder reflections.
//!
//! Decomposes a matrix `A` (m x n, m >= n) into `A = QR` where:
//! - `Q` is an m x n matrix with orthonormal columns, `Q^T Q = I`
//! - `R` is n x n upper triangular
//!
//! The factorization never fails for tall or square input. A rank
//! deficient matrix is only reported when [`QrDecomposition::solve`] is
//! called.

use crate::config::DecompositionConfig;
use crate::error::{CoreError, Result};
use crate::matrix::Matrix;

/// Result of a QR decomposition via Householder reflections.
///
/// Stores the factorization `A = QR` in compact form: the Householder
/// vectors are stored in the lower trapezoid of the working matrix,
/// and the strict upper triangle of `R` above them.
#[derive(Debug, Clone)]
pub struct QrDecomposition {
    /// Working matrix: strict upper triangle holds R, columns on and below
    /// the diagonal hold the Householder vectors.
    qr: Vec<f64>,
    /// Diagonal of R stored separately (the Householder vectors
    /// overwrite the diagonal of the working matrix).
    r_diag: Vec<f64>,
    m: usize,
    n: usize,
    full_rank: bool,
}

#[allow(clippy::many_single_char_names)]
impl QrDecomposition {
    /// Perform QR decomposition on a matrix `A` (m x n, m >= n).
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// # use densa_core::linalg::decomp::QrDecomposition;
    /// let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
    /// let qr = QrDecomposition::new(&a).unwrap();
    /// let q = qr.q();
    /// // Q has orthonormal columns: Q^T Q ≈ I
    /// let qtq = q.transpose().times(&q).unwrap();
    /// let eye = Matrix::identity(2, 2);
    /// for (a, b) in qtq.as_slice().iter().zip(eye.as_slice()) {
    ///     assert!((a - b).abs() < 1e-10);
    /// }
    /// ```
    pub fn new(a: &Matrix) -> Result<Self> {
        Self::with_config(a, &DecompositionConfig::default())
    }

    /// Perform QR decomposition using explicit tolerances.
    pub fn with_config(a: &Matrix, config: &DecompositionConfig) -> Result<Self> {
        let (m, n) = a.shape();
        if m < n {
            return Err(CoreError::InvalidArgument {
                reason: "QR decomposition requires m >= n (tall or square matrix)",
            });
        }
        log::debug!("QR decomposition of {m}x{n} matrix");

        let mut qr: Vec<f64> = a.as_slice().to_vec();
        let mut r_diag = vec![0.0; n];

        for k in 0..n {
            // 2-norm of the k-th column below the diagonal, without
            // under/overflow
            let mut norm = 0.0_f64;
            for i in k..m {
                norm = norm.hypot(qr[i * n + k]);
            }

            if norm != 0.0 {
                // Choose sign to avoid cancellation
                if qr[k * n + k] < 0.0 {
                    norm = -norm;
                }

                // Form the k-th Householder vector
                for i in k..m {
                    qr[i * n + k] /= norm;
                }
                qr[k * n + k] += 1.0;

                // Apply the reflection to the remaining columns
                for j in (k + 1)..n {
                    let mut s = 0.0;
                    for i in k..m {
                        s += qr[i * n + k] * qr[i * n + j];
                    }
                    s = -s / qr[k * n + k];
                    for i in k..m {
                        let v = qr[i * n + k];
                        qr[i * n + j] += s * v;
                    }
                }
            }

            r_diag[k] = -norm;
        }

        let scale = r_diag.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
        let full_rank = r_diag
            .iter()
            .all(|&d| !config.is_negligible(d, scale, m, n));

        Ok(Self {
            qr,
            r_diag,
            m,
            n,
            full_rank,
        })
    }

    /// Whether the matrix has full column rank.
    pub fn is_full_rank(&self) -> bool {
        self.full_rank
    }

    /// The Householder vectors as the lower trapezoid of an m x n matrix.
    pub fn h(&self) -> Matrix {
        let (m, n) = (self.m, self.n);
        let mut h = Matrix::zeros(m, n);
        for i in 0..m {
            for j in 0..n.min(i + 1) {
                h[(i, j)] = self.qr[i * n + j];
            }
        }
        h
    }

    /// Extract the upper triangular factor `R` (n x n).
    pub fn r(&self) -> Matrix {
        let n = self.n;
        let mut r = Matrix::zeros(n, n);
        for i in 0..n {
            r[(i, i)] = self.r_diag[i];
            for j in (i + 1)..n {
                r[(i, j)] = self.qr[i * n + j];
            }
        }
        r
    }

    /// Build the economy-size orthogonal factor `Q` (m x n).
    pub fn q(&self) -> Matrix {
        let (m, n) = (self.m, self.n);
        let mut q = Matrix::zeros(m, n);
        let qs = q.as_mut_slice();

        // Apply Householder reflections in reverse order to the leading
        // columns of the identity
        for k in (0..n).rev() {
            qs[k * n + k] = 1.0;
            let vkk = self.qr[k * n + k];
            if vkk == 0.0 {
                continue;
            }
            for j in k..n {
                let mut s = 0.0;
                for i in k..m {
                    s += self.qr[i * n + k] * qs[i * n + j];
                }
                s = -s / vkk;
                for i in k..m {
                    qs[i * n + j] += s * self.qr[i * n + k];
                }
            }
        }

        q
    }

    /// Solve the least-squares problem `min ||AX - B||_F`.
    ///
    /// For a full-rank square system this is the exact solution of
    /// `AX = B`. `B` must have `m` rows; the result is `n x B.cols()`.
    pub fn solve(&self, b: &Matrix) -> Result<Matrix> {
        if b.rows() != self.m {
            return Err(CoreError::DimensionMismatch {
                expected: (self.m, b.cols()),
                got: b.shape(),
            });
        }
        if !self.full_rank {
            return Err(CoreError::RankDeficient);
        }

        let (m, n) = (self.m, self.n);
        let nx = b.cols();
        let mut x: Vec<f64> = b.as_slice().to_vec();

        // Compute Q^T B by applying the Householder reflections
        for k in 0..n {
            let vkk = self.qr[k * n + k];
            for j in 0..nx {
                let mut s = 0.0;
                for i in k..m {
                    s += self.qr[i * n + k] * x[i * nx + j];
                }
                s = -s / vkk;
                for i in k..m {
                    x[i * nx + j] += s * self.qr[i * n + k];
                }
            }
        }

        // Back substitution on R X = Q^T B
        for k in (0..n).rev() {
            for j in 0..nx {
                x[k * nx + j] /= self.r_diag[k];
            }
            for i in 0..k {
                let rik = self.qr[i * n + k];
                for j in 0..nx {
                    x[i * nx + j] -= x[k * nx + j] * rik;
                }
            }
        }

        // Only the first n rows are the solution
        x.truncate(n * nx);
        Ok(Matrix::from_raw_parts(x, n, nx))
    }
}

/// Solve the least-squares problem `min ||AX - B||_F` via QR decomposition.
///
/// ```
/// # use densa_core::Matrix;
/// # use densa_core::linalg::decomp;
/// // Overdetermined system: 3 equations, 2 unknowns
/// let a = Matrix::from_rows(&[[1.0, 1.0], [1.0, 2.0], [1.0, 3.0]]).unwrap();
/// let b = Matrix::from_slice(&[6.0, 5.0, 7.0], 3, 1).unwrap();
/// let x = decomp::lstsq(&a, &b).unwrap();
/// assert_eq!(x.shape(), (2, 1));
/// ```
pub fn lstsq(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    QrDecomposition::new(a)?.solve(b)
}
