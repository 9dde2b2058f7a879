//! LU decomposition with partial pivoting.
//!
//! Decomposes an `m x n` matrix `A` into `PA = LU` where:
//! - `P` is a row permutation (stored as a pivot vector)
//! - `L` is `m x min(m, n)` unit lower trapezoidal
//! - `U` is `min(m, n) x n` upper trapezoidal
//!
//! The factorization always completes, even for singular input;
//! singularity is only reported when [`LuDecomposition::solve`] needs to
//! divide by a pivot.

use crate::config::DecompositionConfig;
use crate::error::{CoreError, Result};
use crate::matrix::Matrix;

/// Result of an LU decomposition with partial pivoting.
///
/// Stores the factorization `PA = LU` in compact form: `L` and `U` are
/// packed into a single matrix (the unit diagonal of `L` is implicit),
/// and the permutation is stored as a pivot index vector.
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    /// Packed LU matrix: lower triangle holds L (without diagonal),
    /// upper triangle (including diagonal) holds U.
    lu: Vec<f64>,
    /// `pivots[i]` is the row of the original matrix now at row `i`.
    pivots: Vec<usize>,
    m: usize,
    n: usize,
    /// Sign of the permutation (+1 or -1), for determinant computation.
    sign: f64,
    nonsingular: bool,
}

impl LuDecomposition {
    /// Perform LU decomposition with partial pivoting.
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// # use densa_core::linalg::decomp::LuDecomposition;
    /// let a = Matrix::from_rows(&[[2.0, 1.0], [1.0, 4.0]]).unwrap();
    /// let lu = LuDecomposition::new(&a);
    /// assert!((lu.det().unwrap() - 7.0).abs() < 1e-10);
    /// ```
    pub fn new(a: &Matrix) -> Self {
        Self::with_config(a, &DecompositionConfig::default())
    }

    /// Perform LU decomposition using explicit tolerances.
    pub fn with_config(a: &Matrix, config: &DecompositionConfig) -> Self {
        let (m, n) = a.shape();
        log::debug!("LU decomposition of {m}x{n} matrix");

        let mut lu: Vec<f64> = a.as_slice().to_vec();
        let mut pivots: Vec<usize> = (0..m).collect();
        let mut sign = 1.0;

        for k in 0..m.min(n) {
            // Find pivot: row with largest |lu[i, k]| for i >= k
            let mut max_val = lu[k * n + k].abs();
            let mut max_row = k;
            for i in (k + 1)..m {
                let val = lu[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_row != k {
                for j in 0..n {
                    lu.swap(k * n + j, max_row * n + j);
                }
                pivots.swap(k, max_row);
                sign = -sign;
            }

            let pivot = lu[k * n + k];
            if pivot == 0.0 {
                // Nothing to eliminate against; column is already zero below.
                continue;
            }

            for i in (k + 1)..m {
                let factor = lu[i * n + k] / pivot;
                lu[i * n + k] = factor; // Store L factor

                for j in (k + 1)..n {
                    let ukj = lu[k * n + j];
                    lu[i * n + j] -= factor * ukj;
                }
            }
        }

        let scale = a.as_slice().iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
        let nonsingular =
            m >= n && (0..n).all(|j| !config.is_negligible(lu[j * n + j], scale, m, n));

        Self {
            lu,
            pivots,
            m,
            n,
            sign,
            nonsingular,
        }
    }

    /// Whether `U`, and hence `A`, is nonsingular.
    ///
    /// Always `false` for wide matrices (`m < n`).
    pub fn is_nonsingular(&self) -> bool {
        self.nonsingular
    }

    /// The unit lower trapezoidal factor `L` (`m x min(m, n)`).
    pub fn l(&self) -> Matrix {
        let (m, n) = (self.m, self.n);
        let k = m.min(n);
        let mut l = Matrix::zeros(m, k);
        for i in 0..m {
            for j in 0..k.min(i + 1) {
                l[(i, j)] = if i == j { 1.0 } else { self.lu[i * n + j] };
            }
        }
        l
    }

    /// The upper trapezoidal factor `U` (`min(m, n) x n`).
    pub fn u(&self) -> Matrix {
        let n = self.n;
        let k = self.m.min(n);
        let mut u = Matrix::zeros(k, n);
        for i in 0..k {
            for j in i..n {
                u[(i, j)] = self.lu[i * n + j];
            }
        }
        u
    }

    /// The permutation pivot vector: row `i` of `PA` is row `pivot()[i]`
    /// of `A`.
    pub fn pivot(&self) -> &[usize] {
        &self.pivots
    }

    /// The pivot vector as floating-point values.
    pub fn double_pivot(&self) -> Vec<f64> {
        self.pivots.iter().map(|&p| p as f64).collect()
    }

    /// The permutation matrix `P` (`m x m`).
    pub fn p(&self) -> Matrix {
        let m = self.m;
        let mut p = Matrix::zeros(m, m);
        for (i, &pi) in self.pivots.iter().enumerate() {
            p[(i, pi)] = 1.0;
        }
        p
    }

    /// Compute the determinant from the LU factorization.
    ///
    /// `det(A) = sign * product(diag(U))`. Only defined for square input.
    pub fn det(&self) -> Result<f64> {
        if self.m != self.n {
            return Err(CoreError::NotSquare {
                op: "det",
                rows: self.m,
                cols: self.n,
            });
        }
        let n = self.n;
        Ok((0..n).fold(self.sign, |d, i| d * self.lu[i * n + i]))
    }

    /// Solve `A X = B` using the precomputed factorization.
    ///
    /// `B` must have `m` rows; the result is `n x B.cols()`.
    pub fn solve(&self, b: &Matrix) -> Result<Matrix> {
        if b.rows() != self.m {
            return Err(CoreError::DimensionMismatch {
                expected: (self.m, b.cols()),
                got: b.shape(),
            });
        }
        if !self.nonsingular {
            return Err(CoreError::SingularMatrix);
        }

        let n = self.n;
        let nx = b.cols();

        // Apply permutation: PB, keeping only the rows that take part
        let mut x = b.submatrix(&self.pivots[..n], 0..nx)?;
        let xs = x.as_mut_slice();

        // Forward substitution: L Y = PB
        for k in 0..n {
            for i in (k + 1)..n {
                let lik = self.lu[i * n + k];
                for j in 0..nx {
                    xs[i * nx + j] -= xs[k * nx + j] * lik;
                }
            }
        }

        // Back substitution: U X = Y
        for k in (0..n).rev() {
            let ukk = self.lu[k * n + k];
            for j in 0..nx {
                xs[k * nx + j] /= ukk;
            }
            for i in 0..k {
                let uik = self.lu[i * n + k];
                for j in 0..nx {
                    xs[i * nx + j] -= xs[k * nx + j] * uik;
                }
            }
        }

        Ok(x)
    }

    /// Compute the inverse matrix using the LU factorization.
    ///
    /// Solves `AX = I`.
    pub fn inverse(&self) -> Result<Matrix> {
        self.solve(&Matrix::identity(self.m, self.m))
    }
}
