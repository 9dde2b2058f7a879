//! Matrix norms and trace.

use super::Matrix;

impl Matrix {
    /// One norm: maximum absolute column sum.
    pub fn norm1(&self) -> f64 {
        (0..self.cols)
            .map(|j| (0..self.rows).map(|i| self.data[i * self.cols + j].abs()).sum::<f64>())
            .fold(0.0, f64::max)
    }

    /// Infinity norm: maximum absolute row sum.
    pub fn norm_inf(&self) -> f64 {
        (0..self.rows)
            .map(|i| self.row(i).iter().map(|x| x.abs()).sum::<f64>())
            .fold(0.0, f64::max)
    }

    /// Frobenius norm: square root of the sum of squares of all elements.
    ///
    /// Accumulated with `hypot`, so it neither overflows nor underflows
    /// for representable results.
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// let a = Matrix::from_rows(&[[3.0, 0.0], [0.0, 4.0]]).unwrap();
    /// assert!((a.norm_f() - 5.0).abs() < 1e-15);
    /// ```
    pub fn norm_f(&self) -> f64 {
        self.data.iter().fold(0.0, |acc, &x| acc.hypot(x))
    }

    /// Sum of the diagonal elements. Defined for any shape: sums the first
    /// `min(rows, cols)` diagonal entries.
    pub fn trace(&self) -> f64 {
        (0..self.rows.min(self.cols))
            .map(|i| self.data[i * self.cols + i])
            .sum()
    }
}
