//! Matrix creation functions: zeros, constant fill, identity, random.

use rand::Rng;

use super::Matrix;

impl Matrix {
    /// Create a `rows x cols` matrix filled with zeros.
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// let z = Matrix::zeros(2, 3);
    /// assert_eq!(z.shape(), (2, 3));
    /// assert!(z.as_slice().iter().all(|&x| x == 0.0));
    /// ```
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// Create a `rows x cols` matrix filled with a constant value.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Create a `rows x cols` identity: ones on the main diagonal, zeros
    /// elsewhere. Rectangular shapes are allowed.
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// let eye = Matrix::identity(3, 4);
    /// assert_eq!(eye.get(2, 2).unwrap(), 1.0);
    /// assert_eq!(eye.get(2, 3).unwrap(), 0.0);
    /// ```
    pub fn identity(rows: usize, cols: usize) -> Self {
        let mut out = Self::zeros(rows, cols);
        for i in 0..rows.min(cols) {
            out.data[i * cols + i] = 1.0;
        }
        out
    }

    /// Create a matrix of independent uniform values in `[0, 1)` drawn
    /// from the thread-local generator.
    pub fn random(rows: usize, cols: usize) -> Self {
        Self::random_with(&mut rand::rng(), rows, cols)
    }

    /// Create a matrix of independent uniform values in `[0, 1)` drawn
    /// from `rng`.
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let r = Matrix::random_with(&mut rng, 3, 4);
    /// assert!(r.as_slice().iter().all(|x| (0.0..1.0).contains(x)));
    /// ```
    pub fn random_with<R: Rng + ?Sized>(rng: &mut R, rows: usize, cols: usize) -> Self {
        let data = (0..rows * cols).map(|_| rng.random::<f64>()).collect();
        Self { data, rows, cols }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let z = Matrix::zeros(3, 4);
        assert_eq!(z.shape(), (3, 4));
        assert!(z.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_filled() {
        let o = Matrix::filled(2, 3, 1.0);
        assert!(o.as_slice().iter().all(|&x| x == 1.0));
    }

    #[test]
    fn test_identity_rectangular() {
        let expected = Matrix::from_rows(&[
            [1., 0., 0., 0.],
            [0., 1., 0., 0.],
            [0., 0., 1., 0.],
        ])
        .unwrap();
        assert_eq!(Matrix::identity(3, 4), expected);
        assert_eq!(Matrix::identity(4, 3), expected.transpose());
    }

    #[test]
    fn test_identity_empty() {
        assert!(Matrix::identity(0, 0).is_empty());
    }

    #[test]
    fn test_random_range() {
        let r = Matrix::random(5, 7);
        assert_eq!(r.shape(), (5, 7));
        assert!(r.as_slice().iter().all(|x| (0.0..1.0).contains(x)));
    }
}
