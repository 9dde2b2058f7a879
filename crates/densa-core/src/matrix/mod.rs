//! Dense two-dimensional matrix of `f64` with contiguous storage.
//!
//! The [`Matrix`] type is the substrate every decomposition is built on.
//! Elements are stored in a single row-major `Vec<f64>`: element `(i, j)`
//! lives at `data[i * cols + j]`.
//!
//! # Ownership
//!
//! A matrix always owns its buffer. Construction either *adopts* a
//! caller-supplied `Vec<f64>` ([`Matrix::from_vec`], no copy, the caller
//! gives the buffer up) or *copies* borrowed data ([`Matrix::from_slice`],
//! [`Matrix::from_rows`], [`Matrix::from_column_packed`]). Because the
//! adopted buffer is moved, there is no way for the caller to keep a
//! mutable alias into it; [`Matrix::into_vec`] hands it back.

mod create;
mod indexing;
mod norms;
mod ops;

pub use indexing::IndexSet;

use core::ops::{Index, IndexMut};

use crate::error::{CoreError, Result};

/// A dense `rows x cols` matrix of `f64`, stored row-major.
///
/// Cloning performs a deep copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    // ------------------------------------------------------------------
    // Construction from raw parts
    // ------------------------------------------------------------------

    /// Adopt a row-major buffer as a `rows x cols` matrix without copying.
    ///
    /// Returns an error if `data.len() != rows * cols`.
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// let a = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
    /// assert_eq!(a.shape(), (2, 3));
    /// assert_eq!(a.get(1, 0).unwrap(), 4.0);
    /// ```
    pub fn from_vec(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(CoreError::InvalidShape {
                rows,
                cols,
                reason: "row count times column count does not match data length",
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Adopt a buffer whose length the caller has already established.
    pub(crate) fn from_raw_parts(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { data, rows, cols }
    }

    /// Copy a row-major slice into a new `rows x cols` matrix.
    pub fn from_slice(data: &[f64], rows: usize, cols: usize) -> Result<Self> {
        Self::from_vec(data.to_vec(), rows, cols)
    }

    /// Deep-copy a slice of rows into a new matrix.
    ///
    /// Every row must have the same length as the first one; a ragged
    /// input is rejected with [`CoreError::RaggedRows`].
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// assert_eq!(a.get(1, 1).unwrap(), 4.0);
    ///
    /// let ragged = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
    /// assert!(ragged.is_err());
    /// ```
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let m = rows.len();
        let n = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(m * n);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n {
                return Err(CoreError::RaggedRows {
                    row: i,
                    expected: n,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: m,
            cols: n,
        })
    }

    /// Build a matrix from a one-dimensional column-packed array.
    ///
    /// `vals` holds the columns one after another, each of length `rows`.
    /// Returns an error if `vals.len()` is not a multiple of `rows`.
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// let a = Matrix::from_column_packed(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3).unwrap();
    /// assert_eq!(a.shape(), (3, 2));
    /// assert_eq!(a.get(0, 1).unwrap(), 4.0);
    /// assert!(Matrix::from_column_packed(&[1.0, 2.0, 3.0], 2).is_err());
    /// ```
    pub fn from_column_packed(vals: &[f64], rows: usize) -> Result<Self> {
        if rows == 0 {
            return if vals.is_empty() {
                Ok(Self::zeros(0, 0))
            } else {
                Err(CoreError::InvalidShape {
                    rows,
                    cols: 0,
                    reason: "zero rows cannot hold a non-empty column-packed array",
                })
            };
        }
        if vals.len() % rows != 0 {
            return Err(CoreError::InvalidShape {
                rows,
                cols: vals.len() / rows,
                reason: "array length must be a multiple of the row count",
            });
        }
        let cols = vals.len() / rows;
        let mut data = vec![0.0; rows * cols];
        for j in 0..cols {
            for i in 0..rows {
                data[i * cols + j] = vals[j * rows + i];
            }
        }
        Ok(Self { data, rows, cols })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Whether the matrix has zero elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// A flat row-major view of all elements.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// A mutable flat row-major view of all elements.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the matrix and return the row-major buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Deep copy of the contents as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows)
            .map(|i| self.data[i * self.cols..(i + 1) * self.cols].to_vec())
            .collect()
    }

    /// Deep copy of the contents, packed row by row.
    pub fn row_packed_copy(&self) -> Vec<f64> {
        self.data.clone()
    }

    /// Deep copy of the contents, packed column by column.
    pub fn column_packed_copy(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                out.push(self.data[i * self.cols + j]);
            }
        }
        out
    }

    /// Row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.rows, "row {i} out of bounds for {} rows", self.rows);
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    // ------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------

    fn flat_index(&self, i: usize, j: usize) -> Result<usize> {
        if i >= self.rows || j >= self.cols {
            return Err(CoreError::IndexOutOfBounds {
                row: i,
                col: j,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(i * self.cols + j)
    }

    /// The element at `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        let flat = self.flat_index(i, j)?;
        Ok(self.data[flat])
    }

    /// Set the element at `(i, j)`.
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        let flat = self.flat_index(i, j)?;
        self.data[flat] = value;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Map / apply
    // ------------------------------------------------------------------

    /// Apply a function to every element, returning a new matrix.
    pub fn map<F>(&self, f: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            data: self.data.iter().map(|&x| f(x)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Apply a function to every element in place.
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        for x in &mut self.data {
            *x = f(*x);
        }
    }

    /// Combine `self` with a same-shaped `other` element by element,
    /// writing the result into `self`.
    ///
    /// Every elementwise binary operation goes through here; the
    /// allocating variants clone first.
    pub(crate) fn zip_apply_in_place<F>(&mut self, other: &Matrix, f: F) -> Result<()>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.check_same_shape(other)?;
        for (a, &b) in self.data.iter_mut().zip(other.data.iter()) {
            *a = f(*a, b);
        }
        Ok(())
    }

    /// Combine `self` with a same-shaped `other` element by element.
    pub fn zip_map<F>(&self, other: &Matrix, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        let mut out = self.clone();
        out.zip_apply_in_place(other, f)?;
        Ok(out)
    }

    pub(crate) fn check_same_shape(&self, other: &Matrix) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(CoreError::DimensionMismatch {
                expected: self.shape(),
                got: other.shape(),
            });
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols,
        );
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols,
        );
        &mut self.data[i * self.cols + j]
    }
}
