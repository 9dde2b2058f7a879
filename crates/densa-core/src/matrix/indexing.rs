//! Submatrix selection by contiguous ranges or explicit index arrays.
//!
//! Rows and columns are each selected by an [`IndexSet`]: `i0..i1`,
//! `i0..=i1`, or a list of indices (`&[usize]`, `&Vec<usize>`,
//! `&[usize; N]`). All four range/array combinations go through the same
//! bounds-checking routine.

use core::ops::{Range, RangeInclusive};

use crate::error::{Axis, CoreError, Result};

use super::Matrix;

/// An ordered selection of row or column indices.
pub trait IndexSet {
    /// Number of selected indices, or an error for a malformed selection
    /// such as a reversed range.
    fn selection_len(&self) -> Result<usize>;

    /// The `k`-th selected index, for `k < selection_len()`.
    fn selected(&self, k: usize) -> usize;
}

impl IndexSet for Range<usize> {
    fn selection_len(&self) -> Result<usize> {
        if self.end < self.start {
            return Err(CoreError::ReversedRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(self.end - self.start)
    }

    fn selected(&self, k: usize) -> usize {
        self.start + k
    }
}

impl IndexSet for RangeInclusive<usize> {
    fn selection_len(&self) -> Result<usize> {
        if self.end() < self.start() {
            return Err(CoreError::ReversedRange {
                start: *self.start(),
                end: *self.end(),
            });
        }
        Ok(self.end() - self.start() + 1)
    }

    fn selected(&self, k: usize) -> usize {
        self.start() + k
    }
}

impl IndexSet for [usize] {
    fn selection_len(&self) -> Result<usize> {
        Ok(self.len())
    }

    fn selected(&self, k: usize) -> usize {
        self[k]
    }
}

impl<const N: usize> IndexSet for [usize; N] {
    fn selection_len(&self) -> Result<usize> {
        Ok(N)
    }

    fn selected(&self, k: usize) -> usize {
        self[k]
    }
}

impl IndexSet for Vec<usize> {
    fn selection_len(&self) -> Result<usize> {
        Ok(self.len())
    }

    fn selected(&self, k: usize) -> usize {
        self[k]
    }
}

impl<S: IndexSet + ?Sized> IndexSet for &S {
    fn selection_len(&self) -> Result<usize> {
        (**self).selection_len()
    }

    fn selected(&self, k: usize) -> usize {
        (**self).selected(k)
    }
}

/// Validate every index of `set` against `extent` and return a lazy
/// iterator over them.
fn checked_indices<S: IndexSet>(
    set: &S,
    axis: Axis,
    extent: usize,
) -> Result<impl Iterator<Item = usize> + Clone + '_> {
    let len = set.selection_len()?;
    let indices = (0..len).map(move |k| set.selected(k));
    if let Some(index) = indices.clone().find(|&i| i >= extent) {
        return Err(CoreError::AxisOutOfBounds {
            axis,
            index,
            extent,
        });
    }
    Ok(indices)
}

impl Matrix {
    /// Extract the submatrix formed by the selected rows and columns.
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// let b = Matrix::from_rows(&[
    ///     [1.0, 4.0, 7.0, 10.0],
    ///     [2.0, 5.0, 8.0, 11.0],
    ///     [3.0, 6.0, 9.0, 12.0],
    /// ]).unwrap();
    /// let sub = Matrix::from_rows(&[[5.0, 8.0, 11.0], [6.0, 9.0, 12.0]]).unwrap();
    ///
    /// assert_eq!(b.submatrix(1..=2, 1..=3).unwrap(), sub);
    /// assert_eq!(b.submatrix(&[1usize, 2], &[1usize, 2, 3]).unwrap(), sub);
    /// assert!(b.submatrix(&[1usize, 3], 1..=3).is_err());
    /// ```
    pub fn submatrix<R: IndexSet, C: IndexSet>(&self, rows: R, cols: C) -> Result<Matrix> {
        let row_idx = checked_indices(&rows, Axis::Row, self.rows)?;
        let col_idx = checked_indices(&cols, Axis::Column, self.cols)?;

        let out_cols = cols.selection_len()?;
        let mut data = Vec::with_capacity(rows.selection_len()? * out_cols);
        let mut out_rows = 0;
        for i in row_idx {
            let row = self.row(i);
            data.extend(col_idx.clone().map(|j| row[j]));
            out_rows += 1;
        }
        Matrix::from_vec(data, out_rows, out_cols)
    }

    /// Overwrite the selected rows and columns with the contents of
    /// `source`, which must have exactly the selected shape.
    pub fn set_submatrix<R: IndexSet, C: IndexSet>(
        &mut self,
        rows: R,
        cols: C,
        source: &Matrix,
    ) -> Result<()> {
        let row_idx = checked_indices(&rows, Axis::Row, self.rows)?;
        let col_idx = checked_indices(&cols, Axis::Column, self.cols)?;

        let selected = (rows.selection_len()?, cols.selection_len()?);
        if selected != source.shape() {
            return Err(CoreError::DimensionMismatch {
                expected: selected,
                got: source.shape(),
            });
        }

        let n = self.cols;
        for (src_row, i) in row_idx.enumerate() {
            for (src_col, j) in col_idx.clone().enumerate() {
                self.data[i * n + j] = source.data[src_row * source.cols + src_col];
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    const IB: usize = 1;
    const IE: usize = 2;
    const JB: usize = 1;
    const JE: usize = 3;

    fn b() -> Matrix {
        Matrix::from_rows(&[[1., 4., 7., 10.], [2., 5., 8., 11.], [3., 6., 9., 12.]]).unwrap()
    }

    fn sub() -> Matrix {
        Matrix::from_rows(&[[5., 8., 11.], [6., 9., 12.]]).unwrap()
    }

    const ROW_SET: [usize; 2] = [1, 2];
    const COL_SET: [usize; 3] = [1, 2, 3];
    const BAD_ROW_SET: [usize; 2] = [1, 3];
    const BAD_COL_SET: [usize; 3] = [1, 2, 4];

    #[test]
    fn test_submatrix_range_range() {
        assert_eq!(b().submatrix(IB..=IE, JB..=JE).unwrap(), sub());
        assert_eq!(b().submatrix(IB..IE + 1, JB..JE + 1).unwrap(), sub());
    }

    #[test]
    fn test_submatrix_range_range_out_of_bounds() {
        let b = b();
        assert!(b.submatrix(IB..=IE + b.rows() + 1, JB..=JE).is_err());
        assert_eq!(
            b.submatrix(IB..=IE, JB..=JE + b.cols() + 1),
            Err(CoreError::AxisOutOfBounds {
                axis: Axis::Column,
                index: 4,
                extent: 4
            })
        );
    }

    #[test]
    fn test_submatrix_range_set() {
        let b = b();
        assert_eq!(b.submatrix(IB..=IE, &COL_SET).unwrap(), sub());
        assert!(b.submatrix(IB..=IE, &BAD_COL_SET).is_err());
        assert!(b.submatrix(IB..=IE + b.rows() + 1, &COL_SET).is_err());
    }

    #[test]
    fn test_submatrix_set_range() {
        let b = b();
        assert_eq!(b.submatrix(&ROW_SET, JB..=JE).unwrap(), sub());
        assert!(b.submatrix(&BAD_ROW_SET, JB..=JE).is_err());
        assert!(b.submatrix(&ROW_SET, JB..=JE + b.cols() + 1).is_err());
    }

    #[test]
    fn test_submatrix_set_set() {
        let b = b();
        assert_eq!(b.submatrix(&ROW_SET, &COL_SET).unwrap(), sub());
        assert!(b.submatrix(&BAD_ROW_SET, &COL_SET).is_err());
        assert!(b.submatrix(&ROW_SET, &BAD_COL_SET).is_err());
    }

    #[test]
    fn test_submatrix_vec_and_slice() {
        let rows: Vec<usize> = ROW_SET.to_vec();
        let cols: &[usize] = &COL_SET;
        assert_eq!(b().submatrix(&rows, cols).unwrap(), sub());
    }

    #[test]
    fn test_submatrix_reorders() {
        let picked = b().submatrix(&[2usize, 0], &[3usize, 0]).unwrap();
        assert_eq!(picked.as_slice(), &[12.0, 3.0, 10.0, 1.0]);
    }

    #[test]
    fn test_reversed_range_rejected() {
        let b = b();
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 2..1;
        assert_eq!(
            b.submatrix(reversed, 0..2),
            Err(CoreError::ReversedRange { start: 2, end: 1 })
        );
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 2..=0;
        assert!(b.submatrix(0..2, reversed).is_err());
    }

    #[test]
    fn test_empty_range_selects_nothing() {
        let s = b().submatrix(1..1, 0..4).unwrap();
        assert_eq!(s.shape(), (0, 4));
    }

    #[test]
    fn test_set_submatrix_ranges() {
        let mut b = b();
        let m = Matrix::zeros(2, 3);
        b.set_submatrix(IB..=IE, JB..=JE, &m).unwrap();
        assert_eq!(b.submatrix(IB..=IE, JB..=JE).unwrap(), m);
        assert_eq!(b.get(0, 0).unwrap(), 1.0);
        assert_eq!(b.get(1, 0).unwrap(), 2.0);

        b.set_submatrix(IB..=IE, JB..=JE, &sub()).unwrap();
        assert_eq!(b, self::b());
    }

    #[test]
    fn test_set_submatrix_sets() {
        let m = Matrix::zeros(2, 3);

        let mut b1 = b();
        b1.set_submatrix(IB..=IE, &COL_SET, &m).unwrap();
        assert_eq!(b1.submatrix(IB..=IE, &COL_SET).unwrap(), m);

        let mut b2 = b();
        b2.set_submatrix(&ROW_SET, JB..=JE, &m).unwrap();
        assert_eq!(b2.submatrix(&ROW_SET, JB..=JE).unwrap(), m);

        let mut b3 = b();
        b3.set_submatrix(&ROW_SET, &COL_SET, &m).unwrap();
        assert_eq!(b3.submatrix(&ROW_SET, &COL_SET).unwrap(), m);
    }

    #[test]
    fn test_set_submatrix_out_of_bounds() {
        let mut b = b();
        let m = Matrix::zeros(2, 3);
        let rows = b.rows();
        let cols = b.cols();
        assert!(b.set_submatrix(IB..=IE + rows + 1, JB..=JE, &m).is_err());
        assert!(b.set_submatrix(IB..=IE, JB..=JE + cols + 1, &m).is_err());
        assert!(b.set_submatrix(IB..=IE + rows + 1, &COL_SET, &m).is_err());
        assert!(b.set_submatrix(IB..=IE, &BAD_COL_SET, &m).is_err());
        assert!(b.set_submatrix(&ROW_SET, JB..=JE + cols + 1, &m).is_err());
        assert!(b.set_submatrix(&BAD_ROW_SET, JB..=JE, &m).is_err());
        assert!(b.set_submatrix(&ROW_SET, &BAD_COL_SET, &m).is_err());
        assert!(b.set_submatrix(&BAD_ROW_SET, &COL_SET, &m).is_err());
        assert_eq!(b, self::b());
    }

    #[test]
    fn test_set_submatrix_shape_mismatch() {
        let mut b = b();
        assert!(matches!(
            b.set_submatrix(0..2, 0..2, &Matrix::zeros(2, 3)),
            Err(CoreError::DimensionMismatch { .. })
        ));
    }
}
