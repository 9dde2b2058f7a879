//! Arithmetic on [`Matrix`]: elementwise, scalar, product, transpose.
//!
//! Every elementwise operation comes in two flavours sharing one
//! traversal: a value-returning method that allocates a fresh result, and
//! an `*_equals` method that overwrites `self`. Both return `Err` on
//! nonconforming shapes.
//!
//! The `std::ops` impls (`Add`, `Sub`, `Mul`, `Neg`, `AddAssign`,
//! `SubAssign`) panic on nonconforming shapes instead.

use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::error::{CoreError, Result};

use super::Matrix;

macro_rules! impl_elementwise {
    ($(#[$doc:meta])* $name:ident, $name_eq:ident, |$a:ident, $b:ident| $body:expr) => {
        $(#[$doc])*
        pub fn $name(&self, other: &Matrix) -> Result<Matrix> {
            self.zip_map(other, |$a, $b| $body)
        }

        $(#[$doc])*
        ///
        /// In-place variant: the result overwrites `self`.
        pub fn $name_eq(&mut self, other: &Matrix) -> Result<&mut Self> {
            self.zip_apply_in_place(other, |$a, $b| $body)?;
            Ok(self)
        }
    };
}

impl Matrix {
    impl_elementwise!(
        /// `self + other`.
        plus, plus_equals, |a, b| a + b
    );
    impl_elementwise!(
        /// `self - other`.
        minus, minus_equals, |a, b| a - b
    );
    impl_elementwise!(
        /// Elementwise product `self .* other`.
        array_times, array_times_equals, |a, b| a * b
    );
    impl_elementwise!(
        /// Elementwise right division `self ./ other`.
        array_right_divide, array_right_divide_equals, |a, b| a / b
    );
    impl_elementwise!(
        /// Elementwise left division `self .\ other`, i.e. `other ./ self`.
        array_left_divide, array_left_divide_equals, |a, b| b / a
    );

    /// Multiply every element by `s`.
    pub fn times_scalar(&self, s: f64) -> Matrix {
        self.map(|x| s * x)
    }

    /// Multiply every element by `s` in place.
    pub fn times_scalar_equals(&mut self, s: f64) -> &mut Self {
        self.apply(|x| s * x);
        self
    }

    /// Unary minus.
    pub fn negated(&self) -> Matrix {
        self.map(|x| -x)
    }

    /// Matrix product `self * other`.
    ///
    /// Fails unless `self.cols() == other.rows()`; the result is
    /// `self.rows() x other.cols()`.
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// let b = Matrix::from_rows(&[[5.0, 6.0], [7.0, 8.0]]).unwrap();
    /// let c = a.times(&b).unwrap();
    /// assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    /// ```
    pub fn times(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(CoreError::DimensionMismatch {
                expected: (self.cols, other.cols),
                got: other.shape(),
            });
        }

        let (m, k, n) = (self.rows, self.cols, other.cols);
        let mut out = Matrix::zeros(m, n);
        // ikj order: streams rows of `other` and `out`
        for i in 0..m {
            let a_row = &self.data[i * k..(i + 1) * k];
            let c_row = &mut out.data[i * n..(i + 1) * n];
            for (p, &aip) in a_row.iter().enumerate() {
                let b_row = &other.data[p * n..(p + 1) * n];
                for (c, &b) in c_row.iter_mut().zip(b_row) {
                    *c += aip * b;
                }
            }
        }
        Ok(out)
    }

    /// The `cols x rows` transpose.
    pub fn transpose(&self) -> Matrix {
        let (rows, cols) = (self.rows, self.cols);
        let mut data = vec![0.0; self.data.len()];
        for r in 0..rows {
            for c in 0..cols {
                data[c * rows + r] = self.data[r * cols + c];
            }
        }
        Matrix {
            data,
            rows: cols,
            cols: rows,
        }
    }
}

// ======================================================================
// Matrix op Matrix  (elementwise, same shape, panics on mismatch)
// ======================================================================

macro_rules! impl_matrix_binop {
    ($trait:ident, $method:ident, $checked:ident) => {
        impl $trait for Matrix {
            type Output = Matrix;

            fn $method(self, rhs: Matrix) -> Matrix {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&Matrix> for &Matrix {
            type Output = Matrix;

            fn $method(self, rhs: &Matrix) -> Matrix {
                match self.$checked(rhs) {
                    Ok(out) => out,
                    Err(e) => panic!("{}: {e}", stringify!($method)),
                }
            }
        }
    };
}

impl_matrix_binop!(Add, add, plus);
impl_matrix_binop!(Sub, sub, minus);

impl AddAssign<&Matrix> for Matrix {
    fn add_assign(&mut self, rhs: &Matrix) {
        if let Err(e) = self.plus_equals(rhs) {
            panic!("add_assign: {e}");
        }
    }
}

impl SubAssign<&Matrix> for Matrix {
    fn sub_assign(&mut self, rhs: &Matrix) {
        if let Err(e) = self.minus_equals(rhs) {
            panic!("sub_assign: {e}");
        }
    }
}

impl Mul<&Matrix> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        match self.times(rhs) {
            Ok(out) => out,
            Err(e) => panic!("mul: {e}"),
        }
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Matrix {
        &self * &rhs
    }
}

impl Mul<f64> for Matrix {
    type Output = Matrix;

    fn mul(mut self, rhs: f64) -> Matrix {
        self.times_scalar_equals(rhs);
        self
    }
}

impl Mul<f64> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: f64) -> Matrix {
        self.times_scalar(rhs)
    }
}

impl Neg for Matrix {
    type Output = Matrix;

    fn neg(mut self) -> Matrix {
        self.apply(|x| -x);
        self
    }
}

impl Neg for &Matrix {
    type Output = Matrix;

    fn neg(self) -> Matrix {
        self.negated()
    }
}
