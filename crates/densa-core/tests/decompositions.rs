//! End-to-end checks of the decompositions on small reference matrices.
//!
//! Matrix comparisons use a relative one-norm test: two matrices agree
//! when `norm1(X - Y) <= 1000 * eps * max(norm1(X), norm1(Y))`.

use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use densa_core::prelude::*;

const EPS: f64 = f64::EPSILON;

fn assert_matrix_close(x: &Matrix, y: &Matrix) {
    assert_eq!(x.shape(), y.shape(), "shape mismatch");
    let x_norm = x.norm1();
    let y_norm = y.norm1();
    if (x_norm == 0.0 && y_norm < 10.0 * EPS) || (y_norm == 0.0 && x_norm < 10.0 * EPS) {
        return;
    }
    let diff = x.minus(y).unwrap().norm1();
    assert!(
        diff <= 1000.0 * EPS * x_norm.max(y_norm),
        "matrices differ: norm1(X - Y) = {diff:e}\nX = {x:?}\nY = {y:?}"
    );
}

fn columnwise() -> Vec<f64> {
    (1..=12).map(f64::from).collect()
}

/// The 3x4 matrix `[[1,4,7,10],[2,5,8,11],[3,6,9,12]]`.
fn avals() -> Matrix {
    Matrix::from_column_packed(&columnwise(), 3).unwrap()
}

/// The same values packed into four rows: `[[1,5,9],[2,6,10],[3,7,11],[4,8,12]]`.
fn tall() -> Matrix {
    Matrix::from_column_packed(&columnwise(), 4).unwrap()
}

fn pvals() -> Matrix {
    Matrix::from_rows(&[[4.0, 1.0, 1.0], [1.0, 2.0, 3.0], [1.0, 3.0, 6.0]]).unwrap()
}

#[test]
fn product_with_transpose() {
    let square = Matrix::from_rows(&[
        [166.0, 188.0, 210.0],
        [188.0, 214.0, 240.0],
        [210.0, 240.0, 270.0],
    ])
    .unwrap();
    let a = avals();
    assert_matrix_close(&a.times(&a.transpose()).unwrap(), &square);
    assert_matrix_close(&a.times_scalar(0.0), &Matrix::zeros(3, 4));
}

#[test]
fn norms_and_trace() {
    let a = avals();
    assert_relative_eq!(a.norm1(), 33.0);
    assert_relative_eq!(a.norm_inf(), 30.0);
    assert_relative_eq!(a.norm_f(), 650.0_f64.sqrt(), max_relative = 10.0 * EPS);
    assert_relative_eq!(a.trace(), 15.0);
}

#[test]
fn qr_reconstructs_tall_matrix() {
    let a = tall();
    let qr = a.qr().unwrap();
    assert_matrix_close(&qr.q().times(&qr.r()).unwrap(), &a);
}

#[test]
fn svd_reconstructs_tall_matrix() {
    let a = tall();
    let svd = a.svd();
    let usv = svd.u().times(&svd.s()).unwrap().times(&svd.v().transpose()).unwrap();
    assert_matrix_close(&usv, &a);
}

#[test]
fn svd_reconstructs_wide_matrix() {
    let a = avals();
    let svd = a.svd();
    assert_eq!(svd.u().shape(), (3, 3));
    assert_eq!(svd.v().shape(), (4, 3));
    let usv = svd.u().times(&svd.s()).unwrap().times(&svd.v().transpose()).unwrap();
    assert_matrix_close(&usv, &a);
}

#[test]
fn rank_of_deficient_matrix() {
    let a = avals();
    assert_eq!(a.rank(), a.rows().min(a.cols()) - 1);
}

#[test]
fn condition_number() {
    let b = Matrix::from_rows(&[[1.0, 3.0], [7.0, 9.0]]).unwrap();
    let s = b.svd().singular_values().to_vec();
    let k = b.rows().min(b.cols());
    assert_relative_eq!(b.cond(), s[0] / s[k - 1], max_relative = 10.0 * EPS);
    assert_relative_eq!(b.norm2(), s[0]);
}

fn inverse_test_matrix() -> Matrix {
    let mut a = tall().submatrix(0..3, 0..3).unwrap();
    a.set(0, 0, 0.0).unwrap();
    a
}

#[test]
fn lu_permuted_rows_equal_l_times_u() {
    let a = inverse_test_matrix();
    let lu = a.lu();
    let permuted = a.submatrix(lu.pivot(), 0..a.cols()).unwrap();
    assert_matrix_close(&permuted, &lu.l().times(&lu.u()).unwrap());
    assert_matrix_close(&permuted, &lu.p().times(&a).unwrap());
}

#[test]
fn inverse_times_matrix_is_identity() {
    let a = inverse_test_matrix();
    let x = a.inverse().unwrap();
    assert_matrix_close(&a.times(&x).unwrap(), &Matrix::identity(3, 3));
}

#[test]
fn determinant() {
    // [[0,5,9],[2,6,10],[3,7,11]]
    let a = inverse_test_matrix();
    assert_relative_eq!(a.det().unwrap(), 4.0, max_relative = 1e-12);

    let singular = tall().submatrix(0..3, 0..3).unwrap();
    assert!(singular.det().unwrap().abs() < 1e-12);
    assert!(!singular.lu().is_nonsingular());
}

#[test]
fn solve_square_system() {
    let sub = avals().submatrix(1..=2, 1..=3).unwrap();
    let sq = sub.submatrix(0..2, 0..2).unwrap();
    let rhs = Matrix::from_rows(&[[13.0], [15.0]]).unwrap();
    assert_matrix_close(&sq.solve(&rhs).unwrap(), &Matrix::filled(2, 1, 1.0));
}

#[test]
fn cholesky_factor_and_solve() {
    let a = pvals();
    let chol = a.chol();
    assert!(chol.is_spd());
    let l = chol.l();
    assert_matrix_close(&a, &l.times(&l.transpose()).unwrap());

    let x = chol.solve(&Matrix::identity(3, 3)).unwrap();
    assert_matrix_close(&a.times(&x).unwrap(), &Matrix::identity(3, 3));
}

#[test]
fn symmetric_eigen() {
    let a = pvals();
    let eig = a.eig().unwrap();
    assert!(eig.is_symmetric());
    let v = eig.v();
    assert_matrix_close(&a.times(&v).unwrap(), &v.times(&eig.d()).unwrap());
    assert_matrix_close(&v.transpose().times(&v).unwrap(), &Matrix::identity(3, 3));
    let d = eig.real_eigenvalues();
    assert!(d.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn nonsymmetric_eigen() {
    let a = Matrix::from_rows(&[
        [0.0, 1.0, 0.0, 0.0],
        [1.0, 0.0, 2.0e-7, 0.0],
        [0.0, -2.0e-7, 0.0, 1.0],
        [0.0, 0.0, 1.0, 0.0],
    ])
    .unwrap();
    let start = Instant::now();
    let eig = a.eig().unwrap();
    assert!(start.elapsed() < Duration::from_secs(10));
    assert!(!eig.is_symmetric());

    // Two conjugate pairs, each kept as a 2x2 rotation block
    let im = eig.imag_eigenvalues();
    assert_eq!(im.iter().filter(|&&x| x != 0.0).count(), 4);
    let d = eig.d();
    for i in 0..4 {
        if im[i] > 0.0 {
            assert_eq!(im[i + 1], -im[i]);
            assert_relative_eq!(d[(i, i + 1)], im[i]);
            assert_relative_eq!(d[(i + 1, i)], -im[i]);
            assert_relative_eq!(d[(i, i)], d[(i + 1, i + 1)]);
        }
    }

    let v = eig.v();
    assert_matrix_close(&a.times(&v).unwrap(), &v.times(&d).unwrap());
}

#[test]
fn complex_pairs_form_two_by_two_blocks() {
    // Block rotation plus a real eigenvalue
    let a = Matrix::from_rows(&[[0.0, -2.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 3.0]]).unwrap();
    let eig = a.eig().unwrap();
    let im = eig.imag_eigenvalues();
    assert_eq!(im.iter().filter(|&&x| x != 0.0).count(), 2);

    let d = eig.d();
    for i in 0..3 {
        if im[i] > 0.0 {
            assert_relative_eq!(d[(i, i + 1)], im[i]);
            assert_relative_eq!(d[(i + 1, i)], -im[i]);
            assert_relative_eq!(im[i], 2.0, max_relative = 1e-12);
        }
    }
    let v = eig.v();
    assert_matrix_close(&a.times(&v).unwrap(), &v.times(&d).unwrap());
}

#[test]
fn bad_eigenvalue_case_terminates() {
    let a = Matrix::from_rows(&[
        [0.0, 0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0, 1.0],
        [0.0, 0.0, 0.0, 1.0, 0.0],
        [1.0, 1.0, 0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0, 0.0, 1.0],
    ])
    .unwrap();
    let start = Instant::now();
    let eig = a.eig().unwrap();
    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(eig.real_eigenvalues().len(), 5);
}

#[test]
fn decompositions_do_not_alias_source() {
    let mut a = pvals();
    let lu = a.lu();
    let chol = a.chol();
    let svd = a.svd();
    let det = lu.det().unwrap();
    let s0 = svd.singular_values()[0];
    let l = chol.l();

    a.set(0, 0, 1.0e6).unwrap();
    assert_relative_eq!(lu.det().unwrap(), det);
    assert_relative_eq!(svd.singular_values()[0], s0);
    assert_eq!(chol.l(), l);
}

#[test]
fn configured_tolerances() {
    // A nearly singular matrix counts as singular only with a loose
    // tolerance.
    let a = Matrix::from_rows(&[[1.0, 1.0], [1.0, 1.0 + 1.0e-13]]).unwrap();
    assert!(a.lu().is_nonsingular());
    let loose = DecompositionConfig::default().with_singularity_factor(1.0e4);
    assert!(!LuDecomposition::with_config(&a, &loose).is_nonsingular());
    assert!(!QrDecomposition::with_config(&a, &loose).unwrap().is_full_rank());

    let svd = SingularValueDecomposition::with_config(
        &a,
        &DecompositionConfig::default().with_rank_factor(1.0e4),
    );
    assert_eq!(svd.rank(), 1);
    assert_eq!(a.rank(), 2);
}
