//! Singular Value Decomposition (SVD).
//!
//! Decomposes a matrix `A` (m x n) into `A = U S V^T` where, with
//! `k = min(m, n)`:
//! - `U` is m x k with orthonormal columns
//! - `S` is k x k diagonal with non-negative entries in descending order
//! - `V` is n x k with orthonormal columns
//!
//! Implementation: Householder bidiagonalization followed by implicit
//! shifted QR sweeps on the bidiagonal. Wide input is handled by
//! decomposing the transpose and swapping the factors.

use crate::config::DecompositionConfig;
use crate::matrix::Matrix;

/// Machine epsilon, `2^-52`.
const EPS: f64 = f64::EPSILON;
/// Threshold below which a bidiagonal entry is treated as zero outright,
/// `2^-966`.
const TINY: f64 = 1.603_334_688_007_178_2e-291;

/// Result of a Singular Value Decomposition.
#[derive(Debug, Clone)]
pub struct SingularValueDecomposition {
    /// Left singular vectors (m x k).
    u: Matrix,
    /// Singular values in descending order (length k).
    s: Vec<f64>,
    /// Right singular vectors (n x k).
    v: Matrix,
    m: usize,
    n: usize,
    rank_factor: f64,
}

/// Apply a plane rotation to columns `a` and `b` of a row-major buffer:
/// `(x_a, x_b) <- (cs x_a + sn x_b, -sn x_a + cs x_b)`.
fn rotate_columns(data: &mut [f64], cols: usize, a: usize, b: usize, cs: f64, sn: f64) {
    for row in data.chunks_exact_mut(cols) {
        let t = cs * row[a] + sn * row[b];
        row[b] = -sn * row[a] + cs * row[b];
        row[a] = t;
    }
}

#[allow(clippy::many_single_char_names)]
impl SingularValueDecomposition {
    /// Compute the SVD of a matrix `A` (m x n).
    ///
    /// Always succeeds; see [`DecompositionConfig::max_iterations`] for the
    /// bound on the QR sweeps.
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// # use densa_core::linalg::decomp::SingularValueDecomposition;
    /// let a = Matrix::from_rows(&[[3.0, 0.0], [0.0, 4.0]]).unwrap();
    /// let svd = SingularValueDecomposition::new(&a);
    /// let s = svd.singular_values();
    /// // Singular values of diag(3,4) are 4 and 3
    /// assert!((s[0] - 4.0).abs() < 1e-10);
    /// assert!((s[1] - 3.0).abs() < 1e-10);
    /// ```
    pub fn new(a: &Matrix) -> Self {
        Self::with_config(a, &DecompositionConfig::default())
    }

    /// Compute the SVD with an explicit iteration cap and rank tolerance.
    pub fn with_config(a: &Matrix, config: &DecompositionConfig) -> Self {
        let (m, n) = a.shape();
        log::debug!("SVD of {m}x{n} matrix");

        if m >= n {
            let (u, s, v) = Self::svd_tall(a.as_slice(), m, n, config.max_iterations);
            Self {
                u,
                s,
                v,
                m,
                n,
                rank_factor: config.rank_factor,
            }
        } else {
            // A^T = U' S V'^T  =>  A = V' S U'^T
            let at = a.transpose();
            let (u, s, v) = Self::svd_tall(at.as_slice(), n, m, config.max_iterations);
            Self {
                u: v,
                s,
                v: u,
                m,
                n,
                rank_factor: config.rank_factor,
            }
        }
    }

    /// Golub-Kahan SVD of a row-major m x n buffer with `m >= n`.
    ///
    /// Returns `(U, s, V)` with `U` m x n and `V` n x n.
    #[allow(clippy::too_many_lines)]
    fn svd_tall(
        data: &[f64],
        m: usize,
        n: usize,
        max_iterations: usize,
    ) -> (Matrix, Vec<f64>, Matrix) {
        if n == 0 {
            return (Matrix::zeros(m, 0), Vec::new(), Matrix::zeros(0, 0));
        }

        let mut a = data.to_vec();
        let mut s = vec![0.0_f64; n];
        let mut e = vec![0.0_f64; n];
        let mut work = vec![0.0_f64; m];
        let mut u = vec![0.0; m * n];
        let mut v = vec![0.0; n * n];

        // ------------------------------------------------------------------
        // Reduce A to bidiagonal form, storing the diagonal in s and the
        // super-diagonal in e.
        // ------------------------------------------------------------------
        let nct = (m - 1).min(n);
        let nrt = n.saturating_sub(2).min(m);
        for k in 0..nct.max(nrt) {
            if k < nct {
                // Left transformation: zero A[k+1.., k]
                s[k] = 0.0;
                for i in k..m {
                    s[k] = s[k].hypot(a[i * n + k]);
                }
                if s[k] != 0.0 {
                    if a[k * n + k] < 0.0 {
                        s[k] = -s[k];
                    }
                    for i in k..m {
                        a[i * n + k] /= s[k];
                    }
                    a[k * n + k] += 1.0;
                }
                s[k] = -s[k];
            }
            for j in (k + 1)..n {
                if k < nct && s[k] != 0.0 {
                    let mut t = 0.0;
                    for i in k..m {
                        t += a[i * n + k] * a[i * n + j];
                    }
                    t = -t / a[k * n + k];
                    for i in k..m {
                        let aik = a[i * n + k];
                        a[i * n + j] += t * aik;
                    }
                }
                // Row k of A, used by the right transformation
                e[j] = a[k * n + j];
            }
            if k < nct {
                for i in k..m {
                    u[i * n + k] = a[i * n + k];
                }
            }
            if k < nrt {
                // Right transformation: zero e[k+2..]
                e[k] = 0.0;
                for i in (k + 1)..n {
                    e[k] = e[k].hypot(e[i]);
                }
                if e[k] != 0.0 {
                    if e[k + 1] < 0.0 {
                        e[k] = -e[k];
                    }
                    for i in (k + 1)..n {
                        e[i] /= e[k];
                    }
                    e[k + 1] += 1.0;
                }
                e[k] = -e[k];
                if k + 1 < m && e[k] != 0.0 {
                    for w in &mut work[(k + 1)..m] {
                        *w = 0.0;
                    }
                    for j in (k + 1)..n {
                        for i in (k + 1)..m {
                            work[i] += e[j] * a[i * n + j];
                        }
                    }
                    for j in (k + 1)..n {
                        let t = -e[j] / e[k + 1];
                        for i in (k + 1)..m {
                            a[i * n + j] += t * work[i];
                        }
                    }
                }
                for i in (k + 1)..n {
                    v[i * n + k] = e[i];
                }
            }
        }

        // Final bidiagonal of order p
        let mut p = n;
        if nct < n {
            s[nct] = a[nct * n + nct];
        }
        if nrt + 1 < p {
            e[nrt] = a[nrt * n + p - 1];
        }
        e[p - 1] = 0.0;

        // ------------------------------------------------------------------
        // Accumulate U
        // ------------------------------------------------------------------
        for j in nct..n {
            for i in 0..m {
                u[i * n + j] = 0.0;
            }
            u[j * n + j] = 1.0;
        }
        for k in (0..nct).rev() {
            if s[k] == 0.0 {
                for i in 0..m {
                    u[i * n + k] = 0.0;
                }
                u[k * n + k] = 1.0;
                continue;
            }
            for j in (k + 1)..n {
                let mut t = 0.0;
                for i in k..m {
                    t += u[i * n + k] * u[i * n + j];
                }
                t = -t / u[k * n + k];
                for i in k..m {
                    let uik = u[i * n + k];
                    u[i * n + j] += t * uik;
                }
            }
            for i in k..m {
                u[i * n + k] = -u[i * n + k];
            }
            u[k * n + k] += 1.0;
            for i in 0..k {
                u[i * n + k] = 0.0;
            }
        }

        // ------------------------------------------------------------------
        // Accumulate V
        // ------------------------------------------------------------------
        for k in (0..n).rev() {
            if k < nrt && e[k] != 0.0 {
                for j in (k + 1)..n {
                    let mut t = 0.0;
                    for i in (k + 1)..n {
                        t += v[i * n + k] * v[i * n + j];
                    }
                    t = -t / v[(k + 1) * n + k];
                    for i in (k + 1)..n {
                        let vik = v[i * n + k];
                        v[i * n + j] += t * vik;
                    }
                }
            }
            for i in 0..n {
                v[i * n + k] = 0.0;
            }
            v[k * n + k] = 1.0;
        }

        // ------------------------------------------------------------------
        // Implicit shifted QR on the bidiagonal
        // ------------------------------------------------------------------
        let pp = p - 1;
        let mut iter = 0usize;
        while p > 0 {
            // `split` is the start of the unreduced block: e[split - 1] is
            // negligible (or split == 0).
            let mut split = p - 1;
            while split > 0 {
                let k = split - 1;
                if e[k].abs() <= TINY + EPS * (s[k].abs() + s[k + 1].abs()) {
                    e[k] = 0.0;
                    break;
                }
                split -= 1;
            }

            if split + 1 < p && iter >= max_iterations {
                log::warn!(
                    "SVD: no convergence after {iter} sweeps on block {split}..{p}, \
                     forcing deflation"
                );
                e[p - 2] = 0.0;
                split = p - 1;
            }

            if split == p - 1 {
                // s[p-1] has converged: make it non-negative and sort it
                // into place.
                let mut k = split;
                if s[k] <= 0.0 {
                    s[k] = if s[k] < 0.0 { -s[k] } else { 0.0 };
                    for i in 0..=pp {
                        v[i * n + k] = -v[i * n + k];
                    }
                }
                while k < pp && s[k] < s[k + 1] {
                    s.swap(k, k + 1);
                    for i in 0..n {
                        v.swap(i * n + k, i * n + k + 1);
                    }
                    if k + 1 < m {
                        for i in 0..m {
                            u.swap(i * n + k, i * n + k + 1);
                        }
                    }
                    k += 1;
                }
                log::trace!("SVD: singular value {} converged after {iter} sweeps", p - 1);
                iter = 0;
                p -= 1;
                continue;
            }

            // Look for a negligible singular value inside the block
            let mut zero_at = None;
            for ks in (split..p).rev() {
                let mut t = e[ks].abs();
                if ks != split {
                    t += e[ks - 1].abs();
                }
                if s[ks].abs() <= TINY + EPS * t {
                    s[ks] = 0.0;
                    zero_at = Some(ks);
                    break;
                }
            }

            match zero_at {
                Some(ks) if ks == p - 1 => {
                    // Deflate negligible s[p-1] by chasing e[p-2] up
                    let mut f = e[p - 2];
                    e[p - 2] = 0.0;
                    for j in (split..=(p - 2)).rev() {
                        let t = s[j].hypot(f);
                        let cs = s[j] / t;
                        let sn = f / t;
                        s[j] = t;
                        if j != split {
                            f = -sn * e[j - 1];
                            e[j - 1] *= cs;
                        }
                        rotate_columns(&mut v, n, j, p - 1, cs, sn);
                    }
                }
                Some(ks) => {
                    // Split at negligible s[ks]
                    let k = ks + 1;
                    let mut f = e[k - 1];
                    e[k - 1] = 0.0;
                    for j in k..p {
                        let t = s[j].hypot(f);
                        let cs = s[j] / t;
                        let sn = f / t;
                        s[j] = t;
                        f = -sn * e[j];
                        e[j] *= cs;
                        rotate_columns(&mut u, n, j, k - 1, cs, sn);
                    }
                }
                None => {
                    // One QR sweep with a shift from the trailing 2x2 block
                    let k = split;
                    let scale = s[p - 1]
                        .abs()
                        .max(s[p - 2].abs())
                        .max(e[p - 2].abs())
                        .max(s[k].abs())
                        .max(e[k].abs());
                    let sp = s[p - 1] / scale;
                    let spm1 = s[p - 2] / scale;
                    let epm1 = e[p - 2] / scale;
                    let sk = s[k] / scale;
                    let ek = e[k] / scale;
                    let b = ((spm1 + sp) * (spm1 - sp) + epm1 * epm1) / 2.0;
                    let c = (sp * epm1) * (sp * epm1);
                    let mut shift = 0.0;
                    if b != 0.0 || c != 0.0 {
                        shift = (b * b + c).sqrt();
                        if b < 0.0 {
                            shift = -shift;
                        }
                        shift = c / (b + shift);
                    }
                    let mut f = (sk + sp) * (sk - sp) + shift;
                    let mut g = sk * ek;

                    // Chase zeros
                    for j in k..(p - 1) {
                        let t = f.hypot(g);
                        let cs = f / t;
                        let sn = g / t;
                        if j != k {
                            e[j - 1] = t;
                        }
                        f = cs * s[j] + sn * e[j];
                        e[j] = cs * e[j] - sn * s[j];
                        g = sn * s[j + 1];
                        s[j + 1] *= cs;
                        rotate_columns(&mut v, n, j, j + 1, cs, sn);

                        let t = f.hypot(g);
                        let cs = f / t;
                        let sn = g / t;
                        s[j] = t;
                        f = cs * e[j] + sn * s[j + 1];
                        s[j + 1] = -sn * e[j] + cs * s[j + 1];
                        g = sn * e[j + 1];
                        e[j + 1] *= cs;
                        if j + 1 < m {
                            rotate_columns(&mut u, n, j, j + 1, cs, sn);
                        }
                    }
                    e[p - 2] = f;
                    iter += 1;
                }
            }
        }

        (
            Matrix::from_raw_parts(u, m, n),
            s,
            Matrix::from_raw_parts(v, n, n),
        )
    }

    /// Singular values in descending order.
    pub fn singular_values(&self) -> &[f64] {
        &self.s
    }

    /// Left singular vectors `U` (m x k).
    pub fn u(&self) -> Matrix {
        self.u.clone()
    }

    /// Right singular vectors `V` (n x k).
    pub fn v(&self) -> Matrix {
        self.v.clone()
    }

    /// Diagonal matrix of singular values (k x k).
    pub fn s(&self) -> Matrix {
        let k = self.s.len();
        let mut out = Matrix::zeros(k, k);
        for (i, &sv) in self.s.iter().enumerate() {
            out[(i, i)] = sv;
        }
        out
    }

    /// Two-norm: the largest singular value.
    pub fn norm2(&self) -> f64 {
        self.s.first().copied().unwrap_or(0.0)
    }

    /// Two-norm condition number `max(s) / min(s)`.
    ///
    /// Infinite when the smallest singular value is zero; zero for an
    /// empty matrix.
    pub fn cond(&self) -> f64 {
        match (self.s.first(), self.s.last()) {
            (Some(_), Some(&last)) if last == 0.0 => f64::INFINITY,
            (Some(&first), Some(&last)) => first / last,
            _ => 0.0,
        }
    }

    /// Effective numerical rank: the number of singular values above
    /// `max(m, n) * s[0] * eps * rank_factor`.
    pub fn rank(&self) -> usize {
        let tol = self.m.max(self.n) as f64 * self.norm2() * EPS * self.rank_factor;
        self.s.iter().filter(|&&sv| sv > tol).count()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn approx_eq(a: &[f64], b: &[f64], tol: f64) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| (x - y).abs() < tol)
    }

    fn reconstruct(svd: &SingularValueDecomposition) -> Matrix {
        svd.u()
            .times(&svd.s())
            .unwrap()
            .times(&svd.v().transpose())
            .unwrap()
    }

    fn assert_orthonormal_columns(q: &Matrix, tol: f64) {
        let qtq = q.transpose().times(q).unwrap();
        let eye = Matrix::identity(q.cols(), q.cols());
        assert!(approx_eq(qtq.as_slice(), eye.as_slice(), tol));
    }

    #[test]
    fn test_svd_diagonal() {
        let a = Matrix::from_rows(&[[3.0, 0.0], [0.0, 4.0]]).unwrap();
        let svd = SingularValueDecomposition::new(&a);
        assert!(approx_eq(svd.singular_values(), &[4.0, 3.0], 1e-10));
    }

    #[test]
    fn test_svd_identity() {
        let svd = SingularValueDecomposition::new(&Matrix::identity(3, 3));
        for &sv in svd.singular_values() {
            assert!((sv - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_svd_reconstruction() {
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]).unwrap();
        let svd = SingularValueDecomposition::new(&a);
        assert!(approx_eq(reconstruct(&svd).as_slice(), a.as_slice(), 1e-10));
    }

    #[test]
    fn test_svd_tall_matrix() {
        let columnwise: Vec<f64> = (1..=12).map(f64::from).collect();
        let a = Matrix::from_column_packed(&columnwise, 4).unwrap();
        let svd = SingularValueDecomposition::new(&a);
        assert_eq!(svd.singular_values().len(), 3);
        assert_eq!(svd.u().shape(), (4, 3));
        assert_eq!(svd.v().shape(), (3, 3));
        assert!(approx_eq(reconstruct(&svd).as_slice(), a.as_slice(), 1e-10));
        assert_orthonormal_columns(&svd.u(), 1e-10);
        assert_orthonormal_columns(&svd.v(), 1e-10);
    }

    #[test]
    fn test_svd_wide_matrix() {
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let svd = SingularValueDecomposition::new(&a);
        assert_eq!(svd.singular_values().len(), 2);
        assert_eq!(svd.u().shape(), (2, 2));
        assert_eq!(svd.v().shape(), (3, 2));
        assert!(approx_eq(reconstruct(&svd).as_slice(), a.as_slice(), 1e-10));
    }

    #[test]
    fn test_svd_values_descending_non_negative() {
        let a = Matrix::from_rows(&[[-2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -5.0]]).unwrap();
        let s = SingularValueDecomposition::new(&a).singular_values().to_vec();
        assert!(approx_eq(&s, &[5.0, 2.0, 1.0], 1e-12));
    }

    #[test]
    fn test_svd_rank() {
        // Rank-1 matrix
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [3.0, 6.0, 9.0]]).unwrap();
        assert_eq!(SingularValueDecomposition::new(&a).rank(), 1);

        let columnwise: Vec<f64> = (1..=12).map(f64::from).collect();
        let b = Matrix::from_column_packed(&columnwise, 3).unwrap();
        assert_eq!(SingularValueDecomposition::new(&b).rank(), 2);
    }

    #[test]
    fn test_svd_cond() {
        let svd = SingularValueDecomposition::new(&Matrix::identity(3, 3));
        assert!((svd.cond() - 1.0).abs() < 1e-10);

        let a = Matrix::from_rows(&[[1.0, 3.0], [7.0, 9.0]]).unwrap();
        let svd = SingularValueDecomposition::new(&a);
        let s = svd.singular_values();
        assert!((svd.cond() - s[0] / s[1]).abs() < 1e-12);
    }

    #[test]
    fn test_svd_cond_singular_is_infinite() {
        let svd = SingularValueDecomposition::new(&Matrix::zeros(2, 2));
        assert_eq!(svd.cond(), f64::INFINITY);
        assert_eq!(svd.rank(), 0);
        assert_eq!(svd.norm2(), 0.0);
    }

    #[test]
    fn test_svd_norm2() {
        let a = Matrix::from_rows(&[[3.0, 0.0], [4.0, 0.0]]).unwrap();
        assert!((SingularValueDecomposition::new(&a).norm2() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_svd_u_v_orthogonal() {
        let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 10.0]]).unwrap();
        let svd = SingularValueDecomposition::new(&a);
        assert_orthonormal_columns(&svd.u(), 1e-10);
        assert_orthonormal_columns(&svd.v(), 1e-10);
    }

    #[test]
    fn test_svd_empty() {
        let svd = SingularValueDecomposition::new(&Matrix::zeros(3, 0));
        assert!(svd.singular_values().is_empty());
        assert_eq!(svd.cond(), 0.0);
        assert_eq!(svd.rank(), 0);
    }

    #[test]
    fn test_svd_iteration_cap_still_terminates() {
        let a = Matrix::from_rows(&[[4.0, 1.0, 2.0], [1.0, 3.0, 0.5], [2.0, 0.5, 5.0]]).unwrap();
        let cfg = DecompositionConfig::default().with_max_iterations(0);
        let svd = SingularValueDecomposition::with_config(&a, &cfg);
        assert_eq!(svd.singular_values().len(), 3);
        assert!(svd.singular_values().iter().all(|&sv| sv >= 0.0));
    }
}
