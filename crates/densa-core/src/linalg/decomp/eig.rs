//! Eigendecomposition of real square matrices.
//!
//! For a symmetric `A`, `A = V D V^T` with `V` orthogonal and `D`
//! diagonal: Householder tridiagonalization followed by the implicit QL
//! algorithm. Eigenvalues come out in ascending order.
//!
//! For a non-symmetric `A`, `A V = V D` with `D` block diagonal: the real
//! eigenvalues sit on the diagonal, and each complex pair `x ± iy`
//! occupies a 2x2 block `[[x, y], [-y, x]]`. `V` may be badly
//! conditioned or even singular. The matrix is reduced to upper
//! Hessenberg form and then to real Schur form by the double-shift QR
//! algorithm, after which the eigenvectors are found by back
//! substitution.

use crate::config::DecompositionConfig;
use crate::error::{CoreError, Result};
use crate::matrix::Matrix;

const EPS: f64 = f64::EPSILON;

/// Result of an eigendecomposition.
#[derive(Debug, Clone)]
pub struct EigenvalueDecomposition {
    /// Real parts of the eigenvalues.
    d: Vec<f64>,
    /// Imaginary parts of the eigenvalues; a positive entry is followed
    /// by its conjugate.
    e: Vec<f64>,
    /// Eigenvectors as columns (real and imaginary parts of a complex
    /// pair in adjacent columns).
    v: Matrix,
    symmetric: bool,
}

#[allow(clippy::many_single_char_names)]
impl EigenvalueDecomposition {
    /// Compute the eigendecomposition of a square matrix.
    ///
    /// The symmetric path is taken when `A[i][j] == A[j][i]` holds exactly
    /// for every pair.
    ///
    /// ```
    /// # use densa_core::Matrix;
    /// # use densa_core::linalg::decomp::EigenvalueDecomposition;
    /// let a = Matrix::from_rows(&[[2.0, 1.0], [1.0, 3.0]]).unwrap();
    /// let eig = EigenvalueDecomposition::new(&a).unwrap();
    /// let vals = eig.real_eigenvalues();
    /// // Eigenvalues of [[2,1],[1,3]] are (5±sqrt(5))/2
    /// let r5 = 5.0_f64.sqrt();
    /// assert!((vals[0] - (5.0 - r5) / 2.0).abs() < 1e-12);
    /// assert!((vals[1] - (5.0 + r5) / 2.0).abs() < 1e-12);
    /// ```
    pub fn new(a: &Matrix) -> Result<Self> {
        Self::with_config(a, &DecompositionConfig::default())
    }

    /// Compute the eigendecomposition with an explicit iteration cap.
    pub fn with_config(a: &Matrix, config: &DecompositionConfig) -> Result<Self> {
        let (rows, cols) = a.shape();
        if rows != cols {
            return Err(CoreError::NotSquare {
                op: "eig",
                rows,
                cols,
            });
        }
        let n = rows;
        let symmetric = (0..n).all(|i| (0..i).all(|j| a[(i, j)] == a[(j, i)]));
        log::debug!(
            "eigendecomposition of {n}x{n} {} matrix",
            if symmetric { "symmetric" } else { "non-symmetric" }
        );

        let mut d = vec![0.0; n];
        let mut e = vec![0.0; n];
        if n == 0 {
            return Ok(Self {
                d,
                e,
                v: Matrix::zeros(0, 0),
                symmetric,
            });
        }

        let v = if symmetric {
            let mut v = a.clone();
            tred2(&mut v, &mut d, &mut e);
            tql2(&mut v, &mut d, &mut e, config.max_iterations);
            v
        } else {
            let mut h = a.clone();
            let mut v = Matrix::zeros(n, n);
            orthes(&mut h, &mut v);
            hqr2(&mut h, &mut v, &mut d, &mut e, config.max_iterations);
            v
        };

        Ok(Self { d, e, v, symmetric })
    }

    /// Whether the symmetric algorithm was used.
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Real parts of the eigenvalues.
    pub fn real_eigenvalues(&self) -> &[f64] {
        &self.d
    }

    /// Imaginary parts of the eigenvalues.
    pub fn imag_eigenvalues(&self) -> &[f64] {
        &self.e
    }

    /// The eigenvector matrix `V`.
    pub fn v(&self) -> Matrix {
        self.v.clone()
    }

    /// The block diagonal eigenvalue matrix `D`.
    pub fn d(&self) -> Matrix {
        let n = self.d.len();
        let mut out = Matrix::zeros(n, n);
        for i in 0..n {
            out[(i, i)] = self.d[i];
            if self.e[i] > 0.0 {
                out[(i, i + 1)] = self.e[i];
            } else if self.e[i] < 0.0 {
                out[(i, i - 1)] = self.e[i];
            }
        }
        out
    }
}

/// Symmetric Householder reduction to tridiagonal form.
///
/// On entry `v` holds `A`; on exit it holds the accumulated orthogonal
/// transformation, `d` the diagonal and `e[1..]` the sub-diagonal.
#[allow(clippy::many_single_char_names)]
fn tred2(v: &mut Matrix, d: &mut [f64], e: &mut [f64]) {
    let n = d.len();
    for j in 0..n {
        d[j] = v[(n - 1, j)];
    }

    for i in (1..n).rev() {
        // Scale to avoid under/overflow
        let scale: f64 = d[..i].iter().map(|x| x.abs()).sum();
        let mut h = 0.0;
        if scale == 0.0 {
            e[i] = d[i - 1];
            for j in 0..i {
                d[j] = v[(i - 1, j)];
                v[(i, j)] = 0.0;
                v[(j, i)] = 0.0;
            }
        } else {
            // Generate Householder vector
            for x in &mut d[..i] {
                *x /= scale;
                h += *x * *x;
            }
            let mut f = d[i - 1];
            let mut g = h.sqrt();
            if f > 0.0 {
                g = -g;
            }
            e[i] = scale * g;
            h -= f * g;
            d[i - 1] = f - g;
            for x in &mut e[..i] {
                *x = 0.0;
            }

            // Apply similarity transformation to remaining columns
            for j in 0..i {
                f = d[j];
                v[(j, i)] = f;
                g = e[j] + v[(j, j)] * f;
                for k in (j + 1)..i {
                    let vkj = v[(k, j)];
                    g += vkj * d[k];
                    e[k] += vkj * f;
                }
                e[j] = g;
            }
            f = 0.0;
            for j in 0..i {
                e[j] /= h;
                f += e[j] * d[j];
            }
            let hh = f / (h + h);
            for j in 0..i {
                e[j] -= hh * d[j];
            }
            for j in 0..i {
                f = d[j];
                g = e[j];
                for k in j..i {
                    v[(k, j)] -= f * e[k] + g * d[k];
                }
                d[j] = v[(i - 1, j)];
                v[(i, j)] = 0.0;
            }
        }
        d[i] = h;
    }

    // Accumulate transformations
    for i in 0..n - 1 {
        v[(n - 1, i)] = v[(i, i)];
        v[(i, i)] = 1.0;
        let h = d[i + 1];
        if h != 0.0 {
            for k in 0..=i {
                d[k] = v[(k, i + 1)] / h;
            }
            for j in 0..=i {
                let mut g = 0.0;
                for k in 0..=i {
                    g += v[(k, i + 1)] * v[(k, j)];
                }
                for k in 0..=i {
                    v[(k, j)] -= g * d[k];
                }
            }
        }
        for k in 0..=i {
            v[(k, i + 1)] = 0.0;
        }
    }
    for j in 0..n {
        d[j] = v[(n - 1, j)];
        v[(n - 1, j)] = 0.0;
    }
    v[(n - 1, n - 1)] = 1.0;
    e[0] = 0.0;
}

/// Symmetric tridiagonal QL algorithm with implicit shifts.
///
/// Leaves the eigenvalues in `d` in ascending order and the eigenvectors
/// in the columns of `v`.
#[allow(clippy::many_single_char_names)]
fn tql2(v: &mut Matrix, d: &mut [f64], e: &mut [f64], max_iterations: usize) {
    let n = d.len();
    for i in 1..n {
        e[i - 1] = e[i];
    }
    e[n - 1] = 0.0;

    let mut f = 0.0;
    let mut tst1 = 0.0_f64;
    for l in 0..n {
        // Find small sub-diagonal element
        tst1 = tst1.max(d[l].abs() + e[l].abs());
        let m = (l..n)
            .find(|&m| e[m].abs() <= EPS * tst1)
            .unwrap_or(n - 1);

        // If m == l, d[l] is already an eigenvalue; otherwise iterate.
        if m > l {
            let mut iter = 0usize;
            loop {
                iter += 1;

                // Compute implicit shift
                let mut g = d[l];
                let mut p = (d[l + 1] - g) / (2.0 * e[l]);
                let mut r = p.hypot(1.0);
                if p < 0.0 {
                    r = -r;
                }
                d[l] = e[l] / (p + r);
                d[l + 1] = e[l] * (p + r);
                let dl1 = d[l + 1];
                let mut h = g - d[l];
                for x in &mut d[(l + 2)..n] {
                    *x -= h;
                }
                f += h;

                // Implicit QL transformation
                p = d[m];
                let mut c = 1.0;
                let mut c2 = c;
                let mut c3 = c;
                let el1 = e[l + 1];
                let mut s = 0.0;
                let mut s2 = 0.0;
                for i in (l..m).rev() {
                    c3 = c2;
                    c2 = c;
                    s2 = s;
                    g = c * e[i];
                    h = c * p;
                    r = p.hypot(e[i]);
                    e[i + 1] = s * r;
                    s = e[i] / r;
                    c = p / r;
                    p = c * d[i] - s * g;
                    d[i + 1] = h + s * (c * g + s * d[i]);

                    // Accumulate transformation
                    for k in 0..n {
                        h = v[(k, i + 1)];
                        v[(k, i + 1)] = s * v[(k, i)] + c * h;
                        v[(k, i)] = c * v[(k, i)] - s * h;
                    }
                }
                p = -s * s2 * c3 * el1 * e[l] / dl1;
                e[l] = s * p;
                d[l] = c * p;

                if e[l].abs() <= EPS * tst1 {
                    break;
                }
                if iter >= max_iterations {
                    log::warn!(
                        "symmetric eig: no convergence after {iter} sweeps at index {l}, \
                         forcing deflation"
                    );
                    break;
                }
            }
            log::trace!("symmetric eig: eigenvalue {l} converged after {iter} sweeps");
        }
        d[l] += f;
        e[l] = 0.0;
    }

    // Sort eigenvalues and corresponding vectors
    for i in 0..n - 1 {
        let mut k = i;
        let mut p = d[i];
        for (j, &dj) in d.iter().enumerate().skip(i + 1) {
            if dj < p {
                k = j;
                p = dj;
            }
        }
        if k != i {
            d[k] = d[i];
            d[i] = p;
            for j in 0..n {
                let t = v[(j, i)];
                v[(j, i)] = v[(j, k)];
                v[(j, k)] = t;
            }
        }
    }
}

/// Non-symmetric reduction to Hessenberg form by orthogonal similarity
/// transformations. `v` receives the accumulated transformation.
#[allow(clippy::many_single_char_names)]
fn orthes(h: &mut Matrix, v: &mut Matrix) {
    let n = h.rows();
    let high = n - 1;
    let mut ort = vec![0.0; n];

    for m in 1..high {
        // Scale column
        let scale: f64 = (m..=high).map(|i| h[(i, m - 1)].abs()).sum();
        if scale == 0.0 {
            continue;
        }

        // Compute Householder transformation
        let mut hh = 0.0;
        for i in (m..=high).rev() {
            ort[i] = h[(i, m - 1)] / scale;
            hh += ort[i] * ort[i];
        }
        let mut g = hh.sqrt();
        if ort[m] > 0.0 {
            g = -g;
        }
        hh -= ort[m] * g;
        ort[m] -= g;

        // Apply Householder similarity transformation
        // H = (I - u u^T / h) H (I - u u^T / h)
        for j in m..n {
            let mut f = 0.0;
            for i in (m..=high).rev() {
                f += ort[i] * h[(i, j)];
            }
            f /= hh;
            for i in m..=high {
                h[(i, j)] -= f * ort[i];
            }
        }
        for i in 0..=high {
            let mut f = 0.0;
            for j in (m..=high).rev() {
                f += ort[j] * h[(i, j)];
            }
            f /= hh;
            for j in m..=high {
                h[(i, j)] -= f * ort[j];
            }
        }
        ort[m] *= scale;
        h[(m, m - 1)] = scale * g;
    }

    // Accumulate transformations (Algol's ortran)
    for i in 0..n {
        for j in 0..n {
            v[(i, j)] = if i == j { 1.0 } else { 0.0 };
        }
    }
    for m in (1..high).rev() {
        let hm = h[(m, m - 1)];
        if hm == 0.0 {
            continue;
        }
        for i in (m + 1)..=high {
            ort[i] = h[(i, m - 1)];
        }
        for j in m..=high {
            let mut g = 0.0;
            for i in m..=high {
                g += ort[i] * v[(i, j)];
            }
            // Double division avoids possible underflow
            g = (g / ort[m]) / hm;
            for i in m..=high {
                v[(i, j)] += g * ort[i];
            }
        }
    }
}

/// Complex scalar division `(xr + i xi) / (yr + i yi)`.
fn cdiv(xr: f64, xi: f64, yr: f64, yi: f64) -> (f64, f64) {
    if yr.abs() > yi.abs() {
        let r = yi / yr;
        let d = yr + r * yi;
        ((xr + r * xi) / d, (xi - r * xr) / d)
    } else {
        let r = yr / yi;
        let d = yi + r * yr;
        ((r * xr + xi) / d, (r * xi - xr) / d)
    }
}

/// Non-symmetric reduction from Hessenberg to real Schur form, followed
/// by back substitution for the eigenvectors.
#[allow(clippy::many_single_char_names, clippy::too_many_lines)]
fn hqr2(h: &mut Matrix, v: &mut Matrix, d: &mut [f64], e: &mut [f64], max_iterations: usize) {
    let nn = d.len();
    let high = nn - 1;
    let mut exshift = 0.0;
    let (mut r, mut s, mut z) = (0.0_f64, 0.0_f64, 0.0_f64);
    let mut p: f64;
    let mut q: f64;
    let mut w: f64;
    let mut x: f64;
    let mut y: f64;

    // Matrix norm, used in the convergence tests
    let mut norm = 0.0;
    for i in 0..nn {
        for j in i.saturating_sub(1)..nn {
            norm += h[(i, j)].abs();
        }
    }

    // Outer loop over eigenvalue index; rows 0..remaining are still active
    let mut remaining = nn;
    let mut iter = 0usize;
    while remaining > 0 {
        let n = remaining - 1;

        // Look for single small sub-diagonal element
        let mut l = n;
        while l > 0 {
            s = h[(l - 1, l - 1)].abs() + h[(l, l)].abs();
            if s == 0.0 {
                s = norm;
            }
            if h[(l, l - 1)].abs() < EPS * s {
                break;
            }
            l -= 1;
        }

        if l + 1 < n && iter >= max_iterations {
            log::warn!(
                "non-symmetric eig: no convergence after {iter} sweeps at index {n}, \
                 forcing deflation"
            );
            h[(n, n - 1)] = 0.0;
            l = n;
        }

        if l == n {
            // One root found
            h[(n, n)] += exshift;
            d[n] = h[(n, n)];
            e[n] = 0.0;
            log::trace!("non-symmetric eig: real root {n} after {iter} sweeps");
            remaining -= 1;
            iter = 0;
        } else if l + 1 == n {
            // Two roots found
            w = h[(n, n - 1)] * h[(n - 1, n)];
            p = (h[(n - 1, n - 1)] - h[(n, n)]) / 2.0;
            q = p * p + w;
            z = q.abs().sqrt();
            h[(n, n)] += exshift;
            h[(n - 1, n - 1)] += exshift;
            x = h[(n, n)];

            if q >= 0.0 {
                // Real pair
                z = if p >= 0.0 { p + z } else { p - z };
                d[n - 1] = x + z;
                d[n] = d[n - 1];
                if z != 0.0 {
                    d[n] = x - w / z;
                }
                e[n - 1] = 0.0;
                e[n] = 0.0;
                x = h[(n, n - 1)];
                s = x.abs() + z.abs();
                p = x / s;
                q = z / s;
                r = (p * p + q * q).sqrt();
                p /= r;
                q /= r;

                // Row modification
                for j in (n - 1)..nn {
                    z = h[(n - 1, j)];
                    h[(n - 1, j)] = q * z + p * h[(n, j)];
                    h[(n, j)] = q * h[(n, j)] - p * z;
                }

                // Column modification
                for i in 0..=n {
                    z = h[(i, n - 1)];
                    h[(i, n - 1)] = q * z + p * h[(i, n)];
                    h[(i, n)] = q * h[(i, n)] - p * z;
                }

                // Accumulate transformations
                for i in 0..=high {
                    z = v[(i, n - 1)];
                    v[(i, n - 1)] = q * z + p * v[(i, n)];
                    v[(i, n)] = q * v[(i, n)] - p * z;
                }
            } else {
                // Complex pair
                d[n - 1] = x + p;
                d[n] = x + p;
                e[n - 1] = z;
                e[n] = -z;
            }
            log::trace!("non-symmetric eig: root pair {}..={n} after {iter} sweeps", n - 1);
            remaining -= 2;
            iter = 0;
        } else {
            // No convergence yet
            x = h[(n, n)];
            y = 0.0;
            w = 0.0;
            if l < n {
                y = h[(n - 1, n - 1)];
                w = h[(n, n - 1)] * h[(n - 1, n)];
            }

            // Wilkinson's original ad hoc shift
            if iter == 10 {
                exshift += x;
                for i in 0..=n {
                    h[(i, i)] -= x;
                }
                s = h[(n, n - 1)].abs() + h[(n - 1, n - 2)].abs();
                x = 0.75 * s;
                y = x;
                w = -0.4375 * s * s;
            }

            // Second ad hoc shift
            if iter == 30 {
                s = (y - x) / 2.0;
                s = s * s + w;
                if s > 0.0 {
                    s = s.sqrt();
                    if y < x {
                        s = -s;
                    }
                    s = x - w / ((y - x) / 2.0 + s);
                    for i in 0..=n {
                        h[(i, i)] -= s;
                    }
                    exshift += s;
                    x = 0.964;
                    y = x;
                    w = x;
                }
            }

            iter += 1;

            // Look for two consecutive small sub-diagonal elements
            let mut m = n - 2;
            loop {
                z = h[(m, m)];
                r = x - z;
                s = y - z;
                p = (r * s - w) / h[(m + 1, m)] + h[(m, m + 1)];
                q = h[(m + 1, m + 1)] - z - r - s;
                r = h[(m + 2, m + 1)];
                s = p.abs() + q.abs() + r.abs();
                p /= s;
                q /= s;
                r /= s;
                if m == l {
                    break;
                }
                let lhs = h[(m, m - 1)].abs() * (q.abs() + r.abs());
                let rhs = EPS
                    * (p.abs() * (h[(m - 1, m - 1)].abs() + z.abs() + h[(m + 1, m + 1)].abs()));
                if lhs < rhs {
                    break;
                }
                m -= 1;
            }

            for i in (m + 2)..=n {
                h[(i, i - 2)] = 0.0;
                if i > m + 2 {
                    h[(i, i - 3)] = 0.0;
                }
            }

            // Double QR step involving rows l..=n and columns m..=n
            for k in m..n {
                let notlast = k != n - 1;
                if k != m {
                    p = h[(k, k - 1)];
                    q = h[(k + 1, k - 1)];
                    r = if notlast { h[(k + 2, k - 1)] } else { 0.0 };
                    x = p.abs() + q.abs() + r.abs();
                    if x == 0.0 {
                        continue;
                    }
                    p /= x;
                    q /= x;
                    r /= x;
                }

                s = (p * p + q * q + r * r).sqrt();
                if p < 0.0 {
                    s = -s;
                }
                if s == 0.0 {
                    continue;
                }

                if k != m {
                    h[(k, k - 1)] = -s * x;
                } else if l != m {
                    h[(k, k - 1)] = -h[(k, k - 1)];
                }
                p += s;
                x = p / s;
                y = q / s;
                z = r / s;
                q /= p;
                r /= p;

                // Row modification
                for j in k..nn {
                    p = h[(k, j)] + q * h[(k + 1, j)];
                    if notlast {
                        p += r * h[(k + 2, j)];
                        h[(k + 2, j)] -= p * z;
                    }
                    h[(k, j)] -= p * x;
                    h[(k + 1, j)] -= p * y;
                }

                // Column modification
                for i in 0..=n.min(k + 3) {
                    p = x * h[(i, k)] + y * h[(i, k + 1)];
                    if notlast {
                        p += z * h[(i, k + 2)];
                        h[(i, k + 2)] -= p * r;
                    }
                    h[(i, k)] -= p;
                    h[(i, k + 1)] -= p * q;
                }

                // Accumulate transformations
                for i in 0..=high {
                    p = x * v[(i, k)] + y * v[(i, k + 1)];
                    if notlast {
                        p += z * v[(i, k + 2)];
                        v[(i, k + 2)] -= p * r;
                    }
                    v[(i, k)] -= p;
                    v[(i, k + 1)] -= p * q;
                }
            }
        }
    }

    // Backsubstitute to find vectors of upper triangular form
    if norm == 0.0 {
        return;
    }

    for n in (0..nn).rev() {
        p = d[n];
        q = e[n];

        if q == 0.0 {
            // Real vector
            let mut l = n;
            h[(n, n)] = 1.0;
            for i in (0..n).rev() {
                w = h[(i, i)] - p;
                r = 0.0;
                for j in l..=n {
                    r += h[(i, j)] * h[(j, n)];
                }
                if e[i] < 0.0 {
                    z = w;
                    s = r;
                } else {
                    l = i;
                    if e[i] == 0.0 {
                        h[(i, n)] = if w != 0.0 { -r / w } else { -r / (EPS * norm) };
                    } else {
                        // Solve real equations
                        x = h[(i, i + 1)];
                        y = h[(i + 1, i)];
                        q = (d[i] - p) * (d[i] - p) + e[i] * e[i];
                        let t = (x * s - z * r) / q;
                        h[(i, n)] = t;
                        h[(i + 1, n)] = if x.abs() > z.abs() {
                            (-r - w * t) / x
                        } else {
                            (-s - y * t) / z
                        };
                    }

                    // Overflow control
                    let t = h[(i, n)].abs();
                    if (EPS * t) * t > 1.0 {
                        for j in i..=n {
                            h[(j, n)] /= t;
                        }
                    }
                }
            }
        } else if q < 0.0 {
            // Complex vector; the last vector component is imaginary so
            // the matrix is triangular
            let mut l = n - 1;
            if h[(n, n - 1)].abs() > h[(n - 1, n)].abs() {
                h[(n - 1, n - 1)] = q / h[(n, n - 1)];
                h[(n - 1, n)] = -(h[(n, n)] - p) / h[(n, n - 1)];
            } else {
                let (cr, ci) = cdiv(0.0, -h[(n - 1, n)], h[(n - 1, n - 1)] - p, q);
                h[(n - 1, n - 1)] = cr;
                h[(n - 1, n)] = ci;
            }
            h[(n, n - 1)] = 0.0;
            h[(n, n)] = 1.0;

            for i in (0..n.saturating_sub(1)).rev() {
                let mut ra = 0.0;
                let mut sa = 0.0;
                for j in l..=n {
                    ra += h[(i, j)] * h[(j, n - 1)];
                    sa += h[(i, j)] * h[(j, n)];
                }
                w = h[(i, i)] - p;

                if e[i] < 0.0 {
                    z = w;
                    r = ra;
                    s = sa;
                } else {
                    l = i;
                    if e[i] == 0.0 {
                        let (cr, ci) = cdiv(-ra, -sa, w, q);
                        h[(i, n - 1)] = cr;
                        h[(i, n)] = ci;
                    } else {
                        // Solve complex equations
                        x = h[(i, i + 1)];
                        y = h[(i + 1, i)];
                        let mut vr = (d[i] - p) * (d[i] - p) + e[i] * e[i] - q * q;
                        let vi = (d[i] - p) * 2.0 * q;
                        if vr == 0.0 && vi == 0.0 {
                            vr = EPS * norm * (w.abs() + q.abs() + x.abs() + y.abs() + z.abs());
                        }
                        let (cr, ci) =
                            cdiv(x * r - z * ra + q * sa, x * s - z * sa - q * ra, vr, vi);
                        h[(i, n - 1)] = cr;
                        h[(i, n)] = ci;
                        if x.abs() > z.abs() + q.abs() {
                            h[(i + 1, n - 1)] = (-ra - w * h[(i, n - 1)] + q * h[(i, n)]) / x;
                            h[(i + 1, n)] = (-sa - w * h[(i, n)] - q * h[(i, n - 1)]) / x;
                        } else {
                            let (cr, ci) =
                                cdiv(-r - y * h[(i, n - 1)], -s - y * h[(i, n)], z, q);
                            h[(i + 1, n - 1)] = cr;
                            h[(i + 1, n)] = ci;
                        }
                    }

                    // Overflow control
                    let t = h[(i, n - 1)].abs().max(h[(i, n)].abs());
                    if (EPS * t) * t > 1.0 {
                        for j in i..=n {
                            h[(j, n - 1)] /= t;
                            h[(j, n)] /= t;
                        }
                    }
                }
            }
        }
    }

    // Back transformation to get eigenvectors of the original matrix
    for j in (0..nn).rev() {
        for i in 0..=high {
            let mut acc = 0.0;
            for k in 0..=j.min(high) {
                acc += v[(i, k)] * h[(k, j)];
            }
            v[(i, j)] = acc;
        }
    }
}
