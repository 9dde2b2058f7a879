//! Tolerances and iteration limits shared by the decompositions.
//!
//! The defaults are tuned for `f64`. Every decomposition has a `new`
//! constructor using [`DecompositionConfig::default`] and a `with_config`
//! constructor taking an explicit configuration.

/// Numerical knobs for the matrix decompositions.
///
/// ```
/// # use densa_core::DecompositionConfig;
/// let cfg = DecompositionConfig::default().with_max_iterations(200);
/// assert_eq!(cfg.max_iterations, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecompositionConfig {
    /// Maximum number of QR/QL sweeps spent on one deflated block before
    /// the trailing off-diagonal element is forced to zero.
    ///
    /// The non-symmetric eigenvalue iteration applies exceptional shifts
    /// at sweeps 10 and 30, so values at or below 30 skip some of them.
    pub max_iterations: usize,

    /// Multiplier on `eps * max(m, n) * scale` below which an LU pivot or
    /// a diagonal entry of QR's `R` counts as zero.
    pub singularity_factor: f64,

    /// Multiplier on the SVD rank tolerance `max(m, n) * s[0] * eps`.
    pub rank_factor: f64,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            max_iterations: 75,
            singularity_factor: 10.0,
            rank_factor: 1.0,
        }
    }
}

impl DecompositionConfig {
    /// Set [`max_iterations`](Self::max_iterations).
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set [`singularity_factor`](Self::singularity_factor).
    #[must_use]
    pub fn with_singularity_factor(mut self, factor: f64) -> Self {
        self.singularity_factor = factor;
        self
    }

    /// Set [`rank_factor`](Self::rank_factor).
    #[must_use]
    pub fn with_rank_factor(mut self, factor: f64) -> Self {
        self.rank_factor = factor;
        self
    }

    /// Whether `value` is negligible relative to `scale` for an
    /// `m x n` factorization.
    pub(crate) fn is_negligible(&self, value: f64, scale: f64, m: usize, n: usize) -> bool {
        let dim = m.max(n).max(1) as f64;
        value.abs() <= self.singularity_factor * f64::EPSILON * dim * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let cfg = DecompositionConfig::default()
            .with_max_iterations(10)
            .with_singularity_factor(100.0)
            .with_rank_factor(2.0);
        assert_eq!(cfg.max_iterations, 10);
        assert!((cfg.singularity_factor - 100.0).abs() < f64::EPSILON);
        assert!((cfg.rank_factor - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_is_negligible() {
        let cfg = DecompositionConfig::default();
        assert!(cfg.is_negligible(0.0, 0.0, 3, 3));
        assert!(cfg.is_negligible(1e-16, 1.0, 3, 3));
        assert!(!cfg.is_negligible(1e-10, 1.0, 3, 3));
        assert!(!cfg.is_negligible(1e-3, 1e3, 3, 3));
    }
}
