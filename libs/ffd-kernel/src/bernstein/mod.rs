//! # Bernstein Evaluator
//!
//! Univariate Bernstein basis functions and the trivariate tensor-product
//! (Bezier volume) evaluation over a [`Lattice`].
//!
//! ```text
//! B(n, k, u) = C(n, k) * (1 - u)^(n - k) * u^k
//! P(s, t, u) = Σi Σj Σk  B(nS, i, s) * B(nT, j, t) * B(nU, k, u) * Pijk
//! ```
//!
//! Parameters are not clamped: evaluating outside [0, 1] extrapolates the
//! polynomial.

use crate::core::Vec3;
use crate::lattice::Lattice;

/// Binomial coefficient `n! / (k! (n - k)!)`, or `0` when `k > n`.
///
/// Uses the multiplicative formula so large degrees do not overflow an
/// intermediate factorial. Exact while the result fits in 53 bits.
///
/// # Examples
/// ```
/// use ffd_kernel::bernstein::binomial;
/// assert_eq!(binomial(4, 2), 6.0);
/// assert_eq!(binomial(20, 10), 184_756.0);
/// assert_eq!(binomial(3, 5), 0.0);
/// ```
pub fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (1..=k).fold(1.0, |c, i| c * (n - k + i) as f64 / i as f64)
}

/// Bernstein basis polynomial of degree `n`, index `k`, at `u`.
///
/// # Examples
/// ```
/// use ffd_kernel::bernstein::bernstein;
/// assert_eq!(bernstein(2, 1, 0.5), 0.5);
/// assert_eq!(bernstein(3, 0, 0.0), 1.0);
/// ```
#[inline]
pub fn bernstein(n: usize, k: usize, u: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    binomial(n, k) * (1.0 - u).powi((n - k) as i32) * u.powi(k as i32)
}

/// All `n + 1` basis values of degree `n` at `u`.
///
/// # Examples
/// ```
/// use ffd_kernel::bernstein::basis;
/// assert_eq!(basis(2, 0.5), vec![0.25, 0.5, 0.25]);
/// ```
pub fn basis(n: usize, u: f64) -> Vec<f64> {
    (0..=n).map(|k| bernstein(n, k, u)).collect()
}

/// Evaluates the lattice's Bezier volume at (s, t, u).
///
/// Basis values are computed once per axis, then partial sums are
/// accumulated over U, then T, then S. An unbuilt lattice evaluates to the
/// origin.
///
/// # Examples
/// ```
/// use ffd_kernel::{bernstein::eval_trivariate, Lattice, SpanCounts, Vec3};
/// let mut lattice = Lattice::new(8);
/// lattice.rebuild(Vec3::ZERO, Vec3::ONE, SpanCounts::uniform(1)).unwrap();
/// assert_eq!(eval_trivariate(&lattice, 0.0, 0.0, 0.0), Vec3::ZERO);
/// assert_eq!(eval_trivariate(&lattice, 1.0, 1.0, 1.0), Vec3::ONE);
/// ```
pub fn eval_trivariate(lattice: &Lattice, s: f64, t: f64, u: f64) -> Vec3 {
    if !lattice.is_built() {
        return Vec3::ZERO;
    }
    let spans = lattice.spans();
    let weights_s = basis(spans.s, s);
    let weights_t = basis(spans.t, t);
    let weights_u = basis(spans.u, u);

    let [_, count_t, count_u] = lattice.control_point_counts();
    let points = lattice.control_points();

    let mut result = Vec3::ZERO;
    for (i, &ws) in weights_s.iter().enumerate() {
        let mut along_t = Vec3::ZERO;
        for (j, &wt) in weights_t.iter().enumerate() {
            let start = (i * count_t + j) * count_u;
            let row = &points[start..start + count_u];
            let along_u = row
                .iter()
                .zip(&weights_u)
                .fold(Vec3::ZERO, |acc, (&p, &wu)| acc + p * wu);
            along_t += along_u * wt;
        }
        result += along_t * ws;
    }
    result
}

#[cfg(test)]
mod tests;
