//! Tests for the Bernstein basis and trivariate evaluation.

use approx::assert_abs_diff_eq;

use super::*;
use crate::lattice::SpanCounts;

/// Pascal's triangle rows come out exactly.
#[test]
fn binomial_matches_pascal_rows() {
    assert_eq!(binomial(0, 0), 1.0);
    assert_eq!((0..=4).map(|k| binomial(4, k)).collect::<Vec<_>>(), vec![1.0, 4.0, 6.0, 4.0, 1.0]);
    assert_eq!(binomial(5, 2), binomial(5, 3));
}

/// Degrees beyond 12 overflow a 32-bit factorial; the multiplicative form
/// stays exact.
#[test]
fn binomial_handles_high_degree() {
    assert_eq!(binomial(13, 6), 1716.0);
    assert_eq!(binomial(30, 15), 155_117_520.0);
    assert_eq!(binomial(50, 1), 50.0);
}

/// Σk B(n, k, u) = 1 on [0, 1] for several degrees.
#[test]
fn basis_is_partition_of_unity() {
    for n in 0..=8 {
        for step in 0..=20 {
            let u = step as f64 / 20.0;
            let sum: f64 = basis(n, u).iter().sum();
            assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-12);
        }
    }
}

/// Outside [0, 1] the basis still sums to one (polynomial identity) but
/// individual values may go negative.
#[test]
fn basis_extrapolates_outside_unit_interval() {
    let values = basis(2, 1.5);
    assert_abs_diff_eq!(values.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    assert!(values.iter().any(|&v| v < 0.0));
}

/// At the endpoints only the first or last basis function is non-zero.
#[test]
fn basis_interpolates_endpoints() {
    assert_eq!(basis(3, 0.0), vec![1.0, 0.0, 0.0, 0.0]);
    assert_eq!(basis(3, 1.0), vec![0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn bernstein_out_of_range_index_is_zero() {
    assert_eq!(bernstein(2, 3, 0.5), 0.0);
}

/// An unbuilt lattice has no control points to weigh.
#[test]
fn eval_on_unbuilt_lattice_is_origin() {
    let lattice = Lattice::new(27);
    assert_eq!(eval_trivariate(&lattice, 0.3, 0.3, 0.3), Vec3::ZERO);
}

/// The factored sum agrees with the naive triple sum.
#[test]
fn eval_matches_naive_triple_sum() {
    let mut lattice = Lattice::new(64);
    lattice
        .rebuild(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 1.0, 5.0), SpanCounts::new(3, 1, 2))
        .expect("rebuild");
    // bend a few control points
    lattice.set_position(5, Vec3::new(0.5, 2.0, -1.0)).expect("in range");
    lattice.set_position(17, Vec3::new(4.0, 4.0, 4.0)).expect("in range");

    let (s, t, u) = (0.3, 0.8, 0.55);
    let spans = lattice.spans();
    let [cs, ct, cu] = lattice.control_point_counts();
    let mut naive = Vec3::ZERO;
    for i in 0..cs {
        for j in 0..ct {
            for k in 0..cu {
                let w = bernstein(spans.s, i, s) * bernstein(spans.t, j, t) * bernstein(spans.u, k, u);
                naive += lattice.control_points()[lattice.index(i, j, k)] * w;
            }
        }
    }
    let fast = eval_trivariate(&lattice, s, t, u);
    assert!(fast.abs_diff_eq(naive, 1e-12), "{fast:?} != {naive:?}");
}

/// An undisplaced lattice reproduces the linear map from parameters to the box.
#[test]
fn eval_on_uniform_lattice_is_linear() {
    let mut lattice = Lattice::new(27);
    lattice
        .rebuild(Vec3::new(1.0, 2.0, 3.0), Vec3::new(5.0, 4.0, 9.0), SpanCounts::new(2, 1, 2))
        .expect("rebuild");
    let p = eval_trivariate(&lattice, 0.25, 0.5, 0.75);
    assert!(p.abs_diff_eq(Vec3::new(2.0, 3.0, 7.5), 1e-12));
}
