//! Tests for world to parameter conversion.

use approx::assert_abs_diff_eq;

use super::*;
use crate::lattice::SpanCounts;

fn lattice_over(min: Vec3, max: Vec3, spans: SpanCounts) -> Lattice {
    let mut lattice = Lattice::new(64);
    lattice.rebuild(min, max, spans).expect("rebuild");
    lattice
}

#[test]
fn box_corners_map_to_unit_cube_corners() {
    let lattice = lattice_over(Vec3::new(-2.0, 1.0, 0.5), Vec3::new(2.0, 3.0, 4.5), SpanCounts::uniform(2));
    assert_eq!(world_to_param(&lattice, Vec3::new(-2.0, 1.0, 0.5)).expect("valid"), Vec3::ZERO);
    assert_eq!(world_to_param(&lattice, Vec3::new(2.0, 3.0, 4.5)).expect("valid"), Vec3::ONE);
}

#[test]
fn points_outside_box_map_outside_unit_cube() {
    let lattice = lattice_over(Vec3::ZERO, Vec3::splat(10.0), SpanCounts::uniform(1));
    let p = world_to_param(&lattice, Vec3::new(-5.0, 15.0, 5.0)).expect("valid");
    assert_abs_diff_eq!(p.x, -0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(p.y, 1.5, epsilon = 1e-12);
    assert_abs_diff_eq!(p.z, 0.5, epsilon = 1e-12);
}

#[test]
fn flat_box_is_degenerate_on_that_axis() {
    let lattice = lattice_over(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0), SpanCounts::uniform(1));
    let err = world_to_param(&lattice, Vec3::splat(0.5)).unwrap_err();
    assert_eq!(err, FfdError::DegenerateLattice { axis: Axis::T });
}

#[test]
fn unbuilt_lattice_is_degenerate() {
    let lattice = Lattice::new(27);
    assert_eq!(
        ParamFrame::new(&lattice).unwrap_err(),
        FfdError::DegenerateLattice { axis: Axis::S }
    );
}

#[test]
fn inverted_box_still_converts() {
    // max < min flips the axes but keeps the frame invertible
    let lattice = lattice_over(Vec3::ONE, Vec3::ZERO, SpanCounts::uniform(1));
    let p = world_to_param(&lattice, Vec3::splat(0.25)).expect("valid");
    assert!(p.abs_diff_eq(Vec3::splat(0.75), 1e-12));
}

#[test]
fn eval_world_is_identity_for_uniform_lattice() {
    let lattice = lattice_over(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 2.0, 3.0), SpanCounts::new(2, 1, 3));
    let world = Vec3::new(0.3, 1.1, -0.4);
    let deformed = eval_world(&lattice, world).expect("valid");
    assert!(deformed.abs_diff_eq(world, 1e-12));
}
