//! Tests for the mesh deformer state machine and write policy.

use super::*;
use crate::lattice::SpanCounts;

fn unit_lattice(spans: usize) -> Lattice {
    let mut lattice = Lattice::new(64);
    lattice
        .rebuild(Vec3::ZERO, Vec3::ONE, SpanCounts::uniform(spans))
        .expect("rebuild");
    lattice
}

fn sample_vertices() -> Vec<Vec3> {
    (0..27)
        .map(|n| {
            let (i, j, k) = (n / 9, (n / 3) % 3, n % 3);
            Vec3::new(i as f64 * 0.4 + 0.1, j as f64 * 0.45, k as f64 * 0.3 + 0.2)
        })
        .collect()
}

#[test]
fn new_deformer_is_uninitialized_and_zeroed() {
    let mesh = MeshDeformer::new(16);
    assert_eq!(mesh.state(), DeformerState::Uninitialized);
    assert_eq!(mesh.vertex_count(), 16);
    assert!(mesh.vertices().x.iter().all(|&x| x == 0.0));
}

#[test]
fn deform_before_snapshot_is_rejected() {
    let lattice = unit_lattice(1);
    let mut mesh = MeshDeformer::from_positions(&sample_vertices());
    assert_eq!(mesh.deform(&lattice).unwrap_err(), FfdError::NotSnapshotted);
    assert_eq!(mesh.deform_parallel(&lattice).unwrap_err(), FfdError::NotSnapshotted);
}

#[test]
fn snapshot_copies_current_into_undeformed() {
    let mut mesh = MeshDeformer::from_positions(&sample_vertices());
    mesh.snapshot_undeformed();
    assert_eq!(mesh.state(), DeformerState::Ready);
    for index in 0..mesh.vertex_count() {
        assert_eq!(mesh.undeformed().get(index), mesh.vertices().get(index));
    }
}

#[test]
fn identity_lattice_is_a_fixed_point() {
    let lattice = unit_lattice(2);
    let vertices = sample_vertices();
    let mut mesh = MeshDeformer::from_positions(&vertices);
    mesh.snapshot_undeformed();

    let stats = mesh.deform(&lattice).expect("deform");
    assert_eq!(stats.written, 0);
    assert_eq!(stats.total(), vertices.len());
    for (index, v) in vertices.iter().enumerate() {
        assert!(positions_match(mesh.vertices().get(index), *v, CHANGE_EPSILON));
    }
}

#[test]
fn second_deform_with_same_lattice_writes_nothing() {
    let mut lattice = unit_lattice(2);
    let mut mesh = MeshDeformer::from_positions(&sample_vertices());
    mesh.snapshot_undeformed();

    let centre = lattice.index(1, 1, 1);
    lattice.set_position(centre, Vec3::new(0.5, 0.5, 1.5)).expect("in range");

    let first = mesh.deform(&lattice).expect("deform");
    assert!(first.written > 0);
    let second = mesh.deform(&lattice).expect("deform");
    assert_eq!(second.written, 0);
}

#[test]
fn deform_reads_snapshot_not_current() {
    let mut lattice = unit_lattice(1);
    let mut mesh = MeshDeformer::from_positions(&[Vec3::splat(0.5)]);
    mesh.snapshot_undeformed();

    // overwrite current after the snapshot; deform must ignore it
    mesh.vertices_mut().set(0, Vec3::splat(100.0));
    lattice.reset();
    mesh.deform(&lattice).expect("deform");
    assert!(mesh.vertices().get(0).abs_diff_eq(Vec3::splat(0.5), 1e-12));
}

#[test]
fn degenerate_lattice_leaves_vertices_untouched() {
    let mut lattice = Lattice::new(8);
    lattice
        .rebuild(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0), SpanCounts::uniform(1))
        .expect("rebuild");
    let vertices = sample_vertices();
    let mut mesh = MeshDeformer::from_positions(&vertices);
    mesh.snapshot_undeformed();

    assert!(matches!(mesh.deform(&lattice), Err(FfdError::DegenerateLattice { .. })));
    assert_eq!(mesh.vertices().get(3), vertices[3]);
}

#[test]
fn parallel_deform_matches_sequential() {
    let mut lattice = unit_lattice(2);
    lattice.set_position(4, Vec3::new(-0.3, 0.6, 0.2)).expect("in range");
    lattice.set_position(22, Vec3::new(1.2, 1.4, 0.9)).expect("in range");

    let vertices = sample_vertices();
    let mut sequential = MeshDeformer::from_positions(&vertices);
    let mut parallel = MeshDeformer::from_positions(&vertices);
    sequential.snapshot_undeformed();
    parallel.snapshot_undeformed();

    let a = sequential.deform(&lattice).expect("deform");
    let b = parallel.deform_parallel(&lattice).expect("deform");
    assert_eq!(a, b);
    assert_eq!(sequential.vertices().x, parallel.vertices().x);
    assert_eq!(sequential.vertices().y, parallel.vertices().y);
    assert_eq!(sequential.vertices().z, parallel.vertices().z);
}

#[test]
fn larger_epsilon_suppresses_small_moves() {
    let mut lattice = unit_lattice(1);
    let mut mesh = MeshDeformer::from_positions(&[Vec3::ONE]).with_epsilon(0.1);
    mesh.snapshot_undeformed();

    lattice.set_position(7, Vec3::splat(1.05)).expect("in range");
    assert_eq!(mesh.deform(&lattice).expect("deform").written, 0);

    lattice.set_position(7, Vec3::splat(1.5)).expect("in range");
    assert_eq!(mesh.deform(&lattice).expect("deform").written, 1);
}
