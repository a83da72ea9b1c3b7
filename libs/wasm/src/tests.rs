//! Tests for the WASM-facing handle helpers.

use super::*;

fn rebuilt(spans: [usize; 3]) -> FfdHandle {
    let mut handle = FfdHandle::new();
    handle
        .rebuild_lattice_internal([0.0; 3], [2.0; 3], spans)
        .expect("rebuild succeeds");
    handle
}

/// The default handle matches the reference sizing.
#[test]
fn default_handle_sizing() {
    let handle = FfdHandle::new();
    assert_eq!(handle.model_vertex_count(), 2048);
    assert_eq!(handle.volume_point_count(), 4913);
    assert_eq!(handle.get_total_ctrl_pt_count(), 0);
}

#[test]
fn rebuild_reports_counts_and_box() {
    let handle = rebuilt([2, 2, 2]);
    assert_eq!(handle.get_total_ctrl_pt_count(), 27);
    for direction in 0..3 {
        assert_eq!(handle.control_point_count_internal(direction).expect("valid axis"), 3);
    }
    assert_eq!(handle.bbox_min_x(), 0.0);
    assert_eq!(handle.bbox_max_z(), 2.0);
    assert_eq!(handle.position_internal(13).expect("in range"), Vec3::ONE);
}

#[test]
fn invalid_direction_is_rejected() {
    let handle = rebuilt([1, 1, 1]);
    assert_eq!(
        handle.control_point_count_internal(3).unwrap_err(),
        FfdError::IndexOutOfRange { index: 3, len: 3 }
    );
}

#[test]
fn oversized_rebuild_is_rejected() {
    let mut handle = FfdHandle::new();
    let err = handle
        .rebuild_lattice_internal([0.0; 3], [1.0; 3], [3, 3, 3])
        .unwrap_err();
    assert!(matches!(err, FfdError::CapacityExceeded { requested: 64, .. }));
}

#[test]
fn config_json_overrides_sizing() {
    let handle = FfdHandle::with_config_json_internal(
        r#"{"control_point_capacity": 64, "mesh_vertex_capacity": 16, "volume_span_counts": [4, 4, 4]}"#,
    )
    .expect("valid config");
    assert_eq!(handle.model_vertex_count(), 16);
    assert_eq!(handle.volume_point_count(), 125);
    assert_eq!(handle.kernel().lattice().capacity(), 64);
}

#[test]
fn config_json_errors_are_explicit() {
    let err = FfdHandle::with_config_json_internal("{not json").unwrap_err();
    assert!(matches!(err, BindingError::ConfigJson(_)));

    let err = FfdHandle::with_config_json_internal(r#"{"mesh_vertex_capacity": 0}"#).unwrap_err();
    assert!(matches!(err, BindingError::Kernel(FfdError::InvalidConfig(_))));
}

#[test]
fn model_verts_must_line_up() {
    let mut handle = FfdHandle::new();
    let err = handle
        .set_model_verts_internal(&[0.0, 1.0], &[0.0], &[0.0, 1.0])
        .unwrap_err();
    assert!(matches!(err, BindingError::MismatchedBuffers { x: 2, y: 1, z: 2 }));
}

/// Full host flow: load, snapshot, rebuild, move a point, deform.
#[test]
fn deform_flow_moves_model_vertices() {
    let mut handle = FfdHandle::new();
    handle
        .set_model_verts_internal(&[1.0], &[1.0], &[1.0])
        .expect("fits");
    assert!(matches!(handle.deform_internal(), Err(FfdError::NotSnapshotted)));

    handle.store_undeformed_verts();
    handle
        .rebuild_lattice_internal([0.0; 3], [2.0; 3], [1, 1, 1])
        .expect("rebuild succeeds");
    assert_eq!(handle.deform_internal().expect("deform"), 0);

    // moving the far corner by (2, 2, 2) moves the centre by an eighth of it
    let corner = handle.kernel().index(1, 1, 1).expect("in range");
    handle
        .kernel
        .set_position(corner, Vec3::splat(4.0))
        .expect("in range");
    assert_eq!(handle.deform_internal().expect("deform"), 1);
    assert_eq!(handle.kernel().mesh_vertices().get(0), Vec3::splat(1.25));
}

#[test]
fn volume_points_follow_lattice() {
    let mut handle = rebuilt([1, 1, 1]);
    let written = handle.eval_volume_points();
    // every sample except the origin moves off zero
    assert_eq!(written, 4912);
    assert_eq!(handle.eval_volume_points(), 0);
}

#[test]
fn lattice_edges_are_flattened_pairs() {
    let handle = rebuilt([1, 1, 1]);
    let edges = handle.lattice_edges();
    assert_eq!(edges.len(), 24);
    assert!(edges.iter().all(|&index| index < 8));
}

#[test]
fn lattice_info_serializes_vectors_as_arrays() {
    let handle = rebuilt([2, 1, 1]);
    let info = handle.lattice_info();
    assert_eq!(info.counts, [3, 2, 2]);
    assert_eq!(info.total, 12);

    let json = serde_json::to_value(&info).expect("serializable");
    assert_eq!(json["spans"], serde_json::json!([2, 1, 1]));
    assert_eq!(json["bbox_max"], serde_json::json!([2.0, 2.0, 2.0]));
}

#[test]
fn rebuild_around_model_uses_loaded_vertices_and_scale() {
    let mut handle = FfdHandle::new();
    handle
        .set_model_verts_internal(&[1.0, 2.0], &[1.0, 3.0], &[1.0, 4.0])
        .expect("fits");
    handle
        .rebuild_around_model_internal([1, 1, 1], 3.0)
        .expect("rebuild succeeds");
    assert_eq!(handle.bbox_min_x(), 3.0);
    assert_eq!(handle.bbox_max_y(), 9.0);
    assert_eq!(handle.bbox_max_z(), 12.0);
    assert_eq!(handle.get_total_ctrl_pt_count(), 8);
}
