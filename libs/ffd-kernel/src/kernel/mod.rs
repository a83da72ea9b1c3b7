//! # FFD Kernel Context
//!
//! [`FfdKernel`] bundles one lattice, one mesh deformer and one volume
//! sampler sized from an [`FfdConfig`]. It is the owned replacement for
//! process-wide state: each instance is independent, and `&mut self` on
//! every mutation gives the exclusive access the evaluation loops assume.
//!
//! ## Typical Call Order
//!
//! ```text
//! write mesh vertices → snapshot_undeformed → rebuild
//!     → move control points → deform / sample_volume → read buffers
//! ```

use config::constants::FfdConfig;

use crate::core::{BoundingBox, PositionView, PositionViewMut, Vec3};
use crate::deformer::{DeformStats, DeformerState, MeshDeformer};
use crate::error::{FfdError, FfdResult};
use crate::lattice::{Axis, Lattice, SpanCounts};
use crate::param;
use crate::volume::{SampleStats, VolumeSampler};

/// An independent FFD instance: lattice, mesh buffers and volume buffers.
///
/// # Examples
/// ```
/// use ffd_kernel::{FfdKernel, SpanCounts, Vec3};
///
/// let mut kernel = FfdKernel::default();
/// kernel.load_mesh(&[Vec3::splat(0.5), Vec3::new(0.2, 0.9, 0.1)]).unwrap();
/// kernel.snapshot_undeformed();
/// kernel.rebuild(Vec3::ZERO, Vec3::ONE, SpanCounts::uniform(2)).unwrap();
///
/// // raise the centre control point
/// let centre = kernel.index(1, 1, 1).unwrap();
/// kernel.set_position(centre, Vec3::new(0.5, 0.5, 1.0)).unwrap();
/// kernel.deform().unwrap();
/// assert!(kernel.mesh_vertices().get(0).z > 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct FfdKernel {
    config: FfdConfig,
    lattice: Lattice,
    mesh: MeshDeformer,
    loaded_vertices: usize,
    volume: VolumeSampler,
}

impl Default for FfdKernel {
    fn default() -> Self {
        Self::build(FfdConfig::default())
    }
}

impl FfdKernel {
    /// Creates a kernel with buffers sized from `config`.
    ///
    /// # Errors
    /// [`FfdError::InvalidConfig`] when the configuration fails validation.
    pub fn new(config: FfdConfig) -> FfdResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: FfdConfig) -> Self {
        log::debug!(
            "allocating FFD kernel: {} control points, {} mesh vertices, volume spans {:?}",
            config.control_point_capacity,
            config.mesh_vertex_capacity,
            config.volume_span_counts
        );
        Self {
            lattice: Lattice::new(config.control_point_capacity),
            mesh: MeshDeformer::new(config.mesh_vertex_capacity).with_epsilon(config.epsilon),
            loaded_vertices: 0,
            volume: VolumeSampler::new(SpanCounts::from(config.volume_span_counts))
                .with_epsilon(config.epsilon),
            config,
        }
    }

    /// The configuration the kernel was built with.
    pub fn config(&self) -> &FfdConfig {
        &self.config
    }

    /// The lattice.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Mutable access to the lattice.
    pub fn lattice_mut(&mut self) -> &mut Lattice {
        &mut self.lattice
    }

    // -------------------------------------------------------------------------
    // Lattice
    // -------------------------------------------------------------------------

    /// Control point count along `axis`.
    pub fn control_point_count(&self, axis: Axis) -> usize {
        self.lattice.control_point_count(axis)
    }

    /// Total number of control points.
    pub fn total_control_points(&self) -> usize {
        self.lattice.total_control_points()
    }

    /// The undeformed lattice box.
    pub fn bounding_box(&self) -> BoundingBox {
        self.lattice.bounding_box()
    }

    /// Linear index of control point (i, j, k).
    ///
    /// # Errors
    /// [`FfdError::TernaryOutOfRange`] for components outside the lattice.
    pub fn index(&self, i: usize, j: usize, k: usize) -> FfdResult<usize> {
        self.lattice.checked_index(i, j, k)
    }

    /// Position of the control point at linear `index`.
    ///
    /// # Errors
    /// [`FfdError::IndexOutOfRange`] when `index` is not a control point.
    pub fn position(&self, index: usize) -> FfdResult<Vec3> {
        self.lattice.position(index)
    }

    /// Moves the control point at linear `index`.
    ///
    /// # Errors
    /// [`FfdError::IndexOutOfRange`] when `index` is not a control point.
    pub fn set_position(&mut self, index: usize, position: Vec3) -> FfdResult<()> {
        self.lattice.set_position(index, position)
    }

    /// Position of control point (i, j, k).
    ///
    /// # Errors
    /// [`FfdError::TernaryOutOfRange`] for components outside the lattice.
    pub fn position_at(&self, i: usize, j: usize, k: usize) -> FfdResult<Vec3> {
        self.lattice.position_at(i, j, k)
    }

    /// Moves control point (i, j, k).
    ///
    /// # Errors
    /// [`FfdError::TernaryOutOfRange`] for components outside the lattice.
    pub fn set_position_at(&mut self, i: usize, j: usize, k: usize, position: Vec3) -> FfdResult<()> {
        self.lattice.set_position_at(i, j, k, position)
    }

    /// Rebuilds the lattice; see [`Lattice::rebuild`].
    ///
    /// # Errors
    /// [`FfdError::InvalidSpanCount`] or [`FfdError::CapacityExceeded`].
    pub fn rebuild(&mut self, box_min: Vec3, box_max: Vec3, spans: SpanCounts) -> FfdResult<bool> {
        self.lattice.rebuild(box_min, box_max, spans)
    }

    /// Rebuilds the lattice around the vertices of the last
    /// [`FfdKernel::load_mesh`] call, with the box corners multiplied by
    /// `scale` (1.0 for a model shown at its natural size).
    ///
    /// Vertices written directly through [`FfdKernel::mesh_vertices_mut`] are
    /// not counted. With no mesh loaded the box collapses to the origin.
    ///
    /// # Errors
    /// As [`FfdKernel::rebuild`].
    pub fn rebuild_around_mesh(&mut self, spans: SpanCounts, scale: f64) -> FfdResult<bool> {
        let view = self.mesh.vertices();
        let points: Vec<Vec3> = (0..self.loaded_vertices).map(|index| view.get(index)).collect();
        let bbox = BoundingBox::from_points(&points).unwrap_or_default();
        self.lattice.rebuild_from_box(bbox.scaled(scale), spans)
    }

    /// Deforms a single world-space point.
    ///
    /// # Errors
    /// [`FfdError::DegenerateLattice`] for a collapsed lattice box.
    pub fn eval_world(&self, world: Vec3) -> FfdResult<Vec3> {
        param::eval_world(&self.lattice, world)
    }

    // -------------------------------------------------------------------------
    // Mesh
    // -------------------------------------------------------------------------

    /// Copies `positions` into the front of the mesh buffer and zeroes the
    /// remaining slots, so nothing is left over from an earlier, larger load.
    ///
    /// # Errors
    /// [`FfdError::CapacityExceeded`] when there are more positions than
    /// mesh vertex slots. The buffer is untouched in that case.
    pub fn load_mesh(&mut self, positions: &[Vec3]) -> FfdResult<()> {
        let capacity = self.mesh.vertex_count();
        if positions.len() > capacity {
            return Err(FfdError::CapacityExceeded {
                what: "mesh vertices",
                requested: positions.len(),
                capacity,
            });
        }
        let mut view = self.mesh.vertices_mut();
        for index in 0..capacity {
            view.set(index, positions.get(index).copied().unwrap_or(Vec3::ZERO));
        }
        self.loaded_vertices = positions.len();
        log::debug!("loaded {} of {} mesh vertices", positions.len(), capacity);
        Ok(())
    }

    /// Number of vertices supplied by the last [`FfdKernel::load_mesh`].
    pub fn loaded_vertex_count(&self) -> usize {
        self.loaded_vertices
    }

    /// Captures the current mesh positions as the undeformed snapshot.
    pub fn snapshot_undeformed(&mut self) {
        self.mesh.snapshot_undeformed();
    }

    /// Snapshot state of the mesh deformer.
    pub fn mesh_state(&self) -> DeformerState {
        self.mesh.state()
    }

    /// Current mesh vertex positions.
    pub fn mesh_vertices(&self) -> PositionView<'_> {
        self.mesh.vertices()
    }

    /// Mutable mesh vertex positions.
    pub fn mesh_vertices_mut(&mut self) -> PositionViewMut<'_> {
        self.mesh.vertices_mut()
    }

    /// Deforms the mesh through the lattice.
    ///
    /// # Errors
    /// [`FfdError::NotSnapshotted`] or [`FfdError::DegenerateLattice`].
    pub fn deform(&mut self) -> FfdResult<DeformStats> {
        self.mesh.deform(&self.lattice)
    }

    /// Parallel variant of [`FfdKernel::deform`].
    ///
    /// # Errors
    /// As [`FfdKernel::deform`].
    pub fn deform_parallel(&mut self) -> FfdResult<DeformStats> {
        self.mesh.deform_parallel(&self.lattice)
    }

    // -------------------------------------------------------------------------
    // Volume
    // -------------------------------------------------------------------------

    /// Volume sample positions.
    pub fn volume_samples(&self) -> PositionView<'_> {
        self.volume.samples()
    }

    /// Mutable volume sample positions.
    pub fn volume_samples_mut(&mut self) -> PositionViewMut<'_> {
        self.volume.samples_mut()
    }

    /// The volume sampler.
    pub fn volume(&self) -> &VolumeSampler {
        &self.volume
    }

    /// Evaluates the lattice over the volume grid.
    pub fn sample_volume(&mut self) -> SampleStats {
        self.volume.sample_volume(&self.lattice)
    }
}
