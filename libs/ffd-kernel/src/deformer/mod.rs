//! # Mesh Deformer
//!
//! Holds a fixed-size vertex buffer together with an undeformed snapshot of
//! it. Each [`MeshDeformer::deform`] call re-evaluates every snapshot vertex
//! through the lattice and writes the result into the current buffer.
//!
//! ## State Machine
//!
//! ```text
//! Uninitialized --snapshot_undeformed()--> Ready --snapshot_undeformed()--> Ready
//! ```
//!
//! `deform` is only accepted in the `Ready` state.

use config::constants::CHANGE_EPSILON;
use rayon::prelude::*;

use crate::core::vec3::positions_match;
use crate::core::{PositionBuffers, PositionView, PositionViewMut, Vec3};
use crate::error::{FfdError, FfdResult};
use crate::lattice::Lattice;
use crate::param::ParamFrame;

/// Whether the undeformed snapshot has been captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeformerState {
    /// No snapshot yet; `deform` is rejected.
    Uninitialized,
    /// Snapshot captured; `deform` maps it through the lattice.
    Ready,
}

/// Outcome of one deformation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeformStats {
    /// Vertices whose current position was overwritten.
    pub written: usize,
    /// Vertices already within tolerance of their deformed position.
    pub unchanged: usize,
}

impl DeformStats {
    /// Total number of vertices visited.
    pub fn total(&self) -> usize {
        self.written + self.unchanged
    }
}

/// Deforms a fixed-size vertex buffer through a lattice.
///
/// # Examples
/// ```
/// use ffd_kernel::{Lattice, MeshDeformer, SpanCounts, Vec3};
///
/// let mut lattice = Lattice::new(8);
/// lattice.rebuild(Vec3::ZERO, Vec3::ONE, SpanCounts::uniform(1)).unwrap();
///
/// let mut mesh = MeshDeformer::from_positions(&[Vec3::ONE, Vec3::splat(0.5)]);
/// mesh.snapshot_undeformed();
///
/// // pull the far corner outwards
/// lattice.set_position(7, Vec3::splat(2.0)).unwrap();
/// let stats = mesh.deform(&lattice).unwrap();
/// assert_eq!(stats.written, 2);
/// assert_eq!(mesh.vertices().get(0), Vec3::splat(2.0));
/// ```
#[derive(Debug, Clone)]
pub struct MeshDeformer {
    current: PositionBuffers,
    undeformed: PositionBuffers,
    state: DeformerState,
    epsilon: f64,
}

impl MeshDeformer {
    /// Creates a deformer with `vertex_count` vertices at the origin.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            current: PositionBuffers::zeroed(vertex_count),
            undeformed: PositionBuffers::zeroed(vertex_count),
            state: DeformerState::Uninitialized,
            epsilon: CHANGE_EPSILON,
        }
    }

    /// Creates a deformer whose current buffer holds `positions`.
    ///
    /// The snapshot is not taken; call [`MeshDeformer::snapshot_undeformed`].
    pub fn from_positions(positions: &[Vec3]) -> Self {
        Self {
            current: PositionBuffers::from_points(positions),
            undeformed: PositionBuffers::zeroed(positions.len()),
            state: DeformerState::Uninitialized,
            epsilon: CHANGE_EPSILON,
        }
    }

    /// Replaces the "unchanged" tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.current.len()
    }

    /// Current snapshot state.
    #[inline]
    pub fn state(&self) -> DeformerState {
        self.state
    }

    /// Current (possibly deformed) vertex positions.
    pub fn vertices(&self) -> PositionView<'_> {
        self.current.view()
    }

    /// Mutable access to the current vertex positions.
    ///
    /// Hosts fill this before [`MeshDeformer::snapshot_undeformed`].
    pub fn vertices_mut(&mut self) -> PositionViewMut<'_> {
        self.current.view_mut()
    }

    /// The captured undeformed positions.
    pub fn undeformed(&self) -> PositionView<'_> {
        self.undeformed.view()
    }

    /// Copies the current positions into the undeformed buffer and marks the
    /// deformer ready. Calling it again re-baselines the snapshot.
    pub fn snapshot_undeformed(&mut self) {
        self.undeformed.copy_from(&self.current);
        self.state = DeformerState::Ready;
        log::debug!("captured undeformed snapshot of {} vertices", self.vertex_count());
    }

    fn frame_for(&self, lattice: &Lattice) -> FfdResult<ParamFrame> {
        if self.state != DeformerState::Ready {
            return Err(FfdError::NotSnapshotted);
        }
        ParamFrame::new(lattice)
    }

    /// Maps every undeformed vertex through `lattice` and stores the result
    /// in the current buffer, skipping vertices already within tolerance.
    ///
    /// With an unchanged lattice, a second call writes nothing.
    ///
    /// # Errors
    /// - [`FfdError::NotSnapshotted`] before the first snapshot
    /// - [`FfdError::DegenerateLattice`] for a collapsed lattice box
    ///
    /// Nothing is written when an error is returned.
    pub fn deform(&mut self, lattice: &Lattice) -> FfdResult<DeformStats> {
        let frame = self.frame_for(lattice)?;
        let mut stats = DeformStats::default();
        for index in 0..self.vertex_count() {
            let deformed = frame.eval_world(lattice, self.undeformed.get(index));
            if positions_match(deformed, self.current.get(index), self.epsilon) {
                stats.unchanged += 1;
                continue;
            }
            self.current.set(index, deformed);
            stats.written += 1;
        }
        log::trace!(
            "deformed mesh: {} written, {} unchanged",
            stats.written,
            stats.unchanged
        );
        Ok(stats)
    }

    /// Same as [`MeshDeformer::deform`], evaluating vertices across the
    /// rayon thread pool. Produces identical positions.
    ///
    /// # Errors
    /// See [`MeshDeformer::deform`].
    pub fn deform_parallel(&mut self, lattice: &Lattice) -> FfdResult<DeformStats> {
        let frame = self.frame_for(lattice)?;
        let epsilon = self.epsilon;
        let undeformed = self.undeformed.view();
        let current = self.current.view_mut();

        let written = current
            .x
            .par_iter_mut()
            .zip(current.y.par_iter_mut())
            .zip(current.z.par_iter_mut())
            .enumerate()
            .filter_map(|(index, ((x, y), z))| {
                let deformed = frame.eval_world(lattice, undeformed.get(index));
                if positions_match(deformed, Vec3::new(*x, *y, *z), epsilon) {
                    return None;
                }
                *x = deformed.x;
                *y = deformed.y;
                *z = deformed.z;
                Some(())
            })
            .count();

        let stats = DeformStats {
            written,
            unchanged: self.vertex_count() - written,
        };
        log::trace!(
            "deformed mesh in parallel: {} written, {} unchanged",
            stats.written,
            stats.unchanged
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests;
