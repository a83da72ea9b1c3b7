//! # Volume Sampler
//!
//! Evaluates the lattice's Bezier volume on a fixed regular grid of
//! parameters and stores the results in a dedicated buffer. The grid
//! characterizes the deformation itself and is independent of both the mesh
//! and the lattice's own span counts.
//!
//! Sample (i, j, k) sits at parameters `(i / spanS, j / spanT, k / spanU)`,
//! so both 0 and 1 are included on every axis, and is stored at slot
//! `i * countT * countU + j * countU + k`.

use config::constants::{CHANGE_EPSILON, VOLUME_SPAN_COUNT};

use crate::core::vec3::positions_match;
use crate::core::{PositionBuffers, PositionView, PositionViewMut, Vec3};
use crate::lattice::{Lattice, SpanCounts};

/// Outcome of one sampling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleStats {
    /// Samples whose stored position was overwritten.
    pub written: usize,
    /// Samples already within tolerance of the new evaluation.
    pub unchanged: usize,
}

/// Samples a lattice on a regular parameter grid.
///
/// # Examples
/// ```
/// use ffd_kernel::{Lattice, SpanCounts, Vec3, VolumeSampler};
///
/// let mut lattice = Lattice::new(27);
/// lattice.rebuild(Vec3::ZERO, Vec3::splat(2.0), SpanCounts::uniform(2)).unwrap();
///
/// let mut sampler = VolumeSampler::default();
/// assert_eq!(sampler.sample_count(), 4913);
/// sampler.sample_volume(&lattice);
/// assert_eq!(sampler.samples().get(sampler.index(16, 16, 16)), Vec3::splat(2.0));
/// ```
#[derive(Debug, Clone)]
pub struct VolumeSampler {
    spans: SpanCounts,
    counts: [usize; 3],
    samples: PositionBuffers,
    epsilon: f64,
}

impl Default for VolumeSampler {
    fn default() -> Self {
        Self::new(SpanCounts::uniform(VOLUME_SPAN_COUNT))
    }
}

impl VolumeSampler {
    /// Creates a sampler with `spans + 1` grid points per axis and a zeroed
    /// sample buffer. Zero spans are raised to one.
    pub fn new(spans: SpanCounts) -> Self {
        let spans = SpanCounts::from(spans.to_array().map(|n| n.max(1)));
        let counts = spans.control_point_counts();
        let total = counts.iter().product();
        Self {
            spans,
            counts,
            samples: PositionBuffers::zeroed(total),
            epsilon: CHANGE_EPSILON,
        }
    }

    /// Replaces the "unchanged" tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Grid spans along S/T/U.
    #[inline]
    pub fn spans(&self) -> SpanCounts {
        self.spans
    }

    /// Grid points along S/T/U.
    #[inline]
    pub fn point_counts(&self) -> [usize; 3] {
        self.counts
    }

    /// Total number of samples.
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Flattened slot of grid point (i, j, k).
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        i * self.counts[1] * self.counts[2] + j * self.counts[2] + k
    }

    /// Parameters (s, t, u) of grid point (i, j, k).
    #[inline]
    pub fn grid_point(&self, i: usize, j: usize, k: usize) -> Vec3 {
        Vec3::new(
            i as f64 * (1.0 / self.spans.s as f64),
            j as f64 * (1.0 / self.spans.t as f64),
            k as f64 * (1.0 / self.spans.u as f64),
        )
    }

    /// The sample buffer.
    pub fn samples(&self) -> PositionView<'_> {
        self.samples.view()
    }

    /// Mutable access to the sample buffer.
    pub fn samples_mut(&mut self) -> PositionViewMut<'_> {
        self.samples.view_mut()
    }

    /// Evaluates `lattice` at every grid point, writing each result to its
    /// own slot unless the stored value is already within tolerance.
    pub fn sample_volume(&mut self, lattice: &Lattice) -> SampleStats {
        let mut stats = SampleStats::default();
        let [count_s, count_t, count_u] = self.counts;
        for i in 0..count_s {
            for j in 0..count_t {
                for k in 0..count_u {
                    let param = self.grid_point(i, j, k);
                    let point = lattice.evaluate(param.x, param.y, param.z);
                    let slot = self.index(i, j, k);
                    if positions_match(point, self.samples.get(slot), self.epsilon) {
                        stats.unchanged += 1;
                        continue;
                    }
                    self.samples.set(slot, point);
                    stats.written += 1;
                }
            }
        }
        log::trace!(
            "sampled volume: {} written, {} unchanged",
            stats.written,
            stats.unchanged
        );
        stats
    }
}
