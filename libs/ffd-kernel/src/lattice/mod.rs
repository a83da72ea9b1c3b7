//! # Control Lattice
//!
//! The lattice owns the undeformed bounding box, the span and control point
//! counts along the S/T/U parameter directions, the three axis vectors and
//! the control point grid.
//!
//! Control points are stored row-major with U varying fastest:
//!
//! ```text
//! index(i, j, k) = i * countT * countU + j * countU + k
//! ```
//!
//! The axis vectors are always diagonal (`axis[0]` only has an X component,
//! and so on), so the lattice is axis-aligned by construction.

use std::fmt;

use config::constants::{MAX_SPAN_COUNT, MIN_SPAN_COUNT};

use crate::bernstein;
use crate::core::vec3::positions_match;
use crate::core::{BoundingBox, Vec3};
use crate::error::{FfdError, FfdResult};

// =============================================================================
// AXIS
// =============================================================================

/// One of the three parameter directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// First parameter direction, along world X
    S,
    /// Second parameter direction, along world Y
    T,
    /// Third parameter direction, along world Z
    U,
}

impl Axis {
    /// All axes in S, T, U order.
    pub const ALL: [Axis; 3] = [Axis::S, Axis::T, Axis::U];

    /// Position of the axis in S/T/U order (0, 1 or 2).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::S => 0,
            Axis::T => 1,
            Axis::U => 2,
        }
    }

    /// Maps 0, 1, 2 to S, T, U.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::S => "S",
            Axis::T => "T",
            Axis::U => "U",
        };
        f.write_str(name)
    }
}

// =============================================================================
// SPAN COUNTS
// =============================================================================

/// Number of polynomial spans along S, T and U.
///
/// # Examples
/// ```
/// use ffd_kernel::{Axis, SpanCounts};
/// let spans = SpanCounts::new(1, 2, 3);
/// assert_eq!(spans.get(Axis::T), 2);
/// assert_eq!(spans.control_point_counts(), [2, 3, 4]);
/// assert_eq!(spans.stepped(Axis::S, -5).get(Axis::S), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpanCounts {
    /// Spans along S
    pub s: usize,
    /// Spans along T
    pub t: usize,
    /// Spans along U
    pub u: usize,
}

impl SpanCounts {
    /// Creates span counts for S, T and U.
    pub fn new(s: usize, t: usize, u: usize) -> Self {
        Self { s, t, u }
    }

    /// Same span count on every axis.
    pub fn uniform(n: usize) -> Self {
        Self::new(n, n, n)
    }

    /// Span count along `axis`.
    #[inline]
    pub fn get(&self, axis: Axis) -> usize {
        self.to_array()[axis.index()]
    }

    /// Span counts as `[s, t, u]`.
    #[inline]
    pub fn to_array(self) -> [usize; 3] {
        [self.s, self.t, self.u]
    }

    /// Control point counts (`span + 1`) as `[s, t, u]`.
    pub fn control_point_counts(self) -> [usize; 3] {
        self.to_array().map(|n| n.saturating_add(1))
    }

    /// Returns a copy with the span count along `axis` moved by `delta` and
    /// clamped into `[MIN_SPAN_COUNT, MAX_SPAN_COUNT]`.
    pub fn stepped(self, axis: Axis, delta: isize) -> Self {
        let current = self.get(axis);
        let next = current
            .saturating_add_signed(delta)
            .clamp(MIN_SPAN_COUNT, MAX_SPAN_COUNT);
        let mut spans = self.to_array();
        spans[axis.index()] = next;
        Self::new(spans[0], spans[1], spans[2])
    }

    fn validate(self) -> FfdResult<()> {
        for axis in Axis::ALL {
            let value = self.get(axis);
            if value < MIN_SPAN_COUNT {
                return Err(FfdError::InvalidSpanCount { axis, value });
            }
        }
        Ok(())
    }
}

impl From<[usize; 3]> for SpanCounts {
    fn from(spans: [usize; 3]) -> Self {
        Self::new(spans[0], spans[1], spans[2])
    }
}

// =============================================================================
// LATTICE
// =============================================================================

/// A trivariate Bezier control lattice over an axis-aligned box.
///
/// A new lattice is unbuilt: it has no control points until
/// [`Lattice::rebuild`] succeeds.
///
/// # Examples
/// ```
/// use ffd_kernel::{Lattice, SpanCounts, Vec3};
///
/// let mut lattice = Lattice::new(27);
/// lattice.rebuild(Vec3::ZERO, Vec3::splat(2.0), SpanCounts::uniform(2)).unwrap();
/// assert_eq!(lattice.total_control_points(), 27);
/// assert_eq!(lattice.evaluate(0.5, 0.5, 0.5), Vec3::ONE);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    capacity: usize,
    bbox: BoundingBox,
    spans: SpanCounts,
    counts: [usize; 3],
    axes: [Vec3; 3],
    control_points: Vec<Vec3>,
}

impl Lattice {
    /// Creates an unbuilt lattice able to hold up to `capacity` control points.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            bbox: BoundingBox::default(),
            spans: SpanCounts::default(),
            counts: [0; 3],
            axes: [Vec3::ZERO; 3],
            control_points: Vec::with_capacity(capacity),
        }
    }

    /// Rebuilds the lattice over `[box_min, box_max]` with `spans`, placing
    /// every control point on a uniform grid.
    ///
    /// Returns `Ok(false)` without touching anything when the box and span
    /// counts equal the current ones exactly, so moved control points
    /// survive a redundant rebuild. Use [`Lattice::reset`] to force the
    /// uniform grid back.
    ///
    /// # Errors
    /// - [`FfdError::InvalidSpanCount`] if a span count is zero
    /// - [`FfdError::CapacityExceeded`] if the grid would exceed capacity
    ///
    /// The lattice is unchanged when an error is returned.
    pub fn rebuild(&mut self, box_min: Vec3, box_max: Vec3, spans: SpanCounts) -> FfdResult<bool> {
        spans.validate()?;
        let counts = spans.control_point_counts();
        let total = counts
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
            .unwrap_or(usize::MAX);
        if total > self.capacity {
            return Err(FfdError::CapacityExceeded {
                what: "control points",
                requested: total,
                capacity: self.capacity,
            });
        }

        if self.bbox.min == box_min && self.bbox.max == box_max && self.spans == spans {
            log::trace!("lattice rebuild skipped: box and spans unchanged");
            return Ok(false);
        }

        self.bbox = BoundingBox::new(box_min, box_max);
        self.spans = spans;
        self.counts = counts;

        let extent = self.bbox.extent();
        self.axes = [
            Vec3::new(extent.x, 0.0, 0.0),
            Vec3::new(0.0, extent.y, 0.0),
            Vec3::new(0.0, 0.0, extent.z),
        ];

        self.fill_uniform_grid(total);
        log::debug!(
            "lattice rebuilt: spans {:?}, {} control points, box {:?}..{:?}",
            spans.to_array(),
            total,
            box_min,
            box_max
        );
        Ok(true)
    }

    /// Rebuilds over `bbox`; see [`Lattice::rebuild`].
    pub fn rebuild_from_box(&mut self, bbox: BoundingBox, spans: SpanCounts) -> FfdResult<bool> {
        self.rebuild(bbox.min, bbox.max, spans)
    }

    /// Moves every control point back onto the uniform grid for the current
    /// box and span counts. Does nothing on an unbuilt lattice.
    pub fn reset(&mut self) {
        let total = self.control_points.len();
        self.fill_uniform_grid(total);
    }

    fn fill_uniform_grid(&mut self, total: usize) {
        self.control_points.clear();
        self.control_points.reserve(total);
        for i in 0..self.counts[0] {
            for j in 0..self.counts[1] {
                for k in 0..self.counts[2] {
                    let p = self.uniform_position(i, j, k);
                    self.control_points.push(p);
                }
            }
        }
    }

    /// Undisplaced position of control point (i, j, k):
    /// `box_min + (index / span) * axis` on each axis.
    pub fn uniform_position(&self, i: usize, j: usize, k: usize) -> Vec3 {
        let min = self.bbox.min;
        Vec3::new(
            min.x + (i as f64 / self.spans.s as f64) * self.axes[0].x,
            min.y + (j as f64 / self.spans.t as f64) * self.axes[1].y,
            min.z + (k as f64 / self.spans.u as f64) * self.axes[2].z,
        )
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Returns true once a rebuild has produced control points.
    #[inline]
    pub fn is_built(&self) -> bool {
        !self.control_points.is_empty()
    }

    /// Maximum number of control points.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The undeformed bounding box.
    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Span counts along S/T/U.
    #[inline]
    pub fn spans(&self) -> SpanCounts {
        self.spans
    }

    /// Span count along `axis`.
    #[inline]
    pub fn span_count(&self, axis: Axis) -> usize {
        self.spans.get(axis)
    }

    /// Control point count along `axis`.
    #[inline]
    pub fn control_point_count(&self, axis: Axis) -> usize {
        self.counts[axis.index()]
    }

    /// Control point counts as `[s, t, u]`.
    #[inline]
    pub fn control_point_counts(&self) -> [usize; 3] {
        self.counts
    }

    /// Total number of control points.
    #[inline]
    pub fn total_control_points(&self) -> usize {
        self.control_points.len()
    }

    /// The S/T/U axis vectors.
    #[inline]
    pub fn axes(&self) -> &[Vec3; 3] {
        &self.axes
    }

    /// All control points in linear index order.
    #[inline]
    pub fn control_points(&self) -> &[Vec3] {
        &self.control_points
    }

    // -------------------------------------------------------------------------
    // Indexing
    // -------------------------------------------------------------------------

    /// Converts a ternary index to a linear one. No range check.
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        i * self.counts[1] * self.counts[2] + j * self.counts[2] + k
    }

    /// Converts a ternary index to a linear one, rejecting out-of-range
    /// components.
    ///
    /// # Examples
    /// ```
    /// use ffd_kernel::{FfdError, Lattice, SpanCounts, Vec3};
    /// let mut lattice = Lattice::new(27);
    /// lattice.rebuild(Vec3::ZERO, Vec3::ONE, SpanCounts::uniform(2)).unwrap();
    /// assert_eq!(lattice.checked_index(1, 2, 0).unwrap(), 15);
    /// assert!(matches!(lattice.checked_index(0, 3, 0), Err(FfdError::TernaryOutOfRange { .. })));
    /// ```
    pub fn checked_index(&self, i: usize, j: usize, k: usize) -> FfdResult<usize> {
        if i >= self.counts[0] || j >= self.counts[1] || k >= self.counts[2] {
            return Err(FfdError::TernaryOutOfRange {
                i,
                j,
                k,
                counts: self.counts,
            });
        }
        Ok(self.index(i, j, k))
    }

    /// Converts a linear index back to (i, j, k).
    ///
    /// # Errors
    /// [`FfdError::IndexOutOfRange`] when `index` is not a control point,
    /// which includes every index of an unbuilt lattice.
    pub fn ternary(&self, index: usize) -> FfdResult<(usize, usize, usize)> {
        let len = self.control_points.len();
        if index >= len {
            return Err(FfdError::IndexOutOfRange { index, len });
        }
        let plane = self.counts[1] * self.counts[2];
        let i = index / plane;
        let rem = index % plane;
        Ok((i, rem / self.counts[2], rem % self.counts[2]))
    }

    // -------------------------------------------------------------------------
    // Control point access
    // -------------------------------------------------------------------------

    /// Position of the control point at linear `index`.
    pub fn position(&self, index: usize) -> FfdResult<Vec3> {
        self.control_points
            .get(index)
            .copied()
            .ok_or(FfdError::IndexOutOfRange {
                index,
                len: self.control_points.len(),
            })
    }

    /// Moves the control point at linear `index`.
    pub fn set_position(&mut self, index: usize, position: Vec3) -> FfdResult<()> {
        let len = self.control_points.len();
        let slot = self
            .control_points
            .get_mut(index)
            .ok_or(FfdError::IndexOutOfRange { index, len })?;
        *slot = position;
        Ok(())
    }

    /// Position of control point (i, j, k).
    pub fn position_at(&self, i: usize, j: usize, k: usize) -> FfdResult<Vec3> {
        let index = self.checked_index(i, j, k)?;
        self.position(index)
    }

    /// Moves control point (i, j, k).
    pub fn set_position_at(&mut self, i: usize, j: usize, k: usize, position: Vec3) -> FfdResult<()> {
        let index = self.checked_index(i, j, k)?;
        self.set_position(index, position)
    }

    // -------------------------------------------------------------------------
    // Derived data
    // -------------------------------------------------------------------------

    /// Evaluates the Bezier volume at (s, t, u).
    #[inline]
    pub fn evaluate(&self, s: f64, t: f64, u: f64) -> Vec3 {
        bernstein::eval_trivariate(self, s, t, u)
    }

    /// Pairs of linear indices joining neighbouring control points: all
    /// edges along S, then along T, then along U.
    ///
    /// # Examples
    /// ```
    /// use ffd_kernel::{Lattice, SpanCounts, Vec3};
    /// let mut lattice = Lattice::new(8);
    /// lattice.rebuild(Vec3::ZERO, Vec3::ONE, SpanCounts::uniform(1)).unwrap();
    /// // a cube has 12 edges
    /// assert_eq!(lattice.edges().len(), 12);
    /// ```
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::new();
        for axis in Axis::ALL {
            let mut limit = self.counts;
            limit[axis.index()] = limit[axis.index()].saturating_sub(1);
            for i in 0..limit[0] {
                for j in 0..limit[1] {
                    for k in 0..limit[2] {
                        let (ni, nj, nk) = match axis {
                            Axis::S => (i + 1, j, k),
                            Axis::T => (i, j + 1, k),
                            Axis::U => (i, j, k + 1),
                        };
                        edges.push((self.index(i, j, k), self.index(ni, nj, nk)));
                    }
                }
            }
        }
        edges
    }

    /// Returns true when every control point lies within `tolerance` of its
    /// uniform grid position, i.e. the lattice does not deform anything.
    pub fn is_identity(&self, tolerance: f64) -> bool {
        self.control_points.iter().enumerate().all(|(index, p)| {
            self.ternary(index)
                .is_ok_and(|(i, j, k)| positions_match(*p, self.uniform_position(i, j, k), tolerance))
        })
    }
}
