//! # Position Buffers
//!
//! Positions are stored as three parallel `f64` buffers (X, Y and Z) so that
//! a host can map each axis straight onto a typed array without interleaving.
//! Slot `i` of each buffer belongs to the same logical point.

use super::vec3::Vec3;

/// Owned X/Y/Z buffers of equal, fixed length.
///
/// # Examples
/// ```
/// use ffd_kernel::{PositionBuffers, Vec3};
/// let mut buffers = PositionBuffers::zeroed(4);
/// buffers.set(2, Vec3::new(1.0, 2.0, 3.0));
/// assert_eq!(buffers.get(2), Vec3::new(1.0, 2.0, 3.0));
/// assert_eq!(buffers.view().x[2], 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositionBuffers {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl PositionBuffers {
    /// Allocates `len` positions at the origin.
    pub fn zeroed(len: usize) -> Self {
        Self {
            x: vec![0.0; len],
            y: vec![0.0; len],
            z: vec![0.0; len],
        }
    }

    /// Splits `points` into parallel buffers.
    pub fn from_points(points: &[Vec3]) -> Self {
        Self {
            x: points.iter().map(|p| p.x).collect(),
            y: points.iter().map(|p| p.y).collect(),
            z: points.iter().map(|p| p.z).collect(),
        }
    }

    /// Number of positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the buffers hold no positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Reads the position at `index`.
    ///
    /// Panics when `index >= len()`; callers iterate within bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Vec3 {
        Vec3::new(self.x[index], self.y[index], self.z[index])
    }

    /// Writes the position at `index`.
    #[inline]
    pub fn set(&mut self, index: usize, position: Vec3) {
        self.x[index] = position.x;
        self.y[index] = position.y;
        self.z[index] = position.z;
    }

    /// Copies every position from `other`. Both must have the same length.
    pub fn copy_from(&mut self, other: &PositionBuffers) {
        self.x.copy_from_slice(&other.x);
        self.y.copy_from_slice(&other.y);
        self.z.copy_from_slice(&other.z);
    }

    /// Collects the positions into a `Vec<Vec3>`.
    pub fn to_points(&self) -> Vec<Vec3> {
        self.view().to_points()
    }

    /// Read-only view over the three buffers.
    pub fn view(&self) -> PositionView<'_> {
        PositionView {
            x: &self.x,
            y: &self.y,
            z: &self.z,
        }
    }

    /// Mutable view over the three buffers.
    pub fn view_mut(&mut self) -> PositionViewMut<'_> {
        PositionViewMut {
            x: &mut self.x,
            y: &mut self.y,
            z: &mut self.z,
        }
    }
}

/// Borrowed read-only X/Y/Z slices.
#[derive(Debug, Clone, Copy)]
pub struct PositionView<'a> {
    /// X components
    pub x: &'a [f64],
    /// Y components
    pub y: &'a [f64],
    /// Z components
    pub z: &'a [f64],
}

impl PositionView<'_> {
    /// Number of positions.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the view is empty.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Reads the position at `index`.
    pub fn get(&self, index: usize) -> Vec3 {
        Vec3::new(self.x[index], self.y[index], self.z[index])
    }

    /// Collects the positions into a `Vec<Vec3>`.
    pub fn to_points(&self) -> Vec<Vec3> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }
}

/// Borrowed mutable X/Y/Z slices.
///
/// The slices have equal length; hosts write vertex data through them
/// before taking the undeformed snapshot.
#[derive(Debug)]
pub struct PositionViewMut<'a> {
    /// X components
    pub x: &'a mut [f64],
    /// Y components
    pub y: &'a mut [f64],
    /// Z components
    pub z: &'a mut [f64],
}

impl PositionViewMut<'_> {
    /// Number of positions.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the view is empty.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Writes the position at `index`.
    pub fn set(&mut self, index: usize, position: Vec3) {
        self.x[index] = position.x;
        self.y[index] = position.y;
        self.z[index] = position.z;
    }
}
