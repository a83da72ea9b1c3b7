//! Axis-aligned bounding box used as the lattice's physical extent.

use super::vec3::Vec3;

/// An axis-aligned box given by its minimum and maximum corners.
///
/// # Examples
/// ```
/// use ffd_kernel::{BoundingBox, Vec3};
/// let bbox = BoundingBox::new(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0));
/// assert_eq!(bbox.extent(), Vec3::new(2.0, 4.0, 6.0));
/// assert_eq!(bbox.center(), Vec3::new(1.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO)
    }
}

impl BoundingBox {
    /// Creates a box from its two corners. No ordering is enforced.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Computes the smallest box enclosing all `points`.
    ///
    /// Returns `None` for an empty slice.
    ///
    /// # Examples
    /// ```
    /// use ffd_kernel::{BoundingBox, Vec3};
    /// let points = [Vec3::new(1.0, -2.0, 0.5), Vec3::new(-1.0, 3.0, 0.0)];
    /// let bbox = BoundingBox::from_points(&points).unwrap();
    /// assert_eq!(bbox.min, Vec3::new(-1.0, -2.0, 0.0));
    /// assert_eq!(bbox.max, Vec3::new(1.0, 3.0, 0.5));
    /// ```
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    /// Returns `max - min`.
    #[inline]
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the midpoint of the box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns a copy with both corners multiplied by `factor`.
    ///
    /// Used to fit the lattice to a model displayed at a scale.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.min * factor, self.max * factor)
    }
}
