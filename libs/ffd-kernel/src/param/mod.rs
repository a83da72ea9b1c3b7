//! # Parameter Space Conversion
//!
//! Maps world-space points back to lattice parameters (s, t, u) using the
//! reciprocal frame of the lattice axes:
//!
//! ```text
//! cross_i = axis[(i + 1) % 3] × axis[(i + 2) % 3]
//! param_i = (cross_i · (p - box_min)) / (cross_i · axis[i])
//! ```
//!
//! For the axis-aligned lattices built by [`Lattice::rebuild`] this reduces
//! to per-axis normalization, but the frame form is kept so the conversion
//! stays exact for any non-degenerate diagonal basis.

use crate::core::Vec3;
use crate::error::{FfdError, FfdResult};
use crate::lattice::{Axis, Lattice};

/// Precomputed reciprocal frame of a lattice.
///
/// Building the frame is the only fallible step; once built, every
/// conversion is branch-free.
///
/// # Examples
/// ```
/// use ffd_kernel::{param::ParamFrame, Lattice, SpanCounts, Vec3};
/// let mut lattice = Lattice::new(27);
/// lattice.rebuild(Vec3::ZERO, Vec3::new(2.0, 4.0, 8.0), SpanCounts::uniform(1)).unwrap();
/// let frame = ParamFrame::new(&lattice).unwrap();
/// assert_eq!(frame.to_param(Vec3::new(1.0, 1.0, 6.0)), Vec3::new(0.5, 0.25, 0.75));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamFrame {
    origin: Vec3,
    cross: [Vec3; 3],
    denom: [f64; 3],
}

impl ParamFrame {
    /// Builds the reciprocal frame for `lattice`.
    ///
    /// # Errors
    /// [`FfdError::DegenerateLattice`] when an axis has zero length (the
    /// bounding box is flat along it) or the frame is not finite. An unbuilt
    /// lattice has zero axes and is reported as degenerate along S.
    pub fn new(lattice: &Lattice) -> FfdResult<Self> {
        let axes = lattice.axes();
        if let Some(axis) = Axis::ALL
            .into_iter()
            .find(|a| !axes[a.index()].is_finite() || axes[a.index()].length_squared() == 0.0)
        {
            return Err(FfdError::DegenerateLattice { axis });
        }
        let mut cross = [Vec3::ZERO; 3];
        let mut denom = [0.0; 3];
        for axis in Axis::ALL {
            let i = axis.index();
            let c = axes[(i + 1) % 3].cross(axes[(i + 2) % 3]);
            let d = c.dot(axes[i]);
            if d == 0.0 || !d.is_finite() {
                return Err(FfdError::DegenerateLattice { axis });
            }
            cross[i] = c;
            denom[i] = d;
        }
        Ok(Self {
            origin: lattice.bounding_box().min,
            cross,
            denom,
        })
    }

    /// Converts a world-space point to (s, t, u).
    #[inline]
    pub fn to_param(&self, world: Vec3) -> Vec3 {
        let offset = world - self.origin;
        Vec3::new(
            self.cross[0].dot(offset) / self.denom[0],
            self.cross[1].dot(offset) / self.denom[1],
            self.cross[2].dot(offset) / self.denom[2],
        )
    }

    /// Converts `world` to parameters and evaluates `lattice` there.
    ///
    /// `lattice` must be the lattice this frame was built from.
    #[inline]
    pub fn eval_world(&self, lattice: &Lattice, world: Vec3) -> Vec3 {
        let p = self.to_param(world);
        lattice.evaluate(p.x, p.y, p.z)
    }
}

/// Converts a world-space point to lattice parameters.
///
/// # Errors
/// [`FfdError::DegenerateLattice`] for a collapsed bounding box.
pub fn world_to_param(lattice: &Lattice, world: Vec3) -> FfdResult<Vec3> {
    Ok(ParamFrame::new(lattice)?.to_param(world))
}

/// Deforms a single world-space point through the lattice.
///
/// # Examples
/// ```
/// use ffd_kernel::{param::eval_world, Lattice, SpanCounts, Vec3};
/// let mut lattice = Lattice::new(8);
/// lattice.rebuild(Vec3::ZERO, Vec3::ONE, SpanCounts::uniform(1)).unwrap();
/// // lift the (1, 1, 1) corner
/// lattice.set_position(7, Vec3::new(1.0, 1.0, 2.0)).unwrap();
/// assert_eq!(eval_world(&lattice, Vec3::ONE).unwrap(), Vec3::new(1.0, 1.0, 2.0));
/// assert_eq!(eval_world(&lattice, Vec3::ZERO).unwrap(), Vec3::ZERO);
/// ```
///
/// # Errors
/// [`FfdError::DegenerateLattice`] for a collapsed bounding box.
pub fn eval_world(lattice: &Lattice, world: Vec3) -> FfdResult<Vec3> {
    Ok(ParamFrame::new(lattice)?.eval_world(lattice, world))
}

#[cfg(test)]
mod tests;
