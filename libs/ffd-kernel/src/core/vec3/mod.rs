//! Thin wrapper around `glam::DVec3` shared across kernel modules.
//!
//! The helper functions keep tolerance checks readable while avoiding direct
//! dependencies on `glam` from higher layers.

use config::constants::within_tolerance;

pub use glam::DVec3 as Vec3;

/// Returns true when every component of `a` lies within `tolerance` of the
/// matching component of `b`.
///
/// # Examples
/// ```
/// use ffd_kernel::core::vec3::{positions_match, Vec3};
/// let a = Vec3::new(1.0, 2.0, 3.0);
/// assert!(positions_match(a, a + Vec3::splat(1.0e-7), 1.0e-6));
/// assert!(!positions_match(a, a + Vec3::X, 1.0e-6));
/// ```
#[inline]
pub fn positions_match(a: Vec3, b: Vec3, tolerance: f64) -> bool {
    within_tolerance(a.x, b.x, tolerance)
        && within_tolerance(a.y, b.y, tolerance)
        && within_tolerance(a.z, b.z, tolerance)
}
