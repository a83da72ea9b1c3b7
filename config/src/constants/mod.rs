//! Centralized configuration values shared across the FFD kernel and its
//! host bindings.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Tolerance below which two positions count as "unchanged".
///
/// The mesh deformer and the volume sampler skip writing a result when every
/// component lies within this distance of the value already stored.
///
/// # Examples
/// ```
/// use config::constants::CHANGE_EPSILON;
/// assert_eq!(CHANGE_EPSILON, 1.0e-6);
/// ```
pub const CHANGE_EPSILON: f64 = 1.0e-6;

// =============================================================================
// CAPACITY CONSTANTS
// =============================================================================

/// Default number of lattice control points a kernel allocates for.
///
/// 27 is a 3x3x3 lattice, i.e. two spans per axis.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_CONTROL_POINT_CAPACITY;
/// assert_eq!(DEFAULT_CONTROL_POINT_CAPACITY, 3 * 3 * 3);
/// ```
pub const DEFAULT_CONTROL_POINT_CAPACITY: usize = 27;

/// Default number of mesh vertices the deformer buffers hold.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_MESH_VERTEX_CAPACITY;
/// assert_eq!(DEFAULT_MESH_VERTEX_CAPACITY, 2048);
/// ```
pub const DEFAULT_MESH_VERTEX_CAPACITY: usize = 2048;

// =============================================================================
// LATTICE CONSTANTS
// =============================================================================

/// Smallest span count allowed along any lattice axis.
///
/// # Examples
/// ```
/// use config::constants::MIN_SPAN_COUNT;
/// assert_eq!(MIN_SPAN_COUNT, 1);
/// ```
pub const MIN_SPAN_COUNT: usize = 1;

/// Largest span count the span stepper will move to.
///
/// # Examples
/// ```
/// use config::constants::{MAX_SPAN_COUNT, MIN_SPAN_COUNT};
/// assert!(MAX_SPAN_COUNT > MIN_SPAN_COUNT);
/// ```
pub const MAX_SPAN_COUNT: usize = 8;

/// Span count per axis that fills the default control point capacity.
///
/// # Examples
/// ```
/// use config::constants::{DEFAULT_SPAN_COUNT, DEFAULT_CONTROL_POINT_CAPACITY};
/// let per_axis = DEFAULT_SPAN_COUNT + 1;
/// assert_eq!(per_axis * per_axis * per_axis, DEFAULT_CONTROL_POINT_CAPACITY);
/// ```
pub const DEFAULT_SPAN_COUNT: usize = 2;

// =============================================================================
// VOLUME GRID CONSTANTS
// =============================================================================

/// Number of spans per axis of the volume sample grid.
///
/// # Examples
/// ```
/// use config::constants::VOLUME_SPAN_COUNT;
/// assert_eq!(VOLUME_SPAN_COUNT, 16);
/// ```
pub const VOLUME_SPAN_COUNT: usize = 16;

/// Number of sample points per axis of the volume grid (spans + 1).
///
/// # Examples
/// ```
/// use config::constants::{VOLUME_POINT_COUNT, VOLUME_SPAN_COUNT};
/// assert_eq!(VOLUME_POINT_COUNT, VOLUME_SPAN_COUNT + 1);
/// ```
pub const VOLUME_POINT_COUNT: usize = VOLUME_SPAN_COUNT + 1;

/// Total number of samples in the default volume grid.
///
/// # Examples
/// ```
/// use config::constants::VOLUME_POINT_TOTAL;
/// assert_eq!(VOLUME_POINT_TOTAL, 4913);
/// ```
pub const VOLUME_POINT_TOTAL: usize = VOLUME_POINT_COUNT * VOLUME_POINT_COUNT * VOLUME_POINT_COUNT;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Returns true when `a` and `b` are equal or within `tolerance`.
///
/// Exact equality is checked first so that matching infinities compare equal.
///
/// # Examples
/// ```
/// use config::constants::{within_tolerance, CHANGE_EPSILON};
/// assert!(within_tolerance(2.0, 2.0 + 5.0e-7, CHANGE_EPSILON));
/// assert!(!within_tolerance(2.0, 2.0 + 5.0e-6, CHANGE_EPSILON));
/// assert!(within_tolerance(f64::INFINITY, f64::INFINITY, CHANGE_EPSILON));
/// ```
#[inline]
pub fn within_tolerance(a: f64, b: f64, tolerance: f64) -> bool {
    a == b || (a <= b + tolerance && a >= b - tolerance)
}

// =============================================================================
// KERNEL CONFIGURATION
// =============================================================================

/// Sizing and tolerance settings for one FFD kernel instance.
///
/// The defaults reproduce the reference sizing: 27 control points, 2048 mesh
/// vertices and a 17x17x17 volume grid.
///
/// # Examples
/// ```
/// use config::constants::{FfdConfig, VOLUME_POINT_TOTAL};
/// let config = FfdConfig::default();
/// assert_eq!(config.volume_point_total(), VOLUME_POINT_TOTAL);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FfdConfig {
    /// Maximum number of lattice control points a rebuild may produce.
    pub control_point_capacity: usize,
    /// Number of vertices held by the mesh deformer buffers.
    pub mesh_vertex_capacity: usize,
    /// Spans per axis (S/T/U) of the volume sample grid.
    pub volume_span_counts: [usize; 3],
    /// "Unchanged" tolerance used before writing results.
    pub epsilon: f64,
}

impl FfdConfig {
    /// Builds a configuration, rejecting zero capacities, zero volume spans
    /// and non-positive tolerances.
    ///
    /// # Examples
    /// ```
    /// use config::constants::{ConfigError, FfdConfig};
    /// let cfg = FfdConfig::new(64, 512, [8, 8, 8], 1.0e-6).expect("valid config");
    /// assert_eq!(cfg.volume_point_total(), 9 * 9 * 9);
    ///
    /// let err = FfdConfig::new(0, 512, [8, 8, 8], 1.0e-6).unwrap_err();
    /// assert_eq!(err, ConfigError::ZeroCapacity("control_point_capacity"));
    /// ```
    pub fn new(
        control_point_capacity: usize,
        mesh_vertex_capacity: usize,
        volume_span_counts: [usize; 3],
        epsilon: f64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            control_point_capacity,
            mesh_vertex_capacity,
            volume_span_counts,
            epsilon,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants enforced by [`FfdConfig::new`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.control_point_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("control_point_capacity"));
        }
        if self.mesh_vertex_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("mesh_vertex_capacity"));
        }
        if let Some(axis) = self.volume_span_counts.iter().position(|&n| n == 0) {
            return Err(ConfigError::ZeroVolumeSpan(axis));
        }
        if self.epsilon.is_nan() || self.epsilon <= 0.0 {
            return Err(ConfigError::InvalidTolerance(self.epsilon));
        }
        Ok(())
    }

    /// Number of volume sample points along each axis.
    pub fn volume_point_counts(&self) -> [usize; 3] {
        self.volume_span_counts.map(|n| n + 1)
    }

    /// Total number of volume sample points.
    pub fn volume_point_total(&self) -> usize {
        self.volume_point_counts().iter().product()
    }
}

impl Default for FfdConfig {
    fn default() -> Self {
        Self {
            control_point_capacity: DEFAULT_CONTROL_POINT_CAPACITY,
            mesh_vertex_capacity: DEFAULT_MESH_VERTEX_CAPACITY,
            volume_span_counts: [VOLUME_SPAN_COUNT; 3],
            epsilon: CHANGE_EPSILON,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when a buffer capacity is zero. Carries the field name.
    ZeroCapacity(&'static str),
    /// Raised when a volume grid axis has no spans. Carries the axis (0..3).
    ZeroVolumeSpan(usize),
    /// Raised when the tolerance is zero, negative or NaN.
    InvalidTolerance(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity(field) => write!(f, "{field} must be at least 1"),
            ConfigError::ZeroVolumeSpan(axis) => {
                write!(f, "volume span count on axis {axis} must be at least 1")
            }
            ConfigError::InvalidTolerance(value) => {
                write!(f, "epsilon must be positive: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
