//! # Error Types
//!
//! Error types for FFD kernel operations. All errors are explicit and provide
//! clear debugging information.
//!
//! ## Error Policy
//!
//! - Public queries and mutations validate their inputs and fail fast
//! - The per-vertex and per-sample loops never fail: everything they depend on
//!   is validated before the loop starts
//! - Errors include the offending values for debugging

use thiserror::Error;

use crate::lattice::Axis;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur during FFD operations.
///
/// ## Example
///
/// ```rust
/// use ffd_kernel::{FfdError, Lattice, SpanCounts, Vec3};
///
/// let mut lattice = Lattice::new(27);
/// match lattice.rebuild(Vec3::ZERO, Vec3::ONE, SpanCounts::uniform(3)) {
///     Err(FfdError::CapacityExceeded { requested, capacity, .. }) => {
///         assert_eq!((requested, capacity), (64, 27));
///     }
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FfdError {
    /// A linear index lies outside the addressed buffer.
    #[error("Index {index} out of range (len: {len})")]
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// Number of addressable elements
        len: usize,
    },

    /// A ternary control point index lies outside the lattice.
    #[error("Control point ({i}, {j}, {k}) out of range for lattice {counts:?}")]
    TernaryOutOfRange {
        /// Index along S
        i: usize,
        /// Index along T
        j: usize,
        /// Index along U
        k: usize,
        /// Control point counts along S/T/U
        counts: [usize; 3],
    },

    /// The lattice has a zero-length (or non-finite) axis, so world points
    /// cannot be converted to parameter space.
    #[error("Degenerate lattice: axis {axis} has zero length")]
    DegenerateLattice {
        /// The collapsed axis
        axis: Axis,
    },

    /// A request needs more storage than the configured capacity.
    #[error("Capacity exceeded for {what}: requested {requested} (capacity: {capacity})")]
    CapacityExceeded {
        /// What ran out of room ("control points", "mesh vertices")
        what: &'static str,
        /// Requested element count
        requested: usize,
        /// Configured capacity
        capacity: usize,
    },

    /// A span count below one was supplied.
    #[error("Invalid span count {value} on axis {axis} (must be at least 1)")]
    InvalidSpanCount {
        /// Axis the span count belongs to
        axis: Axis,
        /// The rejected value
        value: usize,
    },

    /// `deform` was called before the undeformed snapshot was taken.
    #[error("Undeformed vertices have not been captured; call snapshot_undeformed first")]
    NotSnapshotted,

    /// The kernel configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<config::constants::ConfigError> for FfdError {
    fn from(err: config::constants::ConfigError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for FFD operations.
pub type FfdResult<T> = Result<T, FfdError>;

// =============================================================================
// TESTS
// =============================================================================
