//! # FFD Kernel
//!
//! Free-form deformation over an axis-aligned trivariate Bezier lattice.
//! A lattice of control points spans a bounding box; moving control points
//! deforms everything inside the box through the Bernstein-polynomial
//! mapping from parameter space (s, t, u) to world space.
//!
//! ## Architecture
//!
//! ```text
//! Lattice ──► bernstein::eval_trivariate ──► VolumeSampler (regular grid)
//!    │                  ▲
//!    └──► ParamFrame ───┴──────────────────► MeshDeformer (vertex buffer)
//! ```
//!
//! [`FfdKernel`] bundles the pieces into one owned context.
//!
//! ## Usage
//!
//! ```rust
//! use ffd_kernel::{FfdKernel, SpanCounts, Vec3};
//!
//! let mut kernel = FfdKernel::default();
//! kernel.rebuild(Vec3::ZERO, Vec3::splat(2.0), SpanCounts::uniform(2))?;
//! assert_eq!(kernel.total_control_points(), 27);
//! assert_eq!(kernel.lattice().evaluate(0.5, 0.5, 0.5), Vec3::ONE);
//! # Ok::<(), ffd_kernel::FfdError>(())
//! ```

pub mod bernstein;
pub mod core;
pub mod deformer;
pub mod error;
pub mod kernel;
pub mod lattice;
pub mod param;
pub mod volume;

pub use crate::core::{BoundingBox, PositionBuffers, PositionView, PositionViewMut, Vec3};
pub use deformer::{DeformStats, DeformerState, MeshDeformer};
pub use error::{FfdError, FfdResult};
pub use kernel::FfdKernel;
pub use lattice::{Axis, Lattice, SpanCounts};
pub use param::{eval_world, world_to_param, ParamFrame};
pub use volume::{SampleStats, VolumeSampler};
