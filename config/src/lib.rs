//! # Config Crate
//!
//! Centralized configuration constants for the free-form deformation kernel.
//! Every tolerance, default buffer capacity and grid sizing value lives here
//! so the kernel and its host bindings agree on a single source of truth.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{within_tolerance, FfdConfig, CHANGE_EPSILON};
//!
//! // Positions closer than CHANGE_EPSILON count as unchanged
//! assert!(within_tolerance(1.0, 1.0 + CHANGE_EPSILON / 2.0, CHANGE_EPSILON));
//!
//! // Default capacities match the reference sizing
//! let config = FfdConfig::default();
//! assert_eq!(config.control_point_capacity, 27);
//! assert_eq!(config.mesh_vertex_capacity, 2048);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Browser-Safe**: No platform-specific values
//! - **Defaults, not ceilings**: Capacities are defaults of `FfdConfig`

pub mod constants;
