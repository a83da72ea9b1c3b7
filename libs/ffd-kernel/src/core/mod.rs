//! Shared building blocks: vector alias, bounding boxes and the parallel
//! X/Y/Z position buffers handed to hosts.

pub mod bounds;
pub mod buffers;
pub mod vec3;

pub use bounds::BoundingBox;
pub use buffers::{PositionBuffers, PositionView, PositionViewMut};
pub use vec3::Vec3;
