//! Geometry helpers shared by framing and choreography.

pub mod bounds;

pub use bounds::{BoundingBox, Bounds, center_on_origin, compute_bounds, compute_box};
