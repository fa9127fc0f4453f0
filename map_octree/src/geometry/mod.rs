//! Geometry primitives consumed by the octree
//!
//! Provides the axis-aligned bounding box and ray types with the
//! containment and ray-intersection tests the index relies on.

mod aabb;
mod ray;

pub use aabb::AABB;
pub use ray::Ray;
