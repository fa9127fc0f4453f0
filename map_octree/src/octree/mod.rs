//! Octree spatial index
//!
//! Provides the recursive node type and the `Octree` facade used by the
//! editor for ray picking and region tests, plus `MapOctree`, which keeps an
//! octree in sync with a map through its change notifications.

mod octree;
mod octree_node;
mod map_octree;

pub use octree::{Octree, BatchReport};
pub use octree_node::{OctreeNode, OCTANT_COUNT};
pub use map_octree::MapOctree;
