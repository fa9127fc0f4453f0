/*!
# Map Octree

Dynamic octree spatial index for a level editor's map document.

The index stores map objects (point entities and brushes) by key in a
recursive octree over the world bounds, so the editor can answer pick-ray
and "is anything here?" queries without scanning every object.

## Architecture

- **Octree**: the index facade (validation, batch updates, queries)
- **OctreeNode**: one cuboid region with lazily created child octants
- **MapOctree**: an `Octree` kept in sync with a map through `MapEvents`
- **MapObject**: what the document model exposes for each object
- **picking**: ordering of exact hits along a pick ray

The index never owns map objects. It stores their keys and relies on the
document model to announce every change through `MapEvent`s.
*/

// Internal modules
mod error;
pub mod log;
pub mod config;
pub mod geometry;
pub mod map;
pub mod octree;
pub mod picking;

// Main map3d namespace module
pub mod map3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Configuration
    pub use crate::config::OctreeConfig;

    // Geometry primitives
    pub use crate::geometry::{AABB, Ray};

    // Index
    pub use crate::octree::{BatchReport, MapOctree, Octree, OctreeNode, OCTANT_COUNT};

    // Picking
    pub use crate::picking::{pick, pick_nearest, PickHit};

    // Logging sub-module (types and global controls, NOT macros)
    pub mod log {
        pub use crate::log::{
            DefaultLogger, LogEntry, LogSeverity, Logger,
            reset_logger, set_logger, set_min_severity, min_severity,
        };
    }

    // Map model sub-module
    pub mod map {
        pub use crate::map::*;
    }
}

// Re-export math library at crate root
pub use glam;
