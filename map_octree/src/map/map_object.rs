/// Indexable map objects.
///
/// The index never owns objects. The document model owns them and hands out
/// stable keys (usually slotmap keys), which is all the octree stores.

use std::fmt::Debug;
use std::hash::Hash;
use bitflags::bitflags;
use crate::geometry::AABB;

/// What a map object is, as far as spatial indexing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Entity placed at a point (lights, spawn points, items)
    PointEntity,
    /// Entity whose geometry is its brushes; the brushes are indexed instead
    BrushEntity,
    /// Solid brush
    Brush,
    /// Entity with no known definition
    Undefined,
}

bitflags! {
    /// Set of object kinds accepted by an index.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ObjectKinds: u8 {
        const POINT_ENTITY = 1 << 0;
        const BRUSH_ENTITY = 1 << 1;
        const BRUSH        = 1 << 2;
        const UNDEFINED    = 1 << 3;
    }
}

impl ObjectKinds {
    /// Point entities and brushes: the kinds that occupy space on their own.
    pub const SPATIAL: ObjectKinds = ObjectKinds::POINT_ENTITY.union(ObjectKinds::BRUSH);

    /// Test whether `kind` is part of this set.
    pub fn accepts(self, kind: ObjectKind) -> bool {
        self.contains(ObjectKinds::from(kind))
    }
}

impl Default for ObjectKinds {
    fn default() -> Self {
        ObjectKinds::SPATIAL
    }
}

impl From<ObjectKind> for ObjectKinds {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::PointEntity => ObjectKinds::POINT_ENTITY,
            ObjectKind::BrushEntity => ObjectKinds::BRUSH_ENTITY,
            ObjectKind::Brush => ObjectKinds::BRUSH,
            ObjectKind::Undefined => ObjectKinds::UNDEFINED,
        }
    }
}

/// Any entity or brush that can be placed in the octree.
///
/// `bounds()` must report the bounds the object had when it was inserted
/// until the index has been told it is about to change
/// (`MapEvent::ObjectsWillChange`). Removal uses these bounds to find the
/// node holding the object.
pub trait MapObject {
    /// Non-owning handle type
    type Key: Copy + Eq + Hash + Debug;

    /// Stable handle for this object
    fn key(&self) -> Self::Key;

    /// Kind used by the index type filter
    fn kind(&self) -> ObjectKind;

    /// Current world-space bounds
    fn bounds(&self) -> AABB;
}

impl<T: MapObject + ?Sized> MapObject for &T {
    type Key = T::Key;

    fn key(&self) -> Self::Key {
        (**self).key()
    }

    fn kind(&self) -> ObjectKind {
        (**self).kind()
    }

    fn bounds(&self) -> AABB {
        (**self).bounds()
    }
}
