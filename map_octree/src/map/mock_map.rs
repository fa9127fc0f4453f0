/// Minimal in-memory map used by the unit tests.
///
/// Owns objects in a slot map and hands out `ObjectKey`s, the way the real
/// document model does.

use glam::Vec3;
use slotmap::{new_key_type, SlotMap};
use crate::geometry::AABB;
use super::map_object::{MapObject, ObjectKind};

new_key_type! {
    /// Key of a mock map object
    pub struct ObjectKey;
}

/// Snapshot of a map object: key, kind and current bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockObject {
    pub key: ObjectKey,
    pub kind: ObjectKind,
    pub bounds: AABB,
}

impl MapObject for MockObject {
    type Key = ObjectKey;

    fn key(&self) -> ObjectKey {
        self.key
    }

    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn bounds(&self) -> AABB {
        self.bounds
    }
}

/// Object store standing in for the document model.
pub struct MockMap {
    objects: SlotMap<ObjectKey, MockObject>,
}

impl MockMap {
    pub fn new() -> Self {
        Self { objects: SlotMap::with_key() }
    }

    /// Add an object and return its snapshot.
    pub fn add(&mut self, kind: ObjectKind, bounds: AABB) -> MockObject {
        let key = self.objects.insert_with_key(|key| MockObject { key, kind, bounds });
        self.objects[key]
    }

    /// Add a brush spanning `min..max`.
    pub fn add_brush(&mut self, min: Vec3, max: Vec3) -> MockObject {
        self.add(ObjectKind::Brush, AABB::new(min, max))
    }

    /// Add a point entity with a 16-unit box around `origin`.
    pub fn add_point_entity(&mut self, origin: Vec3) -> MockObject {
        self.add(
            ObjectKind::PointEntity,
            AABB::new(origin - Vec3::splat(8.0), origin + Vec3::splat(8.0)),
        )
    }

    /// Change an object's bounds and return the new snapshot.
    pub fn set_bounds(&mut self, key: ObjectKey, bounds: AABB) -> MockObject {
        let object = &mut self.objects[key];
        object.bounds = bounds;
        *object
    }

    /// Remove an object and return its last snapshot.
    pub fn remove(&mut self, key: ObjectKey) -> Option<MockObject> {
        self.objects.remove(key)
    }

    /// Snapshots of all objects.
    pub fn objects(&self) -> Vec<MockObject> {
        self.objects.values().copied().collect()
    }
}
