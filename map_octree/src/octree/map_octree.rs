/// Octree kept in sync with a map through its change events.
///
/// Attaching subscribes an index to a `MapEvents` registry. From then on:
///
/// - `ObjectsAdded` / `ObjectsDidChange` insert the objects
/// - `ObjectsWillBeRemoved` / `ObjectsWillChange` remove them, using the
///   bounds the objects still report
/// - `MapLoaded` rebuilds the tree over the new world bounds and inserts
///   the whole document
/// - `MapCleared` rebuilds an empty tree
///
/// Dropping the `MapOctree` unsubscribes it.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use crate::config::OctreeConfig;
use crate::error::Result;
use crate::geometry::{AABB, Ray};
use crate::map::{MapEvent, MapEvents, MapListener, MapObject, Subscription};
use crate::picking::PickHit;
use crate::{octree_debug, octree_error, octree_info};
use super::octree::{BatchReport, Octree};

const LOG_SOURCE: &str = "map_octree::MapOctree";

/// Listener side of a `MapOctree`: the tree plus a running failure count.
struct IndexState<K> {
    octree: Octree<K>,
    failure_count: usize,
}

impl<K> IndexState<K>
where
    K: Copy + Eq + std::hash::Hash + std::fmt::Debug,
{
    fn record(&mut self, event_name: &str, report: BatchReport) {
        if !report.is_clean() || report.applied > 0 {
            octree_debug!(
                LOG_SOURCE,
                "{}: {} applied, {} skipped, {} failed",
                event_name,
                report.applied,
                report.skipped,
                report.failures.len()
            );
        }
        self.failure_count += report.failures.len();
    }

    fn rebuild(&mut self, event_name: &str, world_bounds: AABB) -> bool {
        // The previous tree stays on failure
        match self.octree.rebuild(world_bounds) {
            Ok(()) => true,
            Err(err) => {
                octree_error!(LOG_SOURCE, "{}: rebuild rejected: {}", event_name, err);
                self.failure_count += 1;
                false
            }
        }
    }
}

impl<O> MapListener<O> for IndexState<O::Key>
where
    O: MapObject,
{
    fn on_map_event(&mut self, event: &MapEvent<'_, O>) {
        let name = event.name();
        match event {
            MapEvent::ObjectsAdded(objects) | MapEvent::ObjectsDidChange(objects) => {
                let report = self.octree.insert_many(objects.iter());
                self.record(name, report);
            }
            MapEvent::ObjectsWillBeRemoved(objects) | MapEvent::ObjectsWillChange(objects) => {
                let report = self.octree.remove_many(objects.iter());
                self.record(name, report);
            }
            MapEvent::MapLoaded { world_bounds, objects } => {
                if self.rebuild(name, *world_bounds) {
                    let report = self.octree.insert_many(objects.iter());
                    self.record(name, report);
                }
            }
            MapEvent::MapCleared { world_bounds } => {
                self.rebuild(name, *world_bounds);
            }
        }
    }
}

/// Octree that follows a map's change notifications.
pub struct MapOctree<O: MapObject + 'static> {
    state: Rc<RefCell<IndexState<O::Key>>>,
    subscription: Subscription<O>,
}

impl<O> MapOctree<O>
where
    O: MapObject + 'static,
    O::Key: 'static,
{
    /// Create an empty index over `world_bounds` and subscribe it to `events`.
    ///
    /// # Errors
    ///
    /// - `InvalidBounds` if the world bounds are not valid
    /// - `InvalidConfig` if `config` does not validate
    pub fn attach(events: &MapEvents<O>, world_bounds: AABB, config: OctreeConfig) -> Result<Self> {
        let octree = Octree::new(world_bounds, config)?;
        let state = Rc::new(RefCell::new(IndexState {
            octree,
            failure_count: 0,
        }));
        let subscription = events.subscribe(state.clone());

        octree_info!(
            LOG_SOURCE,
            "Attached to map events over {:?}..{:?}",
            world_bounds.min,
            world_bounds.max
        );

        Ok(Self { state, subscription })
    }

    /// Whether the index is still subscribed
    pub fn is_attached(&self) -> bool {
        self.subscription.is_active()
    }

    /// Run `f` with read access to the underlying octree.
    ///
    /// Must not be called from inside a map event handler.
    pub fn with_octree<R>(&self, f: impl FnOnce(&Octree<O::Key>) -> R) -> R {
        let octree = self.octree();
        f(&*octree)
    }

    fn octree(&self) -> Ref<'_, Octree<O::Key>> {
        Ref::map(self.state.borrow(), |state| &state.octree)
    }

    /// See `Octree::query_ray`
    pub fn query_ray(&self, ray: &Ray) -> Vec<O::Key> {
        self.octree().query_ray(ray)
    }

    /// See `Octree::query_region`
    pub fn query_region(&self, region: &AABB) -> Vec<O::Key> {
        self.octree().query_region(region)
    }

    /// See `Octree::intersects_any`
    pub fn intersects_any(&self, region: &AABB) -> bool {
        self.octree().intersects_any(region)
    }

    /// See `Octree::pick`
    pub fn pick<F>(&self, ray: &Ray, hit_test: F) -> Vec<PickHit<O::Key>>
    where
        F: FnMut(O::Key) -> Option<f32>,
    {
        self.octree().pick(ray, hit_test)
    }

    /// Whether `key` is currently indexed
    pub fn contains(&self, key: O::Key) -> bool {
        self.octree().contains(key)
    }

    /// Number of indexed objects
    pub fn len(&self) -> usize {
        self.octree().len()
    }

    /// Whether the index holds no objects
    pub fn is_empty(&self) -> bool {
        self.octree().is_empty()
    }

    /// Current world bounds
    pub fn world_bounds(&self) -> AABB {
        *self.octree().world_bounds()
    }

    /// Number of objects (or rebuilds) that failed since attaching.
    ///
    /// Non-zero means the index and the document disagreed at some point;
    /// each failure was logged when it happened.
    pub fn failure_count(&self) -> usize {
        self.state.borrow().failure_count
    }
}

impl<O: MapObject + 'static> Drop for MapOctree<O> {
    fn drop(&mut self) {
        octree_debug!(LOG_SOURCE, "Detaching from map events");
    }
}

#[cfg(test)]
#[path = "map_octree_tests.rs"]
mod tests;
