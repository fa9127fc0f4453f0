/// The map's spatial index.
///
/// Owns the root node (sized to the world bounds), validates everything that
/// crosses its boundary, and keeps a table of live keys so that double
/// insertion and lost objects are reported instead of silently corrupting
/// the tree.
///
/// Ownership: the caller owns the Octree. Objects are referenced by key only;
/// the document model must remove an object before destroying it.

use rustc_hash::FxHashMap;
use crate::config::OctreeConfig;
use crate::error::{Error, Result};
use crate::geometry::{AABB, Ray};
use crate::map::MapObject;
use crate::picking::{self, PickHit};
use crate::{octree_debug, octree_error, octree_info, octree_trace, octree_warn};
use super::octree_node::OctreeNode;

const LOG_SOURCE: &str = "map_octree::Octree";

/// Outcome of a batch insert or remove.
///
/// Failures never abort the batch; each one is logged and collected here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Objects inserted or removed
    pub applied: usize,
    /// Objects ignored by the kind filter
    pub skipped: usize,
    /// Objects that could not be inserted or removed
    pub failures: Vec<Error>,
}

impl BatchReport {
    /// True if no object failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Dynamic octree over map objects.
pub struct Octree<K> {
    /// Root node; its region is the world bounds
    root: OctreeNode<K>,
    /// Configuration the tree was built with
    config: OctreeConfig,
    /// Live objects and the bounds they were inserted with
    live: FxHashMap<K, AABB>,
}

impl<K> Octree<K>
where
    K: Copy + Eq + std::hash::Hash + std::fmt::Debug,
{
    /// Create an empty octree covering `world_bounds`.
    ///
    /// # Errors
    ///
    /// - `InvalidBounds` if the world bounds are not finite or inverted
    /// - `InvalidConfig` if `config` does not validate
    pub fn new(world_bounds: AABB, config: OctreeConfig) -> Result<Self> {
        config.validate()?;
        Self::check_world_bounds(&world_bounds)?;

        octree_debug!(
            LOG_SOURCE,
            "Created octree over {:?}..{:?} (min node size {})",
            world_bounds.min,
            world_bounds.max,
            config.min_subdivision_size
        );

        Ok(Self {
            root: OctreeNode::new(world_bounds, config.min_subdivision_size),
            config,
            live: FxHashMap::default(),
        })
    }

    fn check_world_bounds(world_bounds: &AABB) -> Result<()> {
        if !world_bounds.is_valid() {
            return Err(Error::InvalidBounds(format!(
                "world bounds {:?}..{:?} are not a valid region",
                world_bounds.min,
                world_bounds.max
            )));
        }
        Ok(())
    }

    // ===== SINGLE-OBJECT API =====

    /// Insert one object.
    ///
    /// # Errors
    ///
    /// - `InvalidBounds` if `bounds` is not finite or inverted
    /// - `AlreadyIndexed` if `key` is already in the index
    /// - `OutOfBounds` if `bounds` does not fit in the world bounds
    ///
    /// The tree is unchanged on error.
    pub fn insert(&mut self, key: K, bounds: AABB) -> Result<()> {
        if !bounds.is_valid() {
            return Err(Error::InvalidBounds(format!(
                "{:?} has bounds {:?}..{:?}",
                key, bounds.min, bounds.max
            )));
        }
        if self.live.contains_key(&key) {
            return Err(Error::AlreadyIndexed(format!("{:?}", key)));
        }
        if !self.root.insert(key, &bounds) {
            return Err(Error::OutOfBounds(format!(
                "{:?} with bounds {:?}..{:?} does not fit in {:?}..{:?}",
                key,
                bounds.min,
                bounds.max,
                self.root.region().min,
                self.root.region().max
            )));
        }
        self.live.insert(key, bounds);
        Ok(())
    }

    /// Remove one object, given the bounds it currently reports.
    ///
    /// # Errors
    ///
    /// - `ObjectNotFound` if the key is not in the index, or is not stored
    ///   where `bounds` leads (its bounds changed without a remove first)
    pub fn remove(&mut self, key: K, bounds: AABB) -> Result<()> {
        if !self.root.remove(key, &bounds) {
            let reason = match self.live.get(&key) {
                Some(indexed) => format!(
                    "{:?} was indexed with bounds {:?}..{:?} but removed with {:?}..{:?}",
                    key, indexed.min, indexed.max, bounds.min, bounds.max
                ),
                None => format!("{:?} is not in the index", key),
            };
            return Err(Error::ObjectNotFound(reason));
        }
        self.live.remove(&key);
        Ok(())
    }

    /// Move an object from `old_bounds` to `new_bounds`.
    ///
    /// If the insert fails the object is left out of the index, matching
    /// what a remove/insert pair of change notifications would do.
    pub fn update(&mut self, key: K, old_bounds: AABB, new_bounds: AABB) -> Result<()> {
        self.remove(key, old_bounds)?;
        self.insert(key, new_bounds)
    }

    // ===== BATCH API =====

    /// Insert every object accepted by the kind filter.
    ///
    /// Objects that cannot be inserted are logged as warnings: they point
    /// to a malformed document or stale world bounds, not a broken index.
    pub fn insert_many<I>(&mut self, objects: I) -> BatchReport
    where
        I: IntoIterator,
        I::Item: MapObject<Key = K>,
    {
        let mut report = BatchReport::default();
        for object in objects {
            if !self.config.indexed_kinds.accepts(object.kind()) {
                report.skipped += 1;
                continue;
            }
            match self.insert(object.key(), object.bounds()) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    octree_warn!(LOG_SOURCE, "Insert failed: {}", err);
                    report.failures.push(err);
                }
            }
        }
        report
    }

    /// Remove every object accepted by the kind filter.
    ///
    /// Failures mean the index and the document disagree and are logged
    /// as errors.
    pub fn remove_many<I>(&mut self, objects: I) -> BatchReport
    where
        I: IntoIterator,
        I::Item: MapObject<Key = K>,
    {
        let mut report = BatchReport::default();
        for object in objects {
            if !self.config.indexed_kinds.accepts(object.kind()) {
                report.skipped += 1;
                continue;
            }
            match self.remove(object.key(), object.bounds()) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    octree_error!(LOG_SOURCE, "Index out of sync with document: {}", err);
                    report.failures.push(err);
                }
            }
        }
        report
    }

    /// Discard the whole tree and start over, empty, with new world bounds.
    ///
    /// # Errors
    ///
    /// - `InvalidBounds` if the world bounds are not valid; the current
    ///   tree is kept in that case
    pub fn rebuild(&mut self, world_bounds: AABB) -> Result<()> {
        Self::check_world_bounds(&world_bounds)?;
        let dropped = self.live.len();
        self.root = OctreeNode::new(world_bounds, self.config.min_subdivision_size);
        self.live.clear();
        octree_info!(
            LOG_SOURCE,
            "Rebuilt octree over {:?}..{:?} ({} objects dropped)",
            world_bounds.min,
            world_bounds.max,
            dropped
        );
        Ok(())
    }

    /// Remove all objects, keeping the world bounds.
    pub fn clear(&mut self) {
        self.root = OctreeNode::new(*self.root.region(), self.config.min_subdivision_size);
        self.live.clear();
    }

    // ===== QUERIES =====

    /// Candidate objects for a pick ray.
    ///
    /// Every object whose node the ray reaches is returned, in no particular
    /// order; exact hit testing is up to the caller. An invalid ray (NaN
    /// origin, zero direction) yields no candidates.
    pub fn query_ray(&self, ray: &Ray) -> Vec<K> {
        let mut results = Vec::new();
        if !ray.is_valid() {
            octree_warn!(LOG_SOURCE, "Ignoring invalid pick ray {:?}", ray);
            return results;
        }
        self.root.intersect_ray(ray, &mut results);
        octree_trace!(LOG_SOURCE, "Ray query from {:?}: {} candidates", ray.origin, results.len());
        results
    }

    /// Objects whose indexed bounds overlap `region`.
    pub fn query_region(&self, region: &AABB) -> Vec<K> {
        let mut candidates = Vec::new();
        if !region.is_valid() {
            return candidates;
        }
        self.root.intersect_region(region, &mut candidates);
        let reached = candidates.len();
        candidates.retain(|key| {
            self.live
                .get(key)
                .is_some_and(|bounds| bounds.intersects(region))
        });
        octree_trace!(
            LOG_SOURCE,
            "Region query {:?}..{:?}: {} candidates, {} overlapping",
            region.min,
            region.max,
            reached,
            candidates.len()
        );
        candidates
    }

    /// Whether any indexed object overlaps `region`.
    pub fn intersects_any(&self, region: &AABB) -> bool {
        !self.query_region(region).is_empty()
    }

    /// Exact hits along `ray`, nearest first.
    ///
    /// `hit_test` returns the hit distance for a candidate, or `None` if the
    /// ray misses it.
    pub fn pick<F>(&self, ray: &Ray, hit_test: F) -> Vec<PickHit<K>>
    where
        F: FnMut(K) -> Option<f32>,
    {
        picking::pick(self.query_ray(ray), hit_test)
    }

    // ===== ACCESSORS =====

    /// Whether `key` is currently indexed.
    pub fn contains(&self, key: K) -> bool {
        self.live.contains_key(&key)
    }

    /// Bounds `key` was inserted with.
    pub fn indexed_bounds(&self, key: K) -> Option<&AABB> {
        self.live.get(&key)
    }

    /// Number of indexed objects.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether the index holds no objects.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Region covered by the root node.
    pub fn world_bounds(&self) -> &AABB {
        self.root.region()
    }

    /// Configuration the tree was built with.
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Root node, for inspection.
    pub fn root(&self) -> &OctreeNode<K> {
        &self.root
    }
}

#[cfg(test)]
#[path = "octree_tests.rs"]
mod tests;
