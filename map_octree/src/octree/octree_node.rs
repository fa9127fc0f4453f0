/// One cuboid region of the map octree.
///
/// Each object is stored in exactly one node: the shallowest node that
/// contains its bounds and cannot hand it down to a single child octant.
/// If the object straddles a child boundary, it stays in the parent.
///
/// Unlike a pre-allocated static octree, children are created lazily the
/// first time an object needs them, and dropped again once their subtree
/// is empty. Nodes never store object bounds, only keys; callers pass the
/// bounds on insert and remove.

use crate::geometry::{AABB, Ray};

/// Number of child octants per node.
pub const OCTANT_COUNT: usize = 8;

/// A single node in the octree.
pub struct OctreeNode<K> {
    /// Region governed by this node, fixed at construction
    region: AABB,
    /// Nodes whose shortest side is <= this never subdivide
    min_size: f32,
    /// Child octants, indexed by octant bits (see `AABB::octant`)
    children: [Option<Box<OctreeNode<K>>>; OCTANT_COUNT],
    /// Objects that fit this node but no single child
    objects: Vec<K>,
}

impl<K: Copy + Eq> OctreeNode<K> {
    /// Create an empty node governing `region`.
    pub fn new(region: AABB, min_size: f32) -> Self {
        Self {
            region,
            min_size,
            children: Default::default(),
            objects: Vec::new(),
        }
    }

    /// Region governed by this node.
    pub fn region(&self) -> &AABB {
        &self.region
    }

    /// Objects stored directly in this node.
    pub fn objects(&self) -> &[K] {
        &self.objects
    }

    /// Existing children with their octant index.
    pub fn children(&self) -> impl Iterator<Item = (usize, &OctreeNode<K>)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(octant, child)| child.as_deref().map(|c| (octant, c)))
    }

    /// Child for one octant, if it exists.
    pub fn child(&self, octant: usize) -> Option<&OctreeNode<K>> {
        self.children.get(octant).and_then(|c| c.as_deref())
    }

    /// Whether any child exists.
    pub fn has_children(&self) -> bool {
        self.children.iter().any(Option::is_some)
    }

    /// Whether this node may delegate objects to children.
    ///
    /// Requires the shortest side to exceed the minimum size and the split
    /// to shrink every axis. At very large magnitudes adjacent floats can be
    /// further apart than the minimum size, and the center then collapses
    /// onto a corner.
    pub fn can_subdivide(&self) -> bool {
        let center = self.region.center();
        self.region.min_side() > self.min_size
            && self.region.min.cmplt(center).all()
            && center.cmplt(self.region.max).all()
    }

    /// No objects here and no children.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && !self.has_children()
    }

    /// Insert an object into the shallowest node that fully contains it.
    ///
    /// Returns `false` without touching the tree if `bounds` is not
    /// contained in this node's region. Octants are tried in index order
    /// and the first one that contains the object takes it, so exactly one
    /// child is populated per insertion.
    pub fn insert(&mut self, key: K, bounds: &AABB) -> bool {
        if !self.region.contains(bounds) {
            return false;
        }

        if self.can_subdivide() {
            for octant in 0..OCTANT_COUNT {
                if self.insert_into_child(octant, key, bounds) {
                    return true;
                }
            }
        }

        self.objects.push(key);
        true
    }

    /// Try to hand an object to one octant, creating the child on demand.
    fn insert_into_child(&mut self, octant: usize, key: K, bounds: &AABB) -> bool {
        if let Some(child) = self.children[octant].as_mut() {
            return child.insert(key, bounds);
        }

        let child_region = self.region.octant(octant);
        // Only allocate when the child will actually hold the object
        if !child_region.contains(bounds) {
            return false;
        }
        let child = self.children[octant]
            .insert(Box::new(OctreeNode::new(child_region, self.min_size)));
        child.insert(key, bounds)
    }

    /// Remove an object previously inserted with the same `bounds`.
    ///
    /// Returns `false` if `bounds` is outside this node's region or the key
    /// is not stored anywhere on the searched path. Children left empty are
    /// released.
    pub fn remove(&mut self, key: K, bounds: &AABB) -> bool {
        if !self.region.contains(bounds) {
            return false;
        }

        for slot in self.children.iter_mut() {
            let Some(child) = slot.as_mut() else { continue };
            if child.remove(key, bounds) {
                if child.is_empty() {
                    *slot = None;
                }
                return true;
            }
        }

        match self.objects.iter().position(|&k| k == key) {
            Some(pos) => {
                self.objects.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Collect the objects of every node the ray can reach.
    ///
    /// A node is visited when the ray starts inside it or crosses its
    /// surface; otherwise its whole subtree is skipped. The result is a
    /// superset of the objects actually hit, in no particular order.
    pub fn intersect_ray(&self, ray: &Ray, results: &mut Vec<K>) {
        if !self.region.contains_point(ray.origin) && self.region.intersect_ray(ray).is_none() {
            return;
        }

        results.extend_from_slice(&self.objects);
        for (_, child) in self.children() {
            child.intersect_ray(ray, results);
        }
    }

    /// Collect the objects of every node whose region overlaps `region`.
    pub fn intersect_region(&self, region: &AABB, results: &mut Vec<K>) {
        if !self.region.intersects(region) {
            return;
        }

        results.extend_from_slice(&self.objects);
        for (_, child) in self.children() {
            child.intersect_region(region, results);
        }
    }

    /// Visit every node depth-first, parents before children.
    pub fn visit<'a, F>(&'a self, visitor: &mut F)
    where
        F: FnMut(&'a OctreeNode<K>, u32),
    {
        self.visit_at_depth(0, visitor);
    }

    fn visit_at_depth<'a, F>(&'a self, depth: u32, visitor: &mut F)
    where
        F: FnMut(&'a OctreeNode<K>, u32),
    {
        visitor(self, depth);
        for (_, child) in self.children() {
            child.visit_at_depth(depth + 1, visitor);
        }
    }

    /// Number of objects stored in this subtree.
    pub fn object_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |node, _| count += node.objects.len());
        count
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_, _| count += 1);
        count
    }

    /// Depth of the deepest node below this one (0 = no children).
    pub fn depth(&self) -> u32 {
        let mut max_depth = 0;
        self.visit(&mut |_, depth| max_depth = max_depth.max(depth));
        max_depth
    }

    /// Find the node holding `key`, searching only where `bounds` fits.
    pub fn locate(&self, key: K, bounds: &AABB) -> Option<&OctreeNode<K>> {
        if !self.region.contains(bounds) {
            return None;
        }
        for (_, child) in self.children() {
            if let Some(node) = child.locate(key, bounds) {
                return Some(node);
            }
        }
        self.objects.contains(&key).then_some(self)
    }
}

#[cfg(test)]
#[path = "octree_node_tests.rs"]
mod tests;
