/// Axis-aligned bounding box.
///
/// Used both for object bounds and for the regions governed by octree nodes.

use glam::Vec3;
use super::ray::Ray;

/// Axis-Aligned Bounding Box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    /// Create a box from its two corners.
    ///
    /// The corners are stored as given; use `is_valid` to check them.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a cube centered on the origin with the given half side length.
    pub fn cube(half_size: f32) -> Self {
        Self {
            min: Vec3::splat(-half_size),
            max: Vec3::splat(half_size),
        }
    }

    /// Create a degenerate box around a single point (point entities without a model).
    pub fn from_point(point: Vec3) -> Self {
        Self { min: point, max: point }
    }

    /// All components finite and `min <= max` on every axis.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }

    /// Compute the center point of this AABB.
    pub fn center(&self) -> Vec3 {
        // Halve first so bounds near f32::MAX do not overflow
        self.min * 0.5 + self.max * 0.5
    }

    /// Side lengths along x, y and z.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Length of the shortest side.
    pub fn min_side(&self) -> f32 {
        self.size().min_element()
    }

    /// Test if this AABB fully contains another AABB (faces inclusive).
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if a point lies inside or on the surface of this AABB.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.min.cmple(point).all() && self.max.cmpge(point).all()
    }

    /// Test if this AABB intersects (overlaps or touches) another AABB.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Distance along `ray` to the first crossing of this box's surface.
    ///
    /// Slab method. Returns the entry distance when the origin is outside,
    /// the exit distance when it is inside, and `None` when the ray misses
    /// or the box lies entirely behind the origin.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];

            if direction == 0.0 {
                // Parallel to this slab: must already be between its planes
                if origin < self.min[axis] || origin > self.max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t0 = (self.min[axis] - origin) * inv;
            let mut t1 = (self.max[axis] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        if t_far < 0.0 {
            return None;
        }

        Some(if t_near >= 0.0 { t_near } else { t_far })
    }

    /// Compute the AABB of a specific octant (0–7).
    ///
    /// Octant bit layout: bit0 = X (west/east), bit1 = Y (south/north),
    /// bit2 = Z (bottom/top). 0 = low half, 1 = high half for each axis.
    /// The eight octants partition `self` exactly, sharing only faces.
    pub fn octant(&self, octant: usize) -> AABB {
        debug_assert!(octant < 8, "octant index out of range: {}", octant);
        let center = self.center();
        AABB {
            min: Vec3::new(
                if octant & 1 == 0 { self.min.x } else { center.x },
                if octant & 2 == 0 { self.min.y } else { center.y },
                if octant & 4 == 0 { self.min.z } else { center.z },
            ),
            max: Vec3::new(
                if octant & 1 == 0 { center.x } else { self.max.x },
                if octant & 2 == 0 { center.y } else { self.max.y },
                if octant & 4 == 0 { center.z } else { self.max.z },
            ),
        }
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
