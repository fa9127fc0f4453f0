use super::*;
use glam::Vec3;

fn make_aabb(min: Vec3, max: Vec3) -> AABB {
    AABB::new(min, max)
}

/// 2048-unit cube split down to 64-unit leaves (depth 5).
fn world_node() -> OctreeNode<u32> {
    OctreeNode::new(AABB::cube(1024.0), 64.0)
}

/// Small box centered on `center`.
fn small_box(center: Vec3) -> AABB {
    make_aabb(center - Vec3::splat(4.0), center + Vec3::splat(4.0))
}

/// Check the placement invariant on every node, given the bounds of each key.
fn assert_placement_invariant(root: &OctreeNode<u32>, bounds_of: &dyn Fn(u32) -> AABB) {
    root.visit(&mut |node, _| {
        for &key in node.objects() {
            let bounds = bounds_of(key);
            assert!(node.region().contains(&bounds), "key {} outside its node", key);
            if node.can_subdivide() {
                for octant in 0..OCTANT_COUNT {
                    assert!(
                        !node.region().octant(octant).contains(&bounds),
                        "key {} should have been pushed into octant {}",
                        key,
                        octant
                    );
                }
            }
        }
    });
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_node_is_empty() {
    let node = world_node();
    assert!(node.is_empty());
    assert!(!node.has_children());
    assert_eq!(node.node_count(), 1);
    assert_eq!(node.object_count(), 0);
    assert_eq!(node.depth(), 0);
    assert!(node.can_subdivide());
}

#[test]
fn test_min_size_node_cannot_subdivide() {
    let node: OctreeNode<u32> = OctreeNode::new(AABB::cube(16.0), 64.0);
    assert!(!node.can_subdivide());

    // Side exactly equal to the minimum does not subdivide either
    let node: OctreeNode<u32> = OctreeNode::new(AABB::cube(32.0), 64.0);
    assert!(!node.can_subdivide());
}

// ============================================================================
// Insert
// ============================================================================

#[test]
fn test_insert_outside_region_fails_without_mutation() {
    let mut node = world_node();
    let outside = make_aabb(Vec3::splat(1000.0), Vec3::splat(1100.0));
    assert!(!node.insert(1, &outside));
    assert!(node.is_empty());
    assert_eq!(node.node_count(), 1);
}

#[test]
fn test_insert_descends_to_deepest_containing_node() {
    let mut node = world_node();
    let bounds = small_box(Vec3::splat(1000.0));
    assert!(node.insert(1, &bounds));

    assert!(node.objects().is_empty());
    let holder = node.locate(1, &bounds).unwrap();
    // 2048 / 2^5 = 64: leaf size reached
    assert_eq!(holder.region().size(), Vec3::splat(64.0));
    assert!(!holder.can_subdivide());
    assert_eq!(node.depth(), 5);
    // One chain of children only
    assert_eq!(node.node_count(), 6);
}

#[test]
fn test_insert_straddling_object_stays_at_root() {
    let mut node = world_node();
    let straddling = make_aabb(Vec3::new(-10.0, 100.0, 100.0), Vec3::new(10.0, 120.0, 120.0));
    assert!(node.insert(1, &straddling));
    assert_eq!(node.objects(), &[1]);
    assert!(!node.has_children());
}

#[test]
fn test_insert_populates_exactly_one_child() {
    let mut node = world_node();
    assert!(node.insert(1, &small_box(Vec3::new(500.0, 500.0, 500.0))));
    assert_eq!(node.children().count(), 1);
    assert_eq!(node.children().next().unwrap().0, 7);
}

#[test]
fn test_object_on_center_plane_goes_to_first_octant() {
    let mut node = world_node();
    // Flat on the x = 0 plane, inside the low y/z half
    let flat = make_aabb(Vec3::new(0.0, -600.0, -600.0), Vec3::new(0.0, -500.0, -500.0));
    assert!(node.insert(1, &flat));
    assert_eq!(node.children().count(), 1);
    assert!(node.child(0).is_some());
    assert!(node.child(1).is_none());
}

#[test]
fn test_point_object_is_indexed() {
    let mut node = world_node();
    let point = AABB::from_point(Vec3::new(300.0, -300.0, 10.0));
    assert!(node.insert(1, &point));
    assert_eq!(node.object_count(), 1);
    assert!(node.locate(1, &point).is_some());
}

#[test]
fn test_region_one_ulp_wide_cannot_subdivide() {
    let next = f32::from_bits(1.0f32.to_bits() + 1);
    let region = make_aabb(Vec3::ONE, Vec3::splat(next));
    let mut node: OctreeNode<u32> = OctreeNode::new(region, 1.0e-30);
    assert!(region.min_side() > 1.0e-30);
    assert!(!node.can_subdivide());

    assert!(node.insert(1, &region));
    assert_eq!(node.objects(), &[1]);
    assert!(!node.has_children());
}

#[test]
fn test_huge_region_stops_where_floats_run_out() {
    let region = make_aabb(Vec3::splat(3.0e38), Vec3::splat(3.4e38));
    let mut node: OctreeNode<u32> = OctreeNode::new(region, 64.0);
    let bounds = AABB::from_point(Vec3::splat(3.1e38));

    assert!(node.insert(7, &bounds));
    assert!(node.depth() > 0);
    node.visit(&mut |n, _| {
        if n.has_children() {
            assert!(n.can_subdivide());
        }
    });
    assert!(node.locate(7, &bounds).is_some());
    assert!(node.remove(7, &bounds));
    assert!(node.is_empty());
}

#[test]
fn test_min_size_stops_subdivision() {
    let mut node = world_node();
    for i in 0..50u32 {
        let offset = i as f32 * 19.0 - 470.0;
        node.insert(i, &small_box(Vec3::new(offset, -offset, offset * 0.5)));
    }
    node.visit(&mut |n, _| {
        if n.region().min_side() <= 64.0 {
            assert!(!n.has_children());
        }
    });
}

#[test]
fn test_placement_invariant_after_many_inserts() {
    let mut node = world_node();
    let bounds_of = |key: u32| {
        let f = key as f32;
        let center = Vec3::new(
            (f * 37.0) % 1800.0 - 900.0,
            (f * 53.0) % 1800.0 - 900.0,
            (f * 71.0) % 1800.0 - 900.0,
        );
        let half = 2.0 + (key % 5) as f32 * 30.0;
        make_aabb(center - Vec3::splat(half), center + Vec3::splat(half))
    };
    for key in 0..200 {
        assert!(node.insert(key, &bounds_of(key)));
    }
    assert_eq!(node.object_count(), 200);
    assert_placement_invariant(&node, &bounds_of);
}

// ============================================================================
// Remove
// ============================================================================

#[test]
fn test_remove_existing_object() {
    let mut node = world_node();
    let bounds = small_box(Vec3::splat(-700.0));
    node.insert(1, &bounds);

    assert!(node.remove(1, &bounds));
    assert_eq!(node.object_count(), 0);
    assert!(node.locate(1, &bounds).is_none());
}

#[test]
fn test_remove_releases_empty_children() {
    let mut node = world_node();
    let bounds = small_box(Vec3::splat(-700.0));
    node.insert(1, &bounds);
    assert!(node.node_count() > 1);

    node.remove(1, &bounds);
    assert!(node.is_empty());
    assert_eq!(node.node_count(), 1);
}

#[test]
fn test_remove_keeps_shared_branch() {
    let mut node = world_node();
    let a = small_box(Vec3::splat(700.0));
    let b = small_box(Vec3::splat(710.0));
    node.insert(1, &a);
    node.insert(2, &b);

    assert!(node.remove(1, &a));
    assert!(node.locate(2, &b).is_some());
    assert_eq!(node.object_count(), 1);
}

#[test]
fn test_remove_missing_object_reports_not_found() {
    let mut node = world_node();
    let bounds = small_box(Vec3::splat(100.0));
    node.insert(1, &bounds);

    assert!(!node.remove(2, &bounds));
    assert_eq!(node.object_count(), 1);
}

#[test]
fn test_remove_with_wrong_bounds_does_not_find_object() {
    let mut node = world_node();
    let bounds = small_box(Vec3::splat(100.0));
    node.insert(1, &bounds);

    // Bounds pointing to another branch: search is pruned there
    assert!(!node.remove(1, &small_box(Vec3::splat(-100.0))));
    assert_eq!(node.object_count(), 1);
}

#[test]
fn test_remove_outside_region_fails_fast() {
    let mut node = world_node();
    assert!(!node.remove(1, &small_box(Vec3::splat(5000.0))));
}

// ============================================================================
// Ray intersection
// ============================================================================

#[test]
fn test_ray_collects_objects_along_its_path() {
    let mut node = world_node();
    let on_path = small_box(Vec3::new(500.0, 10.0, 10.0));
    let off_path = small_box(Vec3::new(500.0, -700.0, -700.0));
    node.insert(1, &on_path);
    node.insert(2, &off_path);

    let ray = Ray::new(Vec3::new(-2000.0, 10.0, 10.0), Vec3::X);
    let mut results = Vec::new();
    node.intersect_ray(&ray, &mut results);

    assert!(results.contains(&1));
    assert!(!results.contains(&2));
}

#[test]
fn test_ray_missing_world_returns_nothing() {
    let mut node = world_node();
    node.insert(1, &small_box(Vec3::new(-10.0, 0.0, 0.0)));

    let ray = Ray::new(Vec3::new(0.0, 5000.0, 0.0), Vec3::Y);
    let mut results = Vec::new();
    node.intersect_ray(&ray, &mut results);
    assert!(results.is_empty());
}

#[test]
fn test_ray_starting_inside_visits_node() {
    let mut node = world_node();
    let straddling = make_aabb(Vec3::splat(-10.0), Vec3::splat(10.0));
    node.insert(1, &straddling);

    let ray = Ray::new(Vec3::ZERO, Vec3::Z);
    let mut results = Vec::new();
    node.intersect_ray(&ray, &mut results);
    assert_eq!(results, vec![1]);
}

#[test]
fn test_ray_results_have_no_duplicates() {
    let mut node = world_node();
    for key in 0..20u32 {
        node.insert(key, &small_box(Vec3::new(key as f32 * 40.0 - 400.0, 20.5, 20.5)));
    }

    let ray = Ray::new(Vec3::new(-1500.0, 20.5, 20.5), Vec3::X);
    let mut results = Vec::new();
    node.intersect_ray(&ray, &mut results);
    results.sort();
    let before = results.len();
    results.dedup();
    assert_eq!(before, results.len());
    assert_eq!(results.len(), 20);
}

// ============================================================================
// Region intersection
// ============================================================================

#[test]
fn test_region_query_prunes_far_branches() {
    let mut node = world_node();
    node.insert(1, &small_box(Vec3::splat(600.0)));
    node.insert(2, &small_box(Vec3::splat(-600.0)));

    let mut results = Vec::new();
    node.intersect_region(&make_aabb(Vec3::splat(500.0), Vec3::splat(700.0)), &mut results);
    assert_eq!(results, vec![1]);
}
