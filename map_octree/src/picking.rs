//! Ordering of pick candidates.
//!
//! The octree only narrows a pick ray down to candidates. The editor runs
//! its exact per-object hit test (brush faces, entity models) and wants the
//! hits nearest first; `pick` does that ordering.

/// One exact hit along a pick ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit<K> {
    /// Object that was hit
    pub key: K,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
}

/// Run `hit_test` on each candidate and return the hits sorted by distance.
///
/// Candidates for which `hit_test` returns `None`, a negative distance or
/// NaN are dropped. Hits at equal distance keep candidate order.
pub fn pick<K, I, F>(candidates: I, mut hit_test: F) -> Vec<PickHit<K>>
where
    I: IntoIterator<Item = K>,
    K: Copy,
    F: FnMut(K) -> Option<f32>,
{
    let mut hits: Vec<PickHit<K>> = candidates
        .into_iter()
        .filter_map(|key| {
            hit_test(key)
                .filter(|distance| *distance >= 0.0)
                .map(|distance| PickHit { key, distance })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Nearest hit, if any.
pub fn pick_nearest<K, I, F>(candidates: I, hit_test: F) -> Option<PickHit<K>>
where
    I: IntoIterator<Item = K>,
    K: Copy,
    F: FnMut(K) -> Option<f32>,
{
    pick(candidates, hit_test).into_iter().next()
}

#[cfg(test)]
#[path = "picking_tests.rs"]
mod tests;
