/// Octree configuration.

use crate::error::{Error, Result};
use crate::map::ObjectKinds;

/// Configuration for octree behavior
#[derive(Debug, Clone, PartialEq)]
pub struct OctreeConfig {
    /// Nodes whose shortest side is at or below this length never subdivide
    pub min_subdivision_size: f32,

    /// Object kinds accepted by `insert_many` / `remove_many` and map events
    pub indexed_kinds: ObjectKinds,
}

impl OctreeConfig {
    /// Default minimum node side length, in map units
    pub const DEFAULT_MIN_SUBDIVISION_SIZE: f32 = 64.0;

    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum subdivision size
    pub fn with_min_subdivision_size(mut self, size: f32) -> Self {
        self.min_subdivision_size = size;
        self
    }

    /// Set the object kinds accepted by the index
    pub fn with_indexed_kinds(mut self, kinds: ObjectKinds) -> Self {
        self.indexed_kinds = kinds;
        self
    }

    /// Check the configuration before building a tree with it.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the minimum size is not a finite positive number
    /// - `InvalidConfig` if no object kind is indexed
    pub fn validate(&self) -> Result<()> {
        if !self.min_subdivision_size.is_finite() || self.min_subdivision_size <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "min_subdivision_size must be finite and > 0, got {}",
                self.min_subdivision_size
            )));
        }
        if self.indexed_kinds.is_empty() {
            return Err(Error::InvalidConfig(
                "indexed_kinds must contain at least one object kind".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            min_subdivision_size: Self::DEFAULT_MIN_SUBDIVISION_SIZE,
            indexed_kinds: ObjectKinds::default(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
