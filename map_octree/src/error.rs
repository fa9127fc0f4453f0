//! Error types for the map octree
//!
//! This module defines the error types returned at the index boundary:
//! malformed regions, objects outside the world, and desynchronization
//! between the index and the document model.

use std::fmt;

/// Result type for map octree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Map octree errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Region with non-finite components or min > max
    InvalidBounds(String),

    /// Object bounds not contained in the world region
    OutOfBounds(String),

    /// Object key is already present in the index
    AlreadyIndexed(String),

    /// Object key not found where its bounds say it should be
    ObjectNotFound(String),

    /// Invalid octree configuration
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidBounds(msg) => write!(f, "Invalid bounds: {}", msg),
            Error::OutOfBounds(msg) => write!(f, "Object outside world bounds: {}", msg),
            Error::AlreadyIndexed(msg) => write!(f, "Object already indexed: {}", msg),
            Error::ObjectNotFound(msg) => write!(f, "Object not found: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
