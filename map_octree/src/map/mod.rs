//! Map model contract
//!
//! The index does not know the editor's document model. It sees objects
//! through the `MapObject` trait and learns about changes through
//! `MapEvent`s dispatched by a `MapEvents` registry.

mod map_object;
mod map_events;
#[cfg(test)]
pub(crate) mod mock_map;

pub use map_object::{MapObject, ObjectKind, ObjectKinds};
pub use map_events::{ListenerKey, MapEvent, MapEvents, MapListener, Subscription};
