/// Map change notifications.
///
/// The document model owns a `MapEvents` registry and dispatches a
/// `MapEvent` around every structural change. Listeners subscribe with an
/// `Rc<RefCell<_>>` and get back a `Subscription`; dropping the subscription
/// removes the listener, so a listener never outlives its registration.
///
/// Single-threaded by construction (`Rc`/`RefCell`).

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use slotmap::{new_key_type, SlotMap};
use crate::geometry::AABB;
use crate::octree_warn;

const LOG_SOURCE: &str = "map_octree::MapEvents";

new_key_type! {
    /// Stable key of a registered listener.
    pub struct ListenerKey;
}

/// A change to the map, sent before or after it happens.
///
/// "Will" events carry objects whose bounds are still the ones the index
/// knows; "did" events carry the updated objects.
#[derive(Debug, Clone, Copy)]
pub enum MapEvent<'a, O> {
    /// Objects were added to the map
    ObjectsAdded(&'a [O]),
    /// Objects are about to be removed
    ObjectsWillBeRemoved(&'a [O]),
    /// Objects are about to change (bounds, properties, definition)
    ObjectsWillChange(&'a [O]),
    /// Objects finished changing
    ObjectsDidChange(&'a [O]),
    /// A document was loaded; `objects` is its full content
    MapLoaded {
        world_bounds: AABB,
        objects: &'a [O],
    },
    /// The document was cleared
    MapCleared {
        world_bounds: AABB,
    },
}

impl<O> MapEvent<'_, O> {
    /// Short name used in log messages
    pub fn name(&self) -> &'static str {
        match self {
            MapEvent::ObjectsAdded(_) => "ObjectsAdded",
            MapEvent::ObjectsWillBeRemoved(_) => "ObjectsWillBeRemoved",
            MapEvent::ObjectsWillChange(_) => "ObjectsWillChange",
            MapEvent::ObjectsDidChange(_) => "ObjectsDidChange",
            MapEvent::MapLoaded { .. } => "MapLoaded",
            MapEvent::MapCleared { .. } => "MapCleared",
        }
    }
}

/// Receiver of map change notifications.
pub trait MapListener<O> {
    /// Handle one event. Called synchronously from `MapEvents::dispatch`.
    fn on_map_event(&mut self, event: &MapEvent<'_, O>);
}

type Registry<O> = RefCell<SlotMap<ListenerKey, Rc<RefCell<dyn MapListener<O>>>>>;

/// Listener registry owned by the document model.
pub struct MapEvents<O: 'static> {
    registry: Rc<Registry<O>>,
}

impl<O: 'static> MapEvents<O> {
    /// Create a registry with no listeners
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(SlotMap::with_key())),
        }
    }

    /// Register a listener.
    ///
    /// The registry keeps the listener alive until the returned
    /// `Subscription` is dropped.
    pub fn subscribe<L>(&self, listener: Rc<RefCell<L>>) -> Subscription<O>
    where
        L: MapListener<O> + 'static,
    {
        let listener: Rc<RefCell<dyn MapListener<O>>> = listener;
        let key = self.registry.borrow_mut().insert(listener);
        Subscription {
            key,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Deliver `event` to every listener registered at the time of the call.
    ///
    /// A listener unsubscribed by an earlier listener during the same
    /// dispatch is skipped. A listener that is already busy (the event was
    /// dispatched from inside its own handler) is skipped with a warning.
    pub fn dispatch(&self, event: &MapEvent<'_, O>) {
        let keys: Vec<ListenerKey> = self.registry.borrow().keys().collect();
        for key in keys {
            let listener = match self.registry.borrow().get(key) {
                Some(listener) => listener.clone(),
                None => continue,
            };
            let borrowed = listener.try_borrow_mut();
            match borrowed {
                Ok(mut listener) => listener.on_map_event(event),
                Err(_) => {
                    octree_warn!(
                        LOG_SOURCE,
                        "Skipping re-entrant delivery of {}",
                        event.name()
                    );
                }
            };
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().len()
    }
}

impl<O: 'static> Default for MapEvents<O> {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration handle returned by `MapEvents::subscribe`.
///
/// Dropping it removes the listener. It holds the registry weakly, so it
/// may outlive the registry itself.
pub struct Subscription<O: 'static> {
    key: ListenerKey,
    registry: Weak<Registry<O>>,
}

impl<O: 'static> Subscription<O> {
    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().contains_key(self.key))
    }

    /// Remove the listener now
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl<O: 'static> Drop for Subscription<O> {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else { return };
        let removed = match registry.try_borrow_mut() {
            Ok(mut registry) => registry.remove(self.key),
            Err(_) => {
                octree_warn!(LOG_SOURCE, "Registry busy, listener {:?} stays subscribed", self.key);
                None
            }
        };
        // Released after the registry borrow ends: the listener may own
        // subscriptions of its own to this registry
        drop(removed);
    }
}

#[cfg(test)]
#[path = "map_events_tests.rs"]
mod tests;
