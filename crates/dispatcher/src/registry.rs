//! Registry - category to ordered listener list

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::{EventListener, EventType};

/// Listener list shared between the registry and in-flight dispatches.
pub type ListenerList = Arc<Vec<EventListener>>;

/// Append-only listener registry guarded by one mutex.
///
/// Lists are copy-on-write: a publish takes an `Arc` snapshot under the lock
/// and invokes it after releasing, and a subscribe racing that publish clones
/// the list instead of mutating the snapshot.
#[derive(Default)]
pub(crate) struct Registry {
    listeners: Mutex<HashMap<EventType, ListenerList>>,
}

impl Registry {
    /// Append a listener and return the new list length for that category.
    pub fn insert(&self, event_type: EventType, listener: EventListener) -> usize {
        let mut map = self.lock();
        let list = map.entry(event_type).or_default();
        Arc::make_mut(list).push(listener);
        list.len()
    }

    /// Listeners registered for `event_type` at this instant.
    pub fn snapshot(&self, event_type: &str) -> Option<ListenerList> {
        self.lock().get(event_type).cloned()
    }

    pub fn len(&self, event_type: &str) -> usize {
        self.lock().get(event_type).map_or(0, |list| list.len())
    }

    pub fn event_types(&self) -> Vec<EventType> {
        self.lock().keys().cloned().collect()
    }

    // Nothing panics while the guard is held except allocation failure, and the
    // map is append-only, so a poisoned lock still guards a consistent registry.
    fn lock(&self) -> MutexGuard<'_, HashMap<EventType, ListenerList>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
