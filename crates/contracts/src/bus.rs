//! EventBus trait - publish/subscribe interface
//!
//! Collaborators that only need to publish or subscribe can hold an
//! `Arc<dyn EventBus>` instead of a concrete dispatcher.

use std::sync::Arc;

use crate::{Event, EventType};

/// Registered unit of behavior, invoked once per matching publish.
///
/// Stored behind `Arc` so a dispatch can snapshot the listener list cheaply.
pub type EventListener = Arc<dyn Fn(&dyn Event) + Send + Sync>;

/// Publish/subscribe interface
///
/// Implementations must be safe to call from any number of threads at once.
pub trait EventBus: Send + Sync {
    /// Append `listener` to the listeners of `event_type`.
    ///
    /// Listeners for one category are invoked in registration order.
    fn subscribe_listener(&self, event_type: EventType, listener: EventListener);

    /// Invoke every listener registered for `event.event_type()`.
    ///
    /// Publishing to a category without listeners is a no-op.
    fn publish_ref(&self, event: &dyn Event);
}
