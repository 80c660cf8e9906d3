//! Dispatcher - routes published events to subscribed listeners

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use contracts::{Event, EventBus, EventError, EventListener, EventType};

use crate::metrics::{BusMetrics, MetricsSnapshot};
use crate::registry::{ListenerList, Registry};

/// What a publish does when a listener panics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Let the panic unwind out of `publish`; later listeners in that call do not run
    #[default]
    Propagate,
    /// Catch the panic, log it, and keep invoking the remaining listeners
    Isolate,
}

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Bus name, used as the `bus` field in logs and metric labels
    pub name: String,
    /// Listener panic handling
    pub failure_policy: FailurePolicy,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            failure_policy: FailurePolicy::Propagate,
        }
    }
}

impl DispatcherConfig {
    /// Default configuration with a custom bus name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }
}

/// In-process publish/subscribe bus
///
/// Each instance owns an independent registry; two dispatchers never see each
/// other's listeners or events. All methods take `&self` and are safe to call
/// from any number of threads, typically through an `Arc<Dispatcher>`.
///
/// Listeners run synchronously on the publisher's thread, in registration
/// order, with no lock held. A listener may therefore publish or subscribe on
/// the same dispatcher.
pub struct Dispatcher {
    name: Arc<str>,
    failure_policy: FailurePolicy,
    registry: Registry,
    metrics: BusMetrics,
}

impl Dispatcher {
    /// Create a dispatcher with an empty registry and default configuration
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            name: Arc::from(config.name),
            failure_policy: config.failure_policy,
            registry: Registry::default(),
            metrics: BusMetrics::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Register `listener` for `event_type`
    ///
    /// The listener is appended after every listener already registered for
    /// that category, and is visible to every publish that starts after this
    /// call returns.
    pub fn subscribe<F>(&self, event_type: impl Into<EventType>, listener: F)
    where
        F: Fn(&dyn Event) + Send + Sync + 'static,
    {
        self.register(event_type.into(), Arc::new(listener));
    }

    /// Register a listener that only wants events of concrete type `E`
    ///
    /// An event of another type published under the same category is a logic
    /// error in the caller: it is logged and this listener is skipped.
    pub fn subscribe_typed<E, F>(&self, event_type: impl Into<EventType>, listener: F)
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let bus = Arc::clone(&self.name);
        self.subscribe(event_type, move |event: &dyn Event| {
            match event.downcast_ref::<E>() {
                Some(typed) => listener(typed),
                None => {
                    let err = EventError::type_mismatch(
                        event.event_type(),
                        std::any::type_name::<E>(),
                        event.type_name(),
                    );
                    error!(bus = %bus, error = %err, "Typed listener skipped");
                }
            }
        });
    }

    /// Publish an owned event
    pub fn publish<E: Event>(&self, event: E) {
        self.publish_ref(&event);
    }

    /// Publish an event by reference
    ///
    /// Invokes every listener registered for the event's category at the
    /// moment of lookup, in registration order. Publishing to a category with
    /// no listeners is a no-op.
    pub fn publish_ref(&self, event: &dyn Event) {
        let event_type = event.event_type();
        let listeners = self.registry.snapshot(&event_type);
        let count = listeners.as_ref().map_or(0, |list| list.len());

        self.metrics.inc_published();
        observability::record_event_published(&self.name, &event_type, count);

        let Some(listeners) = listeners else {
            self.metrics.inc_unrouted();
            trace!(bus = %self.name, event_type = %event_type, "No listeners, event dropped");
            return;
        };

        trace!(
            bus = %self.name,
            event_type = %event_type,
            listeners = count,
            "Dispatching event"
        );

        match self.failure_policy {
            FailurePolicy::Propagate => self.dispatch(&event_type, &listeners, event),
            FailurePolicy::Isolate => self.dispatch_isolated(&event_type, &listeners, event),
        }
    }

    /// Number of listeners currently registered for `event_type`
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.registry.len(event_type)
    }

    /// Categories with at least one listener, in no particular order
    pub fn event_types(&self) -> Vec<EventType> {
        self.registry.event_types()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn register(&self, event_type: EventType, listener: EventListener) {
        self.metrics.inc_subscriptions();
        observability::record_subscription(&self.name, &event_type);

        let listeners = self.registry.insert(event_type.clone(), listener);
        debug!(
            bus = %self.name,
            event_type = %event_type,
            listeners = listeners,
            "Listener subscribed"
        );
    }

    fn dispatch(&self, event_type: &EventType, listeners: &ListenerList, event: &dyn Event) {
        for listener in listeners.iter() {
            listener(event);
            self.record_delivered(event_type);
        }
    }

    fn record_delivered(&self, event_type: &EventType) {
        self.metrics.inc_delivered();
        observability::record_listener_invocation(&self.name, event_type);
    }

    fn dispatch_isolated(
        &self,
        event_type: &EventType,
        listeners: &ListenerList,
        event: &dyn Event,
    ) {
        for (index, listener) in listeners.iter().enumerate() {
            match panic::catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(()) => self.record_delivered(event_type),
                Err(payload) => {
                    self.metrics.inc_failed();
                    observability::record_listener_failure(&self.name, event_type);

                    let err = EventError::listener_panicked(
                        event_type,
                        index,
                        panic_message(payload.as_ref()),
                    );
                    error!(bus = %self.name, error = %err, "Listener panicked, continuing dispatch");
                }
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("name", &self.name)
            .field("failure_policy", &self.failure_policy)
            .field("event_types", &self.registry.event_types().len())
            .finish()
    }
}

impl EventBus for Dispatcher {
    fn subscribe_listener(&self, event_type: EventType, listener: EventListener) {
        self.register(event_type, listener);
    }

    fn publish_ref(&self, event: &dyn Event) {
        Dispatcher::publish_ref(self, event);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
