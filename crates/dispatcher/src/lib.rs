//! # Dispatcher
//!
//! In-process publish/subscribe bus.
//!
//! Responsibilities:
//! - Keep an ordered listener list per event category
//! - Deliver each published event to its category's listeners, in order
//! - Stay safe under concurrent subscribe/publish from any thread
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use dispatcher::{Dispatcher, Event, EventType};
//!
//! struct UserLoggedIn {
//!     user_id: String,
//! }
//!
//! impl Event for UserLoggedIn {
//!     fn event_type(&self) -> EventType {
//!         "user:logged_in".into()
//!     }
//! }
//!
//! let bus = Dispatcher::new();
//! let logins = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&logins);
//! bus.subscribe_typed("user:logged_in", move |e: &UserLoggedIn| {
//!     assert_eq!(e.user_id, "user-123");
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! bus.publish(UserLoggedIn { user_id: "user-123".into() });
//! assert_eq!(logins.load(Ordering::SeqCst), 1);
//! ```

pub mod dispatcher;
pub mod metrics;
mod registry;

pub use contracts::{Event, EventBus, EventError, EventListener, EventType};
pub use dispatcher::{Dispatcher, DispatcherConfig, FailurePolicy};
pub use metrics::{BusMetrics, MetricsSnapshot};
