//! # Contracts
//!
//! Shared interface types for the event bus workspace.
//! Business crates depend on this crate for event, listener and error types;
//! reverse dependencies are prohibited.
//!
//! ## Routing Model
//! - Every event reports an [`EventType`] computed by the event itself
//! - Listeners are registered per `EventType` and matched by exact equality
//! - Event categories conventionally follow `"domain:action"` (not enforced)

mod bus;
mod error;
mod event;
mod event_type;

pub use bus::{EventBus, EventListener};
pub use error::*;
pub use event::{AsAny, Event};
pub use event_type::EventType;
