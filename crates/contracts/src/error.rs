//! Event bus error definitions
//!
//! Delivery itself is infallible; these errors describe listener-side faults
//! that the dispatcher reports without surfacing them to the publisher.

use thiserror::Error;

use crate::EventType;

/// Unified error type
#[derive(Debug, Error)]
pub enum EventError {
    /// A typed listener received an event of a different concrete type
    #[error("listener for '{event_type}' expected {expected}, got {actual}")]
    TypeMismatch {
        event_type: EventType,
        expected: &'static str,
        actual: &'static str,
    },

    /// A listener panicked while handling an event
    #[error("listener #{index} for '{event_type}' panicked: {message}")]
    ListenerPanicked {
        event_type: EventType,
        index: usize,
        message: String,
    },
}

impl EventError {
    /// Create a type mismatch error
    pub fn type_mismatch(
        event_type: impl Into<EventType>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            event_type: event_type.into(),
            expected,
            actual,
        }
    }

    /// Create a listener panic error
    pub fn listener_panicked(
        event_type: impl Into<EventType>,
        index: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::ListenerPanicked {
            event_type: event_type.into(),
            index,
            message: message.into(),
        }
    }
}
