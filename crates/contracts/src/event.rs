//! Event trait - the single capability the bus requires of a payload
//!
//! Concrete events are plain user types. Listeners receive `&dyn Event` and
//! recover the concrete type with [`downcast_ref`](trait.Event.html#method.downcast_ref).

use std::any::Any;

use crate::EventType;

/// Upcast helper so `&dyn Event` can be turned into `&dyn Any`.
///
/// Blanket-implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An immutable value describing something that happened.
///
/// The bus only ever asks an event for its category; payload fields are opaque
/// to it and are delivered to listeners untouched.
///
/// # Examples
/// ```
/// use contracts::{Event, EventType};
///
/// #[derive(Debug)]
/// struct UserLoggedIn {
///     user_id: String,
/// }
///
/// impl Event for UserLoggedIn {
///     fn event_type(&self) -> EventType {
///         "user:logged_in".into()
///     }
/// }
///
/// let ev: &dyn Event = &UserLoggedIn { user_id: "user-123".into() };
/// assert_eq!(ev.event_type(), "user:logged_in");
/// assert_eq!(ev.downcast_ref::<UserLoggedIn>().unwrap().user_id, "user-123");
/// ```
pub trait Event: AsAny + Send + Sync + 'static {
    /// Category used to route this event. Must be a pure function of `self`.
    fn event_type(&self) -> EventType;

    /// Name of the concrete type, for diagnostics only.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl dyn Event {
    /// Returns `true` if the concrete event type is `T`.
    #[inline]
    pub fn is<T: Event>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrow the concrete event, or `None` if it is not a `T`.
    #[inline]
    pub fn downcast_ref<T: Event>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}
