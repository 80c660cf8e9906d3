//! EventType - Cheap-to-clone event category identifier
//!
//! Uses Arc<str> internally so registry keys and listener snapshots clone in O(1).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Event category used to route events to listeners.
///
/// The value is opaque: no validation is performed, and the empty string is a
/// legal category like any other. Categories usually follow the informal
/// `"domain:action"` convention.
///
/// # Examples
/// ```
/// use contracts::EventType;
///
/// let ty: EventType = "user:logged_in".into();
/// let ty2 = ty.clone();  // O(1) - just increments ref count
/// assert_eq!(ty, ty2);
/// assert_eq!(ty.as_str(), "user:logged_in");
/// ```
#[derive(Clone, Default)]
pub struct EventType(Arc<str>);

impl EventType {
    /// Create a new EventType from a string slice.
    #[inline]
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the underlying string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Domain part of a `"domain:action"` category, if the convention is followed.
    pub fn domain(&self) -> Option<&str> {
        self.0.split_once(':').map(|(domain, _)| domain)
    }
}

impl Deref for EventType {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for EventType {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EventType {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventType {
    #[inline]
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for EventType {
    #[inline]
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<Arc<str>> for EventType {
    #[inline]
    fn from(s: Arc<str>) -> Self {
        Self(s)
    }
}

impl From<&EventType> for EventType {
    #[inline]
    fn from(ty: &EventType) -> Self {
        ty.clone()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventType({:?})", self.0)
    }
}

impl PartialEq for EventType {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        // Fast path: same Arc pointer
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for EventType {}

impl PartialEq<str> for EventType {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for EventType {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl PartialEq<String> for EventType {
    #[inline]
    fn eq(&self, other: &String) -> bool {
        self.0.as_ref() == other
    }
}

// Must hash exactly like `str` so `HashMap<EventType, _>` can be queried with `&str`.
impl Hash for EventType {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl Serialize for EventType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}
