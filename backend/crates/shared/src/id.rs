//! Common ID Types
//!
//! Type-safe wrappers around the `BIGSERIAL` keys of persisted entities.
//! The type parameter is the entity itself, so a `DeviceId` can never be
//! passed where a `TaskId` is expected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::error::app_error::{AppError, AppResult};

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::Id;
///
/// struct Device;
/// type DeviceId = Id<Device>;
///
/// let id = DeviceId::from_raw(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(serde_json::to_string(&id).unwrap(), "42");
/// ```
pub struct Id<T> {
    value: i64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Placeholder carried by entities that have not been persisted yet
    pub const fn unassigned() -> Self {
        Self::from_raw(0)
    }

    /// Wrap a raw database key
    pub const fn from_raw(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Accept an id supplied by a client (path segment, body field)
    ///
    /// Only positive values name a row.
    pub fn parse(value: i64) -> AppResult<Self> {
        if value <= 0 {
            return Err(AppError::bad_request(format!("Invalid id: {}", value)));
        }
        Ok(Self::from_raw(value))
    }

    pub const fn value(&self) -> i64 {
        self.value
    }

    pub const fn is_assigned(&self) -> bool {
        self.value > 0
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<Id<T>> for i64 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        if value <= 0 {
            return Err(serde::de::Error::custom(format!("invalid id: {}", value)));
        }
        Ok(Self::from_raw(value))
    }
}
