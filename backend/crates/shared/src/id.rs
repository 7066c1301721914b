//! Common ID Types
//!
//! The backend keys every record with an unsigned integer. These wrappers
//! keep an app id from being passed where a review id is expected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Generic typed ID wrapper
///
/// ```
/// use kernel::id::AppId;
///
/// let id: AppId = "42".parse().unwrap();
/// assert_eq!(id.get(), 42);
/// assert!("".parse::<AppId>().is_err());
/// assert!("4x".parse::<AppId>().is_err());
/// ```
pub struct Id<T> {
    value: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub const fn get(&self) -> u64 {
        self.value
    }
}

// Manual impls: derives would put bounds on the marker type.
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

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
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

impl<T> From<u64> for Id<T> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

/// Error for a path segment that is not a record id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid id: {0:?}")]
pub struct InvalidId(pub String);

impl<T> FromStr for Id<T> {
    type Err = InvalidId;

    /// Only plain decimal digits are accepted: no sign, no whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidId(s.to_string()));
        }
        s.parse::<u64>()
            .map(Self::new)
            .map_err(|_| InvalidId(s.to_string()))
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::new)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    pub struct App;
    pub struct AppImage;
    pub struct Review;
    pub struct Boost;
}

pub type AppId = Id<markers::App>;
pub type AppImageId = Id<markers::AppImage>;
pub type ReviewId = Id<markers::Review>;
pub type BoostId = Id<markers::Boost>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_digits_only() {
        assert_eq!("7".parse::<AppId>().unwrap().get(), 7);
        assert_eq!("007".parse::<AppId>().unwrap().get(), 7);
        assert!("".parse::<AppId>().is_err());
        assert!("-1".parse::<AppId>().is_err());
        assert!("+1".parse::<AppId>().is_err());
        assert!(" 1".parse::<AppId>().is_err());
        assert!("1,2".parse::<AppId>().is_err());
        assert!("99999999999999999999999".parse::<AppId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = ReviewId::new(12);
        assert_eq!(serde_json::to_string(&id).unwrap(), "12");
        let back: ReviewId = serde_json::from_str("12").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_display() {
        assert_eq!(AppId::new(3).to_string(), "3");
    }
}
