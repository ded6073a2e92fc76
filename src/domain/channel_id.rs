//! Type-safe restaurant channel identifier.
//!
//! [`ChannelId`] wraps the WhatsApp Cloud API `phone_number_id` of a
//! restaurant's messaging endpoint. One channel maps to exactly one
//! restaurant, so the channel id doubles as the restaurant key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a restaurant's WhatsApp messaging endpoint.
///
/// Used as the dictionary key in [`super::RestaurantRegistry`] and as the
/// first half of the conversation key in [`super::ConversationStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    /// Creates a `ChannelId` from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ChannelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_id() {
        let id = ChannelId::new("1025551323971723");
        assert_eq!(id.to_string(), "1025551323971723");
        assert_eq!(id.as_str(), "1025551323971723");
    }

    #[test]
    fn serializes_transparently() {
        let id = ChannelId::from("42");
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, "\"42\"");
    }

    #[test]
    fn hash_works_in_hashmap() {
        use std::collections::HashMap;
        let id = ChannelId::from("abc");
        let mut map = HashMap::new();
        map.insert(id.clone(), "resto");
        assert_eq!(map.get(&id), Some(&"resto"));
    }
}
