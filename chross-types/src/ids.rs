//! Identity types for Chross.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::WireError;

/// Globally unique identifier of an action.
///
/// UUID v4, serialized as its hyphenated string. Peers compare action ids
/// to detect whether one history contains another.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(uuid::Uuid);

impl ActionId {
    /// Create a new random ActionId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ActionId {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| WireError::InvalidActionId(s.to_string()))
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionId({})", self.0)
    }
}

/// Opaque token identifying one game session.
///
/// Both peers of a game share the key out of band; the pub/sub channel
/// is named after it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameKey(String);

impl GameKey {
    /// Random bytes behind a generated key (12 base64 characters).
    const RANDOM_BYTES: usize = 9;

    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; Self::RANDOM_BYTES];
        getrandom::getrandom(&mut bytes).expect("getrandom failed");
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Validate a key received from configuration.
    ///
    /// Keys must be non-empty and URL-safe, since they end up in channel
    /// names and cache file names.
    pub fn parse(value: &str) -> Result<Self, WireError> {
        let valid = !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(value.to_string()))
        } else {
            Err(WireError::InvalidGameKey(value.to_string()))
        }
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the private pub/sub channel for this game.
    pub fn channel_name(&self) -> String {
        format!("private-{}", self.0)
    }
}

impl TryFrom<String> for GameKey {
    type Error = WireError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<GameKey> for String {
    fn from(key: GameKey) -> Self {
        key.0
    }
}

impl FromStr for GameKey {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameKey({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_id_is_uuid_v4() {
        let id = ActionId::new();
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn action_id_parses_display() {
        let id = ActionId::new();
        let parsed: ActionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn action_id_rejects_garbage() {
        assert!(matches!(
            "not-a-uuid".parse::<ActionId>(),
            Err(WireError::InvalidActionId(_))
        ));
    }

    #[test]
    fn action_id_serializes_as_string() {
        let id = ActionId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }

    #[test]
    fn generated_keys_are_url_safe_and_distinct() {
        let a = GameKey::generate();
        let b = GameKey::generate();
        assert_eq!(a.as_str().len(), 12);
        assert_ne!(a, b);
        assert!(GameKey::parse(a.as_str()).is_ok());
    }

    #[test]
    fn game_key_rejects_empty_and_unsafe() {
        assert!(GameKey::parse("").is_err());
        assert!(GameKey::parse("a/b").is_err());
        assert!(GameKey::parse("has space").is_err());
    }

    #[test]
    fn channel_name_is_private() {
        let key = GameKey::parse("abc123").unwrap();
        assert_eq!(key.channel_name(), "private-abc123");
    }

    #[test]
    fn game_key_deserialization_validates() {
        let ok: GameKey = serde_json::from_str("\"k3y\"").unwrap();
        assert_eq!(ok.as_str(), "k3y");
        assert!(serde_json::from_str::<GameKey>("\"\"").is_err());
    }
}
