//! Committed actions.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{ActionId, Pole};

/// A single action in a game's history.
///
/// The common header (`id`, `actedAt`, `pole`) is shared by every game;
/// the game-specific fields of `body` are flattened next to it on the wire.
/// Actions are immutable once created. `acted_at` is advisory metadata;
/// the authoritative order is the position in the action log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action<M> {
    /// Globally unique id
    pub id: ActionId,
    /// Wall clock milliseconds since the Unix epoch at the originator
    pub acted_at: u64,
    /// Pole of the client that originated the action
    pub pole: Pole,
    /// Game-specific payload
    #[serde(flatten)]
    pub body: M,
}

impl<M> Action<M> {
    /// Create an action with a fresh id stamped with the current time.
    pub fn new(pole: Pole, body: M) -> Self {
        Self {
            id: ActionId::new(),
            acted_at: now_millis(),
            pole,
            body,
        }
    }

    /// Create an action with an explicit header (replays, tests).
    pub fn with_header(id: ActionId, acted_at: u64, pole: Pole, body: M) -> Self {
        Self {
            id,
            acted_at,
            pole,
            body,
        }
    }
}

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Say {
        message: String,
        hand_index: usize,
    }

    #[test]
    fn body_is_flattened_into_header() {
        let action = Action::new(
            Pole::South,
            Say {
                message: "hi".into(),
                hand_index: 2,
            },
        );
        let json = serde_json::to_value(&action).unwrap();

        assert_eq!(json["pole"], "south");
        assert_eq!(json["message"], "hi");
        assert_eq!(json["handIndex"], 2);
        assert_eq!(json["id"], action.id.to_string());
        assert!(json["actedAt"].as_u64().unwrap() > 0);
        assert!(json.get("body").is_none());
    }

    #[test]
    fn parses_flat_wire_shape() {
        let id = ActionId::new();
        let raw = serde_json::json!({
            "id": id.to_string(),
            "actedAt": 1700000000000u64,
            "pole": "north",
            "message": "gg",
            "handIndex": 0
        });
        let action: Action<Say> = serde_json::from_value(raw).unwrap();

        assert_eq!(action.id, id);
        assert_eq!(action.acted_at, 1700000000000);
        assert_eq!(action.pole, Pole::North);
        assert_eq!(action.body.message, "gg");
    }

    #[test]
    fn fresh_actions_have_distinct_ids() {
        let a = Action::new(Pole::North, ());
        let b = Action::new(Pole::North, ());
        assert_ne!(a.id, b.id);
    }
}
