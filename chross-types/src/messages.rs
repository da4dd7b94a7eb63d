//! Protocol messages exchanged between peers.
//!
//! These are the payloads carried inside an [`Envelope`]. Every message is
//! generic over the game's board type `B` and move payload `M`, so the same
//! handshake serves any engine.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{Action, ActionId, Envelope, Pole, WireError};

/// Kinds of client events, in the order a session usually sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Announcement with the sender's latest action
    Hello,
    /// Full history sent to a peer that is behind
    Retell,
    /// Lock in the initial board
    Start,
    /// One committed action
    Action,
}

impl MessageKind {
    /// All kinds.
    pub const ALL: [MessageKind; 4] = [
        MessageKind::Hello,
        MessageKind::Retell,
        MessageKind::Start,
        MessageKind::Action,
    ];

    /// Short name used in event names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hello => "hello",
            Self::Retell => "retell",
            Self::Start => "start",
            Self::Action => "action",
        }
    }

    /// Full channel event name within a game namespace.
    pub fn event_name(self, namespace: &str) -> String {
        format!("client-{}:{}", namespace, self.as_str())
    }

    /// Resolve an event name within a namespace.
    ///
    /// Returns `None` for events that belong to another namespace.
    pub fn from_event_name(namespace: &str, event: &str) -> Option<Self> {
        let rest = event.strip_prefix("client-")?;
        let (ns, kind) = rest.split_once(':')?;
        if ns != namespace {
            return None;
        }
        Self::ALL.into_iter().find(|k| k.as_str() == kind)
    }
}

/// Announcement broadcast after subscribing, and as a tie-breaking reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hello {
    /// Sender's pole
    pub pole: Pole,
    /// Id of the sender's latest action (`null` for an empty history)
    pub latest_action: Option<ActionId>,
}

/// A full history, sent to a peer that is known to be behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Retell<B, M> {
    /// Every committed action, in log order
    pub actions: Vec<Action<M>>,
    /// Board the actions replay from
    pub initial_board: B,
    /// Sender's pole, used to pick one initial board when both histories
    /// are identical
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pole: Option<Pole>,
}

/// All protocol messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<B, M> {
    /// Handshake announcement
    Hello(Hello),
    /// Catch-up with a full history
    Retell(Retell<B, M>),
    /// Session start with the initial board
    Start(B),
    /// One committed action
    Action(Action<M>),
}

impl<B, M> Message<B, M> {
    /// The kind of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Hello(_) => MessageKind::Hello,
            Self::Retell(_) => MessageKind::Retell,
            Self::Start(_) => MessageKind::Start,
            Self::Action(_) => MessageKind::Action,
        }
    }
}

impl<B: Serialize, M: Serialize> Message<B, M> {
    /// Encode into a channel envelope within a game namespace.
    pub fn encode(&self, namespace: &str) -> Result<Envelope, WireError> {
        let data = match self {
            Self::Hello(hello) => serde_json::to_vec(hello),
            Self::Retell(retell) => serde_json::to_vec(retell),
            Self::Start(board) => serde_json::to_vec(board),
            Self::Action(action) => serde_json::to_vec(action),
        }
        .map_err(WireError::Serialization)?;
        Ok(Envelope::new(self.kind().event_name(namespace), data))
    }
}

impl<B: DeserializeOwned, M: DeserializeOwned> Message<B, M> {
    /// Decode an envelope received on the channel.
    ///
    /// Returns `Ok(None)` for events of other namespaces and transport
    /// events; an unknown event inside our namespace is an error.
    pub fn decode(namespace: &str, envelope: &Envelope) -> Result<Option<Self>, WireError> {
        let prefix = format!("client-{}:", namespace);
        if !envelope.event.starts_with(&prefix) {
            return Ok(None);
        }
        let kind = MessageKind::from_event_name(namespace, &envelope.event)
            .ok_or_else(|| WireError::UnknownEvent(envelope.event.clone()))?;
        let wrap = |source| WireError::Deserialization {
            event: envelope.event.clone(),
            source,
        };
        let data = &envelope.data;
        let message = match kind {
            MessageKind::Hello => Self::Hello(serde_json::from_slice(data).map_err(wrap)?),
            MessageKind::Retell => Self::Retell(serde_json::from_slice(data).map_err(wrap)?),
            MessageKind::Start => Self::Start(serde_json::from_slice(data).map_err(wrap)?),
            MessageKind::Action => Self::Action(serde_json::from_slice(data).map_err(wrap)?),
        };
        Ok(Some(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Tally {
        count: u32,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Bump {
        by: u32,
    }

    type TallyMessage = Message<Tally, Bump>;

    #[test]
    fn event_names_are_namespaced() {
        assert_eq!(MessageKind::Hello.event_name("chross"), "client-chross:hello");
        assert_eq!(
            MessageKind::from_event_name("chross", "client-chross:retell"),
            Some(MessageKind::Retell)
        );
        assert_eq!(
            MessageKind::from_event_name("chat", "client-chross:retell"),
            None
        );
    }

    #[test]
    fn hello_wire_shape() {
        let msg: TallyMessage = Message::Hello(Hello {
            pole: Pole::North,
            latest_action: None,
        });
        let env = msg.encode("chross").unwrap();
        let json: serde_json::Value = serde_json::from_slice(&env.data).unwrap();

        assert_eq!(env.event, "client-chross:hello");
        assert_eq!(json, serde_json::json!({"pole": "north", "latestAction": null}));
    }

    #[test]
    fn retell_carries_history_and_initial_board() {
        let action = Action::new(Pole::South, Bump { by: 2 });
        let msg: TallyMessage = Message::Retell(Retell {
            actions: vec![action.clone()],
            initial_board: Tally { count: 0 },
            pole: Some(Pole::North),
        });
        let env = msg.encode("tally").unwrap();
        let json: serde_json::Value = serde_json::from_slice(&env.data).unwrap();
        assert_eq!(json["initialBoard"]["count"], 0);
        assert_eq!(json["actions"][0]["by"], 2);

        let decoded = TallyMessage::decode("tally", &env).unwrap().unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn retell_without_pole_still_decodes() {
        let env = Envelope::new(
            "client-tally:retell",
            br#"{"actions":[],"initialBoard":{"count":3}}"#.to_vec(),
        );
        match TallyMessage::decode("tally", &env).unwrap() {
            Some(Message::Retell(retell)) => {
                assert!(retell.pole.is_none());
                assert_eq!(retell.initial_board, Tally { count: 3 });
            }
            other => panic!("Expected Retell, got {:?}", other),
        }
    }

    #[test]
    fn start_payload_is_the_bare_board() {
        let msg: TallyMessage = Message::Start(Tally { count: 7 });
        let env = msg.encode("tally").unwrap();
        assert_eq!(env.data, br#"{"count":7}"#.to_vec());
    }

    #[test]
    fn foreign_namespace_is_ignored() {
        let env = Envelope::new("client-chat:action", b"{}".to_vec());
        assert!(TallyMessage::decode("tally", &env).unwrap().is_none());

        let env = Envelope::subscription_succeeded();
        assert!(TallyMessage::decode("tally", &env).unwrap().is_none());
    }

    #[test]
    fn unknown_kind_in_namespace_is_an_error() {
        let env = Envelope::new("client-tally:wave", b"{}".to_vec());
        assert!(matches!(
            TallyMessage::decode("tally", &env),
            Err(WireError::UnknownEvent(_))
        ));
    }

    #[test]
    fn malformed_payload_names_the_event() {
        let env = Envelope::new("client-tally:action", b"{\"by\":".to_vec());
        match TallyMessage::decode("tally", &env) {
            Err(WireError::Deserialization { event, .. }) => {
                assert_eq!(event, "client-tally:action")
            }
            other => panic!("Expected Deserialization error, got {:?}", other),
        }
    }
}
