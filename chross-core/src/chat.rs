//! A chat room as a second engine.
//!
//! Chat never rejects a line, so it exercises the protocol without any
//! game rules in the way.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;

use chross_types::{Action, Pole};

use crate::Engine;

/// Game-specific fields of a chat action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLine {
    /// Text of the line
    pub message: String,
    /// Display name; the pole name is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatLine {
    /// An anonymous line.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            name: None,
        }
    }

    /// Attach a display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// When a pole first spoke, and under which name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presence {
    /// Display name
    pub name: String,
    /// `acted_at` of the pole's first line
    pub present_at: u64,
}

/// Chat state: who is present and every line so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatBoard {
    /// First appearance of each pole
    pub present: BTreeMap<Pole, Presence>,
    /// All lines in log order
    pub log: Vec<Action<ChatLine>>,
}

/// The chat engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChatRules;

impl Engine for ChatRules {
    type Board = ChatBoard;
    type Move = ChatLine;
    type Error = Infallible;

    fn apply(&self, board: &ChatBoard, action: &Action<ChatLine>) -> Result<ChatBoard, Infallible> {
        let mut next = board.clone();
        next.present.entry(action.pole).or_insert_with(|| Presence {
            name: action
                .body
                .name
                .clone()
                .unwrap_or_else(|| action.pole.to_string()),
            present_at: action.acted_at,
        });
        next.log.push(action.clone());
        Ok(next)
    }
}
