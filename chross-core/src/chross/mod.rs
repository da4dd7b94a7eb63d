//! Chross: chess pieces played from a hand of cards.
//!
//! Each side owns sixteen checkers. On its turn a side plays one piece from
//! its hand to move one of its checkers with that piece's movement pattern,
//! then draws a replacement from its deck. A side loses once three enemy
//! checkers sit in its back rank.

mod board;
mod error;
mod rules;

pub use board::{Checker, ChrossBoard, LogEntry, Piece, Position, BREACH_LIMIT, HAND_SIZE, INITIAL_DECK};
pub use error::MoveError;
pub use rules::{check_and_capture, targetable_squares, ChrossMove, ChrossRules};
