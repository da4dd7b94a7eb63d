//! # chross-core
//!
//! Pure logic for Chross (no I/O, instant tests).
//!
//! This crate implements the engines, the action log and the handshake
//! state machine without any network or disk I/O.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic replay (same initial board + same actions → same board)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (channel, cache) is performed by `chross-client`, which
//! interprets the effects produced by these state machines.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chat;
pub mod chross;
pub mod engine;
pub mod handshake;
pub mod log;

pub use chat::{ChatBoard, ChatLine, ChatRules, Presence};
pub use chross::{
    targetable_squares, Checker, ChrossBoard, ChrossMove, ChrossRules, LogEntry, MoveError,
    Piece, Position, BREACH_LIMIT, HAND_SIZE, INITIAL_DECK,
};
pub use engine::Engine;
pub use handshake::{Effect, Event, Handshake, Phase};
pub use log::{replay, ActionLog, ReconcileError, Reconciled, ReplayError};
