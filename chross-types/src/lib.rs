//! # chross-types
//!
//! Wire format types for peer-to-peer Chross play.
//!
//! This crate provides the foundational types used across all Chross crates:
//! - [`Pole`], [`Side`], [`PerSide`] - Who is acting, and per-side storage
//! - [`ActionId`], [`GameKey`] - Identity types
//! - [`Action`] - A committed action with its domain payload
//! - [`Message`], [`Envelope`] - Protocol messages and their channel framing
//! - [`WireError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod action;
mod envelope;
mod error;
mod ids;
mod messages;
mod pole;

pub use action::{now_millis, Action};
pub use envelope::{Envelope, SUBSCRIPTION_SUCCEEDED};
pub use error::WireError;
pub use ids::{ActionId, GameKey};
pub use messages::{Hello, Message, MessageKind, Retell};
pub use pole::{PerSide, Pole, Side};
