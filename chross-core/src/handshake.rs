//! Join handshake state machine.
//!
//! This module decides what a session says on the channel when it
//! subscribes, when a peer says hello, and when histories are retold.
//! Like the rest of this crate it performs no I/O: `on_event` returns the
//! new state plus the effects the caller (chross-client) must execute.
//!
//! ```text
//! Disconnected --Subscribed--> Told --hello/retell--> Met --start/retell--> Started
//! ```

use chross_types::{Hello, Pole};

use crate::{ActionLog, Engine};

/// Handshake flags of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handshake {
    pole: Pole,
    is_told: bool,
    has_met: bool,
    is_started: bool,
}

/// Coarse view of the handshake flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Not yet subscribed to the channel.
    Disconnected,
    /// Hello sent, waiting for a peer.
    Told,
    /// A peer was met and histories were exchanged.
    Met,
    /// The initial board is locked in.
    Started,
}

/// Inputs to the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The transport confirmed the channel subscription.
    Subscribed,
    /// A hello arrived on the channel.
    HelloReceived(Hello),
    /// A retold history was adopted into the local log.
    RetellAdopted,
    /// A retold history turned out to be a strict prefix of ours.
    PeerBehind,
    /// A peer broadcast the start board.
    StartReceived,
    /// The local user asked to start the game.
    StartRequested,
}

/// Messages the caller must broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Announce ourselves.
    SendHello(Hello),
    /// Send the full local history and its initial board.
    SendRetell,
    /// Broadcast the initial board.
    SendStart,
}

impl Handshake {
    /// A fresh handshake for a client playing `pole`.
    pub fn new(pole: Pole) -> Self {
        Self {
            pole,
            is_told: false,
            has_met: false,
            is_started: false,
        }
    }

    /// Process an event and return the new state plus effects to execute.
    ///
    /// `log` is only read: the hello decision depends on which actions we
    /// already hold.
    pub fn on_event<E: Engine>(self, event: Event, log: &ActionLog<E>) -> (Self, Vec<Effect>) {
        match event {
            Event::Subscribed if !self.is_told => (
                Self {
                    is_told: true,
                    ..self
                },
                vec![Effect::SendHello(self.hello(log))],
            ),
            Event::Subscribed => (self, vec![]),

            // Two clients of the same pole ignore each other.
            Event::HelloReceived(hello) if hello.pole == self.pole => (self, vec![]),
            Event::HelloReceived(hello) => {
                let peer_is_behind = match &hello.latest_action {
                    None => true,
                    Some(id) => log.contains(id),
                };
                if peer_is_behind {
                    (
                        Self {
                            has_met: true,
                            ..self
                        },
                        vec![Effect::SendRetell],
                    )
                } else {
                    // We are the one behind; say hello back so the peer retells.
                    (self, vec![Effect::SendHello(self.hello(log))])
                }
            }

            Event::RetellAdopted => (
                Self {
                    has_met: true,
                    is_started: true,
                    ..self
                },
                vec![],
            ),
            Event::PeerBehind => (
                Self {
                    has_met: true,
                    ..self
                },
                vec![Effect::SendRetell],
            ),

            Event::StartReceived => (
                Self {
                    is_started: true,
                    ..self
                },
                vec![],
            ),
            Event::StartRequested => (
                Self {
                    is_started: true,
                    ..self
                },
                vec![Effect::SendStart],
            ),
        }
    }

    /// The hello this session sends: its pole and latest action id.
    pub fn hello<E: Engine>(&self, log: &ActionLog<E>) -> Hello {
        Hello {
            pole: self.pole,
            latest_action: log.latest_id(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        if self.is_started {
            Phase::Started
        } else if self.has_met {
            Phase::Met
        } else if self.is_told {
            Phase::Told
        } else {
            Phase::Disconnected
        }
    }

    /// The local pole.
    pub fn pole(&self) -> Pole {
        self.pole
    }

    /// Check if hello was sent.
    pub fn is_told(&self) -> bool {
        self.is_told
    }

    /// Check if a peer was met.
    pub fn has_met(&self) -> bool {
        self.has_met
    }

    /// Check if the game was started.
    pub fn is_started(&self) -> bool {
        self.is_started
    }
}
