//! PeerSession - one client's view of a shared game.
//!
//! # Architecture
//!
//! PeerSession owns the action log and interprets the pure handshake state
//! machine (from chross-core) against a transport and a local cache.
//!
//! ```text
//! Application → PeerSession → Transport → channel → other PeerSession
//!                   ↓    ↘
//!           chross-core   StateCache
//! ```
//!
//! Every handler runs to completion; nothing blocks waiting for a reply.
//! Conversational state lives in the handshake flags, and the log is only
//! mutated through the engine, so `replay(initial, actions) == board`
//! holds after every call.
//!
//! # Example
//!
//! ```ignore
//! let mut session = PeerSession::open(config, ChrossRules, board, transport, cache).await?;
//! session.connect().await?;
//! session.pump().await?;
//! session.submit(chross_move).await?;
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use chross_core::{
    ActionLog, Effect, Engine, Event, Handshake, Phase, ReconcileError, Reconciled,
};
use chross_types::{Action, ActionId, Envelope, GameKey, Message, Pole, Retell, WireError};

use crate::cache::{CacheError, Snapshot, StateCache};
use crate::config::SessionConfig;
use crate::transport::{Transport, TransportError};

/// Session errors, generic over the engine's rejection type.
#[derive(Debug, Error)]
pub enum SessionError<E> {
    /// A local move was rejected by the engine; nothing changed.
    #[error("move rejected: {0}")]
    Rejected(#[source] E),

    /// An action from the channel did not apply: the logs have diverged.
    #[error("remote action {id} rejected, logs have diverged: {source}")]
    RemoteRejected {
        /// Id of the rejected action
        id: ActionId,
        /// The engine's reason
        source: E,
    },

    /// A retold history conflicts with ours or does not replay.
    #[error("retell not adopted: {0}")]
    Reconcile(#[from] ReconcileError<E>),

    /// Observers never originate actions.
    #[error("observers cannot act; join as north or south")]
    Observer,

    /// The session was stopped.
    #[error("session stopped")]
    Stopped,

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A local action was committed but could not be broadcast.
    #[error("action {id} committed locally but not broadcast: {source}")]
    Broadcast {
        /// Id of the committed action
        id: ActionId,
        /// Why the trigger failed
        source: TransportError,
    },

    /// Cache error.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// Wire encoding error.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),
}

/// Shorthand for a session result over engine `E`.
pub type SessionResult<T, E> = Result<T, SessionError<<E as Engine>::Error>>;

/// What handling one channel event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// The event was not for this session.
    Ignored,
    /// Handshake flags changed or handshake messages were sent.
    Handshake,
    /// A retold history was adopted.
    Adopted {
        /// Actions the retell added on top of ours
        added: usize,
    },
    /// The start board arrived.
    Started {
        /// Whether the initial board was replaced (only while the log is empty)
        replaced: bool,
    },
    /// A remote action was applied.
    Applied(ActionId),
}

impl Update {
    /// Check if the board or log may have changed.
    pub fn changed_board(&self) -> bool {
        matches!(
            self,
            Self::Adopted { .. } | Self::Started { replaced: true } | Self::Applied(_)
        )
    }
}

/// A point-in-time copy of everything a UI needs to render.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayState<B, M> {
    /// Live board
    pub board: B,
    /// Committed actions
    pub actions: Vec<Action<M>>,
    /// Game key
    pub game_key: GameKey,
    /// Local pole
    pub pole: Pole,
    /// The initial board is locked in
    pub is_started: bool,
    /// A peer was met
    pub has_met: bool,
    /// Hello was sent
    pub is_told: bool,
    /// The session resumed from a cached log
    pub loaded_from_cache: bool,
    /// Handshake phase
    pub phase: Phase,
}

/// One client's session in a shared game.
pub struct PeerSession<E: Engine, T: Transport, C: StateCache> {
    config: SessionConfig,
    transport: T,
    cache: C,
    log: ActionLog<E>,
    handshake: Handshake,
    /// Pole whose initial board we hold; lower poles take precedence.
    board_from: Pole,
    loaded_from_cache: bool,
    stopped: bool,
}

impl<E, T, C> PeerSession<E, T, C>
where
    E: Engine + Clone,
    E::Board: Serialize + DeserializeOwned,
    E::Move: Serialize + DeserializeOwned,
    T: Transport,
    C: StateCache,
{
    /// Create a session, resuming from the cache when it holds a valid log.
    ///
    /// A cached record that does not parse or does not replay is discarded
    /// with a warning; the session then starts from `initial` and relies on
    /// the handshake to catch up.
    pub async fn open(
        config: SessionConfig,
        engine: E,
        initial: E::Board,
        transport: T,
        cache: C,
    ) -> SessionResult<Self, E> {
        let key = config.cache_key();
        let resumed = match cache.load(&key).await? {
            None => None,
            Some(raw) => match resume(&engine, &initial, &key, &raw) {
                Some(log) => Some(log),
                None => {
                    cache.remove(&key).await?;
                    None
                }
            },
        };
        let loaded_from_cache = resumed.is_some();
        let log = resumed.unwrap_or_else(|| ActionLog::new(engine, initial));

        tracing::info!(
            "Session {} as {} ({} cached actions)",
            config.game_key,
            config.pole,
            log.len()
        );

        Ok(Self {
            handshake: Handshake::new(config.pole),
            board_from: config.pole,
            config,
            transport,
            cache,
            log,
            loaded_from_cache,
            stopped: false,
        })
    }

    /// Subscribe to the game channel.
    ///
    /// The hello goes out once the transport confirms the subscription.
    pub async fn connect(&mut self) -> SessionResult<(), E> {
        let channel = self.config.channel_name();
        self.transport.subscribe(&channel).await?;
        self.stopped = false;
        tracing::debug!("Subscribed to {}", channel);
        Ok(())
    }

    /// Handle every pending channel event until the transport is idle.
    pub async fn pump(&mut self) -> SessionResult<Vec<Update>, E> {
        let mut updates = Vec::new();
        loop {
            match self.transport.recv().await {
                Ok(envelope) => updates.push(self.handle(&envelope).await?),
                Err(TransportError::Idle) => return Ok(updates),
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Handle one channel event.
    pub async fn handle(&mut self, envelope: &Envelope) -> SessionResult<Update, E> {
        if self.stopped {
            return Ok(Update::Ignored);
        }
        if envelope.is_subscription_succeeded() {
            let told = self.handshake.is_told();
            self.step(Event::Subscribed).await?;
            return Ok(if told {
                Update::Ignored
            } else {
                Update::Handshake
            });
        }

        let message = match Message::<E::Board, E::Move>::decode(&self.config.namespace, envelope)? {
            Some(message) => message,
            None => return Ok(Update::Ignored),
        };
        match message {
            Message::Hello(hello) => {
                tracing::debug!("Hello from {} (latest {:?})", hello.pole, hello.latest_action);
                if hello.pole == self.config.pole {
                    return Ok(Update::Ignored);
                }
                self.step(Event::HelloReceived(hello)).await?;
                Ok(Update::Handshake)
            }
            Message::Retell(retell) => self.on_retell(retell).await,
            Message::Start(board) => {
                let replaced = self.log.restart(board);
                if !replaced {
                    tracing::warn!(
                        "Ignoring start board: {} actions already committed",
                        self.log.len()
                    );
                }
                self.step(Event::StartReceived).await?;
                Ok(Update::Started { replaced })
            }
            Message::Action(action) => self.on_action(action).await,
        }
    }

    /// Commit a local move and broadcast it.
    ///
    /// The move is validated and appended first, then persisted, then
    /// broadcast. If the broadcast fails the local commit stands and
    /// [`SessionError::Broadcast`] is returned.
    pub async fn submit(&mut self, body: E::Move) -> SessionResult<ActionId, E> {
        if self.stopped {
            return Err(SessionError::Stopped);
        }
        if self.config.pole.is_observer() {
            return Err(SessionError::Observer);
        }

        let action = Action::new(self.config.pole, body);
        let id = action.id;
        self.log
            .append(action.clone())
            .map_err(SessionError::Rejected)?;
        self.persist().await?;

        tracing::debug!("Action {} committed, broadcasting", id);
        let envelope = Message::<E::Board, E::Move>::Action(action).encode(&self.config.namespace)?;
        if let Err(source) = self.transport.trigger(&envelope).await {
            tracing::warn!("Action {} not broadcast: {}", id, source);
            return Err(SessionError::Broadcast { id, source });
        }
        Ok(id)
    }

    /// Lock in the initial board and broadcast it.
    pub async fn start(&mut self) -> SessionResult<(), E> {
        if self.stopped {
            return Err(SessionError::Stopped);
        }
        tracing::info!("Starting game {}", self.config.game_key);
        self.step(Event::StartRequested).await?;
        self.persist().await
    }

    /// Leave the channel. Later events are ignored.
    pub async fn stop(&mut self) -> SessionResult<(), E> {
        self.stopped = true;
        self.transport.unsubscribe().await?;
        tracing::info!("Left {}", self.config.channel_name());
        Ok(())
    }

    /// A copy of the current state.
    pub fn current(&self) -> PlayState<E::Board, E::Move> {
        PlayState {
            board: self.log.board().clone(),
            actions: self.log.actions().to_vec(),
            game_key: self.config.game_key.clone(),
            pole: self.config.pole,
            is_started: self.handshake.is_started(),
            has_met: self.handshake.has_met(),
            is_told: self.handshake.is_told(),
            loaded_from_cache: self.loaded_from_cache,
            phase: self.handshake.phase(),
        }
    }

    /// The live board and the committed actions.
    pub fn snapshot(&self) -> (E::Board, Vec<Action<E::Move>>) {
        (self.log.board().clone(), self.log.actions().to_vec())
    }

    /// The live board.
    pub fn board(&self) -> &E::Board {
        self.log.board()
    }

    /// The action log.
    pub fn log(&self) -> &ActionLog<E> {
        &self.log
    }

    /// Handshake phase.
    pub fn phase(&self) -> Phase {
        self.handshake.phase()
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Check if the session resumed from a cached log.
    pub fn loaded_from_cache(&self) -> bool {
        self.loaded_from_cache
    }

    async fn on_retell(&mut self, retell: Retell<E::Board, E::Move>) -> SessionResult<Update, E> {
        // Every client holding the same history retells it. The initial
        // board follows the order north, south, out, and never moves back
        // down it, so stale retells cannot undo a better one.
        let same_history = retell.actions.len() == self.log.len()
            && retell
                .actions
                .iter()
                .zip(self.log.actions())
                .all(|(theirs, ours)| theirs.id == ours.id);
        if same_history && retell.pole.is_some_and(|p| p >= self.board_from) {
            tracing::debug!("Retell matches our history; keeping our initial board");
            self.step(Event::RetellAdopted).await?;
            return Ok(Update::Handshake);
        }

        let sender = retell.pole;
        match self.log.reconcile(retell.initial_board, retell.actions) {
            Ok(Reconciled::Adopted { added }) => {
                if let Some(pole) = sender {
                    self.board_from = self.board_from.min(pole);
                }
                tracing::info!("Adopted retold history (+{} actions)", added);
                self.step(Event::RetellAdopted).await?;
                self.persist().await?;
                Ok(Update::Adopted { added })
            }
            Ok(Reconciled::Ahead { missing }) => {
                tracing::info!("Peer is {} actions behind, retelling", missing);
                self.step(Event::PeerBehind).await?;
                Ok(Update::Handshake)
            }
            Err(e) => {
                tracing::warn!("Retell conflicts with local history: {}", e);
                Err(e.into())
            }
        }
    }

    async fn on_action(&mut self, action: Action<E::Move>) -> SessionResult<Update, E> {
        let id = action.id;
        if self.log.contains(&id) {
            tracing::debug!("Action {} already committed", id);
            return Ok(Update::Ignored);
        }
        self.log
            .append(action)
            .map_err(|source| SessionError::RemoteRejected { id, source })?;
        tracing::debug!("Applied remote action {}", id);
        self.persist().await?;
        Ok(Update::Applied(id))
    }

    /// Feed an event to the handshake and broadcast what it asks for.
    async fn step(&mut self, event: Event) -> SessionResult<(), E> {
        let (next, effects) = self.handshake.on_event(event, &self.log);
        self.handshake = next;

        for effect in effects {
            let message: Message<E::Board, E::Move> = match effect {
                Effect::SendHello(hello) => {
                    tracing::info!("Hello sent as {}", hello.pole);
                    Message::Hello(hello)
                }
                Effect::SendRetell => {
                    tracing::info!("Retelling {} actions", self.log.len());
                    Message::Retell(Retell {
                        actions: self.log.actions().to_vec(),
                        initial_board: self.log.initial_board().clone(),
                        pole: Some(self.config.pole),
                    })
                }
                Effect::SendStart => Message::Start(self.log.initial_board().clone()),
            };
            let envelope = message.encode(&self.config.namespace)?;
            self.transport.trigger(&envelope).await?;
        }
        Ok(())
    }

    /// Overwrite the cache record with the current log.
    async fn persist(&self) -> SessionResult<(), E> {
        let snapshot = Snapshot {
            board: self.log.board().clone(),
            actions: self.log.actions().to_vec(),
            initial_board: Some(self.log.initial_board().clone()),
        };
        self.cache
            .store(&self.config.cache_key(), &snapshot.encode()?)
            .await?;
        Ok(())
    }
}

/// Rebuild a log from a cached record, or `None` if the record is unusable.
fn resume<E>(engine: &E, initial: &E::Board, key: &str, raw: &str) -> Option<ActionLog<E>>
where
    E: Engine + Clone,
    E::Board: DeserializeOwned,
    E::Move: DeserializeOwned,
{
    let snapshot = match Snapshot::<E::Board, E::Move>::decode(key, raw) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!("Discarding cache: {}", e);
            return None;
        }
    };
    let base = snapshot.initial_board.unwrap_or_else(|| initial.clone());
    match ActionLog::from_history(engine.clone(), base, snapshot.actions) {
        Ok(log) => {
            if *log.board() != snapshot.board {
                tracing::warn!("Cached board differs from its replayed log; using the replay");
            }
            Some(log)
        }
        Err(e) => {
            tracing::warn!("Discarding cache {}: {}", key, e);
            None
        }
    }
}
