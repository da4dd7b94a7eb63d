//! # chross-client
//!
//! Peer sessions for serverless two-player Chross.
//!
//! This is the library applications use to join a game: it runs the
//! join handshake over a shared pub/sub channel, keeps the action log in
//! step with the peer, and caches it locally for offline resume.
//!
//! ## Features
//!
//! - **No server**: peers reconcile histories among themselves
//! - **Transport Abstraction**: pluggable channel layer (in-memory hub, mock)
//! - **Offline Resume**: every commit is cached and replayed on restart
//! - **Pure State Machine**: uses chross-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use chross_client::{MemoryCache, MemoryHub, PeerSession, SessionConfig};
//! use chross_core::{ChrossBoard, ChrossRules};
//!
//! let config = SessionConfig::from_params(Some("q7Zt-x"), Some("s"))?;
//! let hub = MemoryHub::new();
//! let mut session =
//!     PeerSession::open(config, ChrossRules, board, hub.connect(), MemoryCache::new()).await?;
//!
//! session.connect().await?;
//! session.pump().await?;
//! session.submit(chross_move).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod config;
pub mod session;
pub mod transport;

pub use cache::{cache_key, CacheError, FileCache, MemoryCache, Snapshot, StateCache};
pub use config::{parse_pole_selector, ChannelCredentials, ConfigError, SessionConfig};
pub use session::{PeerSession, PlayState, SessionError, SessionResult, Update};
pub use transport::{HubTransport, MemoryHub, MockTransport, Transport, TransportError};
