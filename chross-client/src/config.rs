//! Session addressing and channel credentials.

use thiserror::Error;

use chross_types::{GameKey, Pole, WireError};

use crate::cache::cache_key;

/// Configuration errors. All of them are fatal before a session starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No game key was given.
    #[error("game not configured: missing game key")]
    MissingGameKey,

    /// The game key is malformed.
    #[error("invalid game key: {0}")]
    InvalidGameKey(#[source] WireError),

    /// The pole selector is neither `n` nor `s`.
    #[error("invalid pole selector {0:?}: expected n or s")]
    InvalidPole(String),

    /// A channel credential is not set in the environment.
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),
}

/// Which game a session joins, and as whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Game key shared by both players.
    pub game_key: GameKey,
    /// Local pole.
    pub pole: Pole,
    /// Game namespace ("mux") multiplexed on the channel.
    pub namespace: String,
}

impl SessionConfig {
    /// Namespace used when none is configured.
    pub const DEFAULT_NAMESPACE: &'static str = "chross";

    /// Create a configuration in the default namespace.
    pub fn new(game_key: GameKey, pole: Pole) -> Self {
        Self {
            game_key,
            pole,
            namespace: Self::DEFAULT_NAMESPACE.to_string(),
        }
    }

    /// Build from the raw join parameters: game key `k` and pole selector `p`.
    pub fn from_params(game_key: Option<&str>, pole: Option<&str>) -> Result<Self, ConfigError> {
        let game_key = match game_key.map(str::trim) {
            None | Some("") => return Err(ConfigError::MissingGameKey),
            Some(raw) => GameKey::parse(raw).map_err(ConfigError::InvalidGameKey)?,
        };
        Ok(Self::new(game_key, parse_pole_selector(pole)?))
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    /// Name of the shared channel.
    pub fn channel_name(&self) -> String {
        self.game_key.channel_name()
    }

    /// Key of this game's cache record.
    pub fn cache_key(&self) -> String {
        cache_key(&self.namespace, &self.game_key)
    }
}

/// Parse a pole selector: `n`/`s` in any case; absent means observer.
pub fn parse_pole_selector(selector: Option<&str>) -> Result<Pole, ConfigError> {
    match selector.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") => Ok(Pole::Out),
        Some("n") => Ok(Pole::North),
        Some("s") => Ok(Pole::South),
        Some(_) => Err(ConfigError::InvalidPole(
            selector.unwrap_or_default().to_string(),
        )),
    }
}

/// Credentials of the hosted channel service.
#[derive(Clone, PartialEq, Eq)]
pub struct ChannelCredentials {
    /// Application id
    pub app_id: String,
    /// Public key
    pub key: String,
    /// Signing secret
    pub secret: String,
    /// Service cluster
    pub cluster: String,
}

impl ChannelCredentials {
    /// Environment variable holding the application id.
    pub const ENV_ID: &'static str = "PUSHER_ID";
    /// Environment variable holding the public key.
    pub const ENV_KEY: &'static str = "PUSHER_KEY";
    /// Environment variable holding the signing secret.
    pub const ENV_SECRET: &'static str = "PUSHER_SECRET";
    /// Environment variable holding the cluster.
    pub const ENV_CLUSTER: &'static str = "PUSHER_CLUSTER";

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through a lookup function, reporting the first missing variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingEnv(name))
        };
        Ok(Self {
            key: get(Self::ENV_KEY)?,
            app_id: get(Self::ENV_ID)?,
            secret: get(Self::ENV_SECRET)?,
            cluster: get(Self::ENV_CLUSTER)?,
        })
    }
}

impl std::fmt::Debug for ChannelCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelCredentials")
            .field("app_id", &self.app_id)
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .field("cluster", &self.cluster)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    // ===========================================
    // Session parameters
    // ===========================================

    #[test]
    fn pole_selector_is_case_insensitive() {
        assert_eq!(parse_pole_selector(Some("n")).unwrap(), Pole::North);
        assert_eq!(parse_pole_selector(Some("S")).unwrap(), Pole::South);
        assert_eq!(parse_pole_selector(None).unwrap(), Pole::Out);
        assert!(matches!(
            parse_pole_selector(Some("east")),
            Err(ConfigError::InvalidPole(p)) if p == "east"
        ));
    }

    #[test]
    fn missing_game_key_is_fatal() {
        assert!(matches!(
            SessionConfig::from_params(None, Some("n")),
            Err(ConfigError::MissingGameKey)
        ));
        assert!(matches!(
            SessionConfig::from_params(Some("  "), Some("n")),
            Err(ConfigError::MissingGameKey)
        ));
        assert!(matches!(
            SessionConfig::from_params(Some("bad key!"), None),
            Err(ConfigError::InvalidGameKey(_))
        ));
    }

    #[test]
    fn params_address_channel_and_cache() {
        let config = SessionConfig::from_params(Some("q7Zt-x"), Some("N"))
            .unwrap()
            .with_namespace("chat");
        assert_eq!(config.pole, Pole::North);
        assert_eq!(config.channel_name(), "private-q7Zt-x");
        assert_eq!(config.cache_key(), "playState_chat_q7Zt-x");
    }

    // ===========================================
    // Credentials
    // ===========================================

    #[test]
    fn credentials_load_from_lookup() {
        let creds = ChannelCredentials::from_lookup(env(&[
            ("PUSHER_ID", "1"),
            ("PUSHER_KEY", "key"),
            ("PUSHER_SECRET", "shh"),
            ("PUSHER_CLUSTER", "us2"),
        ]))
        .unwrap();
        assert_eq!(creds.cluster, "us2");
        assert!(!format!("{:?}", creds).contains("shh"));
    }

    #[test]
    fn first_missing_credential_is_named() {
        let err = ChannelCredentials::from_lookup(env(&[
            ("PUSHER_KEY", "key"),
            ("PUSHER_SECRET", "shh"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv("PUSHER_ID")));

        let err = ChannelCredentials::from_lookup(env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv("PUSHER_KEY")));
    }
}
