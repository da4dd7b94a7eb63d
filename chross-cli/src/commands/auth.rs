//! Authorize a private channel subscription.
//!
//! The channel service asks an authorization endpoint to vouch for every
//! private subscription. The answer is the application key plus an
//! HMAC-SHA256 over `socket_id:channel_name` keyed with the secret.

use anyhow::{anyhow, Context, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use chross_client::ChannelCredentials;

type HmacSha256 = Hmac<Sha256>;

/// Run the auth command.
pub fn run(socket_id: &str, channel: &str) -> Result<()> {
    let credentials = ChannelCredentials::from_env().context("Channel service not configured")?;
    let payload = serde_json::json!({ "auth": authorize(&credentials, socket_id, channel)? });
    println!("{}", payload);
    Ok(())
}

/// The `auth` value for a subscription: `<key>:<hex signature>`.
pub fn authorize(credentials: &ChannelCredentials, socket_id: &str, channel: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(credentials.secret.as_bytes())
        .map_err(|_| anyhow!("Invalid channel secret"))?;
    mac.update(format!("{}:{}", socket_id, channel).as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());
    Ok(format!("{}:{}", credentials.key, signature))
}
