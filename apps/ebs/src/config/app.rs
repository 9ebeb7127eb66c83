//! Application configuration loaded from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::AppError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PUBSUB_BASE_URL: &str = "https://api.twitch.tv";
pub const DEFAULT_PUBLISH_COOLDOWN_MS: u64 = 1000;
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

#[derive(Clone)]
pub struct Config {
    // Server configuration
    pub host: String,
    pub port: u16,

    // Extension identity
    pub client_id: String,
    pub owner_id: String,
    /// Shared secret, already base64-decoded
    pub secret: Vec<u8>,

    // Outbound publishing
    pub pubsub_base_url: String,
    pub publish_cooldown: Duration,

    // HTTP payload limits
    pub max_payload_size: usize,
}

impl Config {
    /// Load and validate all configuration from the process environment
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = required(&lookup, "EBS_CLIENT_ID")?;
        let owner_id = required(&lookup, "EBS_OWNER_ID")?;
        let secret = decode_secret(&required(&lookup, "EBS_SECRET")?)?;

        let host = optional(&lookup, "EBS_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parsed(&lookup, "EBS_PORT", DEFAULT_PORT)?;

        let pubsub_base_url = optional(&lookup, "PUBSUB_BASE_URL")
            .unwrap_or_else(|| DEFAULT_PUBSUB_BASE_URL.to_string());
        let publish_cooldown = Duration::from_millis(parsed(
            &lookup,
            "PUBLISH_COOLDOWN_MS",
            DEFAULT_PUBLISH_COOLDOWN_MS,
        )?);

        let max_payload_size = parsed(&lookup, "MAX_PAYLOAD_SIZE", DEFAULT_MAX_PAYLOAD_SIZE)?;

        Ok(Config {
            host,
            port,
            client_id,
            owner_id,
            secret,
            pubsub_base_url,
            publish_cooldown,
            max_payload_size,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("client_id", &self.client_id)
            .field("owner_id", &self.owner_id)
            .field("secret", &"[redacted]")
            .field("pubsub_base_url", &self.pubsub_base_url)
            .field("publish_cooldown", &self.publish_cooldown)
            .field("max_payload_size", &self.max_payload_size)
            .finish()
    }
}

fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, name: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or_else(|| AppError::config(format!("{name} must be set")))
}

fn parsed<F, T>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match optional(lookup, name) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| AppError::config(format!("{name} is invalid ('{raw}'): {e}"))),
    }
}

fn decode_secret(raw: &str) -> Result<Vec<u8>, AppError> {
    let secret = STANDARD
        .decode(raw)
        .map_err(|e| AppError::config(format!("EBS_SECRET is not valid base64: {e}")))?;

    if secret.is_empty() {
        return Err(AppError::config("EBS_SECRET decodes to an empty key"));
    }
    Ok(secret)
}
