use std::sync::Arc;
use std::time::Duration;

use crate::auth::issuer::TokenIssuer;
use crate::auth::verifier::TokenVerifier;
use crate::config::app::{Config, DEFAULT_MAX_PAYLOAD_SIZE, DEFAULT_PUBSUB_BASE_URL};
use crate::error::AppError;
use crate::services::cooldown::{CooldownGate, DEFAULT_COOLDOWN};
use crate::services::publisher::Publisher;
use crate::services::transport::{PubSubTransport, ReqwestTransport};
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: Option<SecurityConfig>,
    client_id: Option<String>,
    owner_id: Option<String>,
    transport: Option<Arc<dyn PubSubTransport>>,
    pubsub_base_url: String,
    cooldown: Duration,
    max_payload_size: usize,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: None,
            client_id: None,
            owner_id: None,
            transport: None,
            pubsub_base_url: DEFAULT_PUBSUB_BASE_URL.to_string(),
            cooldown: DEFAULT_COOLDOWN,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }

    /// Take identity, secret, and tuning values from a loaded [`Config`]
    pub fn with_config(self, config: &Config) -> Self {
        self.with_security(SecurityConfig::new(config.secret.clone()))
            .with_client_id(config.client_id.clone())
            .with_owner_id(config.owner_id.clone())
            .with_pubsub_base_url(config.pubsub_base_url.clone())
            .with_cooldown(config.publish_cooldown)
            .with_max_payload_size(config.max_payload_size)
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = Some(security_config);
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_owner_id(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Replace the reqwest transport (tests record deliveries instead)
    pub fn with_transport(mut self, transport: Arc<dyn PubSubTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_pubsub_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.pubsub_base_url = base_url.into();
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_max_payload_size(mut self, limit: usize) -> Self {
        self.max_payload_size = limit;
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let security = self
            .security_config
            .ok_or_else(|| AppError::config("shared secret not configured"))?;
        let client_id = self
            .client_id
            .ok_or_else(|| AppError::config("client id not configured"))?;
        let owner_id = self
            .owner_id
            .ok_or_else(|| AppError::config("owner id not configured"))?;

        let transport: Arc<dyn PubSubTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::new(self.pubsub_base_url)
                    .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?,
            ),
        };

        let publisher = Publisher::new(
            client_id,
            TokenIssuer::new(owner_id, &security),
            CooldownGate::new(self.cooldown),
            transport,
        );

        Ok(AppState {
            verifier: Arc::new(TokenVerifier::new(&security)),
            publisher: Arc::new(publisher),
            max_payload_size: self.max_payload_size,
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
