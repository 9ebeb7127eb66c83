use std::sync::Arc;

use crate::auth::verifier::TokenVerifier;
use crate::services::publisher::Publisher;

/// Application state shared by every worker; immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Verifies both inbound token kinds against the shared secret
    pub verifier: Arc<TokenVerifier>,
    /// Outbound PubSub publisher, including its cooldown gate
    pub publisher: Arc<Publisher>,
    /// Largest request body the transaction middleware will buffer
    pub max_payload_size: usize,
}
