use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::claims::BROADCAST_TARGET;
use crate::auth::issuer::TokenIssuer;
use crate::extractors::bearer::BEARER_PREFIX;
use crate::services::cooldown::CooldownGate;
use crate::services::transport::{
    OutboundMessage, OutboundRequest, PubSubTransport, JSON_CONTENT_TYPE,
};

/// What happened to one publish attempt. Never surfaced to HTTP callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Sent,
    CooledDown,
    Failed,
}

/// Broadcasts messages on a channel's extension PubSub topic, at most once
/// per cooldown interval per channel.
pub struct Publisher {
    client_id: String,
    issuer: TokenIssuer,
    gate: CooldownGate,
    transport: Arc<dyn PubSubTransport>,
}

impl Publisher {
    pub fn new(
        client_id: impl Into<String>,
        issuer: TokenIssuer,
        gate: CooldownGate,
        transport: Arc<dyn PubSubTransport>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            issuer,
            gate,
            transport,
        }
    }

    /// Fire-and-forget: cooldown drops and delivery failures are logged and
    /// reported through the returned outcome only.
    pub async fn publish(&self, channel_id: &str, message: &str) -> PublishOutcome {
        // Don't spam PubSub or the channel gets rate limited upstream.
        if !self.gate.try_acquire(channel_id) {
            info!(channel_id, "publish dropped; channel in cooldown");
            return PublishOutcome::CooledDown;
        }

        let token = self.issuer.issue(channel_id);
        let request = OutboundRequest {
            channel_id: channel_id.to_string(),
            client_id: self.client_id.clone(),
            authorization: format!("{BEARER_PREFIX}{token}"),
            message: OutboundMessage {
                content_type: JSON_CONTENT_TYPE.to_string(),
                targets: vec![BROADCAST_TARGET.to_string()],
                message: message.to_string(),
            },
        };

        info!(channel_id, message, "sending pubsub broadcast");
        match self.transport.deliver(request).await {
            Ok(()) => PublishOutcome::Sent,
            Err(e) => {
                warn!(channel_id, error = %e, "pubsub broadcast failed");
                PublishOutcome::Failed
            }
        }
    }
}
