//! Outbound PubSub delivery.
//!
//! The publisher depends only on [`PubSubTransport`]; production wires in
//! [`ReqwestTransport`], tests substitute a recording implementation.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const CLIENT_ID_HEADER: &str = "Client-Id";

/// Body of an extension PubSub message.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub content_type: String,
    pub targets: Vec<String>,
    pub message: String,
}

/// Everything one delivery needs; built fresh per publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub channel_id: String,
    pub client_id: String,
    /// Full `Authorization` header value, bearer prefix included
    pub authorization: String,
    pub message: OutboundMessage,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("pubsub request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("pubsub endpoint {url} answered {status}")]
    Status { status: u16, url: String },
    #[error("invalid pubsub base url '{url}': {reason}")]
    BaseUrl { url: String, reason: String },
}

#[async_trait]
pub trait PubSubTransport: Send + Sync {
    async fn deliver(&self, request: OutboundRequest) -> Result<(), TransportError>;
}

/// Posts messages to `<base_url>/extensions/message/<channel_id>`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().build()?;
        Self::with_client(client, base_url)
    }

    /// Fails unless `base_url` is an absolute URL that can take path segments.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl AsRef<str>,
    ) -> Result<Self, TransportError> {
        let raw = base_url.as_ref();
        let invalid = |reason: String| TransportError::BaseUrl {
            url: raw.to_string(),
            reason,
        };

        let base_url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("cannot carry a path".to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// `<base>/extensions/message/<channel_id>`, with the channel id
    /// percent-encoded as a single path segment.
    pub fn message_url(&self, channel_id: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["extensions", "message", channel_id]);
        }
        url
    }
}

#[async_trait]
impl PubSubTransport for ReqwestTransport {
    async fn deliver(&self, request: OutboundRequest) -> Result<(), TransportError> {
        let url = self.message_url(&request.channel_id);

        let response = self
            .client
            .post(url.clone())
            .header(CLIENT_ID_HEADER, &request.client_id)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(AUTHORIZATION, &request.authorization)
            .json(&request.message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(())
    }
}
