use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, EncodingKey, Header};
use tracing::{debug, error};

use crate::auth::claims::{
    AuthClaims, PubSubPermissions, RegisteredClaims, BROADCAST_TARGET, EXTERNAL_ROLE,
};
use crate::state::security_config::SecurityConfig;

/// Lifetime of every token minted for outbound publishing.
pub const ISSUED_TOKEN_TTL: Duration = Duration::from_secs(3 * 60);

/// Mints the short-lived tokens that authorize this service to publish on
/// a channel's PubSub topic, signed as the extension owner.
pub struct TokenIssuer {
    owner_id: String,
    header: Header,
    key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(owner_id: impl Into<String>, security: &SecurityConfig) -> Self {
        Self {
            owner_id: owner_id.into(),
            header: Header::new(security.algorithm),
            key: EncodingKey::from_secret(&security.secret),
        }
    }

    /// Fresh token for `channel_id`, valid for [`ISSUED_TOKEN_TTL`].
    ///
    /// Never fails: a signing error is logged and an empty string returned,
    /// which the PubSub endpoint will then reject.
    pub fn issue(&self, channel_id: &str) -> String {
        self.issue_at(channel_id, SystemTime::now())
    }

    pub fn issue_at(&self, channel_id: &str, now: SystemTime) -> String {
        let exp = match now.duration_since(UNIX_EPOCH) {
            Ok(since_epoch) => (since_epoch + ISSUED_TOKEN_TTL).as_secs() as i64,
            Err(e) => {
                error!(error = %e, channel_id, "clock before unix epoch; cannot issue token");
                return String::new();
            }
        };

        let claims = AuthClaims {
            opaque_user_id: None,
            user_id: self.owner_id.clone(),
            channel_id: Some(channel_id.to_string()),
            role: EXTERNAL_ROLE.to_string(),
            permissions: PubSubPermissions {
                send: vec![BROADCAST_TARGET.to_string()],
                listen: Vec::new(),
            },
            registered: RegisteredClaims::expiring_at(exp),
        };

        match encode(&self.header, &claims, &self.key) {
            Ok(token) => {
                debug!(channel_id, exp, "issued publish token");
                token
            }
            Err(e) => {
                error!(error = %e, channel_id, "failed to sign publish token");
                String::new()
            }
        }
    }
}
