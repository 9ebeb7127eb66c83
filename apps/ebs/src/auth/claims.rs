//! Claim schemas carried by the two inbound tokens and by the token this
//! service issues for publishing.

use serde::{Deserialize, Serialize};

/// Role granted to tokens minted by this service.
pub const EXTERNAL_ROLE: &str = "external";

/// PubSub target every outbound message is sent to.
pub const BROADCAST_TARGET: &str = "broadcast";

/// Registered timestamps shared by every claim set (seconds since epoch).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RegisteredClaims {
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl RegisteredClaims {
    pub fn expiring_at(exp: i64) -> Self {
        Self { exp, iat: None }
    }
}

/// Identity of the caller, presented as `Authorization: Bearer <token>`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AuthClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opaque_user_id: Option<String>,
    #[serde(default)]
    pub user_id: String,
    /// Empty until the extension is bound to a channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    pub role: String,
    #[serde(rename = "pubsub_perms", default)]
    pub permissions: PubSubPermissions,
    #[serde(flatten)]
    pub registered: RegisteredClaims,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PubSubPermissions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub send: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub listen: Vec<String>,
}

/// Receipt of a completed purchase, embedded in the request body.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TransactionClaims {
    pub topic: String,
    pub data: TransactionData,
    #[serde(flatten)]
    pub registered: RegisteredClaims,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    pub product: Product,
    /// ISO-8601 timestamp of the purchase
    pub time: String,
    pub transaction_id: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub domain_id: String,
    pub sku: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(alias = "Cost")]
    pub cost: Cost,
    #[serde(default)]
    pub in_development: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Cost {
    pub amount: i64,
    #[serde(rename = "type")]
    pub unit: String,
}
