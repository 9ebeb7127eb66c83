//! Token minting helpers for tests.
//!
//! Tokens are signed with the same shared secret the test state verifies
//! with, so each helper yields a token the middleware accepts unless the
//! caller tampers with it.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use ebs::auth::claims::{
    AuthClaims, Cost, Product, PubSubPermissions, RegisteredClaims, TransactionClaims,
    TransactionData,
};
use ebs::state::security_config::SecurityConfig;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;

pub const TEST_SECRET: &[u8] = b"integration-test-shared-secret";

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new(TEST_SECRET)
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_secs() as i64
}

/// Expiry `offset` seconds from now (negative for the past)
pub fn exp_in(offset: i64) -> RegisteredClaims {
    RegisteredClaims::expiring_at(unix_now() + offset)
}

pub fn sign<C: Serialize>(claims: &C, secret: &[u8]) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .expect("should sign test token")
}

pub fn viewer_claims(channel_id: Option<&str>, registered: RegisteredClaims) -> AuthClaims {
    AuthClaims {
        opaque_user_id: Some("U-opaque-1".to_string()),
        user_id: "viewer-1".to_string(),
        channel_id: channel_id.map(str::to_string),
        role: "viewer".to_string(),
        permissions: PubSubPermissions::default(),
        registered,
    }
}

pub fn purchase_claims(sku: &str, registered: RegisteredClaims) -> TransactionClaims {
    TransactionClaims {
        topic: "bits_transaction_receipt".to_string(),
        data: TransactionData {
            product: Product {
                domain_id: "twitch.ext.test".to_string(),
                sku: sku.to_string(),
                display_name: "Small Fireworks".to_string(),
                cost: Cost {
                    amount: 100,
                    unit: "bits".to_string(),
                },
                in_development: true,
            },
            time: "2026-10-16T12:00:00Z".to_string(),
            transaction_id: "txn-1".to_string(),
            user_id: "viewer-1".to_string(),
        },
        registered,
    }
}

/// Valid viewer token for `channel_id`, expiring in an hour
pub fn viewer_token(channel_id: &str) -> String {
    sign(&viewer_claims(Some(channel_id), exp_in(3600)), TEST_SECRET)
}

/// Valid receipt token for `sku`, expiring in an hour
pub fn purchase_token(sku: &str) -> String {
    sign(&purchase_claims(sku, exp_in(3600)), TEST_SECRET)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn body_for(token: &str) -> serde_json::Value {
    serde_json::json!({ "token": token })
}

pub const SHORT_WAIT: Duration = Duration::from_millis(200);
