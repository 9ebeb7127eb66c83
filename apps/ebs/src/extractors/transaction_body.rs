use actix_web::dev::Payload;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::Error as JsonError;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Request body carrying the purchase receipt token.
#[derive(Debug, Deserialize)]
pub struct TransactionBody {
    pub token: String,
}

/// Drain `payload`, refusing bodies larger than `limit` bytes.
pub async fn read_body(payload: &mut Payload, limit: usize) -> Result<Bytes, AppError> {
    let mut body = BytesMut::new();

    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            warn!(error = %e, "Failed to read request body chunk");
            AppError::bad_request(ErrorCode::BadRequest, "Failed to read request body")
        })?;

        if body.len() + chunk.len() > limit {
            return Err(AppError::payload_too_large(limit));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body.freeze())
}

/// Payload that yields `body` again, for stages after the one that read it.
pub fn replay_payload(body: Bytes) -> Payload {
    let (_, mut replay) = actix_http::h1::Payload::create(true);
    replay.unread_data(body);
    Payload::from(replay)
}

pub fn decode_transaction_body(body: &[u8]) -> Result<TransactionBody, AppError> {
    serde_json::from_slice::<TransactionBody>(body).map_err(|e| {
        debug!(error = %e, body_size = body.len(), "transaction body decode failed");
        AppError::bad_request(ErrorCode::BadRequest, classify_json_error(&e))
    })
}

/// Sanitized reason for a JSON failure; never echoes body content.
fn classify_json_error(error: &JsonError) -> String {
    match error.classify() {
        serde_json::error::Category::Syntax => {
            format!("Invalid JSON at line {}", error.line())
        }
        serde_json::error::Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        serde_json::error::Category::Data => {
            "Invalid JSON: expected a string field \"token\"".to_string()
        }
        serde_json::error::Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}
