use actix_web::http::header::{self, HeaderMap};

use crate::error::AppError;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Shortest header value that could hold a real token.
pub const MIN_BEARER_HEADER_LEN: usize = BEARER_PREFIX.len() + 5;

/// Token from the single `Authorization: Bearer <token>` header.
///
/// Errors:
/// - no header → `AppError::unauthorized()`
/// - more than one value, even if each is well formed → `multiple_auth_headers()`
/// - not UTF-8, wrong prefix, or shorter than [`MIN_BEARER_HEADER_LEN`] → `malformed_auth_header()`
pub fn bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let mut values = headers.get_all(header::AUTHORIZATION);

    let value = values.next().ok_or_else(AppError::unauthorized)?;
    if values.next().is_some() {
        return Err(AppError::multiple_auth_headers());
    }

    let value = value
        .to_str()
        .map_err(|_| AppError::malformed_auth_header())?;

    match value.strip_prefix(BEARER_PREFIX) {
        Some(token) if value.len() >= MIN_BEARER_HEADER_LEN => Ok(token.to_string()),
        _ => Err(AppError::malformed_auth_header()),
    }
}
