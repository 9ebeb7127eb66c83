//! Assertions for the service's plain-text error responses.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::{header, StatusCode};

/// Assert an error response carries `expected_status`, a `text/plain` body
/// equal to `expected_body`, and a non-empty `x-trace-id` header.
///
/// Returns the trace id so callers can correlate it with other headers.
pub async fn assert_plain_error<B>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
    expected_body: &str,
) -> String
where
    B: MessageBody,
{
    assert_eq!(resp.status(), expected_status, "unexpected status");

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("text/plain"),
        "expected text/plain error body, got '{content_type}'"
    );

    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(!trace_id.is_empty(), "x-trace-id header missing");

    let body = actix_web::test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert_eq!(body, expected_body, "unexpected error body");

    trace_id
}
