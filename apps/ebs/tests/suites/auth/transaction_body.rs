use std::time::Duration;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, HttpResponse};
use ebs::auth::claims::TransactionClaims;
use ebs::extractors::verified::Verified;
use ebs::middleware::verify_token::TransactionMiddleware;
use ebs_test_support::plain_errors::assert_plain_error;

use crate::support::app_builder::test_state;
use crate::support::create_test_app;
use crate::support::tokens::{
    bearer, body_for, exp_in, purchase_claims, purchase_token, sign, viewer_token, TEST_SECRET,
};

/// Echoes the verified SKU and the size of the body it could still read.
async fn receipt(claims: Verified<TransactionClaims>, body: web::Bytes) -> HttpResponse {
    HttpResponse::Ok().body(format!("{}:{}", claims.data.product.sku, body.len()))
}

fn probe_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/probe")
            .wrap(TransactionMiddleware::new())
            .route("/receipt", web::post().to(receipt)),
    );
}

macro_rules! probe_app {
    ($limit:expr) => {{
        let ts = test_state(Duration::from_secs(1), $limit);
        create_test_app(ts.state)
            .with_routes(probe_routes)
            .build()
            .await
    }};
}

#[actix_web::test]
async fn valid_body_token_is_verified_and_body_is_replayed() {
    let app = probe_app!(64 * 1024);
    let payload = body_for(&purchase_token("fireworks.small")).to_string();

    let req = test::TestRequest::post()
        .uri("/probe/receipt")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload(payload.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(
        String::from_utf8_lossy(&body),
        format!("fireworks.small:{}", payload.len())
    );
}

#[actix_web::test]
async fn missing_token_field_is_bad_request() {
    let app = probe_app!(64 * 1024);

    let req = test::TestRequest::post()
        .uri("/probe/receipt")
        .set_json(serde_json::json!({ "receipt": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_plain_error(
        resp,
        StatusCode::BAD_REQUEST,
        "Invalid JSON: expected a string field \"token\"",
    )
    .await;
}

#[actix_web::test]
async fn empty_body_is_bad_request() {
    let app = probe_app!(64 * 1024);

    let req = test::TestRequest::post().uri("/probe/receipt").to_request();
    let resp = test::call_service(&app, req).await;

    assert_plain_error(
        resp,
        StatusCode::BAD_REQUEST,
        "Invalid JSON: unexpected end of input",
    )
    .await;
}

#[actix_web::test]
async fn oversized_body_is_rejected() {
    let app = probe_app!(64);
    let payload = body_for(&purchase_token("fireworks.small")).to_string();
    assert!(payload.len() > 64);

    let req = test::TestRequest::post()
        .uri("/probe/receipt")
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_plain_error(
        resp,
        StatusCode::PAYLOAD_TOO_LARGE,
        "Request body exceeds the 64 byte limit",
    )
    .await;
}

#[actix_web::test]
async fn expired_transaction_token_is_unauthorized() {
    let app = probe_app!(64 * 1024);
    let expired = sign(&purchase_claims("fireworks.small", exp_in(-1)), TEST_SECRET);

    let req = test::TestRequest::post()
        .uri("/probe/receipt")
        .set_json(body_for(&expired))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_plain_error(resp, StatusCode::UNAUTHORIZED, "Unauthorized").await;
}

#[actix_web::test]
async fn auth_token_in_body_does_not_pass_as_transaction() {
    let app = probe_app!(64 * 1024);

    // Right secret, wrong claim shape
    let req = test::TestRequest::post()
        .uri("/probe/receipt")
        .set_json(body_for(&viewer_token("123")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_plain_error(resp, StatusCode::UNAUTHORIZED, "Unauthorized").await;
}

#[actix_web::test]
async fn header_is_not_consulted_for_transaction_token() {
    let app = probe_app!(64 * 1024);

    let req = test::TestRequest::post()
        .uri("/probe/receipt")
        .insert_header((
            header::AUTHORIZATION,
            bearer(&purchase_token("fireworks.small")),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
