use std::time::Duration;

use actix_http::Request;
use actix_web::http::{header, StatusCode};
use actix_web::test;
use ebs::auth::claims::AuthClaims;
use ebs::auth::verifier::TokenVerifier;
use ebs_test_support::plain_errors::assert_plain_error;

use crate::support::app_builder::{test_state, TEST_CLIENT_ID, TEST_OWNER_ID};
use crate::support::create_test_app;
use crate::support::tokens::{
    bearer, body_for, exp_in, purchase_claims, purchase_token, sign, test_security,
    viewer_claims, viewer_token, SHORT_WAIT, TEST_SECRET,
};

const DELIVERY_WAIT: Duration = Duration::from_secs(2);

fn fireworks_request(auth_token: &str, transaction_token: &str) -> Request {
    test::TestRequest::post()
        .uri("/api/fireworks")
        .insert_header((header::AUTHORIZATION, bearer(auth_token)))
        .set_json(body_for(transaction_token))
        .to_request()
}

#[actix_web::test]
async fn purchase_broadcasts_sku_to_channel() {
    let mut ts = test_state(Duration::from_secs(60), 64 * 1024);
    let app = create_test_app(ts.state).build().await;

    let req = fireworks_request(&viewer_token("123"), &purchase_token("fireworks.small"));
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), b"OK");

    let delivery = ts.deliveries.next(DELIVERY_WAIT).await;
    assert_eq!(delivery.channel_id, "123");
    assert_eq!(delivery.client_id, TEST_CLIENT_ID);
    assert_eq!(delivery.message.content_type, "application/json");
    assert_eq!(delivery.message.targets, vec!["broadcast".to_string()]);
    assert_eq!(delivery.message.message, "fireworks.small");

    // The outbound token is our own, scoped to the channel
    let token = delivery
        .authorization
        .strip_prefix("Bearer ")
        .expect("bearer-prefixed authorization");
    let claims: AuthClaims = TokenVerifier::new(&test_security())
        .verify(token)
        .expect("issued token verifies with the shared secret");
    assert_eq!(claims.user_id, TEST_OWNER_ID);
    assert_eq!(claims.channel_id.as_deref(), Some("123"));
    assert_eq!(claims.role, "external");
    assert_eq!(claims.permissions.send, vec!["broadcast".to_string()]);

    ts.deliveries.assert_none(SHORT_WAIT).await;
}

#[actix_web::test]
async fn repeat_purchase_within_cooldown_is_accepted_but_not_broadcast() {
    let mut ts = test_state(Duration::from_secs(60), 64 * 1024);
    let app = create_test_app(ts.state).build().await;

    let first = fireworks_request(&viewer_token("123"), &purchase_token("fireworks.small"));
    assert_eq!(test::call_service(&app, first).await.status(), StatusCode::OK);
    ts.deliveries.next(DELIVERY_WAIT).await;

    let second = fireworks_request(&viewer_token("123"), &purchase_token("fireworks.small"));
    let resp = test::call_service(&app, second).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await.as_ref(), b"OK");

    ts.deliveries.assert_none(SHORT_WAIT).await;
}

#[actix_web::test]
async fn cooldown_is_per_channel() {
    let mut ts = test_state(Duration::from_secs(60), 64 * 1024);
    let app = create_test_app(ts.state).build().await;

    for channel in ["123", "456"] {
        let req = fireworks_request(&viewer_token(channel), &purchase_token("fireworks.small"));
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        let delivery = ts.deliveries.next(DELIVERY_WAIT).await;
        assert_eq!(delivery.channel_id, channel);
    }
}

#[actix_web::test]
async fn broadcast_resumes_after_cooldown_elapses() {
    let mut ts = test_state(Duration::from_millis(50), 64 * 1024);
    let app = create_test_app(ts.state).build().await;

    let req = fireworks_request(&viewer_token("123"), &purchase_token("fireworks.small"));
    test::call_service(&app, req).await;
    ts.deliveries.next(DELIVERY_WAIT).await;

    tokio::time::sleep(Duration::from_millis(80)).await;

    let req = fireworks_request(&viewer_token("123"), &purchase_token("fireworks.large"));
    test::call_service(&app, req).await;
    let delivery = ts.deliveries.next(DELIVERY_WAIT).await;
    assert_eq!(delivery.message.message, "fireworks.large");
}

#[actix_web::test]
async fn viewer_without_channel_gets_ok_and_no_broadcast() {
    let mut ts = test_state(Duration::from_secs(60), 64 * 1024);
    let app = create_test_app(ts.state).build().await;
    let unbound = sign(&viewer_claims(None, exp_in(3600)), TEST_SECRET);

    let req = fireworks_request(&unbound, &purchase_token("fireworks.small"));
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    ts.deliveries.assert_none(SHORT_WAIT).await;
}

#[actix_web::test]
async fn expired_transaction_token_stops_before_handler() {
    let mut ts = test_state(Duration::from_secs(60), 64 * 1024);
    let app = create_test_app(ts.state).build().await;
    let expired = sign(&purchase_claims("fireworks.small", exp_in(-5)), TEST_SECRET);

    let req = fireworks_request(&viewer_token("123"), &expired);
    let resp = test::call_service(&app, req).await;

    assert_plain_error(resp, StatusCode::UNAUTHORIZED, "Unauthorized").await;
    ts.deliveries.assert_none(SHORT_WAIT).await;
}

#[actix_web::test]
async fn header_is_checked_before_body() {
    let mut ts = test_state(Duration::from_secs(60), 64 * 1024);
    let app = create_test_app(ts.state).build().await;

    // Both are wrong; the header failure wins
    let req = test::TestRequest::post()
        .uri("/api/fireworks")
        .set_payload("not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_plain_error(resp, StatusCode::UNAUTHORIZED, "Unauthorized").await;
    ts.deliveries.assert_none(SHORT_WAIT).await;
}

#[actix_web::test]
async fn unknown_api_path_still_requires_credentials() {
    let ts = test_state(Duration::from_secs(60), 64 * 1024);
    let app = create_test_app(ts.state).build().await;

    let req = test::TestRequest::post().uri("/api/unknown").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
