use std::sync::Arc;

use actix_web::{web, HttpResponse};
use tracing::{info, warn, Instrument, Span};

use crate::auth::claims::{AuthClaims, TransactionClaims};
use crate::extractors::verified::Verified;
use crate::state::app_state::AppState;

/// Both tokens have been verified by the time this runs. The broadcast is
/// spawned and the caller gets `OK` whether or not it is sent.
async fn fireworks(
    auth: Verified<AuthClaims>,
    transaction: Verified<TransactionClaims>,
    app_state: web::Data<AppState>,
) -> HttpResponse {
    let sku = transaction.data.product.sku.clone();

    info!(
        user_id = %auth.user_id,
        transaction_id = %transaction.data.transaction_id,
        sku = %sku,
        "bits transaction received"
    );

    match auth.channel_id.as_deref().filter(|id| !id.is_empty()) {
        Some(channel_id) => {
            let publisher = Arc::clone(&app_state.publisher);
            let channel_id = channel_id.to_string();
            actix_web::rt::spawn(
                async move {
                    publisher.publish(&channel_id, &sku).await;
                }
                .instrument(Span::current()),
            );
        }
        None => warn!(
            user_id = %auth.user_id,
            "auth token carries no channel id; skipping broadcast"
        ),
    }

    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("OK")
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/fireworks", web::post().to(fireworks));
}
