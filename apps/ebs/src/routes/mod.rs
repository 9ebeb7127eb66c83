use actix_web::web;

use crate::middleware::verify_token::{AuthMiddleware, TransactionMiddleware};

pub mod fireworks;
pub mod health;

/// Register every route. Shared by `main.rs` and the integration tests so both
/// serve the same middleware stack.
///
/// Inside `/api` the bearer header is checked first (`AuthMiddleware` is the
/// outermost wrap), then the transaction token in the body.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.configure(health::configure_routes);

    // Bits transaction routes: /api/**
    cfg.service(
        web::scope("/api")
            .wrap(TransactionMiddleware::new())
            .wrap(AuthMiddleware::new())
            .configure(fireworks::configure_routes),
    );
}
