#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::claims::{AuthClaims, TransactionClaims};
pub use auth::issuer::TokenIssuer;
pub use auth::verifier::{TokenVerifier, VerifyError};
pub use config::Config;
pub use error::AppError;
pub use extractors::verified::Verified;
pub use infra::state::{build_state, StateBuilder};
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use middleware::trace_span::TraceSpan;
pub use middleware::verify_token::{AuthMiddleware, TransactionMiddleware};
pub use services::publisher::{PublishOutcome, Publisher};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    ebs_test_support::logging::init();
}
