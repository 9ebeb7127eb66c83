pub mod cors;
pub mod request_trace;
pub mod trace_span;
pub mod verify_token;

pub use cors::cors_middleware;
pub use request_trace::RequestTrace;
pub use trace_span::TraceSpan;
pub use verify_token::{AuthMiddleware, TransactionMiddleware, VerifyToken};
