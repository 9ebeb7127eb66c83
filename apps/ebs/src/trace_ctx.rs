//! Task-local trace id for the request currently being served.
//!
//! `RequestTrace` opens the scope; `AppError` reads it when rendering a
//! rejection so the `x-trace-id` header matches the request's logs.

use std::future::Future;

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

const UNSCOPED: &str = "unknown";

/// Trace id for the current task, or "unknown" outside a request scope.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(String::clone)
        .unwrap_or_else(|_| UNSCOPED.to_string())
}

/// Run `future` with `trace_id` visible to [`trace_id`].
pub async fn with_trace_id<F: Future>(trace_id: String, future: F) -> F::Output {
    TRACE_ID.scope(trace_id, future).await
}
