//! Test log subscriber shared by unit and integration tests.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Quiet default; raise with `TEST_LOG=debug` (or `RUST_LOG`) when a test
/// needs the middleware and publisher logs.
const DEFAULT_TEST_FILTER: &str = "warn";

fn test_filter() -> EnvFilter {
    ["TEST_LOG", "RUST_LOG"]
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_TEST_FILTER))
}

/// Install the test subscriber once per process. Safe to call from every
/// `ctor` hook and from individual tests.
pub fn init() {
    INSTALLED.get_or_init(|| {
        // Another harness may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(test_filter())
            .with_test_writer()
            .without_time()
            .with_target(false)
            .try_init();
    });
}
