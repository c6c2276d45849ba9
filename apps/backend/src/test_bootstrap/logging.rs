#![cfg(test)]

//! Logging for unit tests, installed once per test binary from `lib.rs`.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

const DEFAULT_FILTER: &str = "warn";

/// Install a test-writer subscriber. Safe to call more than once.
///
/// The filter is taken from `TEST_LOG`, then `RUST_LOG`, then defaults to `warn`:
///
/// ```bash
/// TEST_LOG=arena=debug cargo test -p arena
/// ```
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = ["TEST_LOG", "RUST_LOG"]
            .into_iter()
            .find_map(|key| std::env::var(key).ok())
            .map(EnvFilter::new)
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

        // cargo/nextest only capture output written through the test writer
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init();
    });
}
