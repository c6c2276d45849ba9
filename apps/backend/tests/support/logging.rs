//! Logging for integration test binaries, which cannot reach the crate's
//! `#[cfg(test)]` bootstrap. Same filter order: `TEST_LOG`, `RUST_LOG`, `warn`.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = ["TEST_LOG", "RUST_LOG"]
            .into_iter()
            .find_map(|key| std::env::var(key).ok())
            .map(EnvFilter::new)
            .unwrap_or_else(|| EnvFilter::new("warn"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init();
    });
}

#[ctor::ctor]
fn init_for_integration_tests() {
    init();
}
