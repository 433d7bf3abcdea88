//! Helpers shared by devloop's integration tests: tracing setup, a step
//! timeout, and fakes for each seam the orchestrator and watcher talk to.

pub mod fake_watcher;
pub mod fakes;

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

pub use fake_watcher::{ClosedFakeWatcher, FakeWatcher, FakeWatcherControl};
pub use fakes::{FakeIgnoreFilter, FakeSupervisor, RecordingHandler, SupervisorCall};

/// Upper bound for a single awaited step in a test.
pub const STEP_TIMEOUT: Duration = Duration::from_secs(5);

/// Install a subscriber that writes through the test harness, so output only
/// shows up for failing tests. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,devloop=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Await `fut`, panicking if it takes longer than [`STEP_TIMEOUT`].
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    match tokio::time::timeout(STEP_TIMEOUT, fut).await {
        Ok(out) => out,
        Err(_) => panic!("test step did not finish within {STEP_TIMEOUT:?}"),
    }
}
