// tests/debounce_property.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use devloop::config::Debounce;
use devloop::fs::mock::MockFileSystem;
use devloop::types::{EventKind, WatchNotification};
use devloop::watch::DirWatcher;
use devloop_test_utils::{FakeWatcher, RecordingHandler};
use proptest::prelude::*;

fn kind_strategy() -> impl Strategy<Value = EventKind> {
    prop_oneof![
        Just(EventKind::CREATE),
        Just(EventKind::WRITE),
        Just(EventKind::REMOVE),
        Just(EventKind::RENAME),
    ]
}

/// Feed `burst` through a watcher and return what the handler saw.
fn run_burst(count: usize, burst: &[(String, EventKind)]) -> Vec<WatchNotification> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    rt.block_on(async {
        let fs = MockFileSystem::new();
        fs.add_dir("/p");
        let (watcher, control) = FakeWatcher::new();
        let debounce = Debounce {
            count,
            interval: Duration::from_secs(60),
        };
        let mut dw = DirWatcher::new(watcher, Arc::new(fs)).with_debounce(debounce);
        let mut handler = RecordingHandler::new();

        for (name, kind) in burst {
            control.send_event(format!("/p/{name}"), *kind);
        }
        let _closed = control.close();

        dw.watch(&PathBuf::from("/p"), &mut handler).await.unwrap();
        handler.seen()
    })
}

proptest! {
    // A burst no longer than 1 + count reaches the handler exactly once,
    // as its first notification.
    #[test]
    fn burst_within_count_is_collapsed_to_first(
        count in 0usize..20,
        burst in proptest::collection::vec(("[a-z]{1,8}", kind_strategy()), 1..21),
    ) {
        prop_assume!(burst.len() <= count + 1);

        let seen = run_burst(count, &burst);

        let (name, kind) = &burst[0];
        prop_assert_eq!(seen, vec![WatchNotification::event(format!("/p/{name}"), *kind)]);
    }

    // Longer bursts are split into windows of 1 + count notifications; the
    // handler sees the first of each window, in order.
    #[test]
    fn long_bursts_yield_one_notification_per_window(
        count in 0usize..5,
        burst in proptest::collection::vec(("[a-z]{1,8}", kind_strategy()), 1..30),
    ) {
        let seen = run_burst(count, &burst);

        let expected: Vec<_> = burst
            .iter()
            .step_by(count + 1)
            .map(|(name, kind)| WatchNotification::event(format!("/p/{name}"), *kind))
            .collect();
        prop_assert_eq!(seen, expected);
    }
}
