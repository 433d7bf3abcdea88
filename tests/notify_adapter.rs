// tests/notify_adapter.rs

use std::path::PathBuf;
use std::time::Duration;

use devloop::errors::WatchError;
use devloop::types::{EventKind, FsEvent, WatchNotification};
use devloop::watch::{normalize_event, FsWatcher, NotificationReceiver, NotifyWatcher};
use devloop_test_utils::{init_tracing, with_timeout};
use notify::event::{
    AccessKind, CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind, RenameMode,
};
use notify::{Event, EventKind as NativeKind};
use tempfile::tempdir;

fn native(kind: NativeKind, paths: &[&str]) -> Event {
    paths
        .iter()
        .fold(Event::new(kind), |ev, p| ev.add_path(PathBuf::from(p)))
}

#[test]
fn create_remove_and_write_map_to_one_kind_each() {
    assert_eq!(
        normalize_event(&native(NativeKind::Create(CreateKind::File), &["/a"])),
        vec![FsEvent::new("/a", EventKind::CREATE)]
    );
    assert_eq!(
        normalize_event(&native(NativeKind::Remove(RemoveKind::Folder), &["/a"])),
        vec![FsEvent::new("/a", EventKind::REMOVE)]
    );
    assert_eq!(
        normalize_event(&native(
            NativeKind::Modify(ModifyKind::Data(DataChange::Content)),
            &["/a"]
        )),
        vec![FsEvent::new("/a", EventKind::WRITE)]
    );
    assert_eq!(
        normalize_event(&native(NativeKind::Modify(ModifyKind::Any), &["/a"])),
        vec![FsEvent::new("/a", EventKind::WRITE)]
    );
}

#[test]
fn renames_report_source_as_rename_and_destination_as_create() {
    assert_eq!(
        normalize_event(&native(
            NativeKind::Modify(ModifyKind::Name(RenameMode::From)),
            &["/old"]
        )),
        vec![FsEvent::new("/old", EventKind::RENAME)]
    );
    assert_eq!(
        normalize_event(&native(
            NativeKind::Modify(ModifyKind::Name(RenameMode::To)),
            &["/new"]
        )),
        vec![FsEvent::new("/new", EventKind::CREATE)]
    );
    assert_eq!(
        normalize_event(&native(
            NativeKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/old", "/new"]
        )),
        vec![
            FsEvent::new("/old", EventKind::RENAME),
            FsEvent::new("/new", EventKind::CREATE),
        ]
    );
}

#[test]
fn unrecognised_kinds_are_dropped() {
    for kind in [
        NativeKind::Access(AccessKind::Any),
        NativeKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
        NativeKind::Any,
        NativeKind::Other,
    ] {
        assert!(normalize_event(&native(kind, &["/a"])).is_empty(), "{kind:?}");
    }
}

/// Wait for an event on `path` with `kind`, skipping anything else.
async fn expect_event(rx: &mut NotificationReceiver, path: &PathBuf, kind: EventKind) {
    loop {
        match rx.recv().await {
            Some(WatchNotification::Event(ev)) if &ev.path == path && ev.kind.contains(kind) => {
                return;
            }
            Some(_) => continue,
            None => panic!("stream closed before {kind} on {path:?}"),
        }
    }
}

#[tokio::test]
async fn reports_changes_in_a_watched_directory() {
    init_tracing();

    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let mut watcher = NotifyWatcher::new().unwrap();
    watcher.watch(&root).unwrap();
    let mut rx = watcher.events().expect("stream available once");
    assert!(watcher.events().is_none(), "stream is not restartable");

    let file = root.join("hello.txt");
    std::fs::write(&file, b"hi").unwrap();
    with_timeout(expect_event(&mut rx, &file, EventKind::CREATE)).await;

    std::fs::remove_file(&file).unwrap();
    with_timeout(expect_event(&mut rx, &file, EventKind::REMOVE)).await;

    watcher.stop();
}

#[tokio::test]
async fn watch_is_not_recursive() {
    init_tracing();

    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let sub = root.join("sub");
    std::fs::create_dir(&sub).unwrap();

    let mut watcher = NotifyWatcher::new().unwrap();
    watcher.watch(&root).unwrap();
    let mut rx = watcher.events().unwrap();

    std::fs::write(sub.join("deep.txt"), b"x").unwrap();
    // A change directly under root proves the stream is live.
    let marker = root.join("marker.txt");
    std::fs::write(&marker, b"x").unwrap();

    let mut saw_deep = false;
    with_timeout(async {
        loop {
            match rx.recv().await {
                Some(WatchNotification::Event(ev)) if ev.path == marker => break,
                Some(WatchNotification::Event(ev)) if ev.path.starts_with(&sub) && ev.path != sub => {
                    saw_deep = true;
                }
                Some(_) => {}
                None => panic!("stream closed"),
            }
        }
    })
    .await;
    assert!(!saw_deep, "events below an unwatched subdirectory must not be reported");

    watcher.stop();
}

#[tokio::test]
async fn watching_a_missing_path_is_a_registration_error() {
    init_tracing();

    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let mut watcher = NotifyWatcher::new().unwrap();

    match watcher.watch(&missing) {
        Err(WatchError::Registration { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected registration error, got {other:?}"),
    }
    watcher.stop();
}

#[tokio::test]
async fn unwatch_requires_a_registered_path() {
    init_tracing();

    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let mut watcher = NotifyWatcher::new().unwrap();

    match watcher.unwatch(&root) {
        Err(WatchError::NotFound { path }) => assert_eq!(path, root),
        other => panic!("expected not-found error, got {other:?}"),
    }

    watcher.watch(&root).unwrap();
    watcher.unwatch(&root).unwrap();
    assert!(matches!(
        watcher.unwatch(&root),
        Err(WatchError::NotFound { .. })
    ));
    watcher.stop();
}

#[tokio::test]
async fn stop_closes_the_stream() {
    init_tracing();

    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let mut watcher = NotifyWatcher::new().unwrap();
    watcher.watch(&root).unwrap();
    let mut rx = watcher.events().unwrap();

    watcher.stop();

    with_timeout(async {
        while rx.recv().await.is_some() {}
    })
    .await;

    // Give a late backend thread a moment; the stream stays closed.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(rx.recv().await.is_none());
}
