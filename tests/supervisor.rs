// tests/supervisor.rs
#![cfg(unix)]

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use devloop::errors::SupervisorError;
use devloop::exec::{
    CommandSpec, ProcessGroupTerminator, ProcessHandle, ProcessSupervisor, ProcessTerminator,
    SupervisorBackend,
};
use devloop_test_utils::{init_tracing, with_timeout};
use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use tempfile::tempdir;
use tokio::process::Command;

fn sh(script: &str) -> CommandSpec {
    CommandSpec::new("sh", vec!["-c".to_string(), script.to_string()])
}

fn supervisor() -> ProcessSupervisor<ProcessGroupTerminator> {
    ProcessSupervisor::new(ProcessGroupTerminator::new(Duration::from_millis(100)))
}

/// Whether `pid` still names a live process. Zombies count as dead.
fn alive(pid: i32) -> bool {
    match kill(Pid::from_raw(pid), None) {
        Err(Errno::ESRCH) => false,
        _ => match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
            Ok(stat) => stat
                .rsplit(')')
                .next()
                .and_then(|rest| rest.split_whitespace().next())
                .map(|state| state != "Z")
                .unwrap_or(true),
            // No procfs: trust kill(2).
            Err(_) => !Path::new("/proc/self").exists(),
        },
    }
}

async fn wait_until_dead(pid: i32) {
    while alive(pid) {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

async fn wait_for_file(path: &Path) -> String {
    loop {
        if let Ok(text) = std::fs::read_to_string(path) {
            if text.ends_with('\n') {
                return text;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn start_then_stop_reaps_the_process() {
    init_tracing();
    let sup = supervisor();

    let mut handle = sup.start(&sh("sleep 30")).unwrap();
    let pid = handle.pid() as i32;
    assert!(alive(pid));
    assert_eq!(handle.command(), &sh("sleep 30"));

    with_timeout(sup.stop(&mut handle)).await.unwrap();
    assert!(!alive(pid));
}

#[tokio::test]
async fn restart_replaces_the_process() {
    init_tracing();
    let sup = supervisor();
    let spec = sh("sleep 30");

    let first = sup.start(&spec).unwrap();
    let old_pid = first.pid() as i32;

    let mut second = with_timeout(sup.restart(first, &spec)).await.unwrap();
    assert_ne!(second.pid() as i32, old_pid);
    assert!(!alive(old_pid));
    assert!(alive(second.pid() as i32));

    with_timeout(sup.stop(&mut second)).await.unwrap();
}

#[tokio::test]
async fn restarting_an_exited_command_starts_a_fresh_one() {
    init_tracing();
    let sup = supervisor();
    let spec = CommandSpec::new("echo", vec!["hi".to_string()]);

    let first = sup.start(&spec).unwrap();
    let old_pid = first.pid() as i32;
    with_timeout(wait_until_dead(old_pid)).await;

    let mut second = with_timeout(sup.restart(first, &spec)).await.unwrap();
    assert_ne!(second.pid() as i32, old_pid);
    assert!(!alive(old_pid));
    assert_eq!(second.command(), &spec);

    with_timeout(sup.stop(&mut second)).await.unwrap();
}

#[tokio::test]
async fn stopping_an_exited_process_succeeds() {
    init_tracing();
    let sup = supervisor();

    let mut handle = sup.start(&CommandSpec::new("true", vec![])).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    with_timeout(sup.stop(&mut handle)).await.unwrap();
}

#[tokio::test]
async fn missing_program_is_a_start_error() {
    init_tracing();
    let sup = supervisor();
    let spec = CommandSpec::new(
        "devloop-definitely-not-a-program",
        vec!["with space".to_string()],
    );

    match sup.start(&spec) {
        Err(SupervisorError::Start { command, source }) => {
            assert_eq!(command, "devloop-definitely-not-a-program 'with space'");
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected start error, got {other:?}"),
    }
}

#[tokio::test]
async fn stop_takes_down_grandchildren() {
    init_tracing();
    let dir = tempdir().unwrap();
    let pidfile = dir.path().join("grandchild.pid");
    let sup = supervisor();

    let script = format!("sleep 30 & echo $! > '{}'; wait", pidfile.display());
    let mut handle = sup.start(&sh(&script)).unwrap();

    let grandchild: i32 = with_timeout(wait_for_file(&pidfile))
        .await
        .trim()
        .parse()
        .unwrap();
    assert!(alive(grandchild));

    with_timeout(sup.stop(&mut handle)).await.unwrap();
    with_timeout(wait_until_dead(grandchild)).await;
}

#[tokio::test]
async fn interrupt_gets_a_grace_period() {
    init_tracing();
    let dir = tempdir().unwrap();
    let ready = dir.path().join("ready");
    let marker = dir.path().join("interrupted");
    let sup = ProcessSupervisor::new(ProcessGroupTerminator::new(Duration::from_millis(1000)));

    let script = format!(
        "trap 'echo bye > \"{marker}\"; exit 0' INT; echo up > \"{ready}\"; \
         while true; do sleep 0.05; done",
        marker = marker.display(),
        ready = ready.display(),
    );
    let mut handle = sup.start(&sh(&script)).unwrap();
    with_timeout(wait_for_file(&ready)).await;

    with_timeout(sup.stop(&mut handle)).await.unwrap();
    assert_eq!(std::fs::read_to_string(&marker).unwrap(), "bye\n");
}

#[test]
fn default_grace_period_is_short() {
    assert_eq!(
        ProcessGroupTerminator::default().grace(),
        Duration::from_millis(200)
    );
}

/// Counts spawns and refuses to stop anything.
#[derive(Debug, Default)]
struct StubbornTerminator {
    starts: Arc<AtomicUsize>,
}

impl ProcessTerminator for StubbornTerminator {
    fn configure(&self, cmd: &mut Command) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        cmd.process_group(0);
    }

    fn terminate<'a>(
        &'a self,
        handle: &'a mut ProcessHandle,
    ) -> Pin<Box<dyn Future<Output = Result<(), SupervisorError>> + Send + 'a>> {
        Box::pin(async move {
            Err(SupervisorError::Stop {
                command: handle.command().display(),
                reason: "refused".to_string(),
            })
        })
    }
}

#[tokio::test]
async fn failed_stop_starts_nothing_new() {
    init_tracing();
    let terminator = StubbornTerminator::default();
    let starts = terminator.starts.clone();
    let mut sup = ProcessSupervisor::new(terminator);
    let spec = sh("sleep 30");

    let handle = SupervisorBackend::start(&mut sup, &spec).unwrap();
    let pid = handle.pid() as i32;

    let err = with_timeout(SupervisorBackend::restart(&mut sup, handle, &spec))
        .await
        .unwrap_err();
    assert!(matches!(err, SupervisorError::Stop { .. }), "{err}");
    assert_eq!(starts.load(Ordering::SeqCst), 1);

    // The handle was dropped with the failed restart; kill-on-drop cleans up.
    with_timeout(wait_until_dead(pid)).await;
}

#[test]
fn command_display_is_shell_escaped() {
    let spec = CommandSpec::new(
        "cargo",
        vec![
            "run".to_string(),
            "--".to_string(),
            "it's".to_string(),
            "".to_string(),
            "a b".to_string(),
            "key=val/x.rs".to_string(),
        ],
    );
    assert_eq!(
        spec.display(),
        r"cargo run -- 'it'\''s' '' 'a b' key=val/x.rs"
    );
    assert_eq!(spec.to_string(), spec.display());
    assert_eq!(spec.program(), "cargo");
    assert_eq!(spec.args().len(), 6);
}
