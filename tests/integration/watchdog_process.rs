//! The detached watchdog process kills the manager once the parent is gone.

use kbwatch::process::pid_exists;
use kbwatch::watchdog::{spawn_detached_with, Watchdog, WatchdogConfig, WatchdogOutcome};
use kbwatch::Error;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{Child, Command};
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// Process state letter from `/proc/<pid>/stat`, `None` once the pid is gone.
fn proc_state(pid: libc::pid_t) -> Option<char> {
    let stat = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
    // The command name may contain spaces; the state follows the closing paren
    stat.rsplit_once(')')
        .and_then(|(_, rest)| rest.trim_start().chars().next())
}

fn kbwatch_bin() -> &'static Path {
    Path::new(env!("CARGO_BIN_EXE_kbwatch"))
}

fn spawn_sleep(secs: &str) -> Child {
    Command::new("sleep")
        .arg(secs)
        .spawn()
        .expect("Failed to spawn sleep")
}

#[test]
fn test_detached_watchdog_kills_manager_after_parent_exit() {
    let mut parent = spawn_sleep("0.5");
    let mut manager = spawn_sleep("30");

    let config = WatchdogConfig::new(manager.id() as libc::pid_t, parent.id() as libc::pid_t)
        .with_poll_interval(Duration::from_millis(20));
    let detached = spawn_detached_with(kbwatch_bin(), &config).expect("Watchdog should start");
    assert!(pid_exists(detached.pid).unwrap());

    parent.wait().unwrap();

    let status = manager
        .wait_timeout(Duration::from_secs(10))
        .unwrap()
        .expect("Manager should be killed within 10 seconds");
    assert_eq!(status.signal(), Some(libc::SIGKILL));
}

#[test]
fn test_detached_watchdog_is_reaped_after_exit() {
    let mut parent = spawn_sleep("0.5");
    let mut manager = spawn_sleep("30");

    let config = WatchdogConfig::new(manager.id() as libc::pid_t, parent.id() as libc::pid_t)
        .with_poll_interval(Duration::from_millis(20));
    let detached = spawn_detached_with(kbwatch_bin(), &config).expect("Watchdog should start");

    // Runs in its own session
    let own_session = nix::unistd::getsid(None).unwrap();
    let watchdog_session =
        nix::unistd::getsid(Some(nix::unistd::Pid::from_raw(detached.pid))).unwrap();
    assert_ne!(watchdog_session, own_session);

    parent.wait().unwrap();
    manager
        .wait_timeout(Duration::from_secs(10))
        .unwrap()
        .expect("Manager should be killed within 10 seconds");

    let deadline = Instant::now() + Duration::from_secs(10);
    while pid_exists(detached.pid).unwrap() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }

    assert_ne!(proc_state(detached.pid), Some('Z'));
    assert!(!pid_exists(detached.pid).unwrap());
}

#[test]
fn test_detached_watchdog_reports_early_exit() {
    // `false` exits immediately with status 1
    let config = WatchdogConfig::new(1, 1);
    let result = spawn_detached_with(Path::new("false"), &config);

    match result {
        Err(Error::EarlyExit(status)) => assert_eq!(status.code(), Some(1)),
        other => panic!("expected early exit, got {other:?}"),
    }
}

#[test]
fn test_thread_watchdog_survives_while_parent_lives() {
    let mut parent = spawn_sleep("30");
    let mut manager = spawn_sleep("30");

    let config = WatchdogConfig::new(manager.id() as libc::pid_t, parent.id() as libc::pid_t)
        .with_poll_interval(Duration::from_millis(20));
    let handle = Watchdog::spawn(config).unwrap();

    std::thread::sleep(Duration::from_millis(150));
    assert!(manager.try_wait().unwrap().is_none());

    assert_eq!(handle.shutdown().unwrap(), WatchdogOutcome::Stopped);
    assert!(manager.try_wait().unwrap().is_none());

    parent.kill().unwrap();
    parent.wait().unwrap();
    manager.kill().unwrap();
    manager.wait().unwrap();
}
