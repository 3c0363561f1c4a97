//! Lock files are exclusive across processes.

use kbwatch::fs::LockDir;
use kbwatch::Error;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn test_lock_held_by_other_process() {
    let temp_dir = TempDir::new().unwrap();
    let lock_dir = LockDir::new(temp_dir.path());
    let guard = lock_dir.acquire("manager").unwrap();

    // flock(1) exits with 1 when it cannot take the lock without waiting
    let status = Command::new("flock")
        .arg("--nonblock")
        .arg(guard.path())
        .arg("true")
        .status()
        .expect("flock(1) from util-linux is required for this test");
    assert!(!status.success());

    drop(guard);
    let released = Command::new("flock")
        .arg("--nonblock")
        .arg(temp_dir.path().join("manager.lock"))
        .arg("true")
        .status()
        .unwrap();
    assert!(released.success());

    let again = lock_dir.acquire("manager");
    assert!(!matches!(again, Err(Error::LockHeld(_))));
}
