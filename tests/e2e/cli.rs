use assert_cmd::Command;
use predicates::prelude::*;
use std::os::unix::process::ExitStatusExt;
use std::time::Duration;
use tempfile::TempDir;
use wait_timeout::ChildExt;

fn kbwatch() -> Command {
    Command::cargo_bin("kbwatch").unwrap()
}

#[test]
fn test_pid_exists_for_own_process() {
    kbwatch()
        .args(["pid-exists", &std::process::id().to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("alive"));
}

#[test]
fn test_pid_exists_for_missing_process() {
    kbwatch()
        .args(["pid-exists", "999999999"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("not found"));
}

#[test]
fn test_pid_exists_for_zero() {
    kbwatch().args(["pid-exists", "0"]).assert().code(1);
}

#[test]
fn test_pid_exists_rejects_garbage() {
    kbwatch()
        .args(["pid-exists", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pid"));
}

#[test]
fn test_unique_id_format() {
    let output = kbwatch().arg("unique-id").output().unwrap();
    assert!(output.status.success());

    let id = String::from_utf8(output.stdout).unwrap();
    let parts: Vec<&str> = id.trim().split('_').collect();
    assert_eq!(parts.len(), 4);
    assert!(parts[0].parse::<u32>().is_ok());
    assert!(parts[3].parse::<f64>().is_ok());
}

#[test]
fn test_lock_dir_uses_work_path() {
    let temp_dir = TempDir::new().unwrap();
    let expected = temp_dir
        .path()
        .join("aoe_data/Ascend/latest/.lock/cann_kb_manager");

    kbwatch()
        .env("ASCEND_WORK_PATH", temp_dir.path())
        .args(["lock-dir", "--create"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.to_string_lossy().to_string()));

    assert!(expected.is_dir());
}

#[test]
fn test_lock_dir_falls_back_to_home() {
    let temp_dir = TempDir::new().unwrap();

    kbwatch()
        .env_remove("ASCEND_WORK_PATH")
        .env("HOME", temp_dir.path())
        .arg("lock-dir")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ascend/latest/.lock/cann_kb_manager"));

    assert!(!temp_dir.path().join("Ascend").exists());
}

#[test]
fn test_mac_prints_suffix_or_empty_line() {
    let output = kbwatch().arg("mac").output().unwrap();
    assert!(output.status.success());

    let line = String::from_utf8(output.stdout).unwrap();
    let line = line.trim_end();
    assert!(line.is_empty() || (line.starts_with('_') && line.len() == 13));
}

#[test]
fn test_foreground_watchdog_kills_manager() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = std::process::Command::new("sleep").arg("30").spawn().unwrap();

    kbwatch()
        .env("ASCEND_WORK_PATH", temp_dir.path())
        .args([
            "-v",
            "watchdog",
            "--manager",
            &manager.id().to_string(),
            "--parent",
            "999999999",
            "--interval-ms",
            "10",
        ])
        .timeout(Duration::from_secs(10))
        .assert()
        .success()
        .stderr(predicate::str::contains("Parent process no longer exists"));

    let status = manager
        .wait_timeout(Duration::from_secs(5))
        .unwrap()
        .expect("Manager should have been killed");
    assert_eq!(status.signal(), Some(libc::SIGKILL));
}

#[test]
fn test_completions() {
    kbwatch()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kbwatch"));
}

#[test]
fn test_foreground_watchdog_ignores_sigint() {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;
    use std::io::{BufRead, BufReader};
    use std::process::Stdio;
    use std::sync::mpsc;

    let temp_dir = TempDir::new().unwrap();
    let mut parent = std::process::Command::new("sleep").arg("30").spawn().unwrap();
    let mut manager = std::process::Command::new("sleep").arg("30").spawn().unwrap();

    let mut watchdog = std::process::Command::new(env!("CARGO_BIN_EXE_kbwatch"))
        .env("ASCEND_WORK_PATH", temp_dir.path())
        .env_remove("KBWATCH_LOG")
        .args([
            "-v",
            "watchdog",
            "--manager",
            &manager.id().to_string(),
            "--parent",
            &parent.id().to_string(),
            "--interval-ms",
            "20",
        ])
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    // Forward stderr lines so waits below can time out
    let stderr = watchdog.stderr.take().unwrap();
    let (line_tx, line_rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        for line in BufReader::new(stderr).lines().map_while(Result::ok) {
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });
    let wait_for_line = |needle: &str| loop {
        let line = line_rx
            .recv_timeout(Duration::from_secs(10))
            .unwrap_or_else(|_| panic!("no stderr line containing {needle:?}"));
        if line.contains(needle) {
            break;
        }
    };

    // The SIGINT handler is installed before the loop logs its start
    wait_for_line("Watchdog started");
    let watchdog_pid = Pid::from_raw(watchdog.id() as libc::pid_t);
    kill(watchdog_pid, Signal::SIGINT).unwrap();
    wait_for_line("Interrupt received, watchdog keeps running");

    std::thread::sleep(Duration::from_millis(100));
    assert!(watchdog.try_wait().unwrap().is_none());
    assert!(manager.try_wait().unwrap().is_none());

    parent.kill().unwrap();
    parent.wait().unwrap();

    let status = manager
        .wait_timeout(Duration::from_secs(10))
        .unwrap()
        .expect("Manager should be killed after the parent exits");
    assert_eq!(status.signal(), Some(libc::SIGKILL));

    let exit = watchdog
        .wait_timeout(Duration::from_secs(10))
        .unwrap()
        .expect("Watchdog should exit after killing the manager");
    assert!(exit.success());
}
