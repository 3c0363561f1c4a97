//! Watchdog as a separate process.
//!
//! The child is the current executable re-run with the hidden `watchdog`
//! subcommand, so it enters through its own entry point instead of
//! replaying the launcher's startup. It runs in its own session and is
//! reaped by a background thread once it exits.

use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

use super::config::WatchdogConfig;
use crate::error::{Error, Result};

/// How long the child must survive before the spawn counts as successful.
pub const STARTUP_GRACE: Duration = Duration::from_millis(200);

/// A watchdog process that outlived the startup grace period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetachedWatchdog {
    pub pid: libc::pid_t,
}

/// Start a watchdog process using the current executable.
pub fn spawn_detached(config: &WatchdogConfig) -> Result<DetachedWatchdog> {
    let exe = std::env::current_exe()
        .map_err(|e| Error::io("Failed to locate current executable", e))?;
    spawn_detached_with(&exe, config)
}

/// Start a watchdog process using `exe` as the `kbwatch` binary.
pub fn spawn_detached_with(exe: &Path, config: &WatchdogConfig) -> Result<DetachedWatchdog> {
    let args = watchdog_args(config);
    debug!(exe = %exe.display(), ?args, "Spawning watchdog process");

    let mut command = Command::new(exe);
    command
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit());

    // SAFETY: setsid is async-signal-safe.
    // Own session: the launcher's terminal and process group signals stay out.
    unsafe {
        command.pre_exec(|| {
            nix::unistd::setsid()
                .map(|_| ())
                .map_err(std::io::Error::from)
        });
    }

    let mut child = command
        .spawn()
        .map_err(|e| Error::io(format!("Failed to spawn {}", exe.display()), e))?;

    match child
        .wait_timeout(STARTUP_GRACE)
        .map_err(|e| Error::io("Failed to wait for watchdog process", e))?
    {
        Some(status) => Err(Error::EarlyExit(status)),
        None => {
            let pid = child.id() as libc::pid_t;
            info!(
                pid,
                manager_pid = config.manager_pid,
                parent_pid = config.parent_pid,
                "Watchdog process running"
            );
            spawn_reaper(child)?;
            Ok(DetachedWatchdog { pid })
        }
    }
}

/// Wait on the child from a background thread so it never lingers as a
/// zombie of the launcher.
fn spawn_reaper(mut child: Child) -> Result<()> {
    thread::Builder::new()
        .name("kbwatch-reaper".to_string())
        .spawn(move || match child.wait() {
            Ok(status) => debug!(pid = child.id(), %status, "Watchdog process exited"),
            Err(e) => warn!(pid = child.id(), "Failed to reap watchdog process: {e}"),
        })
        .map(|_| ())
        .map_err(|e| Error::io("Failed to spawn watchdog reaper thread", e))
}

pub(super) fn watchdog_args(config: &WatchdogConfig) -> Vec<String> {
    vec![
        "watchdog".to_string(),
        "--manager".to_string(),
        config.manager_pid.to_string(),
        "--parent".to_string(),
        config.parent_pid.to_string(),
        "--interval-ms".to_string(),
        config.poll_interval.as_millis().to_string(),
        "--signal".to_string(),
        config.signal.as_str().to_string(),
    ]
}
