//! Process utilities for kbwatch
//!
//! Existence checks and signal delivery for the processes the watchdog
//! supervises. Unix only.

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use crate::error::{Error, Result};

/// Check whether `pid` names a process in the current process table.
///
/// Sends the null signal, which performs the existence and permission checks
/// without delivering anything.
///
/// # Returns
/// * `Ok(false)` - `pid` is zero or negative, or the kernel reports `ESRCH`
/// * `Ok(true)` - the process exists (including `EPERM`: it exists but belongs
///   to someone else)
/// * `Err(Error::ProcessQuery)` - any other errno
///
/// # Example
/// ```ignore
/// use kbwatch::process::pid_exists;
///
/// let our_pid = std::process::id() as libc::pid_t;
/// assert!(pid_exists(our_pid).unwrap());
/// assert!(!pid_exists(0).unwrap());
/// ```
pub fn pid_exists(pid: libc::pid_t) -> Result<bool> {
    if pid <= 0 {
        return Ok(false);
    }

    match kill(Pid::from_raw(pid), None) {
        Ok(()) => Ok(true),
        Err(Errno::ESRCH) => Ok(false),
        Err(Errno::EPERM) => Ok(true),
        Err(source) => Err(Error::ProcessQuery { pid, source }),
    }
}

/// Lossy form of [`pid_exists`]: query errors and ids outside `pid_t` range
/// count as "not alive".
pub fn is_process_alive(pid: u32) -> bool {
    libc::pid_t::try_from(pid)
        .ok()
        .and_then(|pid| pid_exists(pid).ok())
        .unwrap_or(false)
}

/// Parse a textual pid as handed over by the manager service.
pub fn parse_pid(raw: &str) -> Result<libc::pid_t> {
    raw.trim()
        .parse::<libc::pid_t>()
        .map_err(|_| Error::InvalidPid(raw.to_string()))
}

/// Parse a signal name such as `SIGKILL`, `KILL` or `9`.
pub fn parse_signal(raw: &str) -> Result<Signal> {
    let trimmed = raw.trim();

    if let Ok(number) = trimmed.parse::<i32>() {
        return Signal::try_from(number).map_err(|_| Error::UnknownSignal(raw.to_string()));
    }

    let upper = trimmed.to_ascii_uppercase();
    let name = if upper.starts_with("SIG") {
        upper
    } else {
        format!("SIG{upper}")
    };
    name.parse::<Signal>()
        .map_err(|_| Error::UnknownSignal(raw.to_string()))
}

/// Deliver `signal` to `pid`.
///
/// # Returns
/// * `Ok(true)` - the signal was delivered
/// * `Ok(false)` - the process was already gone
pub fn send_signal(pid: libc::pid_t, signal: Signal) -> Result<bool> {
    if pid <= 0 {
        return Err(Error::InvalidPid(pid.to_string()));
    }

    match kill(Pid::from_raw(pid), signal) {
        Ok(()) => Ok(true),
        Err(Errno::ESRCH) => Ok(false),
        Err(source) => Err(Error::Signal { pid, source }),
    }
}

/// Pid of the current process as a `pid_t`.
pub fn current_pid() -> libc::pid_t {
    nix::unistd::getpid().as_raw()
}

/// Pid of the current process's parent.
pub fn parent_pid() -> libc::pid_t {
    nix::unistd::getppid().as_raw()
}
