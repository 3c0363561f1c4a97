use nix::sys::signal::Signal;
use std::time::Duration;

/// Interval between parent liveness checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What the watchdog watches and what it does once the parent is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchdogConfig {
    /// Process killed when the parent disappears
    pub manager_pid: libc::pid_t,
    /// Process whose disappearance triggers the kill
    pub parent_pid: libc::pid_t,
    pub poll_interval: Duration,
    pub signal: Signal,
}

impl WatchdogConfig {
    pub fn new(manager_pid: libc::pid_t, parent_pid: libc::pid_t) -> Self {
        Self {
            manager_pid,
            parent_pid,
            poll_interval: DEFAULT_POLL_INTERVAL,
            signal: Signal::SIGKILL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = signal;
        self
    }
}
