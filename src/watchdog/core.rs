//! The polling loop and its thread handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use super::config::WatchdogConfig;
use crate::error::{Error, Result};
use crate::process::{pid_exists, send_signal};

/// How a watchdog loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogOutcome {
    /// The parent vanished and the signal reached the manager
    ManagerKilled,
    /// The parent vanished but the manager was already gone
    ManagerAlreadyExited,
    /// Stopped through [`WatchdogHandle::stop`] while the parent was alive
    Stopped,
}

pub struct Watchdog {
    config: WatchdogConfig,
    shutdown_flag: Arc<AtomicBool>,
}

impl Watchdog {
    pub fn new(config: WatchdogConfig) -> Self {
        Self {
            config,
            shutdown_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &WatchdogConfig {
        &self.config
    }

    /// Run the loop on the current thread until the parent disappears.
    ///
    /// `on_start` is called once before the first liveness check so the
    /// launcher can wait for the loop to be up.
    ///
    /// # Returns
    /// The outcome, or the error from querying the parent or signalling the
    /// manager. The manager is left alone when the parent query fails.
    pub fn run<F: FnOnce()>(&self, on_start: F) -> Result<WatchdogOutcome> {
        let WatchdogConfig {
            manager_pid,
            parent_pid,
            poll_interval,
            signal,
        } = self.config;

        on_start();
        info!(parent_pid, manager_pid, "Watchdog started");

        let outcome = loop {
            if self.shutdown_flag.load(Ordering::SeqCst) {
                break WatchdogOutcome::Stopped;
            }

            if !pid_exists(parent_pid)? {
                warn!(
                    parent_pid,
                    manager_pid,
                    %signal,
                    "Parent process no longer exists, killing manager process"
                );
                break if send_signal(manager_pid, signal)? {
                    WatchdogOutcome::ManagerKilled
                } else {
                    warn!(manager_pid, "Manager process had already exited");
                    WatchdogOutcome::ManagerAlreadyExited
                };
            }

            thread::sleep(poll_interval);
        };

        info!(?outcome, "Watchdog exited");
        Ok(outcome)
    }

    /// Run the loop on a dedicated thread.
    ///
    /// Returns once the loop has started.
    pub fn spawn(config: WatchdogConfig) -> Result<WatchdogHandle> {
        let watchdog = Watchdog::new(config);
        let shutdown_flag = Arc::clone(&watchdog.shutdown_flag);
        let (started_tx, started_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("kbwatch-watchdog".to_string())
            .spawn(move || {
                watchdog.run(|| {
                    let _ = started_tx.send(());
                })
            })
            .map_err(|e| Error::io("Failed to spawn watchdog thread", e))?;

        if started_rx.recv().is_err() {
            // Sender dropped without sending: the thread died before on_start
            return match handle.join() {
                Ok(Err(e)) => Err(e),
                Ok(Ok(_)) | Err(_) => Err(Error::WatchdogStart),
            };
        }

        Ok(WatchdogHandle {
            shutdown_flag,
            handle,
        })
    }
}

/// Handle to a watchdog running on its own thread.
pub struct WatchdogHandle {
    shutdown_flag: Arc<AtomicBool>,
    handle: JoinHandle<Result<WatchdogOutcome>>,
}

impl WatchdogHandle {
    /// Ask the loop to end at its next tick.
    pub fn stop(&self) {
        self.shutdown_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the loop to end and return its outcome.
    pub fn join(self) -> Result<WatchdogOutcome> {
        match self.handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    /// Stop the loop and wait for it.
    pub fn shutdown(self) -> Result<WatchdogOutcome> {
        self.stop();
        self.join()
    }
}
