//! Parent-death watchdog
//!
//! Polls the parent process and kills the manager process once the parent
//! is gone. Runs either on a thread of the calling process or as a separate
//! `kbwatch watchdog` process.

mod config;
pub mod core;
mod detached;


pub use config::{WatchdogConfig, DEFAULT_POLL_INTERVAL};
pub use core::{Watchdog, WatchdogHandle, WatchdogOutcome};
pub use detached::{spawn_detached, spawn_detached_with, DetachedWatchdog, STARTUP_GRACE};
