//! `kbwatch watchdog` and `kbwatch spawn-watchdog`

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::load_config;
use crate::fs::LockDir;
use crate::process::{parent_pid, parse_signal};
use crate::watchdog::{spawn_detached, Watchdog, WatchdogConfig, WatchdogOutcome};

/// Watchdog settings as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct WatchdogArgs {
    pub manager: libc::pid_t,
    pub parent: Option<libc::pid_t>,
    pub interval_ms: Option<u64>,
    pub signal: Option<String>,
}

/// Build the effective config: built-in defaults, then `config.toml` from
/// the lock directory, then command-line flags.
pub fn resolve_config(args: &WatchdogArgs) -> Result<WatchdogConfig> {
    let parent = args.parent.unwrap_or_else(parent_pid);
    let mut config = WatchdogConfig::new(args.manager, parent);

    match LockDir::from_env() {
        Ok(lock_dir) => {
            if let Some(file) = load_config(&lock_dir.config_path())? {
                config = file.apply(config)?;
            }
        }
        Err(e) => debug!("No lock directory, skipping config file: {e}"),
    }

    if let Some(ms) = args.interval_ms {
        config.poll_interval = Duration::from_millis(ms);
    }
    if let Some(signal) = &args.signal {
        config.signal = parse_signal(signal)?;
    }

    Ok(config)
}

/// Run the watchdog in the foreground until the parent disappears.
///
/// SIGINT is logged and otherwise ignored.
pub fn execute(args: WatchdogArgs) -> Result<WatchdogOutcome> {
    let config = resolve_config(&args)?;

    ctrlc::set_handler(|| {
        warn!("Interrupt received, watchdog keeps running");
    })
    .context("Failed to install SIGINT handler")?;

    let watchdog = Watchdog::new(config);
    let outcome = watchdog.run(|| {})?;
    Ok(outcome)
}

/// Start the watchdog as a separate process and print its pid.
pub fn spawn(args: WatchdogArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let detached = spawn_detached(&config).context("Failed to start watchdog process")?;

    println!("{}", detached.pid);
    Ok(())
}
