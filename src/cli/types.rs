//! Command-line types

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use kbwatch::commands::watchdog::WatchdogArgs;

#[derive(Parser)]
#[command(name = "kbwatch")]
#[command(about = "Process supervision helpers for the knowledge-base manager")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a process exists (exit status 0 if it does, 1 if not)
    PidExists {
        /// Process ID to check
        #[arg(allow_hyphen_values = true)]
        pid: String,
    },

    /// Run the parent-death watchdog in the foreground
    #[command(hide = true)]
    Watchdog(WatchdogFlags),

    /// Start the parent-death watchdog as a separate process and print its pid
    SpawnWatchdog(WatchdogFlags),

    /// Print a unique id
    UniqueId,

    /// Print the hardware address suffix of the first non-loopback interface
    Mac {
        /// Print the address without the leading underscore
        #[arg(long)]
        bare: bool,
    },

    /// Print the lock directory
    LockDir {
        /// Create the directory if missing
        #[arg(long)]
        create: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
pub struct WatchdogFlags {
    /// Manager process to kill once the parent is gone
    #[arg(long, value_name = "PID")]
    pub manager: libc::pid_t,

    /// Parent process to watch (default: the caller's parent)
    #[arg(long, value_name = "PID")]
    pub parent: Option<libc::pid_t>,

    /// Milliseconds between liveness checks (default: 100)
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Signal delivered to the manager (default: SIGKILL)
    #[arg(long, value_name = "SIGNAL")]
    pub signal: Option<String>,
}

impl From<WatchdogFlags> for WatchdogArgs {
    fn from(flags: WatchdogFlags) -> Self {
        WatchdogArgs {
            manager: flags.manager,
            parent: flags.parent,
            interval_ms: flags.interval_ms,
            signal: flags.signal,
        }
    }
}
