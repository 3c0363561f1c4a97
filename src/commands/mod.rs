//! Handlers behind each `kbwatch` subcommand.

pub mod ident;
pub mod lock_dir;
pub mod mac;
pub mod pid;
pub mod watchdog;
