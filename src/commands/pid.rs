use anyhow::{Context, Result};
use colored::Colorize;

use crate::process::{parse_pid, pid_exists};

/// Report whether a process exists.
///
/// # Returns
/// `true` if the process exists, so the caller can map it to an exit code
pub fn execute(raw_pid: &str) -> Result<bool> {
    let pid = parse_pid(raw_pid)?;
    let exists = pid_exists(pid).with_context(|| format!("Failed to query pid {pid}"))?;

    if exists {
        println!("{} {pid}", "alive".green().bold());
    } else {
        println!("{} {pid}", "not found".red());
    }

    Ok(exists)
}
