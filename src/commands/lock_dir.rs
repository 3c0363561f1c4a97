use anyhow::{Context, Result};

use crate::fs::LockDir;

/// Print the lock directory, optionally creating it.
pub fn execute(create: bool) -> Result<()> {
    let lock_dir = LockDir::from_env().context("Failed to resolve lock directory")?;

    if create {
        lock_dir.create()?;
    }

    println!("{}", lock_dir.root().display());
    Ok(())
}
