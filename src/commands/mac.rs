use anyhow::{Context, Result};

use crate::net::{first_hardware_address, list_interfaces};
use crate::timing::timed;

/// Print the hardware address suffix used in manager file names.
///
/// Prints an empty line when no interface qualifies.
pub fn execute(bare: bool) -> Result<()> {
    let interfaces =
        timed("list_interfaces", list_interfaces).context("Failed to enumerate interfaces")?;

    match first_hardware_address(&interfaces) {
        Some(mac) if bare => println!("{mac}"),
        Some(mac) => println!("_{mac}"),
        None => println!(),
    }

    Ok(())
}
