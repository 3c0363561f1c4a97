use anyhow::Result;

use crate::ident::generate_unique;

/// Print a fresh unique id.
pub fn execute() -> Result<()> {
    println!("{}", generate_unique());
    Ok(())
}
