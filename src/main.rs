mod cli;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use kbwatch::commands::{ident, lock_dir, mac, pid, watchdog};
use kbwatch::logging;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::PidExists { pid: raw } => {
            let exists = pid::execute(&raw)?;
            return Ok(if exists {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
        Commands::Watchdog(flags) => {
            watchdog::execute(flags.into())?;
        }
        Commands::SpawnWatchdog(flags) => watchdog::spawn(flags.into())?,
        Commands::UniqueId => ident::execute()?,
        Commands::Mac { bare } => mac::execute(bare)?,
        Commands::LockDir { create } => lock_dir::execute(create)?,
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "kbwatch", &mut std::io::stdout());
        }
    }

    Ok(ExitCode::SUCCESS)
}
