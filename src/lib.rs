//! Process supervision and OS helpers for the knowledge-base manager.

pub mod commands;
pub mod config;
pub mod error;
pub mod fs;
pub mod ident;
pub mod logging;
pub mod net;
pub mod process;
pub mod timing;
pub mod watchdog;

pub use error::{Error, Result};
