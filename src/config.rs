//! Optional `config.toml` stored in the lock directory.
//!
//! ```toml
//! [watchdog]
//! poll_interval_ms = 100
//! signal = "SIGKILL"
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use nix::sys::signal::Signal;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::process::parse_signal;
use crate::watchdog::WatchdogConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub watchdog: WatchdogSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchdogSection {
    pub poll_interval_ms: Option<u64>,
    pub signal: Option<String>,
}

impl Config {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Poll interval from the file, if set.
    pub fn poll_interval(&self) -> Option<Duration> {
        self.watchdog.poll_interval_ms.map(Duration::from_millis)
    }

    /// Signal from the file, if set.
    pub fn signal(&self) -> Result<Option<Signal>> {
        self.watchdog
            .signal
            .as_deref()
            .map(parse_signal)
            .transpose()
    }

    /// Apply file values on top of the built-in defaults of `config`.
    pub fn apply(&self, mut config: WatchdogConfig) -> Result<WatchdogConfig> {
        if let Some(interval) = self.poll_interval() {
            config.poll_interval = interval;
        }
        if let Some(signal) = self.signal()? {
            config.signal = signal;
        }
        Ok(config)
    }
}

/// Load and parse `config.toml`
///
/// # Returns
/// * `Ok(Some(Config))` - Config loaded and parsed successfully
/// * `Ok(None)` - Config file doesn't exist
/// * `Err(_)` - Failed to read or parse config
pub fn load_config(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;

    Config::from_toml_str(&content, path).map(Some)
}
