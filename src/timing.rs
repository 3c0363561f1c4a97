//! Elapsed-time logging for manager operations.

use std::time::Instant;

use tracing::debug;

/// Run `f` and log how long it took at debug level.
///
/// The return value, including any error, is passed through untouched.
pub fn timed<T, F: FnOnce() -> T>(name: &str, f: F) -> T {
    let _stopwatch = Stopwatch::start(name);
    f()
}

/// Scope guard that logs the elapsed time when dropped.
pub struct Stopwatch<'a> {
    name: &'a str,
    begin: Instant,
}

impl<'a> Stopwatch<'a> {
    pub fn start(name: &'a str) -> Self {
        Self {
            name,
            begin: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.begin.elapsed().as_secs_f64()
    }
}

impl Drop for Stopwatch<'_> {
    fn drop(&mut self) {
        debug!("[{}] cost time: {} s", self.name, self.elapsed_secs());
    }
}
