//! Unique id generation for keys handed to the knowledge-base manager.

use chrono::{DateTime, Utc};

/// Number of trailing timestamp characters kept in an id.
const TIMESTAMP_TAIL: usize = 9;

/// Generate a value unique across processes and calls.
///
/// Format: `{pid}_{ts}_{rand}` where `ts` is the last nine characters of the
/// Unix time rendered as `secs_micros` and `rand` is a random float in
/// `[0, 1)`.
pub fn generate_unique() -> String {
    compose(std::process::id(), Utc::now(), rand::random::<f64>())
}

fn compose(pid: u32, now: DateTime<Utc>, random: f64) -> String {
    format!("{pid}_{}_{random}", timestamp_tail(now))
}

fn timestamp_tail(now: DateTime<Utc>) -> String {
    let rendered = format!(
        "{}_{:06}",
        now.timestamp(),
        now.timestamp_subsec_micros()
    );
    let start = rendered.len().saturating_sub(TIMESTAMP_TAIL);
    rendered[start..].to_string()
}
