//! Wall-clock collaborators: nonce generation and creation timestamps.
//!
//! Builders never read the clock directly; they take a [`NonceSource`] so
//! tests can pin nonces and get byte-identical commands.

use chrono::{SecondsFormat, Utc};

/// Produces the nonce for a command when the caller did not supply one.
pub trait NonceSource: Send + Sync {
    fn nonce(&self) -> String;
}

/// Current instant as an ISO-8601 string, e.g. `2024-05-01T12:00:00.000Z`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl NonceSource for SystemClock {
    fn nonce(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Always returns the same nonce.
#[derive(Debug, Clone)]
pub struct FixedNonce(pub String);

impl NonceSource for FixedNonce {
    fn nonce(&self) -> String {
        self.0.clone()
    }
}

/// Current unix time in seconds, for `Meta::creation_time`.
pub fn creation_time_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}
