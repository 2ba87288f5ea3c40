//! Request-key derivation for polling and listening.

use pactsign_types::{Envelope, ListenRequest, PactError, PactResult, PollRequest};
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

/// Anything that may carry a command hash.
pub trait RequestKeySource {
    /// The hash, or `None` when it is absent or not a string.
    fn request_key(&self) -> Option<&str>;
}

impl RequestKeySource for Envelope {
    fn request_key(&self) -> Option<&str> {
        Some(&self.hash)
    }
}

impl RequestKeySource for Value {
    fn request_key(&self) -> Option<&str> {
        self.get("hash").and_then(Value::as_str)
    }
}

fn collect_keys<T: RequestKeySource>(envelopes: &[T]) -> PactResult<Vec<&str>> {
    if envelopes.is_empty() {
        return Err(PactError::InvalidArgument(
            "malformed batch: no commands".into(),
        ));
    }
    envelopes
        .iter()
        .enumerate()
        .map(|(i, env)| match env.request_key() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(PactError::InvalidArgument(format!(
                "malformed batch: command {i} has no hash"
            ))),
        })
        .collect()
}

/// Poll request for every command in the batch, duplicates removed, first
/// occurrence order kept.
pub fn derive_poll<T: RequestKeySource>(envelopes: &[T]) -> PactResult<PollRequest> {
    let keys = collect_keys(envelopes)?;
    let mut seen = HashSet::with_capacity(keys.len());
    let request_keys = keys
        .into_iter()
        .filter(|key| seen.insert(*key))
        .map(str::to_string)
        .collect();
    Ok(PollRequest { request_keys })
}

/// Listen request for the *first* command of the batch only.
///
/// Later commands are dropped; a warning is logged when that happens.
pub fn derive_listen<T: RequestKeySource>(envelopes: &[T]) -> PactResult<ListenRequest> {
    let keys = collect_keys(envelopes)?;
    if keys.len() > 1 {
        warn!(
            dropped = keys.len() - 1,
            listen = %keys[0],
            "Listen request narrowed to the first command of a batch"
        );
    }
    Ok(ListenRequest {
        listen: keys[0].to_string(),
    })
}
