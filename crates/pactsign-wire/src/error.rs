//! Transport error types.

use pactsign_types::PactError;
use thiserror::Error;

/// Transport error type wrapping PactError with network context.
///
/// Network, status and decoding failures are reported exactly once, as they
/// happened; nothing is retried.
#[derive(Error, Debug)]
pub enum WireError {
    /// A wrapped validation/signing error.
    #[error(transparent)]
    Pact(#[from] PactError),

    /// No server address is configured.
    #[error("No server endpoint configured")]
    MissingEndpoint,

    /// The request could not be sent or the response not read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The response body was not the JSON we expected.
    #[error("Invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias for transport results.
pub type WireResult<T> = Result<T, WireError>;
