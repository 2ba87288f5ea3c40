//! Shared error types for command construction and signing.

use thiserror::Error;

/// Top-level error type for the signing core.
///
/// Every variant is raised synchronously at the call boundary, before any
/// network I/O happens. Nothing is retried.
#[derive(Error, Debug)]
pub enum PactError {
    /// A value was present but had the wrong type.
    #[error("Type mismatch for '{field}': expected {expected}")]
    TypeMismatch {
        /// The offending field or argument.
        field: String,
        /// What the field should have been.
        expected: &'static str,
    },

    /// A well-typed argument carried an unusable value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required structural field was absent.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A keypair lacked key material or its halves do not belong together.
    #[error("Malformed keypair: {0}")]
    MalformedKeyPair(String),

    /// Signers disagree about what was signed.
    #[error("Hash mismatch at signature {index}: expected {expected}, found {found}")]
    HashMismatch {
        /// Position of the disagreeing signature result.
        index: usize,
        /// The hash every signer was expected to report.
        expected: String,
        /// The hash actually reported.
        found: String,
    },

    /// A string was not valid hexadecimal.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// A string was not valid base64url.
    #[error("Invalid base64url: {0}")]
    InvalidBase64(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PactError {
    /// Shorthand for [`PactError::TypeMismatch`].
    pub fn type_mismatch(field: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
        }
    }
}

impl From<serde_json::Error> for PactError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Alias for Result with PactError.
pub type PactResult<T> = Result<T, PactError>;
