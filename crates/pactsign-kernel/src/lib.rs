//! Command construction, multi-signature aggregation and request-key
//! derivation.
//!
//! ## Flow
//!
//! - **builder**: assemble a [`Command`](pactsign_types::Command), serialize
//!   it once, sign the string with every keypair
//! - **aggregator**: check that all signers agree on the hash, emit an
//!   [`Envelope`](pactsign_types::Envelope)
//! - **request_keys**: turn envelopes into poll/listen requests

pub mod aggregator;
pub mod builder;
pub mod clock;
pub mod config;
pub mod pact_expr;
pub mod request_keys;

pub use aggregator::{build_envelope, verify_envelope};
pub use builder::{build_command, sign_command, ContCommand, ExecCommand, PreparedCommand};
pub use clock::{FixedNonce, NonceSource, SystemClock};
pub use request_keys::{derive_listen, derive_poll, RequestKeySource};
