//! Core types and signing primitives for Pact command signing.
//!
//! This crate holds the data model shared by the builder and the transport,
//! the codecs, the digest and the Ed25519 key agent. It performs no I/O.

pub mod capability;
pub mod codec;
pub mod command;
pub mod config;
pub mod digest;
pub mod envelope;
pub mod error;
pub mod keys;
pub mod serde_compat;

pub use capability::{Capability, CapabilityRef};
pub use command::{Command, ContPayload, ExecPayload, Meta, Payload, Signer};
pub use envelope::{Envelope, ListenRequest, PollRequest, SignatureResult, UserSig};
pub use error::{PactError, PactResult};
pub use keys::KeyPair;
