//! Command construction and per-keypair signing.
//!
//! Building is serialize-then-sign in one step: the canonical string is
//! produced once and every keypair signs that same string, so signers can
//! never see different bytes for the same logical command.

use crate::aggregator::build_envelope;
use crate::clock::{NonceSource, SystemClock};
use pactsign_types::command::encode_nonce;
use pactsign_types::keys::sign;
use pactsign_types::{
    Command, ContPayload, Envelope, ExecPayload, KeyPair, Meta, PactError, PactResult, Payload,
    SignatureResult, Signer,
};
use serde_json::{Map, Value};
use tracing::debug;

/// A canonical command string and one signature result per keypair, in
/// keypair order.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCommand {
    pub sigs: Vec<SignatureResult>,
    pub cmd: String,
}

impl PreparedCommand {
    /// Aggregates into an envelope. A command nobody signed becomes an
    /// unsigned envelope (useful for local execution).
    pub fn into_envelope(self) -> PactResult<Envelope> {
        if self.sigs.is_empty() {
            return Ok(Envelope::unsigned(self.cmd));
        }
        build_envelope(&self.sigs, &self.cmd)
    }
}

/// Inputs for an exec command.
#[derive(Debug, Clone, Default)]
pub struct ExecCommand {
    pub key_pairs: Vec<KeyPair>,
    /// Defaults to the nonce source's value.
    pub nonce: Option<String>,
    pub code: String,
    /// Must be a JSON object; defaults to `{}`.
    pub data: Option<Value>,
    /// Defaults to all-empty meta.
    pub meta: Option<Meta>,
    pub network_id: Option<String>,
}

impl ExecCommand {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    pub fn key_pair(mut self, key_pair: KeyPair) -> Self {
        self.key_pairs.push(key_pair);
        self
    }

    pub fn key_pairs(mut self, key_pairs: impl IntoIterator<Item = KeyPair>) -> Self {
        self.key_pairs.extend(key_pairs);
        self
    }

    pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn network_id(mut self, network_id: impl Into<String>) -> Self {
        self.network_id = Some(network_id.into());
        self
    }

    /// Assembles the command structure without signing it.
    pub fn to_command(&self, nonces: &dyn NonceSource) -> PactResult<Command> {
        let payload = Payload::Exec(ExecPayload {
            data: object_or_empty(self.data.as_ref(), "envData")?,
            code: self.code.clone(),
        });
        Ok(assemble(
            payload,
            &self.key_pairs,
            self.nonce.as_deref(),
            self.meta.as_ref(),
            self.network_id.as_deref(),
            nonces,
        ))
    }

    /// Builds and signs with the system clock as nonce source.
    pub fn prepare(&self) -> PactResult<PreparedCommand> {
        self.prepare_with(&SystemClock)
    }

    pub fn prepare_with(&self, nonces: &dyn NonceSource) -> PactResult<PreparedCommand> {
        sign_command(&self.to_command(nonces)?, &self.key_pairs)
    }
}

/// Inputs for a continuation of a multi-step pact.
#[derive(Debug, Clone, Default)]
pub struct ContCommand {
    pub key_pairs: Vec<KeyPair>,
    pub nonce: Option<String>,
    pub pact_id: String,
    pub step: u64,
    pub rollback: bool,
    /// SPV proof for cross-chain steps.
    pub proof: Option<String>,
    pub data: Option<Value>,
    pub meta: Option<Meta>,
    pub network_id: Option<String>,
}

impl ContCommand {
    pub fn new(pact_id: impl Into<String>, step: u64) -> Self {
        Self {
            pact_id: pact_id.into(),
            step,
            ..Default::default()
        }
    }

    pub fn key_pair(mut self, key_pair: KeyPair) -> Self {
        self.key_pairs.push(key_pair);
        self
    }

    pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn rollback(mut self, rollback: bool) -> Self {
        self.rollback = rollback;
        self
    }

    pub fn proof(mut self, proof: impl Into<String>) -> Self {
        self.proof = Some(proof.into());
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn network_id(mut self, network_id: impl Into<String>) -> Self {
        self.network_id = Some(network_id.into());
        self
    }

    pub fn to_command(&self, nonces: &dyn NonceSource) -> PactResult<Command> {
        if self.pact_id.is_empty() {
            return Err(PactError::MissingField("pactId".into()));
        }
        let payload = Payload::Cont(ContPayload {
            proof: self.proof.clone(),
            pact_id: self.pact_id.clone(),
            rollback: self.rollback,
            step: self.step,
            data: object_or_empty(self.data.as_ref(), "envData")?,
        });
        Ok(assemble(
            payload,
            &self.key_pairs,
            self.nonce.as_deref(),
            self.meta.as_ref(),
            self.network_id.as_deref(),
            nonces,
        ))
    }

    pub fn prepare(&self) -> PactResult<PreparedCommand> {
        self.prepare_with(&SystemClock)
    }

    pub fn prepare_with(&self, nonces: &dyn NonceSource) -> PactResult<PreparedCommand> {
        sign_command(&self.to_command(nonces)?, &self.key_pairs)
    }
}

/// Builds and signs an exec command.
///
/// A single keypair is passed as a one-element slice. Without a `nonce` the
/// current instant (ISO-8601) is used.
pub fn build_command(
    key_pairs: &[KeyPair],
    nonce: Option<&str>,
    code: &str,
    env_data: Option<Value>,
    meta: Option<Meta>,
    network_id: Option<&str>,
) -> PactResult<PreparedCommand> {
    let exec = ExecCommand {
        key_pairs: key_pairs.to_vec(),
        nonce: nonce.map(str::to_string),
        code: code.to_string(),
        data: env_data,
        meta,
        network_id: network_id.map(str::to_string),
    };
    exec.prepare()
}

/// Serializes `command` once and signs the result with every keypair.
pub fn sign_command(command: &Command, key_pairs: &[KeyPair]) -> PactResult<PreparedCommand> {
    let cmd = command.to_canonical_string()?;
    let sigs = key_pairs
        .iter()
        .map(|kp| sign(&cmd, kp))
        .collect::<PactResult<Vec<_>>>()?;
    debug!(signers = sigs.len(), bytes = cmd.len(), "Prepared command");
    Ok(PreparedCommand { sigs, cmd })
}

fn assemble(
    payload: Payload,
    key_pairs: &[KeyPair],
    nonce: Option<&str>,
    meta: Option<&Meta>,
    network_id: Option<&str>,
    nonces: &dyn NonceSource,
) -> Command {
    let nonce = nonce.map_or_else(|| nonces.nonce(), str::to_string);
    Command {
        network_id: network_id.map(str::to_string),
        payload,
        signers: key_pairs.iter().map(signer_for).collect(),
        meta: meta.cloned().unwrap_or_default(),
        nonce: encode_nonce(&nonce),
    }
}

fn signer_for(key_pair: &KeyPair) -> Signer {
    Signer {
        pub_key: key_pair.public_key.clone(),
        clist: key_pair.capabilities.iter().map(|c| c.to_ref()).collect(),
    }
}

fn object_or_empty(data: Option<&Value>, field: &str) -> PactResult<Value> {
    match data {
        None => Ok(Value::Object(Map::new())),
        Some(obj @ Value::Object(_)) => Ok(obj.clone()),
        Some(other) => Err(PactError::InvalidArgument(format!(
            "{field} must be a JSON object, got {other}"
        ))),
    }
}
