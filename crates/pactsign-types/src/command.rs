//! The command structure whose serialization every signer signs.
//!
//! Field declaration order below *is* the wire key order. Existing servers
//! and wallets re-hash the exact bytes they receive, so reordering a field
//! changes every request key and invalidates every signature:
//!
//! - command: `networkId, payload, signers, meta, nonce`
//! - exec payload: `data, code`
//! - cont payload: `proof, pactId, rollback, step, data`
//! - meta: `creationTime, ttl, gasLimit, chainId, gasPrice, sender`

use crate::capability::CapabilityRef;
use crate::error::{PactError, PactResult};
use crate::serde_compat::js_number;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Public metadata: who pays for gas, on which chain, and for how long the
/// command stays valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Unix seconds.
    pub creation_time: u64,
    /// Seconds after `creation_time` the command may still be mined.
    pub ttl: u64,
    pub gas_limit: u64,
    pub chain_id: String,
    #[serde(serialize_with = "js_number")]
    pub gas_price: f64,
    /// Gas payer account.
    pub sender: String,
}

impl Meta {
    /// Arguments follow the conventional `mkMeta` order.
    pub fn new(
        sender: impl Into<String>,
        chain_id: impl Into<String>,
        gas_price: f64,
        gas_limit: u64,
        creation_time: u64,
        ttl: u64,
    ) -> Self {
        Self {
            creation_time,
            ttl,
            gas_limit,
            chain_id: chain_id.into(),
            gas_price,
            sender: sender.into(),
        }
    }

    /// Parse meta from loosely typed JSON. Every field is required.
    pub fn from_value(value: &Value) -> PactResult<Self> {
        let Value::Object(obj) = value else {
            return Err(PactError::type_mismatch("meta", "an object"));
        };
        Ok(Self {
            creation_time: required_u64(obj, "creationTime")?,
            ttl: required_u64(obj, "ttl")?,
            gas_limit: required_u64(obj, "gasLimit")?,
            chain_id: required_str(obj, "chainId")?,
            gas_price: required_number(obj, "gasPrice")?,
            sender: required_str(obj, "sender")?,
        })
    }
}

fn required<'a>(obj: &'a Map<String, Value>, field: &str) -> PactResult<&'a Value> {
    obj.get(field)
        .ok_or_else(|| PactError::MissingField(format!("meta.{field}")))
}

fn required_str(obj: &Map<String, Value>, field: &str) -> PactResult<String> {
    required(obj, field)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PactError::type_mismatch(format!("meta.{field}"), "a string"))
}

fn required_u64(obj: &Map<String, Value>, field: &str) -> PactResult<u64> {
    required(obj, field)?
        .as_u64()
        .ok_or_else(|| PactError::type_mismatch(format!("meta.{field}"), "a non-negative integer"))
}

fn required_number(obj: &Map<String, Value>, field: &str) -> PactResult<f64> {
    required(obj, field)?
        .as_f64()
        .ok_or_else(|| PactError::type_mismatch(format!("meta.{field}"), "a number"))
}

/// A public key expected to sign the command, with the capabilities it grants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signer {
    pub pub_key: String,
    #[serde(default)]
    pub clist: Vec<CapabilityRef>,
}

/// Code execution payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecPayload {
    pub data: Value,
    pub code: String,
}

/// Continuation of a multi-step pact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContPayload {
    /// SPV proof for cross-chain continuations, `null` otherwise.
    pub proof: Option<String>,
    pub pact_id: String,
    pub rollback: bool,
    pub step: u64,
    pub data: Value,
}

/// What the command does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Payload {
    Exec(ExecPayload),
    Cont(ContPayload),
}

/// The logical command. Its canonical string is what gets hashed and signed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub network_id: Option<String>,
    pub payload: Payload,
    pub signers: Vec<Signer>,
    pub meta: Meta,
    /// JSON encoding of the caller's nonce string, see [`encode_nonce`].
    pub nonce: String,
}

impl Command {
    /// Serializes to the canonical command string.
    pub fn to_canonical_string(&self) -> PactResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a canonical command string back into its structure.
    pub fn parse(cmd: &str) -> PactResult<Self> {
        Ok(serde_json::from_str(cmd)?)
    }

    /// The exec payload, if this is an exec command.
    pub fn exec(&self) -> Option<&ExecPayload> {
        match &self.payload {
            Payload::Exec(exec) => Some(exec),
            Payload::Cont(_) => None,
        }
    }
}

/// The nonce field carries the JSON encoding of the nonce string, so `n1`
/// travels as `"\"n1\""` once the command itself is serialized.
pub fn encode_nonce(nonce: &str) -> String {
    Value::String(nonce.to_string()).to_string()
}
