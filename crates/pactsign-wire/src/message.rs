//! Request and response bodies of the server API and the signing daemon.

use pactsign_types::{Capability, Envelope};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /api/v1/send` body.
#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    pub cmds: &'a [Envelope],
}

/// `POST /api/v1/send` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub request_keys: Vec<String>,
}

/// Responses of `/local` and `/listen`: the command result lives in `result`.
#[derive(Debug, Deserialize)]
pub(crate) struct ResultResponse {
    pub result: Value,
}

/// One entry of a `/poll` response, keyed by request key on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PollResponseEntry {
    pub result: Value,
}

/// A polled command result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollEntry {
    pub request_key: String,
    pub result: Value,
}

/// Unsigned request for the signing daemon.
///
/// Absent optional fields are left out of the JSON body entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningRequest {
    pub code: String,
    pub caps: Vec<Capability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

/// Signing daemon response; `body` is the signed envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SigningResponse {
    pub body: Envelope,
}
