//! Delegated signing through a local wallet daemon.
//!
//! The daemon holds the keys, asks the user for consent and returns a fully
//! signed envelope. This side only marshals the unsigned request; it does no
//! cryptography of its own.

use crate::error::WireResult;
use crate::message::{SendResponse, SigningRequest, SigningResponse};
use crate::transport::{build_client, post_json, Transport};
use pactsign_types::config::{ClientConfig, DEFAULT_WALLET_URL};
use pactsign_types::{Capability, Envelope, PactError, PactResult};
use serde_json::{Map, Value};
use tracing::{debug, info};

impl SigningRequest {
    pub fn builder() -> SigningRequestBuilder {
        SigningRequestBuilder::default()
    }

    /// Parse a request from loosely typed JSON using the caller-facing names
    /// (`pactCode`, `caps`, `envData`, `sender`, `chainId`, `gasLimit`,
    /// `nonce`, `ttl`).
    ///
    /// Absent `pactCode`/`caps` fail with `MissingField`; any field of the
    /// wrong JSON type fails with `TypeMismatch`.
    pub fn from_value(value: &Value) -> PactResult<Self> {
        let Value::Object(obj) = value else {
            return Err(PactError::type_mismatch("signingCmd", "an object"));
        };

        let code = match present(obj, "pactCode") {
            None => return Err(PactError::MissingField("pactCode".into())),
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(PactError::type_mismatch("pactCode", "a string")),
        };
        let caps = match present(obj, "caps") {
            None => return Err(PactError::MissingField("caps".into())),
            Some(single @ Value::Object(_)) => vec![parse_cap(single, "caps")?],
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| parse_cap(item, &format!("caps[{i}]")))
                .collect::<PactResult<Vec<_>>>()?,
            Some(_) => return Err(PactError::type_mismatch("caps", "a capability or a list")),
        };
        let data = match present(obj, "envData") {
            None => None,
            Some(v @ Value::Object(_)) => Some(v.clone()),
            Some(_) => return Err(PactError::type_mismatch("envData", "an object")),
        };

        Ok(Self {
            code,
            caps,
            data,
            sender: optional_str(obj, "sender")?,
            chain_id: optional_str(obj, "chainId")?,
            gas_limit: optional_u64(obj, "gasLimit")?,
            nonce: optional_str(obj, "nonce")?,
            ttl: optional_u64(obj, "ttl")?,
        })
    }
}

fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn parse_cap(value: &Value, field: &str) -> PactResult<Capability> {
    serde_json::from_value(value.clone())
        .map_err(|_| PactError::type_mismatch(field, "a capability with a name and args"))
}

fn optional_str(obj: &Map<String, Value>, field: &str) -> PactResult<Option<String>> {
    present(obj, field)
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| PactError::type_mismatch(field, "a string"))
        })
        .transpose()
}

fn optional_u64(obj: &Map<String, Value>, field: &str) -> PactResult<Option<u64>> {
    present(obj, field)
        .map(|v| {
            v.as_u64()
                .ok_or_else(|| PactError::type_mismatch(field, "a non-negative integer"))
        })
        .transpose()
}

/// Builder for [`SigningRequest`]; `code` and `caps` are required.
#[derive(Debug, Default)]
pub struct SigningRequestBuilder {
    code: Option<String>,
    caps: Option<Vec<Capability>>,
    data: Option<Value>,
    sender: Option<String>,
    chain_id: Option<String>,
    gas_limit: Option<u64>,
    nonce: Option<String>,
    ttl: Option<u64>,
}

impl SigningRequestBuilder {
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn caps(mut self, caps: Vec<Capability>) -> Self {
        self.caps = Some(caps);
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn ttl(mut self, ttl: u64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn build(self) -> PactResult<SigningRequest> {
        let code = self
            .code
            .ok_or_else(|| PactError::MissingField("pactCode".into()))?;
        let caps = self
            .caps
            .ok_or_else(|| PactError::MissingField("caps".into()))?;
        if let Some(data) = &self.data {
            if !data.is_object() {
                return Err(PactError::type_mismatch("envData", "an object"));
            }
        }
        Ok(SigningRequest {
            code,
            caps,
            data: self.data,
            sender: self.sender,
            chain_id: self.chain_id,
            gas_limit: self.gas_limit,
            nonce: self.nonce,
            ttl: self.ttl,
        })
    }
}

/// Client for the signing daemon.
pub struct WalletBridge {
    client: reqwest::Client,
    url: String,
}

impl WalletBridge {
    /// Bridge to the daemon at its fixed local endpoint.
    pub fn new() -> Self {
        Self::with_url(DEFAULT_WALLET_URL, None)
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_url(&config.wallet_url, config.request_timeout_secs)
    }

    fn with_url(url: &str, timeout_secs: Option<u64>) -> Self {
        Self {
            client: build_client(timeout_secs),
            url: url.to_string(),
        }
    }

    /// The daemon endpoint this bridge talks to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Ask the daemon to sign; returns the envelope from the response `body`.
    pub async fn request_signature(&self, request: &SigningRequest) -> WireResult<Envelope> {
        debug!(
            url = %self.url,
            caps = request.caps.len(),
            "Requesting signature from wallet"
        );
        let response: SigningResponse = post_json(&self.client, &self.url, request).await?;
        info!(hash = %response.body.hash, "Wallet returned signed envelope");
        Ok(response.body)
    }

    /// Sign through the daemon, then submit the result.
    pub async fn sign_and_send(
        &self,
        request: &SigningRequest,
        transport: &dyn Transport,
    ) -> WireResult<SendResponse> {
        let envelope = self.request_signature(request).await?;
        transport.submit(std::slice::from_ref(&envelope)).await
    }
}

impl Default for WalletBridge {
    fn default() -> Self {
        Self::new()
    }
}
