//! Server transport: submit, local execution, poll and listen.
//!
//! Every call is one HTTP POST of a JSON body. There is no retry, no backoff
//! and no cancellation; callers that need a deadline wrap the future.

use crate::error::{WireError, WireResult};
use crate::message::{PollEntry, PollResponseEntry, ResultResponse, SendRequest, SendResponse};
use async_trait::async_trait;
use pactsign_kernel::ExecCommand;
use pactsign_types::config::ClientConfig;
use pactsign_types::{Envelope, ListenRequest, PactError, PollRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

/// The four server operations the signing core depends on.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit a batch of signed commands for mining.
    async fn submit(&self, envelopes: &[Envelope]) -> WireResult<SendResponse>;

    /// Build a command and execute it on the node without gossiping it.
    async fn execute_locally(&self, command: &ExecCommand) -> WireResult<Value>;

    /// Results for the given request keys, for those that have one.
    async fn poll(&self, request: &PollRequest) -> WireResult<Vec<PollEntry>>;

    /// Block until the addressed command has a result.
    async fn listen(&self, request: &ListenRequest) -> WireResult<Value>;
}

/// `reqwest`-backed transport against `<host>/api/v1/*`.
pub struct HttpTransport {
    client: reqwest::Client,
    host: Option<String>,
    network_id: Option<String>,
}

impl HttpTransport {
    /// Create a transport from client configuration.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: build_client(config.request_timeout_secs),
            host: config.host.clone(),
            network_id: config.network_id.clone(),
        }
    }

    /// Shorthand for a transport that only needs a host.
    pub fn with_host(host: impl Into<String>) -> Self {
        Self::new(&ClientConfig {
            host: Some(host.into()),
            ..Default::default()
        })
    }

    fn endpoint(&self, path: &str) -> WireResult<String> {
        let host = self.host.as_deref().ok_or(WireError::MissingEndpoint)?;
        Ok(format!("{}/api/v1/{path}", host.trim_end_matches('/')))
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> WireResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        post_json(&self.client, url, body).await
    }
}

/// HTTP client shared by the transport and the wallet bridge.
///
/// No timeout unless one is configured; `listen` blocks until the node has a
/// result and a wallet waits for the user's consent.
pub(crate) fn build_client(timeout_secs: Option<u64>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to build configured HTTP client, using defaults");
        reqwest::Client::default()
    })
}

/// POST `body` as JSON and decode the JSON response.
///
/// Non-2xx answers become `Status` with the raw body.
pub(crate) async fn post_json<B, R>(client: &reqwest::Client, url: &str, body: &B) -> WireResult<R>
where
    B: Serialize + ?Sized + Sync,
    R: DeserializeOwned,
{
    debug!(url = %url, "POST");
    let response = client.post(url).json(body).send().await?;
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(WireError::Status {
            status: status.as_u16(),
            body: text,
        });
    }
    Ok(serde_json::from_str(&text)?)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, envelopes: &[Envelope]) -> WireResult<SendResponse> {
        let url = self.endpoint("send")?;
        if envelopes.is_empty() {
            return Err(PactError::InvalidArgument("nothing to submit".into()).into());
        }
        let response: SendResponse = self
            .post_json(&url, &SendRequest { cmds: envelopes })
            .await?;
        info!(
            commands = envelopes.len(),
            request_keys = response.request_keys.len(),
            "Submitted commands"
        );
        Ok(response)
    }

    async fn execute_locally(&self, command: &ExecCommand) -> WireResult<Value> {
        let url = self.endpoint("local")?;
        let mut command = command.clone();
        if command.network_id.is_none() {
            command.network_id = self.network_id.clone();
        }
        let envelope = command.prepare()?.into_envelope()?;
        debug!(hash = %envelope.hash, "Executing command locally");
        let response: ResultResponse = self.post_json(&url, &envelope).await?;
        Ok(response.result)
    }

    async fn poll(&self, request: &PollRequest) -> WireResult<Vec<PollEntry>> {
        let url = self.endpoint("poll")?;
        let response: Map<String, Value> = self.post_json(&url, request).await?;
        let mut entries = Vec::with_capacity(response.len());
        for (request_key, entry) in response {
            let entry: PollResponseEntry = serde_json::from_value(entry)?;
            entries.push(PollEntry {
                request_key,
                result: entry.result,
            });
        }
        debug!(
            requested = request.request_keys.len(),
            answered = entries.len(),
            "Polled results"
        );
        Ok(entries)
    }

    async fn listen(&self, request: &ListenRequest) -> WireResult<Value> {
        let url = self.endpoint("listen")?;
        debug!(listen = %request.listen, "Listening for result");
        let response: ResultResponse = self.post_json(&url, request).await?;
        Ok(response.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_host() {
        let transport = HttpTransport::with_host("http://localhost:8080/");
        assert_eq!(
            transport.endpoint("send").unwrap(),
            "http://localhost:8080/api/v1/send"
        );
    }

    #[test]
    fn test_endpoint_requires_host() {
        let transport = HttpTransport::new(&ClientConfig::default());
        assert!(matches!(
            transport.endpoint("poll"),
            Err(WireError::MissingEndpoint)
        ));
    }
}
