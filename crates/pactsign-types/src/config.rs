//! Client configuration types.

use serde::{Deserialize, Serialize};

/// Fixed endpoint of the local delegated-signing daemon.
pub const DEFAULT_WALLET_URL: &str = "http://127.0.0.1:9467/v1/sign";

/// Where commands are sent and how the HTTP client behaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the execution server, e.g. `https://api.testnet.chainweb.com/chainweb/0.0/testnet04/chain/1/pact`.
    /// Transport calls fail with `MissingEndpoint` while unset.
    pub host: Option<String>,
    /// Network tag written into built commands.
    pub network_id: Option<String>,
    /// Signing daemon endpoint.
    pub wallet_url: String,
    /// Optional per-request timeout for the HTTP client. Unset by default:
    /// `listen` and the wallet consent prompt may legitimately take minutes.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: None,
            network_id: None,
            wallet_url: DEFAULT_WALLET_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}
