//! Signature results, signed envelopes and result-retrieval requests.

use crate::digest::hash_to_request_key;
use serde::{Deserialize, Serialize};

/// One keypair's signature over a canonical command string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureResult {
    /// Base64url digest of the signed string.
    pub hash: String,
    /// Hex Ed25519 signature.
    pub sig: String,
    /// Hex public key of the signer.
    pub pub_key: String,
}

/// A detached signature as it appears in an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSig {
    pub sig: String,
}

/// A signed command, ready for submission.
///
/// `hash` is the request key of `cmd`; `sigs[i]` belongs to the i-th signer
/// listed inside `cmd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub hash: String,
    pub sigs: Vec<UserSig>,
    pub cmd: String,
}

impl Envelope {
    /// An envelope without signatures, for local execution of commands that
    /// list no signers.
    pub fn unsigned(cmd: impl Into<String>) -> Self {
        let cmd = cmd.into();
        Self {
            hash: hash_to_request_key(&cmd),
            sigs: Vec::new(),
            cmd,
        }
    }

    /// The key under which the command's result can be polled.
    pub fn request_key(&self) -> &str {
        &self.hash
    }
}

/// Request for the results of one or more commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollRequest {
    /// Unique, in order of first occurrence.
    pub request_keys: Vec<String>,
}

/// Blocking request for exactly one command's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenRequest {
    pub listen: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned_envelope_hashes_cmd() {
        let env = Envelope::unsigned("{}");
        assert_eq!(env.hash, hash_to_request_key("{}"));
        assert!(env.sigs.is_empty());
        assert_eq!(env.request_key(), env.hash);
    }

    #[test]
    fn test_wire_shapes() {
        let env = Envelope {
            hash: "h".into(),
            sigs: vec![UserSig { sig: "s".into() }],
            cmd: "c".into(),
        };
        assert_eq!(
            serde_json::to_string(&env).unwrap(),
            r#"{"hash":"h","sigs":[{"sig":"s"}],"cmd":"c"}"#
        );
        let poll = PollRequest {
            request_keys: vec!["a".into()],
        };
        assert_eq!(
            serde_json::to_string(&poll).unwrap(),
            r#"{"requestKeys":["a"]}"#
        );
        let listen = ListenRequest { listen: "a".into() };
        assert_eq!(serde_json::to_string(&listen).unwrap(), r#"{"listen":"a"}"#);
    }
}
