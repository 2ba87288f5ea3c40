//! Ed25519 keypairs and detached signing over command digests.
//!
//! The signing scheme:
//! 1. Compute the BLAKE2b-256 digest of the message (the canonical command).
//! 2. Sign the 32 digest bytes with Ed25519 (via `ed25519-dalek`).
//! 3. Report the base64url digest, the hex signature and the signer's key.
//!
//! Keypairs carry only the 32-byte seed as `secretKey`. The 64-byte signing
//! key the signature primitive needs is rebuilt as `seed || public` and
//! checked for consistency before use.

use crate::capability::Capability;
use crate::codec::{base64_url_decode, binary_to_hex, hex_to_array};
use crate::digest::{digest, DIGEST_LEN};
use crate::envelope::SignatureResult;
use crate::error::{PactError, PactResult};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey, KEYPAIR_LENGTH};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;
use zeroize::Zeroizing;

/// A caller-owned Ed25519 keypair, hex encoded.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    /// 32-byte public key.
    pub public_key: String,
    /// 32-byte seed (not the expanded 64-byte signing key).
    pub secret_key: String,
    /// Capabilities this signer grants to the command it signs.
    #[serde(default, alias = "clist", skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<Capability>,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

impl KeyPair {
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
            capabilities: Vec::new(),
        }
    }

    /// Attach capabilities, replacing any existing list.
    pub fn with_capabilities(mut self, capabilities: Vec<Capability>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Parse a keypair from loosely typed JSON (e.g. a key file).
    ///
    /// An absent `publicKey`/`secretKey` is a `MalformedKeyPair`; a present
    /// field of the wrong JSON type is a `TypeMismatch`.
    pub fn from_value(value: &Value) -> PactResult<Self> {
        let Value::Object(obj) = value else {
            return Err(PactError::type_mismatch("keyPair", "an object"));
        };
        let field = |name: &str| -> PactResult<String> {
            match obj.get(name) {
                None | Some(Value::Null) => {
                    Err(PactError::MalformedKeyPair(format!("missing {name}")))
                }
                Some(Value::String(s)) => Ok(s.clone()),
                Some(_) => Err(PactError::type_mismatch(name, "a hex string")),
            }
        };
        let public_key = field("publicKey")?;
        let secret_key = field("secretKey")?;
        let capabilities = match obj.get("clist").or_else(|| obj.get("capabilities")) {
            None | Some(Value::Null) => Vec::new(),
            Some(caps @ Value::Array(_)) => serde_json::from_value(caps.clone())
                .map_err(|_| PactError::type_mismatch("clist", "a list of capabilities"))?,
            Some(_) => return Err(PactError::type_mismatch("clist", "a list of capabilities")),
        };
        Ok(Self {
            public_key,
            secret_key,
            capabilities,
        })
    }
}

/// Generates a fresh keypair from the OS random source.
pub fn generate_key_pair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    key_pair_from_signing_key(&signing_key)
}

/// Rebuilds a keypair from its hex-encoded 32-byte seed.
pub fn restore_key_pair(seed_hex: &str) -> PactResult<KeyPair> {
    let seed = Zeroizing::new(
        hex_to_array::<32>(seed_hex)
            .map_err(|e| PactError::MalformedKeyPair(format!("secretKey: {e}")))?,
    );
    Ok(key_pair_from_signing_key(&SigningKey::from_bytes(&seed)))
}

fn key_pair_from_signing_key(signing_key: &SigningKey) -> KeyPair {
    KeyPair::new(
        binary_to_hex(signing_key.verifying_key().as_bytes()),
        binary_to_hex(signing_key.as_bytes()),
    )
}

/// Reconstructs the Ed25519 signing key from `secretKey || publicKey`.
///
/// Fails with `MalformedKeyPair` when either half is empty, is not 32 bytes
/// of hex, or when the public half does not belong to the seed.
pub fn to_signing_key(key_pair: &KeyPair) -> PactResult<SigningKey> {
    if key_pair.public_key.is_empty() {
        return Err(PactError::MalformedKeyPair("missing publicKey".into()));
    }
    if key_pair.secret_key.is_empty() {
        return Err(PactError::MalformedKeyPair("missing secretKey".into()));
    }

    let joined = Zeroizing::new(format!("{}{}", key_pair.secret_key, key_pair.public_key));
    let mut bytes = Zeroizing::new([0u8; KEYPAIR_LENGTH]);
    hex::decode_to_slice(joined.as_str(), &mut bytes[..]).map_err(|e| {
        PactError::MalformedKeyPair(format!("expected 32-byte hex seed and public key: {e}"))
    })?;

    SigningKey::from_keypair_bytes(&bytes)
        .map_err(|e| PactError::MalformedKeyPair(format!("public key does not match seed: {e}")))
}

/// Signs `digest(message)` with the keypair.
pub fn sign(message: impl AsRef<[u8]>, key_pair: &KeyPair) -> PactResult<SignatureResult> {
    let hash = digest(message);
    sign_digest(&hash, key_pair)
}

/// Signs an already computed request key (base64url digest).
pub fn sign_hash(request_key: &str, key_pair: &KeyPair) -> PactResult<SignatureResult> {
    let bytes = base64_url_decode(request_key)?;
    let hash: [u8; DIGEST_LEN] = bytes.as_slice().try_into().map_err(|_| {
        PactError::InvalidArgument(format!(
            "request key decodes to {} bytes, expected {DIGEST_LEN}",
            bytes.len()
        ))
    })?;
    sign_digest(&hash, key_pair)
}

fn sign_digest(hash: &[u8; DIGEST_LEN], key_pair: &KeyPair) -> PactResult<SignatureResult> {
    let signing_key = to_signing_key(key_pair)?;
    let signature = signing_key.sign(hash);
    let result = SignatureResult {
        hash: crate::codec::base64_url_encode(hash),
        sig: binary_to_hex(&signature.to_bytes()),
        pub_key: key_pair.public_key.clone(),
    };
    debug!(hash = %result.hash, pub_key = %result.pub_key, "Signed command digest");
    Ok(result)
}

/// Checks a detached signature over `digest(message)`.
///
/// Malformed keys or signatures count as a failed verification.
pub fn verify_signature(message: impl AsRef<[u8]>, sig_hex: &str, pub_key_hex: &str) -> bool {
    let hash = digest(message);

    let Ok(pk_bytes) = hex_to_array::<32>(pub_key_hex) else {
        debug!(pub_key = %pub_key_hex, "Public key is not 32 bytes of hex");
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(&pk_bytes) else {
        debug!(pub_key = %pub_key_hex, "Public key is not a valid curve point");
        return false;
    };
    let Ok(sig_bytes) = hex_to_array::<64>(sig_hex) else {
        debug!("Signature is not 64 bytes of hex");
        return false;
    };
    let signature = Signature::from_bytes(&sig_bytes);

    verifying_key.verify(&hash, &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::hash_to_request_key;
    use serde_json::json;

    #[test]
    fn test_generated_secret_is_seed_only() {
        let kp = generate_key_pair();
        assert_eq!(kp.public_key.len(), 64);
        assert_eq!(kp.secret_key.len(), 64);
        assert!(kp.capabilities.is_empty());
    }

    #[test]
    fn test_restore_matches_generated() {
        let kp = generate_key_pair();
        let restored = restore_key_pair(&kp.secret_key).unwrap();
        assert_eq!(restored, kp);
    }

    #[test]
    fn test_signing_key_is_seed_then_public() {
        let kp = generate_key_pair();
        let key = to_signing_key(&kp).unwrap();
        let bytes = key.to_keypair_bytes();
        assert_eq!(binary_to_hex(&bytes[..32]), kp.secret_key);
        assert_eq!(binary_to_hex(&bytes[32..]), kp.public_key);
    }

    #[test]
    fn test_missing_halves_are_malformed() {
        let kp = generate_key_pair();
        let no_secret = KeyPair::new(kp.public_key.clone(), "");
        let no_public = KeyPair::new("", kp.secret_key.clone());
        assert!(matches!(
            to_signing_key(&no_secret),
            Err(PactError::MalformedKeyPair(_))
        ));
        assert!(matches!(
            sign("msg", &no_public),
            Err(PactError::MalformedKeyPair(_))
        ));
    }

    #[test]
    fn test_mismatched_halves_are_malformed() {
        let a = generate_key_pair();
        let b = generate_key_pair();
        let crossed = KeyPair::new(a.public_key, b.secret_key);
        assert!(matches!(
            to_signing_key(&crossed),
            Err(PactError::MalformedKeyPair(_))
        ));
    }

    #[test]
    fn test_sign_hash_field_is_request_key() {
        let kp = generate_key_pair();
        let result = sign("(+ 1 2)", &kp).unwrap();
        assert_eq!(result.hash, hash_to_request_key("(+ 1 2)"));
        assert_eq!(result.pub_key, kp.public_key);
        assert_eq!(result.sig.len(), 128);
    }

    #[test]
    fn test_hash_independent_of_key() {
        let a = sign("same", &generate_key_pair()).unwrap();
        let b = sign("same", &generate_key_pair()).unwrap();
        assert_eq!(a.hash, b.hash);
        assert_ne!(a.sig, b.sig);
    }

    #[test]
    fn test_sign_and_verify() {
        let kp = generate_key_pair();
        let result = sign("payload", &kp).unwrap();
        assert!(verify_signature("payload", &result.sig, &kp.public_key));
        assert!(!verify_signature("tampered", &result.sig, &kp.public_key));
        let other = generate_key_pair();
        assert!(!verify_signature("payload", &result.sig, &other.public_key));
        assert!(!verify_signature("payload", "abcd", &kp.public_key));
    }

    #[test]
    fn test_sign_hash_matches_sign() {
        let kp = generate_key_pair();
        let direct = sign("cmd", &kp).unwrap();
        let via_key = sign_hash(&hash_to_request_key("cmd"), &kp).unwrap();
        assert_eq!(direct, via_key);
        assert!(matches!(
            sign_hash("AAAA", &kp),
            Err(PactError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_value_absent_vs_wrong_type() {
        let kp = generate_key_pair();
        let ok = KeyPair::from_value(&json!({
            "publicKey": kp.public_key,
            "secretKey": kp.secret_key,
        }))
        .unwrap();
        assert_eq!(ok, kp);

        let absent = KeyPair::from_value(&json!({"publicKey": kp.public_key}));
        assert!(matches!(absent, Err(PactError::MalformedKeyPair(_))));

        let wrong = KeyPair::from_value(&json!({"publicKey": 7, "secretKey": kp.secret_key}));
        assert!(matches!(wrong, Err(PactError::TypeMismatch { .. })));

        let bad_clist = KeyPair::from_value(&json!({
            "publicKey": kp.public_key,
            "secretKey": kp.secret_key,
            "clist": "coin.GAS",
        }));
        assert!(matches!(bad_clist, Err(PactError::TypeMismatch { .. })));
    }

    #[test]
    fn test_from_value_clist_shapes() {
        let kp = generate_key_pair();
        let gas = Capability::new("Gas", "Pay gas", "coin.GAS", vec![]);
        for entry in [
            json!({"role": "Gas", "description": "Pay gas", "cap": {"name": "coin.GAS", "args": []}}),
            json!({"role": "Gas", "description": "Pay gas", "name": "coin.GAS", "args": []}),
            json!({"name": "coin.GAS", "args": []}),
        ] {
            let parsed = KeyPair::from_value(&json!({
                "publicKey": kp.public_key,
                "secretKey": kp.secret_key,
                "clist": [entry.clone()],
            }))
            .unwrap();
            assert_eq!(parsed.capabilities.len(), 1, "{entry}");
            assert_eq!(parsed.capabilities[0].to_ref(), gas.to_ref());
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let kp = generate_key_pair();
        let rendered = format!("{kp:?}");
        assert!(!rendered.contains(&kp.secret_key));
        assert!(rendered.contains("<redacted>"));
    }
}
