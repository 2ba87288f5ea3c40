//! The single hash primitive: unkeyed BLAKE2b with a 256-bit output.
//!
//! Commands are hash-then-sign: the digest of the canonical command string is
//! both its content address (the request key) and the message fed to Ed25519.

use crate::codec::base64_url_encode;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Length in bytes of a command digest.
pub const DIGEST_LEN: usize = 32;

/// Computes the 32-byte BLAKE2b-256 digest of `message`.
pub fn digest(message: impl AsRef<[u8]>) -> [u8; DIGEST_LEN] {
    let mut hasher = Blake2b256::new();
    hasher.update(message.as_ref());
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Base64url request key for a message (usually a canonical command string).
pub fn hash_to_request_key(message: impl AsRef<[u8]>) -> String {
    base64_url_encode(&digest(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::binary_to_hex;

    #[test]
    fn test_digest_known_vector() {
        // BLAKE2b-256 of the empty string.
        assert_eq!(
            binary_to_hex(&digest(b"")),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }

    #[test]
    fn test_digest_is_deterministic() {
        let a = digest("(+ 1 2)");
        let b = digest("(+ 1 2)".as_bytes());
        assert_eq!(a, b);
        assert_ne!(a, digest("(+ 1 3)"));
    }

    #[test]
    fn test_request_key_is_base64url_of_digest() {
        let key = hash_to_request_key("hello");
        assert_eq!(key, base64_url_encode(&digest("hello")));
        assert_eq!(key.len(), 43);
        assert!(!key.contains('='));
    }
}
