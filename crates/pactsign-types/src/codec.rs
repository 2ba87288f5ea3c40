//! Binary, hex and base64url conversions.
//!
//! Conversions are strict: the JSON boundary helpers reject anything that is
//! not exactly the expected shape instead of coercing it.

use crate::error::{PactError, PactResult};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, NO_PAD, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde_json::Value;

/// Lowercase hex encoding of raw bytes.
pub fn binary_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decodes a hex string. Non-hex content is rejected.
pub fn hex_to_binary(hex_str: &str) -> PactResult<Vec<u8>> {
    hex::decode(hex_str).map_err(|e| PactError::InvalidHex(format!("{hex_str:?}: {e}")))
}

/// Decodes a fixed-width hex string into an array.
pub fn hex_to_array<const N: usize>(hex_str: &str) -> PactResult<[u8; N]> {
    let mut out = [0u8; N];
    hex::decode_to_slice(hex_str, &mut out)
        .map_err(|e| PactError::InvalidHex(format!("expected {N} bytes: {e}")))?;
    Ok(out)
}

/// Reads a JSON array of byte values (`[0, 255, ...]`).
///
/// Strings, numbers outside `0..=255` and nested values fail with
/// `TypeMismatch`.
pub fn json_to_binary(value: &Value) -> PactResult<Vec<u8>> {
    let Value::Array(items) = value else {
        return Err(PactError::type_mismatch("bytes", "an array of bytes"));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| PactError::type_mismatch(format!("bytes[{i}]"), "a byte (0..=255)"))
        })
        .collect()
}

/// Hex encoding for a JSON byte array, see [`json_to_binary`].
pub fn json_binary_to_hex(value: &Value) -> PactResult<String> {
    json_to_binary(value).map(|bytes| binary_to_hex(&bytes))
}

/// Unpadded base64url, usable verbatim as an identifier.
pub fn base64_url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// base64url decoder that accepts canonical padding or none, never extra.
const URL_SAFE_OPTIONAL_PAD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    NO_PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes base64url with or without trailing padding.
pub fn base64_url_decode(encoded: &str) -> PactResult<Vec<u8>> {
    URL_SAFE_OPTIONAL_PAD
        .decode(encoded)
        .map_err(|e| PactError::InvalidBase64(format!("{encoded:?}: {e}")))
}
