//! Multi-signature aggregation into a submittable envelope.
//!
//! Every signer must have signed the byte-identical command string. Signers
//! are compared by the hash each one reports; any disagreement is a hard
//! integrity failure.

use pactsign_types::digest::hash_to_request_key;
use pactsign_types::keys::verify_signature;
use pactsign_types::{Command, Envelope, PactError, PactResult, SignatureResult, UserSig};
use tracing::{debug, info};

/// Combines per-keypair signature results over `cmd` into an envelope.
///
/// Fails with `InvalidArgument` when `sigs` is empty and with `HashMismatch`
/// when any result disagrees with the first, or when the agreed hash is not
/// the request key of `cmd`.
pub fn build_envelope(sigs: &[SignatureResult], cmd: &str) -> PactResult<Envelope> {
    let Some(first) = sigs.first() else {
        return Err(PactError::InvalidArgument(
            "at least one signature result is required".into(),
        ));
    };
    let h0 = &first.hash;

    for (index, result) in sigs.iter().enumerate().skip(1) {
        if result.hash != *h0 {
            return Err(PactError::HashMismatch {
                index,
                expected: h0.clone(),
                found: result.hash.clone(),
            });
        }
    }

    let expected = hash_to_request_key(cmd);
    if *h0 != expected {
        return Err(PactError::HashMismatch {
            index: 0,
            expected,
            found: h0.clone(),
        });
    }

    let envelope = Envelope {
        hash: h0.clone(),
        sigs: sigs
            .iter()
            .map(|r| UserSig { sig: r.sig.clone() })
            .collect(),
        cmd: cmd.to_string(),
    };
    info!(hash = %envelope.hash, sigs = envelope.sigs.len(), "Built signed envelope");
    Ok(envelope)
}

/// Checks an envelope end to end: the hash is the request key of `cmd`, and
/// signature i verifies under the public key of signer i in `cmd`.
pub fn verify_envelope(envelope: &Envelope) -> PactResult<()> {
    let expected = hash_to_request_key(&envelope.cmd);
    if envelope.hash != expected {
        return Err(PactError::HashMismatch {
            index: 0,
            expected,
            found: envelope.hash.clone(),
        });
    }

    let command = Command::parse(&envelope.cmd)?;
    if command.signers.len() != envelope.sigs.len() {
        return Err(PactError::InvalidArgument(format!(
            "command lists {} signers but envelope carries {} signatures",
            command.signers.len(),
            envelope.sigs.len()
        )));
    }

    for (index, (signer, user_sig)) in command.signers.iter().zip(&envelope.sigs).enumerate() {
        if !verify_signature(&envelope.cmd, &user_sig.sig, &signer.pub_key) {
            return Err(PactError::InvalidArgument(format!(
                "signature {index} does not verify for {}",
                signer.pub_key
            )));
        }
        debug!(index, pub_key = %signer.pub_key, "Signature verified");
    }
    Ok(())
}
