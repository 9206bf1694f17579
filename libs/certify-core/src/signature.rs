//! Signature primitives
//! ---
//!
//! Publisher signs `keccak256(certificate_uri)` with `personal_sign`, i.e. the
//! wallet signs EIP-191 message made of the 32 bytes of the hash:
//!
//! ```text
//! keccak256("\x19Ethereum Signed Message:\n32" || keccak256(certificate_uri))
//! ```
//!
//! Signature is transported as 65 bytes blob `r || s || v`, and is split into
//! its fixed width components before recovery.
//!
use alloy_primitives::{address, eip191_hash_message, keccak256, Address, B256};

use crate::error::{CertifyError, CertifyResult};

pub const SIGNATURE_LENGTH: usize = 65;

/// Address of `ecrecover` precompile.
pub const ECRECOVER_ADDRESS: Address = address!("0000000000000000000000000000000000000001");

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignatureParts {
    pub r: B256,
    pub s: B256,
    pub v: u8,
}

impl SignatureParts {
    pub fn new(r: B256, s: B256, v: u8) -> Self {
        Self { r, s, v }
    }

    /// Accepts both Ethereum style `v` (27 or 28) and raw recovery id (0 or 1).
    pub fn y_parity(&self) -> Option<bool> {
        match self.v {
            0 | 27 => Some(false),
            1 | 28 => Some(true),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(self.r.as_slice());
        bytes[32..64].copy_from_slice(self.s.as_slice());
        bytes[64] = self.v;
        bytes
    }
}

pub fn split_signature(signature: &[u8]) -> CertifyResult<SignatureParts> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(CertifyError::MalformedSignature);
    }
    Ok(SignatureParts {
        r: B256::from_slice(&signature[..32]),
        s: B256::from_slice(&signature[32..64]),
        v: signature[64],
    })
}

/// Hash of the certificate content, which publisher signs and verifier supplies.
pub fn certificate_hash(certificate_uri: &str) -> B256 {
    keccak256(certificate_uri.as_bytes())
}

/// Digest actually signed by `personal_sign` over 32 bytes of `hash`.
pub fn signed_message_hash(hash: B256) -> B256 {
    eip191_hash_message(hash)
}

/// Input for `ecrecover` precompile: `digest || v || r || s`, each 32 bytes.
///
/// Returns `None` when `v` is not recognised, so that the precompile isn't
/// called at all.
pub fn ecrecover_input(digest: B256, parts: &SignatureParts) -> Option<[u8; 128]> {
    let y_parity = parts.y_parity()?;
    let mut input = [0u8; 128];
    input[..32].copy_from_slice(digest.as_slice());
    input[63] = 27 + y_parity as u8;
    input[64..96].copy_from_slice(parts.r.as_slice());
    input[96..].copy_from_slice(parts.s.as_slice());
    Some(input)
}

/// Decode `ecrecover` output, which is left padded address or nothing on failure.
pub fn ecrecover_output(output: &[u8]) -> Option<Address> {
    if output.len() != 32 {
        return None;
    }
    let signer = Address::from_slice(&output[12..]);
    if signer.is_zero() {
        return None;
    }
    Some(signer)
}

/// Recovers identity of the signer from digest and signature components.
pub trait SignerRecovery {
    fn recover_signer(&self, digest: B256, parts: &SignatureParts) -> Option<Address>;
}

/// Secp256k1 recovery in pure Rust, for use outside of Nitro.
#[cfg(any(test, feature = "k256"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct EcdsaRecovery;

#[cfg(any(test, feature = "k256"))]
impl SignerRecovery for EcdsaRecovery {
    fn recover_signer(&self, digest: B256, parts: &SignatureParts) -> Option<Address> {
        use alloy_primitives::{PrimitiveSignature, U256};

        let y_parity = parts.y_parity()?;
        let signature = PrimitiveSignature::new(
            U256::from_be_bytes(parts.r.0),
            U256::from_be_bytes(parts.s.0),
            y_parity,
        );
        signature.recover_address_from_prehash(&digest).ok()
    }
}
