//! Posting-key handling.
//!
//! Keys arrive in wallet import format (base58check, version byte `0x80`,
//! double-sha256 checksum) and are held behind [`PrivateKey`], which has no
//! serde path and a redacted `Debug` impl so the secret cannot leak through
//! logs or error output.

use core::fmt;

use secp256k1::{Message, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use thiserror::Error;

const WIF_VERSION: u8 = 0x80;
const WIF_RAW_LEN: usize = 37;
const MAX_SIGNING_ATTEMPTS: u32 = 128;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KeyError {
    #[error("invalid base58: {0}")]
    Base58(#[from] bs58::decode::Error),
    #[error("decoded key is {0} bytes, expected 37")]
    Length(usize),
    #[error("checksum mismatch")]
    Checksum,
    #[error("unexpected version byte {0:#04x}")]
    Version(u8),
    #[error("not a valid secp256k1 secret")]
    Scalar(#[source] secp256k1::Error),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignError {
    #[error("could not produce a canonical signature")]
    NonCanonical,
    #[error("no signer appended to the transaction")]
    NoSigners,
    #[error("no signing key supplied")]
    NoKeys,
}

/// A secp256k1 posting key. Never serialized, never printed.
#[derive(Clone)]
pub struct PrivateKey {
    key: SecretKey,
}

impl PrivateKey {
    /// Parses a wallet-import-format secret.
    pub fn from_wif(wif: &str) -> Result<Self, KeyError> {
        let raw = bs58::decode(wif).into_vec()?;
        if raw.len() != WIF_RAW_LEN {
            return Err(KeyError::Length(raw.len()));
        }

        let (payload, checksum) = raw.split_at(WIF_RAW_LEN - 4);
        let digest = Sha256::digest(Sha256::digest(payload));
        if digest[..4] != *checksum {
            return Err(KeyError::Checksum);
        }

        if payload[0] != WIF_VERSION {
            return Err(KeyError::Version(payload[0]));
        }

        let key = SecretKey::from_slice(&payload[1..]).map_err(KeyError::Scalar)?;

        Ok(Self { key })
    }

    /// Signs a 32-byte digest, producing the chain's 65-byte compact
    /// recoverable signature (`recovery_id + 31`, then `r`, then `s`).
    ///
    /// Nodes reject non-canonical signatures outright, so the signing
    /// nonce is re-derived with incrementing extra data until the
    /// canonicality rule on the `(r, s)` bytes holds.
    pub fn sign_canonical(&self, digest: &[u8; 32]) -> Result<[u8; 65], SignError> {
        let secp = Secp256k1::signing_only();
        let message = Message::from_digest(*digest);

        for attempt in 0..MAX_SIGNING_ATTEMPTS {
            let signature = if attempt == 0 {
                secp.sign_ecdsa_recoverable(&message, &self.key)
            } else {
                let mut noncedata = [0_u8; 32];
                noncedata[..4].copy_from_slice(&attempt.to_le_bytes());
                secp.sign_ecdsa_recoverable_with_noncedata(&message, &self.key, &noncedata)
            };

            let (recovery, rs) = signature.serialize_compact();
            if is_canonical(&rs) {
                let mut wire = [0_u8; 65];
                wire[0] = 31 + recovery.to_i32() as u8;
                wire[1..].copy_from_slice(&rs);
                return Ok(wire);
            }
        }

        Err(SignError::NonCanonical)
    }

    #[cfg(test)]
    pub(crate) fn secret_bytes(&self) -> [u8; 32] {
        self.key.secret_bytes()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

// The graphene canonicality rule: neither r nor s may have the high bit
// set, and neither may carry a redundant leading zero byte.
fn is_canonical(sig: &[u8]) -> bool {
    sig.len() == 64
        && sig[0] & 0x80 == 0
        && !(sig[0] == 0 && sig[1] & 0x80 == 0)
        && sig[32] & 0x80 == 0
        && !(sig[32] == 0 && sig[33] & 0x80 == 0)
}
