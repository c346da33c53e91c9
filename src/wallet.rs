//! Signing identity derived from an Ed25519 private key
//!
//! Accepts the raw 32-byte seed as hex (with or without `0x`) or in the
//! AIP-80 form `ed25519-priv-0x...`. The account address is the single-key
//! authentication key: `sha3_256(public_key || 0x00)`.

use crate::error::{AirdropError, AirdropResult};
use crate::types::AccountAddress;

use ed25519_dalek::{Signer, SigningKey};
use sha3::{Digest, Sha3_256};
use std::fmt;
use zeroize::Zeroizing;

/// AIP-80 prefix for Ed25519 private keys
const AIP80_PREFIX: &str = "ed25519-priv-";

/// Authentication scheme byte for single Ed25519 keys
const ED25519_SCHEME: u8 = 0x00;

/// Key material plus the address it controls. Key bytes are zeroized on drop.
pub struct SigningIdentity {
    key: SigningKey,
    address: AccountAddress,
}

impl SigningIdentity {
    /// Derive an identity from a raw private key string
    pub fn from_secret(secret: &str) -> AirdropResult<Self> {
        let trimmed = secret.trim();
        let trimmed = trimmed.strip_prefix(AIP80_PREFIX).unwrap_or(trimmed);
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        if digits.len() != 64 {
            return Err(AirdropError::InvalidKey(format!(
                "expected 32 bytes of hex, got {} characters",
                digits.len()
            )));
        }

        let mut seed = Zeroizing::new([0u8; 32]);
        hex::decode_to_slice(digits, &mut seed[..])
            .map_err(|e| AirdropError::InvalidKey(e.to_string()))?;

        Ok(Self::from_signing_key(SigningKey::from_bytes(&seed)))
    }

    fn from_signing_key(key: SigningKey) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(key.verifying_key().as_bytes());
        hasher.update([ED25519_SCHEME]);
        let address = AccountAddress::new(hasher.finalize().into());
        Self { key, address }
    }

    /// On-chain account address controlled by this key
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Ed25519 public key bytes
    pub fn public_key(&self) -> [u8; 32] {
        self.key.verifying_key().to_bytes()
    }

    /// Sign a transaction signing message
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.key.sign(message).to_bytes()
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
