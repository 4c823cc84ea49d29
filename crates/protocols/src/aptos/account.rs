//! Local ed25519 signing account.

use super::RpcError;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use sha3::{Digest, Sha3_256};
use std::fmt;
use zeroize::Zeroizing;

/// Authentication scheme byte for single-key ed25519 accounts.
const ED25519_SCHEME: u8 = 0x00;

/// Prefix some wallets put in front of exported keys.
const PRIVATE_KEY_PREFIX: &str = "ed25519-priv-";

/// An account whose private key is held in process.
pub struct LocalAccount {
    signing_key: SigningKey,
    address: String,
}

impl LocalAccount {
    /// Loads an account from a hex-encoded 32-byte private key.
    ///
    /// The address is derived from the public key; use
    /// [`LocalAccount::with_address`] for accounts whose key was rotated.
    pub fn from_private_key_hex(private_key: &str) -> Result<Self, RpcError> {
        let trimmed = private_key.trim();
        let trimmed = trimmed.strip_prefix(PRIVATE_KEY_PREFIX).unwrap_or(trimmed);
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        let bytes = Zeroizing::new(
            hex::decode(trimmed).map_err(|e| RpcError::InvalidKey(e.to_string()))?,
        );
        let secret: &[u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| RpcError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len())))?;

        let signing_key = SigningKey::from_bytes(secret);
        let address = derive_address(&signing_key.verifying_key());
        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Overrides the derived address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Account address, `0x`-prefixed.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Public key, `0x`-prefixed hex.
    #[must_use]
    pub fn public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.signing_key.verifying_key().to_bytes()))
    }

    /// Signs a message, returning the `0x`-prefixed signature.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> String {
        format!("0x{}", hex::encode(self.signing_key.sign(message).to_bytes()))
    }
}

impl fmt::Debug for LocalAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalAccount")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Address of a fresh single-key account: `sha3_256(public_key || 0x00)`.
#[must_use]
pub fn derive_address(public_key: &VerifyingKey) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(public_key.as_bytes());
    hasher.update([ED25519_SCHEME]);
    format!("0x{}", hex::encode(hasher.finalize()))
}
