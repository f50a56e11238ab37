//! Wert smart-contract request signing.
//!
//! Wert authenticates partner requests with ed25519. The signed message is
//! every request field rendered as `key:value`, sorted by key and joined with
//! newlines; the signature covers the SHA-256 digest of that message and is
//! sent as lowercase hex without a `0x` prefix.

use std::collections::BTreeMap;

use alloy::primitives::Address;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::WertError;

/// Fields Wert requires for a smart-contract purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningRequest {
    /// Wallet that receives the purchased asset.
    pub address: Address,
    pub commodity: String,
    pub commodity_amount: u64,
    pub network: String,
    pub sc_address: Address,
    pub sc_input_data: String,
}

impl SigningRequest {
    /// Reject requests Wert would refuse before any key material is touched.
    pub fn validate(&self) -> Result<(), WertError> {
        if self.address == Address::ZERO {
            return Err(WertError::Signing("address must be non-zero".to_string()));
        }
        if self.sc_address == Address::ZERO {
            return Err(WertError::Signing("sc_address must be non-zero".to_string()));
        }
        if self.commodity.is_empty() {
            return Err(WertError::Signing("commodity is required".to_string()));
        }
        if self.network.is_empty() {
            return Err(WertError::Signing("network is required".to_string()));
        }
        if self.commodity_amount == 0 {
            return Err(WertError::Signing(
                "commodity_amount must be positive".to_string(),
            ));
        }
        let data = self
            .sc_input_data
            .strip_prefix("0x")
            .ok_or_else(|| WertError::Signing("sc_input_data must be 0x-prefixed".to_string()))?;
        if data.is_empty() || alloy::hex::decode(data).is_err() {
            return Err(WertError::Signing(
                "sc_input_data must be non-empty hex".to_string(),
            ));
        }
        Ok(())
    }

    /// The newline-joined, key-sorted message whose digest gets signed.
    pub fn canonical_message(&self) -> String {
        let fields: BTreeMap<&str, String> = BTreeMap::from([
            ("address", self.address.to_checksum(None)),
            ("commodity", self.commodity.clone()),
            ("commodity_amount", self.commodity_amount.to_string()),
            ("network", self.network.clone()),
            ("sc_address", self.sc_address.to_checksum(None)),
            ("sc_input_data", self.sc_input_data.clone()),
        ]);
        fields
            .iter()
            .map(|(key, value)| format!("{key}:{value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// SHA-256 of [`canonical_message`](Self::canonical_message).
    pub fn digest(&self) -> [u8; 32] {
        Sha256::digest(self.canonical_message().as_bytes()).into()
    }
}

/// Produces the partner signature for a [`SigningRequest`].
///
/// The key never leaves the implementation; callers only see the signature.
pub trait SessionSigner: Send + Sync {
    fn sign(&self, request: &SigningRequest) -> Result<String, WertError>;
}

/// ed25519 signer holding the Wert partner key in memory.
#[derive(Clone)]
pub struct Ed25519SessionSigner {
    key: SigningKey,
}

impl Ed25519SessionSigner {
    /// Load a 32-byte ed25519 seed from hex, with or without `0x`.
    pub fn from_hex(private_key: &str) -> Result<Self, WertError> {
        let trimmed = private_key.trim();
        let hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = alloy::hex::decode(hex)
            .map_err(|_| WertError::InvalidKey("private key is not valid hex".to_string()))?;
        let seed: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            WertError::InvalidKey(format!("private key must be 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self::from_seed(&seed))
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(seed),
        }
    }

    /// Public half of the partner key, as registered with Wert.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }
}

impl std::fmt::Debug for Ed25519SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519SessionSigner")
            .field("key", &"[REDACTED]")
            .field(
                "public_key",
                &alloy::hex::encode(self.verifying_key().as_bytes()),
            )
            .finish()
    }
}

impl SessionSigner for Ed25519SessionSigner {
    fn sign(&self, request: &SigningRequest) -> Result<String, WertError> {
        request.validate()?;
        let signature = self.key.sign(&request.digest());
        Ok(alloy::hex::encode(signature.to_bytes()))
    }
}
