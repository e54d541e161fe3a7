//! Signing keys.
//!
//! [`TransactionSigner`] is the seam the pipeline signs through. The crate
//! ships one implementation, [`Ed25519Keypair`], which understands the two
//! private key formats the Sui CLI produces: bech32 `suiprivkey1…` strings
//! and base64 keystore entries (a JSON array of `flag ‖ secret` strings).

use crate::error::{Result, SignatureError};
use bech32::{FromBase32, ToBase32, Variant};
use fastcrypto::ed25519::{Ed25519KeyPair, Ed25519PrivateKey};
use fastcrypto::traits::{KeyPair, Signer, ToFromBytes};
use std::fmt;
use std::path::Path;
use sui_ptb_types::crypto::{address_from_public_key, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use sui_ptb_types::encoding::{base64_decode, base64_encode};
use sui_ptb_types::{AccountAddress, SignatureScheme};
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Human-readable part of a bech32 Sui private key.
pub const SUI_PRIVATE_KEY_PREFIX: &str = "suiprivkey";

/// Length of an Ed25519 secret key.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Something that can sign a transaction's signing digest.
pub trait TransactionSigner: Send + Sync {
    fn scheme(&self) -> SignatureScheme;

    fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH];

    /// Sign the 32-byte Blake2b digest of the intent message.
    fn sign_digest(&self, digest: &[u8; 32]) -> Result<[u8; SIGNATURE_LENGTH]>;

    fn address(&self) -> AccountAddress {
        address_from_public_key(self.scheme(), &self.public_key())
    }
}

/// The secret lives only inside the fastcrypto key, which zeroizes on drop.
pub struct Ed25519Keypair {
    keypair: Ed25519KeyPair,
}

impl Ed25519Keypair {
    pub fn from_secret_bytes(secret: &[u8]) -> Result<Self> {
        if secret.len() != SECRET_KEY_LENGTH {
            return Err(SignatureError::InvalidKey(format!(
                "expected {} secret key bytes, got {}",
                SECRET_KEY_LENGTH,
                secret.len()
            ))
            .into());
        }
        let private = Ed25519PrivateKey::from_bytes(secret)
            .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
        Ok(Self {
            keypair: Ed25519KeyPair::from(private),
        })
    }

    /// `flag ‖ secret`, wiped when the returned buffer is dropped.
    fn flagged_secret(&self) -> Zeroizing<Vec<u8>> {
        let private = self.keypair.copy().private();
        let mut payload = Zeroizing::new(Vec::with_capacity(1 + SECRET_KEY_LENGTH));
        payload.push(SignatureScheme::Ed25519.flag());
        payload.extend_from_slice(private.as_ref());
        payload
    }

    /// Parse `flag ‖ secret`, as found in both bech32 keys and keystore entries.
    fn from_flagged(bytes: &[u8]) -> Result<Self> {
        let (&flag, secret) = bytes
            .split_first()
            .ok_or_else(|| SignatureError::InvalidKey("empty key payload".to_string()))?;
        match SignatureScheme::from_flag(flag) {
            Ok(SignatureScheme::Ed25519) => Self::from_secret_bytes(secret),
            Ok(_) | Err(_) => Err(SignatureError::UnsupportedScheme(flag).into()),
        }
    }

    /// Parse a `suiprivkey1…` string.
    pub fn from_bech32(encoded: &str) -> Result<Self> {
        let (hrp, data, variant) = bech32::decode(encoded.trim())
            .map_err(|e| SignatureError::InvalidKey(format!("bech32: {}", e)))?;
        if hrp != SUI_PRIVATE_KEY_PREFIX {
            return Err(SignatureError::InvalidKey(format!(
                "expected '{}' prefix, got '{}'",
                SUI_PRIVATE_KEY_PREFIX, hrp
            ))
            .into());
        }
        if variant != Variant::Bech32 {
            let reason = "expected bech32, not bech32m".to_string();
            return Err(SignatureError::InvalidKey(reason).into());
        }
        let bytes = Vec::<u8>::from_base32(&data)
            .map(Zeroizing::new)
            .map_err(|e| SignatureError::InvalidKey(format!("bech32: {}", e)))?;
        Self::from_flagged(&bytes)
    }

    pub fn to_bech32(&self) -> Result<String> {
        let payload = self.flagged_secret();
        bech32::encode(SUI_PRIVATE_KEY_PREFIX, payload.as_slice().to_base32(), Variant::Bech32)
            .map_err(|e| SignatureError::InvalidKey(format!("bech32: {}", e)).into())
    }

    /// Parse one base64 keystore entry.
    pub fn from_base64_keystore(entry: &str) -> Result<Self> {
        let bytes = base64_decode(entry.trim())
            .map(Zeroizing::new)
            .map_err(|e| SignatureError::InvalidKey(format!("base64: {}", e)))?;
        Self::from_flagged(&bytes)
    }

    pub fn to_base64_keystore(&self) -> String {
        base64_encode(&self.flagged_secret())
    }

    /// Load every Ed25519 key of a `sui.keystore` file.
    ///
    /// Entries of other schemes are skipped.
    pub fn load_keystore(path: &Path) -> Result<Vec<Self>> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SignatureError::InvalidKey(format!("failed to read {}: {}", path.display(), e))
        })?;
        let entries: Vec<String> = serde_json::from_str(&raw).map_err(|e| {
            SignatureError::InvalidKey(format!("failed to parse {}: {}", path.display(), e))
        })?;

        let mut keys = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            match Self::from_base64_keystore(entry) {
                Ok(key) => keys.push(key),
                Err(crate::Error::Signature(SignatureError::UnsupportedScheme(flag))) => {
                    warn!(entry = i, flag, "skipping keystore entry of unsupported scheme");
                }
                Err(e) => return Err(e),
            }
        }
        debug!(path = %path.display(), keys = keys.len(), "loaded keystore");
        Ok(keys)
    }

    /// Find the key controlling `address` in a keystore file.
    pub fn from_keystore_file(path: &Path, address: &AccountAddress) -> Result<Self> {
        Self::load_keystore(path)?
            .into_iter()
            .find(|key| key.address() == *address)
            .ok_or_else(|| {
                SignatureError::InvalidKey(format!(
                    "no key for {} in {}",
                    address.to_hex_literal(),
                    path.display()
                ))
                .into()
            })
    }
}

impl TransactionSigner for Ed25519Keypair {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Ed25519
    }

    fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        let mut out = [0u8; PUBLIC_KEY_LENGTH];
        out.copy_from_slice(self.keypair.public().as_ref());
        out
    }

    fn sign_digest(&self, digest: &[u8; 32]) -> Result<[u8; SIGNATURE_LENGTH]> {
        let signature = self.keypair.sign(digest);
        signature.as_ref().try_into().map_err(|_| {
            SignatureError::InvalidLength {
                expected: SIGNATURE_LENGTH,
                actual: signature.as_ref().len(),
            }
            .into()
        })
    }
}

impl fmt::Debug for Ed25519Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Keypair({})", self.address().to_hex_literal())
    }
}
