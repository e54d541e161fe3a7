//! Signature scheme table, serialized signatures and the intent digest.
//!
//! A serialized user signature is `flag ‖ signature[64] ‖ public key[32]`.
//! The message actually signed is `Blake2b256([0, 0, 0] ‖ tx_bytes)`, where
//! the three zero bytes are the transaction-data intent (scope, version, app).

use crate::encoding::base64_encode;
use crate::error::ParseError;
use fastcrypto::hash::{Blake2b256, HashFunction};
use move_core_types::account_address::AccountAddress;
use std::fmt;

pub const SIGNATURE_LENGTH: usize = 64;
pub const PUBLIC_KEY_LENGTH: usize = 32;
pub const SERIALIZED_SIGNATURE_LENGTH: usize = 1 + SIGNATURE_LENGTH + PUBLIC_KEY_LENGTH;

/// Intent for user transaction data: scope 0, version 0, app id 0.
pub const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    Ed25519,
    Secp256k1,
    Secp256r1,
}

impl SignatureScheme {
    pub fn flag(self) -> u8 {
        match self {
            SignatureScheme::Ed25519 => 0x00,
            SignatureScheme::Secp256k1 => 0x01,
            SignatureScheme::Secp256r1 => 0x02,
        }
    }

    pub fn from_flag(flag: u8) -> Result<Self, ParseError> {
        match flag {
            0x00 => Ok(SignatureScheme::Ed25519),
            0x01 => Ok(SignatureScheme::Secp256k1),
            0x02 => Ok(SignatureScheme::Secp256r1),
            other => Err(ParseError::UnknownSignatureFlag(other)),
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignatureScheme::Ed25519 => "ED25519",
            SignatureScheme::Secp256k1 => "Secp256k1",
            SignatureScheme::Secp256r1 => "Secp256r1",
        };
        f.write_str(name)
    }
}

/// A parsed `flag ‖ sig ‖ pubkey` user signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SerializedSignature {
    scheme: SignatureScheme,
    signature: [u8; SIGNATURE_LENGTH],
    public_key: [u8; PUBLIC_KEY_LENGTH],
}

impl SerializedSignature {
    pub fn new(
        scheme: SignatureScheme,
        signature: [u8; SIGNATURE_LENGTH],
        public_key: [u8; PUBLIC_KEY_LENGTH],
    ) -> Self {
        Self {
            scheme,
            signature,
            public_key,
        }
    }

    /// Length is checked before the flag.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        if bytes.len() != SERIALIZED_SIGNATURE_LENGTH {
            return Err(ParseError::InvalidSignatureLength {
                expected: SERIALIZED_SIGNATURE_LENGTH,
                actual: bytes.len(),
            });
        }
        let scheme = SignatureScheme::from_flag(bytes[0])?;
        let mut signature = [0u8; SIGNATURE_LENGTH];
        signature.copy_from_slice(&bytes[1..1 + SIGNATURE_LENGTH]);
        let mut public_key = [0u8; PUBLIC_KEY_LENGTH];
        public_key.copy_from_slice(&bytes[1 + SIGNATURE_LENGTH..]);
        Ok(Self::new(scheme, signature, public_key))
    }

    pub fn to_bytes(&self) -> [u8; SERIALIZED_SIGNATURE_LENGTH] {
        let mut out = [0u8; SERIALIZED_SIGNATURE_LENGTH];
        out[0] = self.scheme.flag();
        out[1..1 + SIGNATURE_LENGTH].copy_from_slice(&self.signature);
        out[1 + SIGNATURE_LENGTH..].copy_from_slice(&self.public_key);
        out
    }

    pub fn to_base64(&self) -> String {
        base64_encode(&self.to_bytes())
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    pub fn signature_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.signature
    }

    pub fn public_key_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.public_key
    }
}

impl fmt::Debug for SerializedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SerializedSignature({}, {}@{})",
            self.scheme,
            hex::encode(self.signature),
            hex::encode(self.public_key)
        )
    }
}

/// `TRANSACTION_INTENT ‖ tx_bytes`
pub fn intent_message(tx_bytes: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(TRANSACTION_INTENT.len() + tx_bytes.len());
    message.extend_from_slice(&TRANSACTION_INTENT);
    message.extend_from_slice(tx_bytes);
    message
}

/// The 32 bytes a key signs for these transaction bytes.
pub fn signing_digest(tx_bytes: &[u8]) -> [u8; 32] {
    Blake2b256::digest(intent_message(tx_bytes)).digest
}

/// Account address controlled by a public key: `Blake2b256(flag ‖ pubkey)`.
pub fn address_from_public_key(scheme: SignatureScheme, public_key: &[u8]) -> AccountAddress {
    let mut hasher = Blake2b256::default();
    hasher.update([scheme.flag()]);
    hasher.update(public_key);
    AccountAddress::new(hasher.finalize().digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(flag: u8) -> Vec<u8> {
        let mut bytes = vec![flag];
        bytes.extend_from_slice(&[0xaa; SIGNATURE_LENGTH]);
        bytes.extend_from_slice(&[0xbb; PUBLIC_KEY_LENGTH]);
        bytes
    }

    #[test]
    fn test_scheme_flags_roundtrip() {
        for scheme in [
            SignatureScheme::Ed25519,
            SignatureScheme::Secp256k1,
            SignatureScheme::Secp256r1,
        ] {
            assert_eq!(SignatureScheme::from_flag(scheme.flag()).unwrap(), scheme);
        }
        assert_eq!(
            SignatureScheme::from_flag(0x03),
            Err(ParseError::UnknownSignatureFlag(0x03))
        );
    }

    #[test]
    fn test_parse_splits_fields() {
        let sig = SerializedSignature::from_bytes(&sample(0x01)).unwrap();
        assert_eq!(sig.scheme(), SignatureScheme::Secp256k1);
        assert_eq!(sig.signature_bytes(), &[0xaa; SIGNATURE_LENGTH]);
        assert_eq!(sig.public_key_bytes(), &[0xbb; PUBLIC_KEY_LENGTH]);
        assert_eq!(sig.to_bytes().to_vec(), sample(0x01));
    }

    #[test]
    fn test_length_checked_before_flag() {
        let mut bytes = sample(0x7f);
        bytes.pop();
        assert_eq!(
            SerializedSignature::from_bytes(&bytes),
            Err(ParseError::InvalidSignatureLength {
                expected: 97,
                actual: 96
            })
        );
    }

    #[test]
    fn test_intent_message_prefix() {
        let msg = intent_message(&[5, 6]);
        assert_eq!(msg, vec![0, 0, 0, 5, 6]);
        assert_ne!(signing_digest(&[5, 6]), signing_digest(&[5, 7]));
    }
}
