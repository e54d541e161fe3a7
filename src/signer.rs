//! Transaction signing.
//!
//! Signing is fixed by what validators verify:
//!
//! 1. `intent = [0, 0, 0] ‖ tx_bytes`
//! 2. `digest = Blake2b256(intent)`
//! 3. `sig = sign(digest)`
//! 4. `serialized = flag ‖ sig ‖ pubkey` (97 bytes), base64
//!
//! The transaction bytes travel next to it as plain base64.

use crate::error::{Error, Result, SignatureError};
use crate::keys::TransactionSigner;
use fastcrypto::ed25519::{Ed25519PublicKey, Ed25519Signature};
use fastcrypto::traits::{ToFromBytes, VerifyingKey};
use serde::{Deserialize, Serialize};
use sui_ptb_types::crypto::signing_digest;
use sui_ptb_types::encoding::{base64_decode, base64_encode};
use sui_ptb_types::{SerializedSignature, SignatureScheme};
use tracing::debug;

/// The submission envelope: `{TxBytes, Signature}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignedTransaction {
    pub tx_bytes: String,
    pub signature: String,
}

impl SignedTransaction {
    pub fn decode_tx_bytes(&self) -> Result<Vec<u8>> {
        base64_decode(&self.tx_bytes).map_err(|e| Error::encoding("decode transaction bytes", e))
    }

    pub fn decode_signature(&self) -> Result<SerializedSignature> {
        parse_serialized_signature(&self.signature)
    }
}

/// Sign `tx_bytes` and package them for submission.
pub fn sign_transaction(
    tx_bytes: &[u8],
    signer: &dyn TransactionSigner,
) -> Result<SignedTransaction> {
    let digest = signing_digest(tx_bytes);
    let signature = signer.sign_digest(&digest)?;
    let serialized = SerializedSignature::new(signer.scheme(), signature, signer.public_key());
    debug!(
        scheme = %signer.scheme(),
        signer = %signer.address().to_hex_literal(),
        tx_len = tx_bytes.len(),
        "signed transaction"
    );
    Ok(SignedTransaction {
        tx_bytes: base64_encode(tx_bytes),
        signature: serialized.to_base64(),
    })
}

/// Parse a base64 serialized signature; length first, then flag.
pub fn parse_serialized_signature(encoded: &str) -> Result<SerializedSignature> {
    let bytes = base64_decode(encoded)
        .map_err(|e| SignatureError::InvalidEncoding(format!("base64: {}", e)))?;
    Ok(SerializedSignature::from_bytes(&bytes)?)
}

/// Check `signature` against `tx_bytes` locally.
pub fn verify_signature(tx_bytes: &[u8], signature: &SerializedSignature) -> Result<()> {
    match signature.scheme() {
        SignatureScheme::Ed25519 => {
            let public_key = Ed25519PublicKey::from_bytes(signature.public_key_bytes())
                .map_err(|e| SignatureError::VerificationFailed(format!("public key: {}", e)))?;
            let sig = Ed25519Signature::from_bytes(signature.signature_bytes())
                .map_err(|e| SignatureError::VerificationFailed(format!("signature: {}", e)))?;
            public_key
                .verify(&signing_digest(tx_bytes), &sig)
                .map_err(|e| SignatureError::VerificationFailed(e.to_string()).into())
        }
        scheme @ (SignatureScheme::Secp256k1 | SignatureScheme::Secp256r1) => {
            Err(SignatureError::VerificationUnsupported(scheme).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Ed25519Keypair;
    use sui_ptb_types::crypto::SERIALIZED_SIGNATURE_LENGTH;

    fn key() -> Ed25519Keypair {
        Ed25519Keypair::from_secret_bytes(&[42u8; 32]).unwrap()
    }

    #[test]
    fn test_envelope_layout() {
        let key = key();
        let signed = sign_transaction(b"transaction", &key).unwrap();
        assert_eq!(signed.decode_tx_bytes().unwrap(), b"transaction");

        let raw = base64_decode(&signed.signature).unwrap();
        assert_eq!(raw.len(), SERIALIZED_SIGNATURE_LENGTH);
        assert_eq!(raw[0], 0x00);
        assert_eq!(&raw[65..], &key.public_key());
    }

    #[test]
    fn test_envelope_json_field_names() {
        let signed = SignedTransaction {
            tx_bytes: "AA==".to_string(),
            signature: "AQ==".to_string(),
        };
        let json = serde_json::to_value(&signed).unwrap();
        assert_eq!(json["TxBytes"], "AA==");
        assert_eq!(json["Signature"], "AQ==");
    }

    #[test]
    fn test_verify_accepts_own_signature() {
        let signed = sign_transaction(b"abc", &key()).unwrap();
        let sig = signed.decode_signature().unwrap();
        verify_signature(b"abc", &sig).unwrap();
    }

    #[test]
    fn test_verify_rejects_other_bytes() {
        let signed = sign_transaction(b"abc", &key()).unwrap();
        let sig = signed.decode_signature().unwrap();
        let err = verify_signature(b"abd", &sig).unwrap_err();
        assert!(matches!(err, Error::Signature(SignatureError::VerificationFailed(_))));
    }

    #[test]
    fn test_verify_other_schemes_unsupported() {
        let sig = SerializedSignature::new(SignatureScheme::Secp256r1, [1u8; 64], [2u8; 32]);
        assert_eq!(
            verify_signature(b"abc", &sig).unwrap_err(),
            Error::Signature(SignatureError::VerificationUnsupported(SignatureScheme::Secp256r1))
        );
    }

    #[test]
    fn test_parse_rejects_bad_base64() {
        let err = parse_serialized_signature("not base64!").unwrap_err();
        assert!(matches!(err, Error::Signature(SignatureError::InvalidEncoding(_))));
    }
}
