//! 32-byte digests shown as base58 and BCS-encoded with a length prefix.

use crate::encoding::{base58_decode_32, base58_encode};
use crate::error::ParseError;
use fastcrypto::hash::{Blake2b256, HashFunction};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Domain prefix hashed in front of BCS transaction data to form its digest.
const TRANSACTION_DATA_DOMAIN: &[u8] = b"TransactionData::";

macro_rules! digest_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; 32]);

        impl $name {
            pub const fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn inner(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                base58_decode_32(s.trim()).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&base58_encode(&self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&self.to_string())
                } else {
                    serializer.serialize_bytes(&self.0)
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(serde::de::Error::custom)
                } else {
                    let bytes = Vec::<u8>::deserialize(deserializer)?;
                    <[u8; 32]>::try_from(bytes.as_slice())
                        .map(Self)
                        .map_err(|_| {
                            serde::de::Error::invalid_length(bytes.len(), &"32 bytes")
                        })
                }
            }
        }
    };
}

digest_type!(
    /// Content digest of an object at a given version.
    ObjectDigest
);

digest_type!(
    /// Digest identifying a transaction on chain.
    TransactionDigest
);

impl TransactionDigest {
    /// Digest of BCS-encoded `TransactionData`, as the ledger computes it.
    pub fn from_transaction_bytes(tx_bytes: &[u8]) -> Self {
        let mut hasher = Blake2b256::default();
        hasher.update(TRANSACTION_DATA_DOMAIN);
        hasher.update(tx_bytes);
        Self(hasher.finalize().digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_digest_bcs_is_length_prefixed() {
        let digest = ObjectDigest::new([9u8; 32]);
        let bytes = bcs::to_bytes(&digest).unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 32);
        assert_eq!(&bytes[1..], &[9u8; 32]);

        let decoded: ObjectDigest = bcs::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, digest);
    }

    #[test]
    fn test_digest_text_form() {
        let digest = ObjectDigest::new([1u8; 32]);
        let parsed: ObjectDigest = digest.to_string().parse().unwrap();
        assert_eq!(parsed, digest);

        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", digest));
    }

    #[test]
    fn test_transaction_digest_depends_on_bytes() {
        let a = TransactionDigest::from_transaction_bytes(&[1, 2, 3]);
        let b = TransactionDigest::from_transaction_bytes(&[1, 2, 4]);
        assert_ne!(a, b);
        assert_eq!(a, TransactionDigest::from_transaction_bytes(&[1, 2, 3]));
    }
}
