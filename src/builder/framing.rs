//! Finalized transactions and the length-prefixed output frame.
//!
//! A frame is `[u32 little-endian payload length][payload]`.

use crate::error::{Error, Result};
use sui_ptb_types::encoding::base64_encode;
use sui_ptb_types::{TransactionData, TransactionDigest};

const LENGTH_PREFIX: usize = 4;

/// Prefix `payload` with its length.
pub fn frame(payload: &[u8]) -> Result<Vec<u8>> {
    let len = u32::try_from(payload.len())
        .map_err(|_| Error::encoding("frame", "payload longer than u32::MAX bytes"))?;
    let mut out = Vec::with_capacity(LENGTH_PREFIX + payload.len());
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

/// Payload of a frame. The buffer must hold exactly one frame.
pub fn unframe(buf: &[u8]) -> Result<&[u8]> {
    if buf.len() < LENGTH_PREFIX {
        return Err(Error::encoding(
            "unframe",
            "buffer shorter than the length prefix",
        ));
    }
    let (prefix, payload) = buf.split_at(LENGTH_PREFIX);
    let len = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
    if payload.len() != len {
        return Err(Error::encoding(
            "unframe",
            format!("frame declares {} bytes but carries {}", len, payload.len()),
        ));
    }
    Ok(payload)
}

/// Output of a successful build: the transaction and its exact BCS bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTransaction {
    data: TransactionData,
    bytes: Vec<u8>,
}

impl BuiltTransaction {
    pub(crate) fn new(data: TransactionData, bytes: Vec<u8>) -> Self {
        Self { data, bytes }
    }

    /// Decode a frame produced by [`BuiltTransaction::to_framed`].
    pub fn from_framed(buf: &[u8]) -> Result<Self> {
        let bytes = unframe(buf)?.to_vec();
        let data: TransactionData =
            bcs::from_bytes(&bytes).map_err(|e| Error::encoding("decode transaction", e))?;
        Ok(Self { data, bytes })
    }

    pub fn data(&self) -> &TransactionData {
        &self.data
    }

    /// Raw BCS transaction bytes; these are what gets signed.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn to_base64(&self) -> String {
        base64_encode(&self.bytes)
    }

    pub fn to_framed(&self) -> Result<Vec<u8>> {
        frame(&self.bytes)
    }

    pub fn digest(&self) -> TransactionDigest {
        TransactionDigest::from_transaction_bytes(&self.bytes)
    }

    pub fn gas_budget(&self) -> u64 {
        self.data.gas_data().budget
    }
}
