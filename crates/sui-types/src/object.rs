//! Object identities and versioned references.

use crate::digest::ObjectDigest;
use crate::encoding::{format_address, parse_address};
use crate::error::ParseError;
use move_core_types::account_address::AccountAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type ObjectID = AccountAddress;
pub type SequenceNumber = u64;

/// `(id, version, digest)`; BCS-encoded as that tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub object_id: ObjectID,
    pub version: SequenceNumber,
    pub digest: ObjectDigest,
}

impl ObjectRef {
    pub fn new(object_id: ObjectID, version: SequenceNumber, digest: ObjectDigest) -> Self {
        Self {
            object_id,
            version,
            digest,
        }
    }

    /// Parse the textual triple returned by ledger queries.
    pub fn parse(
        object_id: &str,
        version: SequenceNumber,
        digest: &str,
    ) -> Result<Self, ParseError> {
        Ok(Self {
            object_id: parse_address(object_id, "object ID")?,
            version,
            digest: digest.parse()?,
        })
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}#{}",
            format_address(&self.object_id),
            self.version,
            self.digest
        )
    }
}
