//! Response models for ledger queries and transaction execution.
//!
//! Only the fields the builder consumes are typed; everything else a ledger
//! returns is passed through as [`serde_json::Value`].

use serde::{Deserialize, Serialize};
use sui_ptb_types::{GasSummary, ObjectRef, ParseError, TransactionStatus};

/// Who owns an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectOwner {
    Address(String),
    Shared { initial_version: u64 },
    Immutable,
    /// Owned by another object (dynamic fields).
    Parent(String),
    Unknown,
}

/// Latest (or requested) version of an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub object_id: String,
    pub version: u64,
    pub digest: String,
    pub object_type: Option<String>,
    pub owner: ObjectOwner,
}

impl ObjectInfo {
    pub fn object_ref(&self) -> Result<ObjectRef, ParseError> {
        ObjectRef::parse(&self.object_id, self.version, &self.digest)
    }
}

/// One entry of a batch object lookup; `version: None` means latest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRequest {
    pub object_id: String,
    pub version: Option<u64>,
}

impl ObjectRequest {
    pub fn latest(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            version: None,
        }
    }

    pub fn at_version(object_id: impl Into<String>, version: u64) -> Self {
        Self {
            object_id: object_id.into(),
            version: Some(version),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochInfo {
    pub epoch: u64,
    pub reference_gas_price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub chain_id: String,
    pub epoch: u64,
    pub checkpoint_height: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub coin_type: String,
    pub coin_object_count: u64,
    pub total_balance: u128,
}

/// Opaque-token pagination request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page_size: Option<u32>,
    pub page_token: Option<String>,
}

impl PageRequest {
    pub fn first(page_size: u32) -> Self {
        Self {
            page_size: Some(page_size),
            page_token: None,
        }
    }

    pub fn after(page_size: u32, token: impl Into<String>) -> Self {
        Self {
            page_size: Some(page_size),
            page_token: Some(token.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// `None` on the last page.
    pub next_page_token: Option<String>,
}

/// Effects of a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub status: TransactionStatus,
    pub gas_used: GasSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub digest: String,
    pub status: Option<TransactionStatus>,
    pub gas_used: Option<GasSummary>,
}
