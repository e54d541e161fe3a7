//! The two remote collaborators of the transaction builder.
//!
//! Both are plain request/response seams: implementations must not retry,
//! and every failure surfaces as an `anyhow::Error` for the caller to judge.

use crate::model::{
    Balance, EpochInfo, ExecutionResponse, ObjectInfo, ObjectRequest, Page, PageRequest,
    ServiceInfo, SimulationOutcome,
};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use sui_ptb_types::SerializedSignature;
use tokio::time::Instant;

/// Read-only ledger queries.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    async fn get_epoch(&self) -> Result<EpochInfo>;

    async fn get_service_info(&self) -> Result<ServiceInfo>;

    /// `Ok(None)` when the object (or that version of it) does not exist.
    async fn get_object(
        &self,
        object_id: &str,
        version: Option<u64>,
    ) -> Result<Option<ObjectInfo>>;

    async fn get_transaction(&self, digest: &str) -> Result<Value>;

    /// Results are in request order. An empty request list is an error.
    async fn batch_get_objects(
        &self,
        requests: &[ObjectRequest],
    ) -> Result<Vec<Option<ObjectInfo>>>;

    /// Results are in request order. An empty request list is an error.
    async fn batch_get_transactions(&self, digests: &[String]) -> Result<Vec<Value>>;

    async fn get_package(&self, package_id: &str) -> Result<Value>;

    async fn get_function(&self, package_id: &str, module: &str, function: &str) -> Result<Value>;

    async fn get_datatype(&self, package_id: &str, module: &str, name: &str) -> Result<Value>;

    async fn get_balance(&self, owner: &str, coin_type: &str) -> Result<Balance>;

    async fn get_coin_info(&self, coin_type: &str) -> Result<Value>;

    async fn list_balances(&self, owner: &str) -> Result<Vec<Balance>>;

    async fn list_owned_objects(
        &self,
        owner: &str,
        page: &PageRequest,
    ) -> Result<Page<ObjectInfo>>;

    async fn list_dynamic_fields(&self, parent: &str, page: &PageRequest) -> Result<Page<Value>>;
}

/// Dry-run and submission of BCS transaction bytes.
///
/// `deadline` bounds the remote call itself: once it has passed, an
/// implementation must neither send the request nor keep waiting on one that
/// is in flight.
#[async_trait]
pub trait TransactionExecutor: Send + Sync {
    /// Read-only: no state changes on chain.
    async fn simulate_transaction(
        &self,
        tx_bytes: &[u8],
        deadline: Option<Instant>,
    ) -> Result<SimulationOutcome>;

    async fn execute_transaction(
        &self,
        tx_bytes: &[u8],
        signature: &SerializedSignature,
        deadline: Option<Instant>,
    ) -> Result<ExecutionResponse>;
}
