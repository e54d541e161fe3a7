//! Fullnode JSON-RPC client.
//!
//! Calls are blocking `ureq` requests moved onto the tokio blocking pool so
//! the async traits stay non-blocking for callers. No retries are attempted.
//!
//! A caller deadline becomes the per-request `ureq` timeout, so a request
//! never outlives it on the blocking pool, and an expired deadline is
//! rejected before anything is sent.

use crate::api::{LedgerQuery, TransactionExecutor};
use crate::config::RpcConfig;
use crate::model::{
    Balance, EpochInfo, ExecutionResponse, ObjectInfo, ObjectOwner, ObjectRequest, Page,
    PageRequest, ServiceInfo, SimulationOutcome,
};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use sui_ptb_types::encoding::base64_encode;
use sui_ptb_types::{GasSummary, SerializedSignature, TransactionStatus};
use tokio::time::Instant;
use tracing::debug;

/// Request type for `sui_executeTransactionBlock`.
const EXECUTE_REQUEST_TYPE: &str = "WaitForLocalExecution";

#[derive(Clone)]
pub struct JsonRpcClient {
    inner: Arc<Inner>,
}

struct Inner {
    endpoint: String,
    api_key: Option<String>,
    agent: ureq::Agent,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(config: &RpcConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .timeout_connect(config.connect_timeout)
            .build();
        Self {
            inner: Arc::new(Inner {
                endpoint: config.endpoint.clone(),
                api_key: config.api_key.clone(),
                agent,
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Client configured from `SUI_RPC_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(&RpcConfig::from_env())
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    fn call_blocking(
        &self,
        method: &str,
        params: Value,
        deadline: Option<std::time::Instant>,
    ) -> Result<Value> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let mut request = self
            .inner
            .agent
            .post(&self.inner.endpoint)
            .set("Content-Type", "application/json");
        if let Some(key) = &self.inner.api_key {
            request = request.set("x-api-key", key);
        }
        // The blocking pool may start this late; check again right before sending.
        if let Some(left) = time_left(method, deadline)? {
            request = request.timeout(left);
        }

        let response: Value = request
            .send_json(&body)
            .map_err(|e| match deadline {
                Some(deadline) if std::time::Instant::now() >= deadline => {
                    anyhow!("{} exceeded its deadline: {}", method, e)
                }
                _ => anyhow!("{} request failed: {}", method, e),
            })?
            .into_json()
            .map_err(|e| anyhow!("Failed to parse {} response: {}", method, e))?;

        if let Some(error) = response.get("error") {
            let msg = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            bail!("{} failed: {}", method, msg);
        }

        response
            .get("result")
            .cloned()
            .ok_or_else(|| anyhow!("No result in {} response", method))
    }

    async fn call(&self, method: &'static str, params: Value) -> Result<Value> {
        self.call_until(method, params, None).await
    }

    async fn call_until(
        &self,
        method: &'static str,
        params: Value,
        deadline: Option<Instant>,
    ) -> Result<Value> {
        let deadline = deadline.map(Instant::into_std);
        time_left(method, deadline)?;
        debug!(method, endpoint = %self.inner.endpoint, "json-rpc call");
        let client = self.clone();
        tokio::task::spawn_blocking(move || client.call_blocking(method, params, deadline))
            .await
            .map_err(|e| anyhow!("{} task failed: {}", method, e))?
    }
}

/// Time remaining before `deadline`; an error once it has passed.
fn time_left(method: &str, deadline: Option<std::time::Instant>) -> Result<Option<Duration>> {
    let Some(deadline) = deadline else {
        return Ok(None);
    };
    let left = deadline.saturating_duration_since(std::time::Instant::now());
    if left.is_zero() {
        bail!("{} exceeded its deadline before it was sent", method);
    }
    Ok(Some(left))
}

// =============================================================================
// Response field extraction
// =============================================================================

/// Sui encodes 64-bit integers as decimal strings; accept plain numbers too.
fn value_as_u64(value: &Value, what: &str) -> Result<u64> {
    match value {
        Value::String(s) => s
            .parse()
            .map_err(|e| anyhow!("'{}' is not a u64 ('{}'): {}", what, s, e)),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| anyhow!("'{}' is not a u64 ({})", what, n)),
        other => Err(anyhow!("'{}' is not a u64 ({})", what, other)),
    }
}

fn u64_field(value: &Value, key: &str) -> Result<u64> {
    let field = value
        .get(key)
        .ok_or_else(|| anyhow!("missing field '{}'", key))?;
    value_as_u64(field, key)
}

fn u128_field(value: &Value, key: &str) -> Result<u128> {
    match value.get(key) {
        Some(Value::String(s)) => s
            .parse()
            .map_err(|e| anyhow!("field '{}' is not a u128 ('{}'): {}", key, s, e)),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| anyhow!("field '{}' is not a u128 ({})", key, n)),
        _ => Err(anyhow!("missing field '{}'", key)),
    }
}

fn str_field(value: &Value, key: &str) -> Result<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("missing field '{}'", key))
}

fn parse_owner(owner: Option<&Value>) -> ObjectOwner {
    let Some(owner) = owner else {
        return ObjectOwner::Unknown;
    };
    if owner.as_str() == Some("Immutable") {
        return ObjectOwner::Immutable;
    }
    if let Some(addr) = owner.get("AddressOwner").and_then(Value::as_str) {
        return ObjectOwner::Address(addr.to_string());
    }
    if let Some(parent) = owner.get("ObjectOwner").and_then(Value::as_str) {
        return ObjectOwner::Parent(parent.to_string());
    }
    if let Some(shared) = owner.get("Shared") {
        return match u64_field(shared, "initial_shared_version") {
            Ok(initial_version) => ObjectOwner::Shared { initial_version },
            Err(_) => ObjectOwner::Unknown,
        };
    }
    ObjectOwner::Unknown
}

fn parse_object_data(data: &Value) -> Result<ObjectInfo> {
    Ok(ObjectInfo {
        object_id: str_field(data, "objectId")?,
        version: u64_field(data, "version")?,
        digest: str_field(data, "digest")?,
        object_type: data.get("type").and_then(Value::as_str).map(str::to_string),
        owner: parse_owner(data.get("owner")),
    })
}

/// `sui_getObject` result: `{data}` or `{error}`.
fn parse_object_response(result: &Value) -> Result<Option<ObjectInfo>> {
    match result.get("data") {
        Some(data) if !data.is_null() => parse_object_data(data).map(Some),
        _ => Ok(None),
    }
}

/// `sui_tryGetPastObject` result: `{status, details}`.
fn parse_past_object_response(result: &Value) -> Result<Option<ObjectInfo>> {
    match result.get("status").and_then(Value::as_str) {
        Some("VersionFound") => {
            let details = result
                .get("details")
                .ok_or_else(|| anyhow!("missing field 'details'"))?;
            parse_object_data(details).map(Some)
        }
        _ => Ok(None),
    }
}

fn parse_balance(value: &Value) -> Result<Balance> {
    Ok(Balance {
        coin_type: str_field(value, "coinType")?,
        coin_object_count: u64_field(value, "coinObjectCount")?,
        total_balance: u128_field(value, "totalBalance")?,
    })
}

fn parse_next_token(result: &Value) -> Option<String> {
    let has_next = result
        .get("hasNextPage")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !has_next {
        return None;
    }
    match result.get("nextCursor") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }
}

fn parse_status(effects: &Value) -> Result<TransactionStatus> {
    let status = effects
        .get("status")
        .ok_or_else(|| anyhow!("missing field 'status'"))?;
    match status.get("status").and_then(Value::as_str) {
        Some("success") => Ok(TransactionStatus::Success),
        Some(_) => Ok(TransactionStatus::Failure {
            error: status
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        }),
        None => Err(anyhow!("missing field 'status.status'")),
    }
}

fn parse_gas_used(effects: &Value) -> Result<GasSummary> {
    let gas = effects
        .get("gasUsed")
        .ok_or_else(|| anyhow!("missing field 'gasUsed'"))?;
    Ok(GasSummary {
        computation_cost: u64_field(gas, "computationCost")?,
        storage_cost: u64_field(gas, "storageCost")?,
        storage_rebate: u64_field(gas, "storageRebate")?,
        non_refundable_storage_fee: u64_field(gas, "nonRefundableStorageFee").unwrap_or(0),
    })
}

fn page_params(page: &PageRequest) -> (Value, Value) {
    (
        page.page_token
            .as_ref()
            .map(|t| Value::String(t.clone()))
            .unwrap_or(Value::Null),
        page.page_size.map(|s| json!(s)).unwrap_or(Value::Null),
    )
}

fn object_options() -> Value {
    json!({ "showType": true, "showOwner": true })
}

fn transaction_options() -> Value {
    json!({ "showInput": true, "showEffects": true, "showEvents": true })
}

// =============================================================================
// Trait implementations
// =============================================================================

#[async_trait]
impl LedgerQuery for JsonRpcClient {
    async fn get_epoch(&self) -> Result<EpochInfo> {
        let state = self.call("suix_getLatestSuiSystemState", json!([])).await?;
        Ok(EpochInfo {
            epoch: u64_field(&state, "epoch")?,
            reference_gas_price: u64_field(&state, "referenceGasPrice")?,
        })
    }

    async fn get_service_info(&self) -> Result<ServiceInfo> {
        let chain_id = self.call("sui_getChainIdentifier", json!([])).await?;
        let checkpoint = self
            .call("sui_getLatestCheckpointSequenceNumber", json!([]))
            .await?;
        let epoch = self.get_epoch().await?;
        Ok(ServiceInfo {
            chain_id: chain_id
                .as_str()
                .ok_or_else(|| anyhow!("chain identifier is not a string"))?
                .to_string(),
            epoch: epoch.epoch,
            checkpoint_height: value_as_u64(&checkpoint, "checkpoint sequence number")?,
        })
    }

    async fn get_object(
        &self,
        object_id: &str,
        version: Option<u64>,
    ) -> Result<Option<ObjectInfo>> {
        match version {
            None => {
                let result = self
                    .call("sui_getObject", json!([object_id, object_options()]))
                    .await?;
                parse_object_response(&result)
            }
            Some(version) => {
                let result = self
                    .call(
                        "sui_tryGetPastObject",
                        json!([object_id, version, object_options()]),
                    )
                    .await?;
                parse_past_object_response(&result)
            }
        }
    }

    async fn get_transaction(&self, digest: &str) -> Result<Value> {
        self.call("sui_getTransactionBlock", json!([digest, transaction_options()]))
            .await
    }

    async fn batch_get_objects(
        &self,
        requests: &[ObjectRequest],
    ) -> Result<Vec<Option<ObjectInfo>>> {
        if requests.is_empty() {
            bail!("batch object lookup requires at least one object");
        }
        futures::future::try_join_all(
            requests
                .iter()
                .map(|req| self.get_object(&req.object_id, req.version)),
        )
        .await
    }

    async fn batch_get_transactions(&self, digests: &[String]) -> Result<Vec<Value>> {
        if digests.is_empty() {
            bail!("batch transaction lookup requires at least one digest");
        }
        let result = self
            .call(
                "sui_multiGetTransactionBlocks",
                json!([digests, transaction_options()]),
            )
            .await?;
        match result {
            Value::Array(items) => Ok(items),
            other => Err(anyhow!("expected an array of transactions, got {}", other)),
        }
    }

    async fn get_package(&self, package_id: &str) -> Result<Value> {
        self.call("sui_getNormalizedMoveModulesByPackage", json!([package_id]))
            .await
    }

    async fn get_function(&self, package_id: &str, module: &str, function: &str) -> Result<Value> {
        self.call(
            "sui_getNormalizedMoveFunction",
            json!([package_id, module, function]),
        )
        .await
    }

    async fn get_datatype(&self, package_id: &str, module: &str, name: &str) -> Result<Value> {
        self.call("sui_getNormalizedMoveStruct", json!([package_id, module, name]))
            .await
    }

    async fn get_balance(&self, owner: &str, coin_type: &str) -> Result<Balance> {
        let result = self.call("suix_getBalance", json!([owner, coin_type])).await?;
        parse_balance(&result)
    }

    async fn get_coin_info(&self, coin_type: &str) -> Result<Value> {
        self.call("suix_getCoinMetadata", json!([coin_type])).await
    }

    async fn list_balances(&self, owner: &str) -> Result<Vec<Balance>> {
        let result = self.call("suix_getAllBalances", json!([owner])).await?;
        result
            .as_array()
            .ok_or_else(|| anyhow!("expected an array of balances"))?
            .iter()
            .map(parse_balance)
            .collect()
    }

    async fn list_owned_objects(
        &self,
        owner: &str,
        page: &PageRequest,
    ) -> Result<Page<ObjectInfo>> {
        let (cursor, limit) = page_params(page);
        let query = json!({ "filter": null, "options": object_options() });
        let result = self
            .call("suix_getOwnedObjects", json!([owner, query, cursor, limit]))
            .await?;
        let items = result
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("missing field 'data'"))?
            .iter()
            .filter_map(|entry| parse_object_response(entry).transpose())
            .collect::<Result<Vec<_>>>()?;
        Ok(Page {
            items,
            next_page_token: parse_next_token(&result),
        })
    }

    async fn list_dynamic_fields(&self, parent: &str, page: &PageRequest) -> Result<Page<Value>> {
        let (cursor, limit) = page_params(page);
        let result = self
            .call("suix_getDynamicFields", json!([parent, cursor, limit]))
            .await?;
        let items = result
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| anyhow!("missing field 'data'"))?;
        Ok(Page {
            items,
            next_page_token: parse_next_token(&result),
        })
    }
}

#[async_trait]
impl TransactionExecutor for JsonRpcClient {
    async fn simulate_transaction(
        &self,
        tx_bytes: &[u8],
        deadline: Option<Instant>,
    ) -> Result<SimulationOutcome> {
        let result = self
            .call_until(
                "sui_dryRunTransactionBlock",
                json!([base64_encode(tx_bytes)]),
                deadline,
            )
            .await?;
        let effects = result
            .get("effects")
            .ok_or_else(|| anyhow!("missing field 'effects'"))?;
        Ok(SimulationOutcome {
            status: parse_status(effects)?,
            gas_used: parse_gas_used(effects)?,
        })
    }

    async fn execute_transaction(
        &self,
        tx_bytes: &[u8],
        signature: &SerializedSignature,
        deadline: Option<Instant>,
    ) -> Result<ExecutionResponse> {
        let result = self
            .call_until(
                "sui_executeTransactionBlock",
                json!([
                    base64_encode(tx_bytes),
                    [signature.to_base64()],
                    { "showEffects": true },
                    EXECUTE_REQUEST_TYPE,
                ]),
                deadline,
            )
            .await?;
        let effects = result.get("effects");
        Ok(ExecutionResponse {
            digest: str_field(&result, "digest")?,
            status: effects.map(parse_status).transpose()?,
            gas_used: effects.map(parse_gas_used).transpose()?,
        })
    }
}
