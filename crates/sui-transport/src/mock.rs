//! In-memory collaborators for tests and offline tooling.
//!
//! [`MockLedger`] serves objects and balances from maps; [`MockExecutor`]
//! replays scripted dry-run outcomes and records every transaction it sees.

use crate::api::{LedgerQuery, TransactionExecutor};
use crate::model::{
    Balance, EpochInfo, ExecutionResponse, ObjectInfo, ObjectRequest, Page, PageRequest,
    ServiceInfo, SimulationOutcome,
};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use sui_ptb_types::{SerializedSignature, TransactionDigest, TransactionStatus};
use tokio::time::{sleep_until, Instant};

const DEFAULT_PAGE_SIZE: usize = 50;

// =============================================================================
// Ledger
// =============================================================================

pub struct MockLedger {
    epoch: EpochInfo,
    chain_id: String,
    objects: Mutex<HashMap<String, ObjectInfo>>,
    owned: Mutex<HashMap<String, Vec<ObjectInfo>>>,
    balances: Mutex<HashMap<String, Vec<Balance>>>,
}

impl MockLedger {
    pub fn new(epoch: u64, reference_gas_price: u64) -> Self {
        Self {
            epoch: EpochInfo {
                epoch,
                reference_gas_price,
            },
            chain_id: "mock".to_string(),
            objects: Mutex::new(HashMap::new()),
            owned: Mutex::new(HashMap::new()),
            balances: Mutex::new(HashMap::new()),
        }
    }

    /// Register an object, also listing it under `owner`.
    pub fn insert_owned(&self, owner: &str, object: ObjectInfo) {
        self.objects
            .lock()
            .insert(object.object_id.clone(), object.clone());
        self.owned
            .lock()
            .entry(owner.to_string())
            .or_default()
            .push(object);
    }

    pub fn insert_balance(&self, owner: &str, balance: Balance) {
        self.balances
            .lock()
            .entry(owner.to_string())
            .or_default()
            .push(balance);
    }
}

fn unsupported(method: &str) -> anyhow::Error {
    anyhow!("{} is not served by the mock ledger", method)
}

#[async_trait]
impl LedgerQuery for MockLedger {
    async fn get_epoch(&self) -> Result<EpochInfo> {
        Ok(self.epoch)
    }

    async fn get_service_info(&self) -> Result<ServiceInfo> {
        Ok(ServiceInfo {
            chain_id: self.chain_id.clone(),
            epoch: self.epoch.epoch,
            checkpoint_height: 0,
        })
    }

    async fn get_object(
        &self,
        object_id: &str,
        version: Option<u64>,
    ) -> Result<Option<ObjectInfo>> {
        let object = self.objects.lock().get(object_id).cloned();
        Ok(object.filter(|o| version.map_or(true, |v| v == o.version)))
    }

    async fn get_transaction(&self, _digest: &str) -> Result<Value> {
        Err(unsupported("get_transaction"))
    }

    async fn batch_get_objects(
        &self,
        requests: &[ObjectRequest],
    ) -> Result<Vec<Option<ObjectInfo>>> {
        if requests.is_empty() {
            bail!("batch object lookup requires at least one object");
        }
        let mut out = Vec::with_capacity(requests.len());
        for req in requests {
            out.push(self.get_object(&req.object_id, req.version).await?);
        }
        Ok(out)
    }

    async fn batch_get_transactions(&self, digests: &[String]) -> Result<Vec<Value>> {
        if digests.is_empty() {
            bail!("batch transaction lookup requires at least one digest");
        }
        Err(unsupported("batch_get_transactions"))
    }

    async fn get_package(&self, _package_id: &str) -> Result<Value> {
        Err(unsupported("get_package"))
    }

    async fn get_function(
        &self,
        _package_id: &str,
        _module: &str,
        _function: &str,
    ) -> Result<Value> {
        Err(unsupported("get_function"))
    }

    async fn get_datatype(&self, _package_id: &str, _module: &str, _name: &str) -> Result<Value> {
        Err(unsupported("get_datatype"))
    }

    async fn get_balance(&self, owner: &str, coin_type: &str) -> Result<Balance> {
        let found = self
            .balances
            .lock()
            .get(owner)
            .and_then(|all| all.iter().find(|b| b.coin_type == coin_type).cloned());
        Ok(found.unwrap_or(Balance {
            coin_type: coin_type.to_string(),
            coin_object_count: 0,
            total_balance: 0,
        }))
    }

    async fn get_coin_info(&self, _coin_type: &str) -> Result<Value> {
        Err(unsupported("get_coin_info"))
    }

    async fn list_balances(&self, owner: &str) -> Result<Vec<Balance>> {
        Ok(self.balances.lock().get(owner).cloned().unwrap_or_default())
    }

    /// Page tokens are decimal offsets.
    async fn list_owned_objects(
        &self,
        owner: &str,
        page: &PageRequest,
    ) -> Result<Page<ObjectInfo>> {
        let all = self.owned.lock().get(owner).cloned().unwrap_or_default();
        let start = match &page.page_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| anyhow!("invalid page token '{}'", token))?,
            None => 0,
        };
        let size = page
            .page_size
            .map(|s| s as usize)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .max(1);
        let end = (start + size).min(all.len());
        let items = all.get(start..end).map(<[_]>::to_vec).unwrap_or_default();
        Ok(Page {
            items,
            next_page_token: (end < all.len()).then(|| end.to_string()),
        })
    }

    async fn list_dynamic_fields(&self, _parent: &str, _page: &PageRequest) -> Result<Page<Value>> {
        Ok(Page {
            items: Vec::new(),
            next_page_token: None,
        })
    }
}

// =============================================================================
// Executor
// =============================================================================

#[derive(Default)]
pub struct MockExecutor {
    simulations: Mutex<VecDeque<std::result::Result<SimulationOutcome, String>>>,
    execution_error: Mutex<Option<String>>,
    latency: Option<Duration>,
    simulated: Mutex<Vec<Vec<u8>>>,
    executed: Mutex<Vec<(Vec<u8>, SerializedSignature)>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response, for exercising deadlines.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue the next dry-run result.
    pub fn push_simulation(&self, outcome: SimulationOutcome) {
        self.simulations.lock().push_back(Ok(outcome));
    }

    /// Queue a transport failure for the next dry run.
    pub fn push_simulation_error(&self, message: impl Into<String>) {
        self.simulations.lock().push_back(Err(message.into()));
    }

    pub fn fail_execution(&self, message: impl Into<String>) {
        *self.execution_error.lock() = Some(message.into());
    }

    pub fn simulated_transactions(&self) -> Vec<Vec<u8>> {
        self.simulated.lock().clone()
    }

    pub fn executed_transactions(&self) -> Vec<(Vec<u8>, SerializedSignature)> {
        self.executed.lock().clone()
    }

    /// Sleep out the latency. A deadline that falls inside it fails the call
    /// before anything is recorded.
    async fn wait(&self, operation: &str, deadline: Option<Instant>) -> Result<()> {
        let ready = Instant::now() + self.latency.unwrap_or_default();
        if let Some(deadline) = deadline {
            if deadline <= ready {
                sleep_until(deadline).await;
                bail!("{} exceeded its deadline", operation);
            }
        }
        sleep_until(ready).await;
        Ok(())
    }
}

#[async_trait]
impl TransactionExecutor for MockExecutor {
    async fn simulate_transaction(
        &self,
        tx_bytes: &[u8],
        deadline: Option<Instant>,
    ) -> Result<SimulationOutcome> {
        self.wait("dry run", deadline).await?;
        self.simulated.lock().push(tx_bytes.to_vec());
        let next = self.simulations.lock().pop_front();
        match next {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no dry-run outcome scripted")),
        }
    }

    async fn execute_transaction(
        &self,
        tx_bytes: &[u8],
        signature: &SerializedSignature,
        deadline: Option<Instant>,
    ) -> Result<ExecutionResponse> {
        self.wait("execute", deadline).await?;
        if let Some(message) = self.execution_error.lock().clone() {
            return Err(anyhow!(message));
        }
        self.executed.lock().push((tx_bytes.to_vec(), *signature));
        Ok(ExecutionResponse {
            digest: TransactionDigest::from_transaction_bytes(tx_bytes).to_string(),
            status: Some(TransactionStatus::Success),
            gas_used: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectOwner;
    use sui_ptb_types::GasSummary;

    fn object(id: &str, version: u64) -> ObjectInfo {
        ObjectInfo {
            object_id: id.to_string(),
            version,
            digest: "11111111111111111111111111111111".to_string(),
            object_type: None,
            owner: ObjectOwner::Address("0xa".to_string()),
        }
    }

    #[tokio::test]
    async fn test_owned_object_paging() {
        let ledger = MockLedger::new(1, 1000);
        for i in 0..5 {
            ledger.insert_owned("0xa", object(&format!("0x{}", i + 1), 1));
        }

        let first = ledger
            .list_owned_objects("0xa", &PageRequest::first(2))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.next_page_token.as_deref(), Some("2"));

        let last = ledger
            .list_owned_objects("0xa", &PageRequest::after(10, "2"))
            .await
            .unwrap();
        assert_eq!(last.items.len(), 3);
        assert!(last.next_page_token.is_none());
    }

    #[tokio::test]
    async fn test_get_object_version_filter() {
        let ledger = MockLedger::new(1, 1000);
        ledger.insert_owned("0xa", object("0x9", 4));
        assert!(ledger.get_object("0x9", None).await.unwrap().is_some());
        assert!(ledger.get_object("0x9", Some(4)).await.unwrap().is_some());
        assert!(ledger.get_object("0x9", Some(3)).await.unwrap().is_none());
        assert!(ledger.batch_get_objects(&[]).await.is_err());
    }

    #[tokio::test]
    async fn test_executor_replays_script_in_order() {
        let executor = MockExecutor::new();
        executor.push_simulation(SimulationOutcome {
            status: TransactionStatus::Success,
            gas_used: GasSummary::default(),
        });
        executor.push_simulation_error("connection reset");

        assert!(executor.simulate_transaction(&[1], None).await.is_ok());
        let err = executor.simulate_transaction(&[2], None).await.unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
        assert!(executor.simulate_transaction(&[3], None).await.is_err());
        assert_eq!(executor.simulated_transactions(), vec![vec![1], vec![2], vec![3]]);
    }

    #[tokio::test]
    async fn test_execution_past_deadline_is_not_recorded() {
        let executor = MockExecutor::new().with_latency(Duration::from_millis(200));
        let signature = SerializedSignature::from_bytes(&[0u8; 97]).unwrap();
        let deadline = Instant::now() + Duration::from_millis(20);

        let err = executor
            .execute_transaction(&[1], &signature, Some(deadline))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("deadline"));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(executor.executed_transactions().is_empty());
    }
}
