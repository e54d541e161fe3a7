//! Gas budget estimation from a dry run.
//!
//! The budget is part of the signed bytes, so it cannot be adjusted after the
//! fact: a draft is simulated, the budget is derived from the reported costs,
//! and the transaction is built again with that budget.

use crate::builder::BuiltTransaction;
use crate::error::{Error, Result};
use sui_ptb_transport::{with_deadline, SimulationOutcome, TransactionExecutor};
use sui_ptb_types::TransactionStatus;
use tokio::time::Instant;
use tracing::{debug, warn};

/// The safety margin is `estimated_cost / GAS_BUDGET_BUFFER_DIVISOR` (10%).
pub const GAS_BUDGET_BUFFER_DIVISOR: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasEstimate {
    pub computation_cost: u64,
    pub storage_cost: u64,
    /// `computation_cost + storage_cost`; the storage rebate is not subtracted.
    pub estimated_cost: u64,
    pub buffer: u64,
    /// `estimated_cost + buffer`
    pub budget: u64,
}

/// Derive the budget from a dry run, or surface its failure.
pub fn estimate_gas_budget(outcome: &SimulationOutcome) -> Result<GasEstimate> {
    if let TransactionStatus::Failure { error } = &outcome.status {
        warn!(error = %error, "dry run reported failure");
        return Err(Error::Simulation {
            error: error.clone(),
        });
    }

    let gas = &outcome.gas_used;
    let estimated_cost = gas
        .computation_cost
        .checked_add(gas.storage_cost)
        .ok_or_else(|| Error::encoding("estimate gas budget", "simulated cost overflows u64"))?;
    let buffer = estimated_cost / GAS_BUDGET_BUFFER_DIVISOR;
    let budget = estimated_cost
        .checked_add(buffer)
        .ok_or_else(|| Error::encoding("estimate gas budget", "budget overflows u64"))?;

    debug!(
        computation = gas.computation_cost,
        storage = gas.storage_cost,
        rebate = gas.storage_rebate,
        budget,
        "gas budget estimated"
    );
    Ok(GasEstimate {
        computation_cost: gas.computation_cost,
        storage_cost: gas.storage_cost,
        estimated_cost,
        buffer,
        budget,
    })
}

/// Dry-run `draft` and estimate its budget.
pub async fn simulate_transaction<E>(
    executor: &E,
    draft: &BuiltTransaction,
    deadline: Option<Instant>,
) -> Result<SimulationOutcome>
where
    E: TransactionExecutor + ?Sized,
{
    with_deadline(
        deadline,
        "simulate transaction",
        executor.simulate_transaction(draft.bytes(), deadline),
    )
    .await
    .map_err(|e| Error::rpc("simulate transaction", e))
}

/// [`simulate_transaction`] followed by [`estimate_gas_budget`].
pub async fn estimate_for<E>(
    executor: &E,
    draft: &BuiltTransaction,
    deadline: Option<Instant>,
) -> Result<GasEstimate>
where
    E: TransactionExecutor + ?Sized,
{
    let outcome = simulate_transaction(executor, draft, deadline).await?;
    estimate_gas_budget(&outcome)
}
