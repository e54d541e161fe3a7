//! Transport doubles for pipeline tests.

use std::sync::Arc;
use sui_ptb_transport::mock::MockExecutor;
use sui_ptb_transport::SimulationOutcome;
use sui_ptb_types::{GasSummary, TransactionStatus};

/// A dry run that succeeded with the given costs.
#[allow(dead_code)]
pub fn successful_simulation(computation_cost: u64, storage_cost: u64) -> SimulationOutcome {
    SimulationOutcome {
        status: TransactionStatus::Success,
        gas_used: GasSummary {
            computation_cost,
            storage_cost,
            storage_rebate: storage_cost / 2,
            non_refundable_storage_fee: 0,
        },
    }
}

/// A dry run the ledger rejected with `error`.
#[allow(dead_code)]
pub fn failed_simulation(error: &str) -> SimulationOutcome {
    SimulationOutcome {
        status: TransactionStatus::Failure {
            error: error.to_string(),
        },
        gas_used: GasSummary::default(),
    }
}

/// An executor with one scripted dry run.
#[allow(dead_code)]
pub fn mock_executor(outcome: SimulationOutcome) -> Arc<MockExecutor> {
    let executor = MockExecutor::new();
    executor.push_simulation(outcome);
    Arc::new(executor)
}
