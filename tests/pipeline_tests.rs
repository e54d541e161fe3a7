//! End-to-End Pipeline Tests
//!
//! Drives `ExecutionPipeline` against scripted executors:
//! - the self-transfer scenario from configuration to submission
//! - abort behavior on failed dry runs and transport errors
//! - stage ordering and deadlines

mod common;

use common::fixtures::keypair_address;
use common::{
    assert_error_contains, assert_error_kind, failed_simulation, gas_payment, mock_executor,
    successful_simulation, test_keypair, SPLIT_AMOUNT,
};
use std::sync::Arc;
use std::time::Duration;
use sui_ptb::{
    Error, ErrorKind, ExecutionPipeline, SplitCoinRequest, Stage, StateError, TransactionSigner,
};
use sui_ptb_transport::mock::MockExecutor;
use sui_ptb_transport::TransactionExecutor;
use sui_ptb_types::encoding::base64_decode;
use sui_ptb_types::{Argument, Command, TransactionData};

fn self_transfer() -> SplitCoinRequest {
    let owner = keypair_address();
    SplitCoinRequest::new(
        &owner.to_hex_literal(),
        SPLIT_AMOUNT,
        gas_payment(owner, 1_000, 50_000_000),
    )
    .unwrap()
}

// =============================================================================
// Happy path
// =============================================================================

mod happy_path {
    use super::*;

    #[tokio::test]
    async fn test_split_and_transfer_to_self() {
        let executor = mock_executor(successful_simulation(2_700_000, 270_000));
        let key = test_keypair();

        let outcome = ExecutionPipeline::new(self_transfer(), executor.clone())
            .run(&key)
            .await
            .unwrap();

        assert_eq!(outcome.estimate.budget, 3_267_000);

        let signature = base64_decode(&outcome.signed.signature).unwrap();
        assert_eq!(signature.len(), 97);
        assert_eq!(signature[0], 0x00);
        assert_eq!(&signature[65..], &key.public_key()[..]);

        let tx_bytes = base64_decode(&outcome.signed.tx_bytes).unwrap();
        let data: TransactionData = bcs::from_bytes(&tx_bytes).unwrap();
        assert_eq!(data.sender(), key.address());
        assert_eq!(data.gas_data().budget, 3_267_000);
        assert_eq!(
            data.programmable().commands,
            vec![
                Command::SplitCoins(Argument::GasCoin, vec![Argument::Input(0)]),
                Command::TransferObjects(vec![Argument::NestedResult(0, 0)], Argument::Input(1)),
            ]
        );

        let executed = executor.executed_transactions();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].0, tx_bytes);
        assert_eq!(outcome.response.digest, outcome.digest.to_string());
    }

    #[tokio::test]
    async fn test_draft_and_final_differ_only_in_budget() {
        let executor = mock_executor(successful_simulation(2_700_000, 270_000));
        let outcome = ExecutionPipeline::new(self_transfer(), executor.clone())
            .run(&test_keypair())
            .await
            .unwrap();

        let simulated = executor.simulated_transactions();
        let draft: TransactionData = bcs::from_bytes(&simulated[0]).unwrap();
        let final_bytes = base64_decode(&outcome.signed.tx_bytes).unwrap();
        let final_tx: TransactionData = bcs::from_bytes(&final_bytes).unwrap();

        assert_eq!(draft.gas_data().budget, 50_000_000);
        assert_eq!(final_tx.gas_data().budget, 3_267_000);
        assert_eq!(draft.programmable(), final_tx.programmable());
        assert_eq!(draft.gas_data().payment, final_tx.gas_data().payment);
    }
}

// =============================================================================
// Aborts
// =============================================================================

mod aborts {
    use super::*;

    #[tokio::test]
    async fn test_failed_dry_run_never_signs_or_submits() {
        let executor = mock_executor(failed_simulation("InsufficientGas"));
        let mut pipeline = ExecutionPipeline::new(self_transfer(), executor.clone());

        pipeline.build_draft().unwrap();
        let err = assert_error_kind(pipeline.simulate().await, ErrorKind::Simulation, "simulate");
        assert_error_contains(&err, "InsufficientGas", "simulation error");
        assert_eq!(pipeline.stage(), Stage::Aborted);

        assert_eq!(
            pipeline.finalize_budget().unwrap_err(),
            Error::State(StateError::Aborted {
                operation: "finalize budget"
            })
        );
        assert_eq!(
            pipeline.sign(&test_keypair()).unwrap_err().kind(),
            ErrorKind::State
        );
        assert!(executor.executed_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_execution_failure_is_rpc() {
        let executor = mock_executor(successful_simulation(10, 10));
        executor.fail_execution("validator unavailable");
        let err = assert_error_kind(
            ExecutionPipeline::new(self_transfer(), executor)
                .run(&test_keypair())
                .await,
            ErrorKind::Rpc,
            "submit",
        );
        assert_error_contains(&err, "validator unavailable", "submit error");
    }

    #[tokio::test]
    async fn test_deadline_aborts_slow_dry_run() {
        let executor = MockExecutor::new().with_latency(Duration::from_millis(500));
        executor.push_simulation(successful_simulation(1, 1));
        let executor = Arc::new(executor);

        let mut pipeline = ExecutionPipeline::new(self_transfer(), executor.clone())
            .with_timeout(Duration::from_millis(20));
        pipeline.build_draft().unwrap();
        let err = pipeline.simulate().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rpc);
        assert_error_contains(&err, "deadline", "slow dry run");
        assert_eq!(pipeline.stage(), Stage::Aborted);
    }

    #[tokio::test]
    async fn test_deadline_during_submit_leaves_nothing_executed() {
        // The dry run fits inside the deadline; the execution does not.
        let executor = MockExecutor::new().with_latency(Duration::from_millis(300));
        executor.push_simulation(successful_simulation(1, 1));
        let executor = Arc::new(executor);

        let err = ExecutionPipeline::new(self_transfer(), executor.clone())
            .with_timeout(Duration::from_millis(450))
            .run(&test_keypair())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rpc);
        assert_error_contains(&err, "deadline", "slow submit");

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(executor.simulated_transactions().len(), 1);
        assert!(executor.executed_transactions().is_empty());
    }
}

// =============================================================================
// Stage ordering
// =============================================================================

mod ordering {
    use super::*;

    #[tokio::test]
    async fn test_simulate_before_draft() {
        let executor = mock_executor(successful_simulation(1, 1));
        let mut pipeline = ExecutionPipeline::new(self_transfer(), executor.clone());
        let err = pipeline.simulate().await.unwrap_err();
        assert_eq!(
            err,
            Error::State(StateError::UnexpectedStage {
                operation: "simulate",
                stage: "Configuring"
            })
        );
        assert!(executor.simulated_transactions().is_empty());
    }

    #[test]
    fn test_draft_twice() {
        let executor: Arc<dyn TransactionExecutor> = Arc::new(MockExecutor::new());
        let mut pipeline = ExecutionPipeline::new(self_transfer(), executor);
        pipeline.build_draft().unwrap();
        assert_eq!(pipeline.stage(), Stage::DraftBuilt);
        assert_eq!(pipeline.build_draft().unwrap_err().kind(), ErrorKind::State);
    }
}
