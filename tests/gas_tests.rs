//! Gas Budget Estimation Tests
//!
//! - budget arithmetic on reported costs
//! - dry runs through a scripted executor
//! - gas payment selection from a mock ledger

mod common;

use common::{
    assert_error_contains, assert_error_kind, digest, failed_simulation, gas_payment, mock_executor,
    sender, successful_simulation, SENDER,
};
use std::sync::Arc;
use std::time::Duration;
use sui_ptb::gas::{estimate_for, estimate_gas_budget, GAS_BUDGET_BUFFER_DIVISOR};
use sui_ptb::payment::{owned_coins, reference_gas_price};
use sui_ptb::{build_transaction, Error, ErrorKind, GasPayment, SplitCoinRequest};
use sui_ptb_transport::mock::{MockExecutor, MockLedger};
use sui_ptb_transport::{ObjectInfo, ObjectOwner, PageRequest};
use sui_ptb_types::framework::{coin_object_type, SUI_COIN_TYPE};
use tokio::time::Instant;

fn draft() -> sui_ptb::BuiltTransaction {
    let payment = gas_payment(sender(), 1_000, 50_000_000);
    let request = SplitCoinRequest::new(SENDER, 1, payment).unwrap();
    build_transaction(&request, 50_000_000).unwrap()
}

// =============================================================================
// Arithmetic
// =============================================================================

mod arithmetic {
    use super::*;

    #[test]
    fn test_reference_scenario() {
        let est = estimate_gas_budget(&successful_simulation(2_700_000, 270_000)).unwrap();
        assert_eq!(est.estimated_cost, 2_970_000);
        assert_eq!(est.buffer, 297_000);
        assert_eq!(est.budget, 3_267_000);
    }

    #[test]
    fn test_buffer_is_a_tenth() {
        assert_eq!(GAS_BUDGET_BUFFER_DIVISOR, 10);
        let est = estimate_gas_budget(&successful_simulation(1_234_567, 0)).unwrap();
        assert_eq!(est.buffer, 123_456);
    }

    #[test]
    fn test_failed_dry_run() {
        let err = assert_error_kind(
            estimate_gas_budget(&failed_simulation("MoveAbort in command 1")),
            ErrorKind::Simulation,
            "failed dry run",
        );
        assert_error_contains(&err, "MoveAbort in command 1", "failed dry run");
    }
}

// =============================================================================
// Dry runs
// =============================================================================

mod dry_runs {
    use super::*;

    #[tokio::test]
    async fn test_estimate_sends_draft_bytes() {
        let executor = mock_executor(successful_simulation(2_700_000, 270_000));
        let draft = draft();
        let est = estimate_for(executor.as_ref(), &draft, None).await.unwrap();
        assert_eq!(est.budget, 3_267_000);
        assert_eq!(executor.simulated_transactions(), vec![draft.bytes().to_vec()]);
    }

    #[tokio::test]
    async fn test_transport_failure_is_rpc() {
        let executor = MockExecutor::new();
        executor.push_simulation_error("connection reset");
        let err = assert_error_kind(
            estimate_for(&executor, &draft(), None).await,
            ErrorKind::Rpc,
            "dry run over a broken transport",
        );
        assert_error_contains(&err, "connection reset", "rpc error");
    }

    #[tokio::test]
    async fn test_deadline_bounds_the_dry_run() {
        let executor = MockExecutor::new().with_latency(Duration::from_millis(500));
        executor.push_simulation(successful_simulation(1, 1));
        let deadline = Instant::now() + Duration::from_millis(20);
        let err = estimate_for(&executor, &draft(), Some(deadline))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Rpc { .. }));
        assert_error_contains(&err, "deadline", "timed out dry run");
    }
}

// =============================================================================
// Gas payment
// =============================================================================

mod payment {
    use super::*;

    fn coin(id: &str, coin_type: &str) -> ObjectInfo {
        ObjectInfo {
            object_id: id.to_string(),
            version: 9,
            digest: digest(3),
            object_type: Some(coin_object_type(coin_type)),
            owner: ObjectOwner::Address(SENDER.to_string()),
        }
    }

    #[tokio::test]
    async fn test_payment_from_owned_coins() {
        let ledger = Arc::new(MockLedger::new(100, 750));
        ledger.insert_owned(SENDER, coin("0x100", SUI_COIN_TYPE));
        ledger.insert_owned(SENDER, coin("0x101", "0xdead::token::TOKEN"));
        ledger.insert_owned(SENDER, coin("0x102", SUI_COIN_TYPE));

        let price = reference_gas_price(ledger.as_ref(), None).await.unwrap();
        let first_page = PageRequest::first(2);
        let first = owned_coins(ledger.as_ref(), SENDER, SUI_COIN_TYPE, &first_page, None)
            .await
            .unwrap();
        assert_eq!(first.items.len(), 1);
        let token = first.next_page_token.clone().unwrap();
        let second = owned_coins(
            ledger.as_ref(),
            SENDER,
            SUI_COIN_TYPE,
            &PageRequest::after(2, token),
            None,
        )
        .await
        .unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.next_page_token, None);

        let coins: Vec<ObjectInfo> = first.items.into_iter().chain(second.items).collect();
        let payment = GasPayment::from_objects(&coins, sender(), price, 10_000_000).unwrap();
        assert_eq!(payment.objects().len(), 2);
        assert_eq!(payment.price(), 750);
        assert_eq!(payment.owner(), sender());
    }
}
