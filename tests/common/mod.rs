#![allow(unused_imports)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: addresses, digests, keys and gas payments
//! - `mocks`: scripted ledger and executor doubles
//! - `assertions`: assertion helpers with better failure messages

pub mod assertions;
pub mod fixtures;
pub mod mocks;

pub use fixtures::{digest, gas_payment, sender, test_keypair, SENDER, SPLIT_AMOUNT};
pub use mocks::{failed_simulation, mock_executor, successful_simulation};

pub use assertions::{assert_err, assert_error_contains, assert_error_kind, assert_ok};
