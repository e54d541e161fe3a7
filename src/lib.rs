//! Sui Programmable Transaction Builder
//!
//! Build, price, sign and submit Sui programmable transaction blocks:
//!
//! - **Building**: [`builder::TransactionBuilder`] allocates arguments, issues
//!   commands and encodes the BCS `TransactionData`
//! - **Gas**: [`gas`] turns a dry run into a budget (cost plus 10%)
//! - **Signing**: [`signer`] produces the `{TxBytes, Signature}` envelope with
//!   keys from [`keys`]
//! - **Pipeline**: [`pipeline::ExecutionPipeline`] drives draft, dry run,
//!   rebuild, sign and submit as one state machine
//!
//! Ledger access goes through the traits of [`sui_ptb_transport`].

#![allow(clippy::result_large_err)]

pub mod builder;
pub mod error;
pub mod gas;
pub mod keys;
pub mod payment;
pub mod pipeline;
pub mod plan;
pub mod signer;

pub use builder::{ArgumentId, BuiltTransaction, MoveCallArg, ObjectInput, TransactionBuilder};
pub use error::{Error, ErrorKind, Result, SignatureError, StateError, ValidationError};
pub use gas::{estimate_gas_budget, GasEstimate, GAS_BUDGET_BUFFER_DIVISOR};
pub use keys::{Ed25519Keypair, TransactionSigner};
pub use payment::GasPayment;
pub use pipeline::{ExecutionPipeline, PipelineOutcome, Stage};
pub use plan::{build_transaction, SplitCoinRequest, TransactionPlan};
pub use signer::{sign_transaction, SignedTransaction};
