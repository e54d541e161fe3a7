//! Sui Transport Layer
//!
//! The remote collaborators of the transaction builder, and ways to reach them.
//!
//! This crate provides:
//! - [`api`]: the [`LedgerQuery`] and [`TransactionExecutor`] seams
//! - [`jsonrpc`]: a fullnode JSON-RPC client implementing both
//! - [`mock`]: in-memory implementations for tests
//! - [`deadline`]: caller-supplied deadlines for any remote call
//!
//! # Example
//!
//! ```ignore
//! use sui_ptb_transport::{JsonRpcClient, LedgerQuery, RpcConfig};
//!
//! let client = JsonRpcClient::new(&RpcConfig::testnet());
//! let epoch = client.get_epoch().await?;
//! println!("reference gas price: {}", epoch.reference_gas_price);
//! ```

pub mod api;
pub mod config;
pub mod deadline;
pub mod jsonrpc;
pub mod mock;
pub mod model;

pub use api::{LedgerQuery, TransactionExecutor};
pub use config::RpcConfig;
pub use deadline::with_deadline;
pub use jsonrpc::JsonRpcClient;
pub use model::{
    Balance, EpochInfo, ExecutionResponse, ObjectInfo, ObjectOwner, ObjectRequest, Page,
    PageRequest, ServiceInfo, SimulationOutcome,
};
