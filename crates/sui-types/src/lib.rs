//! Wire types shared by the sui-ptb workspace.
//!
//! This crate holds everything that both the transaction builder and the
//! transport layer need to agree on:
//!
//! - [`transaction`]: the BCS structures of a programmable transaction
//! - [`object`] and [`digest`]: object references and base58 digests
//! - [`crypto`]: the signature scheme table and the 97-byte serialized signature
//! - [`framework`]: the SUI coin type and framework address
//! - [`encoding`] and [`env_utils`]: text encodings and environment parsing

pub mod crypto;
pub mod digest;
pub mod encoding;
pub mod env_utils;
pub mod error;
pub mod framework;
pub mod object;
pub mod transaction;

pub use crypto::{SerializedSignature, SignatureScheme};
pub use digest::{ObjectDigest, TransactionDigest};
pub use error::ParseError;
pub use object::{ObjectID, ObjectRef, SequenceNumber};
pub use transaction::{
    Argument, CallArg, Command, GasData, GasSummary, ObjectArg, ProgrammableMoveCall,
    ProgrammableTransaction, TransactionData, TransactionExpiration, TransactionStatus,
};

pub use move_core_types::account_address::AccountAddress;
