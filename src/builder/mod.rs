//! Programmable transaction builder.
//!
//! A [`TransactionBuilder`] accumulates inputs and commands, then is consumed
//! by [`TransactionBuilder::build`] into a [`BuiltTransaction`]. Consumption
//! is by move: a builder cannot be used again after `build` or `release`,
//! whether or not the build succeeded.
//!
//! ```
//! use sui_ptb::builder::TransactionBuilder;
//!
//! # fn main() -> sui_ptb::Result<()> {
//! let digest = sui_ptb_types::encoding::base58_encode(&[1u8; 32]);
//! let mut builder = TransactionBuilder::new();
//! builder.set_config("0xa11ce", 5_000_000, 1_000)?;
//! builder.add_gas_object("0x6a5", 12, &digest)?;
//!
//! let gas = builder.gas_coin()?;
//! let amount = builder.pure_u64(100_000_000)?;
//! let coins = builder.split_coins(gas, &[amount])?;
//! let coin = builder.nested_result(coins, 0)?;
//! let recipient = builder.pure_address("0xa11ce")?;
//! builder.transfer_objects(&[coin], recipient)?;
//!
//! let tx = builder.build()?;
//! assert_eq!(tx.gas_budget(), 5_000_000);
//! # Ok(())
//! # }
//! ```

mod arguments;
mod commands;
mod framing;
mod pure;

pub use arguments::{ArgumentId, ObjectInput, ObjectKind};
pub use commands::MoveCallArg;
pub use framing::{frame, unframe, BuiltTransaction};

use crate::error::{Error, Result, StateError, ValidationError};
use arguments::ArgumentTable;
use sui_ptb_types::encoding::parse_address;
use sui_ptb_types::{
    AccountAddress, Command, GasData, ObjectRef, ProgrammableTransaction, TransactionData,
    TransactionExpiration,
};
use tracing::debug;

/// Most commands one transaction may carry.
pub const MAX_COMMANDS: usize = 1024;
/// Most inputs (pure values and objects) one transaction may carry.
pub const MAX_INPUTS: usize = 2048;
/// Most coins one gas payment may use.
pub const MAX_GAS_OBJECTS: usize = 256;
/// Most argument IDs one builder hands out, nested results included.
pub const MAX_ARGUMENTS: usize = 1 << 16;

pub struct TransactionBuilder {
    arguments: ArgumentTable,
    commands: Vec<Command>,
    sender: Option<AccountAddress>,
    gas_objects: Vec<ObjectRef>,
    gas_budget: Option<u64>,
    gas_price: Option<u64>,
    expiration: TransactionExpiration,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self {
            arguments: ArgumentTable::new(),
            commands: Vec::new(),
            sender: None,
            gas_objects: Vec::new(),
            gas_budget: None,
            gas_price: None,
            expiration: TransactionExpiration::None,
        }
    }

    /// Set sender, budget and price together. The sender is validated first
    /// and nothing changes if it is malformed.
    pub fn set_config(&mut self, sender: &str, gas_budget: u64, gas_price: u64) -> Result<()> {
        self.set_sender(sender)?;
        self.gas_budget = Some(gas_budget);
        self.gas_price = Some(gas_price);
        Ok(())
    }

    pub fn set_sender(&mut self, sender: &str) -> Result<()> {
        self.sender = Some(parse_address(sender, "sender")?);
        Ok(())
    }

    pub fn set_sender_address(&mut self, sender: AccountAddress) {
        self.sender = Some(sender);
    }

    pub fn set_gas_budget(&mut self, gas_budget: u64) {
        self.gas_budget = Some(gas_budget);
    }

    pub fn set_gas_price(&mut self, gas_price: u64) {
        self.gas_price = Some(gas_price);
    }

    /// Reject the transaction once `epoch` has ended.
    pub fn set_expiration_epoch(&mut self, epoch: u64) {
        self.expiration = TransactionExpiration::Epoch(epoch);
    }

    /// Add a coin to the gas payment, validating id and digest.
    pub fn add_gas_object(&mut self, object_id: &str, version: u64, digest: &str) -> Result<()> {
        let object = ObjectRef::parse(object_id, version, digest)?;
        self.add_gas_object_ref(object)
    }

    pub fn add_gas_object_ref(&mut self, object: ObjectRef) -> Result<()> {
        if self.gas_objects.len() >= MAX_GAS_OBJECTS {
            return Err(ValidationError::LimitExceeded {
                what: "gas objects",
                limit: MAX_GAS_OBJECTS,
            }
            .into());
        }
        self.gas_objects.push(object);
        Ok(())
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn input_count(&self) -> usize {
        self.arguments.input_count()
    }

    /// Finalize into BCS transaction bytes. The builder is consumed even
    /// when a precondition fails.
    pub fn build(self) -> Result<BuiltTransaction> {
        let sender = self.sender.ok_or(StateError::MissingSender)?;
        if self.gas_objects.is_empty() {
            return Err(StateError::MissingGasObject.into());
        }
        let budget = self.gas_budget.ok_or(StateError::MissingGasBudget)?;
        let price = self.gas_price.ok_or(StateError::MissingGasPrice)?;
        if self.commands.is_empty() {
            return Err(StateError::NoCommands.into());
        }

        let arguments = self.arguments.len();
        let pt = ProgrammableTransaction {
            inputs: self.arguments.into_inputs(),
            commands: self.commands,
        };
        debug!(
            inputs = pt.inputs.len(),
            commands = pt.commands.len(),
            arguments,
            budget,
            price,
            "building programmable transaction"
        );

        let gas_data = GasData {
            payment: self.gas_objects,
            owner: sender,
            price,
            budget,
        };
        let data = TransactionData::new_programmable(sender, gas_data, self.expiration, pt);
        let bytes = data.to_bytes().map_err(|e| Error::encoding("build", e))?;
        Ok(BuiltTransaction::new(data, bytes))
    }

    /// Discard an unbuilt builder.
    pub fn release(self) {
        debug!(
            commands = self.commands.len(),
            "transaction builder released without building"
        );
    }
}
