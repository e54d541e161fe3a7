//! Pure values: BCS-encoded literals added as transaction inputs.
//!
//! Integers are little-endian and fixed width, `bool` is one byte, addresses
//! are 32 raw bytes. Each call adds a fresh input, even for equal values.

use super::{ArgumentId, TransactionBuilder};
use crate::error::{Error, Result};
use serde::Serialize;
use sui_ptb_types::encoding::parse_address_lenient;
use sui_ptb_types::{AccountAddress, CallArg};

impl TransactionBuilder {
    /// BCS-encode any serializable value as a pure input.
    pub fn pure<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<ArgumentId> {
        let bytes = bcs::to_bytes(value).map_err(|e| Error::encoding("pure", e))?;
        self.pure_bytes(bytes)
    }

    /// Pre-encoded BCS bytes, passed through unchanged.
    pub fn pure_bytes(&mut self, bcs_bytes: Vec<u8>) -> Result<ArgumentId> {
        self.arguments.push_input(CallArg::Pure(bcs_bytes))
    }

    pub fn pure_bool(&mut self, value: bool) -> Result<ArgumentId> {
        self.pure(&value)
    }

    pub fn pure_u8(&mut self, value: u8) -> Result<ArgumentId> {
        self.pure(&value)
    }

    pub fn pure_u16(&mut self, value: u16) -> Result<ArgumentId> {
        self.pure(&value)
    }

    pub fn pure_u32(&mut self, value: u32) -> Result<ArgumentId> {
        self.pure(&value)
    }

    pub fn pure_u64(&mut self, value: u64) -> Result<ArgumentId> {
        self.pure(&value)
    }

    pub fn pure_u128(&mut self, value: u128) -> Result<ArgumentId> {
        self.pure(&value)
    }

    /// Parse and encode an address. Whitespace and surrounding quotes are
    /// tolerated; anything else malformed is a validation error.
    pub fn pure_address(&mut self, address: &str) -> Result<ArgumentId> {
        let address = parse_address_lenient(address, "address")?;
        self.pure_address_value(address)
    }

    pub fn pure_address_value(&mut self, address: AccountAddress) -> Result<ArgumentId> {
        self.pure(&address)
    }

    /// UTF-8 string, encoded like `vector<u8>`.
    pub fn pure_string(&mut self, value: &str) -> Result<ArgumentId> {
        self.pure(value)
    }
}
