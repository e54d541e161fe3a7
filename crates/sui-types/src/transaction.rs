//! BCS structures of a programmable transaction.
//!
//! Variant order in every enum is part of the wire format: BCS encodes an
//! enum as the index of its variant, so new variants may only be appended.

use crate::digest::TransactionDigest;
use crate::object::{ObjectID, ObjectRef, SequenceNumber};
use move_core_types::account_address::AccountAddress;
use move_core_types::identifier::Identifier;
use move_core_types::language_storage::TypeTag;
use serde::{Deserialize, Serialize};

// =============================================================================
// Transaction envelope
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDataV1 {
    pub kind: TransactionKind,
    pub sender: AccountAddress,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: AccountAddress,
    pub price: u64,
    pub budget: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionExpiration {
    #[default]
    None,
    Epoch(u64),
}

impl TransactionData {
    pub fn new_programmable(
        sender: AccountAddress,
        gas_data: GasData,
        expiration: TransactionExpiration,
        pt: ProgrammableTransaction,
    ) -> Self {
        TransactionData::V1(TransactionDataV1 {
            kind: TransactionKind::ProgrammableTransaction(pt),
            sender,
            gas_data,
            expiration,
        })
    }

    pub fn sender(&self) -> AccountAddress {
        match self {
            TransactionData::V1(v1) => v1.sender,
        }
    }

    pub fn gas_data(&self) -> &GasData {
        match self {
            TransactionData::V1(v1) => &v1.gas_data,
        }
    }

    pub fn expiration(&self) -> TransactionExpiration {
        match self {
            TransactionData::V1(v1) => v1.expiration,
        }
    }

    pub fn programmable(&self) -> &ProgrammableTransaction {
        match self {
            TransactionData::V1(v1) => match &v1.kind {
                TransactionKind::ProgrammableTransaction(pt) => pt,
            },
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, bcs::Error> {
        bcs::to_bytes(self)
    }

    pub fn digest(&self) -> Result<TransactionDigest, bcs::Error> {
        self.to_bytes()
            .map(|bytes| TransactionDigest::from_transaction_bytes(&bytes))
    }
}

// =============================================================================
// Programmable transaction
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

/// A transaction input: a BCS-encoded pure value or an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    Pure(Vec<u8>),
    Object(ObjectArg),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectArg {
    /// Owned or immutable object.
    ImmOrOwnedObject(ObjectRef),
    SharedObject {
        id: ObjectID,
        initial_shared_version: SequenceNumber,
        mutable: bool,
    },
    Receiving(ObjectRef),
}

/// Operand of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Argument {
    /// The coin paying for gas.
    GasCoin,
    /// Index into `ProgrammableTransaction::inputs`.
    Input(u16),
    /// Sole result of the command at this index.
    Result(u16),
    /// One result of a multi-output command.
    NestedResult(u16, u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableMoveCall {
    pub package: ObjectID,
    pub module: Identifier,
    pub function: Identifier,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
    /// `(objects, recipient)`
    TransferObjects(Vec<Argument>, Argument),
    /// `(coin, amounts)`
    SplitCoins(Argument, Vec<Argument>),
    /// `(target, sources)`
    MergeCoins(Argument, Vec<Argument>),
    /// `(modules, dependencies)`
    Publish(Vec<Vec<u8>>, Vec<ObjectID>),
    MakeMoveVec(Option<TypeTag>, Vec<Argument>),
    /// `(modules, dependencies, package, ticket)`
    Upgrade(Vec<Vec<u8>>, Vec<ObjectID>, ObjectID, Argument),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::MoveCall(_) => "MoveCall",
            Command::TransferObjects(..) => "TransferObjects",
            Command::SplitCoins(..) => "SplitCoins",
            Command::MergeCoins(..) => "MergeCoins",
            Command::Publish(..) => "Publish",
            Command::MakeMoveVec(..) => "MakeMoveVec",
            Command::Upgrade(..) => "Upgrade",
        }
    }
}

// =============================================================================
// Effects summaries
// =============================================================================

/// Transaction execution status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionStatus {
    Success,
    Failure { error: String },
}

/// Gas usage summary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GasSummary {
    pub computation_cost: u64,
    pub storage_cost: u64,
    pub storage_rebate: u64,
    pub non_refundable_storage_fee: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_variant_tags() {
        assert_eq!(bcs::to_bytes(&Argument::GasCoin).unwrap(), vec![0]);
        assert_eq!(bcs::to_bytes(&Argument::Input(1)).unwrap(), vec![1, 1, 0]);
        assert_eq!(bcs::to_bytes(&Argument::Result(2)).unwrap(), vec![2, 2, 0]);
        assert_eq!(
            bcs::to_bytes(&Argument::NestedResult(3, 4)).unwrap(),
            vec![3, 3, 0, 4, 0]
        );
    }

    #[test]
    fn test_command_tags() {
        let split = Command::SplitCoins(Argument::GasCoin, vec![Argument::Input(0)]);
        assert_eq!(bcs::to_bytes(&split).unwrap()[0], 2);

        let transfer = Command::TransferObjects(vec![Argument::Result(0)], Argument::Input(1));
        assert_eq!(bcs::to_bytes(&transfer).unwrap()[0], 1);

        let vec_cmd = Command::MakeMoveVec(None, vec![Argument::Input(0)]);
        let bytes = bcs::to_bytes(&vec_cmd).unwrap();
        assert_eq!(&bytes[..2], &[5, 0]);
    }

    #[test]
    fn test_expiration_default_and_encoding() {
        assert_eq!(TransactionExpiration::default(), TransactionExpiration::None);
        assert_eq!(bcs::to_bytes(&TransactionExpiration::None).unwrap(), vec![0]);
        assert_eq!(
            bcs::to_bytes(&TransactionExpiration::Epoch(3)).unwrap(),
            vec![1, 3, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_transaction_data_accessors_and_roundtrip() {
        let sender = AccountAddress::from_hex_literal("0xa").unwrap();
        let pt = ProgrammableTransaction {
            inputs: vec![CallArg::Pure(vec![1])],
            commands: vec![Command::SplitCoins(
                Argument::GasCoin,
                vec![Argument::Input(0)],
            )],
        };
        let gas = GasData {
            payment: vec![],
            owner: sender,
            price: 1000,
            budget: 5000,
        };
        let data = TransactionData::new_programmable(sender, gas, TransactionExpiration::None, pt);

        let bytes = data.to_bytes().unwrap();
        // V1 tag, then ProgrammableTransaction tag
        assert_eq!(&bytes[..2], &[0, 0]);

        let decoded: TransactionData = bcs::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(decoded.sender(), sender);
        assert_eq!(decoded.gas_data().budget, 5000);
        assert_eq!(decoded.programmable().commands.len(), 1);
        assert_eq!(
            data.digest().unwrap(),
            TransactionDigest::from_transaction_bytes(&bytes)
        );
    }
}
