//! Fixture values shared by the integration tests.

use sui_ptb::{Ed25519Keypair, GasPayment, TransactionSigner};
use sui_ptb_types::encoding::base58_encode;
use sui_ptb_types::{AccountAddress, ObjectRef};

/// A literal sender address for builder tests that never sign.
pub const SENDER: &str = "0x7d20dcdb2bca4f508ea9613994683eb4e76e9c4ed371169677c1be02aaf0b58e";

/// Amount split off the gas coin in the transfer scenario.
pub const SPLIT_AMOUNT: u64 = 100_000_000;

const TEST_SECRET: [u8; 32] = [
    0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
    0x0f, 0x10,
];

/// A base58 object digest whose 32 bytes are all `seed`.
#[allow(dead_code)]
pub fn digest(seed: u8) -> String {
    base58_encode(&[seed; 32])
}

#[allow(dead_code)]
pub fn sender() -> AccountAddress {
    AccountAddress::from_hex_literal(SENDER).expect("fixture sender parses")
}

/// The key every signing test uses; deterministic, never funded.
#[allow(dead_code)]
pub fn test_keypair() -> Ed25519Keypair {
    Ed25519Keypair::from_secret_bytes(&TEST_SECRET).expect("fixture key is valid")
}

/// One gas coin owned by `owner`.
#[allow(dead_code)]
pub fn gas_payment(owner: AccountAddress, price: u64, budget: u64) -> GasPayment {
    let coin = ObjectRef::parse("0x6a5", 12, &digest(7)).expect("fixture gas ref parses");
    GasPayment::new(owner, price, budget, vec![coin]).expect("fixture payment is valid")
}

/// The test key's own address, for self-transfers.
#[allow(dead_code)]
pub fn keypair_address() -> AccountAddress {
    test_keypair().address()
}
