//! Transaction plans.
//!
//! A plan knows how to fill a builder's commands for a given payment, so the
//! same transaction can be built twice: once with a draft budget for the dry
//! run and once with the estimated budget for signing.

use crate::builder::{BuiltTransaction, TransactionBuilder};
use crate::error::Result;
use crate::payment::GasPayment;
use sui_ptb_types::encoding::parse_address_lenient;
use sui_ptb_types::AccountAddress;

pub trait TransactionPlan: Send + Sync {
    fn gas_payment(&self) -> &GasPayment;

    /// Append this plan's inputs and commands.
    fn add_commands(&self, builder: &mut TransactionBuilder) -> Result<()>;

    /// Last epoch the transaction may execute in.
    fn expiration_epoch(&self) -> Option<u64> {
        None
    }
}

/// Build `plan` with `gas_budget` in place of the payment's own budget.
pub fn build_transaction<P>(plan: &P, gas_budget: u64) -> Result<BuiltTransaction>
where
    P: TransactionPlan + ?Sized,
{
    let payment = plan.gas_payment();
    let mut builder = TransactionBuilder::new();
    builder.set_sender_address(payment.owner());
    builder.set_gas_price(payment.price());
    builder.set_gas_budget(gas_budget);
    if let Some(epoch) = plan.expiration_epoch() {
        builder.set_expiration_epoch(epoch);
    }
    for object in payment.objects() {
        if let Err(e) = builder.add_gas_object_ref(*object) {
            builder.release();
            return Err(e);
        }
    }
    if let Err(e) = plan.add_commands(&mut builder) {
        builder.release();
        return Err(e);
    }
    builder.build()
}

/// Split `amount` off the gas coin and send it to `recipient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitCoinRequest {
    pub recipient: AccountAddress,
    pub amount: u64,
    pub payment: GasPayment,
}

impl SplitCoinRequest {
    pub fn new(recipient: &str, amount: u64, payment: GasPayment) -> Result<Self> {
        Ok(Self {
            recipient: parse_address_lenient(recipient, "recipient")?,
            amount,
            payment,
        })
    }
}

impl TransactionPlan for SplitCoinRequest {
    fn gas_payment(&self) -> &GasPayment {
        &self.payment
    }

    fn add_commands(&self, builder: &mut TransactionBuilder) -> Result<()> {
        let gas = builder.gas_coin()?;
        let amount = builder.pure_u64(self.amount)?;
        let split = builder.split_coins(gas, &[amount])?;
        let coin = builder.nested_result(split, 0)?;
        let recipient = builder.pure_address_value(self.recipient)?;
        builder.transfer_objects(&[coin], recipient)
    }
}
