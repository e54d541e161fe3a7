//! Gas payment selection from ledger state.

use crate::builder::MAX_GAS_OBJECTS;
use crate::error::{Error, Result, StateError, ValidationError};
use sui_ptb_transport::{with_deadline, LedgerQuery, ObjectInfo, Page, PageRequest};
use sui_ptb_types::framework::is_coin_of;
use sui_ptb_types::{AccountAddress, ObjectRef};
use tokio::time::Instant;
use tracing::debug;

/// Who pays for a transaction, with which coins, at what price and budget.
///
/// Fixed once constructed; the pipeline replaces the budget only when it
/// rebuilds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasPayment {
    owner: AccountAddress,
    price: u64,
    budget: u64,
    objects: Vec<ObjectRef>,
}

impl GasPayment {
    pub fn new(
        owner: AccountAddress,
        price: u64,
        budget: u64,
        objects: Vec<ObjectRef>,
    ) -> Result<Self> {
        if objects.is_empty() {
            return Err(StateError::MissingGasObject.into());
        }
        if objects.len() > MAX_GAS_OBJECTS {
            return Err(ValidationError::LimitExceeded {
                what: "gas objects",
                limit: MAX_GAS_OBJECTS,
            }
            .into());
        }
        Ok(Self {
            owner,
            price,
            budget,
            objects,
        })
    }

    /// Pay with coins returned by the ledger.
    pub fn from_objects(
        objects: &[ObjectInfo],
        owner: AccountAddress,
        price: u64,
        budget: u64,
    ) -> Result<Self> {
        let refs = objects
            .iter()
            .map(|o| o.object_ref().map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;
        Self::new(owner, price, budget, refs)
    }

    pub fn owner(&self) -> AccountAddress {
        self.owner
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    pub fn objects(&self) -> &[ObjectRef] {
        &self.objects
    }
}

/// Current epoch's reference gas price.
pub async fn reference_gas_price<L>(ledger: &L, deadline: Option<Instant>) -> Result<u64>
where
    L: LedgerQuery + ?Sized,
{
    let epoch = with_deadline(deadline, "get epoch", ledger.get_epoch())
        .await
        .map_err(|e| Error::rpc("get epoch", e))?;
    debug!(epoch = epoch.epoch, price = epoch.reference_gas_price, "reference gas price");
    Ok(epoch.reference_gas_price)
}

/// One page of `owner`'s objects, keeping only coins of `coin_type`.
///
/// The page token is the ledger's, so a page may hold fewer coins than
/// requested while more remain.
pub async fn owned_coins<L>(
    ledger: &L,
    owner: &str,
    coin_type: &str,
    page: &PageRequest,
    deadline: Option<Instant>,
) -> Result<Page<ObjectInfo>>
where
    L: LedgerQuery + ?Sized,
{
    let listed = with_deadline(
        deadline,
        "list owned objects",
        ledger.list_owned_objects(owner, page),
    )
    .await
    .map_err(|e| Error::rpc("list owned objects", e))?;

    let items: Vec<ObjectInfo> = listed
        .items
        .into_iter()
        .filter(|o| {
            o.object_type
                .as_deref()
                .map_or(false, |t| is_coin_of(t, coin_type))
        })
        .collect();
    debug!(owner, coin_type, coins = items.len(), "listed owned coins");
    Ok(Page {
        items,
        next_page_token: listed.next_page_token,
    })
}
