//! In-memory asset ledger.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::domain::{Address, Amount};
use crate::error::{PoolError, Result};
use crate::math::CheckedArithmetic;
use crate::traits::AssetLedger;

/// Per-asset account balances held in memory.
///
/// Transfers are all-or-nothing: a transfer that would overdraw the sender
/// fails with [`PoolError::TransferFailed`] and changes nothing.
///
/// # Examples
///
/// ```
/// use datapool_amm::domain::{Address, Amount};
/// use datapool_amm::ledger::InMemoryLedger;
/// use datapool_amm::traits::AssetLedger;
///
/// let asset = Address::from_bytes([9u8; 32]);
/// let alice = Address::from_bytes([1u8; 32]);
/// let pool = Address::from_bytes([2u8; 32]);
///
/// let ledger = InMemoryLedger::new();
/// ledger.mint(asset, alice, Amount::new(100)).expect("mint");
/// ledger.pull(asset, alice, pool, Amount::new(40)).expect("transfer");
/// assert_eq!(ledger.balance_of(asset, pool), Amount::new(40));
/// assert!(ledger.pull(asset, alice, pool, Amount::new(61)).is_err());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: RefCell<BTreeMap<(Address, Address), Amount>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` of `asset` to `account` out of thin air.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Overflow`] if the balance would overflow.
    pub fn mint(&self, asset: Address, account: Address, amount: Amount) -> Result<()> {
        let mut balances = self.balances.borrow_mut();
        let entry = balances.entry((asset, account)).or_default();
        *entry = entry.safe_add(&amount)?;
        Ok(())
    }

    /// Balance of `asset` held by `account`.
    pub fn balance_of(&self, asset: Address, account: Address) -> Amount {
        self.balances
            .borrow()
            .get(&(asset, account))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(&self, asset: Address, from: Address, to: Address, amount: Amount) -> Result<()> {
        let mut balances = self.balances.borrow_mut();
        let from_balance = balances.get(&(asset, from)).copied().unwrap_or_default();
        let debited = from_balance
            .checked_sub(&amount)
            .ok_or(PoolError::TransferFailed("insufficient balance"))?;
        if from == to {
            return Ok(());
        }
        let credited = balances
            .get(&(asset, to))
            .copied()
            .unwrap_or_default()
            .safe_add(&amount)?;
        balances.insert((asset, from), debited);
        balances.insert((asset, to), credited);
        Ok(())
    }
}

impl AssetLedger for InMemoryLedger {
    fn pull(&self, asset: Address, from: Address, to: Address, amount: Amount) -> Result<()> {
        self.transfer(asset, from, to, amount)
    }

    fn push(&self, asset: Address, from: Address, to: Address, amount: Amount) -> Result<()> {
        self.transfer(asset, from, to, amount)
    }
}
