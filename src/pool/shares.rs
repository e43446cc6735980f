//! Pool-share balances and supply.

use std::collections::BTreeMap;

use crate::domain::{Address, Amount};
use crate::error::{PoolError, Result};
use crate::math::CheckedArithmetic;

/// Fungible pool-share accounting.
///
/// `total_supply` always equals the sum of all balances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ShareLedger {
    total_supply: Amount,
    balances: BTreeMap<Address, Amount>,
}

impl ShareLedger {
    pub(crate) fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub(crate) fn balance_of(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    pub(crate) fn mint(&mut self, to: Address, amount: Amount) -> Result<()> {
        let supply = self.total_supply.safe_add(&amount)?;
        let balance = self.balance_of(to).safe_add(&amount)?;
        self.total_supply = supply;
        self.balances.insert(to, balance);
        Ok(())
    }

    pub(crate) fn burn(&mut self, from: Address, amount: Amount) -> Result<()> {
        let balance = self
            .balance_of(from)
            .checked_sub(&amount)
            .ok_or(PoolError::InsufficientShares)?;
        let supply = self.total_supply.safe_sub(&amount)?;
        self.total_supply = supply;
        self.balances.insert(from, balance);
        Ok(())
    }

    pub(crate) fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<()> {
        let debited = self
            .balance_of(from)
            .checked_sub(&amount)
            .ok_or(PoolError::InsufficientShares)?;
        if from == to {
            return Ok(());
        }
        let credited = self.balance_of(to).safe_add(&amount)?;
        self.balances.insert(from, debited);
        self.balances.insert(to, credited);
        Ok(())
    }
}
