//! Accrued platform and publisher-market fees.

use std::collections::BTreeMap;

use crate::domain::{Address, Amount};
use crate::error::Result;
use crate::math::CheckedArithmetic;

/// Per-asset fee ledgers.
///
/// Entries only grow, except when drained by collection, which resets every
/// drained entry to zero.  Accrued fees are held in the pool account but
/// outside the priced balances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FeeLedger {
    platform: BTreeMap<Address, Amount>,
    publisher: BTreeMap<Address, Amount>,
}

impl FeeLedger {
    pub(crate) fn platform(&self, asset: Address) -> Amount {
        self.platform.get(&asset).copied().unwrap_or_default()
    }

    pub(crate) fn publisher(&self, asset: Address) -> Amount {
        self.publisher.get(&asset).copied().unwrap_or_default()
    }

    pub(crate) fn accrue_platform(&mut self, asset: Address, amount: Amount) -> Result<()> {
        accrue(&mut self.platform, asset, amount)
    }

    pub(crate) fn accrue_publisher(&mut self, asset: Address, amount: Amount) -> Result<()> {
        accrue(&mut self.publisher, asset, amount)
    }

    /// Zeroes the platform ledger, returning the non-zero entries.
    pub(crate) fn drain_platform(&mut self) -> Vec<(Address, Amount)> {
        drain(&mut self.platform)
    }

    /// Zeroes the publisher ledger, returning the non-zero entries.
    pub(crate) fn drain_publisher(&mut self) -> Vec<(Address, Amount)> {
        drain(&mut self.publisher)
    }
}

fn accrue(ledger: &mut BTreeMap<Address, Amount>, asset: Address, amount: Amount) -> Result<()> {
    let entry = ledger.entry(asset).or_default();
    *entry = entry.safe_add(&amount)?;
    Ok(())
}

fn drain(ledger: &mut BTreeMap<Address, Amount>) -> Vec<(Address, Amount)> {
    let drained = ledger
        .iter()
        .filter(|(_, amount)| !amount.is_zero())
        .map(|(asset, amount)| (*asset, *amount))
        .collect();
    for amount in ledger.values_mut() {
        *amount = Amount::ZERO;
    }
    drained
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 32])
    }

    #[test]
    fn accrual_accumulates() {
        let mut fees = FeeLedger::default();
        assert!(fees.accrue_platform(addr(1), Amount::new(3)).is_ok());
        assert!(fees.accrue_platform(addr(1), Amount::new(4)).is_ok());
        assert!(fees.accrue_publisher(addr(2), Amount::new(5)).is_ok());
        assert_eq!(fees.platform(addr(1)), Amount::new(7));
        assert_eq!(fees.publisher(addr(2)), Amount::new(5));
        assert_eq!(fees.publisher(addr(1)), Amount::ZERO);
    }

    #[test]
    fn drain_is_idempotent() {
        let mut fees = FeeLedger::default();
        assert!(fees.accrue_platform(addr(1), Amount::new(3)).is_ok());
        assert!(fees.accrue_platform(addr(2), Amount::ZERO).is_ok());
        assert_eq!(fees.drain_platform(), vec![(addr(1), Amount::new(3))]);
        assert_eq!(fees.platform(addr(1)), Amount::ZERO);
        assert!(fees.drain_platform().is_empty());
    }

    #[test]
    fn ledgers_are_independent() {
        let mut fees = FeeLedger::default();
        assert!(fees.accrue_platform(addr(1), Amount::new(3)).is_ok());
        assert!(fees.accrue_publisher(addr(1), Amount::new(9)).is_ok());
        let _ = fees.drain_publisher();
        assert_eq!(fees.platform(addr(1)), Amount::new(3));
    }
}
