//! Fixed-capacity registry of bound assets.

use crate::config::limits::MAX_BOUND_ASSETS;
use crate::domain::{Address, AssetRecord, Ratio};
use crate::error::{PoolError, Result};
use crate::math::CheckedArithmetic;

/// Bound assets keyed by address, enumerated in bind order.
///
/// Slots are kept compact: the first `len()` slots are occupied and a
/// record's index always equals its slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AssetRegistry {
    slots: [Option<(Address, AssetRecord)>; MAX_BOUND_ASSETS],
}

impl AssetRegistry {
    pub(crate) fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.len() == MAX_BOUND_ASSETS
    }

    pub(crate) fn contains(&self, asset: Address) -> bool {
        self.get(asset).is_some()
    }

    pub(crate) fn get(&self, asset: Address) -> Option<&AssetRecord> {
        self.slots
            .iter()
            .flatten()
            .find(|(addr, _)| *addr == asset)
            .map(|(_, record)| record)
    }

    pub(crate) fn get_mut(&mut self, asset: Address) -> Option<&mut AssetRecord> {
        self.slots
            .iter_mut()
            .flatten()
            .find(|(addr, _)| *addr == asset)
            .map(|(_, record)| record)
    }

    /// Record of a bound asset.
    pub(crate) fn record(&self, asset: Address) -> Result<AssetRecord> {
        self.get(asset).copied().ok_or(PoolError::NotBound)
    }

    pub(crate) fn record_mut(&mut self, asset: Address) -> Result<&mut AssetRecord> {
        self.get_mut(asset).ok_or(PoolError::NotBound)
    }

    /// Bound assets in bind order.
    pub(crate) fn assets(&self) -> impl Iterator<Item = Address> + '_ {
        self.slots.iter().flatten().map(|(addr, _)| *addr)
    }

    /// The bound asset other than `asset`.
    pub(crate) fn other(&self, asset: Address) -> Result<Address> {
        self.assets()
            .find(|addr| *addr != asset)
            .ok_or(PoolError::NotBound)
    }

    /// Sum of denormalized weights.
    pub(crate) fn total_weight(&self) -> Result<Ratio> {
        self.slots
            .iter()
            .flatten()
            .try_fold(Ratio::ZERO, |acc, (_, record)| acc.safe_add(&record.weight()))
    }

    /// Adds an empty record for `asset` in the next free slot.
    pub(crate) fn insert(&mut self, asset: Address) -> Result<()> {
        if self.contains(asset) {
            return Err(PoolError::AlreadyBound);
        }
        let index = self.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(PoolError::MaxTokensExceeded)?;
        *slot = Some((asset, AssetRecord::empty(index)));
        Ok(())
    }

    /// Removes `asset`, shifting later records down one slot.
    pub(crate) fn remove(&mut self, asset: Address) -> Result<AssetRecord> {
        let position = self
            .slots
            .iter()
            .position(|slot| matches!(slot, Some((addr, _)) if *addr == asset))
            .ok_or(PoolError::NotBound)?;
        let removed = self
            .slots
            .get_mut(position)
            .and_then(Option::take)
            .map(|(_, record)| record)
            .ok_or(PoolError::NotBound)?;
        let mut remaining: Vec<(Address, AssetRecord)> =
            self.slots.iter_mut().filter_map(Option::take).collect();
        for (index, (_, record)) in remaining.iter_mut().enumerate() {
            record.set_index(index);
        }
        for (slot, entry) in self.slots.iter_mut().zip(remaining) {
            *slot = Some(entry);
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 32])
    }

    fn with(assets: &[u8]) -> AssetRegistry {
        let mut registry = AssetRegistry::default();
        for byte in assets {
            let Ok(()) = registry.insert(addr(*byte)) else {
                panic!("insert");
            };
        }
        registry
    }

    #[test]
    fn insert_in_bind_order() {
        let registry = with(&[7, 3]);
        let assets: Vec<Address> = registry.assets().collect();
        assert_eq!(assets, vec![addr(7), addr(3)]);
        assert_eq!(registry.record(addr(3)).map(|r| r.index()), Ok(1));
        assert!(registry.is_full());
    }

    #[test]
    fn duplicate_and_third_asset_rejected() {
        let mut registry = with(&[1]);
        assert_eq!(registry.insert(addr(1)), Err(PoolError::AlreadyBound));
        let Ok(()) = registry.insert(addr(2)) else {
            panic!("insert");
        };
        assert_eq!(registry.insert(addr(3)), Err(PoolError::MaxTokensExceeded));
    }

    #[test]
    fn remove_compacts_and_reindexes() {
        let mut registry = with(&[1, 2]);
        assert!(registry.remove(addr(1)).is_ok());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.record(addr(2)).map(|r| r.index()), Ok(0));
        assert_eq!(registry.remove(addr(1)), Err(PoolError::NotBound));
        let Ok(()) = registry.insert(addr(5)) else {
            panic!("insert");
        };
        assert_eq!(registry.record(addr(5)).map(|r| r.index()), Ok(1));
    }

    #[test]
    fn total_weight_sums_records() {
        let mut registry = with(&[1, 2]);
        if let Ok(record) = registry.record_mut(addr(1)) {
            record.set_weight(Ratio::from_integer(3));
        }
        if let Ok(record) = registry.record_mut(addr(2)) {
            record.set_weight(Ratio::from_integer(4));
        }
        assert_eq!(registry.total_weight(), Ok(Ratio::from_integer(7)));
    }

    #[test]
    fn other_asset() {
        let registry = with(&[1, 2]);
        assert_eq!(registry.other(addr(1)), Ok(addr(2)));
        assert_eq!(registry.other(addr(2)), Ok(addr(1)));
        assert_eq!(with(&[1]).other(addr(1)), Err(PoolError::NotBound));
    }
}
