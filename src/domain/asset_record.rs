//! Per-asset bookkeeping held by the registry.

use serde::{Deserialize, Serialize};

use super::{Amount, Ratio};

/// The registry entry for one bound asset.
///
/// `index` is the bind-order position, used only to enumerate assets in a
/// stable order.  `weight` is the denormalized weight; the normalized weight
/// is `weight / total_weight`.  `balance` is the pool-owned amount that
/// participates in pricing; accrued platform and publisher fees are held
/// outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    index: usize,
    weight: Ratio,
    balance: Amount,
}

impl AssetRecord {
    /// A freshly bound record with zero weight and balance.
    pub(crate) const fn empty(index: usize) -> Self {
        Self {
            index,
            weight: Ratio::ZERO,
            balance: Amount::ZERO,
        }
    }

    /// Bind-order position.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Denormalized weight.
    pub const fn weight(&self) -> Ratio {
        self.weight
    }

    /// Pool balance used for pricing.
    pub const fn balance(&self) -> Amount {
        self.balance
    }

    /// Records only exist for bound assets.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        true
    }

    pub(crate) fn set_weight(&mut self, weight: Ratio) {
        self.weight = weight;
    }

    pub(crate) fn set_balance(&mut self, balance: Amount) {
        self.balance = balance;
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}
