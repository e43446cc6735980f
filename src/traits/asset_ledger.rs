//! Asset transfer capability.
//!
//! [`AssetLedger`] is the pool's only way to move fungible assets.  The pool
//! never reads ledger balances for pricing: its own registry is the source
//! of truth, and the ledger is asked to move exactly the amounts the pool
//! computed.
//!
//! # Contract
//!
//! - A call either moves exactly `amount` or returns an error and moves
//!   nothing.
//! - Implementations may call back into the pool (as a token hook would).
//!   Every such call observes the pool's reentrancy guard and fails with
//!   [`PoolError::Reentry`](crate::error::PoolError::Reentry).

use std::rc::Rc;

use crate::domain::{Address, Amount};
use crate::error::Result;

/// Moves fungible assets between accounts.
pub trait AssetLedger {
    /// Moves `amount` of `asset` from an external account `from` into the
    /// pool-side account `to`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::TransferFailed`](crate::error::PoolError::TransferFailed)
    /// (or any error raised by a callback) if the transfer cannot happen.
    fn pull(&self, asset: Address, from: Address, to: Address, amount: Amount) -> Result<()>;

    /// Moves `amount` of `asset` from the pool-side account `from` to an
    /// external account `to`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::TransferFailed`](crate::error::PoolError::TransferFailed)
    /// (or any error raised by a callback) if the transfer cannot happen.
    fn push(&self, asset: Address, from: Address, to: Address, amount: Amount) -> Result<()>;
}

impl<L: AssetLedger + ?Sized> AssetLedger for &L {
    fn pull(&self, asset: Address, from: Address, to: Address, amount: Amount) -> Result<()> {
        (**self).pull(asset, from, to, amount)
    }

    fn push(&self, asset: Address, from: Address, to: Address, amount: Amount) -> Result<()> {
        (**self).push(asset, from, to, amount)
    }
}

impl<L: AssetLedger + ?Sized> AssetLedger for Rc<L> {
    fn pull(&self, asset: Address, from: Address, to: Address, amount: Amount) -> Result<()> {
        (**self).pull(asset, from, to, amount)
    }

    fn push(&self, asset: Address, from: Address, to: Address, amount: Amount) -> Result<()> {
        (**self).push(asset, from, to, amount)
    }
}
