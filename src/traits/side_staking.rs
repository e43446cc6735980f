//! Auto-staking collaborator.
//!
//! When a liquidity provider joins or exits with a single asset, the pool
//! offers the matching leg on the other bound asset to a staking
//! collaborator.  The collaborator first authorizes the leg
//! ([`SideStaking::can_stake`] / [`SideStaking::can_unstake`]), then
//! performs its own accounting ([`SideStaking::stake`] /
//! [`SideStaking::unstake`]) before the pool settles transfers with its
//! [`SideStaking::account`].
//!
//! A refusal is not an error: the caller's leg still commits and no mirror
//! leg happens.

use std::rc::Rc;

use crate::domain::{Address, Amount};
use crate::error::{PoolError, Result};

/// Cooperating liquidity provider that mirrors single-asset joins and exits.
///
/// `asset` is the asset the collaborator provides (the leg being mirrored),
/// `paired_asset` the asset the caller used.
pub trait SideStaking {
    /// Account that supplies and receives the mirrored leg.
    fn account(&self) -> Address;

    /// Whether the collaborator will provide `amount` of `asset`.
    fn can_stake(&self, asset: Address, paired_asset: Address, amount: Amount) -> bool;

    /// Whether the collaborator will redeem `shares` pool shares for
    /// `asset`.
    fn can_unstake(&self, asset: Address, paired_asset: Address, shares: Amount) -> bool;

    /// Records a stake of `amount` of `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::StakingFailed`] if the stake cannot be recorded.
    fn stake(&self, asset: Address, paired_asset: Address, amount: Amount) -> Result<()>;

    /// Records the redemption of `shares` pool shares for `amount` of
    /// `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::StakingFailed`] if the redemption cannot be
    /// recorded.
    fn unstake(
        &self,
        asset: Address,
        paired_asset: Address,
        amount: Amount,
        shares: Amount,
    ) -> Result<()>;
}

/// A collaborator that never authorizes a mirror leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoStaking;

impl SideStaking for NoStaking {
    fn account(&self) -> Address {
        Address::zero()
    }

    fn can_stake(&self, _asset: Address, _paired_asset: Address, _amount: Amount) -> bool {
        false
    }

    fn can_unstake(&self, _asset: Address, _paired_asset: Address, _shares: Amount) -> bool {
        false
    }

    fn stake(&self, _asset: Address, _paired_asset: Address, _amount: Amount) -> Result<()> {
        Err(PoolError::StakingFailed("no staking collaborator"))
    }

    fn unstake(
        &self,
        _asset: Address,
        _paired_asset: Address,
        _amount: Amount,
        _shares: Amount,
    ) -> Result<()> {
        Err(PoolError::StakingFailed("no staking collaborator"))
    }
}

impl<S: SideStaking + ?Sized> SideStaking for Rc<S> {
    fn account(&self) -> Address {
        (**self).account()
    }

    fn can_stake(&self, asset: Address, paired_asset: Address, amount: Amount) -> bool {
        (**self).can_stake(asset, paired_asset, amount)
    }

    fn can_unstake(&self, asset: Address, paired_asset: Address, shares: Amount) -> bool {
        (**self).can_unstake(asset, paired_asset, shares)
    }

    fn stake(&self, asset: Address, paired_asset: Address, amount: Amount) -> Result<()> {
        (**self).stake(asset, paired_asset, amount)
    }

    fn unstake(
        &self,
        asset: Address,
        paired_asset: Address,
        amount: Amount,
        shares: Amount,
    ) -> Result<()> {
        (**self).unstake(asset, paired_asset, amount, shares)
    }
}
