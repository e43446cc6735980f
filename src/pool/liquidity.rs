//! Proportional and single-asset joins and exits.
//!
//! The single-asset variants carry a mirror leg: once the caller's leg is
//! applied, the same number of pool shares is offered on the other bound
//! asset to the staking collaborator, priced against the post-leg state with
//! the same formulas and fees.  A refusal leaves the caller's leg in place;
//! a failure after authorization aborts the whole call.  The collaborator's
//! `stake` or `unstake` is planned in the settlement and only runs once
//! every transfer of the call has gone through.

use tracing::debug;

use super::settlement::Settlement;
use super::state::PoolState;
use super::weighted_pool::{portion, WeightedPool};
use crate::config::limits::{MAX_IN_RATIO, MAX_OUT_RATIO};
use crate::domain::{Address, Amount, PoolEvent, Ratio, Rounding};
use crate::error::{PoolError, Result};
use crate::math::{
    bdiv, bmul, calc_pool_in_given_single_out, calc_pool_out_given_single_in,
    calc_single_in_given_pool_out, calc_single_out_given_pool_in, CheckedArithmetic, PoolTotals,
    Side,
};
use crate::traits::{AssetLedger, SideStaking};

impl<L: AssetLedger, S: SideStaking> WeightedPool<L, S> {
    /// Mints exactly `pool_amount_out` shares against a proportional deposit
    /// of both assets.
    ///
    /// `max_amounts_in` is in bind order; the amounts charged are returned
    /// in the same order.
    ///
    /// # Errors
    ///
    /// [`PoolError::NotFinalized`], [`PoolError::Approximation`] if the share
    /// ratio or a deposit rounds to zero, [`PoolError::LimitInExceeded`], or
    /// a transfer error.
    pub fn join_pool(
        &self,
        caller: Address,
        pool_amount_out: Amount,
        max_amounts_in: [Amount; 2],
    ) -> Result<[Amount; 2]> {
        let amounts = self.transact("join_pool", |settlement| {
            self.with_state(|state| {
                state.require_finalized()?;
                let ratio = share_ratio(pool_amount_out, state.shares.total_supply())?;
                let mut amounts = [Amount::ZERO; 2];
                let assets: Vec<Address> = state.registry.assets().collect();
                for ((asset, limit), charged) in
                    assets.into_iter().zip(max_amounts_in).zip(amounts.iter_mut())
                {
                    let record = state.registry.record_mut(asset)?;
                    let amount_in = Amount::new(bmul(record.balance().get(), ratio, Rounding::Up)?);
                    if amount_in.is_zero() {
                        return Err(PoolError::Approximation("deposit rounds to zero"));
                    }
                    if amount_in > limit {
                        return Err(PoolError::LimitInExceeded);
                    }
                    record.set_balance(record.balance().safe_add(&amount_in)?);
                    state.emit(PoolEvent::Join {
                        caller,
                        asset,
                        amount: amount_in,
                    });
                    settlement.pull(asset, caller, amount_in);
                    *charged = amount_in;
                }
                mint_shares(state, caller, pool_amount_out)?;
                Ok(amounts)
            })
        })?;
        debug!(%caller, %pool_amount_out, "joined pool");
        Ok(amounts)
    }

    /// Redeems `pool_amount_in` shares for a proportional share of both
    /// balances.  The exit fee is taken in shares and sent to the factory;
    /// the remainder is burned.
    ///
    /// # Errors
    ///
    /// [`PoolError::NotFinalized`], [`PoolError::InsufficientShares`],
    /// [`PoolError::Approximation`], [`PoolError::LimitOutExceeded`], or a
    /// transfer error.
    pub fn exit_pool(
        &self,
        caller: Address,
        pool_amount_in: Amount,
        min_amounts_out: [Amount; 2],
    ) -> Result<[Amount; 2]> {
        let amounts = self.transact("exit_pool", |settlement| {
            self.with_state(|state| {
                state.require_finalized()?;
                let supply = state.shares.total_supply();
                settle_exit_shares(state, caller, pool_amount_in)?;
                let burned = supply.safe_sub(&state.shares.total_supply())?;
                let ratio = share_ratio(burned, supply)?;
                let mut amounts = [Amount::ZERO; 2];
                let assets: Vec<Address> = state.registry.assets().collect();
                for ((asset, limit), paid) in
                    assets.into_iter().zip(min_amounts_out).zip(amounts.iter_mut())
                {
                    let record = state.registry.record_mut(asset)?;
                    let amount_out =
                        Amount::new(bmul(record.balance().get(), ratio, Rounding::Down)?);
                    if amount_out.is_zero() {
                        return Err(PoolError::Approximation("withdrawal rounds to zero"));
                    }
                    if amount_out < limit {
                        return Err(PoolError::LimitOutExceeded);
                    }
                    record.set_balance(record.balance().safe_sub(&amount_out)?);
                    state.emit(PoolEvent::Exit {
                        caller,
                        asset,
                        amount: amount_out,
                    });
                    settlement.push(asset, caller, amount_out);
                    *paid = amount_out;
                }
                Ok(amounts)
            })
        })?;
        debug!(%caller, %pool_amount_in, "exited pool");
        Ok(amounts)
    }

    /// Deposits exactly `amount_in` of one asset for at least
    /// `min_pool_amount_out` shares, returning the shares minted.
    ///
    /// # Errors
    ///
    /// [`PoolError::NotFinalized`], [`PoolError::NotBound`],
    /// [`PoolError::InRatioExceeded`], [`PoolError::LimitOutExceeded`],
    /// [`PoolError::Approximation`]; mirror-leg and transfer errors.
    pub fn joinswap_extern_amount_in(
        &self,
        caller: Address,
        asset_in: Address,
        amount_in: Amount,
        min_pool_amount_out: Amount,
    ) -> Result<Amount> {
        let pool_out = self.transact("joinswap_extern_amount_in", |settlement| {
            let pool_out = self.with_state(|state| {
                state.require_finalized()?;
                let side = side_of(state, asset_in)?;
                check_in_ratio(side, amount_in)?;
                let pool_out = calc_pool_out_given_single_in(
                    side,
                    totals_of(state)?,
                    amount_in,
                    state.swap_fee,
                )?;
                if pool_out.is_zero() {
                    return Err(PoolError::Approximation("shares out round to zero"));
                }
                if pool_out < min_pool_amount_out {
                    return Err(PoolError::LimitOutExceeded);
                }
                apply_single_join(state, settlement, caller, asset_in, amount_in, pool_out)?;
                Ok(pool_out)
            })?;
            self.mirror_join(settlement, asset_in, pool_out)?;
            Ok(pool_out)
        })?;
        debug!(%caller, %asset_in, %amount_in, %pool_out, "single-asset join");
        Ok(pool_out)
    }

    /// Mints exactly `pool_amount_out` shares for at most `max_amount_in` of
    /// one asset, returning the amount charged.
    ///
    /// # Errors
    ///
    /// As [`joinswap_extern_amount_in`](Self::joinswap_extern_amount_in),
    /// with [`PoolError::LimitInExceeded`] for the input bound.
    pub fn joinswap_pool_amount_out(
        &self,
        caller: Address,
        asset_in: Address,
        pool_amount_out: Amount,
        max_amount_in: Amount,
    ) -> Result<Amount> {
        let amount_in = self.transact("joinswap_pool_amount_out", |settlement| {
            let amount_in = self.with_state(|state| {
                state.require_finalized()?;
                let side = side_of(state, asset_in)?;
                let amount_in = calc_single_in_given_pool_out(
                    side,
                    totals_of(state)?,
                    pool_amount_out,
                    state.swap_fee,
                )?;
                if amount_in.is_zero() {
                    return Err(PoolError::Approximation("deposit rounds to zero"));
                }
                if amount_in > max_amount_in {
                    return Err(PoolError::LimitInExceeded);
                }
                check_in_ratio(side, amount_in)?;
                apply_single_join(state, settlement, caller, asset_in, amount_in, pool_amount_out)?;
                Ok(amount_in)
            })?;
            self.mirror_join(settlement, asset_in, pool_amount_out)?;
            Ok(amount_in)
        })?;
        debug!(%caller, %asset_in, %amount_in, %pool_amount_out, "single-asset join");
        Ok(amount_in)
    }

    /// Redeems exactly `pool_amount_in` shares for at least `min_amount_out`
    /// of one asset, returning the amount paid.
    ///
    /// # Errors
    ///
    /// [`PoolError::NotFinalized`], [`PoolError::NotBound`],
    /// [`PoolError::OutRatioExceeded`], [`PoolError::LimitOutExceeded`],
    /// [`PoolError::Approximation`], [`PoolError::InsufficientShares`];
    /// mirror-leg and transfer errors.
    pub fn exitswap_pool_amount_in(
        &self,
        caller: Address,
        asset_out: Address,
        pool_amount_in: Amount,
        min_amount_out: Amount,
    ) -> Result<Amount> {
        let amount_out = self.transact("exitswap_pool_amount_in", |settlement| {
            let amount_out = self.with_state(|state| {
                state.require_finalized()?;
                let side = side_of(state, asset_out)?;
                let amount_out = calc_single_out_given_pool_in(
                    side,
                    totals_of(state)?,
                    pool_amount_in,
                    state.swap_fee,
                    state.exit_fee,
                )?;
                if amount_out.is_zero() {
                    return Err(PoolError::Approximation("withdrawal rounds to zero"));
                }
                if amount_out < min_amount_out {
                    return Err(PoolError::LimitOutExceeded);
                }
                check_out_ratio(side, amount_out)?;
                apply_single_exit(state, settlement, caller, asset_out, amount_out, pool_amount_in)?;
                Ok(amount_out)
            })?;
            self.mirror_exit(settlement, asset_out, pool_amount_in)?;
            Ok(amount_out)
        })?;
        debug!(%caller, %asset_out, %amount_out, %pool_amount_in, "single-asset exit");
        Ok(amount_out)
    }

    /// Withdraws exactly `amount_out` of one asset for at most
    /// `max_pool_amount_in` shares, returning the shares redeemed.
    ///
    /// # Errors
    ///
    /// As [`exitswap_pool_amount_in`](Self::exitswap_pool_amount_in), with
    /// [`PoolError::LimitInExceeded`] for the share bound.
    pub fn exitswap_extern_amount_out(
        &self,
        caller: Address,
        asset_out: Address,
        amount_out: Amount,
        max_pool_amount_in: Amount,
    ) -> Result<Amount> {
        let pool_in = self.transact("exitswap_extern_amount_out", |settlement| {
            let pool_in = self.with_state(|state| {
                state.require_finalized()?;
                let side = side_of(state, asset_out)?;
                check_out_ratio(side, amount_out)?;
                let pool_in = calc_pool_in_given_single_out(
                    side,
                    totals_of(state)?,
                    amount_out,
                    state.swap_fee,
                    state.exit_fee,
                )?;
                if pool_in.is_zero() {
                    return Err(PoolError::Approximation("shares in round to zero"));
                }
                if pool_in > max_pool_amount_in {
                    return Err(PoolError::LimitInExceeded);
                }
                apply_single_exit(state, settlement, caller, asset_out, amount_out, pool_in)?;
                Ok(pool_in)
            })?;
            self.mirror_exit(settlement, asset_out, pool_in)?;
            Ok(pool_in)
        })?;
        debug!(%caller, %asset_out, %amount_out, %pool_in, "single-asset exit");
        Ok(pool_in)
    }

    // -- quotes -------------------------------------------------------------

    /// Shares a deposit of `amount_in` would mint.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`], [`PoolError::NotBound`], arithmetic errors.
    pub fn quote_pool_out_single_in(&self, asset_in: Address, amount_in: Amount) -> Result<Amount> {
        self.read(|state| {
            calc_pool_out_given_single_in(
                side_of(state, asset_in)?,
                totals_of(state)?,
                amount_in,
                state.swap_fee,
            )
        })
    }

    /// Deposit of `asset_in` needed to mint `pool_amount_out` shares.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`], [`PoolError::NotBound`], arithmetic errors.
    pub fn quote_single_in_pool_out(
        &self,
        asset_in: Address,
        pool_amount_out: Amount,
    ) -> Result<Amount> {
        self.read(|state| {
            calc_single_in_given_pool_out(
                side_of(state, asset_in)?,
                totals_of(state)?,
                pool_amount_out,
                state.swap_fee,
            )
        })
    }

    /// Amount of `asset_out` paid for redeeming `pool_amount_in` shares.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`], [`PoolError::NotBound`], arithmetic errors.
    pub fn quote_single_out_pool_in(
        &self,
        asset_out: Address,
        pool_amount_in: Amount,
    ) -> Result<Amount> {
        self.read(|state| {
            calc_single_out_given_pool_in(
                side_of(state, asset_out)?,
                totals_of(state)?,
                pool_amount_in,
                state.swap_fee,
                state.exit_fee,
            )
        })
    }

    /// Shares redeemed for withdrawing exactly `amount_out`.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`], [`PoolError::NotBound`], arithmetic errors.
    pub fn quote_pool_in_single_out(&self, asset_out: Address, amount_out: Amount) -> Result<Amount> {
        self.read(|state| {
            calc_pool_in_given_single_out(
                side_of(state, asset_out)?,
                totals_of(state)?,
                amount_out,
                state.swap_fee,
                state.exit_fee,
            )
        })
    }

    // -- mirror legs --------------------------------------------------------

    /// Offers the collaborator a deposit on the asset paired with
    /// `paired_asset` that mints `pool_out` shares.
    fn mirror_join(
        &self,
        settlement: &mut Settlement,
        paired_asset: Address,
        pool_out: Amount,
    ) -> Result<()> {
        let (asset, side, amount_in) = self.with_state(|state| {
            let asset = state.registry.other(paired_asset)?;
            let side = side_of(state, asset)?;
            let amount_in =
                calc_single_in_given_pool_out(side, totals_of(state)?, pool_out, state.swap_fee)?;
            Ok((asset, side, amount_in))
        })?;
        if amount_in.is_zero() {
            debug!(%asset, "mirror join rounds to zero, skipped");
            return Ok(());
        }
        if !self.staking().can_stake(asset, paired_asset, amount_in) {
            debug!(%asset, %amount_in, "staking declined mirror join");
            return Ok(());
        }
        check_in_ratio(side, amount_in)?;
        let account = self.staking().account();
        self.with_state(|state| {
            apply_single_join(state, settlement, account, asset, amount_in, pool_out)
        })?;
        settlement.stake(asset, paired_asset, amount_in);
        debug!(%asset, %amount_in, %pool_out, "mirror join applied");
        Ok(())
    }

    /// Offers the collaborator a redemption of `pool_in` shares for the asset
    /// paired with `paired_asset`.
    fn mirror_exit(
        &self,
        settlement: &mut Settlement,
        paired_asset: Address,
        pool_in: Amount,
    ) -> Result<()> {
        let (asset, side, amount_out) = self.with_state(|state| {
            let asset = state.registry.other(paired_asset)?;
            let side = side_of(state, asset)?;
            let amount_out = calc_single_out_given_pool_in(
                side,
                totals_of(state)?,
                pool_in,
                state.swap_fee,
                state.exit_fee,
            )?;
            Ok((asset, side, amount_out))
        })?;
        if amount_out.is_zero() {
            debug!(%asset, "mirror exit rounds to zero, skipped");
            return Ok(());
        }
        if !self.staking().can_unstake(asset, paired_asset, pool_in) {
            debug!(%asset, %pool_in, "staking declined mirror exit");
            return Ok(());
        }
        check_out_ratio(side, amount_out)?;
        let account = self.staking().account();
        self.with_state(|state| {
            apply_single_exit(state, settlement, account, asset, amount_out, pool_in)
        })?;
        settlement.unstake(asset, paired_asset, amount_out, pool_in);
        debug!(%asset, %amount_out, %pool_in, "mirror exit applied");
        Ok(())
    }
}

// -- helpers ----------------------------------------------------------------

fn side_of(state: &PoolState, asset: Address) -> Result<Side> {
    let record = state.registry.record(asset)?;
    Ok(Side::new(record.balance(), record.weight()))
}

fn totals_of(state: &PoolState) -> Result<PoolTotals> {
    Ok(PoolTotals::new(
        state.shares.total_supply(),
        state.registry.total_weight()?,
    ))
}

fn check_in_ratio(side: Side, amount_in: Amount) -> Result<()> {
    if amount_in > portion(side.balance, Ratio::new(MAX_IN_RATIO), Rounding::Down)? {
        return Err(PoolError::InRatioExceeded);
    }
    Ok(())
}

fn check_out_ratio(side: Side, amount_out: Amount) -> Result<()> {
    if amount_out > portion(side.balance, Ratio::new(MAX_OUT_RATIO), Rounding::Down)? {
        return Err(PoolError::OutRatioExceeded);
    }
    Ok(())
}

/// `shares / supply`, failing when it rounds to zero.
fn share_ratio(shares: Amount, supply: Amount) -> Result<u128> {
    let ratio = bdiv(shares.get(), supply.get(), Rounding::HalfUp)?;
    if ratio == 0 {
        return Err(PoolError::Approximation("share ratio rounds to zero"));
    }
    Ok(ratio)
}

fn mint_shares(state: &mut PoolState, to: Address, amount: Amount) -> Result<()> {
    state.shares.mint(to, amount)?;
    state.emit(PoolEvent::SharesMinted { to, amount });
    Ok(())
}

/// Moves the exit-fee portion of `pool_in` to the factory and burns the
/// rest.
fn settle_exit_shares(state: &mut PoolState, from: Address, pool_in: Amount) -> Result<()> {
    let fee = portion(pool_in, state.exit_fee, Rounding::Down)?;
    let burned = pool_in.safe_sub(&fee)?;
    let factory = state.factory;
    state.shares.transfer(from, factory, fee)?;
    state.shares.burn(from, burned)
}

fn apply_single_join(
    state: &mut PoolState,
    settlement: &mut Settlement,
    account: Address,
    asset: Address,
    amount_in: Amount,
    pool_out: Amount,
) -> Result<()> {
    let record = state.registry.record_mut(asset)?;
    record.set_balance(record.balance().safe_add(&amount_in)?);
    state.emit(PoolEvent::Join {
        caller: account,
        asset,
        amount: amount_in,
    });
    mint_shares(state, account, pool_out)?;
    settlement.pull(asset, account, amount_in);
    Ok(())
}

fn apply_single_exit(
    state: &mut PoolState,
    settlement: &mut Settlement,
    account: Address,
    asset: Address,
    amount_out: Amount,
    pool_in: Amount,
) -> Result<()> {
    settle_exit_shares(state, account, pool_in)?;
    let record = state.registry.record_mut(asset)?;
    record.set_balance(record.balance().safe_sub(&amount_out)?);
    state.emit(PoolEvent::Exit {
        caller: account,
        asset,
        amount: amount_out,
    });
    settlement.push(asset, account, amount_out);
    Ok(())
}
