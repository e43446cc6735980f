//! Controller operations, lifecycle and fee collection.

use tracing::info;

use super::settlement::Settlement;
use super::state::PoolState;
use super::weighted_pool::{portion, WeightedPool};
use crate::config::check_fee;
use crate::config::limits::{
    INIT_POOL_SUPPLY, MAX_BOUND_ASSETS, MAX_TOTAL_WEIGHT, MAX_WEIGHT, MIN_BALANCE, MIN_WEIGHT,
};
use crate::domain::{Address, Amount, PoolEvent, Ratio, Rounding};
use crate::error::{PoolError, Result};
use crate::math::CheckedArithmetic;
use crate::traits::{AssetLedger, SideStaking};

/// An asset with its initial balance and denormalized weight, as passed to
/// [`WeightedPool::setup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// Asset to bind.
    pub asset: Address,
    /// Balance pulled from the controller.
    pub balance: Amount,
    /// Denormalized weight.
    pub weight: Ratio,
}

impl Binding {
    /// Creates a binding.
    #[must_use]
    pub const fn new(asset: Address, balance: Amount, weight: Ratio) -> Self {
        Self {
            asset,
            balance,
            weight,
        }
    }
}

impl<L: AssetLedger, S: SideStaking> WeightedPool<L, S> {
    /// Registers `asset` and pulls `balance` of it from the controller.
    ///
    /// # Errors
    ///
    /// - [`PoolError::NotController`], [`PoolError::AlreadyBound`],
    ///   [`PoolError::AlreadyFinalized`], [`PoolError::MaxTokensExceeded`].
    /// - Any [`rebind`](Self::rebind) error.
    pub fn bind(&self, caller: Address, asset: Address, balance: Amount, weight: Ratio) -> Result<()> {
        self.transact("bind", |settlement| {
            self.with_state(|state| bind_in(state, settlement, caller, Binding::new(asset, balance, weight)))
        })?;
        info!(%asset, %balance, %weight, "asset bound");
        Ok(())
    }

    /// Changes the weight and balance of a bound asset before finalization.
    ///
    /// A balance increase is pulled from the controller.  A decrease is paid
    /// to the controller minus the exit fee, which goes to the factory.
    ///
    /// # Errors
    ///
    /// - [`PoolError::NotController`], [`PoolError::NotBound`],
    ///   [`PoolError::AlreadyFinalized`].
    /// - [`PoolError::WeightOutOfRange`], [`PoolError::BalanceTooLow`],
    ///   [`PoolError::TotalWeightExceeded`].
    /// - Transfer errors.
    pub fn rebind(&self, caller: Address, asset: Address, balance: Amount, weight: Ratio) -> Result<()> {
        self.transact("rebind", |settlement| {
            self.with_state(|state| rebind_in(state, settlement, caller, Binding::new(asset, balance, weight)))
        })?;
        info!(%asset, %balance, %weight, "asset rebound");
        Ok(())
    }

    /// Removes a bound asset before finalization, returning its balance to
    /// the controller minus the exit fee.
    ///
    /// # Errors
    ///
    /// [`PoolError::NotController`], [`PoolError::NotBound`],
    /// [`PoolError::AlreadyFinalized`], or a transfer error.
    pub fn unbind(&self, caller: Address, asset: Address) -> Result<()> {
        self.transact("unbind", |settlement| {
            self.with_state(|state| {
                state.require_controller(caller)?;
                state.registry.record(asset)?;
                state.require_unfinalized()?;
                let removed = state.registry.remove(asset)?;
                pay_with_exit_fee(state, settlement, asset, caller, removed.balance())
            })
        })?;
        info!(%asset, "asset unbound");
        Ok(())
    }

    /// Freezes the registry, enables public trading and mints
    /// `INIT_POOL_SUPPLY` shares to the controller.
    ///
    /// # Errors
    ///
    /// [`PoolError::NotController`], [`PoolError::AlreadyFinalized`],
    /// [`PoolError::MinTokensRequired`].
    pub fn finalize(&self, caller: Address) -> Result<()> {
        self.transact("finalize", |_| self.with_state(|state| finalize_in(state, caller)))?;
        info!(%caller, "pool finalized");
        Ok(())
    }

    /// Binds the data asset and the base asset and finalizes, in one call.
    ///
    /// # Errors
    ///
    /// Any error of [`bind`](Self::bind) or [`finalize`](Self::finalize);
    /// nothing is applied unless every step succeeds.
    pub fn setup(&self, caller: Address, data: Binding, base: Binding) -> Result<()> {
        self.transact("setup", |settlement| {
            self.with_state(|state| {
                bind_in(state, settlement, caller, data)?;
                bind_in(state, settlement, caller, base)?;
                finalize_in(state, caller)
            })
        })?;
        info!(data = %data.asset, base = %base.asset, "pool set up");
        Ok(())
    }

    /// Opens or closes swapping before finalization.
    ///
    /// # Errors
    ///
    /// [`PoolError::NotController`] or [`PoolError::AlreadyFinalized`].
    pub fn set_public_swap(&self, caller: Address, public: bool) -> Result<()> {
        self.transact("set_public_swap", |_| {
            self.with_state(|state| {
                state.require_controller(caller)?;
                state.require_unfinalized()?;
                state.public_swap = public;
                Ok(())
            })
        })?;
        info!(public, "public swap changed");
        Ok(())
    }

    /// Hands control of the pool to `controller`.
    ///
    /// # Errors
    ///
    /// [`PoolError::NotController`], or [`PoolError::InvalidArgument`] for
    /// the zero address.
    pub fn set_controller(&self, caller: Address, controller: Address) -> Result<()> {
        self.transact("set_controller", |_| {
            self.with_state(|state| {
                state.require_controller(caller)?;
                if controller.is_zero() {
                    return Err(PoolError::InvalidArgument("controller is the zero address"));
                }
                state.controller = controller;
                state.emit(PoolEvent::ControllerChanged { caller, controller });
                Ok(())
            })
        })?;
        info!(%controller, "controller changed");
        Ok(())
    }

    /// Sets the liquidity-provider swap fee.
    ///
    /// # Errors
    ///
    /// [`PoolError::NotController`] or [`PoolError::FeeOutOfRange`].
    pub fn set_swap_fee(&self, caller: Address, fee: Ratio) -> Result<()> {
        self.transact("set_swap_fee", |_| {
            self.with_state(|state| {
                state.require_controller(caller)?;
                check_fee(fee, "swap fee")?;
                state.swap_fee = fee;
                state.emit(PoolEvent::SwapFeeChanged { caller, fee });
                Ok(())
            })
        })?;
        info!(%fee, "swap fee changed");
        Ok(())
    }

    /// Replaces the publisher-market fee collector and rate.  Only the
    /// current collector may call this.
    ///
    /// # Errors
    ///
    /// [`PoolError::NotMarketFeeCollector`], [`PoolError::FeeOutOfRange`],
    /// or [`PoolError::InvalidArgument`] for a zero collector.
    pub fn update_publisher_market_fee(
        &self,
        caller: Address,
        collector: Address,
        fee: Ratio,
    ) -> Result<()> {
        self.transact("update_publisher_market_fee", |_| {
            self.with_state(|state| {
                if caller != state.publisher_collector {
                    return Err(PoolError::NotMarketFeeCollector);
                }
                check_fee(fee, "publisher market fee")?;
                if collector.is_zero() {
                    return Err(PoolError::InvalidArgument("collector is the zero address"));
                }
                state.publisher_collector = collector;
                state.publisher_market_fee = fee;
                state.emit(PoolEvent::PublisherFeeCollectorChanged {
                    caller,
                    collector,
                    fee,
                });
                Ok(())
            })
        })?;
        info!(%collector, %fee, "publisher market fee changed");
        Ok(())
    }

    /// Pays every accrued platform fee to the platform collector.
    ///
    /// Returns the `(asset, amount)` pairs paid; a second call in a row
    /// returns nothing.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`] or a transfer error.
    pub fn collect_platform_fees(&self, caller: Address) -> Result<Vec<(Address, Amount)>> {
        let paid = self.transact("collect_platform_fees", |settlement| {
            self.with_state(|state| {
                let collector = state.platform_collector;
                let drained = state.fees.drain_platform();
                for &(asset, amount) in &drained {
                    settlement.push(asset, collector, amount);
                    state.emit(PoolEvent::PlatformFeeCollected {
                        caller,
                        collector,
                        asset,
                        amount,
                    });
                }
                Ok(drained)
            })
        })?;
        info!(entries = paid.len(), "platform fees collected");
        Ok(paid)
    }

    /// Pays every accrued publisher-market fee to the publisher collector.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`] or a transfer error.
    pub fn collect_market_fees(&self, caller: Address) -> Result<Vec<(Address, Amount)>> {
        let paid = self.transact("collect_market_fees", |settlement| {
            self.with_state(|state| {
                let collector = state.publisher_collector;
                let drained = state.fees.drain_publisher();
                for &(asset, amount) in &drained {
                    settlement.push(asset, collector, amount);
                    state.emit(PoolEvent::PublisherFeeCollected {
                        caller,
                        collector,
                        asset,
                        amount,
                    });
                }
                Ok(drained)
            })
        })?;
        info!(entries = paid.len(), "publisher market fees collected");
        Ok(paid)
    }
}

// -- state transitions ------------------------------------------------------

fn bind_in(
    state: &mut PoolState,
    settlement: &mut Settlement,
    caller: Address,
    binding: Binding,
) -> Result<()> {
    state.require_controller(caller)?;
    if state.registry.contains(binding.asset) {
        return Err(PoolError::AlreadyBound);
    }
    state.require_unfinalized()?;
    if state.registry.is_full() {
        return Err(PoolError::MaxTokensExceeded);
    }
    state.registry.insert(binding.asset)?;
    rebind_in(state, settlement, caller, binding)
}

fn rebind_in(
    state: &mut PoolState,
    settlement: &mut Settlement,
    caller: Address,
    binding: Binding,
) -> Result<()> {
    let Binding {
        asset,
        balance,
        weight,
    } = binding;
    state.require_controller(caller)?;
    let old_balance = state.registry.record(asset)?.balance();
    state.require_unfinalized()?;
    if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight.get()) {
        return Err(PoolError::WeightOutOfRange);
    }
    if balance.get() < MIN_BALANCE {
        return Err(PoolError::BalanceTooLow);
    }

    let record = state.registry.record_mut(asset)?;
    record.set_weight(weight);
    record.set_balance(balance);
    if state.registry.total_weight()?.get() > MAX_TOTAL_WEIGHT {
        return Err(PoolError::TotalWeightExceeded);
    }

    if balance > old_balance {
        settlement.pull(asset, caller, balance.safe_sub(&old_balance)?);
    } else if balance < old_balance {
        let withdrawn = old_balance.safe_sub(&balance)?;
        pay_with_exit_fee(state, settlement, asset, caller, withdrawn)?;
    }
    Ok(())
}

fn finalize_in(state: &mut PoolState, caller: Address) -> Result<()> {
    state.require_controller(caller)?;
    state.require_unfinalized()?;
    if state.registry.len() < MAX_BOUND_ASSETS {
        return Err(PoolError::MinTokensRequired);
    }
    state.finalized = true;
    state.public_swap = true;
    let supply = Amount::new(INIT_POOL_SUPPLY);
    state.shares.mint(caller, supply)?;
    state.emit(PoolEvent::SharesMinted {
        to: caller,
        amount: supply,
    });
    state.emit(PoolEvent::Finalized { caller });
    Ok(())
}

/// Pays `amount` of `asset` to `to`, routing the exit-fee portion to the
/// factory.
fn pay_with_exit_fee(
    state: &PoolState,
    settlement: &mut Settlement,
    asset: Address,
    to: Address,
    amount: Amount,
) -> Result<()> {
    let fee = portion(amount, state.exit_fee, Rounding::Up)?;
    settlement.push(asset, to, amount.safe_sub(&fee)?);
    settlement.push(asset, state.factory, fee);
    Ok(())
}
