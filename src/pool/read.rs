//! Read surface and pool-share transfers.

use tracing::debug;

use super::swap::total_fee_rate;
use super::weighted_pool::WeightedPool;
use crate::domain::{Address, Amount, PoolEvent, Ratio, Rounding};
use crate::error::Result;
use crate::math::{bdiv, calc_spot_price, Side};
use crate::traits::{AssetLedger, SideStaking};

impl<L: AssetLedger, S: SideStaking> WeightedPool<L, S> {
    // -- prices -------------------------------------------------------------

    /// Spot price of `asset_out` in `asset_in`, including the swap, platform
    /// and publisher fees plus `market_fee`.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry),
    /// [`PoolError::NotBound`](crate::error::PoolError::NotBound), or
    /// [`PoolError::FeeOutOfRange`](crate::error::PoolError::FeeOutOfRange)
    /// for a market fee above the maximum.
    pub fn spot_price(&self, asset_in: Address, asset_out: Address, market_fee: Ratio) -> Result<Ratio> {
        self.read(|state| {
            let in_record = state.registry.record(asset_in)?;
            let out_record = state.registry.record(asset_out)?;
            let fee = total_fee_rate(state, market_fee)?;
            calc_spot_price(
                Side::new(in_record.balance(), in_record.weight()),
                Side::new(out_record.balance(), out_record.weight()),
                fee,
            )
        })
    }

    /// Spot price of `asset_out` in `asset_in` without any fee.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry) or
    /// [`PoolError::NotBound`](crate::error::PoolError::NotBound).
    pub fn spot_price_sans_fee(&self, asset_in: Address, asset_out: Address) -> Result<Ratio> {
        self.read(|state| {
            let in_record = state.registry.record(asset_in)?;
            let out_record = state.registry.record(asset_out)?;
            calc_spot_price(
                Side::new(in_record.balance(), in_record.weight()),
                Side::new(out_record.balance(), out_record.weight()),
                Ratio::ZERO,
            )
        })
    }

    // -- registry -----------------------------------------------------------

    /// Weight of `asset` as a fraction of the total weight.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry) or
    /// [`PoolError::NotBound`](crate::error::PoolError::NotBound).
    pub fn normalized_weight(&self, asset: Address) -> Result<Ratio> {
        self.read(|state| {
            let weight = state.registry.record(asset)?.weight();
            let total = state.registry.total_weight()?;
            bdiv(weight.get(), total.get(), Rounding::HalfUp).map(Ratio::new)
        })
    }

    /// Denormalized weight of `asset`.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry) or
    /// [`PoolError::NotBound`](crate::error::PoolError::NotBound).
    pub fn denormalized_weight(&self, asset: Address) -> Result<Ratio> {
        self.read(|state| Ok(state.registry.record(asset)?.weight()))
    }

    /// Sum of denormalized weights.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn total_denormalized_weight(&self) -> Result<Ratio> {
        self.read(|state| state.registry.total_weight())
    }

    /// Priced balance of `asset`, excluding accrued fees.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry) or
    /// [`PoolError::NotBound`](crate::error::PoolError::NotBound).
    pub fn balance(&self, asset: Address) -> Result<Amount> {
        self.read(|state| Ok(state.registry.record(asset)?.balance()))
    }

    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn is_bound(&self, asset: Address) -> Result<bool> {
        self.read(|state| Ok(state.registry.contains(asset)))
    }

    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn num_tokens(&self) -> Result<usize> {
        self.read(|state| Ok(state.registry.len()))
    }

    /// Bound assets in bind order.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn current_tokens(&self) -> Result<Vec<Address>> {
        self.read(|state| Ok(state.registry.assets().collect()))
    }

    /// Bound assets of a finalized pool.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry) or
    /// [`PoolError::NotFinalized`](crate::error::PoolError::NotFinalized).
    pub fn final_tokens(&self) -> Result<Vec<Address>> {
        self.read(|state| {
            state.require_finalized()?;
            Ok(state.registry.assets().collect())
        })
    }

    // -- configuration ------------------------------------------------------

    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn swap_fee(&self) -> Result<Ratio> {
        self.read(|state| Ok(state.swap_fee))
    }

    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn publisher_market_fee(&self) -> Result<Ratio> {
        self.read(|state| Ok(state.publisher_market_fee))
    }

    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn platform_fee(&self) -> Result<Ratio> {
        self.read(|state| Ok(state.platform_fee))
    }

    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn exit_fee(&self) -> Result<Ratio> {
        self.read(|state| Ok(state.exit_fee))
    }

    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn is_finalized(&self) -> Result<bool> {
        self.read(|state| Ok(state.finalized))
    }

    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn is_public_swap(&self) -> Result<bool> {
        self.read(|state| Ok(state.public_swap))
    }

    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn controller(&self) -> Result<Address> {
        self.read(|state| Ok(state.controller))
    }

    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn publisher_collector(&self) -> Result<Address> {
        self.read(|state| Ok(state.publisher_collector))
    }

    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn platform_collector(&self) -> Result<Address> {
        self.read(|state| Ok(state.platform_collector))
    }

    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn factory(&self) -> Result<Address> {
        self.read(|state| Ok(state.factory))
    }

    // -- fee ledgers --------------------------------------------------------

    /// Platform fees accrued in `asset` and not yet collected.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn platform_fees(&self, asset: Address) -> Result<Amount> {
        self.read(|state| Ok(state.fees.platform(asset)))
    }

    /// Publisher-market fees accrued in `asset` and not yet collected.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn publisher_fees(&self, asset: Address) -> Result<Amount> {
        self.read(|state| Ok(state.fees.publisher(asset)))
    }

    // -- pool shares --------------------------------------------------------

    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn total_supply(&self) -> Result<Amount> {
        self.read(|state| Ok(state.shares.total_supply()))
    }

    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry).
    pub fn share_balance(&self, account: Address) -> Result<Amount> {
        self.read(|state| Ok(state.shares.balance_of(account)))
    }

    /// Moves pool shares between accounts.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry) or
    /// [`PoolError::InsufficientShares`](crate::error::PoolError::InsufficientShares).
    pub fn transfer_shares(&self, caller: Address, to: Address, amount: Amount) -> Result<()> {
        self.transact("transfer_shares", |_| {
            self.with_state(|state| {
                state.shares.transfer(caller, to, amount)?;
                state.emit(PoolEvent::SharesTransferred {
                    from: caller,
                    to,
                    amount,
                });
                Ok(())
            })
        })?;
        debug!(%caller, %to, %amount, "shares transferred");
        Ok(())
    }
}
