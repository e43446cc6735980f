//! Mutable pool state, snapshotted and restored as one value.

use super::fees::FeeLedger;
use super::registry::AssetRegistry;
use super::shares::ShareLedger;
use crate::config::{FeeSchedule, PoolConfig};
use crate::domain::{Address, PoolEvent, Ratio};
use crate::error::{PoolError, Result};

/// Everything a mutating call may change.
///
/// `pending` collects the events of the call in flight; it is empty between
/// calls and moved to the pool's log on commit.
#[derive(Debug, Clone)]
pub(crate) struct PoolState {
    pub(crate) registry: AssetRegistry,
    pub(crate) shares: ShareLedger,
    pub(crate) fees: FeeLedger,
    pub(crate) swap_fee: Ratio,
    pub(crate) publisher_market_fee: Ratio,
    pub(crate) platform_fee: Ratio,
    pub(crate) exit_fee: Ratio,
    pub(crate) controller: Address,
    pub(crate) publisher_collector: Address,
    pub(crate) platform_collector: Address,
    pub(crate) factory: Address,
    pub(crate) finalized: bool,
    pub(crate) public_swap: bool,
    pub(crate) pending: Vec<PoolEvent>,
}

impl PoolState {
    pub(crate) fn from_config(config: &PoolConfig) -> Self {
        let accounts = config.accounts();
        let fees: &FeeSchedule = config.fees();
        Self {
            registry: AssetRegistry::default(),
            shares: ShareLedger::default(),
            fees: FeeLedger::default(),
            swap_fee: fees.swap_fee(),
            publisher_market_fee: fees.publisher_market_fee(),
            platform_fee: fees.platform_fee(),
            exit_fee: fees.exit_fee(),
            controller: accounts.controller(),
            publisher_collector: accounts.publisher_collector(),
            platform_collector: accounts.platform_collector(),
            factory: accounts.factory(),
            finalized: false,
            public_swap: false,
            pending: Vec::new(),
        }
    }

    pub(crate) fn emit(&mut self, event: PoolEvent) {
        self.pending.push(event);
    }

    pub(crate) fn require_controller(&self, caller: Address) -> Result<()> {
        if caller != self.controller {
            return Err(PoolError::NotController);
        }
        Ok(())
    }

    pub(crate) fn require_unfinalized(&self) -> Result<()> {
        if self.finalized {
            return Err(PoolError::AlreadyFinalized);
        }
        Ok(())
    }

    pub(crate) fn require_finalized(&self) -> Result<()> {
        if !self.finalized {
            return Err(PoolError::NotFinalized);
        }
        Ok(())
    }
}
