//! Asset transfers and staking calls planned during a call and executed
//! once state is final.

use tracing::error;

use crate::domain::{Address, Amount};
use crate::error::Result;
use crate::traits::{AssetLedger, SideStaking};

/// One movement of assets between the pool account and an external account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transfer {
    /// `from` pays the pool.
    Pull {
        asset: Address,
        from: Address,
        amount: Amount,
    },
    /// The pool pays `to`.
    Push {
        asset: Address,
        to: Address,
        amount: Amount,
    },
}

impl Transfer {
    fn apply<L: AssetLedger>(&self, ledger: &L, pool: Address) -> Result<()> {
        match *self {
            Self::Pull {
                asset,
                from,
                amount,
            } => ledger.pull(asset, from, pool, amount),
            Self::Push { asset, to, amount } => ledger.push(asset, pool, to, amount),
        }
    }

    /// The transfer that undoes this one.
    fn reversed(&self) -> Self {
        match *self {
            Self::Pull {
                asset,
                from,
                amount,
            } => Self::Push {
                asset,
                to: from,
                amount,
            },
            Self::Push { asset, to, amount } => Self::Pull {
                asset,
                from: to,
                amount,
            },
        }
    }
}

/// The staking collaborator's side of a mirror leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StakingCall {
    Stake {
        asset: Address,
        paired_asset: Address,
        amount: Amount,
    },
    Unstake {
        asset: Address,
        paired_asset: Address,
        amount: Amount,
        shares: Amount,
    },
}

impl StakingCall {
    fn apply<S: SideStaking>(&self, staking: &S) -> Result<()> {
        match *self {
            Self::Stake {
                asset,
                paired_asset,
                amount,
            } => staking.stake(asset, paired_asset, amount),
            Self::Unstake {
                asset,
                paired_asset,
                amount,
                shares,
            } => staking.unstake(asset, paired_asset, amount, shares),
        }
    }
}

/// Ordered plan of the external effects of a single call.
///
/// Pulls run before pushes, so the pool is paid before it pays out.  The
/// staking call, if any, runs last, once every transfer has gone through.
/// If anything fails, the transfers already completed are reversed newest
/// first and the staking collaborator is never called.
#[derive(Debug, Default)]
pub(crate) struct Settlement {
    transfers: Vec<Transfer>,
    staking: Option<StakingCall>,
}

impl Settlement {
    /// Plans a payment from `from` to the pool.  Zero amounts are dropped.
    pub(crate) fn pull(&mut self, asset: Address, from: Address, amount: Amount) {
        if !amount.is_zero() {
            self.transfers.push(Transfer::Pull {
                asset,
                from,
                amount,
            });
        }
    }

    /// Plans a payment from the pool to `to`.  Zero amounts are dropped.
    pub(crate) fn push(&mut self, asset: Address, to: Address, amount: Amount) {
        if !amount.is_zero() {
            self.transfers.push(Transfer::Push { asset, to, amount });
        }
    }

    /// Plans the collaborator's `stake` for a mirror join.
    pub(crate) fn stake(&mut self, asset: Address, paired_asset: Address, amount: Amount) {
        self.staking = Some(StakingCall::Stake {
            asset,
            paired_asset,
            amount,
        });
    }

    /// Plans the collaborator's `unstake` for a mirror exit.
    pub(crate) fn unstake(
        &mut self,
        asset: Address,
        paired_asset: Address,
        amount: Amount,
        shares: Amount,
    ) {
        self.staking = Some(StakingCall::Unstake {
            asset,
            paired_asset,
            amount,
            shares,
        });
    }

    #[cfg(test)]
    pub(crate) fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    #[cfg(test)]
    pub(crate) fn staking_call(&self) -> Option<StakingCall> {
        self.staking
    }

    /// Executes the plan against `ledger` and `staking` with `pool` as the
    /// pool-side account.
    pub(crate) fn execute<L: AssetLedger, S: SideStaking>(
        &self,
        ledger: &L,
        staking: &S,
        pool: Address,
    ) -> Result<()> {
        let pulls = self
            .transfers
            .iter()
            .filter(|t| matches!(t, Transfer::Pull { .. }));
        let pushes = self
            .transfers
            .iter()
            .filter(|t| matches!(t, Transfer::Push { .. }));
        let mut done: Vec<Transfer> = Vec::with_capacity(self.transfers.len());
        for transfer in pulls.chain(pushes) {
            if let Err(err) = transfer.apply(ledger, pool) {
                compensate(ledger, pool, &done);
                return Err(err);
            }
            done.push(*transfer);
        }
        if let Some(call) = self.staking {
            if let Err(err) = call.apply(staking) {
                compensate(ledger, pool, &done);
                return Err(err);
            }
        }
        Ok(())
    }
}

fn compensate<L: AssetLedger>(ledger: &L, pool: Address, done: &[Transfer]) {
    for transfer in done.iter().rev() {
        let undo = transfer.reversed();
        if let Err(err) = undo.apply(ledger, pool) {
            error!(?undo, %err, "compensating transfer failed");
        }
    }
}
