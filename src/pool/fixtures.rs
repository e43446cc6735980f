//! Shared pool set-ups for unit and property tests.

#![allow(clippy::panic)]

use super::admin::Binding;
use super::weighted_pool::WeightedPool;
use crate::config::{FeeSchedule, PoolAccounts, PoolConfig};
use crate::domain::{Address, Amount, Ratio};
use crate::ledger::InMemoryLedger;
use crate::traits::{NoStaking, SideStaking};

pub(crate) fn addr(byte: u8) -> Address {
    Address::from_bytes([byte; 32])
}

pub(crate) fn pool_account() -> Address {
    addr(1)
}

pub(crate) fn controller() -> Address {
    addr(2)
}

pub(crate) fn factory() -> Address {
    addr(3)
}

pub(crate) fn platform_collector() -> Address {
    addr(4)
}

pub(crate) fn publisher_collector() -> Address {
    addr(5)
}

pub(crate) fn trader() -> Address {
    addr(6)
}

pub(crate) fn market_collector() -> Address {
    addr(7)
}

pub(crate) fn asset_a() -> Address {
    addr(10)
}

pub(crate) fn asset_b() -> Address {
    addr(11)
}

pub(crate) fn config(fees: FeeSchedule) -> PoolConfig {
    let accounts = PoolAccounts::new(
        pool_account(),
        controller(),
        factory(),
        platform_collector(),
        publisher_collector(),
    );
    let Ok(config) = PoolConfig::new(accounts, fees) else {
        panic!("fixture config must be valid");
    };
    config
}

/// Ledger with 10 000 tokens of each asset for the controller and the trader.
pub(crate) fn funded_ledger() -> InMemoryLedger {
    let ledger = InMemoryLedger::new();
    for account in [controller(), trader()] {
        for asset in [asset_a(), asset_b()] {
            let Ok(()) = ledger.mint(asset, account, Amount::from_tokens(10_000)) else {
                panic!("mint");
            };
        }
    }
    ledger
}

/// Unfinalized pool with nothing bound.
pub(crate) fn empty_pool(fees: FeeSchedule) -> WeightedPool<InMemoryLedger> {
    let Ok(pool) = WeightedPool::new(config(fees), funded_ledger(), NoStaking) else {
        panic!("pool");
    };
    pool
}

/// Finalized pool with `balance_a`/`balance_b` tokens at weights `weight_a`/`weight_b`.
pub(crate) fn finalized_pool_with<S: SideStaking>(
    fees: FeeSchedule,
    staking: S,
    (balance_a, weight_a): (u64, u64),
    (balance_b, weight_b): (u64, u64),
) -> WeightedPool<InMemoryLedger, S> {
    let Ok(pool) = WeightedPool::new(config(fees), funded_ledger(), staking) else {
        panic!("pool");
    };
    let Ok(()) = pool.setup(
        controller(),
        Binding::new(
            asset_a(),
            Amount::from_tokens(balance_a),
            Ratio::from_integer(weight_a),
        ),
        Binding::new(
            asset_b(),
            Amount::from_tokens(balance_b),
            Ratio::from_integer(weight_b),
        ),
    ) else {
        panic!("setup");
    };
    pool
}

/// Finalized 100/100 pool at equal weights.
pub(crate) fn finalized_pool(fees: FeeSchedule) -> WeightedPool<InMemoryLedger> {
    finalized_pool_with(fees, NoStaking, (100, 5), (100, 5))
}
