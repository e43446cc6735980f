//! The two-asset weighted pool.
//!
//! [`WeightedPool`] is the only public type here; its methods are spread
//! over several files by concern:
//!
//! | File | Operations |
//! |------|------------|
//! | `admin` | bind, rebind, unbind, finalize, setup, controller and fee settings, fee collection |
//! | `swap` | exact-in / exact-out swaps and their quotes |
//! | `liquidity` | proportional and single-asset joins and exits, with the staking mirror leg |
//! | `read` | prices, weights, balances, fee ledgers, pool shares |
//!
//! Internally the pool is a [`PoolState`](state::PoolState) value (registry,
//! share ledger, fee ledgers, settings) behind a `RefCell`, a reentrancy
//! [`Lock`](lock::Lock), and a [`Settlement`](settlement::Settlement) that
//! runs the call's asset transfers after the state is final.

mod admin;
mod fees;
mod liquidity;
mod lock;
mod read;
mod registry;
mod settlement;
mod shares;
mod state;
mod swap;
mod weighted_pool;

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod proptest_properties;

pub use admin::Binding;
pub use weighted_pool::WeightedPool;
