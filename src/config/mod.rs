//! Pool configuration and protocol limits.
//!
//! [`PoolConfig`] is the declarative blueprint a pool is constructed from:
//! the accounts it is wired to and its fee schedule.  [`limits`] holds the
//! protocol constants every pool enforces.

pub mod limits;
mod pool_config;

pub(crate) use pool_config::check_fee;
pub use pool_config::{FeeSchedule, PoolAccounts, PoolConfig};
