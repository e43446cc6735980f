//! # Datapool AMM
//!
//! Two-asset weighted AMM pool engine for data-asset exchanges: a data
//! asset is paired with a base asset under Balancer-style weighted-invariant
//! pricing, with single-sided liquidity mirrored by an auto-staking
//! collaborator and multi-tier fee ledgers.
//!
//! The crate covers token-weight bookkeeping, the weighted pricing math in
//! 18-decimal fixed point, exact-in and exact-out swaps with slippage and
//! price-impact guards, proportional and single-asset joins and exits, and
//! accounting for the swap, platform, publisher-market, per-trade market and
//! exit fees.  Every mutating call is atomic: it either applies in full or
//! leaves the pool, its fee ledgers and the asset ledger exactly as they were.
//!
//! ## Create a pool and execute a swap
//!
//! ```rust
//! use datapool_amm::config::{FeeSchedule, PoolAccounts, PoolConfig};
//! use datapool_amm::domain::{Address, Amount, ExactInSwap, Ratio};
//! use datapool_amm::ledger::InMemoryLedger;
//! use datapool_amm::pool::{Binding, WeightedPool};
//! use datapool_amm::traits::NoStaking;
//!
//! let [pool_acct, controller, factory, platform, publisher, data, base] =
//!     [1u8, 2, 3, 4, 5, 6, 7].map(|b| Address::from_bytes([b; 32]));
//!
//! // 1. Fund the controller on the asset ledger
//! let ledger = InMemoryLedger::new();
//! ledger.mint(data, controller, Amount::from_tokens(1_000)).expect("mint");
//! ledger.mint(base, controller, Amount::from_tokens(1_000)).expect("mint");
//!
//! // 2. Configure accounts and fees (0.1% LP swap fee)
//! let accounts = PoolAccounts::new(pool_acct, controller, factory, platform, publisher);
//! let fees = FeeSchedule::new(Ratio::from_basis_points(10), Ratio::ZERO, Ratio::ZERO, Ratio::ZERO);
//! let config = PoolConfig::new(accounts, fees).expect("valid config");
//!
//! // 3. Bind both assets at equal weight and finalize
//! let pool = WeightedPool::new(config, ledger, NoStaking).expect("pool");
//! pool.setup(
//!     controller,
//!     Binding::new(data, Amount::from_tokens(100), Ratio::from_integer(5)),
//!     Binding::new(base, Amount::from_tokens(100), Ratio::from_integer(5)),
//! )
//! .expect("setup");
//!
//! // 4. Sell 10 base tokens for data tokens
//! let request = ExactInSwap::new(base, Amount::from_tokens(10), data, Amount::ZERO).expect("request");
//! let outcome = pool.swap_exact_amount_in(controller, request).expect("swap");
//! assert!(outcome.amount_out() < Amount::from_tokens(10));
//! assert!(outcome.fees().lp > Amount::ZERO);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │    Caller    │  swap / join / exit / admin, with a caller Address
//! └──────┬───────┘
//!        │ &self method
//!        ▼
//! ┌──────────────┐   lock, snapshot, validate, apply effects
//! │ WeightedPool │──────────────────────────────┐
//! └──────┬───────┘                              │ mirror leg
//!        │ weighted math on registry records    ▼
//!        ▼                               ┌─────────────┐
//! ┌──────────────┐                       │ SideStaking │
//! │  Settlement  │  pulls, then pushes   └─────────────┘
//! └──────┬───────┘
//!        │ pull / push
//!        ▼
//! ┌──────────────┐
//! │ AssetLedger  │  rolled back in reverse on failure
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Address`](domain::Address), [`Amount`](domain::Amount), [`Ratio`](domain::Ratio), swap requests and outcomes, [`PoolEvent`](domain::PoolEvent) |
//! | [`math`] | `BONE` fixed-point arithmetic and the weighted-pool formulas |
//! | [`config`] | [`PoolConfig`](config::PoolConfig) and protocol [`limits`](config::limits) |
//! | [`traits`] | Collaborator seams: [`AssetLedger`](traits::AssetLedger), [`SideStaking`](traits::SideStaking) |
//! | [`ledger`] | [`InMemoryLedger`](ledger::InMemoryLedger) reference asset ledger |
//! | [`pool`] | [`WeightedPool`](pool::WeightedPool), the pool engine |
//! | [`error`] | [`PoolError`](error::PoolError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod prelude;
pub mod traits;
