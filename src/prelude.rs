//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use datapool_amm::prelude::*;
//! ```
//!
//! Brings in the domain value types, the collaborator traits, the pool and
//! its configuration, and the error type, so that consumers don't need to
//! import from individual submodules.

pub use crate::domain::{
    Address, Amount, ExactInSwap, ExactOutSwap, FeeBreakdown, PoolEvent, Ratio, Rounding,
    SwapOutcome, TradeFee,
};

pub use crate::traits::{AssetLedger, NoStaking, SideStaking};

pub use crate::math::CheckedArithmetic;

pub use crate::config::{FeeSchedule, PoolAccounts, PoolConfig};

pub use crate::error::{PoolError, Result};

pub use crate::ledger::InMemoryLedger;

pub use crate::pool::{Binding, WeightedPool};
