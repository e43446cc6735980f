//! Asset ledger implementations.
//!
//! [`InMemoryLedger`] keeps per-asset account balances in memory and
//! implements [`AssetLedger`](crate::traits::AssetLedger).  It backs
//! simulations and tests; production deployments plug in their own ledger.

mod in_memory;

pub use in_memory::InMemoryLedger;
