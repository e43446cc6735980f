//! Collaborator capabilities the pool depends on.
//!
//! The pool moves assets only through an [`AssetLedger`] and mirrors
//! single-asset liquidity only through a [`SideStaking`] collaborator.  Both
//! are narrow traits so tests can substitute recording, failing or
//! reentrant implementations.

mod asset_ledger;
mod side_staking;

pub use asset_ledger::AssetLedger;
pub use side_staking::{NoStaking, SideStaking};
