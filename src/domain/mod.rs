//! Value types of the pool domain.
//!
//! Addresses, raw amounts, fixed-point ratios, asset records, swap
//! parameters and outcomes, and the notification log entries.  Newtypes keep
//! quantities ([`Amount`]) and scalars ([`Ratio`]) from being mixed up.

mod address;
mod amount;
mod asset_record;
mod event;
mod ratio;
mod rounding;
mod swap_outcome;
mod swap_request;

pub use address::Address;
pub use amount::Amount;
pub use asset_record::AssetRecord;
pub use event::PoolEvent;
pub use ratio::Ratio;
pub use rounding::Rounding;
pub use swap_outcome::{FeeBreakdown, SwapOutcome};
pub use swap_request::{ExactInSwap, ExactOutSwap, TradeFee};
