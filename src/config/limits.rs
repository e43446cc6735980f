//! Protocol constants.
//!
//! Every fixed-point quantity in the crate is scaled by [`BONE`].  These
//! bounds are enforced on bind, on fee updates and on every trade.

/// Fixed-point one (`10^18`).
pub const BONE: u128 = 1_000_000_000_000_000_000;

/// Smallest accepted fee rate.
pub const MIN_FEE: u128 = 0;

/// Largest accepted fee rate (10%).
pub const MAX_FEE: u128 = BONE / 10;

/// Smallest denormalized weight of a bound asset.
pub const MIN_WEIGHT: u128 = BONE;

/// Largest denormalized weight of a bound asset.
pub const MAX_WEIGHT: u128 = BONE * 50;

/// Cap on the sum of denormalized weights.
pub const MAX_TOTAL_WEIGHT: u128 = BONE * 50;

/// Smallest balance a bound asset may hold.
pub const MIN_BALANCE: u128 = BONE / 1_000_000_000_000;

/// Shares minted to the controller on finalization.
pub const INIT_POOL_SUPPLY: u128 = BONE * 100;

/// Largest trade input as a fraction of the input balance.
pub const MAX_IN_RATIO: u128 = BONE / 2;

/// Largest trade output as a fraction of the output balance.
pub const MAX_OUT_RATIO: u128 = BONE / 3 + 1;

/// Stop threshold of the fractional-power series.
pub const BPOW_PRECISION: u128 = BONE / 10_000_000_000;

/// Smallest base accepted by `bpow`.
pub const MIN_BPOW_BASE: u128 = 1;

/// Largest base accepted by `bpow`.
pub const MAX_BPOW_BASE: u128 = 2 * BONE - 1;

/// Number of assets a pool binds.
pub const MAX_BOUND_ASSETS: usize = 2;
