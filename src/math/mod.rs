//! Arithmetic for pool pricing.
//!
//! - `BONE`-scaled `bmul`, `bdiv` and the
//!   `bpow` power approximation, with 256-bit intermediates.
//! - Weighted-invariant formulas for spot price, swaps and single-asset
//!   joins and exits.
//! - [`CheckedArithmetic`] for overflow-safe operations on domain types.
//! - [`div_round`] for explicit division rounding.

mod checked;
mod fixed_point;
mod rounding;
mod u256;
mod weighted;

pub use checked::CheckedArithmetic;
pub use fixed_point::{badd, bdiv, bfloor, bmul, bpow, bpowi, bsub, bsub_sign, btoi};
pub use rounding::div_round;
pub use u256::{mul_div, narrow, U256};
pub use weighted::{
    calc_in_given_out, calc_out_given_in, calc_pool_in_given_single_out,
    calc_pool_out_given_single_in, calc_single_in_given_pool_out,
    calc_single_out_given_pool_in, calc_spot_price, PoolTotals, Side,
};
