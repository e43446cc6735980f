//! Weighted-invariant pricing.
//!
//! A two-asset weighted pool keeps `V = B_i^(w_i/W) × B_o^(w_o/W)` constant
//! across trades (net of fees).  Every function here is pure: it reads
//! balances, weights and fee rates and returns the amount a trade, join or
//! exit would move.
//!
//! Intermediate steps round half-up.  Amounts leaving the pool are finished
//! with [`Rounding::Down`], amounts charged to the caller with
//! [`Rounding::Up`].
//!
//! | Function | Question answered |
//! |----------|-------------------|
//! | [`calc_spot_price`] | input per unit of output, fees included |
//! | [`calc_out_given_in`] | output for an exact input |
//! | [`calc_in_given_out`] | input for an exact output |
//! | [`calc_pool_out_given_single_in`] | shares minted for a one-asset deposit |
//! | [`calc_single_in_given_pool_out`] | one-asset deposit for exact shares |
//! | [`calc_single_out_given_pool_in`] | one-asset withdrawal for exact shares |
//! | [`calc_pool_in_given_single_out`] | shares burned for an exact withdrawal |

use super::fixed_point::{bdiv, bmul, bpow, bsub};
use crate::config::limits::BONE;
use crate::domain::{Amount, Ratio, Rounding};
use crate::error::{PoolError, Result};

/// Balance and denormalized weight of one side of a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Side {
    /// Pool balance.
    pub balance: Amount,
    /// Denormalized weight.
    pub weight: Ratio,
}

impl Side {
    /// Pairs a balance with its weight.
    #[must_use]
    pub const fn new(balance: Amount, weight: Ratio) -> Self {
        Self { balance, weight }
    }
}

/// Pool-wide quantities for single-asset joins and exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolTotals {
    /// Outstanding pool shares.
    pub supply: Amount,
    /// Sum of denormalized weights.
    pub total_weight: Ratio,
}

impl PoolTotals {
    /// Groups share supply and total weight.
    #[must_use]
    pub const fn new(supply: Amount, total_weight: Ratio) -> Self {
        Self {
            supply,
            total_weight,
        }
    }
}

const H: Rounding = Rounding::HalfUp;

/// `1 - fee`, failing on a fee of 100% or more.
fn fee_complement(fee: Ratio) -> Result<u128> {
    if fee.get() >= BONE {
        return Err(PoolError::FeeOutOfRange("fee must stay below 100%"));
    }
    Ok(BONE - fee.get())
}

/// Fee charged on the implicit counter-trade of a single-asset leg:
/// `(1 - w/W) × fee`.
fn counter_trade_fee(weight: Ratio, totals: PoolTotals, fee: Ratio) -> Result<(u128, u128)> {
    let normalized = bdiv(weight.get(), totals.total_weight.get(), H)?;
    let zaz = bmul(bsub(BONE, normalized)?, fee.get(), H)?;
    Ok((normalized, zaz))
}

/// Spot price of `asset_out` in units of `asset_in`, scaled up by
/// `1 / (1 - fee)`.
///
/// # Errors
///
/// - [`PoolError::DivisionByZero`] if a weight or the output balance is
///   zero.
/// - [`PoolError::FeeOutOfRange`] if `fee ≥ 1`.
///
/// # Examples
///
/// ```
/// use datapool_amm::domain::{Amount, Ratio};
/// use datapool_amm::math::{calc_spot_price, Side};
///
/// let a = Side::new(Amount::from_tokens(100), Ratio::from_integer(5));
/// let b = Side::new(Amount::from_tokens(200), Ratio::from_integer(5));
/// assert_eq!(calc_spot_price(a, b, Ratio::ZERO), Ok(Ratio::new(500_000_000_000_000_000)));
/// ```
pub fn calc_spot_price(side_in: Side, side_out: Side, fee: Ratio) -> Result<Ratio> {
    let numer = bdiv(side_in.balance.get(), side_in.weight.get(), H)?;
    let denom = bdiv(side_out.balance.get(), side_out.weight.get(), H)?;
    let ratio = bdiv(numer, denom, H)?;
    let scale = bdiv(BONE, fee_complement(fee)?, H)?;
    bmul(ratio, scale, H).map(Ratio::new)
}

/// Output paid for an exact input:
/// `bO × (1 − (bI / (bI + aI × (1 − fee)))^(wI/wO))`.
///
/// # Errors
///
/// Propagates arithmetic errors; [`PoolError::DivisionByZero`] on a zero
/// weight.
pub fn calc_out_given_in(
    side_in: Side,
    side_out: Side,
    amount_in: Amount,
    fee: Ratio,
) -> Result<Amount> {
    let weight_ratio = bdiv(side_in.weight.get(), side_out.weight.get(), H)?;
    let adjusted_in = bmul(amount_in.get(), fee_complement(fee)?, H)?;
    let grown = side_in
        .balance
        .get()
        .checked_add(adjusted_in)
        .ok_or(PoolError::Overflow("balance in plus amount in"))?;
    let y = bdiv(side_in.balance.get(), grown, H)?;
    let foo = bpow(y, weight_ratio)?;
    let bar = bsub(BONE, foo)?;
    bmul(side_out.balance.get(), bar, Rounding::Down).map(Amount::new)
}

/// Input charged for an exact output:
/// `bI × ((bO / (bO − aO))^(wO/wI) − 1) / (1 − fee)`.
///
/// # Errors
///
/// - [`PoolError::DivisionByZero`] if `amount_out == balance_out`,
///   [`PoolError::Underflow`] if it is larger.
/// - Arithmetic errors from the power.
pub fn calc_in_given_out(
    side_in: Side,
    side_out: Side,
    amount_out: Amount,
    fee: Ratio,
) -> Result<Amount> {
    let weight_ratio = bdiv(side_out.weight.get(), side_in.weight.get(), H)?;
    let diff = bsub(side_out.balance.get(), amount_out.get())?;
    let y = bdiv(side_out.balance.get(), diff, H)?;
    let foo = bsub(bpow(y, weight_ratio)?, BONE)?;
    let before_fee = bmul(side_in.balance.get(), foo, Rounding::Up)?;
    bdiv(before_fee, fee_complement(fee)?, Rounding::Up).map(Amount::new)
}

/// Shares minted for a single-asset deposit of `amount_in`.
///
/// # Errors
///
/// Propagates arithmetic errors.
pub fn calc_pool_out_given_single_in(
    side_in: Side,
    totals: PoolTotals,
    amount_in: Amount,
    fee: Ratio,
) -> Result<Amount> {
    let (normalized, zaz) = counter_trade_fee(side_in.weight, totals, fee)?;
    let after_fee = bmul(amount_in.get(), bsub(BONE, zaz)?, H)?;
    let new_balance = side_in
        .balance
        .get()
        .checked_add(after_fee)
        .ok_or(PoolError::Overflow("balance plus deposit"))?;
    let balance_ratio = bdiv(new_balance, side_in.balance.get(), H)?;
    let pool_ratio = bpow(balance_ratio, normalized)?;
    let new_supply = bmul(pool_ratio, totals.supply.get(), Rounding::Down)?;
    bsub(new_supply, totals.supply.get()).map(Amount::new)
}

/// Single-asset deposit required to mint exactly `pool_out` shares.
///
/// # Errors
///
/// - [`PoolError::PowBaseOutOfBounds`] if `pool_out` reaches the supply.
/// - Other arithmetic errors.
pub fn calc_single_in_given_pool_out(
    side_in: Side,
    totals: PoolTotals,
    pool_out: Amount,
    fee: Ratio,
) -> Result<Amount> {
    let (normalized, zar) = counter_trade_fee(side_in.weight, totals, fee)?;
    let new_supply = totals
        .supply
        .get()
        .checked_add(pool_out.get())
        .ok_or(PoolError::Overflow("supply plus shares out"))?;
    let pool_ratio = bdiv(new_supply, totals.supply.get(), H)?;
    let exponent = bdiv(BONE, normalized, H)?;
    let balance_ratio = bpow(pool_ratio, exponent)?;
    let new_balance = bmul(balance_ratio, side_in.balance.get(), Rounding::Up)?;
    let after_fee = bsub(new_balance, side_in.balance.get())?;
    bdiv(after_fee, bsub(BONE, zar)?, Rounding::Up).map(Amount::new)
}

/// Single-asset withdrawal paid for burning `pool_in` shares, after the exit
/// fee on shares and the swap fee on the counter-trade.
///
/// # Errors
///
/// - [`PoolError::PowBaseOutOfBounds`] if the remaining supply ratio falls
///   outside the power domain.
/// - Other arithmetic errors.
pub fn calc_single_out_given_pool_in(
    side_out: Side,
    totals: PoolTotals,
    pool_in: Amount,
    fee: Ratio,
    exit_fee: Ratio,
) -> Result<Amount> {
    let (normalized, zaz) = counter_trade_fee(side_out.weight, totals, fee)?;
    let pool_in_after_exit = bmul(pool_in.get(), fee_complement(exit_fee)?, H)?;
    let new_supply = bsub(totals.supply.get(), pool_in_after_exit)?;
    let pool_ratio = bdiv(new_supply, totals.supply.get(), H)?;
    let exponent = bdiv(BONE, normalized, H)?;
    let balance_ratio = bpow(pool_ratio, exponent)?;
    let new_balance = bmul(balance_ratio, side_out.balance.get(), Rounding::Up)?;
    let before_fee = bsub(side_out.balance.get(), new_balance)?;
    bmul(before_fee, bsub(BONE, zaz)?, Rounding::Down).map(Amount::new)
}

/// Shares burned for an exact single-asset withdrawal of `amount_out`,
/// grossed up for the exit fee.
///
/// # Errors
///
/// - [`PoolError::Underflow`] if the withdrawal exceeds the balance.
/// - Other arithmetic errors.
pub fn calc_pool_in_given_single_out(
    side_out: Side,
    totals: PoolTotals,
    amount_out: Amount,
    fee: Ratio,
    exit_fee: Ratio,
) -> Result<Amount> {
    let (normalized, zar) = counter_trade_fee(side_out.weight, totals, fee)?;
    let before_fee = bdiv(amount_out.get(), bsub(BONE, zar)?, Rounding::Up)?;
    let new_balance = bsub(side_out.balance.get(), before_fee)?;
    let balance_ratio = bdiv(new_balance, side_out.balance.get(), H)?;
    let pool_ratio = bpow(balance_ratio, normalized)?;
    let new_supply = bmul(pool_ratio, totals.supply.get(), Rounding::Down)?;
    let after_exit = bsub(totals.supply.get(), new_supply)?;
    bdiv(after_exit, fee_complement(exit_fee)?, Rounding::Up).map(Amount::new)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    // -- helpers --------------------------------------------------------------

    fn side(tokens: u64, weight: u64) -> Side {
        Side::new(Amount::from_tokens(tokens), Ratio::from_integer(weight))
    }

    fn totals(supply_tokens: u64, total_weight: u64) -> PoolTotals {
        PoolTotals::new(
            Amount::from_tokens(supply_tokens),
            Ratio::from_integer(total_weight),
        )
    }

    fn close(actual: Amount, expected: u128, tolerance: u128) -> bool {
        actual.get().abs_diff(expected) <= tolerance
    }

    const TOL: u128 = 1_000_000_000;

    // -- spot price -----------------------------------------------------------

    #[test]
    fn spot_price_equal_pool_is_one() {
        assert_eq!(
            calc_spot_price(side(100, 5), side(100, 5), Ratio::ZERO),
            Ok(Ratio::ONE)
        );
    }

    #[test]
    fn spot_price_includes_fee() {
        let Ok(price) = calc_spot_price(side(100, 5), side(100, 5), Ratio::from_basis_points(1_000))
        else {
            panic!("expected Ok");
        };
        // 1 / 0.9
        assert_eq!(price, Ratio::new(1_111_111_111_111_111_111));
    }

    #[test]
    fn spot_price_weighted() {
        // (100/8) / (100/2) = 0.25
        assert_eq!(
            calc_spot_price(side(100, 8), side(100, 2), Ratio::ZERO),
            Ok(Ratio::new(250_000_000_000_000_000))
        );
    }

    // -- swaps ----------------------------------------------------------------

    #[test]
    fn out_given_in_zero_fee() {
        let Ok(out) = calc_out_given_in(side(100, 5), side(100, 5), Amount::from_tokens(10), Ratio::ZERO)
        else {
            panic!("expected Ok");
        };
        // 100 * (1 - 100/110)
        assert!(close(out, 9_090_909_090_909_090_909, TOL));
        assert!(out.get() <= 9_090_909_090_909_090_909);
    }

    #[test]
    fn out_given_in_with_fee_pays_less() {
        let fee = Ratio::from_basis_points(30);
        let Ok(with_fee) = calc_out_given_in(side(100, 5), side(100, 5), Amount::from_tokens(10), fee)
        else {
            panic!("expected Ok");
        };
        assert!(with_fee.get() < 9_090_909_090_909_090_909);
    }

    #[test]
    fn in_given_out_zero_fee() {
        let Ok(amount_in) =
            calc_in_given_out(side(100, 5), side(100, 5), Amount::from_tokens(10), Ratio::ZERO)
        else {
            panic!("expected Ok");
        };
        // 100 * (100/90 - 1)
        assert!(close(amount_in, 11_111_111_111_111_111_111, TOL));
    }

    #[test]
    fn in_given_out_uneven_weights() {
        // wO/wI = 0.25: 100 * ((100/90)^0.25 - 1)
        let Ok(amount_in) =
            calc_in_given_out(side(100, 8), side(100, 2), Amount::from_tokens(10), Ratio::ZERO)
        else {
            panic!("expected Ok");
        };
        assert!(close(amount_in, 2_669_009_608_034_089_700, 100 * TOL));
    }

    #[test]
    fn in_given_out_whole_balance_rejected() {
        let result = calc_in_given_out(side(100, 5), side(100, 5), Amount::from_tokens(100), Ratio::ZERO);
        assert_eq!(result, Err(PoolError::DivisionByZero));
    }

    #[test]
    fn swap_round_trip() {
        let fee = Ratio::from_basis_points(10);
        let Ok(out) = calc_out_given_in(side(100, 5), side(300, 5), Amount::from_tokens(7), fee)
        else {
            panic!("expected Ok");
        };
        let Ok(back) = calc_in_given_out(side(100, 5), side(300, 5), out, fee) else {
            panic!("expected Ok");
        };
        assert!(close(back, Amount::from_tokens(7).get(), TOL));
        assert!(back.get() <= Amount::from_tokens(7).get() + TOL);
    }

    // -- single-asset joins ---------------------------------------------------

    #[test]
    fn pool_out_given_single_in_zero_fee() {
        // 100 * ((110/100)^0.5 - 1)
        let Ok(shares) = calc_pool_out_given_single_in(
            side(100, 5),
            totals(100, 10),
            Amount::from_tokens(10),
            Ratio::ZERO,
        ) else {
            panic!("expected Ok");
        };
        assert!(close(shares, 4_880_884_817_015_154_699, 1_000 * TOL));
    }

    #[test]
    fn single_in_given_pool_out_inverts() {
        let fee = Ratio::from_basis_points(30);
        let Ok(shares) =
            calc_pool_out_given_single_in(side(100, 5), totals(100, 10), Amount::from_tokens(10), fee)
        else {
            panic!("expected Ok");
        };
        let Ok(amount_in) = calc_single_in_given_pool_out(side(100, 5), totals(100, 10), shares, fee)
        else {
            panic!("expected Ok");
        };
        assert!(close(amount_in, Amount::from_tokens(10).get(), 100 * TOL));
    }

    #[test]
    fn single_in_for_whole_supply_rejected() {
        let result = calc_single_in_given_pool_out(
            side(100, 5),
            totals(100, 10),
            Amount::from_tokens(100),
            Ratio::ZERO,
        );
        assert_eq!(result, Err(PoolError::PowBaseOutOfBounds));
    }

    // -- single-asset exits ---------------------------------------------------

    #[test]
    fn single_out_given_pool_in_zero_fee() {
        // 100 * (1 - (90/100)^2)
        let Ok(out) = calc_single_out_given_pool_in(
            side(100, 5),
            totals(100, 10),
            Amount::from_tokens(10),
            Ratio::ZERO,
            Ratio::ZERO,
        ) else {
            panic!("expected Ok");
        };
        assert!(close(out, 19_000_000_000_000_000_000, TOL));
    }

    #[test]
    fn exit_fee_reduces_single_out() {
        let exit_fee = Ratio::from_basis_points(100);
        let Ok(with_fee) = calc_single_out_given_pool_in(
            side(100, 5),
            totals(100, 10),
            Amount::from_tokens(10),
            Ratio::ZERO,
            exit_fee,
        ) else {
            panic!("expected Ok");
        };
        // 100 * (1 - (90.1/100)^2)
        assert!(close(with_fee, 18_819_900_000_000_000_000, TOL));
    }

    #[test]
    fn pool_in_given_single_out_inverts() {
        let fee = Ratio::from_basis_points(30);
        let exit_fee = Ratio::from_basis_points(50);
        let Ok(out) = calc_single_out_given_pool_in(
            side(100, 5),
            totals(100, 10),
            Amount::from_tokens(5),
            fee,
            exit_fee,
        ) else {
            panic!("expected Ok");
        };
        let Ok(shares) =
            calc_pool_in_given_single_out(side(100, 5), totals(100, 10), out, fee, exit_fee)
        else {
            panic!("expected Ok");
        };
        assert!(close(shares, Amount::from_tokens(5).get(), 100 * TOL));
    }
}
