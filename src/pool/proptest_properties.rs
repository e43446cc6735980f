//! Property-based tests for the pool engine.
//!
//! 1. **Invariant non-decrease**: `Π balance^weight` never shrinks on a swap.
//! 2. **Weight conservation**: trading and liquidity never move weights.
//! 3. **Swap reversibility**: a round trip A→B→A returns at most the input,
//!    and exact-in and exact-out pricing invert each other in both
//!    directions.
//! 4. **Monotonic price impact**: a larger trade never gets a better price.
//! 5. **Collection idempotence**: a second fee collection pays nothing.

use proptest::prelude::*;

use super::fixtures::{
    asset_a, asset_b, finalized_pool_with, market_collector, platform_collector, trader,
};
use crate::config::limits::BONE;
use crate::config::FeeSchedule;
use crate::domain::{Amount, ExactInSwap, ExactOutSwap, Ratio, Rounding, TradeFee};
use crate::error::PoolError;
use crate::math::{bdiv, bmul, bpow};
use crate::traits::NoStaking;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Balances in whole tokens; the fixture ledger funds 10 000 of each.
fn balance_strategy() -> impl Strategy<Value = u64> {
    10u64..=5_000u64
}

fn weight_strategy() -> impl Strategy<Value = u64> {
    1u64..=25u64
}

/// Swap fee in basis points, up to the 10% maximum.
fn fee_strategy() -> impl Strategy<Value = u32> {
    0u32..=1_000u32
}

/// Trade size as a per-mille share of the input balance.
fn trade_strategy() -> impl Strategy<Value = u64> {
    1u64..=499u64
}

fn swap_fee(bps: u32) -> FeeSchedule {
    FeeSchedule::new(Ratio::from_basis_points(bps), Ratio::ZERO, Ratio::ZERO, Ratio::ZERO)
}

fn sell_a(balance_a: u64, per_mille: u64) -> Option<ExactInSwap> {
    let amount = Amount::new(u128::from(balance_a) * BONE / 1_000 * u128::from(per_mille));
    ExactInSwap::new(asset_a(), amount, asset_b(), Amount::ZERO).ok()
}

/// Whether `actual` is within one part in ten thousand of `expected`, the
/// slack left by the `bpow` series in both pricing directions.
fn roughly_equal(actual: Amount, expected: Amount) -> bool {
    actual.get().abs_diff(expected.get()) <= expected.get() / 10_000 + 1
}

/// `(new_in/old_in)^(w_in/w_out) × new_out/old_out`, which is at least one
/// exactly when the weighted invariant did not shrink.
fn invariant_growth(
    (old_in, new_in): (Amount, Amount),
    (old_out, new_out): (Amount, Amount),
    (weight_in, weight_out): (u64, u64),
) -> Option<u128> {
    let exponent = bdiv(u128::from(weight_in), u128::from(weight_out), Rounding::HalfUp).ok()?;
    let in_ratio = bdiv(new_in.get(), old_in.get(), Rounding::HalfUp).ok()?;
    let out_ratio = bdiv(new_out.get(), old_out.get(), Rounding::HalfUp).ok()?;
    bmul(bpow(in_ratio, exponent).ok()?, out_ratio, Rounding::HalfUp).ok()
}

// ---------------------------------------------------------------------------
// Property 1: Invariant non-decrease
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_never_shrinks_invariant(
        balance_a in balance_strategy(),
        balance_b in balance_strategy(),
        weight_a in weight_strategy(),
        weight_b in weight_strategy(),
        fee in fee_strategy(),
        per_mille in trade_strategy(),
    ) {
        let pool = finalized_pool_with(
            swap_fee(fee), NoStaking, (balance_a, weight_a), (balance_b, weight_b),
        );
        let Some(request) = sell_a(balance_a, per_mille) else {
            return Ok(());
        };
        if pool.swap_exact_amount_in(trader(), request).is_err() {
            return Ok(());
        }
        let (Ok(new_a), Ok(new_b)) = (pool.balance(asset_a()), pool.balance(asset_b())) else {
            return Ok(());
        };
        let Some(growth) = invariant_growth(
            (Amount::from_tokens(balance_a), new_a),
            (Amount::from_tokens(balance_b), new_b),
            (weight_a, weight_b),
        ) else {
            return Ok(());
        };
        // bpow approximation error is far below 1e-8.
        prop_assert!(
            growth + 10_000_000_000 >= BONE,
            "invariant shrank: growth={}", growth
        );
    }
}

// ---------------------------------------------------------------------------
// Property 2: Weight conservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_weights_survive_trading_and_liquidity(
        weight_a in weight_strategy(),
        weight_b in weight_strategy(),
        per_mille in trade_strategy(),
    ) {
        let pool = finalized_pool_with(swap_fee(30), NoStaking, (1_000, weight_a), (1_000, weight_b));
        if let Some(request) = sell_a(1_000, per_mille) {
            let _ = pool.swap_exact_amount_in(trader(), request);
        }
        let _ = pool.join_pool(trader(), Amount::from_tokens(1), [Amount::MAX, Amount::MAX]);
        let _ = pool.joinswap_extern_amount_in(
            trader(), asset_b(), Amount::from_tokens(5), Amount::ZERO,
        );

        prop_assert_eq!(pool.denormalized_weight(asset_a()), Ok(Ratio::from_integer(weight_a)));
        prop_assert_eq!(pool.denormalized_weight(asset_b()), Ok(Ratio::from_integer(weight_b)));
        prop_assert_eq!(
            pool.total_denormalized_weight(),
            Ok(Ratio::from_integer(weight_a + weight_b))
        );
    }
}

// ---------------------------------------------------------------------------
// Property 3: Swap reversibility
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip_loses_value(
        balance_a in balance_strategy(),
        balance_b in balance_strategy(),
        weight_a in weight_strategy(),
        weight_b in weight_strategy(),
        fee in 1u32..=1_000u32,
        per_mille in 1u64..=200u64,
    ) {
        let pool = finalized_pool_with(
            swap_fee(fee), NoStaking, (balance_a, weight_a), (balance_b, weight_b),
        );
        let Some(request) = sell_a(balance_a, per_mille) else {
            return Ok(());
        };
        let sold = request.amount_in();
        let Ok(first) = pool.swap_exact_amount_in(trader(), request) else {
            return Ok(());
        };
        let Ok(back) = ExactInSwap::new(asset_b(), first.amount_out(), asset_a(), Amount::ZERO) else {
            return Ok(());
        };
        let Ok(second) = pool.swap_exact_amount_in(trader(), back) else {
            return Ok(());
        };
        prop_assert!(
            second.amount_out() <= sold,
            "round trip gained value: {} > {}", second.amount_out(), sold
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_exact_out_inverts_exact_in(
        balance_a in balance_strategy(),
        balance_b in balance_strategy(),
        weight_a in weight_strategy(),
        weight_b in weight_strategy(),
        fee in fee_strategy(),
        per_mille in 1u64..=300u64,
    ) {
        let pool = finalized_pool_with(
            swap_fee(fee), NoStaking, (balance_a, weight_a), (balance_b, weight_b),
        );
        let Some(request) = sell_a(balance_a, per_mille) else {
            return Ok(());
        };
        let sold = request.amount_in();
        let Ok(forward) = pool.quote_exact_in(&request) else {
            return Ok(());
        };
        let Ok(inverse) = ExactOutSwap::new(asset_a(), Amount::MAX, asset_b(), forward.amount_out())
        else {
            return Ok(());
        };
        // Large trades against a heavy output weight can exceed the out ratio.
        let Ok(backward) = pool.quote_exact_out(&inverse) else {
            return Ok(());
        };
        prop_assert!(
            roughly_equal(backward.amount_in(), sold),
            "exact out of {} costs {}, sold {}", forward.amount_out(), backward.amount_in(), sold
        );
    }

    #[test]
    fn prop_exact_in_inverts_exact_out(
        balance_a in balance_strategy(),
        balance_b in balance_strategy(),
        weight_a in weight_strategy(),
        weight_b in weight_strategy(),
        fee in fee_strategy(),
        per_mille in 1u64..=300u64,
    ) {
        let pool = finalized_pool_with(
            swap_fee(fee), NoStaking, (balance_a, weight_a), (balance_b, weight_b),
        );
        let bought = Amount::new(u128::from(balance_b) * BONE / 1_000 * u128::from(per_mille));
        let Ok(request) = ExactOutSwap::new(asset_a(), Amount::MAX, asset_b(), bought) else {
            return Ok(());
        };
        let Ok(forward) = pool.quote_exact_out(&request) else {
            return Ok(());
        };
        let Ok(inverse) = ExactInSwap::new(asset_a(), forward.amount_in(), asset_b(), Amount::ZERO)
        else {
            return Ok(());
        };
        // The required input can exceed the in ratio for light input weights.
        let Ok(backward) = pool.quote_exact_in(&inverse) else {
            return Ok(());
        };
        prop_assert!(
            roughly_equal(backward.amount_out(), bought),
            "exact in of {} buys {}, wanted {}", forward.amount_in(), backward.amount_out(), bought
        );
    }
}

// ---------------------------------------------------------------------------
// Property 4: Monotonic price impact
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_larger_trades_get_worse_prices(
        balance_a in balance_strategy(),
        balance_b in balance_strategy(),
        weight_a in weight_strategy(),
        weight_b in weight_strategy(),
        small in 1u64..=250u64,
        extra in 1u64..=249u64,
    ) {
        let pool = finalized_pool_with(
            swap_fee(30), NoStaking, (balance_a, weight_a), (balance_b, weight_b),
        );
        let (Some(little), Some(large)) = (sell_a(balance_a, small), sell_a(balance_a, small + extra)) else {
            return Ok(());
        };
        let (Ok(little), Ok(large)) = (pool.quote_exact_in(&little), pool.quote_exact_in(&large)) else {
            return Ok(());
        };
        prop_assert!(little.amount_out() <= large.amount_out());
        prop_assert!(little.spot_price_after() <= large.spot_price_after());
    }

    #[test]
    fn prop_trades_above_half_the_balance_are_rejected(
        balance_a in balance_strategy(),
        per_mille in 501u64..=1_000u64,
    ) {
        let pool = finalized_pool_with(swap_fee(30), NoStaking, (balance_a, 5), (1_000, 5));
        let Some(request) = sell_a(balance_a, per_mille) else {
            return Ok(());
        };
        prop_assert_eq!(pool.quote_exact_in(&request), Err(PoolError::InRatioExceeded));
    }
}

// ---------------------------------------------------------------------------
// Property 5: Fee collection idempotence
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_second_collection_pays_nothing(
        platform_bps in 1u32..=500u32,
        publisher_bps in 1u32..=500u32,
        market_bps in 0u32..=100u32,
        per_mille in 1u64..=100u64,
    ) {
        let fees = FeeSchedule::new(
            Ratio::from_basis_points(30),
            Ratio::from_basis_points(publisher_bps),
            Ratio::from_basis_points(platform_bps),
            Ratio::ZERO,
        );
        let pool = finalized_pool_with(fees, NoStaking, (1_000, 5), (1_000, 5));
        let market = TradeFee::new(market_collector(), Ratio::from_basis_points(market_bps));
        let Some(request) = sell_a(1_000, per_mille) else {
            return Ok(());
        };
        let Ok(outcome) = pool.swap_exact_amount_in(trader(), request.with_market_fee(market)) else {
            return Ok(());
        };

        let Ok(first) = pool.collect_platform_fees(trader()) else {
            return Err(TestCaseError::fail("collection failed"));
        };
        let paid = first
            .iter()
            .try_fold(Amount::ZERO, |total, (_, amount)| total.checked_add(amount));
        prop_assert_eq!(paid, Some(outcome.fees().platform));
        prop_assert_eq!(
            pool.ledger().balance_of(asset_a(), platform_collector()),
            outcome.fees().platform
        );
        prop_assert_eq!(pool.collect_platform_fees(trader()), Ok(Vec::new()));
        prop_assert_eq!(pool.platform_fees(asset_a()), Ok(Amount::ZERO));

        let Ok(_) = pool.collect_market_fees(trader()) else {
            return Err(TestCaseError::fail("collection failed"));
        };
        prop_assert_eq!(pool.collect_market_fees(trader()), Ok(Vec::new()));
    }
}
