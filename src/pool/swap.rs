//! Exact-in and exact-out swaps, their quotes and the fee split.

use tracing::debug;

use super::settlement::Settlement;
use super::state::PoolState;
use super::weighted_pool::{portion, WeightedPool};
use crate::config::check_fee;
use crate::config::limits::{MAX_IN_RATIO, MAX_OUT_RATIO};
use crate::domain::{
    Address, Amount, ExactInSwap, ExactOutSwap, FeeBreakdown, PoolEvent, Ratio, Rounding,
    SwapOutcome, TradeFee,
};
use crate::error::{PoolError, Result};
use crate::math::{
    bdiv, calc_in_given_out, calc_out_given_in, calc_spot_price, CheckedArithmetic, Side,
};
use crate::traits::{AssetLedger, SideStaking};

/// A fully validated swap, ready to be applied.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SwapPlan {
    asset_in: Address,
    asset_out: Address,
    market_fee: TradeFee,
    outcome: SwapOutcome,
}

impl<L: AssetLedger, S: SideStaking> WeightedPool<L, S> {
    /// Sells exactly `request.amount_in()` for at least
    /// `request.min_amount_out()`.
    ///
    /// # Errors
    ///
    /// - [`PoolError::Reentry`]; [`PoolError::NotFinalized`] if public
    ///   swapping is off; [`PoolError::NotBound`].
    /// - [`PoolError::InRatioExceeded`], [`PoolError::BadLimitPrice`],
    ///   [`PoolError::LimitOutExceeded`], [`PoolError::LimitPriceExceeded`],
    ///   [`PoolError::Approximation`].
    /// - Arithmetic and transfer errors.
    pub fn swap_exact_amount_in(&self, caller: Address, request: ExactInSwap) -> Result<SwapOutcome> {
        let outcome = self.transact("swap_exact_amount_in", |settlement| {
            self.with_state(|state| {
                require_public_swap(state)?;
                let plan = plan_exact_in(state, &request)?;
                apply(state, settlement, caller, &plan)?;
                Ok(plan.outcome)
            })
        })?;
        debug!(%caller, %outcome, "swap exact in");
        Ok(outcome)
    }

    /// Buys exactly `request.amount_out()` for at most
    /// `request.max_amount_in()`.
    ///
    /// # Errors
    ///
    /// As [`swap_exact_amount_in`](Self::swap_exact_amount_in), with
    /// [`PoolError::OutRatioExceeded`] and [`PoolError::LimitInExceeded`] in
    /// place of their exact-in counterparts.
    pub fn swap_exact_amount_out(
        &self,
        caller: Address,
        request: ExactOutSwap,
    ) -> Result<SwapOutcome> {
        let outcome = self.transact("swap_exact_amount_out", |settlement| {
            self.with_state(|state| {
                require_public_swap(state)?;
                let plan = plan_exact_out(state, &request)?;
                apply(state, settlement, caller, &plan)?;
                Ok(plan.outcome)
            })
        })?;
        debug!(%caller, %outcome, "swap exact out");
        Ok(outcome)
    }

    /// What [`swap_exact_amount_in`](Self::swap_exact_amount_in) would do
    /// right now, without doing it.
    ///
    /// # Errors
    ///
    /// Every guard error of the swap except the public-swap check.
    pub fn quote_exact_in(&self, request: &ExactInSwap) -> Result<SwapOutcome> {
        self.read(|state| plan_exact_in(state, request).map(|plan| plan.outcome))
    }

    /// What [`swap_exact_amount_out`](Self::swap_exact_amount_out) would do
    /// right now, without doing it.
    ///
    /// # Errors
    ///
    /// Every guard error of the swap except the public-swap check.
    pub fn quote_exact_out(&self, request: &ExactOutSwap) -> Result<SwapOutcome> {
        self.read(|state| plan_exact_out(state, request).map(|plan| plan.outcome))
    }
}

// -- planning ---------------------------------------------------------------

fn require_public_swap(state: &PoolState) -> Result<()> {
    if !state.public_swap {
        return Err(PoolError::NotFinalized);
    }
    Ok(())
}

pub(crate) fn plan_exact_in(state: &PoolState, request: &ExactInSwap) -> Result<SwapPlan> {
    let (side_in, side_out) = sides(state, request.asset_in(), request.asset_out())?;
    check_market_fee(request.market_fee())?;
    let fee = total_fee_rate(state, request.market_fee().rate())?;
    let amount_in = request.amount_in();

    if amount_in > portion(side_in.balance, Ratio::new(MAX_IN_RATIO), Rounding::Down)? {
        return Err(PoolError::InRatioExceeded);
    }
    let spot_before = calc_spot_price(side_in, side_out, fee)?;
    if spot_before > request.max_price() {
        return Err(PoolError::BadLimitPrice);
    }
    let amount_out = calc_out_given_in(side_in, side_out, amount_in, fee)?;
    if amount_out < request.min_amount_out() {
        return Err(PoolError::LimitOutExceeded);
    }

    finish_plan(
        state,
        (request.asset_in(), side_in),
        (request.asset_out(), side_out),
        (amount_in, amount_out),
        spot_before,
        request.max_price(),
        request.market_fee(),
    )
}

pub(crate) fn plan_exact_out(state: &PoolState, request: &ExactOutSwap) -> Result<SwapPlan> {
    let (side_in, side_out) = sides(state, request.asset_in(), request.asset_out())?;
    check_market_fee(request.market_fee())?;
    let fee = total_fee_rate(state, request.market_fee().rate())?;
    let amount_out = request.amount_out();

    if amount_out > portion(side_out.balance, Ratio::new(MAX_OUT_RATIO), Rounding::Down)? {
        return Err(PoolError::OutRatioExceeded);
    }
    let spot_before = calc_spot_price(side_in, side_out, fee)?;
    if spot_before > request.max_price() {
        return Err(PoolError::BadLimitPrice);
    }
    let amount_in = calc_in_given_out(side_in, side_out, amount_out, fee)?;
    if amount_in > request.max_amount_in() {
        return Err(PoolError::LimitInExceeded);
    }

    finish_plan(
        state,
        (request.asset_in(), side_in),
        (request.asset_out(), side_out),
        (amount_in, amount_out),
        spot_before,
        request.max_price(),
        request.market_fee(),
    )
}

/// Splits the fees, simulates the post-trade balances and runs the
/// price-movement guards shared by both swap directions.
fn finish_plan(
    state: &PoolState,
    (asset_in, side_in): (Address, Side),
    (asset_out, side_out): (Address, Side),
    (amount_in, amount_out): (Amount, Amount),
    spot_before: Ratio,
    max_price: Ratio,
    market_fee: TradeFee,
) -> Result<SwapPlan> {
    if amount_out.is_zero() {
        return Err(PoolError::Approximation("amount out rounds to zero"));
    }
    let fees = FeeBreakdown {
        lp: portion(amount_in, state.swap_fee, Rounding::Down)?,
        platform: portion(amount_in, state.platform_fee, Rounding::Down)?,
        publisher: portion(amount_in, state.publisher_market_fee, Rounding::Down)?,
        market: portion(amount_in, market_fee.rate(), Rounding::Down)?,
    };

    let after_in = Side::new(
        side_in.balance.safe_add(&amount_in)?.safe_sub(&fees.skimmed()?)?,
        side_in.weight,
    );
    let after_out = Side::new(side_out.balance.safe_sub(&amount_out)?, side_out.weight);
    let fee = total_fee_rate(state, market_fee.rate())?;
    let spot_after = calc_spot_price(after_in, after_out, fee)?;

    if spot_after < spot_before {
        return Err(PoolError::Approximation("spot price moved backwards"));
    }
    if spot_after > max_price {
        return Err(PoolError::LimitPriceExceeded);
    }
    let average_price = bdiv(amount_in.get(), amount_out.get(), Rounding::HalfUp)?;
    if spot_before > Ratio::new(average_price) {
        return Err(PoolError::Approximation("average price below spot price"));
    }

    Ok(SwapPlan {
        asset_in,
        asset_out,
        market_fee,
        outcome: SwapOutcome::new(amount_in, amount_out, spot_after, fees)?,
    })
}

/// Balance and weight of both legs.
fn sides(state: &PoolState, asset_in: Address, asset_out: Address) -> Result<(Side, Side)> {
    if asset_in == asset_out {
        return Err(PoolError::InvalidArgument("swap assets must differ"));
    }
    let record_in = state.registry.record(asset_in)?;
    let record_out = state.registry.record(asset_out)?;
    Ok((
        Side::new(record_in.balance(), record_in.weight()),
        Side::new(record_out.balance(), record_out.weight()),
    ))
}

/// `swap + platform + publisher + trade market` fee rate.
pub(crate) fn total_fee_rate(state: &PoolState, market_rate: Ratio) -> Result<Ratio> {
    check_fee(market_rate, "trade market fee")?;
    state
        .swap_fee
        .safe_add(&state.platform_fee)?
        .safe_add(&state.publisher_market_fee)?
        .safe_add(&market_rate)
}

fn check_market_fee(market_fee: TradeFee) -> Result<()> {
    if !market_fee.rate().is_zero() && market_fee.collector().is_zero() {
        return Err(PoolError::InvalidArgument("market fee has no collector"));
    }
    Ok(())
}

// -- effects ----------------------------------------------------------------

fn apply(
    state: &mut PoolState,
    settlement: &mut Settlement,
    caller: Address,
    plan: &SwapPlan,
) -> Result<()> {
    let outcome = plan.outcome;
    let fees = outcome.fees();

    let record_in = state.registry.record_mut(plan.asset_in)?;
    record_in.set_balance(record_in.balance().safe_add(&outcome.balance_in_delta()?)?);
    let record_out = state.registry.record_mut(plan.asset_out)?;
    record_out.set_balance(record_out.balance().safe_sub(&outcome.amount_out())?);

    state.fees.accrue_platform(plan.asset_in, fees.platform)?;
    state.fees.accrue_publisher(plan.asset_in, fees.publisher)?;

    state.emit(PoolEvent::Swap {
        caller,
        asset_in: plan.asset_in,
        asset_out: plan.asset_out,
        amount_in: outcome.amount_in(),
        amount_out: outcome.amount_out(),
    });
    if !fees.market.is_zero() {
        state.emit(PoolEvent::MarketFeePaid {
            collector: plan.market_fee.collector(),
            asset: plan.asset_in,
            amount: fees.market,
        });
    }

    settlement.pull(plan.asset_in, caller, outcome.amount_in());
    settlement.push(plan.asset_in, plan.market_fee.collector(), fees.market);
    settlement.push(plan.asset_out, caller, outcome.amount_out());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::FeeSchedule;
    use crate::math::bmul;
    use crate::pool::fixtures::{
        asset_a, asset_b, finalized_pool, market_collector, platform_collector, trader,
    };

    fn tokens(n: u64) -> Amount {
        Amount::from_tokens(n)
    }

    fn exact_in(amount: u64) -> ExactInSwap {
        let Ok(request) = ExactInSwap::new(asset_a(), tokens(amount), asset_b(), Amount::ZERO)
        else {
            panic!("request");
        };
        request
    }

    #[test]
    fn zero_fee_exact_in_matches_closed_form() {
        let pool = finalized_pool(FeeSchedule::default());
        let Ok(outcome) = pool.swap_exact_amount_in(trader(), exact_in(10)) else {
            panic!("swap");
        };
        // 100 × (1 − 100/110)
        assert_eq!(outcome.amount_out(), Amount::new(9_090_909_090_909_090_900));
        assert_eq!(pool.balance(asset_a()), Ok(tokens(110)));
        assert_eq!(
            pool.balance(asset_b()),
            Ok(Amount::new(100_000_000_000_000_000_000 - 9_090_909_090_909_090_900))
        );
    }

    #[test]
    fn quote_matches_swap_and_leaves_state_alone() {
        let fees = FeeSchedule::new(
            Ratio::from_basis_points(30),
            Ratio::from_basis_points(10),
            Ratio::from_basis_points(5),
            Ratio::ZERO,
        );
        let pool = finalized_pool(fees);
        let Ok(quote) = pool.quote_exact_in(&exact_in(5)) else {
            panic!("quote");
        };
        assert_eq!(pool.balance(asset_a()), Ok(tokens(100)));
        let Ok(outcome) = pool.swap_exact_amount_in(trader(), exact_in(5)) else {
            panic!("swap");
        };
        assert_eq!(quote, outcome);
    }

    #[test]
    fn fee_skims_accrue_and_leave_the_balance() {
        let fees = FeeSchedule::new(
            Ratio::from_basis_points(30),
            Ratio::from_basis_points(10),
            Ratio::from_basis_points(20),
            Ratio::ZERO,
        );
        let pool = finalized_pool(fees);
        let market = TradeFee::new(market_collector(), Ratio::from_basis_points(50));
        let Ok(outcome) = pool.swap_exact_amount_in(trader(), exact_in(10).with_market_fee(market))
        else {
            panic!("swap");
        };
        let breakdown = outcome.fees();
        assert_eq!(breakdown.platform, Amount::new(20_000_000_000_000_000));
        assert_eq!(breakdown.publisher, Amount::new(10_000_000_000_000_000));
        assert_eq!(breakdown.market, Amount::new(50_000_000_000_000_000));
        assert_eq!(breakdown.lp, Amount::new(30_000_000_000_000_000));
        assert_eq!(pool.platform_fees(asset_a()), Ok(breakdown.platform));
        assert_eq!(pool.publisher_fees(asset_a()), Ok(breakdown.publisher));
        assert_eq!(
            pool.ledger().balance_of(asset_a(), market_collector()),
            breakdown.market
        );
        assert_eq!(
            pool.balance(asset_a()),
            Ok(Amount::new(110_000_000_000_000_000_000 - 80_000_000_000_000_000))
        );
        assert_eq!(
            pool.ledger().balance_of(asset_a(), platform_collector()),
            Amount::ZERO
        );
    }

    #[test]
    fn oversized_input_rejected() {
        let pool = finalized_pool(FeeSchedule::default());
        assert_eq!(
            pool.swap_exact_amount_in(trader(), exact_in(51)),
            Err(PoolError::InRatioExceeded)
        );
        assert_eq!(pool.balance(asset_a()), Ok(tokens(100)));
    }

    #[test]
    fn oversized_output_rejected() {
        let pool = finalized_pool(FeeSchedule::default());
        let Ok(request) = ExactOutSwap::new(asset_a(), Amount::MAX, asset_b(), tokens(34)) else {
            panic!("request");
        };
        assert_eq!(
            pool.swap_exact_amount_out(trader(), request),
            Err(PoolError::OutRatioExceeded)
        );
    }

    #[test]
    fn limits_are_enforced() {
        let pool = finalized_pool(FeeSchedule::default());
        let Ok(greedy) = ExactInSwap::new(asset_a(), tokens(10), asset_b(), tokens(10)) else {
            panic!("request");
        };
        assert_eq!(
            pool.swap_exact_amount_in(trader(), greedy),
            Err(PoolError::LimitOutExceeded)
        );

        let Ok(stingy) = ExactOutSwap::new(asset_a(), tokens(10), asset_b(), tokens(10)) else {
            panic!("request");
        };
        assert_eq!(
            pool.swap_exact_amount_out(trader(), stingy),
            Err(PoolError::LimitInExceeded)
        );

        let below_spot = exact_in(1).with_max_price(Ratio::new(999_999_999_999_999_999));
        assert_eq!(
            pool.swap_exact_amount_in(trader(), below_spot),
            Err(PoolError::BadLimitPrice)
        );

        let tight = exact_in(10).with_max_price(Ratio::from_basis_points(10_100));
        assert_eq!(
            pool.swap_exact_amount_in(trader(), tight),
            Err(PoolError::LimitPriceExceeded)
        );
    }

    #[test]
    fn exact_out_charges_at_least_the_closed_form() {
        let pool = finalized_pool(FeeSchedule::default());
        let Ok(request) = ExactOutSwap::new(asset_a(), tokens(20), asset_b(), tokens(10)) else {
            panic!("request");
        };
        let Ok(outcome) = pool.swap_exact_amount_out(trader(), request) else {
            panic!("swap");
        };
        // 100 × (100/90 − 1) = 11.111…
        let exact = 11_111_111_111_111_111_111u128;
        assert!(outcome.amount_in().get() >= exact);
        assert!(outcome.amount_in().get() - exact < 1_000_000);
        assert_eq!(pool.balance(asset_b()), Ok(tokens(90)));
    }

    #[test]
    fn swaps_require_public_swap() {
        let pool = crate::pool::fixtures::empty_pool(FeeSchedule::default());
        assert_eq!(
            pool.swap_exact_amount_in(trader(), exact_in(1)),
            Err(PoolError::NotFinalized)
        );
    }

    #[test]
    fn market_fee_needs_a_collector() {
        let pool = finalized_pool(FeeSchedule::default());
        let orphan = TradeFee::new(Address::zero(), Ratio::from_basis_points(10));
        assert!(matches!(
            pool.swap_exact_amount_in(trader(), exact_in(1).with_market_fee(orphan)),
            Err(PoolError::InvalidArgument(_))
        ));
        let steep = TradeFee::new(market_collector(), Ratio::from_basis_points(1_001));
        assert!(matches!(
            pool.quote_exact_in(&exact_in(1).with_market_fee(steep)),
            Err(PoolError::FeeOutOfRange(_))
        ));
    }

    #[test]
    fn swap_does_not_lower_the_invariant() {
        let fees = FeeSchedule::new(Ratio::from_basis_points(30), Ratio::ZERO, Ratio::ZERO, Ratio::ZERO);
        let pool = finalized_pool(fees);
        let Ok(before) = bmul(tokens(100).get(), tokens(100).get(), Rounding::Down) else {
            panic!("invariant");
        };
        let Ok(_) = pool.swap_exact_amount_in(trader(), exact_in(20)) else {
            panic!("swap");
        };
        let (Ok(a), Ok(b)) = (pool.balance(asset_a()), pool.balance(asset_b())) else {
            panic!("balances");
        };
        let Ok(after) = bmul(a.get(), b.get(), Rounding::Down) else {
            panic!("invariant");
        };
        assert!(after >= before);
    }
}
