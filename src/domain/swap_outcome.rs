//! Outcome of a swap or swap quote.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Ratio};
use crate::error::{PoolError, Result};
use crate::math::CheckedArithmetic;

/// How the gross input of a swap is split between fee recipients.
///
/// `lp` stays in the pool balance and accrues to share holders.  The other
/// three are skimmed off the input: `platform` and `publisher` accrue in the
/// pool's fee ledgers, `market` is paid to the trade's market-fee collector
/// during settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Liquidity-provider swap fee.
    pub lp: Amount,
    /// Platform fee accrued to the platform ledger.
    pub platform: Amount,
    /// Publisher-market fee accrued to the publisher ledger.
    pub publisher: Amount,
    /// Per-trade market fee paid out immediately.
    pub market: Amount,
}

impl FeeBreakdown {
    /// Sum of the three skims that do not enter the pool balance.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Overflow`] if the sum overflows.
    pub fn skimmed(&self) -> Result<Amount> {
        self.platform
            .safe_add(&self.publisher)?
            .safe_add(&self.market)
    }
}

/// The result of a swap: amounts exchanged, fee split, and the spot price
/// the pool is left at.
///
/// # Invariants
///
/// - `amount_in > 0` and `amount_out > 0`.
/// - The fee skims never exceed `amount_in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    amount_in: Amount,
    amount_out: Amount,
    spot_price_after: Ratio,
    fees: FeeBreakdown,
}

impl SwapOutcome {
    /// Creates a validated outcome.
    ///
    /// # Errors
    ///
    /// - [`PoolError::Approximation`] if either amount is zero.
    /// - [`PoolError::Underflow`] if the skims exceed `amount_in`.
    pub fn new(
        amount_in: Amount,
        amount_out: Amount,
        spot_price_after: Ratio,
        fees: FeeBreakdown,
    ) -> Result<Self> {
        if amount_in.is_zero() {
            return Err(PoolError::Approximation("amount in rounds to zero"));
        }
        if amount_out.is_zero() {
            return Err(PoolError::Approximation("amount out rounds to zero"));
        }
        if fees.skimmed()? > amount_in {
            return Err(PoolError::Underflow("fee skims exceed amount in"));
        }
        Ok(Self {
            amount_in,
            amount_out,
            spot_price_after,
            fees,
        })
    }

    /// Gross input paid by the trader.
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// Output received by the trader.
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }

    /// Spot price (input per output, fees included) after the trade.
    pub const fn spot_price_after(&self) -> Ratio {
        self.spot_price_after
    }

    /// Fee split of the gross input.
    #[must_use]
    pub const fn fees(&self) -> FeeBreakdown {
        self.fees
    }

    /// Amount by which the input asset's pool balance grows.
    ///
    /// # Errors
    ///
    /// Propagates arithmetic errors from the fee sum.
    pub fn balance_in_delta(&self) -> Result<Amount> {
        self.amount_in.safe_sub(&self.fees.skimmed()?)
    }
}

impl fmt::Display for SwapOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SwapOutcome(in={}, out={}, price_after={})",
            self.amount_in, self.amount_out, self.spot_price_after
        )
    }
}
