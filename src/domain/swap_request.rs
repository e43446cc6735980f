//! Caller-supplied swap parameters.

use serde::{Deserialize, Serialize};

use super::{Address, Amount, Ratio};
use crate::error::{PoolError, Result};

/// The per-trade market fee: a rate charged on the gross input and paid to
/// the market that routed the trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TradeFee {
    collector: Address,
    rate: Ratio,
}

impl TradeFee {
    /// No market fee.
    pub const NONE: Self = Self {
        collector: Address::zero(),
        rate: Ratio::ZERO,
    };

    /// Creates a market fee paid to `collector` at `rate`.
    #[must_use]
    pub const fn new(collector: Address, rate: Ratio) -> Self {
        Self { collector, rate }
    }

    /// Account the fee is paid to.
    #[must_use]
    pub const fn collector(&self) -> Address {
        self.collector
    }

    /// Fee rate.
    pub const fn rate(&self) -> Ratio {
        self.rate
    }
}

/// Parameters of an exact-input swap.
///
/// # Examples
///
/// ```
/// use datapool_amm::domain::{Address, Amount, ExactInSwap, Ratio};
///
/// let base = Address::from_bytes([1u8; 32]);
/// let data = Address::from_bytes([2u8; 32]);
/// let swap = ExactInSwap::new(base, Amount::from_tokens(10), data, Amount::ZERO)
///     .expect("distinct assets")
///     .with_max_price(Ratio::from_integer(2));
/// assert_eq!(swap.max_price(), Ratio::from_integer(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactInSwap {
    asset_in: Address,
    amount_in: Amount,
    asset_out: Address,
    min_amount_out: Amount,
    max_price: Ratio,
    market_fee: TradeFee,
}

impl ExactInSwap {
    /// Creates an exact-input swap with no price limit and no market fee.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidArgument`] if the assets are identical.
    /// - [`PoolError::Approximation`] if `amount_in` is zero.
    pub fn new(
        asset_in: Address,
        amount_in: Amount,
        asset_out: Address,
        min_amount_out: Amount,
    ) -> Result<Self> {
        if asset_in == asset_out {
            return Err(PoolError::InvalidArgument("swap assets must differ"));
        }
        if amount_in.is_zero() {
            return Err(PoolError::Approximation("amount in is zero"));
        }
        Ok(Self {
            asset_in,
            amount_in,
            asset_out,
            min_amount_out,
            max_price: Ratio::new(u128::MAX),
            market_fee: TradeFee::NONE,
        })
    }

    /// Sets the highest acceptable spot price (input per output).
    pub const fn with_max_price(mut self, max_price: Ratio) -> Self {
        self.max_price = max_price;
        self
    }

    /// Attaches a per-trade market fee.
    #[must_use]
    pub const fn with_market_fee(mut self, fee: TradeFee) -> Self {
        self.market_fee = fee;
        self
    }

    /// Asset sold.
    #[must_use]
    pub const fn asset_in(&self) -> Address {
        self.asset_in
    }

    /// Exact gross input.
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// Asset bought.
    #[must_use]
    pub const fn asset_out(&self) -> Address {
        self.asset_out
    }

    /// Minimum acceptable output.
    pub const fn min_amount_out(&self) -> Amount {
        self.min_amount_out
    }

    /// Spot-price ceiling.
    pub const fn max_price(&self) -> Ratio {
        self.max_price
    }

    /// Per-trade market fee.
    #[must_use]
    pub const fn market_fee(&self) -> TradeFee {
        self.market_fee
    }
}

/// Parameters of an exact-output swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactOutSwap {
    asset_in: Address,
    max_amount_in: Amount,
    asset_out: Address,
    amount_out: Amount,
    max_price: Ratio,
    market_fee: TradeFee,
}

impl ExactOutSwap {
    /// Creates an exact-output swap with no price limit and no market fee.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidArgument`] if the assets are identical.
    /// - [`PoolError::Approximation`] if `amount_out` is zero.
    pub fn new(
        asset_in: Address,
        max_amount_in: Amount,
        asset_out: Address,
        amount_out: Amount,
    ) -> Result<Self> {
        if asset_in == asset_out {
            return Err(PoolError::InvalidArgument("swap assets must differ"));
        }
        if amount_out.is_zero() {
            return Err(PoolError::Approximation("amount out is zero"));
        }
        Ok(Self {
            asset_in,
            max_amount_in,
            asset_out,
            amount_out,
            max_price: Ratio::new(u128::MAX),
            market_fee: TradeFee::NONE,
        })
    }

    /// Sets the highest acceptable spot price (input per output).
    pub const fn with_max_price(mut self, max_price: Ratio) -> Self {
        self.max_price = max_price;
        self
    }

    /// Attaches a per-trade market fee.
    #[must_use]
    pub const fn with_market_fee(mut self, fee: TradeFee) -> Self {
        self.market_fee = fee;
        self
    }

    /// Asset sold.
    #[must_use]
    pub const fn asset_in(&self) -> Address {
        self.asset_in
    }

    /// Maximum acceptable gross input.
    pub const fn max_amount_in(&self) -> Amount {
        self.max_amount_in
    }

    /// Asset bought.
    #[must_use]
    pub const fn asset_out(&self) -> Address {
        self.asset_out
    }

    /// Exact output.
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }

    /// Spot-price ceiling.
    pub const fn max_price(&self) -> Ratio {
        self.max_price
    }

    /// Per-trade market fee.
    #[must_use]
    pub const fn market_fee(&self) -> TradeFee {
        self.market_fee
    }
}
