//! Raw asset and pool-share quantities.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::config::limits::BONE;

/// A quantity of an asset or of pool shares in its smallest unit.
///
/// Every asset the pool handles uses 18 decimals, so one whole token is
/// `10^18` raw units and `Amount` doubles as a fixed-point number scaled by
/// [`BONE`].  The checked arithmetic here returns `None`; the pool lifts
/// those into [`PoolError`](crate::error::PoolError) through
/// [`CheckedArithmetic`](crate::math::CheckedArithmetic).
///
/// # Examples
///
/// ```
/// use datapool_amm::domain::Amount;
///
/// let a = Amount::from_tokens(2);
/// assert_eq!(a.get(), 2_000_000_000_000_000_000);
/// assert_eq!(a.checked_sub(&Amount::from_tokens(3)), None);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Maximum representable amount.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates an `Amount` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Creates an `Amount` of `tokens` whole tokens (`tokens × 10^18`).
    pub const fn from_tokens(tokens: u64) -> Self {
        Self(tokens as u128 * BONE)
    }

    /// Returns the underlying raw value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
