//! Fixed-point scalar for weights, fee rates and prices.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::config::limits::BONE;

/// One basis point in [`BONE`] units (`10^14`).
const BPS_UNIT: u128 = BONE / 10_000;

/// A non-negative fixed-point number scaled by [`BONE`] (`10^18` = 1.0).
///
/// Used for denormalized weights (`5 × 10^18` = weight 5), fee rates
/// (`3 × 10^15` = 0.3%) and prices.
///
/// # Examples
///
/// ```
/// use datapool_amm::domain::Ratio;
///
/// assert_eq!(Ratio::from_basis_points(30).to_string(), "0.003");
/// assert_eq!(Ratio::from_integer(5).to_string(), "5");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
#[must_use]
pub struct Ratio(u128);

impl Ratio {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// One (`10^18`).
    pub const ONE: Self = Self(BONE);

    /// Creates a `Ratio` from its raw scaled representation.
    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Creates a whole-number ratio (`value × 10^18`).
    pub const fn from_integer(value: u64) -> Self {
        Self(value as u128 * BONE)
    }

    /// Creates a fraction from basis points (1 bp = 0.01%).
    pub const fn from_basis_points(bps: u32) -> Self {
        Self(bps as u128 * BPS_UNIT)
    }

    /// Returns the raw scaled value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the ratio is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / BONE;
        let frac = self.0 % BONE;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{frac:018}");
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}
