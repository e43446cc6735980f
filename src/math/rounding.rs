//! Rounding helpers for integer division.
//!
//! [`div_round`] performs `u128` division with an explicit [`Rounding`]
//! direction.  Wide products go through
//! [`mul_div`](crate::math::mul_div) instead.
//!
//! # Convention
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Intermediate pricing step | [`Rounding::HalfUp`] |
//! | Amount paid out of the pool | [`Rounding::Down`] |
//! | Amount charged to a caller | [`Rounding::Up`] |
//!
//! # Examples
//!
//! ```
//! use datapool_amm::domain::Rounding;
//! use datapool_amm::math::div_round;
//!
//! assert_eq!(div_round(10, 3, Rounding::Down), Some(3));
//! assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
//! assert_eq!(div_round(10, 4, Rounding::HalfUp), Some(3));
//! assert_eq!(div_round(10, 0, Rounding::Down), None);
//! ```

use crate::domain::Rounding;

/// Integer division of `u128` values with explicit rounding direction.
///
/// - [`Rounding::Down`]: floor division.
/// - [`Rounding::Up`]: ceiling division.
/// - [`Rounding::HalfUp`]: nearest integer, ties rounded up.
///
/// Returns [`None`] if `denominator` is zero.
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let q = numerator / denominator;
    let r = numerator % denominator;
    // q + 1 cannot overflow: r != 0 implies denominator > 1, so q < u128::MAX.
    match rounding {
        Rounding::Down => Some(q),
        Rounding::Up => {
            if r != 0 {
                Some(q + 1)
            } else {
                Some(q)
            }
        }
        Rounding::HalfUp => {
            if r != 0 && r >= denominator - r {
                Some(q + 1)
            } else {
                Some(q)
            }
        }
    }
}
