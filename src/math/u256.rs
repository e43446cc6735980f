//! 256-bit intermediates for fixed-point products.
//!
//! Multiplying two `BONE`-scaled `u128` values needs up to 256 bits before
//! the rescaling division.  [`mul_div`] performs `a × b / d`, staying in
//! `u128` when the product fits and otherwise widening to 256 bits before
//! narrowing the result back.

#![allow(missing_docs)]

use uint::construct_uint;

use super::div_round;
use crate::domain::Rounding;

construct_uint! {
    /// 256-bit unsigned integer.
    pub struct U256(4);
}

/// Narrows a 256-bit value to `u128`, returning `None` if it does not fit.
#[must_use]
pub fn narrow(value: U256) -> Option<u128> {
    if value > U256::from(u128::MAX) {
        return None;
    }
    Some(value.low_u128())
}

/// Computes `a × b / d` with the given rounding.
///
/// Returns `None` if `d` is zero or the quotient exceeds `u128::MAX`.
///
/// # Examples
///
/// ```
/// use datapool_amm::domain::Rounding;
/// use datapool_amm::math::mul_div;
///
/// assert_eq!(mul_div(u128::MAX, 2, 4, Rounding::Down), Some(u128::MAX / 2));
/// assert_eq!(mul_div(10, 1, 4, Rounding::HalfUp), Some(3));
/// assert_eq!(mul_div(1, 1, 0, Rounding::Down), None);
/// ```
#[must_use]
pub fn mul_div(a: u128, b: u128, d: u128, rounding: Rounding) -> Option<u128> {
    if d == 0 {
        return None;
    }
    if let Some(product) = a.checked_mul(b) {
        return div_round(product, d, rounding);
    }
    let product = U256::from(a) * U256::from(b);
    let divisor = U256::from(d);
    let adjusted = match rounding {
        Rounding::Down => product,
        Rounding::Up => product.checked_add(divisor - U256::one())?,
        Rounding::HalfUp => product.checked_add(divisor / U256::from(2u8))?,
    };
    narrow(adjusted / divisor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_bounds() {
        assert_eq!(narrow(U256::from(u128::MAX)), Some(u128::MAX));
        assert_eq!(narrow(U256::from(u128::MAX) + U256::one()), None);
    }

    #[test]
    fn mul_div_uses_wide_product() {
        let bone = 1_000_000_000_000_000_000u128;
        let big = u128::MAX / 3;
        assert_eq!(mul_div(big, bone, bone, Rounding::Down), Some(big));
    }

    #[test]
    fn mul_div_rounding_directions() {
        assert_eq!(mul_div(7, 1, 2, Rounding::Down), Some(3));
        assert_eq!(mul_div(7, 1, 2, Rounding::Up), Some(4));
        assert_eq!(mul_div(7, 1, 2, Rounding::HalfUp), Some(4));
        assert_eq!(mul_div(5, 1, 4, Rounding::HalfUp), Some(1));
        assert_eq!(mul_div(6, 1, 3, Rounding::Up), Some(2));
    }

    #[test]
    fn mul_div_overflowing_quotient() {
        assert_eq!(mul_div(u128::MAX, 2, 1, Rounding::Down), None);
    }
}
