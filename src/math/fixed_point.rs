//! `BONE`-scaled fixed-point primitives.
//!
//! Values are `u128` integers where `BONE` (`10^18`) represents `1.0`.
//! Products and quotients are formed in 256 bits and narrowed back, so the
//! only overflow is a result that genuinely exceeds `u128`.
//!
//! [`bpow`] splits the exponent into a whole part, handled by repeated
//! squaring in [`bpowi`], and a fractional part, handled by a binomial
//! series that stops once a term falls below `BPOW_PRECISION`.

use super::u256::mul_div;
use crate::config::limits::{BONE, BPOW_PRECISION, MAX_BPOW_BASE, MIN_BPOW_BASE};
use crate::domain::Rounding;
use crate::error::{PoolError, Result};

/// Whole part of `a`, as an integer count.
#[must_use]
pub const fn btoi(a: u128) -> u128 {
    a / BONE
}

/// `a` truncated to a whole number of `BONE`.
#[must_use]
pub const fn bfloor(a: u128) -> u128 {
    btoi(a) * BONE
}

/// Checked addition.
///
/// # Errors
///
/// Returns [`PoolError::Overflow`] on overflow.
pub fn badd(a: u128, b: u128) -> Result<u128> {
    a.checked_add(b).ok_or(PoolError::Overflow("badd"))
}

/// Checked subtraction.
///
/// # Errors
///
/// Returns [`PoolError::Underflow`] if `b > a`.
pub fn bsub(a: u128, b: u128) -> Result<u128> {
    a.checked_sub(b).ok_or(PoolError::Underflow("bsub"))
}

/// `|a - b|` together with a flag that is `true` when `a < b`.
#[must_use]
pub const fn bsub_sign(a: u128, b: u128) -> (u128, bool) {
    if a >= b {
        (a - b, false)
    } else {
        (b - a, true)
    }
}

/// Fixed-point product `a × b / BONE`.
///
/// # Errors
///
/// Returns [`PoolError::Overflow`] if the result exceeds `u128`.
pub fn bmul(a: u128, b: u128, rounding: Rounding) -> Result<u128> {
    mul_div(a, b, BONE, rounding).ok_or(PoolError::Overflow("bmul"))
}

/// Fixed-point quotient `a × BONE / b`.
///
/// # Errors
///
/// - [`PoolError::DivisionByZero`] if `b` is zero.
/// - [`PoolError::Overflow`] if the result exceeds `u128`.
pub fn bdiv(a: u128, b: u128, rounding: Rounding) -> Result<u128> {
    if b == 0 {
        return Err(PoolError::DivisionByZero);
    }
    mul_div(a, BONE, b, rounding).ok_or(PoolError::Overflow("bdiv"))
}

/// `a^n` for a whole exponent `n`, by repeated squaring.
///
/// # Errors
///
/// Returns [`PoolError::Overflow`] if an intermediate square overflows.
pub fn bpowi(a: u128, n: u128) -> Result<u128> {
    let mut base = a;
    let mut n = n;
    let mut z = if n % 2 != 0 { base } else { BONE };
    n /= 2;
    while n != 0 {
        base = bmul(base, base, Rounding::HalfUp)?;
        if n % 2 != 0 {
            z = bmul(z, base, Rounding::HalfUp)?;
        }
        n /= 2;
    }
    Ok(z)
}

/// `base^exp` for a fixed-point exponent.
///
/// # Errors
///
/// - [`PoolError::PowBaseOutOfBounds`] if `base` lies outside
///   `[MIN_BPOW_BASE, MAX_BPOW_BASE]`.
/// - Arithmetic errors from the series.
///
/// # Examples
///
/// ```
/// use datapool_amm::math::bpow;
///
/// const BONE: u128 = 1_000_000_000_000_000_000;
/// // 1.21 ^ 0.5 = 1.1
/// let Ok(root) = bpow(1_210_000_000_000_000_000, BONE / 2) else { panic!() };
/// assert!(root.abs_diff(1_100_000_000_000_000_000) < 1_000_000_000);
/// ```
pub fn bpow(base: u128, exp: u128) -> Result<u128> {
    if !(MIN_BPOW_BASE..=MAX_BPOW_BASE).contains(&base) {
        return Err(PoolError::PowBaseOutOfBounds);
    }
    let whole = bfloor(exp);
    let remain = exp - whole;
    let whole_pow = bpowi(base, btoi(whole))?;
    if remain == 0 {
        return Ok(whole_pow);
    }
    let partial = bpow_approx(base, remain, BPOW_PRECISION)?;
    bmul(whole_pow, partial, Rounding::HalfUp)
}

/// Binomial expansion of `base^exp` for `exp < 1` and `|base - 1| < 1`.
///
/// Sums `C(exp, k) × (base - 1)^k` until a term drops below `precision`.
fn bpow_approx(base: u128, exp: u128, precision: u128) -> Result<u128> {
    let (x, x_neg) = bsub_sign(base, BONE);
    let mut term = BONE;
    let mut sum = term;
    let mut negative = false;
    let mut i: u128 = 1;
    while term >= precision {
        let big_k = i.checked_mul(BONE).ok_or(PoolError::Overflow("bpow series"))?;
        let (c, c_neg) = bsub_sign(exp, big_k - BONE);
        term = bmul(term, bmul(c, x, Rounding::HalfUp)?, Rounding::HalfUp)?;
        term = bdiv(term, big_k, Rounding::HalfUp)?;
        if term == 0 {
            break;
        }
        if x_neg {
            negative = !negative;
        }
        if c_neg {
            negative = !negative;
        }
        sum = if negative {
            bsub(sum, term)?
        } else {
            badd(sum, term)?
        };
        i += 1;
    }
    Ok(sum)
}
