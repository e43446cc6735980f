//! Checked arithmetic trait for domain wrapper types.
//!
//! The [`CheckedArithmetic`] trait provides fallible addition and
//! subtraction that return [`Result<Self, PoolError>`](crate::error::PoolError)
//! instead of panicking or wrapping.  Fixed-point products and quotients go
//! through [`bmul`](crate::math::bmul) and [`bdiv`](crate::math::bdiv), which
//! take an explicit rounding direction.
//!
//! # Implementations
//!
//! - [`Amount`]: asset and share quantities
//! - [`Ratio`]: weights, fee rates and prices
//!
//! # Examples
//!
//! ```
//! use datapool_amm::domain::Amount;
//! use datapool_amm::math::CheckedArithmetic;
//!
//! let a = Amount::from_tokens(3);
//! let b = Amount::from_tokens(2);
//! assert_eq!(a.safe_add(&b), Ok(Amount::from_tokens(5)));
//! assert!(b.safe_sub(&a).is_err());
//! ```

use crate::domain::{Amount, Ratio};
use crate::error::PoolError;

/// Fallible arithmetic for domain wrapper types.
///
/// # Contract
///
/// - **No panics**: all error conditions produce `Err`.
/// - **No saturation**: errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_add(&self, other: &Self) -> Result<Self, PoolError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, PoolError>;
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, PoolError> {
        self.checked_add(other)
            .ok_or(PoolError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, PoolError> {
        self.checked_sub(other)
            .ok_or(PoolError::Underflow("amount subtraction underflow"))
    }
}

// ---------------------------------------------------------------------------
// Ratio
// ---------------------------------------------------------------------------

impl CheckedArithmetic for Ratio {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, PoolError> {
        self.get()
            .checked_add(other.get())
            .map(Ratio::new)
            .ok_or(PoolError::Overflow("ratio addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, PoolError> {
        self.get()
            .checked_sub(other.get())
            .map(Ratio::new)
            .ok_or(PoolError::Underflow("ratio subtraction underflow"))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Amount
    // -----------------------------------------------------------------------

    mod amount {
        use super::*;

        // -- safe_add -------------------------------------------------------

        #[test]
        fn add_ok() {
            let Ok(r) = Amount::new(100).safe_add(&Amount::new(200)) else {
                panic!("expected Ok");
            };
            assert_eq!(r, Amount::new(300));
        }

        #[test]
        fn add_overflow() {
            let Err(PoolError::Overflow(_)) = Amount::MAX.safe_add(&Amount::new(1)) else {
                panic!("expected Overflow");
            };
        }

        // -- safe_sub -------------------------------------------------------

        #[test]
        fn sub_underflow() {
            let Err(PoolError::Underflow(_)) = Amount::new(1).safe_sub(&Amount::new(2)) else {
                panic!("expected Underflow");
            };
        }
    }

    // -----------------------------------------------------------------------
    // Ratio
    // -----------------------------------------------------------------------

    mod ratio {
        use super::*;

        #[test]
        fn add_and_sub() {
            assert_eq!(
                Ratio::ONE.safe_add(&Ratio::ONE),
                Ok(Ratio::from_integer(2))
            );
            assert!(Ratio::ZERO.safe_sub(&Ratio::ONE).is_err());
        }
    }
}
