//! Explicit rounding direction for fixed-point arithmetic.

/// Rounding direction for fixed-point multiplication and division.
///
/// The pricing formulas use [`Rounding::HalfUp`] internally so each step
/// loses at most half a unit.  Amounts leaving the pool are finished with
/// [`Rounding::Down`] and amounts charged to a caller with
/// [`Rounding::Up`], so any residual error falls in the pool's favor.
///
/// # Examples
///
/// ```
/// use datapool_amm::domain::Rounding;
/// use datapool_amm::math::div_round;
///
/// assert_eq!(div_round(7, 2, Rounding::Down), Some(3));
/// assert_eq!(div_round(7, 2, Rounding::Up), Some(4));
/// assert_eq!(div_round(5, 4, Rounding::HalfUp), Some(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
    /// Round to nearest, ties away from zero.
    HalfUp,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns `true` if this is [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }
}
