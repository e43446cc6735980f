//! Unified error type for the pool engine.
//!
//! Every fallible operation in the crate returns [`PoolError`].  A failed
//! mutating call leaves the pool exactly as it was before the call: the
//! variant tells the caller *why* it was rejected, never that something was
//! partially applied.

use thiserror::Error;

/// Reasons a pool operation can be rejected.
///
/// Variants carrying a `&'static str` add a short context message naming the
/// check or computation that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    // -- authorization ------------------------------------------------------
    /// A controller-only operation was called by another account.
    #[error("caller is not the pool controller")]
    NotController,

    /// A publisher-market fee update was called by another account.
    #[error("caller is not the publisher market fee collector")]
    NotMarketFeeCollector,

    // -- registry & lifecycle -----------------------------------------------
    /// The asset is already registered with the pool.
    #[error("asset is already bound")]
    AlreadyBound,

    /// The asset is not registered with the pool.
    #[error("asset is not bound")]
    NotBound,

    /// The operation is only allowed before finalization.
    #[error("pool is already finalized")]
    AlreadyFinalized,

    /// The operation requires a finalized (or publicly swappable) pool.
    #[error("pool is not finalized")]
    NotFinalized,

    /// A denormalized weight lies outside `[MIN_WEIGHT, MAX_WEIGHT]`.
    #[error("weight out of range")]
    WeightOutOfRange,

    /// The sum of denormalized weights would exceed `MAX_TOTAL_WEIGHT`.
    #[error("total weight exceeds maximum")]
    TotalWeightExceeded,

    /// A bound balance would fall below `MIN_BALANCE`.
    #[error("balance below minimum")]
    BalanceTooLow,

    /// Binding would exceed the two-asset capacity.
    #[error("maximum number of bound assets reached")]
    MaxTokensExceeded,

    /// Finalization requires both assets to be bound.
    #[error("both assets must be bound")]
    MinTokensRequired,

    /// A fee rate lies outside `[MIN_FEE, MAX_FEE]`.
    #[error("fee out of range: {0}")]
    FeeOutOfRange(&'static str),

    // -- trade guards -------------------------------------------------------
    /// The input amount exceeds `balance_in × MAX_IN_RATIO`.
    #[error("amount in exceeds max in ratio")]
    InRatioExceeded,

    /// The output amount exceeds `balance_out × MAX_OUT_RATIO`.
    #[error("amount out exceeds max out ratio")]
    OutRatioExceeded,

    /// The spot price before the trade is already above the caller's limit.
    #[error("spot price before trade exceeds limit price")]
    BadLimitPrice,

    /// The spot price after the trade would exceed the caller's limit.
    #[error("spot price after trade exceeds limit price")]
    LimitPriceExceeded,

    /// A computed amount rounded to zero or the price moved backwards.
    #[error("numerical approximation error: {0}")]
    Approximation(&'static str),

    /// The required input exceeds the caller's maximum.
    #[error("required amount in exceeds caller limit")]
    LimitInExceeded,

    /// The computed output is below the caller's minimum.
    #[error("amount out below caller minimum")]
    LimitOutExceeded,

    /// A mutating call was made while another one is in flight.
    #[error("reentrant call rejected")]
    Reentry,

    /// The account holds fewer pool shares than the operation needs.
    #[error("insufficient pool share balance")]
    InsufficientShares,

    // -- arithmetic ---------------------------------------------------------
    /// A result exceeded the representable range.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// A subtraction would go below zero.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The base of a fractional power lies outside `[MIN_BPOW_BASE, MAX_BPOW_BASE]`.
    #[error("power base out of bounds")]
    PowBaseOutOfBounds,

    // -- collaborators ------------------------------------------------------
    /// The asset ledger refused or failed a transfer.
    #[error("asset transfer failed: {0}")]
    TransferFailed(&'static str),

    /// The auto-staking collaborator failed after authorizing a mirror leg.
    #[error("staking collaborator failed: {0}")]
    StakingFailed(&'static str),

    // -- input & configuration ----------------------------------------------
    /// A call argument is malformed (e.g. identical assets, wrong arity).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A configuration value violates its bounds.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// A configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, PoolError>;
