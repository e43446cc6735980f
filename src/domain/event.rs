//! Notifications recorded by the pool.

use serde::{Deserialize, Serialize};

use super::{Address, Amount, Ratio};

/// A committed, externally observable effect of a pool call.
///
/// Events are appended in execution order and only survive if the call that
/// produced them succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEvent {
    /// A swap was executed.
    Swap {
        /// Trader.
        caller: Address,
        /// Asset sold.
        asset_in: Address,
        /// Asset bought.
        asset_out: Address,
        /// Gross input.
        amount_in: Amount,
        /// Output paid.
        amount_out: Amount,
    },
    /// An asset entered the pool through a join.
    Join {
        /// Liquidity provider (or the staking collaborator for a mirror leg).
        caller: Address,
        /// Asset deposited.
        asset: Address,
        /// Amount deposited.
        amount: Amount,
    },
    /// An asset left the pool through an exit.
    Exit {
        /// Liquidity provider (or the staking collaborator for a mirror leg).
        caller: Address,
        /// Asset withdrawn.
        asset: Address,
        /// Amount withdrawn.
        amount: Amount,
    },
    /// Pool shares were minted.
    SharesMinted {
        /// Recipient.
        to: Address,
        /// Shares minted.
        amount: Amount,
    },
    /// Pool shares changed hands.
    SharesTransferred {
        /// Sender.
        from: Address,
        /// Recipient.
        to: Address,
        /// Shares moved.
        amount: Amount,
    },
    /// The per-trade market fee of a swap was paid out.
    MarketFeePaid {
        /// Market-fee collector.
        collector: Address,
        /// Asset the fee was charged in.
        asset: Address,
        /// Fee amount.
        amount: Amount,
    },
    /// Accrued platform fees were paid to the platform collector.
    PlatformFeeCollected {
        /// Account that triggered the collection.
        caller: Address,
        /// Platform collector.
        collector: Address,
        /// Asset collected.
        asset: Address,
        /// Amount collected.
        amount: Amount,
    },
    /// Accrued publisher-market fees were paid to the publisher collector.
    PublisherFeeCollected {
        /// Account that triggered the collection.
        caller: Address,
        /// Publisher-market collector.
        collector: Address,
        /// Asset collected.
        asset: Address,
        /// Amount collected.
        amount: Amount,
    },
    /// The LP swap fee changed.
    SwapFeeChanged {
        /// Controller.
        caller: Address,
        /// New fee rate.
        fee: Ratio,
    },
    /// The publisher-market fee collector or rate changed.
    PublisherFeeCollectorChanged {
        /// Previous collector.
        caller: Address,
        /// New collector.
        collector: Address,
        /// New fee rate.
        fee: Ratio,
    },
    /// Control of the pool moved to a new account.
    ControllerChanged {
        /// Previous controller.
        caller: Address,
        /// New controller.
        controller: Address,
    },
    /// The pool was finalized.
    Finalized {
        /// Controller.
        caller: Address,
    },
}
