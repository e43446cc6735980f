//! The pool value and its transaction discipline.

use std::cell::RefCell;

use tracing::warn;

use super::lock::Lock;
use super::settlement::Settlement;
use super::state::PoolState;
use crate::config::PoolConfig;
use crate::domain::{Address, Amount, PoolEvent, Ratio, Rounding};
use crate::error::Result;
use crate::math::bmul;
use crate::traits::{AssetLedger, NoStaking, SideStaking};

/// A two-asset weighted pool.
///
/// Every method takes `&self`: state lives behind a [`RefCell`] and the
/// reentrancy flag behind a [`Cell`](std::cell::Cell), so a collaborator
/// that calls back into the pool during settlement gets
/// [`PoolError::Reentry`](crate::error::PoolError::Reentry) instead of a
/// borrow panic.
///
/// A mutating call runs as one transaction:
///
/// 1. take the lock (or fail with `Reentry`);
/// 2. snapshot the state;
/// 3. validate and apply every effect, planning transfers in a settlement;
/// 4. ask the staking collaborator whether it takes the mirror leg, if any;
/// 5. execute the transfers, pulls first, then the collaborator's
///    `stake` or `unstake`;
/// 6. on any error, restore the snapshot and reverse completed transfers.
///
/// The type is `!Sync`; one pool is driven by one thread.
pub struct WeightedPool<L: AssetLedger, S: SideStaking = NoStaking> {
    account: Address,
    state: RefCell<PoolState>,
    log: RefCell<Vec<PoolEvent>>,
    lock: Lock,
    ledger: L,
    staking: S,
}

impl<L: AssetLedger, S: SideStaking> WeightedPool<L, S> {
    /// Creates an empty, unfinalized pool.
    ///
    /// # Errors
    ///
    /// Propagates [`PoolConfig::validate`] errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use datapool_amm::config::{FeeSchedule, PoolAccounts, PoolConfig};
    /// use datapool_amm::domain::Address;
    /// use datapool_amm::ledger::InMemoryLedger;
    /// use datapool_amm::pool::WeightedPool;
    /// use datapool_amm::traits::NoStaking;
    ///
    /// let accounts = PoolAccounts::new(
    ///     Address::from_bytes([1u8; 32]),
    ///     Address::from_bytes([2u8; 32]),
    ///     Address::from_bytes([3u8; 32]),
    ///     Address::from_bytes([4u8; 32]),
    ///     Address::from_bytes([5u8; 32]),
    /// );
    /// let config = PoolConfig::new(accounts, FeeSchedule::default()).expect("valid");
    /// let pool = WeightedPool::new(config, InMemoryLedger::new(), NoStaking).expect("pool");
    /// assert_eq!(pool.is_finalized(), Ok(false));
    /// ```
    pub fn new(config: PoolConfig, ledger: L, staking: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            account: config.accounts().pool(),
            state: RefCell::new(PoolState::from_config(&config)),
            log: RefCell::new(Vec::new()),
            lock: Lock::default(),
            ledger,
            staking,
        })
    }

    /// Ledger account holding the pool's assets.
    #[must_use]
    pub const fn account(&self) -> Address {
        self.account
    }

    /// The asset ledger collaborator.
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The staking collaborator.
    pub const fn staking(&self) -> &S {
        &self.staking
    }

    /// Whether a mutating call is in flight.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock.is_held()
    }

    /// Committed notifications, oldest first.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry) during a
    /// mutating call.
    pub fn events(&self) -> Result<Vec<PoolEvent>> {
        self.lock.check()?;
        Ok(self.log.borrow().clone())
    }

    /// Drains the committed notifications.
    ///
    /// # Errors
    ///
    /// [`PoolError::Reentry`](crate::error::PoolError::Reentry) during a
    /// mutating call.
    pub fn take_events(&self) -> Result<Vec<PoolEvent>> {
        self.lock.check()?;
        Ok(std::mem::take(&mut *self.log.borrow_mut()))
    }

    // -- transaction plumbing -----------------------------------------------

    /// Runs `body` as one all-or-nothing call.
    pub(crate) fn transact<T>(
        &self,
        operation: &'static str,
        body: impl FnOnce(&mut Settlement) -> Result<T>,
    ) -> Result<T> {
        let _guard = self.lock.acquire()?;
        let snapshot = self.state.borrow().clone();
        let mut settlement = Settlement::default();
        let result = body(&mut settlement).and_then(|value| {
            settlement.execute(&self.ledger, &self.staking, self.account)?;
            Ok(value)
        });
        match result {
            Ok(value) => {
                let committed = std::mem::take(&mut self.state.borrow_mut().pending);
                self.log.borrow_mut().extend(committed);
                Ok(value)
            }
            Err(err) => {
                *self.state.borrow_mut() = snapshot;
                warn!(operation, %err, "call rolled back");
                Err(err)
            }
        }
    }

    /// Applies effects to the state.  Must not call collaborators.
    pub(crate) fn with_state<T>(&self, f: impl FnOnce(&mut PoolState) -> Result<T>) -> Result<T> {
        f(&mut self.state.borrow_mut())
    }

    /// Reads the state outside a mutating call.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&PoolState) -> Result<T>) -> Result<T> {
        self.lock.check()?;
        f(&self.state.borrow())
    }
}

impl<L: AssetLedger + core::fmt::Debug, S: SideStaking + core::fmt::Debug> core::fmt::Debug
    for WeightedPool<L, S>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WeightedPool")
            .field("account", &self.account)
            .field("locked", &self.lock.is_held())
            .field("ledger", &self.ledger)
            .field("staking", &self.staking)
            .finish_non_exhaustive()
    }
}

/// `amount × rate`, for fee portions.
pub(crate) fn portion(amount: Amount, rate: Ratio, rounding: Rounding) -> Result<Amount> {
    bmul(amount.get(), rate.get(), rounding).map(Amount::new)
}
