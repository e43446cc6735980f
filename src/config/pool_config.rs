//! Construction-time configuration of a pool.

use serde::{Deserialize, Serialize};

use super::limits::{BONE, MAX_FEE, MIN_FEE};
use crate::domain::{Address, Ratio};
use crate::error::{PoolError, Result};

/// The accounts a pool is wired to at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolAccounts {
    pool: Address,
    controller: Address,
    factory: Address,
    platform_collector: Address,
    publisher_collector: Address,
}

impl PoolAccounts {
    /// Groups the pool's own account with its controller, the factory that
    /// receives exit fees, and the two fee collectors.
    #[must_use]
    pub const fn new(
        pool: Address,
        controller: Address,
        factory: Address,
        platform_collector: Address,
        publisher_collector: Address,
    ) -> Self {
        Self {
            pool,
            controller,
            factory,
            platform_collector,
            publisher_collector,
        }
    }

    /// Account holding the pool's assets.
    #[must_use]
    pub const fn pool(&self) -> Address {
        self.pool
    }

    /// Initial controller.
    #[must_use]
    pub const fn controller(&self) -> Address {
        self.controller
    }

    /// Exit-fee recipient.
    #[must_use]
    pub const fn factory(&self) -> Address {
        self.factory
    }

    /// Platform-fee collector.
    #[must_use]
    pub const fn platform_collector(&self) -> Address {
        self.platform_collector
    }

    /// Initial publisher-market-fee collector.
    #[must_use]
    pub const fn publisher_collector(&self) -> Address {
        self.publisher_collector
    }
}

/// Fee rates of a pool, each a fraction scaled by `BONE`.
///
/// `swap_fee` stays in the pool for liquidity providers; `platform_fee` and
/// `publisher_market_fee` are skimmed into fee ledgers on every swap;
/// `exit_fee` is charged on pool shares and assets leaving the pool and
/// routed to the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeSchedule {
    swap_fee: Ratio,
    publisher_market_fee: Ratio,
    platform_fee: Ratio,
    exit_fee: Ratio,
}

impl FeeSchedule {
    /// Creates a fee schedule.  Bounds are checked by
    /// [`PoolConfig::validate`].
    #[must_use]
    pub const fn new(
        swap_fee: Ratio,
        publisher_market_fee: Ratio,
        platform_fee: Ratio,
        exit_fee: Ratio,
    ) -> Self {
        Self {
            swap_fee,
            publisher_market_fee,
            platform_fee,
            exit_fee,
        }
    }

    /// Liquidity-provider swap fee.
    pub const fn swap_fee(&self) -> Ratio {
        self.swap_fee
    }

    /// Publisher-market fee.
    pub const fn publisher_market_fee(&self) -> Ratio {
        self.publisher_market_fee
    }

    /// Platform fee.
    pub const fn platform_fee(&self) -> Ratio {
        self.platform_fee
    }

    /// Exit fee.
    pub const fn exit_fee(&self) -> Ratio {
        self.exit_fee
    }

    /// Checks every rate against `[MIN_FEE, MAX_FEE]`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::FeeOutOfRange`] naming the first offending fee.
    pub fn validate(&self) -> Result<()> {
        check_fee(self.swap_fee, "swap fee")?;
        check_fee(self.publisher_market_fee, "publisher market fee")?;
        check_fee(self.platform_fee, "platform fee")?;
        check_fee(self.exit_fee, "exit fee")?;
        let combined = self
            .swap_fee
            .get()
            .saturating_add(self.publisher_market_fee.get())
            .saturating_add(self.platform_fee.get());
        if combined >= BONE {
            return Err(PoolError::FeeOutOfRange("combined swap fees reach 100%"));
        }
        Ok(())
    }
}

/// Checks one fee rate against `[MIN_FEE, MAX_FEE]`.
pub(crate) fn check_fee(fee: Ratio, what: &'static str) -> Result<()> {
    if !(MIN_FEE..=MAX_FEE).contains(&fee.get()) {
        return Err(PoolError::FeeOutOfRange(what));
    }
    Ok(())
}

/// Everything needed to construct a pool.
///
/// # Examples
///
/// ```
/// use datapool_amm::config::{FeeSchedule, PoolAccounts, PoolConfig};
/// use datapool_amm::domain::{Address, Ratio};
///
/// let accounts = PoolAccounts::new(
///     Address::from_bytes([1u8; 32]),
///     Address::from_bytes([2u8; 32]),
///     Address::from_bytes([3u8; 32]),
///     Address::from_bytes([4u8; 32]),
///     Address::from_bytes([5u8; 32]),
/// );
/// let fees = FeeSchedule::new(
///     Ratio::from_basis_points(10),
///     Ratio::ZERO,
///     Ratio::from_basis_points(10),
///     Ratio::ZERO,
/// );
/// let config = PoolConfig::new(accounts, fees).expect("valid config");
/// let json = serde_json::to_string(&config).expect("serializable");
/// assert_eq!(PoolConfig::from_json(&json).ok(), Some(config));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    accounts: PoolAccounts,
    fees: FeeSchedule,
}

impl PoolConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// See [`PoolConfig::validate`].
    pub fn new(accounts: PoolAccounts, fees: FeeSchedule) -> Result<Self> {
        let config = Self { accounts, fees };
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// - [`PoolError::ConfigParse`] if the document is malformed.
    /// - Any error from [`PoolConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PoolError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidConfiguration`] if the pool or controller
    ///   account is the zero address, or the pool account doubles as another
    ///   role.
    /// - [`PoolError::FeeOutOfRange`] if a fee rate is out of bounds.
    pub fn validate(&self) -> Result<()> {
        let accounts = &self.accounts;
        if accounts.pool.is_zero() {
            return Err(PoolError::InvalidConfiguration("pool account is zero"));
        }
        if accounts.controller.is_zero() {
            return Err(PoolError::InvalidConfiguration("controller account is zero"));
        }
        let others = [
            accounts.controller,
            accounts.factory,
            accounts.platform_collector,
            accounts.publisher_collector,
        ];
        if others.contains(&accounts.pool) {
            return Err(PoolError::InvalidConfiguration(
                "pool account must not hold another role",
            ));
        }
        self.fees.validate()
    }

    /// Pool accounts.
    #[must_use]
    pub const fn accounts(&self) -> &PoolAccounts {
        &self.accounts
    }

    /// Fee schedule.
    #[must_use]
    pub const fn fees(&self) -> &FeeSchedule {
        &self.fees
    }
}
