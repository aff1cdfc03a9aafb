//! Thread-safe handle around a ledger instance.
//!
//! Every mutating call holds the write lock for its whole critical section,
//! so the rate snapshot and the supply update of one operation can never
//! interleave with another operation. A single ledger-wide lock is used
//! instead of per-account locks because every operation prices against the
//! shared conversion rate.

use crate::errors::{ConfigError, ExclusionError, RateError, TransferError};
use crate::ledger::{FeeStats, LedgerAudit, LedgerConfig, ReflectionLedger};
use crate::rate::Rate;
use parking_lot::RwLock;
use rfx_types::{Address, MicroRfx, ReflectedUnits};
use std::sync::Arc;

/// Cloneable, thread-safe ledger handle.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<ReflectionLedger>>,
}

impl SharedLedger {
    /// Create a shared ledger from construction parameters.
    pub fn initialize(config: LedgerConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_ledger(ReflectionLedger::initialize(config)?))
    }

    /// Wrap an existing ledger instance.
    pub fn from_ledger(ledger: ReflectionLedger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    pub fn transfer(
        &self,
        from: Address,
        to: Address,
        amount: MicroRfx,
    ) -> Result<(), TransferError> {
        self.inner.write().transfer(from, to, amount)
    }

    pub fn exclude_from_reward(&self, address: Address) -> Result<(), ExclusionError> {
        self.inner.write().exclude_from_reward(address)
    }

    pub fn include_in_reward(&self, address: Address) -> Result<(), ExclusionError> {
        self.inner.write().include_in_reward(address)
    }

    pub fn balance_of(&self, address: &Address) -> MicroRfx {
        self.inner.read().balance_of(address)
    }

    pub fn total_fees_collected(&self) -> MicroRfx {
        self.inner.read().total_fees_collected()
    }

    pub fn current_rate(&self) -> Result<Rate, RateError> {
        self.inner.read().current_rate()
    }

    pub fn token_supply(&self) -> MicroRfx {
        self.inner.read().token_supply()
    }

    pub fn is_excluded(&self, address: &Address) -> bool {
        self.inner.read().is_excluded(address)
    }

    pub fn reflection_from_token(
        &self,
        amount: MicroRfx,
        deduct_fee: bool,
    ) -> Result<ReflectedUnits, TransferError> {
        self.inner.read().reflection_from_token(amount, deduct_fee)
    }

    pub fn token_from_reflection(&self, r_amount: ReflectedUnits) -> Result<MicroRfx, RateError> {
        self.inner.read().token_from_reflection(r_amount)
    }

    pub fn fee_stats(&self) -> FeeStats {
        self.inner.read().fee_stats()
    }

    pub fn audit(&self) -> LedgerAudit {
        self.inner.read().audit()
    }

    /// Clone the current ledger state (for snapshots or serialization).
    pub fn snapshot(&self) -> ReflectionLedger {
        self.inner.read().clone()
    }
}
