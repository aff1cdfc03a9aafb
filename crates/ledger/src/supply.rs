//! Global supply counters and unit conversion.
//!
//! The ledger prices included balances through a conversion rate derived from
//! two counters: the reflected units backing included accounts and the token
//! units held by included accounts. Collected fees shrink the reflected side
//! only, which lowers the rate and passively raises the token value of every
//! included balance without touching any account record.

use crate::errors::{ConfigError, RateError};
use crate::rate::Rate;
use rfx_types::{MicroRfx, ReflectedUnits};
use serde::{Deserialize, Serialize};

/// Global counters of the reflection ledger.
///
/// Invariants maintained by the ledger operations:
/// - `token_supply` never changes after initialization.
/// - `reflected_total` only shrinks, by the reflected value of each fee.
/// - `reflected_supply` equals the sum of all included accounts' reflected
///   balances.
/// - `included_token_supply` equals `token_supply` minus the sum of all
///   excluded accounts' token balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyState {
    /// Declared token supply, fixed for the ledger's lifetime.
    pub(crate) token_supply: MicroRfx,
    /// Reflected-space total: the genesis allocation minus all collected
    /// fees.
    pub(crate) reflected_total: ReflectedUnits,
    /// Reflected units currently backing included accounts.
    pub(crate) reflected_supply: ReflectedUnits,
    /// Token units currently held by included accounts.
    pub(crate) included_token_supply: MicroRfx,
    /// Lifetime sum of collected fees, reporting-only.
    pub(crate) total_fees_collected: MicroRfx,
    /// Lifetime count of executed transfers, reporting-only.
    pub(crate) transfer_count: u64,
    /// Lifetime count of representation migrations, reporting-only.
    pub(crate) migration_count: u64,
}

impl SupplyState {
    /// Create the genesis supply state.
    ///
    /// The reflected space is seeded with the largest multiple of
    /// `token_supply` that fits in 256 bits, so the genesis rate divides
    /// exactly and has maximal headroom before any conceivable overflow.
    pub fn new(token_supply: MicroRfx) -> Result<Self, ConfigError> {
        if token_supply == 0 {
            return Err(ConfigError::ZeroSupply);
        }

        let supply = ReflectedUnits::from(token_supply);
        let reflected_total = ReflectedUnits::MAX - (ReflectedUnits::MAX % supply);

        Ok(Self {
            token_supply,
            reflected_total,
            reflected_supply: reflected_total,
            included_token_supply: token_supply,
            total_fees_collected: 0,
            transfer_count: 0,
            migration_count: 0,
        })
    }

    /// Declared token supply.
    pub fn token_supply(&self) -> MicroRfx {
        self.token_supply
    }

    /// Reflected-space total (genesis allocation minus collected fees).
    pub fn reflected_total(&self) -> ReflectedUnits {
        self.reflected_total
    }

    /// Reflected units backing included accounts.
    pub fn reflected_supply(&self) -> ReflectedUnits {
        self.reflected_supply
    }

    /// Token units held by included accounts.
    pub fn included_token_supply(&self) -> MicroRfx {
        self.included_token_supply
    }

    /// Lifetime sum of collected fees.
    pub fn total_fees_collected(&self) -> MicroRfx {
        self.total_fees_collected
    }

    /// Lifetime count of executed transfers.
    pub fn transfer_count(&self) -> u64 {
        self.transfer_count
    }

    /// Lifetime count of representation migrations.
    pub fn migration_count(&self) -> u64 {
        self.migration_count
    }

    /// Current conversion rate (reflected units per token unit).
    ///
    /// The rate is computed over the included-side counters so that fee
    /// redistribution reaches exactly the accounts that participate in it.
    /// When no included balance remains, the unadjusted totals are used as a
    /// fallback so a later `include` can still price the returning balance.
    pub fn current_rate(&self) -> Result<Rate, RateError> {
        if self.token_supply == 0 {
            return Err(RateError::DegenerateSupply);
        }

        if self.included_token_supply == 0 || self.reflected_supply.is_zero() {
            let fallback = self.reflected_total / ReflectedUnits::from(self.token_supply);
            return Ok(Rate::new(fallback));
        }

        let rate = self.reflected_supply / ReflectedUnits::from(self.included_token_supply);
        if rate.is_zero() {
            return Err(RateError::DegenerateSupply);
        }
        Ok(Rate::new(rate))
    }

    /// Convert a token amount into reflected units at the current rate.
    pub fn to_reflected(&self, amount: MicroRfx) -> Result<ReflectedUnits, RateError> {
        if amount > self.token_supply {
            return Err(RateError::AmountExceedsSupply(amount));
        }
        self.current_rate()?.to_reflected(amount)
    }

    /// Convert a reflected amount into token units at the current rate.
    pub fn to_token(&self, r_amount: ReflectedUnits) -> Result<MicroRfx, RateError> {
        if r_amount > self.reflected_total {
            return Err(RateError::ReflectedAmountExceedsSupply);
        }
        self.current_rate()?.to_token(r_amount)
    }
}
