//! Deterministic transfer fee policy.

use crate::errors::{ConfigError, TransferError};
use rfx_types::{MicroRfx, ReflectedUnits, BASIS_POINTS_DENOM};
use serde::{Deserialize, Serialize};

const DEFAULT_FEE_RATE_BPS: u16 = 200; // 2%

/// Basis-point fee levied on every reflection-bearing transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePolicy {
    fee_rate_bps: u16,
}

impl FeePolicy {
    /// Create a fee policy, validating the rate against the bps denominator.
    pub fn new(fee_rate_bps: u16) -> Result<Self, ConfigError> {
        if fee_rate_bps > BASIS_POINTS_DENOM {
            return Err(ConfigError::FeeRateOutOfRange(fee_rate_bps));
        }
        Ok(Self { fee_rate_bps })
    }

    /// Configured fee rate in basis points.
    pub fn fee_rate_bps(&self) -> u16 {
        self.fee_rate_bps
    }

    /// Split a transfer amount into its fee and net portions.
    ///
    /// The fee truncates toward zero, so small transfers may carry no fee at
    /// all.
    pub fn split(&self, amount: MicroRfx) -> Result<FeeSplit, TransferError> {
        if amount == 0 {
            return Err(TransferError::ZeroAmount);
        }

        // 256-bit intermediate: amount * bps never overflows, and the
        // quotient is bounded by the amount itself.
        let fee = (ReflectedUnits::from(amount) * ReflectedUnits::from(self.fee_rate_bps)
            / ReflectedUnits::from(BASIS_POINTS_DENOM))
        .as_u128();

        Ok(FeeSplit {
            amount,
            fee,
            net: amount - fee,
        })
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            fee_rate_bps: DEFAULT_FEE_RATE_BPS,
        }
    }
}

/// Split of a transfer amount into fee and net portions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub amount: MicroRfx,
    pub fee: MicroRfx,
    pub net: MicroRfx,
}

impl FeeSplit {
    /// A fee-free split, used for transfers where both parties are excluded
    /// from reflection.
    pub(crate) fn free(amount: MicroRfx) -> Self {
        Self {
            amount,
            fee: 0,
            net: amount,
        }
    }
}
