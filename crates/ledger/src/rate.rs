//! Conversion rate between token units and reflected units.
//!
//! The rate is the number of reflected units backing one token unit. It
//! shrinks every time a fee is collected, which is what passively raises the
//! token value of every included account's stored reflected balance.

use crate::errors::RateError;
use rfx_types::{MicroRfx, ReflectedUnits};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of the conversion rate at a single point in the ledger's history.
///
/// A `Rate` is read once at the start of an operation and used for every
/// conversion within that operation, so fee and net amounts are always priced
/// against the same supply state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rate(ReflectedUnits);

impl Rate {
    pub(crate) fn new(raw: ReflectedUnits) -> Self {
        Rate(raw)
    }

    /// Raw reflected-units-per-token value.
    pub fn raw(&self) -> ReflectedUnits {
        self.0
    }

    /// Convert a token amount into reflected units at this rate.
    pub fn to_reflected(&self, amount: MicroRfx) -> Result<ReflectedUnits, RateError> {
        ReflectedUnits::from(amount)
            .checked_mul(self.0)
            .ok_or(RateError::Overflow("converting tokens to reflected units"))
    }

    /// Convert a reflected amount back into token units at this rate
    /// (truncating).
    ///
    /// `to_token(to_reflected(x))` may differ from `x` by at most one token
    /// unit; the bound is a tested property of the ledger.
    pub fn to_token(&self, r_amount: ReflectedUnits) -> Result<MicroRfx, RateError> {
        if self.0.is_zero() {
            return Err(RateError::DegenerateSupply);
        }
        let quotient = r_amount / self.0;
        if quotient > ReflectedUnits::from(u128::MAX) {
            return Err(RateError::Overflow("converting reflected units to tokens"));
        }
        Ok(quotient.as_u128())
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
