//! Canonical monetary units for the RFX ledger.
//!
//! - 1 RFX = 1,000,000 micro-RFX (6 decimals)
//! - All ledger-level token values use micro-RFX (u128); reflected-space
//!   values use 256-bit integers
//! - NO floating point allowed in balance or fee computation

use primitive_types::U256;

/// Micro-RFX unit (1 RFX = 10^6 micro-RFX).
pub type MicroRfx = u128;

/// Reflected accounting unit. Token-equivalent value depends on the current
/// conversion rate.
pub type ReflectedUnits = U256;

/// Number of decimal places for RFX precision.
pub const RFX_DECIMALS: u32 = 6;

/// Conversion factor: 1 RFX = 10^6 micro-RFX.
pub const MICRO_PER_RFX: MicroRfx = 10u128.pow(RFX_DECIMALS);

/// Denominator for basis-point fee rates (10_000 bps == 100%).
pub const BASIS_POINTS_DENOM: u16 = 10_000;

/// Convert whole RFX to micro-RFX (saturating).
#[inline]
pub const fn rfx_to_micro(rfx: u64) -> MicroRfx {
    (rfx as u128).saturating_mul(MICRO_PER_RFX)
}

/// Convert micro-RFX to whole RFX (truncating).
#[inline]
pub const fn micro_to_rfx(micro: MicroRfx) -> u64 {
    (micro / MICRO_PER_RFX) as u64
}

/// Whether a basis-point rate is within the valid `[0, 10_000]` range.
#[inline]
pub const fn is_valid_bps(bps: u16) -> bool {
    bps <= BASIS_POINTS_DENOM
}
