//! RFX Reflection Ledger
//!
//! Implements the reflected-balance fee-redistribution ledger:
//! - Basis-point fee on every transfer, redistributed to all included
//!   holders without iterating the holder set
//! - Dual-unit accounting: included balances live in a 256-bit reflected
//!   space whose conversion rate shrinks as fees are collected
//! - Exclusion mechanism freezing an account's balance in token space
//! - Checked arithmetic and all-or-nothing operation semantics
//!
//! Monetary unit: micro-RFX (µRFX). 1 RFX = 1_000_000 µRFX.

pub mod account;
pub mod errors;
pub mod ledger;
pub mod policy;
pub mod rate;
pub mod shared;
pub mod supply;

pub use account::*;
pub use errors::*;
pub use ledger::*;
pub use policy::*;
pub use rate::*;
pub use shared::*;
pub use supply::*;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
