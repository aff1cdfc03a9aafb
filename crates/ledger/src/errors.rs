use rfx_types::MicroRfx;
use thiserror::Error;

/// Errors that can occur while converting between token and reflected units.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RateError {
    #[error("token supply is zero; conversion rate is undefined")]
    DegenerateSupply,

    #[error("amount {0} exceeds the total token supply")]
    AmountExceedsSupply(MicroRfx),

    #[error("reflected amount exceeds the reflected supply")]
    ReflectedAmountExceedsSupply,

    #[error("arithmetic overflow while {0}")]
    Overflow(&'static str),
}

/// Errors that can occur while executing a transfer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransferError {
    #[error("the zero address is not a valid transfer party")]
    ZeroAddress,

    #[error("transfer amount must be greater than zero")]
    ZeroAmount,

    #[error("insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        available: MicroRfx,
        requested: MicroRfx,
    },

    #[error(transparent)]
    Rate(#[from] RateError),
}

/// Errors that can occur while migrating an account between representations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionError {
    #[error("account is already excluded from reflection rewards")]
    AlreadyExcluded,

    #[error("account is not excluded from reflection rewards")]
    NotExcluded,

    #[error(transparent)]
    Rate(#[from] RateError),
}

/// Errors that can occur while validating ledger configuration.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("token supply must be greater than zero")]
    ZeroSupply,

    #[error("fee rate {0} bps exceeds the 10000 bps denominator")]
    FeeRateOutOfRange(u16),

    #[error("initial holder must not be the zero address")]
    ZeroHolder,
}
