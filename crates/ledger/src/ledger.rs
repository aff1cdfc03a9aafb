//! The reflection ledger: transfer orchestration, representation migration,
//! and reporting.
//!
//! Every operation is a single atomic unit: all new values are staged with
//! checked arithmetic first, and state is only written once nothing can fail
//! anymore. The conversion rate is read once per operation and never
//! re-read mid-flight.

use crate::account::{Account, AccountBook};
use crate::errors::{ConfigError, ExclusionError, RateError, TransferError};
use crate::policy::{FeePolicy, FeeSplit};
use crate::rate::Rate;
use crate::supply::SupplyState;
use rfx_types::{Address, MicroRfx, ReflectedUnits};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Construction parameters for a ledger instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Declared token supply in micro-RFX; fixed for the ledger's lifetime.
    pub token_supply: MicroRfx,
    /// Transfer fee in basis points (200 = 2%).
    pub fee_rate_bps: u16,
    /// Account credited with the entire supply at genesis.
    pub initial_holder: Address,
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_supply == 0 {
            return Err(ConfigError::ZeroSupply);
        }
        if !rfx_types::is_valid_bps(self.fee_rate_bps) {
            return Err(ConfigError::FeeRateOutOfRange(self.fee_rate_bps));
        }
        if self.initial_holder.is_zero() {
            return Err(ConfigError::ZeroHolder);
        }
        Ok(())
    }
}

/// Fee collection statistics for monitoring and analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeStats {
    pub total_collected: MicroRfx,
    pub transfer_count: u64,
    pub average_fee_per_transfer: MicroRfx,
}

/// Result of a ledger conservation audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerAudit {
    pub is_healthy: bool,
    pub issues: Vec<String>,
    pub token_supply: MicroRfx,
    pub balance_sum: MicroRfx,
    pub drift: MicroRfx,
    pub tolerance: MicroRfx,
    pub account_count: usize,
    pub excluded_accounts: usize,
}

/// Single-owner reflection ledger instance.
///
/// All state lives on the instance; independent ledgers can coexist in the
/// same process. For shared multi-threaded access see
/// [`SharedLedger`](crate::shared::SharedLedger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionLedger {
    supply: SupplyState,
    policy: FeePolicy,
    accounts: AccountBook,
}

impl ReflectionLedger {
    /// Create a ledger, crediting the full token supply to the initial
    /// holder as reflected units.
    pub fn initialize(config: LedgerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let supply = SupplyState::new(config.token_supply)?;
        let policy = FeePolicy::new(config.fee_rate_bps)?;

        let mut accounts = AccountBook::new();
        accounts.set(
            config.initial_holder,
            Account::Included {
                reflected: supply.reflected_total(),
            },
        );

        info!(
            target: "ledger",
            "Initialized ledger: supply {} µRFX, fee {} bps, holder {}",
            config.token_supply,
            config.fee_rate_bps,
            config.initial_holder
        );

        Ok(Self {
            supply,
            policy,
            accounts,
        })
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Token balance of an account, dispatching on its representation.
    ///
    /// Unknown accounts read as zero. Internal conversion failures cannot
    /// occur while the ledger invariants hold; if one ever does, it is logged
    /// and the balance reads as zero. Use [`Self::try_balance_of`] or
    /// [`Self::audit`] to surface such a state.
    pub fn balance_of(&self, address: &Address) -> MicroRfx {
        match self.try_balance_of(address) {
            Ok(balance) => balance,
            Err(err) => {
                error!(target: "ledger", "Balance query failed for {}: {}", address, err);
                0
            }
        }
    }

    /// Fallible variant of [`Self::balance_of`].
    pub fn try_balance_of(&self, address: &Address) -> Result<MicroRfx, RateError> {
        match self.accounts.get(address) {
            Account::Excluded { tokens } => Ok(tokens),
            Account::Included { reflected } => {
                if reflected.is_zero() {
                    Ok(0)
                } else {
                    self.supply.to_token(reflected)
                }
            }
        }
    }

    /// Declared token supply.
    pub fn token_supply(&self) -> MicroRfx {
        self.supply.token_supply()
    }

    /// Lifetime sum of collected fees.
    pub fn total_fees_collected(&self) -> MicroRfx {
        self.supply.total_fees_collected()
    }

    /// Configured fee rate in basis points.
    pub fn fee_rate_bps(&self) -> u16 {
        self.policy.fee_rate_bps()
    }

    /// Current conversion rate (read-only diagnostic).
    pub fn current_rate(&self) -> Result<Rate, RateError> {
        self.supply.current_rate()
    }

    /// Whether the account is currently excluded from reflection rewards.
    pub fn is_excluded(&self, address: &Address) -> bool {
        self.accounts.is_excluded(address)
    }

    /// Number of currently excluded accounts.
    pub fn excluded_count(&self) -> usize {
        self.accounts.excluded_count()
    }

    /// Number of materialised accounts.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Convert a token amount into reflected units at the current rate,
    /// optionally deducting the transfer fee first. Read-only utility for
    /// external auditing.
    pub fn reflection_from_token(
        &self,
        amount: MicroRfx,
        deduct_fee: bool,
    ) -> Result<ReflectedUnits, TransferError> {
        if amount > self.supply.token_supply() {
            return Err(TransferError::Rate(RateError::AmountExceedsSupply(amount)));
        }
        let rate = self.supply.current_rate().map_err(TransferError::Rate)?;
        if deduct_fee {
            let split = self.policy.split(amount)?;
            Ok(rate.to_reflected(split.net)?)
        } else {
            Ok(rate.to_reflected(amount)?)
        }
    }

    /// Convert a reflected amount into token units at the current rate.
    /// Read-only utility for external auditing.
    pub fn token_from_reflection(&self, r_amount: ReflectedUnits) -> Result<MicroRfx, RateError> {
        self.supply.to_token(r_amount)
    }

    // -------------------------------------------------------------------------
    // Transfers
    // -------------------------------------------------------------------------

    /// Execute a fee-bearing transfer.
    ///
    /// The fee's reflected value is removed from the reflected supply rather
    /// than credited to any account; that is the redistribution mechanism.
    /// Transfers where both parties are excluded levy no fee at all.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: MicroRfx,
    ) -> Result<(), TransferError> {
        if from.is_zero() || to.is_zero() {
            return Err(TransferError::ZeroAddress);
        }
        if amount == 0 {
            return Err(TransferError::ZeroAmount);
        }

        let available = self.try_balance_of(&from)?;
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        let from_account = self.accounts.get(&from);
        let to_account = self.accounts.get(&to);

        // Rate snapshot for the whole operation.
        let rate = self.supply.current_rate()?;

        let split = if from_account.is_excluded() && to_account.is_excluded() {
            FeeSplit::free(amount)
        } else {
            self.policy.split(amount)?
        };

        let r_amount = rate.to_reflected(split.amount)?;
        let r_fee = rate.to_reflected(split.fee)?;
        let r_net = rate.to_reflected(split.net)?;

        // Stage every new value before touching state; any failure past this
        // comment must leave the ledger unchanged.
        let mut staged = self.supply.clone();
        staged.total_fees_collected = staged
            .total_fees_collected
            .checked_add(split.fee)
            .ok_or(RateError::Overflow("accumulating collected fees"))?;
        staged.transfer_count = staged.transfer_count.saturating_add(1);

        if from == to {
            let updated = match from_account {
                Account::Included { reflected } => {
                    // Degenerate self-transfer: the full amount is debited
                    // and the net re-credited, so only the fee leaves.
                    let new_reflected = reflected
                        .checked_sub(r_fee)
                        .ok_or(RateError::Overflow("debiting reflected balance"))?;
                    staged.reflected_total = staged
                        .reflected_total
                        .checked_sub(r_fee)
                        .ok_or(RateError::Overflow("reducing reflected total"))?;
                    staged.reflected_supply = staged
                        .reflected_supply
                        .checked_sub(r_fee)
                        .ok_or(RateError::Overflow("reducing reflected supply"))?;
                    Account::Included {
                        reflected: new_reflected,
                    }
                }
                // Fee-free by the excluded-pair rule: nothing moves.
                Account::Excluded { tokens } => Account::Excluded { tokens },
            };

            self.accounts.set(from, updated);
            self.supply = staged;
        } else {
            let (new_from, new_to) = match (from_account, to_account) {
                (Account::Included { reflected: fr }, Account::Included { reflected: tr }) => {
                    let new_fr = fr
                        .checked_sub(r_amount)
                        .ok_or(RateError::Overflow("debiting reflected balance"))?;
                    let new_tr = tr
                        .checked_add(r_net)
                        .ok_or(RateError::Overflow("crediting reflected balance"))?;
                    staged.reflected_total = staged
                        .reflected_total
                        .checked_sub(r_fee)
                        .ok_or(RateError::Overflow("reducing reflected total"))?;
                    staged.reflected_supply = staged
                        .reflected_supply
                        .checked_sub(r_fee)
                        .ok_or(RateError::Overflow("reducing reflected supply"))?;
                    (
                        Account::Included { reflected: new_fr },
                        Account::Included { reflected: new_tr },
                    )
                }
                (Account::Included { reflected: fr }, Account::Excluded { tokens: tt }) => {
                    let new_fr = fr
                        .checked_sub(r_amount)
                        .ok_or(RateError::Overflow("debiting reflected balance"))?;
                    let new_tt = tt
                        .checked_add(split.net)
                        .ok_or(RateError::Overflow("crediting token balance"))?;
                    staged.reflected_total = staged
                        .reflected_total
                        .checked_sub(r_fee)
                        .ok_or(RateError::Overflow("reducing reflected total"))?;
                    // The net leaves the reflection pool and the fee is
                    // destroyed, so the full reflected amount is retired.
                    staged.reflected_supply = staged
                        .reflected_supply
                        .checked_sub(r_amount)
                        .ok_or(RateError::Overflow("reducing reflected supply"))?;
                    staged.included_token_supply = staged
                        .included_token_supply
                        .checked_sub(split.net)
                        .ok_or(RateError::Overflow("reducing included token supply"))?;
                    (
                        Account::Included { reflected: new_fr },
                        Account::Excluded { tokens: new_tt },
                    )
                }
                (Account::Excluded { tokens: ft }, Account::Included { reflected: tr }) => {
                    let new_ft = ft
                        .checked_sub(amount)
                        .ok_or(RateError::Overflow("debiting token balance"))?;
                    let new_tr = tr
                        .checked_add(r_net)
                        .ok_or(RateError::Overflow("crediting reflected balance"))?;
                    staged.reflected_total = staged
                        .reflected_total
                        .checked_sub(r_fee)
                        .ok_or(RateError::Overflow("reducing reflected total"))?;
                    // The net amount rejoins the reflection pool.
                    staged.reflected_supply = staged
                        .reflected_supply
                        .checked_add(r_net)
                        .ok_or(RateError::Overflow("growing reflected supply"))?;
                    staged.included_token_supply = staged
                        .included_token_supply
                        .checked_add(amount)
                        .ok_or(RateError::Overflow("growing included token supply"))?;
                    (
                        Account::Excluded { tokens: new_ft },
                        Account::Included { reflected: new_tr },
                    )
                }
                (Account::Excluded { tokens: ft }, Account::Excluded { tokens: tt }) => {
                    // Neither party participates in reflection; fee is zero
                    // and no supply counter moves.
                    let new_ft = ft
                        .checked_sub(amount)
                        .ok_or(RateError::Overflow("debiting token balance"))?;
                    let new_tt = tt
                        .checked_add(split.net)
                        .ok_or(RateError::Overflow("crediting token balance"))?;
                    (
                        Account::Excluded { tokens: new_ft },
                        Account::Excluded { tokens: new_tt },
                    )
                }
            };

            self.accounts.set(from, new_from);
            self.accounts.set(to, new_to);
            self.supply = staged;
        }

        debug!(
            target: "ledger",
            "Transfer {} -> {}: net {} µRFX (fee {} µRFX)",
            from,
            to,
            split.net,
            split.fee
        );

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Representation migration
    // -------------------------------------------------------------------------

    /// Migrate an account out of the reflection pool, freezing its token
    /// value as of the current rate.
    pub fn exclude_from_reward(&mut self, address: Address) -> Result<(), ExclusionError> {
        let reflected = match self.accounts.get(&address) {
            Account::Excluded { .. } => return Err(ExclusionError::AlreadyExcluded),
            Account::Included { reflected } => reflected,
        };

        let rate = self.supply.current_rate()?;
        let tokens = if reflected.is_zero() {
            0
        } else {
            rate.to_token(reflected)?
        };

        let mut staged = self.supply.clone();
        staged.reflected_supply = staged
            .reflected_supply
            .checked_sub(reflected)
            .ok_or(RateError::Overflow("retiring reflected balance"))?;
        staged.included_token_supply = staged
            .included_token_supply
            .checked_sub(tokens)
            .ok_or(RateError::Overflow("retiring included tokens"))?;
        staged.migration_count = staged.migration_count.saturating_add(1);

        self.accounts.set(address, Account::Excluded { tokens });
        self.supply = staged;

        info!(
            target: "ledger",
            "Excluded {} from rewards at {} µRFX",
            address,
            tokens
        );
        Ok(())
    }

    /// Migrate an account back into the reflection pool at the current rate.
    pub fn include_in_reward(&mut self, address: Address) -> Result<(), ExclusionError> {
        let tokens = match self.accounts.get(&address) {
            Account::Included { .. } => return Err(ExclusionError::NotExcluded),
            Account::Excluded { tokens } => tokens,
        };

        let rate = self.supply.current_rate()?;
        let reflected = rate.to_reflected(tokens)?;

        let mut staged = self.supply.clone();
        staged.reflected_supply = staged
            .reflected_supply
            .checked_add(reflected)
            .ok_or(RateError::Overflow("restoring reflected balance"))?;
        staged.included_token_supply = staged
            .included_token_supply
            .checked_add(tokens)
            .ok_or(RateError::Overflow("restoring included tokens"))?;
        staged.migration_count = staged.migration_count.saturating_add(1);

        self.accounts.set(address, Account::Included { reflected });
        self.supply = staged;

        info!(
            target: "ledger",
            "Included {} in rewards at {} µRFX",
            address,
            tokens
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Reporting
    // -------------------------------------------------------------------------

    /// Generate fee collection statistics.
    pub fn fee_stats(&self) -> FeeStats {
        let transfer_count = self.supply.transfer_count();
        let total_collected = self.supply.total_fees_collected();
        let average_fee_per_transfer = if transfer_count > 0 {
            total_collected / transfer_count as u128
        } else {
            0
        };

        FeeStats {
            total_collected,
            transfer_count,
            average_fee_per_transfer,
        }
    }

    /// Perform a conservation audit across all accounts.
    ///
    /// The balance sum must match the declared supply within a tolerance of
    /// one unit per materialised account plus one per executed operation
    /// (integer-division rounding).
    pub fn audit(&self) -> LedgerAudit {
        let mut issues = Vec::new();

        let mut balance_sum: MicroRfx = 0;
        for (address, _) in self.accounts.iter() {
            balance_sum = balance_sum.saturating_add(self.balance_of(address));
        }

        let token_supply = self.supply.token_supply();
        let drift = token_supply.abs_diff(balance_sum);
        let tolerance = (self.accounts.len() as u128)
            .saturating_add(self.supply.transfer_count() as u128)
            .saturating_add(self.supply.migration_count() as u128);

        if drift > tolerance {
            issues.push(format!(
                "Balance sum {} drifts from supply {} by {} (tolerance {})",
                balance_sum, token_supply, drift, tolerance
            ));
        }

        if self.supply.reflected_supply() > self.supply.reflected_total() {
            issues.push(format!(
                "Reflected supply {} exceeds reflected total {}",
                self.supply.reflected_supply(),
                self.supply.reflected_total()
            ));
        }

        LedgerAudit {
            is_healthy: issues.is_empty(),
            issues,
            token_supply,
            balance_sum,
            drift,
            tolerance,
            account_count: self.accounts.len(),
            excluded_accounts: self.accounts.excluded_count(),
        }
    }
}
