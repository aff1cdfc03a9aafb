//! Per-account balance storage.
//!
//! Each account is in exactly one of two representations. Included accounts
//! store reflected units and participate in passive fee redistribution;
//! excluded accounts store an explicit token balance that the rate cannot
//! touch. The sum type makes a "both populated" account unrepresentable and
//! forces every balance mutation to dispatch on the representation.

use rfx_types::{Address, MicroRfx, ReflectedUnits};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Balance record for a single account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Account {
    /// Participates in passive fee redistribution.
    Included { reflected: ReflectedUnits },
    /// Holds a rate-independent token balance.
    Excluded { tokens: MicroRfx },
}

impl Account {
    /// Whether this account is excluded from reflection rewards.
    pub fn is_excluded(&self) -> bool {
        matches!(self, Account::Excluded { .. })
    }
}

impl Default for Account {
    fn default() -> Self {
        Account::Included {
            reflected: ReflectedUnits::zero(),
        }
    }
}

/// All account records of a ledger instance.
///
/// Accounts come into existence implicitly on first mention, as empty
/// included accounts. Records are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBook {
    accounts: HashMap<Address, Account>,
}

impl AccountBook {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    /// Read an account record; unknown addresses read as empty included
    /// accounts.
    pub fn get(&self, address: &Address) -> Account {
        self.accounts.get(address).copied().unwrap_or_default()
    }

    /// Write an account record, materialising the address if needed.
    pub fn set(&mut self, address: Address, account: Account) {
        self.accounts.insert(address, account);
    }

    /// Whether the address currently holds an excluded-representation record.
    pub fn is_excluded(&self, address: &Address) -> bool {
        self.get(address).is_excluded()
    }

    /// Number of materialised accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Number of currently excluded accounts.
    pub fn excluded_count(&self) -> usize {
        self.accounts.values().filter(|a| a.is_excluded()).count()
    }

    /// Iterate over all materialised account records.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Account)> {
        self.accounts.iter()
    }
}
