//! Deposit vault.
//!
//! Owns the per-depositor locked-deposit records. The orchestration of the
//! external transfer and the mint/burn around these records lives in the fund
//! façade; the vault is the record store plus the lock-expiry rule.

use std::collections::HashMap;

use poolfund_types::Address;
use serde::{Deserialize, Serialize};

/// A depositor's locked-deposit record.
///
/// At most one active record exists per identity. A new deposit replaces any
/// prior record; withdrawal checks the record but never deletes it, so a
/// fully withdrawn record simply goes stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecord {
    /// Base-asset amount recorded at deposit time.
    pub amount: u128,
    /// Height at which withdrawal becomes permitted.
    pub unlock_height: u64,
    /// Height of the last reward checkpoint (set to the deposit height).
    pub last_reward_height: u64,
}

impl DepositRecord {
    /// Withdrawal is permitted exactly at the unlock height, not before.
    pub fn is_unlocked(&self, now: u64) -> bool {
        now >= self.unlock_height
    }
}

/// Per-identity deposit records.
#[derive(Debug, Default)]
pub struct DepositVault {
    records: HashMap<Address, DepositRecord>,
}

impl DepositVault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a depositor's record.
    pub fn get(&self, depositor: &Address) -> Option<&DepositRecord> {
        self.records.get(depositor)
    }

    /// Write the record for a deposit made at `now`, replacing any prior
    /// record for the same identity.
    pub fn record_deposit(
        &mut self,
        depositor: Address,
        amount: u128,
        now: u64,
        lock_period: u64,
    ) -> DepositRecord {
        let record = DepositRecord {
            amount,
            unlock_height: now.saturating_add(lock_period),
            last_reward_height: now,
        };
        self.records.insert(depositor, record);
        record
    }

    /// Iterate over all (depositor, record) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &DepositRecord)> {
        self.records.iter()
    }

    pub(crate) fn set_record(&mut self, depositor: Address, record: DepositRecord) {
        self.records.insert(depositor, record);
    }
}
