//! Claim-token ledger.
//!
//! Owns fungible claim-token balances and the total supply. Tokens are minted
//! 1:1 on deposit and burned on withdrawal; a holder's live balance is their
//! voting power.

use std::collections::HashMap;

use poolfund_types::Address;

use crate::error::FundError;

/// Fungible claim-token balances and total supply.
///
/// Invariant: the sum of all balances equals `total_supply` after every
/// operation. Mint and burn move both counters as one logical unit; transfer
/// leaves the supply untouched.
#[derive(Debug, Default)]
pub struct ClaimLedger {
    balances: HashMap<Address, u128>,
    total_supply: u128,
}

impl ClaimLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of an account; absent accounts read as zero.
    pub fn balance(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Total claim-token supply.
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Voting power is the live balance at read time, not a snapshot.
    pub fn voting_power(&self, account: &Address) -> u128 {
        self.balance(account)
    }

    /// Increase `account` and the total supply by `amount`.
    ///
    /// Infallible by contract: the amount was already validated by the caller
    /// and arrives from a successful external transfer. Both counters
    /// saturate rather than wrap, so a supply at the numeric ceiling stays
    /// consistent with its balances.
    pub fn mint(&mut self, account: Address, amount: u128) {
        let balance = self.balances.entry(account).or_insert(0);
        *balance = balance.saturating_add(amount);
        self.total_supply = self.total_supply.saturating_add(amount);
    }

    /// Decrease `account` and the total supply by `amount`.
    pub fn burn(&mut self, account: Address, amount: u128) -> Result<(), FundError> {
        let balance = self.balance(&account);
        if balance < amount {
            return Err(FundError::InsufficientBalance);
        }
        self.balances.insert(account, balance - amount);
        self.total_supply -= amount;
        Ok(())
    }

    /// Move `amount` between accounts; total supply unchanged.
    ///
    /// Part of the ledger's contract even though no public fund operation
    /// currently reaches it.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), FundError> {
        let from_balance = self.balance(&from);
        if from_balance < amount {
            return Err(FundError::InsufficientBalance);
        }
        self.balances.insert(from, from_balance - amount);
        let to_balance = self.balances.entry(to).or_insert(0);
        *to_balance = to_balance.saturating_add(amount);
        Ok(())
    }

    /// Sum of all balances; equals `total_supply` in every reachable state.
    pub fn balance_sum(&self) -> u128 {
        self.balances.values().sum()
    }

    /// Iterate over all (account, balance) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &u128)> {
        self.balances.iter()
    }

    pub(crate) fn set_balance(&mut self, account: Address, balance: u128) {
        self.balances.insert(account, balance);
    }

    pub(crate) fn set_total_supply(&mut self, total_supply: u128) {
        self.total_supply = total_supply;
    }
}
