//! State snapshot export/import.
//!
//! The snapshot is the data model made concrete as a serde document:
//! addresses keyed as hex strings, everything else plain numbers. It is an
//! export/import format, not a storage engine.

use std::collections::HashMap;
use std::str::FromStr;

use poolfund_types::{Address, TypesError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::FundConfig;
use crate::fund::PoolFund;
use crate::proposal::Proposal;
use crate::transfer::ValueTransfer;
use crate::vault::DepositRecord;

/// Errors that can occur restoring a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Invalid address in snapshot: {0}")]
    Address(#[from] TypesError),

    #[error("Snapshot violates the supply invariant: balances sum to {balance_sum}, supply is {total_supply}")]
    SupplyMismatch {
        balance_sum: u128,
        total_supply: u128,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized proposal with addresses as hex strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalEntry {
    pub id: u64,
    pub proposer: String,
    pub description: String,
    pub amount: u128,
    pub target: String,
    pub expires_at: u64,
    pub executed: bool,
    pub yes_votes: u128,
    pub no_votes: u128,
}

/// One recorded vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteEntry {
    pub proposal_id: u64,
    pub voter: String,
    pub yes: bool,
}

/// Full engine state as a serde document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundSnapshot {
    pub owner: String,
    pub custody: String,
    pub initialized: bool,
    pub minimum_deposit: u128,
    pub lock_period: u64,
    pub balances: HashMap<String, u128>,
    pub total_supply: u128,
    pub deposits: HashMap<String, DepositRecord>,
    pub proposals: Vec<ProposalEntry>,
    pub votes: Vec<VoteEntry>,
    pub proposal_count: u64,
}

impl FundSnapshot {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn hex_key(address: &Address) -> String {
    format!("0x{}", address.to_hex())
}

impl<T: ValueTransfer> PoolFund<T> {
    /// Export the full engine state.
    pub fn snapshot(&self) -> FundSnapshot {
        FundSnapshot {
            owner: hex_key(&self.config.owner),
            custody: hex_key(&self.config.custody),
            initialized: self.config.initialized,
            minimum_deposit: self.config.minimum_deposit,
            lock_period: self.config.lock_period,
            balances: self
                .ledger
                .iter()
                .map(|(address, balance)| (hex_key(address), *balance))
                .collect(),
            total_supply: self.ledger.total_supply(),
            deposits: self
                .vault
                .iter()
                .map(|(address, record)| (hex_key(address), *record))
                .collect(),
            proposals: self
                .registry
                .iter()
                .map(|proposal| ProposalEntry {
                    id: proposal.id,
                    proposer: hex_key(&proposal.proposer),
                    description: proposal.description.clone(),
                    amount: proposal.amount,
                    target: hex_key(&proposal.target),
                    expires_at: proposal.expires_at,
                    executed: proposal.executed,
                    yes_votes: proposal.yes_votes,
                    no_votes: proposal.no_votes,
                })
                .collect(),
            votes: self
                .votes
                .iter()
                .map(|((proposal_id, voter), yes)| VoteEntry {
                    proposal_id: *proposal_id,
                    voter: hex_key(voter),
                    yes: *yes,
                })
                .collect(),
            proposal_count: self.registry.count(),
        }
    }

    /// Rebuild an engine from a snapshot and a fresh transfer collaborator.
    ///
    /// The supply invariant is re-checked so a hand-edited or truncated
    /// document cannot smuggle in an inconsistent ledger.
    pub fn restore(snapshot: &FundSnapshot, transfer: T) -> Result<Self, SnapshotError> {
        let owner = Address::from_str(&snapshot.owner)?;
        let custody = Address::from_str(&snapshot.custody)?;

        let mut fund = PoolFund::new(owner, custody, transfer);
        fund.config = FundConfig {
            owner,
            custody,
            minimum_deposit: snapshot.minimum_deposit,
            lock_period: snapshot.lock_period,
            initialized: snapshot.initialized,
        };

        for (key, balance) in &snapshot.balances {
            fund.ledger.set_balance(Address::from_str(key)?, *balance);
        }
        fund.ledger.set_total_supply(snapshot.total_supply);

        let balance_sum = fund.ledger.balance_sum();
        if balance_sum != snapshot.total_supply {
            return Err(SnapshotError::SupplyMismatch {
                balance_sum,
                total_supply: snapshot.total_supply,
            });
        }

        for (key, record) in &snapshot.deposits {
            fund.vault.set_record(Address::from_str(key)?, *record);
        }

        for entry in &snapshot.proposals {
            fund.registry.restore(Proposal {
                id: entry.id,
                proposer: Address::from_str(&entry.proposer)?,
                description: entry.description.clone(),
                amount: entry.amount,
                target: Address::from_str(&entry.target)?,
                expires_at: entry.expires_at,
                executed: entry.executed,
                yes_votes: entry.yes_votes,
                no_votes: entry.no_votes,
            });
        }
        fund.registry.set_count(snapshot.proposal_count);

        for entry in &snapshot.votes {
            fund.votes
                .set_vote(entry.proposal_id, Address::from_str(&entry.voter)?, entry.yes);
        }

        Ok(fund)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::VoteChoice;
    use crate::transfer::TransferFailure;

    #[derive(Debug, Default)]
    struct NullTransfer;

    impl ValueTransfer for NullTransfer {
        fn transfer(
            &mut self,
            _amount: u128,
            _from: Address,
            _to: Address,
        ) -> Result<(), TransferFailure> {
            Ok(())
        }
    }

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn populated_fund() -> PoolFund<NullTransfer> {
        let mut fund = PoolFund::new(addr(0xf0), addr(0xf1), NullTransfer);
        fund.initialize(addr(0xf0), 100, 30).unwrap();
        fund.deposit(addr(1), 1_000, 10).unwrap();
        fund.deposit(addr(2), 400, 12).unwrap();
        let id = fund
            .create_proposal(addr(1), "grant".into(), 250, addr(3), 100, 12)
            .unwrap();
        fund.vote(addr(1), id, VoteChoice::Yes, 13).unwrap();
        fund.vote(addr(2), id, VoteChoice::No, 14).unwrap();
        fund
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let fund = populated_fund();
        let snapshot = fund.snapshot();

        let json = snapshot.to_json().unwrap();
        let restored_snapshot = FundSnapshot::from_json(&json).unwrap();
        let restored = PoolFund::restore(&restored_snapshot, NullTransfer).unwrap();

        assert!(restored.is_initialized());
        assert_eq!(restored.config().minimum_deposit, 100);
        assert_eq!(restored.balance_of(&addr(1)), 1_000);
        assert_eq!(restored.balance_of(&addr(2)), 400);
        assert_eq!(restored.total_supply(), 1_400);
        assert_eq!(restored.deposit_info(&addr(1)).unwrap().unlock_height, 40);
        assert_eq!(restored.proposal_count(), 1);

        let proposal = restored.proposal(1).unwrap();
        assert_eq!(proposal.yes_votes, 1_000);
        assert_eq!(proposal.no_votes, 400);
        assert!(restored.has_voted(1, &addr(1)));
        assert!(restored.has_voted(1, &addr(2)));
        assert!(!restored.has_voted(1, &addr(3)));
    }

    #[test]
    fn test_restore_rejects_broken_supply() {
        let fund = populated_fund();
        let mut snapshot = fund.snapshot();
        snapshot.total_supply += 1;

        let err = PoolFund::restore(&snapshot, NullTransfer).unwrap_err();
        assert!(matches!(err, SnapshotError::SupplyMismatch { .. }));
    }

    #[test]
    fn test_restore_rejects_bad_address() {
        let fund = populated_fund();
        let mut snapshot = fund.snapshot();
        snapshot.owner = "not-an-address".into();

        let err = PoolFund::restore(&snapshot, NullTransfer).unwrap_err();
        assert!(matches!(err, SnapshotError::Address(_)));
    }

    #[test]
    fn test_restored_engine_keeps_operating() {
        let fund = populated_fund();
        let snapshot = fund.snapshot();
        let mut restored = PoolFund::restore(&snapshot, NullTransfer).unwrap();

        // Voting and execution pick up where the exported engine stopped.
        assert_eq!(
            restored.vote(addr(1), 1, VoteChoice::Yes, 20),
            Err(crate::FundError::AlreadyVoted)
        );
        restored.execute_proposal(addr(9), 1, 112).unwrap();
        assert!(restored.proposal(1).unwrap().executed);
    }
}
