//! Proposal lifecycle management.
//!
//! A proposal is open for voting until its expiry height, then stays in the
//! registry forever: executed if it passed and its payout went through, or
//! simply non-executed otherwise. There is no explicit closed state.

use std::collections::HashMap;

use poolfund_types::Address;
use serde::{Deserialize, Serialize};

/// A voter's choice on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    /// Count the voter's power toward the yes tally
    Yes,
    /// Count the voter's power toward the no tally
    No,
}

/// A directed-payout proposal.
///
/// Once `executed` is true the record is frozen: the tally, amount and target
/// never change again, and the flag never reverts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    /// Unique proposal ID, strictly increasing from 1
    pub id: u64,
    /// Identity that created the proposal
    pub proposer: Address,
    /// Bounded-length description text
    pub description: String,
    /// Base-asset amount to pay out on execution
    pub amount: u128,
    /// Payout recipient
    pub target: Address,
    /// Height at which voting closes and execution becomes possible
    pub expires_at: u64,
    /// Whether the payout has been executed
    pub executed: bool,
    /// Token-weighted yes tally
    pub yes_votes: u128,
    /// Token-weighted no tally
    pub no_votes: u128,
}

impl Proposal {
    /// Voting closes strictly at the expiry height.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    /// Strict majority: ties do not pass.
    pub fn passed(&self) -> bool {
        self.yes_votes > self.no_votes
    }

    /// Add `power` to the tally chosen by `choice`. Tallies saturate rather
    /// than wrap.
    pub fn apply_vote(&mut self, choice: VoteChoice, power: u128) {
        match choice {
            VoteChoice::Yes => self.yes_votes = self.yes_votes.saturating_add(power),
            VoteChoice::No => self.no_votes = self.no_votes.saturating_add(power),
        }
    }
}

/// Registry of all proposals and the monotonic id sequence.
#[derive(Debug, Default)]
pub struct ProposalRegistry {
    proposals: HashMap<u64, Proposal>,
    count: u64,
}

impl ProposalRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id and store a fresh open proposal.
    pub fn create(
        &mut self,
        proposer: Address,
        description: String,
        amount: u128,
        target: Address,
        duration: u64,
        now: u64,
    ) -> u64 {
        let id = self.count + 1;
        self.count = id;

        self.proposals.insert(
            id,
            Proposal {
                id,
                proposer,
                description,
                amount,
                target,
                expires_at: now.saturating_add(duration),
                executed: false,
                yes_votes: 0,
                no_votes: 0,
            },
        );

        id
    }

    /// Get a proposal.
    pub fn get(&self, id: u64) -> Option<&Proposal> {
        self.proposals.get(&id)
    }

    /// Get a proposal mutably.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Proposal> {
        self.proposals.get_mut(&id)
    }

    /// Number of proposals ever created.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Iterate over all proposals.
    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    pub(crate) fn restore(&mut self, proposal: Proposal) {
        self.proposals.insert(proposal.id, proposal);
    }

    pub(crate) fn set_count(&mut self, count: u64) {
        self.count = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut registry = ProposalRegistry::new();
        assert_eq!(registry.count(), 0);

        let first = registry.create(addr(1), "a".into(), 10, addr(2), 100, 0);
        let second = registry.create(addr(1), "b".into(), 10, addr(2), 100, 0);

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(registry.count(), 2);
        assert!(registry.get(1).is_some());
        assert!(registry.get(3).is_none());
    }

    #[test]
    fn test_new_proposal_is_open_with_empty_tally() {
        let mut registry = ProposalRegistry::new();
        let id = registry.create(addr(1), "payout".into(), 500, addr(2), 100, 40);

        let proposal = registry.get(id).unwrap();
        assert_eq!(proposal.expires_at, 140);
        assert!(!proposal.executed);
        assert_eq!(proposal.yes_votes, 0);
        assert_eq!(proposal.no_votes, 0);
    }

    #[test]
    fn test_expiry_boundary() {
        let mut registry = ProposalRegistry::new();
        let id = registry.create(addr(1), "payout".into(), 500, addr(2), 100, 40);
        let proposal = registry.get(id).unwrap();

        assert!(!proposal.is_expired(139));
        assert!(proposal.is_expired(140));
    }

    #[test]
    fn test_huge_duration_saturates() {
        let mut registry = ProposalRegistry::new();
        let id = registry.create(addr(1), "open-ended".into(), 1, addr(2), u64::MAX, 40);

        let proposal = registry.get(id).unwrap();
        assert_eq!(proposal.expires_at, u64::MAX);
        assert!(!proposal.is_expired(u64::MAX - 1));
    }

    #[test]
    fn test_tally_saturates_at_ceiling() {
        let mut registry = ProposalRegistry::new();
        let id = registry.create(addr(1), "payout".into(), 1, addr(2), 100, 0);
        let proposal = registry.get_mut(id).unwrap();

        proposal.apply_vote(VoteChoice::Yes, u128::MAX);
        proposal.apply_vote(VoteChoice::Yes, u128::MAX);
        assert_eq!(proposal.yes_votes, u128::MAX);
        assert!(proposal.passed());
    }

    #[test]
    fn test_strict_majority() {
        let mut registry = ProposalRegistry::new();
        let id = registry.create(addr(1), "payout".into(), 500, addr(2), 100, 40);
        let proposal = registry.get_mut(id).unwrap();

        assert!(!proposal.passed());

        proposal.apply_vote(VoteChoice::Yes, 1_000);
        proposal.apply_vote(VoteChoice::No, 1_000);
        assert!(!proposal.passed()); // tie fails

        proposal.apply_vote(VoteChoice::Yes, 1);
        assert!(proposal.passed());
    }
}
