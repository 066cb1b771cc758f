//! Vote ledger.
//!
//! Pure associative set of (proposal, voter) pairs with insert-once
//! semantics. A recorded vote is never updated or deleted, which is what
//! structurally enforces one vote per voter per proposal.

use std::collections::HashMap;

use poolfund_types::Address;

use crate::error::FundError;
use crate::proposal::VoteChoice;

/// Insert-once record of who voted on which proposal, and how.
#[derive(Debug, Default)]
pub struct VoteLedger {
    votes: HashMap<(u64, Address), bool>,
}

impl VoteLedger {
    /// Create an empty vote ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `voter` already voted on `proposal_id`.
    pub fn has_voted(&self, proposal_id: u64, voter: &Address) -> bool {
        self.votes.contains_key(&(proposal_id, *voter))
    }

    /// The recorded choice, if any.
    pub fn choice(&self, proposal_id: u64, voter: &Address) -> Option<VoteChoice> {
        self.votes.get(&(proposal_id, *voter)).map(|&yes| {
            if yes {
                VoteChoice::Yes
            } else {
                VoteChoice::No
            }
        })
    }

    /// Record a vote. Fails if the pair already voted; never overwrites.
    pub fn record(
        &mut self,
        proposal_id: u64,
        voter: Address,
        choice: VoteChoice,
    ) -> Result<(), FundError> {
        if self.has_voted(proposal_id, &voter) {
            return Err(FundError::AlreadyVoted);
        }
        self.votes
            .insert((proposal_id, voter), choice == VoteChoice::Yes);
        Ok(())
    }

    /// Iterate over all ((proposal, voter), yes?) entries.
    pub fn iter(&self) -> impl Iterator<Item = (&(u64, Address), &bool)> {
        self.votes.iter()
    }

    pub(crate) fn set_vote(&mut self, proposal_id: u64, voter: Address, yes: bool) {
        self.votes.insert((proposal_id, voter), yes);
    }
}
