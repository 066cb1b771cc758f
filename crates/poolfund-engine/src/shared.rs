//! Thread-safe fund wrapper.
//!
//! The engine itself serializes transitions through `&mut self`. Callers
//! driving it from several threads use this wrapper instead: one exclusive
//! lock guards the whole state, held for the full operation, so no operation
//! ever observes a partially applied mutation from another.

use std::sync::Arc;

use parking_lot::Mutex;
use poolfund_types::Address;

use crate::error::FundError;
use crate::fund::PoolFund;
use crate::proposal::{Proposal, VoteChoice};
use crate::snapshot::FundSnapshot;
use crate::transfer::ValueTransfer;
use crate::vault::DepositRecord;

/// Cloneable handle to a lock-guarded [`PoolFund`].
#[derive(Debug)]
pub struct SharedFund<T: ValueTransfer> {
    inner: Arc<Mutex<PoolFund<T>>>,
}

impl<T: ValueTransfer> Clone for SharedFund<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ValueTransfer> SharedFund<T> {
    pub fn new(fund: PoolFund<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(fund)),
        }
    }

    pub fn initialize(
        &self,
        caller: Address,
        minimum_deposit: u128,
        lock_period: u64,
    ) -> Result<(), FundError> {
        self.inner.lock().initialize(caller, minimum_deposit, lock_period)
    }

    pub fn deposit(&self, caller: Address, amount: u128, now: u64) -> Result<(), FundError> {
        self.inner.lock().deposit(caller, amount, now)
    }

    pub fn withdraw(&self, caller: Address, amount: u128, now: u64) -> Result<(), FundError> {
        self.inner.lock().withdraw(caller, amount, now)
    }

    pub fn create_proposal(
        &self,
        caller: Address,
        description: String,
        amount: u128,
        target: Address,
        duration: u64,
        now: u64,
    ) -> Result<u64, FundError> {
        self.inner
            .lock()
            .create_proposal(caller, description, amount, target, duration, now)
    }

    pub fn vote(
        &self,
        caller: Address,
        proposal_id: u64,
        choice: VoteChoice,
        now: u64,
    ) -> Result<(), FundError> {
        self.inner.lock().vote(caller, proposal_id, choice, now)
    }

    pub fn execute_proposal(
        &self,
        caller: Address,
        proposal_id: u64,
        now: u64,
    ) -> Result<(), FundError> {
        self.inner.lock().execute_proposal(caller, proposal_id, now)
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.inner.lock().balance_of(account)
    }

    pub fn total_supply(&self) -> u128 {
        self.inner.lock().total_supply()
    }

    pub fn proposal(&self, id: u64) -> Option<Proposal> {
        self.inner.lock().proposal(id).cloned()
    }

    pub fn deposit_info(&self, depositor: &Address) -> Option<DepositRecord> {
        self.inner.lock().deposit_info(depositor).copied()
    }

    pub fn has_voted(&self, proposal_id: u64, voter: &Address) -> bool {
        self.inner.lock().has_voted(proposal_id, voter)
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.lock().is_initialized()
    }

    pub fn proposal_count(&self) -> u64 {
        self.inner.lock().proposal_count()
    }

    pub fn snapshot(&self) -> FundSnapshot {
        self.inner.lock().snapshot()
    }
}
