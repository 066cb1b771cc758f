//! The fund aggregate: single owner of all shared state.
//!
//! Every public operation reads the caller identity and current height as
//! arguments, validates its preconditions against the cooperating units,
//! mutates atomically, and returns a typed result. Operations execute one at
//! a time; `PoolFund` takes `&mut self` for every mutation, so exclusive
//! ownership is what serializes transitions (see [`crate::shared`] for the
//! lock-guarded multi-thread wrapper).

use poolfund_types::Address;

use crate::config::{FundConfig, MAX_DESCRIPTION_LEN};
use crate::error::FundError;
use crate::ledger::ClaimLedger;
use crate::proposal::{Proposal, ProposalRegistry, VoteChoice};
use crate::transfer::ValueTransfer;
use crate::vault::{DepositRecord, DepositVault};
use crate::votes::VoteLedger;

/// Governance-controlled pooled-fund state engine.
#[derive(Debug)]
pub struct PoolFund<T: ValueTransfer> {
    pub(crate) config: FundConfig,
    pub(crate) ledger: ClaimLedger,
    pub(crate) vault: DepositVault,
    pub(crate) votes: VoteLedger,
    pub(crate) registry: ProposalRegistry,
    pub(crate) transfer: T,
}

impl<T: ValueTransfer> PoolFund<T> {
    /// Create an uninitialized fund with its genesis identities and the
    /// external transfer collaborator.
    pub fn new(owner: Address, custody: Address, transfer: T) -> Self {
        Self {
            config: FundConfig::new(owner, custody),
            ledger: ClaimLedger::new(),
            vault: DepositVault::new(),
            votes: VoteLedger::new(),
            registry: ProposalRegistry::new(),
            transfer,
        }
    }

    /// One-time, owner-only parameter setup.
    pub fn initialize(
        &mut self,
        caller: Address,
        minimum_deposit: u128,
        lock_period: u64,
    ) -> Result<(), FundError> {
        if caller != self.config.owner {
            tracing::debug!(caller = %caller, "initialize rejected: not owner");
            return Err(FundError::OwnerOnly);
        }
        if self.config.initialized {
            return Err(FundError::AlreadyInitialized);
        }

        self.config.minimum_deposit = minimum_deposit;
        self.config.lock_period = lock_period;
        self.config.initialized = true;

        tracing::info!(minimum_deposit, lock_period, "fund initialized");
        Ok(())
    }

    /// Deposit base-asset value and receive claim tokens 1:1.
    ///
    /// The external transfer into custody runs first; if it fails, nothing
    /// is mutated. On success the deposit record is written (replacing any
    /// prior record) and tokens are minted.
    pub fn deposit(&mut self, caller: Address, amount: u128, now: u64) -> Result<(), FundError> {
        if !self.config.initialized {
            return Err(FundError::NotInitialized);
        }
        if amount < self.config.minimum_deposit {
            tracing::debug!(%caller, amount, "deposit rejected: below minimum");
            return Err(FundError::BelowMinimum);
        }

        if let Err(failure) = self.transfer.transfer(amount, caller, self.config.custody) {
            tracing::warn!(%caller, amount, %failure, "deposit transfer failed");
            return Err(FundError::TransferFailed);
        }

        let record = self
            .vault
            .record_deposit(caller, amount, now, self.config.lock_period);
        self.ledger.mint(caller, amount);

        tracing::info!(
            %caller,
            amount,
            unlock_height = record.unlock_height,
            "deposit committed"
        );
        Ok(())
    }

    /// Burn claim tokens and return base-asset value from custody.
    ///
    /// The burn runs before the external transfer so a re-entering transfer
    /// primitive cannot double-spend the balance. If the transfer then fails,
    /// the burn is not reverted; the failure is reported as `TransferFailed`.
    pub fn withdraw(&mut self, caller: Address, amount: u128, now: u64) -> Result<(), FundError> {
        if !self.config.initialized {
            return Err(FundError::NotInitialized);
        }
        let record = match self.vault.get(&caller) {
            Some(record) => *record,
            None => {
                tracing::debug!(%caller, "withdraw rejected: no deposit record");
                return Err(FundError::Unauthorized);
            }
        };
        if !record.is_unlocked(now) {
            tracing::debug!(
                %caller,
                now,
                unlock_height = record.unlock_height,
                "withdraw rejected: still locked"
            );
            return Err(FundError::LockedPeriod);
        }

        self.ledger.burn(caller, amount)?;

        if let Err(failure) = self.transfer.transfer(amount, self.config.custody, caller) {
            tracing::warn!(%caller, amount, %failure, "withdraw transfer failed after burn");
            return Err(FundError::TransferFailed);
        }

        tracing::info!(%caller, amount, "withdrawal committed");
        Ok(())
    }

    /// Create a directed-payout proposal; returns its id.
    pub fn create_proposal(
        &mut self,
        caller: Address,
        description: String,
        amount: u128,
        target: Address,
        duration: u64,
        now: u64,
    ) -> Result<u64, FundError> {
        if !self.config.initialized {
            return Err(FundError::NotInitialized);
        }
        if amount == 0 || description.len() > MAX_DESCRIPTION_LEN {
            return Err(FundError::InvalidAmount);
        }
        if self.ledger.balance(&caller) == 0 {
            tracing::debug!(%caller, "create_proposal rejected: no claim tokens");
            return Err(FundError::Unauthorized);
        }

        let id = self
            .registry
            .create(caller, description, amount, target, duration, now);

        tracing::info!(id, proposer = %caller, amount, %target, "proposal created");
        Ok(id)
    }

    /// Cast a token-weighted vote. Power is read live at vote time.
    pub fn vote(
        &mut self,
        caller: Address,
        proposal_id: u64,
        choice: VoteChoice,
        now: u64,
    ) -> Result<(), FundError> {
        if !self.config.initialized {
            return Err(FundError::NotInitialized);
        }
        let power = self.ledger.voting_power(&caller);
        let proposal = self
            .registry
            .get_mut(proposal_id)
            .ok_or(FundError::ProposalNotFound(proposal_id))?;
        if power == 0 {
            return Err(FundError::Unauthorized);
        }
        if proposal.is_expired(now) {
            return Err(FundError::ProposalExpired);
        }

        self.votes.record(proposal_id, caller, choice)?;
        proposal.apply_vote(choice, power);

        tracing::info!(proposal_id, voter = %caller, power, ?choice, "vote recorded");
        Ok(())
    }

    /// Execute a passed proposal after its expiry. Permissionless: any
    /// identity may trigger it.
    ///
    /// The payout transfer precedes the executed-flag write, so a transfer
    /// failure leaves the proposal executable later.
    pub fn execute_proposal(
        &mut self,
        caller: Address,
        proposal_id: u64,
        now: u64,
    ) -> Result<(), FundError> {
        let (amount, target) = {
            let proposal = self
                .registry
                .get(proposal_id)
                .ok_or(FundError::ProposalNotFound(proposal_id))?;
            if proposal.executed {
                return Err(FundError::Unauthorized);
            }
            if !proposal.is_expired(now) {
                return Err(FundError::ProposalExpired);
            }
            if !proposal.passed() {
                tracing::debug!(
                    proposal_id,
                    yes = proposal.yes_votes,
                    no = proposal.no_votes,
                    "execute rejected: tally does not pass"
                );
                return Err(FundError::Unauthorized);
            }
            (proposal.amount, proposal.target)
        };

        if let Err(failure) = self.transfer.transfer(amount, self.config.custody, target) {
            tracing::warn!(proposal_id, amount, %failure, "payout transfer failed");
            return Err(FundError::TransferFailed);
        }

        // Lookup cannot fail: the id was resolved above and proposals are
        // never deleted.
        if let Some(proposal) = self.registry.get_mut(proposal_id) {
            proposal.executed = true;
        }

        tracing::info!(proposal_id, executor = %caller, amount, %target, "proposal executed");
        Ok(())
    }

    // Read-only surface.

    /// Claim-token balance of an identity.
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.ledger.balance(account)
    }

    /// Total claim-token supply.
    pub fn total_supply(&self) -> u128 {
        self.ledger.total_supply()
    }

    /// Proposal record, if the id exists.
    pub fn proposal(&self, id: u64) -> Option<&Proposal> {
        self.registry.get(id)
    }

    /// Deposit record, if the identity ever deposited.
    pub fn deposit_info(&self, depositor: &Address) -> Option<&DepositRecord> {
        self.vault.get(depositor)
    }

    /// Whether the pair already voted.
    pub fn has_voted(&self, proposal_id: u64, voter: &Address) -> bool {
        self.votes.has_voted(proposal_id, voter)
    }

    /// Whether `initialize` has run.
    pub fn is_initialized(&self) -> bool {
        self.config.initialized
    }

    /// Number of proposals ever created.
    pub fn proposal_count(&self) -> u64 {
        self.registry.count()
    }

    /// Fund configuration.
    pub fn config(&self) -> &FundConfig {
        &self.config
    }

    /// The external transfer collaborator.
    pub fn transfer_primitive(&self) -> &T {
        &self.transfer
    }

    /// Mutable access to the external transfer collaborator.
    pub fn transfer_primitive_mut(&mut self) -> &mut T {
        &mut self.transfer
    }
}
