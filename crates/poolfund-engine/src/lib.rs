//! Poolfund Engine - Deterministic state transitions for a pooled fund.
//!
//! This crate provides:
//! - Claim-token ledger (mint/burn/transfer, live voting power)
//! - Deposit vault with lock periods
//! - Proposal registry with token-weighted voting and deadline execution
//! - Vote ledger enforcing one vote per (proposal, voter)
//!
//! All state is owned by a single [`PoolFund`] aggregate; every public
//! operation validates its preconditions, then mutates atomically with
//! respect to all shared state.

pub mod config;
pub mod error;
pub mod fund;
pub mod ledger;
pub mod proposal;
pub mod shared;
pub mod snapshot;
pub mod transfer;
pub mod vault;
pub mod votes;

pub use config::{FundConfig, MAX_DESCRIPTION_LEN};
pub use error::FundError;
pub use fund::PoolFund;
pub use ledger::ClaimLedger;
pub use proposal::{Proposal, ProposalRegistry, VoteChoice};
pub use shared::SharedFund;
pub use snapshot::{FundSnapshot, SnapshotError};
pub use transfer::{TransferFailure, ValueTransfer};
pub use vault::{DepositRecord, DepositVault};
pub use votes::VoteLedger;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        DepositRecord, FundConfig, FundError, FundSnapshot, PoolFund, Proposal,
        SharedFund, TransferFailure, ValueTransfer, VoteChoice,
    };
    pub use poolfund_types::Address;
}
