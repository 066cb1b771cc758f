use thiserror::Error;

/// Errors that can occur in fund operations.
///
/// This is a closed taxonomy: each kind corresponds to one violated
/// precondition, reported synchronously to the caller. No failure is fatal;
/// the shared state stays valid and later operations proceed normally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FundError {
    #[error("Only the fund owner may perform this operation")]
    OwnerOnly,

    #[error("Fund is not initialized")]
    NotInitialized,

    #[error("Fund is already initialized")]
    AlreadyInitialized,

    #[error("Insufficient claim-token balance")]
    InsufficientBalance,

    #[error("Invalid proposal arguments")]
    InvalidAmount,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Proposal not found: {0}")]
    ProposalNotFound(u64),

    #[error("Proposal deadline constraint violated")]
    ProposalExpired,

    #[error("Already voted on this proposal")]
    AlreadyVoted,

    #[error("Deposit below the minimum")]
    BelowMinimum,

    #[error("Deposit is still in its lock period")]
    LockedPeriod,

    #[error("External value transfer failed")]
    TransferFailed,
}
