//! External value-transfer collaborator.
//!
//! The engine never moves base-asset value itself; it asks this primitive to
//! move value between an external account and the fund custody account. A
//! failure is immediate and final for the enclosing operation — no retries.

use poolfund_types::Address;
use thiserror::Error;

/// Failure reported by the external asset mover.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("value transfer of {amount} failed: {reason}")]
pub struct TransferFailure {
    pub amount: u128,
    pub reason: String,
}

impl TransferFailure {
    pub fn new(amount: u128, reason: impl Into<String>) -> Self {
        Self {
            amount,
            reason: reason.into(),
        }
    }
}

/// Synchronous base-asset mover between accounts.
///
/// Implementations must either fully move `amount` from `from` to `to` or
/// fail with no effect; the engine aborts the enclosing operation on failure
/// before any other state mutation (deposit, execute) or after the burn
/// (withdraw — see the vault documentation for the accepted asymmetry).
pub trait ValueTransfer {
    fn transfer(
        &mut self,
        amount: u128,
        from: Address,
        to: Address,
    ) -> Result<(), TransferFailure>;
}
