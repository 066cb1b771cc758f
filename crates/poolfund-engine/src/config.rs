//! Fund configuration.

use poolfund_types::Address;

/// Maximum accepted proposal description length, in bytes.
pub const MAX_DESCRIPTION_LEN: usize = 256;

/// Process-wide fund configuration.
///
/// `owner` and `custody` are fixed at construction; the remaining parameters
/// are set exactly once by the owner through `initialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundConfig {
    /// Fund owner, fixed at genesis. Only identity allowed to initialize.
    pub owner: Address,
    /// Custody account escrowing deposited base-asset value.
    pub custody: Address,
    /// Smallest accepted deposit amount.
    pub minimum_deposit: u128,
    /// Heights a deposit stays locked after it is made.
    pub lock_period: u64,
    /// Whether `initialize` has run.
    pub initialized: bool,
}

impl FundConfig {
    /// Create an uninitialized configuration with the genesis identities.
    pub fn new(owner: Address, custody: Address) -> Self {
        Self {
            owner,
            custody,
            minimum_deposit: 0,
            lock_period: 0,
            initialized: false,
        }
    }
}
