//! Error types for ledger operations

use crate::wallet::TonAmount;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur in reward ledger operations
///
/// Every rejected operation leaves the account unchanged; none of these are
/// fatal to the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    // === Points ===
    /// Negative point delta rejected
    #[error("Invalid point amount: {0}")]
    InvalidAmount(i64),

    // === Daily Login ===
    /// Login reward was already claimed for this calendar day
    #[error("Daily reward already claimed today")]
    AlreadyClaimedToday,

    // === Mining ===
    /// A cycle is running or matured-unclaimed
    #[error("A mining cycle is already active")]
    CycleAlreadyActive,

    /// Claim attempted before the cycle matured
    #[error("Mining cycle not matured: {remaining_secs}s remaining")]
    NotMatured { remaining_secs: u64 },

    /// Claim attempted with no cycle started
    #[error("No mining cycle to claim")]
    NoActiveCycle,

    // === Referrals ===
    /// Empty or self-referencing referrer id
    #[error("Invalid referrer id: {0:?}")]
    InvalidReferrer(String),

    // === Wallet ===
    /// Balance has not reached the withdrawal threshold
    #[error("Balance below withdrawal threshold: need {needed}, have {balance}")]
    BelowThreshold {
        needed: TonAmount,
        balance: TonAmount,
    },

    /// Promo code did not match
    #[error("Incorrect code")]
    IncorrectCode,

    /// All promo claim slots are used up
    #[error("Maximum number of claims reached: {limit}")]
    ClaimLimitReached { limit: u32 },

    /// Code claim attempted with nothing staged
    #[error("No verified reward waiting to be claimed")]
    NothingToClaim,

    // === Persistence ===
    /// Snapshot read/write failure; the operation was not applied
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Stable error codes for UI consumers
impl LedgerError {
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidAmount(_) => 1001,
            Self::AlreadyClaimedToday => 1002,
            Self::CycleAlreadyActive => 1003,
            Self::NotMatured { .. } => 1004,
            Self::NoActiveCycle => 1005,
            Self::InvalidReferrer(_) => 1006,
            Self::BelowThreshold { .. } => 1007,
            Self::IncorrectCode => 1008,
            Self::ClaimLimitReached { .. } => 1009,
            Self::NothingToClaim => 1010,
            Self::Persistence(_) => 1100,
        }
    }

    /// Check if the operation may succeed later without any other call
    /// changing the account first
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NotMatured { .. } | Self::Persistence(_))
    }
}
