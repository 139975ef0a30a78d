//! # TWQ Reward Ledger
//!
//! Consolidated reward and progression core for the TWQ tap-to-earn client:
//! one authority over points, TON balance, daily-login streaks, the mining
//! cycle, and referral accounting. UI panels, buttons, and timers are
//! external consumers that call ledger operations and re-render from the
//! returned values.
//!
//! ## Reward Sources
//!
//! | Source | Reward | Cadence |
//! |--------|--------|---------|
//! | Daily login | 10-600 points (30-day cyclic schedule) | once per calendar day |
//! | Mining cycle | 5 points (+1 for referred accounts) | every 6 hours, claimed |
//! | Referral accepted | 2% of 100-point base | once per unique referred id |
//! | One-shot task | 10 points | once per task id |
//! | Promo code | 0.0299 TON | up to 100 claims |
//!
//! ## Operation Flow
//!
//! ```text
//! UI event -> RewardLedger operation -> snapshot committed -> UI re-render
//! ```
//!
//! All operations take the clock as a parameter and never block; mining
//! progress is computed lazily from wall-clock time on each query.

pub mod account;
pub mod config;
pub mod error;
pub mod ledger;
pub mod mining;
pub mod schedule;
pub mod wallet;

// Re-exports
pub use account::PlayerAccount;
pub use config::LedgerConfig;
pub use error::{LedgerError, Result};
pub use ledger::{
    DailyLoginReceipt, ReferralReceipt, RewardLedger, SnapshotStore, TaskReceipt,
};
pub use mining::{MiningCycle, MiningProgress};
pub use schedule::DailyRewardSchedule;
pub use wallet::{CodeClaimState, TonAmount};

/// Ledger constants
pub mod constants {
    /// Display precision of TON balances
    pub const TON_DECIMALS: u32 = 4;

    /// One TON in minor units
    pub const ONE_TON: u64 = 10_000;

    /// Mining cycle length: 6 hours
    pub const MINING_DURATION_SECS: u64 = 21_600;

    /// Flat reward per claimed mining cycle
    pub const MINING_REWARD_POINTS: u64 = 5;

    /// Calendar days a streak survives without a claim
    pub const DAILY_GRACE_DAYS: u32 = 1;

    /// Base the referrer bonus is computed from
    pub const REFERRAL_BASE_POINTS: u64 = 100;

    /// Referrer bonus percentage, floored
    pub const REFERRAL_BONUS_PERCENT: u64 = 2;

    /// Extra points per mining claim for referred accounts
    pub const REFERRAL_CLAIM_BONUS_POINTS: u64 = 1;

    /// Reward per completed one-shot task
    pub const TASK_REWARD_POINTS: u64 = 10;

    /// Minimum balance to withdraw: 1 TON
    pub const WITHDRAWAL_THRESHOLD_MINOR: u64 = 10_000;

    /// TON staged per verified promo code: 0.0299
    pub const CODE_REWARD_MINOR: u64 = 299;

    /// Verify-claim slots per installation
    pub const MAX_CODE_CLAIMS: u32 = 100;

    /// Expected promo code
    pub const DEFAULT_PROMO_CODE: &str = "1234";
}

pub use constants::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_ton_matches_decimals() {
        assert_eq!(ONE_TON, 10u64.pow(TON_DECIMALS));
    }

    #[test]
    fn test_mining_cycle_is_six_hours() {
        assert_eq!(MINING_DURATION_SECS, 6 * 3600);
    }
}
