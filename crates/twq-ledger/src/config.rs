//! Ledger configuration types
//!
//! Every field has a serde default mirroring the legacy client's constants,
//! so an empty TOML file yields a fully working configuration.

use crate::constants::*;
use crate::schedule::DEFAULT_DAILY_REWARDS;
use crate::wallet::TonAmount;
use serde::{Deserialize, Serialize};

/// Complete ledger configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Daily login rewards
    #[serde(default)]
    pub daily: DailyLoginConfig,

    /// Mining cycle settings
    #[serde(default)]
    pub mining: MiningConfig,

    /// Referral bonus settings
    #[serde(default)]
    pub referral: ReferralConfig,

    /// One-shot task rewards
    #[serde(default)]
    pub tasks: TaskConfig,

    /// TON wallet and promo-code settings
    #[serde(default)]
    pub wallet: WalletConfig,
}

/// Daily login configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyLoginConfig {
    /// Ordered reward table, cycled by streak day
    #[serde(default = "default_daily_rewards")]
    pub rewards: Vec<u64>,

    /// Maximum gap in calendar days before the streak resets to 1
    #[serde(default = "default_grace_days")]
    pub grace_days: u32,
}

fn default_daily_rewards() -> Vec<u64> {
    DEFAULT_DAILY_REWARDS.to_vec()
}

fn default_grace_days() -> u32 {
    DAILY_GRACE_DAYS
}

impl Default for DailyLoginConfig {
    fn default() -> Self {
        Self {
            rewards: default_daily_rewards(),
            grace_days: default_grace_days(),
        }
    }
}

/// Mining cycle configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Cycle length in seconds
    #[serde(default = "default_mining_duration")]
    pub duration_secs: u64,

    /// Flat reward per claimed cycle
    #[serde(default = "default_mining_reward")]
    pub reward_points: u64,
}

fn default_mining_duration() -> u64 {
    MINING_DURATION_SECS
}

fn default_mining_reward() -> u64 {
    MINING_REWARD_POINTS
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_mining_duration(),
            reward_points: default_mining_reward(),
        }
    }
}

/// Referral configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferralConfig {
    /// Base reward an accepted referral is computed from
    #[serde(default = "default_referral_base")]
    pub base_points: u64,

    /// Referrer bonus as a percentage of the base, floored
    #[serde(default = "default_referral_percent")]
    pub bonus_percent: u64,

    /// Extra points a referred account earns on each mining claim
    #[serde(default = "default_claim_bonus")]
    pub claim_bonus_points: u64,
}

fn default_referral_base() -> u64 {
    REFERRAL_BASE_POINTS
}

fn default_referral_percent() -> u64 {
    REFERRAL_BONUS_PERCENT
}

fn default_claim_bonus() -> u64 {
    REFERRAL_CLAIM_BONUS_POINTS
}

impl ReferralConfig {
    /// Points credited to the referrer per accepted referral
    pub fn referrer_bonus(&self) -> u64 {
        self.base_points * self.bonus_percent / 100
    }
}

impl Default for ReferralConfig {
    fn default() -> Self {
        Self {
            base_points: default_referral_base(),
            bonus_percent: default_referral_percent(),
            claim_bonus_points: default_claim_bonus(),
        }
    }
}

/// Task reward configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Points per completed one-shot task
    #[serde(default = "default_task_reward")]
    pub reward_points: u64,
}

fn default_task_reward() -> u64 {
    TASK_REWARD_POINTS
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            reward_points: default_task_reward(),
        }
    }
}

/// Wallet and promo-code configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Minimum balance required to withdraw
    #[serde(default = "default_withdrawal_threshold")]
    pub withdrawal_threshold: TonAmount,

    /// Expected promo code
    #[serde(default = "default_promo_code")]
    pub code: String,

    /// TON staged per verified code
    #[serde(default = "default_code_reward")]
    pub code_reward: TonAmount,

    /// Total verify-claim slots for this installation
    #[serde(default = "default_max_code_claims")]
    pub max_code_claims: u32,
}

fn default_withdrawal_threshold() -> TonAmount {
    TonAmount::from_minor(WITHDRAWAL_THRESHOLD_MINOR)
}

fn default_promo_code() -> String {
    DEFAULT_PROMO_CODE.to_string()
}

fn default_code_reward() -> TonAmount {
    TonAmount::from_minor(CODE_REWARD_MINOR)
}

fn default_max_code_claims() -> u32 {
    MAX_CODE_CLAIMS
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            withdrawal_threshold: default_withdrawal_threshold(),
            code: default_promo_code(),
            code_reward: default_code_reward(),
            max_code_claims: default_max_code_claims(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_legacy_constants() {
        let config = LedgerConfig::default();

        assert_eq!(config.daily.rewards.len(), 30);
        assert_eq!(config.daily.grace_days, 1);
        assert_eq!(config.mining.duration_secs, 21_600);
        assert_eq!(config.mining.reward_points, 5);
        assert_eq!(config.tasks.reward_points, 10);
        assert_eq!(config.wallet.withdrawal_threshold, TonAmount::from_ton(1));
        assert_eq!(config.wallet.code, "1234");
        assert_eq!(config.wallet.code_reward.to_string(), "0.0299");
        assert_eq!(config.wallet.max_code_claims, 100);
    }

    #[test]
    fn test_referrer_bonus_floors() {
        let referral = ReferralConfig::default();
        // 2% of 100 points
        assert_eq!(referral.referrer_bonus(), 2);

        let tiny = ReferralConfig {
            base_points: 1,
            bonus_percent: 2,
            claim_bonus_points: 1,
        };
        // floor(1 * 2 / 100) = 0
        assert_eq!(tiny.referrer_bonus(), 0);
    }

    #[test]
    fn test_empty_document_deserializes_to_defaults() {
        let config: LedgerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LedgerConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{"mining": {"duration_secs": 60}}"#;
        let config: LedgerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.mining.duration_secs, 60);
        // untouched section keeps its default
        assert_eq!(config.mining.reward_points, 5);
        assert_eq!(config.daily.grace_days, 1);
    }
}
