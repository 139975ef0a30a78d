//! # Player Account
//!
//! The complete persisted state of one installation. There is exactly one
//! `PlayerAccount` per installation and exactly one logical actor mutating
//! it, always through [`RewardLedger`](crate::ledger::RewardLedger)
//! operations.
//!
//! The snapshot serializes to the original key-value layout (`TotalPoints`,
//! `TonBalance`, `LastLoginDate`, ...) so a persisted record stays readable
//! next to the legacy client's storage.

use crate::mining::MiningCycle;
use crate::wallet::{CodeClaimState, TonAmount};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// State of one player installation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "SnapshotRecord", try_from = "SnapshotRecord")]
pub struct PlayerAccount {
    /// Stable per-installation identifier, generated once
    pub player_id: Uuid,

    /// Running point total, non-decreasing except on explicit reset
    pub total_points: u64,

    /// Local TON balance, zeroed on withdrawal
    pub ton_balance: TonAmount,

    /// Consecutive daily logins claimed
    pub login_streak: u32,

    /// Calendar date of the last accepted login claim
    pub last_login_date: Option<NaiveDate>,

    /// Active mining cycle, if any; claiming returns this to `None`
    pub mining: Option<MiningCycle>,

    /// Unique ids of players this installation referred
    pub referred_players: BTreeSet<String>,

    /// Id of the player whose invite link this installation joined through
    pub referred_by: Option<String>,

    /// One-shot task ids already rewarded
    pub completed_tasks: BTreeSet<String>,

    /// Promo-code verify-then-claim state
    pub code_claim: CodeClaimState,
}

impl PlayerAccount {
    /// Create a zeroed account with a fresh installation id
    pub fn new() -> Self {
        Self {
            player_id: Uuid::new_v4(),
            total_points: 0,
            ton_balance: TonAmount::ZERO,
            login_streak: 0,
            last_login_date: None,
            mining: None,
            referred_players: BTreeSet::new(),
            referred_by: None,
            completed_tasks: BTreeSet::new(),
            code_claim: CodeClaimState::default(),
        }
    }

    /// Number of accepted unique referrals
    pub fn referral_count(&self) -> u32 {
        self.referred_players.len() as u32
    }

    pub fn has_referrer(&self) -> bool {
        self.referred_by.is_some()
    }
}

impl Default for PlayerAccount {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk layout of a [`PlayerAccount`]
///
/// Field names mirror the legacy key-value store. The mining cycle is
/// flattened into `IsMining` / `MiningStartTime` / `MiningDurationSecs`;
/// `ReferralCount` is persisted alongside the id set and checked against it
/// on load.
#[derive(Clone, Serialize, Deserialize)]
struct SnapshotRecord {
    #[serde(rename = "PlayerID")]
    player_id: Uuid,

    #[serde(rename = "TotalPoints", default)]
    total_points: u64,

    #[serde(rename = "TonBalance", default)]
    ton_balance: TonAmount,

    #[serde(rename = "LoginStreak", default)]
    login_streak: u32,

    #[serde(rename = "LastLoginDate", default, skip_serializing_if = "Option::is_none")]
    last_login_date: Option<NaiveDate>,

    #[serde(rename = "IsMining", default)]
    is_mining: bool,

    #[serde(rename = "MiningStartTime", default, skip_serializing_if = "Option::is_none")]
    mining_start_time: Option<i64>,

    #[serde(rename = "MiningDurationSecs", default, skip_serializing_if = "Option::is_none")]
    mining_duration_secs: Option<u64>,

    #[serde(rename = "ReferralCount", default)]
    referral_count: u32,

    #[serde(rename = "ReferredPlayers", default)]
    referred_players: BTreeSet<String>,

    #[serde(rename = "ReferredBy", default, skip_serializing_if = "Option::is_none")]
    referred_by: Option<String>,

    #[serde(rename = "CompletedTasks", default)]
    completed_tasks: BTreeSet<String>,

    #[serde(rename = "PendingCodeReward", default)]
    pending_code_reward: TonAmount,

    #[serde(rename = "CodeClaimsUsed", default)]
    code_claims_used: u32,
}

impl From<PlayerAccount> for SnapshotRecord {
    fn from(account: PlayerAccount) -> Self {
        Self {
            player_id: account.player_id,
            total_points: account.total_points,
            ton_balance: account.ton_balance,
            login_streak: account.login_streak,
            last_login_date: account.last_login_date,
            is_mining: account.mining.is_some(),
            mining_start_time: account.mining.map(|c| c.started_at),
            mining_duration_secs: account.mining.map(|c| c.duration_secs),
            referral_count: account.referred_players.len() as u32,
            referred_players: account.referred_players,
            referred_by: account.referred_by,
            completed_tasks: account.completed_tasks,
            pending_code_reward: account.code_claim.pending,
            code_claims_used: account.code_claim.claims_used,
        }
    }
}

impl TryFrom<SnapshotRecord> for PlayerAccount {
    type Error = String;

    fn try_from(record: SnapshotRecord) -> Result<Self, Self::Error> {
        if record.referral_count as usize != record.referred_players.len() {
            return Err(format!(
                "corrupt snapshot: ReferralCount {} does not match {} referred players",
                record.referral_count,
                record.referred_players.len()
            ));
        }

        // A stale MiningStartTime with IsMining unset means no active cycle,
        // the way the legacy client left old keys behind.
        let mining = if record.is_mining {
            let started_at = record
                .mining_start_time
                .ok_or("corrupt snapshot: IsMining set without MiningStartTime")?;
            Some(MiningCycle {
                started_at,
                duration_secs: record
                    .mining_duration_secs
                    .unwrap_or(crate::constants::MINING_DURATION_SECS),
            })
        } else {
            None
        };

        Ok(Self {
            player_id: record.player_id,
            total_points: record.total_points,
            ton_balance: record.ton_balance,
            login_streak: record.login_streak,
            last_login_date: record.last_login_date,
            mining,
            referred_players: record.referred_players,
            referred_by: record.referred_by,
            completed_tasks: record.completed_tasks,
            code_claim: CodeClaimState {
                pending: record.pending_code_reward,
                claims_used: record.code_claims_used,
            },
        })
    }
}
