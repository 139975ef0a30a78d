//! # Reward Ledger
//!
//! Single authority for all point, balance, streak, and referral mutations.
//! Every operation is total over the current snapshot: failures are typed
//! [`LedgerError`]s and leave both the in-memory account and the persisted
//! snapshot unchanged.
//!
//! Mutations go through the store first. An operation builds the updated
//! account, writes it as one atomic snapshot, and only then replaces the
//! in-memory state, so a failed write never leaves a partial mutation
//! behind.

use crate::account::PlayerAccount;
use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::mining::{MiningCycle, MiningProgress};
use crate::schedule::DailyRewardSchedule;
use crate::wallet::TonAmount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Snapshot read/write boundary the ledger commits through
///
/// Implementations must write the full snapshot as one unit; a crash
/// mid-write may lose the new snapshot but never mix old and new fields.
pub trait SnapshotStore {
    /// Load the persisted account, `None` on first launch
    fn load(&self) -> Result<Option<PlayerAccount>>;

    /// Durably replace the persisted account
    fn save(&self, account: &PlayerAccount) -> Result<()>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &S {
    fn load(&self) -> Result<Option<PlayerAccount>> {
        (**self).load()
    }

    fn save(&self, account: &PlayerAccount) -> Result<()> {
        (**self).save(account)
    }
}

/// Result of an accepted daily login claim
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLoginReceipt {
    /// 1-based streak day the claim landed on
    pub streak_day: u32,

    /// Points credited for that day
    pub points_awarded: u64,
}

/// Result of a referral registration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralReceipt {
    /// False when the id was already counted
    pub accepted: bool,

    /// Points credited to the referrer, zero for duplicates
    pub bonus_points: u64,
}

/// Result of a task completion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReceipt {
    /// False when the task was already rewarded
    pub accepted: bool,

    /// Points credited, zero for repeats
    pub points_awarded: u64,
}

/// The reward/progression ledger for one installation
pub struct RewardLedger<S: SnapshotStore> {
    account: PlayerAccount,
    schedule: DailyRewardSchedule,
    config: LedgerConfig,
    store: S,
}

impl<S: SnapshotStore> RewardLedger<S> {
    /// Open the ledger, loading the persisted account or creating a fresh
    /// one on first launch
    pub fn open(config: LedgerConfig, store: S) -> Result<Self> {
        let account = match store.load()? {
            Some(account) => {
                info!(player_id = %account.player_id, points = account.total_points, "loaded account");
                account
            }
            None => {
                let account = PlayerAccount::new();
                store.save(&account)?;
                info!(player_id = %account.player_id, "created new account");
                account
            }
        };
        let schedule = DailyRewardSchedule::new(config.daily.rewards.clone());
        Ok(Self {
            account,
            schedule,
            config,
            store,
        })
    }

    /// Current account state
    pub fn account(&self) -> &PlayerAccount {
        &self.account
    }

    pub fn total_points(&self) -> u64 {
        self.account.total_points
    }

    pub fn ton_balance(&self) -> TonAmount {
        self.account.ton_balance
    }

    /// Persist `updated` and replace the in-memory account on success
    fn commit(&mut self, updated: PlayerAccount) -> Result<()> {
        self.store.save(&updated)?;
        self.account = updated;
        Ok(())
    }

    /// Add points to the running total
    ///
    /// Zero is accepted; negative deltas are rejected and not applied.
    pub fn add_points(&mut self, amount: i64) -> Result<u64> {
        if amount < 0 {
            warn!(amount, "rejected negative point delta");
            return Err(LedgerError::InvalidAmount(amount));
        }
        let mut next = self.account.clone();
        next.total_points = next.total_points.saturating_add(amount as u64);
        self.commit(next)?;
        debug!(amount, total = self.account.total_points, "points added");
        Ok(self.account.total_points)
    }

    /// Claim the daily login reward for `today`
    ///
    /// The streak resets to 1 when the gap since the last accepted claim
    /// exceeds the grace window, and increments otherwise. A calendar day is
    /// accepted at most once, and `last_login_date` never moves backward.
    pub fn claim_daily_login(&mut self, today: NaiveDate) -> Result<DailyLoginReceipt> {
        let streak_day = match self.account.last_login_date {
            Some(last) if today <= last => return Err(LedgerError::AlreadyClaimedToday),
            Some(last) => {
                let gap_days = (today - last).num_days();
                if gap_days > i64::from(self.config.daily.grace_days) {
                    debug!(gap_days, "streak broken, restarting at day 1");
                    1
                } else {
                    self.account.login_streak + 1
                }
            }
            None => 1,
        };

        let points_awarded = self.schedule.reward_for_day(streak_day);
        let mut next = self.account.clone();
        next.login_streak = streak_day;
        next.last_login_date = Some(today);
        next.total_points = next.total_points.saturating_add(points_awarded);
        self.commit(next)?;

        debug!(%today, streak_day, points_awarded, "daily login claimed");
        Ok(DailyLoginReceipt {
            streak_day,
            points_awarded,
        })
    }

    /// Start a new mining cycle at `now`
    ///
    /// Fails while a cycle is running or matured-unclaimed.
    pub fn start_mining(&mut self, now: i64) -> Result<MiningCycle> {
        if self.account.mining.is_some() {
            return Err(LedgerError::CycleAlreadyActive);
        }
        let cycle = MiningCycle::start(now, self.config.mining.duration_secs);
        let mut next = self.account.clone();
        next.mining = Some(cycle);
        self.commit(next)?;
        debug!(started_at = now, duration_secs = cycle.duration_secs, "mining started");
        Ok(cycle)
    }

    /// Progress of the active cycle at `now`; `None` while idle
    pub fn mining_progress(&self, now: i64) -> Option<MiningProgress> {
        self.account.mining.map(|cycle| cycle.progress(now))
    }

    /// Claim a matured mining cycle
    ///
    /// Awards the fixed cycle reward, plus the claim bonus when this account
    /// joined through an invite link, and returns the cycle to idle.
    pub fn claim_mining(&mut self, now: i64) -> Result<u64> {
        let cycle = self.account.mining.ok_or(LedgerError::NoActiveCycle)?;
        if !cycle.is_matured(now) {
            return Err(LedgerError::NotMatured {
                remaining_secs: cycle.remaining_secs(now),
            });
        }

        let mut reward = self.config.mining.reward_points;
        if self.account.has_referrer() {
            reward += self.config.referral.claim_bonus_points;
        }

        let mut next = self.account.clone();
        next.mining = None;
        next.total_points = next.total_points.saturating_add(reward);
        self.commit(next)?;

        debug!(reward, total = self.account.total_points, "mining claimed");
        Ok(reward)
    }

    /// Count a referred player once and credit the referrer bonus
    ///
    /// Idempotent: an id already counted returns `accepted = false` with no
    /// bonus and is not an error.
    pub fn register_referral(&mut self, referred_id: &str) -> Result<ReferralReceipt> {
        if referred_id.is_empty() || referred_id == self.account.player_id.to_string() {
            return Err(LedgerError::InvalidReferrer(referred_id.to_string()));
        }
        if self.account.referred_players.contains(referred_id) {
            debug!(referred_id, "duplicate referral ignored");
            return Ok(ReferralReceipt {
                accepted: false,
                bonus_points: 0,
            });
        }

        let bonus_points = self.config.referral.referrer_bonus();
        let mut next = self.account.clone();
        next.referred_players.insert(referred_id.to_string());
        next.total_points = next.total_points.saturating_add(bonus_points);
        self.commit(next)?;

        debug!(referred_id, bonus_points, count = self.account.referral_count(), "referral accepted");
        Ok(ReferralReceipt {
            accepted: true,
            bonus_points,
        })
    }

    /// Record which player's invite link this installation joined through
    ///
    /// Set at most once; later calls return `false`. Self-referral is
    /// rejected.
    pub fn set_referrer(&mut self, referrer_id: &str) -> Result<bool> {
        if referrer_id.is_empty() || referrer_id == self.account.player_id.to_string() {
            return Err(LedgerError::InvalidReferrer(referrer_id.to_string()));
        }
        if self.account.referred_by.is_some() {
            return Ok(false);
        }
        let mut next = self.account.clone();
        next.referred_by = Some(referrer_id.to_string());
        self.commit(next)?;
        debug!(referrer_id, "referrer recorded");
        Ok(true)
    }

    /// Reward a one-shot task the first time its id completes
    pub fn complete_task(&mut self, task_id: &str) -> Result<TaskReceipt> {
        if self.account.completed_tasks.contains(task_id) {
            return Ok(TaskReceipt {
                accepted: false,
                points_awarded: 0,
            });
        }

        let points_awarded = self.config.tasks.reward_points;
        let mut next = self.account.clone();
        next.completed_tasks.insert(task_id.to_string());
        next.total_points = next.total_points.saturating_add(points_awarded);
        self.commit(next)?;

        debug!(task_id, points_awarded, "task rewarded");
        Ok(TaskReceipt {
            accepted: true,
            points_awarded,
        })
    }

    /// Verify the promo code and stage its TON reward as pending
    ///
    /// A correct code consumes one claim slot. Re-verifying while a reward
    /// is pending returns the staged amount without consuming another slot.
    pub fn verify_code(&mut self, input: &str) -> Result<TonAmount> {
        if input != self.config.wallet.code {
            warn!("incorrect promo code");
            return Err(LedgerError::IncorrectCode);
        }
        if self.account.code_claim.has_pending() {
            return Ok(self.account.code_claim.pending);
        }
        if self.account.code_claim.claims_used >= self.config.wallet.max_code_claims {
            return Err(LedgerError::ClaimLimitReached {
                limit: self.config.wallet.max_code_claims,
            });
        }

        let reward = self.config.wallet.code_reward;
        let mut next = self.account.clone();
        next.code_claim.pending = reward;
        next.code_claim.claims_used += 1;
        self.commit(next)?;

        debug!(%reward, claims_used = self.account.code_claim.claims_used, "code verified");
        Ok(reward)
    }

    /// Move the pending code reward into the TON balance
    pub fn claim_code_reward(&mut self) -> Result<TonAmount> {
        if !self.account.code_claim.has_pending() {
            return Err(LedgerError::NothingToClaim);
        }
        let amount = self.account.code_claim.pending;
        let mut next = self.account.clone();
        next.ton_balance = next.ton_balance.saturating_add(amount);
        next.code_claim.pending = TonAmount::ZERO;
        self.commit(next)?;

        debug!(%amount, balance = %self.account.ton_balance, "code reward claimed");
        Ok(amount)
    }

    /// Withdraw the full TON balance
    ///
    /// Local accounting only: the balance is zeroed and returned, no
    /// transfer leaves this process.
    pub fn withdraw_ton(&mut self) -> Result<TonAmount> {
        let balance = self.account.ton_balance;
        if balance < self.config.wallet.withdrawal_threshold {
            return Err(LedgerError::BelowThreshold {
                needed: self.config.wallet.withdrawal_threshold,
                balance,
            });
        }
        let mut next = self.account.clone();
        next.ton_balance = TonAmount::ZERO;
        self.commit(next)?;

        info!(%balance, "TON withdrawn");
        Ok(balance)
    }

    /// Reset progression state
    ///
    /// Clears the streak, the last login date, and the referral book.
    /// Earned balances, completed tasks, the inviter record, and any
    /// in-flight mining cycle are preserved.
    pub fn reset_progress(&mut self) -> Result<()> {
        let mut next = self.account.clone();
        next.login_streak = 0;
        next.last_login_date = None;
        next.referred_players.clear();
        self.commit(next)?;
        info!("progress reset");
        Ok(())
    }
}
