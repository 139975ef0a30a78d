//! # Daily Reward Schedule
//!
//! Fixed ordered table of daily-login rewards, indexed by streak day and
//! cycling indefinitely: day 31 of a 30-entry table pays the same as day 1.

use serde::{Deserialize, Serialize};

/// Default 30-day reward table, escalating with week and month milestones
pub const DEFAULT_DAILY_REWARDS: [u64; 30] = [
    10, 15, 20, 25, 30, 40, 50, // week 1, day 7 bump
    60, 70, 80, 90, 100, 110, 130, // week 2
    150, 170, 190, 210, 230, 250, 280, // week 3
    310, 340, 370, 400, 440, 480, 520, // week 4
    560, 600, // day 30 milestone
];

/// Cyclic daily-login reward schedule
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRewardSchedule {
    rewards: Vec<u64>,
}

impl DailyRewardSchedule {
    /// Create a schedule from an ordered reward table
    ///
    /// An empty table falls back to the default 30-day schedule so lookups
    /// stay total.
    pub fn new(rewards: Vec<u64>) -> Self {
        if rewards.is_empty() {
            tracing::warn!("empty daily reward table, using default schedule");
            return Self::default();
        }
        Self { rewards }
    }

    /// Number of entries before the schedule wraps around
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Reward for a 1-based streak day; wraps past the end of the table
    pub fn reward_for_day(&self, streak_day: u32) -> u64 {
        let index = streak_day.saturating_sub(1) as usize % self.rewards.len();
        self.rewards[index]
    }
}

impl Default for DailyRewardSchedule {
    fn default() -> Self {
        Self {
            rewards: DEFAULT_DAILY_REWARDS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_length() {
        let schedule = DailyRewardSchedule::default();
        assert_eq!(schedule.len(), 30);
    }

    #[test]
    fn test_reward_lookup() {
        let schedule = DailyRewardSchedule::new(vec![10, 20, 30]);
        assert_eq!(schedule.reward_for_day(1), 10);
        assert_eq!(schedule.reward_for_day(2), 20);
        assert_eq!(schedule.reward_for_day(3), 30);
    }

    #[test]
    fn test_schedule_cycles() {
        let schedule = DailyRewardSchedule::default();
        // day 31 of a 30-entry schedule pays the same as day 1
        assert_eq!(schedule.reward_for_day(31), schedule.reward_for_day(1));
        assert_eq!(schedule.reward_for_day(61), schedule.reward_for_day(1));
        assert_eq!(schedule.reward_for_day(45), schedule.reward_for_day(15));
    }

    #[test]
    fn test_day_zero_treated_as_day_one() {
        let schedule = DailyRewardSchedule::new(vec![5, 7]);
        assert_eq!(schedule.reward_for_day(0), 5);
    }

    #[test]
    fn test_empty_table_falls_back_to_default() {
        let schedule = DailyRewardSchedule::new(Vec::new());
        assert_eq!(schedule.len(), 30);
        assert_eq!(schedule.reward_for_day(1), DEFAULT_DAILY_REWARDS[0]);
    }
}
