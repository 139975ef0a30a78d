//! # Mining Cycle
//!
//! Single-slot fixed-duration timer after which a flat point reward becomes
//! claimable. Progress is computed lazily from the caller-supplied clock on
//! each query; no background task runs.
//!
//! ## State Machine
//!
//! ```text
//! Idle -> Running (start) -> Matured (time elapses) -> Idle (claim)
//! ```
//!
//! A claim while `Running` fails, and no transition skips `Matured`. A
//! claimed cycle is removed entirely, which is what allows the next start.

use serde::{Deserialize, Serialize};

/// One active mining cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningCycle {
    /// Start of the cycle (Unix seconds)
    pub started_at: i64,

    /// Fixed cycle length in seconds
    pub duration_secs: u64,
}

/// Lazily computed view of an active cycle at a point in time
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MiningProgress {
    /// Completed share of the cycle in `[0, 1]`
    pub fraction: f64,

    /// Seconds until maturity, zero once matured
    pub remaining_secs: u64,

    /// Whether the reward can be claimed
    pub matured: bool,
}

impl MiningCycle {
    /// Start a cycle at `now`
    pub fn start(now: i64, duration_secs: u64) -> Self {
        Self {
            started_at: now,
            duration_secs,
        }
    }

    /// Timestamp at which the cycle matures
    pub fn matures_at(&self) -> i64 {
        self.started_at.saturating_add(self.duration_secs as i64)
    }

    pub fn is_matured(&self, now: i64) -> bool {
        now >= self.matures_at()
    }

    /// Seconds until maturity, zero once matured
    pub fn remaining_secs(&self, now: i64) -> u64 {
        self.matures_at().saturating_sub(now).max(0) as u64
    }

    /// Progress view at `now`
    ///
    /// A clock that reads before `started_at` reports zero progress rather
    /// than a negative fraction.
    pub fn progress(&self, now: i64) -> MiningProgress {
        let elapsed = now.saturating_sub(self.started_at).max(0) as u64;
        let fraction = if self.duration_secs == 0 {
            1.0
        } else {
            (elapsed as f64 / self.duration_secs as f64).min(1.0)
        };
        MiningProgress {
            fraction,
            remaining_secs: self.remaining_secs(now),
            matured: self.is_matured(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MINING_DURATION_SECS;

    #[test]
    fn test_cycle_starts_running() {
        let cycle = MiningCycle::start(0, MINING_DURATION_SECS);
        assert!(!cycle.is_matured(0));
        assert_eq!(cycle.matures_at(), 21_600);
    }

    #[test]
    fn test_halfway_progress() {
        let cycle = MiningCycle::start(0, 21_600);
        let progress = cycle.progress(10_800);

        assert_eq!(progress.fraction, 0.5);
        assert_eq!(progress.remaining_secs, 10_800);
        assert!(!progress.matured);
    }

    #[test]
    fn test_matures_exactly_at_duration() {
        let cycle = MiningCycle::start(100, 21_600);
        assert!(!cycle.is_matured(21_699));
        assert!(cycle.is_matured(21_700));

        let progress = cycle.progress(21_700);
        assert_eq!(progress.fraction, 1.0);
        assert_eq!(progress.remaining_secs, 0);
        assert!(progress.matured);
    }

    #[test]
    fn test_fraction_capped_at_one() {
        let cycle = MiningCycle::start(0, 21_600);
        let progress = cycle.progress(1_000_000);
        assert_eq!(progress.fraction, 1.0);
    }

    #[test]
    fn test_clock_before_start() {
        let cycle = MiningCycle::start(1_000, 21_600);
        let progress = cycle.progress(500);
        assert_eq!(progress.fraction, 0.0);
        assert!(!progress.matured);
        assert_eq!(progress.remaining_secs, 22_100);
    }
}
