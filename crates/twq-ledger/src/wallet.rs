//! # TON Wallet Accounting
//!
//! Fixed-point TON amounts and the promo-code claim flow.
//!
//! TON balances are local accounting only: no transfer ever leaves this
//! process. Amounts are stored in minor units (1 TON = 10,000 units) and
//! rendered with 4 decimal places, matching the persisted decimal-string
//! format.

use crate::constants::ONE_TON;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A non-negative TON amount in minor units (4 decimal places)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TonAmount(u64);

impl TonAmount {
    /// Zero balance
    pub const ZERO: TonAmount = TonAmount(0);

    /// Create from minor units (1 TON = 10,000 minor units)
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Create from a whole number of TON
    pub const fn from_ton(ton: u64) -> Self {
        Self(ton * ONE_TON)
    }

    /// Raw minor-unit value
    pub const fn minor(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Add, saturating at the representable maximum
    pub const fn saturating_add(self, other: TonAmount) -> TonAmount {
        TonAmount(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for TonAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:04}", self.0 / ONE_TON, self.0 % ONE_TON)
    }
}

/// Failure to parse a decimal TON string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid TON amount: {0:?}")]
pub struct ParseTonError(pub String);

impl FromStr for TonAmount {
    type Err = ParseTonError;

    /// Parse `"12.0299"`-style decimal strings with up to 4 fractional digits
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseTonError(s.to_string());
        let (whole_str, frac_str) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole_str.is_empty() || frac_str.len() > 4 {
            return Err(bad());
        }
        let whole: u64 = whole_str.parse().map_err(|_| bad())?;
        let frac: u64 = if frac_str.is_empty() {
            0
        } else {
            let parsed: u64 = frac_str.parse().map_err(|_| bad())?;
            // "0.3" means 3000 minor units, not 3
            parsed * 10u64.pow(4 - frac_str.len() as u32)
        };
        whole
            .checked_mul(ONE_TON)
            .and_then(|w| w.checked_add(frac))
            .map(TonAmount)
            .ok_or_else(bad)
    }
}

impl Serialize for TonAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TonAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Verify-then-claim state for the promo-code TON reward
///
/// The flow has two steps: a correct code stages the reward as pending and
/// consumes one claim slot; a later claim moves the pending amount into the
/// balance. Re-verifying while a reward is pending is a no-op and does not
/// consume another slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeClaimState {
    /// Verified reward not yet moved into the balance
    pub pending: TonAmount,

    /// Claim slots consumed so far
    pub claims_used: u32,
}

impl CodeClaimState {
    pub fn has_pending(&self) -> bool {
        !self.pending.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_four_decimals() {
        assert_eq!(TonAmount::from_minor(299).to_string(), "0.0299");
        assert_eq!(TonAmount::from_ton(1).to_string(), "1.0000");
        assert_eq!(TonAmount::from_minor(123_456).to_string(), "12.3456");
        assert_eq!(TonAmount::ZERO.to_string(), "0.0000");
    }

    #[test]
    fn test_parse_round_trip() {
        for s in ["0.0299", "1.0000", "12.3456", "0.0000", "100.5000"] {
            let amount: TonAmount = s.parse().unwrap();
            assert_eq!(amount.to_string(), s);
        }
    }

    #[test]
    fn test_parse_short_fractions() {
        assert_eq!("0.3".parse::<TonAmount>().unwrap(), TonAmount::from_minor(3_000));
        assert_eq!("2.05".parse::<TonAmount>().unwrap(), TonAmount::from_minor(20_500));
        assert_eq!("7".parse::<TonAmount>().unwrap(), TonAmount::from_ton(7));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for s in ["", ".", ".5", "1.23456", "-1.0", "1.2.3", "abc", "1.00x"] {
            assert!(s.parse::<TonAmount>().is_err(), "accepted {:?}", s);
        }
    }

    #[test]
    fn test_serde_as_decimal_string() {
        let amount = TonAmount::from_minor(299);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"0.0299\"");

        let back: TonAmount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_ordering() {
        assert!(TonAmount::from_minor(299) < TonAmount::from_ton(1));
        assert!(TonAmount::from_ton(2) > TonAmount::from_minor(19_999));
    }

    #[test]
    fn test_code_claim_state() {
        let mut state = CodeClaimState::default();
        assert!(!state.has_pending());

        state.pending = TonAmount::from_minor(299);
        state.claims_used = 1;
        assert!(state.has_pending());
    }
}
