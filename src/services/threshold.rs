//! Reputation-adjusted threshold policy.

use crate::models::ReputationProfile;

/// Compute the effective failure threshold for a source IP's reputation
///
/// Trusted sources get one extra failure of headroom, suspicious sources
/// lose one (never below 1). Pure function; safe to call without any lock.
pub fn effective_threshold(base: u32, profile: ReputationProfile) -> u32 {
    match profile {
        ReputationProfile::Trusted => base + 1,
        ReputationProfile::Normal => base,
        ReputationProfile::Suspicious => base.saturating_sub(1).max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_raises_threshold() {
        assert_eq!(effective_threshold(3, ReputationProfile::Trusted), 4);
    }

    #[test]
    fn suspicious_lowers_threshold() {
        assert_eq!(effective_threshold(3, ReputationProfile::Suspicious), 2);
    }

    #[test]
    fn normal_keeps_base() {
        assert_eq!(effective_threshold(3, ReputationProfile::Normal), 3);
    }

    #[test]
    fn threshold_never_drops_below_one() {
        assert_eq!(effective_threshold(1, ReputationProfile::Suspicious), 1);
        assert_eq!(effective_threshold(0, ReputationProfile::Suspicious), 1);
    }
}
