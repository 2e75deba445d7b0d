use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Studio subscription tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Studio,
    Agency,
}

impl Tier {
    /// Get display name for the tier
    pub fn display_name(&self) -> &str {
        match self {
            Tier::Free => "Free",
            Tier::Studio => "Studio",
            Tier::Agency => "Agency",
        }
    }

    /// Check if this is a paid tier
    pub fn is_paid(&self) -> bool {
        !matches!(self, Tier::Free)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Subscription status as reported by `GET /billing/subscription`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub tier: Tier,
    #[serde(default)]
    pub current_period_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    #[serde(default)]
    pub trial_ends_at: Option<DateTime<Utc>>,
}

impl SubscriptionStatus {
    /// Check if currently in trial period
    pub fn is_trial(&self) -> bool {
        self.trial_ends_at.is_some_and(|ends| Utc::now() < ends)
    }

    /// Check if subscription is active
    pub fn is_active(&self) -> bool {
        match self.current_period_end {
            Some(period_end) => Utc::now() < period_end,
            None => self.tier == Tier::Free, // Free tier is always active
        }
    }

    /// The project generator is a paid feature; a live trial counts.
    pub fn allows_generator(&self) -> bool {
        (self.tier.is_paid() && self.is_active()) || self.is_trial()
    }

    /// Days remaining in current period
    pub fn days_remaining(&self) -> Option<i64> {
        self.current_period_end
            .map(|end| (end - Utc::now()).num_days().max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn free_tier_never_allows_the_generator() {
        let status = SubscriptionStatus {
            tier: Tier::Free,
            current_period_end: None,
            cancel_at_period_end: false,
            trial_ends_at: None,
        };
        assert!(status.is_active());
        assert!(!status.allows_generator());
    }

    #[test]
    fn active_paid_tier_allows_the_generator() {
        let status = SubscriptionStatus {
            tier: Tier::Studio,
            current_period_end: Some(Utc::now() + Duration::days(10)),
            cancel_at_period_end: false,
            trial_ends_at: None,
        };
        assert!(status.allows_generator());
        assert!(status.days_remaining().unwrap() >= 9);
    }

    #[test]
    fn lapsed_paid_tier_falls_back_to_trial_only() {
        let lapsed = SubscriptionStatus {
            tier: Tier::Agency,
            current_period_end: Some(Utc::now() - Duration::days(1)),
            cancel_at_period_end: true,
            trial_ends_at: None,
        };
        assert!(!lapsed.allows_generator());

        let on_trial = SubscriptionStatus {
            trial_ends_at: Some(Utc::now() + Duration::days(3)),
            ..lapsed
        };
        assert!(on_trial.allows_generator());
    }
}
