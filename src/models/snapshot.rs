use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::contribution::ContributionDay;
use super::repository::RepositorySummary;
use super::user::Profile;

/// One fully assembled aggregation result. Cached and replaced as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub profile: Profile,
    pub repos: Vec<RepositorySummary>,
    pub total_contributions: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub contribution_days: Vec<ContributionDay>,
    pub last_updated: DateTime<Utc>,
}

impl StatsSnapshot {
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.last_updated)
    }

    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        self.age(now).num_milliseconds() as f64 / (1000.0 * 60.0 * 60.0)
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}
