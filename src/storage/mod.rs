pub mod memory;
pub mod sqlite;

pub use memory::MemoryCacheStore;
pub use sqlite::SqliteCacheStore;

use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::models::StatsSnapshot;

/// Fixed key the single snapshot lives under.
pub const CACHE_KEY: &str = "github_stats_cache";

/// Holds at most one snapshot. Freshness is judged from the snapshot's own
/// `last_updated`, never from when it was written.
pub trait CacheStore: Send + Sync {
    /// The stored snapshot regardless of age.
    fn peek_stale(&self) -> Result<Option<StatsSnapshot>>;

    fn write(&self, snapshot: &StatsSnapshot) -> Result<()>;

    fn clear(&self) -> Result<()>;

    fn ttl(&self) -> Duration;

    fn read(&self) -> Result<Option<StatsSnapshot>> {
        self.read_at(Utc::now())
    }

    /// The stored snapshot only while younger than the TTL. An expired
    /// entry stays in storage and remains visible to `peek_stale`.
    fn read_at(&self, now: DateTime<Utc>) -> Result<Option<StatsSnapshot>> {
        let ttl = self.ttl();
        Ok(self.peek_stale()?.filter(|s| s.is_fresh(now, ttl)))
    }

    fn age_hours(&self) -> Result<Option<f64>> {
        let now = Utc::now();
        Ok(self.read_at(now)?.map(|s| s.age_hours(now)))
    }
}
