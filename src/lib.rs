pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod stats;
pub mod storage;

pub use config::{Config, StatsConfig};
pub use error::{DegradedFetch, Error, Result, Warning};
pub use github::{CalendarFetch, GitHubClient, StatsSource};
pub use stats::{RefreshTask, SnapshotSource, StatsAggregator, StatsController, StatsOutcome, StatsState};
pub use storage::{CacheStore, MemoryCacheStore, SqliteCacheStore};
