pub mod aggregator;
pub mod controller;
pub mod scheduler;
pub mod streak;

pub use aggregator::{SnapshotSource, StatsAggregator, StatsOutcome};
pub use controller::{format_last_updated, StatsController, StatsState};
pub use scheduler::RefreshTask;
pub use streak::{calculate_streaks, Streaks};
