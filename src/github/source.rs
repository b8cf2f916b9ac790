use async_trait::async_trait;

use crate::error::Result;
use crate::github::graphql::CalendarFetch;
use crate::models::{Profile, RepositorySummary};

/// The three remote reads a stats snapshot is assembled from.
///
/// Profile and repository reads are essential and return errors. The
/// contribution read is supplementary and reports degradation as a value.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<Profile>;
    async fn fetch_repositories(&self, username: &str) -> Result<Vec<RepositorySummary>>;
    async fn fetch_contribution_calendar(&self, username: &str, credential: Option<&str>) -> CalendarFetch;
}
