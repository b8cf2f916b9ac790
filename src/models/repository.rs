use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub description: Option<String>,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub language: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub topics: Vec<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub fork: bool,
}

impl RepositorySummary {
    /// Forked upstream, or named like a fork. The name match is
    /// case-sensitive, so "Forklift" stays in.
    pub fn is_fork(&self) -> bool {
        self.fork || self.name.contains("fork")
    }
}

/// Drops forks, orders by stars (most first) and keeps the top `limit`.
/// Ties keep their incoming order, which is most recently updated first.
pub fn rank_repositories(repos: Vec<RepositorySummary>, limit: usize) -> Vec<RepositorySummary> {
    let mut ranked: Vec<_> = repos.into_iter().filter(|r| !r.is_fork()).collect();
    ranked.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    ranked.truncate(limit);
    ranked
}
