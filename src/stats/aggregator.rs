use std::sync::Arc;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::config::StatsConfig;
use crate::error::{Error, Result, Warning};
use crate::github::StatsSource;
use crate::models::{rank_repositories, StatsSnapshot};
use crate::stats::streak::calculate_streaks;
use crate::storage::CacheStore;

/// Where a returned snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Cache,
    Fresh,
    /// Expired cache served because the refresh failed.
    Stale,
}

#[derive(Debug, Clone)]
pub struct StatsOutcome {
    pub snapshot: StatsSnapshot,
    pub source: SnapshotSource,
    pub warnings: Vec<Warning>,
}

pub struct StatsAggregator {
    source: Arc<dyn StatsSource>,
    cache: Arc<dyn CacheStore>,
    config: StatsConfig,
    refresh_lock: Mutex<()>,
}

impl StatsAggregator {
    pub fn new(
        source: impl StatsSource + 'static,
        cache: impl CacheStore + 'static,
        config: StatsConfig,
    ) -> Self {
        Self::from_shared(Arc::new(source), Arc::new(cache), config)
    }

    pub fn from_shared(
        source: Arc<dyn StatsSource>,
        cache: Arc<dyn CacheStore>,
        config: StatsConfig,
    ) -> Self {
        Self {
            source,
            cache,
            config,
            refresh_lock: Mutex::new(()),
        }
    }

    pub async fn get_stats(
        &self,
        username: &str,
        credential: Option<&str>,
        force_refresh: bool,
    ) -> Result<StatsSnapshot> {
        Ok(self.collect(username, credential, force_refresh).await?.snapshot)
    }

    /// Cache hit, fresh fetch, or stale fallback, in that order.
    ///
    /// Only `Error::Aggregation` is returned; cache and contribution
    /// problems are absorbed into `StatsOutcome::warnings`.
    pub async fn collect(
        &self,
        username: &str,
        credential: Option<&str>,
        force_refresh: bool,
    ) -> Result<StatsOutcome> {
        let _guard = self.refresh_lock.lock().await;
        let mut warnings = Vec::new();

        if force_refresh {
            if let Err(e) = self.cache.clear() {
                tracing::warn!("Failed to clear stats cache: {}", e);
                warnings.push(Warning::CacheIo(e.to_string()));
            }
        } else {
            match self.cache.read() {
                Ok(Some(snapshot)) => {
                    tracing::info!("Using cached GitHub stats from {}", snapshot.last_updated);
                    return Ok(StatsOutcome {
                        snapshot,
                        source: SnapshotSource::Cache,
                        warnings,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Ignoring unreadable stats cache: {}", e);
                    warnings.push(Warning::CacheIo(e.to_string()));
                }
            }
        }

        tracing::info!("Fetching fresh GitHub stats for: {}", username);
        match self.fetch_snapshot(username, credential, &mut warnings).await {
            Ok(snapshot) => {
                if let Err(e) = self.cache.write(&snapshot) {
                    tracing::warn!("Failed to cache stats snapshot: {}", e);
                    warnings.push(Warning::CacheIo(e.to_string()));
                }
                Ok(StatsOutcome {
                    snapshot,
                    source: SnapshotSource::Fresh,
                    warnings,
                })
            }
            Err(fetch_error) => {
                tracing::warn!("Fetching GitHub stats for {} failed: {}", username, fetch_error);
                let stale = self.cache.peek_stale().unwrap_or_else(|e| {
                    tracing::warn!("Stale cache unavailable: {}", e);
                    None
                });

                match stale {
                    Some(snapshot) => {
                        tracing::info!("Using expired cache from {} as fallback", snapshot.last_updated);
                        Ok(StatsOutcome {
                            snapshot,
                            source: SnapshotSource::Stale,
                            warnings,
                        })
                    }
                    None => Err(Error::Aggregation {
                        username: username.to_string(),
                        source: Box::new(fetch_error),
                    }),
                }
            }
        }
    }

    async fn fetch_snapshot(
        &self,
        username: &str,
        credential: Option<&str>,
        warnings: &mut Vec<Warning>,
    ) -> Result<StatsSnapshot> {
        let (profile, repos, calendar) = futures::join!(
            self.source.fetch_profile(username),
            self.source.fetch_repositories(username),
            self.source.fetch_contribution_calendar(username, credential),
        );

        let profile = profile?;
        let repos = repos?;

        let (calendar, degraded) = calendar.into_parts();
        if let Some(reason) = degraded {
            warnings.push(Warning::DegradedFetch(reason));
        }

        let now = Utc::now();
        let streaks = calculate_streaks(&calendar.contribution_days, now.date_naive());

        let total_contributions = match calendar.total_contributions {
            0 => self.config.fallback_total_contributions,
            total => total,
        };

        Ok(StatsSnapshot {
            profile,
            repos: rank_repositories(repos, self.config.top_repos),
            total_contributions,
            current_streak: streaks.current,
            longest_streak: streaks.longest,
            contribution_days: calendar.contribution_days,
            last_updated: now,
        })
    }

    /// Drops the cached snapshot. A storage failure is logged and
    /// returned as a warning rather than an error.
    pub fn clear_cache(&self) -> Option<Warning> {
        match self.cache.clear() {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("Failed to clear stats cache: {}", e);
                Some(Warning::CacheIo(e.to_string()))
            }
        }
    }

    /// Hours since the cached snapshot was assembled, while it is fresh.
    pub fn cache_age_hours(&self) -> Option<f64> {
        match self.cache.age_hours() {
            Ok(age) => age,
            Err(e) => {
                tracing::warn!("Unable to read stats cache age: {}", e);
                None
            }
        }
    }
}
